//! siteconsent - cookie-consent banner and legal disclosure modal for a personal website

pub mod commands;
pub mod config;
pub mod consent;
pub mod modal;
pub mod models;
pub mod signal;
pub mod store;
pub mod tui;
