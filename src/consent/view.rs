//! Pure mapping from consent state to what the banner shows

use super::ConsentManager;
use crate::models::{Category, ConsentPreferences};
use crate::store::PreferenceStore;

/// Buttons and links the banner offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerAction {
    OpenSettings,
    CloseSettings,
    RejectAll,
    SaveSelection,
    AcceptAll,
    OpenPrivacy,
    OpenImprint,
}

impl BannerAction {
    pub fn label(self) -> &'static str {
        match self {
            BannerAction::OpenSettings => "Settings",
            BannerAction::CloseSettings => "Back",
            BannerAction::RejectAll => "Reject all",
            BannerAction::SaveSelection => "Save selection",
            BannerAction::AcceptAll => "Accept all",
            BannerAction::OpenPrivacy => "Privacy policy",
            BannerAction::OpenImprint => "Imprint",
        }
    }
}

/// One line in the settings view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub category: Category,
    pub title: &'static str,
    pub description: &'static str,
    pub checked: bool,
    pub togglable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BannerView {
    Hidden,
    Banner {
        actions: Vec<BannerAction>,
    },
    Settings {
        rows: Vec<CategoryRow>,
        actions: Vec<BannerAction>,
    },
}

pub fn render<S: PreferenceStore>(manager: &ConsentManager<S>) -> BannerView {
    let state = manager.state();
    if !state.banner_visible {
        return BannerView::Hidden;
    }

    if !state.settings_expanded {
        return BannerView::Banner {
            actions: vec![
                BannerAction::OpenPrivacy,
                BannerAction::OpenImprint,
                BannerAction::OpenSettings,
                BannerAction::RejectAll,
                BannerAction::AcceptAll,
            ],
        };
    }

    BannerView::Settings {
        rows: category_rows(&manager.draft()),
        actions: vec![
            BannerAction::CloseSettings,
            BannerAction::RejectAll,
            BannerAction::SaveSelection,
            BannerAction::AcceptAll,
        ],
    }
}

fn category_rows(draft: &ConsentPreferences) -> Vec<CategoryRow> {
    Category::ALL
        .iter()
        .map(|&category| CategoryRow {
            category,
            title: category.title(),
            description: category.description(),
            checked: draft.get(category),
            togglable: category.is_togglable(),
        })
        .collect()
}
