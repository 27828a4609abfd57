//! Detail modal for legal disclosures (privacy policy, imprint)

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// A titled document shown in the modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disclosure {
    pub title: Option<String>,
    pub content: String,
}

impl Disclosure {
    pub fn new(title: Option<&str>, content: &str) -> Self {
        Self {
            title: title.map(str::to_string),
            content: content.to_string(),
        }
    }

    /// Parse a plain-text document. A leading `# ` line becomes the title.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim_start();
        if let Some(rest) = trimmed.strip_prefix("# ") {
            let (title, body) = rest.split_once('\n').unwrap_or((rest, ""));
            return Self {
                title: Some(title.trim().to_string()),
                content: body.trim().to_string(),
            };
        }
        Self {
            title: None,
            content: text.trim().to_string(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read disclosure {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Keys the modal reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKey {
    Escape,
    Other,
}

#[derive(Debug, Default)]
pub struct DetailModal {
    current: Option<Disclosure>,
}

impl DetailModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a disclosure. Empty documents are not shown; returns whether it opened.
    pub fn open(&mut self, disclosure: Disclosure) -> bool {
        if disclosure.is_empty() {
            tracing::debug!(title = ?disclosure.title, "disclosure has no content");
            return false;
        }
        tracing::debug!(title = ?disclosure.title, "opening disclosure");
        self.current = Some(disclosure);
        true
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    /// Returns true if the key was consumed
    pub fn handle_key(&mut self, key: ModalKey) -> bool {
        if self.current.is_none() {
            return false;
        }
        if key == ModalKey::Escape {
            self.close();
        }
        true
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// The disclosure to draw, if any
    pub fn visible(&self) -> Option<&Disclosure> {
        self.current.as_ref()
    }
}
