//! Data models for cookie consent
//!
//! `ConsentPreferences` is the record persisted under [`CONSENT_KEY`].

use serde::{Deserialize, Deserializer, Serialize};

/// Store key holding the visitor's consent decision
pub const CONSENT_KEY: &str = "cookie-consent";

/// Cookie category a visitor can consent to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Essential,
    Functional,
    Statistics,
    Marketing,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 4] = [
        Category::Essential,
        Category::Functional,
        Category::Statistics,
        Category::Marketing,
    ];

    /// Essential cookies are always active
    pub fn is_togglable(self) -> bool {
        self != Category::Essential
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Essential => "Essential (always active)",
            Category::Functional => "Functional",
            Category::Statistics => "Statistics",
            Category::Marketing => "Marketing",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::Essential => {
                "Required for the basic operation of the site, e.g. remembering these settings."
            }
            Category::Functional => {
                "Extended features such as embedded videos or chat widgets that are not strictly required."
            }
            Category::Statistics => {
                "Anonymised data about how visitors interact with the site."
            }
            Category::Marketing => "Used to show relevant advertising, e.g. ad network pixels.",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Essential => write!(f, "essential"),
            Category::Functional => write!(f, "functional"),
            Category::Statistics => write!(f, "statistics"),
            Category::Marketing => write!(f, "marketing"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "essential" => Ok(Category::Essential),
            "functional" => Ok(Category::Functional),
            "statistics" => Ok(Category::Statistics),
            "marketing" => Ok(Category::Marketing),
            _ => Err(format!(
                "Invalid category: {}. Use: essential, functional, statistics, marketing",
                s
            )),
        }
    }
}

/// Failure to decode a stored preference record
#[derive(Debug, thiserror::Error)]
#[error("Invalid consent record: {0}")]
pub struct ParseError(#[from] serde_json::Error);

/// A visitor's cookie-category decision.
///
/// `essential` is always `true`: there is no setter for it and a stored
/// `false` is coerced back on deserialization.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ConsentPreferences {
    essential: bool,
    functional: bool,
    statistics: bool,
    marketing: bool,
}

impl Default for ConsentPreferences {
    fn default() -> Self {
        Self::essential_only()
    }
}

/// On-disk shape; every field must be present.
#[derive(Deserialize)]
struct RawPreferences {
    #[allow(dead_code)]
    essential: bool,
    functional: bool,
    statistics: bool,
    marketing: bool,
}

impl<'de> Deserialize<'de> for ConsentPreferences {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawPreferences::deserialize(deserializer)?;
        Ok(Self::new(raw.functional, raw.statistics, raw.marketing))
    }
}

impl ConsentPreferences {
    pub fn new(functional: bool, statistics: bool, marketing: bool) -> Self {
        Self {
            essential: true,
            functional,
            statistics,
            marketing,
        }
    }

    /// Every category granted
    pub fn all() -> Self {
        Self::new(true, true, true)
    }

    /// Only essential cookies
    pub fn essential_only() -> Self {
        Self::new(false, false, false)
    }

    pub fn essential(&self) -> bool {
        self.essential
    }

    pub fn functional(&self) -> bool {
        self.functional
    }

    pub fn statistics(&self) -> bool {
        self.statistics
    }

    pub fn marketing(&self) -> bool {
        self.marketing
    }

    pub fn get(&self, category: Category) -> bool {
        match category {
            Category::Essential => self.essential,
            Category::Functional => self.functional,
            Category::Statistics => self.statistics,
            Category::Marketing => self.marketing,
        }
    }

    /// Flip a single category. Returns false (and changes nothing) for essential.
    pub fn toggle(&mut self, category: Category) -> bool {
        match category {
            Category::Essential => return false,
            Category::Functional => self.functional = !self.functional,
            Category::Statistics => self.statistics = !self.statistics,
            Category::Marketing => self.marketing = !self.marketing,
        }
        true
    }

    pub fn to_json(&self) -> String {
        // A struct of four bools cannot fail to serialize
        serde_json::json!({
            "essential": self.essential,
            "functional": self.functional,
            "statistics": self.statistics,
            "marketing": self.marketing,
        })
        .to_string()
    }

    pub fn from_json(raw: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(raw)?)
    }
}
