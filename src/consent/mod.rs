//! Cookie-consent state machine
//!
//! `ConsentManager` owns the transient banner state and the editable draft,
//! and commits the visitor's decision to a [`PreferenceStore`]:
//! - no stored decision: the banner appears once the display delay elapses
//! - stored decision: it is loaded and the banner stays hidden
//! - corrupt stored value: logged, defaults used, nothing written
//!
//! Accept all, reject all and save selection each write the full record
//! exactly once and then close the banner. The reopen signal brings the
//! banner back with settings expanded at any time.

pub mod view;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::models::{Category, ConsentPreferences, CONSENT_KEY};
use crate::signal::{SignalBus, Subscription};
use crate::store::{PreferenceStore, StoreError};

pub use view::{render, BannerAction, BannerView, CategoryRow};

/// Delay before the banner appears on a first visit
pub const DEFAULT_DISPLAY_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct ConsentOptions {
    pub display_delay: Duration,
    pub key: String,
}

impl Default for ConsentOptions {
    fn default() -> Self {
        Self {
            display_delay: DEFAULT_DISPLAY_DELAY,
            key: CONSENT_KEY.to_string(),
        }
    }
}

/// Transient visibility flags, never persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsentState {
    pub banner_visible: bool,
    pub settings_expanded: bool,
}

/// What `mount` found in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Missing,
    Loaded,
    Corrupt,
}

#[derive(Debug)]
struct Inner {
    state: ConsentState,
    committed: ConsentPreferences,
    draft: ConsentPreferences,
    show_at: Option<Instant>,
}

impl Inner {
    fn reopen(&mut self) {
        self.show_at = None;
        self.state = ConsentState {
            banner_visible: true,
            settings_expanded: true,
        };
        tracing::debug!("consent settings reopened");
    }
}

pub struct ConsentManager<S: PreferenceStore> {
    store: S,
    key: String,
    inner: Rc<RefCell<Inner>>,
    load_outcome: LoadOutcome,
    _reopen: Subscription,
}

impl<S: PreferenceStore> ConsentManager<S> {
    /// Read the stored decision and attach to the reopen signal.
    ///
    /// `now` anchors the display delay; drive it forward with [`tick`](Self::tick).
    pub fn mount(store: S, bus: &SignalBus, options: ConsentOptions, now: Instant) -> Self {
        let stored = match store.read(&options.key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, key = %options.key, "failed to read consent record");
                None
            }
        };

        let (load_outcome, committed) = match stored {
            None => (LoadOutcome::Missing, ConsentPreferences::default()),
            Some(raw) => match ConsentPreferences::from_json(&raw) {
                Ok(prefs) => (LoadOutcome::Loaded, prefs),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to parse cookie preferences, using defaults");
                    (LoadOutcome::Corrupt, ConsentPreferences::default())
                }
            },
        };

        let show_at = match load_outcome {
            LoadOutcome::Missing => Some(now + options.display_delay),
            LoadOutcome::Loaded | LoadOutcome::Corrupt => None,
        };

        let inner = Rc::new(RefCell::new(Inner {
            state: ConsentState::default(),
            committed,
            draft: committed,
            show_at,
        }));

        let weak = Rc::downgrade(&inner);
        let reopen = bus.subscribe(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().reopen();
            }
        });

        tracing::debug!(?load_outcome, "consent manager mounted");

        Self {
            store,
            key: options.key,
            inner,
            load_outcome,
            _reopen: reopen,
        }
    }

    /// Advance the clock. Returns true if the banner became visible.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.show_at {
            Some(deadline) if now >= deadline => {
                inner.show_at = None;
                inner.state.banner_visible = true;
                tracing::debug!("consent banner shown");
                true
            }
            _ => false,
        }
    }

    pub fn state(&self) -> ConsentState {
        self.inner.borrow().state
    }

    /// Last committed (or loaded) preferences
    pub fn preferences(&self) -> ConsentPreferences {
        self.inner.borrow().committed
    }

    /// Editable copy shown in the settings view
    pub fn draft(&self) -> ConsentPreferences {
        self.inner.borrow().draft
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
    }

    /// True while the first-visit display delay is still running
    pub fn is_display_pending(&self) -> bool {
        self.inner.borrow().show_at.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn open_settings(&mut self) {
        let mut inner = self.inner.borrow_mut();
        if inner.state.banner_visible {
            inner.state.settings_expanded = true;
        }
    }

    /// Back to the simple banner. The draft is kept.
    pub fn close_settings(&mut self) {
        self.inner.borrow_mut().state.settings_expanded = false;
    }

    /// Flip one category in the draft. Returns false if nothing changed.
    pub fn toggle(&mut self, category: Category) -> bool {
        let mut inner = self.inner.borrow_mut();
        if !inner.state.banner_visible {
            return false;
        }
        inner.draft.toggle(category)
    }

    pub fn accept_all(&mut self) -> Result<ConsentPreferences, StoreError> {
        self.commit(ConsentPreferences::all())
    }

    pub fn reject_all(&mut self) -> Result<ConsentPreferences, StoreError> {
        self.commit(ConsentPreferences::essential_only())
    }

    pub fn save_selection(&mut self) -> Result<ConsentPreferences, StoreError> {
        let draft = self.inner.borrow().draft;
        self.commit(draft)
    }

    /// Detach from the reopen signal and cancel the display delay
    pub fn unmount(self) -> S {
        self.store
    }

    fn commit(&mut self, prefs: ConsentPreferences) -> Result<ConsentPreferences, StoreError> {
        self.store.write(&self.key, &prefs.to_json())?;

        let mut inner = self.inner.borrow_mut();
        inner.committed = prefs;
        inner.draft = prefs;
        inner.show_at = None;
        inner.state = ConsentState::default();
        tracing::info!(
            functional = prefs.functional(),
            statistics = prefs.statistics(),
            marketing = prefs.marketing(),
            "consent decision saved"
        );
        Ok(prefs)
    }
}
