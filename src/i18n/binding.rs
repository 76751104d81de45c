//! Text bindings: displayed text that follows the current language.
//!
//! A [`TextBinding`] owns a [`LocalizedString`], shares a [`TextTarget`] with the
//! UI, and registers with the [`LanguageRegistry`] when created. Every broadcast
//! pushes the string for the new language to the target.

use crate::i18n::{
    LanguageCatalog, LanguageChangeListener, LanguageRegistry, LocalizationError,
    LocalizedString, TranslationValidator, ValidationReport,
};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// Something that can display a line of text.
pub trait TextTarget {
    /// Show `text`.
    ///
    /// Return [`LocalizationError::DisplayUnavailable`] if the target cannot take
    /// text right now; the next update will try again.
    fn set_text(&self, text: &str) -> Result<(), LocalizationError>;
}

/// In-memory text target.
#[derive(Debug, Default)]
pub struct Label {
    text: RefCell<String>,
    updates: Cell<usize>,
}

impl Label {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last text pushed to this label.
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// How many times text was pushed.
    pub fn update_count(&self) -> usize {
        self.updates.get()
    }
}

impl TextTarget for Label {
    fn set_text(&self, text: &str) -> Result<(), LocalizationError> {
        *self.text.borrow_mut() = text.to_string();
        self.updates.set(self.updates.get() + 1);
        Ok(())
    }
}

/// A registered subscriber that keeps one display target in the current language.
pub struct TextBinding {
    text: RefCell<LocalizedString>,
    target: Rc<dyn TextTarget>,
    registry: Rc<LanguageRegistry>,
}

impl TextBinding {
    /// Bind `text` to `target`, register with `registry` and show the current
    /// language right away.
    pub fn create(
        registry: &Rc<LanguageRegistry>,
        target: Rc<dyn TextTarget>,
        text: LocalizedString,
    ) -> Rc<Self> {
        let binding = Rc::new(Self {
            text: RefCell::new(text),
            target,
            registry: Rc::clone(registry),
        });

        registry.register(&binding);
        if let Err(e) = binding.update(registry.current_language()) {
            warn!("New text binding could not display its text yet: {}", e);
        }
        binding
    }

    /// Push the variant for `index` to the target.
    ///
    /// An unavailable translation is shown as the sentinel text.
    pub fn update(&self, index: usize) -> Result<(), LocalizationError> {
        let resolved = self.text.borrow().get(index).to_string();
        self.target.set_text(&resolved)
    }

    /// Swap the owned string and show it in the current language.
    pub fn replace(&self, new_value: LocalizedString) -> Result<(), LocalizationError> {
        *self.text.borrow_mut() = new_value;
        self.update(self.registry.current_language())
    }

    /// Replace with one variant per catalog language.
    pub fn replace_variants<I, S>(&self, variants: I) -> Result<(), LocalizationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let value = LocalizedString::from_variants(&self.registry.catalog(), variants)?;
        self.replace(value)
    }

    /// Append `to_add` to every language's text.
    pub fn append(&self, to_add: &LocalizedString) -> Result<(), LocalizationError> {
        let joined = self.text.borrow().concat(to_add)?;
        self.replace(joined)
    }

    /// Append `text` to the variant at `index` only.
    pub fn append_at(&self, index: usize, text: impl Into<String>) -> Result<(), LocalizationError> {
        let suffix = LocalizedString::single(&self.registry.catalog(), index, text)?;
        self.append(&suffix)
    }

    /// Text for `index`, without touching the display.
    pub fn text(&self, index: usize) -> String {
        self.text.borrow().get(index).to_string()
    }

    /// Text for the registry's current language.
    pub fn current_text(&self) -> String {
        self.text(self.registry.current_language())
    }

    /// Copy of the owned string.
    pub fn localized(&self) -> LocalizedString {
        self.text.borrow().clone()
    }

    /// Reconcile the owned string against the catalog and check it.
    ///
    /// Does nothing and returns `None` until the registry finished initialization.
    pub fn validate(&self) -> Option<ValidationReport> {
        if !self.registry.initialization_complete() {
            debug!("Skipping validation, localization not initialized yet");
            return None;
        }

        let catalog = self.registry.catalog();
        self.text.borrow_mut().reconcile(&catalog);
        let report = TranslationValidator::validate(&self.text.borrow(), &catalog);
        for warning in &report.warnings {
            warn!("{}", warning);
        }
        Some(report)
    }

    /// Stop receiving language changes.
    pub fn detach(&self) -> bool {
        self.registry.unregister(self)
    }
}

impl LanguageChangeListener for TextBinding {
    fn on_language_changed(&self, index: usize) -> Result<(), LocalizationError> {
        self.update(index)
    }

    fn on_catalog_changed(&self, catalog: &LanguageCatalog) {
        self.text.borrow_mut().reconcile(catalog);
    }
}

impl Drop for TextBinding {
    fn drop(&mut self) {
        self.registry.unregister(self);
    }
}

impl fmt::Debug for TextBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBinding")
            .field("text", &self.text.borrow())
            .finish_non_exhaustive()
    }
}
