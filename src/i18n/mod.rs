//! Internationalization (i18n) module for runtime language switching.
//!
//! This module holds the language catalog, the multi-language string value,
//! and the registry that propagates language changes to bound UI text.
//!
//! # Architecture
//!
//! - `catalog`: Ordered list of supported languages (single source of truth for count and labels)
//! - `localized`: `LocalizedString`, one text variant per language index
//! - `registry`: Current language selection and the subscriber broadcast
//! - `binding`: `TextBinding`, a subscriber that keeps one display target up to date
//! - `validator`: Completeness checks for localized strings
//! - `metrics`: Propagation counters and reports
//!
//! # Example
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use ui_localization::i18n::{Label, LanguageCatalog, LanguageRegistry, LocalizedString, TextBinding};
//!
//! let registry = LanguageRegistry::new(LanguageCatalog::default());
//! let label = Rc::new(Label::new());
//! let greeting = LocalizedString::from_variants(&registry.catalog(), ["Hello", "Ciao"])?;
//! let _binding = TextBinding::create(&registry, label.clone(), greeting);
//!
//! registry.set_language(1)?;
//! assert_eq!(label.text(), "Ciao");
//! ```

mod binding;
mod catalog;
mod error;
mod localized;
mod metrics;
mod registry;
mod validator;

pub use binding::{Label, TextBinding, TextTarget};
pub use catalog::LanguageCatalog;
pub use error::LocalizationError;
pub use localized::{placeholder, LocalizedString, StringState, UNAVAILABLE};
pub use metrics::{LocalizationMetrics, MetricsReport};
pub use registry::{
    BroadcastReport, CatalogChangeListener, LanguageChangeListener, LanguageRegistry,
};
pub use validator::{TranslationValidator, ValidationReport};
