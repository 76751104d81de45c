//! Translation completeness validation module.
//!
//! This module checks a [`LocalizedString`] against the language catalog and
//! reports slots that would not display a real translation: missing slots,
//! untouched reconcile placeholders, empty text, and stale language labels.

use crate::i18n::{LanguageCatalog, LocalizedString};
use regex::Regex;
use std::sync::OnceLock;

/// Findings for one localized string, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// Slots that cannot be displayed until the string is reconciled
    pub errors: Vec<String>,

    /// Slots that display something, but probably not what was intended
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Some slot would read as the sentinel.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Some slot shows a placeholder, empty text, or carries a stale label.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Every language has a real translation.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Validator for translation completeness.
pub struct TranslationValidator;

// Matches text produced by `placeholder()` (cached)
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl TranslationValidator {
    /// Validate a localized string against the catalog.
    ///
    /// Errors:
    /// - the value is uninitialized
    /// - the slot count differs from the catalog's language count
    /// - a slot is absent
    ///
    /// Warnings:
    /// - a slot still holds its reconcile placeholder
    /// - a slot holds empty text
    /// - a slot's language label differs from the catalog name
    pub fn validate(text: &LocalizedString, catalog: &LanguageCatalog) -> ValidationReport {
        let mut report = ValidationReport::new();

        if !text.is_ready() {
            report
                .errors
                .push("Localized string is not initialized".to_string());
            return report;
        }

        let expected = catalog.amount_of_languages();
        if text.count() != expected {
            report.errors.push(format!(
                "Language count mismatch: catalog has {}, string has {}",
                expected,
                text.count()
            ));
        }

        for (index, name) in catalog.language_options().iter().enumerate() {
            let Some(variant) = text.variant(index) else {
                if index < text.count() {
                    report
                        .errors
                        .push(format!("Missing translation for '{}' (index {})", name, index));
                }
                continue;
            };

            if Self::is_placeholder(variant) {
                report
                    .warnings
                    .push(format!("Untranslated placeholder for '{}': {:?}", name, variant));
            } else if variant.is_empty() {
                report
                    .warnings
                    .push(format!("Empty translation for '{}'", name));
            }

            if let Some(label) = text.language_name(index) {
                if label != name {
                    report.warnings.push(format!(
                        "Stale language label at index {}: '{}' (catalog has '{}')",
                        index, label, name
                    ));
                }
            }
        }

        report
    }

    /// Whether `text` is an untouched reconcile placeholder
    fn is_placeholder(text: &str) -> bool {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| {
            Regex::new(r"^String in '([^']+)'$").expect("placeholder pattern is valid")
        });

        regex.is_match(text)
    }
}
