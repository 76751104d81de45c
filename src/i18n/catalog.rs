//! Language catalog: the ordered set of languages the application supports.
//!
//! The catalog is the single source of truth for how many languages exist and
//! what their display labels are. Index `i` of every localized string refers to
//! the language at position `i` of the catalog.

use crate::i18n::LocalizationError;
use serde::{Deserialize, Serialize};

/// Ordered list of language display names.
///
/// A catalog always contains at least one language. Construction fails fast
/// otherwise, so downstream code never has to deal with an empty catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageCatalog {
    languages: Vec<String>,
}

/// On-disk shape of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    languages: Vec<String>,
}

impl LanguageCatalog {
    /// Build a catalog from display names, in order.
    ///
    /// # Returns
    /// * `Ok(LanguageCatalog)` if there is at least one language and no name is blank
    /// * `Err(LocalizationError::Configuration)` otherwise
    pub fn new<I, S>(names: I) -> Result<Self, LocalizationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let languages: Vec<String> = names
            .into_iter()
            .map(|name| name.into().trim().to_string())
            .collect();

        if languages.is_empty() {
            return Err(LocalizationError::Configuration(
                "the catalog must contain at least one language".to_string(),
            ));
        }
        if let Some(position) = languages.iter().position(|name| name.is_empty()) {
            return Err(LocalizationError::Configuration(format!(
                "language at index {} has an empty name",
                position
            )));
        }

        Ok(Self { languages })
    }

    /// Parse a catalog from JSON of the form `{"languages": ["English", "Italian"]}`.
    pub fn from_json(json: &str) -> Result<Self, LocalizationError> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| LocalizationError::Configuration(format!("bad catalog file: {}", e)))?;
        Self::new(file.languages)
    }

    /// Display labels of all languages, in catalog order.
    pub fn language_options(&self) -> &[String] {
        &self.languages
    }

    /// Number of languages in the catalog (always at least 1).
    pub fn amount_of_languages(&self) -> usize {
        self.languages.len()
    }

    /// Display label of the language at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.languages.get(index).map(String::as_str)
    }

    pub fn contains_index(&self, index: usize) -> bool {
        index < self.languages.len()
    }

    /// Find a language by display name, ignoring case.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.languages
            .iter()
            .position(|lang| lang.eq_ignore_ascii_case(name))
    }
}

impl Default for LanguageCatalog {
    /// English and Italian.
    fn default() -> Self {
        Self {
            languages: vec!["English".to_string(), "Italian".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Construction Tests ====================

    #[test]
    fn test_new_keeps_order() {
        let catalog = LanguageCatalog::new(["English", "Italian", "French"]).unwrap();
        assert_eq!(
            catalog.language_options(),
            &["English".to_string(), "Italian".to_string(), "French".to_string()]
        );
        assert_eq!(catalog.amount_of_languages(), 3);
    }

    #[test]
    fn test_new_empty_is_configuration_error() {
        let result = LanguageCatalog::new(Vec::<String>::new());
        assert!(matches!(result, Err(LocalizationError::Configuration(_))));
    }

    #[test]
    fn test_new_blank_name_is_configuration_error() {
        let result = LanguageCatalog::new(["English", "  "]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_new_trims_names() {
        let catalog = LanguageCatalog::new([" English ", "Italian\n"]).unwrap();
        assert_eq!(catalog.name(0), Some("English"));
        assert_eq!(catalog.name(1), Some("Italian"));
    }

    #[test]
    fn test_default_is_english_and_italian() {
        let catalog = LanguageCatalog::default();
        assert_eq!(catalog.amount_of_languages(), 2);
        assert_eq!(catalog.name(0), Some("English"));
        assert_eq!(catalog.name(1), Some("Italian"));
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_name_out_of_range() {
        let catalog = LanguageCatalog::default();
        assert_eq!(catalog.name(2), None);
    }

    #[test]
    fn test_contains_index() {
        let catalog = LanguageCatalog::default();
        assert!(catalog.contains_index(0));
        assert!(catalog.contains_index(1));
        assert!(!catalog.contains_index(2));
    }

    #[test]
    fn test_index_of_ignores_case() {
        let catalog = LanguageCatalog::default();
        assert_eq!(catalog.index_of("italian"), Some(1));
        assert_eq!(catalog.index_of(" ENGLISH "), Some(0));
        assert_eq!(catalog.index_of("German"), None);
    }

    // ==================== JSON Tests ====================

    #[test]
    fn test_from_json() {
        let catalog =
            LanguageCatalog::from_json(r#"{"languages": ["English", "Español"]}"#).unwrap();
        assert_eq!(catalog.name(1), Some("Español"));
    }

    #[test]
    fn test_from_json_empty_list() {
        let result = LanguageCatalog::from_json(r#"{"languages": []}"#);
        assert!(matches!(result, Err(LocalizationError::Configuration(_))));
    }

    #[test]
    fn test_from_json_malformed() {
        let result = LanguageCatalog::from_json("not json");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("bad catalog file"));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&LanguageCatalog::default()).expect("Should serialize");
        assert_eq!(json, r#"{"languages":["English","Italian"]}"#);
    }
}
