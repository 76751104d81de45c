use crate::i18n::LanguageCatalog;
use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, Default)]
pub struct Config {
    // Catalog
    pub languages: Option<Vec<String>>,
    pub catalog_file: Option<String>,

    // Restored selection (index or language name)
    pub initial_language: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Catalog - comma separated display names, or a JSON file
            languages: std::env::var("LANGUAGES").ok().map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect()
            }),
            catalog_file: std::env::var("LANGUAGE_CATALOG_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            // Persisted preference, supplied by the host's settings store
            initial_language: std::env::var("INITIAL_LANGUAGE")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        })
    }

    /// Build the language catalog.
    ///
    /// `LANGUAGE_CATALOG_FILE` wins over `LANGUAGES`; with neither set the
    /// default catalog (English, Italian) is used. An empty list is an error.
    pub fn catalog(&self) -> Result<LanguageCatalog> {
        if let Some(path) = &self.catalog_file {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read language catalog file {}", path))?;
            return LanguageCatalog::from_json(&json)
                .with_context(|| format!("Invalid language catalog file {}", path));
        }

        match &self.languages {
            Some(names) => LanguageCatalog::new(names.iter().cloned()).context("LANGUAGES is invalid"),
            None => Ok(LanguageCatalog::default()),
        }
    }

    /// Resolve the restored language against `catalog`.
    ///
    /// Accepts either an index (`"1"`) or a display name (`"Italian"`).
    pub fn initial_language_index(&self, catalog: &LanguageCatalog) -> Result<Option<usize>> {
        let Some(value) = self.initial_language.as_deref().map(str::trim) else {
            return Ok(None);
        };

        if let Ok(index) = value.parse::<usize>() {
            if !catalog.contains_index(index) {
                bail!(
                    "INITIAL_LANGUAGE index {} is out of range (catalog has {} languages)",
                    index,
                    catalog.amount_of_languages()
                );
            }
            return Ok(Some(index));
        }

        match catalog.index_of(value) {
            Some(index) => Ok(Some(index)),
            None => bail!("INITIAL_LANGUAGE '{}' is not in the catalog", value),
        }
    }
}
