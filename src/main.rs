use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use tracing::{info, warn};
use ui_localization::config::Config;
use ui_localization::i18n::{
    CatalogChangeListener, LanguageCatalog, LanguageRegistry, LocalizationError,
    LocalizationMetrics, LocalizedString, TextBinding, TextTarget,
};

/// Prints the language options whenever the catalog is published.
struct ConsoleDropdown;

impl CatalogChangeListener for ConsoleDropdown {
    fn on_catalog_changed(&self, catalog: &LanguageCatalog) {
        println!("Languages:");
        for (index, name) in catalog.language_options().iter().enumerate() {
            println!("  {} - {}", index, name);
        }
    }
}

/// Prints every text it is given, prefixed with its name.
struct ConsoleLabel {
    name: &'static str,
}

impl TextTarget for ConsoleLabel {
    fn set_text(&self, text: &str) -> Result<(), LocalizationError> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "[{}] {}", self.name, text)
            .map_err(|e| LocalizationError::DisplayUnavailable(e.to_string()))
    }
}

/// Build a string from (language name, text) pairs; languages the catalog
/// doesn't know are skipped, the rest keep their placeholder.
fn localized(catalog: &LanguageCatalog, variants: &[(&str, &str)]) -> Result<LocalizedString> {
    let mut text = LocalizedString::new();
    text.reconcile(catalog);
    for (language, variant) in variants {
        if let Some(index) = catalog.index_of(language) {
            text.set(index, *variant)?;
        }
    }
    Ok(text)
}

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ui_localization=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    info!("Starting localization demo");

    // Load configuration from environment
    let config = Config::from_env()?;
    let catalog = config.catalog()?;
    let registry = LanguageRegistry::new(catalog.clone());
    LanguageRegistry::install(Rc::clone(&registry));

    let dropdown = Rc::new(ConsoleDropdown);
    registry.subscribe_catalog(&dropdown);

    let title = TextBinding::create(
        &registry,
        Rc::new(ConsoleLabel { name: "title" }),
        localized(
            &catalog,
            &[("English", "Language settings"), ("Italian", "Impostazioni lingua")],
        )?,
    );
    let greeting = TextBinding::create(
        &registry,
        Rc::new(ConsoleLabel { name: "greeting" }),
        localized(&catalog, &[("English", "Hello"), ("Italian", "Ciao")])?,
    );

    registry.complete_initialization();
    for binding in [&title, &greeting] {
        if let Some(report) = binding.validate() {
            if !report.is_clean() {
                warn!(
                    "{} translation problems in {:?}",
                    report.errors.len() + report.warnings.len(),
                    binding.localized()
                );
            }
        }
    }

    // Restored preference
    if let Some(index) = config.initial_language_index(&catalog)? {
        registry.set_language(index)?;
    }

    println!("Enter a language index or name, '+text' to append to the greeting, 'q' to quit.");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let input = line.trim();

        match input {
            "" => continue,
            "q" | "quit" => break,
            _ => {}
        }

        if let Some(suffix) = input.strip_prefix('+') {
            if let Err(e) = greeting.append_at(registry.current_language(), suffix) {
                warn!("Could not append: {}", e);
            }
            continue;
        }

        let index = match input.parse::<i64>() {
            Ok(value) => usize::try_from(value).ok(),
            Err(_) => catalog.index_of(input),
        };
        match index {
            Some(index) => {
                // Rejections are already logged by the registry
                let _ = registry.set_language(index);
            }
            None => warn!("Unknown language selection: {}", input),
        }
    }

    let report = LocalizationMetrics::global().report();
    info!(
        "Localization metrics: {}",
        serde_json::to_string(&report).context("Failed to serialize metrics")?
    );
    Ok(())
}
