//! Error kinds raised by the localization core.

/// Errors produced by the catalog, localized strings and the registry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocalizationError {
    /// Variant count does not match the number of languages.
    #[error("expected {expected} language variants, got {actual}")]
    InvalidArgument { expected: usize, actual: usize },

    /// Language index outside `[0, count)`.
    #[error("language index {index} out of range (catalog has {count} languages)")]
    IndexOutOfRange { index: usize, count: usize },

    /// The language catalog is unusable.
    #[error("invalid language configuration: {0}")]
    Configuration(String),

    /// Storage was never reconciled against a catalog.
    #[error("localized string is not initialized; reconcile it against the catalog first")]
    Uninitialized,

    /// `set_language` was called while a broadcast was still running.
    #[error("language change requested while a broadcast is in progress")]
    Reentrant,

    /// The display target could not take the text right now.
    #[error("display target unavailable: {0}")]
    DisplayUnavailable(String),
}
