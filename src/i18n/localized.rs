//! Multi-language string value.
//!
//! A [`LocalizedString`] carries one text variant per catalog language. It starts
//! out `Uninitialized` (no storage) unless built from a catalog, and must be
//! reconciled whenever the catalog changes size.

use crate::i18n::{LanguageCatalog, LocalizationError, LocalizationMetrics};
use tracing::error;

/// Text returned for a read that has no translation behind it.
///
/// Callers must treat it as "translation unavailable", never as content.
pub const UNAVAILABLE: &str = "error";

/// Text given to slots created by [`LocalizedString::reconcile`].
pub fn placeholder(language_name: &str) -> String {
    format!("String in '{}'", language_name)
}

/// Lifecycle of a [`LocalizedString`]'s storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringState {
    /// No storage yet; `set` fails until the value is reconciled.
    Uninitialized,
    /// One slot per catalog language.
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    /// Display label of the slot's language (metadata only)
    language_name: String,
    /// `None` until a variant is stored
    text: Option<String>,
}

impl Slot {
    fn absent(language_name: &str) -> Self {
        Self {
            language_name: language_name.to_string(),
            text: None,
        }
    }
}

/// A string with one variant per language index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalizedString {
    /// `None` while uninitialized. A slot without text has not been filled yet.
    slots: Option<Vec<Slot>>,
}

impl LocalizedString {
    /// Create an uninitialized value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a value holding every language's variant, in catalog order.
    ///
    /// # Returns
    /// * `Err(LocalizationError::InvalidArgument)` if the number of variants
    ///   differs from the number of catalog languages
    pub fn from_variants<I, S>(
        catalog: &LanguageCatalog,
        variants: I,
    ) -> Result<Self, LocalizationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let texts: Vec<String> = variants.into_iter().map(Into::into).collect();
        let expected = catalog.amount_of_languages();
        if texts.len() != expected {
            return Err(LocalizationError::InvalidArgument {
                expected,
                actual: texts.len(),
            });
        }

        let slots = catalog
            .language_options()
            .iter()
            .zip(texts)
            .map(|(name, text)| Slot {
                language_name: name.clone(),
                text: Some(text),
            })
            .collect();

        Ok(Self { slots: Some(slots) })
    }

    /// Create a value with only the variant at `index` set.
    ///
    /// The other slots stay absent until the value is reconciled. Mostly useful
    /// as the right-hand side of [`LocalizedString::concat`] to append to one
    /// language.
    pub fn single(
        catalog: &LanguageCatalog,
        index: usize,
        text: impl Into<String>,
    ) -> Result<Self, LocalizationError> {
        let count = catalog.amount_of_languages();
        if !catalog.contains_index(index) {
            return Err(LocalizationError::IndexOutOfRange { index, count });
        }

        let mut slots: Vec<Slot> = catalog
            .language_options()
            .iter()
            .map(|name| Slot::absent(name))
            .collect();
        slots[index].text = Some(text.into());

        Ok(Self { slots: Some(slots) })
    }

    pub fn state(&self) -> StringState {
        match self.slots {
            Some(_) => StringState::Ready,
            None => StringState::Uninitialized,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == StringState::Ready
    }

    /// Number of language slots (0 while uninitialized).
    pub fn count(&self) -> usize {
        self.slots.as_ref().map_or(0, Vec::len)
    }

    /// Variant at `index`, or the [`UNAVAILABLE`] sentinel.
    ///
    /// A sentinel read is logged and counted in the global metrics.
    pub fn get(&self, index: usize) -> &str {
        match self.try_get(index) {
            Ok(text) => text,
            Err(e) => {
                error!(index, error = %e, "Translation unavailable");
                LocalizationMetrics::global().record_unavailable_read();
                UNAVAILABLE
            }
        }
    }

    /// Variant at `index`, failing instead of falling back to the sentinel.
    pub fn try_get(&self, index: usize) -> Result<&str, LocalizationError> {
        let slots = self.slots.as_ref().ok_or(LocalizationError::Uninitialized)?;
        match slots.get(index) {
            Some(Slot {
                text: Some(text), ..
            }) => Ok(text),
            Some(_) => Err(LocalizationError::Uninitialized),
            None => Err(LocalizationError::IndexOutOfRange {
                index,
                count: slots.len(),
            }),
        }
    }

    /// Variant at `index` if it is present, without logging.
    pub fn variant(&self, index: usize) -> Option<&str> {
        self.slots
            .as_ref()
            .and_then(|slots| slots.get(index))
            .and_then(|slot| slot.text.as_deref())
    }

    /// Length in characters of what [`LocalizedString::get`] returns.
    pub fn char_len(&self, index: usize) -> usize {
        self.get(index).chars().count()
    }

    /// Language label attached to the slot at `index`, filled or not.
    pub fn language_name(&self, index: usize) -> Option<&str> {
        self.slots
            .as_ref()
            .and_then(|slots| slots.get(index))
            .map(|slot| slot.language_name.as_str())
    }

    /// Overwrite the variant at `index`. The slot keeps its language label.
    ///
    /// # Returns
    /// * `Err(LocalizationError::Uninitialized)` if the value was never reconciled
    /// * `Err(LocalizationError::IndexOutOfRange)` if `index` is not a slot
    pub fn set(&mut self, index: usize, text: impl Into<String>) -> Result<(), LocalizationError> {
        let slots = self.slots.as_mut().ok_or(LocalizationError::Uninitialized)?;
        let count = slots.len();
        let slot = slots
            .get_mut(index)
            .ok_or(LocalizationError::IndexOutOfRange { index, count })?;

        slot.text = Some(text.into());
        Ok(())
    }

    /// Resize to the catalog's language count.
    ///
    /// Existing variants keep their index and text. Absent or new slots get
    /// [`placeholder`] text. Every slot's language label is refreshed.
    pub fn reconcile(&mut self, catalog: &LanguageCatalog) {
        let slots = self.slots.get_or_insert_with(Vec::new);
        slots.truncate(catalog.amount_of_languages());

        for (index, name) in catalog.language_options().iter().enumerate() {
            match slots.get_mut(index) {
                Some(slot) => slot.language_name.clone_from(name),
                None => slots.push(Slot::absent(name)),
            }
            let slot = &mut slots[index];
            if slot.text.is_none() {
                slot.text = Some(placeholder(name));
            }
        }
    }

    /// Per-language concatenation of `self` followed by `other`.
    ///
    /// Neither operand is modified. An absent slot contributes nothing; a slot
    /// absent on both sides stays absent.
    ///
    /// # Returns
    /// * `Err(LocalizationError::InvalidArgument)` if the slot counts differ
    pub fn concat(&self, other: &LocalizedString) -> Result<LocalizedString, LocalizationError> {
        if self.count() != other.count() {
            return Err(LocalizationError::InvalidArgument {
                expected: self.count(),
                actual: other.count(),
            });
        }

        let (Some(left), Some(right)) = (&self.slots, &other.slots) else {
            return Ok(LocalizedString::new());
        };

        let slots = left
            .iter()
            .zip(right)
            .map(|(a, b)| Slot {
                language_name: a.language_name.clone(),
                text: match (&a.text, &b.text) {
                    (Some(a), Some(b)) => Some(format!("{}{}", a, b)),
                    (Some(only), None) | (None, Some(only)) => Some(only.clone()),
                    (None, None) => None,
                },
            })
            .collect();

        Ok(LocalizedString { slots: Some(slots) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> LanguageCatalog {
        LanguageCatalog::default()
    }

    fn hello() -> LocalizedString {
        LocalizedString::from_variants(&catalog(), ["Hello", "Ciao"]).unwrap()
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_from_variants_sets_all() {
        let text = hello();
        assert_eq!(text.state(), StringState::Ready);
        assert_eq!(text.count(), 2);
        assert_eq!(text.get(0), "Hello");
        assert_eq!(text.get(1), "Ciao");
        assert_eq!(text.language_name(1), Some("Italian"));
    }

    #[test]
    fn test_from_variants_length_mismatch() {
        let result = LocalizedString::from_variants(&catalog(), ["Hello"]);
        assert_eq!(
            result.unwrap_err(),
            LocalizationError::InvalidArgument {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_from_variants_accepts_empty_text() {
        let text = LocalizedString::from_variants(&catalog(), ["", "Ciao"]).unwrap();
        assert_eq!(text.try_get(0), Ok(""));
    }

    #[test]
    fn test_single_leaves_other_slots_absent() {
        let text = LocalizedString::single(&catalog(), 1, "!").unwrap();
        assert_eq!(text.count(), 2);
        assert_eq!(text.variant(0), None);
        assert_eq!(text.variant(1), Some("!"));
    }

    #[test]
    fn test_single_out_of_range() {
        let result = LocalizedString::single(&catalog(), 2, "!");
        assert_eq!(
            result.unwrap_err(),
            LocalizationError::IndexOutOfRange { index: 2, count: 2 }
        );
    }

    #[test]
    fn test_new_is_uninitialized() {
        let text = LocalizedString::new();
        assert_eq!(text.state(), StringState::Uninitialized);
        assert!(!text.is_ready());
        assert_eq!(text.count(), 0);
    }

    // ==================== Get Tests ====================

    #[test]
    fn test_get_out_of_range_returns_sentinel() {
        assert_eq!(hello().get(5), UNAVAILABLE);
    }

    #[test]
    fn test_get_absent_slot_returns_sentinel() {
        let text = LocalizedString::single(&catalog(), 1, "!").unwrap();
        assert_eq!(text.get(0), UNAVAILABLE);
    }

    #[test]
    fn test_get_uninitialized_returns_sentinel() {
        assert_eq!(LocalizedString::new().get(0), UNAVAILABLE);
    }

    #[test]
    fn test_try_get_errors() {
        assert_eq!(
            hello().try_get(2),
            Err(LocalizationError::IndexOutOfRange { index: 2, count: 2 })
        );
        assert_eq!(
            LocalizedString::new().try_get(0),
            Err(LocalizationError::Uninitialized)
        );
    }

    #[test]
    fn test_char_len() {
        let text = LocalizedString::from_variants(&catalog(), ["Hello", "Però"]).unwrap();
        assert_eq!(text.char_len(0), 5);
        assert_eq!(text.char_len(1), 4);
        assert_eq!(text.char_len(9), UNAVAILABLE.len());
    }

    // ==================== Set Tests ====================

    #[test]
    fn test_set_overwrites() {
        let mut text = hello();
        text.set(1, "Salve").unwrap();
        assert_eq!(text.get(1), "Salve");
        assert_eq!(text.get(0), "Hello");
    }

    #[test]
    fn test_set_uninitialized_fails() {
        let mut text = LocalizedString::new();
        assert_eq!(text.set(0, "Hello"), Err(LocalizationError::Uninitialized));
        assert_eq!(text.state(), StringState::Uninitialized);
    }

    #[test]
    fn test_set_out_of_range_fails() {
        let mut text = hello();
        assert_eq!(
            text.set(3, "x"),
            Err(LocalizationError::IndexOutOfRange { index: 3, count: 2 })
        );
        assert_eq!(text, hello());
    }

    #[test]
    fn test_set_fills_absent_slot() {
        let mut text = LocalizedString::single(&catalog(), 1, "Ciao").unwrap();
        text.set(0, "Hello").unwrap();
        assert_eq!(text.get(0), "Hello");
    }

    #[test]
    fn test_set_absent_slot_keeps_language_label() {
        let mut text = LocalizedString::single(&catalog(), 1, "Ciao").unwrap();
        assert_eq!(text.language_name(0), Some("English"));

        text.set(0, "Hello").unwrap();

        assert_eq!(text.language_name(0), Some("English"));
        let report = crate::i18n::TranslationValidator::validate(&text, &catalog());
        assert!(report.is_clean());
    }

    // ==================== Reconcile Tests ====================

    #[test]
    fn test_reconcile_uninitialized_fills_placeholders() {
        let mut text = LocalizedString::new();
        text.reconcile(&catalog());

        assert!(text.is_ready());
        assert_eq!(text.get(0), "String in 'English'");
        assert_eq!(text.get(1), "String in 'Italian'");
    }

    #[test]
    fn test_reconcile_grow_preserves_existing() {
        let mut text = hello();
        let bigger = LanguageCatalog::new(["English", "Italian", "French"]).unwrap();
        text.reconcile(&bigger);

        assert_eq!(text.count(), 3);
        assert_eq!(text.get(0), "Hello");
        assert_eq!(text.get(1), "Ciao");
        assert_eq!(text.get(2), "String in 'French'");
    }

    #[test]
    fn test_reconcile_shrink_truncates() {
        let mut text = hello();
        let smaller = LanguageCatalog::new(["English"]).unwrap();
        text.reconcile(&smaller);

        assert_eq!(text.count(), 1);
        assert_eq!(text.get(0), "Hello");
        assert_eq!(text.get(1), UNAVAILABLE);
    }

    #[test]
    fn test_reconcile_refreshes_labels_only() {
        let mut text = hello();
        let renamed = LanguageCatalog::new(["British English", "Italiano"]).unwrap();
        text.reconcile(&renamed);

        assert_eq!(text.language_name(0), Some("British English"));
        assert_eq!(text.language_name(1), Some("Italiano"));
        assert_eq!(text.get(1), "Ciao");
    }

    #[test]
    fn test_reconcile_fills_absent_slots() {
        let mut text = LocalizedString::single(&catalog(), 0, "Hello").unwrap();
        text.reconcile(&catalog());
        assert_eq!(text.get(1), "String in 'Italian'");
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut once = LocalizedString::single(&catalog(), 0, "Hello").unwrap();
        once.reconcile(&catalog());
        let mut twice = once.clone();
        twice.reconcile(&catalog());
        assert_eq!(once, twice);
    }

    // ==================== Concat Tests ====================

    #[test]
    fn test_concat_per_index() {
        let bang = LocalizedString::from_variants(&catalog(), ["!", "!"]).unwrap();
        let joined = hello().concat(&bang).unwrap();

        assert_eq!(joined.get(0), "Hello!");
        assert_eq!(joined.get(1), "Ciao!");
    }

    #[test]
    fn test_concat_does_not_mutate_operands() {
        let left = hello();
        let right = LocalizedString::from_variants(&catalog(), ["!", "?"]).unwrap();
        let _ = left.concat(&right).unwrap();

        assert_eq!(left, hello());
        assert_eq!(right.get(1), "?");
    }

    #[test]
    fn test_concat_single_index() {
        let suffix = LocalizedString::single(&catalog(), 1, " a tutti").unwrap();
        let joined = hello().concat(&suffix).unwrap();

        assert_eq!(joined.get(0), "Hello");
        assert_eq!(joined.get(1), "Ciao a tutti");
    }

    #[test]
    fn test_concat_count_mismatch_fails() {
        let three = LanguageCatalog::new(["English", "Italian", "French"]).unwrap();
        let other = LocalizedString::from_variants(&three, ["a", "b", "c"]).unwrap();

        assert_eq!(
            hello().concat(&other).unwrap_err(),
            LocalizationError::InvalidArgument {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_concat_uninitialized_with_ready_fails() {
        assert!(LocalizedString::new().concat(&hello()).is_err());
    }

    #[test]
    fn test_concat_both_uninitialized() {
        let joined = LocalizedString::new()
            .concat(&LocalizedString::new())
            .unwrap();
        assert!(!joined.is_ready());
    }

    #[test]
    fn test_placeholder_format() {
        assert_eq!(placeholder("Italian"), "String in 'Italian'");
    }
}
