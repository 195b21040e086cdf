//! Vocabulary provider port for status and priority options.

use crate::task::domain::VocabularyOption;

/// Ordered `(value, label)` vocabularies for status and priority.
///
/// Clients render these as choice lists. The mutation pipeline does
/// not hard-validate values against them — the vocabulary is open —
/// beyond the completion-privilege rule on the reserved `done` value.
pub trait VocabularyProvider: Send + Sync {
    /// Returns the status options in display order.
    fn status_options(&self) -> Vec<VocabularyOption>;

    /// Returns the priority options in display order.
    fn priority_options(&self) -> Vec<VocabularyOption>;
}
