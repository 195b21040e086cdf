//! Static vocabulary adapter with the stock status and priority sets.

use crate::task::domain::VocabularyOption;
use crate::task::ports::VocabularyProvider;

/// Vocabulary provider serving the built-in option sets:
/// `todo`/`in_progress`/`done` and `low`/`medium`/`high`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticVocabulary;

impl StaticVocabulary {
    /// Creates the static vocabulary.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl VocabularyProvider for StaticVocabulary {
    fn status_options(&self) -> Vec<VocabularyOption> {
        vec![
            VocabularyOption::new("todo", "To do", 1),
            VocabularyOption::new("in_progress", "In progress", 2),
            VocabularyOption::new("done", "Done", 3),
        ]
    }

    fn priority_options(&self) -> Vec<VocabularyOption> {
        vec![
            VocabularyOption::new("low", "Low", 1),
            VocabularyOption::new("medium", "Medium", 2),
            VocabularyOption::new("high", "High", 3),
        ]
    }
}
