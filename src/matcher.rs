//! Prefix matching of a typed buffer against a word's accepted spellings.
//!
//! A word such as "し" may be typed as `shi`, `si` or `ci`. While the user
//! types, every spelling the buffer is still a prefix of stays a candidate.
//! The first remaining candidate in declaration order is the *active variant*
//! and drives the guide text, so typing `si` switches the guide from `shi`
//! to `si`.

use itertools::Itertools;

/// Result of checking a buffer against the accepted spellings.
///
/// Variants carry indices into the `accepts` slice they were computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// Buffer is a prefix of at least one spelling; `variant` is the first
    /// such spelling in declaration order.
    Advance { variant: usize },
    /// Buffer equals `accepts[variant]` exactly.
    Complete { variant: usize },
    /// Buffer is a prefix of no spelling.
    Reject,
}

impl Match {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Match::Reject)
    }
}

/// The subset of `accepts` still consistent with the committed buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSet {
    candidates: Vec<usize>,
}

impl VariantSet {
    /// All `len` spellings are candidates. `len` must be at least one.
    pub fn new(len: usize) -> Self {
        Self {
            candidates: (0..len).collect(),
        }
    }

    /// Index of the active variant: the first remaining candidate.
    pub fn active(&self) -> usize {
        self.candidates.first().copied().unwrap_or(0)
    }

    pub fn candidates(&self) -> &[usize] {
        &self.candidates
    }

    /// Classifies `buffer`, the edit that follows `committed`.
    ///
    /// Growth only filters the current candidates; any other edit (a
    /// deletion or a replaced character) starts again from the full list.
    /// On [`Match::Reject`] the set is left untouched.
    pub fn narrow<S: AsRef<str>>(&mut self, accepts: &[S], committed: &str, buffer: &str) -> Match {
        let consistent: Vec<usize> = if buffer.starts_with(committed) {
            self.candidates
                .iter()
                .copied()
                .filter(|&i| accepts[i].as_ref().starts_with(buffer))
                .collect()
        } else {
            accepts
                .iter()
                .positions(|a| a.as_ref().starts_with(buffer))
                .collect()
        };

        let Some(&first) = consistent.first() else {
            return Match::Reject;
        };

        let exact = consistent
            .iter()
            .copied()
            .find(|&i| accepts[i].as_ref() == buffer);

        self.candidates = consistent;

        match exact {
            Some(variant) => Match::Complete { variant },
            None => Match::Advance { variant: first },
        }
    }
}

/// Stateless classification of `buffer` against the full `accepts` list.
pub fn classify<S: AsRef<str>>(accepts: &[S], buffer: &str) -> Match {
    VariantSet::new(accepts.len()).narrow(accepts, "", buffer)
}
