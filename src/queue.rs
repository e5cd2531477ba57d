use rand::seq::SliceRandom;

use crate::word::WordItem;

/// Cyclic cursor over a non-empty word list.
#[derive(Debug, Clone)]
pub struct WordQueue {
    words: Vec<WordItem>,
    index: usize,
}

impl WordQueue {
    /// Returns `None` for an empty list.
    pub fn new(words: Vec<WordItem>) -> Option<Self> {
        if words.is_empty() {
            None
        } else {
            Some(Self { words, index: 0 })
        }
    }

    pub fn shuffle(&mut self) {
        self.words.shuffle(&mut rand::thread_rng());
        self.index = 0;
    }

    pub fn current(&self) -> &WordItem {
        &self.words[self.index]
    }

    /// Moves to the next word, wrapping around at the end of the list.
    pub fn advance(&mut self) -> &WordItem {
        self.index = (self.index + 1) % self.words.len();
        self.current()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[WordItem] {
        &self.words
    }
}
