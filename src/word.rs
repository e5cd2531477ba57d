use include_dir::{include_dir, Dir};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

static WORDS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/words");

/// A single entry to be typed.
///
/// `accepts` lists every full spelling that counts as correct, in priority
/// order. The first entry is the guide shown before anything is typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordItem {
    #[serde(default)]
    pub id: String,
    pub display: String,
    pub romaji: String,
    pub accepts: Vec<String>,
}

impl WordItem {
    pub fn new<S: Into<String>>(display: S, romaji: S, accepts: Vec<S>) -> Self {
        Self {
            id: String::new(),
            display: display.into(),
            romaji: romaji.into(),
            accepts: accepts.into_iter().map(Into::into).collect(),
        }
    }

    /// Lowercases spellings and drops repeated ones, keeping the first occurrence.
    pub fn normalized(mut self) -> Self {
        self.romaji = self.romaji.to_lowercase();
        self.accepts = self
            .accepts
            .into_iter()
            .map(|a| a.to_lowercase())
            .filter(|a| !a.is_empty())
            .unique()
            .collect();
        self
    }
}

#[derive(Debug, Error)]
pub enum WordListError {
    #[error("unable to read word list: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed word list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("word list is empty")]
    Empty,
    #[error("word {index} ({display:?}) has no accepted spellings")]
    NoSpellings { index: usize, display: String },
    #[error("built-in word list {0:?} not found")]
    UnknownBuiltin(String),
}

/// Parses a provider-generated JSON array into a validated word list.
pub fn parse_word_list(json: &str) -> Result<Vec<WordItem>, WordListError> {
    let raw: Vec<WordItem> = serde_json::from_str(json)?;
    if raw.is_empty() {
        return Err(WordListError::Empty);
    }

    raw.into_iter()
        .enumerate()
        .map(|(index, item)| {
            let mut item = item.normalized();
            if item.accepts.is_empty() {
                log::warn!("word {index} ({:?}) has no usable spellings", item.display);
                return Err(WordListError::NoSpellings {
                    index,
                    display: item.display,
                });
            }
            if item.id.is_empty() {
                item.id = format!("w{index}");
            }
            if !item.accepts.contains(&item.romaji) {
                log::warn!(
                    "romaji {:?} of {:?} is not an accepted spelling",
                    item.romaji,
                    item.display
                );
            }
            Ok(item)
        })
        .collect()
}

pub fn load_word_list<P: AsRef<Path>>(path: P) -> Result<Vec<WordItem>, WordListError> {
    let contents = std::fs::read_to_string(path)?;
    parse_word_list(&contents)
}

/// Loads one of the word lists bundled into the binary, e.g. `"kana"`.
pub fn builtin_word_list(name: &str) -> Result<Vec<WordItem>, WordListError> {
    let file = WORDS_DIR
        .get_file(format!("{name}.json"))
        .ok_or_else(|| WordListError::UnknownBuiltin(name.to_string()))?;
    let contents = file
        .contents_utf8()
        .ok_or_else(|| WordListError::UnknownBuiltin(name.to_string()))?;
    parse_word_list(contents)
}
