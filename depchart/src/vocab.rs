//! Interned word and tag tables.
//!
//! Models and the parser share one [`Vocabulary`]. It is filled while a
//! model is built and frozen behind an [`Arc`](std::sync::Arc) afterwards;
//! parsing never adds entries, so unseen words map to [`UNKNOWN_WORD`].
use std::fmt;

use hashbrown::HashMap;

use crate::common::{BOUNDARY_TAG, BOUNDARY_WORD, UNKNOWN_WORD};

/// Identifier of an interned word.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct WordId(pub u32);

/// Identifier of an interned tag.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TagId(pub u32);

impl WordId {
    /// Returns the id as an index.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl TagId {
    /// Returns the id as an index.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Bidirectional string table.
#[derive(Debug, Default, Clone)]
pub struct Index {
    ids: HashMap<String, u32>,
    names: Vec<String>,
}

impl Index {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `name`, adding it if it is not yet present.
    pub fn intern(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as u32;
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        id
    }

    /// Returns the id of `name` if present.
    #[inline(always)]
    pub fn get(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    /// Returns the string of `id` if present.
    #[inline(always)]
    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    /// Returns the number of entries.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Checks if the table is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over the strings in id order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Word and tag tables shared by a lexicon, a grammar and the parser.
///
/// A fresh vocabulary already holds the unknown word, the boundary word and
/// the boundary tag.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    words: Index,
    tags: Index,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

impl Vocabulary {
    /// Creates a vocabulary holding only the reserved symbols.
    pub fn new() -> Self {
        let mut words = Index::new();
        words.intern(UNKNOWN_WORD);
        words.intern(BOUNDARY_WORD);
        let mut tags = Index::new();
        tags.intern(BOUNDARY_TAG);
        Self { words, tags }
    }

    /// Interns a word.
    pub fn intern_word(&mut self, word: &str) -> WordId {
        WordId(self.words.intern(word))
    }

    /// Interns a tag.
    pub fn intern_tag(&mut self, tag: &str) -> TagId {
        TagId(self.tags.intern(tag))
    }

    /// Returns the id of `word`, or the id of [`UNKNOWN_WORD`] if it was never interned.
    #[inline(always)]
    pub fn word_id(&self, word: &str) -> WordId {
        self.words
            .get(word)
            .or_else(|| self.words.get(UNKNOWN_WORD))
            .map_or(WordId(0), WordId)
    }

    /// Returns the id of `tag` if present.
    #[inline(always)]
    pub fn tag_id(&self, tag: &str) -> Option<TagId> {
        self.tags.get(tag).map(TagId)
    }

    /// Returns the id of [`BOUNDARY_TAG`].
    #[inline(always)]
    pub fn boundary_tag(&self) -> Option<TagId> {
        self.tag_id(BOUNDARY_TAG)
    }

    /// Returns the string of a word id.
    #[inline(always)]
    pub fn word(&self, id: WordId) -> Option<&str> {
        self.words.name(id.0)
    }

    /// Returns the string of a tag id.
    #[inline(always)]
    pub fn tag(&self, id: TagId) -> Option<&str> {
        self.tags.name(id.0)
    }

    /// Returns the word table.
    pub fn words(&self) -> &Index {
        &self.words
    }

    /// Returns the tag table.
    pub fn tags(&self) -> &Index {
        &self.tags
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vocabulary[words={}, tags=", self.words.len())?;
        for (i, tag) in self.tags.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{tag}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_symbols() {
        let vocab = Vocabulary::new();
        assert_eq!(vocab.word(vocab.word_id(UNKNOWN_WORD)), Some(UNKNOWN_WORD));
        assert_eq!(vocab.word(vocab.word_id(BOUNDARY_WORD)), Some(BOUNDARY_WORD));
        assert_eq!(vocab.tag(vocab.boundary_tag().unwrap()), Some(BOUNDARY_TAG));
    }

    #[test]
    fn test_unseen_word_maps_to_unknown() {
        let mut vocab = Vocabulary::new();
        let dog = vocab.intern_word("dog");
        assert_eq!(vocab.word_id("dog"), dog);
        assert_eq!(vocab.word_id("cat"), vocab.word_id(UNKNOWN_WORD));
        assert_eq!(vocab.words().len(), 3);
    }

    #[test]
    fn test_intern_is_idempotent() {
        let mut index = Index::new();
        let a = index.intern("NN");
        let b = index.intern("VB");
        assert_eq!(index.intern("NN"), a);
        assert_ne!(a, b);
        assert_eq!(index.name(b), Some("VB"));
        assert_eq!(index.iter().collect::<Vec<_>>(), vec!["NN", "VB"]);
    }
}
