//! Input sentences.
use std::fmt;

use crate::common::{BOUNDARY_TAG, BOUNDARY_WORD};

/// A token of an input sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedWord {
    word: String,
    tag: Option<String>,
    context: Option<String>,
}

impl TaggedWord {
    /// Creates an untagged token.
    pub fn new<S>(word: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            word: word.into(),
            tag: None,
            context: None,
        }
    }

    /// Sets the gold tag. Only taggings whose basic category equals it survive.
    ///
    /// An empty string is treated as no tag.
    pub fn with_tag<S>(mut self, tag: S) -> Self
    where
        S: Into<String>,
    {
        let tag = tag.into();
        self.tag = (!tag.is_empty()).then_some(tag);
        self
    }

    /// Sets the context string (e.g., morphosyntactic features) handed to the lexicon.
    ///
    /// An empty string is treated as no context.
    pub fn with_context<S>(mut self, context: S) -> Self
    where
        S: Into<String>,
    {
        let context = context.into();
        self.context = (!context.is_empty()).then_some(context);
        self
    }

    /// Gets the surface form.
    #[inline(always)]
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Gets the gold tag, if any.
    #[inline(always)]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Gets the context string, if any.
    #[inline(always)]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Checks if this is the synthetic end-of-sentence token.
    pub fn is_boundary(&self) -> bool {
        self.word == BOUNDARY_WORD
    }
}

/// An ordered sequence of tokens.
///
/// The parser expects the last token to be the boundary token added by
/// [`Sentence::with_boundary`], which heads every complete analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentence {
    tokens: Vec<TaggedWord>,
}

impl Sentence {
    /// Creates an empty sentence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sentence of untagged words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: words.into_iter().map(TaggedWord::new).collect(),
        }
    }

    /// Creates a sentence from `word/TAG` items, e.g. `"the/DT dog/NN"`.
    ///
    /// Items without a slash are untagged.
    pub fn from_slash_tagged(text: &str) -> Self {
        let tokens = text
            .split_whitespace()
            .map(|item| match item.rsplit_once('/') {
                Some((word, tag)) if !word.is_empty() => TaggedWord::new(word).with_tag(tag),
                _ => TaggedWord::new(item),
            })
            .collect();
        Self { tokens }
    }

    /// Appends the boundary token unless the sentence already ends with one.
    pub fn with_boundary(mut self) -> Self {
        if !self.tokens.last().is_some_and(TaggedWord::is_boundary) {
            self.tokens
                .push(TaggedWord::new(BOUNDARY_WORD).with_tag(BOUNDARY_TAG));
        }
        self
    }

    /// Appends a token.
    pub fn push(&mut self, token: TaggedWord) {
        self.tokens.push(token);
    }

    /// Gets the number of tokens, including the boundary token.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Checks if the sentence has no tokens.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Gets the `i`-th token.
    #[inline(always)]
    pub fn token(&self, i: usize) -> &TaggedWord {
        &self.tokens[i]
    }

    /// Gets all tokens.
    #[inline(always)]
    pub fn tokens(&self) -> &[TaggedWord] {
        &self.tokens
    }

    /// Gets the number of tokens, not counting a trailing boundary token.
    pub fn num_words(&self) -> usize {
        match self.tokens.last() {
            Some(last) if last.is_boundary() => self.tokens.len() - 1,
            _ => self.tokens.len(),
        }
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", token.word)?;
            if let Some(tag) = &token.tag {
                write!(f, "/{tag}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_boundary_is_idempotent() {
        let sent = Sentence::from_words(["the", "dog"]).with_boundary().with_boundary();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent.num_words(), 2);
        assert!(sent.token(2).is_boundary());
        assert_eq!(sent.token(2).tag(), Some(BOUNDARY_TAG));
    }

    #[test]
    fn test_slash_tagged() {
        let sent = Sentence::from_slash_tagged("the/DT dog barks/VBZ 1/2/CD");
        assert_eq!(sent.token(0).tag(), Some("DT"));
        assert_eq!(sent.token(1).tag(), None);
        assert_eq!(sent.token(2).word(), "barks");
        assert_eq!(sent.token(3).word(), "1/2");
        assert_eq!(sent.token(3).tag(), Some("CD"));
        assert_eq!(sent.to_string(), "the/DT dog barks/VBZ 1/2/CD");
    }

    #[test]
    fn test_empty_tag_and_context_are_none() {
        let token = TaggedWord::new("dog").with_tag("").with_context("");
        assert_eq!(token.tag(), None);
        assert_eq!(token.context(), None);
    }
}
