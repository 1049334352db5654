//! Lexicon interface.
pub mod table;

use crate::num::Score;
use crate::vocab::TagId;

pub use crate::lexicon::table::TableLexicon;

/// Characters that introduce an annotation on a tag, e.g., `-` in `NP-TMP`.
const ANNOTATION_CHARS: &[char] = &['-', '=', '|', '#', '^', '~', '_'];

/// A candidate tag of a word with its log score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tagging {
    /// Tag.
    pub tag: TagId,
    /// Log-probability of the word given the tag.
    pub score: Score,
}

/// Supplier of candidate taggings consumed by the tagging stage.
pub trait Lexicon {
    /// Enumerates the candidate taggings of `word` at sentence position `loc`.
    ///
    /// `context` is the optional context string attached to the token.
    /// The iteration order is the order in which ties are broken.
    fn taggings(&self, word: &str, loc: usize, context: Option<&str>)
    -> impl Iterator<Item = Tagging>;

    /// Checks if `word` was seen when the lexicon was built.
    fn is_known(&self, word: &str) -> bool;
}

/// Strips functional annotations from a tag, e.g., `NP-TMP` to `NP`.
///
/// A tag starting with an annotation character keeps it, and a matching
/// closing character (as in `-LRB-`) does not cut the tag either.
pub fn basic_category(tag: &str) -> &str {
    let mut seen_at_zero = None;
    for (i, ch) in tag.char_indices() {
        if !ANNOTATION_CHARS.contains(&ch) {
            continue;
        }
        if i == 0 {
            seen_at_zero = Some(ch);
        } else if i > 1 && seen_at_zero == Some(ch) {
            seen_at_zero = None;
        } else {
            return &tag[..i];
        }
    }
    tag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_category() {
        assert_eq!(basic_category("NN"), "NN");
        assert_eq!(basic_category("NP-TMP"), "NP");
        assert_eq!(basic_category("VB^S=2"), "VB");
        assert_eq!(basic_category("-LRB-"), "-LRB-");
        assert_eq!(basic_category("-NONE-"), "-NONE-");
        assert_eq!(basic_category("--"), "-");
        assert_eq!(basic_category(""), "");
    }
}
