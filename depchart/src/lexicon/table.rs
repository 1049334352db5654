//! In-memory lexicon read from CSV rows.
use std::io::Read;

use hashbrown::HashMap;

use crate::common::{BOUNDARY_TAG, BOUNDARY_WORD, UNKNOWN_WORD};
use crate::errors::{DepchartError, Result};
use crate::lexicon::{Lexicon, Tagging};
use crate::num::Score;
use crate::utils;
use crate::vocab::Vocabulary;

/// Lexicon backed by a table of `word,tag,score` rows.
///
/// Words without rows take the taggings listed under [`UNKNOWN_WORD`], which
/// should name the open-class tags. The boundary word always admits the
/// boundary tag with score 0.
#[derive(Debug, Clone)]
pub struct TableLexicon {
    entries: HashMap<String, Vec<Tagging>>,
    unknown: Vec<Tagging>,
}

impl TableLexicon {
    /// Creates a lexicon that only knows the boundary word.
    pub fn new(vocab: &mut Vocabulary) -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            BOUNDARY_WORD.to_string(),
            vec![Tagging {
                tag: vocab.intern_tag(BOUNDARY_TAG),
                score: 0.0,
            }],
        );
        Self {
            entries,
            unknown: vec![],
        }
    }

    /// Adds a tagging, interning the word and the tag.
    ///
    /// A row for [`UNKNOWN_WORD`] adds an open-class tagging for unseen words.
    /// A repeated word/tag pair replaces the earlier score.
    pub fn add_tagging(&mut self, vocab: &mut Vocabulary, word: &str, tag: &str, score: Score) {
        let tagging = Tagging {
            tag: vocab.intern_tag(tag),
            score,
        };
        let list = if word == UNKNOWN_WORD {
            &mut self.unknown
        } else {
            vocab.intern_word(word);
            self.entries.entry(word.to_string()).or_default()
        };
        match list.iter_mut().find(|t| t.tag == tagging.tag) {
            Some(prev) => prev.score = score,
            None => list.push(tagging),
        }
    }

    /// Creates a lexicon from CSV rows `word,tag,score`.
    ///
    /// Blank lines and lines starting with `#` are ignored. Scores are log
    /// probabilities; `-inf` is accepted.
    ///
    /// # Errors
    ///
    /// [`DepchartError`] is returned when a row is malformed or the input is not UTF-8.
    pub fn from_reader<R>(mut rdr: R, vocab: &mut Vocabulary) -> Result<Self>
    where
        R: Read,
    {
        let mut text = String::new();
        rdr.read_to_string(&mut text)?;

        let mut lexicon = Self::new(vocab);
        for (lineno, line) in utils::content_lines(&text) {
            let cols = utils::parse_csv_row(line)?;
            if cols.len() != 3 {
                let msg = format!("line {lineno}: a row must have 3 fields, word,tag,score: {line}");
                return Err(DepchartError::invalid_format("lex.csv", msg));
            }
            let score = utils::parse_score(&cols[2]).map_err(|_| {
                DepchartError::invalid_format(
                    "lex.csv",
                    format!("line {lineno}: invalid score: {}", cols[2]),
                )
            })?;
            lexicon.add_tagging(vocab, &cols[0], &cols[1], score);
        }
        Ok(lexicon)
    }

    /// Gets the number of known words, including the boundary word.
    pub fn num_words(&self) -> usize {
        self.entries.len()
    }
}

impl Lexicon for TableLexicon {
    fn taggings(
        &self,
        word: &str,
        _loc: usize,
        _context: Option<&str>,
    ) -> impl Iterator<Item = Tagging> {
        self.entries
            .get(word)
            .unwrap_or(&self.unknown)
            .iter()
            .copied()
    }

    fn is_known(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEX: &str = "\
# word,tag,score
the,DT,-0.1
dog,NN,-2.0
dog,VB,-7.5
*UNK*,NN,-9.0
*UNK*,JJ,-10.0
";

    #[test]
    fn test_known_word() {
        let mut vocab = Vocabulary::new();
        let lex = TableLexicon::from_reader(LEX.as_bytes(), &mut vocab).unwrap();
        let tags: Vec<_> = lex
            .taggings("dog", 1, None)
            .map(|t| (vocab.tag(t.tag).unwrap(), t.score))
            .collect();
        assert_eq!(tags, vec![("NN", -2.0), ("VB", -7.5)]);
        assert!(lex.is_known("dog"));
        assert_eq!(lex.num_words(), 3);
    }

    #[test]
    fn test_unknown_word_falls_back() {
        let mut vocab = Vocabulary::new();
        let lex = TableLexicon::from_reader(LEX.as_bytes(), &mut vocab).unwrap();
        assert!(!lex.is_known("cat"));
        let tags: Vec<_> = lex
            .taggings("cat", 0, None)
            .map(|t| vocab.tag(t.tag).unwrap())
            .collect();
        assert_eq!(tags, vec!["NN", "JJ"]);
    }

    #[test]
    fn test_boundary_word() {
        let mut vocab = Vocabulary::new();
        let lex = TableLexicon::new(&mut vocab);
        let tags: Vec<_> = lex.taggings(BOUNDARY_WORD, 0, None).collect();
        assert_eq!(tags.len(), 1);
        assert_eq!(Some(tags[0].tag), vocab.boundary_tag());
        assert_eq!(tags[0].score, 0.0);
    }

    #[test]
    fn test_repeated_row_replaces() {
        let mut vocab = Vocabulary::new();
        let mut lex = TableLexicon::new(&mut vocab);
        lex.add_tagging(&mut vocab, "dog", "NN", -1.0);
        lex.add_tagging(&mut vocab, "dog", "NN", -3.0);
        let tags: Vec<_> = lex.taggings("dog", 0, None).collect();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].score, -3.0);
    }

    #[test]
    fn test_malformed_row() {
        let mut vocab = Vocabulary::new();
        assert!(TableLexicon::from_reader("the,DT".as_bytes(), &mut vocab).is_err());
        assert!(TableLexicon::from_reader("the,DT,x".as_bytes(), &mut vocab).is_err());
    }
}
