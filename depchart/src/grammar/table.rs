//! In-memory dependency grammar read from CSV rows.
use std::io::Read;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::errors::{DepchartError, Result};
use crate::grammar::{Argument, DependencyGrammar, DistanceBinning, Side, TagProjection};
use crate::num::{NEG_INF, Score};
use crate::utils;
use crate::vocab::{TagId, Vocabulary, WordId};

/// Settings of a [`TableGrammar`].
#[derive(Clone, Copy, Debug)]
pub struct GrammarConfig {
    /// Distance discretization.
    pub binning: DistanceBinning,
    /// How surface tags collapse into bins.
    pub projection: TagProjection,
    /// Score of an argument event without a row.
    pub default_arg_score: Score,
    /// Score of a stop event without a row.
    pub default_stop_score: Score,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            binning: DistanceBinning::Regular,
            projection: TagProjection::Identity,
            default_arg_score: NEG_INF,
            default_stop_score: 0.0,
        }
    }
}

type LexicalKey = (WordId, usize, WordId, usize, Side, usize);

/// Grammar backed by dense score tables over tag bins.
///
/// Three kinds of CSV rows are accepted:
///
/// ```text
/// arg,HEAD_TAG,ARG_TAG,SIDE,DIST_BIN,SCORE
/// stop,TAG,SIDE,VALENCE_BIN,SCORE
/// lex,HEAD_WORD,HEAD_TAG,ARG_WORD,ARG_TAG,SIDE,DIST_BIN,SCORE
/// ```
///
/// `SIDE` is `L` or `R`, the side of the head on which the argument lies.
/// A bin of `*` sets every bin. `lex` rows override `arg` rows for the given words.
#[derive(Debug, Clone)]
pub struct TableGrammar {
    vocab: Arc<Vocabulary>,
    config: GrammarConfig,
    tag_bins: Vec<usize>,
    num_tag_bins: usize,
    // [head_bin][arg_bin][side][dist_bin]
    arg_scores: Vec<Score>,
    // [bin][side][valence_bin]
    stop_scores: Vec<Score>,
    lexical: HashMap<LexicalKey, Score>,
}

impl TableGrammar {
    /// Creates a grammar in which every event scores the configured defaults.
    ///
    /// Tag bins are assigned to all tags of `vocab`, so it must already hold
    /// every tag the lexicon produces.
    pub fn new(vocab: Arc<Vocabulary>, config: GrammarConfig) -> Self {
        let (tag_bins, num_tag_bins) = assign_tag_bins(&vocab, config.projection);
        let num_dist_bins = config.binning.num_bins();
        let num_valence_bins = config.binning.num_valence_bins();
        Self {
            arg_scores: vec![
                config.default_arg_score;
                num_tag_bins * num_tag_bins * 2 * num_dist_bins
            ],
            stop_scores: vec![config.default_stop_score; num_tag_bins * 2 * num_valence_bins],
            lexical: HashMap::new(),
            tag_bins,
            num_tag_bins,
            config,
            vocab,
        }
    }

    /// Creates a grammar from CSV rows.
    ///
    /// Blank lines and lines starting with `#` are ignored.
    ///
    /// # Errors
    ///
    /// [`DepchartError`] is returned when a row is malformed or names a tag or
    /// word missing from `vocab`.
    pub fn from_reader<R>(mut rdr: R, vocab: Arc<Vocabulary>, config: GrammarConfig) -> Result<Self>
    where
        R: Read,
    {
        let mut text = String::new();
        rdr.read_to_string(&mut text)?;

        let mut grammar = Self::new(vocab, config);
        for (lineno, line) in utils::content_lines(&text) {
            let cols = utils::parse_csv_row(line)?;
            grammar
                .add_row(&cols)
                .map_err(|e| DepchartError::invalid_format("grammar.csv", format!("line {lineno}: {e}")))?;
        }
        Ok(grammar)
    }

    fn add_row(&mut self, cols: &[String]) -> Result<()> {
        let arity = match cols.first().map(String::as_str) {
            Some("arg") => 6,
            Some("stop") => 5,
            Some("lex") => 8,
            _ => {
                return Err(DepchartError::invalid_argument(
                    "row",
                    "the first field must be arg, stop or lex",
                ));
            }
        };
        if cols.len() != arity {
            return Err(DepchartError::invalid_argument(
                "row",
                format!("{} rows must have {arity} fields", cols[0]),
            ));
        }
        match cols[0].as_str() {
            "arg" => {
                let head_tag = self.parse_tag(&cols[1])?;
                let arg_tag = self.parse_tag(&cols[2])?;
                let side = parse_side(&cols[3])?;
                let bin = parse_bin(&cols[4])?;
                let score = utils::parse_score(&cols[5])?;
                self.set_arg_score(head_tag, arg_tag, side, bin, score)
            }
            "stop" => {
                let tag = self.parse_tag(&cols[1])?;
                let side = parse_side(&cols[2])?;
                let bin = parse_bin(&cols[3])?;
                let score = utils::parse_score(&cols[4])?;
                self.set_stop_score(tag, side, bin, score)
            }
            _ => {
                let head_word = self.parse_word(&cols[1])?;
                let head_tag = self.parse_tag(&cols[2])?;
                let arg_word = self.parse_word(&cols[3])?;
                let arg_tag = self.parse_tag(&cols[4])?;
                let side = parse_side(&cols[5])?;
                let bin = parse_bin(&cols[6])?;
                let score = utils::parse_score(&cols[7])?;
                self.set_lexical_score(
                    (head_word, head_tag),
                    (arg_word, arg_tag),
                    side,
                    bin,
                    score,
                )
            }
        }
    }

    fn parse_tag(&self, tag: &str) -> Result<TagId> {
        self.vocab
            .tag_id(tag)
            .ok_or_else(|| DepchartError::invalid_argument("tag", format!("unknown tag: {tag}")))
    }

    fn parse_word(&self, word: &str) -> Result<WordId> {
        self.vocab
            .words()
            .get(word)
            .map(WordId)
            .ok_or_else(|| DepchartError::invalid_argument("word", format!("unknown word: {word}")))
    }

    fn check_bin(&self, bin: Option<usize>, num_bins: usize) -> Result<std::ops::Range<usize>> {
        match bin {
            Some(b) if b < num_bins => Ok(b..b + 1),
            Some(b) => Err(DepchartError::invalid_argument(
                "bin",
                format!("{b} is out of range; there are {num_bins} bins"),
            )),
            None => Ok(0..num_bins),
        }
    }

    #[inline(always)]
    fn arg_index(&self, head_bin: usize, arg_bin: usize, side: Side, dist_bin: usize) -> usize {
        let num_dist_bins = self.config.binning.num_bins();
        ((head_bin * self.num_tag_bins + arg_bin) * 2 + side.index()) * num_dist_bins + dist_bin
    }

    #[inline(always)]
    fn stop_index(&self, bin: usize, side: Side, valence_bin: usize) -> usize {
        (bin * 2 + side.index()) * self.config.binning.num_valence_bins() + valence_bin
    }

    fn known_bin(&self, tag: TagId) -> Result<usize> {
        let bin = self.tag_bin(tag);
        if bin >= self.num_tag_bins {
            return Err(DepchartError::invalid_argument(
                "tag",
                format!("tag id {} is not in the grammar's vocabulary", tag.index()),
            ));
        }
        Ok(bin)
    }

    /// Sets the score of `arg_tag` attaching on `side` of `head_tag`.
    ///
    /// `dist_bin == None` sets every distance bin.
    pub fn set_arg_score(
        &mut self,
        head_tag: TagId,
        arg_tag: TagId,
        side: Side,
        dist_bin: Option<usize>,
        score: Score,
    ) -> Result<()> {
        let head_bin = self.known_bin(head_tag)?;
        let arg_bin = self.known_bin(arg_tag)?;
        for bin in self.check_bin(dist_bin, self.config.binning.num_bins())? {
            let i = self.arg_index(head_bin, arg_bin, side, bin);
            self.arg_scores[i] = score;
        }
        Ok(())
    }

    /// Sets the score of `tag` stopping on `side`.
    ///
    /// `valence_bin == None` sets every valence bin.
    pub fn set_stop_score(
        &mut self,
        tag: TagId,
        side: Side,
        valence_bin: Option<usize>,
        score: Score,
    ) -> Result<()> {
        let tag_bin = self.known_bin(tag)?;
        for bin in self.check_bin(valence_bin, self.config.binning.num_valence_bins())? {
            let i = self.stop_index(tag_bin, side, bin);
            self.stop_scores[i] = score;
        }
        Ok(())
    }

    /// Sets a word-specific score that overrides the tag-level score.
    pub fn set_lexical_score(
        &mut self,
        head: (WordId, TagId),
        arg: (WordId, TagId),
        side: Side,
        dist_bin: Option<usize>,
        score: Score,
    ) -> Result<()> {
        let head_bin = self.known_bin(head.1)?;
        let arg_bin = self.known_bin(arg.1)?;
        for bin in self.check_bin(dist_bin, self.config.binning.num_bins())? {
            self.lexical
                .insert((head.0, head_bin, arg.0, arg_bin, side, bin), score);
        }
        Ok(())
    }

    /// Gets the settings.
    pub fn config(&self) -> &GrammarConfig {
        &self.config
    }

    /// Gets the shared vocabulary.
    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocab
    }
}

fn parse_side(field: &str) -> Result<Side> {
    match field {
        "L" | "l" => Ok(Side::Left),
        "R" | "r" => Ok(Side::Right),
        _ => Err(DepchartError::invalid_argument(
            "side",
            format!("must be L or R, got {field}"),
        )),
    }
}

// Tags projecting to the same string share a bin, numbered by first occurrence.
fn assign_tag_bins(vocab: &Vocabulary, projection: TagProjection) -> (Vec<usize>, usize) {
    let mut bin_of: HashMap<&str, usize> = HashMap::new();
    let tag_bins = vocab
        .tags()
        .iter()
        .map(|tag| {
            let next = bin_of.len();
            *bin_of.entry(projection.project(tag)).or_insert(next)
        })
        .collect();
    (tag_bins, bin_of.len())
}

fn parse_bin(field: &str) -> Result<Option<usize>> {
    match field {
        "*" => Ok(None),
        _ => Ok(Some(field.parse()?)),
    }
}

impl DependencyGrammar for TableGrammar {
    #[inline(always)]
    fn num_tag_bins(&self) -> usize {
        self.num_tag_bins
    }

    /// Tags interned after the grammar was built map past the last bin.
    #[inline(always)]
    fn tag_bin(&self, tag: TagId) -> usize {
        self.tag_bins
            .get(tag.index())
            .copied()
            .unwrap_or(self.num_tag_bins)
    }

    #[inline(always)]
    fn num_dist_bins(&self) -> usize {
        self.config.binning.num_bins()
    }

    #[inline(always)]
    fn distance_bin(&self, distance: usize) -> usize {
        self.config.binning.bin(distance)
    }

    #[inline(always)]
    fn valence_bin(&self, distance: usize) -> usize {
        self.config.binning.valence_bin(distance)
    }

    fn score(
        &self,
        head: WordId,
        head_tag_bin: usize,
        arg: Argument,
        side: Side,
        distance: usize,
    ) -> Score {
        if head_tag_bin >= self.num_tag_bins {
            return NEG_INF;
        }
        match arg {
            Argument::Stop => {
                self.stop_scores[self.stop_index(head_tag_bin, side, self.valence_bin(distance))]
            }
            Argument::Word { word, tag_bin } => {
                if tag_bin >= self.num_tag_bins {
                    return NEG_INF;
                }
                let dist_bin = self.distance_bin(distance);
                if let Some(&score) = self
                    .lexical
                    .get(&(head, head_tag_bin, word, tag_bin, side, dist_bin))
                {
                    return score;
                }
                self.arg_scores[self.arg_index(head_tag_bin, tag_bin, side, dist_bin)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::common::BOUNDARY_TAG;

    fn vocabulary() -> Arc<Vocabulary> {
        let mut vocab = Vocabulary::new();
        for tag in ["DT", "NN", "NN-TMP", "VBZ"] {
            vocab.intern_tag(tag);
        }
        for word in ["the", "dog", "barks"] {
            vocab.intern_word(word);
        }
        Arc::new(vocab)
    }

    const GRAMMAR: &str = "\
# kind,...
arg,NN,DT,L,*,-0.5
arg,VBZ,NN,L,0,-1.0
stop,NN,R,0,-0.25
lex,barks,VBZ,dog,NN,L,*,-0.1
";

    #[test]
    fn test_arg_rows() {
        let vocab = vocabulary();
        let g = TableGrammar::from_reader(GRAMMAR.as_bytes(), vocab.clone(), GrammarConfig::default())
            .unwrap();
        let nn = g.tag_bin(vocab.tag_id("NN").unwrap());
        let dt = g.tag_bin(vocab.tag_id("DT").unwrap());
        let vbz = g.tag_bin(vocab.tag_id("VBZ").unwrap());
        let dog = vocab.word_id("dog");
        let the = vocab.word_id("the");
        let arg = Argument::Word { word: the, tag_bin: dt };
        assert_eq!(g.score(dog, nn, arg, Side::Left, 0), -0.5);
        assert_eq!(g.score(dog, nn, arg, Side::Left, 20), -0.5);
        assert_eq!(g.score(dog, nn, arg, Side::Right, 0), NEG_INF);

        // only distance bin 0 was listed
        let cat = vocab.word_id("cat");
        let arg = Argument::Word { word: cat, tag_bin: nn };
        assert_eq!(g.score(vocab.word_id("barks"), vbz, arg, Side::Left, 0), -1.0);
        assert_eq!(g.score(vocab.word_id("barks"), vbz, arg, Side::Left, 1), NEG_INF);
    }

    #[test]
    fn test_lexical_override() {
        let vocab = vocabulary();
        let g = TableGrammar::from_reader(GRAMMAR.as_bytes(), vocab.clone(), GrammarConfig::default())
            .unwrap();
        let nn = g.tag_bin(vocab.tag_id("NN").unwrap());
        let vbz = g.tag_bin(vocab.tag_id("VBZ").unwrap());
        let arg = Argument::Word {
            word: vocab.word_id("dog"),
            tag_bin: nn,
        };
        assert_eq!(g.score(vocab.word_id("barks"), vbz, arg, Side::Left, 0), -0.1);
        assert_eq!(g.score(vocab.word_id("barks"), vbz, arg, Side::Left, 3), -0.1);
    }

    #[test]
    fn test_stop_rows() {
        let vocab = vocabulary();
        let g = TableGrammar::from_reader(GRAMMAR.as_bytes(), vocab.clone(), GrammarConfig::default())
            .unwrap();
        let nn = g.tag_bin(vocab.tag_id("NN").unwrap());
        let dog = vocab.word_id("dog");
        assert_eq!(g.score(dog, nn, Argument::Stop, Side::Right, 0), -0.25);
        // unlisted stop events take the default of log 1
        assert_eq!(g.score(dog, nn, Argument::Stop, Side::Right, 1), 0.0);
        assert_eq!(g.score(dog, nn, Argument::Stop, Side::Left, 0), 0.0);
    }

    #[test]
    fn test_basic_category_projection() {
        let vocab = vocabulary();
        let config = GrammarConfig {
            projection: TagProjection::BasicCategory,
            ..GrammarConfig::default()
        };
        let g = TableGrammar::new(vocab.clone(), config);
        assert_eq!(
            g.tag_bin(vocab.tag_id("NN").unwrap()),
            g.tag_bin(vocab.tag_id("NN-TMP").unwrap())
        );
        assert_ne!(
            g.tag_bin(vocab.tag_id("NN").unwrap()),
            g.tag_bin(vocab.tag_id(BOUNDARY_TAG).unwrap())
        );
        assert_eq!(g.num_tag_bins(), 4);
    }

    #[test]
    fn test_foreign_tag_is_out_of_range() {
        let vocab = vocabulary();
        let mut g = TableGrammar::new(vocab.clone(), GrammarConfig::default());
        let foreign = TagId(vocab.tags().len() as u32);
        assert_eq!(g.tag_bin(foreign), g.num_tag_bins());

        let nn = vocab.tag_id("NN").unwrap();
        assert!(g.set_arg_score(nn, foreign, Side::Left, None, -1.0).is_err());
        assert!(g.set_stop_score(foreign, Side::Left, None, -1.0).is_err());
        let arg = Argument::Word {
            word: vocab.word_id("dog"),
            tag_bin: g.tag_bin(foreign),
        };
        assert_eq!(g.score(vocab.word_id("barks"), g.tag_bin(nn), arg, Side::Left, 0), NEG_INF);
    }

    #[test]
    fn test_invalid_rows() {
        let vocab = vocabulary();
        for row in [
            "arg,NN,XX,L,*,-1",
            "arg,NN,DT,X,*,-1",
            "arg,NN,DT,L,9,-1",
            "stop,NN,L,*",
            "lex,cat,NN,dog,NN,L,*,-1",
            "foo,NN",
        ] {
            let res = TableGrammar::from_reader(row.as_bytes(), vocab.clone(), GrammarConfig::default());
            assert!(res.is_err(), "{row}");
        }
    }
}
