//! Exhaustive dependency chart parser.
pub mod cancel;
pub(crate) mod backtrace;
pub(crate) mod chart;
pub(crate) mod filter;
pub(crate) mod inside;
pub(crate) mod outside;
pub(crate) mod tagging;
pub mod worker;

use std::sync::Arc;

use crate::common::MAX_SENTENCE_LENGTH;
use crate::errors::{DepchartError, Result};
use crate::grammar::DependencyGrammar;
use crate::lexicon::Lexicon;
use crate::parser::worker::Worker;
use crate::vocab::{TagId, Vocabulary};

struct Model<G, L> {
    vocab: Arc<Vocabulary>,
    grammar: G,
    lexicon: L,
    goal_tag: TagId,
    goal_bin: usize,
}

/// Parser.
///
/// It holds the grammar, the lexicon and the vocabulary they share, and is
/// cheap to clone. Parsing happens in a [`Worker`] created by
/// [`Parser::new_worker`].
pub struct Parser<G, L> {
    model: Arc<Model<G, L>>,
    max_length: usize,
    compute_outside: bool,
    tag_score_weight: Option<f32>,
    memory_limit: Option<usize>,
}

impl<G, L> Clone for Parser<G, L> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            max_length: self.max_length,
            compute_outside: self.compute_outside,
            tag_score_weight: self.tag_score_weight,
            memory_limit: self.memory_limit,
        }
    }
}

impl<G, L> Parser<G, L>
where
    G: DependencyGrammar,
    L: Lexicon,
{
    /// Creates a new parser.
    ///
    /// # Errors
    ///
    /// [`DepchartError`] is returned when the grammar has no tag or distance
    /// bins, or maps the boundary tag outside its bins.
    pub fn new(vocab: Arc<Vocabulary>, grammar: G, lexicon: L) -> Result<Self> {
        let goal_tag = vocab.boundary_tag().ok_or_else(|| {
            DepchartError::invalid_argument("vocab", "the boundary tag is not interned")
        })?;
        if grammar.num_tag_bins() == 0 || grammar.num_dist_bins() == 0 {
            return Err(DepchartError::invalid_argument(
                "grammar",
                "the numbers of tag bins and distance bins must be positive",
            ));
        }
        let goal_bin = grammar.tag_bin(goal_tag);
        if goal_bin >= grammar.num_tag_bins() {
            return Err(DepchartError::invalid_argument(
                "grammar",
                format!(
                    "the boundary tag has bin {goal_bin}, but there are {} bins",
                    grammar.num_tag_bins()
                ),
            ));
        }
        Ok(Self {
            model: Arc::new(Model {
                vocab,
                grammar,
                lexicon,
                goal_tag,
                goal_bin,
            }),
            max_length: MAX_SENTENCE_LENGTH,
            compute_outside: false,
            tag_score_weight: None,
            memory_limit: None,
        })
    }

    /// Specifies the maximum number of words of a sentence, not counting the
    /// boundary token. Longer sentences are refused with
    /// [`DepchartError::SentenceTooLong`] before any chart is allocated.
    ///
    /// By default, there is no limit.
    pub const fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Runs the outside pass and derives the feasibility flags after each parse.
    ///
    /// They are only needed to combine this parser with another model through
    /// [`Scorer`](crate::Scorer), so this is disabled by default.
    pub const fn compute_outside(mut self, yes: bool) -> Self {
        self.compute_outside = yes;
        self
    }

    /// Seeds each single-word span with its lexicon score times `weight`
    /// instead of log 1.
    ///
    /// # Errors
    ///
    /// [`DepchartError`] is returned when `weight` is negative or not finite.
    pub fn tag_score_weight(mut self, weight: Option<f32>) -> Result<Self> {
        if let Some(w) = weight
            && !(w.is_finite() && w >= 0.0)
        {
            return Err(DepchartError::invalid_argument(
                "weight",
                format!("must be finite and non-negative, got {w}"),
            ));
        }
        self.tag_score_weight = weight;
        Ok(self)
    }

    /// Limits the bytes taken by the chart of each worker.
    ///
    /// A sentence whose chart would exceed the limit is handled like a failed
    /// allocation. By default, only the allocator limits the chart.
    pub const fn memory_limit(mut self, bytes: Option<usize>) -> Self {
        self.memory_limit = bytes;
        self
    }

    /// Gets the shared vocabulary.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.model.vocab
    }

    /// Gets the grammar.
    pub fn grammar(&self) -> &G {
        &self.model.grammar
    }

    /// Gets the lexicon.
    pub fn lexicon(&self) -> &L {
        &self.model.lexicon
    }

    /// Gets the tag heading every complete analysis.
    pub fn goal_tag(&self) -> TagId {
        self.model.goal_tag
    }

    pub(crate) fn goal_bin(&self) -> usize {
        self.model.goal_bin
    }

    /// Creates a new worker.
    pub fn new_worker(&self) -> Worker<G, L> {
        Worker::new(self.clone())
    }
}
