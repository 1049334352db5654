//! Provider of a routine for parsing.
use std::fmt;
use std::time::Instant;

use crate::errors::{DepchartError, Result};
use crate::grammar::DependencyGrammar;
use crate::lexicon::Lexicon;
use crate::num::{NEG_INF, Score};
use crate::parser::Parser;
use crate::parser::backtrace::Backtrace;
use crate::parser::cancel::CancelToken;
use crate::parser::chart::Chart;
use crate::parser::{filter, inside, outside, tagging};
use crate::scorer::{Edge, Hook, HookKind, Scorer};
use crate::sentence::Sentence;
use crate::tree::DepTree;
use crate::vocab::TagId;

/// Provider of a routine for parsing.
///
/// It holds the chart used in parsing, which is reused to avoid
/// unnecessary memory reallocation. A worker parses one sentence at a time;
/// use one worker per thread.
pub struct Worker<G, L> {
    pub(crate) parser: Parser<G, L>,
    pub(crate) sent: Sentence,
    pub(crate) chart: Chart,
    parsed: bool,
    outside_done: bool,
}

impl<G, L> Worker<G, L>
where
    G: DependencyGrammar,
    L: Lexicon,
{
    /// Creates a new instance.
    pub(crate) fn new(parser: Parser<G, L>) -> Self {
        let chart = Chart::new(
            parser.grammar().num_tag_bins(),
            parser.grammar().num_dist_bins(),
            parser.memory_limit,
        );
        Self {
            parser,
            sent: Sentence::new(),
            chart,
            parsed: false,
            outside_done: false,
        }
    }

    /// Parses a sentence, returning whether it has an analysis.
    ///
    /// The boundary token is appended if the sentence does not end with one.
    /// A sentence without any analysis is not an error.
    ///
    /// # Errors
    ///
    /// [`DepchartError`] is returned when the sentence is longer than
    /// [`Parser::max_length`], the chart cannot be grown to hold it, or the
    /// models return tag or distance bins out of range.
    pub fn parse(&mut self, sent: &Sentence) -> Result<bool> {
        self.parse_with_cancel(sent, &CancelToken::new())
    }

    /// Parses a sentence like [`Worker::parse`], giving up once `cancel` is cancelled.
    ///
    /// # Errors
    ///
    /// In addition to the errors of [`Worker::parse`],
    /// [`DepchartError::Cancelled`] is returned when cancellation is observed.
    /// The chart is discarded in that case.
    pub fn parse_with_cancel(&mut self, sent: &Sentence, cancel: &CancelToken) -> Result<bool> {
        self.parsed = false;
        self.outside_done = false;
        self.sent = sent.clone().with_boundary();

        let num_words = self.sent.num_words();
        if num_words > self.parser.max_length {
            return Err(DepchartError::SentenceTooLong {
                length: num_words,
                max_length: self.parser.max_length,
            });
        }
        let n = self.sent.len();
        self.chart.ensure_capacity(n)?;
        self.chart.reset(n);

        let model = &self.parser.model;
        let timer = Instant::now();
        tagging::index_sentence(&mut self.chart, &self.sent, &model.vocab, &model.grammar)?;
        cancel.check()?;
        tagging::seed_taggings(
            &mut self.chart,
            &self.sent,
            &model.vocab,
            &model.lexicon,
            &model.grammar,
            self.parser.tag_score_weight,
        )?;
        tagging::memoize_scores(&mut self.chart, &model.grammar);
        log::debug!("tagging and scoring {n} tokens: {:?}", timer.elapsed());

        let timer = Instant::now();
        inside::fill(&mut self.chart, cancel)?;
        log::debug!("inside pass: {:?}", timer.elapsed());

        if self.parser.compute_outside {
            let timer = Instant::now();
            outside::fill(&mut self.chart, model.goal_bin, cancel)?;
            log::debug!("outside pass: {:?}", timer.elapsed());
            let timer = Instant::now();
            filter::mark(&mut self.chart, cancel)?;
            log::debug!("feasibility filter: {:?}", timer.elapsed());
            self.outside_done = true;
        }

        self.parsed = true;
        Ok(self.has_parse())
    }

    /// Gets the last parsed sentence, including the boundary token.
    pub fn sentence(&self) -> &Sentence {
        &self.sent
    }

    /// Checks if the last parsed sentence has an analysis.
    pub fn has_parse(&self) -> bool {
        self.best_score() > f64::NEG_INFINITY
    }

    /// Gets the score of the best analysis of the last parsed sentence.
    ///
    /// It is `-inf` when there is no analysis, nothing was parsed, or the last
    /// call to [`Worker::parse`] failed.
    pub fn best_score(&self) -> f64 {
        if !self.parsed {
            return f64::NEG_INFINITY;
        }
        let n = self.chart.len();
        f64::from(self.chart.i_score(0, n, n - 1, self.parser.goal_bin()))
    }

    /// Gets the best analysis of the last parsed sentence, or `None` if it has none.
    ///
    /// The root of the tree is the boundary token.
    ///
    /// # Errors
    ///
    /// [`DepchartError::InvalidState`] is returned when the stored best score
    /// cannot be decomposed, which indicates inconsistent grammar scores.
    pub fn best_parse(&self) -> Result<Option<DepTree>> {
        if !self.has_parse() {
            return Ok(None);
        }
        let n = self.chart.len();
        let backtrace = Backtrace::new(&self.chart, &self.sent, &self.parser.model.vocab);
        backtrace
            .extract(0, n, n - 1, self.parser.goal_bin())
            .map(Some)
    }

    /// k-best parsing is not provided by the exhaustive parser.
    ///
    /// # Errors
    ///
    /// [`DepchartError::Unsupported`] is always returned.
    pub fn k_best_parses(&self, _k: usize) -> Result<Vec<(DepTree, f64)>> {
        Err(DepchartError::Unsupported(
            "k-best parses are not provided by the exhaustive dependency parser",
        ))
    }

    /// Listing every parse tied for the best score is not provided.
    ///
    /// # Errors
    ///
    /// [`DepchartError::Unsupported`] is always returned.
    pub fn best_parses(&self) -> Result<Vec<(DepTree, f64)>> {
        Err(DepchartError::Unsupported(
            "tied best parses are not provided by the exhaustive dependency parser",
        ))
    }

    /// k-good parsing is not provided.
    ///
    /// # Errors
    ///
    /// [`DepchartError::Unsupported`] is always returned.
    pub fn k_good_parses(&self, _k: usize) -> Result<Vec<(DepTree, f64)>> {
        Err(DepchartError::Unsupported(
            "k-good parses are not provided by the exhaustive dependency parser",
        ))
    }

    /// Sampling parses is not provided.
    ///
    /// # Errors
    ///
    /// [`DepchartError::Unsupported`] is always returned.
    pub fn k_sampled_parses(&self, _k: usize) -> Result<Vec<(DepTree, f64)>> {
        Err(DepchartError::Unsupported(
            "sampled parses are not provided by the exhaustive dependency parser",
        ))
    }

    /// Renders the head/argument score matrix of the last parsed sentence.
    ///
    /// Row `h`, column `a` shows the rounded absolute value of the best score
    /// of word `h` taking word `a` as an argument, over all bins and tags, or
    /// `in` when it is impossible.
    pub fn head_score_matrix(&self) -> String {
        if !self.parsed {
            return String::new();
        }
        HeadScores {
            chart: &self.chart,
            sent: &self.sent,
        }
        .to_string()
    }

    #[inline(always)]
    fn edge_in_range(&self, start: usize, end: usize, head: usize) -> bool {
        self.parsed && start <= head && head < end && end <= self.chart.len()
    }

    fn tag_bin(&self, tag: TagId) -> Option<usize> {
        let bin = self.parser.grammar().tag_bin(tag);
        (bin < self.chart.num_tag_bins()).then_some(bin)
    }
}

struct HeadScores<'a> {
    chart: &'a Chart,
    sent: &'a Sentence,
}

impl HeadScores<'_> {
    fn best(&self, head: usize, arg: usize) -> Score {
        let chart = self.chart;
        let mut best = NEG_INF;
        if arg == head {
            return best;
        }
        for dist in 0..chart.num_dist_bins() {
            for head_tag in 0..chart.num_tag_bins() {
                for arg_tag in 0..chart.num_tag_bins() {
                    best = best.max(chart.head_score(dist, head, head_tag, arg, arg_tag));
                }
            }
        }
        best
    }
}

impl fmt::Display for HeadScores<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.chart.len();
        write!(f, "{}", pad_or_trim("", 6))?;
        for token in self.sent.tokens() {
            write!(f, " {}", pad_or_trim(token.word(), 2))?;
        }
        writeln!(f)?;
        for head in 0..n {
            write!(f, "{}", pad_or_trim(self.sent.token(head).word(), 6))?;
            for arg in 0..n {
                let best = self.best(head, arg);
                let cell = if best.is_finite() {
                    format!("{}", best.abs().round() as i64)
                } else {
                    "in".to_string()
                };
                write!(f, " {}", pad_or_trim(&cell, 2))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn pad_or_trim(s: &str, width: usize) -> String {
    let mut out: String = s.chars().take(width).collect();
    while out.chars().count() < width {
        out.push(' ');
    }
    out
}

impl<G, L> Scorer for Worker<G, L>
where
    G: DependencyGrammar,
    L: Lexicon,
{
    fn i_score(&self, edge: &Edge) -> Score {
        match self.tag_bin(edge.tag) {
            Some(tag) if self.edge_in_range(edge.start, edge.end, edge.head) => {
                self.chart.i_score(edge.start, edge.end, edge.head, tag)
            }
            _ => NEG_INF,
        }
    }

    fn o_score(&self, edge: &Edge) -> Score {
        match self.tag_bin(edge.tag) {
            Some(tag) if self.outside_done && self.edge_in_range(edge.start, edge.end, edge.head) => {
                self.chart.o_score(edge.start, edge.end, edge.head, tag)
            }
            _ => NEG_INF,
        }
    }

    fn i_possible(&self, hook: &Hook) -> bool {
        let n = self.chart.len();
        match self.tag_bin(hook.tag) {
            Some(tag) if self.outside_done && hook.head < n => match hook.kind {
                HookKind::Pre if hook.start <= n => self.chart.i_possible_by_r(hook.start, hook.head, tag),
                HookKind::Post if hook.end <= n => self.chart.i_possible_by_l(hook.end, hook.head, tag),
                _ => false,
            },
            _ => false,
        }
    }

    fn o_possible(&self, hook: &Hook) -> bool {
        let n = self.chart.len();
        match self.tag_bin(hook.tag) {
            Some(tag) if self.outside_done && hook.head < n => match hook.kind {
                HookKind::Pre if hook.end <= n => self.chart.o_possible_by_r(hook.end, hook.head, tag),
                HookKind::Post if hook.start <= n => self.chart.o_possible_by_l(hook.start, hook.head, tag),
                _ => false,
            },
            _ => false,
        }
    }
}
