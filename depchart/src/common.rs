//! Common settings in Depchart.

/// The maximum length of an input sentence, excluding the boundary token.
///
/// This is the default of [`Parser::max_length`](crate::Parser::max_length),
/// i.e., no limit other than what the chart can allocate.
pub const MAX_SENTENCE_LENGTH: usize = usize::MAX;

/// Surface form of the synthetic end-of-sentence token.
pub const BOUNDARY_WORD: &str = ".$.";

/// Tag of the synthetic end-of-sentence token.
///
/// The token carrying this tag heads every complete analysis.
pub const BOUNDARY_TAG: &str = ".$$.";

/// Symbol under which a lexicon lists the taggings of unseen words.
pub const UNKNOWN_WORD: &str = "*UNK*";

/// Relative tolerance used when the backtrace re-derives a stored score.
pub const MATCH_TOLERANCE: f64 = 1e-5;
