//! Dependency grammar interface and binning schemes.
pub mod table;

use crate::lexicon::basic_category;
use crate::num::Score;
use crate::vocab::{TagId, WordId};

pub use crate::grammar::table::{GrammarConfig, TableGrammar};

/// Side of the head on which an argument (or a stop decision) lies.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    /// The argument precedes the head.
    Left,
    /// The argument follows the head.
    Right,
}

impl Side {
    /// Returns the side of `loc` seen from the word at `head`, where `loc` is a fencepost.
    #[inline(always)]
    pub const fn of_fencepost(head: usize, loc: usize) -> Self {
        if loc <= head { Self::Left } else { Self::Right }
    }

    /// Returns the number of words between the head and the fencepost `loc`.
    ///
    /// This is the raw distance passed to [`DependencyGrammar::score`].
    #[inline(always)]
    pub const fn raw_distance(head: usize, loc: usize) -> usize {
        if loc <= head { head - loc } else { loc - head - 1 }
    }

    /// Returns the index of this side, used by dense score tables.
    #[inline(always)]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// What a head generates next on one side.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Argument {
    /// An argument word with its tag bin.
    Word {
        /// Word of the argument.
        word: WordId,
        /// Tag bin of the argument.
        tag_bin: usize,
    },
    /// No further argument on this side.
    Stop,
}

/// Scoring model consumed by the parser.
///
/// All scores are log-probabilities; `f32::NEG_INFINITY` marks an impossible
/// event. The parser calls [`score`](Self::score) once per distance bin for
/// every head/argument pair, so the score must depend on the raw distance only
/// through [`distance_bin`](Self::distance_bin) (or
/// [`valence_bin`](Self::valence_bin) for [`Argument::Stop`]).
pub trait DependencyGrammar {
    /// Number of tag bins.
    fn num_tag_bins(&self) -> usize;

    /// Maps a surface tag to its bin.
    fn tag_bin(&self, tag: TagId) -> usize;

    /// Number of distance bins.
    fn num_dist_bins(&self) -> usize;

    /// Maps a raw distance to its bin.
    fn distance_bin(&self, distance: usize) -> usize;

    /// Maps a raw distance to a valence bin used by stop decisions.
    fn valence_bin(&self, distance: usize) -> usize;

    /// Scores generating `arg` on `side` of the head, `distance` words away.
    fn score(
        &self,
        head: WordId,
        head_tag_bin: usize,
        arg: Argument,
        side: Side,
        distance: usize,
    ) -> Score;
}

/// Distance discretization schemes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DistanceBinning {
    /// {0}, {1}, {2..5}, {6..10}, {>10}.
    #[default]
    Regular,
    /// {0}, {1,2}, {3..5}, {>5}.
    Coarse,
    /// Distance is ignored.
    None,
}

impl DistanceBinning {
    /// Number of distance bins.
    pub const fn num_bins(self) -> usize {
        match self {
            Self::Regular => 5,
            Self::Coarse => 4,
            Self::None => 1,
        }
    }

    /// Maps a raw distance to its bin.
    pub const fn bin(self, distance: usize) -> usize {
        match self {
            Self::Regular => match distance {
                0 => 0,
                1 => 1,
                2..=5 => 2,
                6..=10 => 3,
                _ => 4,
            },
            Self::Coarse => match distance {
                0 => 0,
                1..=2 => 1,
                3..=5 => 2,
                _ => 3,
            },
            Self::None => 0,
        }
    }

    /// Number of valence bins.
    pub const fn num_valence_bins(self) -> usize {
        match self {
            Self::None => 1,
            _ => 3,
        }
    }

    /// Maps a raw distance to "zero", "one" or "many" arguments generated so far.
    pub const fn valence_bin(self, distance: usize) -> usize {
        match self {
            Self::None => 0,
            _ => {
                if distance < 2 {
                    distance
                } else {
                    2
                }
            }
        }
    }
}

/// How surface tags collapse into tag bins.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TagProjection {
    /// Every tag is its own bin.
    #[default]
    Identity,
    /// Tags sharing a basic category (e.g., `NP-TMP` and `NP`) share a bin.
    BasicCategory,
}

impl TagProjection {
    /// Returns the string that identifies the bin of `tag`.
    pub fn project(self, tag: &str) -> &str {
        match self {
            Self::Identity => tag,
            Self::BasicCategory => basic_category(tag),
        }
    }
}

/// A word of a parsed sentence, identified by its position.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Attachment {
    /// Position in the sentence.
    pub position: usize,
    /// Word.
    pub word: WordId,
    /// Surface tag.
    pub tag: TagId,
}

/// A generation event of a dependency analysis.
///
/// `arg == None` is the decision to stop generating arguments on `side`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Dependency {
    /// Governing word.
    pub head: Attachment,
    /// Governed word, or `None` for a stop event.
    pub arg: Option<Attachment>,
    /// Side of the head on which the event happens.
    pub side: Side,
    /// Raw distance passed to the grammar.
    pub distance: usize,
}

impl Dependency {
    /// Scores this event under `grammar`.
    pub fn score<G>(&self, grammar: &G) -> Score
    where
        G: DependencyGrammar + ?Sized,
    {
        let arg = match self.arg {
            Some(arg) => Argument::Word {
                word: arg.word,
                tag_bin: grammar.tag_bin(arg.tag),
            },
            None => Argument::Stop,
        };
        grammar.score(
            self.head.word,
            grammar.tag_bin(self.head.tag),
            arg,
            self.side,
            self.distance,
        )
    }
}

/// Sums the scores of all events, as the chart does for a single derivation.
pub fn score_dependencies<'a, G, I>(grammar: &G, deps: I) -> f64
where
    G: DependencyGrammar + ?Sized,
    I: IntoIterator<Item = &'a Dependency>,
{
    deps.into_iter()
        .map(|dep| f64::from(dep.score(grammar)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_distance() {
        // fenceposts left of or at the head count back from the head
        assert_eq!(Side::raw_distance(3, 3), 0);
        assert_eq!(Side::raw_distance(3, 0), 3);
        // fenceposts right of the head exclude the head itself
        assert_eq!(Side::raw_distance(3, 4), 0);
        assert_eq!(Side::raw_distance(3, 6), 2);
        assert_eq!(Side::of_fencepost(3, 3), Side::Left);
        assert_eq!(Side::of_fencepost(3, 4), Side::Right);
    }

    #[test]
    fn test_regular_bins() {
        let bins: Vec<_> = (0..13).map(|d| DistanceBinning::Regular.bin(d)).collect();
        assert_eq!(bins, vec![0, 1, 2, 2, 2, 2, 3, 3, 3, 3, 3, 4, 4]);
    }

    #[test]
    fn test_coarse_bins() {
        let bins: Vec<_> = (0..8).map(|d| DistanceBinning::Coarse.bin(d)).collect();
        assert_eq!(bins, vec![0, 1, 1, 2, 2, 2, 3, 3]);
        assert!(bins.iter().all(|&b| b < DistanceBinning::Coarse.num_bins()));
    }

    #[test]
    fn test_valence_bins() {
        assert_eq!(DistanceBinning::Regular.valence_bin(0), 0);
        assert_eq!(DistanceBinning::Regular.valence_bin(1), 1);
        assert_eq!(DistanceBinning::Regular.valence_bin(7), 2);
        assert_eq!(DistanceBinning::None.valence_bin(7), 0);
        assert_eq!(DistanceBinning::None.bin(7), 0);
    }

    #[test]
    fn test_projection() {
        assert_eq!(TagProjection::Identity.project("NP-TMP"), "NP-TMP");
        assert_eq!(TagProjection::BasicCategory.project("NP-TMP"), "NP");
        assert_eq!(TagProjection::BasicCategory.project("-LRB-"), "-LRB-");
    }
}
