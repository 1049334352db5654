//! Chart queries for combining the dependency scores with another model.
use crate::num::Score;
use crate::vocab::TagId;

/// A complete span headed by `head`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Edge {
    /// Left fencepost.
    pub start: usize,
    /// Right fencepost.
    pub end: usize,
    /// Position of the head word; `start <= head < end`.
    pub head: usize,
    /// Tag of the head word.
    pub tag: TagId,
}

/// Which edge of a hook is still open.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum HookKind {
    /// The hook waits for material on its left; its `start` is the open edge.
    Pre,
    /// The hook waits for material on its right; its `end` is the open edge.
    Post,
}

/// A partial span with one open edge, as built by an agenda-based combiner.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Hook {
    /// Left fencepost.
    pub start: usize,
    /// Right fencepost.
    pub end: usize,
    /// Position of the head word.
    pub head: usize,
    /// Tag of the head word.
    pub tag: TagId,
    /// Open edge.
    pub kind: HookKind,
}

impl Hook {
    /// Checks if the hook is open on its left.
    #[inline(always)]
    pub fn is_pre_hook(&self) -> bool {
        self.kind == HookKind::Pre
    }
}

/// Scores and pruning flags exposed by a parsed chart.
///
/// Out-of-range queries score `-inf` and are never possible.
pub trait Scorer {
    /// Best inside score of `edge`.
    fn i_score(&self, edge: &Edge) -> Score;

    /// Best outside score of `edge`.
    fn o_score(&self, edge: &Edge) -> Score;

    /// Checks if an inside-feasible edge with the head and tag of `hook` meets
    /// its open edge: ends at `start` for a pre-hook, starts at `end` otherwise.
    fn i_possible(&self, hook: &Hook) -> bool;

    /// Checks if an outside-feasible edge with the head and tag of `hook` shares
    /// its closed edge: ends at `end` for a pre-hook, starts at `start` otherwise.
    fn o_possible(&self, hook: &Hook) -> bool;
}
