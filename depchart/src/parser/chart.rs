use std::collections::TryReserveError;
use std::mem::size_of;

use crate::errors::{DepchartError, Result};
use crate::num::{NEG_INF, Score};
use crate::vocab::{TagId, WordId};

/// The surface tag standing for a tag bin at one position, with its lexicon score.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BinTag {
    pub tag: TagId,
    pub score: Score,
}

/// Score tensors of one sentence.
///
/// Buffers are sized for the longest sentence seen so far and reused; each
/// parse reshapes them to the current length `n` (boundary token included)
/// and resets only the prefix it uses.
///
/// Half-triangle tensors are indexed `[head][tag_bin][fencepost]`, the pair
/// scores `[dist_bin][head][head_bin][arg][arg_bin]` and the feasibility flags
/// `[fencepost][head][tag_bin]`.
pub(crate) struct Chart {
    num_tag_bins: usize,
    num_dist_bins: usize,
    memory_limit: Option<usize>,

    capacity: usize,
    max_failed_length: Option<usize>,
    len: usize,

    inside: Vec<Score>,
    outside: Vec<Score>,
    head_stop: Vec<Score>,
    head_score: Vec<Score>,
    i_possible_by_l: Vec<bool>,
    i_possible_by_r: Vec<bool>,
    o_possible_by_l: Vec<bool>,
    o_possible_by_r: Vec<bool>,

    has_tag: Vec<bool>,
    bin_tags: Vec<Option<BinTag>>,
    words: Vec<WordId>,
    bin_distance: Vec<usize>,
}

fn try_alloc<T>(len: usize, value: T) -> Result<Vec<T>, TryReserveError>
where
    T: Clone,
{
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    v.resize(len, value);
    Ok(v)
}

impl Chart {
    pub fn new(num_tag_bins: usize, num_dist_bins: usize, memory_limit: Option<usize>) -> Self {
        Self {
            num_tag_bins,
            num_dist_bins,
            memory_limit,
            capacity: 0,
            max_failed_length: None,
            len: 0,
            inside: vec![],
            outside: vec![],
            head_stop: vec![],
            head_score: vec![],
            i_possible_by_l: vec![],
            i_possible_by_r: vec![],
            o_possible_by_l: vec![],
            o_possible_by_r: vec![],
            has_tag: vec![],
            bin_tags: vec![],
            words: vec![],
            bin_distance: vec![],
        }
    }

    /// Number of tokens the buffers can hold.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tokens of the current sentence.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub const fn num_tag_bins(&self) -> usize {
        self.num_tag_bins
    }

    #[inline(always)]
    pub const fn num_dist_bins(&self) -> usize {
        self.num_dist_bins
    }

    fn half_len(&self, n: usize) -> Option<usize> {
        n.checked_mul(self.num_tag_bins)?.checked_mul(n + 1)
    }

    fn pair_len(&self, n: usize) -> Option<usize> {
        let nt = n.checked_mul(self.num_tag_bins)?;
        nt.checked_mul(nt)?.checked_mul(self.num_dist_bins)
    }

    /// Bytes taken by the tensors of a chart holding `n` tokens.
    pub fn required_bytes(&self, n: usize) -> Option<usize> {
        let half = self.half_len(n)?;
        let pair = self.pair_len(n)?;
        let word_tag = n.checked_mul(self.num_tag_bins)?;
        let scores = half.checked_mul(3)?.checked_add(pair)?;
        scores
            .checked_mul(size_of::<Score>())?
            .checked_add(half.checked_mul(4)?)?
            .checked_add(word_tag.checked_mul(size_of::<bool>() + size_of::<Option<BinTag>>())?)
    }

    fn release(&mut self) {
        self.inside = vec![];
        self.outside = vec![];
        self.head_stop = vec![];
        self.head_score = vec![];
        self.i_possible_by_l = vec![];
        self.i_possible_by_r = vec![];
        self.o_possible_by_l = vec![];
        self.o_possible_by_r = vec![];
        self.has_tag = vec![];
        self.bin_tags = vec![];
        self.capacity = 0;
    }

    fn allocate(&mut self, n: usize) -> Result<(), TryReserveError> {
        let half = self.half_len(n).unwrap_or(usize::MAX);
        let pair = self.pair_len(n).unwrap_or(usize::MAX);
        let word_tag = n.saturating_mul(self.num_tag_bins);

        let inside = try_alloc(half, NEG_INF)?;
        let outside = try_alloc(half, NEG_INF)?;
        let head_stop = try_alloc(half, NEG_INF)?;
        let head_score = try_alloc(pair, NEG_INF)?;
        let i_possible_by_l = try_alloc(half, false)?;
        let i_possible_by_r = try_alloc(half, false)?;
        let o_possible_by_l = try_alloc(half, false)?;
        let o_possible_by_r = try_alloc(half, false)?;
        let has_tag = try_alloc(word_tag, false)?;
        let bin_tags = try_alloc(word_tag, None)?;

        self.inside = inside;
        self.outside = outside;
        self.head_stop = head_stop;
        self.head_score = head_score;
        self.i_possible_by_l = i_possible_by_l;
        self.i_possible_by_r = i_possible_by_r;
        self.o_possible_by_l = o_possible_by_l;
        self.o_possible_by_r = o_possible_by_r;
        self.has_tag = has_tag;
        self.bin_tags = bin_tags;
        self.capacity = n;
        Ok(())
    }

    fn within_limit(&self, n: usize) -> bool {
        match (self.required_bytes(n), self.memory_limit) {
            (None, _) => false,
            (Some(bytes), Some(limit)) => bytes <= limit,
            (Some(_), None) => true,
        }
    }

    fn try_allocate(&mut self, n: usize) -> bool {
        if !self.within_limit(n) {
            return false;
        }
        self.allocate(n).is_ok()
    }

    /// Grows the buffers to hold `n` tokens.
    ///
    /// On failure the buffers are restored to the previous capacity and
    /// `n` is remembered, so that sentences at least as long fail without
    /// another attempt.
    pub fn ensure_capacity(&mut self, n: usize) -> Result<()> {
        if n <= self.capacity {
            return Ok(());
        }
        if self.max_failed_length.is_some_and(|failed| n >= failed) {
            return Err(DepchartError::Allocation { requested: n });
        }
        let old_capacity = self.capacity;
        self.release();
        if self.try_allocate(n) {
            log::debug!(
                "allocated a chart for {n} tokens ({} bytes)",
                self.required_bytes(n).unwrap_or(usize::MAX)
            );
            return Ok(());
        }
        self.max_failed_length = Some(n);
        if old_capacity > 0 && !self.try_allocate(old_capacity) {
            log::error!("cannot restore the chart to its capacity of {old_capacity} tokens");
            return Err(DepchartError::FatalAllocation {
                capacity: old_capacity,
            });
        }
        log::debug!("cannot allocate a chart for {n} tokens; keeping {old_capacity}");
        Err(DepchartError::Allocation { requested: n })
    }

    /// Reshapes the buffers to `n` tokens and resets every entry in use.
    ///
    /// `n` must not exceed the capacity.
    pub fn reset(&mut self, n: usize) {
        debug_assert!(n <= self.capacity);
        self.len = n;
        let half = n * self.num_tag_bins * (n + 1);
        let pair = self.num_dist_bins * n * self.num_tag_bins * n * self.num_tag_bins;
        let word_tag = n * self.num_tag_bins;
        self.inside[..half].fill(NEG_INF);
        self.outside[..half].fill(NEG_INF);
        self.head_stop[..half].fill(NEG_INF);
        self.head_score[..pair].fill(NEG_INF);
        self.i_possible_by_l[..half].fill(false);
        self.i_possible_by_r[..half].fill(false);
        self.o_possible_by_l[..half].fill(false);
        self.o_possible_by_r[..half].fill(false);
        self.has_tag[..word_tag].fill(false);
        self.bin_tags[..word_tag].fill(None);
        self.words.clear();
        self.bin_distance.clear();
    }

    #[inline(always)]
    fn half_index(&self, head: usize, tag: usize, loc: usize) -> usize {
        debug_assert!(head < self.len && tag < self.num_tag_bins && loc <= self.len);
        (head * self.num_tag_bins + tag) * (self.len + 1) + loc
    }

    #[inline(always)]
    fn pair_index(&self, dist: usize, head: usize, head_tag: usize, arg: usize, arg_tag: usize) -> usize {
        let (n, t) = (self.len, self.num_tag_bins);
        (((dist * n + head) * t + head_tag) * n + arg) * t + arg_tag
    }

    #[inline(always)]
    fn flag_index(&self, loc: usize, head: usize, tag: usize) -> usize {
        (loc * self.len + head) * self.num_tag_bins + tag
    }

    #[inline(always)]
    fn word_tag_index(&self, word: usize, tag: usize) -> usize {
        word * self.num_tag_bins + tag
    }

    #[inline(always)]
    pub fn inside(&self, head: usize, tag: usize, loc: usize) -> Score {
        self.inside[self.half_index(head, tag, loc)]
    }

    #[inline(always)]
    pub fn set_inside(&mut self, head: usize, tag: usize, loc: usize, score: Score) {
        let i = self.half_index(head, tag, loc);
        self.inside[i] = score;
    }

    /// Raises an inside cell to `score` if it is higher.
    #[inline(always)]
    pub fn raise_inside(&mut self, head: usize, tag: usize, loc: usize, score: Score) {
        let i = self.half_index(head, tag, loc);
        if score > self.inside[i] {
            self.inside[i] = score;
        }
    }

    #[inline(always)]
    pub fn outside(&self, head: usize, tag: usize, loc: usize) -> Score {
        self.outside[self.half_index(head, tag, loc)]
    }

    #[inline(always)]
    pub fn set_outside(&mut self, head: usize, tag: usize, loc: usize, score: Score) {
        let i = self.half_index(head, tag, loc);
        self.outside[i] = score;
    }

    /// Raises an outside cell to `score` if it is higher.
    #[inline(always)]
    pub fn raise_outside(&mut self, head: usize, tag: usize, loc: usize, score: Score) {
        let i = self.half_index(head, tag, loc);
        if score > self.outside[i] {
            self.outside[i] = score;
        }
    }

    #[inline(always)]
    pub fn head_stop(&self, head: usize, tag: usize, loc: usize) -> Score {
        self.head_stop[self.half_index(head, tag, loc)]
    }

    #[inline(always)]
    pub fn set_head_stop(&mut self, head: usize, tag: usize, loc: usize, score: Score) {
        let i = self.half_index(head, tag, loc);
        self.head_stop[i] = score;
    }

    #[inline(always)]
    pub fn head_score(&self, dist: usize, head: usize, head_tag: usize, arg: usize, arg_tag: usize) -> Score {
        self.head_score[self.pair_index(dist, head, head_tag, arg, arg_tag)]
    }

    #[inline(always)]
    pub fn set_head_score(
        &mut self,
        dist: usize,
        head: usize,
        head_tag: usize,
        arg: usize,
        arg_tag: usize,
        score: Score,
    ) {
        let i = self.pair_index(dist, head, head_tag, arg, arg_tag);
        self.head_score[i] = score;
    }

    #[inline(always)]
    pub fn has_tag(&self, word: usize, tag: usize) -> bool {
        self.has_tag[self.word_tag_index(word, tag)]
    }

    #[inline(always)]
    pub fn set_has_tag(&mut self, word: usize, tag: usize, yes: bool) {
        let i = self.word_tag_index(word, tag);
        self.has_tag[i] = yes;
    }

    #[inline(always)]
    pub fn bin_tag(&self, word: usize, tag: usize) -> Option<BinTag> {
        self.bin_tags[self.word_tag_index(word, tag)]
    }

    #[inline(always)]
    pub fn set_bin_tag(&mut self, word: usize, tag: usize, bin_tag: BinTag) {
        let i = self.word_tag_index(word, tag);
        self.bin_tags[i] = Some(bin_tag);
    }

    #[inline(always)]
    pub fn word(&self, i: usize) -> WordId {
        self.words[i]
    }

    #[inline(always)]
    pub fn push_word(&mut self, word: WordId) {
        self.words.push(word);
    }

    /// Distance bin between the word at `head` and the fencepost `loc`.
    #[inline(always)]
    pub fn bin_distance(&self, head: usize, loc: usize) -> usize {
        self.bin_distance[head * (self.len + 1) + loc]
    }

    /// Appends the distance bins of the next head; called `n` times, each with `n + 1` bins.
    pub fn push_bin_distances<I>(&mut self, bins: I)
    where
        I: IntoIterator<Item = usize>,
    {
        self.bin_distance.extend(bins);
    }

    /// Inside score of the span `[start, end)` headed by `head`: the sum of both halves.
    #[inline(always)]
    pub fn i_score(&self, start: usize, end: usize, head: usize, tag: usize) -> Score {
        self.inside(head, tag, start) + self.inside(head, tag, end)
    }

    #[inline(always)]
    pub fn o_score(&self, start: usize, end: usize, head: usize, tag: usize) -> Score {
        self.outside(head, tag, start) + self.outside(head, tag, end)
    }

    /// Marks `(head, tag)` feasible on both edges of `[start, end)`.
    pub fn mark_possible(&mut self, start: usize, end: usize, head: usize, tag: usize) {
        let by_r = self.flag_index(end, head, tag);
        let by_l = self.flag_index(start, head, tag);
        self.i_possible_by_r[by_r] = true;
        self.i_possible_by_l[by_l] = true;
        self.o_possible_by_r[by_r] = true;
        self.o_possible_by_l[by_l] = true;
    }

    #[inline(always)]
    pub fn i_possible_by_l(&self, loc: usize, head: usize, tag: usize) -> bool {
        self.i_possible_by_l[self.flag_index(loc, head, tag)]
    }

    #[inline(always)]
    pub fn i_possible_by_r(&self, loc: usize, head: usize, tag: usize) -> bool {
        self.i_possible_by_r[self.flag_index(loc, head, tag)]
    }

    #[inline(always)]
    pub fn o_possible_by_l(&self, loc: usize, head: usize, tag: usize) -> bool {
        self.o_possible_by_l[self.flag_index(loc, head, tag)]
    }

    #[inline(always)]
    pub fn o_possible_by_r(&self, loc: usize, head: usize, tag: usize) -> bool {
        self.o_possible_by_r[self.flag_index(loc, head, tag)]
    }
}
