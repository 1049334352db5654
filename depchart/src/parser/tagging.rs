use crate::errors::{DepchartError, Result};
use crate::grammar::{Argument, DependencyGrammar, Side};
use crate::lexicon::{Lexicon, basic_category};
use crate::num::{Score, is_feasible};
use crate::parser::chart::{BinTag, Chart};
use crate::sentence::Sentence;
use crate::vocab::Vocabulary;

/// Fills the word ids and the distance bins of a reset chart.
pub(crate) fn index_sentence<G>(chart: &mut Chart, sent: &Sentence, vocab: &Vocabulary, grammar: &G) -> Result<()>
where
    G: DependencyGrammar,
{
    let n = sent.len();
    for token in sent.tokens() {
        chart.push_word(vocab.word_id(token.word()));
    }
    for head in 0..n {
        let mut bins = Vec::with_capacity(n + 1);
        for loc in 0..=n {
            let bin = grammar.distance_bin(Side::raw_distance(head, loc));
            if bin >= chart.num_dist_bins() {
                return Err(DepchartError::invalid_state(
                    "distance bin out of range",
                    format!("{bin} >= {}", chart.num_dist_bins()),
                ));
            }
            bins.push(bin);
        }
        chart.push_bin_distances(bins);
    }
    Ok(())
}

/// Seeds the single-word inside scores from the lexicon.
///
/// A tagging survives when its basic category equals the gold tag (if any)
/// and its score is feasible. Without `weight` both halves of a surviving bin
/// are seeded with log 1; with it, the left half holds the best weighted
/// tagging score of the bin.
pub(crate) fn seed_taggings<L, G>(
    chart: &mut Chart,
    sent: &Sentence,
    vocab: &Vocabulary,
    lexicon: &L,
    grammar: &G,
    weight: Option<f32>,
) -> Result<()>
where
    L: Lexicon,
    G: DependencyGrammar,
{
    for (loc, token) in sent.tokens().iter().enumerate() {
        for tagging in lexicon.taggings(token.word(), loc, token.context()) {
            let tag_str = vocab.tag(tagging.tag).unwrap_or_default();
            if let Some(gold) = token.tag()
                && basic_category(tag_str) != gold
            {
                continue;
            }
            if !is_feasible(tagging.score) {
                continue;
            }
            let bin = grammar.tag_bin(tagging.tag);
            if bin >= chart.num_tag_bins() {
                return Err(DepchartError::invalid_state(
                    "tag bin out of range",
                    format!("{tag_str} has bin {bin} >= {}", chart.num_tag_bins()),
                ));
            }
            log::trace!(
                "accepted tagging {}|{tag_str} at {loc}, score {}",
                token.word(),
                tagging.score
            );

            let seed: Score = weight.map_or(0.0, |w| w * tagging.score);
            if seed > chart.inside(loc, bin, loc) {
                chart.set_inside(loc, bin, loc, seed);
            }
            chart.set_inside(loc, bin, loc + 1, 0.0);
            if chart
                .bin_tag(loc, bin)
                .is_none_or(|prev| tagging.score > prev.score)
            {
                chart.set_bin_tag(
                    loc,
                    bin,
                    BinTag {
                        tag: tagging.tag,
                        score: tagging.score,
                    },
                );
            }
        }
        for bin in 0..chart.num_tag_bins() {
            let yes = is_feasible(chart.i_score(loc, loc + 1, loc, bin));
            chart.set_has_tag(loc, bin, yes);
        }
    }
    Ok(())
}

/// Caches the stop scores of every head and the pair scores of every
/// head/argument pair, one grammar call per distance bin.
pub(crate) fn memoize_scores<G>(chart: &mut Chart, grammar: &G)
where
    G: DependencyGrammar,
{
    let n = chart.len();
    let num_tags = chart.num_tag_bins();
    for head in 0..n {
        let head_word = chart.word(head);
        for head_tag in 0..num_tags {
            if !chart.has_tag(head, head_tag) {
                continue;
            }
            for split in 0..=n {
                let score = grammar.score(
                    head_word,
                    head_tag,
                    Argument::Stop,
                    Side::of_fencepost(head, split),
                    Side::raw_distance(head, split),
                );
                chart.set_head_stop(head, head_tag, split, score);
            }
            for arg in 0..n {
                if arg == head {
                    continue;
                }
                // fenceposts between the head and the argument's far side
                let splits = if head < arg {
                    head + 1..arg + 1
                } else {
                    arg + 1..head + 1
                };
                let arg_word = chart.word(arg);
                for arg_tag in 0..num_tags {
                    if !chart.has_tag(arg, arg_tag) {
                        continue;
                    }
                    let mut last_bin = None;
                    for split in splits.clone() {
                        let bin = chart.bin_distance(head, split);
                        if last_bin == Some(bin) {
                            continue;
                        }
                        last_bin = Some(bin);
                        let score = grammar.score(
                            head_word,
                            head_tag,
                            Argument::Word {
                                word: arg_word,
                                tag_bin: arg_tag,
                            },
                            Side::of_fencepost(head, split),
                            Side::raw_distance(head, split),
                        );
                        chart.set_head_score(bin, head, head_tag, arg, arg_tag, score);
                    }
                }
            }
        }
    }
}
