use crate::errors::{DepchartError, Result};
use crate::num::matches;
use crate::parser::chart::Chart;
use crate::sentence::Sentence;
use crate::tree::{DepTree, Label};
use crate::vocab::Vocabulary;

/// A head/argument split reproducing a stored inside score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Split {
    split: usize,
    arg: usize,
    arg_tag: usize,
}

/// Rebuilds the best derivation from a filled chart.
pub(crate) struct Backtrace<'a> {
    chart: &'a Chart,
    sent: &'a Sentence,
    vocab: &'a Vocabulary,
}

impl<'a> Backtrace<'a> {
    pub fn new(chart: &'a Chart, sent: &'a Sentence, vocab: &'a Vocabulary) -> Self {
        Self { chart, sent, vocab }
    }

    /// Extracts the best tree of `[start, end)` headed by `head`/`tag`, flattened.
    pub fn extract(&self, start: usize, end: usize, head: usize, tag: usize) -> Result<DepTree> {
        Ok(self.extract_binary(start, end, head, tag)?.flatten())
    }

    fn label(&self, head: usize, tag: usize) -> Result<Label> {
        let bin_tag = self.chart.bin_tag(head, tag).ok_or_else(|| {
            DepchartError::invalid_state("no surface tag", format!("word {head}, tag bin {tag}"))
        })?;
        let token = self.sent.token(head);
        Ok(Label {
            position: head,
            word: token.word().to_string(),
            tag: self.vocab.tag(bin_tag.tag).unwrap_or_default().to_string(),
            word_id: self.chart.word(head),
            tag_id: bin_tag.tag,
        })
    }

    fn extract_binary(&self, start: usize, end: usize, head: usize, tag: usize) -> Result<DepTree> {
        let label = self.label(head, tag)?;
        if end - start == 1 {
            return Ok(DepTree::Leaf(label));
        }
        let Some(found) = self.find_split(start, end, head, tag) else {
            let target = self.chart.i_score(start, end, head, tag);
            log::error!(
                "no split reproduces the inside score {target} of [{start}, {end}) headed by {head}"
            );
            return Err(DepchartError::invalid_state(
                "backtrace failed",
                format!("no split reproduces the inside score {target} of [{start}, {end}) headed by {head}"),
            ));
        };
        let Split {
            split,
            arg,
            arg_tag,
        } = found;
        let children = if head < split {
            vec![
                self.extract_binary(start, split, head, tag)?,
                self.extract_binary(split, end, arg, arg_tag)?,
            ]
        } else {
            vec![
                self.extract_binary(start, split, arg, arg_tag)?,
                self.extract_binary(split, end, head, tag)?,
            ]
        };
        Ok(DepTree::Branch(label, children))
    }

    fn find_split(&self, start: usize, end: usize, head: usize, tag: usize) -> Option<Split> {
        let chart = self.chart;
        let target = f64::from(chart.i_score(start, end, head, tag));
        for split in start + 1..end {
            let bin = chart.bin_distance(head, split);
            let args = if head < split { split..end } else { start..split };
            for arg in args {
                for arg_tag in 0..chart.num_tag_bins() {
                    if !chart.has_tag(arg, arg_tag) {
                        continue;
                    }
                    let dep = f64::from(chart.head_score(bin, head, tag, arg, arg_tag));
                    let score = if head < split {
                        f64::from(chart.i_score(start, split, head, tag))
                            + f64::from(chart.i_score(split, end, arg, arg_tag))
                            + dep
                            + f64::from(chart.head_stop(arg, arg_tag, split))
                            + f64::from(chart.head_stop(arg, arg_tag, end))
                    } else {
                        f64::from(chart.i_score(start, split, arg, arg_tag))
                            + f64::from(chart.i_score(split, end, head, tag))
                            + dep
                            + f64::from(chart.head_stop(arg, arg_tag, start))
                            + f64::from(chart.head_stop(arg, arg_tag, split))
                    };
                    if score > f64::NEG_INFINITY && matches(score, target) {
                        return Some(Split {
                            split,
                            arg,
                            arg_tag,
                        });
                    }
                }
            }
        }
        None
    }
}
