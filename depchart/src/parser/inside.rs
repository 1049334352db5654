use crate::errors::Result;
use crate::num::{NEG_INF, is_feasible};
use crate::parser::cancel::CancelToken;
use crate::parser::chart::Chart;

/// Fills the inside half-triangles bottom-up by span width.
///
/// For each span `[start, end)`, the left half of the word at `end - 1` takes
/// its best argument to the left, and the right half of the word at `start`
/// its best argument to the right. Ties keep the first candidate enumerated.
pub(crate) fn fill(chart: &mut Chart, cancel: &CancelToken) -> Result<()> {
    let n = chart.len();
    for diff in 2..=n {
        cancel.check()?;
        for start in 0..=n - diff {
            let end = start + diff;
            extend_left(chart, start, end);
            extend_right(chart, start, end);
        }
    }
    Ok(())
}

fn extend_left(chart: &mut Chart, start: usize, end: usize) {
    let num_tags = chart.num_tag_bins();
    let end_head = end - 1;
    for end_tag in 0..num_tags {
        if !chart.has_tag(end_head, end_tag) {
            continue;
        }
        let mut best = NEG_INF;
        for arg_head in start..end_head {
            for arg_tag in 0..num_tags {
                if !chart.has_tag(arg_head, arg_tag) {
                    continue;
                }
                let arg_left = chart.inside(arg_head, arg_tag, start);
                if !is_feasible(arg_left) {
                    continue;
                }
                let stop_left = chart.head_stop(arg_head, arg_tag, start);
                if !is_feasible(stop_left) {
                    continue;
                }
                for split in arg_head + 1..end {
                    let dep = chart.head_score(
                        chart.bin_distance(end_head, split),
                        end_head,
                        end_tag,
                        arg_head,
                        arg_tag,
                    );
                    if !is_feasible(dep) {
                        continue;
                    }
                    let score = chart.inside(end_head, end_tag, split)
                        + arg_left
                        + chart.inside(arg_head, arg_tag, split)
                        + dep
                        + stop_left
                        + chart.head_stop(arg_head, arg_tag, split);
                    if score > best {
                        best = score;
                    }
                }
            }
        }
        chart.raise_inside(end_head, end_tag, start, best);
    }
}

fn extend_right(chart: &mut Chart, start: usize, end: usize) {
    let num_tags = chart.num_tag_bins();
    for start_tag in 0..num_tags {
        if !chart.has_tag(start, start_tag) {
            continue;
        }
        let mut best = NEG_INF;
        for arg_head in start + 1..end {
            for arg_tag in 0..num_tags {
                if !chart.has_tag(arg_head, arg_tag) {
                    continue;
                }
                let arg_right = chart.inside(arg_head, arg_tag, end);
                if !is_feasible(arg_right) {
                    continue;
                }
                let stop_right = chart.head_stop(arg_head, arg_tag, end);
                if !is_feasible(stop_right) {
                    continue;
                }
                for split in start + 1..=arg_head {
                    let dep = chart.head_score(
                        chart.bin_distance(start, split),
                        start,
                        start_tag,
                        arg_head,
                        arg_tag,
                    );
                    if !is_feasible(dep) {
                        continue;
                    }
                    let score = chart.inside(start, start_tag, split)
                        + chart.inside(arg_head, arg_tag, split)
                        + arg_right
                        + dep
                        + stop_right
                        + chart.head_stop(arg_head, arg_tag, split);
                    if score > best {
                        best = score;
                    }
                }
            }
        }
        chart.raise_inside(start, start_tag, end, best);
    }
}
