use crate::errors::Result;
use crate::num::{Score, is_feasible};
use crate::parser::cancel::CancelToken;
use crate::parser::chart::Chart;

/// Fills the outside half-triangles top-down from the goal cell.
///
/// Every attachment the inside pass considered passes the outside score of
/// the extended half to its three parts: the shorter head half and both
/// halves of the argument.
pub(crate) fn fill(chart: &mut Chart, goal_tag: usize, cancel: &CancelToken) -> Result<()> {
    let n = chart.len();
    let root = n - 1;
    if !chart.has_tag(root, goal_tag) {
        return Ok(());
    }
    chart.set_outside(root, goal_tag, 0, 0.0);
    chart.set_outside(root, goal_tag, n, 0.0);
    for diff in (2..=n).rev() {
        cancel.check()?;
        for start in 0..=n - diff {
            let end = start + diff;
            spread_left(chart, start, end);
            spread_right(chart, start, end);
        }
    }
    Ok(())
}

fn spread_left(chart: &mut Chart, start: usize, end: usize) {
    let num_tags = chart.num_tag_bins();
    let end_head = end - 1;
    for end_tag in 0..num_tags {
        if !chart.has_tag(end_head, end_tag) {
            continue;
        }
        let out = chart.outside(end_head, end_tag, start);
        if !is_feasible(out) {
            continue;
        }
        for arg_head in start..end_head {
            for arg_tag in 0..num_tags {
                if !chart.has_tag(arg_head, arg_tag) {
                    continue;
                }
                let arg_left = chart.inside(arg_head, arg_tag, start);
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
                    let sub = out + dep + stop_left + chart.head_stop(arg_head, arg_tag, split);
                    if !is_feasible(sub) {
                        continue;
                    }
                    let head_half = chart.inside(end_head, end_tag, split);
                    let arg_right = chart.inside(arg_head, arg_tag, split);
                    raise_parts(chart, sub, [
                        (end_head, end_tag, split, arg_left, arg_right),
                        (arg_head, arg_tag, split, arg_left, head_half),
                        (arg_head, arg_tag, start, arg_right, head_half),
                    ]);
                }
            }
        }
    }
}

fn spread_right(chart: &mut Chart, start: usize, end: usize) {
    let num_tags = chart.num_tag_bins();
    for start_tag in 0..num_tags {
        if !chart.has_tag(start, start_tag) {
            continue;
        }
        let out = chart.outside(start, start_tag, end);
        if !is_feasible(out) {
            continue;
        }
        for arg_head in start + 1..end {
            for arg_tag in 0..num_tags {
                if !chart.has_tag(arg_head, arg_tag) {
                    continue;
                }
                let arg_right = chart.inside(arg_head, arg_tag, end);
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
                    let sub = out + dep + chart.head_stop(arg_head, arg_tag, split) + stop_right;
                    if !is_feasible(sub) {
                        continue;
                    }
                    let head_half = chart.inside(start, start_tag, split);
                    let arg_left = chart.inside(arg_head, arg_tag, split);
                    raise_parts(chart, sub, [
                        (start, start_tag, split, arg_left, arg_right),
                        (arg_head, arg_tag, split, head_half, arg_right),
                        (arg_head, arg_tag, end, head_half, arg_left),
                    ]);
                }
            }
        }
    }
}

/// Raises the outside score of each `(head, tag, loc)` half by `sub` plus the
/// inside scores of the two other parts, skipping halves with an infeasible part.
#[inline(always)]
fn raise_parts(chart: &mut Chart, sub: Score, parts: [(usize, usize, usize, Score, Score); 3]) {
    for (head, tag, loc, x, y) in parts {
        if is_feasible(x) && is_feasible(y) {
            chart.raise_outside(head, tag, loc, sub + x + y);
        }
    }
}
