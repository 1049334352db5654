use crate::errors::Result;
use crate::num::is_feasible;
use crate::parser::cancel::CancelToken;
use crate::parser::chart::Chart;

/// Derives the feasibility flags from the inside and outside scores.
///
/// `(head, tag)` is possible at both edges of `[start, end)` iff both the
/// inside and the outside sums of the span are feasible.
pub(crate) fn mark(chart: &mut Chart, cancel: &CancelToken) -> Result<()> {
    cancel.check()?;
    let n = chart.len();
    for head in 0..n {
        for tag in 0..chart.num_tag_bins() {
            if !chart.has_tag(head, tag) {
                continue;
            }
            for start in 0..=head {
                if !is_feasible(chart.inside(head, tag, start))
                    || !is_feasible(chart.outside(head, tag, start))
                {
                    continue;
                }
                for end in head + 1..=n {
                    if is_feasible(chart.i_score(start, end, head, tag))
                        && is_feasible(chart.o_score(start, end, head, tag))
                    {
                        chart.mark_possible(start, end, head, tag);
                    }
                }
            }
        }
    }
    Ok(())
}
