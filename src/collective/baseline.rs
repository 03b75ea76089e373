use crate::buffer::PingPong;
use crate::collective::helpers::{collective_gather_all, observe, RoundObserver};
use crate::comm::Communicator;
use crate::error::{MergatherError, Result};
use crate::merge::merge_runs;
use crate::types::Element;

/// Baseline sorted allgather: one full gather, then a local merge-sort tree.
///
/// After the gather, `out` holds every rank's run contiguously in rank order
/// (locally sorted blocks only). Adjacent same-size blocks are then merged
/// pairwise into the alternate buffer, block size doubling each round, until
/// a single sorted block of `P·N` elements remains. Uses one communication
/// round but moves all data before any merging starts, so it serves as the
/// reference point the O(log P) schedulers are measured against.
pub async fn baseline_merge<T, C>(comm: &C, local: &[T], out: &mut [T]) -> Result<()>
where
    T: Element,
    C: Communicator<T> + ?Sized,
{
    baseline_merge_observed(comm, local, out, None).await
}

/// [`baseline_merge`] with a per-round observer hook.
pub async fn baseline_merge_observed<T, C>(
    comm: &C,
    local: &[T],
    out: &mut [T],
    observer: Option<&dyn RoundObserver<T>>,
) -> Result<()>
where
    T: Element,
    C: Communicator<T> + ?Sized,
{
    let p = comm.world_size() as usize;
    let n = local.len();
    let total = n * p;

    if out.len() != total {
        return Err(MergatherError::BufferSizeMismatch {
            expected: total,
            actual: out.len(),
        });
    }
    if p == 1 {
        out.copy_from_slice(local);
        return Ok(());
    }
    if n == 0 {
        return Ok(());
    }

    collective_gather_all(comm, "baseline", local, out).await?;

    let mut scratch = out.to_vec();
    let mut pair = PingPong::new(out, &mut scratch);

    let mut block = n;
    let mut round = 0;
    while block < total {
        let (cur, other) = pair.parts();

        let mut left = 0;
        while left < total {
            let mid = left + block;
            if mid >= total {
                // Odd trailing block with no right sibling: carry through.
                other[left..total].copy_from_slice(&cur[left..total]);
                break;
            }
            // The right block may be short near the buffer end.
            let right_end = usize::min(mid + block, total);
            merge_runs(&cur[left..mid], &cur[mid..right_end], &mut other[left..right_end]);
            left = right_end;
        }

        pair.swap();
        observe(observer, round, pair.current());
        round += 1;
        block *= 2;
    }

    // Roles are not parity-seeded here; one trailing copy if the result
    // ended in scratch.
    pair.commit_to_primary();
    Ok(())
}
