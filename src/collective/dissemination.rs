use crate::buffer::PingPong;
use crate::collective::helpers::{
    ceil_log2, collective_exchange, floor_log2, observe, remainder_schedule, RoundObserver,
};
use crate::comm::Communicator;
use crate::error::{MergatherError, Result};
use crate::merge::merge_runs;
use crate::types::Element;

/// Dissemination sorted allgather: hypercube exchange over `⌊log2 P⌋`
/// rounds with doubling partner distance, plus one correction round when P
/// is not a power of two.
///
/// Round `k` sends the working run to `(rank − 2^k) mod P` and receives from
/// `(rank + 2^k) mod P`, merging the two equal-size runs so the working run
/// doubles every round. The `L = P − 2^⌊log2 P⌋` ranks outside the embedded
/// hypercube are covered by a side `partial` buffer: the
/// [`remainder_schedule`] pre-pass decides in which rounds the partial run
/// is appended to the outgoing payload and re-merged, and a final exchange
/// at distance `2^⌊log2 P⌋` folds the accumulated side channel back in.
///
/// The invariant that makes this correct: at every round boundary each
/// contributed element lives in exactly one of the working run and the
/// partial run — never both, never neither.
pub async fn dissemination_merge<T, C>(comm: &C, local: &[T], out: &mut [T]) -> Result<()>
where
    T: Element,
    C: Communicator<T> + ?Sized,
{
    dissemination_merge_observed(comm, local, out, None).await
}

/// [`dissemination_merge`] with a per-round observer hook.
pub async fn dissemination_merge_observed<T, C>(
    comm: &C,
    local: &[T],
    out: &mut [T],
    observer: Option<&dyn RoundObserver<T>>,
) -> Result<()>
where
    T: Element,
    C: Communicator<T> + ?Sized,
{
    let world = comm.world_size();
    let rank = comm.rank();
    let p = world as usize;
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

    let q = floor_log2(world);
    let l = world - (1 << q);
    let schedule = remainder_schedule(world);

    // One swap per main round plus one for the correction round; seeding the
    // roles by that parity lands the final merge in `out` with no copy.
    let total_rounds = ceil_log2(world);

    let mut scratch = out.to_vec();
    let mut recv_buf = out.to_vec();
    // Side channel peaks at L·N < ⌊P·N/2⌋ + 1 elements.
    let mut partial = out[..total / 2 + 1].to_vec();

    let mut pair = PingPong::for_rounds(out, &mut scratch, total_rounds);
    pair.current_mut()[..n].copy_from_slice(local);

    let mut cur_len = n;
    let mut partial_len = 0usize;
    let mut sched_idx = 0usize;

    for k in 0..q {
        let s = 1u32 << k;
        let send_peer = (rank + world - s) % world;
        let recv_peer = (rank + s) % world;

        // Does this round ship extra blocks for the remainder ranks?
        let mut extra = None;
        if let Some(&(round, blocks)) = schedule.get(sched_idx) {
            if round == k {
                extra = Some(blocks);
                sched_idx += 1;
            }
        }

        let pre_len = cur_len;

        // Extra blocks ride on the tail of the outgoing payload, unmerged.
        if matches!(extra, Some(e) if e > 0) && partial_len > 0 {
            let cur = pair.current_mut();
            cur[pre_len..pre_len + partial_len].copy_from_slice(&partial[..partial_len]);
            cur_len = pre_len + partial_len;
        }

        let (cur, other) = pair.parts();
        collective_exchange(
            comm,
            "dissemination",
            &cur[..cur_len],
            send_peer,
            &mut recv_buf[..cur_len],
            recv_peer,
        )
        .await?;

        // Normal doubling growth: both pre-extension runs cover disjoint
        // rank windows of the same width.
        merge_runs(&cur[..pre_len], &recv_buf[..pre_len], &mut other[..2 * pre_len]);

        match extra {
            Some(e) if e > 0 => {
                // The received tail is the partner's side channel; fold our
                // pre-extension run into it so the side channel stays sorted
                // on its own.
                merge_runs(
                    &cur[..pre_len],
                    &recv_buf[pre_len..pre_len + partial_len],
                    &mut partial[..pre_len + partial_len],
                );
                partial_len += pre_len;
            }
            Some(_) => {
                // First checkpoint of the side channel.
                partial[..pre_len].copy_from_slice(&cur[..pre_len]);
                partial_len += pre_len;
            }
            None => {}
        }

        pair.swap();
        cur_len = usize::min(2 * pre_len, total);
        observe(observer, k as usize, &pair.current()[..cur_len]);
    }

    // Correction round: the accumulated side channel travels once more, at
    // distance 2^q, to fold in the remainder ranks' contributions.
    if l != 0 {
        let s = 1u32 << q;
        let send_peer = (rank + world - s) % world;
        let recv_peer = (rank + s) % world;

        collective_exchange(
            comm,
            "dissemination",
            &partial[..partial_len],
            send_peer,
            &mut recv_buf[..partial_len],
            recv_peer,
        )
        .await?;

        let (cur, other) = pair.parts();
        merge_runs(
            &cur[..cur_len],
            &recv_buf[..partial_len],
            &mut other[..cur_len + partial_len],
        );
        pair.swap();
        cur_len += partial_len;
        observe(observer, q as usize, &pair.current()[..cur_len]);
    }

    debug_assert_eq!(cur_len, total);
    Ok(())
}
