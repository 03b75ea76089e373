use crate::buffer::PingPong;
use crate::collective::helpers::{ceil_log2, collective_exchange, observe, RoundObserver};
use crate::comm::Communicator;
use crate::error::{MergatherError, Result};
use crate::merge::merge_runs;
use crate::types::Element;

/// Circulant sorted allgather: doubling/folding exchange over
/// `q = ⌈log2 P⌉` rounds, driven by a precomputed skip sequence.
///
/// The skip table is built backwards from `skip[q] = P` by ceiling halving,
/// so `skip[k]` is the partner distance of round `k` and
/// `eps = skip[k+1] mod 2` tells whether the round is a clean doubling step
/// (`eps == 1`) or a fold that must drop one block to keep the window sizes
/// aligned (`eps == 0`). The rank's own run is deliberately left out of the
/// fold rounds and reconciled by one final local merge, which is how the
/// non-power-of-two remainder is absorbed without a side buffer.
pub async fn circulant_merge<T, C>(comm: &C, local: &[T], out: &mut [T]) -> Result<()>
where
    T: Element,
    C: Communicator<T> + ?Sized,
{
    circulant_merge_observed(comm, local, out, None).await
}

/// [`circulant_merge`] with a per-round observer hook.
pub async fn circulant_merge_observed<T, C>(
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

    let q = ceil_log2(world);

    // skip[q] = P, halving (rounded up) toward skip[0] = 1.
    let mut skip = vec![0u32; q as usize + 1];
    skip[q as usize] = world;
    for k in (0..q as usize).rev() {
        skip[k] = (skip[k + 1] + 1) / 2;
    }

    let mut scratch = out.to_vec();
    let mut recv_buf = out.to_vec();

    // One swap per round plus one after the reconciling merge.
    let mut pair = PingPong::for_rounds(out, &mut scratch, q + 1);

    for k in 0..q as usize {
        let sk = skip[k];
        let eps = skip[k + 1] % 2;
        let dist = sk - eps;
        let cur_len = dist as usize * n;
        let send_peer = (rank + world - dist) % world;
        let recv_peer = (rank + dist) % world;

        if eps == 1 {
            // Clean doubling: both sides hold equal windows.
            let (cur, other) = pair.parts();
            collective_exchange(
                comm,
                "circulant",
                &cur[..cur_len],
                send_peer,
                &mut recv_buf[..cur_len],
                recv_peer,
            )
            .await?;
            merge_runs(&cur[..cur_len], &recv_buf[..cur_len], &mut other[..2 * cur_len]);
            pair.swap();
            observe(observer, k, &pair.current()[..2 * cur_len]);
        } else if k == 0 {
            // Bootstrap: ship the untouched original run; nothing to merge
            // with yet, the received run becomes the working run.
            collective_exchange(
                comm,
                "circulant",
                local,
                send_peer,
                &mut recv_buf[..cur_len],
                recv_peer,
            )
            .await?;
            let (_, other) = pair.parts();
            other[..cur_len].copy_from_slice(&recv_buf[..cur_len]);
            pair.swap();
            observe(observer, k, &pair.current()[..cur_len]);
        } else {
            // Fold: graft the original run onto the working run (minus its
            // last block) to build this round's payload, then merge the
            // working run with what the partner built the same way.
            let (cur, other) = pair.parts();
            merge_runs(&cur[..cur_len - n], local, &mut other[..cur_len]);
            collective_exchange(
                comm,
                "circulant",
                &other[..cur_len],
                send_peer,
                &mut recv_buf[..cur_len],
                recv_peer,
            )
            .await?;
            merge_runs(
                &cur[..cur_len - n],
                &recv_buf[..cur_len],
                &mut other[..2 * cur_len - n],
            );
            pair.swap();
            observe(observer, k, &pair.current()[..2 * cur_len - n]);
        }
    }

    // Every fold excluded the rank's own run; reconcile it now.
    let (cur, other) = pair.parts();
    merge_runs(&cur[..total - n], local, &mut other[..total]);
    pair.swap();
    observe(observer, q as usize, pair.current());

    Ok(())
}
