use crate::comm::Communicator;
use crate::error::{MergatherError, Result};
use crate::types::{Element, Rank};

/// Integer floor of log2(n). `n` must be positive.
pub(crate) fn floor_log2(n: u32) -> u32 {
    debug_assert!(n > 0);
    u32::BITS - 1 - n.leading_zeros()
}

/// Integer ceiling of log2(n). Returns 0 for n <= 1.
pub(crate) fn ceil_log2(n: u32) -> u32 {
    if n <= 1 {
        return 0;
    }
    // For n > 1: ceil(log2(n)) = 32 - (n-1).leading_zeros()
    u32::BITS - (n - 1).leading_zeros()
}

/// Which main rounds of the dissemination scheduler must carry extra blocks
/// for the `l = P - 2^⌊log2 P⌋` ranks outside the embedded hypercube.
///
/// Decomposes `l` by its own largest power of two: each step records
/// `(round, extra)` where `round = ⌊log2 R⌋` of the *current* remainder and
/// `extra = R - 2^round` is the remainder carried into the next step. The
/// list is returned in increasing round order; the first entry always has
/// `extra == 0` (the decomposition terminates on an exact power of two) and
/// marks the round that checkpoints the side channel.
///
/// Depends only on `world_size`, so every rank derives the identical
/// schedule without coordination.
pub(crate) fn remainder_schedule(world_size: u32) -> Vec<(u32, u32)> {
    let l = world_size - (1 << floor_log2(world_size));

    let mut pairs = Vec::new();
    let mut r = l;
    while r > 0 {
        let round = floor_log2(r);
        let extra = r - (1 << round);
        pairs.push((round, extra));
        r = extra;
    }
    pairs.reverse();
    pairs
}

/// Observer invoked after each merge round with the round index and the
/// round's merged working prefix. Replaces compile-time trace branches;
/// intended for debugging and round-by-round inspection in tests.
pub trait RoundObserver<T: Element>: Send + Sync {
    fn on_round(&self, round: usize, merged: &[T]);
}

pub(crate) fn observe<T: Element>(
    observer: Option<&dyn RoundObserver<T>>,
    round: usize,
    merged: &[T],
) {
    if let Some(obs) = observer {
        obs.on_round(round, merged);
    }
}

/// Run one exchange, wrapping any transport error as `CollectiveFailed` for
/// the named scheduler.
pub(crate) async fn collective_exchange<T, C>(
    comm: &C,
    operation: &'static str,
    send: &[T],
    send_peer: Rank,
    recv: &mut [T],
    recv_peer: Rank,
) -> Result<()>
where
    T: Element,
    C: Communicator<T> + ?Sized,
{
    comm.exchange(send, send_peer, recv, recv_peer)
        .await
        .map_err(|e| MergatherError::CollectiveFailed {
            operation,
            rank: comm.rank(),
            reason: e.to_string(),
        })
}

/// Run the group-wide gather, wrapping any transport error as
/// `CollectiveFailed` for the named scheduler.
pub(crate) async fn collective_gather_all<T, C>(
    comm: &C,
    operation: &'static str,
    send: &[T],
    recv: &mut [T],
) -> Result<()>
where
    T: Element,
    C: Communicator<T> + ?Sized,
{
    comm.gather_all(send, recv)
        .await
        .map_err(|e| MergatherError::CollectiveFailed {
            operation,
            rank: comm.rank(),
            reason: e.to_string(),
        })
}
