//! Transport seam between the merge schedulers and the message-passing
//! layer.
//!
//! The schedulers only ever talk to a [`Communicator`]: group identity, one
//! group-wide gather, and one atomic two-party exchange. Real deployments
//! implement the trait over their transport of choice; [`LocalComm`] is the
//! in-process implementation used by tests and demos.

mod local;

pub use local::LocalComm;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Element, Rank};

/// Blocking point-to-point and gather operations over a fixed group of P
/// processes.
///
/// All P ranks participate in every call with matching counts; there is no
/// partial-success mode. A failed exchange leaves the group's buffers in an
/// inconsistent state across ranks, so transport errors are fatal for the
/// whole collective call and are never retried.
#[async_trait]
pub trait Communicator<T: Element>: Send + Sync {
    /// This process's rank within the group (0-indexed). Static for the
    /// lifetime of the group.
    fn rank(&self) -> Rank;

    /// Total number of ranks in the group.
    fn world_size(&self) -> u32;

    /// Gather `send` from every rank into `recv`, laid out contiguously in
    /// ascending rank order. `recv.len()` must equal
    /// `send.len() * world_size`.
    async fn gather_all(&self, send: &[T], recv: &mut [T]) -> Result<()>;

    /// Atomic two-sided exchange: send `send` to `send_peer` while receiving
    /// exactly `recv.len()` elements from `recv_peer`. The two peers may
    /// differ. Completes only when both sides have completed; must not be
    /// implemented as an independent send followed by a receive, or rings of
    /// simultaneously exchanging ranks can deadlock.
    async fn exchange(
        &self,
        send: &[T],
        send_peer: Rank,
        recv: &mut [T],
        recv_peer: Rank,
    ) -> Result<()>;
}
