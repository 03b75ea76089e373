//! In-process communicator backed by per-pair channels.
//!
//! Every rank runs as a tokio task in the same process; each ordered rank
//! pair gets its own unbounded channel. Sends never block, so the
//! send-then-receive inside [`exchange`](LocalComm::exchange) cannot
//! deadlock even when a whole ring of ranks exchanges simultaneously, which
//! makes the pair of operations behave as one atomic step.
//!
//! This is the transport used by the integration tests and demos — a real
//! deployment implements [`Communicator`] over its own fabric.

use async_trait::async_trait;
use futures::future::try_join_all;
use tokio::sync::{mpsc, Mutex};

use crate::comm::Communicator;
use crate::error::{MergatherError, Result};
use crate::types::{Element, Rank};

/// One rank's endpoint of an in-process group.
pub struct LocalComm<T: Element> {
    rank: Rank,
    world_size: u32,
    /// Sender to each destination rank, indexed by destination.
    outboxes: Vec<mpsc::UnboundedSender<Vec<T>>>,
    /// Receiver from each source rank, indexed by source. Locked per
    /// receive; messages from one source arrive in send order, which keeps
    /// round matching deterministic.
    inboxes: Vec<Mutex<mpsc::UnboundedReceiver<Vec<T>>>>,
}

impl<T: Element> LocalComm<T> {
    /// This endpoint's rank within the group (0-indexed).
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Total number of ranks in the group.
    pub fn world_size(&self) -> u32 {
        self.world_size
    }

    /// Create a fully wired group of `world_size` communicators, one per
    /// rank in rank order.
    ///
    /// Dropping any member closes its outgoing channels; collectives on the
    /// remaining members then fail with a transport error rather than hang.
    pub fn group(world_size: u32) -> Vec<Self> {
        let p = world_size as usize;
        tracing::debug!(world_size, "creating local group");

        // txs[src][dst] / rxs[src][dst] for every ordered pair.
        let mut txs: Vec<Vec<mpsc::UnboundedSender<Vec<T>>>> = Vec::with_capacity(p);
        let mut rxs: Vec<Vec<Option<mpsc::UnboundedReceiver<Vec<T>>>>> = Vec::with_capacity(p);
        for _ in 0..p {
            let mut tx_row = Vec::with_capacity(p);
            let mut rx_row = Vec::with_capacity(p);
            for _ in 0..p {
                let (tx, rx) = mpsc::unbounded_channel();
                tx_row.push(tx);
                rx_row.push(Some(rx));
            }
            txs.push(tx_row);
            rxs.push(rx_row);
        }

        (0..p)
            .map(|rank| LocalComm {
                rank: rank as Rank,
                world_size,
                outboxes: (0..p).map(|dst| txs[rank][dst].clone()).collect(),
                inboxes: (0..p)
                    .map(|src| {
                        Mutex::new(rxs[src][rank].take().expect("each endpoint taken once"))
                    })
                    .collect(),
            })
            .collect()
    }

    fn check_peer(&self, peer: Rank) -> Result<usize> {
        if peer >= self.world_size {
            return Err(MergatherError::InvalidRank {
                rank: peer,
                world_size: self.world_size,
            });
        }
        Ok(peer as usize)
    }

    /// Receive the next message from `src` and copy it into `recv`,
    /// checking the delivered length.
    async fn recv_from(&self, src: usize, recv: &mut [T]) -> Result<()> {
        let mut inbox = self.inboxes[src].lock().await;
        let msg = inbox
            .recv()
            .await
            .ok_or_else(|| MergatherError::transport(format!("rank {src} disconnected")))?;
        if msg.len() != recv.len() {
            return Err(MergatherError::BufferSizeMismatch {
                expected: recv.len(),
                actual: msg.len(),
            });
        }
        recv.copy_from_slice(&msg);
        Ok(())
    }
}

#[async_trait]
impl<T: Element> Communicator<T> for LocalComm<T> {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn world_size(&self) -> u32 {
        self.world_size
    }

    async fn gather_all(&self, send: &[T], recv: &mut [T]) -> Result<()> {
        let p = self.world_size as usize;
        let n = send.len();
        if recv.len() != n * p {
            return Err(MergatherError::BufferSizeMismatch {
                expected: n * p,
                actual: recv.len(),
            });
        }

        let rank = self.rank as usize;
        recv[rank * n..(rank + 1) * n].copy_from_slice(send);
        if p == 1 || n == 0 {
            return Ok(());
        }

        tracing::trace!(rank = self.rank, count = n, "gather_all");

        // Unbounded sends complete immediately; every rank posts all of its
        // sends before waiting on any receive.
        for dst in (0..p).filter(|&d| d != rank) {
            self.outboxes[dst]
                .send(send.to_vec())
                .map_err(|_| MergatherError::transport(format!("rank {dst} disconnected")))?;
        }

        let futs: Vec<_> = recv
            .chunks_mut(n)
            .enumerate()
            .filter(|(src, _)| *src != rank)
            .map(|(src, chunk)| self.recv_from(src, chunk))
            .collect();
        try_join_all(futs).await?;
        Ok(())
    }

    async fn exchange(
        &self,
        send: &[T],
        send_peer: Rank,
        recv: &mut [T],
        recv_peer: Rank,
    ) -> Result<()> {
        let dst = self.check_peer(send_peer)?;
        let src = self.check_peer(recv_peer)?;

        tracing::trace!(
            rank = self.rank,
            send_peer,
            recv_peer,
            send_count = send.len(),
            recv_count = recv.len(),
            "exchange"
        );

        self.outboxes[dst]
            .send(send.to_vec())
            .map_err(|_| MergatherError::transport(format!("rank {dst} disconnected")))?;

        self.recv_from(src, recv).await
    }
}
