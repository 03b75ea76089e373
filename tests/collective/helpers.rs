use std::sync::Arc;

use mergather::{Element, LocalComm};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Helper: run a collective operation across P ranks concurrently, one
/// tokio task per rank. Keeps all communicators alive until every task
/// completes.
pub async fn run_group<T, F, Fut>(world_size: u32, f: F)
where
    T: Element,
    F: Fn(Arc<LocalComm<T>>) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let comms: Vec<Arc<LocalComm<T>>> = LocalComm::group(world_size)
        .into_iter()
        .map(Arc::new)
        .collect();

    let f = Arc::new(f);
    let mut handles = Vec::new();
    for comm in &comms {
        let comm = Arc::clone(comm);
        let f = Arc::clone(&f);
        handles.push(tokio::spawn(async move { f(comm).await }));
    }
    for h in handles {
        h.await.unwrap();
    }
}

/// Deterministic locally sorted run for `rank`. Any rank can regenerate any
/// other rank's run, so every task can build the reference result locally.
pub fn random_run(seed: u64, rank: u32, n: usize) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(seed ^ ((u64::from(rank) + 1) << 32));
    let mut run: Vec<i32> = (0..n).map(|_| rng.gen_range(-1_000..1_000)).collect();
    run.sort_unstable();
    run
}

/// Brute-force reference: the sorted multiset union of every rank's run.
pub fn reference(seed: u64, world_size: u32, n: usize) -> Vec<i32> {
    let mut all: Vec<i32> = (0..world_size)
        .flat_map(|r| random_run(seed, r, n))
        .collect();
    all.sort_unstable();
    all
}
