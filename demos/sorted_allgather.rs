//! Sorted allgather across 5 ranks (a non-power-of-two group).
//!
//! Each rank starts with its own locally sorted run. After the call, every
//! rank holds the globally sorted concatenation of all runs.
//!
//! ```bash
//! MERGATHER_ALGORITHM=circulant cargo run --example sorted_allgather
//! ```

use std::sync::Arc;

use mergather::{sorted_allgather, LocalComm, MergatherConfig};

#[tokio::main]
async fn main() -> mergather::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let world_size = 5u32;
    let count = 3usize;
    let cfg = Arc::new(MergatherConfig::from_env());
    println!("algorithm: {}", cfg.algorithm);

    let comms: Vec<Arc<LocalComm<i64>>> = LocalComm::group(world_size)
        .into_iter()
        .map(Arc::new)
        .collect();

    // Rank r holds [r, r+5, r+10]: ranks interleave across the value range.
    let mut handles = Vec::new();
    for comm in &comms {
        let comm = Arc::clone(comm);
        let cfg = Arc::clone(&cfg);
        handles.push(tokio::spawn(async move {
            let rank = i64::from(comm.rank());
            let local: Vec<i64> = (0..count as i64).map(|i| rank + 5 * i).collect();
            let mut out = vec![0i64; count * world_size as usize];

            sorted_allgather(&*comm, &cfg, &local, &mut out).await?;
            mergather::Result::Ok((comm.rank(), local, out))
        }));
    }

    for h in handles {
        let (rank, local, out) = h.await.expect("rank task panicked")?;
        println!("rank {rank}: {local:?} -> {out:?}");
    }
    // Output (all ranks identical):
    // rank 0: [0, 5, 10] -> [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14]
    // ...

    Ok(())
}
