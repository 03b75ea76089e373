use mergather::{
    baseline_merge, circulant_merge, dissemination_merge, sorted_allgather, Algorithm, LocalComm,
    MergatherConfig, MergatherError,
};

use super::helpers::{random_run, run_group};

#[tokio::test]
async fn test_all_algorithms_agree() {
    // Bit-identical outputs for the same (P, N, inputs), across power-of-two
    // and non-power-of-two group sizes.
    for world in 2..=9u32 {
        run_group(world, move |comm| async move {
            let n = 6;
            let local = random_run(u64::from(world), comm.rank(), n);
            let total = n * world as usize;

            let mut base = vec![0i32; total];
            baseline_merge(&*comm, &local, &mut base).await.unwrap();

            let mut diss = vec![0i32; total];
            dissemination_merge(&*comm, &local, &mut diss).await.unwrap();

            let mut circ = vec![0i32; total];
            circulant_merge(&*comm, &local, &mut circ).await.unwrap();

            assert_eq!(base, diss, "baseline vs dissemination at P = {world}");
            assert_eq!(base, circ, "baseline vs circulant at P = {world}");
        })
        .await;
    }
}

#[tokio::test]
async fn test_dispatch_selects_algorithm() {
    run_group(3, |comm| async move {
        let rank = comm.rank();
        let local = [rank as i32];
        for algorithm in [
            Algorithm::Baseline,
            Algorithm::Dissemination,
            Algorithm::Circulant,
        ] {
            let cfg = MergatherConfig { algorithm };
            let mut out = [0i32; 3];
            sorted_allgather(&*comm, &cfg, &local, &mut out)
                .await
                .unwrap();
            assert_eq!(out, [0, 1, 2], "{algorithm} dispatch failed");
        }
    })
    .await;
}

#[tokio::test]
async fn test_wider_element_type() {
    run_group(5, |comm| async move {
        let r = u64::from(comm.rank());
        let local = [r * 1_000_000_007, r * 1_000_000_007 + 5];
        let mut out = [0u64; 10];
        dissemination_merge(&*comm, &local, &mut out).await.unwrap();
        assert!(out.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(out[0], 0);
        assert_eq!(out[9], 4 * 1_000_000_007 + 5);
    })
    .await;
}

#[tokio::test]
async fn test_vanished_rank_fails_collective() {
    // Rank 2 never participates; the survivors must error out, not hang.
    let mut comms = LocalComm::<i32>::group(3);
    comms.truncate(2);

    let mut handles = Vec::new();
    for comm in comms {
        handles.push(tokio::spawn(async move {
            let local = [comm.rank() as i32];
            let mut out = [0i32; 3];
            dissemination_merge(&comm, &local, &mut out).await
        }));
    }
    for h in handles {
        let err = h.await.unwrap().unwrap_err();
        assert!(matches!(
            err,
            MergatherError::CollectiveFailed {
                operation: "dissemination",
                ..
            }
        ));
    }
}
