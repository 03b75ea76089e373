use mergather::{baseline_merge, MergatherError};

use super::helpers::{random_run, reference, run_group};

#[tokio::test]
async fn test_baseline_4_ranks_interleaved() {
    // Rank r holds [r, r+4]; the union is 0..8 on every rank.
    run_group(4, |comm| async move {
        let rank = comm.rank();
        let local = [rank as i32, rank as i32 + 4];
        let mut out = [0i32; 8];
        baseline_merge(&*comm, &local, &mut out).await.unwrap();
        assert_eq!(out, [0, 1, 2, 3, 4, 5, 6, 7], "rank {rank} baseline failed");
    })
    .await;
}

#[tokio::test]
async fn test_baseline_5_ranks_strided() {
    // Rank r holds [r, r+5, r+10]; the union is 0..15.
    run_group(5, |comm| async move {
        let rank = comm.rank();
        let r = rank as i32;
        let local = [r, r + 5, r + 10];
        let mut out = [0i32; 15];
        baseline_merge(&*comm, &local, &mut out).await.unwrap();
        let expected: Vec<i32> = (0..15).collect();
        assert_eq!(out.to_vec(), expected, "rank {rank} baseline failed");
    })
    .await;
}

#[tokio::test]
async fn test_baseline_non_power_of_two_random() {
    for world in [3, 5, 6, 7, 9] {
        run_group(world, move |comm| async move {
            let n = 4;
            let local = random_run(11, comm.rank(), n);
            let mut out = vec![0i32; n * world as usize];
            baseline_merge(&*comm, &local, &mut out).await.unwrap();
            assert_eq!(
                out,
                reference(11, world, n),
                "baseline mismatch at P = {world}"
            );
        })
        .await;
    }
}

#[tokio::test]
async fn test_baseline_already_sorted_input_is_unchanged() {
    // Rank r holds the r-th block of an already globally sorted sequence.
    run_group(4, |comm| async move {
        let n = 3;
        let base = comm.rank() as i32 * n as i32;
        let local: Vec<i32> = (base..base + n as i32).collect();
        let mut out = vec![0i32; n * 4];
        baseline_merge(&*comm, &local, &mut out).await.unwrap();
        let expected: Vec<i32> = (0..12).collect();
        assert_eq!(out, expected);
    })
    .await;
}

#[tokio::test]
async fn test_baseline_single_rank_is_identity() {
    run_group(1, |comm| async move {
        let local = [3i32, 7, 9];
        let mut out = [0i32; 3];
        baseline_merge(&*comm, &local, &mut out).await.unwrap();
        assert_eq!(out, local);
    })
    .await;
}

#[tokio::test]
async fn test_baseline_empty_runs_are_noop() {
    run_group(3, |comm| async move {
        let local: [i32; 0] = [];
        let mut out: [i32; 0] = [];
        baseline_merge(&*comm, &local, &mut out).await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn test_baseline_rejects_wrong_output_length() {
    run_group(2, |comm| async move {
        let local = [1i32, 2];
        let mut out = [0i32; 3]; // needs 4
        let err = baseline_merge(&*comm, &local, &mut out).await.unwrap_err();
        assert!(matches!(
            err,
            MergatherError::BufferSizeMismatch {
                expected: 4,
                actual: 3
            }
        ));
    })
    .await;
}
