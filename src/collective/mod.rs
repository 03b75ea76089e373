mod baseline;
mod circulant;
mod dissemination;
mod helpers;

pub use baseline::{baseline_merge, baseline_merge_observed};
pub use circulant::{circulant_merge, circulant_merge_observed};
pub use dissemination::{dissemination_merge, dissemination_merge_observed};
pub use helpers::RoundObserver;

use crate::comm::Communicator;
use crate::config::MergatherConfig;
use crate::error::Result;
use crate::types::{Algorithm, Element};

/// Merge every rank's locally sorted `local` run into the globally sorted
/// concatenation, delivered into `out` on all ranks.
///
/// Dispatches to the scheduler selected by `cfg.algorithm`. All P ranks must
/// call collectively with the same element type, the same `local.len()`, and
/// `out.len() == local.len() * world_size`.
///
/// Precondition: `local` is sorted ascending. The schedulers do not check
/// this; unsorted input yields output in unspecified order (never a crash or
/// out-of-bounds access).
pub async fn sorted_allgather<T, C>(
    comm: &C,
    cfg: &MergatherConfig,
    local: &[T],
    out: &mut [T],
) -> Result<()>
where
    T: Element,
    C: Communicator<T> + ?Sized,
{
    match cfg.algorithm {
        Algorithm::Baseline => baseline_merge(comm, local, out).await,
        Algorithm::Dissemination => dissemination_merge(comm, local, out).await,
        Algorithm::Circulant => circulant_merge(comm, local, out).await,
    }
}
