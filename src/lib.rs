//! Distributed sorted allgather.
//!
//! Every one of P cooperating processes holds a locally sorted run of N
//! elements; after one collective call every process holds the globally
//! sorted concatenation of all P runs. Three merge schedulers are provided —
//! [`baseline_merge`], [`dissemination_merge`], and [`circulant_merge`] —
//! which produce identical results from identical inputs and differ only in
//! round scheduling and data movement. The message-passing transport is an
//! external collaborator behind the [`Communicator`] trait; [`LocalComm`]
//! is the in-process implementation used by tests and demos.

mod buffer;
pub mod collective;
pub mod comm;
pub mod config;
pub mod error;
pub mod merge;
pub mod types;

pub use collective::{
    baseline_merge, baseline_merge_observed, circulant_merge, circulant_merge_observed,
    dissemination_merge, dissemination_merge_observed, sorted_allgather, RoundObserver,
};
pub use comm::{Communicator, LocalComm};
pub use config::MergatherConfig;
pub use error::{MergatherError, Result};
pub use merge::merge_runs;
pub use types::{Algorithm, Element, Rank};
