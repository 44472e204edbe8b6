//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache store.
//!
//! # Tasks
//! - Sampled reclamation: removes expired entries that are never read again

mod reclaim;

pub(crate) use reclaim::spawn_reclaim_task;
pub use reclaim::ReclaimOptions;
