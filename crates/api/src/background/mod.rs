//! Background jobs spawned from `main`.
//!
//! Each job runs until its [`tokio_util::sync::CancellationToken`] fires.

pub mod batch_retention;
