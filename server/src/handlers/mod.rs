//! Request handlers for offline-queue sync.

mod sync;

pub use sync::*;
