//! Remote-storage (cloud disk) integration: resolving the per-photo URL
//! variants and the batch sync loops that keep photo rows complete.

pub mod client;
pub mod sync;

pub use client::DiskClient;
pub use sync::{SyncFault, SyncReport, refresh_all_hrefs, sync_missing_hrefs};
