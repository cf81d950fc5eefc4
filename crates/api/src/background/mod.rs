//! Long-lived background jobs spawned at server startup.

pub mod progress_sweep;
