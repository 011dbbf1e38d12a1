//! Application layer wiring the pure payload pipeline to a QR renderer.
//!
//! `QrEngine` runs one record through encoding and rendering. `QrSession`
//! keeps the latest result for callers that re-run the pipeline whenever
//! their input changes.

pub mod engine;
pub mod session;
