//! # Leasewatch Engine
//!
//! Wires the capture loop, the frame parser, and the prefix registry into
//! one monitor run. Frontends supply configuration, a cancellation flag,
//! and a render callback.

pub mod error;
pub mod runtime;

pub use error::EngineError;
pub use runtime::run_monitor;
