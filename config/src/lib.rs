//! # Config Crate
//!
//! Centralized limits and tunables for the PSeInt pseudocode pipeline.
//! Every ceiling that protects the interpreter from runaway student programs
//! lives here so the parser, evaluator and wasm host agree on one value.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{ExecutionLimits, MAX_LOOP_ITERATIONS, MAX_TRACE_SNAPSHOTS};
//!
//! let limits = ExecutionLimits::default();
//! assert_eq!(limits.max_loop_iterations, MAX_LOOP_ITERATIONS);
//! assert_eq!(limits.max_trace_snapshots, MAX_TRACE_SNAPSHOTS);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All limits defined once, used everywhere
//! - **Browser-Safe**: No platform-specific values
//! - **Validated Overrides**: Custom limits go through `ExecutionLimits::new`

pub mod constants;
