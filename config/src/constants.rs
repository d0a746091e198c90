//! # Configuration Constants
//!
//! Centralized limits for the PSeInt pipeline.
//!
//! ## Categories
//!
//! - **Execution limits**: loop ceiling, trace buffer cap, call depth
//! - **Stack growth**: `stacker` red zone and segment size
//! - **Display**: the words used to print logical values

use std::fmt;

// =============================================================================
// EXECUTION LIMITS
// =============================================================================

/// Maximum number of iterations a single loop construct may run.
///
/// Each active `Para`, `Mientras` and `Repetir` keeps its own counter; the
/// interpreter raises a loop-limit error as soon as one of them goes past
/// this value.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_LOOP_ITERATIONS;
///
/// let iterations = 100_000;
/// assert!(iterations <= MAX_LOOP_ITERATIONS);
/// ```
pub const MAX_LOOP_ITERATIONS: usize = 100_000;

/// Maximum number of trace snapshots recorded per execution.
///
/// Once the buffer is full the execution keeps running but no further
/// snapshots are stored and the result is flagged as truncated.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_TRACE_SNAPSHOTS;
///
/// let recorded = 2_500;
/// assert!(recorded <= MAX_TRACE_SNAPSHOTS);
/// ```
pub const MAX_TRACE_SNAPSHOTS: usize = 2_500;

/// Maximum nesting of active subprogram calls.
///
/// Prevents unbounded recursion in student functions from exhausting memory.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_CALL_DEPTH;
///
/// let current_depth = 100;
/// assert!(current_depth < MAX_CALL_DEPTH);
/// ```
pub const MAX_CALL_DEPTH: usize = 512;

// =============================================================================
// STACK GROWTH
// =============================================================================

/// Bytes of stack space allocated per segment when growing the native stack
/// with the `stacker` crate.
///
/// # Example
///
/// ```rust
/// use config::constants::STACKER_STACK_SIZE_BYTES;
/// assert!(STACKER_STACK_SIZE_BYTES >= 1024);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 8 * 1024 * 1024;

/// Remaining stack below which `stacker::maybe_grow` switches to a new
/// segment.
pub const STACKER_RED_ZONE_BYTES: usize = 128 * 1024;

// =============================================================================
// DISPLAY
// =============================================================================

/// Word printed for a true logical value.
pub const TRUE_LITERAL: &str = "Verdadero";

/// Word printed for a false logical value.
pub const FALSE_LITERAL: &str = "Falso";

// =============================================================================
// EXECUTION LIMITS SNAPSHOT
// =============================================================================

/// Immutable snapshot of the safety limits applied to one execution.
///
/// # Examples
/// ```
/// use config::constants::ExecutionLimits;
/// let limits = ExecutionLimits::default();
/// assert!(limits.max_call_depth > 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionLimits {
    /// Iterations allowed per loop construct.
    pub max_loop_iterations: usize,
    /// Snapshots kept in the trace buffer.
    pub max_trace_snapshots: usize,
    /// Nested subprogram calls allowed.
    pub max_call_depth: usize,
}

impl ExecutionLimits {
    /// Builds a limits snapshot, rejecting zero ceilings.
    ///
    /// # Examples
    /// ```
    /// use config::constants::ExecutionLimits;
    /// let limits = ExecutionLimits::new(10, 5, 8).expect("valid limits");
    /// assert_eq!(limits.max_loop_iterations, 10);
    /// ```
    pub fn new(
        max_loop_iterations: usize,
        max_trace_snapshots: usize,
        max_call_depth: usize,
    ) -> Result<Self, ConfigError> {
        if max_loop_iterations == 0 {
            return Err(ConfigError::ZeroLimit("max_loop_iterations"));
        }
        if max_trace_snapshots == 0 {
            return Err(ConfigError::ZeroLimit("max_trace_snapshots"));
        }
        if max_call_depth == 0 {
            return Err(ConfigError::ZeroLimit("max_call_depth"));
        }
        Ok(Self {
            max_loop_iterations,
            max_trace_snapshots,
            max_call_depth,
        })
    }
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            max_loop_iterations: MAX_LOOP_ITERATIONS,
            max_trace_snapshots: MAX_TRACE_SNAPSHOTS,
            max_call_depth: MAX_CALL_DEPTH,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Raised when a limit that must be positive is zero.
    ZeroLimit(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroLimit(name) => write!(f, "{name} must be greater than zero"),
        }
    }
}

impl std::error::Error for ConfigError {}
