//! Error types for ldi-rs.
//!
//! Every fallible operation in the workspace returns [`Result`], built on a
//! single `thiserror`-derived enum.  Argument validation goes through the
//! [`ensure!`](crate::ensure) macro, which short-circuits with
//! [`Error::Precondition`].

use thiserror::Error;

/// The top-level error type used throughout ldi-rs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Shapes of weights / returns / covariance (or any other aligned
    /// containers) disagree.
    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// What was being checked (e.g. `"covariance rows"`).
        context: &'static str,
        /// The size implied by the other inputs.
        expected: usize,
        /// The size actually supplied.
        found: usize,
    },

    /// A constraint cannot be met, or a solver result was requested as
    /// optimal although it is only a best-effort point.
    #[error("infeasible constraint: {0}")]
    InfeasibleConstraint(String),

    /// The inputs make the computation ill-defined (zero volatility,
    /// identical durations, non-positive model parameters, ...).
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// The input is neither a single return series nor a table of series.
    #[error("invalid input type: {0}")]
    InvalidInputType(String),

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),
}

impl Error {
    /// Shorthand for a [`Error::DimensionMismatch`].
    pub fn dimension(context: &'static str, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            found,
        }
    }
}

/// Shorthand `Result` type used throughout ldi-rs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ldi_core::{ensure, errors::Error};
/// fn positive(x: f64) -> ldi_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::DimensionMismatch { .. })` unless `$found == $expected`.
///
/// # Example
/// ```
/// use ldi_core::ensure_dim;
/// fn same_len(a: &[f64], b: &[f64]) -> ldi_core::Result<()> {
///     ensure_dim!("second slice", a.len(), b.len());
///     Ok(())
/// }
/// assert!(same_len(&[1.0], &[2.0]).is_ok());
/// assert!(same_len(&[1.0], &[2.0, 3.0]).is_err());
/// ```
#[macro_export]
macro_rules! ensure_dim {
    ($context:expr, $expected:expr, $found:expr) => {
        if $expected != $found {
            return Err($crate::errors::Error::dimension(
                $context, $expected, $found,
            ));
        }
    };
}
