//! Error types for the Perseid propagation framework.
//!
//! Organized by when a failure can surface: [`ConfigError`] at
//! construction/setup time, [`ModuleError`] during a module's `process`
//! call, and [`RunError`] from the pipeline engine. Per-candidate
//! physical edge cases (energy below a table threshold, an inapplicable
//! particle type, a degenerate field) are never errors — modules handle
//! them by returning early with the candidate unchanged.

use std::error::Error;
use std::fmt;

/// Construction-time configuration errors.
///
/// These are fatal and surface before any candidate is processed: the
/// pipeline must not start with a module that could not load its data
/// or was given an invalid option.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A required option was not set.
    MissingOption {
        /// The option's name.
        option: String,
    },

    /// An option value is out of its valid range or otherwise invalid.
    InvalidOption {
        /// The option's name.
        option: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A data file could not be opened or read.
    FileUnreadable {
        /// Path of the offending file.
        path: String,
        /// Underlying I/O failure, rendered to text.
        reason: String,
    },

    /// A data file or column pair produced no usable table rows.
    EmptyTable {
        /// Path or description of the offending source.
        source: String,
    },

    /// Table sample points are not in non-decreasing order.
    NonMonotonicTable {
        /// Path or description of the offending source.
        source: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOption { option } => write!(f, "option '{option}' is required"),
            Self::InvalidOption { option, reason } => {
                write!(f, "invalid value for option '{option}': {reason}")
            }
            Self::FileUnreadable { path, reason } => {
                write!(f, "could not read data file '{path}': {reason}")
            }
            Self::EmptyTable { source } => {
                write!(f, "table '{source}' contains no usable rows")
            }
            Self::NonMonotonicTable { source } => {
                write!(f, "table '{source}' sample points are not non-decreasing")
            }
        }
    }
}

impl Error for ConfigError {}

/// Unrecoverable failures from a module's `process` call.
///
/// Reserved for genuinely broken execution (a non-finite state the
/// module cannot attribute to an expected physical branch). Expected
/// physical conditions early-return `Ok` instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModuleError {
    /// The module's process function failed.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },

    /// A candidate quantity became non-finite during processing.
    NonFiniteState {
        /// Which quantity (e.g. "position").
        quantity: String,
    },
}

impl fmt::Display for ModuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
            Self::NonFiniteState { quantity } => {
                write!(f, "candidate {quantity} became non-finite")
            }
        }
    }
}

impl Error for ModuleError {}

/// Errors from the pipeline engine while running candidates.
#[derive(Clone, Debug, PartialEq)]
pub enum RunError {
    /// The module list contains no modules.
    EmptyModuleList,

    /// A module returned an error during execution.
    ModuleFailed {
        /// Name of the failing module.
        name: String,
        /// The underlying module error.
        reason: ModuleError,
    },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyModuleList => write!(f, "module list has no modules"),
            Self::ModuleFailed { name, reason } => {
                write!(f, "module '{name}' failed: {reason}")
            }
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ModuleFailed { reason, .. } => Some(reason),
            Self::EmptyModuleList => None,
        }
    }
}
