//! Error types for the donor scheduler.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the store, the clinic operations and the configuration
//! loader can report. The calculators themselves never fail.

use thiserror::Error;

/// The main error type for the donor scheduler.
///
/// # Example
///
/// ```
/// use donor_scheduler::error::SchedulerError;
///
/// let error = SchedulerError::NotFound {
///     entity: "donor",
///     id: 42,
/// };
/// assert_eq!(error.to_string(), "donor 42 not found");
/// ```
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A record lookup by id found nothing.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The kind of record (e.g. "donor", "appointment").
        entity: &'static str,
        /// The id that was looked up.
        id: u64,
    },

    /// A request field failed validation.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// The request collides with existing state (duplicate, active appointment,
    /// illegal status transition, unbookable date).
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflict.
        message: String,
    },

    /// No authenticated principal accompanied the request.
    #[error("Authentication required")]
    Unauthenticated,

    /// The principal is not allowed to perform the operation.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Why access was denied.
        message: String,
    },

    /// The snapshot could not be read or written.
    #[error("Persistence failure on '{path}': {message}")]
    Persistence {
        /// The data file involved.
        path: String,
        /// The underlying I/O or encoding error.
        message: String,
    },

    /// The log subscriber could not be installed.
    #[error("Failed to initialise logging with filter '{filter}': {message}")]
    Telemetry {
        /// The filter directive in use.
        filter: String,
        /// What went wrong.
        message: String,
    },

    /// The HTTP listener failed to bind or stopped with an error.
    #[error("Server error on {address}: {message}")]
    Server {
        /// The listen address.
        address: String,
        /// The underlying I/O error.
        message: String,
    },
}

impl SchedulerError {
    /// Shorthand for a [`SchedulerError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`SchedulerError::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Shorthand for a [`SchedulerError::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return SchedulerError.
pub type SchedulerResult<T> = Result<T, SchedulerError>;
