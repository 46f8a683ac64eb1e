//! Error types for the CRUD facade.
//!
//! Every operation reports failure through exactly one channel: the returned
//! [`Result`]. Validation errors are raised before any connection is obtained,
//! driver failures are mapped by their [`mongodb::error::ErrorKind`].

use thiserror::Error;

/// Result type for CRUD operations.
pub type Result<T> = std::result::Result<T, CrudError>;

/// Unified error type for CRUD operations.
#[derive(Debug, Error)]
pub enum CrudError {
	/// Caller-supplied input is malformed: empty collection name, or a
	/// criteria document missing the `_id` field for an identity-keyed
	/// operation. Raised synchronously, before any I/O.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	/// The connection could not be established, or the provider has been
	/// closed. Never cached; the next call retries from scratch.
	#[error("connection error: {0}")]
	Connection(String),

	/// A failure reported by the driver during insert/find/replace/delete or
	/// GridFS open/write/read/close/unlink. Never retried automatically.
	#[error("storage error: {0}")]
	Storage(String),

	/// Large-object payload could not be serialized or deserialized.
	#[error("serialization error: {0}")]
	Serialization(String),

	/// Operation invoked in a storage mode that does not support it
	/// (`read_all`/`update` under large-object mode).
	#[error("unsupported operation: {0}")]
	UnsupportedOperation(String),
}

impl From<mongodb::error::Error> for CrudError {
	fn from(err: mongodb::error::Error) -> Self {
		use mongodb::error::ErrorKind;

		match *err.kind {
			ErrorKind::InvalidArgument { .. } => CrudError::InvalidArgument(err.to_string()),
			ErrorKind::Io(_) => CrudError::Connection(err.to_string()),
			ErrorKind::Authentication { .. } => CrudError::Connection(err.to_string()),
			_ => CrudError::Storage(err.to_string()),
		}
	}
}

// In bson v3.x, both ser::Error and de::Error are aliases for bson::error::Error.
impl From<bson::error::Error> for CrudError {
	fn from(err: bson::error::Error) -> Self {
		CrudError::Serialization(err.to_string())
	}
}

impl From<serde_json::Error> for CrudError {
	fn from(err: serde_json::Error) -> Self {
		CrudError::Serialization(err.to_string())
	}
}

// GridFS streams implement `futures::io::{AsyncRead, AsyncWrite}`, so their
// failures surface as `std::io::Error` wrapping the driver error.
impl From<std::io::Error> for CrudError {
	fn from(err: std::io::Error) -> Self {
		CrudError::Storage(err.to_string())
	}
}
