//! Storage path implementations.
//!
//! One CRUD capability interface, [`CrudStore`], implemented twice: once for
//! regular collections and once for GridFS large-object storage. The facade
//! selects the implementation at construction time, so the mode never changes
//! at runtime.

use async_trait::async_trait;
use bson::{Bson, Document};

use crate::connection::ConnectionProvider;
use crate::error::Result;
use crate::outcome::Outcome;

mod gridfs;
mod regular;

pub use gridfs::GridFsStore;
pub use regular::RegularStore;

/// CRUD capability interface implemented by each storage path.
///
/// Implementations receive the [`ConnectionProvider`] rather than an open
/// handle so that all synchronous validation (missing `_id`, unsupported
/// operation) happens before any connection is obtained.
#[async_trait]
pub trait CrudStore: Send + Sync {
	/// Store `obj` and return the identity assigned to it.
	async fn create(
		&self,
		conn: &ConnectionProvider,
		obj: Document,
		collection: &str,
	) -> Result<Bson>;

	/// Return all documents matching `criteria`.
	///
	/// Point lookups by unique identity still yield a one-element sequence,
	/// not a bare document.
	async fn read(
		&self,
		conn: &ConnectionProvider,
		criteria: Document,
		collection: &str,
	) -> Result<Vec<Document>>;

	/// Return every document in the collection, in the driver's natural
	/// iteration order.
	///
	/// Fails with [`CrudError::UnsupportedOperation`](crate::CrudError) on
	/// storage paths that have no collection to scan.
	async fn read_all(&self, conn: &ConnectionProvider, collection: &str) -> Result<Vec<Document>>;

	/// Replace the single document matching `criteria` with `obj` in full.
	///
	/// Fails with [`CrudError::UnsupportedOperation`](crate::CrudError) on
	/// storage paths that do not support replacement.
	async fn update(
		&self,
		conn: &ConnectionProvider,
		criteria: Document,
		obj: Document,
		collection: &str,
	) -> Result<Outcome>;

	/// Remove the single document matching `criteria`.
	async fn delete(
		&self,
		conn: &ConnectionProvider,
		criteria: Document,
		collection: &str,
	) -> Result<Outcome>;
}
