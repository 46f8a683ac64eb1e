//! CRUD via GridFS chunked storage.
//!
//! Documents stored through this path are serialized to JSON bytes and
//! written through a GridFS upload stream, so they may exceed the driver's
//! 16 MiB single-document ceiling. The stored payload does not carry the
//! identity; reads re-attach it from the file id.

use async_trait::async_trait;
use bson::{Bson, Document};
use futures::io::{AsyncReadExt, AsyncWriteExt};

use crate::connection::ConnectionProvider;
use crate::error::{CrudError, Result};
use crate::outcome::Outcome;
use crate::store::CrudStore;

/// Filename used when the object carries no `fileName` field.
pub const DEFAULT_FILE_NAME: &str = "mongo-crud-testfile";

/// GridFS-backed storage path for large objects.
///
/// `read_all` and `update` have no large-object implementation and fail with
/// [`CrudError::UnsupportedOperation`]. GridFS files are not collection
/// scoped; the collection argument is validated by the facade but otherwise
/// ignored here.
#[derive(Debug, Default)]
pub struct GridFsStore;

impl GridFsStore {
	pub fn new() -> Self {
		Self
	}
}

/// Extract the identity a criteria document must carry for identity-keyed
/// operations. Checked before any I/O.
fn require_id(criteria: &Document, operation: &str) -> Result<Bson> {
	criteria.get("_id").cloned().ok_or_else(|| {
		CrudError::InvalidArgument(format!("{operation}: criteria carries no _id to look for"))
	})
}

#[async_trait]
impl CrudStore for GridFsStore {
	async fn create(
		&self,
		conn: &ConnectionProvider,
		obj: Document,
		_collection: &str,
	) -> Result<Bson> {
		let file_name = obj
			.get("fileName")
			.and_then(Bson::as_str)
			.unwrap_or(DEFAULT_FILE_NAME)
			.to_string();

		// Serialize before touching the driver.
		let payload = serde_json::to_vec(&obj)?;

		let db = conn.database().await?;
		let bucket = db.gridfs_bucket(None);

		// No rollback across open/write/close: a failure after a partial
		// write leaves the partial chunks behind and the object must be
		// treated as not reliably stored.
		let mut upload = bucket.open_upload_stream(file_name.as_str()).await?;
		let id = upload.id().clone();
		upload.write_all(&payload).await?;
		upload.close().await?;

		Ok(id)
	}

	async fn read(
		&self,
		conn: &ConnectionProvider,
		criteria: Document,
		_collection: &str,
	) -> Result<Vec<Document>> {
		let id = require_id(&criteria, "read")?;

		let db = conn.database().await?;
		let bucket = db.gridfs_bucket(None);

		let mut download = bucket.open_download_stream(id.clone()).await?;
		let mut payload = Vec::new();
		download.read_to_end(&mut payload).await?;

		let mut obj: Document = serde_json::from_slice(&payload)?;
		// The stored payload does not carry the identity.
		obj.insert("_id", id);

		Ok(vec![obj])
	}

	async fn read_all(
		&self,
		_conn: &ConnectionProvider,
		_collection: &str,
	) -> Result<Vec<Document>> {
		Err(CrudError::UnsupportedOperation(
			"read_all is not available in large-object mode".to_string(),
		))
	}

	async fn update(
		&self,
		_conn: &ConnectionProvider,
		_criteria: Document,
		_obj: Document,
		_collection: &str,
	) -> Result<Outcome> {
		Err(CrudError::UnsupportedOperation(
			"update is not available in large-object mode".to_string(),
		))
	}

	async fn delete(
		&self,
		conn: &ConnectionProvider,
		criteria: Document,
		_collection: &str,
	) -> Result<Outcome> {
		let id = require_id(&criteria, "delete")?;

		let db = conn.database().await?;
		let bucket = db.gridfs_bucket(None);

		bucket.delete(id).await?;
		Ok(Outcome::new(true, 1))
	}
}
