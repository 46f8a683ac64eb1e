//! The CRUD facade.
//!
//! [`MongoCrud`] is the single entry point: it owns the connection provider
//! and the storage path selected at construction, validates caller input
//! before any I/O, and dispatches each operation.

use bson::{Bson, Document};
use mongodb::Client;
use tracing::error;

use crate::config::{CrudConfig, StorageMode};
use crate::connection::ConnectionProvider;
use crate::error::{CrudError, Result};
use crate::outcome::Outcome;
use crate::store::{CrudStore, GridFsStore, RegularStore};

/// CRUD facade over the MongoDB driver.
///
/// Construct one per configuration; the connection is opened lazily on the
/// first operation and shared by all of them. Operations issued concurrently
/// against the same facade are not serialized; callers needing ordering must
/// chain the futures.
///
/// # Example
///
/// ```rust,no_run
/// use mongo_crud::MongoCrud;
/// use bson::doc;
///
/// # async fn example() -> mongo_crud::Result<()> {
/// let crud = MongoCrud::builder()
///     .uri("mongodb://localhost:27017/mongo-crud-test")
///     .build();
///
/// let id = crud.create(doc! { "name": "Athyrion" }, "objectStore").await?;
/// let docs = crud.read(doc! { "_id": id }, "objectStore").await?;
/// assert_eq!(docs.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MongoCrud {
	connection: ConnectionProvider,
	store: Box<dyn CrudStore>,
	storage_mode: StorageMode,
}

impl MongoCrud {
	/// Create a facade from a configuration. Performs no I/O.
	pub fn new(config: CrudConfig) -> Self {
		let storage_mode = config.storage_mode;
		let store: Box<dyn CrudStore> = match storage_mode {
			StorageMode::Regular => Box::new(RegularStore::new()),
			StorageMode::LargeObject => Box::new(GridFsStore::new()),
		};

		Self {
			connection: ConnectionProvider::new(config),
			store,
			storage_mode,
		}
	}

	/// Create a builder with default settings.
	pub fn builder() -> MongoCrudBuilder {
		MongoCrudBuilder::new()
	}

	/// The storage mode this facade was constructed with.
	pub fn storage_mode(&self) -> StorageMode {
		self.storage_mode
	}

	/// The connection provider owned by this facade.
	pub fn connection(&self) -> &ConnectionProvider {
		&self.connection
	}

	/// Return the shared client handle, opening the connection if needed.
	pub async fn client(&self) -> Result<Client> {
		self.connection.get().await
	}

	/// Store `obj` in the given collection and return its assigned identity.
	pub async fn create(&self, obj: Document, collection: &str) -> Result<Bson> {
		validate_collection(collection)?;
		self.store
			.create(&self.connection, obj, collection)
			.await
			.inspect_err(|err| error!(target: "mongo_crud", %err, collection, "create failed"))
	}

	/// Return all documents matching `criteria` in the given collection.
	///
	/// Point lookups by identity return a one-element sequence, not a bare
	/// document. In large-object mode, `criteria` must carry the `_id`
	/// assigned at creation.
	pub async fn read(&self, criteria: Document, collection: &str) -> Result<Vec<Document>> {
		validate_collection(collection)?;
		self.store
			.read(&self.connection, criteria, collection)
			.await
			.inspect_err(|err| error!(target: "mongo_crud", %err, collection, "read failed"))
	}

	/// Return every document in the given collection.
	///
	/// Not available in large-object mode.
	pub async fn read_all(&self, collection: &str) -> Result<Vec<Document>> {
		validate_collection(collection)?;
		self.store
			.read_all(&self.connection, collection)
			.await
			.inspect_err(|err| error!(target: "mongo_crud", %err, collection, "read_all failed"))
	}

	/// Replace the single document matching `criteria` with `obj` in full.
	///
	/// Not available in large-object mode.
	pub async fn update(
		&self,
		criteria: Document,
		obj: Document,
		collection: &str,
	) -> Result<Outcome> {
		validate_collection(collection)?;
		self.store
			.update(&self.connection, criteria, obj, collection)
			.await
			.inspect_err(|err| error!(target: "mongo_crud", %err, collection, "update failed"))
	}

	/// Remove the single document matching `criteria`.
	///
	/// Short-circuits on the first failing step; a reported success means the
	/// removal completed.
	pub async fn delete(&self, criteria: Document, collection: &str) -> Result<Outcome> {
		validate_collection(collection)?;
		self.store
			.delete(&self.connection, criteria, collection)
			.await
			.inspect_err(|err| error!(target: "mongo_crud", %err, collection, "delete failed"))
	}

	/// Close the shared connection handle.
	///
	/// Any operation issued afterward fails with
	/// [`CrudError::Connection`]; the facade does not reconnect.
	pub async fn close(&self) -> Result<()> {
		self.connection.close().await
	}
}

fn validate_collection(collection: &str) -> Result<()> {
	if collection.is_empty() {
		return Err(CrudError::InvalidArgument(
			"collection name must not be empty".to_string(),
		));
	}
	Ok(())
}

/// Builder for configuring a [`MongoCrud`] facade.
///
/// # Example
///
/// ```rust
/// use mongo_crud::{MongoCrud, StorageMode};
///
/// let crud = MongoCrud::builder()
///     .uri("mongodb://localhost:27017")
///     .database("appdata")
///     .storage_mode(StorageMode::LargeObject)
///     .max_pool_size(20)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct MongoCrudBuilder {
	config: CrudConfig,
}

impl MongoCrudBuilder {
	/// Create a builder with default settings.
	pub fn new() -> Self {
		Self {
			config: CrudConfig::default(),
		}
	}

	/// Set the connection string.
	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.config.uri = uri.into();
		self
	}

	/// Set the database name, overriding the URI's default database.
	pub fn database(mut self, database: impl Into<String>) -> Self {
		self.config.database = Some(database.into());
		self
	}

	/// Select the storage path.
	pub fn storage_mode(mut self, mode: StorageMode) -> Self {
		self.config.storage_mode = mode;
		self
	}

	/// Set the maximum connection pool size.
	pub fn max_pool_size(mut self, size: u32) -> Self {
		self.config.max_pool_size = Some(size);
		self
	}

	/// Set the minimum connection pool size.
	pub fn min_pool_size(mut self, size: u32) -> Self {
		self.config.min_pool_size = Some(size);
		self
	}

	/// Set the maximum idle time for pooled connections, in seconds.
	pub fn max_idle_time_secs(mut self, secs: u64) -> Self {
		self.config.max_idle_time_secs = Some(secs);
		self
	}

	/// Build the facade. Performs no I/O; the connection opens lazily.
	pub fn build(self) -> MongoCrud {
		MongoCrud::new(self.config)
	}
}

#[cfg(test)]
mod tests {
	use bson::doc;

	use super::*;

	#[test]
	fn test_builder_defaults() {
		let crud = MongoCrud::builder().build();
		assert_eq!(crud.storage_mode(), StorageMode::Regular);
		assert_eq!(crud.connection().open_count(), 0);
	}

	#[test]
	fn test_builder_configuration() {
		let builder = MongoCrud::builder()
			.uri("mongodb://example.com:27017")
			.database("appdata")
			.storage_mode(StorageMode::LargeObject)
			.max_pool_size(100)
			.min_pool_size(10)
			.max_idle_time_secs(300);

		assert_eq!(builder.config.uri, "mongodb://example.com:27017");
		assert_eq!(builder.config.database.as_deref(), Some("appdata"));
		assert_eq!(builder.config.storage_mode, StorageMode::LargeObject);
		assert_eq!(builder.config.max_pool_size, Some(100));
		assert_eq!(builder.config.min_pool_size, Some(10));
		assert_eq!(builder.config.max_idle_time_secs, Some(300));
	}

	#[tokio::test]
	async fn test_empty_collection_name_fails_before_io() {
		let crud = MongoCrud::builder().build();

		let err = crud.create(doc! { "name": "A" }, "").await.unwrap_err();
		assert!(matches!(err, CrudError::InvalidArgument(_)));

		let err = crud.read(doc! {}, "").await.unwrap_err();
		assert!(matches!(err, CrudError::InvalidArgument(_)));

		let err = crud.read_all("").await.unwrap_err();
		assert!(matches!(err, CrudError::InvalidArgument(_)));

		let err = crud.update(doc! {}, doc! {}, "").await.unwrap_err();
		assert!(matches!(err, CrudError::InvalidArgument(_)));

		let err = crud.delete(doc! {}, "").await.unwrap_err();
		assert!(matches!(err, CrudError::InvalidArgument(_)));

		assert_eq!(crud.connection().open_count(), 0);
	}

	#[tokio::test]
	async fn test_unsupported_operations_in_large_object_mode() {
		let crud = MongoCrud::builder()
			.storage_mode(StorageMode::LargeObject)
			.build();

		let err = crud.read_all("objectStore").await.unwrap_err();
		assert!(matches!(err, CrudError::UnsupportedOperation(_)));

		let err = crud
			.update(doc! {}, doc! { "name": "B" }, "objectStore")
			.await
			.unwrap_err();
		assert!(matches!(err, CrudError::UnsupportedOperation(_)));

		// Rejected before any connection was opened.
		assert_eq!(crud.connection().open_count(), 0);
	}

	#[tokio::test]
	async fn test_large_object_read_requires_id_before_io() {
		let crud = MongoCrud::builder()
			.storage_mode(StorageMode::LargeObject)
			.build();

		let err = crud
			.read(doc! { "name": "Athyrion" }, "objectStore")
			.await
			.unwrap_err();
		assert!(matches!(err, CrudError::InvalidArgument(_)));

		let err = crud
			.delete(doc! { "name": "Athyrion" }, "objectStore")
			.await
			.unwrap_err();
		assert!(matches!(err, CrudError::InvalidArgument(_)));

		assert_eq!(crud.connection().open_count(), 0);
	}

	#[tokio::test]
	async fn test_operations_after_close_fail() {
		let crud = MongoCrud::builder().build();
		crud.close().await.unwrap();

		let err = crud.read_all("objectStore").await.unwrap_err();
		assert!(matches!(err, CrudError::Connection(_)));
	}
}
