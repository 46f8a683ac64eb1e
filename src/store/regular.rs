//! CRUD against regular collections.

use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::stream::TryStreamExt;

use crate::connection::ConnectionProvider;
use crate::error::Result;
use crate::outcome::Outcome;
use crate::store::CrudStore;

/// Collection-backed storage path.
///
/// Every operation resolves the named collection on the configured database
/// and delegates to the driver; failures map through
/// [`CrudError`](crate::CrudError) by error kind.
#[derive(Debug, Default)]
pub struct RegularStore;

impl RegularStore {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl CrudStore for RegularStore {
	async fn create(
		&self,
		conn: &ConnectionProvider,
		obj: Document,
		collection: &str,
	) -> Result<Bson> {
		let db = conn.database().await?;
		let coll = db.collection::<Document>(collection);

		let result = coll.insert_one(obj).await?;
		Ok(result.inserted_id)
	}

	async fn read(
		&self,
		conn: &ConnectionProvider,
		criteria: Document,
		collection: &str,
	) -> Result<Vec<Document>> {
		let db = conn.database().await?;
		let coll = db.collection::<Document>(collection);

		let cursor = coll.find(criteria).await?;
		Ok(cursor.try_collect().await?)
	}

	async fn read_all(&self, conn: &ConnectionProvider, collection: &str) -> Result<Vec<Document>> {
		let db = conn.database().await?;
		let coll = db.collection::<Document>(collection);

		let cursor = coll.find(doc! {}).await?;
		Ok(cursor.try_collect().await?)
	}

	async fn update(
		&self,
		conn: &ConnectionProvider,
		criteria: Document,
		obj: Document,
		collection: &str,
	) -> Result<Outcome> {
		let db = conn.database().await?;
		let coll = db.collection::<Document>(collection);

		// Full replacement, not a partial patch.
		let result = coll.replace_one(criteria, obj).await?;
		Ok(Outcome::new(result.matched_count > 0, result.modified_count))
	}

	async fn delete(
		&self,
		conn: &ConnectionProvider,
		criteria: Document,
		collection: &str,
	) -> Result<Outcome> {
		let db = conn.database().await?;
		let coll = db.collection::<Document>(collection);

		let result = coll.delete_one(criteria).await?;
		Ok(Outcome::new(result.deleted_count > 0, result.deleted_count))
	}
}
