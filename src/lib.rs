//! # mongo-crud
//!
//! Thin CRUD facade over the MongoDB driver.
//!
//! The crate exposes create/read/read_all/update/delete on regular
//! collections and, for documents beyond the driver's 16 MiB single-document
//! ceiling, on GridFS chunked storage. All durability, indexing, chunking,
//! and network handling delegate to the [`mongodb`] crate; this layer adds
//! the mode dispatch, input validation, and a lazily opened, memoized
//! connection shared by every operation.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use mongo_crud::{MongoCrud, StorageMode};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> mongo_crud::Result<()> {
//!     let crud = MongoCrud::builder()
//!         .uri("mongodb://localhost:27017/mongo-crud-test")
//!         .build();
//!
//!     let id = crud.create(doc! { "name": "Athyrion" }, "objectStore").await?;
//!     let docs = crud.read(doc! { "_id": id.clone() }, "objectStore").await?;
//!     assert_eq!(docs[0].get_str("name").unwrap(), "Athyrion");
//!
//!     crud.delete(doc! { "_id": id }, "objectStore").await?;
//!     crud.close().await
//! }
//! ```
//!
//! ## Large objects
//!
//! A facade built with [`StorageMode::LargeObject`] routes `create`/`read`/
//! `delete` through GridFS; `read_all` and `update` are not available on that
//! path and fail with [`CrudError::UnsupportedOperation`]. Reads and deletes
//! in that mode require the criteria to carry the `_id` assigned at creation.

pub mod config;
pub mod connection;
pub mod crud;
pub mod error;
pub mod outcome;
pub mod store;

pub use config::{CrudConfig, DEFAULT_DATABASE, DEFAULT_URI, StorageMode};
pub use connection::ConnectionProvider;
pub use crud::{MongoCrud, MongoCrudBuilder};
pub use error::{CrudError, Result};
pub use outcome::Outcome;
pub use store::{CrudStore, GridFsStore, RegularStore};

// Re-export BSON types for convenience.
pub use bson;
