//! Facade configuration.
//!
//! A [`CrudConfig`] is created once, at facade construction, and never mutated
//! afterward. The storage mode selects which store implementation the facade
//! dispatches to; everything else parameterizes the connection.

use serde::{Deserialize, Serialize};

/// Default connection string when none is supplied.
pub const DEFAULT_URI: &str = "mongodb://localhost:27017/mongo-crud-test";

/// Database used when neither the config nor the URI names one.
pub const DEFAULT_DATABASE: &str = "mongo-crud-test";

/// Which storage path the facade dispatches to.
///
/// Regular collections are subject to the driver's single-document size
/// ceiling (16 MiB); large-object mode stores each document through GridFS
/// chunked storage instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageMode {
	/// Named collections, one document per object.
	#[default]
	Regular,
	/// GridFS chunked storage for objects beyond the document size ceiling.
	LargeObject,
}

impl std::fmt::Display for StorageMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			StorageMode::Regular => write!(f, "regular"),
			StorageMode::LargeObject => write!(f, "large-object"),
		}
	}
}

/// Immutable per-facade configuration.
#[derive(Debug, Clone)]
pub struct CrudConfig {
	/// MongoDB connection string.
	pub uri: String,
	/// Database to operate on. Falls back to the URI's default database,
	/// then to [`DEFAULT_DATABASE`].
	pub database: Option<String>,
	/// Storage path selected once at construction.
	pub storage_mode: StorageMode,
	/// Maximum connection pool size override.
	pub max_pool_size: Option<u32>,
	/// Minimum connection pool size override.
	pub min_pool_size: Option<u32>,
	/// Maximum idle time for pooled connections, in seconds.
	pub max_idle_time_secs: Option<u64>,
}

impl Default for CrudConfig {
	fn default() -> Self {
		Self {
			uri: DEFAULT_URI.to_string(),
			database: None,
			storage_mode: StorageMode::default(),
			max_pool_size: None,
			min_pool_size: None,
			max_idle_time_secs: None,
		}
	}
}

impl CrudConfig {
	/// Create a configuration with defaults for everything but the URI.
	pub fn new(uri: impl Into<String>) -> Self {
		Self {
			uri: uri.into(),
			..Self::default()
		}
	}

	/// Resolve the database name: explicit config first, then the URI path
	/// component, then [`DEFAULT_DATABASE`].
	pub(crate) fn database_name(&self) -> String {
		if let Some(name) = &self.database {
			return name.clone();
		}
		if let Some(name) = database_from_uri(&self.uri) {
			return name.to_string();
		}
		DEFAULT_DATABASE.to_string()
	}
}

/// Extract the default database from a connection string's path component.
fn database_from_uri(uri: &str) -> Option<&str> {
	let rest = uri.strip_prefix("mongodb://").or_else(|| uri.strip_prefix("mongodb+srv://"))?;
	let path = rest.split_once('/')?.1;
	let name = path.split('?').next().unwrap_or("");
	if name.is_empty() { None } else { Some(name) }
}
