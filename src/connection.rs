//! Lazy, memoized connection handling.
//!
//! One [`ConnectionProvider`] owns at most one live [`Client`]. The first
//! successful [`get`](ConnectionProvider::get) opens it; every later call
//! returns the same handle without reopening. A failed open is never cached,
//! so the next call retries from scratch.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::config::CrudConfig;
use crate::error::{CrudError, Result};

/// Lazily establishes and memoizes one database connection handle.
///
/// The provider is owned by whoever constructs the facade; there is no
/// process-global state. The driver's `Client` is internally reference
/// counted, so [`get`](ConnectionProvider::get) hands out cheap clones of
/// the one cached handle.
pub struct ConnectionProvider {
	config: CrudConfig,
	client: Mutex<Option<Client>>,
	opens: AtomicU64,
	closed: AtomicBool,
}

impl ConnectionProvider {
	/// Create a provider for the given configuration. Performs no I/O.
	pub fn new(config: CrudConfig) -> Self {
		Self {
			config,
			client: Mutex::new(None),
			opens: AtomicU64::new(0),
			closed: AtomicBool::new(false),
		}
	}

	/// Return the shared connection handle, opening it on first use.
	///
	/// Fails with [`CrudError::Connection`] when the open fails or when the
	/// provider has been [`close`](ConnectionProvider::close)d. Open failures
	/// are not cached; a retry on the next call will attempt to reconnect.
	pub async fn get(&self) -> Result<Client> {
		let mut guard = self.client.lock().await;

		// The closed flag is only written under this lock, so checking it
		// here keeps a concurrent close() from racing us into reopening
		// after the cache has been emptied.
		if self.closed.load(Ordering::SeqCst) {
			return Err(CrudError::Connection(
				"connection provider is closed".to_string(),
			));
		}

		if let Some(client) = guard.as_ref() {
			return Ok(client.clone());
		}

		let client = self.open().await.inspect_err(|err| {
			error!(target: "mongo_crud", uri = %self.config.uri, %err, "failed to open connection");
		})?;
		self.opens.fetch_add(1, Ordering::SeqCst);
		debug!(target: "mongo_crud", uri = %self.config.uri, "connection opened");

		*guard = Some(client.clone());
		Ok(client)
	}

	/// Return a handle to the configured database, connecting if needed.
	pub async fn database(&self) -> Result<Database> {
		let client = self.get().await?;
		Ok(client.database(&self.config.database_name()))
	}

	/// Number of successful connection opens performed by this provider.
	pub fn open_count(&self) -> u64 {
		self.opens.load(Ordering::SeqCst)
	}

	/// Whether [`close`](ConnectionProvider::close) has been called.
	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}

	/// Shut the shared handle down.
	///
	/// The provider is poisoned afterward: any later
	/// [`get`](ConnectionProvider::get) fails with [`CrudError::Connection`]
	/// instead of silently reconnecting.
	pub async fn close(&self) -> Result<()> {
		let client = {
			let mut guard = self.client.lock().await;
			self.closed.store(true, Ordering::SeqCst);
			guard.take()
		};
		if let Some(client) = client {
			client.shutdown().await;
			debug!(target: "mongo_crud", "connection closed");
		}
		Ok(())
	}

	async fn open(&self) -> Result<Client> {
		let mut options = ClientOptions::parse(&self.config.uri)
			.await
			.map_err(|err| CrudError::Connection(err.to_string()))?;

		if let Some(max_size) = self.config.max_pool_size {
			options.max_pool_size = Some(max_size);
		}
		if let Some(min_size) = self.config.min_pool_size {
			options.min_pool_size = Some(min_size);
		}
		if let Some(idle_secs) = self.config.max_idle_time_secs {
			options.max_idle_time = Some(Duration::from_secs(idle_secs));
		}

		Client::with_options(options).map_err(|err| CrudError::Connection(err.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// Building a `Client` performs no network I/O for plain `mongodb://`
	// URIs, so these tests run without a live server.

	#[tokio::test]
	async fn test_connection_is_opened_once() {
		let provider = ConnectionProvider::new(CrudConfig::default());
		assert_eq!(provider.open_count(), 0);

		provider.get().await.unwrap();
		provider.get().await.unwrap();

		assert_eq!(provider.open_count(), 1);
	}

	#[tokio::test]
	async fn test_open_failure_is_not_cached() {
		let provider = ConnectionProvider::new(CrudConfig::new("not-a-mongodb-uri"));

		let err = provider.get().await.unwrap_err();
		assert!(matches!(err, CrudError::Connection(_)));

		// A second attempt still goes through the open path.
		let err = provider.get().await.unwrap_err();
		assert!(matches!(err, CrudError::Connection(_)));
		assert_eq!(provider.open_count(), 0);
	}

	#[tokio::test]
	async fn test_get_after_close_fails() {
		let provider = ConnectionProvider::new(CrudConfig::default());
		provider.get().await.unwrap();
		provider.close().await.unwrap();

		assert!(provider.is_closed());
		let err = provider.get().await.unwrap_err();
		assert!(matches!(err, CrudError::Connection(_)));
	}

	#[tokio::test]
	async fn test_concurrent_close_never_resurrects_the_connection() {
		use std::sync::Arc;

		for _ in 0..64 {
			let provider = Arc::new(ConnectionProvider::new(CrudConfig::default()));
			provider.get().await.unwrap();

			let closer = Arc::clone(&provider);
			let getter = Arc::clone(&provider);
			let close = tokio::spawn(async move { closer.close().await });
			let get = tokio::spawn(async move { getter.get().await });

			close.await.unwrap().unwrap();
			// The racing get() may see the cached handle or the closed
			// provider, but it must never reopen.
			let _ = get.await.unwrap();

			assert_eq!(provider.open_count(), 1);
			let err = provider.get().await.unwrap_err();
			assert!(matches!(err, CrudError::Connection(_)));
		}
	}

	#[tokio::test]
	async fn test_close_without_open() {
		let provider = ConnectionProvider::new(CrudConfig::default());
		provider.close().await.unwrap();
		assert_eq!(provider.open_count(), 0);
	}

	#[tokio::test]
	async fn test_database_uses_configured_name() {
		let provider = ConnectionProvider::new(CrudConfig::new("mongodb://localhost:27017/appdata"));
		let db = provider.database().await.unwrap();
		assert_eq!(db.name(), "appdata");
	}
}
