//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::Credential,
	store::{CredentialStore, SessionSnapshot, StoreFuture},
};

type Snapshot = Arc<RwLock<SessionSnapshot>>;

/// Thread-safe storage backend that keeps the session in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Snapshot);
impl MemoryStore {
	/// Returns a copy of the current snapshot, mainly for test assertions.
	pub fn snapshot(&self) -> SessionSnapshot {
		self.0.read().clone()
	}
}
impl CredentialStore for MemoryStore {
	fn load_credential(&self) -> StoreFuture<'_, Option<Credential>> {
		let snapshot = self.0.clone();

		Box::pin(async move { Ok(snapshot.read().credential()) })
	}

	fn save_credential(&self, credential: Credential) -> StoreFuture<'_, ()> {
		let snapshot = self.0.clone();

		Box::pin(async move {
			snapshot.write().set_credential(&credential);

			Ok(())
		})
	}

	fn load_display_name(&self) -> StoreFuture<'_, String> {
		let snapshot = self.0.clone();

		Box::pin(async move { Ok(snapshot.read().display_name.clone()) })
	}

	fn save_display_name(&self, name: String) -> StoreFuture<'_, ()> {
		let snapshot = self.0.clone();

		Box::pin(async move {
			snapshot.write().display_name = name;

			Ok(())
		})
	}
}
