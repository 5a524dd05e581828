//! Storage contracts and built-in store implementations for sign-in session state.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::Credential};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for the sign-in session: one credential pair and one display name.
///
/// The contract deliberately has no "clear credential" operation: clearing authorization
/// is an in-memory affair, and the persisted pair stays behind so a later session restore
/// can resurrect it.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Returns the persisted credential, or `None` while unauthenticated.
	fn load_credential(&self) -> StoreFuture<'_, Option<Credential>>;

	/// Persists the complete credential pair, replacing any prior value.
	fn save_credential(&self, credential: Credential) -> StoreFuture<'_, ()>;

	/// Returns the persisted display name; empty when unset.
	fn load_display_name(&self) -> StoreFuture<'_, String>;

	/// Persists the display name; an empty string records "unknown".
	fn save_display_name(&self, name: String) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Wire-format snapshot of the persisted session state.
///
/// Three string fields, with the empty string encoding "unset"; a snapshot whose
/// credential halves are not both non-empty decodes to an unauthenticated session rather
/// than an error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
	/// Persisted access token, or empty.
	#[serde(default)]
	pub access_token: String,
	/// Persisted access token secret, or empty.
	#[serde(default)]
	pub access_token_secret: String,
	/// Persisted display name, or empty.
	#[serde(default)]
	pub display_name: String,
}
impl SessionSnapshot {
	/// Decodes the credential pair, yielding `None` unless both halves are non-empty.
	pub fn credential(&self) -> Option<Credential> {
		Credential::new(self.access_token.clone(), self.access_token_secret.clone()).ok()
	}

	/// Overwrites the credential fields from a complete pair.
	pub fn set_credential(&mut self, credential: &Credential) {
		self.access_token = credential.token().to_owned();
		self.access_token_secret = credential.token_secret().expose().to_owned();
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn snapshot_decodes_complete_pairs_only() {
		let mut snapshot = SessionSnapshot::default();

		assert!(snapshot.credential().is_none());

		snapshot.access_token = "token".into();

		assert!(snapshot.credential().is_none(), "Half a pair must read as unauthenticated.");

		snapshot.access_token_secret = "secret".into();

		let credential = snapshot.credential().expect("Complete pair should decode.");

		assert_eq!(credential.token(), "token");
		assert_eq!(credential.token_secret().expose(), "secret");
	}

	#[test]
	fn snapshot_serde_defaults_missing_fields() {
		let snapshot: SessionSnapshot =
			serde_json::from_str("{\"access_token\":\"t\"}").expect("Partial JSON should decode.");

		assert_eq!(snapshot.access_token, "t");
		assert_eq!(snapshot.access_token_secret, "");
		assert_eq!(snapshot.display_name, "");
	}
}
