//! High-level sign-in flow orchestrators powered by the broker facade.

pub mod handshake;
pub mod requests;

pub use handshake::*;
pub use requests::*;

// self
use crate::{
	_prelude::*, http::ApiHttpClient, oauth::Oauth1Client, provider::ProviderDescriptor,
	store::CredentialStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Broker specialized for the crate's default reqwest transport stack.
pub type ReqwestBroker = Broker<ReqwestHttpClient>;

/// Coordinates the OAuth 1.0a sign-in session against a single provider descriptor.
///
/// The broker owns the HTTP client, credential store, provider descriptor, and the
/// protocol client so individual flow implementations can focus on step-specific logic
/// (request-token fetch, verifier exchange, profile lookup). The protocol client is a
/// constructor-injected value; swap it out in tests, read it back via [`Broker::client`].
#[derive(Clone)]
pub struct Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Credential store implementation that persists the session.
	pub store: Arc<dyn CredentialStore>,
	/// Provider descriptor that defines the OAuth 1.0a endpoints.
	pub descriptor: ProviderDescriptor,
	client: Arc<Oauth1Client>,
}
impl<C> Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a broker that reuses the caller-provided transport.
	pub fn with_http_client(
		store: Arc<dyn CredentialStore>,
		descriptor: ProviderDescriptor,
		client: impl Into<Arc<Oauth1Client>>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self { http_client: http_client.into(), store, descriptor, client: client.into() }
	}

	/// Returns the injected protocol client.
	pub fn client(&self) -> &Oauth1Client {
		&self.client
	}

	/// Returns whether an access credential is currently installed. Pure query.
	pub fn is_authorized(&self) -> bool {
		self.client.is_authorized()
	}

	/// Clears the in-memory access credential only.
	///
	/// The persisted credential is deliberately left intact: the store holds the durable
	/// session and [`Broker::restore_session`] is the designed resurrection path. Callers
	/// wanting a destructive sign-out must also overwrite the store themselves.
	pub fn clear_authorization(&self) {
		self.client.set_access_token(None);
	}

	/// Re-reads the persisted credential and installs it as the active access token.
	///
	/// Clears the active token when the store holds no complete pair. Idempotent; returns
	/// whether the broker is authorized afterwards.
	pub async fn restore_session(&self) -> Result<bool> {
		let credential = self.store.load_credential().await?;
		let authorized = credential.is_some();

		self.client.set_access_token(credential);

		Ok(authorized)
	}
}
#[cfg(feature = "reqwest")]
impl Broker<ReqwestHttpClient> {
	/// Creates a new broker for the provided descriptor and protocol client.
	///
	/// The broker provisions its own reqwest-backed transport so callers do not need to
	/// pass HTTP handles explicitly. Follow up with [`Broker::restore_session`] to resume
	/// a previously persisted sign-in.
	pub fn new(
		store: Arc<dyn CredentialStore>,
		descriptor: ProviderDescriptor,
		client: impl Into<Arc<Oauth1Client>>,
	) -> Self {
		Self::with_http_client(store, descriptor, client, ReqwestHttpClient::default())
	}
}
impl<C> Debug for Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("descriptor", &self.descriptor)
			.field("authorized", &self.client.is_authorized())
			.finish()
	}
}
