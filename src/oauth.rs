//! Internal OAuth 1.0a protocol facade.
//!
//! [`Oauth1Client`] owns the consumer credentials plus the two mutable token slots of a
//! sign-in session: the long-lived access credential and the transient request token of an
//! in-progress handshake. Signature mechanics (base-string normalization, nonce/timestamp
//! generation, HMAC-SHA1) are delegated to the `oauth1-request` crate; this module only
//! decides which credentials and protocol parameters participate in each signature and
//! parses the form-encoded token responses coming back from the provider.

pub use oauth1_request;

// crates.io
use oauth1_request::{
	Builder as SignatureBuilder, Credentials as SigningCredentials, HMAC_SHA1, ParameterList,
};
// self
use crate::{
	_prelude::*,
	auth::{Credential, CredentialError, RequestToken, TokenSecret},
	error::HandshakeError,
	http::{ApiResponse, HttpMethod},
};

const BODY_PREVIEW_LIMIT: usize = 256;

/// Selects which credentials and protocol parameters participate in a signature.
#[derive(Clone, Copy, Debug)]
pub enum SigningMode<'a> {
	/// Initial request-token call: consumer credentials only, plus `oauth_callback`.
	RequestToken {
		/// Callback value announced to the provider (`oob` for out-of-band consent).
		callback: &'a str,
	},
	/// Access-token exchange: signs with a request token and the user-supplied verifier.
	Verifier {
		/// Request token recorded when the handshake began.
		request_token: &'a RequestToken,
		/// Verifier code the user copied out of the consent surface.
		verifier: &'a str,
	},
	/// Regular API call signed with the active access credential.
	AccessToken,
}

#[derive(Debug, Default)]
struct ClientState {
	access_token: Option<Credential>,
	pending_request: Option<RequestToken>,
}

/// Stateful OAuth 1.0a client: consumer credentials plus the session's token slots.
///
/// The client is a plain owned value with interior mutability; construct one, hand it to a
/// broker, and substitute it freely in tests. There is no ambient or static instance.
pub struct Oauth1Client {
	consumer_key: String,
	consumer_secret: TokenSecret,
	state: RwLock<ClientState>,
}
impl Oauth1Client {
	/// Creates a client for the provided consumer key/secret. No I/O is performed.
	pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
		Self {
			consumer_key: consumer_key.into(),
			consumer_secret: TokenSecret::new(consumer_secret),
			state: RwLock::new(ClientState::default()),
		}
	}

	/// Returns the consumer key the client signs with.
	pub fn consumer_key(&self) -> &str {
		&self.consumer_key
	}

	/// Returns a copy of the active access credential, if one is installed.
	pub fn access_token(&self) -> Option<Credential> {
		self.state.read().access_token.clone()
	}

	/// Installs or clears the active access credential.
	pub fn set_access_token(&self, credential: Option<Credential>) {
		self.state.write().access_token = credential;
	}

	/// Returns whether an access credential is currently installed. Pure query.
	pub fn is_authorized(&self) -> bool {
		self.state.read().access_token.is_some()
	}

	/// Records the request token of an in-progress handshake.
	///
	/// A token recorded while another is pending replaces it: overlapping authorization
	/// attempts are not guarded, and only the most recent attempt can complete.
	pub fn store_request_token(&self, token: RequestToken) {
		self.state.write().pending_request = Some(token);
	}

	/// Takes the pending request token, leaving the slot empty.
	///
	/// The exchange consumes the token whether or not it succeeds; a failed exchange
	/// requires a fresh authorization attempt.
	pub fn take_request_token(&self) -> Option<RequestToken> {
		self.state.write().pending_request.take()
	}

	/// Produces the `Authorization` header value for the given call.
	///
	/// Query parameters already present on `url` participate in the signature; request
	/// bodies never do. Fails with [`Error::NotAuthorized`] when
	/// [`SigningMode::AccessToken`] is requested while no credential is installed.
	pub fn authorization_header(
		&self,
		method: HttpMethod,
		url: &Url,
		mode: SigningMode,
	) -> Result<String> {
		let mut base = url.clone();
		let mut query: Vec<(String, String)> = url.query_pairs().into_owned().collect();

		base.set_query(None);
		base.set_fragment(None);
		query.sort();

		let params = ParameterList::new(query);
		let consumer =
			SigningCredentials::new(self.consumer_key.as_str(), self.consumer_secret.expose());
		let active;
		let (token, callback, verifier) = match mode {
			SigningMode::RequestToken { callback } => (None, Some(callback), None),
			SigningMode::Verifier { request_token, verifier } => (
				Some(SigningCredentials::new(
					request_token.token(),
					request_token.secret().expose(),
				)),
				None,
				Some(verifier),
			),
			SigningMode::AccessToken => {
				active = self.access_token().ok_or(Error::NotAuthorized)?;

				(
					Some(SigningCredentials::new(active.token(), active.token_secret().expose())),
					None,
					None,
				)
			},
		};
		let mut builder = SignatureBuilder::new(consumer, HMAC_SHA1);

		builder.token(token);

		if let Some(callback) = callback {
			builder.callback(callback);
		}
		if let Some(verifier) = verifier {
			builder.verifier(verifier);
		}

		let header = match method {
			HttpMethod::Get => builder.get(&base, &params),
			HttpMethod::Post => builder.post(&base, &params),
			HttpMethod::Put => builder.put(&base, &params),
			HttpMethod::Delete => builder.delete(&base, &params),
		};

		Ok(header)
	}
}
impl Debug for Oauth1Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.state.read();

		f.debug_struct("Oauth1Client")
			.field("consumer_key", &self.consumer_key)
			.field("authorized", &state.access_token.is_some())
			.field("handshake_pending", &state.pending_request.is_some())
			.finish()
	}
}

/// Parses a request-token endpoint response into a [`RequestToken`].
pub fn parse_request_token(response: &ApiResponse) -> Result<RequestToken> {
	let (token, secret) = parse_token_pair(response)?;

	Ok(RequestToken::new(token, secret))
}

/// Parses an access-token endpoint response into a complete [`Credential`].
pub fn parse_access_token(response: &ApiResponse) -> Result<Credential> {
	let (token, secret) = parse_token_pair(response)?;

	// The provider answering 200 with an empty half is a protocol violation, not an
	// unauthenticated state.
	Credential::new(token, secret).map_err(|e| {
		let parameter = match e {
			CredentialError::EmptyToken => "oauth_token",
			CredentialError::EmptySecret => "oauth_token_secret",
		};

		HandshakeError::MissingParameter { parameter }.into()
	})
}

fn parse_token_pair(response: &ApiResponse) -> Result<(String, String)> {
	if !response.is_success() {
		return Err(HandshakeError::Endpoint {
			message: body_preview(response),
			status: response.status,
		}
		.into());
	}

	let body = std::str::from_utf8(&response.body).map_err(HandshakeError::from)?;
	let mut token = None;
	let mut secret = None;

	for (key, value) in url::form_urlencoded::parse(body.as_bytes()) {
		match key.as_ref() {
			"oauth_token" => token = Some(value.into_owned()),
			"oauth_token_secret" => secret = Some(value.into_owned()),
			_ => {},
		}
	}

	let token = token.ok_or(HandshakeError::MissingParameter { parameter: "oauth_token" })?;
	let secret =
		secret.ok_or(HandshakeError::MissingParameter { parameter: "oauth_token_secret" })?;

	Ok((token, secret))
}

fn body_preview(response: &ApiResponse) -> String {
	let text = response.text();
	let trimmed = text.trim();

	if trimmed.is_empty() {
		format!("HTTP status {}", response.status)
	} else {
		trimmed.chars().take(BODY_PREVIEW_LIMIT).collect()
	}
}
