//! Three-legged handshake orchestration: begin (request token + consent URL) and finish
//! (verifier exchange + persistence + display-name lookup).
//!
//! Both steps are plain futures with typed results; callers await or compose them instead
//! of registering completion callbacks. `finish_authorization` resolves `Ok` even when the
//! display-name lookup failed: profile faults are logged and mapped to an empty name, and
//! they never disturb the credential that was already persisted.

// self
use crate::{
	_prelude::*,
	auth::{Credential, RequestToken},
	error::HandshakeError,
	flows::Broker,
	http::{ApiHttpClient, ApiRequest, HttpMethod},
	oauth::{self, SigningMode},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Consent-rendering seam implemented by the embedding UI.
///
/// The broker calls [`render`](ConsentSurface::render) exactly once per successful
/// [`Broker::begin_authorization`], handing over the fully-formed consent URL. What
/// "rendering" means (an embedded web view, a system browser, a printed line in a
/// terminal) is entirely up to the host.
pub trait ConsentSurface
where
	Self: Send + Sync,
{
	/// Displays the consent page for the in-progress authorization attempt.
	fn render(&self, authorize_url: &Url);
}

/// Describes an authorization attempt started by [`Broker::begin_authorization`].
///
/// The request token also stays recorded inside the protocol client, which is what
/// [`Broker::finish_authorization`] consumes; the session value exists so callers can
/// inspect or re-render the consent URL.
#[derive(Clone, Debug)]
pub struct AuthorizationSession {
	/// Request token issued for this attempt.
	pub request_token: RequestToken,
	/// Fully-formed consent URL handed to the surface.
	pub authorize_url: Url,
}

/// Result of a completed handshake.
#[derive(Clone, Debug)]
pub struct HandshakeOutcome {
	/// Access credential that was installed and persisted.
	pub credential: Credential,
	/// Display name extracted from the profile document; empty when retrieval failed.
	pub display_name: String,
}

impl<C> Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Starts an authorization attempt.
	///
	/// Fetches a request token from the provider, records it as the pending attempt,
	/// derives the consent URL, and hands that URL to `surface`. A second call while an
	/// attempt is pending replaces the pending token; the earlier attempt can no longer
	/// complete.
	pub async fn begin_authorization(
		&self,
		surface: &dyn ConsentSurface,
	) -> Result<AuthorizationSession> {
		const KIND: FlowKind = FlowKind::RequestToken;

		let span = FlowSpan::new(KIND, "begin_authorization");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request_token = self.fetch_request_token().await?;

				self.client().store_request_token(request_token.clone());

				let authorize_url = self.descriptor.authorize_url(&request_token);

				surface.render(&authorize_url);

				Ok(AuthorizationSession { request_token, authorize_url })
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Completes the pending authorization attempt with the user-supplied verifier.
	///
	/// Exchanges the pending request token + verifier for an access credential, installs
	/// it on the protocol client, persists it, then fetches the user's display name and
	/// persists that too. The credential write happens before the profile lookup, and a
	/// profile failure only costs the display name (logged, mapped to the empty string).
	pub async fn finish_authorization(&self, verifier: &str) -> Result<HandshakeOutcome> {
		const KIND: FlowKind = FlowKind::AccessToken;

		let span = FlowSpan::new(KIND, "finish_authorization");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request_token = self
					.client()
					.take_request_token()
					.ok_or(HandshakeError::NoPendingRequestToken)?;
				let credential = self.exchange_verifier(&request_token, verifier).await?;

				self.client().set_access_token(Some(credential.clone()));
				self.store.save_credential(credential.clone()).await?;

				let display_name = match self.user_display_name().await {
					Ok(name) => name.unwrap_or_default(),
					Err(error) => {
						obs::log_suppressed_error("user_display_name", &error);

						String::new()
					},
				};

				if let Err(error) = self.store.save_display_name(display_name.clone()).await {
					obs::log_suppressed_error("save_display_name", &error.into());
				}

				Ok(HandshakeOutcome { credential, display_name })
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn fetch_request_token(&self) -> Result<RequestToken> {
		let url = self.descriptor.endpoints.request_token.clone();
		let header = self.client().authorization_header(
			HttpMethod::Post,
			&url,
			SigningMode::RequestToken { callback: self.descriptor.callback() },
		)?;
		let request = ApiRequest::new(HttpMethod::Post, url).with_authorization(header);
		let response = self.http_client.execute(request).await?;

		oauth::parse_request_token(&response)
	}

	async fn exchange_verifier(
		&self,
		request_token: &RequestToken,
		verifier: &str,
	) -> Result<Credential> {
		let url = self.descriptor.endpoints.access_token.clone();
		let header = self.client().authorization_header(
			HttpMethod::Post,
			&url,
			SigningMode::Verifier { request_token, verifier },
		)?;
		let request = ApiRequest::new(HttpMethod::Post, url).with_authorization(header);
		let response = self.http_client.execute(request).await?;

		oauth::parse_access_token(&response)
	}
}
