//! Transport primitives for provider calls.
//!
//! The module exposes [`ApiHttpClient`] alongside the [`ApiRequest`]/[`ApiResponse`] value
//! types so downstream crates can integrate custom HTTP clients. The contract is
//! object-safe on purpose: flows only ever see boxed futures, which lets tests substitute
//! in-process doubles that record the order of outbound calls.

// std
use std::{borrow::Cow, ops::Deref};
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing provider calls.
///
/// The trait acts as the broker's only dependency on an HTTP stack. Callers provide an
/// implementation (typically behind `Arc<T>`) and flows submit fully-formed
/// [`ApiRequest`] values, so implementations never need to understand OAuth signing.
/// Implementations must be `Send + Sync + 'static` so they can be shared across broker
/// instances without additional wrappers.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes the request and resolves with the raw response.
	fn execute(&self, request: ApiRequest) -> ApiFuture<'_, ApiResponse>;
}

/// HTTP verbs accepted by the broker's request helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// HTTP GET.
	Get,
	/// HTTP POST.
	Post,
	/// HTTP PUT.
	Put,
	/// HTTP DELETE.
	Delete,
}
impl HttpMethod {
	/// Returns the canonical verb spelling used on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Delete => "DELETE",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully-formed outbound request handed to the transport.
///
/// The authorization header is an explicit field rather than a generic header map because
/// signed-versus-unsigned is the distinction flows care about; everything else about the
/// request is fixed by the caller.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP verb for the call.
	pub method: HttpMethod,
	/// Target URL including any query parameters.
	pub url: Url,
	/// Pre-computed `Authorization` header value, when the call is signed.
	pub authorization: Option<String>,
	/// Raw request body bytes. Bodies are not covered by OAuth 1.0a signatures.
	pub body: Option<Vec<u8>>,
	/// `Content-Type` header accompanying the body, when one is set.
	pub content_type: Option<&'static str>,
}
impl ApiRequest {
	/// Creates a bare request for the provided verb and URL.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { method, url, authorization: None, body: None, content_type: None }
	}

	/// Attaches a pre-computed `Authorization` header value.
	pub fn with_authorization(mut self, header: String) -> Self {
		self.authorization = Some(header);

		self
	}

	/// Attaches a request body and its content type.
	pub fn with_body(mut self, body: Vec<u8>, content_type: &'static str) -> Self {
		self.body = Some(body);
		self.content_type = Some(content_type);

		self
	}
}

/// Raw response surfaced back to flows.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns the body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.body)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The wrapped client is used as-is; timeout and proxy policy are whatever the caller
/// configured on it. The broker adds no retry or backoff of its own.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> ApiFuture<'_, ApiResponse> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				HttpMethod::Get => reqwest::Method::GET,
				HttpMethod::Post => reqwest::Method::POST,
				HttpMethod::Put => reqwest::Method::PUT,
				HttpMethod::Delete => reqwest::Method::DELETE,
			};
			let mut builder = client.request(method, request.url);

			if let Some(authorization) = request.authorization {
				builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
			}
			if let Some(content_type) = request.content_type {
				builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(ApiResponse { status, body })
		})
	}
}
