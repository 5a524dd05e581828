//! Broker-level error types shared across flows, the protocol facade, and stores.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Handshake step rejected by the provider or malformed on the wire.
	#[error(transparent)]
	Handshake(#[from] HandshakeError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Profile document could not be fetched or parsed.
	#[error(transparent)]
	Profile(#[from] ProfileError),

	/// A signed call was attempted while no access credential is installed.
	#[error("No access credential is installed; complete the authorization handshake first.")]
	NotAuthorized,
}

/// Failures raised while driving the three-legged handshake.
#[derive(Debug, ThisError)]
pub enum HandshakeError {
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint rejected the request: {message}.")]
	Endpoint {
		/// Provider-supplied response body summarizing the rejection.
		message: String,
		/// HTTP status code returned by the endpoint.
		status: u16,
	},
	/// Token endpoint response omitted a required protocol parameter.
	#[error("Token endpoint response is missing the `{parameter}` parameter.")]
	MissingParameter {
		/// Name of the absent `oauth_*` parameter.
		parameter: &'static str,
	},
	/// Token endpoint response was not valid UTF-8.
	#[error("Token endpoint returned a non-UTF-8 response body.")]
	BodyEncoding(#[from] std::str::Utf8Error),

	/// Verifier exchange was attempted without a pending request token.
	#[error("No request token is pending; begin a new authorization attempt first.")]
	NoPendingRequestToken,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures raised while fetching or parsing the user-details document.
#[derive(Debug, ThisError)]
pub enum ProfileError {
	/// User-details endpoint answered with a non-success status.
	#[error("User-details endpoint answered with HTTP status {status}.")]
	Endpoint {
		/// HTTP status code returned by the endpoint.
		status: u16,
	},
	/// Profile document could not be parsed as XML.
	#[error("User-details document is not well-formed XML.")]
	Xml(#[from] quick_xml::Error),
	/// Profile document carried a malformed attribute.
	#[error("User-details document carries a malformed attribute.")]
	Attribute(#[from] quick_xml::events::attributes::AttrError),
}
