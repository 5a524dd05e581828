//! Provider descriptor data structures and helpers shared by all flows.

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, auth::RequestToken};

/// Out-of-band callback value announced when no callback URL is configured.
pub const OOB_CALLBACK: &str = "oob";

const PROVIDER_ID_MAX_LEN: usize = 128;

/// Error returned when provider identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum ProviderIdError {
	/// The identifier was empty.
	#[error("Provider identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Provider identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed character count.
	#[error("Provider identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Identifier for an OAuth 1.0a provider descriptor.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderId(String);
impl ProviderId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, ProviderIdError> {
		let view = value.as_ref();

		if view.is_empty() {
			return Err(ProviderIdError::Empty);
		}
		if view.chars().any(char::is_whitespace) {
			return Err(ProviderIdError::ContainsWhitespace);
		}
		if view.len() > PROVIDER_ID_MAX_LEN {
			return Err(ProviderIdError::TooLong { max: PROVIDER_ID_MAX_LEN });
		}

		Ok(Self(view.to_owned()))
	}
}
impl AsRef<str> for ProviderId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<ProviderId> for String {
	fn from(value: ProviderId) -> Self {
		value.0
	}
}
impl TryFrom<String> for ProviderId {
	type Error = ProviderIdError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(&value)
	}
}
impl FromStr for ProviderId {
	type Err = ProviderIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for ProviderId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Provider({})", self.0)
	}
}
impl Display for ProviderId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Request-token endpoint opening the handshake.
	pub request_token: Url,
	/// Authorization endpoint the user consents on.
	pub authorization: Url,
	/// Access-token endpoint closing the handshake.
	pub access_token: Url,
	/// Authenticated user-details endpoint serving the profile document.
	pub user_details: Url,
}

/// Immutable provider descriptor consumed by flows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Descriptor identifier.
	pub id: ProviderId,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Callback URL receiving the verifier, or `None` for out-of-band consent.
	pub callback: Option<Url>,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Descriptor for the public OpenStreetMap API.
	pub fn openstreetmap() -> Result<Self, ProviderDescriptorError> {
		let id = ProviderId::new("openstreetmap").map_err(ProviderDescriptorError::InvalidId)?;

		Self::builder(id)
			.request_token_endpoint(parse_endpoint(
				"https://www.openstreetmap.org/oauth/request_token",
			)?)
			.authorization_endpoint(parse_endpoint(
				"https://www.openstreetmap.org/oauth/authorize",
			)?)
			.access_token_endpoint(parse_endpoint(
				"https://www.openstreetmap.org/oauth/access_token",
			)?)
			.user_details_endpoint(parse_endpoint(
				"https://api.openstreetmap.org/api/0.6/user/details",
			)?)
			.build()
	}

	/// Derives the consent URL for a freshly issued request token.
	///
	/// The rule is fixed by the protocol: the authorization endpoint with the token
	/// appended as the `oauth_token` query parameter.
	pub fn authorize_url(&self, request_token: &RequestToken) -> Url {
		let mut url = self.endpoints.authorization.clone();

		url.query_pairs_mut().append_pair("oauth_token", request_token.token());

		url
	}

	/// Returns the callback value announced on the request-token call.
	pub fn callback(&self) -> &str {
		self.callback.as_ref().map_or(OOB_CALLBACK, Url::as_str)
	}
}

fn parse_endpoint(value: &str) -> Result<Url, ProviderDescriptorError> {
	Url::parse(value).map_err(|source| ProviderDescriptorError::InvalidEndpointUrl {
		url: value.to_owned(),
		source,
	})
}
