// self
use crate::{
	_prelude::*,
	provider::{ProviderDescriptor, ProviderEndpoints, ProviderId, ProviderIdError},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Request-token endpoint is required to open the handshake.
	#[error("Missing request-token endpoint.")]
	MissingRequestTokenEndpoint,
	/// Authorization endpoint is required for the consent step.
	#[error("Missing authorization endpoint.")]
	MissingAuthorizationEndpoint,
	/// Access-token endpoint is required to close the handshake.
	#[error("Missing access-token endpoint.")]
	MissingAccessTokenEndpoint,
	/// User-details endpoint is required for the display-name lookup.
	#[error("Missing user-details endpoint.")]
	MissingUserDetailsEndpoint,
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoint literal could not be parsed as a URL.
	#[error("Endpoint URL is invalid: {url}.")]
	InvalidEndpointUrl {
		/// Endpoint literal that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Provider identifier failed validation.
	#[error(transparent)]
	InvalidId(#[from] ProviderIdError),
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: ProviderId,
	/// Request-token endpoint opening the handshake.
	pub request_token_endpoint: Option<Url>,
	/// Authorization endpoint the user consents on.
	pub authorization_endpoint: Option<Url>,
	/// Access-token endpoint closing the handshake.
	pub access_token_endpoint: Option<Url>,
	/// Authenticated user-details endpoint.
	pub user_details_endpoint: Option<Url>,
	/// Optional callback URL receiving the verifier.
	pub callback: Option<Url>,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self {
			id,
			request_token_endpoint: None,
			authorization_endpoint: None,
			access_token_endpoint: None,
			user_details_endpoint: None,
			callback: None,
		}
	}

	/// Sets the request-token endpoint.
	pub fn request_token_endpoint(mut self, url: Url) -> Self {
		self.request_token_endpoint = Some(url);

		self
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the access-token endpoint.
	pub fn access_token_endpoint(mut self, url: Url) -> Self {
		self.access_token_endpoint = Some(url);

		self
	}

	/// Sets the user-details endpoint.
	pub fn user_details_endpoint(mut self, url: Url) -> Self {
		self.user_details_endpoint = Some(url);

		self
	}

	/// Sets the callback URL; out-of-band consent is announced when none is configured.
	pub fn callback(mut self, url: Url) -> Self {
		self.callback = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let request_token = self
			.request_token_endpoint
			.ok_or(ProviderDescriptorError::MissingRequestTokenEndpoint)?;
		let authorization = self
			.authorization_endpoint
			.ok_or(ProviderDescriptorError::MissingAuthorizationEndpoint)?;
		let access_token = self
			.access_token_endpoint
			.ok_or(ProviderDescriptorError::MissingAccessTokenEndpoint)?;
		let user_details =
			self.user_details_endpoint.ok_or(ProviderDescriptorError::MissingUserDetailsEndpoint)?;
		let endpoints =
			ProviderEndpoints { request_token, authorization, access_token, user_details };
		let descriptor = ProviderDescriptor { id: self.id, endpoints, callback: self.callback };

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_endpoint("request-token", &self.endpoints.request_token)?;
		validate_endpoint("authorization", &self.endpoints.authorization)?;
		validate_endpoint("access-token", &self.endpoints.access_token)?;
		validate_endpoint("user-details", &self.endpoints.user_details)?;

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	if url.scheme() != "https" {
		Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	} else {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse endpoint fixture.")
	}

	fn builder() -> ProviderDescriptorBuilder {
		let id = ProviderId::new("fixture").expect("Identifier fixture should be valid.");

		ProviderDescriptor::builder(id)
	}

	#[test]
	fn build_requires_every_endpoint() {
		let err = builder()
			.request_token_endpoint(url("https://example.com/oauth/request_token"))
			.authorization_endpoint(url("https://example.com/oauth/authorize"))
			.access_token_endpoint(url("https://example.com/oauth/access_token"))
			.build()
			.expect_err("Missing user-details endpoint should be rejected.");

		assert_eq!(err, ProviderDescriptorError::MissingUserDetailsEndpoint);
	}

	#[test]
	fn build_rejects_insecure_endpoints() {
		let err = builder()
			.request_token_endpoint(url("https://example.com/oauth/request_token"))
			.authorization_endpoint(url("http://example.com/oauth/authorize"))
			.access_token_endpoint(url("https://example.com/oauth/access_token"))
			.user_details_endpoint(url("https://example.com/api/0.6/user/details"))
			.build()
			.expect_err("Insecure authorization endpoint should be rejected.");

		assert!(matches!(
			err,
			ProviderDescriptorError::InsecureEndpoint { endpoint: "authorization", .. }
		));
	}

	#[test]
	fn callback_defaults_to_out_of_band() {
		let descriptor = builder()
			.request_token_endpoint(url("https://example.com/oauth/request_token"))
			.authorization_endpoint(url("https://example.com/oauth/authorize"))
			.access_token_endpoint(url("https://example.com/oauth/access_token"))
			.user_details_endpoint(url("https://example.com/api/0.6/user/details"))
			.build()
			.expect("Descriptor fixture should build.");

		assert_eq!(descriptor.callback(), "oob");

		let descriptor = builder()
			.request_token_endpoint(url("https://example.com/oauth/request_token"))
			.authorization_endpoint(url("https://example.com/oauth/authorize"))
			.access_token_endpoint(url("https://example.com/oauth/access_token"))
			.user_details_endpoint(url("https://example.com/api/0.6/user/details"))
			.callback(url("https://app.example.com/verifier"))
			.build()
			.expect("Descriptor fixture should build.");

		assert_eq!(descriptor.callback(), "https://app.example.com/verifier");
	}
}
