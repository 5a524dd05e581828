//! One-shot signed and unsigned API request helpers.

// self
use crate::{
	_prelude::*,
	flows::Broker,
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpMethod},
	oauth::SigningMode,
};

/// Content type attached to request bodies; the map-data API speaks XML.
const BODY_CONTENT_TYPE: &str = "text/xml";

impl<C> Broker<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Executes a request signed with the active access credential.
	///
	/// Query parameters on `url` participate in the signature; the body, if any, does
	/// not. Fails with [`Error::NotAuthorized`] while no credential is installed;
	/// transport faults propagate as-is.
	pub async fn signed_request(
		&self,
		method: HttpMethod,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<ApiResponse> {
		let header = self.client().authorization_header(method, &url, SigningMode::AccessToken)?;
		let request = ApiRequest::new(method, url).with_authorization(header);

		self.execute(request, body).await
	}

	/// Executes a request without attaching authorization credentials.
	pub async fn unsigned_request(
		&self,
		method: HttpMethod,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<ApiResponse> {
		self.execute(ApiRequest::new(method, url), body).await
	}

	/// Convenience one-shot signed GET.
	pub async fn signed_get(&self, url: Url) -> Result<ApiResponse> {
		self.signed_request(HttpMethod::Get, url, None).await
	}

	async fn execute(&self, mut request: ApiRequest, body: Option<Vec<u8>>) -> Result<ApiResponse> {
		if let Some(body) = body {
			request = request.with_body(body, BODY_CONTENT_TYPE);
		}

		self.http_client.execute(request).await.map_err(Error::from)
	}
}
