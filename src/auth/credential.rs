//! Access and request credential pairs exchanged during the OAuth 1.0a handshake.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Errors raised when a credential pair fails validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CredentialError {
	/// The token half of the pair was empty.
	#[error("Access token cannot be empty.")]
	EmptyToken,
	/// The secret half of the pair was empty.
	#[error("Access token secret cannot be empty.")]
	EmptySecret,
}

/// Long-lived access credential pair used to sign API requests on the user's behalf.
///
/// A credential is only constructible from two non-empty halves, so a partially populated
/// pair is unrepresentable; stores either hold a complete credential or none at all.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	token: String,
	token_secret: TokenSecret,
}
impl Credential {
	/// Builds a credential after validating that both halves are non-empty.
	pub fn new(
		token: impl Into<String>,
		token_secret: impl Into<String>,
	) -> Result<Self, CredentialError> {
		let token = token.into();
		let token_secret = token_secret.into();

		if token.is_empty() {
			return Err(CredentialError::EmptyToken);
		}
		if token_secret.is_empty() {
			return Err(CredentialError::EmptySecret);
		}

		Ok(Self { token, token_secret: TokenSecret::new(token_secret) })
	}

	/// Returns the public token identifier.
	pub fn token(&self) -> &str {
		&self.token
	}

	/// Returns the signing secret paired with the token.
	pub fn token_secret(&self) -> &TokenSecret {
		&self.token_secret
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("token", &self.token)
			.field("token_secret", &"<redacted>")
			.finish()
	}
}

/// Short-lived request token identifying an in-progress authorization attempt.
///
/// Held in the client's pending slot between the begin and finish steps of a handshake;
/// never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestToken {
	token: String,
	secret: TokenSecret,
}
impl RequestToken {
	/// Wraps a request token pair as returned by the request-token endpoint.
	pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
		Self { token: token.into(), secret: TokenSecret::new(secret) }
	}

	/// Returns the public token identifier sent back through the authorization URL.
	pub fn token(&self) -> &str {
		&self.token
	}

	/// Returns the signing secret used during the verifier exchange.
	pub fn secret(&self) -> &TokenSecret {
		&self.secret
	}
}
impl Debug for RequestToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestToken")
			.field("token", &self.token)
			.field("secret", &"<redacted>")
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn credential_rejects_empty_halves() {
		assert_eq!(Credential::new("", "secret"), Err(CredentialError::EmptyToken));
		assert_eq!(Credential::new("token", ""), Err(CredentialError::EmptySecret));

		let credential =
			Credential::new("token", "secret").expect("Complete pair should be accepted.");

		assert_eq!(credential.token(), "token");
		assert_eq!(credential.token_secret().expose(), "secret");
	}

	#[test]
	fn debug_redacts_secret_halves() {
		let credential =
			Credential::new("token-value", "secret-value").expect("Failed to build credential.");
		let rendered = format!("{credential:?}");

		assert!(rendered.contains("token-value"));
		assert!(!rendered.contains("secret-value"));

		let request = RequestToken::new("request-value", "request-secret");
		let rendered = format!("{request:?}");

		assert!(rendered.contains("request-value"));
		assert!(!rendered.contains("request-secret"));
	}
}
