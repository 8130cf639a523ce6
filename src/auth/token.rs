//! Access tokens minted by the token endpoint, plus how they ride along on API calls.

// crates.io
use oauth2::{
	HttpRequest,
	http::{Method, Request},
};
// self
use crate::{_prelude::*, error::ConfigError};

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenSecret(<redacted>)")
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Query parameter the access token rides in on API calls (`?<param_name>=<token>`).
///
/// The provider accepts tokens only in the query string; there is no header or body style.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransmission {
	/// Query parameter name.
	pub param_name: String,
}
impl TokenTransmission {
	/// Query-string transmission under `param_name`.
	pub fn query(param_name: impl Into<String>) -> Self {
		Self { param_name: param_name.into() }
	}
}

/// Access token for one callback invocation; never persisted by the strategy.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
	token: TokenSecret,
	refresh_token: Option<TokenSecret>,
	expires_at: Option<OffsetDateTime>,
	transmission: TokenTransmission,
}
impl AccessToken {
	/// Wraps `token` with query transmission under `token`, no expiry, and no refresh secret.
	pub fn new(token: impl Into<String>) -> Self {
		Self {
			token: TokenSecret::new(token),
			refresh_token: None,
			expires_at: None,
			transmission: TokenTransmission::query("token"),
		}
	}

	/// Attaches a refresh secret.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(refresh_token));

		self
	}

	/// Sets an absolute expiry instant.
	pub fn with_expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Overrides how the token is transmitted on API calls.
	pub fn with_transmission(mut self, transmission: TokenTransmission) -> Self {
		self.transmission = transmission;

		self
	}

	/// Access token secret.
	pub fn token(&self) -> &TokenSecret {
		&self.token
	}

	/// Refresh token secret, if the provider issued one.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		self.refresh_token.as_ref()
	}

	/// Expiry instant, if the token expires.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_at
	}

	/// Current transmission settings.
	pub fn transmission(&self) -> &TokenTransmission {
		&self.transmission
	}

	/// Returns `true` when the token carries an expiry.
	pub fn expires(&self) -> bool {
		self.expires_at.is_some()
	}

	/// Returns `true` when the token expires and `instant` is at or past its expiry.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}

	/// Checks expiry against the current UTC clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Adopts a freshly issued token while keeping this token's transmission settings and,
	/// when the provider did not rotate it, the existing refresh secret.
	pub fn rotate(&self, next: AccessToken) -> AccessToken {
		let AccessToken { token, refresh_token, expires_at, .. } = next;

		AccessToken {
			token,
			refresh_token: refresh_token.or_else(|| self.refresh_token.clone()),
			expires_at,
			transmission: self.transmission.clone(),
		}
	}

	/// Builds an HTTP request for `url` with the token appended as a query parameter.
	pub fn signed_request(&self, method: Method, mut url: Url) -> Result<HttpRequest, ConfigError> {
		url.query_pairs_mut().append_pair(&self.transmission.param_name, self.token.expose());

		Request::builder()
			.method(method)
			.uri(url.as_str())
			.body(Vec::new())
			.map_err(ConfigError::from)
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("expires_at", &self.expires_at)
			.field("transmission", &self.transmission)
			.finish()
	}
}
