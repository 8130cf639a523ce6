//! Provider profile payloads and the provider-agnostic identity emitted on success.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ProviderName, TokenSecret},
};

/// User object returned by the profile endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
	/// Stable provider-side user identifier.
	pub uuid: String,
	/// Account e-mail address.
	pub email: String,
	/// Remaining profile fields, kept verbatim.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}
impl RawProfile {
	/// Local part of the e-mail address (everything before the first `@`).
	pub fn email_local_part(&self) -> &str {
		self.email.split_once('@').map_or(self.email.as_str(), |(local, _)| local)
	}
}

/// Display-level user information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
	/// Name derived from the e-mail local part.
	pub name: String,
	/// Full e-mail address.
	pub email: String,
}

/// Credentials the host may persist as it sees fit.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	/// Access token.
	pub token: TokenSecret,
	/// Present only when the token expires and a refresh token was issued.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
	/// Unix timestamp; present only when the token expires.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires_at: Option<i64>,
	/// Whether the token expires.
	pub expires: bool,
}
impl From<&AccessToken> for Credentials {
	fn from(token: &AccessToken) -> Self {
		let expires = token.expires();

		Self {
			token: token.token().clone(),
			refresh_token: token.refresh_token().filter(|_| expires).cloned(),
			expires_at: token.expires_at().map(OffsetDateTime::unix_timestamp),
			expires,
		}
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("expires_at", &self.expires_at)
			.field("expires", &self.expires)
			.finish()
	}
}

/// Extra provider data carried alongside the identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extra {
	/// Profile exactly as the provider returned it.
	pub raw_info: RawProfile,
}

/// Normalized identity handed to the host after a successful callback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthHash {
	/// Strategy name that produced the identity.
	pub provider: ProviderName,
	/// Provider user identifier (`uuid`).
	pub uid: String,
	/// Display information.
	pub info: Info,
	/// Token material.
	pub credentials: Credentials,
	/// Raw provider data.
	pub extra: Extra,
}
impl AuthHash {
	/// Derives the identity from one profile and the token used to fetch it.
	pub fn from_profile(provider: ProviderName, profile: RawProfile, token: &AccessToken) -> Self {
		let info = Info { name: profile.email_local_part().to_owned(), email: profile.email.clone() };

		Self {
			provider,
			uid: profile.uuid.clone(),
			info,
			credentials: Credentials::from(token),
			extra: Extra { raw_info: profile },
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	use time::macros;
	// self
	use super::*;

	fn profile(value: Value) -> RawProfile {
		serde_json::from_value(value).expect("Profile fixture should decode.")
	}

	#[test]
	fn identity_uses_uuid_and_email_local_part() {
		let raw = profile(json!({ "uuid": "u1", "email": "alice@example.com", "plan": "gold" }));
		let hash = AuthHash::from_profile(ProviderName::default(), raw, &AccessToken::new("t"));

		assert_eq!(hash.uid, "u1");
		assert_eq!(hash.info, Info { name: "alice".into(), email: "alice@example.com".into() });
		assert_eq!(hash.extra.raw_info.extra.get("plan"), Some(&json!("gold")));
	}

	#[test]
	fn email_without_at_sign_keeps_whole_value_as_name() {
		let raw = profile(json!({ "uuid": "u2", "email": "bob" }));

		assert_eq!(raw.email_local_part(), "bob");
	}

	#[test]
	fn non_expiring_credentials_omit_refresh_and_expiry() {
		let token = AccessToken::new("abc").with_refresh_token("refresh");
		let credentials = serde_json::to_value(Credentials::from(&token))
			.expect("Credentials should serialize.");

		assert_eq!(credentials, json!({ "token": "abc", "expires": false }));
	}

	#[test]
	fn expiring_credentials_include_refresh_and_expiry() {
		let expires_at = macros::datetime!(2030-01-01 00:00 UTC);
		let token = AccessToken::new("abc").with_refresh_token("refresh").with_expires_at(expires_at);
		let credentials = serde_json::to_value(Credentials::from(&token))
			.expect("Credentials should serialize.");

		assert_eq!(
			credentials,
			json!({
				"token": "abc",
				"refresh_token": "refresh",
				"expires_at": expires_at.unix_timestamp(),
				"expires": true,
			})
		);
	}

	#[test]
	fn expiring_credentials_without_refresh_keep_expiry() {
		let expires_at = macros::datetime!(2030-01-01 00:00 UTC);
		let credentials = Credentials::from(&AccessToken::new("abc").with_expires_at(expires_at));

		assert_eq!(credentials.refresh_token, None);
		assert_eq!(credentials.expires_at, Some(expires_at.unix_timestamp()));
		assert!(credentials.expires);
	}
}
