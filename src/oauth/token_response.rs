//! Parser for the provider's non-standard token body.
//!
//! The token endpoint answers with plain text such as `access_token=abc123` rather than a JSON
//! document. The token is everything after `access_token=` up to the next `&`; other pairs are
//! ignored. A token containing `&` is therefore cut short, while `=` inside the value survives.

// self
use crate::{_prelude::*, auth::AccessToken};

const BODY_PREVIEW_LIMIT: usize = 256;

/// Extracts the raw `access_token` value, if the body carries a non-empty one.
pub fn parse_access_token(body: &str) -> Option<&str> {
	body.trim()
		.split('&')
		.find_map(|pair| pair.strip_prefix("access_token="))
		.filter(|value| !value.is_empty())
}

/// Builds an [`AccessToken`] from a successful token response body.
pub fn access_token_from_body(body: &str) -> Result<AccessToken> {
	parse_access_token(body)
		.map(AccessToken::new)
		.ok_or_else(|| Error::MissingAccessToken { body: truncate_preview(body) })
}

/// Shortens `body` for error messages.
pub(crate) fn truncate_preview(body: &str) -> String {
	if body.chars().count() <= BODY_PREVIEW_LIMIT {
		return body.to_owned();
	}

	let mut buf = body.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn plain_body_yields_the_token() {
		assert_eq!(parse_access_token("access_token=ABC123"), Some("ABC123"));
		assert_eq!(parse_access_token("access_token=ABC123\n"), Some("ABC123"));
	}

	#[test]
	fn extra_pairs_are_ignored() {
		assert_eq!(parse_access_token("access_token=ABC&expires_in=3600"), Some("ABC"));
		assert_eq!(parse_access_token("scope=basic&access_token=XYZ"), Some("XYZ"));
	}

	#[test]
	fn equals_inside_the_token_survives_but_ampersand_truncates() {
		assert_eq!(parse_access_token("access_token=dG9r==").map(str::len), Some(6));
		assert_eq!(parse_access_token("access_token=ab&cd"), Some("ab"));
	}

	#[test]
	fn missing_or_empty_token_is_a_client_error() {
		assert_eq!(parse_access_token(""), None);
		assert_eq!(parse_access_token("access_token="), None);
		assert_eq!(parse_access_token("{\"access_token\":\"abc\"}"), None);

		let err = access_token_from_body("error=invalid_code")
			.expect_err("Bodies without access_token should fail.");

		assert!(matches!(err, Error::MissingAccessToken { ref body } if body == "error=invalid_code"));
	}

	#[test]
	fn tokens_default_to_query_transmission_named_token() {
		let token = access_token_from_body("access_token=ABC123").expect("Token should parse.");

		assert_eq!(token.token().expose(), "ABC123");
		assert_eq!(token.transmission().param_name, "token");
		assert!(!token.expires());
	}

	#[test]
	fn previews_are_truncated() {
		let preview = truncate_preview(&"x".repeat(BODY_PREVIEW_LIMIT + 10));

		assert_eq!(preview.chars().count(), BODY_PREVIEW_LIMIT + 1);
		assert!(preview.ends_with('…'));
	}
}
