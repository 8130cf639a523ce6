//! Immutable strategy configuration and endpoint resolution.

// crates.io
use oauth2::{AuthUrl, ClientId, ClientSecret, TokenUrl};
// self
use crate::{_prelude::*, auth::ProviderName, error::ConfigError};

/// HTTP method used for the token exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenMethod {
	#[default]
	/// Parameters travel in the query string.
	Get,
	/// Parameters travel in an `application/x-www-form-urlencoded` body.
	Post,
}

/// Endpoint templates joined onto `site` when the config is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
	/// Provider origin, e.g. `https://www.kaeuferportal.de`.
	pub site: String,
	/// Authorize path (or absolute URL).
	pub authorize_path: String,
	/// Token path (or absolute URL).
	pub token_path: String,
	/// Profile path (or absolute URL).
	pub user_path: String,
	/// Token exchange method.
	pub token_method: TokenMethod,
}
impl ClientOptions {
	/// Default provider origin.
	pub const DEFAULT_SITE: &'static str = "https://www.kaeuferportal.de";

	fn resolve(&self, endpoint: &'static str, path: &str) -> Result<Url, ConfigError> {
		let joined = if path.starts_with("https://") || path.starts_with("http://") {
			path.to_owned()
		} else if path.starts_with('/') {
			format!("{}{path}", self.site.trim_end_matches('/'))
		} else {
			format!("{}/{path}", self.site.trim_end_matches('/'))
		};

		Url::parse(&joined).map_err(|source| ConfigError::InvalidEndpoint {
			endpoint,
			url: joined.clone(),
			source,
		})
	}

	pub(crate) fn resolve_endpoints(&self) -> Result<ResolvedEndpoints, ConfigError> {
		let authorize = self.resolve("authorize", &self.authorize_path)?;
		let token = self.resolve("token", &self.token_path)?;
		let user = self.resolve("user", &self.user_path)?;

		Ok(ResolvedEndpoints {
			authorize: AuthUrl::from_url(authorize),
			token: TokenUrl::from_url(token),
			user,
		})
	}
}
impl Default for ClientOptions {
	fn default() -> Self {
		Self {
			site: Self::DEFAULT_SITE.into(),
			authorize_path: "/oauth/authorize".into(),
			token_path: "/oauth/access_token".into(),
			user_path: "/oauth/user".into(),
			token_method: TokenMethod::default(),
		}
	}
}

/// Absolute endpoint URLs computed once from [`ClientOptions`].
#[derive(Clone, Debug)]
pub struct ResolvedEndpoints {
	/// Authorize endpoint the user is redirected to.
	pub authorize: AuthUrl,
	/// Token endpoint used for code exchange and refresh.
	pub token: TokenUrl,
	/// Profile endpoint.
	pub user: Url,
}

/// Validated, immutable configuration consumed by the strategy.
#[derive(Clone, Debug)]
pub struct StrategyConfig {
	/// Key the host resolves to this strategy.
	pub name: ProviderName,
	/// Application identifier registered with the provider.
	pub client_id: ClientId,
	/// Application secret registered with the provider.
	pub client_secret: ClientSecret,
	/// Static authorize parameters; a non-blank `state` here is used verbatim.
	pub authorize_params: BTreeMap<String, String>,
	/// Option names forwarded to the authorize request when set.
	pub authorize_options: BTreeSet<String>,
	/// Static token parameters.
	pub token_params: BTreeMap<String, String>,
	/// Option names forwarded to the token request when set.
	pub token_options: BTreeSet<String>,
	/// Named option values the allowlists draw from.
	pub options: BTreeMap<String, String>,
	/// Resolved provider endpoints.
	pub endpoints: ResolvedEndpoints,
	/// Token exchange method.
	pub token_method: TokenMethod,
	/// Callback path appended to the host and script name.
	pub callback_path: String,
	/// Random bytes per generated state token.
	pub state_bytes: usize,
	/// Refresh expired tokens before fetching the profile.
	pub refresh_expired: bool,
}
impl StrategyConfig {
	/// Smallest accepted state entropy, in bytes.
	pub const MIN_STATE_BYTES: usize = 24;

	/// Authorize params merged with the allowlisted option values (options win).
	pub fn merged_authorize_params(&self) -> BTreeMap<String, String> {
		merge_options(&self.authorize_params, &self.authorize_options, &self.options)
	}

	/// Token params merged with the allowlisted option values (options win).
	pub fn merged_token_params(&self) -> BTreeMap<String, String> {
		merge_options(&self.token_params, &self.token_options, &self.options)
	}
}

fn merge_options(
	params: &BTreeMap<String, String>,
	keys: &BTreeSet<String>,
	options: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
	let mut merged = params.clone();

	for key in keys {
		if let Some(value) = options.get(key) {
			merged.insert(key.clone(), value.clone());
		}
	}

	merged
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn endpoints_join_site_and_paths() {
		let options = ClientOptions {
			site: "https://provider.example.com/".into(),
			user_path: "api/me".into(),
			..ClientOptions::default()
		};
		let endpoints = options.resolve_endpoints().expect("Endpoints should resolve.");

		assert_eq!(endpoints.authorize.url().as_str(), "https://provider.example.com/oauth/authorize");
		assert_eq!(endpoints.token.url().as_str(), "https://provider.example.com/oauth/access_token");
		assert_eq!(endpoints.user.as_str(), "https://provider.example.com/api/me");
	}

	#[test]
	fn absolute_paths_bypass_site() {
		let options = ClientOptions {
			token_path: "https://tokens.example.com/exchange".into(),
			..ClientOptions::default()
		};
		let endpoints = options.resolve_endpoints().expect("Endpoints should resolve.");

		assert_eq!(endpoints.token.url().as_str(), "https://tokens.example.com/exchange");
		assert_eq!(
			endpoints.authorize.url().as_str(),
			"https://www.kaeuferportal.de/oauth/authorize"
		);
	}

	#[test]
	fn malformed_site_is_rejected() {
		let options = ClientOptions { site: "not a url".into(), ..ClientOptions::default() };
		let err = options.resolve_endpoints().expect_err("Malformed site should fail.");

		assert!(matches!(err, ConfigError::InvalidEndpoint { endpoint: "authorize", .. }));
	}

	#[test]
	fn allowlisted_options_override_static_params() {
		let params = BTreeMap::from([("scope".to_owned(), "basic".to_owned())]);
		let keys = BTreeSet::from(["scope".to_owned(), "display".to_owned()]);
		let options = BTreeMap::from([
			("scope".to_owned(), "profile".to_owned()),
			("locale".to_owned(), "de".to_owned()),
		]);
		let merged = merge_options(&params, &keys, &options);

		assert_eq!(merged, BTreeMap::from([("scope".to_owned(), "profile".to_owned())]));
	}
}
