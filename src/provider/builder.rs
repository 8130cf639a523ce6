//! Fluent and deserializable builder that validates settings into a [`StrategyConfig`].

// crates.io
use oauth2::{ClientId, ClientSecret};
// self
use crate::{
	_prelude::*,
	auth::ProviderName,
	error::ConfigError,
	provider::{ClientOptions, StrategyConfig, TokenMethod},
};

/// Builder for [`StrategyConfig`] values.
///
/// The builder deserializes with defaults for every field, so hosts can load it straight from
/// JSON or TOML settings and call [`build`](StrategyConfigBuilder::build) at startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfigBuilder {
	/// Strategy name.
	pub name: ProviderName,
	/// Application identifier; required.
	pub client_id: Option<String>,
	/// Application secret; required.
	pub client_secret: Option<String>,
	/// Static authorize parameters.
	pub authorize_params: BTreeMap<String, String>,
	/// Option names forwarded to the authorize request.
	pub authorize_options: BTreeSet<String>,
	/// Static token parameters.
	pub token_params: BTreeMap<String, String>,
	/// Option names forwarded to the token request.
	pub token_options: BTreeSet<String>,
	/// Named option values.
	pub options: BTreeMap<String, String>,
	/// Provider endpoint templates.
	pub client_options: ClientOptions,
	/// Callback path override; defaults to `/auth/{name}/callback`.
	pub callback_path: Option<String>,
	/// Random bytes per generated state token.
	pub state_bytes: usize,
	/// Refresh expired tokens before fetching the profile.
	pub refresh_expired: bool,
}
impl StrategyConfigBuilder {
	/// Sets the strategy name.
	pub fn name(mut self, name: ProviderName) -> Self {
		self.name = name;

		self
	}

	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
		self.client_secret = Some(client_secret.into());

		self
	}

	/// Points the endpoint templates at another origin.
	pub fn site(mut self, site: Url) -> Self {
		self.client_options.site = site.as_str().trim_end_matches('/').to_owned();

		self
	}

	/// Overrides the authorize path.
	pub fn authorize_path(mut self, path: impl Into<String>) -> Self {
		self.client_options.authorize_path = path.into();

		self
	}

	/// Overrides the token path.
	pub fn token_path(mut self, path: impl Into<String>) -> Self {
		self.client_options.token_path = path.into();

		self
	}

	/// Overrides the profile path.
	pub fn user_path(mut self, path: impl Into<String>) -> Self {
		self.client_options.user_path = path.into();

		self
	}

	/// Selects GET or POST for the token exchange.
	pub fn token_method(mut self, method: TokenMethod) -> Self {
		self.client_options.token_method = method;

		self
	}

	/// Adds a static authorize parameter.
	pub fn authorize_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.authorize_params.insert(key.into(), value.into());

		self
	}

	/// Allowlists an option for the authorize request.
	pub fn authorize_option(mut self, key: impl Into<String>) -> Self {
		self.authorize_options.insert(key.into());

		self
	}

	/// Adds a static token parameter.
	pub fn token_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.token_params.insert(key.into(), value.into());

		self
	}

	/// Allowlists an option for the token request.
	pub fn token_option(mut self, key: impl Into<String>) -> Self {
		self.token_options.insert(key.into());

		self
	}

	/// Sets a named option value.
	pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.options.insert(key.into(), value.into());

		self
	}

	/// Overrides the callback path.
	pub fn callback_path(mut self, path: impl Into<String>) -> Self {
		self.callback_path = Some(path.into());

		self
	}

	/// Overrides the state entropy.
	pub fn state_bytes(mut self, bytes: usize) -> Self {
		self.state_bytes = bytes;

		self
	}

	/// Enables or disables refreshing expired tokens during the callback.
	pub fn refresh_expired(mut self, enabled: bool) -> Self {
		self.refresh_expired = enabled;

		self
	}

	/// Consumes the builder and validates the resulting config.
	pub fn build(self) -> Result<StrategyConfig, ConfigError> {
		let client_id = self
			.client_id
			.filter(|value| !value.trim().is_empty())
			.ok_or(ConfigError::MissingClientId)?;
		let client_secret = self
			.client_secret
			.filter(|value| !value.trim().is_empty())
			.ok_or(ConfigError::MissingClientSecret)?;

		if self.state_bytes < StrategyConfig::MIN_STATE_BYTES {
			return Err(ConfigError::WeakStateEntropy {
				min: StrategyConfig::MIN_STATE_BYTES,
				actual: self.state_bytes,
			});
		}

		let endpoints = self.client_options.resolve_endpoints()?;
		let callback_path = self.callback_path.unwrap_or_else(|| self.name.callback_path());

		Ok(StrategyConfig {
			name: self.name,
			client_id: ClientId::new(client_id),
			client_secret: ClientSecret::new(client_secret),
			authorize_params: self.authorize_params,
			authorize_options: self.authorize_options,
			token_params: self.token_params,
			token_options: self.token_options,
			options: self.options,
			endpoints,
			token_method: self.client_options.token_method,
			callback_path,
			state_bytes: self.state_bytes,
			refresh_expired: self.refresh_expired,
		})
	}
}
impl Default for StrategyConfigBuilder {
	fn default() -> Self {
		Self {
			name: ProviderName::default(),
			client_id: None,
			client_secret: None,
			authorize_params: BTreeMap::new(),
			authorize_options: BTreeSet::from(["scope".to_owned()]),
			token_params: BTreeMap::new(),
			token_options: BTreeSet::new(),
			options: BTreeMap::new(),
			client_options: ClientOptions::default(),
			callback_path: None,
			state_bytes: StrategyConfig::MIN_STATE_BYTES,
			refresh_expired: true,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn missing_credentials_fail_at_build_time() {
		let err = StrategyConfigBuilder::default()
			.client_secret("secret")
			.build()
			.expect_err("Missing client_id should be rejected.");

		assert!(matches!(err, ConfigError::MissingClientId));

		let err = StrategyConfigBuilder::default()
			.client_id("id")
			.client_secret("   ")
			.build()
			.expect_err("Blank client_secret should be rejected.");

		assert!(matches!(err, ConfigError::MissingClientSecret));
	}

	#[test]
	fn weak_state_entropy_is_rejected() {
		let err = StrategyConfigBuilder::default()
			.client_id("id")
			.client_secret("secret")
			.state_bytes(8)
			.build()
			.expect_err("Short state tokens should be rejected.");

		assert!(matches!(err, ConfigError::WeakStateEntropy { min: 24, actual: 8 }));
	}

	#[test]
	fn defaults_match_the_provider() {
		let config = StrategyConfigBuilder::default()
			.client_id("id")
			.client_secret("secret")
			.build()
			.expect("Default config should build.");

		assert_eq!(config.name.to_string(), "kaeuferportal");
		assert_eq!(config.callback_path, "/auth/kaeuferportal/callback");
		assert_eq!(config.token_method, TokenMethod::Get);
		assert_eq!(config.state_bytes, 24);
		assert!(config.refresh_expired);
		assert!(config.authorize_options.contains("scope"));
		assert!(config.token_options.is_empty());
		assert_eq!(
			config.endpoints.token.url().as_str(),
			"https://www.kaeuferportal.de/oauth/access_token"
		);
		assert_eq!(config.endpoints.user.as_str(), "https://www.kaeuferportal.de/oauth/user");
	}

	#[test]
	fn builder_deserializes_from_settings() {
		let settings = r#"{
			"client_id": "from-json",
			"client_secret": "json-secret",
			"options": { "scope": "profile" },
			"client_options": { "site": "https://staging.example.com", "token_method": "post" }
		}"#;
		let config = serde_json::from_str::<StrategyConfigBuilder>(settings)
			.expect("Settings should deserialize.")
			.build()
			.expect("Deserialized settings should build.");

		assert_eq!(config.client_id.as_str(), "from-json");
		assert_eq!(config.client_secret.secret(), "json-secret");
		assert_eq!(config.token_method, TokenMethod::Post);
		assert_eq!(
			config.endpoints.authorize.url().as_str(),
			"https://staging.example.com/oauth/authorize"
		);
		assert_eq!(config.merged_authorize_params().get("scope").map(String::as_str), Some("profile"));
	}
}
