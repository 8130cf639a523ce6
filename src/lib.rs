//! Käuferportal sign-in for web authentication middleware: authorize redirects, CSRF-checked
//! callbacks, a quirky token exchange, and provider-agnostic identities in one strategy.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod session;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test`
	//! feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		flows::KaeuferportalStrategy,
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
		provider::{StrategyConfig, StrategyConfigBuilder},
	};

	/// Strategy type alias used by reqwest-backed integration tests.
	pub type ReqwestTestStrategy =
		KaeuferportalStrategy<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Client identifier used by the test helpers.
	pub const TEST_CLIENT_ID: &str = "client-it";
	/// Client secret used by the test helpers.
	pub const TEST_CLIENT_SECRET: &str = "secret-it";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		build_insecure_client(ReqwestClient::builder())
	}

	/// Same as [`test_reqwest_http_client`], with requests failing after `timeout`.
	pub fn test_reqwest_http_client_with_timeout(timeout: std::time::Duration) -> ReqwestHttpClient {
		build_insecure_client(ReqwestClient::builder().timeout(timeout))
	}

	fn build_insecure_client(builder: reqwest::ClientBuilder) -> ReqwestHttpClient {
		let client = builder
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Returns a config builder pointed at `site` with the test client credentials.
	pub fn test_config_builder(site: &str) -> StrategyConfigBuilder {
		StrategyConfigBuilder::default()
			.client_id(TEST_CLIENT_ID)
			.client_secret(TEST_CLIENT_SECRET)
			.site(Url::parse(site).expect("Failed to parse mock provider site URL."))
	}

	/// Constructs a strategy from `config` backed by the insecure reqwest transport.
	pub fn build_reqwest_test_strategy(config: StrategyConfig) -> ReqwestTestStrategy {
		KaeuferportalStrategy::with_http_client(
			config,
			test_reqwest_http_client(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
