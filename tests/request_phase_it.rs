#![cfg(feature = "reqwest")]

// self
use kaeuferportal_oauth2::{
	_preludet::*,
	auth::ProviderName,
	provider::{Redirect, RequestContext, Strategy},
	session::{MemorySession, STATE_SESSION_KEY, Session},
};

fn context(host: &str, script_name: &str) -> RequestContext {
	RequestContext::new(Url::parse(host).expect("Host fixture should parse."), script_name)
}

fn param(redirect: &Redirect, key: &str) -> Option<String> {
	redirect.location.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned())
}

#[test]
fn each_redirect_mints_a_distinct_state() {
	let strategy = build_reqwest_test_strategy(
		test_config_builder("https://provider.example.com")
			.build()
			.expect("Config fixture should build."),
	);
	let mut first_session = MemorySession::default();
	let mut second_session = MemorySession::default();
	let context = context("https://shop.example.com", "");
	let first = strategy.begin_authorization(&context, &mut first_session);
	let second = strategy.begin_authorization(&context, &mut second_session);
	let first_state = param(&first, "state").expect("First redirect should carry state.");
	let second_state = param(&second, "state").expect("Second redirect should carry state.");

	assert_ne!(first_state, second_state);

	for state in [&first_state, &second_state] {
		assert_eq!(state.len(), 48);
		assert!(state.chars().all(|c| c.is_ascii_hexdigit()));
	}

	assert_eq!(first_session.get(STATE_SESSION_KEY), Some(first_state.as_str()));
	assert_eq!(second_session.get(STATE_SESSION_KEY), Some(second_state.as_str()));
}

#[test]
fn redirect_targets_the_authorize_endpoint_with_provider_params() {
	let strategy = build_reqwest_test_strategy(
		test_config_builder("https://provider.example.com")
			.option("scope", "email")
			.build()
			.expect("Config fixture should build."),
	);
	let mut session = MemorySession::default();
	let redirect =
		strategy.begin_authorization(&context("http://localhost:3000", "/app"), &mut session);

	assert_eq!(Redirect::STATUS, 302);
	assert_eq!(redirect.location.origin().ascii_serialization(), "https://provider.example.com");
	assert_eq!(redirect.location.path(), "/oauth/authorize");
	assert_eq!(param(&redirect, "response_type").as_deref(), Some("code"));
	assert_eq!(param(&redirect, "client_id").as_deref(), Some(TEST_CLIENT_ID));
	assert_eq!(
		param(&redirect, "redirect_url").as_deref(),
		Some("http://localhost:3000/app/auth/kaeuferportal/callback")
	);
	assert_eq!(param(&redirect, "redirect_uri"), None);
	assert_eq!(param(&redirect, "scope").as_deref(), Some("email"));
}

#[test]
fn custom_names_and_paths_shape_the_callback_url() {
	let name = ProviderName::new("kp-staging").expect("Provider name fixture should be valid.");
	let strategy = build_reqwest_test_strategy(
		test_config_builder("https://staging.provider.example.com")
			.name(name)
			.authorize_path("/login/oauth")
			.build()
			.expect("Config fixture should build."),
	);
	let mut session = MemorySession::default();
	let redirect =
		strategy.begin_authorization(&context("https://shop.example.com", ""), &mut session);

	assert_eq!(strategy.name().to_string(), "kp-staging");
	assert_eq!(redirect.location.path(), "/login/oauth");
	assert_eq!(
		param(&redirect, "redirect_url").as_deref(),
		Some("https://shop.example.com/auth/kp-staging/callback")
	);
}
