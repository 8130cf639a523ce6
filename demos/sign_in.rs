//! Walks through one sign-in: build the strategy, redirect the user, then complete the callback
//! the provider sends back.
//!
//! Set `KAEUFERPORTAL_CLIENT_ID` / `KAEUFERPORTAL_CLIENT_SECRET` to real credentials and pass
//! the full callback URL as the first argument to run the token exchange against the provider.

// std
use std::{env, sync::Arc, time::Duration};
// crates.io
use color_eyre::{Result, eyre::eyre};
use url::Url;
// self
use kaeuferportal_oauth2::{
	flows::ReqwestStrategy,
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	provider::{CallbackRequest, Redirect, RequestContext, Strategy, StrategyConfigBuilder},
	session::{MemorySession, STATE_SESSION_KEY, Session},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = StrategyConfigBuilder::default()
		.client_id(env::var("KAEUFERPORTAL_CLIENT_ID").unwrap_or_else(|_| "demo-client".into()))
		.client_secret(
			env::var("KAEUFERPORTAL_CLIENT_SECRET").unwrap_or_else(|_| "demo-secret".into()),
		)
		.option("scope", "basic")
		.build()?;
	let strategy: Arc<dyn Strategy> = Arc::new(ReqwestStrategy::with_http_client(
		config,
		ReqwestHttpClient::with_timeout(Duration::from_secs(10))?,
		ReqwestTransportErrorMapper,
	));
	let mut session = MemorySession::default();
	let context = RequestContext::new(Url::parse("http://localhost:3000")?, "");
	let redirect = strategy.begin_authorization(&context, &mut session);

	println!("Redirect the user ({}) to {}.", Redirect::STATUS, redirect.location);
	println!(
		"Session now holds {STATE_SESSION_KEY} = {}.",
		session.get(STATE_SESSION_KEY).unwrap_or_default()
	);

	let Some(callback_url) = env::args().nth(1) else {
		println!("Pass the callback URL the provider redirected to in order to finish sign-in.");

		return Ok(());
	};
	let request = CallbackRequest::from_url(&Url::parse(&callback_url)?);

	match strategy.handle_callback(&request, &mut session).await {
		Ok(auth_hash) => println!("{}", serde_json::to_string_pretty(&auth_hash)?),
		Err(failure) => return Err(eyre!("Sign-in failed ({}): {}.", failure.kind, failure.source)),
	}

	Ok(())
}
