//! Callback phase: verify the provider redirect, exchange the code, and build the identity.
//!
//! The gates run in a fixed order and the first failure ends the attempt:
//!
//! 1. provider-reported `error` / `error_reason`,
//! 2. CSRF state check against the value stored by the request phase,
//! 3. code exchange at the token endpoint,
//! 4. refresh, when the token has expired and the config asks for it,
//! 5. profile fetch and identity derivation.
//!
//! The stored state is removed from the session before the first gate runs, so it never
//! survives an attempt regardless of the outcome.

// crates.io
use oauth2::{AuthorizationCode, RedirectUrl};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AuthHash, RawProfile},
	error::{AuthFailure, CallbackError},
	flows::{KaeuferportalStrategy, state},
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, PhaseKind, PhaseOutcome, PhaseSpan},
	provider::{CallbackParams, CallbackRequest},
	session::{STATE_SESSION_KEY, Session},
};

impl<C, M> KaeuferportalStrategy<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Runs the callback phase for one inbound redirect.
	pub async fn callback_phase(
		&self,
		request: &CallbackRequest,
		session: &mut dyn Session,
	) -> Result<AuthHash, AuthFailure> {
		let span = PhaseSpan::new(PhaseKind::Callback, "callback_phase");

		obs::record_phase_outcome(PhaseKind::Callback, PhaseOutcome::Attempt);

		let stored_state = session.remove(STATE_SESSION_KEY);

		match span.instrument(self.authenticate(request, stored_state)).await {
			Ok(auth_hash) => {
				obs::record_phase_outcome(PhaseKind::Callback, PhaseOutcome::Success);

				Ok(auth_hash)
			},
			Err(e) => Err(self.fail(PhaseKind::Callback, e)),
		}
	}

	async fn authenticate(
		&self,
		request: &CallbackRequest,
		stored_state: Option<String>,
	) -> Result<AuthHash> {
		let params = &request.params;

		if params.has_error() {
			return Err(provider_error(params).into());
		}

		state::verify_state(stored_state, params.state.as_deref())?;

		let code = params
			.code
			.as_deref()
			.filter(|code| !code.is_empty())
			.ok_or(CallbackError::MissingCode)?;
		let redirect_url =
			RedirectUrl::from_url(request.context.callback_url(&self.config.callback_path));
		let token = self
			.provider_client()
			.exchange_code(&AuthorizationCode::new(code.to_owned()), &redirect_url)
			.await?;
		let token = self.refresh_if_expired(token).await?;

		CallbackAttempt::new(self, token).auth_hash().await
	}
}

/// State owned by one callback invocation once a token is in hand.
///
/// The profile is fetched at most once and reused for every field derived from it.
struct CallbackAttempt<'a, C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	strategy: &'a KaeuferportalStrategy<C, M>,
	token: AccessToken,
	raw_info: Option<RawProfile>,
}
impl<'a, C, M> CallbackAttempt<'a, C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn new(strategy: &'a KaeuferportalStrategy<C, M>, token: AccessToken) -> Self {
		Self { strategy, token, raw_info: None }
	}

	async fn raw_info(&mut self) -> Result<&RawProfile> {
		let profile = match self.raw_info.take() {
			Some(profile) => profile,
			None => self.strategy.provider_client().fetch_profile(&self.token).await?,
		};

		Ok(self.raw_info.insert(profile))
	}

	async fn auth_hash(&mut self) -> Result<AuthHash> {
		let profile = self.raw_info().await?.clone();

		Ok(AuthHash::from_profile(self.strategy.config.name.clone(), profile, &self.token))
	}
}

fn provider_error(params: &CallbackParams) -> CallbackError {
	CallbackError::Provider {
		error: params.error.clone().or_else(|| params.error_reason.clone()),
		description: params.error_description.clone().or_else(|| params.error_reason.clone()),
		uri: params.error_uri.clone(),
	}
}
