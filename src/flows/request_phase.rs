//! Request phase: issue CSRF state and redirect the user to the provider's authorize page.

// self
use crate::{
	_prelude::*,
	flows::{KaeuferportalStrategy, state},
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, PhaseKind, PhaseOutcome, PhaseSpan},
	provider::{Redirect, RequestContext, StrategyConfig},
	session::{STATE_SESSION_KEY, Session},
};

impl<C, M> KaeuferportalStrategy<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Stores a state token in `session` and returns the authorize redirect.
	///
	/// A non-blank `state` configured in the authorize params is used verbatim; otherwise every
	/// call mints a fresh token. Any previously stored state is replaced, so only the latest
	/// redirect can complete.
	pub fn request_phase(&self, request: &RequestContext, session: &mut dyn Session) -> Redirect {
		let _guard = PhaseSpan::new(PhaseKind::Request, "request_phase").entered();

		obs::record_phase_outcome(PhaseKind::Request, PhaseOutcome::Attempt);

		let mut params = self.config.merged_authorize_params();
		let state = state::state_for_request(
			params.get("state").map(String::as_str),
			self.config.state_bytes,
		);

		params.insert("state".into(), state.clone());
		session.insert(STATE_SESSION_KEY, state);

		let redirect_url = request.callback_url(&self.config.callback_path);
		let location = authorize_url(&self.config, &redirect_url, &params);

		obs::record_phase_outcome(PhaseKind::Request, PhaseOutcome::Success);

		Redirect { location }
	}
}

/// Configured params override the defaults so each key appears once.
pub(crate) fn authorize_url(
	config: &StrategyConfig,
	redirect_url: &Url,
	params: &BTreeMap<String, String>,
) -> Url {
	let mut query = BTreeMap::from([
		("response_type".to_owned(), "code".to_owned()),
		("client_id".to_owned(), config.client_id.as_str().to_owned()),
		("redirect_url".to_owned(), redirect_url.to_string()),
	]);

	query.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));

	let mut url = config.endpoints.authorize.url().clone();

	url.query_pairs_mut().extend_pairs(&query);

	url
}
