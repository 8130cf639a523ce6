//! The Käuferportal strategy and its phases.
//!
//! [`KaeuferportalStrategy`] owns the validated config together with the transport and error
//! mapper shared by every phase. Each phase lives in its own module: `request_phase` builds the
//! authorize redirect, `callback_phase` verifies the redirect back and assembles the identity,
//! and `refresh` trades refresh secrets for new access tokens. `state` holds the CSRF token
//! helpers both phases rely on.

pub mod callback_phase;
pub mod refresh;
pub mod request_phase;

mod state;

// self
use crate::{
	_prelude::*,
	auth::{AuthHash, ProviderName},
	error::{AuthFailure, FailureKind},
	http::ProviderHttpClient,
	oauth::{ProviderClient, TransportErrorMapper},
	obs::{self, PhaseKind, PhaseOutcome},
	provider::{CallbackRequest, Redirect, RequestContext, Strategy, StrategyConfig, StrategyFuture},
	session::Session,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Strategy specialized for the crate's default reqwest transport stack.
pub type ReqwestStrategy = KaeuferportalStrategy<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Käuferportal sign-in strategy.
///
/// Instances are immutable after construction and safe to share across concurrent requests;
/// all per-attempt state lives in the caller's [`Session`] or on the stack of a single phase
/// call.
#[derive(Clone)]
pub struct KaeuferportalStrategy<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Validated configuration.
	pub config: Arc<StrategyConfig>,
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
}
impl<C, M> KaeuferportalStrategy<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a strategy that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: StrategyConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			config: Arc::new(config),
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
		}
	}

	pub(crate) fn provider_client(&self) -> ProviderClient<'_, C, M> {
		ProviderClient::new(&self.config, &self.http_client, &self.transport_mapper)
	}

	/// Classifies `error`, records it, and converts it into the host-facing failure.
	pub(crate) fn fail(&self, phase: PhaseKind, error: Error) -> AuthFailure {
		let failure = AuthFailure::from(error);

		observe_failure(phase, failure.kind, &failure.source);

		failure
	}
}
#[cfg(feature = "reqwest")]
impl KaeuferportalStrategy<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a strategy backed by a default reqwest transport.
	///
	/// Use [`KaeuferportalStrategy::with_http_client`] with
	/// [`ReqwestHttpClient::with_timeout`] to bound how long provider calls may take.
	pub fn new(config: StrategyConfig) -> Self {
		Self::with_http_client(
			config,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Strategy for KaeuferportalStrategy<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn name(&self) -> &ProviderName {
		&self.config.name
	}

	fn begin_authorization(&self, request: &RequestContext, session: &mut dyn Session) -> Redirect {
		self.request_phase(request, session)
	}

	fn handle_callback<'a>(
		&'a self,
		request: &'a CallbackRequest,
		session: &'a mut dyn Session,
	) -> StrategyFuture<'a, Result<AuthHash, AuthFailure>> {
		Box::pin(self.callback_phase(request, session))
	}
}
impl<C, M> Debug for KaeuferportalStrategy<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("KaeuferportalStrategy")
			.field("name", &self.config.name)
			.field("client_id", &self.config.client_id.as_str())
			.field("endpoints", &self.config.endpoints)
			.finish()
	}
}

fn observe_failure(phase: PhaseKind, kind: FailureKind, cause: &dyn StdError) {
	obs::record_phase_outcome(phase, PhaseOutcome::Failure);
	obs::record_failure(kind);
	obs::trace_failure(phase, kind, cause);
}
