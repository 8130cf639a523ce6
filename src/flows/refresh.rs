//! Refresh flow for access tokens that expired before the profile fetch.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	flows::KaeuferportalStrategy,
	http::ProviderHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, PhaseKind, PhaseOutcome, PhaseSpan},
};

impl<C, M> KaeuferportalStrategy<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Exchanges the token's refresh secret for a new access token.
	///
	/// The previous refresh secret is kept when the provider does not issue a new one. Tokens
	/// without a refresh secret fail with [`Error::MissingRefreshToken`] before any request is
	/// sent.
	pub async fn refresh_access_token(&self, token: &AccessToken) -> Result<AccessToken> {
		let span = PhaseSpan::new(PhaseKind::Refresh, "refresh_access_token");

		obs::record_phase_outcome(PhaseKind::Refresh, PhaseOutcome::Attempt);

		let result = span.instrument(self.provider_client().refresh(token)).await;

		match &result {
			Ok(_) => obs::record_phase_outcome(PhaseKind::Refresh, PhaseOutcome::Success),
			Err(_) => obs::record_phase_outcome(PhaseKind::Refresh, PhaseOutcome::Failure),
		}

		result
	}

	/// Refreshes `token` when it has expired and the config asks for it; otherwise returns it.
	pub(crate) async fn refresh_if_expired(&self, token: AccessToken) -> Result<AccessToken> {
		if self.config.refresh_expired && token.is_expired() {
			return self.refresh_access_token(&token).await;
		}

		Ok(token)
	}
}
