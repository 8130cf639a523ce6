//! Strategy lifecycle contract shared by provider plugins.
//!
//! The hosting middleware drives every plugin through the same two phases: a request phase
//! that redirects the user to the provider, and a callback phase that turns the provider's
//! redirect back into an [`AuthHash`] or an [`AuthFailure`]. The types here carry only the
//! request data those phases need so implementations stay independent of any web framework.

// self
use crate::{
	_prelude::*,
	auth::{AuthHash, ProviderName},
	error::AuthFailure,
	session::Session,
};

/// Boxed future returned by [`Strategy::handle_callback`].
pub type StrategyFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Two-phase contract a provider plugin implements for the host.
pub trait Strategy
where
	Self: Send + Sync,
{
	/// Key the host resolves to this strategy.
	fn name(&self) -> &ProviderName;

	/// Request phase: stores fresh CSRF state in `session` and returns the provider redirect.
	fn begin_authorization(
		&self,
		request: &RequestContext,
		session: &mut dyn Session,
	) -> Redirect;

	/// Callback phase: verifies the redirect, exchanges the code, and normalizes the identity.
	fn handle_callback<'a>(
		&'a self,
		request: &'a CallbackRequest,
		session: &'a mut dyn Session,
	) -> StrategyFuture<'a, Result<AuthHash, AuthFailure>>;
}

/// Origin and mount point of the inbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
	/// Scheme, host, and port the application is reachable under.
	pub full_host: Url,
	/// Path prefix the application is mounted at (empty at the root).
	pub script_name: String,
}
impl RequestContext {
	/// Creates a context for `full_host` mounted at `script_name`.
	pub fn new(full_host: Url, script_name: impl Into<String>) -> Self {
		Self { full_host, script_name: script_name.into() }
	}

	/// Derives the host from an inbound request URL, mounted at the root.
	pub fn from_url(url: &Url) -> Self {
		let mut full_host = url.clone();

		full_host.set_path("");
		full_host.set_query(None);
		full_host.set_fragment(None);

		Self { full_host, script_name: String::new() }
	}

	/// Joins host, script name, and `callback_path` into the redirect target.
	pub fn callback_url(&self, callback_path: &str) -> Url {
		let mut url = self.full_host.clone();
		let script = self.script_name.trim_end_matches('/');

		url.set_path(&format!("{script}{callback_path}"));
		url.set_query(None);
		url.set_fragment(None);

		url
	}
}

/// Redirect issued by the request phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
	/// Provider authorize URL including every query parameter.
	pub location: Url,
}
impl Redirect {
	/// HTTP status hosts should answer with.
	pub const STATUS: u16 = 302;
}

/// Query parameters the provider sends back on the callback.
///
/// Values are kept as received; a present-but-empty `error` still counts as a provider error,
/// while an empty `state` fails the CSRF check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
	/// Authorization code.
	pub code: Option<String>,
	/// Echoed state token.
	pub state: Option<String>,
	/// Provider error code.
	pub error: Option<String>,
	/// Provider error reason (Facebook-style providers).
	pub error_reason: Option<String>,
	/// Human-readable error description.
	pub error_description: Option<String>,
	/// Link to error documentation.
	pub error_uri: Option<String>,
}
impl CallbackParams {
	/// Parses an `application/x-www-form-urlencoded` query string; the first occurrence wins.
	pub fn from_query(query: &str) -> Self {
		let mut params = Self::default();

		for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
			let slot = match key.as_ref() {
				"code" => &mut params.code,
				"state" => &mut params.state,
				"error" => &mut params.error,
				"error_reason" => &mut params.error_reason,
				"error_description" => &mut params.error_description,
				"error_uri" => &mut params.error_uri,
				_ => continue,
			};

			if slot.is_none() {
				*slot = Some(value.into_owned());
			}
		}

		params
	}

	/// Returns `true` when the provider signalled an error.
	pub fn has_error(&self) -> bool {
		self.error.is_some() || self.error_reason.is_some()
	}
}

/// Everything the callback phase reads from the inbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackRequest {
	/// Origin and mount point, used to recompute the redirect URL.
	pub context: RequestContext,
	/// Parsed query parameters.
	pub params: CallbackParams,
}
impl CallbackRequest {
	/// Builds a callback request from the full inbound URL, mounted at the root.
	pub fn from_url(url: &Url) -> Self {
		Self {
			context: RequestContext::from_url(url),
			params: CallbackParams::from_query(url.query().unwrap_or_default()),
		}
	}
}
