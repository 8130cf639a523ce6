//! Provider client facade: token exchange, refresh, and profile fetch over one transport.

pub mod token_response;

pub use oauth2;
pub use token_response::*;

// crates.io
use oauth2::{
	AsyncHttpClient, AuthorizationCode, HttpClientError, HttpRequest, HttpResponse, RedirectUrl,
	http::{
		HeaderValue, Method, Request,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, RawProfile, TokenTransmission},
	error::{ConfigError, DecodeError, TransportError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	provider::{StrategyConfig, TokenMethod},
};

/// Provider endpoint a request was sent to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
	/// Token endpoint (code exchange and refresh).
	Token,
	/// Profile endpoint.
	Profile,
}
impl Endpoint {
	/// Returns a stable label for errors and telemetry.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::Token => "token",
			Endpoint::Profile => "profile",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Maps HTTP transport failures into strategy [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a strategy error.
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		_: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(endpoint, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) =>
				TransportError::network(endpoint.as_str(), std::io::Error::other(message)).into(),
			_ => TransportError::network(
				endpoint.as_str(),
				std::io::Error::other("unrecognized HTTP client error"),
			)
			.into(),
		}
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(endpoint: Endpoint, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransportError::timeout(endpoint.as_str(), err).into();
	}
	if err.is_connect() {
		return TransportError::connect(endpoint.as_str(), err).into();
	}

	TransportError::network(endpoint.as_str(), err).into()
}

/// Per-call view over the config and transport that speaks the provider's dialect.
pub(crate) struct ProviderClient<'a, C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	config: &'a StrategyConfig,
	http_client: &'a C,
	error_mapper: &'a M,
}
impl<'a, C, M> ProviderClient<'a, C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(config: &'a StrategyConfig, http_client: &'a C, error_mapper: &'a M) -> Self {
		Self { config, http_client, error_mapper }
	}

	/// Exchanges an authorization code for an access token.
	pub(crate) async fn exchange_code(
		&self,
		code: &AuthorizationCode,
		redirect_url: &RedirectUrl,
	) -> Result<AccessToken> {
		let mut form = self.client_form("authorization_code");

		form.insert("code".into(), code.secret().to_owned());
		form.insert("redirect_url".into(), redirect_url.as_str().to_owned());
		form.extend(self.config.merged_token_params());

		self.request_token(form).await
	}

	/// Trades the token's refresh secret for a new access token.
	pub(crate) async fn refresh(&self, token: &AccessToken) -> Result<AccessToken> {
		let refresh_token = token.refresh_token().ok_or(Error::MissingRefreshToken)?;
		let mut form = self.client_form("refresh_token");

		form.insert("refresh_token".into(), refresh_token.expose().to_owned());
		form.extend(self.config.merged_token_params());

		let next = self.request_token(form).await?;

		Ok(token.rotate(next))
	}

	/// Fetches the user profile with the token sent as `oauth_token` in the query string.
	pub(crate) async fn fetch_profile(&self, token: &AccessToken) -> Result<RawProfile> {
		let profile_token = token.clone().with_transmission(TokenTransmission::query("oauth_token"));
		let mut request =
			profile_token.signed_request(Method::GET, self.config.endpoints.user.clone())?;

		request.headers_mut().insert(ACCEPT, HeaderValue::from_static("application/json"));

		let (response, meta) = self.dispatch(Endpoint::Profile, request).await?;
		let status = response.status();

		if !status.is_success() {
			return Err(Error::ProfileEndpoint { status: status.as_u16() });
		}

		let mut de = serde_json::Deserializer::from_slice(response.body());

		serde_path_to_error::deserialize(&mut de).map_err(|source| {
			DecodeError::Profile { source, content_type: meta.and_then(|m| m.content_type) }.into()
		})
	}

	fn client_form(&self, grant_type: &str) -> BTreeMap<String, String> {
		BTreeMap::from([
			("grant_type".to_owned(), grant_type.to_owned()),
			("client_id".to_owned(), self.config.client_id.as_str().to_owned()),
			("client_secret".to_owned(), self.config.client_secret.secret().to_owned()),
		])
	}

	async fn request_token(&self, form: BTreeMap<String, String>) -> Result<AccessToken> {
		let request = self.token_request(&form)?;
		let (response, _) = self.dispatch(Endpoint::Token, request).await?;
		let status = response.status();

		if !status.is_success() {
			return Err(Error::TokenEndpoint {
				status: status.as_u16(),
				body: truncate_preview(&String::from_utf8_lossy(response.body())),
			});
		}

		let body = String::from_utf8(response.into_body())
			.map_err(|source| DecodeError::Utf8 { endpoint: Endpoint::Token.as_str(), source })?;

		access_token_from_body(&body)
	}

	fn token_request(&self, form: &BTreeMap<String, String>) -> Result<HttpRequest> {
		let mut url = self.config.endpoints.token.url().clone();
		let request = match self.config.token_method {
			TokenMethod::Get => {
				url.query_pairs_mut().extend_pairs(form);

				Request::builder().method(Method::GET).uri(url.as_str()).body(Vec::new())
			},
			TokenMethod::Post => {
				let body = url::form_urlencoded::Serializer::new(String::new())
					.extend_pairs(form)
					.finish();

				Request::builder()
					.method(Method::POST)
					.uri(url.as_str())
					.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
					.body(body.into_bytes())
			},
		};

		request.map_err(|e| ConfigError::from(e).into())
	}

	async fn dispatch(
		&self,
		endpoint: Endpoint,
		request: HttpRequest,
	) -> Result<(HttpResponse, Option<ResponseMetadata>)> {
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(meta.clone());

		match handle.call(request).await {
			Ok(response) => Ok((response, meta.take())),
			Err(err) =>
				Err(self.error_mapper.map_transport_error(endpoint, meta.take().as_ref(), err)),
		}
	}
}
