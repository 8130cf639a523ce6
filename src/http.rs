//! Outbound HTTP seam for the token and profile calls.
//!
//! Hosts with their own HTTP stack implement [`ProviderHttpClient`]; everyone else uses
//! [`ReqwestHttpClient`]. Each call gets a fresh handle bound to a [`ResponseMetadataSlot`], so
//! a failure that happens after the status line arrived (a truncated body, say) can still be
//! reported together with the status and content type the provider sent.

// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
#[cfg(feature = "reqwest")] use reqwest::header::CONTENT_TYPE;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Transport the strategy sends every provider request through.
///
/// Implementations are shared by all concurrent callbacks, so they must be `Send + Sync`, and
/// their handles must own what they need for the request future to be `Send`. The strategy
/// calls each handle exactly once and never retries; deadlines are the transport's business.
pub trait ProviderHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Error type the transport reports inside [`HttpClientError`].
	type TransportError: 'static + Send + Sync + StdError;

	/// Per-call [`AsyncHttpClient`] handle.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Returns a handle that reports response metadata into `slot`.
	///
	/// Handles clear `slot` before sending and fill it as soon as the status is known.
	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle;
}

/// Status line details of the last provider response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code.
	pub status: Option<u16>,
	/// `Content-Type` header value.
	pub content_type: Option<String>,
}

/// Shared cell a handle writes [`ResponseMetadata`] into and the error mapper reads back.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Replaces the stored metadata.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Removes and returns the stored metadata.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Default transport backed by [`ReqwestClient`].
///
/// The wrapped client decides deadlines, proxies, and TLS; [`ReqwestHttpClient::with_timeout`]
/// covers the common case of a fixed per-request timeout.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Uses a preconfigured reqwest client.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose requests fail with a timeout after `timeout`.
	pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, ConfigError> {
		Ok(Self(ReqwestClient::builder().timeout(timeout).build()?))
	}
}
#[cfg(feature = "reqwest")]
impl ProviderHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		ReqwestHandle { client: self.0.clone(), slot }
	}
}

/// Per-call handle produced by [`ReqwestHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHandle {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}
#[cfg(feature = "reqwest")]
impl ReqwestHandle {
	async fn send(
		&self,
		request: HttpRequest,
	) -> Result<HttpResponse, HttpClientError<ReqwestError>> {
		self.slot.take();

		let request: reqwest::Request = request.try_into().map_err(Box::new)?;
		let response = self.client.execute(request).await.map_err(Box::new)?;
		let status = response.status();
		let headers = response.headers().clone();

		self.slot.store(ResponseMetadata {
			status: Some(status.as_u16()),
			content_type: headers
				.get(CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned),
		});

		let body = response.bytes().await.map_err(Box::new)?;
		let mut converted = HttpResponse::new(body.to_vec());

		*converted.status_mut() = status;
		*converted.headers_mut() = headers;

		Ok(converted)
	}
}
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future = Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		Box::pin(self.send(request))
	}
}
