// std
use std::{future::Future, pin::Pin, sync::Arc};
// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{StatusCode, header::CONTENT_TYPE},
};
use parking_lot::Mutex;
// self
use kaeuferportal_oauth2::{
	error::{Error, FailureKind, TransportError},
	flows::KaeuferportalStrategy,
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	oauth::{Endpoint, TransportErrorMapper},
	provider::{CallbackParams, CallbackRequest, RequestContext, StrategyConfigBuilder},
	session::{MemorySession, STATE_SESSION_KEY, Session},
};

type HandleFuture<'c> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, HttpClientError<FakeError>>> + 'c + Send>>;

#[derive(Debug, thiserror::Error)]
enum FakeError {
	#[error("Simulated deadline.")]
	Deadline,
}

/// Answers token and profile calls from canned bodies and records every request URL.
#[derive(Clone, Default)]
struct ScriptedClient {
	seen: Arc<Mutex<Vec<String>>>,
	stall_profile: bool,
}
impl ProviderHttpClient for ScriptedClient {
	type Handle = ScriptedHandle;
	type TransportError = FakeError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		ScriptedHandle { client: self.clone(), slot }
	}
}

struct ScriptedHandle {
	client: ScriptedClient,
	slot: ResponseMetadataSlot,
}
impl<'c> AsyncHttpClient<'c> for ScriptedHandle {
	type Error = HttpClientError<FakeError>;
	type Future = HandleFuture<'c>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		Box::pin(async move {
			self.slot.take();
			self.client.seen.lock().push(request.uri().to_string());

			let (content_type, body) = match request.uri().path() {
				"/oauth/access_token" => ("text/plain", "access_token=SCRIPTED"),
				"/oauth/user" if self.client.stall_profile =>
					return Err(HttpClientError::Reqwest(Box::new(FakeError::Deadline))),
				"/oauth/user" =>
					("application/json", r#"{"uuid":"u-7","email":"erika@example.de"}"#),
				_ => ("text/plain", ""),
			};

			self.slot.store(ResponseMetadata {
				status: Some(200),
				content_type: Some(content_type.into()),
			});

			let mut response = HttpResponse::new(body.as_bytes().to_vec());

			*response.status_mut() = StatusCode::OK;
			response.headers_mut().insert(
				CONTENT_TYPE,
				content_type.parse().expect("Content type fixture should be a valid header."),
			);

			Ok(response)
		})
	}
}

#[derive(Default)]
struct FakeMapper;
impl TransportErrorMapper<FakeError> for FakeMapper {
	fn map_transport_error(
		&self,
		endpoint: Endpoint,
		_: Option<&ResponseMetadata>,
		error: HttpClientError<FakeError>,
	) -> Error {
		match error {
			HttpClientError::Reqwest(inner) =>
				TransportError::timeout(endpoint.as_str(), *inner).into(),
			other => TransportError::network(endpoint.as_str(), other).into(),
		}
	}
}

fn strategy(client: ScriptedClient) -> KaeuferportalStrategy<ScriptedClient, FakeMapper> {
	let config = StrategyConfigBuilder::default()
		.client_id("custom-id")
		.client_secret("custom-secret")
		.build()
		.expect("Config fixture should build.");

	KaeuferportalStrategy::with_http_client(config, client, FakeMapper)
}

fn callback() -> (CallbackRequest, MemorySession) {
	let mut session = MemorySession::default();

	session.insert(STATE_SESSION_KEY, "custom-state".into());

	let request = CallbackRequest {
		context: RequestContext::new(
			"https://shop.example.com".parse().expect("Host fixture should parse."),
			"",
		),
		params: CallbackParams::from_query("code=c-9&state=custom-state"),
	};

	(request, session)
}

#[tokio::test]
async fn custom_transports_drive_the_whole_callback() {
	let client = ScriptedClient::default();
	let strategy = strategy(client.clone());
	let (request, mut session) = callback();
	let auth_hash =
		strategy.callback_phase(&request, &mut session).await.expect("Callback should succeed.");
	let seen = client.seen.lock().clone();

	assert_eq!(auth_hash.uid, "u-7");
	assert_eq!(auth_hash.info.name, "erika");
	assert_eq!(seen.len(), 2);
	assert!(seen[0].starts_with("https://www.kaeuferportal.de/oauth/access_token?"));
	assert!(seen[0].contains(
		"redirect_url=https%3A%2F%2Fshop.example.com%2Fauth%2Fkaeuferportal%2Fcallback"
	));
	assert_eq!(seen[1], "https://www.kaeuferportal.de/oauth/user?oauth_token=SCRIPTED");
}

#[tokio::test]
async fn custom_mappers_classify_transport_failures() {
	let client = ScriptedClient { stall_profile: true, ..Default::default() };
	let strategy = strategy(client);
	let (request, mut session) = callback();
	let failure = strategy
		.callback_phase(&request, &mut session)
		.await
		.expect_err("Stalled profile fetches should fail.");

	assert_eq!(failure.kind, FailureKind::Timeout);
	assert!(matches!(
		failure.source,
		Error::Transport(TransportError::Timeout { endpoint: "profile", .. })
	));
	assert!(session.is_empty());
}
