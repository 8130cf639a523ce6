//! Strategy-level error types and the failure taxonomy surfaced to hosts.

// self
use crate::_prelude::*;

/// Strategy-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical strategy error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The provider redirect reported an error or failed the CSRF check.
	#[error(transparent)]
	Callback(#[from] CallbackError),
	/// Profile or token body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Transport failure (DNS, TCP, TLS, deadline).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint rejected the request with HTTP {status}: {body}.")]
	TokenEndpoint {
		/// HTTP status code returned by the provider.
		status: u16,
		/// Truncated response body.
		body: String,
	},
	/// Token endpoint body did not carry an `access_token` pair.
	#[error("Token endpoint response does not contain an access_token: {body}.")]
	MissingAccessToken {
		/// Truncated response body.
		body: String,
	},
	/// Refresh was required but the token carries no refresh secret.
	#[error("Access token expired and no refresh token is available.")]
	MissingRefreshToken,
	/// Profile endpoint answered with a non-success status.
	#[error("Profile endpoint rejected the request with HTTP {status}.")]
	ProfileEndpoint {
		/// HTTP status code returned by the provider.
		status: u16,
	},
}
impl Error {
	/// Classifies the error into the host-facing [`FailureKind`].
	pub fn failure_kind(&self) -> FailureKind {
		match self {
			Self::Decode(_) => FailureKind::InvalidResponse,
			Self::Transport(TransportError::Timeout { .. }) => FailureKind::Timeout,
			Self::Transport(TransportError::Io(e)) if e.kind() == std::io::ErrorKind::TimedOut =>
				FailureKind::Timeout,
			Self::Transport(_) => FailureKind::FailedToConnect,
			Self::Config(_)
			| Self::Callback(_)
			| Self::TokenEndpoint { .. }
			| Self::MissingAccessToken { .. }
			| Self::MissingRefreshToken
			| Self::ProfileEndpoint { .. } => FailureKind::InvalidCredentials,
		}
	}
}

/// Configuration and validation failures raised while building or running the strategy.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// `client_id` was absent or blank.
	#[error("The client_id option is required.")]
	MissingClientId,
	/// `client_secret` was absent or blank.
	#[error("The client_secret option is required.")]
	MissingClientSecret,
	/// `{site}{path}` did not form a valid URL.
	#[error("The {endpoint} endpoint `{url}` is not a valid URL.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Concatenated URL that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// State tokens would carry too little entropy.
	#[error("State tokens need at least {min} random bytes, got {actual}.")]
	WeakStateEntropy {
		/// Minimum accepted byte count.
		min: usize,
		/// Configured byte count.
		actual: usize,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Errors raised from the inbound provider redirect before any token exchange.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CallbackError {
	/// The provider reported an error on the redirect.
	#[error(
		"Provider reported `{}`: {}.",
		.error.as_deref().unwrap_or("unknown"),
		.description.as_deref().unwrap_or("no description")
	)]
	Provider {
		/// Provider `error` code.
		error: Option<String>,
		/// `error_description`, falling back to `error_reason`.
		description: Option<String>,
		/// Provider `error_uri`.
		uri: Option<String>,
	},
	/// `state` was missing or did not match the value issued for this session.
	#[error("CSRF detected: callback state does not match the session.")]
	CsrfDetected,
	/// The redirect passed the state check but carried no authorization code.
	#[error("Callback carries no authorization code.")]
	MissingCode,
}

/// Body decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Profile endpoint responded with JSON that does not fit the expected shape.
	#[error(
		"Profile response could not be decoded (content-type: {}).",
		.content_type.as_deref().unwrap_or("unknown")
	)]
	Profile {
		/// Structured parsing failure with the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// Response content type, when available.
		content_type: Option<String>,
	},
	/// Response body is not valid UTF-8.
	#[error("{endpoint} response body is not valid UTF-8.")]
	Utf8 {
		/// Endpoint label.
		endpoint: &'static str,
		/// Underlying conversion failure.
		#[source]
		source: std::string::FromUtf8Error,
	},
}

/// Transport-level failures (network, IO, deadlines).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The request exceeded the transport deadline.
	#[error("Request to the {endpoint} endpoint timed out.")]
	Timeout {
		/// Endpoint label.
		endpoint: &'static str,
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// DNS or connection establishment failed.
	#[error("Could not connect to the {endpoint} endpoint.")]
	Connect {
		/// Endpoint label.
		endpoint: &'static str,
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// Other network failure reported by the HTTP client.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint label.
		endpoint: &'static str,
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a deadline failure.
	pub fn timeout(endpoint: &'static str, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Timeout { endpoint, source: Box::new(src) }
	}

	/// Wraps a connection failure.
	pub fn connect(endpoint: &'static str, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Connect { endpoint, source: Box::new(src) }
	}

	/// Wraps any other network failure.
	pub fn network(endpoint: &'static str, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}

/// Symbolic failure kinds reported to the host framework.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
	/// Provider error, CSRF mismatch, or protocol error during exchange/refresh.
	InvalidCredentials,
	/// Profile or token body could not be decoded.
	InvalidResponse,
	/// A network operation exceeded its deadline.
	Timeout,
	/// DNS or connection failure reaching the provider.
	FailedToConnect,
}
impl FailureKind {
	/// Returns the stable snake_case label.
	pub const fn as_str(self) -> &'static str {
		match self {
			FailureKind::InvalidCredentials => "invalid_credentials",
			FailureKind::InvalidResponse => "invalid_response",
			FailureKind::Timeout => "timeout",
			FailureKind::FailedToConnect => "failed_to_connect",
		}
	}
}
impl Display for FailureKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Terminal authentication failure handed to the host: a symbolic kind plus the cause.
#[derive(Debug, ThisError)]
#[error("Authentication failed ({kind}).")]
pub struct AuthFailure {
	/// Classified failure kind.
	pub kind: FailureKind,
	/// Original cause, kept for diagnostics.
	#[source]
	pub source: Error,
}
impl From<Error> for AuthFailure {
	fn from(source: Error) -> Self {
		Self { kind: source.failure_kind(), source }
	}
}
