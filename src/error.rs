//! Client-level error types shared by the limiter, codec, and transport layers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Construction-time configuration problem.
	#[error(transparent)]
	InvalidConfiguration(#[from] ConfigError),
	/// Document could not be turned into (or read back from) the wire format.
	#[error(transparent)]
	Encoding(#[from] EncodingError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Registry answered with a non-200 status.
	#[error("Registry rejected the document with HTTP {status}.")]
	RemoteRejection {
		/// HTTP status code returned by the registry.
		status: u16,
		/// Response body, verbatim.
		body: String,
	},
	/// The rate limiter was closed while the caller waited for admission.
	#[error("Admission wait was cancelled because the rate limiter was closed.")]
	CancelledWait,
}

/// Configuration and validation failures raised at construction.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// The request limit must admit at least one request per window.
	#[error("Request limit must be positive.")]
	ZeroRequestLimit,
	/// The window must have a non-zero length.
	#[error("Rate window must be longer than zero.")]
	ZeroWindow,
	/// Registry endpoint cannot be parsed.
	#[error("Registry endpoint is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<url::ParseError> for ConfigError {
	fn from(source: url::ParseError) -> Self {
		Self::InvalidEndpoint { source }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// JSON codec failures for registry documents.
#[derive(Debug, ThisError)]
pub enum EncodingError {
	/// Document could not be serialized.
	#[error("Document could not be serialized to JSON.")]
	Serialize(#[source] serde_json::Error),
	/// Payload could not be deserialized into a document.
	#[error("Document JSON is malformed at `{path}`.", path = .source.path())]
	Deserialize {
		/// Structured parsing failure, including the failing JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the registry endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn config_error_converts_into_invalid_configuration() {
		let err: Error = ConfigError::ZeroRequestLimit.into();

		assert!(matches!(err, Error::InvalidConfiguration(ConfigError::ZeroRequestLimit)));
		assert_eq!(err.to_string(), "Request limit must be positive.");
	}

	#[test]
	fn deserialize_error_reports_json_path() {
		#[allow(dead_code)]
		#[derive(Debug, Deserialize)]
		struct Outer {
			outer: Inner,
		}
		#[allow(dead_code)]
		#[derive(Debug, Deserialize)]
		struct Inner {
			inner: u32,
		}

		let mut de = serde_json::Deserializer::from_str("{\"outer\":{\"inner\":\"nope\"}}");
		let source = serde_path_to_error::deserialize::<_, Outer>(&mut de)
			.expect_err("Mismatched field type should fail to deserialize.");
		let err = EncodingError::Deserialize { source };

		assert_eq!(err.to_string(), "Document JSON is malformed at `outer.inner`.");
	}

	#[test]
	fn transport_error_keeps_source() {
		let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
		let err: Error = TransportError::network(io).into();
		let source = StdError::source(&err).expect("Transport error should expose its source.");

		assert_eq!(source.to_string(), "refused");
	}
}
