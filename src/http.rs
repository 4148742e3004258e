//! Transport primitives for registry submissions.
//!
//! The client depends on an HTTP stack only through [`RegistryHttpClient`]. The default
//! [`ReqwestHttpClient`] is enabled by the `reqwest` feature; tests and embedders can plug in any
//! other implementation to stub the registry without network access.

// self
use crate::_prelude::*;

/// `Content-Type` sent with every submission body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Boxed future returned by [`RegistryHttpClient::post_json`].
pub type HttpFuture<'a, E> = Pin<Box<dyn Future<Output = Result<RegistryResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of posting a JSON body to the registry.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by every clone
/// of a client, and the returned future must be `Send` so submissions can hop executors.
/// A transport performs exactly one exchange per call and never retries; any status code the
/// server returns, including errors, is reported as a [`RegistryResponse`]. Only failures that
/// prevent a response from arriving (connect, TLS, timeout) surface as `TransportError`.
pub trait RegistryHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and returns the raw status and body.
	fn post_json(&self, request: RegistryRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Fully prepared `POST` request for the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryRequest {
	/// Target URL, including the `signature` query parameter.
	pub url: Url,
	/// Value of the `Content-Type` header.
	pub content_type: &'static str,
	/// Encoded document.
	pub body: Vec<u8>,
}
impl RegistryRequest {
	/// Creates a JSON `POST` request for `url`.
	pub fn json(url: Url, body: Vec<u8>) -> Self {
		Self { url, content_type: JSON_CONTENT_TYPE, body }
	}
}

/// Status and body returned by the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body decoded as text.
	pub body: String,
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that gives up on a single exchange after `timeout`.
	pub fn with_timeout(timeout: Duration) -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl RegistryHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn post_json(&self, request: RegistryRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client
				.post(request.url)
				.header(reqwest::header::CONTENT_TYPE, request.content_type)
				.body(request.body)
				.send()
				.await?;
			let status = response.status().as_u16();
			let body = response.text().await?;

			Ok(RegistryResponse { status, body })
		})
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;

	#[test]
	fn json_request_carries_content_type() {
		let url = Url::parse("https://registry.example.com/create?signature=abc")
			.expect("Fixture URL should parse.");
		let request = RegistryRequest::json(url.clone(), b"{}".to_vec());

		assert_eq!(request.url, url);
		assert_eq!(request.content_type, "application/json");
		assert_eq!(request.body, b"{}");
	}

	#[test]
	fn with_timeout_builds_client() {
		assert!(ReqwestHttpClient::with_timeout(Duration::from_secs(5)).is_ok());
	}
}
