//! Rate-limited submission client for the registry's document endpoint.
//!
//! [`RegistryClient::submit`] performs one full exchange per call:
//!
//! 1. take an admission from the shared [`RateLimiter`] (this is the only place a call waits),
//! 2. encode the [`Document`] as JSON,
//! 3. `POST` it to the configured endpoint with the signature as the `signature` query parameter,
//! 4. classify the response as an [`Outcome`].
//!
//! The admission is consumed before encoding, so a document that fails to encode still counts
//! against the window. The limiter lock is never held across the network call: admitted
//! submissions may be in flight concurrently, only the rate at which they start is throttled.

// self
use crate::{
	_prelude::*,
	config::RegistryConfig,
	document::Document,
	error::TransportError,
	http::{RegistryHttpClient, RegistryRequest, RegistryResponse},
	limiter::RateLimiter,
	obs::{self, SubmissionOutcome, SubmissionSpan},
	signature::Signature,
};
#[cfg(feature = "reqwest")] use crate::{config::TimeUnit, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestRegistryClient = RegistryClient<ReqwestHttpClient>;

/// Classification of a completed exchange with the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
	/// Registry answered HTTP 200.
	Success,
	/// Registry answered any other status.
	Failure {
		/// HTTP status code.
		status: u16,
		/// Response body, verbatim.
		body: String,
	},
}
impl Outcome {
	/// Classifies a raw registry response.
	pub fn from_response(response: RegistryResponse) -> Self {
		match response.status {
			200 => Self::Success,
			status => Self::Failure { status, body: response.body },
		}
	}

	/// Returns `true` for [`Outcome::Success`].
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success)
	}

	/// Converts a failure into [`Error::RemoteRejection`].
	pub fn into_result(self) -> Result<()> {
		match self {
			Self::Success => Ok(()),
			Self::Failure { status, body } => Err(Error::RemoteRejection { status, body }),
		}
	}
}

/// Submits documents to the registry under a shared throughput ceiling.
///
/// The client owns its transport and limiter behind `Arc`s: clones share the same connection
/// pool and, more importantly, the same admission budget.
pub struct RegistryClient<C>
where
	C: ?Sized + RegistryHttpClient,
{
	/// HTTP transport used for every submission.
	pub http_client: Arc<C>,
	limiter: Arc<RateLimiter>,
	endpoint: Url,
}
impl<C> RegistryClient<C>
where
	C: ?Sized + RegistryHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	///
	/// Fails with [`Error::InvalidConfiguration`] before any submission when the limit or window
	/// is zero.
	pub fn with_http_client(
		config: RegistryConfig,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		let limiter = Arc::new(RateLimiter::from_config(&config)?);

		Ok(Self { http_client: http_client.into(), limiter, endpoint: config.endpoint })
	}

	/// Shares an existing limiter, so several clients draw from one budget.
	pub fn with_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
		self.limiter = limiter;

		self
	}

	/// Limiter gating this client.
	pub fn limiter(&self) -> &Arc<RateLimiter> {
		&self.limiter
	}

	/// Endpoint receiving submissions.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	/// Waits for admission, then posts `document` signed with `signature`.
	///
	/// Returns [`Outcome::Success`] for HTTP 200 and [`Outcome::Failure`] for any other status.
	/// Encoding failures surface as [`Error::Encoding`], network failures as
	/// [`Error::Transport`], and a limiter closed during the wait as [`Error::CancelledWait`].
	/// Nothing is retried.
	pub async fn submit(&self, document: &Document, signature: &Signature) -> Result<Outcome> {
		let span = SubmissionSpan::new("submit", &document.doc_id);

		obs::record_submission_outcome(SubmissionOutcome::Attempt);

		let result: Result<Outcome> = span
			.instrument(async move {
				self.limiter.acquire().await?;

				let body = document.to_json()?;
				let request = RegistryRequest::json(self.signed_url(signature), body);
				let response =
					self.http_client.post_json(request).await.map_err(TransportError::network)?;

				Ok(Outcome::from_response(response))
			})
			.await;
		let (outcome, status) = match &result {
			Ok(Outcome::Success) => (SubmissionOutcome::Success, Some(200)),
			Ok(Outcome::Failure { status, .. }) => (SubmissionOutcome::Rejected, Some(*status)),
			Err(_) => (SubmissionOutcome::Failure, None),
		};

		obs::trace_submission(outcome, status);
		obs::record_submission_outcome(outcome);

		result
	}

	fn signed_url(&self, signature: &Signature) -> Url {
		let mut url = self.endpoint.clone();

		url.query_pairs_mut().append_pair("signature", signature.expose());

		url
	}
}
#[cfg(feature = "reqwest")]
impl RegistryClient<ReqwestHttpClient> {
	/// Creates a client for the production endpoint admitting `request_limit` submissions per
	/// single `unit` of time.
	///
	/// The client provisions its own reqwest-backed transport.
	pub fn new(unit: TimeUnit, request_limit: u32) -> Result<Self> {
		Self::from_config(RegistryConfig::new(unit, request_limit))
	}

	/// Creates a reqwest-backed client from a full configuration.
	pub fn from_config(config: RegistryConfig) -> Result<Self> {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Clone for RegistryClient<C>
where
	C: ?Sized + RegistryHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			limiter: self.limiter.clone(),
			endpoint: self.endpoint.clone(),
		}
	}
}
impl<C> Debug for RegistryClient<C>
where
	C: ?Sized + RegistryHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RegistryClient")
			.field("endpoint", &self.endpoint.as_str())
			.field("limiter", &self.limiter)
			.finish()
	}
}
