//! Construction surface for the registry client and its rate limiter.

// self
use crate::{_prelude::*, error::ConfigError};

/// Production endpoint that accepts new registry documents.
pub const DEFAULT_ENDPOINT: &str = "https://ismp.crpt.ru/api/v3/lk/documents/create";

/// Unit of time whose length becomes the limiter window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
	/// One nanosecond.
	Nanoseconds,
	/// One microsecond.
	Microseconds,
	/// One millisecond.
	Milliseconds,
	/// One second.
	Seconds,
	/// One minute.
	Minutes,
	/// One hour.
	Hours,
	/// One day.
	Days,
}
impl TimeUnit {
	/// Returns the length of a single unit.
	pub const fn as_duration(self) -> Duration {
		match self {
			TimeUnit::Nanoseconds => Duration::from_nanos(1),
			TimeUnit::Microseconds => Duration::from_micros(1),
			TimeUnit::Milliseconds => Duration::from_millis(1),
			TimeUnit::Seconds => Duration::from_secs(1),
			TimeUnit::Minutes => Duration::from_secs(60),
			TimeUnit::Hours => Duration::from_secs(60 * 60),
			TimeUnit::Days => Duration::from_secs(24 * 60 * 60),
		}
	}
}

/// Registry endpoint plus the throughput ceiling shared by every caller of one client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
	/// Endpoint receiving `POST` submissions.
	pub endpoint: Url,
	/// Maximum admissions per window.
	pub request_limit: u32,
	/// Window length.
	pub window: Duration,
}
impl RegistryConfig {
	/// Allows `request_limit` submissions per single `unit` of time.
	pub fn new(unit: TimeUnit, request_limit: u32) -> Self {
		Self::with_window(request_limit, unit.as_duration())
	}

	/// Allows `request_limit` submissions per arbitrary `window`.
	pub fn with_window(request_limit: u32, window: Duration) -> Self {
		Self { endpoint: default_endpoint(), request_limit, window }
	}

	/// Points the client at a different endpoint (staging, sandbox, or a local stub).
	pub fn with_endpoint(mut self, endpoint: Url) -> Self {
		self.endpoint = endpoint;

		self
	}

	/// Parses and applies `endpoint`.
	pub fn with_endpoint_str(self, endpoint: &str) -> Result<Self, ConfigError> {
		Ok(self.with_endpoint(Url::parse(endpoint)?))
	}

	/// Rejects limits or windows that could never admit a request.
	pub fn validate(&self) -> Result<(), ConfigError> {
		validate_throughput(self.request_limit, self.window)
	}
}

pub(crate) fn validate_throughput(request_limit: u32, window: Duration) -> Result<(), ConfigError> {
	if request_limit == 0 {
		return Err(ConfigError::ZeroRequestLimit);
	}
	if window.is_zero() {
		return Err(ConfigError::ZeroWindow);
	}

	Ok(())
}

fn default_endpoint() -> Url {
	Url::parse(DEFAULT_ENDPOINT).expect("Default registry endpoint must be a valid URL.")
}
