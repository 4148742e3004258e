//! Optional observability helpers for submissions and limiter admissions.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run every submission inside a `crpt_registry.submission` span with a
//!   `stage` field, and to emit events when the limiter delays or cancels a caller.
//! - Enable `metrics` to increment `crpt_registry_submission_total` (labeled by `outcome`) and
//!   `crpt_registry_admission_total` (labeled by `kind`).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubmissionOutcome {
	/// Entry to [`RegistryClient::submit`](crate::client::RegistryClient::submit).
	Attempt,
	/// Registry accepted the document.
	Success,
	/// Registry answered with a non-200 status.
	Rejected,
	/// Error propagated back to the caller.
	Failure,
}
impl SubmissionOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SubmissionOutcome::Attempt => "attempt",
			SubmissionOutcome::Success => "success",
			SubmissionOutcome::Rejected => "rejected",
			SubmissionOutcome::Failure => "failure",
		}
	}
}
impl Display for SubmissionOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// How the rate limiter resolved an `acquire` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdmissionKind {
	/// Admitted within the current window.
	Immediate,
	/// Admitted after waiting for the window to roll over.
	Delayed,
	/// Limiter closed before admission.
	Cancelled,
}
impl AdmissionKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AdmissionKind::Immediate => "immediate",
			AdmissionKind::Delayed => "delayed",
			AdmissionKind::Cancelled => "cancelled",
		}
	}
}
impl Display for AdmissionKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
