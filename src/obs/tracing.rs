// self
use crate::{
	_prelude::*,
	obs::{AdmissionKind, SubmissionOutcome},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedSubmission<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedSubmission<F> = F;

/// A span builder used around registry submissions.
#[derive(Clone, Debug)]
pub struct SubmissionSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl SubmissionSpan {
	/// Creates a new span tagged with the provided stage and document identifier.
	pub fn new(stage: &'static str, doc_id: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("crpt_registry.submission", stage, doc_id);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, doc_id);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedSubmission<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits an event describing how the limiter resolved an admission.
pub fn trace_admission(kind: AdmissionKind, delay: Duration) {
	#[cfg(feature = "tracing")]
	{
		match kind {
			AdmissionKind::Immediate => tracing::trace!(kind = kind.as_str(), "admitted"),
			AdmissionKind::Delayed => tracing::debug!(
				kind = kind.as_str(),
				delay_ms = delay.as_millis() as u64,
				"window exhausted; waiting for rollover"
			),
			AdmissionKind::Cancelled =>
				tracing::debug!(kind = kind.as_str(), "admission wait cancelled"),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, delay);
	}
}

/// Emits an event for a finished submission.
pub fn trace_submission(outcome: SubmissionOutcome, status: Option<u16>) {
	#[cfg(feature = "tracing")]
	{
		match outcome {
			SubmissionOutcome::Success | SubmissionOutcome::Attempt =>
				tracing::info!(outcome = outcome.as_str(), status, "registry submission finished"),
			SubmissionOutcome::Rejected | SubmissionOutcome::Failure =>
				tracing::warn!(outcome = outcome.as_str(), status, "registry submission failed"),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (outcome, status);
	}
}
