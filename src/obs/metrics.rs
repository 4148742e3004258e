// self
use crate::obs::{AdmissionKind, SubmissionOutcome};

/// Records a submission outcome via the global metrics recorder (when enabled).
pub fn record_submission_outcome(outcome: SubmissionOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("crpt_registry_submission_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

/// Records how the limiter resolved an admission (when enabled).
pub fn record_admission(kind: AdmissionKind) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("crpt_registry_admission_total", "kind" => kind.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = kind;
	}
}
