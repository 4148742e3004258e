//! Fixed-window bookkeeping; every method runs under the limiter's state lock.

// crates.io
use tokio::time::Instant;
// self
use crate::_prelude::*;

/// Result of asking the current window for one more admission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WindowDecision {
	/// The caller was counted against the window.
	Admitted,
	/// The window is exhausted; the next one opens after `retry_in`.
	Full {
		/// Time left until the current window expires.
		retry_in: Duration,
	},
}

/// Start instant and admission count of the current window.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RateWindow {
	started_at: Instant,
	admitted: u32,
}
impl RateWindow {
	pub(crate) fn new(now: Instant) -> Self {
		Self { started_at: now, admitted: 0 }
	}

	/// Counts one admission, opening a new window first when the current one expired.
	pub(crate) fn try_admit(
		&mut self,
		now: Instant,
		limit: u32,
		window: Duration,
	) -> WindowDecision {
		let elapsed = now.saturating_duration_since(self.started_at);

		// An expired window always resets, even if it still has spare capacity.
		if elapsed >= window {
			self.started_at = now;
			self.admitted = 0;
		}
		if self.admitted < limit {
			self.admitted += 1;

			return WindowDecision::Admitted;
		}

		WindowDecision::Full { retry_in: window - elapsed }
	}

	/// Opens a window at `now` whose first admission is the waking caller.
	pub(crate) fn restart_admitted(&mut self, now: Instant) {
		self.started_at = now;
		self.admitted = 1;
	}

	/// Admissions counted in the window that is live at `now`.
	pub(crate) fn admitted_at(&self, now: Instant, window: Duration) -> u32 {
		if now.saturating_duration_since(self.started_at) >= window { 0 } else { self.admitted }
	}
}
