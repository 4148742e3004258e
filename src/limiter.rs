//! Window-based admission gate shared by every caller of a registry client.
//!
//! [`RateLimiter`] grants at most `request_limit` admissions per window of length `window`.
//! Callers take turns through a fair async mutex, so admission decisions happen one at a time
//! and in arrival order. The window state itself sits behind a short-lived
//! [`parking_lot::Mutex`] that is never held across an `.await`; a caller that finds the window
//! exhausted keeps its turn and sleeps on a tokio timer until the window expires, then opens the
//! next window as its first admission. Callers queued behind it are admitted once the boundary is
//! crossed, again bounded by the limit.
//!
//! Waiting is cancellable in two ways: dropping the `acquire` future releases the turn without
//! touching the window, and [`RateLimiter::close`] wakes every waiter with
//! [`Error::CancelledWait`].

mod window;

// crates.io
use tokio::{
	sync::watch,
	time::{self, Instant},
};
// self
use crate::{
	_prelude::*,
	config::{self, RegistryConfig, TimeUnit},
	limiter::window::{RateWindow, WindowDecision},
	obs::{self, AdmissionKind},
};

/// Admits at most `request_limit` operations per fixed window across concurrent callers.
pub struct RateLimiter {
	request_limit: u32,
	window: Duration,
	state: Mutex<RateWindow>,
	turn: AsyncMutex<()>,
	closed: watch::Sender<bool>,
}
impl RateLimiter {
	/// Creates a limiter admitting `request_limit` operations per `window`.
	///
	/// Fails with [`Error::InvalidConfiguration`] when either value is zero.
	pub fn new(request_limit: u32, window: Duration) -> Result<Self> {
		config::validate_throughput(request_limit, window)?;

		Ok(Self::open(request_limit, window))
	}

	/// Creates a limiter admitting `request_limit` operations per single `unit` of time.
	pub fn per_unit(unit: TimeUnit, request_limit: u32) -> Result<Self> {
		Self::new(request_limit, unit.as_duration())
	}

	/// Creates a limiter from the throughput settings of `config`.
	pub fn from_config(config: &RegistryConfig) -> Result<Self> {
		config.validate()?;

		Ok(Self::open(config.request_limit, config.window))
	}

	/// Maximum admissions per window.
	pub fn request_limit(&self) -> u32 {
		self.request_limit
	}

	/// Window length.
	pub fn window(&self) -> Duration {
		self.window
	}

	/// Admissions granted in the window that is live right now.
	///
	/// Never exceeds [`request_limit`](Self::request_limit); an expired window reports zero.
	pub fn admitted_in_window(&self) -> u32 {
		self.state.lock().admitted_at(Instant::now(), self.window)
	}

	/// Waits until the caller is admitted.
	///
	/// Resolves immediately while the current window has capacity. Otherwise the caller sleeps
	/// until the window expires and becomes the first admission of the next one. Returns
	/// [`Error::CancelledWait`] if the limiter is closed before admission; the window state is
	/// left as it was.
	///
	/// # Panics
	///
	/// Waiting for the next window uses a tokio timer, so a caller over budget panics unless it
	/// runs inside a tokio runtime with the time driver enabled.
	pub async fn acquire(&self) -> Result<()> {
		let mut closed = self.closed.subscribe();
		let _turn = tokio::select! {
			biased;
			_ = wait_closed(&mut closed) => return Err(self.cancelled()),
			turn = self.turn.lock() => turn,
		};
		let decision = self.state.lock().try_admit(Instant::now(), self.request_limit, self.window);
		let WindowDecision::Full { retry_in } = decision else {
			obs::trace_admission(AdmissionKind::Immediate, Duration::ZERO);
			obs::record_admission(AdmissionKind::Immediate);

			return Ok(());
		};

		obs::trace_admission(AdmissionKind::Delayed, retry_in);

		tokio::select! {
			biased;
			_ = wait_closed(&mut closed) => return Err(self.cancelled()),
			_ = time::sleep(retry_in) => {},
		}

		self.state.lock().restart_admitted(Instant::now());

		obs::record_admission(AdmissionKind::Delayed);

		Ok(())
	}

	/// Wakes every waiting caller with [`Error::CancelledWait`] and rejects later acquisitions.
	pub fn close(&self) {
		self.closed.send_replace(true);
	}

	/// Returns `true` once [`close`](Self::close) has been called.
	pub fn is_closed(&self) -> bool {
		*self.closed.borrow()
	}

	fn open(request_limit: u32, window: Duration) -> Self {
		let (closed, _) = watch::channel(false);

		Self {
			request_limit,
			window,
			state: Mutex::new(RateWindow::new(Instant::now())),
			turn: AsyncMutex::new(()),
			closed,
		}
	}

	fn cancelled(&self) -> Error {
		obs::trace_admission(AdmissionKind::Cancelled, Duration::ZERO);
		obs::record_admission(AdmissionKind::Cancelled);

		Error::CancelledWait
	}
}
impl Debug for RateLimiter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RateLimiter")
			.field("request_limit", &self.request_limit)
			.field("window", &self.window)
			.field("admitted_in_window", &self.admitted_in_window())
			.field("closed", &self.is_closed())
			.finish()
	}
}

async fn wait_closed(closed: &mut watch::Receiver<bool>) {
	// The sender lives as long as the limiter, so the channel cannot disconnect here.
	let _ = closed.wait_for(|closed| *closed).await;
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ConfigError;

	async fn admitted_after(limiter: &RateLimiter, start: Instant) -> Duration {
		limiter.acquire().await.expect("Open limiter should admit every caller.");

		start.elapsed()
	}

	fn assert_near(actual: Duration, expected: Duration) {
		assert!(
			actual >= expected && actual < expected + Duration::from_millis(10),
			"Expected admission at {expected:?}, observed {actual:?}."
		);
	}

	#[test]
	fn new_rejects_zero_limit_and_window() {
		assert!(matches!(
			RateLimiter::new(0, Duration::from_secs(1)),
			Err(Error::InvalidConfiguration(ConfigError::ZeroRequestLimit))
		));
		assert!(matches!(
			RateLimiter::new(1, Duration::ZERO),
			Err(Error::InvalidConfiguration(ConfigError::ZeroWindow))
		));
	}

	#[test]
	fn from_config_applies_config_validation() {
		let zero_window = RegistryConfig::with_window(3, Duration::ZERO);

		assert!(matches!(
			RateLimiter::from_config(&zero_window),
			Err(Error::InvalidConfiguration(ConfigError::ZeroWindow))
		));

		let limiter = RateLimiter::from_config(&RegistryConfig::new(TimeUnit::Minutes, 7))
			.expect("Valid config should build a limiter.");

		assert_eq!(limiter.request_limit(), 7);
		assert_eq!(limiter.window(), Duration::from_secs(60));
		assert_eq!(limiter.admitted_in_window(), 0);
		assert!(!limiter.is_closed());
	}

	#[test]
	#[should_panic(expected = "timers are disabled")]
	fn delayed_admission_requires_the_time_driver() {
		let runtime = tokio::runtime::Builder::new_current_thread()
			.build()
			.expect("Runtime without drivers should build.");
		let limiter =
			RateLimiter::new(1, Duration::from_secs(1)).expect("Limiter fixture should be valid.");

		runtime.block_on(async {
			limiter.acquire().await.expect("Immediate admission should not need a timer.");

			let _ = limiter.acquire().await;
		});
	}

	#[tokio::test(start_paused = true)]
	async fn admits_up_to_limit_without_waiting() {
		let limiter = RateLimiter::per_unit(TimeUnit::Seconds, 3)
			.expect("Limiter fixture should be valid.");
		let start = Instant::now();
		let elapsed = tokio::join!(
			admitted_after(&limiter, start),
			admitted_after(&limiter, start),
			admitted_after(&limiter, start),
		);

		assert_eq!(elapsed, (Duration::ZERO, Duration::ZERO, Duration::ZERO));
		assert_eq!(limiter.admitted_in_window(), 3);
	}

	#[tokio::test(start_paused = true)]
	async fn third_caller_waits_for_the_next_window() {
		let limiter =
			RateLimiter::new(2, Duration::from_secs(1)).expect("Limiter fixture should be valid.");
		let start = Instant::now();
		let (first, second, third) = tokio::join!(
			admitted_after(&limiter, start),
			admitted_after(&limiter, start),
			admitted_after(&limiter, start),
		);

		assert_eq!(first, Duration::ZERO);
		assert_eq!(second, Duration::ZERO);
		assert_near(third, Duration::from_secs(1));
		assert_eq!(limiter.admitted_in_window(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn queued_callers_fill_each_window_up_to_the_limit() {
		let limiter =
			RateLimiter::new(2, Duration::from_secs(1)).expect("Limiter fixture should be valid.");
		let start = Instant::now();
		let (a, b, c, d, e) = tokio::join!(
			admitted_after(&limiter, start),
			admitted_after(&limiter, start),
			admitted_after(&limiter, start),
			admitted_after(&limiter, start),
			admitted_after(&limiter, start),
		);
		let mut elapsed = [a, b, c, d, e];

		elapsed.sort();

		assert_eq!(elapsed[0], Duration::ZERO);
		assert_eq!(elapsed[1], Duration::ZERO);
		assert_near(elapsed[2], Duration::from_secs(1));
		assert_near(elapsed[3], Duration::from_secs(1));
		assert_near(elapsed[4], Duration::from_secs(2));
	}

	#[tokio::test(start_paused = true)]
	async fn concurrent_tasks_never_exceed_limit_per_window() {
		const LIMIT: u32 = 3;
		const WINDOW: Duration = Duration::from_millis(100);

		let limiter =
			Arc::new(RateLimiter::new(LIMIT, WINDOW).expect("Limiter fixture should be valid."));
		let start = Instant::now();
		let handles = (0..20)
			.map(|_| {
				let limiter = limiter.clone();

				tokio::spawn(async move {
					let elapsed = admitted_after(&limiter, start).await;

					assert!(limiter.admitted_in_window() <= LIMIT);

					elapsed
				})
			})
			.collect::<Vec<_>>();
		let mut per_window = std::collections::BTreeMap::<u128, u32>::new();

		for handle in handles {
			let elapsed = handle.await.expect("Admission task should not panic.");

			*per_window.entry(elapsed.as_millis() / WINDOW.as_millis()).or_default() += 1;
		}

		assert_eq!(per_window.values().sum::<u32>(), 20);
		assert!(per_window.values().all(|count| *count <= LIMIT), "{per_window:?}");
		assert_eq!(per_window.len(), 7);
	}

	#[tokio::test(start_paused = true)]
	async fn expired_window_resets_before_counting() {
		let limiter =
			RateLimiter::new(2, Duration::from_secs(1)).expect("Limiter fixture should be valid.");

		limiter.acquire().await.expect("First caller should be admitted.");
		time::advance(Duration::from_secs(1)).await;

		assert_eq!(limiter.admitted_in_window(), 0);

		limiter.acquire().await.expect("Caller after expiry should be admitted.");

		assert_eq!(limiter.admitted_in_window(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn limiters_with_equal_settings_are_independent() {
		let first =
			RateLimiter::new(1, Duration::from_secs(60)).expect("Limiter fixture should be valid.");
		let second =
			RateLimiter::new(1, Duration::from_secs(60)).expect("Limiter fixture should be valid.");
		let start = Instant::now();

		assert_eq!(admitted_after(&first, start).await, Duration::ZERO);
		assert_eq!(admitted_after(&second, start).await, Duration::ZERO);
		assert_eq!(first.admitted_in_window(), 1);
		assert_eq!(second.admitted_in_window(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn dropped_wait_releases_the_turn() {
		let limiter =
			RateLimiter::new(1, Duration::from_secs(1)).expect("Limiter fixture should be valid.");
		let start = Instant::now();

		limiter.acquire().await.expect("First caller should be admitted.");

		let abandoned = time::timeout(Duration::from_millis(100), limiter.acquire()).await;

		assert!(abandoned.is_err(), "Waiting caller should still be blocked after 100ms.");
		assert_eq!(limiter.admitted_in_window(), 1);
		assert_near(admitted_after(&limiter, start).await, Duration::from_secs(1));
	}

	#[tokio::test]
	async fn close_wakes_waiters_with_cancelled_wait() {
		let limiter = RateLimiter::new(1, Duration::from_secs(3600))
			.expect("Limiter fixture should be valid.");
		let limiter = Arc::new(limiter);

		limiter.acquire().await.expect("First caller should be admitted.");

		let sleeper = {
			let limiter = limiter.clone();

			tokio::spawn(async move { limiter.acquire().await })
		};
		let queued = {
			let limiter = limiter.clone();

			tokio::spawn(async move { limiter.acquire().await })
		};

		time::sleep(Duration::from_millis(50)).await;
		limiter.close();

		for handle in [sleeper, queued] {
			let result = handle.await.expect("Waiting task should not panic.");

			assert!(matches!(result, Err(Error::CancelledWait)));
		}

		assert!(limiter.is_closed());
		assert_eq!(limiter.admitted_in_window(), 1);
		assert!(matches!(limiter.acquire().await, Err(Error::CancelledWait)));
	}
}
