//! Frame-loop bookkeeping kept apart from the browser clock so it can be
//! driven by hand.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};

/// Hands out [`LoopToken`]s. Starting a loop invalidates every earlier token.
#[derive(Clone, Debug, Default)]
pub struct TickLoop {
	epoch: Arc<AtomicU64>,
}

impl TickLoop {
	pub fn new() -> Self {
		Self::default()
	}

	/// Begin a new loop, cancelling any running one.
	pub fn start(&self) -> LoopToken {
		let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
		LoopToken {
			epoch,
			current: Arc::clone(&self.epoch),
		}
	}

	/// Stop whatever loop is running without starting another.
	pub fn cancel_all(&self) {
		self.epoch.fetch_add(1, Ordering::SeqCst);
	}
}

/// Checked at the top of every frame; once inactive, the loop must not
/// schedule another frame.
#[derive(Clone, Debug)]
pub struct LoopToken {
	epoch: u64,
	current: Arc<AtomicU64>,
}

impl LoopToken {
	pub fn is_active(&self) -> bool {
		self.current.load(Ordering::SeqCst) == self.epoch
	}
}

/// Handle of the one outstanding animation-frame request, shareable with
/// teardown hooks so they can cancel it.
#[derive(Clone, Debug, Default)]
pub struct PendingFrame {
	// browser request ids are non-zero; 0 means nothing is scheduled
	id: Arc<AtomicI32>,
}

impl PendingFrame {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set(&self, id: Option<i32>) {
		self.id.store(id.unwrap_or(0), Ordering::SeqCst);
	}

	/// Forget the outstanding request and return it for cancellation.
	pub fn take(&self) -> Option<i32> {
		Some(self.id.swap(0, Ordering::SeqCst)).filter(|&id| id != 0)
	}
}

/// Turns wall-clock frame times into a count of fixed-length ticks.
#[derive(Clone, Debug)]
pub struct FrameClock {
	tick_ms: f64,
	max_ticks: u32,
	last: Option<f64>,
	carry: f64,
}

impl FrameClock {
	pub fn new(tick_ms: f64, max_ticks: u32) -> Self {
		Self {
			tick_ms: tick_ms.max(1.0),
			max_ticks: max_ticks.max(1),
			last: None,
			carry: 0.0,
		}
	}

	/// Ticks owed at `now_ms`. The first frame always runs one tick; time
	/// beyond `max_ticks` is dropped rather than replayed.
	pub fn ticks_due(&mut self, now_ms: f64) -> u32 {
		let Some(last) = self.last.replace(now_ms) else {
			return 1;
		};
		self.carry += (now_ms - last).max(0.0);
		let due = (self.carry / self.tick_ms).floor();
		if due >= self.max_ticks as f64 {
			self.carry = 0.0;
			return self.max_ticks;
		}
		self.carry -= due * self.tick_ms;
		due as u32
	}
}

/// Limits how often a snapshot goes out to the renderer.
#[derive(Clone, Debug)]
pub struct PublishThrottle {
	interval_ms: f64,
	last: Option<f64>,
}

impl PublishThrottle {
	pub fn new(interval_ms: f64) -> Self {
		Self {
			interval_ms: interval_ms.max(0.0),
			last: None,
		}
	}

	/// True when a publish is due, recording it as done.
	pub fn ready(&mut self, now_ms: f64) -> bool {
		match self.last {
			Some(last) if now_ms - last < self.interval_ms => false,
			_ => {
				self.last = Some(now_ms);
				true
			}
		}
	}

	/// Record an out-of-band publish so the next throttled one waits a full
	/// interval from here.
	pub fn force(&mut self, now_ms: f64) {
		self.last = Some(now_ms);
	}
}
