use core::time::Duration;

/// Schedules callbacks. Scheduled callbacks can't be cancelled.
pub trait Timer {
	/// Runs `callback` once, after `delay`.
	fn after(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle;
}

/// Identifies a scheduled callback. Callers are free to ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);
