use crate::timer::{Timer, TimerHandle};
use core::{cell::RefCell, time::Duration};
use std::rc::Rc;
use tracing::trace;

struct Scheduled {
	due: Duration,
	id: u64,
	callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Clock {
	now: Duration,
	next_id: u64,
	scheduled: Vec<Scheduled>,
}

/// A [`Timer`] on a virtual clock that only moves through [`ManualTimer::advance`].
///
/// Clones share the same clock.
#[derive(Clone, Default)]
pub struct ManualTimer {
	clock: Rc<RefCell<Clock>>,
}

impl ManualTimer {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Virtual time elapsed since creation.
	#[must_use]
	pub fn now(&self) -> Duration {
		self.clock.borrow().now
	}

	/// Callbacks that haven't fired yet.
	#[must_use]
	pub fn pending(&self) -> usize {
		self.clock.borrow().scheduled.len()
	}

	/// Moves the clock forward by `by`, running every callback that becomes due, earliest first.
	/// Callbacks scheduled while advancing run too if they fall within the window.
	///
	/// Returns how many callbacks ran.
	pub fn advance(&self, by: Duration) -> usize {
		let target = self.now() + by;
		let mut ran = 0;
		loop {
			let next = {
				let mut clock = self.clock.borrow_mut();
				let next = clock
					.scheduled
					.iter()
					.enumerate()
					.filter(|(_, scheduled)| scheduled.due <= target)
					.min_by_key(|(_, scheduled)| (scheduled.due, scheduled.id))
					.map(|(index, _)| index);
				next.map(|index| {
					let scheduled = clock.scheduled.remove(index);
					clock.now = scheduled.due;
					scheduled
				})
			};
			match next {
				Some(scheduled) => {
					trace!("Firing timer {} at {:?}.", scheduled.id, scheduled.due);
					(scheduled.callback)();
					ran += 1;
				}
				None => break,
			}
		}
		self.clock.borrow_mut().now = target;
		ran
	}
}

impl Timer for ManualTimer {
	fn after(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
		let mut clock = self.clock.borrow_mut();
		let id = clock.next_id;
		clock.next_id += 1;
		let due = clock.now + delay;
		clock.scheduled.push(Scheduled { due, id, callback });
		TimerHandle(id)
	}
}

#[cfg(test)]
mod tests {
	use super::ManualTimer;
	use crate::timer::Timer;
	use core::{cell::RefCell, time::Duration};
	use std::rc::Rc;

	#[test]
	fn fires_in_order_at_the_boundary() {
		let timer = ManualTimer::new();
		let fired = Rc::new(RefCell::new(Vec::new()));
		for (name, ms) in [("b", 20), ("a", 10), ("c", 20)] {
			let fired = fired.clone();
			timer.after(Duration::from_millis(ms), Box::new(move || fired.borrow_mut().push(name)));
		}

		assert_eq!(timer.advance(Duration::from_millis(9)), 0);
		assert_eq!(timer.advance(Duration::from_millis(1)), 1);
		assert_eq!(timer.advance(Duration::from_millis(10)), 2);
		assert_eq!(*fired.borrow(), ["a", "b", "c"]);
		assert_eq!(timer.now(), Duration::from_millis(20));
		assert_eq!(timer.pending(), 0);
	}

	#[test]
	fn callbacks_may_schedule() {
		let timer = ManualTimer::new();
		let fired = Rc::new(RefCell::new(0));
		let (inner_timer, inner_fired) = (timer.clone(), fired.clone());
		timer.after(
			Duration::from_millis(5),
			Box::new(move || {
				let fired = inner_fired.clone();
				inner_timer.after(Duration::from_millis(5), Box::new(move || *fired.borrow_mut() += 1));
			}),
		);
		assert_eq!(timer.advance(Duration::from_millis(10)), 2);
		assert_eq!(*fired.borrow(), 1);
	}
}
