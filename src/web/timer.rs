use crate::timer::{Timer, TimerHandle};
use core::{convert::TryFrom, time::Duration};
use tracing::error;
use wasm_bindgen::{closure::Closure, JsCast};

/// `window.setTimeout`
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowTimer;

impl Timer for WindowTimer {
	fn after(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
		let callback = Closure::once_into_js(move || callback());
		let timeout = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
		match web_sys::window().map(|window| window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), timeout)) {
			Some(Ok(id)) => TimerHandle(u64::try_from(id).unwrap_or_default()),
			Some(Err(error)) => {
				error!("Failed to schedule a callback in {:?}: {:?}", delay, error);
				TimerHandle(0)
			}
			None => {
				error!("No window to schedule a callback on.");
				TimerHandle(0)
			}
		}
	}
}
