//! The component itself: construction, rendering, delegated listeners and the nav item request.

use crate::{
	config::{ComponentConfig, ComponentOptions},
	dom::{Dom, DomEvent, ElementSet, EventType, Handler},
	error::{Error, RenderError, TemplateError},
	names::{NameMap, Names, CLICK, NAV_ITEM},
	namespace::{Namespace, Prefixes},
	sink::{Failure, Sink},
	template::{ShellData, ShellProps, Template, EXAMPLE_TEMPLATE},
	timer::Timer,
	transport::{Request, Transport, TransportFailure},
};
use core::{
	cell::{Cell, RefCell},
	fmt::{self, Debug, Formatter},
};
use futures::task::{LocalSpawn, LocalSpawnExt};
use hashbrown::HashMap;
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, error, info, instrument, trace, trace_span, warn};

/// Cached root element.
pub const SHELL: &str = "SHELL";
/// Cached nav item anchors, as found right after rendering.
pub const NAV_ITEMS: &str = "NAV_ITEMS";

/// Everything the component talks to. Injected once, at construction.
pub struct Collaborators<D: Dom> {
	pub dom: D,
	pub template: Rc<dyn Template>,
	pub transport: Rc<dyn Transport>,
	pub timer: Rc<dyn Timer>,
	/// Drives request continuations. A single-threaded executor.
	pub spawner: Rc<dyn LocalSpawn>,
	pub sink: Rc<dyn Sink>,
}

/// Lifecycle of one nav item request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
	Idle,
	Pending,
	Succeeded,
	Failed,
}

impl RequestState {
	fn can_become(self, next: RequestState) -> bool {
		matches!(
			(self, next),
			(RequestState::Idle, RequestState::Pending) | (RequestState::Pending, RequestState::Succeeded) | (RequestState::Pending, RequestState::Failed)
		)
	}
}

#[derive(Debug)]
struct NavRequest {
	id: u64,
	state: RequestState,
}

impl NavRequest {
	fn transition(&mut self, next: RequestState) {
		debug_assert!(self.state.can_become(next), "Invalid request transition {:?} → {:?}", self.state, next);
		trace!("Request {}: {:?} → {:?}", self.id, self.state, next);
		self.state = next;
	}
}

/// Counters over all nav item requests of one component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestStats {
	pub issued: u64,
	pub succeeded: u64,
	pub failed: u64,
}

impl RequestStats {
	/// Requests whose transport hasn't settled yet.
	#[must_use]
	pub fn pending(&self) -> u64 {
		self.issued - self.succeeded - self.failed
	}
}

type EventMethod<D> = fn(&NamespacedComponent<D>, &DomEvent);

/// A UI component whose selectors, CSS classes and event types are all derived from its namespace.
///
/// Cloning is shallow: clones share their state.
pub struct NamespacedComponent<D: Dom> {
	inner: Rc<Inner<D>>,
}

struct Inner<D: Dom> {
	config: ComponentConfig,
	prefixes: Prefixes,
	names: Names,
	collaborators: Collaborators<D>,
	elements: RefCell<HashMap<&'static str, D::Elements>>,
	stats: Cell<RequestStats>,
}

impl<D: Dom> Clone for NamespacedComponent<D> {
	fn clone(&self) -> Self {
		Self { inner: self.inner.clone() }
	}
}

impl<D: Dom> Debug for NamespacedComponent<D> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("NamespacedComponent")
			.field("config", &self.inner.config)
			.field("prefixes", &self.inner.prefixes)
			.field("cached_elements", &self.inner.elements.borrow().keys().collect::<Vec<_>>())
			.field("stats", &self.inner.stats.get())
			.finish()
	}
}

impl<D: Dom + 'static> NamespacedComponent<D> {
	/// Declared events: namespaced event, delegate selector, handler.
	const LISTENERS: [(&'static str, &'static str, EventMethod<D>); 1] = [(CLICK, NAV_ITEM, Self::handle_nav_item_click)];

	/// Derives prefixes and names. Doesn't render; see [`NamespacedComponent::init`].
	#[must_use]
	pub fn new(config: ComponentConfig, collaborators: Collaborators<D>) -> Self {
		let prefixes = Prefixes::new(config.namespace());
		let names = Names::new(&prefixes);
		Self {
			inner: Rc::new(Inner {
				config,
				prefixes,
				names,
				collaborators,
				elements: RefCell::default(),
				stats: Cell::default(),
			}),
		}
	}

	/// [`NamespacedComponent::new`] from an options bag.
	///
	/// # Errors
	///
	/// Iff the options don't validate.
	pub fn from_options(options: ComponentOptions, collaborators: Collaborators<D>) -> Result<Self, Error> {
		Ok(Self::new(ComponentConfig::from_options(options)?, collaborators))
	}

	/// Constructs and initializes the component in one go.
	///
	/// # Errors
	///
	/// Iff [`NamespacedComponent::init`] fails.
	pub fn mount(config: ComponentConfig, collaborators: Collaborators<D>) -> Result<Self, Error> {
		let component = Self::new(config, collaborators);
		component.init()?;
		Ok(component)
	}

	/// Renders the root element, caches it and its nav items, mounts it if configured and binds the listeners.
	///
	/// Re-initializing replaces the previous root. Its listeners are removed first, so each event stays bound exactly once.
	/// On error, the previous root and its listeners are left as they were.
	///
	/// # Errors
	///
	/// Iff rendering, mounting or binding fails.
	#[instrument(skip(self), fields(namespace = %self.namespace()))]
	pub fn init(&self) -> Result<(), Error> {
		let inner = &self.inner;
		info!("{} Initializing", inner.prefixes.log_prefix());

		let shell = self.render()?;
		let nav_items = shell.find(&inner.names.selectors[NAV_ITEM]);
		debug!("Found {} nav item(s).", nav_items.len());

		let mounted = match inner.config.mount() {
			None => false,
			Some(selector) => {
				let target = inner.collaborators.dom.query(selector);
				if target.is_empty() {
					return Err(RenderError::MountNotFound { selector: selector.to_owned() }.into());
				}
				target.append(&shell).map_err(RenderError::Mount)?;
				true
			}
		};

		if let Some(previous) = self.element(SHELL) {
			trace!("Replacing the previous root.");
			self.remove_listeners();
			if mounted {
				previous.remove();
			}
		}

		{
			let mut elements = inner.elements.borrow_mut();
			elements.insert(SHELL, shell);
			elements.insert(NAV_ITEMS, nav_items);
		}
		self.add_listeners()
	}

	fn render(&self) -> Result<D::Elements, RenderError> {
		let inner = &self.inner;
		let data = ShellData {
			css_class_prefix: inner.prefixes.css_class_prefix(),
			js_prefix: inner.prefixes.js_prefix(),
			nav_urls: inner.config.nav_links(),
			props: ShellProps {
				fu: inner.config.random_prop(),
				unimportant: true,
			},
		};
		let data = serde_json::to_value(&data).map_err(|error| TemplateError::new(EXAMPLE_TEMPLATE, error.to_string()))?;
		let markup = inner.collaborators.template.render(EXAMPLE_TEMPLATE, &data)?;
		let shell = inner.collaborators.dom.parse(&markup).map_err(RenderError::Markup)?;
		if shell.is_empty() {
			return Err(RenderError::EmptyRoot { template: EXAMPLE_TEMPLATE });
		}
		Ok(shell)
	}

	/// Binds one delegated listener per declared event to the root element.
	///
	/// Does nothing before the first [`NamespacedComponent::init`].
	///
	/// # Errors
	///
	/// Iff the DOM refuses a listener.
	#[instrument(skip(self), fields(namespace = %self.namespace()))]
	pub fn add_listeners(&self) -> Result<(), Error> {
		let shell = match self.element(SHELL) {
			Some(shell) => shell,
			None => {
				warn!("{} Not initialized; no listeners added.", self.inner.prefixes.log_prefix());
				return Ok(());
			}
		};
		for (event, selector, method) in Self::LISTENERS {
			let event_type = &self.inner.names.events[event];
			let selector = &self.inner.names.selectors[selector];
			shell.on(event_type, selector, self.handler(method))?;
			trace!("Bound {} to {:?}.", event_type, selector);
		}
		Ok(())
	}

	/// Removes this component's listeners by their namespaced event types. Other namespaces' listeners are untouched.
	#[instrument(skip(self), fields(namespace = %self.namespace()))]
	pub fn remove_listeners(&self) {
		if let Some(shell) = self.element(SHELL) {
			for (_, event_type) in self.inner.names.events.iter() {
				shell.off(event_type);
			}
		}
	}

	fn handler(&self, method: EventMethod<D>) -> Handler {
		let inner = Rc::downgrade(&self.inner);
		Rc::new(move |event: &DomEvent| match inner.upgrade() {
			Some(inner) => method(&NamespacedComponent { inner }, event),
			None => warn!("Ignoring {:?} on {:?} for a dropped component.", event.event_type, event.selector),
		})
	}

	/// Requests [`Urls::nav_item`](`crate::config::Urls::nav_item`) with the configured data.
	///
	/// Every call issues exactly one request, which settles into [`handle_nav_item_success`](`NamespacedComponent::handle_nav_item_success`)
	/// or [`handle_nav_item_failure`](`NamespacedComponent::handle_nav_item_failure`) independently of any other.
	pub fn handle_nav_item_click(&self, event: &DomEvent) {
		let inner = &self.inner;
		let span = trace_span!("handle_nav_item_click", event = ?event);
		let _enter = span.enter();

		let mut stats = inner.stats.get();
		stats.issued += 1;
		inner.stats.set(stats);
		let mut request = NavRequest {
			id: stats.issued,
			state: RequestState::Idle,
		};

		let response = inner.collaborators.transport.request(Request::get(inner.config.urls().nav_item.clone(), inner.config.nav_item_data().clone()));
		request.transition(RequestState::Pending);

		let component = self.clone();
		let continuation = async move {
			let response = response.await;
			let mut stats = component.inner.stats.get();
			match response {
				Ok(body) => {
					request.transition(RequestState::Succeeded);
					stats.succeeded += 1;
					component.inner.stats.set(stats);
					component.handle_nav_item_success(&body);
				}
				Err(failure) => {
					request.transition(RequestState::Failed);
					stats.failed += 1;
					component.inner.stats.set(stats);
					component.handle_nav_item_failure(failure.into());
				}
			}
		};

		if let Err(spawn_error) = inner.collaborators.spawner.spawn_local(continuation) {
			error!("{} Could not await the nav item response: {}", inner.prefixes.log_prefix(), spawn_error);
			let mut stats = inner.stats.get();
			stats.failed += 1;
			inner.stats.set(stats);
			self.handle_nav_item_failure(TransportFailure::new(spawn_error.to_string()).into());
		}
	}

	/// Parses `body` and reports it right away.
	///
	/// A body that isn't JSON takes the failure path instead.
	pub fn handle_nav_item_success(&self, body: &str) {
		match serde_json::from_str::<Value>(body) {
			Ok(value) => self.inner.collaborators.sink.success(&value),
			Err(parse_error) => {
				warn!("{} Unparsable nav item response: {}", self.inner.prefixes.log_prefix(), parse_error);
				self.handle_nav_item_failure(Failure::Parse {
					body: body.to_owned(),
					message: parse_error.to_string(),
				});
			}
		}
	}

	/// Reports `failure` once the configured error delay has passed.
	///
	/// Each call schedules its own report. Scheduled reports can't be cancelled.
	pub fn handle_nav_item_failure(&self, failure: Failure) {
		let delay = self.inner.config.error_delay();
		let sink = self.inner.collaborators.sink.clone();
		let handle = self.inner.collaborators.timer.after(delay, Box::new(move || sink.failure(&failure)));
		debug!("Failure report {:?} scheduled in {:?}.", handle, delay);
	}

	#[must_use]
	pub fn config(&self) -> &ComponentConfig {
		&self.inner.config
	}

	#[must_use]
	pub fn namespace(&self) -> &Namespace {
		self.inner.prefixes.namespace()
	}

	#[must_use]
	pub fn prefixes(&self) -> &Prefixes {
		&self.inner.prefixes
	}

	#[must_use]
	pub fn selectors(&self) -> &NameMap<String> {
		&self.inner.names.selectors
	}

	#[must_use]
	pub fn css_modifiers(&self) -> &NameMap<String> {
		&self.inner.names.css_modifiers
	}

	#[must_use]
	pub fn events(&self) -> &NameMap<EventType> {
		&self.inner.names.events
	}

	/// A cached element, by logical name ([`SHELL`], [`NAV_ITEMS`]).
	#[must_use]
	pub fn element(&self, name: &str) -> Option<D::Elements> {
		self.inner.elements.borrow().get(name).cloned()
	}

	#[must_use]
	pub fn request_stats(&self) -> RequestStats {
		self.inner.stats.get()
	}
}
