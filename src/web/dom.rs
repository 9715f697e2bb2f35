use crate::{
	dom::{Dom, DomEvent, ElementSet, EventType, Handler},
	error::DomError,
	listeners::ListenerRegistry,
};
use core::cell::{Cell, RefCell};
use hashbrown::HashMap;
use js_sys::Reflect;
use tracing::{error, instrument, trace, trace_span, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

type NativeListener = Closure<dyn Fn(web_sys::Event)>;

/// Property on each element with delegated listeners, pointing into [`REGISTRIES`].
const REGISTRY_KEY: &str = "__namespacedComponentListeners";

thread_local! {
	static REGISTRIES: RefCell<HashMap<u32, ListenerRegistry<NativeListener>>> = RefCell::default();
	static NEXT_REGISTRY: Cell<u32> = Cell::new(0);
}

fn js_error(error: JsValue) -> DomError {
	DomError::Js(error.as_string().unwrap_or_else(|| format!("{:?}", error)))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn registry_id(element: &web_sys::Element, create: bool) -> Result<Option<u32>, DomError> {
	let target: &JsValue = element.as_ref();
	let key = JsValue::from_str(REGISTRY_KEY);
	if let Some(id) = Reflect::get(target, &key).map_err(js_error)?.as_f64() {
		return Ok(Some(id as u32));
	}
	if !create {
		return Ok(None);
	}
	let id = NEXT_REGISTRY.with(|next| {
		let id = next.get();
		next.set(id.wrapping_add(1));
		id
	});
	Reflect::set(target, &key, &JsValue::from(id)).map_err(js_error)?;
	Ok(Some(id))
}

/// A live document.
#[derive(Debug, Clone)]
pub struct WebDom {
	document: web_sys::Document,
}

impl WebDom {
	/// The current window's document.
	#[must_use]
	pub fn new() -> Option<Self> {
		Some(Self::from_document(web_sys::window()?.document()?))
	}

	#[must_use]
	pub fn from_document(document: web_sys::Document) -> Self {
		Self { document }
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}
}

fn collect(nodes: &web_sys::NodeList, into: &mut Vec<web_sys::Element>) {
	for i in 0..nodes.length() {
		if let Some(element) = nodes.item(i).and_then(|node| node.dyn_into::<web_sys::Element>().ok()) {
			if !into.contains(&element) {
				into.push(element);
			}
		}
	}
}

impl Dom for WebDom {
	type Elements = WebElements;

	/// Parsed through a `<template>`, so scripts stay inert. Top-level text is dropped.
	fn parse(&self, markup: &str) -> Result<WebElements, DomError> {
		let template: web_sys::HtmlTemplateElement = self
			.document
			.create_element("template")
			.map_err(js_error)?
			.dyn_into()
			.map_err(|_| DomError::Js("<template> is not an HTMLTemplateElement".to_owned()))?;
		template.set_inner_html(markup);

		let mut elements = Vec::new();
		let mut next = template.content().first_element_child();
		while let Some(element) = next {
			next = element.next_element_sibling();
			elements.push(element);
		}
		Ok(WebElements(elements))
	}

	fn query(&self, selector: &str) -> WebElements {
		let mut elements = Vec::new();
		match self.document.query_selector_all(selector) {
			Ok(nodes) => collect(&nodes, &mut elements),
			Err(error) => warn!("Invalid selector {:?}: {:?}", selector, error),
		}
		WebElements(elements)
	}
}

/// Element references into a live document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebElements(pub Vec<web_sys::Element>);

impl WebElements {
	#[must_use]
	pub fn elements(&self) -> &[web_sys::Element] {
		&self.0
	}
}

impl ElementSet for WebElements {
	fn len(&self) -> usize {
		self.0.len()
	}

	fn find(&self, selector: &str) -> Self {
		let mut found = Vec::new();
		for element in &self.0 {
			match element.query_selector_all(selector) {
				Ok(nodes) => collect(&nodes, &mut found),
				Err(error) => {
					warn!("Invalid selector {:?}: {:?}", selector, error);
					break;
				}
			}
		}
		Self(found)
	}

	fn append(&self, child: &Self) -> Result<(), DomError> {
		let parent = self.0.first().ok_or(DomError::EmptyTarget)?;
		for element in &child.0 {
			parent.append_child(element).map_err(js_error)?;
		}
		Ok(())
	}

	fn remove(&self) {
		for element in &self.0 {
			element.remove();
		}
	}

	#[instrument(skip(self, event_type, handler), fields(event_type = %event_type))]
	fn on(&self, event_type: &EventType, delegate_selector: &str, handler: Handler) -> Result<(), DomError> {
		// Validates the selector the way dispatch will use it.
		if let Some(element) = self.0.first() {
			element.matches(delegate_selector).map_err(|error| DomError::InvalidSelector {
				selector: delegate_selector.to_owned(),
				message: format!("{:?}", error),
			})?;
		}

		for element in &self.0 {
			let id = registry_id(element, true)?.ok_or_else(|| DomError::Js("Could not tag the element for listeners".to_owned()))?;
			REGISTRIES.with(|registries| {
				registries
					.borrow_mut()
					.entry(id)
					.or_default()
					.bind(event_type, delegate_selector, handler.clone(), |base| attach(element, id, base))
			})?;
		}
		Ok(())
	}

	#[instrument(skip(self, event_type), fields(event_type = %event_type))]
	fn off(&self, event_type: &EventType) {
		for element in &self.0 {
			let id = match registry_id(element, false) {
				Ok(Some(id)) => id,
				Ok(None) => continue,
				Err(error) => {
					error!("Failed to look up listeners: {}", error);
					continue;
				}
			};
			let released = REGISTRIES.with(|registries| registries.borrow_mut().get_mut(&id).map(|registry| registry.unbind(event_type)).unwrap_or_default());
			for (base, listener) in released {
				if let Err(error) = element.remove_event_listener_with_callback(&base, listener.as_ref().unchecked_ref()) {
					error!("Failed to remove event listener {:?}: {:?}", base, error);
				}
				// The released listener may be the one currently dispatching.
				wasm_bindgen_futures::spawn_local(async move { drop(listener) });
			}
		}
	}
}

fn attach(element: &web_sys::Element, id: u32, base: &str) -> Result<NativeListener, DomError> {
	let root = element.clone();
	let listener = Closure::wrap(Box::new(move |event: web_sys::Event| dispatch(&root, id, &event)) as Box<dyn Fn(web_sys::Event)>);
	element.add_event_listener_with_callback(base, listener.as_ref().unchecked_ref()).map_err(js_error)?;
	trace!("Attached native {:?} listener.", base);
	Ok(listener)
}

/// Runs each delegated handler once per element between the event target (inclusive) and `root` (exclusive)
/// that matches its selector.
fn dispatch(root: &web_sys::Element, id: u32, event: &web_sys::Event) {
	let event_type = event.type_();
	let span = trace_span!("dispatch", event_type = %event_type);
	let _enter = span.enter();

	let target = match event.target().and_then(|target| target.dyn_into::<web_sys::Node>().ok()) {
		Some(target) => target,
		None => return,
	};
	let mut target = match target.dyn_into::<web_sys::Element>() {
		Ok(element) => Some(element),
		Err(node) => node.parent_element(),
	};
	match &target {
		Some(element) if root.contains(Some(element.as_ref())) => (),
		_ => return,
	}

	let mut path = Vec::new();
	while let Some(element) = target {
		if &element == root {
			break;
		}
		target = element.parent_element();
		path.push(element);
	}

	let handlers = REGISTRIES.with(|registries| registries.borrow().get(&id).map(|registry| registry.handlers(&event_type)).unwrap_or_default());
	let mut ran = 0_usize;
	for (selector, handler) in handlers {
		let dom_event = DomEvent {
			event_type: event_type.clone(),
			selector,
		};
		for element in &path {
			match element.matches(&dom_event.selector) {
				Ok(true) => {
					handler(&dom_event);
					ran += 1;
				}
				Ok(false) => (),
				Err(error) => {
					error!("Invalid delegate selector {:?}: {:?}", dom_event.selector, error);
					break;
				}
			}
		}
	}
	trace!("Ran {} handler(s).", ran);
}
