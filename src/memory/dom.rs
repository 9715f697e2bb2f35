use super::selector::Selector;
use crate::{
	dom::{Dom, DomEvent, ElementSet, EventType, Handler},
	error::DomError,
	listeners::ListenerRegistry,
	template::escape,
};
use core::{
	cell::RefCell,
	fmt::{self, Debug, Formatter},
};
use html5ever::{parse_document, tendril::TendrilSink, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::rc::Rc;
use tracing::{debug, trace, trace_span, warn};

type NodeId = usize;

const VOID_ELEMENTS: &[&str] = &["area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr"];

enum NodeKind {
	Element { tag: String, attributes: Vec<(String, String)> },
	Text(String),
}

struct Node {
	kind: NodeKind,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	listeners: ListenerRegistry<()>,
}

/// Node arena. Detached nodes stay allocated for as long as the document lives.
#[derive(Default)]
struct Tree {
	nodes: Vec<Node>,
}

impl Tree {
	fn insert(&mut self, kind: NodeKind) -> NodeId {
		self.nodes.push(Node {
			kind,
			parent: None,
			children: Vec::new(),
			listeners: ListenerRegistry::default(),
		});
		self.nodes.len() - 1
	}

	/// Copies an html5ever node and its descendants into the arena. Comments, doctypes and processing instructions are skipped.
	fn load(&mut self, handle: &Handle) -> Option<NodeId> {
		match &handle.data {
			NodeData::Text { contents } => Some(self.insert(NodeKind::Text(contents.borrow().to_string()))),
			NodeData::Element { name, attrs, .. } => {
				let attributes = attrs.borrow().iter().map(|attr| (attr.name.local.to_string(), attr.value.to_string())).collect();
				let id = self.insert(NodeKind::Element {
					tag: name.local.to_string(),
					attributes,
				});
				for child in handle.children.borrow().iter() {
					if let Some(child) = self.load(child) {
						self.append_child(id, child);
					}
				}
				Some(id)
			}
			_ => None,
		}
	}

	fn is_element(&self, id: NodeId) -> bool {
		matches!(self.nodes[id].kind, NodeKind::Element { .. })
	}

	fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
		match &self.nodes[id].kind {
			NodeKind::Element { attributes, .. } => attributes.iter().find(|(n, _)| n == name).map(|(_, value)| value.as_str()),
			NodeKind::Text(_) => None,
		}
	}

	fn matches(&self, id: NodeId, selector: &Selector) -> bool {
		match &self.nodes[id].kind {
			NodeKind::Element { tag, .. } => selector.matches(tag, |name| self.attribute(id, name)),
			NodeKind::Text(_) => false,
		}
	}

	fn detach(&mut self, id: NodeId) {
		if let Some(parent) = self.nodes[id].parent.take() {
			self.nodes[parent].children.retain(|&child| child != id);
		}
	}

	fn append_child(&mut self, parent: NodeId, child: NodeId) {
		self.detach(child);
		self.nodes[child].parent = Some(parent);
		self.nodes[parent].children.push(child);
	}

	fn contains(&self, ancestor: NodeId, mut id: NodeId) -> bool {
		loop {
			if id == ancestor {
				return true;
			}
			match self.nodes[id].parent {
				Some(parent) => id = parent,
				None => return false,
			}
		}
	}

	/// Preorder, excluding `id` itself.
	fn descendants(&self, id: NodeId, into: &mut Vec<NodeId>) {
		for &child in &self.nodes[id].children {
			into.push(child);
			self.descendants(child, into);
		}
	}

	/// `id` and its ancestors, innermost first.
	fn ancestry(&self, mut id: NodeId) -> Vec<NodeId> {
		let mut ancestry = vec![id];
		while let Some(parent) = self.nodes[id].parent {
			ancestry.push(parent);
			id = parent;
		}
		ancestry
	}

	fn text(&self, id: NodeId, into: &mut String) {
		match &self.nodes[id].kind {
			NodeKind::Text(text) => into.push_str(text),
			NodeKind::Element { .. } => {
				for &child in &self.nodes[id].children {
					self.text(child, into);
				}
			}
		}
	}

	fn outer_html(&self, id: NodeId, into: &mut String) {
		match &self.nodes[id].kind {
			NodeKind::Text(text) => into.push_str(&escape(text)),
			NodeKind::Element { tag, attributes } => {
				into.push('<');
				into.push_str(tag);
				for (name, value) in attributes {
					into.push_str(&format!(r#" {}="{}""#, name, escape(value)));
				}
				into.push('>');
				if VOID_ELEMENTS.contains(&tag.as_str()) {
					return;
				}
				for &child in &self.nodes[id].children {
					self.outer_html(child, into);
				}
				into.push_str(&format!("</{}>", tag));
			}
		}
	}
}

fn child_element(handle: &Handle, tag: &str) -> Option<Handle> {
	handle
		.children
		.borrow()
		.iter()
		.find(|child| matches!(&child.data, NodeData::Element { name, .. } if &*name.local == tag))
		.cloned()
}

/// A document that lives in memory, with jQuery-like delegated, namespaced events.
///
/// Clones share the same document.
#[derive(Clone)]
pub struct MemoryDom {
	tree: Rc<RefCell<Tree>>,
	body: NodeId,
}

impl Default for MemoryDom {
	fn default() -> Self {
		Self::new()
	}
}

impl Debug for MemoryDom {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoryDom").field("body", &self.body().outer_html()).finish()
	}
}

impl MemoryDom {
	/// A document with an empty `<body>`.
	#[must_use]
	pub fn new() -> Self {
		let mut tree = Tree::default();
		let body = tree.insert(NodeKind::Element {
			tag: "body".to_owned(),
			attributes: Vec::new(),
		});
		Self {
			tree: Rc::new(RefCell::new(tree)),
			body,
		}
	}

	#[must_use]
	pub fn body(&self) -> MemoryElements {
		self.elements(vec![self.body])
	}

	fn elements(&self, ids: Vec<NodeId>) -> MemoryElements {
		MemoryElements {
			tree: self.tree.clone(),
			ids,
		}
	}
}

impl Dom for MemoryDom {
	type Elements = MemoryElements;

	/// Parses `markup` as the content of an HTML body. Any parse error rejects the whole markup.
	fn parse(&self, markup: &str) -> Result<MemoryElements, DomError> {
		// Without a doctype, the document is parsed in quirks mode and that alone counts as an error.
		let dom = parse_document(RcDom::default(), ParseOpts::default()).one(format!("<!DOCTYPE html>{}", markup));
		{
			let errors = dom.errors.borrow();
			if let Some(first) = errors.first() {
				return Err(DomError::Markup {
					count: errors.len(),
					message: first.to_string(),
				});
			}
		}

		let html = match child_element(&dom.document, "html") {
			Some(html) => html,
			None => return Ok(self.elements(Vec::new())),
		};
		let mut tree = self.tree.borrow_mut();
		let mut roots = Vec::new();
		for section in ["head", "body"].iter().filter_map(|tag| child_element(&html, tag)) {
			for child in section.children.borrow().iter() {
				match &child.data {
					NodeData::Text { contents } if contents.borrow().trim().is_empty() => (),
					NodeData::Text { contents } => warn!("Dropping top-level text {:?}.", &**contents.borrow()),
					_ => roots.extend(tree.load(child)),
				}
			}
		}
		drop(tree);
		debug!("Parsed {} root element(s).", roots.len());
		Ok(self.elements(roots))
	}

	fn query(&self, selector: &str) -> MemoryElements {
		let body = self.body();
		let mut found = body.filter(selector);
		found.ids.extend(body.find(selector).ids);
		found
	}
}

/// A set of elements in a [`MemoryDom`].
#[derive(Clone)]
pub struct MemoryElements {
	tree: Rc<RefCell<Tree>>,
	ids: Vec<NodeId>,
}

impl Debug for MemoryElements {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("MemoryElements").field(&self.ids).finish()
	}
}

impl PartialEq for MemoryElements {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.tree, &other.tree) && self.ids == other.ids
	}
}

fn parse_selector(selector: &str) -> Option<Selector> {
	Selector::parse(selector).map_err(|message| warn!("Unsupported selector {:?}: {}", selector, message)).ok()
}

impl MemoryElements {
	fn with_ids(&self, ids: Vec<NodeId>) -> Self {
		Self {
			tree: self.tree.clone(),
			ids,
		}
	}

	/// The elements of this set that match `selector` themselves.
	#[must_use]
	pub fn filter(&self, selector: &str) -> Self {
		let selector = match parse_selector(selector) {
			Some(selector) => selector,
			None => return self.with_ids(Vec::new()),
		};
		let tree = self.tree.borrow();
		self.with_ids(self.ids.iter().copied().filter(|&id| tree.matches(id, &selector)).collect())
	}

	/// The `index`th element as its own set, empty if out of range.
	#[must_use]
	pub fn at(&self, index: usize) -> Self {
		self.with_ids(self.ids.get(index).copied().into_iter().collect())
	}

	/// The value of `name` on the first element.
	#[must_use]
	pub fn attribute(&self, name: &str) -> Option<String> {
		let tree = self.tree.borrow();
		self.ids.first().and_then(|&id| tree.attribute(id, name)).map(ToOwned::to_owned)
	}

	/// The concatenated text content of all elements.
	#[must_use]
	pub fn text(&self) -> String {
		let tree = self.tree.borrow();
		let mut text = String::new();
		for &id in &self.ids {
			tree.text(id, &mut text);
		}
		text
	}

	/// Serialized markup of all elements.
	#[must_use]
	pub fn outer_html(&self) -> String {
		let tree = self.tree.borrow();
		let mut html = String::new();
		for &id in &self.ids {
			tree.outer_html(id, &mut html);
		}
		html
	}

	/// The distinct parents of this set's elements.
	#[must_use]
	pub fn parent(&self) -> Self {
		let tree = self.tree.borrow();
		let mut parents = Vec::new();
		for parent in self.ids.iter().filter_map(|&id| tree.nodes[id].parent) {
			if !parents.contains(&parent) {
				parents.push(parent);
			}
		}
		self.with_ids(parents)
	}

	/// Whether any element of this set is `other`'s first element or one of its ancestors.
	#[must_use]
	pub fn contains(&self, other: &Self) -> bool {
		let tree = self.tree.borrow();
		other.ids.first().map_or(false, |&id| self.ids.iter().any(|&ancestor| tree.contains(ancestor, id)))
	}

	/// How many registrations on this set `pattern` matches.
	#[must_use]
	pub fn listener_count(&self, pattern: &EventType) -> usize {
		let tree = self.tree.borrow();
		self.ids.iter().map(|&id| tree.nodes[id].listeners.count(pattern)).sum()
	}

	/// Dispatches a bubbling `event_type` (a base type like `click`) at each element of this set.
	///
	/// Returns how many handlers ran.
	pub fn trigger(&self, event_type: &str) -> usize {
		self.ids.iter().map(|&target| self.dispatch(target, event_type)).sum()
	}

	/// `trigger("click")`
	pub fn click(&self) -> usize {
		self.trigger("click")
	}

	fn dispatch(&self, target: NodeId, event_type: &str) -> usize {
		let span = trace_span!("dispatch", target, event_type);
		let _enter = span.enter();

		let ancestry = self.tree.borrow().ancestry(target);
		let mut ran = 0;
		for (depth, &current) in ancestry.iter().enumerate() {
			let handlers = self.tree.borrow().nodes[current].listeners.handlers(event_type);
			for (selector, handler) in handlers {
				let matched = match parse_selector(&selector) {
					Some(parsed) => {
						let tree = self.tree.borrow();
						ancestry[..depth].iter().filter(|&&id| tree.matches(id, &parsed)).count()
					}
					None => 0,
				};
				let event = DomEvent {
					event_type: event_type.to_owned(),
					selector,
				};
				for _ in 0..matched {
					handler(&event);
					ran += 1;
				}
			}
		}
		trace!("Ran {} handler(s).", ran);
		ran
	}
}

impl ElementSet for MemoryElements {
	fn len(&self) -> usize {
		self.ids.len()
	}

	fn find(&self, selector: &str) -> Self {
		let selector = match parse_selector(selector) {
			Some(selector) => selector,
			None => return self.with_ids(Vec::new()),
		};
		let tree = self.tree.borrow();
		let mut found = Vec::new();
		for &id in &self.ids {
			let mut descendants = Vec::new();
			tree.descendants(id, &mut descendants);
			for descendant in descendants {
				if tree.matches(descendant, &selector) && !found.contains(&descendant) {
					found.push(descendant);
				}
			}
		}
		drop(tree);
		self.with_ids(found)
	}

	fn append(&self, child: &Self) -> Result<(), DomError> {
		let parent = *self.ids.first().ok_or(DomError::EmptyTarget)?;
		let mut tree = self.tree.borrow_mut();
		for &id in &child.ids {
			tree.append_child(parent, id);
		}
		Ok(())
	}

	fn remove(&self) {
		let mut tree = self.tree.borrow_mut();
		for &id in &self.ids {
			tree.detach(id);
		}
	}

	fn on(&self, event_type: &EventType, delegate_selector: &str, handler: Handler) -> Result<(), DomError> {
		Selector::parse(delegate_selector).map_err(|message| DomError::InvalidSelector {
			selector: delegate_selector.to_owned(),
			message,
		})?;
		let mut tree = self.tree.borrow_mut();
		for &id in &self.ids {
			if !tree.is_element(id) {
				continue;
			}
			tree.nodes[id].listeners.bind(event_type, delegate_selector, handler.clone(), |_| Ok(()))?;
		}
		Ok(())
	}

	fn off(&self, event_type: &EventType) {
		let mut tree = self.tree.borrow_mut();
		for &id in &self.ids {
			tree.nodes[id].listeners.unbind(event_type);
		}
	}
}
