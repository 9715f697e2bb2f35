use core::cell::Cell;
use futures::executor::LocalPool;
use namespaced_component::{
	component::{Collaborators, NamespacedComponent, NAV_ITEMS, SHELL},
	config::{ComponentConfig, ComponentOptions},
	dom::{Dom, DomEvent, ElementSet, EventType},
	error::{ConfigError, Error, RenderError, TemplateError},
	memory::{DeferredTransport, ManualTimer, MemoryDom, MemoryElements, MemorySink},
	names::{CLICK, IS_HIDDEN, NAV_ITEM},
	template::{NavLink, ShellTemplate, Template},
};
use serde_json::Value;
use std::rc::Rc;

struct Fixture {
	dom: MemoryDom,
	transport: DeferredTransport,
	timer: ManualTimer,
	sink: MemorySink,
	pool: LocalPool,
}

impl Fixture {
	fn new() -> Self {
		Self {
			dom: MemoryDom::new(),
			transport: DeferredTransport::new(),
			timer: ManualTimer::new(),
			sink: MemorySink::new(),
			pool: LocalPool::new(),
		}
	}

	fn collaborators_with(&self, template: Rc<dyn Template>) -> Collaborators<MemoryDom> {
		Collaborators {
			dom: self.dom.clone(),
			template,
			transport: Rc::new(self.transport.clone()),
			timer: Rc::new(self.timer.clone()),
			spawner: Rc::new(self.pool.spawner()),
			sink: Rc::new(self.sink.clone()),
		}
	}

	fn collaborators(&self) -> Collaborators<MemoryDom> {
		self.collaborators_with(Rc::new(ShellTemplate))
	}

	fn mount(&self, config: ComponentConfig) -> NamespacedComponent<MemoryDom> {
		NamespacedComponent::mount(config, self.collaborators()).unwrap()
	}
}

fn nav_item(component: &NamespacedComponent<MemoryDom>) -> MemoryElements {
	component.element(NAV_ITEMS).unwrap().at(0)
}

fn own_listeners(component: &NamespacedComponent<MemoryDom>) -> usize {
	component.element(SHELL).unwrap().listener_count(&EventType::new(component.prefixes().event_suffix()))
}

#[test]
fn derived_names() {
	let fixture = Fixture::new();
	let component = NamespacedComponent::new(ComponentConfig::builder().build().unwrap(), fixture.collaborators());

	let prefixes = component.prefixes();
	assert_eq!(component.namespace().as_str(), "exampleClass");
	assert_eq!(prefixes.selector_prefix(), ".js-exampleClass");
	assert_eq!(prefixes.js_prefix(), "js-exampleClass");
	assert_eq!(prefixes.css_class_prefix(), "example-class__");
	assert_eq!(prefixes.css_modifier_prefix(), "example-class--");
	assert_eq!(prefixes.event_suffix(), ".exampleClass");
	assert_eq!(prefixes.log_prefix(), "[ ExampleClass ] -");

	assert_eq!(component.selectors()[NAV_ITEM], ".js-exampleClassNavItem");
	assert_eq!(component.css_modifiers()[IS_HIDDEN], "example-class--is--hidden");
	assert_eq!(component.events()[CLICK].to_string(), "click.exampleClass");
}

#[test]
fn every_name_carries_the_namespace() {
	let fixture = Fixture::new();
	let component = NamespacedComponent::new(ComponentConfig::builder().namespace("navThing").build().unwrap(), fixture.collaborators());

	for (_, selector) in component.selectors().iter() {
		assert!(selector.starts_with(".js-navThing"), "{:?}", selector);
	}
	for (_, modifier) in component.css_modifiers().iter() {
		assert!(modifier.starts_with("nav-thing--"), "{:?}", modifier);
	}
	for (_, event_type) in component.events().iter() {
		assert_eq!(event_type.namespaces(), ["navThing"]);
	}
}

#[test]
fn empty_namespace_is_rejected() {
	assert!(matches!(ComponentConfig::builder().namespace("").build(), Err(ConfigError::EmptyNamespace)));

	let fixture = Fixture::new();
	let options = ComponentOptions {
		namespace: Some(String::new()),
		..ComponentOptions::default()
	};
	assert!(matches!(
		NamespacedComponent::from_options(options, fixture.collaborators()),
		Err(Error::Config(ConfigError::EmptyNamespace))
	));
}

#[test]
fn init_caches_the_rendered_elements() {
	let fixture = Fixture::new();
	let component = fixture.mount(
		ComponentConfig::builder()
			.nav_links(vec![
				NavLink {
					url: "/a".to_owned(),
					label: "A".to_owned(),
				},
				NavLink {
					url: "/b".to_owned(),
					label: "B & C".to_owned(),
				},
			])
			.build()
			.unwrap(),
	);

	let shell = component.element(SHELL).unwrap();
	assert_eq!(shell.len(), 1);
	assert_eq!(shell.attribute("class").as_deref(), Some("example-class__nav"));
	assert_eq!(shell.attribute("data-fu").as_deref(), Some("true"));

	let nav_items = component.element(NAV_ITEMS).unwrap();
	assert_eq!(nav_items.len(), 2);
	assert_eq!(nav_items.at(1).attribute("href").as_deref(), Some("/b"));
	assert_eq!(nav_items.at(1).text(), "B & C");
	assert_eq!(nav_items.filter(".example-class__nav-item").len(), 2);

	assert_eq!(own_listeners(&component), 1);
	assert!(fixture.transport.is_empty());
}

#[test]
fn uninitialized_component_has_no_elements() {
	let fixture = Fixture::new();
	let component = NamespacedComponent::new(ComponentConfig::builder().build().unwrap(), fixture.collaborators());
	assert_eq!(component.element(SHELL), None);
	component.add_listeners().unwrap();
	component.remove_listeners();
}

#[test]
fn reinit_binds_each_event_once() {
	let fixture = Fixture::new();
	let component = fixture.mount(ComponentConfig::builder().build().unwrap());
	let first_shell = component.element(SHELL).unwrap();

	component.init().unwrap();
	component.init().unwrap();

	let shell = component.element(SHELL).unwrap();
	assert_ne!(shell, first_shell);
	assert_eq!(own_listeners(&component), 1);
	assert_eq!(first_shell.listener_count(&EventType::new(".exampleClass")), 0);

	assert_eq!(nav_item(&component).click(), 1);
	assert_eq!(fixture.transport.len(), 1);
}

#[test]
fn failed_reinit_keeps_the_previous_root() {
	let fixture = Fixture::new();
	let fail = Rc::new(Cell::new(false));
	let template = {
		let fail = fail.clone();
		move |name: &str, data: &Value| -> Result<String, TemplateError> {
			if fail.get() {
				Err(TemplateError::new(name, "unavailable"))
			} else {
				ShellTemplate.render(name, data)
			}
		}
	};
	let component = NamespacedComponent::mount(ComponentConfig::builder().build().unwrap(), fixture.collaborators_with(Rc::new(template))).unwrap();
	let shell = component.element(SHELL).unwrap();

	fail.set(true);
	assert!(matches!(component.init(), Err(Error::Render(RenderError::Template(_)))));

	assert_eq!(component.element(SHELL), Some(shell));
	assert_eq!(own_listeners(&component), 1);
	nav_item(&component).click();
	assert_eq!(fixture.transport.len(), 1);
}

#[test]
fn render_errors_propagate() {
	let fixture = Fixture::new();

	let empty = |_: &str, _: &Value| -> Result<String, TemplateError> { Ok("  ".to_owned()) };
	assert!(matches!(
		NamespacedComponent::mount(ComponentConfig::builder().build().unwrap(), fixture.collaborators_with(Rc::new(empty))),
		Err(Error::Render(RenderError::EmptyRoot { .. }))
	));

	let malformed = |_: &str, _: &Value| -> Result<String, TemplateError> { Ok("<nav>".to_owned()) };
	assert!(matches!(
		NamespacedComponent::mount(ComponentConfig::builder().build().unwrap(), fixture.collaborators_with(Rc::new(malformed))),
		Err(Error::Render(RenderError::Markup(_)))
	));
}

#[test]
fn mounts_into_the_document() {
	let fixture = Fixture::new();
	fixture.dom.body().append(&fixture.dom.parse(r#"<div id="app"></div>"#).unwrap()).unwrap();

	let component = fixture.mount(ComponentConfig::builder().mount("#app").build().unwrap());
	assert_eq!(component.element(SHELL).unwrap().parent(), fixture.dom.query("#app"));
	assert_eq!(fixture.dom.query(".js-exampleClassNavItem").len(), 1);

	component.init().unwrap();
	assert_eq!(fixture.dom.query("nav").len(), 1);
	assert_eq!(fixture.dom.query("#app").find(".js-exampleClassNavItem"), component.element(NAV_ITEMS).unwrap());

	fixture.dom.query(".js-exampleClassNavItem").click();
	assert_eq!(fixture.transport.len(), 1);
}

#[test]
fn missing_mount_point_is_an_error() {
	let fixture = Fixture::new();
	assert!(matches!(
		NamespacedComponent::mount(ComponentConfig::builder().mount("#missing").build().unwrap(), fixture.collaborators()),
		Err(Error::Render(RenderError::MountNotFound { selector })) if selector == "#missing"
	));
}

#[test]
fn remove_listeners_keeps_other_namespaces() {
	let fixture = Fixture::new();
	let component = fixture.mount(ComponentConfig::builder().build().unwrap());
	let shell = component.element(SHELL).unwrap();

	let foreign = Rc::new(Cell::new(0));
	{
		let foreign = foreign.clone();
		shell
			.on(&EventType::new("click.otherThing"), ".js-exampleClassNavItem", Rc::new(move |_: &DomEvent| foreign.set(foreign.get() + 1)))
			.unwrap();
	}

	component.remove_listeners();
	assert_eq!(own_listeners(&component), 0);
	assert_eq!(shell.listener_count(&EventType::new("click.otherThing")), 1);

	assert_eq!(nav_item(&component).click(), 1);
	assert_eq!(foreign.get(), 1);
	assert!(fixture.transport.is_empty());

	component.add_listeners().unwrap();
	assert_eq!(nav_item(&component).click(), 2);
	assert_eq!(fixture.transport.len(), 1);
}

#[test]
fn delegation_covers_late_nav_items() {
	let fixture = Fixture::new();
	let component = fixture.mount(ComponentConfig::builder().build().unwrap());
	let shell = component.element(SHELL).unwrap();

	let late = fixture.dom.parse(r#"<a class="js-exampleClassNavItem" href="/late"><span>Late</span></a>"#).unwrap();
	shell.append(&late).unwrap();

	assert_eq!(late.find("span").click(), 1);
	assert_eq!(fixture.transport.len(), 1);

	assert_eq!(shell.click(), 0);
	assert_eq!(fixture.transport.len(), 1);
}

#[test]
fn from_options() {
	let fixture = Fixture::new();
	let options = ComponentOptions::from_json(r#"{ "namespace": "navThing", "urls": { "NAV_ITEM": "/api/nav" }, "errorWait": 10, "randomProp": false }"#).unwrap();
	let component = NamespacedComponent::from_options(options, fixture.collaborators()).unwrap();
	component.init().unwrap();

	assert_eq!(component.element(SHELL).unwrap().attribute("class").as_deref(), Some("nav-thing__nav"));
	assert_eq!(component.element(SHELL).unwrap().attribute("data-fu").as_deref(), Some("false"));

	assert_eq!(nav_item(&component).click(), 1);
	assert_eq!(fixture.transport.requests()[0].url, "/api/nav");
}

#[test]
fn derived_fields_are_not_options() {
	assert!(matches!(ComponentOptions::from_json(r#"{ "jsPrefix": "js-elsewhere" }"#), Err(ConfigError::Options(_))));
	assert!(matches!(ComponentOptions::from_json(r#"{ "urls": { "OTHER": "/" } }"#), Err(ConfigError::Options(_))));
}
