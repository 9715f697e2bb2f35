#![doc(html_root_url = "https://docs.rs/namespaced-component/0.0.1")]
#![warn(clippy::pedantic)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod component;
pub mod config;
pub mod dom;
pub mod error;
mod listeners;
pub mod memory;
pub mod names;
pub mod namespace;
mod rc_hash_map;
pub mod sink;
pub mod template;
pub mod timer;
pub mod transport;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use component::{Collaborators, NamespacedComponent};
pub use config::{ComponentConfig, ComponentOptions};
pub use error::Error;
pub use namespace::{Namespace, Prefixes};
