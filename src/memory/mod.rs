//! Collaborators that run without a browser: a document in memory, a virtual clock, manually settled requests
//! and a recording sink.
//!
//! Together with [`futures::executor::LocalPool`] as spawner, they drive a component deterministically.

mod dom;
mod selector;
mod sink;
mod timer;
mod transport;

pub use dom::{MemoryDom, MemoryElements};
pub use sink::MemorySink;
pub use timer::ManualTimer;
pub use transport::DeferredTransport;
