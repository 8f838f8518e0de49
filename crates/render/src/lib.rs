//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - The scene core never issues GPU calls itself; it only hands matrices,
//!   vectors and opaque handles to a `RenderBackend`.
//! - Shared shader handles are fetched by name from a
//!   `ResourceCache`, never created by components.
//!
//! `CommandRecorder` is a headless backend that records every command. It is
//! used by the CLI driver and by tests; a GPU backend implements the same
//! trait without changing consumers.

mod renderer;
mod resources;

pub use renderer::{CommandRecorder, RenderBackend, RenderCommand};
pub use resources::{DEFAULT_SHADER, ResourceCache, ResourceError, ResourceRegistry};

pub fn crate_info() -> &'static str {
    concat!("lumen-render v", env!("CARGO_PKG_VERSION"))
}
