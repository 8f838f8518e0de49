//! Shared value types used across the lumen crates.

mod ray;
mod types;

pub use ray::{Ray, RayHit};
pub use types::{MeshHandle, ShaderHandle, Viewport};

pub fn crate_info() -> &'static str {
    concat!("lumen-common v", env!("CARGO_PKG_VERSION"))
}
