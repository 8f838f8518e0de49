//! Window and input collaborator.
//!
//! # Invariants
//! - Input is polled once per frame; nothing here is event driven.
//! - The scene core only ever sees the `InputSource` trait.

mod state;

pub use state::{InputSource, InputState, Key, MouseButton};

pub fn crate_info() -> &'static str {
    concat!("lumen-input v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
