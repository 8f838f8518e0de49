use lumen_common::ShaderHandle;
use std::collections::BTreeMap;

/// Name under which the shader used by mesh renderers without an explicit
/// shader is registered.
pub const DEFAULT_SHADER: &str = "default_shader";

/// Keyed lookup of shared GPU resources.
///
/// Absence is an empty result, never an error.
pub trait ResourceCache {
    fn shader(&self, name: &str) -> Option<ShaderHandle>;
}

/// Errors from resource registration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("resource {0:?} is already registered, fetch it from the cache instead")]
    AlreadyRegistered(String),
}

/// Name-keyed resource cache. BTreeMap for deterministic iteration.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    shaders: BTreeMap<String, ShaderHandle>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shader. The first registration of a name wins.
    pub fn register_shader(
        &mut self,
        name: impl Into<String>,
        shader: ShaderHandle,
    ) -> Result<(), ResourceError> {
        let name = name.into();
        if self.shaders.contains_key(&name) {
            tracing::error!(%name, "shader already registered");
            return Err(ResourceError::AlreadyRegistered(name));
        }
        tracing::debug!(%name, handle = shader.0, "registered shader");
        self.shaders.insert(name, shader);
        Ok(())
    }

    pub fn shaders(&self) -> &BTreeMap<String, ShaderHandle> {
        &self.shaders
    }

    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }
}

impl ResourceCache for ResourceRegistry {
    fn shader(&self, name: &str) -> Option<ShaderHandle> {
        self.shaders.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_fetch_shader() {
        let mut registry = ResourceRegistry::new();
        registry
            .register_shader(DEFAULT_SHADER, ShaderHandle(1))
            .unwrap();
        assert_eq!(registry.shader(DEFAULT_SHADER), Some(ShaderHandle(1)));
        assert_eq!(registry.shader("unknown"), None);
    }

    #[test]
    fn duplicate_name_rejected_first_kept() {
        let mut registry = ResourceRegistry::new();
        registry.register_shader("basic", ShaderHandle(1)).unwrap();
        let err = registry
            .register_shader("basic", ShaderHandle(2))
            .unwrap_err();
        assert_eq!(err, ResourceError::AlreadyRegistered("basic".into()));
        assert_eq!(registry.shader("basic"), Some(ShaderHandle(1)));
    }

    #[test]
    fn len_counts_shaders() {
        let mut registry = ResourceRegistry::new();
        assert!(registry.is_empty());
        registry.register_shader("x", ShaderHandle(1)).unwrap();
        registry.register_shader("y", ShaderHandle(2)).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }

    #[test]
    fn deterministic_iteration_order() {
        let mut registry = ResourceRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register_shader(name, ShaderHandle(0)).unwrap();
        }
        let names: Vec<&str> = registry.shaders().keys().map(String::as_str).collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);
    }
}
