//! Tool registry: scenario name to generator tool constructor.
//!
//! Built once at startup by an explicit initialization routine and read-only
//! afterwards; lookups construct a fresh tool instance every time.

use crate::error::RegistryError;
use crate::tool::GeneratorTool;
use crate::tools::{ProductReviewTool, QaPairTool, SupportDialogueTool};
use std::collections::BTreeMap;

/// Builds a new, unvalidated tool instance
pub type ToolConstructor = fn() -> Box<dyn GeneratorTool>;

/// Registry of generator tools keyed by scenario name
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolConstructor>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in tools
    pub fn with_builtin_tools() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        register_builtin_tools(&mut registry)?;
        Ok(registry)
    }

    /// Register a tool constructor under `name`
    ///
    /// Fails on an empty name or a name that is already taken; the existing entry is
    /// left untouched in the duplicate case.
    pub fn register(
        &mut self,
        name: &str,
        constructor: ToolConstructor,
    ) -> Result<(), RegistryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::MissingIdentifier);
        }
        if self.tools.contains_key(name) {
            return Err(RegistryError::DuplicateRegistration(name.to_string()));
        }
        self.tools.insert(name.to_string(), constructor);
        tracing::debug!(tool = name, "Registered generator tool");
        Ok(())
    }

    /// Construct a new instance of the named tool
    ///
    /// Names are matched after trimming, the same way `register` stores them.
    pub fn from_name(&self, name: &str) -> Result<Box<dyn GeneratorTool>, RegistryError> {
        self.tools
            .get(name.trim())
            .map(|constructor| constructor())
            .ok_or_else(|| RegistryError::UnknownTool(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name.trim())
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Register every built-in tool under its scenario name
pub fn register_builtin_tools(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(ProductReviewTool::NAME, || Box::new(ProductReviewTool::new()))?;
    registry.register(SupportDialogueTool::NAME, || {
        Box::new(SupportDialogueTool::new())
    })?;
    registry.register(QaPairTool::NAME, || Box::new(QaPairTool::new()))?;
    Ok(())
}
