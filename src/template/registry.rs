//! Component registry for storing and loading component definitions

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{ParseError, ParseWarning};
use crate::parser::{parse_fragment, Fragment};
use crate::tree::Element;

use super::model::Model;

/// File extension of component sources on disk
pub const DEFAULT_EXTENSION: &str = "suim";

/// Errors that can occur during component operations
#[derive(Debug, Error)]
pub enum ComponentError {
    /// Component not found in memory or on disk
    #[error("component not found: {name}")]
    NotFound { name: String },

    /// Duplicate component definition
    #[error("duplicate component definition: {name}")]
    Duplicate { name: String },

    /// Error reading component file
    #[error("error reading component file {path}: {message}")]
    FileReadError { path: PathBuf, message: String },
}

/// Read-only lookup of component sources by tag name.
///
/// The expander queries this once per distinct tag name during a single
/// expansion call.
pub trait ComponentSource {
    /// Markup source of the component, or `None` if there is no such component
    fn load(&self, name: &str) -> Option<String>;
}

impl ComponentSource for HashMap<String, String> {
    fn load(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// A source that knows no components
#[derive(Debug, Default, Clone, Copy)]
pub struct NoComponents;

impl ComponentSource for NoComponents {
    fn load(&self, _name: &str) -> Option<String> {
        None
    }
}

/// A parsed component definition
#[derive(Debug, Clone)]
pub struct ComponentDefinition {
    /// Tag name the component is instantiated with
    pub name: String,
    /// Defaults from the leading `<model>` block
    pub defaults: Model,
    /// Nodes that replace an instance
    pub body: Vec<Element>,
    pub errors: Vec<ParseError>,
    pub warnings: Vec<ParseWarning>,
}

impl ComponentDefinition {
    /// Parse component markup; a leading `<model>` element supplies defaults
    pub fn parse(name: &str, source: &str) -> Self {
        let Fragment {
            mut nodes,
            errors,
            warnings,
        } = parse_fragment(source);

        let has_model = nodes
            .first()
            .map_or(false, |first| first.tag.eq_ignore_ascii_case("model"));
        let defaults = if has_model {
            let block = nodes.remove(0);
            Model::from_block(&block.text_content())
        } else {
            Model::new()
        };

        Self {
            name: name.to_string(),
            defaults,
            body: nodes,
            errors,
            warnings,
        }
    }
}

/// Registry for component sources, in memory and in a directory
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    components: HashMap<String, String>,
    /// Directory searched for `<name>.<extension>` files
    base_path: Option<PathBuf>,
    extension: String,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self {
            components: HashMap::new(),
            base_path: None,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl ComponentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new registry that also loads components from a directory
    pub fn with_base_path(base_path: PathBuf) -> Self {
        Self {
            base_path: Some(base_path),
            ..Self::default()
        }
    }

    /// Change the file extension used for directory lookups
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Register component markup under a tag name
    pub fn register(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), ComponentError> {
        let name = name.into();
        if self.components.contains_key(&name) {
            return Err(ComponentError::Duplicate { name });
        }
        self.components.insert(name, source.into());
        Ok(())
    }

    /// Get in-memory component markup
    pub fn get(&self, name: &str) -> Option<&str> {
        self.components.get(name).map(|s| s.as_str())
    }

    /// Check if a component is registered in memory
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Number of in-memory components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Path a component would be loaded from, if a base path is set
    pub fn resolve_path(&self, name: &str) -> Option<PathBuf> {
        let base = self.base_path.as_ref()?;
        Some(base.join(format!("{}.{}", name, self.extension)))
    }

    /// Load component markup from the base directory
    pub fn load_file(&self, name: &str) -> Result<String, ComponentError> {
        let not_found = || ComponentError::NotFound {
            name: name.to_string(),
        };
        if name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(not_found());
        }
        let path = self.resolve_path(name).ok_or_else(not_found)?;
        if !path.is_file() {
            return Err(not_found());
        }
        std::fs::read_to_string(&path).map_err(|e| ComponentError::FileReadError {
            path,
            message: e.to_string(),
        })
    }
}

impl ComponentSource for ComponentRegistry {
    fn load(&self, name: &str) -> Option<String> {
        if let Some(source) = self.get(name) {
            return Some(source.to_string());
        }
        match self.load_file(name) {
            Ok(source) => {
                debug!(component = name, "loaded component from disk");
                Some(source)
            }
            Err(ComponentError::NotFound { .. }) => None,
            Err(err) => {
                warn!("{}", err);
                None
            }
        }
    }
}
