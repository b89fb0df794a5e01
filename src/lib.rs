//! UI Markup - a declarative markup engine for user interfaces
//!
//! Markup text runs through four stages, each usable on its own:
//!
//! 1. [`parser::tokenize`] splits text into tags, text runs and `@` directives.
//! 2. [`parser::parse`] builds an [`Element`] tree; directives stay as
//!    unevaluated grouping nodes.
//! 3. [`template::Expander`] resolves `@if` chains, `@foreach` loops and
//!    component instances against a [`Model`].
//! 4. [`layout::LayoutEngine`] assigns a [`LayoutRect`] to every visible node.
//!
//! # Example
//!
//! ```rust
//! use ui_markup::build;
//!
//! let built = build("<vstack><button>OK</button><p>Ready</p></vstack>").unwrap();
//! let button = &built.root.children[0];
//! assert_eq!(button.layout.map(|r| r.height), Some(40.0));
//! ```

pub mod error;
pub mod layout;
pub mod outline;
pub mod parser;
pub mod template;
pub mod tree;

pub use error::{ParseError, ParseWarning, Span};
pub use layout::{hit_test, paint_order, LayoutEngine, LayoutRect, Sizing, ThemeMetrics};
pub use outline::outline;
pub use parser::{parse, tokenize, ParseResult};
pub use template::{ComponentRegistry, ComponentSource, Expander, ExpansionReport, Model, Value};
pub use tree::{Element, ElementKind};

use thiserror::Error;
use tracing::debug;

/// Errors that stop the build pipeline
#[derive(Debug, Error)]
pub enum BuildError {
    /// Parsing failed fatally, or produced errors in strict mode
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// The document contains no nodes
    #[error("document is empty")]
    Empty,
}

impl From<Vec<ParseError>> for BuildError {
    fn from(errors: Vec<ParseError>) -> Self {
        BuildError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration for the complete build pipeline
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Theme constants used by sizing resolution
    pub theme: ThemeMetrics,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Where component definitions are looked up
    pub components: ComponentRegistry,
    /// Data the templates are expanded against
    pub model: Model,
    /// Treat non-fatal parse errors as failures
    pub strict: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            theme: ThemeMetrics::default(),
            viewport_width: 800.0,
            viewport_height: 600.0,
            components: ComponentRegistry::default(),
            model: Model::default(),
            strict: false,
        }
    }
}

impl BuildConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(mut self, theme: ThemeMetrics) -> Self {
        self.theme = theme;
        self
    }

    /// Set the viewport the root is laid out in
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    pub fn with_components(mut self, components: ComponentRegistry) -> Self {
        self.components = components;
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Fail on any parse error instead of only on fatal ones
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// A parsed, expanded and laid-out document
#[derive(Debug, Clone)]
pub struct Built {
    pub root: Element,
    /// Non-fatal parse errors (always empty in strict mode)
    pub parse_errors: Vec<ParseError>,
    pub parse_warnings: Vec<ParseWarning>,
    pub expansion: ExpansionReport,
}

impl Built {
    /// Parse errors, parse warnings and expansion warnings as display lines
    pub fn diagnostics(&self) -> Vec<String> {
        self.parse_errors
            .iter()
            .map(|e| e.to_string())
            .chain(self.parse_warnings.iter().map(|w| w.to_string()))
            .chain(self.expansion.warnings.iter().cloned())
            .collect()
    }
}

/// Build markup with default configuration
pub fn build(source: &str) -> Result<Built, BuildError> {
    build_with_config(source, &BuildConfig::default())
}

/// Build markup with custom configuration
///
/// # Example
///
/// ```rust
/// use ui_markup::{build_with_config, BuildConfig, Model};
///
/// let config = BuildConfig::new()
///     .with_viewport(320.0, 240.0)
///     .with_model(Model::new().with("user", "Ada"));
///
/// let built = build_with_config("<label>Hello {user}</label>", &config).unwrap();
/// assert_eq!(built.root.text_content(), "Hello Ada");
/// assert_eq!(built.root.layout.map(|r| r.width), Some(320.0));
/// ```
pub fn build_with_config(source: &str, config: &BuildConfig) -> Result<Built, BuildError> {
    let parsed = parse(source);
    let fatal = parsed.errors.iter().any(ParseError::is_fatal);
    if fatal || (config.strict && !parsed.success) {
        return Err(parsed.errors.into());
    }
    let mut root = parsed.root.ok_or(BuildError::Empty)?;

    let expansion = Expander::new(&config.components).expand(&mut root, &config.model);

    LayoutEngine::new(config.theme.clone()).layout(
        &mut root,
        config.viewport_width,
        config.viewport_height,
    );
    debug!(nodes = root.node_count(), "built document");

    Ok(Built {
        root,
        parse_errors: parsed.errors,
        parse_warnings: parsed.warnings,
        expansion,
    })
}
