//! Template expansion - resolves directives and component instances
//!
//! Expansion rewrites a tree by ownership: every sibling list is consumed
//! and rebuilt, so a node removed by conditional resolution is never seen
//! again. Recoverable problems are collected as warnings.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::debug;

use crate::tree::{Directive, Element, ElementKind};

use super::condition::Condition;
use super::model::{Model, Value};
use super::registry::{ComponentDefinition, ComponentSource};

/// Component nesting beyond this depth is left unexpanded
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Diagnostics from one expansion call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpansionReport {
    pub warnings: Vec<String>,
    /// Component instances replaced by their bodies
    pub components_expanded: usize,
}

/// State for one expansion call
#[derive(Default)]
struct ExpansionContext {
    /// Components currently being expanded (cycle detection)
    resolving: HashSet<String>,
    /// Parsed definitions by tag name; `None` caches a miss
    definitions: HashMap<String, Option<Rc<ComponentDefinition>>>,
    report: ExpansionReport,
}

impl ExpansionContext {
    fn warn(&mut self, message: String) {
        debug!(%message, "expansion warning");
        self.report.warnings.push(message);
    }
}

/// How a node takes part in expansion
#[derive(Debug, Clone, Copy, PartialEq)]
enum Role {
    Chain,
    Branch,
    Loop,
    Instance,
    Primitive,
}

fn role(element: &Element) -> Role {
    match &element.kind {
        ElementKind::Directive(Directive::If { .. }) => Role::Chain,
        ElementKind::Directive(Directive::ElseIf { .. } | Directive::Else) => Role::Branch,
        ElementKind::Directive(Directive::Foreach { .. }) => Role::Loop,
        ElementKind::Custom => Role::Instance,
        _ => Role::Primitive,
    }
}

/// Resolves conditional chains, loops and component instances against a model
pub struct Expander<'s> {
    components: &'s dyn ComponentSource,
    max_depth: usize,
}

impl<'s> Expander<'s> {
    pub fn new(components: &'s dyn ComponentSource) -> Self {
        Self {
            components,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the component nesting limit
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Expand a tree in place.
    ///
    /// If the root itself expands to several nodes they are wrapped in a
    /// `div`; if it expands to nothing the root becomes an empty `div`.
    pub fn expand(&self, root: &mut Element, model: &Model) -> ExpansionReport {
        let mut cx = ExpansionContext::default();
        let original = std::mem::replace(root, Element::new("div"));
        let span = original.span.clone();
        let mut nodes = self.expand_nodes(vec![original], model, &mut cx);

        if nodes.len() == 1 {
            if let Some(only) = nodes.pop() {
                *root = only;
            }
        } else {
            if nodes.len() > 1 {
                cx.warn(format!(
                    "root expanded to {} nodes; wrapped in <div>",
                    nodes.len()
                ));
            }
            root.span = span;
            root.children = nodes;
        }

        debug!(
            warnings = cx.report.warnings.len(),
            components = cx.report.components_expanded,
            "expanded tree"
        );
        cx.report
    }

    /// Expand a list of siblings into a new list
    fn expand_nodes(
        &self,
        nodes: Vec<Element>,
        model: &Model,
        cx: &mut ExpansionContext,
    ) -> Vec<Element> {
        let mut out = Vec::with_capacity(nodes.len());
        let mut siblings = nodes.into_iter().peekable();

        while let Some(node) = siblings.next() {
            match role(&node) {
                Role::Chain => {
                    let mut chain = vec![node];
                    while let Some(branch) = siblings.next_if(|n| role(n) == Role::Branch) {
                        let is_else = matches!(branch.kind, ElementKind::Directive(Directive::Else));
                        chain.push(branch);
                        if is_else {
                            break;
                        }
                    }
                    if let Some(winner) = self.select_branch(chain, model, cx) {
                        out.extend(self.expand_nodes(winner.children, model, cx));
                    }
                }
                Role::Branch => {
                    cx.warn(format!("{} without a preceding @if was dropped", node.tag));
                }
                Role::Loop => out.extend(self.expand_loop(node, model, cx)),
                Role::Instance => out.extend(self.expand_instance(node, model, cx)),
                Role::Primitive => out.push(self.expand_primitive(node, model, cx)),
            }
        }
        out
    }

    /// First branch whose condition holds, or the unconditional else
    fn select_branch(
        &self,
        chain: Vec<Element>,
        model: &Model,
        cx: &mut ExpansionContext,
    ) -> Option<Element> {
        for branch in chain {
            let wins = match &branch.kind {
                ElementKind::Directive(
                    Directive::If { condition } | Directive::ElseIf { condition },
                ) => match Condition::parse(condition) {
                    Ok(parsed) => parsed.evaluate(model),
                    Err(err) => {
                        cx.warn(err.to_string());
                        false
                    }
                },
                ElementKind::Directive(Directive::Else) => true,
                _ => false,
            };
            if wins {
                return Some(branch);
            }
        }
        None
    }

    fn expand_loop(&self, node: Element, model: &Model, cx: &mut ExpansionContext) -> Vec<Element> {
        let ElementKind::Directive(Directive::Foreach { source, variable }) = &node.kind else {
            return Vec::new();
        };

        let items = match model.get(source) {
            Some(Value::List(items)) => items,
            Some(Value::Null) | None => {
                cx.warn(format!("@foreach source '{}' is not in the model", source));
                return Vec::new();
            }
            Some(_) => {
                cx.warn(format!("@foreach source '{}' is not a list", source));
                return Vec::new();
            }
        };

        let mut out = Vec::new();
        for item in items {
            let scope = model.clone().with(variable.clone(), item.clone());
            out.extend(self.expand_nodes(node.children.clone(), &scope, cx));
        }
        out
    }

    fn expand_primitive(
        &self,
        mut node: Element,
        model: &Model,
        cx: &mut ExpansionContext,
    ) -> Element {
        interpolate(&mut node, model, cx);
        let children = std::mem::take(&mut node.children);
        node.children = self.expand_nodes(children, model, cx);
        node
    }

    fn expand_instance(
        &self,
        mut node: Element,
        model: &Model,
        cx: &mut ExpansionContext,
    ) -> Vec<Element> {
        interpolate(&mut node, model, cx);
        let name = node.tag.clone();

        if cx.resolving.contains(&name) {
            cx.warn(format!("recursive use of component <{}> left unexpanded", name));
            return vec![self.expand_primitive(node, model, cx)];
        }
        if cx.resolving.len() >= self.max_depth {
            cx.warn(format!(
                "component <{}> nested deeper than {} levels left unexpanded",
                name, self.max_depth
            ));
            return vec![self.expand_primitive(node, model, cx)];
        }

        let Some(definition) = self.definition(&name, cx) else {
            // Unknown tag: keep it, but still resolve what is inside it
            return vec![self.expand_primitive(node, model, cx)];
        };

        let mut instance = Model::new();
        for (key, value) in &node.attributes {
            instance.insert(key.clone(), value.clone());
        }
        let scope = definition.defaults.overlay(&instance);

        cx.resolving.insert(name.clone());
        let body = self.expand_nodes(definition.body.clone(), &scope, cx);
        cx.resolving.remove(&name);

        cx.report.components_expanded += 1;
        body
    }

    fn definition(
        &self,
        name: &str,
        cx: &mut ExpansionContext,
    ) -> Option<Rc<ComponentDefinition>> {
        if let Some(cached) = cx.definitions.get(name) {
            return cached.clone();
        }

        let definition = self.components.load(name).map(|source| {
            let definition = ComponentDefinition::parse(name, &source);
            for err in &definition.errors {
                cx.warn(format!("component <{}>: {}", name, err));
            }
            for warning in &definition.warnings {
                cx.warn(format!("component <{}>: {}", name, warning));
            }
            Rc::new(definition)
        });
        if definition.is_none() {
            debug!(component = name, "no component definition");
        }
        cx.definitions.insert(name.to_string(), definition.clone());
        definition
    }
}

/// Substitute `{key}` placeholders in text content and attribute values
fn interpolate(node: &mut Element, model: &Model, cx: &mut ExpansionContext) {
    if let ElementKind::Text { content } = &mut node.kind {
        *content = model.interpolate(content);
    }

    let changed: Vec<(String, String)> = node
        .attributes
        .iter()
        .filter_map(|(key, value)| {
            let replaced = model.interpolate(value);
            (replaced != *value).then(|| (key.clone(), replaced))
        })
        .collect();
    for (key, value) in changed {
        if let Err(err) = node.set_attribute(&key, &value) {
            cx.warn(err.to_string());
        }
    }
}
