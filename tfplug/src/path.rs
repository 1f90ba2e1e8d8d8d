//! Path expressions
//!
//! A [`PathExpression`] describes zero or more attributes in a value tree. It is
//! either rooted (starts at the top of the tree) or relative, in which case it is
//! merged onto the expression of the attribute being validated. Parent steps are
//! folded away before the expression is matched against a [`DynamicValue`].

use crate::error::{Result, TfplugError};
use crate::types::{AttributePath, AttributePathStep, Dynamic, DynamicValue};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathExpressionStep {
    AttributeName(String),
    ElementKeyString(String),
    ElementKeyInt(i64),
    /// Every element of a list or map
    AnyElement,
    Parent,
}

impl fmt::Display for PathExpressionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathExpressionStep::AttributeName(name) => write!(f, "{}", name),
            PathExpressionStep::ElementKeyString(key) => write!(f, "[{:?}]", key),
            PathExpressionStep::ElementKeyInt(idx) => write!(f, "[{}]", idx),
            PathExpressionStep::AnyElement => write!(f, "[*]"),
            PathExpressionStep::Parent => write!(f, "<"),
        }
    }
}

impl From<&AttributePathStep> for PathExpressionStep {
    fn from(step: &AttributePathStep) -> Self {
        match step {
            AttributePathStep::AttributeName(name) => PathExpressionStep::AttributeName(name.clone()),
            AttributePathStep::ElementKeyString(key) => {
                PathExpressionStep::ElementKeyString(key.clone())
            }
            AttributePathStep::ElementKeyInt(idx) => PathExpressionStep::ElementKeyInt(*idx),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathExpression {
    root: bool,
    steps: Vec<PathExpressionStep>,
}

impl PathExpression {
    /// Rooted expression starting at a top-level attribute
    pub fn root(name: &str) -> Self {
        Self {
            root: true,
            steps: vec![PathExpressionStep::AttributeName(name.to_string())],
        }
    }

    /// Empty relative expression; meaningful once merged
    pub fn relative() -> Self {
        Self {
            root: false,
            steps: Vec::new(),
        }
    }

    /// Rooted expression matching exactly `path`
    pub fn from_path(path: &AttributePath) -> Self {
        Self {
            root: true,
            steps: path.steps.iter().map(PathExpressionStep::from).collect(),
        }
    }

    pub fn at_name(mut self, name: &str) -> Self {
        self.steps
            .push(PathExpressionStep::AttributeName(name.to_string()));
        self
    }

    pub fn at_map_key(mut self, key: &str) -> Self {
        self.steps
            .push(PathExpressionStep::ElementKeyString(key.to_string()));
        self
    }

    pub fn at_list_index(mut self, idx: i64) -> Self {
        self.steps.push(PathExpressionStep::ElementKeyInt(idx));
        self
    }

    pub fn at_any_element(mut self) -> Self {
        self.steps.push(PathExpressionStep::AnyElement);
        self
    }

    pub fn at_parent(mut self) -> Self {
        self.steps.push(PathExpressionStep::Parent);
        self
    }

    pub fn is_root(&self) -> bool {
        self.root
    }

    pub fn steps(&self) -> &[PathExpressionStep] {
        &self.steps
    }

    /// Appends a relative expression; a rooted `other` replaces `self`.
    pub fn merge(&self, other: &PathExpression) -> PathExpression {
        if other.root {
            return other.clone();
        }

        let mut merged = self.clone();
        merged.steps.extend(other.steps.iter().cloned());
        merged
    }

    pub fn merge_expressions(&self, others: &[PathExpression]) -> Vec<PathExpression> {
        others.iter().map(|other| self.merge(other)).collect()
    }

    /// Steps with every parent step applied
    pub fn resolved_steps(&self) -> Result<Vec<PathExpressionStep>> {
        let mut resolved: Vec<PathExpressionStep> = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            match step {
                PathExpressionStep::Parent => {
                    if resolved.pop().is_none() {
                        return Err(TfplugError::InvalidPathExpression(format!(
                            "{} steps above the root of the configuration",
                            self
                        )));
                    }
                }
                other => resolved.push(other.clone()),
            }
        }

        Ok(resolved)
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            let dotted = matches!(
                step,
                PathExpressionStep::AttributeName(_) | PathExpressionStep::Parent
            );
            if dotted && i != 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

/// Formats a list of expressions the way diagnostics and descriptions show them
pub fn format_expressions(expressions: &[PathExpression]) -> String {
    let parts: Vec<String> = expressions.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(" "))
}

static NULL: Dynamic = Dynamic::Null;

impl DynamicValue {
    /// Every concrete path in this tree that `expression` matches.
    pub fn path_matches(&self, expression: &PathExpression) -> Result<Vec<AttributePath>> {
        Ok(self
            .resolve(expression)?
            .into_iter()
            .map(|(path, _)| path)
            .collect())
    }

    /// Matches `expression` and returns each path with its value.
    ///
    /// Object attributes that are absent read as null so that an unset sibling
    /// still matches. Map keys and list indexes that do not exist match nothing,
    /// as does a wildcard over a null or unknown collection.
    pub fn resolve(&self, expression: &PathExpression) -> Result<Vec<(AttributePath, Dynamic)>> {
        let steps = expression.resolved_steps()?;
        let mut frontier: Vec<(AttributePath, &Dynamic)> = vec![(AttributePath::root(), &self.value)];

        for step in &steps {
            let mut next = Vec::new();

            for (path, value) in frontier {
                match (step, value) {
                    (PathExpressionStep::AttributeName(name), Dynamic::Map(m)) => {
                        next.push((
                            path.attribute(name),
                            m.get(name).unwrap_or(&NULL),
                        ));
                    }
                    (PathExpressionStep::AttributeName(name), Dynamic::Null | Dynamic::Unknown) => {
                        next.push((path.attribute(name), value));
                    }
                    (PathExpressionStep::ElementKeyString(key), Dynamic::Map(m)) => {
                        if let Some(child) = m.get(key) {
                            next.push((path.key(key), child));
                        }
                    }
                    (PathExpressionStep::ElementKeyInt(idx), Dynamic::List(l)) => {
                        if let Some(child) = usize::try_from(*idx).ok().and_then(|i| l.get(i)) {
                            next.push((path.index(*idx), child));
                        }
                    }
                    (PathExpressionStep::AnyElement, Dynamic::List(l)) => {
                        for (i, child) in l.iter().enumerate() {
                            next.push((path.clone().index(i as i64), child));
                        }
                    }
                    (PathExpressionStep::AnyElement, Dynamic::Map(m)) => {
                        let mut keys: Vec<&String> = m.keys().collect();
                        keys.sort();
                        for key in keys {
                            if let Some(child) = m.get(key) {
                                next.push((path.clone().key(key), child));
                            }
                        }
                    }
                    (
                        PathExpressionStep::ElementKeyString(_)
                        | PathExpressionStep::ElementKeyInt(_)
                        | PathExpressionStep::AnyElement,
                        Dynamic::Null | Dynamic::Unknown,
                    ) => {}
                    (step, other) => {
                        return Err(TfplugError::InvalidPathExpression(format!(
                            "{} cannot step into {} at {}: value is a {}",
                            expression,
                            step,
                            if path.is_root() { "<root>".to_string() } else { path.to_string() },
                            other.type_name()
                        )));
                    }
                }
            }

            frontier = next;
        }

        Ok(frontier
            .into_iter()
            .map(|(path, value)| (path, value.clone()))
            .collect())
    }
}
