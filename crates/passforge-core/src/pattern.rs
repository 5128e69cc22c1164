//! Typed structural pattern matching, the engine behind the `Match` combinator.
//!
//! This is the *structural* matcher only: a [`Pattern`] is built directly as
//! a value. Parsing a call-expression surface syntax (`Kind(field=...)`) into
//! a `Pattern` is an out-of-scope, external collaborator.

use indexmap::IndexMap;

use crate::node::Node;
use crate::walk::field_key;

/// What a single field of a [`Pattern`] requires of the corresponding child.
#[derive(Debug, Clone)]
pub enum FieldPattern {
    /// `field=...` — matches anything, binds nothing.
    Wildcard,
    /// `field=name` — matches anything, binds the child to `name`.
    Bind(String),
    /// `field=subpattern` — recurses structurally.
    Sub(Box<Pattern>),
}

/// A structural pattern: one or more acceptable kinds, an optional whole-node
/// binding, and field subpatterns.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// The kinds this pattern accepts. A single entry is the plain `Kind(...)`
    /// form; more than one is the `Union[K1, K2](...)` form.
    pub kinds: Vec<&'static str>,
    /// `Kind(name)` — bind the whole matched node to `name`.
    pub bind: Option<String>,
    pub fields: Vec<(String, FieldPattern)>,
}

impl Pattern {
    pub fn kind(kind: &'static str) -> Self {
        Self {
            kinds: vec![kind],
            bind: None,
            fields: Vec::new(),
        }
    }

    pub fn union(kinds: Vec<&'static str>) -> Self {
        Self {
            kinds,
            bind: None,
            fields: Vec::new(),
        }
    }

    pub fn bind(mut self, name: impl Into<String>) -> Self {
        self.bind = Some(name.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, pattern: FieldPattern) -> Self {
        self.fields.push((name.into(), pattern));
        self
    }

    /// True for the bare `Kind(name)` whole-node-bind form with no field
    /// subpatterns — substitution for this form replaces the whole node
    /// rather than splicing into individual fields.
    pub fn is_whole_bind(&self) -> bool {
        self.bind.is_some() && self.fields.is_empty()
    }

    /// Every name a [`FieldPattern::Bind`] introduces, anywhere in this
    /// pattern's field tree (recursing through `Sub`). Excludes a whole-node
    /// `bind`, at this level or any nested one: [`substitute`] only ever
    /// splices field-bound values back in, so only these names are worth
    /// running a `Match` combinator's wrapped pass over.
    pub fn field_bind_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_field_bind_names(&mut names);
        names
    }

    fn collect_field_bind_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        for (_, field_pattern) in &self.fields {
            match field_pattern {
                FieldPattern::Wildcard => {}
                FieldPattern::Bind(name) => names.push(name),
                FieldPattern::Sub(sub) => sub.collect_field_bind_names(names),
            }
        }
    }
}

/// The outcome of matching a [`Pattern`] against a [`Node`].
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    pub matched: bool,
    pub variables: IndexMap<String, Node>,
}

impl MatchResult {
    pub fn fail() -> Self {
        Self::default()
    }

    pub fn ok(variables: IndexMap<String, Node>) -> Self {
        Self {
            matched: true,
            variables,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.variables.get(name)
    }
}

/// Evaluate `pattern` against `node`, yielding bound variables on success.
pub fn match_node(pattern: &Pattern, node: &Node) -> MatchResult {
    let chain = node.kind_chain();
    if !pattern.kinds.iter().any(|k| chain.contains(k)) {
        return MatchResult::fail();
    }

    let mut variables = IndexMap::new();
    if let Some(name) = &pattern.bind {
        variables.insert(name.clone(), node.clone());
    }

    if pattern.fields.is_empty() {
        return MatchResult::ok(variables);
    }

    let children: IndexMap<String, Node> = node
        .children()
        .into_iter()
        .map(|(f, n)| (field_key(&f), n))
        .collect();

    for (field, subpattern) in &pattern.fields {
        let Some(child) = children.get(field) else {
            return MatchResult::fail();
        };
        match subpattern {
            FieldPattern::Wildcard => {}
            FieldPattern::Bind(name) => {
                variables.insert(name.clone(), child.clone());
            }
            FieldPattern::Sub(sub) => {
                let sub_result = match_node(sub, child);
                if !sub_result.matched {
                    return MatchResult::fail();
                }
                variables.extend(sub_result.variables);
            }
        }
    }

    MatchResult::ok(variables)
}

/// Rebuild `node` with every bound-name field position replaced by its entry
/// in `transformed`, recursing through nested field subpatterns. Fields not
/// named by the pattern are preserved unchanged.
pub fn substitute(
    pattern: &Pattern,
    node: &Node,
    transformed: &IndexMap<String, Node>,
) -> crate::error::Result<Node> {
    let mut children = node.children();
    for (field, subpattern) in &pattern.fields {
        for (f, child) in children.iter_mut() {
            if field_key(f) != *field {
                continue;
            }
            match subpattern {
                FieldPattern::Wildcard => {}
                FieldPattern::Bind(name) => {
                    if let Some(new_value) = transformed.get(name) {
                        *child = new_value.clone();
                    }
                }
                FieldPattern::Sub(sub) => {
                    *child = substitute(sub, child, transformed)?;
                }
            }
            break;
        }
    }
    node.rebuild(children)
}
