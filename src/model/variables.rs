//! Variable tree for the selected frame
//!
//! Roots are the frame's locals (declaration order, temporaries skipped)
//! followed by its upvalues. Compound values expand lazily: every expansion
//! enumerates the host object again, and collapsing drops the children.
//!
//! Nodes are addressed by [`NodePath`], the child indices from the root list
//! down to the node.

use super::value::{conversion_placeholder, Value};
use crate::host::{Binding, Introspect};
use crate::shim::catch_panic;
use rustc_hash::FxHashSet;
use tracing::debug;

/// Child indices from the root list down to a node
pub type NodePath = Vec<usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Local,
    Upvalue,
    /// Entry of an expanded compound
    Field,
    /// Stand-in for entries that could not be enumerated
    Placeholder,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub kind: VarKind,
    /// Key in the parent compound, for fields
    pub key: Option<Value>,
    pub value: Value,
    expanded: bool,
    children: Option<Vec<Variable>>,
    cyclic: bool,
}

impl Variable {
    fn root(binding: Binding, kind: VarKind) -> Self {
        Variable {
            name: binding.name,
            kind,
            key: None,
            value: binding.value,
            expanded: false,
            children: None,
            cyclic: false,
        }
    }

    fn field(key: Value, value: Value) -> Self {
        Variable {
            name: key.key_label(),
            kind: VarKind::Field,
            key: Some(key),
            value,
            expanded: false,
            children: None,
            cyclic: false,
        }
    }

    fn placeholder(message: String) -> Self {
        Variable {
            name: message,
            kind: VarKind::Placeholder,
            key: None,
            value: Value::Nil,
            expanded: false,
            children: None,
            cyclic: false,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Set when expansion was refused because the value is its own ancestor
    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    pub fn is_expandable(&self) -> bool {
        self.kind != VarKind::Placeholder && self.value.is_expandable()
    }

    pub fn children(&self) -> Option<&[Variable]> {
        self.children.as_deref()
    }

    /// Text shown after the name; empty for placeholders
    pub fn value_text(&self) -> String {
        match self.kind {
            VarKind::Placeholder => String::new(),
            _ => self.value.display_text(),
        }
    }

    fn toggle(&mut self, ancestors: &FxHashSet<usize>) -> bool {
        if self.expanded {
            self.expanded = false;
            self.children = None;
            return true;
        }
        if !self.is_expandable() {
            return false;
        }
        if let Some(identity) = self.value.identity() {
            if ancestors.contains(&identity) {
                self.cyclic = true;
                return false;
            }
        }

        self.children = Some(enumerate_children(&self.value));
        self.expanded = true;
        true
    }
}

/// Enumerate and sort the entries of a compound value
///
/// Never fails: enumeration errors and panics become a single placeholder.
fn enumerate_children(value: &Value) -> Vec<Variable> {
    let Some(object) = value.object() else {
        return Vec::new();
    };

    let listed = catch_panic(|| {
        object.entries().map(|entries| {
            let mut keyed: Vec<_> = entries
                .into_iter()
                .map(|(key, value)| (key.sort_key(), key, value))
                .collect();
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            keyed
                .into_iter()
                .map(|(_, key, value)| Variable::field(key, value))
                .collect::<Vec<_>>()
        })
    });

    match listed {
        Ok(Ok(children)) => children,
        Ok(Err(fault)) => vec![Variable::placeholder(entries_placeholder(fault.message()))],
        Err(message) => vec![Variable::placeholder(entries_placeholder(&message))],
    }
}

fn entries_placeholder(message: &str) -> String {
    conversion_placeholder(message).replacen("tostring", "entries", 1)
}

/// Temporaries the runtime keeps in a frame, e.g. `(for state)`
pub fn is_temporary(name: &str) -> bool {
    name.starts_with('(')
}

/// A visible row of the flattened tree
#[derive(Debug)]
pub struct TreeRow<'a> {
    pub depth: usize,
    pub path: NodePath,
    pub variable: &'a Variable,
}

/// Variables of one frame
#[derive(Debug, Clone, Default)]
pub struct VariableTree {
    roots: Vec<Variable>,
}

impl VariableTree {
    pub fn empty() -> Self {
        VariableTree::default()
    }

    /// Locals then upvalues of the frame at `depth`
    pub fn for_frame(context: &dyn Introspect, depth: usize) -> Self {
        let locals = context
            .locals(depth)
            .into_iter()
            .filter(|binding| !is_temporary(&binding.name))
            .map(|binding| Variable::root(binding, VarKind::Local));
        let upvalues = context
            .upvalues(depth)
            .into_iter()
            .map(|binding| Variable::root(binding, VarKind::Upvalue));

        VariableTree {
            roots: locals.chain(upvalues).collect(),
        }
    }

    pub fn roots(&self) -> &[Variable] {
        &self.roots
    }

    pub fn get(&self, path: &[usize]) -> Option<&Variable> {
        let (&first, rest) = path.split_first()?;
        let mut node = self.roots.get(first)?;
        for &index in rest {
            node = node.children.as_ref()?.get(index)?;
        }
        Some(node)
    }

    /// Expand or collapse the node at `path`; returns whether the tree changed
    pub fn toggle(&mut self, path: &[usize]) -> bool {
        let Some((&first, rest)) = path.split_first() else {
            return false;
        };
        let mut ancestors = FxHashSet::default();
        let Some(mut node) = self.roots.get_mut(first) else {
            return false;
        };
        for &index in rest {
            if let Some(identity) = node.value.identity() {
                ancestors.insert(identity);
            }
            match node.children.as_mut().and_then(|c| c.get_mut(index)) {
                Some(child) => node = child,
                None => return false,
            }
        }

        let changed = node.toggle(&ancestors);
        debug!(
            path = ?path,
            expanded = node.expanded,
            cyclic = node.cyclic,
            "variable toggled"
        );
        changed
    }

    /// Visible rows, depth-first
    pub fn rows(&self) -> Vec<TreeRow<'_>> {
        let mut rows = Vec::new();
        let mut path = Vec::new();
        collect_rows(&self.roots, 0, &mut path, &mut rows);
        rows
    }

    pub fn row_count(&self) -> usize {
        fn count(vars: &[Variable]) -> usize {
            vars.iter()
                .map(|v| 1 + v.children.as_deref().map_or(0, count))
                .sum()
        }
        count(&self.roots)
    }
}

fn collect_rows<'a>(
    vars: &'a [Variable],
    depth: usize,
    path: &mut NodePath,
    rows: &mut Vec<TreeRow<'a>>,
) {
    for (index, variable) in vars.iter().enumerate() {
        path.push(index);
        rows.push(TreeRow {
            depth,
            path: path.clone(),
            variable,
        });
        if let Some(children) = &variable.children {
            collect_rows(children, depth + 1, path, rows);
        }
        path.pop();
    }
}
