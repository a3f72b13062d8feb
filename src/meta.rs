//! Shadow tree recording how each table was declared.
//!
//! The value tree cannot tell a table opened with `[a]` from one created as
//! the parent of `a.b = 1`. TOML treats them differently, so every table the
//! parser builds has a parallel [`MetaMap`] walked in lockstep with it.

#[cfg(test)]
#[path = "./meta_tests.rs"]
mod tests;

use crate::{Array, Table, Value};
use foldhash::HashMap;

/// How a key came into existence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DeclKind {
    /// Through a dotted key or a key-value assignment.
    Dotted,
    /// Through a `[table]` header.
    Explicit,
    /// Through a `[[array]]` header.
    Array,
    /// As a parent segment of a `[[a.b]]` header.
    ArrayDotted,
}

pub(crate) type MetaMap = HashMap<String, MetaNode>;

#[derive(Debug)]
pub(crate) struct MetaNode {
    pub(crate) kind: DeclKind,
    /// Closed: the key was assigned, or its table was declared by a header.
    pub(crate) defined: bool,
    pub(crate) children: MetaMap,
    /// One node per element, for arrays of tables.
    pub(crate) elements: Vec<MetaNode>,
}

impl MetaNode {
    fn new(kind: DeclKind) -> MetaNode {
        MetaNode {
            kind,
            defined: false,
            children: MetaMap::default(),
            elements: Vec::new(),
        }
    }
}

/// Why a declaration was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Conflict {
    /// The path names something that is already defined.
    Redefined,
    /// A dotted key tried to reach into a table closed by a header.
    Closed,
}

/// Walks the parent segments of a key path, creating implicit tables.
fn walk<'t>(
    path: &[String],
    mut table: &'t mut Table,
    mut meta: &'t mut MetaMap,
    kind: DeclKind,
) -> Result<(&'t mut Table, &'t mut MetaMap), Conflict> {
    for key in path {
        match meta.get(key) {
            Some(node) => {
                if node.kind == DeclKind::Dotted && node.defined {
                    return Err(Conflict::Redefined);
                }
                if kind == DeclKind::Dotted
                    && matches!(node.kind, DeclKind::Explicit | DeclKind::Array)
                {
                    return Err(Conflict::Closed);
                }
            }
            None => {
                if table.contains_key(key) {
                    return Err(Conflict::Redefined);
                }
                let implicit = if kind == DeclKind::Array {
                    DeclKind::ArrayDotted
                } else {
                    kind
                };
                meta.insert(key.clone(), MetaNode::new(implicit));
                table.push_unchecked(key.clone(), Value::Table(Table::new()));
            }
        }

        let Some(node) = meta.get_mut(key) else {
            return Err(Conflict::Redefined);
        };
        match (node.kind, table.get_mut(key)) {
            (DeclKind::Array, Some(Value::Array(array))) => {
                let (Some(Value::Table(last)), Some(last_meta)) =
                    (array.last_mut(), node.elements.last_mut())
                else {
                    return Err(Conflict::Redefined);
                };
                table = last;
                meta = &mut last_meta.children;
            }
            (_, Some(Value::Table(child))) => {
                table = child;
                meta = &mut node.children;
            }
            _ => return Err(Conflict::Redefined),
        }
    }
    Ok((table, meta))
}

/// Declares a key assignment (`a.b.c = value`) relative to `table`.
///
/// On success returns the table that should receive the final segment, which
/// is guaranteed absent from it.
pub(crate) fn declare_key<'t>(
    keys: &[String],
    table: &'t mut Table,
    meta: &'t mut MetaMap,
) -> Result<&'t mut Table, Conflict> {
    let Some((name, path)) = keys.split_last() else {
        return Err(Conflict::Redefined);
    };
    let (table, meta) = walk(path, table, meta, DeclKind::Dotted)?;
    if table.contains_key(name) || meta.contains_key(name) {
        return Err(Conflict::Redefined);
    }
    let mut node = MetaNode::new(DeclKind::Dotted);
    node.defined = true;
    meta.insert(name.clone(), node);
    Ok(table)
}

/// Declares a `[table]` header, or a new `[[array]]` element when `array` is
/// set, relative to the document root.
///
/// Returns the table subsequent key-value lines write into along with its
/// shadow map.
pub(crate) fn declare_table<'t>(
    keys: &[String],
    table: &'t mut Table,
    meta: &'t mut MetaMap,
    array: bool,
) -> Result<(&'t mut Table, &'t mut MetaMap), Conflict> {
    let kind = if array {
        DeclKind::Array
    } else {
        DeclKind::Explicit
    };
    let Some((name, path)) = keys.split_last() else {
        return Err(Conflict::Redefined);
    };
    let (table, meta) = walk(path, table, meta, kind)?;

    let exists = table.contains_key(name);
    if !meta.contains_key(name) {
        if exists {
            return Err(Conflict::Redefined);
        }
        meta.insert(name.clone(), MetaNode::new(kind));
    }
    let Some(node) = meta.get_mut(name) else {
        return Err(Conflict::Redefined);
    };
    if node.kind != kind && !(kind == DeclKind::Explicit && node.kind == DeclKind::ArrayDotted) {
        return Err(Conflict::Redefined);
    }

    if array {
        if !node.defined {
            node.defined = true;
            table.push_unchecked(name.clone(), Value::Array(Array::new()));
        }
        let Some(Value::Array(elements)) = table.get_mut(name) else {
            return Err(Conflict::Redefined);
        };
        elements.push(Value::Table(Table::new()));
        let mut element = MetaNode::new(DeclKind::Explicit);
        element.defined = true;
        node.elements.push(element);
        let (Some(Value::Table(last)), Some(last_meta)) =
            (elements.last_mut(), node.elements.last_mut())
        else {
            return Err(Conflict::Redefined);
        };
        return Ok((last, &mut last_meta.children));
    }

    if node.defined {
        return Err(Conflict::Redefined);
    }
    node.defined = true;
    if !exists {
        table.push_unchecked(name.clone(), Value::Table(Table::new()));
    }
    match table.get_mut(name) {
        Some(Value::Table(child)) => Ok((child, &mut node.children)),
        _ => Err(Conflict::Redefined),
    }
}
