//! Row extraction from export objects
//!
//! A column value is looked up through an ordered list of [`FieldSource`]s.
//! The first source whose object *contains the key* supplies the value, even
//! when that value is JSON `null`. When no source has the key, the outcome of
//! the last source decides: a reachable object that lacks the key yields
//! `null`, while a missing or non-object fallback makes the row unresolvable.

use serde_json::Value;

use crate::campaign::JsonObject;
use crate::schema::TableSchema;

/// Where to look for a column's value on an export object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// A key directly on the object
    TopLevel,
    /// A key inside the named sub-object
    Nested(&'static str),
}

/// Outcome of looking up one key through one source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a Value),
    /// The source object exists but has no such key
    Absent,
    /// The nested object is missing or is not an object
    Unreachable,
}

impl FieldSource {
    pub fn lookup<'a>(&self, element: &'a JsonObject, key: &str) -> Lookup<'a> {
        let object = match self {
            FieldSource::TopLevel => Some(element),
            FieldSource::Nested(parent) => element.get(*parent).and_then(Value::as_object),
        };
        match object {
            Some(object) => object.get(key).map_or(Lookup::Absent, Lookup::Found),
            None => Lookup::Unreachable,
        }
    }
}

/// Page fields live on the element or under its `page` object, in that priority
pub const PAGE_SOURCES: &[FieldSource] = &[FieldSource::TopLevel, FieldSource::Nested("page")];

/// A column no source could be consulted for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unresolved(pub &'static str);

/// First value any source yields for `key`, else the last source's outcome
pub fn resolve_field<'a>(element: &'a JsonObject, key: &str, sources: &[FieldSource]) -> Lookup<'a> {
    let mut last = Lookup::Absent;
    for source in sources {
        match source.lookup(element, key) {
            found @ Lookup::Found(_) => return found,
            other => last = other,
        }
    }
    last
}

/// One value per schema column, in schema order
pub fn resolve_row(
    schema: &TableSchema,
    element: &JsonObject,
    sources: &[FieldSource],
) -> std::result::Result<Vec<Value>, Unresolved> {
    schema
        .columns
        .iter()
        .map(|column| match resolve_field(element, column.name, sources) {
            Lookup::Found(value) => Ok(value.clone()),
            Lookup::Absent => Ok(Value::Null),
            Lookup::Unreachable => Err(Unresolved(column.name)),
        })
        .collect()
}

/// Keep only the declared columns of a flat object; anything else is dropped
pub fn select_row(schema: &TableSchema, element: &JsonObject) -> Vec<Value> {
    schema
        .columns
        .iter()
        .map(|column| element.get(column.name).cloned().unwrap_or(Value::Null))
        .collect()
}
