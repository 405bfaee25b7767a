//! Struct field tables.
//!
//! `#[derive(Decodable)]` implements [`StructFields`] by binding every field
//! to the key its [`FieldDescriptor`] resolves to in the active tag
//! namespace. Embedded fields bind their own fields into the same table, so
//! their keys are promoted to the enclosing struct.

use std::collections::HashMap;

use copier_value::Map;
use tracing::trace;

use crate::context::Context;
use crate::decodable::Decodable;
use crate::error::Result;

/// Tag value that removes a field from a namespace.
pub const SKIP_TAG: &str = "-";

/// Static description of a named struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// The Rust field name.
    pub name: &'static str,
    /// Whether the field is `pub`; only exported fields fall back to their
    /// name when untagged.
    pub exported: bool,
    /// `(namespace, key)` pairs from `#[tag(...)]`.
    pub tags: &'static [(&'static str, &'static str)],
}

impl FieldDescriptor {
    /// The source key this field answers to under `namespace`, or `None`
    /// when the field cannot be targeted.
    pub fn key(&self, namespace: &str) -> Option<&'static str> {
        let tag = self
            .tags
            .iter()
            .find(|(ns, _)| *ns == namespace)
            .map(|&(_, key)| key);

        match tag {
            Some(SKIP_TAG) => None,
            Some(key) if !key.is_empty() => Some(key),
            _ => self.exported.then_some(self.name),
        }
    }
}

/// A bound destination field.
pub enum Slot<'a> {
    /// A `pub` field, decoded in place.
    Open(&'a mut dyn Decodable),
    /// A tagged field that is not `pub`. Any non-null source for it fails
    /// with [`Error::NotSettable`](crate::Error::NotSettable).
    Sealed(&'static str),
}

impl<'a> Slot<'a> {
    pub fn new(field: &FieldDescriptor, slot: &'a mut dyn Decodable) -> Self {
        if field.exported {
            Slot::Open(slot)
        } else {
            Slot::Sealed(field.name)
        }
    }
}

/// Source key to destination field, for one struct decode.
///
/// Binding a key that is already present replaces the earlier field, so the
/// last declaration wins.
#[derive(Default)]
pub struct FieldTable<'a> {
    entries: HashMap<&'static str, Slot<'a>>,
}

impl<'a> FieldTable<'a> {
    pub fn new() -> Self {
        FieldTable::default()
    }

    /// Binds `slot` under the key `field` resolves to in `namespace`.
    pub fn bind(&mut self, field: &FieldDescriptor, namespace: &str, slot: &'a mut dyn Decodable) {
        let Some(key) = field.key(namespace) else {
            return;
        };
        if self.entries.insert(key, Slot::new(field, slot)).is_some() {
            trace!(key, field = field.name, "field key rebound by a later declaration");
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Slot<'a>> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Exposes a struct's fields to the struct mapper.
pub trait StructFields {
    fn bind_fields<'a>(&'a mut self, tag: &str, table: &mut FieldTable<'a>);

    /// Decodes source entries addressed to embedded fields as a whole, after
    /// their promoted fields have been filled.
    fn decode_embedded(&mut self, _entries: &Map, _cx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }
}

impl<T: StructFields + ?Sized> StructFields for Box<T> {
    fn bind_fields<'a>(&'a mut self, tag: &str, table: &mut FieldTable<'a>) {
        (**self).bind_fields(tag, table)
    }

    fn decode_embedded(&mut self, entries: &Map, cx: &mut Context<'_>) -> Result<()> {
        (**self).decode_embedded(entries, cx)
    }
}

/// Embedded pointers are allocated before their fields are promoted.
impl<T: StructFields + Default> StructFields for Option<T> {
    fn bind_fields<'a>(&'a mut self, tag: &str, table: &mut FieldTable<'a>) {
        if self.is_none() {
            trace!("allocating embedded field");
        }
        self.get_or_insert_with(T::default).bind_fields(tag, table)
    }

    fn decode_embedded(&mut self, entries: &Map, cx: &mut Context<'_>) -> Result<()> {
        match self {
            Some(inner) => inner.decode_embedded(entries, cx),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const TAGGED: FieldDescriptor = FieldDescriptor {
        name: "value",
        exported: true,
        tags: &[("json", "v"), ("yaml", "-"), ("toml", "")],
    };

    const PRIVATE: FieldDescriptor = FieldDescriptor {
        name: "secret",
        exported: false,
        tags: &[("json", "s")],
    };

    #[rstest(
        field,
        namespace,
        expected,
        case(TAGGED, "json", Some("v")),
        case(TAGGED, "yaml", None),
        case(TAGGED, "toml", Some("value")),
        case(TAGGED, "xml", Some("value")),
        case(PRIVATE, "json", Some("s")),
        case(PRIVATE, "yaml", None),
    )]
    fn test_field_key(field: FieldDescriptor, namespace: &str, expected: Option<&str>) {
        assert_eq!(expected, field.key(namespace));
    }

    #[test]
    fn test_field_table_last_binding_wins() {
        let mut first = 1i32;
        let mut second = 2i32;
        let a = FieldDescriptor {
            name: "a",
            exported: true,
            tags: &[],
        };
        let b = FieldDescriptor {
            name: "b",
            exported: true,
            tags: &[("json", "a")],
        };

        let mut table = FieldTable::new();
        table.bind(&a, "json", &mut first);
        table.bind(&b, "json", &mut second);
        assert_eq!(1, table.len());
        assert!(table.contains_key("a"));
        assert!(!table.contains_key("b"));

        let mut cx = crate::Context::new("json");
        let slot = table.get_mut("a").unwrap();
        cx.decode_slot(&copier_value::Value::Int(7), slot).unwrap();
        drop(table);
        assert_eq!(1, first);
        assert_eq!(7, second);
    }

    #[test]
    fn test_field_table_seals_private_tagged_fields() {
        let mut secret = String::new();
        let mut table = FieldTable::new();
        table.bind(&PRIVATE, "json", &mut secret);
        assert!(matches!(table.get_mut("s"), Some(Slot::Sealed("secret"))));

        let mut cx = crate::Context::new("json");
        let slot = table.get_mut("s").unwrap();
        cx.decode_slot(&copier_value::Value::Null, slot).unwrap();
        let err = cx.decode_slot(&copier_value::Value::from("x"), slot).unwrap_err();
        assert!(matches!(err, crate::Error::NotSettable(_)));
        assert_eq!("cannot set unexported field `secret`", err.to_string());
        drop(table);
        assert!(secret.is_empty());
    }
}
