//! The recursive decoder.
//!
//! [`Context::decode`] is the single dispatch point every destination goes
//! through: it handles null sources, offers the destination's custom hook and
//! then runs the destination's structural rule. Struct, map and sequence
//! rules call back into it for every field, entry and element, pushing a path
//! segment on the way down so failures can name their location.

use std::mem;

use copier_value::{Map, Value};
use tracing::{debug, trace};

use crate::decodable::{Decodable, Hook};
use crate::error::{Error, Result};
use crate::fields::{FieldDescriptor, FieldTable, Slot, StructFields};
use crate::kind::Kind;
use crate::path::{Path, Segment};

/// State of a single decode call: the tag namespace used to resolve struct
/// field keys and the path to the location being decoded.
#[derive(Debug)]
pub struct Context<'t> {
    tag: &'t str,
    path: Path,
}

impl<'t> Context<'t> {
    pub fn new(tag: &'t str) -> Self {
        Context {
            tag,
            path: Path::new(),
        }
    }

    pub fn tag(&self) -> &'t str {
        self.tag
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Populates `dst` from `src`.
    ///
    /// A null source leaves the destination untouched. Otherwise the
    /// destination's [`Hook`] is tried first; if it declines, the generic
    /// rule for the destination's kind runs.
    pub fn decode<T: Decodable + ?Sized>(&mut self, src: &Value, dst: &mut T) -> Result<()> {
        if src.is_null() {
            trace!(path = %self.path, "null source, destination left as is");
            return Ok(());
        }

        if let Hook::Custom(hook) = dst.hook() {
            match hook.copy_in(src) {
                Ok(()) => {
                    trace!(path = %self.path, source = %src.kind(), "decoded by copy-in hook");
                    return Ok(());
                }
                Err(err) => {
                    trace!(path = %self.path, error = %err, "copy-in hook declined, using generic rules");
                }
            }
        }

        trace!(path = %self.path, source = %src.kind(), "dispatching generic rule");
        dst.decode_generic(src, self)
    }

    /// Runs `f` one level below the current location.
    ///
    /// The first error that reaches a segment boundary is wrapped with the
    /// full path and the path stack is emptied, so enclosing frames pass the
    /// wrapped error through unchanged.
    pub fn descend<F>(&mut self, segment: Segment, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.path.push(segment);
        match f(self) {
            Ok(()) => {
                self.path.pop();
                Ok(())
            }
            Err(err @ Error::At { .. }) => Err(err),
            Err(err) => {
                let path = mem::take(&mut self.path);
                debug!(%path, error = %err, "decode failed");
                Err(Error::At {
                    path,
                    source: Box::new(err),
                })
            }
        }
    }

    /// Populates the fields of a struct from an object source.
    ///
    /// Keys are resolved against the current tag namespace. Source keys
    /// without a matching field are ignored, and fields without a source key
    /// keep their value. Keys addressing an embedded field itself are decoded
    /// after the promoted fields.
    pub fn decode_struct<S: StructFields + ?Sized>(&mut self, src: &Value, dst: &mut S) -> Result<()> {
        let Value::Object(entries) = src else {
            return Err(Error::mismatch(Kind::Struct, src));
        };

        let mut table = FieldTable::new();
        dst.bind_fields(self.tag, &mut table);
        trace!(path = %self.path, fields = table.len(), "field table built");

        for (key, value) in entries {
            if let Some(slot) = table.get_mut(key) {
                self.descend(Segment::Field(key.clone()), |cx| cx.decode_slot(value, slot))?;
            }
        }
        drop(table);

        dst.decode_embedded(entries, self)
    }

    /// Decodes `src` into a bound field. A sealed field accepts only null.
    pub fn decode_slot(&mut self, src: &Value, slot: &mut Slot<'_>) -> Result<()> {
        match slot {
            Slot::Open(field) => self.decode(src, &mut **field),
            Slot::Sealed(_) if src.is_null() => Ok(()),
            Slot::Sealed(name) => Err(Error::NotSettable(format!("unexported field `{name}`"))),
        }
    }

    /// Decodes the entry of `entries` that `field` answers to, if any, into
    /// `dst`.
    pub fn decode_field(
        &mut self,
        entries: &Map,
        field: &FieldDescriptor,
        dst: &mut dyn Decodable,
    ) -> Result<()> {
        let Some((key, value)) = field.key(self.tag).and_then(|key| entries.get_key_value(key)) else {
            return Ok(());
        };
        let mut slot = Slot::new(field, dst);
        self.descend(Segment::Field(key.clone()), |cx| cx.decode_slot(value, &mut slot))
    }

    /// Decodes `src[i]` into the `i`-th destination slot for every position
    /// both sides have. Extra source elements and extra destination slots are
    /// left alone.
    pub fn copy_seq<'d, T, I>(&mut self, src: &[Value], dst: I) -> Result<()>
    where
        T: Decodable + 'd,
        I: IntoIterator<Item = &'d mut T>,
    {
        for (i, (item, slot)) in src.iter().zip(dst).enumerate() {
            self.descend(Segment::Index(i), |cx| cx.decode(item, slot))?;
        }
        Ok(())
    }

    /// Decodes every entry of an object source into a fresh key/value pair
    /// and hands it to `insert`.
    pub fn copy_map<K, V, F>(&mut self, src: &Value, mut insert: F) -> Result<()>
    where
        K: Decodable + Default,
        V: Decodable + Default,
        F: FnMut(K, V),
    {
        let Value::Object(entries) = src else {
            return Err(Error::mismatch(Kind::Map, src));
        };
        if K::kind() != Kind::String {
            return Err(Error::UnsupportedKeyType(K::kind()));
        }

        for (key, value) in entries {
            let mut k = K::default();
            let mut v = V::default();
            self.descend(Segment::Field(key.clone()), |cx| {
                cx.decode(&Value::String(key.clone()), &mut k)?;
                cx.decode(value, &mut v)
            })?;
            insert(k, v);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use copier_value::{ValueKind, value};

    use super::*;
    use crate::decodable::CopyIn;

    #[derive(Debug, Default)]
    struct Recorder {
        seen: Vec<String>,
        accept: bool,
        generic_calls: usize,
    }

    impl CopyIn for Recorder {
        fn copy_in(&mut self, src: &Value) -> Result<()> {
            self.seen.push(src.to_string());
            if self.accept {
                Ok(())
            } else {
                Err(Error::custom("declined"))
            }
        }
    }

    impl Decodable for Recorder {
        fn kind() -> Kind {
            Kind::Dynamic
        }

        fn hook(&mut self) -> Hook<'_> {
            Hook::Custom(self)
        }

        fn decode_generic(&mut self, _src: &Value, _cx: &mut Context<'_>) -> Result<()> {
            self.generic_calls += 1;
            Ok(())
        }
    }

    #[test]
    fn test_null_source_skips_hook_and_generic() {
        let mut cx = Context::new("json");
        let mut dst = Recorder::default();
        cx.decode(&Value::Null, &mut dst).unwrap();
        assert!(dst.seen.is_empty());
        assert_eq!(0, dst.generic_calls);
    }

    #[test]
    fn test_accepting_hook_short_circuits() {
        let mut cx = Context::new("json");
        let mut dst = Recorder {
            accept: true,
            ..Recorder::default()
        };
        cx.decode(&value!({ "a": 1 }), &mut dst).unwrap();
        assert_eq!(vec![r#"{"a":1}"#.to_string()], dst.seen);
        assert_eq!(0, dst.generic_calls);
    }

    #[test]
    fn test_declining_hook_falls_back() {
        let mut cx = Context::new("json");
        let mut dst = Recorder::default();
        cx.decode(&value!([1]), &mut dst).unwrap();
        assert_eq!(1, dst.seen.len());
        assert_eq!(1, dst.generic_calls);
    }

    #[test]
    fn test_descend_wraps_once_and_clears_path() {
        let mut cx = Context::new("json");
        let result = cx.descend(Segment::Field("outer".to_string()), |cx| {
            cx.descend(Segment::Index(3), |cx| {
                cx.descend(Segment::Field("leaf".to_string()), |_| {
                    Err(Error::TypeMismatch {
                        expected: Kind::Bool,
                        found: ValueKind::String,
                    })
                })
            })
        });

        let err = result.unwrap_err();
        assert_eq!("outer[3].leaf: cannot decode string into bool", err.to_string());
        assert!(cx.path().is_empty());
    }

    #[test]
    fn test_descend_pops_on_success() {
        let mut cx = Context::new("json");
        cx.descend(Segment::Field("a".to_string()), |cx| {
            assert_eq!("a", cx.path().to_string());
            Ok(())
        })
        .unwrap();
        assert!(cx.path().is_empty());
    }

    #[test]
    fn test_copy_seq_stops_at_shorter_side() {
        let mut cx = Context::new("json");
        let mut dst = [0i32; 2];
        cx.copy_seq(&[Value::Int(1), Value::Int(2), Value::Int(3)], dst.iter_mut())
            .unwrap();
        assert_eq!([1, 2], dst);

        let mut longer = [9i32; 4];
        cx.copy_seq(&[Value::Int(5)], longer.iter_mut()).unwrap();
        assert_eq!([5, 9, 9, 9], longer);
    }

    #[test]
    fn test_copy_map_rejects_non_string_keys() {
        let mut cx = Context::new("json");
        let result = cx.copy_map::<u32, i32, _>(&value!({ "1": 2 }), |_, _| {});
        assert!(matches!(result, Err(Error::UnsupportedKeyType(Kind::Uint))));
    }

    #[test]
    fn test_copy_map_requires_object_source() {
        let mut cx = Context::new("json");
        let result = cx.copy_map::<String, i32, _>(&value!([1]), |_, _| {});
        assert!(matches!(
            result,
            Err(Error::TypeMismatch {
                expected: Kind::Map,
                found: ValueKind::Array
            })
        ));
    }
}
