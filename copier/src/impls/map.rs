use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use copier_value::Value;
use indexmap::IndexMap;

use crate::context::Context;
use crate::decodable::Decodable;
use crate::error::Result;
use crate::kind::Kind;

/// Entries are decoded into fresh values and inserted over whatever the map
/// already holds under the same key.
impl<K, V, S> Decodable for HashMap<K, V, S>
where
    K: Decodable + Default + Eq + Hash,
    V: Decodable + Default,
    S: BuildHasher,
{
    fn kind() -> Kind {
        Kind::Map
    }

    fn decode_generic(&mut self, src: &Value, cx: &mut Context<'_>) -> Result<()> {
        cx.copy_map(src, |k, v| {
            self.insert(k, v);
        })
    }
}

impl<K, V> Decodable for BTreeMap<K, V>
where
    K: Decodable + Default + Ord,
    V: Decodable + Default,
{
    fn kind() -> Kind {
        Kind::Map
    }

    fn decode_generic(&mut self, src: &Value, cx: &mut Context<'_>) -> Result<()> {
        cx.copy_map(src, |k, v| {
            self.insert(k, v);
        })
    }
}

impl<K, V, S> Decodable for IndexMap<K, V, S>
where
    K: Decodable + Default + Eq + Hash,
    V: Decodable + Default,
    S: BuildHasher,
{
    fn kind() -> Kind {
        Kind::Map
    }

    fn decode_generic(&mut self, src: &Value, cx: &mut Context<'_>) -> Result<()> {
        cx.copy_map(src, |k, v| {
            self.insert(k, v);
        })
    }
}
