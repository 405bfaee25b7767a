use std::collections::VecDeque;

use copier_value::Value;
use tracing::trace;

use crate::context::Context;
use crate::decodable::Decodable;
use crate::error::{Error, Result};
use crate::kind::Kind;

fn source_items(src: &Value) -> Result<&[Value]> {
    src.as_array().ok_or_else(|| Error::mismatch(Kind::Seq, src))
}

/// An empty vector is sized to the source before elements are copied.
impl<T: Decodable + Default> Decodable for Vec<T> {
    fn kind() -> Kind {
        Kind::Seq
    }

    fn decode_generic(&mut self, src: &Value, cx: &mut Context<'_>) -> Result<()> {
        let items = source_items(src)?;
        if self.is_empty() {
            trace!(path = %cx.path(), len = items.len(), "allocating sequence");
            self.resize_with(items.len(), T::default);
        }
        cx.copy_seq(items, self.iter_mut())
    }
}

impl<T: Decodable + Default> Decodable for VecDeque<T> {
    fn kind() -> Kind {
        Kind::Seq
    }

    fn decode_generic(&mut self, src: &Value, cx: &mut Context<'_>) -> Result<()> {
        let items = source_items(src)?;
        if self.is_empty() {
            trace!(path = %cx.path(), len = items.len(), "allocating sequence");
            self.resize_with(items.len(), T::default);
        }
        cx.copy_seq(items, self.iter_mut())
    }
}

/// Fixed arrays take the first `N` source elements; slots past the source
/// length are untouched.
impl<T: Decodable, const N: usize> Decodable for [T; N] {
    fn kind() -> Kind {
        Kind::Seq
    }

    fn decode_generic(&mut self, src: &Value, cx: &mut Context<'_>) -> Result<()> {
        let items = source_items(src)?;
        cx.copy_seq(items, self.iter_mut())
    }
}
