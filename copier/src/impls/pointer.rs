use std::rc::Rc;
use std::sync::Arc;

use copier_value::Value;
use tracing::trace;

use crate::context::Context;
use crate::decodable::Decodable;
use crate::error::{Error, Result};
use crate::kind::Kind;

/// `None` is a nil pointer. A null source never reaches here, so `None`
/// survives a null. Scalar pointees are decoded into a fresh cell and only
/// stored on success; composite pointees are allocated, then populated.
impl<T: Decodable + Default> Decodable for Option<T> {
    fn kind() -> Kind {
        T::kind()
    }

    fn decode_generic(&mut self, src: &Value, cx: &mut Context<'_>) -> Result<()> {
        match self {
            Some(inner) => cx.decode(src, inner),
            None if T::kind().is_scalar() => {
                let mut cell = T::default();
                cx.decode(src, &mut cell)?;
                *self = Some(cell);
                Ok(())
            }
            None => {
                trace!(path = %cx.path(), kind = %T::kind(), "allocating pointer");
                cx.decode(src, self.insert(T::default()))
            }
        }
    }
}

impl<T: Decodable> Decodable for Box<T> {
    fn kind() -> Kind {
        T::kind()
    }

    fn decode_generic(&mut self, src: &Value, cx: &mut Context<'_>) -> Result<()> {
        cx.decode(src, &mut **self)
    }
}

impl<T: Decodable> Decodable for Rc<T> {
    fn kind() -> Kind {
        T::kind()
    }

    fn decode_generic(&mut self, src: &Value, cx: &mut Context<'_>) -> Result<()> {
        match Rc::get_mut(self) {
            Some(inner) => cx.decode(src, inner),
            None => Err(Error::NotSettable("shared Rc".to_string())),
        }
    }
}

impl<T: Decodable> Decodable for Arc<T> {
    fn kind() -> Kind {
        T::kind()
    }

    fn decode_generic(&mut self, src: &Value, cx: &mut Context<'_>) -> Result<()> {
        match Arc::get_mut(self) {
            Some(inner) => cx.decode(src, inner),
            None => Err(Error::NotSettable("shared Arc".to_string())),
        }
    }
}
