//! # copier
//!
//! Deep copy of loosely typed [`Value`] trees into statically typed
//! destinations.
//!
//! A [`Value`] is what a parser for a self-describing format hands out:
//! nested objects, arrays and scalars with no schema attached. [`copy_out`]
//! walks the destination type and pulls matching data out of the value:
//!
//! - structs are filled from objects, field by field, using the keys declared
//!   with `#[tag(...)]` (or the field name for untagged `pub` fields);
//! - maps, vectors and arrays are filled element by element;
//! - numbers are coerced between integer and float kinds, and strings are
//!   parsed into numbers;
//! - `null` never overwrites anything;
//! - a type may take over its own decoding through [`CopyIn`].
//!
//! Unknown keys and size mismatches are tolerated. Kind mismatches and parse
//! failures stop the copy and report the path of the failing field.
//!
//! ```
//! use std::collections::HashMap;
//!
//! use copier::{Decodable, copy_out, value};
//!
//! #[derive(Debug, Default, Decodable)]
//! struct Endpoint {
//!     #[tag(json = "host")]
//!     pub host: String,
//!     #[tag(json = "port")]
//!     pub port: u16,
//!     pub labels: HashMap<String, String>,
//!     #[tag(json = "retries")]
//!     pub retries: Option<u8>,
//! }
//!
//! let src = value!({
//!     "host": "localhost",
//!     "port": "8080",
//!     "labels": { "zone": "a" },
//!     "retries": null,
//!     "unused": true
//! });
//!
//! let mut endpoint = Endpoint::default();
//! copy_out(&src, &mut endpoint).unwrap();
//! assert_eq!(8080, endpoint.port);
//! assert_eq!(None, endpoint.retries);
//!
//! let err = copy_out(&value!({ "port": [1] }), &mut endpoint).unwrap_err();
//! assert_eq!("port: cannot decode array into uint", err.to_string());
//! ```
//!
//! ## Struct attributes
//!
//! `#[derive(Decodable, Encodable)]` understands:
//!
//! - `#[tag(json = "key", yaml = "other")]` on a field: the key per tag
//!   namespace; `"-"` removes the field from that namespace. A tagged field
//!   that is not `pub` rejects any non-null source with
//!   [`Error::NotSettable`];
//! - `#[copier(embed)]` on a field: promote the field's own fields into the
//!   enclosing struct. The embedded field can still be addressed by its own
//!   key, which is decoded after the promoted fields;
//! - `#[copier(skip)]` on a field: never touch the field;
//! - `#[copier(copy_in)]` on the struct: try the type's [`CopyIn`] impl
//!   before the field rules.

#![forbid(unsafe_code)]

extern crate self as copier;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::debug_span;

mod context;
mod decodable;
pub mod decoder;
mod encode;
pub mod encoder;
mod error;
mod fields;
mod impls;
mod kind;
mod path;
pub mod scalar;

pub use context::Context;
pub use copier_derive::{Decodable, Encodable};
pub use copier_value::{Map, Value, ValueKind, value};
pub use decodable::{CopyIn, Decodable, Hook};
pub use encode::{Encodable, EncodeFields};
pub use error::{Error, Result};
pub use fields::{FieldDescriptor, FieldTable, SKIP_TAG, Slot, StructFields};
pub use kind::Kind;
pub use path::{Path, Segment};

/// Tag namespace used by [`copy_out`] and [`to_value`].
pub const DEFAULT_TAG: &str = "json";

/// Copies `src` into `dst`, resolving struct keys with the `json` tag
/// namespace.
///
/// Fields written before a failure keep their new values.
pub fn copy_out<T: Decodable + ?Sized>(src: &Value, dst: &mut T) -> Result<()> {
    copy_out_tagged(src, dst, DEFAULT_TAG)
}

/// Copies `src` into `dst`, resolving struct keys with the `tag` namespace.
///
/// A panic raised by a [`CopyIn`] hook or a hand-written [`Decodable`] impl
/// is caught here and returned as [`Error::Panicked`].
pub fn copy_out_tagged<T: Decodable + ?Sized>(src: &Value, dst: &mut T, tag: &str) -> Result<()> {
    let _span = debug_span!("copy_out", tag).entered();
    let mut cx = Context::new(tag);
    match panic::catch_unwind(AssertUnwindSafe(|| cx.decode(src, dst))) {
        Ok(result) => result,
        Err(payload) => Err(Error::Panicked(panic_message(payload.as_ref()))),
    }
}

/// Encodes `value` with the `json` tag namespace.
pub fn to_value<T: Encodable + ?Sized>(value: &T) -> Value {
    value.to_value(DEFAULT_TAG)
}

/// Encodes `value` with the `tag` namespace.
pub fn to_value_tagged<T: Encodable + ?Sized>(value: &T, tag: &str) -> Value {
    value.to_value(tag)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Explosive;

    impl CopyIn for Explosive {
        fn copy_in(&mut self, _src: &Value) -> Result<()> {
            panic!("boom")
        }
    }

    impl Decodable for Explosive {
        fn kind() -> Kind {
            Kind::Struct
        }

        fn hook(&mut self) -> Hook<'_> {
            Hook::Custom(self)
        }

        fn decode_generic(&mut self, _src: &Value, _cx: &mut Context<'_>) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_panic_is_returned_as_error() {
        let err = copy_out(&value!({}), &mut Explosive).unwrap_err();
        assert!(matches!(&err, Error::Panicked(msg) if msg == "boom"));
    }

    #[test]
    fn test_top_level_scalar() {
        let mut n = 0i32;
        copy_out(&value!(3), &mut n).unwrap();
        assert_eq!(3, n);
    }

    #[test]
    fn test_top_level_null_is_noop() {
        let mut s = "kept".to_string();
        copy_out(&Value::Null, &mut s).unwrap();
        assert_eq!("kept", s);
    }

    #[test]
    fn test_top_level_error_has_no_path() {
        let mut flag = false;
        let err = copy_out(&value!("yes"), &mut flag).unwrap_err();
        assert!(err.path().is_none());
        assert_eq!("cannot decode string into bool", err.to_string());
    }
}
