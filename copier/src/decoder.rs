//! Decoder trait for type-safe conversions out of a [`Value`].
//!
//! `Decoder<T, D>` converts a source `T` into a destination `D`, and the
//! marker trait `DecodableFrom<T>` restricts which destinations a source can
//! produce. Every [`Decodable`] type with a `Default` is decodable from a
//! [`Value`], so a value can be turned into a typed destination in one call:
//!
//! ```
//! use copier::decoder::Decoder;
//! use copier::{Decodable, value};
//!
//! #[derive(Debug, Default, Decodable)]
//! struct Limits {
//!     #[tag(json = "max")]
//!     pub max: u32,
//! }
//!
//! let limits: Limits = value!({ "max": "12" }).decode().unwrap();
//! assert_eq!(12, limits.max);
//! ```

use copier_value::Value;

use crate::decodable::Decodable;
use crate::error::Error;

/// Decodes `self` (the source `T`) into `D`.
pub trait Decoder<T, D: DecodableFrom<T>> {
    type Error;

    /// # Errors
    ///
    /// Returns an error if the source cannot be converted into `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that type `D` can be decoded from type `T`.
pub trait DecodableFrom<T> {}

impl<D: Decodable + Default> DecodableFrom<Value> for D {}

/// Starts from `D::default()` and copies the value in with the default tag
/// namespace.
impl<D: Decodable + Default> Decoder<Value, D> for Value {
    type Error = Error;

    fn decode(&self) -> Result<D, Self::Error> {
        let mut out = D::default();
        crate::copy_out(self, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use copier_value::value;

    use super::*;

    #[test]
    fn test_decode_into_container() {
        let decoded: Result<BTreeMap<String, Vec<u8>>, Error> =
            value!({ "a": [1, 2], "b": [] }).decode();
        assert!(decoded.is_ok(), "Failed to decode: {:?}", decoded);
        let map = decoded.unwrap();
        assert_eq!(Some(&vec![1, 2]), map.get("a"));
        assert_eq!(Some(&vec![]), map.get("b"));
    }

    #[test]
    fn test_decode_failure() {
        let decoded: Result<Vec<String>, Error> = value!(["a", 1]).decode();
        let err = decoded.unwrap_err();
        assert_eq!("[1]: cannot decode int into string", err.to_string());
    }
}
