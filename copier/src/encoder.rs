//! Encoder trait for type-safe conversions into a [`Value`].
//!
//! The counterpart of [`decoder`](crate::decoder): every [`Encodable`] type
//! encodes to a [`Value`] using the default tag namespace.
//!
//! ```
//! use copier::encoder::Encoder;
//! use copier::{Encodable, Value, value};
//!
//! #[derive(Encodable)]
//! struct Limits {
//!     #[tag(json = "max")]
//!     pub max: u32,
//! }
//!
//! let encoded: Value = Limits { max: 3 }.encode().unwrap();
//! assert_eq!(value!({ "max": (3u32) }), encoded);
//! ```

use std::convert::Infallible;

use copier_value::Value;

use crate::DEFAULT_TAG;
use crate::encode::Encodable;

/// Encodes `self` (the source `T`) into `E`.
pub trait Encoder<T: ?Sized, E: EncodableTo<T>> {
    type Error;

    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait indicating that `Self` can be produced from type `T`.
pub trait EncodableTo<T: ?Sized> {}

impl<T: Encodable + ?Sized> EncodableTo<T> for Value {}

impl<T: Encodable + ?Sized> Encoder<T, Value> for T {
    type Error = Infallible;

    fn encode(&self) -> Result<Value, Self::Error> {
        Ok(self.to_value(DEFAULT_TAG))
    }
}
