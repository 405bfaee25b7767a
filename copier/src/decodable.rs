//! The per-type decode capability and the custom-hook override.

use copier_value::Value;

use crate::context::Context;
use crate::error::Result;
use crate::kind::Kind;

/// A destination type that decodes a [`Value`] by itself.
///
/// Implementations must copy whatever they keep from `src`. Any input shape
/// they do not handle must be reported as an error; the decoder then falls
/// back to the generic rules for the destination's kind, and the hook's error
/// is discarded.
pub trait CopyIn {
    fn copy_in(&mut self, src: &Value) -> Result<()>;
}

/// How a destination wants to be decoded before the generic rules apply.
pub enum Hook<'a> {
    Generic,
    Custom(&'a mut dyn CopyIn),
}

/// A type that can be populated from a [`Value`].
///
/// Structs get this from `#[derive(Decodable)]`; std scalars, containers and
/// pointers are covered by the crate.
///
/// ```
/// use copier::{Context, CopyIn, Decodable, Error, Hook, Kind, Value, copy_out, value};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Celsius(f64);
///
/// impl CopyIn for Celsius {
///     fn copy_in(&mut self, src: &Value) -> copier::Result<()> {
///         let text = src
///             .as_str()
///             .and_then(|s| s.strip_suffix('C'))
///             .ok_or_else(|| Error::custom("not a celsius reading"))?;
///         self.0 = text.parse()?;
///         Ok(())
///     }
/// }
///
/// impl Decodable for Celsius {
///     fn kind() -> Kind {
///         Kind::Float
///     }
///
///     fn hook(&mut self) -> Hook<'_> {
///         Hook::Custom(self)
///     }
///
///     fn decode_generic(&mut self, src: &Value, cx: &mut Context<'_>) -> copier::Result<()> {
///         cx.decode(src, &mut self.0)
///     }
/// }
///
/// let mut t = Celsius::default();
/// copy_out(&value!("21.5C"), &mut t).unwrap();
/// assert_eq!(Celsius(21.5), t);
/// copy_out(&value!(3), &mut t).unwrap();
/// assert_eq!(Celsius(3.0), t);
/// ```
pub trait Decodable {
    /// Structural kind of this destination type.
    fn kind() -> Kind
    where
        Self: Sized;

    /// Offers a custom decoder that takes precedence over
    /// [`decode_generic`](Decodable::decode_generic).
    fn hook(&mut self) -> Hook<'_> {
        Hook::Generic
    }

    /// Applies the structural rule for this type. `src` is never null here.
    fn decode_generic(&mut self, src: &Value, cx: &mut Context<'_>) -> Result<()>;
}
