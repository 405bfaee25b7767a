//! Scalar coercion.
//!
//! The destination kind picks the rule. Numbers convert freely between
//! integer and float kinds (truncating toward zero, narrowing without range
//! checks) and strings are parsed into numbers; nothing converts between
//! booleans and numbers, and only strings become strings.

use copier_value::Value;

use crate::context::Context;
use crate::decodable::Decodable;
use crate::error::{Error, Result};
use crate::kind::Kind;

pub fn coerce_bool(src: &Value) -> Result<bool> {
    match src {
        Value::Bool(b) => Ok(*b),
        _ => Err(Error::mismatch(Kind::Bool, src)),
    }
}

pub fn coerce_i64(src: &Value) -> Result<i64> {
    match src {
        Value::String(s) => Ok(s.parse::<i64>()?),
        Value::Float(f) => Ok(*f as i64),
        Value::Int(n) => Ok(*n),
        Value::Uint(n) => Ok(*n as i64),
        _ => Err(Error::mismatch(Kind::Int, src)),
    }
}

pub fn coerce_u64(src: &Value) -> Result<u64> {
    match src {
        Value::String(s) => Ok(s.parse::<u64>()?),
        Value::Float(f) => Ok(*f as u64),
        Value::Int(n) => Ok(*n as u64),
        Value::Uint(n) => Ok(*n),
        _ => Err(Error::mismatch(Kind::Uint, src)),
    }
}

pub fn coerce_f64(src: &Value) -> Result<f64> {
    match src {
        Value::String(s) => Ok(s.parse::<f64>()?),
        Value::Float(f) => Ok(*f),
        Value::Int(n) => Ok(*n as f64),
        Value::Uint(n) => Ok(*n as f64),
        _ => Err(Error::mismatch(Kind::Float, src)),
    }
}

pub fn coerce_string(src: &Value) -> Result<String> {
    match src {
        Value::String(s) => Ok(s.clone()),
        _ => Err(Error::mismatch(Kind::String, src)),
    }
}

macro_rules! impl_decodable_number {
    ($kind:ident, $coerce:ident => $($t:ty),* $(,)?) => {
        $(
            impl Decodable for $t {
                fn kind() -> Kind {
                    Kind::$kind
                }

                fn decode_generic(&mut self, src: &Value, _cx: &mut Context<'_>) -> Result<()> {
                    *self = $coerce(src)? as $t;
                    Ok(())
                }
            }
        )*
    };
}

impl_decodable_number!(Int, coerce_i64 => i8, i16, i32, i64, isize);
impl_decodable_number!(Uint, coerce_u64 => u8, u16, u32, u64, usize);
impl_decodable_number!(Float, coerce_f64 => f32, f64);

impl Decodable for bool {
    fn kind() -> Kind {
        Kind::Bool
    }

    fn decode_generic(&mut self, src: &Value, _cx: &mut Context<'_>) -> Result<()> {
        *self = coerce_bool(src)?;
        Ok(())
    }
}

impl Decodable for String {
    fn kind() -> Kind {
        Kind::String
    }

    fn decode_generic(&mut self, src: &Value, _cx: &mut Context<'_>) -> Result<()> {
        *self = coerce_string(src)?;
        Ok(())
    }
}

/// The dynamic slot keeps the source exactly as it is.
impl Decodable for Value {
    fn kind() -> Kind {
        Kind::Dynamic
    }

    fn decode_generic(&mut self, src: &Value, _cx: &mut Context<'_>) -> Result<()> {
        *self = src.clone();
        Ok(())
    }
}
