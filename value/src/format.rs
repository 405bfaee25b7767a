//! Compact JSON-like rendering of values.

use std::fmt::{self, Display, Formatter, Write};

use crate::Value;

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Uint(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write_quoted(f, s),
            Value::Array(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_char(']')
            }
            Value::Object(map) => {
                f.write_char('{')?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ":{}", item)?;
                }
                f.write_char('}')
            }
        }
    }
}

fn write_quoted(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::Value;

    #[rstest(
        input,
        expected,
        case(value!(null), "null"),
        case(value!(true), "true"),
        case(value!((-12)), "-12"),
        case(value!(2.5), "2.5"),
        case(value!("a\"b\n"), r#""a\"b\n""#),
        case(value!([1, "x", []]), r#"[1,"x",[]]"#),
        case(value!({ "k": { "n": null }, "v": [true] }), r#"{"k":{"n":null},"v":[true]}"#),
    )]
    fn test_value_display(input: Value, expected: &str) {
        assert_eq!(expected, input.to_string());
    }
}
