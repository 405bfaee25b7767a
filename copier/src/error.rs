//! Error types for decoding dynamic values into typed destinations.

use std::fmt::Display;
use std::num::{ParseFloatError, ParseIntError};

use copier_value::{Value, ValueKind};
use thiserror::Error;

use crate::kind::Kind;
use crate::path::Path;

/// Errors that can occur while copying a [`Value`] into a destination.
///
/// Decoding stops at the first failure. Errors raised below a struct field,
/// map entry or sequence position are wrapped exactly once in
/// [`Error::At`], carrying the full path to the failing location.
#[derive(Debug, Error)]
pub enum Error {
    /// The destination cannot be assigned: an `Rc` with other owners, or a
    /// tagged field that is not `pub`.
    #[error("cannot set {0}")]
    NotSettable(String),

    /// The source kind has no conversion rule into the destination kind.
    #[error("cannot decode {found} into {expected}")]
    TypeMismatch { expected: Kind, found: ValueKind },

    /// Map destinations must be keyed by strings.
    #[error("map destination does not use string keys (key kind is {0})")]
    UnsupportedKeyType(Kind),

    #[error("parse int error: {0}")]
    ParseInt(#[from] ParseIntError),

    #[error("parse float error: {0}")]
    ParseFloat(#[from] ParseFloatError),

    /// Raised by [`CopyIn`](crate::CopyIn) implementations.
    #[error("{0}")]
    Custom(String),

    /// A hook or destination impl panicked; caught at the entry point.
    #[error("panic during decode: {0}")]
    Panicked(String),

    #[error("{path}: {source}")]
    At {
        path: Path,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn custom(msg: impl Display) -> Self {
        Error::Custom(msg.to_string())
    }

    pub(crate) fn mismatch(expected: Kind, found: &Value) -> Self {
        Error::TypeMismatch {
            expected,
            found: found.kind(),
        }
    }

    /// The underlying error with any path wrapper removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::At { source, .. } => source.root(),
            err => err,
        }
    }

    /// Where the failure happened, if it happened below the root.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::At { path, .. } => Some(path),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::path::Segment;

    #[rstest(
        input,
        expected,
        case(Error::NotSettable("shared Rc".to_string()), "cannot set shared Rc"),
        case(Error::NotSettable("field `token`".to_string()), "cannot set field `token`"),
        case(
            Error::TypeMismatch { expected: Kind::Seq, found: ValueKind::Object },
            "cannot decode object into sequence"
        ),
        case(Error::UnsupportedKeyType(Kind::Int), "map destination does not use string keys (key kind is int)"),
        case(Error::custom("nope"), "nope"),
        case(
            Error::At {
                path: Path::from(vec![Segment::Field("s".to_string()), Segment::Index(1)]),
                source: Box::new(Error::TypeMismatch { expected: Kind::String, found: ValueKind::Bool }),
            },
            "s[1]: cannot decode bool into string"
        ),
    )]
    fn test_error_display(input: Error, expected: &str) {
        assert_eq!(expected, input.to_string());
    }

    #[test]
    fn test_error_root_and_path() {
        let err = Error::At {
            path: Path::from(vec![Segment::Field("a".to_string())]),
            source: Box::new(Error::custom("inner")),
        };
        assert!(matches!(err.root(), Error::Custom(msg) if msg == "inner"));
        assert_eq!("a", err.path().map(ToString::to_string).unwrap_or_default());
        assert!(Error::custom("x").path().is_none());
    }
}
