use std::fmt::{self, Display, Formatter};

/// Structural kind of a destination type.
///
/// Pointer types (`Option`, `Box`, `Rc`, `Arc`) report the kind of what they
/// point to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Uint,
    Float,
    String,
    /// A slot that accepts any [`Value`](crate::Value) verbatim.
    Dynamic,
    Struct,
    Map,
    Seq,
}

impl Kind {
    /// Scalars and dynamic slots are decoded into a fresh cell behind a nil
    /// pointer; composite kinds are allocated first and populated in place.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            Kind::Bool | Kind::Int | Kind::Uint | Kind::Float | Kind::String | Kind::Dynamic
        )
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Dynamic => "dynamic",
            Kind::Struct => "struct",
            Kind::Map => "map",
            Kind::Seq => "sequence",
        };
        write!(f, "{}", name)
    }
}
