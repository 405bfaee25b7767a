//! `Decodable` for std pointers and containers.

mod map;
mod pointer;
mod seq;
