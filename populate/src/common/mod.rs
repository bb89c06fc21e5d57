//! Shared building blocks: the [Value] model, [Convertible] conversions, constants and the
//! lock helpers used across the crate.

mod constants;
mod convertible;
mod type_utils;
mod value;

pub use constants::*;
pub use convertible::*;
pub use type_utils::*;
pub use value::*;
