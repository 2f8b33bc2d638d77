//! `Structural` implementations for standard library types.

mod indirect;
mod mapping;
mod scalar;
mod sequence;
