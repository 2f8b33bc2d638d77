//! Deep structural conversion between arbitrary nested values.
//!
//! [`convert`] copies a source hierarchy (records, sequences, mappings,
//! optional references, open [`Value`] trees) into a destination of a
//! possibly different shape, creating destination structure on demand.
//! Records take part through `#[derive(Convert)]`, whose
//! `#[convert(path = "/a/b")]` annotations route fields to nested locations.

// Lets the derive's `::deepconv::` paths resolve inside this crate's tests.
extern crate self as deepconv;

pub mod config;
pub mod converter;
pub mod error;
pub mod handle;
mod impls;
pub mod json;
pub mod key;
pub mod mappath;
pub mod navigate;
pub mod path;
pub mod schema;
pub mod value;

pub use config::Options;
pub use converter::{Converter, convert};
pub use deepconv_derive::Convert;
pub use error::{ConvertError, KeyMismatch, ScalarMismatch};
pub use handle::{
    IndirectSlot, Kind, MappingAccess, OpenSlot, RecordAccess, Scalar, ScalarSlot, SequenceAccess,
    Slot, Structural, View, ViewMut,
};
pub use json::JsonError;
pub use key::{Key, KeyKind, MapKey};
pub use mappath::MappathError;
pub use path::{Path, Segment};
pub use schema::{FieldSchema, RecordSchema};
pub use value::Value;
