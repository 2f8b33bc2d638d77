//! Value handles: uniform read, navigate and write access to a location in
//! an arbitrary value graph.
//!
//! `&dyn Structural` is a read-only handle and `&mut dyn Structural` a
//! settable one. A handle reports its shape through [`View`] / [`ViewMut`],
//! each variant carrying the access trait for that kind.

use std::collections::TryReserveError;
use std::fmt;

use crate::error::{KeyMismatch, ScalarMismatch};
use crate::key::{Key, KeyKind};
use crate::schema::RecordSchema;

/// Structural category of a value as seen through a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// An indirect reference or open value holding nothing.
    Absent,
    Indirect,
    Open,
    Record,
    Sequence,
    Mapping,
    Scalar,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Absent => "absent",
            Kind::Indirect => "indirect",
            Kind::Open => "open",
            Kind::Record => "record",
            Kind::Sequence => "sequence",
            Kind::Mapping => "mapping",
            Kind::Scalar => "scalar",
        })
    }
}

/// A primitive value read from a scalar handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(&'a str),
}

impl Scalar<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "integer",
            Scalar::UInt(_) => "unsigned integer",
            Scalar::Float(_) => "float",
            Scalar::Char(_) => "char",
            Scalar::Str(_) => "string",
        }
    }

    /// Mismatch error for assigning this scalar to `target`.
    pub fn mismatch(&self, target: &'static str) -> ScalarMismatch {
        ScalarMismatch {
            found: self.kind_name(),
            value: self.to_string(),
            target,
        }
    }
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::UInt(u) => write!(f, "{u}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Char(c) => write!(f, "{c:?}"),
            Scalar::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// Anything the converter can read from or write into.
///
/// Implemented for scalars, `Option`, `Box`, `Vec`, arrays, `HashMap`,
/// `BTreeMap`, [`crate::Value`], and records via `#[derive(Convert)]`.
pub trait Structural {
    fn view(&self) -> View<'_>;

    fn view_mut(&mut self) -> ViewMut<'_>;

    /// Overwrite with the zero value of the type.
    fn set_zero(&mut self);

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl dyn Structural + '_ {
    pub fn kind(&self) -> Kind {
        self.view().kind()
    }
}

/// Read-only view of a handle.
pub enum View<'a> {
    Indirect(Option<&'a dyn Structural>),
    Open(Option<&'a dyn Structural>),
    Record(&'a dyn RecordAccess),
    Sequence(&'a dyn SequenceAccess),
    Mapping(&'a dyn MappingAccess),
    Scalar(Scalar<'a>),
}

impl View<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            View::Indirect(None) | View::Open(None) => Kind::Absent,
            View::Indirect(Some(_)) => Kind::Indirect,
            View::Open(Some(_)) => Kind::Open,
            View::Record(_) => Kind::Record,
            View::Sequence(_) => Kind::Sequence,
            View::Mapping(_) => Kind::Mapping,
            View::Scalar(_) => Kind::Scalar,
        }
    }
}

/// Settable view of a handle.
pub enum ViewMut<'a> {
    Indirect(&'a mut dyn IndirectSlot),
    Open(&'a mut dyn OpenSlot),
    Record(&'a mut dyn RecordAccess),
    Sequence(&'a mut dyn SequenceAccess),
    Mapping(&'a mut dyn MappingAccess),
    Scalar(&'a mut dyn ScalarSlot),
}

/// Optional or pointer-like location.
pub trait IndirectSlot {
    fn is_present(&self) -> bool;

    /// Make the reference present with a zero-valued target. No-op when
    /// already present.
    fn allocate(&mut self);

    fn interior_mut(&mut self) -> Option<&mut dyn Structural>;
}

/// Location whose concrete type is only known at runtime.
pub trait OpenSlot {
    fn is_absent(&self) -> bool;

    fn interior_mut(&mut self) -> Option<&mut dyn Structural>;

    /// Replace the content with an empty generic mapping keyed by `kind`.
    fn manufacture(&mut self, kind: KeyKind);

    /// Replace the content with a scalar.
    fn assign(&mut self, scalar: &Scalar<'_>);
}

/// Record with a fixed set of named fields.
pub trait RecordAccess {
    fn schema(&self) -> &'static RecordSchema;

    fn field(&self, index: usize) -> Option<&dyn Structural>;

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Structural>;

    /// Whether the field at `index` holds its type's zero value. Consulted
    /// only for fields whose schema sets `omit_empty`.
    fn field_is_zero(&self, _index: usize) -> bool {
        false
    }
}

/// Index-addressed sequence.
pub trait SequenceAccess {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn element(&self, index: usize) -> Option<&dyn Structural>;

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Structural>;

    fn is_growable(&self) -> bool;

    /// Append zero values until the sequence holds at least `len` elements.
    /// Never shrinks; no-op for fixed-size sequences. Fails instead of
    /// aborting when the memory cannot be reserved.
    fn grow_to(&mut self, len: usize) -> Result<(), TryReserveError>;
}

/// Key-addressed mapping with homogeneous key and value types.
pub trait MappingAccess {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn key_kind(&self) -> KeyKind;

    fn key_type(&self) -> &'static str;

    /// Keys in no particular order.
    fn keys(&self) -> Vec<Key>;

    fn get(&self, key: &Key) -> Result<Option<&dyn Structural>, KeyMismatch>;

    /// Entry for `key`, inserting a zero value when absent.
    fn entry_mut(&mut self, key: &Key) -> Result<&mut dyn Structural, KeyMismatch>;
}

/// Primitive location.
pub trait ScalarSlot {
    fn assign(&mut self, scalar: &Scalar<'_>) -> Result<(), ScalarMismatch>;
}

/// Settable handle produced by path navigation.
///
/// `Direct` is a true mutable location. `Entry` is a mapping slot: it
/// carries the owning mapping and the key, and every write goes back into
/// the mapping under that key.
pub enum Slot<'a> {
    Direct(&'a mut dyn Structural),
    Entry {
        map: &'a mut dyn MappingAccess,
        key: Key,
    },
}

impl<'a> Slot<'a> {
    /// Mutable location behind the slot. For a mapping slot this inserts a
    /// zero entry if the key is absent, so subsequent writes land in the
    /// mapping.
    pub fn into_mut(self) -> Result<&'a mut dyn Structural, KeyMismatch> {
        match self {
            Slot::Direct(value) => Ok(value),
            Slot::Entry { map, key } => map.entry_mut(&key),
        }
    }
}
