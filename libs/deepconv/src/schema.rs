use crate::path::Path;

/// A single field of a record.
///
/// `path` is used both to read the field from a source and to write it into
/// a destination. With `omit_empty` set, a zero-valued field is not written
/// when its record is the source.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: &'static str,
    pub path: Path,
    pub omit_empty: bool,
}

/// Runtime descriptor of a record type.
///
/// Built once per type by `#[derive(Convert)]` and cached in a static, so
/// path annotations are parsed only on first use. Field position in `fields`
/// is the index passed to `RecordAccess::field`.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub type_name: &'static str,
    pub fields: Vec<FieldSchema>,
}

impl RecordSchema {
    /// Build a schema from `(field name, annotation)` pairs in declaration order.
    pub fn new(type_name: &'static str, fields: &[(&'static str, Option<&'static str>)]) -> Self {
        let fields = fields
            .iter()
            .map(|&(name, annotation)| FieldSchema {
                name,
                path: Path::for_field(name, annotation),
                omit_empty: false,
            })
            .collect();
        Self { type_name, fields }
    }

    /// Mark the fields at `indices` as omitted when empty.
    pub fn omitting_empty(mut self, indices: &[usize]) -> Self {
        for &index in indices {
            if let Some(field) = self.fields.get_mut(index) {
                field.omit_empty = true;
            }
        }
        self
    }

    /// Position of the field with the given declared name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
