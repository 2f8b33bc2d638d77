//! Recursive structural conversion.
//!
//! The converter walks destination and source in lock-step. It dispatches
//! on the destination first (indirect references, then records) and
//! otherwise on the source, creating destination structure as needed.

use crate::config::Options;
use crate::error::ConvertError;
use crate::handle::{Scalar, Slot, Structural, View, ViewMut};
use crate::key::{Key, KeyKind};
use crate::navigate;
use crate::path::{Segment, render};

/// Deep-convert `src` into `dst` with default options.
///
/// On error the destination may be partially written.
pub fn convert(dst: &mut dyn Structural, src: &dyn Structural) -> Result<(), ConvertError> {
    Converter::new().convert(dst, src)
}

/// Reusable converter carrying its options and the current location.
#[derive(Debug, Default)]
pub struct Converter {
    options: Options,
    trail: Vec<Segment>,
    depth: usize,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options) -> Result<Self, ConvertError> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::default()
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn convert(
        &mut self,
        dst: &mut dyn Structural,
        src: &dyn Structural,
    ) -> Result<(), ConvertError> {
        self.trail.clear();
        self.depth = 0;

        tracing::debug!(
            dst = dst.type_name(),
            src = src.type_name(),
            "convert started"
        );
        let result = self.value(dst, src);
        match &result {
            Ok(()) => tracing::debug!("convert finished"),
            Err(e) => tracing::debug!(error = %e, "convert failed"),
        }
        result
    }

    fn location(&self) -> String {
        render(&self.trail)
    }

    fn value(&mut self, dst: &mut dyn Structural, src: &dyn Structural) -> Result<(), ConvertError> {
        if self.depth >= self.options.max_depth {
            return Err(ConvertError::DepthLimitExceeded {
                location: self.location(),
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;
        let result = self.dispatch(dst, src);
        self.depth -= 1;
        result
    }

    fn dispatch(&mut self, dst: &mut dyn Structural, src: &dyn Structural) -> Result<(), ConvertError> {
        match dst.view_mut() {
            ViewMut::Indirect(slot) => {
                if !slot.is_present() {
                    if matches!(src.view(), View::Indirect(None)) {
                        return Ok(());
                    }
                    tracing::trace!(location = %self.location(), "allocating indirect target");
                    slot.allocate();
                }
                return match slot.interior_mut() {
                    Some(inner) => self.value(inner, src),
                    None => Ok(()),
                };
            }
            ViewMut::Record(record) => {
                let schema = record.schema();
                for (index, field) in schema.fields.iter().enumerate() {
                    let Some(source) = navigate::resolve_at(src, field.path.segments(), &self.trail)?
                    else {
                        continue;
                    };
                    let Some(target) = record.field_mut(index) else {
                        continue;
                    };
                    self.trail.push(Segment::Key(Key::from(field.name)));
                    self.value(target, source)?;
                    self.trail.pop();
                }
                return Ok(());
            }
            _ => {}
        }

        let view = src.view();
        if let Some(kind) = synthetic_key_kind(&view) {
            prepare_open(dst, kind);
        }

        match view {
            View::Indirect(None) | View::Open(None) => {
                dst.set_zero();
                Ok(())
            }
            View::Indirect(Some(inner)) | View::Open(Some(inner)) => self.value(dst, inner),
            View::Record(record) => {
                let schema = record.schema();
                for (index, field) in schema.fields.iter().enumerate() {
                    if field.omit_empty && record.field_is_zero(index) {
                        continue;
                    }
                    let Some(source) = record.field(index) else {
                        continue;
                    };
                    self.write(dst, field.path.segments(), source)?;
                }
                Ok(())
            }
            View::Sequence(sequence) => {
                for index in (0..sequence.len()).rev() {
                    let Some(source) = sequence.element(index) else {
                        continue;
                    };
                    self.write(dst, &[Segment::Key(Key::from(index))], source)?;
                }
                Ok(())
            }
            View::Mapping(mapping) => {
                for key in mapping.keys() {
                    let Some(source) = mapping.get(&key).map_err(|e| e.at(self.location()))? else {
                        continue;
                    };
                    self.write(dst, &[Segment::Key(key)], source)?;
                }
                Ok(())
            }
            View::Scalar(scalar) => self.assign(dst, &scalar),
        }
    }

    /// Navigate-and-create `segments` inside `dst`, then convert `src` into
    /// the location found. Unreachable locations are skipped.
    fn write(
        &mut self,
        dst: &mut dyn Structural,
        segments: &[Segment],
        src: &dyn Structural,
    ) -> Result<(), ConvertError> {
        let max_len = self.options.max_sequence_len;
        let Some(slot) = navigate::locate_at(dst, segments, &self.trail, max_len)? else {
            return Ok(());
        };

        let mark = self.trail.len();
        self.trail.extend_from_slice(segments);
        let result = self.slot(slot, src);
        self.trail.truncate(mark);
        result
    }

    fn slot(&mut self, slot: Slot<'_>, src: &dyn Structural) -> Result<(), ConvertError> {
        let target = slot.into_mut().map_err(|e| e.at(self.location()))?;
        self.value(target, src)
    }

    fn assign(&mut self, dst: &mut dyn Structural, scalar: &Scalar<'_>) -> Result<(), ConvertError> {
        let type_name = dst.type_name();
        match dst.view_mut() {
            ViewMut::Scalar(slot) => slot.assign(scalar).map_err(|e| e.at(self.location())),
            ViewMut::Open(slot) => {
                slot.assign(scalar);
                Ok(())
            }
            _ => Err(scalar.mismatch(type_name).at(self.location())),
        }
    }
}

/// Key kind for a mapping manufactured in an absent open destination, chosen
/// from the source shape: strings for records, integers for sequences, the
/// source's own key kind for mappings.
fn synthetic_key_kind(source: &View<'_>) -> Option<KeyKind> {
    match source {
        View::Record(_) => Some(KeyKind::Str),
        View::Sequence(_) => Some(KeyKind::Int),
        View::Mapping(mapping) => Some(mapping.key_kind()),
        _ => None,
    }
}

fn prepare_open(dst: &mut dyn Structural, kind: KeyKind) {
    if let ViewMut::Open(slot) = dst.view_mut() {
        if slot.is_absent() {
            tracing::trace!(?kind, "manufacturing mapping in open value");
            slot.manufacture(kind);
        }
    }
}
