//! Path navigation over value handles.
//!
//! Reading never creates anything: a missing step yields `None`. Writing
//! creates whatever is missing on the way (indirect targets, generic
//! mappings inside open values, sequence elements) and hands back a
//! settable [`Slot`].

use crate::config::Options;
use crate::error::ConvertError;
use crate::handle::{Kind, Slot, Structural, View, ViewMut};
use crate::key::{Key, KeyKind};
use crate::path::{Path, Segment, render};

/// Follow `path` from `root` for reading.
///
/// `Ok(None)` means the path leads nowhere: an absent reference or open
/// value, an out-of-range index, a missing mapping key, an unknown record
/// field, or an unreachable path.
pub fn resolve<'a>(
    root: &'a dyn Structural,
    path: &Path,
) -> Result<Option<&'a dyn Structural>, ConvertError> {
    resolve_at(root, path.segments(), &[])
}

/// Follow `path` from `root` for writing, creating missing intermediates.
///
/// `Ok(None)` means the location cannot exist: an unknown record field or
/// an unreachable path. Sequences are grown up to
/// [`Options::DEFAULT_MAX_SEQUENCE_LEN`] elements.
pub fn locate<'a>(
    root: &'a mut dyn Structural,
    path: &Path,
) -> Result<Option<Slot<'a>>, ConvertError> {
    locate_at(root, path.segments(), &[], Options::DEFAULT_MAX_SEQUENCE_LEN)
}

/// Location string for errors: `base` followed by the segments walked so far.
fn location(base: &[Segment], walked: &[Segment]) -> String {
    let mut all = Vec::with_capacity(base.len() + walked.len());
    all.extend_from_slice(base);
    all.extend_from_slice(walked);
    render(&all)
}

/// Strip indirect and open layers. `None` when a layer is absent.
fn dereference(mut current: &dyn Structural) -> Option<&dyn Structural> {
    loop {
        match current.view() {
            View::Indirect(inner) | View::Open(inner) => current = inner?,
            _ => return Some(current),
        }
    }
}

pub(crate) fn resolve_at<'a>(
    root: &'a dyn Structural,
    segments: &[Segment],
    base: &[Segment],
) -> Result<Option<&'a dyn Structural>, ConvertError> {
    let mut current = root;

    for (depth, segment) in segments.iter().enumerate() {
        let Segment::Key(key) = segment else {
            return Ok(None);
        };
        let Some(target) = dereference(current) else {
            return Ok(None);
        };

        let next = match target.view() {
            View::Record(record) => key
                .as_str()
                .and_then(|name| record.schema().position(name))
                .and_then(|index| record.field(index)),
            View::Sequence(sequence) => {
                let index = key
                    .as_index()
                    .ok_or_else(|| index_mismatch(key).at(location(base, &segments[..=depth])))?;
                sequence.element(index)
            }
            View::Mapping(mapping) => mapping
                .get(key)
                .map_err(|e| e.at(location(base, &segments[..=depth])))?,
            View::Scalar(_) => {
                return Err(ConvertError::Unaddressable {
                    location: location(base, &segments[..=depth]),
                    key: key.clone(),
                    type_name: target.type_name(),
                });
            }
            View::Indirect(_) | View::Open(_) => None,
        };

        match next {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }

    Ok(Some(current))
}

/// One layer of indirection for writing: allocates an absent indirect
/// target, or manufactures a mapping keyed by `kind` inside an absent open
/// value.
fn descend_mut(current: &mut dyn Structural, kind: KeyKind) -> Option<&mut dyn Structural> {
    match current.view_mut() {
        ViewMut::Indirect(slot) => {
            if !slot.is_present() {
                tracing::trace!("allocating indirect target");
                slot.allocate();
            }
            slot.interior_mut()
        }
        ViewMut::Open(slot) => {
            if slot.is_absent() {
                tracing::trace!(?kind, "manufacturing mapping in open value");
                slot.manufacture(kind);
            }
            slot.interior_mut()
        }
        _ => None,
    }
}

fn is_layer(value: &dyn Structural) -> bool {
    matches!(value.kind(), Kind::Absent | Kind::Indirect | Kind::Open)
}

pub(crate) fn locate_at<'a>(
    root: &'a mut dyn Structural,
    segments: &[Segment],
    base: &[Segment],
    max_len: usize,
) -> Result<Option<Slot<'a>>, ConvertError> {
    let mut slot = Slot::Direct(root);

    for (depth, segment) in segments.iter().enumerate() {
        let Segment::Key(key) = segment else {
            return Ok(None);
        };
        let here = || location(base, &segments[..=depth]);

        let mut current = slot.into_mut().map_err(|e| e.at(location(base, &segments[..depth])))?;
        while is_layer(current) {
            current = match descend_mut(current, key.kind()) {
                Some(inner) => inner,
                None => return Ok(None),
            };
        }

        let type_name = current.type_name();
        slot = match current.view_mut() {
            ViewMut::Record(record) => {
                let Some(index) = key.as_str().and_then(|name| record.schema().position(name))
                else {
                    return Ok(None);
                };
                match record.field_mut(index) {
                    Some(field) => Slot::Direct(field),
                    None => return Ok(None),
                }
            }
            ViewMut::Sequence(sequence) => {
                let index = key.as_index().ok_or_else(|| index_mismatch(key).at(here()))?;
                if index >= sequence.len() {
                    if !sequence.is_growable() {
                        return Err(ConvertError::SequenceOverflow {
                            location: here(),
                            index,
                            len: sequence.len(),
                            type_name,
                        });
                    }
                    if index >= max_len {
                        return Err(ConvertError::SequenceLimitExceeded {
                            location: here(),
                            index,
                            limit: max_len,
                        });
                    }
                    tracing::trace!(location = %here(), len = index + 1, "growing sequence");
                    sequence
                        .grow_to(index + 1)
                        .map_err(|source| ConvertError::AllocationFailed {
                            location: here(),
                            len: index + 1,
                            source,
                        })?;
                }
                let len = sequence.len();
                match sequence.element_mut(index) {
                    Some(element) => Slot::Direct(element),
                    None => {
                        return Err(ConvertError::SequenceOverflow {
                            location: here(),
                            index,
                            len,
                            type_name,
                        });
                    }
                }
            }
            ViewMut::Mapping(mapping) => {
                if let Err(e) = mapping.get(key) {
                    return Err(e.at(here()));
                }
                Slot::Entry {
                    map: mapping,
                    key: key.clone(),
                }
            }
            ViewMut::Scalar(_) | ViewMut::Indirect(_) | ViewMut::Open(_) => {
                return Err(ConvertError::Unaddressable {
                    location: here(),
                    key: key.clone(),
                    type_name,
                });
            }
        };
    }

    Ok(Some(slot))
}

fn index_mismatch(key: &Key) -> crate::error::KeyMismatch {
    crate::error::KeyMismatch {
        key: key.clone(),
        key_type: "usize",
    }
}
