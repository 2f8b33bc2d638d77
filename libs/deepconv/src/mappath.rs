//! Map paths over open [`Value`] trees.
//!
//! A map path is a string of keys delimited by a separator, the separator
//! being the first character of the path. The empty string is a legal key,
//! so `/a/` addresses the empty key inside `a`, and `//a` differs from `/a`.

use std::collections::BTreeMap;
use std::fmt;

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappathReason {
    IndexOutOfRange,
    IndexNotInt,
    NotIndexable,
}

impl fmt::Display for MappathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MappathReason::IndexOutOfRange => "slice index out of range",
            MappathReason::IndexNotInt => "slice received non-int index",
            MappathReason::NotIndexable => "don't know how to index value",
        })
    }
}

/// Failure of [`set`]: `mappath` is the prefix leading to the object that
/// could not be indexed, `value` the key or object that triggered it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("mappath: {mappath}: {reason}: {value}")]
pub struct MappathError {
    pub mappath: String,
    pub reason: MappathReason,
    pub value: String,
}

/// Split a map path into its keys and separator. Empty input yields no keys
/// and an empty separator.
pub fn split(mappath: &str) -> (Vec<&str>, &str) {
    let mut chars = mappath.chars();
    match chars.next() {
        None => (Vec::new(), ""),
        Some(first) => {
            let (sep, rest) = mappath.split_at(first.len_utf8());
            (rest.split(sep).collect(), sep)
        }
    }
}

/// Inverse of [`split`]. The separator may be longer than one character.
pub fn join<S: AsRef<str>>(keys: &[S], sep: &str) -> String {
    let mut out = String::from(sep);
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(key.as_ref());
    }
    out
}

/// Value at `mappath`, or `None` if any step is missing. An empty path
/// returns `root` itself.
pub fn get<'a>(root: &'a Value, mappath: &str) -> Option<&'a Value> {
    let (keys, _) = split(mappath);
    let mut current = root;
    for key in keys {
        current = match current {
            Value::Object(map) => map.get(key)?,
            Value::Table(map) => map.get(&key.parse::<i64>().ok()?)?,
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Store `value` at `mappath`, creating missing intermediate objects.
///
/// Only objects are created; numeric keys never create arrays. Existing
/// intermediates are never replaced, and the target location is always
/// overwritten. An empty path is a no-op.
pub fn set(root: &mut Value, mappath: &str, value: Value) -> Result<(), MappathError> {
    let (keys, sep) = split(mappath);
    let Some(last) = keys.len().checked_sub(1) else {
        return Ok(());
    };

    let mut current = root;
    for (i, key) in keys.iter().enumerate() {
        let fill = if i == last {
            Value::Null
        } else {
            Value::Object(BTreeMap::new())
        };
        current = step(current, key, fill, || join(&keys[..i], sep))?;
    }
    *current = value;
    Ok(())
}

fn step<'a>(
    current: &'a mut Value,
    key: &str,
    fill: Value,
    prefix: impl Fn() -> String,
) -> Result<&'a mut Value, MappathError> {
    match current {
        Value::Object(map) => Ok(map.entry(key.to_string()).or_insert(fill)),
        Value::Table(map) => {
            let index = key.parse::<i64>().map_err(|_| MappathError {
                mappath: prefix(),
                reason: MappathReason::IndexNotInt,
                value: format!("{key:?}"),
            })?;
            Ok(map.entry(index).or_insert(fill))
        }
        Value::Array(items) => {
            let index = key.parse::<i64>().map_err(|_| MappathError {
                mappath: prefix(),
                reason: MappathReason::IndexNotInt,
                value: format!("{key:?}"),
            })?;
            let len = items.len();
            usize::try_from(index)
                .ok()
                .filter(|&i| i < len)
                .and_then(|i| items.get_mut(i))
                .ok_or_else(|| MappathError {
                    mappath: prefix(),
                    reason: MappathReason::IndexOutOfRange,
                    value: index.to_string(),
                })
        }
        other => Err(MappathError {
            mappath: prefix(),
            reason: MappathReason::NotIndexable,
            value: other.kind_name().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(entries: Vec<(&str, Value)>) -> Value {
        entries.into_iter().collect()
    }

    #[test]
    fn split_and_join() {
        assert_eq!(split(""), (vec![], ""));
        assert_eq!(split("/a/b"), (vec!["a", "b"], "/"));
        assert_eq!(split("/a/"), (vec!["a", ""], "/"));
        assert_eq!(split(".x"), (vec!["x"], "."));
        assert_eq!(join(&["a", "b"], "::"), "::a::b");
        assert_eq!(join::<&str>(&[], "/"), "/");
    }

    #[test]
    fn get_walks_objects_and_arrays() {
        let root = object(vec![(
            "a",
            Value::Array(vec![Value::Int(1), object(vec![("b", Value::from("x"))])]),
        )]);
        assert_eq!(get(&root, "/a/1/b"), Some(&Value::from("x")));
        assert_eq!(get(&root, "/a/0"), Some(&Value::Int(1)));
        assert_eq!(get(&root, "/a/2"), None);
        assert_eq!(get(&root, "/a/x"), None);
        assert_eq!(get(&root, "/a/0/z"), None);
        assert_eq!(get(&root, ""), Some(&root));
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let mut root = Value::Object(BTreeMap::new());
        set(&mut root, "/inlined/ClientId", Value::from("c1")).unwrap();
        set(&mut root, "/inlined/SyncNow", Value::Bool(true)).unwrap();
        set(&mut root, "/external/name", Value::from("n")).unwrap();

        assert_eq!(get(&root, "/inlined/ClientId"), Some(&Value::from("c1")));
        assert_eq!(get(&root, "/inlined/SyncNow"), Some(&Value::Bool(true)));
        assert_eq!(get(&root, "/external/name"), Some(&Value::from("n")));
    }

    #[test]
    fn set_never_creates_arrays() {
        let mut root = Value::Object(BTreeMap::new());
        set(&mut root, "/a/0", Value::Int(1)).unwrap();
        assert_eq!(root, object(vec![("a", object(vec![("0", Value::Int(1))]))]));
    }

    #[test]
    fn set_indexes_existing_arrays() {
        let mut root = object(vec![("a", Value::Array(vec![Value::Null, Value::Null]))]);
        set(&mut root, "/a/1", Value::Int(5)).unwrap();
        assert_eq!(get(&root, "/a/1"), Some(&Value::Int(5)));

        let err = set(&mut root, "/a/2", Value::Int(5)).unwrap_err();
        assert_eq!(err.reason, MappathReason::IndexOutOfRange);
        assert_eq!(err.mappath, "/a");
        assert_eq!(err.value, "2");

        let err = set(&mut root, "/a/x", Value::Int(5)).unwrap_err();
        assert_eq!(err.reason, MappathReason::IndexNotInt);
    }

    #[test]
    fn set_does_not_replace_scalar_intermediates() {
        let mut root = object(vec![("a", Value::Int(1))]);
        let err = set(&mut root, "/a/b", Value::Int(2)).unwrap_err();
        assert_eq!(err.reason, MappathReason::NotIndexable);
        assert_eq!(err.to_string(), "mappath: /a: don't know how to index value: integer");
        assert_eq!(root, object(vec![("a", Value::Int(1))]));
    }

    #[test]
    fn set_overwrites_target_and_ignores_empty_path() {
        let mut root = object(vec![("a", object(vec![("deep", Value::Int(1))]))]);
        set(&mut root, "/a", Value::Bool(false)).unwrap();
        assert_eq!(root, object(vec![("a", Value::Bool(false))]));

        let before = root.clone();
        set(&mut root, "", Value::Null).unwrap();
        assert_eq!(root, before);
    }
}
