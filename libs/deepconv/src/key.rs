use std::fmt;

/// A single key addressing a child location: a record field or string-keyed
/// mapping entry, or a sequence index or integer-keyed mapping entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Str(String),
    Int(i64),
}

/// Key type of a mapping, used when an open value has to be turned into a
/// generic mapping before anything can be written into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Str,
    Int,
}

impl Key {
    pub fn kind(&self) -> KeyKind {
        match self {
            Key::Str(_) => KeyKind::Str,
            Key::Int(_) => KeyKind::Int,
        }
    }

    /// Sequence index for this key. Strings are parsed as decimal integers.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Int(i) => usize::try_from(*i).ok(),
            Key::Str(s) => s.parse::<usize>().ok(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            Key::Int(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(s) => f.write_str(s),
            Key::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        // Sequence lengths never exceed isize::MAX.
        Key::Int(i as i64)
    }
}

/// Types usable as mapping keys.
///
/// `from_key` returns `None` when the key cannot be represented, which the
/// converter reports as an inconvertible key.
pub trait MapKey: Sized {
    const KIND: KeyKind;

    fn from_key(key: &Key) -> Option<Self>;
    fn to_key(&self) -> Key;
}

impl MapKey for String {
    const KIND: KeyKind = KeyKind::Str;

    fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Str(s) => Some(s.clone()),
            Key::Int(i) => Some(i.to_string()),
        }
    }

    fn to_key(&self) -> Key {
        Key::Str(self.clone())
    }
}

macro_rules! int_map_key {
    ($($t:ty),*) => {$(
        impl MapKey for $t {
            const KIND: KeyKind = KeyKind::Int;

            fn from_key(key: &Key) -> Option<Self> {
                match key {
                    Key::Int(i) => <$t>::try_from(*i).ok(),
                    Key::Str(s) => s.parse::<$t>().ok(),
                }
            }

            fn to_key(&self) -> Key {
                // Keys wider than i64 keep their decimal text.
                match i64::try_from(*self) {
                    Ok(i) => Key::Int(i),
                    Err(_) => Key::Str(self.to_string()),
                }
            }
        }
    )*};
}

int_map_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
