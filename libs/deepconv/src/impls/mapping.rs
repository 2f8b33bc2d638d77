use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::error::KeyMismatch;
use crate::handle::{MappingAccess, Structural, View, ViewMut};
use crate::key::{Key, KeyKind, MapKey};

fn convert_key<K: MapKey>(key: &Key) -> Result<K, KeyMismatch> {
    K::from_key(key).ok_or_else(|| KeyMismatch {
        key: key.clone(),
        key_type: std::any::type_name::<K>(),
    })
}

macro_rules! mapping {
    ($map:ident, $($bound:path),+) => {
        impl<K, V> Structural for $map<K, V>
        where
            K: MapKey $(+ $bound)+,
            V: Structural + Default,
        {
            fn view(&self) -> View<'_> {
                View::Mapping(self)
            }

            fn view_mut(&mut self) -> ViewMut<'_> {
                ViewMut::Mapping(self)
            }

            fn set_zero(&mut self) {
                self.clear();
            }
        }

        impl<K, V> MappingAccess for $map<K, V>
        where
            K: MapKey $(+ $bound)+,
            V: Structural + Default,
        {
            fn len(&self) -> usize {
                $map::len(self)
            }

            fn key_kind(&self) -> KeyKind {
                K::KIND
            }

            fn key_type(&self) -> &'static str {
                std::any::type_name::<K>()
            }

            fn keys(&self) -> Vec<Key> {
                $map::keys(self).map(MapKey::to_key).collect()
            }

            fn get(&self, key: &Key) -> Result<Option<&dyn Structural>, KeyMismatch> {
                let key = convert_key::<K>(key)?;
                Ok($map::get(self, &key).map(|v| v as &dyn Structural))
            }

            fn entry_mut(&mut self, key: &Key) -> Result<&mut dyn Structural, KeyMismatch> {
                let key = convert_key::<K>(key)?;
                Ok(self.entry(key).or_default() as &mut dyn Structural)
            }
        }
    };
}

mapping!(HashMap, Eq, Hash);
mapping!(BTreeMap, Ord);
