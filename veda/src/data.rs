// Copyright 2019 The Druid Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Traits for handling value types.

use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    hash::{BuildHasher, Hash},
    ptr,
    rc::Rc,
    sync::Arc,
};

/// A value that can live in a store.
///
/// `same` is a cheap "nothing changed" test. It may return `false` for values that are equal
/// (e.g. two distinct `Rc`s holding equal contents), but must never return `true` for values that
/// differ.
///
/// Stores never use `same` to suppress notifications on their own; it is used where a value must
/// be told apart from a sentinel (see [`crate::lens::def`]) and by [`crate::Store::set_if_changed`].
pub trait Data: Clone + 'static {
    fn same(&self, other: &Self) -> bool;
}

/// An impl of `Data` suitable for simple types.
///
/// The `same` method is implemented with equality, so the type should
/// implement `Eq` at least.
macro_rules! impl_data_simple {
    ($($t:ty),* $(,)?) => {
        $(
            impl Data for $t {
                fn same(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_data_simple!(i8, i16, i32, i64, i128, isize);
impl_data_simple!(u8, u16, u32, u64, u128, usize);
impl_data_simple!(char, bool, String);
impl_data_simple!(std::path::PathBuf, std::time::Duration, std::time::Instant);

impl Data for &'static str {
    fn same(&self, other: &Self) -> bool {
        ptr::eq(*self, *other) || *self == *other
    }
}

impl Data for f32 {
    fn same(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Data for f64 {
    fn same(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Data for () {
    fn same(&self, _other: &Self) -> bool {
        true
    }
}

impl<T: ?Sized + 'static> Data for Rc<T> {
    fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized + 'static> Data for Arc<T> {
    fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: Data> Data for Option<T> {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Data, E: Data> Data for Result<T, E> {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Ok(a), Ok(b)) => a.same(b),
            (Err(a), Err(b)) => a.same(b),
            _ => false,
        }
    }
}

macro_rules! impl_data_tuple {
    ($($t:ident $i:tt),+) => {
        impl<$($t: Data),+> Data for ($($t,)+) {
            fn same(&self, other: &Self) -> bool {
                $(self.$i.same(&other.$i))&&+
            }
        }
    };
}

impl_data_tuple!(T0 0);
impl_data_tuple!(T0 0, T1 1);
impl_data_tuple!(T0 0, T1 1, T2 2);
impl_data_tuple!(T0 0, T1 1, T2 2, T3 3);
impl_data_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4);
impl_data_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);

impl<T: Data, const N: usize> Data for [T; N] {
    fn same(&self, other: &Self) -> bool {
        self.iter().zip(other.iter()).all(|(a, b)| a.same(b))
    }
}

impl<T: Data> Data for Vec<T> {
    fn same(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a.same(b))
    }
}

impl<T: Data> Data for VecDeque<T> {
    fn same(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a.same(b))
    }
}

impl<K: Data + Ord, V: Data> Data for BTreeMap<K, V> {
    fn same(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((ka, va), (kb, vb))| ka.same(kb) && va.same(vb))
    }
}

impl<K, V, H> Data for HashMap<K, V, H>
where
    K: Data + Eq + Hash,
    V: Data,
    H: BuildHasher + Clone + 'static,
{
    fn same(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |other| v.same(other)))
    }
}

#[cfg(feature = "imbl")]
mod imbl_impls {
    use super::Data;
    use std::hash::{BuildHasher, Hash};

    impl<T: Clone + 'static> Data for imbl::Vector<T> {
        fn same(&self, other: &Self) -> bool {
            self.ptr_eq(other)
        }
    }

    impl<K: Ord + Clone + 'static, V: Clone + 'static> Data for imbl::OrdMap<K, V> {
        fn same(&self, other: &Self) -> bool {
            self.ptr_eq(other)
        }
    }

    impl<K, V, H> Data for imbl::HashMap<K, V, H>
    where
        K: Hash + Eq + Clone + 'static,
        V: Clone + 'static,
        H: BuildHasher + Clone + 'static,
    {
        fn same(&self, other: &Self) -> bool {
            self.ptr_eq(other)
        }
    }
}
