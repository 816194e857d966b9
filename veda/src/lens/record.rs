//! Records of lenses: one synthetic value assembled from several lenses over the same source.
//!
//! The lenses in a record must address disjoint parts of the source. This is not checked: with
//! overlapping lenses, `set` applies the fields left to right and later fields overwrite earlier
//! ones.
use crate::{Lens, LensError};
use std::collections::BTreeMap;

/// A tuple of lenses seen as one lens to the tuple of their targets. See [`relabel`].
#[derive(Copy, Clone, Debug)]
pub struct Relabel<Ls>(pub Ls);

macro_rules! impl_relabel_tuple {
    ($($L:ident $T:ident $i:tt),+) => {
        impl<S, $($T, $L: Lens<S, $T>),+> Lens<S, ($($T,)+)> for Relabel<($($L,)+)> {
            fn try_get(&self, source: &S) -> Result<($($T,)+), LensError> {
                Ok(($(self.0.$i.try_get(source)?,)+))
            }

            fn try_set(&self, source: S, value: ($($T,)+)) -> Result<S, LensError> {
                $(let source = self.0.$i.try_set(source, value.$i)?;)+
                Ok(source)
            }
        }
    };
}

impl_relabel_tuple!(L0 T0 0);
impl_relabel_tuple!(L0 T0 0, L1 T1 1);
impl_relabel_tuple!(L0 T0 0, L1 T1 1, L2 T2 2);
impl_relabel_tuple!(L0 T0 0, L1 T1 1, L2 T2 2, L3 T3 3);
impl_relabel_tuple!(L0 T0 0, L1 T1 1, L2 T2 2, L3 T3 3, L4 T4 4);
impl_relabel_tuple!(L0 T0 0, L1 T1 1, L2 T2 2, L3 T3 3, L4 T4 4, L5 T5 5);

/// Builds a lens to a tuple whose fields are read and written through each lens of `lenses`.
///
/// Compose with [`crate::lens::iso`] to get a named struct instead of a tuple.
pub fn relabel<Ls>(lenses: Ls) -> Relabel<Ls> {
    Relabel(lenses)
}

/// Named record of lenses sharing one target type. See [`relabel_map`].
pub struct RelabelMap<K, L> {
    fields: Vec<(K, L)>,
}

impl<K: Clone, L: Clone> Clone for RelabelMap<K, L> {
    fn clone(&self) -> Self {
        RelabelMap {
            fields: self.fields.clone(),
        }
    }
}

impl<S, T, K, L> Lens<S, BTreeMap<K, T>> for RelabelMap<K, L>
where
    K: Ord + Clone,
    L: Lens<S, T>,
{
    fn try_get(&self, source: &S) -> Result<BTreeMap<K, T>, LensError> {
        self.fields
            .iter()
            .map(|(name, lens)| Ok((name.clone(), lens.try_get(source)?)))
            .collect()
    }

    fn try_set(&self, mut source: S, mut value: BTreeMap<K, T>) -> Result<S, LensError> {
        for (name, lens) in self.fields.iter() {
            // fields absent from the value are left untouched
            if let Some(field) = value.remove(name) {
                source = lens.try_set(source, field)?;
            }
        }
        Ok(source)
    }
}

/// Builds a lens to a map whose entries are read and written through the given named lenses.
///
/// Use boxed lenses (`Box<dyn Lens<S, T>>`) to mix lenses of different types.
pub fn relabel_map<K: Ord, L>(fields: impl IntoIterator<Item = (K, L)>) -> RelabelMap<K, L> {
    RelabelMap {
        fields: fields.into_iter().collect(),
    }
}
