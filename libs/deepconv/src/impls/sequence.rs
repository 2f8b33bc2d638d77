use std::collections::TryReserveError;

use crate::handle::{SequenceAccess, Structural, View, ViewMut};

impl<T: Structural + Default> Structural for Vec<T> {
    fn view(&self) -> View<'_> {
        View::Sequence(self)
    }

    fn view_mut(&mut self) -> ViewMut<'_> {
        ViewMut::Sequence(self)
    }

    fn set_zero(&mut self) {
        self.clear();
    }
}

impl<T: Structural + Default> SequenceAccess for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn element(&self, index: usize) -> Option<&dyn Structural> {
        self.get(index).map(|v| v as &dyn Structural)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Structural> {
        self.get_mut(index).map(|v| v as &mut dyn Structural)
    }

    fn is_growable(&self) -> bool {
        true
    }

    fn grow_to(&mut self, len: usize) -> Result<(), TryReserveError> {
        let current = Vec::len(self);
        if len > current {
            self.try_reserve(len - current)?;
            self.resize_with(len, T::default);
        }
        Ok(())
    }
}

impl<T: Structural + Default, const N: usize> Structural for [T; N] {
    fn view(&self) -> View<'_> {
        View::Sequence(self)
    }

    fn view_mut(&mut self) -> ViewMut<'_> {
        ViewMut::Sequence(self)
    }

    fn set_zero(&mut self) {
        for v in self.iter_mut() {
            *v = T::default();
        }
    }
}

impl<T: Structural + Default, const N: usize> SequenceAccess for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn element(&self, index: usize) -> Option<&dyn Structural> {
        self.get(index).map(|v| v as &dyn Structural)
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Structural> {
        self.get_mut(index).map(|v| v as &mut dyn Structural)
    }

    fn is_growable(&self) -> bool {
        false
    }

    fn grow_to(&mut self, _len: usize) -> Result<(), TryReserveError> {
        Ok(())
    }
}
