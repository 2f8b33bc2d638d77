use crate::handle::{IndirectSlot, Structural, View, ViewMut};

impl<T: Structural + Default> Structural for Option<T> {
    fn view(&self) -> View<'_> {
        View::Indirect(self.as_ref().map(|v| v as &dyn Structural))
    }

    fn view_mut(&mut self) -> ViewMut<'_> {
        ViewMut::Indirect(self)
    }

    fn set_zero(&mut self) {
        *self = None;
    }
}

impl<T: Structural + Default> IndirectSlot for Option<T> {
    fn is_present(&self) -> bool {
        self.is_some()
    }

    fn allocate(&mut self) {
        if self.is_none() {
            *self = Some(T::default());
        }
    }

    fn interior_mut(&mut self) -> Option<&mut dyn Structural> {
        self.as_mut().map(|v| v as &mut dyn Structural)
    }
}

/// A `Box` is an indirect reference that is always present.
impl<T: Structural + Default> Structural for Box<T> {
    fn view(&self) -> View<'_> {
        View::Indirect(Some(&**self as &dyn Structural))
    }

    fn view_mut(&mut self) -> ViewMut<'_> {
        ViewMut::Indirect(self)
    }

    fn set_zero(&mut self) {
        **self = T::default();
    }
}

impl<T: Structural + Default> IndirectSlot for Box<T> {
    fn is_present(&self) -> bool {
        true
    }

    fn allocate(&mut self) {}

    fn interior_mut(&mut self) -> Option<&mut dyn Structural> {
        Some(&mut **self as &mut dyn Structural)
    }
}
