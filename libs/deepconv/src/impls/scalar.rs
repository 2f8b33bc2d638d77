//! Primitive handles and the scalar assignment rules.
//!
//! Integers accept integers that fit and floats that are finite, integral and
//! in range. Floats accept any number. `bool` accepts only `bool`. `String`
//! accepts strings and chars; `char` accepts chars and one-character strings.

use crate::error::ScalarMismatch;
use crate::handle::{Scalar, ScalarSlot, Structural, View, ViewMut};

fn float_to_int<T: TryFrom<i128>>(x: f64) -> Option<T> {
    if !x.is_finite() || x.fract() != 0.0 {
        return None;
    }
    let n = x as i128;
    if n as f64 != x {
        return None;
    }
    T::try_from(n).ok()
}

macro_rules! int_scalar {
    ($variant:ident as $wide:ty: $($t:ty),*) => {$(
        impl Structural for $t {
            fn view(&self) -> View<'_> {
                View::Scalar(Scalar::$variant(*self as $wide))
            }

            fn view_mut(&mut self) -> ViewMut<'_> {
                ViewMut::Scalar(self)
            }

            fn set_zero(&mut self) {
                *self = 0;
            }
        }

        impl ScalarSlot for $t {
            fn assign(&mut self, scalar: &Scalar<'_>) -> Result<(), ScalarMismatch> {
                let converted = match *scalar {
                    Scalar::Int(i) => <$t>::try_from(i).ok(),
                    Scalar::UInt(u) => <$t>::try_from(u).ok(),
                    Scalar::Float(x) => float_to_int::<$t>(x),
                    _ => None,
                };
                *self = converted.ok_or_else(|| scalar.mismatch(stringify!($t)))?;
                Ok(())
            }
        }
    )*};
}

int_scalar!(Int as i64: i8, i16, i32, i64, isize);
int_scalar!(UInt as u64: u8, u16, u32, u64, usize);

macro_rules! float_scalar {
    ($($t:ty),*) => {$(
        impl Structural for $t {
            fn view(&self) -> View<'_> {
                View::Scalar(Scalar::Float(*self as f64))
            }

            fn view_mut(&mut self) -> ViewMut<'_> {
                ViewMut::Scalar(self)
            }

            fn set_zero(&mut self) {
                *self = 0.0;
            }
        }

        impl ScalarSlot for $t {
            fn assign(&mut self, scalar: &Scalar<'_>) -> Result<(), ScalarMismatch> {
                *self = match *scalar {
                    Scalar::Int(i) => i as $t,
                    Scalar::UInt(u) => u as $t,
                    Scalar::Float(x) => x as $t,
                    _ => return Err(scalar.mismatch(stringify!($t))),
                };
                Ok(())
            }
        }
    )*};
}

float_scalar!(f32, f64);

impl Structural for bool {
    fn view(&self) -> View<'_> {
        View::Scalar(Scalar::Bool(*self))
    }

    fn view_mut(&mut self) -> ViewMut<'_> {
        ViewMut::Scalar(self)
    }

    fn set_zero(&mut self) {
        *self = false;
    }
}

impl ScalarSlot for bool {
    fn assign(&mut self, scalar: &Scalar<'_>) -> Result<(), ScalarMismatch> {
        match *scalar {
            Scalar::Bool(b) => {
                *self = b;
                Ok(())
            }
            _ => Err(scalar.mismatch("bool")),
        }
    }
}

impl Structural for char {
    fn view(&self) -> View<'_> {
        View::Scalar(Scalar::Char(*self))
    }

    fn view_mut(&mut self) -> ViewMut<'_> {
        ViewMut::Scalar(self)
    }

    fn set_zero(&mut self) {
        *self = '\0';
    }
}

impl ScalarSlot for char {
    fn assign(&mut self, scalar: &Scalar<'_>) -> Result<(), ScalarMismatch> {
        let converted = match *scalar {
            Scalar::Char(c) => Some(c),
            Scalar::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
            _ => None,
        };
        *self = converted.ok_or_else(|| scalar.mismatch("char"))?;
        Ok(())
    }
}

impl Structural for String {
    fn view(&self) -> View<'_> {
        View::Scalar(Scalar::Str(self.as_str()))
    }

    fn view_mut(&mut self) -> ViewMut<'_> {
        ViewMut::Scalar(self)
    }

    fn set_zero(&mut self) {
        self.clear();
    }
}

impl ScalarSlot for String {
    fn assign(&mut self, scalar: &Scalar<'_>) -> Result<(), ScalarMismatch> {
        match *scalar {
            Scalar::Str(s) => {
                self.clear();
                self.push_str(s);
                Ok(())
            }
            Scalar::Char(c) => {
                self.clear();
                self.push(c);
                Ok(())
            }
            _ => Err(scalar.mismatch("String")),
        }
    }
}
