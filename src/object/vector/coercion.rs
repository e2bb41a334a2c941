use super::types::*;

/// Element-wise conversion between base element types
///
/// Returns the converted element together with a flag reporting whether the
/// conversion lost information. Missing values always convert to missing
/// values without loss.
///
pub trait CastInto<T> {
    fn cast_into(self) -> (T, bool);
}

macro_rules! register_identity {
    ( $($t:ty),* ) => {
        $(
            impl CastInto<$t> for $t {
                fn cast_into(self) -> ($t, bool) {
                    (self, false)
                }
            }
        )*
    };
}

register_identity!(Logical, Integer, Double, Complex);

impl CastInto<Integer> for Logical {
    fn cast_into(self) -> (Integer, bool) {
        (self.map(|x| x as i32), false)
    }
}

impl CastInto<Double> for Logical {
    fn cast_into(self) -> (Double, bool) {
        (self.map(|x| if x { 1.0 } else { 0.0 }), false)
    }
}

impl CastInto<Complex> for Logical {
    fn cast_into(self) -> (Complex, bool) {
        let (re, _) = CastInto::<Double>::cast_into(self);
        (complex_from(re), false)
    }
}

impl CastInto<Logical> for Integer {
    fn cast_into(self) -> (Logical, bool) {
        match self {
            OptionNA::NA => (OptionNA::NA, false),
            OptionNA::Some(x) => (OptionNA::Some(x != 0), x != 0 && x != 1),
        }
    }
}

impl CastInto<Double> for Integer {
    fn cast_into(self) -> (Double, bool) {
        (self.map(f64::from), false)
    }
}

impl CastInto<Complex> for Integer {
    fn cast_into(self) -> (Complex, bool) {
        (complex_from(self.map(f64::from)), false)
    }
}

impl CastInto<Logical> for Double {
    fn cast_into(self) -> (Logical, bool) {
        match self {
            OptionNA::Some(x) if !x.is_nan() => (OptionNA::Some(x != 0.0), x != 0.0 && x != 1.0),
            _ => (OptionNA::NA, false),
        }
    }
}

impl CastInto<Integer> for Double {
    fn cast_into(self) -> (Integer, bool) {
        match self {
            OptionNA::Some(x) if x.is_nan() => (OptionNA::NA, false),
            // i32::MIN is not representable, matching the range of R integers
            OptionNA::Some(x) if !x.is_finite() || x <= i32::MIN as f64 || x > i32::MAX as f64 => {
                (OptionNA::NA, true)
            }
            OptionNA::Some(x) => {
                let truncated = x.trunc();
                (OptionNA::Some(truncated as i32), truncated != x)
            }
            OptionNA::NA => (OptionNA::NA, false),
        }
    }
}

impl CastInto<Complex> for Double {
    fn cast_into(self) -> (Complex, bool) {
        (complex_from(self), false)
    }
}

impl CastInto<Double> for Complex {
    fn cast_into(self) -> (Double, bool) {
        let lossy = match (classify(&self.re), self.im) {
            (DoubleClass::Missing, OptionNA::NA) => false,
            (_, OptionNA::Some(im)) => im != 0.0,
            (_, OptionNA::NA) => true,
        };
        (self.re, lossy)
    }
}

impl CastInto<Integer> for Complex {
    fn cast_into(self) -> (Integer, bool) {
        let (re, lossy_re): (Double, bool) = self.cast_into();
        let (out, lossy_int) = re.cast_into();
        (out, lossy_re || lossy_int)
    }
}

impl CastInto<Logical> for Complex {
    fn cast_into(self) -> (Logical, bool) {
        let (re, lossy_re): (Double, bool) = self.cast_into();
        let (out, lossy_lgl) = re.cast_into();
        (out, lossy_re || lossy_lgl)
    }
}

fn complex_from(re: Double) -> Complex {
    match re {
        OptionNA::NA => Complex::default(),
        re => Complex {
            re,
            im: OptionNA::Some(0.0),
        },
    }
}

/// Convert a slice of elements, collecting 0-based lossy locations
pub fn cast_atoms<F, T>(x: &[F]) -> (Vec<T>, Vec<usize>)
where
    F: CastInto<T> + Clone,
{
    let mut lossy = vec![];
    let out = x
        .iter()
        .enumerate()
        .map(|(i, xi)| {
            let (value, is_lossy) = xi.clone().cast_into();
            if is_lossy {
                lossy.push(i);
            }
            value
        })
        .collect();

    (out, lossy)
}
