use std::hash::{BuildHasher, Hash};

use ahash::RandomState;

use crate::error::Error;
use crate::object::*;
use crate::with_vector;

/// 32-bit element hashes consistent with equality under `na_equal`
///
/// Elements that compare equal with missing values considered equal always
/// hash identically. In particular `-0.0` and `0.0` share a hash, every `NaN`
/// shares a hash, and a missing double hashes apart from `NaN`.
///
pub trait ScalarHash {
    fn hash32(&self) -> u32;
}

thread_local! {
    // fixed seeds keep hashes stable across dictionaries
    static HASHER: RandomState = RandomState::with_seeds(
        0x243f_6a88_85a3_08d3,
        0x1319_8a2e_0370_7344,
        0xa409_3822_299f_31d0,
        0x082e_fa98_ec4e_6c89,
    );
}

fn hash_one<T: Hash>(x: T) -> u32 {
    HASHER.with(|h| h.hash_one(x)) as u32
}

pub fn hash_combine(x: u32, y: u32) -> u32 {
    x ^ (y
        .wrapping_add(0x9e3779b9)
        .wrapping_add(x << 6)
        .wrapping_add(x >> 2))
}

const NA_HASH: u32 = 0x7fff_ffff;
const NAN_HASH: u32 = 0x7ff8_0001;

impl ScalarHash for Logical {
    fn hash32(&self) -> u32 {
        match self {
            OptionNA::Some(x) => hash_one(x),
            OptionNA::NA => NA_HASH,
        }
    }
}

impl ScalarHash for Integer {
    fn hash32(&self) -> u32 {
        match self {
            OptionNA::Some(x) => hash_one(x),
            OptionNA::NA => NA_HASH,
        }
    }
}

impl ScalarHash for Double {
    fn hash32(&self) -> u32 {
        match self {
            OptionNA::NA => NA_HASH,
            OptionNA::Some(x) if x.is_nan() => NAN_HASH,
            OptionNA::Some(x) if *x == 0.0 => hash_one(0_u64),
            OptionNA::Some(x) => hash_one(x.to_bits()),
        }
    }
}

impl ScalarHash for Complex {
    fn hash32(&self) -> u32 {
        hash_combine(self.re.hash32(), self.im.hash32())
    }
}

impl ScalarHash for Character {
    fn hash32(&self) -> u32 {
        match self {
            OptionNA::Some(x) => hash_one(x.as_str()),
            OptionNA::NA => NA_HASH,
        }
    }
}

impl ScalarHash for Raw {
    fn hash32(&self) -> u32 {
        hash_one(self)
    }
}

impl ScalarHash for Value {
    fn hash32(&self) -> u32 {
        hash_object(self)
    }
}

/// Hash of a whole object, used for list elements
pub fn hash_object(x: &Value) -> u32 {
    match x {
        Value::Null => 0,
        Value::Unspecified(n) => hash_combine(NA_HASH, *n as u32),
        Value::Vector(v, _) => with_vector!(v, v => v
            .borrow()
            .iter()
            .fold(v.len() as u32, |acc, x| hash_combine(acc, x.hash32()))),
        Value::Table(t) => t
            .columns
            .iter()
            .fold(t.size() as u32, |acc, c| hash_combine(acc, hash_object(c))),
        Value::Extension(e) => hash_object(&e.data),
        Value::Scalar(r) => r
            .fields
            .iter()
            .fold(0, |acc, (_, f)| hash_combine(acc, hash_object(f))),
    }
}

/// Hash of the element at `i` of an equality proxy
pub fn hash_scalar(x: &Value, i: usize) -> Result<u32, Error> {
    match x {
        Value::Vector(v, _) => with_vector!(v, v => match v.borrow().get(i) {
            Some(x) => Ok(x.hash32()),
            None => crate::internal_err!("hash location out of bounds"),
        }),
        Value::Table(t) => t
            .columns
            .iter()
            .try_fold(0, |acc, c| Ok(hash_combine(acc, hash_scalar(c, i)?))),
        Value::Unspecified(_) => Ok(NA_HASH),
        Value::Scalar(r) => Error::ScalarIncomparable(format!("`{}` is a scalar record", r.class)).into(),
        _ => crate::internal_err!("hashing requires an equality proxy"),
    }
}

/// Hash every element of an equality proxy
pub fn hash_fill(x: &Value) -> Result<Vec<u32>, Error> {
    match x {
        Value::Vector(v, _) => Ok(with_vector!(v, v => v.borrow().iter().map(|x| x.hash32()).collect())),
        Value::Table(t) => {
            let mut out = vec![0; t.size()];
            for col in t.columns.iter() {
                for (o, h) in out.iter_mut().zip(hash_fill(col)?) {
                    *o = hash_combine(*o, h);
                }
            }
            Ok(out)
        }
        Value::Unspecified(n) => Ok(vec![NA_HASH; *n]),
        Value::Null => Ok(vec![]),
        Value::Scalar(r) => Error::ScalarIncomparable(format!("`{}` is a scalar record", r.class)).into(),
        Value::Extension(_) => crate::internal_err!("hashing requires an equality proxy"),
    }
}
