//! Open-addressing dictionary over the rows of a value
//!
//! A [`Dictionary`] hashes every element of an equality proxy and stores
//! element locations in a power-of-two table probed quadratically. Keys are
//! compared with missing values equal to each other, so `NA`s form one
//! group and `NaN`s another.
//!

mod ops;
pub use ops::*;

use tracing::trace;

use crate::equal::equal_scalar;
use crate::error::Error;
use crate::hash::hash_fill;
use crate::object::*;
use crate::proxy::vec_proxy_equal;
use crate::size::vec_size;

const LOAD_FACTOR: f64 = 0.77;
const MIN_SIZE: usize = 16;

#[derive(Debug, Clone)]
pub struct Dictionary {
    proxy: Value,
    hash: Vec<u32>,
    key: Vec<Option<usize>>,
    pub used: usize,
}

impl Dictionary {
    /// A dictionary with room for every element of `x`
    pub fn new(x: &Value) -> Result<Self, Error> {
        let proxy = vec_proxy_equal(x)?;
        let n = vec_size(&proxy)?;
        let size = ((n as f64 / LOAD_FACTOR).ceil() as usize)
            .next_power_of_two()
            .max(MIN_SIZE);

        trace!(n, size, "allocating dictionary");
        Dictionary::with_proxy(proxy, size)
    }

    /// Hashes of `x` without a key table, for probing another dictionary
    pub fn partial(x: &Value) -> Result<Self, Error> {
        Dictionary::with_proxy(vec_proxy_equal(x)?, 0)
    }

    fn with_proxy(proxy: Value, size: usize) -> Result<Self, Error> {
        let hash = hash_fill(&proxy)?;
        Ok(Dictionary {
            proxy,
            hash,
            key: vec![None; size],
            used: 0,
        })
    }

    /// Number of elements hashed
    pub fn len(&self) -> usize {
        self.hash.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hash.is_empty()
    }

    /// Number of slots in the key table
    pub fn size(&self) -> usize {
        self.key.len()
    }

    /// The location stored at a slot
    pub fn key(&self, slot: usize) -> Option<usize> {
        self.key.get(slot).copied().flatten()
    }

    /// Slot holding an element equal to element `i`, or the empty slot
    /// where it would be stored
    pub fn probe(&self, i: usize) -> Result<usize, Error> {
        self.probe_hash(self.hash[i], |k| equal_scalar(&self.proxy, k, &self.proxy, i, true))
    }

    /// Like [`Dictionary::probe`], for element `j` of another dictionary
    /// over a value of the same type
    pub fn probe_with(&self, other: &Dictionary, j: usize) -> Result<usize, Error> {
        self.probe_hash(other.hash[j], |k| equal_scalar(&self.proxy, k, &other.proxy, j, true))
    }

    /// Store location `i` at an empty slot
    pub fn put(&mut self, slot: usize, i: usize) {
        self.key[slot] = Some(i);
        self.used += 1;
    }

    fn probe_hash<F>(&self, hash: u32, mut equal: F) -> Result<usize, Error>
    where
        F: FnMut(usize) -> Result<Logical, Error>,
    {
        let size = self.size();
        if size == 0 {
            return Err(Error::DictionaryFull);
        }

        let mask = size - 1;
        let start = hash as usize & mask;
        let mut slot = start;

        for k in 0..2 * size {
            if k > 1 && slot == start {
                break;
            }

            match self.key[slot] {
                None => return Ok(slot),
                Some(loc) if self.hash[loc] == hash && equal(loc)? == OptionNA::Some(true) => {
                    return Ok(slot);
                }
                Some(_) => (),
            }

            // triangular steps visit every slot of a power-of-two table
            slot = (start + (k + 1) * (k + 2) / 2) & mask;
        }

        Err(Error::DictionaryFull)
    }
}
