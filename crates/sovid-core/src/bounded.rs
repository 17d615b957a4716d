//! # Bounded Collections
//!
//! Sequence and string types with a hard upper bound fixed at the type
//! level. Exceeding the bound is a typed failure, never silent truncation
//! and never a panic.
//!
//! Deserialization enforces the same bound, so a snapshot can never
//! smuggle an over-capacity list back into the registry.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A bound was exceeded.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundError {
    /// A push or construction would exceed the sequence capacity.
    #[error("capacity {capacity} exceeded: attempted {attempted} elements")]
    Capacity {
        /// Declared capacity.
        capacity: usize,
        /// Length the operation would have produced.
        attempted: usize,
    },

    /// A string is longer than its declared maximum.
    #[error("length {actual} exceeds maximum {max}")]
    TooLong {
        /// Declared maximum, in Unicode scalar values.
        max: usize,
        /// Actual length, in Unicode scalar values.
        actual: usize,
    },
}

// ─── BoundedVec ──────────────────────────────────────────────────────

/// An insertion-ordered sequence holding at most `CAP` elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BoundedVec<T, const CAP: usize>(Vec<T>);

impl<T, const CAP: usize> BoundedVec<T, CAP> {
    /// Declared capacity.
    pub const CAPACITY: usize = CAP;

    /// Create an empty sequence.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Take ownership of `items`, rejecting more than `CAP` elements.
    pub fn try_from_vec(items: Vec<T>) -> Result<Self, BoundError> {
        if items.len() > CAP {
            return Err(BoundError::Capacity {
                capacity: CAP,
                attempted: items.len(),
            });
        }
        Ok(Self(items))
    }

    /// Append `item` at the end, rejecting the push if the sequence is full.
    pub fn try_push(&mut self, item: T) -> Result<(), BoundError> {
        if self.0.len() >= CAP {
            return Err(BoundError::Capacity {
                capacity: CAP,
                attempted: self.0.len() + 1,
            });
        }
        self.0.push(item);
        Ok(())
    }

    /// Whether no further element fits.
    pub fn is_full(&self) -> bool {
        self.0.len() >= CAP
    }

    /// Slots still free.
    pub fn remaining(&self) -> usize {
        CAP - self.0.len()
    }

    /// Consume into the inner vector.
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T, const CAP: usize> Default for BoundedVec<T, CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const CAP: usize> Deref for BoundedVec<T, CAP> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<'de, T: Deserialize<'de>, const CAP: usize> Deserialize<'de> for BoundedVec<T, CAP> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        Self::try_from_vec(items).map_err(serde::de::Error::custom)
    }
}

// ─── BoundedString ───────────────────────────────────────────────────

/// A UTF-8 string of at most `MAX` Unicode scalar values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BoundedString<const MAX: usize>(String);

impl<const MAX: usize> BoundedString<MAX> {
    /// Declared maximum length.
    pub const MAX_LEN: usize = MAX;

    /// Construct from `s`, rejecting strings longer than `MAX` chars.
    pub fn try_new(s: impl Into<String>) -> Result<Self, BoundError> {
        let s = s.into();
        let actual = s.chars().count();
        if actual > MAX {
            return Err(BoundError::TooLong { max: MAX, actual });
        }
        Ok(Self(s))
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<const MAX: usize> Deref for BoundedString<MAX> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl<const MAX: usize> fmt::Display for BoundedString<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de, const MAX: usize> Deserialize<'de> for BoundedString<MAX> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::try_new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut v: BoundedVec<u8, 3> = BoundedVec::new();
        for i in 0..3 {
            v.try_push(i).unwrap();
        }
        assert!(v.is_full());
        assert_eq!(v.remaining(), 0);
        assert_eq!(
            v.try_push(9),
            Err(BoundError::Capacity { capacity: 3, attempted: 4 })
        );
        assert_eq!(&*v, &[0, 1, 2]);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut v: BoundedVec<&str, 4> = BoundedVec::default();
        v.try_push("b").unwrap();
        v.try_push("a").unwrap();
        v.try_push("c").unwrap();
        assert_eq!(v.into_vec(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_try_from_vec_bound() {
        assert!(BoundedVec::<u8, 2>::try_from_vec(vec![1, 2]).is_ok());
        assert!(BoundedVec::<u8, 2>::try_from_vec(vec![1, 2, 3]).is_err());
    }

    #[test]
    fn test_deserialize_enforces_capacity() {
        assert!(serde_json::from_str::<BoundedVec<u8, 2>>("[1,2]").is_ok());
        assert!(serde_json::from_str::<BoundedVec<u8, 2>>("[1,2,3]").is_err());
    }

    #[test]
    fn test_string_bound_counts_chars() {
        assert!(BoundedString::<4>::try_new("abcd").is_ok());
        assert!(BoundedString::<4>::try_new("ééééé").is_err());
        // Four chars, eight bytes.
        assert!(BoundedString::<4>::try_new("éééé").is_ok());
        assert_eq!(
            BoundedString::<2>::try_new("abc"),
            Err(BoundError::TooLong { max: 2, actual: 3 })
        );
    }

    #[test]
    fn test_empty_string_allowed() {
        let s = BoundedString::<64>::try_new("").unwrap();
        assert_eq!(s.as_str(), "");
    }

    #[test]
    fn test_string_deserialize_enforces_bound() {
        assert!(serde_json::from_str::<BoundedString<3>>("\"abc\"").is_ok());
        assert!(serde_json::from_str::<BoundedString<3>>("\"abcd\"").is_err());
    }

    mod proptests {
        use proptest::prelude::*;

        use crate::bounded::{BoundedString, BoundedVec};

        proptest! {
            #[test]
            fn prop_len_never_exceeds_capacity(items in proptest::collection::vec(any::<u8>(), 0..20)) {
                let mut v: BoundedVec<u8, 10> = BoundedVec::new();
                let mut accepted = Vec::new();
                for item in &items {
                    if v.try_push(*item).is_ok() {
                        accepted.push(*item);
                    }
                }
                prop_assert!(v.len() <= 10);
                prop_assert_eq!(v.len(), items.len().min(10));
                prop_assert_eq!(v.into_vec(), accepted);
            }

            #[test]
            fn prop_string_bound_matches_char_count(s in "\\PC{0,80}") {
                let result = BoundedString::<64>::try_new(s.clone());
                prop_assert_eq!(result.is_ok(), s.chars().count() <= 64);
            }
        }
    }
}
