//! Append-only ordered sequences
//!
//! Comments and activity-log entries are never edited, removed or reordered
//! once recorded. [`Trail`] exposes read access and a single functional
//! append, so that rule holds by construction.

use im::Vector;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Immutable ordered sequence backed by a persistent vector
///
/// Appending returns a new trail that shares structure with the old one; the
/// original is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trail<T: Clone>(Vector<T>);

impl<T: Clone> Trail<T> {
    /// Empty trail
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Vector::new())
    }

    /// Trail holding a single item
    #[inline]
    #[must_use]
    pub fn single(item: T) -> Self {
        Self(Vector::unit(item))
    }

    /// New trail with `item` added at the end
    #[must_use]
    pub fn appended(&self, item: T) -> Self {
        let mut next = self.0.clone();
        next.push_back(item);
        Self(next)
    }

    /// Number of items
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing has been recorded yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Item at `index`
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.0.get(index)
    }

    /// First recorded item
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.0.front()
    }

    /// Most recently recorded item
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.0.back()
    }

    /// Iterate in recording order
    pub fn iter(&self) -> im::vector::Iter<'_, T> {
        self.0.iter()
    }
}

impl<T: Clone> Default for Trail<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> FromIterator<T> for Trail<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a, T: Clone> IntoIterator for &'a Trail<T> {
    type Item = &'a T;
    type IntoIter = im::vector::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: Clone + Serialize> Serialize for Trail<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de, T: Clone + Deserialize<'de>> Deserialize<'de> for Trail<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(|items| items.into_iter().collect())
    }
}
