// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use serde::{Deserialize, Serialize};

/// The payload type stored in every slot.
pub type Value = i64;

/// A strongly-typed index of a slot within an `IndexedList`.
///
/// Slot `0` is the sentinel: it anchors the live cycle and never holds user
/// data. A key is only meaningful for the list (and capacity) it came from;
/// the verifier reports keys pointing past the slot array as
/// `SlotOutOfBoundsError` instead of indexing out of range.
#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SlotKey(usize);

impl SlotKey {
    /// The reserved anchor slot.
    pub const SENTINEL: SlotKey = SlotKey(0);

    /// Returns the raw `usize` index of the slot.
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Creates a `SlotKey` from a raw index.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn is_sentinel(self) -> bool {
        self.0 == 0
    }
}

impl From<SlotKey> for usize {
    #[inline]
    fn from(val: SlotKey) -> Self {
        val.0
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SlotKey({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_zero() {
        assert_eq!(SlotKey::SENTINEL.get(), 0);
        assert!(SlotKey::SENTINEL.is_sentinel());
        assert!(!SlotKey::from_index(3).is_sentinel());
        assert_eq!(SlotKey::default(), SlotKey::SENTINEL);
    }

    #[test]
    fn test_display_and_conversion() {
        let key = SlotKey::from_index(7);
        assert_eq!(format!("{}", key), "SlotKey(7)");
        assert_eq!(usize::from(key), 7);
    }

    #[test]
    fn test_serializes_as_plain_index() {
        let json = serde_json::to_string(&SlotKey::from_index(5)).unwrap();
        assert_eq!(json, "5");
        let back: SlotKey = serde_json::from_str("5").unwrap();
        assert_eq!(back, SlotKey::from_index(5));
    }
}
