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

use crate::key::{SlotKey, Value};
use serde::{Deserialize, Serialize};

/// One cell of the slot array.
///
/// A slot is in exactly one of three states:
/// * the sentinel (index 0): `next`/`prev` point at the first/last live slot;
/// * live: `next`/`prev` thread the live cycle;
/// * free: `prev` is `None` and `next` threads the free pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    data: Value,
    next: SlotKey,
    prev: Option<SlotKey>,
}

impl Slot {
    #[inline]
    pub const fn new(data: Value, next: SlotKey, prev: Option<SlotKey>) -> Self {
        Self { data, next, prev }
    }

    /// A zeroed, tombstoned slot threaded to `next` in the free pool.
    #[inline]
    pub const fn free(next: SlotKey) -> Self {
        Self {
            data: 0,
            next,
            prev: None,
        }
    }

    #[inline]
    pub const fn data(&self) -> Value {
        self.data
    }

    #[inline]
    pub const fn next(&self) -> SlotKey {
        self.next
    }

    #[inline]
    pub const fn prev(&self) -> Option<SlotKey> {
        self.prev
    }

    #[inline]
    pub const fn is_free(&self) -> bool {
        self.prev.is_none()
    }

    #[inline]
    pub(crate) fn set_next(&mut self, next: SlotKey) {
        self.next = next;
    }

    #[inline]
    pub(crate) fn set_prev(&mut self, prev: SlotKey) {
        self.prev = Some(prev);
    }
}

/// Threads `slots[start..]` into a free chain in ascending order, ending in `tail`.
pub(crate) fn thread_free(slots: &mut [Slot], start: usize, tail: SlotKey) {
    let end = slots.len();
    for index in start..end {
        let next = if index + 1 < end {
            SlotKey::from_index(index + 1)
        } else {
            tail
        };
        slots[index] = Slot::free(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_slot_is_zeroed_and_tombstoned() {
        let s = Slot::free(SlotKey::from_index(3));
        assert_eq!(s.data(), 0);
        assert_eq!(s.next(), SlotKey::from_index(3));
        assert_eq!(s.prev(), None);
        assert!(s.is_free());
    }

    #[test]
    fn test_thread_free_chains_ascending_into_tail() {
        let mut slots = vec![Slot::new(9, SlotKey::SENTINEL, Some(SlotKey::SENTINEL)); 5];
        thread_free(&mut slots, 2, SlotKey::from_index(1));
        assert_eq!(slots[0].data(), 9);
        assert_eq!(slots[1].data(), 9);
        assert_eq!(slots[2], Slot::free(SlotKey::from_index(3)));
        assert_eq!(slots[3], Slot::free(SlotKey::from_index(4)));
        assert_eq!(slots[4], Slot::free(SlotKey::from_index(1)));
    }

    #[test]
    fn test_thread_free_empty_range_is_noop() {
        let mut slots = vec![Slot::free(SlotKey::SENTINEL); 2];
        thread_free(&mut slots, 2, SlotKey::from_index(1));
        assert_eq!(slots, vec![Slot::free(SlotKey::SENTINEL); 2]);
    }
}
