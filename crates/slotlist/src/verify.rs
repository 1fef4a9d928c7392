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

//! Integrity checks over an immutable view of a slot array.
//!
//! Both walks are capped at `capacity + 2` steps and track visited slots in a
//! bitset, so a corrupted array yields an error instead of looping forever.

use crate::{
    err::{
        CorruptedCycleError, CorruptedFreePoolError, InvalidHandleError, LinkMismatchError,
        SizeOutOfRangeError, SlotConflictError, SlotOutOfBoundsError, VerifyError,
    },
    key::SlotKey,
    slot::Slot,
};
use fixedbitset::FixedBitSet;

const WALK_SLACK: usize = 2;

/// A borrowed picture of the state an `IndexedList` is made of.
#[derive(Debug, Clone, Copy)]
pub struct ArenaView<'a> {
    slots: &'a [Slot],
    free: SlotKey,
    len: usize,
    capacity: usize,
}

impl<'a> ArenaView<'a> {
    /// Wraps the raw parts of a list without checking them.
    #[inline]
    pub fn new(slots: &'a [Slot], free: SlotKey, len: usize, capacity: usize) -> Self {
        Self {
            slots,
            free,
            len,
            capacity,
        }
    }

    /// The slot array under inspection.
    #[inline]
    pub fn slots(&self) -> &'a [Slot] {
        self.slots
    }

    /// Recorded head of the free pool.
    #[inline]
    pub fn free(&self) -> SlotKey {
        self.free
    }

    /// Recorded number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the recorded length is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Recorded capacity, sentinel included.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Same as [`verify`].
    #[inline]
    pub fn verify(&self) -> Result<(), VerifyError> {
        verify(self)
    }

    #[inline]
    fn follow(&self, from: SlotKey, target: SlotKey) -> Result<&'a Slot, SlotOutOfBoundsError> {
        self.slots
            .get(target.get())
            .ok_or_else(|| SlotOutOfBoundsError::new(from, target.get(), self.capacity))
    }
}

/// Checks every structural invariant of the view and returns the first violation.
pub fn verify(view: &ArenaView<'_>) -> Result<(), VerifyError> {
    let capacity = view.capacity;
    if view.slots.is_empty() || view.slots.len() != capacity {
        return Err(InvalidHandleError::new(view.slots.len(), capacity).into());
    }
    if view.len >= capacity {
        return Err(SizeOutOfRangeError::new(view.len, capacity).into());
    }

    let max_steps = capacity + WALK_SLACK;
    let mut marks = FixedBitSet::with_capacity(capacity);
    check_live_cycle(view, max_steps, &mut marks)?;
    check_free_pool(view, max_steps, &mut marks)?;
    Ok(())
}

fn check_live_cycle(
    view: &ArenaView<'_>,
    max_steps: usize,
    marks: &mut FixedBitSet,
) -> Result<(), VerifyError> {
    let expected = view.len + 1;
    let mut current = SlotKey::SENTINEL;

    for step in 1..=max_steps {
        let next = view.slots[current.get()].next();
        let next_slot = view.follow(current, next)?;
        if next_slot.prev() != Some(current) {
            return Err(LinkMismatchError::new(current, next, next_slot.prev()).into());
        }
        if next.is_sentinel() {
            if step == expected {
                return Ok(());
            }
            return Err(CorruptedCycleError::new(expected, step).into());
        }
        // `put` reports whether the bit was already set.
        if step == expected || marks.put(next.get()) {
            return Err(CorruptedCycleError::new(expected, step).into());
        }
        current = next;
    }
    Err(CorruptedCycleError::new(expected, max_steps).into())
}

fn check_free_pool(
    view: &ArenaView<'_>,
    max_steps: usize,
    marks: &mut FixedBitSet,
) -> Result<(), VerifyError> {
    let expected = view.capacity - view.len - 1;
    let mut from = SlotKey::SENTINEL;
    let mut current = view.free;

    for walked in 0..=max_steps {
        if current.is_sentinel() {
            if walked == expected {
                return Ok(());
            }
            return Err(CorruptedFreePoolError::new(expected, walked).into());
        }
        let slot = view.follow(from, current)?;
        if !slot.is_free() {
            return Err(SlotConflictError::new(current).into());
        }
        if marks.contains(current.get()) {
            return Err(CorruptedFreePoolError::new(expected, walked + 1).into());
        }
        if walked == expected {
            return Err(CorruptedFreePoolError::new(expected, walked + 1).into());
        }
        marks.insert(current.get());
        from = current;
        current = slot.next();
    }
    Err(CorruptedFreePoolError::new(expected, max_steps).into())
}
