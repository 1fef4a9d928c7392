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

use crate::{
    config::{ListConfig, Provenance},
    diag::{DiagnosticSink, DiagnosticSnapshot},
    err::{
        AllocationFailedError, CorruptedFreePoolError, ListError, PositionOutOfBoundsError,
        UnderflowError, VerifyError,
    },
    key::{SlotKey, Value},
    slot::{Slot, thread_free},
    verify::ArenaView,
};
use std::iter::FusedIterator;

/// Walks the live cycle front to back (or back to front) yielding slot keys.
///
/// The walk is bounded by the list length, so it terminates even when the
/// links have been corrupted.
#[derive(Debug, Clone)]
pub struct Keys<'a> {
    slots: &'a [Slot],
    front: SlotKey,
    back: SlotKey,
    remaining: usize,
}

impl<'a> Keys<'a> {
    fn new(list: &'a IndexedList) -> Self {
        match list.slots.first() {
            Some(sentinel) => Self {
                slots: &list.slots,
                front: sentinel.next(),
                back: sentinel.prev().unwrap_or(SlotKey::SENTINEL),
                remaining: list.len,
            },
            None => Self {
                slots: &list.slots,
                front: SlotKey::SENTINEL,
                back: SlotKey::SENTINEL,
                remaining: 0,
            },
        }
    }
}

impl Iterator for Keys<'_> {
    type Item = SlotKey;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.front;
        let Some(slot) = self.slots.get(current.get()) else {
            self.remaining = 0;
            return None;
        };
        self.front = slot.next();
        self.remaining -= 1;
        Some(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Keys<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.back;
        let Some(slot) = self.slots.get(current.get()) else {
            self.remaining = 0;
            return None;
        };
        self.back = slot.prev().unwrap_or(SlotKey::SENTINEL);
        self.remaining -= 1;
        Some(current)
    }
}

impl ExactSizeIterator for Keys<'_> {}

impl FusedIterator for Keys<'_> {}

/// A doubly linked list threaded through one flat slot array.
///
/// Slot 0 is a sentinel anchoring the circular live list; every other slot is
/// either live or parked in a singly linked free pool headed by `free`.
/// Capacity doubles as soon as an insert would take the last free slot, not
/// once the pool is already empty, so the pool always holds at least one slot
/// between calls. It halves (after linearizing) when a remove leaves the list
/// a quarter full.
#[derive(Debug, Clone)]
pub struct IndexedList {
    slots: Vec<Slot>,
    free: SlotKey,
    len: usize,
    config: ListConfig,
    provenance: Option<Provenance>,
}

/// Reserves room for exactly `capacity` slots without touching any list.
#[inline]
fn alloc_slots(capacity: usize) -> Result<Vec<Slot>, AllocationFailedError> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|_| AllocationFailedError::new(capacity))?;
    Ok(slots)
}

/// Capacity after one doubling of `old`.
#[inline]
fn grown_capacity(old: usize) -> Result<usize, AllocationFailedError> {
    old.checked_mul(2)
        .ok_or(AllocationFailedError::new(usize::MAX))
}

impl IndexedList {
    #[inline(always)]
    fn at(&self, key: SlotKey) -> &Slot {
        &self.slots[key.get()]
    }

    #[inline(always)]
    fn at_mut(&mut self, key: SlotKey) -> &mut Slot {
        &mut self.slots[key.get()]
    }

    #[inline(always)]
    fn prev_of(&self, key: SlotKey) -> SlotKey {
        self.at(key).prev().unwrap_or(SlotKey::SENTINEL)
    }

    /// Creates an empty list with the default configuration.
    pub fn new() -> Self {
        let config = ListConfig::default();
        let capacity = config.initial_capacity();
        let mut list = Self::unlaid(config);
        list.relayout_into(Vec::with_capacity(capacity), capacity);
        list
    }

    /// Creates an empty list after validating `config`.
    pub fn with_config(config: ListConfig) -> Result<Self, ListError> {
        config.validate()?;
        let capacity = config.initial_capacity();
        let fresh = alloc_slots(capacity)?;
        let mut list = Self::unlaid(config);
        list.relayout_into(fresh, capacity);
        list.gate()?;
        Ok(list)
    }

    /// Builds a list holding `values` in order.
    pub fn from_values<I>(config: ListConfig, values: I) -> Result<Self, ListError>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut list = Self::with_config(config)?;
        for value in values {
            list.push_back(value)?;
        }
        Ok(list)
    }

    /// Attaches creation metadata shown in diagnostic dumps.
    #[inline]
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }

    fn unlaid(config: ListConfig) -> Self {
        Self {
            slots: Vec::new(),
            free: SlotKey::SENTINEL,
            len: 0,
            config,
            provenance: None,
        }
    }

    /// Verifies the list one last time and releases it.
    ///
    /// The slot array is freed whether or not verification passes.
    pub fn destroy(self) -> Result<(), ListError> {
        self.verify()?;
        Ok(())
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of slots, sentinel included.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Head of the free pool; the sentinel when the pool is exhausted.
    #[inline]
    pub fn free_head(&self) -> SlotKey {
        self.free
    }

    /// The configuration the list was built with.
    #[inline]
    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    /// Creation metadata, if any was attached.
    #[inline]
    pub fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    /// The raw slot array, sentinel at index 0.
    #[inline]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The slot behind `key`; `None` past the end of the array.
    #[inline]
    pub fn slot(&self, key: SlotKey) -> Option<&Slot> {
        self.slots.get(key.get())
    }

    /// Borrowed view of the state for the verifier.
    #[inline]
    pub fn view(&self) -> ArenaView<'_> {
        ArenaView::new(&self.slots, self.free, self.len, self.capacity())
    }

    /// Runs the full integrity check regardless of the configured policy.
    #[inline]
    pub fn verify(&self) -> Result<(), VerifyError> {
        self.view().verify()
    }

    fn gate(&self) -> Result<(), ListError> {
        if !self.config.verify_on_mutation() {
            return Ok(());
        }
        self.verify().map_err(|e| {
            tracing::error!(
                error = %e,
                len = self.len,
                capacity = self.capacity(),
                "list verification failed"
            );
            ListError::from(e)
        })
    }

    /// Slot at logical position `pos`; the sentinel for `pos == len`.
    ///
    /// Walks from whichever end of the cycle is nearer.
    fn key_at_raw(&self, pos: usize) -> SlotKey {
        debug_assert!(pos <= self.len);
        if pos <= self.len / 2 {
            let mut current = self.at(SlotKey::SENTINEL).next();
            for _ in 0..pos {
                current = self.at(current).next();
            }
            current
        } else {
            let mut current = SlotKey::SENTINEL;
            for _ in 0..self.len - pos {
                current = self.prev_of(current);
            }
            current
        }
    }

    /// Slot holding logical position `pos`; `None` when `pos >= len`.
    #[inline]
    pub fn key_at(&self, pos: usize) -> Option<SlotKey> {
        (pos < self.len).then(|| self.key_at_raw(pos))
    }

    /// Value at logical position `pos`.
    #[inline]
    pub fn get(&self, pos: usize) -> Option<Value> {
        self.key_at(pos).map(|key| self.at(key).data())
    }

    #[inline]
    pub fn front(&self) -> Option<Value> {
        self.get(0)
    }

    #[inline]
    pub fn back(&self) -> Option<Value> {
        self.len.checked_sub(1).and_then(|pos| self.get(pos))
    }

    /// Keys of the live slots in logical order.
    #[inline]
    pub fn keys(&self) -> Keys<'_> {
        Keys::new(self)
    }

    /// Values in logical order.
    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Value> + ExactSizeIterator + '_ {
        self.keys().map(move |key| self.at(key).data())
    }

    #[inline]
    pub fn to_vec(&self) -> Vec<Value> {
        self.iter().collect()
    }

    /// Whether logical element `k` sits in physical slot `k + 1` for every `k`.
    pub fn is_linear(&self) -> bool {
        self.keys()
            .enumerate()
            .all(|(index, key)| key.get() == index + 1)
    }

    /// Inserts `value` so that it ends up at logical position `pos`.
    ///
    /// `pos == len` appends and `pos == 0` prepends.
    pub fn insert(&mut self, pos: usize, value: Value) -> Result<(), ListError> {
        self.gate()?;
        if pos > self.len {
            return Err(PositionOutOfBoundsError::new(pos, self.len).into());
        }
        if self.len + 2 >= self.capacity() {
            self.grow()?;
        }

        let before = self.key_at_raw(pos);
        let key = self.pop_free()?;
        self.link_before(key, before, value);
        self.len += 1;

        tracing::trace!(pos, value, slot = key.get(), len = self.len, "insert");
        self.gate()
    }

    /// Removes the element at logical position `pos` and returns its value.
    pub fn remove(&mut self, pos: usize) -> Result<Value, ListError> {
        self.gate()?;
        if self.len == 0 {
            return Err(UnderflowError.into());
        }
        if pos >= self.len {
            return Err(PositionOutOfBoundsError::new(pos, self.len).into());
        }

        // The smaller array is reserved up front so a failed allocation
        // leaves the list untouched.
        let shrink = match self.shrink_target(self.len - 1) {
            Some(capacity) => Some((capacity, alloc_slots(capacity)?)),
            None => None,
        };

        let key = self.key_at_raw(pos);
        let value = self.unlink(key);
        self.len -= 1;
        tracing::trace!(pos, value, slot = key.get(), len = self.len, "remove");

        if let Some((capacity, fresh)) = shrink {
            tracing::debug!(
                from = self.capacity(),
                to = capacity,
                len = self.len,
                "linearize and shrink"
            );
            self.relayout_into(fresh, capacity);
        }

        self.gate()?;
        Ok(value)
    }

    #[inline]
    pub fn push_front(&mut self, value: Value) -> Result<(), ListError> {
        self.insert(0, value)
    }

    #[inline]
    pub fn push_back(&mut self, value: Value) -> Result<(), ListError> {
        self.insert(self.len, value)
    }

    #[inline]
    pub fn pop_front(&mut self) -> Result<Value, ListError> {
        self.remove(0)
    }

    #[inline]
    pub fn pop_back(&mut self) -> Result<Value, ListError> {
        self.remove(self.len.saturating_sub(1))
    }

    /// Rewrites the slot array so that logical element `k` lives in slot `k + 1`
    /// and the free pool runs through the tail in ascending order.
    #[tracing::instrument(level = "debug", name = "Linearize", skip(self))]
    pub fn linearize(&mut self) -> Result<(), ListError> {
        self.gate()?;
        let capacity = self.capacity();
        let fresh = alloc_slots(capacity)?;
        self.relayout_into(fresh, capacity);
        tracing::debug!(len = self.len, capacity, "linearized");
        self.gate()
    }

    /// Drops every element and returns to the initial capacity.
    pub fn clear(&mut self) -> Result<(), ListError> {
        self.gate()?;
        let capacity = self.config.initial_capacity();
        let fresh = alloc_slots(capacity)?;
        self.len = 0;
        self.relayout_into(fresh, capacity);
        self.gate()
    }

    /// Copies the whole state out for diagnostics.
    pub fn snapshot(&self) -> DiagnosticSnapshot {
        DiagnosticSnapshot {
            slots: self.slots.clone(),
            free: self.free,
            len: self.len,
            capacity: self.capacity(),
            provenance: self.provenance.clone(),
        }
    }

    /// Hands a snapshot, and the error that prompted it if any, to `sink`.
    pub fn dump_to<S>(&self, sink: &mut S, error: Option<&ListError>)
    where
        S: DiagnosticSink + ?Sized,
    {
        sink.record(&self.snapshot(), error);
    }

    /// Halved capacity to move to once a remove leaves `len_after` elements.
    ///
    /// The halved array must respect the minimum and still keep a free slot.
    fn shrink_target(&self, len_after: usize) -> Option<usize> {
        let capacity = self.capacity();
        let half = capacity / 2;
        (len_after == capacity / 4
            && half >= self.config.min_capacity()
            && len_after + 2 <= half)
            .then_some(half)
    }

    /// Doubles capacity and prepends the new slots to the free pool.
    #[inline]
    fn grow(&mut self) -> Result<(), AllocationFailedError> {
        self.extend_to(grown_capacity(self.capacity())?)
    }

    /// Appends slots up to `new` capacity, threading them onto the pool head.
    ///
    /// Nothing is touched unless the reservation succeeds.
    fn extend_to(&mut self, new: usize) -> Result<(), AllocationFailedError> {
        let old = self.capacity();
        debug_assert!(new > old);
        self.slots
            .try_reserve_exact(new - old)
            .map_err(|_| AllocationFailedError::new(new))?;

        self.slots.resize(new, Slot::free(SlotKey::SENTINEL));
        thread_free(&mut self.slots, old, self.free);
        self.free = SlotKey::from_index(old);

        tracing::debug!(from = old, to = new, len = self.len, "grow");
        Ok(())
    }

    fn pop_free(&mut self) -> Result<SlotKey, VerifyError> {
        let key = self.free;
        if key.is_sentinel() {
            let expected = self.capacity() - self.len - 1;
            return Err(CorruptedFreePoolError::new(expected, 0).into());
        }
        self.free = self.at(key).next();
        Ok(key)
    }

    fn link_before(&mut self, key: SlotKey, before: SlotKey, value: Value) {
        let after = self.prev_of(before);
        *self.at_mut(key) = Slot::new(value, before, Some(after));
        self.at_mut(after).set_next(key);
        self.at_mut(before).set_prev(key);
    }

    /// Splices `key` out of the live cycle, zeroes it and parks it on the pool.
    fn unlink(&mut self, key: SlotKey) -> Value {
        let slot = *self.at(key);
        let prev = slot.prev().unwrap_or(SlotKey::SENTINEL);
        let next = slot.next();
        self.at_mut(prev).set_next(next);
        self.at_mut(next).set_prev(prev);

        *self.at_mut(key) = Slot::free(self.free);
        self.free = key;
        slot.data()
    }

    /// Lays the live sequence out contiguously in `fresh`, sized to `capacity`,
    /// and swaps it in.
    fn relayout_into(&mut self, mut fresh: Vec<Slot>, capacity: usize) {
        let len = self.len;
        debug_assert!(capacity > len);

        fresh.clear();
        let first = if len > 0 { 1 } else { 0 };
        fresh.push(Slot::new(
            0,
            SlotKey::from_index(first),
            Some(SlotKey::from_index(len)),
        ));
        fresh.extend(self.iter().enumerate().map(|(offset, value)| {
            let index = offset + 1;
            let next = if index < len { index + 1 } else { 0 };
            Slot::new(
                value,
                SlotKey::from_index(next),
                Some(SlotKey::from_index(index - 1)),
            )
        }));
        fresh.resize(capacity, Slot::free(SlotKey::SENTINEL));
        thread_free(&mut fresh, len + 1, SlotKey::SENTINEL);

        self.free = if len + 1 < capacity {
            SlotKey::from_index(len + 1)
        } else {
            SlotKey::SENTINEL
        };
        self.slots = fresh;
    }
}

impl Default for IndexedList {
    fn default() -> Self {
        Self::new()
    }
}
