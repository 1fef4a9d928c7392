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
    config::Provenance,
    err::{ListError, VerifyError},
    key::SlotKey,
    slot::Slot,
    verify::ArenaView,
};
use serde::{Deserialize, Serialize};

/// What a slot is used for at the time of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotRole {
    Sentinel,
    Live,
    Free,
}

/// An owned copy of everything a renderer needs to draw an `IndexedList`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticSnapshot {
    pub slots: Vec<Slot>,
    pub free: SlotKey,
    pub len: usize,
    pub capacity: usize,
    pub provenance: Option<Provenance>,
}

impl DiagnosticSnapshot {
    #[inline]
    pub fn view(&self) -> ArenaView<'_> {
        ArenaView::new(&self.slots, self.free, self.len, self.capacity)
    }

    #[inline]
    pub fn verify(&self) -> Result<(), VerifyError> {
        self.view().verify()
    }

    pub fn iter_slots(&self) -> impl Iterator<Item = (SlotKey, &Slot)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| (SlotKey::from_index(index), slot))
    }

    /// Classifies a slot by its tombstone; `None` for keys past the array.
    pub fn role_of(&self, key: SlotKey) -> Option<SlotRole> {
        let slot = self.slots.get(key.get())?;
        Some(if key.is_sentinel() {
            SlotRole::Sentinel
        } else if slot.is_free() {
            SlotRole::Free
        } else {
            SlotRole::Live
        })
    }
}

/// Receives snapshots from `IndexedList::dump_to`.
///
/// Implementations decide how to render or persist them; the list never
/// touches files or global state itself.
pub trait DiagnosticSink {
    fn record(&mut self, snapshot: &DiagnosticSnapshot, error: Option<&ListError>);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    #[inline]
    fn record(&mut self, snapshot: &DiagnosticSnapshot, error: Option<&ListError>) {
        (**self).record(snapshot, error)
    }
}

/// Emits snapshots as `tracing` events: a summary at `debug` (or `error` when
/// an error is attached) and one `trace` event per slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&mut self, snapshot: &DiagnosticSnapshot, error: Option<&ListError>) {
        let name = snapshot
            .provenance
            .as_ref()
            .map_or("<unnamed>", |p| p.name.as_str());
        match error {
            Some(e) => tracing::error!(
                list = name,
                len = snapshot.len,
                capacity = snapshot.capacity,
                free = snapshot.free.get(),
                error = %e,
                "list dump"
            ),
            None => tracing::debug!(
                list = name,
                len = snapshot.len,
                capacity = snapshot.capacity,
                free = snapshot.free.get(),
                "list dump"
            ),
        }
        for (key, slot) in snapshot.iter_slots() {
            tracing::trace!(
                slot = key.get(),
                data = slot.data(),
                next = slot.next().get(),
                prev = ?slot.prev().map(SlotKey::get),
                "slot"
            );
        }
    }
}

/// One accumulated report entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub sequence: usize,
    pub snapshot: DiagnosticSnapshot,
    pub error: Option<String>,
}

/// Keeps every dump in memory, numbered in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    entries: Vec<ReportEntry>,
}

impl RecordingSink {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&mut self, snapshot: &DiagnosticSnapshot, error: Option<&ListError>) {
        self.entries.push(ReportEntry {
            sequence: self.entries.len(),
            snapshot: snapshot.clone(),
            error: error.map(|e| e.to_string()),
        });
    }
}
