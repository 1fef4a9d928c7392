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

//! A doubly linked list threaded through a flat slot array.
//!
//! Slot 0 of the array is a sentinel that anchors a circular live list.
//! Every other slot is either live or parked in a singly linked free pool
//! that shares the same array. Positional inserts pull from the pool and
//! removes push back onto it. The array doubles when the pool is about to
//! run dry and is linearized and halved once it is only a quarter full.
//!
//! ```
//! use slotlist::prelude::*;
//!
//! let mut list = IndexedList::new();
//! list.insert(0, 5)?;
//! list.insert(1, 10)?;
//! list.insert(1, 15)?;
//! assert_eq!(list.to_vec(), vec![5, 15, 10]);
//! assert_eq!(list.remove(0)?, 5);
//! assert!(list.verify().is_ok());
//! # Ok::<(), ListError>(())
//! ```

pub mod config;
pub mod diag;
pub mod err;
pub mod key;
pub mod list;
pub mod slot;
pub mod verify;

pub mod prelude {
    pub use crate::config::{ListConfig, Provenance};
    pub use crate::diag::{
        DiagnosticSink, DiagnosticSnapshot, RecordingSink, ReportEntry, SlotRole, TracingSink,
    };
    pub use crate::err::{ListError, VerifyError};
    pub use crate::key::{SlotKey, Value};
    pub use crate::list::{IndexedList, Keys};
    pub use crate::slot::Slot;
    pub use crate::verify::ArenaView;
}
