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

use crate::key::SlotKey;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvalidConfigError {
    reason: &'static str,
}

impl InvalidConfigError {
    #[inline]
    pub fn new(reason: &'static str) -> Self {
        Self { reason }
    }

    #[inline]
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

impl std::fmt::Display for InvalidConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid list configuration: {}", self.reason)
    }
}

impl std::error::Error for InvalidConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionOutOfBoundsError {
    pos: usize,
    len: usize,
}

impl PositionOutOfBoundsError {
    #[inline]
    pub fn new(pos: usize, len: usize) -> Self {
        Self { pos, len }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }
}

impl std::fmt::Display for PositionOutOfBoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Position {} out of bounds (len = {})",
            self.pos, self.len
        )
    }
}

impl std::error::Error for PositionOutOfBoundsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnderflowError;

impl std::fmt::Display for UnderflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cannot remove from an empty list")
    }
}

impl std::error::Error for UnderflowError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllocationFailedError {
    requested_capacity: usize,
}

impl AllocationFailedError {
    #[inline]
    pub fn new(requested_capacity: usize) -> Self {
        Self { requested_capacity }
    }

    #[inline]
    pub fn requested_capacity(&self) -> usize {
        self.requested_capacity
    }
}

impl std::fmt::Display for AllocationFailedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to allocate a slot array of capacity {}",
            self.requested_capacity
        )
    }
}

impl std::error::Error for AllocationFailedError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidHandleError {
    slots: usize,
    capacity: usize,
}

impl InvalidHandleError {
    #[inline]
    pub fn new(slots: usize, capacity: usize) -> Self {
        Self { slots, capacity }
    }

    #[inline]
    pub fn slots(&self) -> usize {
        self.slots
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl std::fmt::Display for InvalidHandleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Slot array of length {} does not back a list of capacity {}",
            self.slots, self.capacity
        )
    }
}

impl std::error::Error for InvalidHandleError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SizeOutOfRangeError {
    len: usize,
    capacity: usize,
}

impl SizeOutOfRangeError {
    #[inline]
    pub fn new(len: usize, capacity: usize) -> Self {
        Self { len, capacity }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl std::fmt::Display for SizeOutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "List length {} does not fit into capacity {}",
            self.len, self.capacity
        )
    }
}

impl std::error::Error for SizeOutOfRangeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotOutOfBoundsError {
    from: SlotKey,
    target: usize,
    capacity: usize,
}

impl SlotOutOfBoundsError {
    #[inline]
    pub fn new(from: SlotKey, target: usize, capacity: usize) -> Self {
        Self {
            from,
            target,
            capacity,
        }
    }

    /// The slot holding the offending link. The free-pool head of the list
    /// itself is reported as coming from the sentinel.
    #[inline]
    pub fn from(&self) -> SlotKey {
        self.from
    }

    #[inline]
    pub fn target(&self) -> usize {
        self.target
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl std::fmt::Display for SlotOutOfBoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} links to slot {} out of bounds (capacity = {})",
            self.from, self.target, self.capacity
        )
    }
}

impl std::error::Error for SlotOutOfBoundsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorruptedCycleError {
    expected: usize,
    walked: usize,
}

impl CorruptedCycleError {
    #[inline]
    pub fn new(expected: usize, walked: usize) -> Self {
        Self { expected, walked }
    }

    /// Number of steps a healthy walk takes to return to the sentinel.
    #[inline]
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Number of steps walked before the corruption was detected.
    #[inline]
    pub fn walked(&self) -> usize {
        self.walked
    }
}

impl std::fmt::Display for CorruptedCycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Live cycle is corrupted: expected to return to the sentinel after {} steps, gave up after {}",
            self.expected, self.walked
        )
    }
}

impl std::error::Error for CorruptedCycleError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorruptedFreePoolError {
    expected: usize,
    walked: usize,
}

impl CorruptedFreePoolError {
    #[inline]
    pub fn new(expected: usize, walked: usize) -> Self {
        Self { expected, walked }
    }

    #[inline]
    pub fn expected(&self) -> usize {
        self.expected
    }

    #[inline]
    pub fn walked(&self) -> usize {
        self.walked
    }
}

impl std::fmt::Display for CorruptedFreePoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Free pool is corrupted: expected {} free slots, gave up after {}",
            self.expected, self.walked
        )
    }
}

impl std::error::Error for CorruptedFreePoolError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkMismatchError {
    slot: SlotKey,
    next: SlotKey,
    back_link: Option<SlotKey>,
}

impl LinkMismatchError {
    #[inline]
    pub fn new(slot: SlotKey, next: SlotKey, back_link: Option<SlotKey>) -> Self {
        Self {
            slot,
            next,
            back_link,
        }
    }

    #[inline]
    pub fn slot(&self) -> SlotKey {
        self.slot
    }

    #[inline]
    pub fn next(&self) -> SlotKey {
        self.next
    }

    /// What `next.prev` actually holds. `None` means `next` is tombstoned.
    #[inline]
    pub fn back_link(&self) -> Option<SlotKey> {
        self.back_link
    }
}

impl std::fmt::Display for LinkMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.back_link {
            Some(back) => write!(
                f,
                "{} links forward to {}, which links back to {}",
                self.slot, self.next, back
            ),
            None => write!(
                f,
                "{} links forward to {}, which is marked free",
                self.slot, self.next
            ),
        }
    }
}

impl std::error::Error for LinkMismatchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotConflictError {
    slot: SlotKey,
}

impl SlotConflictError {
    #[inline]
    pub fn new(slot: SlotKey) -> Self {
        Self { slot }
    }

    #[inline]
    pub fn slot(&self) -> SlotKey {
        self.slot
    }
}

impl std::fmt::Display for SlotConflictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is both live and free", self.slot)
    }
}

impl std::error::Error for SlotConflictError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerifyError {
    InvalidHandle(InvalidHandleError),
    SizeOutOfRange(SizeOutOfRangeError),
    SlotOutOfBounds(SlotOutOfBoundsError),
    CorruptedCycle(CorruptedCycleError),
    CorruptedFreePool(CorruptedFreePoolError),
    LinkMismatch(LinkMismatchError),
    SlotConflict(SlotConflictError),
}

impl std::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyError::InvalidHandle(e) => write!(f, "VerifyError: {}", e),
            VerifyError::SizeOutOfRange(e) => write!(f, "VerifyError: {}", e),
            VerifyError::SlotOutOfBounds(e) => write!(f, "VerifyError: {}", e),
            VerifyError::CorruptedCycle(e) => write!(f, "VerifyError: {}", e),
            VerifyError::CorruptedFreePool(e) => write!(f, "VerifyError: {}", e),
            VerifyError::LinkMismatch(e) => write!(f, "VerifyError: {}", e),
            VerifyError::SlotConflict(e) => write!(f, "VerifyError: {}", e),
        }
    }
}

impl std::error::Error for VerifyError {}

impl From<InvalidHandleError> for VerifyError {
    fn from(e: InvalidHandleError) -> Self {
        VerifyError::InvalidHandle(e)
    }
}

impl From<SizeOutOfRangeError> for VerifyError {
    fn from(e: SizeOutOfRangeError) -> Self {
        VerifyError::SizeOutOfRange(e)
    }
}

impl From<SlotOutOfBoundsError> for VerifyError {
    fn from(e: SlotOutOfBoundsError) -> Self {
        VerifyError::SlotOutOfBounds(e)
    }
}

impl From<CorruptedCycleError> for VerifyError {
    fn from(e: CorruptedCycleError) -> Self {
        VerifyError::CorruptedCycle(e)
    }
}

impl From<CorruptedFreePoolError> for VerifyError {
    fn from(e: CorruptedFreePoolError) -> Self {
        VerifyError::CorruptedFreePool(e)
    }
}

impl From<LinkMismatchError> for VerifyError {
    fn from(e: LinkMismatchError) -> Self {
        VerifyError::LinkMismatch(e)
    }
}

impl From<SlotConflictError> for VerifyError {
    fn from(e: SlotConflictError) -> Self {
        VerifyError::SlotConflict(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListError {
    InvalidConfig(InvalidConfigError),
    PositionOutOfBounds(PositionOutOfBoundsError),
    Underflow(UnderflowError),
    AllocationFailed(AllocationFailedError),
    Verify(VerifyError),
}

impl std::fmt::Display for ListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListError::InvalidConfig(e) => write!(f, "{}", e),
            ListError::PositionOutOfBounds(e) => write!(f, "{}", e),
            ListError::Underflow(e) => write!(f, "{}", e),
            ListError::AllocationFailed(e) => write!(f, "{}", e),
            ListError::Verify(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ListError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListError::Verify(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InvalidConfigError> for ListError {
    fn from(e: InvalidConfigError) -> Self {
        ListError::InvalidConfig(e)
    }
}

impl From<PositionOutOfBoundsError> for ListError {
    fn from(e: PositionOutOfBoundsError) -> Self {
        ListError::PositionOutOfBounds(e)
    }
}

impl From<UnderflowError> for ListError {
    fn from(e: UnderflowError) -> Self {
        ListError::Underflow(e)
    }
}

impl From<AllocationFailedError> for ListError {
    fn from(e: AllocationFailedError) -> Self {
        ListError::AllocationFailed(e)
    }
}

impl From<VerifyError> for ListError {
    fn from(e: VerifyError) -> Self {
        ListError::Verify(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = PositionOutOfBoundsError::new(5, 3);
        assert_eq!(format!("{}", e), "Position 5 out of bounds (len = 3)");
        assert_eq!(
            format!("{}", UnderflowError),
            "Cannot remove from an empty list"
        );
        let m = LinkMismatchError::new(SlotKey::from_index(1), SlotKey::from_index(2), None);
        assert_eq!(
            format!("{}", m),
            "SlotKey(1) links forward to SlotKey(2), which is marked free"
        );
    }

    #[test]
    fn test_verify_error_wraps_into_list_error() {
        let cycle = CorruptedCycleError::new(4, 6);
        let err: ListError = VerifyError::from(cycle).into();
        match &err {
            ListError::Verify(VerifyError::CorruptedCycle(e)) => {
                assert_eq!(e.expected(), 4);
                assert_eq!(e.walked(), 6);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(std::error::Error::source(&err).is_some());
        assert!(format!("{}", err).starts_with("VerifyError: Live cycle is corrupted"));
    }
}
