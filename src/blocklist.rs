// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Tables of device registers which lower ELs must not access.

use crate::mmio::{REGISTER_SIZE, RegisterOffset};
use core::fmt::{self, Display, Formatter};

/// Why a register is blocked.
///
/// All reasons are enforced the same way; this only tells a reader of the log what was hit.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BlockReason {
    /// Scratch storage holding values that firmware relies on, e.g. across suspend.
    FirmwareScratch,
    /// A register reserved for EL3 or secure software.
    SecureOnly,
}

impl Display for BlockReason {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::FirmwareScratch => f.write_str("firmware scratch"),
            Self::SecureOnly => f.write_str("secure only"),
        }
    }
}

/// A closed range of byte offsets in a register window.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BlockedRange {
    /// The first blocked offset.
    pub first: usize,
    /// The last blocked offset, inclusive.
    pub last: usize,
    /// Why the registers are blocked.
    pub reason: BlockReason,
}

impl BlockedRange {
    /// Blocks the single register at `offset`.
    pub const fn register(offset: usize, reason: BlockReason) -> Self {
        Self {
            first: offset,
            last: offset,
            reason,
        }
    }

    /// Blocks the registers from `first` up to and including `last`.
    pub const fn span(first: usize, last: usize, reason: BlockReason) -> Self {
        Self {
            first,
            last,
            reason,
        }
    }

    /// Returns whether any byte of the register at `offset` falls in this range.
    pub const fn overlaps_register(&self, offset: usize) -> bool {
        offset <= self.last && offset + (REGISTER_SIZE - 1) >= self.first
    }
}

/// An immutable, ordered table of blocked register ranges.
#[derive(Copy, Clone, Debug)]
pub struct Blocklist {
    ranges: &'static [BlockedRange],
}

impl Blocklist {
    /// Creates a blocklist from ranges ordered by their first offset.
    pub const fn new(ranges: &'static [BlockedRange]) -> Self {
        Self { ranges }
    }

    /// Returns the blocked range the register at `offset` overlaps, if any.
    pub fn lookup(&self, offset: RegisterOffset) -> Option<&'static BlockedRange> {
        let offset = offset.get();
        self.ranges
            .iter()
            .take_while(|range| range.first < offset + REGISTER_SIZE)
            .find(|range| range.overlaps_register(offset))
    }

    /// Returns all blocked ranges.
    pub fn ranges(&self) -> &'static [BlockedRange] {
        self.ranges
    }

    /// Returns whether every range is word aligned, non-empty, inside a window of `window_size`
    /// bytes, and ordered by first offset.
    ///
    /// `lookup` relies on the ordering, so tables should check this at compile time.
    pub const fn is_well_formed(&self, window_size: usize) -> bool {
        let mut i = 0;
        while i < self.ranges.len() {
            let range = &self.ranges[i];
            if !range.first.is_multiple_of(REGISTER_SIZE)
                || !range.last.is_multiple_of(REGISTER_SIZE)
                || range.first > range.last
                || range.last >= window_size
            {
                return false;
            }
            if i > 0 && self.ranges[i - 1].first >= range.first {
                return false;
            }
            i += 1;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BLOCKLIST: Blocklist = Blocklist::new(&[
        BlockedRange::register(0x10, BlockReason::SecureOnly),
        BlockedRange::span(0x20, 0x28, BlockReason::FirmwareScratch),
    ]);

    fn offset(offset: u64) -> RegisterOffset {
        RegisterOffset::new(offset, 0x40).unwrap()
    }

    #[test]
    fn lookup_single_register() {
        assert_eq!(
            TEST_BLOCKLIST.lookup(offset(0x10)).map(|range| range.reason),
            Some(BlockReason::SecureOnly)
        );
        assert_eq!(TEST_BLOCKLIST.lookup(offset(0xc)), None);
        assert_eq!(TEST_BLOCKLIST.lookup(offset(0x14)), None);
    }

    #[test]
    fn lookup_span_is_inclusive() {
        for blocked in [0x20, 0x24, 0x28] {
            assert_eq!(
                TEST_BLOCKLIST.lookup(offset(blocked)),
                Some(&TEST_BLOCKLIST.ranges()[1])
            );
        }
        assert_eq!(TEST_BLOCKLIST.lookup(offset(0x1c)), None);
        assert_eq!(TEST_BLOCKLIST.lookup(offset(0x2c)), None);
    }

    #[test]
    fn overlap_covers_whole_register() {
        // A range starting in the middle of a register still blocks that register.
        let range = BlockedRange::span(0x22, 0x25, BlockReason::SecureOnly);
        assert!(!range.overlaps_register(0x1c));
        assert!(range.overlaps_register(0x20));
        assert!(range.overlaps_register(0x24));
        assert!(!range.overlaps_register(0x28));
    }

    #[test]
    fn well_formed() {
        assert!(TEST_BLOCKLIST.is_well_formed(0x40));
        assert!(!TEST_BLOCKLIST.is_well_formed(0x28));
        assert!(Blocklist::new(&[]).is_well_formed(0));
    }

    #[test]
    fn badly_formed() {
        const UNORDERED: Blocklist = Blocklist::new(&[
            BlockedRange::register(0x20, BlockReason::SecureOnly),
            BlockedRange::register(0x10, BlockReason::SecureOnly),
        ]);
        const MISALIGNED: Blocklist =
            Blocklist::new(&[BlockedRange::register(0x11, BlockReason::SecureOnly)]);
        const BACKWARDS: Blocklist =
            Blocklist::new(&[BlockedRange::span(0x20, 0x10, BlockReason::SecureOnly)]);

        assert!(!UNORDERED.is_well_formed(0x40));
        assert!(!MISALIGNED.is_well_formed(0x40));
        assert!(!BACKWARDS.is_well_formed(0x40));
    }
}
