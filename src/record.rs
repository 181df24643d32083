//! Per-byte access records produced by the aggregator.

use crate::color::Rgb;
use crate::trace::RowId;
use std::collections::BTreeMap;
use std::fmt;

/// Access history of one byte offset inside the visualization window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRecord {
    /// Offset relative to the window's base address
    pub offset: u64,
    /// Instruction that performed the recorded access
    pub instruction_pointer: u64,
    /// Position of that instruction in the trace
    pub row_index: usize,
    pub row_id: RowId,
    pub byte_value: u8,
    /// Number of qualifying accesses observed for this offset
    pub access_count: u32,
    pub color: Rgb,
    /// True when this byte is byte 0 of a multi-byte value
    pub is_value_start: bool,
}

impl AccessRecord {
    /// Two upper-case hex digits of the byte.
    pub fn hex_text(&self) -> String {
        format!("{:02X}", self.byte_value)
    }

    /// The byte as a printable ASCII glyph, `.` otherwise.
    pub fn ascii_char(&self) -> char {
        match self.byte_value {
            b @ 0x20..=0x7E => b as char,
            _ => '.',
        }
    }
}

impl fmt::Display for AccessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "offset={:#x} ip={:#x} row={} id={} value={:#04x} count={} color={}",
            self.offset,
            self.instruction_pointer,
            self.row_index,
            self.row_id,
            self.byte_value,
            self.access_count,
            self.color,
        )?;
        if self.is_value_start {
            write!(f, " start")?;
        }
        Ok(())
    }
}

/// Sparse, offset-ordered map of access records.
///
/// Built once by the aggregator and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessMap {
    records: BTreeMap<u64, AccessRecord>,
}

impl AccessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, offset: u64) -> Option<&AccessRecord> {
        self.records.get(&offset)
    }

    pub fn contains(&self, offset: u64) -> bool {
        self.records.contains_key(&offset)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest populated offset, if any.
    pub fn max_offset(&self) -> Option<u64> {
        self.records.keys().next_back().copied()
    }

    /// Records in ascending offset order.
    pub fn iter(&self) -> impl Iterator<Item = &AccessRecord> {
        self.records.values()
    }

    pub(crate) fn get_mut(&mut self, offset: u64) -> Option<&mut AccessRecord> {
        self.records.get_mut(&offset)
    }

    pub(crate) fn insert(&mut self, record: AccessRecord) {
        self.records.insert(record.offset, record);
    }
}

impl FromIterator<AccessRecord> for AccessMap {
    fn from_iter<I: IntoIterator<Item = AccessRecord>>(iter: I) -> Self {
        let mut map = AccessMap::new();
        for record in iter {
            map.insert(record);
        }
        map
    }
}
