//! Execution trace model.
//!
//! A trace is an ordered list of executed instructions, each carrying the
//! memory accesses it performed. Field names on the wire follow the host's
//! native shape (`ip`, `id`, `disasm`, `mem`).

use serde::{Deserialize, Serialize};

/// Type alias for trace row identifiers (stable, usable for navigation)
pub type RowId = u64;

/// Direction of a single memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessKind {
    Read,
    Write,
}

/// One memory access performed by an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryAccess {
    #[serde(rename = "addr")]
    pub address: u64,
    #[serde(rename = "access")]
    pub access_kind: AccessKind,
    /// Raw integer value read or written
    pub value: u64,
}

impl MemoryAccess {
    pub fn read(address: u64, value: u64) -> Self {
        Self { address, access_kind: AccessKind::Read, value }
    }

    pub fn write(address: u64, value: u64) -> Self {
        Self { address, access_kind: AccessKind::Write, value }
    }

    pub fn is_read(&self) -> bool {
        self.access_kind == AccessKind::Read
    }
}

/// One executed instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    #[serde(rename = "ip")]
    pub instruction_pointer: u64,
    #[serde(rename = "id")]
    pub row_id: RowId,
    /// Disassembly text, only used to infer operand width
    #[serde(rename = "disasm")]
    pub disassembly_text: String,
    #[serde(rename = "mem", default)]
    pub accesses: Vec<MemoryAccess>,
}

impl TraceEvent {
    pub fn new(instruction_pointer: u64, row_id: RowId, disassembly_text: impl Into<String>) -> Self {
        Self {
            instruction_pointer,
            row_id,
            disassembly_text: disassembly_text.into(),
            accesses: Vec::new(),
        }
    }

    /// Builder-style helper to append an access.
    pub fn with_access(mut self, access: MemoryAccess) -> Self {
        self.accesses.push(access);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_host_shape() {
        let json = r#"{"ip":4096,"id":7,"disasm":"mov eax, dword ptr [rbx]","mem":[{"access":"READ","addr":8192,"value":171}]}"#;
        let event: TraceEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.instruction_pointer, 0x1000);
        assert_eq!(event.row_id, 7);
        assert_eq!(event.accesses.len(), 1);
        assert!(event.accesses[0].is_read());
        assert_eq!(event.accesses[0].address, 0x2000);
        assert_eq!(event.accesses[0].value, 0xAB);
    }

    #[test]
    fn test_missing_mem_defaults_to_empty() {
        let json = r#"{"ip":1,"id":2,"disasm":"nop"}"#;
        let event: TraceEvent = serde_json::from_str(json).unwrap();
        assert!(event.accesses.is_empty());
    }

    #[test]
    fn test_write_kind_serializes_uppercase() {
        let access = MemoryAccess::write(0x10, 0xFF);
        let json = serde_json::to_string(&access).unwrap();
        assert!(json.contains("\"WRITE\""));
        assert!(json.contains("\"addr\":16"));
    }
}
