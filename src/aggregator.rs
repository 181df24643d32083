//! Trace → per-byte access history.
//!
//! Walks the trace in order and records, for every byte offset inside the
//! requested window, which instruction touched it, with what value and how
//! often. Later accesses overwrite earlier ones unless the keep-first policy
//! is active.

use crate::error::VisualizerError;
use crate::options::{AccessFilter, ByteOrder, FirstAccessPolicy, VisualizerOptions};
use crate::palette::ColorAllocator;
use crate::record::{AccessMap, AccessRecord};
use crate::trace::TraceEvent;
use log::{debug, info, warn};

/// Width used for `push`/`pop` when the host reports no pointer size.
pub const DEFAULT_POINTER_WIDTH: usize = 4;

/// What to do when the disassembly names no operand size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownWidthPolicy {
    /// Reuse the width of the previously processed access
    #[default]
    InheritLast,
    /// Ignore the access
    Skip,
}

/// Parameters of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationParams {
    pub base_address: u64,
    pub window_size: u64,
    pub byte_order: ByteOrder,
    pub access_filter: AccessFilter,
    pub first_access_policy: FirstAccessPolicy,
    pub unknown_width: UnknownWidthPolicy,
    /// Native pointer width of the traced process, as reported by the host
    pub pointer_size: i64,
    /// Seed for colors beyond the fixed palette; `None` seeds from entropy
    pub color_seed: Option<u64>,
}

impl Default for AggregationParams {
    fn default() -> Self {
        Self::from_options(&VisualizerOptions::default(), DEFAULT_POINTER_WIDTH as i64)
    }
}

impl AggregationParams {
    pub fn from_options(options: &VisualizerOptions, pointer_size: i64) -> Self {
        Self {
            base_address: options.base_address,
            window_size: options.window_size,
            byte_order: options.byte_order,
            access_filter: options.access_filter,
            first_access_policy: options.first_access_policy,
            unknown_width: UnknownWidthPolicy::InheritLast,
            pointer_size,
            color_seed: None,
        }
    }

    pub fn with_color_seed(mut self, seed: u64) -> Self {
        self.color_seed = Some(seed);
        self
    }

    /// Pointer width in bytes, falling back to [`DEFAULT_POINTER_WIDTH`]
    /// unless the reported size is within `1..=8`.
    pub fn pointer_width(&self) -> usize {
        match self.pointer_size {
            1..=8 => self.pointer_size as usize,
            _ => DEFAULT_POINTER_WIDTH,
        }
    }

    /// Offset of `address` inside the window `[base, base + size]`, if it lies there.
    pub fn offset_of(&self, address: u64) -> Option<u64> {
        let end = self.base_address.saturating_add(self.window_size);
        if address >= self.base_address && address <= end {
            Some(address - self.base_address)
        } else {
            None
        }
    }
}

/// Counters collected during one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationStats {
    pub events: usize,
    pub accesses_considered: usize,
    pub bytes_recorded: usize,
    pub conversion_failures: usize,
    pub unknown_widths: usize,
    pub distinct_instructions: usize,
}

/// Output of [`Aggregator::aggregate`].
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub records: AccessMap,
    pub stats: AggregationStats,
}

/// Infers the operand width from disassembly text.
///
/// Matching is by substring and in fixed precedence, so `movzx eax, byte ptr`
/// is one byte and `push qword ptr [rax]` is pointer-sized.
pub fn infer_width(disassembly: &str, pointer_width: usize) -> Option<usize> {
    let text = disassembly.to_lowercase();
    if text.contains("pop") || text.contains("push") {
        Some(pointer_width)
    } else if text.contains("qword") {
        Some(8)
    } else if text.contains("dword") {
        Some(4)
    } else if text.contains("word") {
        Some(2)
    } else if text.contains("byte") {
        Some(1)
    } else {
        None
    }
}

/// Splits `value` into `width` bytes in the given order.
///
/// Returns `None` when the value does not fit. Widths above 8 are zero-extended.
pub fn value_to_bytes(value: u64, width: usize, order: ByteOrder) -> Option<Vec<u8>> {
    if width < 8 && value >> (8 * width) != 0 {
        return None;
    }
    let mut bytes: Vec<u8> = (0..width)
        .map(|i| if i < 8 { (value >> (8 * i)) as u8 } else { 0 })
        .collect();
    if order == ByteOrder::Big {
        bytes.reverse();
    }
    Some(bytes)
}

/// Stateful aggregation pass.
///
/// Owns the color table and the inherited operand width, so two aggregators
/// never influence each other.
pub struct Aggregator {
    params: AggregationParams,
    colors: ColorAllocator,
    last_width: Option<usize>,
    records: AccessMap,
    stats: AggregationStats,
}

impl Aggregator {
    pub fn new(params: AggregationParams) -> Self {
        if params.pointer_size > 8 {
            warn!(
                "Pointer size {} is not supported, using {} bytes",
                params.pointer_size, DEFAULT_POINTER_WIDTH
            );
        }
        let colors = match params.color_seed {
            Some(seed) => ColorAllocator::with_seed(seed),
            None => ColorAllocator::from_entropy(),
        };
        Self {
            params,
            colors,
            last_width: None,
            records: AccessMap::new(),
            stats: AggregationStats::default(),
        }
    }

    /// Runs the pass over `trace`.
    ///
    /// An empty trace is an error; per-event conversion failures are logged and
    /// skipped.
    pub fn aggregate(mut self, trace: &[TraceEvent]) -> Result<Aggregation, VisualizerError> {
        if trace.is_empty() {
            return Err(VisualizerError::EmptyTrace);
        }

        for (row_index, event) in trace.iter().enumerate() {
            self.stats.events += 1;
            if let Err(e) = self.process_event(row_index, event) {
                warn!("Skipping rest of row {} ({}): {}", row_index, event.disassembly_text, e);
                self.stats.conversion_failures += 1;
            }
        }

        self.stats.distinct_instructions = self.colors.assigned_count();
        info!(
            "Aggregated {} events: {} bytes in window, {} distinct instructions, {} conversion failures",
            self.stats.events,
            self.records.len(),
            self.stats.distinct_instructions,
            self.stats.conversion_failures,
        );

        Ok(Aggregation {
            records: self.records,
            stats: self.stats,
        })
    }

    fn process_event(&mut self, row_index: usize, event: &TraceEvent) -> Result<(), VisualizerError> {
        let pointer_width = self.params.pointer_width();

        for access in &event.accesses {
            if self.params.access_filter == AccessFilter::ReadsOnly && !access.is_read() {
                continue;
            }
            self.stats.accesses_considered += 1;

            let width = match infer_width(&event.disassembly_text, pointer_width) {
                Some(w) => w,
                None => {
                    self.stats.unknown_widths += 1;
                    match (self.params.unknown_width, self.last_width) {
                        (UnknownWidthPolicy::InheritLast, Some(w)) => w,
                        _ => {
                            debug!("No operand width for '{}' at row {}", event.disassembly_text, row_index);
                            continue;
                        }
                    }
                }
            };
            self.last_width = Some(width);

            let bytes = value_to_bytes(access.value, width, self.params.byte_order).ok_or(
                VisualizerError::ByteConversion {
                    row_index,
                    value: access.value,
                    width,
                },
            )?;

            for (i, byte) in bytes.iter().enumerate() {
                let offset = match access
                    .address
                    .checked_add(i as u64)
                    .and_then(|addr| self.params.offset_of(addr))
                {
                    Some(offset) => offset,
                    None => continue,
                };
                self.record_byte(offset, i == 0, *byte, row_index, event);
            }
        }

        Ok(())
    }

    fn record_byte(&mut self, offset: u64, is_value_start: bool, byte_value: u8, row_index: usize, event: &TraceEvent) {
        if let Some(existing) = self.records.get_mut(offset) {
            existing.access_count = existing.access_count.saturating_add(1);
            if self.params.first_access_policy == FirstAccessPolicy::KeepFirst {
                return;
            }
            let color = self.colors.color_for(event.instruction_pointer);
            existing.instruction_pointer = event.instruction_pointer;
            existing.row_index = row_index;
            existing.row_id = event.row_id;
            existing.byte_value = byte_value;
            existing.color = color;
            existing.is_value_start = is_value_start;
        } else {
            let color = self.colors.color_for(event.instruction_pointer);
            self.records.insert(AccessRecord {
                offset,
                instruction_pointer: event.instruction_pointer,
                row_index,
                row_id: event.row_id,
                byte_value,
                access_count: 1,
                color,
                is_value_start,
            });
        }
        self.stats.bytes_recorded += 1;
    }
}

/// Convenience wrapper around [`Aggregator`] returning only the record map.
pub fn aggregate(trace: &[TraceEvent], params: &AggregationParams) -> Result<AccessMap, VisualizerError> {
    Aggregator::new(params.clone()).aggregate(trace).map(|a| a.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PALETTE;
    use crate::trace::MemoryAccess;
    use pretty_assertions::assert_eq;

    fn params(base: u64, size: u64) -> AggregationParams {
        AggregationParams {
            base_address: base,
            window_size: size,
            ..AggregationParams::default()
        }
        .with_color_seed(0)
    }

    #[test]
    fn test_infer_width_precedence() {
        assert_eq!(infer_width("push rbp", 8), Some(8));
        assert_eq!(infer_width("pop qword ptr [rax]", 8), Some(8));
        assert_eq!(infer_width("POP EBX", 0), Some(0));
        assert_eq!(infer_width("mov rax, qword ptr [rbp-8]", 8), Some(8));
        assert_eq!(infer_width("mov eax, dword ptr [rbx]", 8), Some(4));
        assert_eq!(infer_width("mov ax, word ptr [rbx]", 8), Some(2));
        assert_eq!(infer_width("movzx eax, byte ptr [rsi]", 8), Some(1));
        assert_eq!(infer_width("lea rax, [rbx]", 8), None);
    }

    #[test]
    fn test_pointer_width_default() {
        let mut p = AggregationParams::default();
        p.pointer_size = 0;
        assert_eq!(p.pointer_width(), DEFAULT_POINTER_WIDTH);
        p.pointer_size = -3;
        assert_eq!(p.pointer_width(), DEFAULT_POINTER_WIDTH);
        p.pointer_size = 8;
        assert_eq!(p.pointer_width(), 8);
        p.pointer_size = 9;
        assert_eq!(p.pointer_width(), DEFAULT_POINTER_WIDTH);
        p.pointer_size = 1 << 40;
        assert_eq!(p.pointer_width(), DEFAULT_POINTER_WIDTH);
    }

    #[test]
    fn test_oversized_pointer_falls_back() {
        let trace = vec![TraceEvent::new(0x1000, 0, "push rbp").with_access(MemoryAccess::read(0x2000, 0x1122_3344))];
        let mut p = params(0x2000, 16);
        p.pointer_size = 1 << 40;
        let map = aggregate(&trace, &p).unwrap();
        assert_eq!(map.len(), 4);
        assert_eq!(map.get(0).unwrap().byte_value, 0x44);
    }

    #[test]
    fn test_value_to_bytes_orders() {
        assert_eq!(value_to_bytes(0x1122_3344, 4, ByteOrder::Little), Some(vec![0x44, 0x33, 0x22, 0x11]));
        assert_eq!(value_to_bytes(0x1122_3344, 4, ByteOrder::Big), Some(vec![0x11, 0x22, 0x33, 0x44]));
        assert_eq!(value_to_bytes(0xAB, 1, ByteOrder::Big), Some(vec![0xAB]));
        assert_eq!(value_to_bytes(0x1_00, 1, ByteOrder::Little), None);
        assert_eq!(value_to_bytes(u64::MAX, 8, ByteOrder::Little), Some(vec![0xFF; 8]));
    }

    #[test]
    fn test_single_read_byte() {
        let trace = vec![TraceEvent::new(0x1000, 0, "mov byte ptr [rbx], al").with_access(MemoryAccess::read(0x2000, 0xAB))];
        let map = aggregate(&trace, &params(0x2000, 16)).unwrap();

        assert_eq!(map.len(), 1);
        let r = map.get(0).unwrap();
        assert_eq!(r.byte_value, 0xAB);
        assert_eq!(r.access_count, 1);
        assert!(r.is_value_start);
        assert_eq!(r.color, PALETTE[0]);
    }

    #[test]
    fn test_writes_filtered_by_default() {
        let trace = vec![TraceEvent::new(0x1000, 0, "mov dword ptr [rbx], eax").with_access(MemoryAccess::write(0x2000, 1))];
        let result = Aggregator::new(params(0x2000, 16)).aggregate(&trace).unwrap();
        assert!(result.records.is_empty());
        assert_eq!(result.stats.accesses_considered, 0);

        let mut all = params(0x2000, 16);
        all.access_filter = AccessFilter::All;
        assert_eq!(aggregate(&trace, &all).unwrap().len(), 4);
    }

    #[test]
    fn test_window_bounds_inclusive() {
        // dword straddling both window edges
        let trace = vec![
            TraceEvent::new(0x1000, 0, "mov eax, dword ptr [rbx]").with_access(MemoryAccess::read(0x1FFE, 0x4433_2211)),
            TraceEvent::new(0x1004, 1, "mov eax, dword ptr [rbx]").with_access(MemoryAccess::read(0x200F, 0x8877_6655)),
        ];
        let map = aggregate(&trace, &params(0x2000, 16)).unwrap();
        let offsets: Vec<u64> = map.iter().map(|r| r.offset).collect();
        assert_eq!(offsets, vec![0, 1, 15, 16]);
        assert_eq!(map.get(0).unwrap().byte_value, 0x33);
        assert!(!map.get(0).unwrap().is_value_start);
        assert!(map.get(15).unwrap().is_value_start);
        assert_eq!(map.get(16).unwrap().byte_value, 0x66);
    }

    #[test]
    fn test_keep_first_accumulates_count() {
        let trace = vec![
            TraceEvent::new(0x1000, 10, "movzx eax, byte ptr [rbx]").with_access(MemoryAccess::read(0x2000, 0x11)),
            TraceEvent::new(0x1000, 11, "movzx eax, byte ptr [rbx]").with_access(MemoryAccess::read(0x2000, 0x22)),
            TraceEvent::new(0x1000, 12, "movzx eax, byte ptr [rbx]").with_access(MemoryAccess::read(0x2000, 0x33)),
        ];
        let map = aggregate(&trace, &params(0x2000, 16)).unwrap();
        let r = map.get(0).unwrap();
        assert_eq!(r.byte_value, 0x11);
        assert_eq!(r.row_id, 10);
        assert_eq!(r.row_index, 0);
        assert_eq!(r.access_count, 3);
    }

    #[test]
    fn test_overwrite_replaces_and_recolors() {
        let mut p = params(0x2000, 16);
        p.first_access_policy = FirstAccessPolicy::Overwrite;
        let trace = vec![
            TraceEvent::new(0x1000, 0, "mov ax, word ptr [rbx]").with_access(MemoryAccess::read(0x2000, 0xBBAA)),
            TraceEvent::new(0x2000, 1, "movzx eax, byte ptr [rbx]").with_access(MemoryAccess::read(0x2001, 0xCC)),
        ];
        let map = aggregate(&trace, &p).unwrap();
        let r = map.get(1).unwrap();
        assert_eq!(r.byte_value, 0xCC);
        assert_eq!(r.instruction_pointer, 0x2000);
        assert_eq!(r.color, PALETTE[1]);
        assert_eq!(r.access_count, 2);
        assert!(r.is_value_start);
        assert_eq!(map.get(0).unwrap().color, PALETTE[0]);
    }

    #[test]
    fn test_conversion_failure_skips_event_only() {
        let trace = vec![
            TraceEvent::new(0x1000, 0, "movzx eax, byte ptr [rbx]")
                .with_access(MemoryAccess::read(0x2000, 0x1FF))
                .with_access(MemoryAccess::read(0x2001, 0x01)),
            TraceEvent::new(0x1004, 1, "movzx eax, byte ptr [rbx]").with_access(MemoryAccess::read(0x2002, 0x02)),
        ];
        let result = Aggregator::new(params(0x2000, 16)).aggregate(&trace).unwrap();
        assert_eq!(result.stats.conversion_failures, 1);
        assert!(!result.records.contains(0));
        assert!(!result.records.contains(1));
        assert_eq!(result.records.get(2).unwrap().byte_value, 0x02);
    }

    #[test]
    fn test_unknown_width_inherits_last() {
        let trace = vec![
            TraceEvent::new(0x1000, 0, "mov ax, word ptr [rbx]").with_access(MemoryAccess::read(0x2000, 0x0201)),
            TraceEvent::new(0x1004, 1, "cmpsb").with_access(MemoryAccess::read(0x2004, 0x0403)),
        ];
        let map = aggregate(&trace, &params(0x2000, 16)).unwrap();
        assert_eq!(map.get(4).unwrap().byte_value, 0x03);
        assert_eq!(map.get(5).unwrap().byte_value, 0x04);

        let mut skip = params(0x2000, 16);
        skip.unknown_width = UnknownWidthPolicy::Skip;
        let map = aggregate(&trace, &skip).unwrap();
        assert!(!map.contains(4));
    }

    #[test]
    fn test_unknown_width_without_history_is_skipped() {
        let trace = vec![TraceEvent::new(0x1000, 0, "lodsb").with_access(MemoryAccess::read(0x2000, 0x41))];
        let result = Aggregator::new(params(0x2000, 16)).aggregate(&trace).unwrap();
        assert!(result.records.is_empty());
        assert_eq!(result.stats.unknown_widths, 1);
    }

    #[test]
    fn test_empty_trace_is_error() {
        let err = aggregate(&[], &params(0, 16)).unwrap_err();
        assert!(matches!(err, VisualizerError::EmptyTrace));
    }

    #[test]
    fn test_address_near_u64_max() {
        let trace = vec![TraceEvent::new(0x1000, 0, "mov rax, qword ptr [rbx]").with_access(MemoryAccess::read(u64::MAX - 3, 0))];
        let map = aggregate(&trace, &params(u64::MAX - 3, 16)).unwrap();
        assert_eq!(map.len(), 4);
    }
}
