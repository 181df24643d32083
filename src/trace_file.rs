//! JSON-lines trace files.
//!
//! A file holds one header line, one line per executed instruction and an
//! optional footer:
//!
//! ```text
//! {"type":"header","version":"1.0","pointer_size":8}
//! {"type":"event","id":0,"ip":4198400,"disasm":"push rbp","mem":[...],"filtered":true}
//! {"type":"footer","total_events":1}
//! ```
//!
//! Files ending in `.br` are Brotli-compressed.

use crate::trace::TraceEvent;
use anyhow::{anyhow, bail, Context, Result};
use brotli::Decompressor;
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};

/// A fully loaded trace file.
#[derive(Debug, Clone, Default)]
pub struct TraceFile {
    pub version: String,
    /// Pointer width reported by the tracer; 0 when unknown
    pub pointer_size: i64,
    events: Vec<TraceEvent>,
    in_filter: Vec<bool>,
}

impl TraceFile {
    /// Builds a trace in memory; every event belongs to the filtered trace.
    pub fn from_events(pointer_size: i64, events: Vec<TraceEvent>) -> Self {
        let in_filter = vec![true; events.len()];
        Self {
            version: crate::writer::TRACE_FORMAT_VERSION.to_string(),
            pointer_size,
            events,
            in_filter,
        }
    }

    pub fn full_trace(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Events marked as part of the host's filtered view.
    pub fn filtered_trace(&self) -> Vec<TraceEvent> {
        self.events
            .iter()
            .zip(&self.in_filter)
            .filter(|(_, keep)| **keep)
            .map(|(event, _)| event.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn push(&mut self, event: TraceEvent, in_filter: bool) {
        self.events.push(event);
        self.in_filter.push(in_filter);
    }
}

/// Opens and parses a trace file.
pub fn read_trace_file(file_path: &str) -> Result<TraceFile> {
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open file: {}", file_path))?;

    let reader: Box<dyn Read> = if file_path.ends_with(".br") {
        Box::new(Decompressor::new(file, 4096))
    } else {
        Box::new(file)
    };

    let trace = parse_trace(reader)
        .with_context(|| format!("Failed to parse trace: {}", file_path))?;
    debug!("Loaded {} events from {}", trace.len(), file_path);
    Ok(trace)
}

/// Parses JSON-lines trace data from any reader.
pub fn parse_trace<R: Read>(reader: R) -> Result<TraceFile> {
    let reader = BufReader::new(reader);
    let mut trace = TraceFile::default();
    let mut saw_header = false;
    let mut declared_events: Option<usize> = None;

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result
            .with_context(|| format!("Failed to read line {}", line_num + 1))?;

        if line.trim().is_empty() {
            continue;
        }

        let value: serde_json::Value = serde_json::from_str(&line)
            .with_context(|| format!("Invalid JSON on line {}", line_num + 1))?;

        let line_type = value
            .get("type")
            .and_then(|t| t.as_str())
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("Missing 'type' on line {}", line_num + 1))?;

        match line_type.as_str() {
            "header" => {
                trace.version = value
                    .get("version")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                trace.pointer_size = value
                    .get("pointer_size")
                    .and_then(|v| v.as_i64())
                    .unwrap_or(0);
                saw_header = true;
            }
            "event" => {
                let in_filter = value
                    .get("filtered")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(true);
                let event: TraceEvent = serde_json::from_value(value)
                    .with_context(|| format!("Invalid event on line {}", line_num + 1))?;
                trace.push(event, in_filter);
            }
            "footer" => {
                declared_events = value
                    .get("total_events")
                    .and_then(|v| v.as_u64())
                    .map(|n| n as usize);
            }
            other => {
                warn!("Ignoring unknown line type '{}' on line {}", other, line_num + 1);
            }
        }
    }

    if !saw_header {
        bail!("Trace has no header line");
    }
    if let Some(expected) = declared_events {
        if expected != trace.len() {
            warn!("Footer declares {} events but {} were read", expected, trace.len());
        }
    }

    Ok(trace)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"type":"header","version":"1.0","pointer_size":8}
{"type":"event","id":0,"ip":4096,"disasm":"push rbp","mem":[{"access":"WRITE","addr":8192,"value":1}],"filtered":false}

{"type":"event","id":1,"ip":4100,"disasm":"mov eax, dword ptr [rbp-4]","mem":[{"access":"READ","addr":8188,"value":2}]}
{"type":"footer","total_events":2}
"#;

    #[test]
    fn test_parse_sample() {
        let trace = parse_trace(SAMPLE.as_bytes()).unwrap();
        assert_eq!(trace.version, "1.0");
        assert_eq!(trace.pointer_size, 8);
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.full_trace()[1].disassembly_text, "mov eax, dword ptr [rbp-4]");

        let filtered = trace.filtered_trace();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].row_id, 1);
    }

    #[test]
    fn test_missing_header_rejected() {
        let data = r#"{"type":"event","id":0,"ip":1,"disasm":"nop"}"#;
        assert!(parse_trace(data.as_bytes()).is_err());
    }

    #[test]
    fn test_bad_json_reports_line() {
        let data = "{\"type\":\"header\"}\nnot json\n";
        let err = parse_trace(data.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }
}
