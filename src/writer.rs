use crate::trace::TraceEvent;
use anyhow::{Context, Result};
use brotli::enc::BrotliEncoderParams;
use brotli::CompressorWriter;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Version string written into trace headers.
pub const TRACE_FORMAT_VERSION: &str = "1.0";

/// Streams a memory-access trace to disk as JSON lines.
pub struct TraceWriter {
    writer: Box<dyn Write>,
    event_count: usize,
}

impl TraceWriter {
    /// Creates a new TraceWriter for the specified file path.
    ///
    /// Automatically enables Brotli compression if the file path ends with `.br`
    /// (e.g., `trace.jsonl.br`).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use rmemviz::TraceWriter;
    /// # fn main() -> anyhow::Result<()> {
    /// let mut writer = TraceWriter::new("trace.jsonl")?;
    /// writer.write_header(8)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(file_path: &str) -> Result<Self> {
        let file = File::create(file_path)
            .with_context(|| format!("Failed to create file: {}", file_path))?;

        let writer: Box<dyn Write> = if file_path.ends_with(".br") {
            let buf_writer = BufWriter::new(file);
            let params = BrotliEncoderParams {
                quality: 6,
                lgwin: 22,
                ..Default::default()
            };
            Box::new(CompressorWriter::with_params(buf_writer, 4096, &params))
        } else {
            Box::new(BufWriter::new(file))
        };

        Ok(Self::from_writer(writer))
    }

    /// Wraps an arbitrary sink (used by tests and in-memory exports).
    pub fn from_writer(writer: Box<dyn Write>) -> Self {
        TraceWriter {
            writer,
            event_count: 0,
        }
    }

    pub fn write_header(&mut self, pointer_size: i64) -> Result<()> {
        let header = serde_json::json!({
            "type": "header",
            "version": TRACE_FORMAT_VERSION,
            "pointer_size": pointer_size,
        });

        self.write_line(&header)
    }

    /// Writes one executed instruction.
    ///
    /// `in_filter` marks whether the event belongs to the filtered trace.
    pub fn write_event(&mut self, event: &TraceEvent, in_filter: bool) -> Result<()> {
        let mut value = serde_json::to_value(event)
            .context("Failed to serialize trace event")?;

        if let serde_json::Value::Object(map) = &mut value {
            map.insert("type".to_string(), serde_json::Value::String("event".to_string()));
            map.insert("filtered".to_string(), serde_json::Value::Bool(in_filter));
        }

        self.write_line(&value)?;
        self.event_count += 1;
        Ok(())
    }

    pub fn write_footer(&mut self) -> Result<()> {
        let footer = serde_json::json!({
            "type": "footer",
            "total_events": self.event_count,
        });

        self.write_line(&footer)
    }

    pub fn event_count(&self) -> usize {
        self.event_count
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .context("Failed to serialize to JSON")?;

        writeln!(self.writer, "{}", json)
            .context("Failed to write line")?;

        Ok(())
    }

    /// Flushes buffered output.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }
}

impl Drop for TraceWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
