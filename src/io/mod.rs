//! I/O modules: the trace-file backed host.

pub mod file_host;

pub use file_host::FileHost;
