//! Output Emitter
//!
//! Abstraction for output production during printing.
//! Supports string building for in-memory rendering and streaming for file output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Spaces per indentation level.
pub const INDENT_WIDTH: usize = 2;

/// Trait for emitting printed output.
///
/// The printer writes to an emitter while walking a module. Different
/// implementations support in-memory strings, file output, or other
/// destinations.
pub trait Emitter {
    /// Emit a text fragment.
    fn emit(&mut self, text: &str);

    /// Emit a newline (Unix-style `\n`).
    fn emit_newline(&mut self);

    /// Emit indentation (two spaces per level).
    fn emit_indent(&mut self, level: usize);

    /// Emit a single space.
    fn emit_space(&mut self);
}

/// String-based emitter for in-memory rendering.
#[derive(Default)]
pub struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
        }
    }

    /// Get the printed output.
    pub fn output(self) -> String {
        self.buffer
    }

    /// Get the current buffer contents without consuming.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn emit_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn emit_indent(&mut self, level: usize) {
        for _ in 0..level * INDENT_WIDTH {
            self.buffer.push(' ');
        }
    }

    fn emit_space(&mut self) {
        self.buffer.push(' ');
    }
}

/// File-based emitter for streaming output to a file.
///
/// Write errors are latched: after the first failure further output is
/// dropped and the error is returned by [`finish`](Self::finish).
pub struct FileEmitter {
    writer: BufWriter<File>,
    error: Option<io::Error>,
}

impl FileEmitter {
    /// Create a new file emitter, truncating any existing file.
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            error: None,
        })
    }

    /// Flush buffered output and report the first write error, if any.
    pub fn finish(mut self) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()
    }

    fn write(&mut self, bytes: &[u8]) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.writer.write_all(bytes) {
            self.error = Some(err);
        }
    }
}

impl Emitter for FileEmitter {
    fn emit(&mut self, text: &str) {
        self.write(text.as_bytes());
    }

    fn emit_newline(&mut self) {
        self.write(b"\n");
    }

    fn emit_indent(&mut self, level: usize) {
        for _ in 0..level {
            self.write(b"  ");
        }
    }

    fn emit_space(&mut self) {
        self.write(b" ");
    }
}
