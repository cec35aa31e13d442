//! Per-compilation state
//!
//! A fresh [`Context`] is built at the start of every `compile` call and
//! consumed by the backend's assembly step, so two compilations never
//! share a stack or a buffer.

use super::stack::{BlockStack, Frame};

/// Mutable state of one compilation
#[derive(Debug, Default)]
pub struct Context<S> {
    /// Open blocks
    pub stack: BlockStack,
    /// Frame popped by the line being processed, if it was an `end`
    pub closed: Option<Frame>,
    /// Output of the line being processed, one entry per emitted line
    current: Vec<String>,
    /// Finished top-level lines, in source order
    pub body: Vec<String>,
    /// Finished function and procedure definitions
    pub hoisted: Vec<String>,
    /// Backend-owned buffers
    pub state: S,
}

impl<S: Default> Context<S> {
    pub fn new() -> Self {
        Self {
            stack: BlockStack::new(),
            closed: None,
            current: Vec::new(),
            body: Vec::new(),
            hoisted: Vec::new(),
            state: S::default(),
        }
    }
}

impl<S> Context<S> {
    /// Start processing a line: its output defaults to the raw text
    pub fn begin_line(&mut self, text: &str) {
        self.closed = None;
        self.current.clear();
        self.current.push(text.to_string());
    }

    /// Replace the current line's output
    pub fn set_line(&mut self, text: impl Into<String>) {
        self.current.clear();
        self.current.push(text.into());
    }

    /// Append one more output line to the current line
    pub fn push_line(&mut self, text: impl Into<String>) {
        self.current.push(text.into());
    }

    /// Insert an output line before everything emitted so far for this line
    pub fn prepend_line(&mut self, text: impl Into<String>) {
        self.current.insert(0, text.into());
    }

    /// The current line emits nothing
    pub fn clear_line(&mut self) {
        self.current.clear();
    }

    pub fn current(&self) -> &[String] {
        &self.current
    }

    /// Take the current line's non-empty output
    pub fn take_line(&mut self) -> Vec<String> {
        std::mem::take(&mut self.current)
            .into_iter()
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// Whether finished lines go to the hoisted buffer: anything inside a
    /// function, plus the line that closes one
    pub fn relocating(&self) -> bool {
        self.stack.in_function() || self.closed.is_some_and(|frame| frame.is_function())
    }

    /// Store finalized lines in the main body or the hoisted buffer.
    /// Closing a function also appends an empty separator line.
    pub fn commit(&mut self, lines: Vec<String>) {
        if self.relocating() {
            self.hoisted.extend(lines);
            if self.closed.is_some_and(|frame| frame.is_function()) {
                self.hoisted.push(String::new());
            }
        } else {
            self.body.extend(lines);
        }
    }
}
