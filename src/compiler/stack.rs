//! Block stack
//!
//! Records open block constructs. Its depth drives indentation and its
//! frames decide which closing text an `end` produces.

use std::fmt;

/// One open block construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    For,
    While,
    If,
    Switch,
    Case,
    Default,
    /// Function with a return value
    Fx,
    /// Function returning `void`
    Proc,
    Struct,
    /// Local-variable section of a function, closed by `fx_start` or `end`
    Vars,
}

impl Frame {
    pub fn name(&self) -> &'static str {
        match self {
            Frame::For => "for",
            Frame::While => "while",
            Frame::If => "if",
            Frame::Switch => "switch",
            Frame::Case => "case",
            Frame::Default => "default",
            Frame::Fx => "fx",
            Frame::Proc => "proc",
            Frame::Struct => "struct",
            Frame::Vars => "vars",
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Frame::Fx | Frame::Proc)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An open frame and the line that opened it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFrame {
    pub frame: Frame,
    pub line: usize,
}

/// LIFO of open blocks
#[derive(Debug, Clone, Default)]
pub struct BlockStack {
    frames: Vec<OpenFrame>,
}

impl BlockStack {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn push(&mut self, frame: Frame, line: usize) {
        self.frames.push(OpenFrame { frame, line });
    }

    /// Pop the innermost frame, `None` on underflow
    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop().map(|open| open.frame)
    }

    pub fn top(&self) -> Option<Frame> {
        self.frames.last().map(|open| open.frame)
    }

    /// Innermost open frame with its opening line
    pub fn innermost(&self) -> Option<OpenFrame> {
        self.frames.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Whether `frame` is open anywhere in the stack
    pub fn contains(&self, frame: Frame) -> bool {
        self.frames.iter().any(|open| open.frame == frame)
    }

    /// Nearest enclosing `fx` or `proc` frame
    pub fn enclosing_function(&self) -> Option<Frame> {
        self.frames
            .iter()
            .rev()
            .map(|open| open.frame)
            .find(Frame::is_function)
    }

    pub fn in_function(&self) -> bool {
        self.enclosing_function().is_some()
    }
}
