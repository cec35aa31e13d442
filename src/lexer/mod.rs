//! Lexer module
//!
//! Splits source lines into instructions. The notation has no quoting: a
//! line is cut on single spaces, the first token names the instruction and
//! the rest are its positional parameters.

pub mod param;
mod token;

pub use param::{decode_params, Param, ParamList, ParamType, ReturnType};
pub use token::Keyword;

/// One raw source line with its 1-based index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'src> {
    pub text: &'src str,
    pub index: usize,
}

impl<'src> SourceLine<'src> {
    pub fn new(text: &'src str, index: usize) -> Self {
        Self { text, index }
    }

    /// Tokenize this line into an instruction
    pub fn instruction(&self) -> Instruction<'src> {
        let mut tokens = tokenize(self.text);
        let name = if tokens.is_empty() { "" } else { tokens.remove(0) };
        Instruction {
            name,
            params: tokens,
            line: self.index,
        }
    }
}

/// A tokenized line: instruction name plus parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction<'src> {
    pub name: &'src str,
    pub params: Vec<&'src str>,
    /// 1-based source line
    pub line: usize,
}

impl<'src> Instruction<'src> {
    /// The name followed by the parameters
    pub fn tokens(&self) -> Vec<&'src str> {
        let mut tokens = Vec::with_capacity(self.params.len() + 1);
        tokens.push(self.name);
        tokens.extend_from_slice(&self.params);
        tokens
    }

    /// All parameters joined back with single spaces
    pub fn rest(&self) -> String {
        self.params.join(" ")
    }
}

/// Split a line on single spaces. Consecutive spaces yield empty tokens.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split(' ').collect()
}

/// Turn raw text lines into numbered source lines
pub fn source_lines<S: AsRef<str>>(lines: &[S]) -> Vec<SourceLine<'_>> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| SourceLine::new(line.as_ref().trim_end_matches('\r'), i + 1))
        .collect()
}
