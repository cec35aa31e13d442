//! Instruction keywords
//!
//! Defines every structural keyword of the notation. Each backend declares
//! the subset it handles; anything else on a line's first token is either a
//! type keyword, an assignment or passes through untouched.

use std::fmt;

/// Structural keywords of the pseudo-instruction notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Declarations
    Arr,
    Struct,
    Init,
    Const,
    Delete,

    // Control flow
    For,
    While,
    If,
    Elif,
    Else,
    Switch,
    Case,
    Default,
    End,

    // Functions
    Fx,
    Vars,
    FxStart,
    Return,
    ReturnCode,

    // Input/output
    Print,
    Input,

    // Documentation
    Precond,
    Data,
    Datar,
    Result,
    Desc,
}

impl Keyword {
    /// Every keyword, in declaration order
    pub const ALL: &'static [Keyword] = &[
        Keyword::Arr,
        Keyword::Struct,
        Keyword::Init,
        Keyword::Const,
        Keyword::Delete,
        Keyword::For,
        Keyword::While,
        Keyword::If,
        Keyword::Elif,
        Keyword::Else,
        Keyword::Switch,
        Keyword::Case,
        Keyword::Default,
        Keyword::End,
        Keyword::Fx,
        Keyword::Vars,
        Keyword::FxStart,
        Keyword::Return,
        Keyword::ReturnCode,
        Keyword::Print,
        Keyword::Input,
        Keyword::Precond,
        Keyword::Data,
        Keyword::Datar,
        Keyword::Result,
        Keyword::Desc,
    ];

    /// Try to parse a string as a keyword
    pub fn from_str(s: &str) -> Option<Keyword> {
        match s {
            "arr" => Some(Keyword::Arr),
            "struct" => Some(Keyword::Struct),
            "init" => Some(Keyword::Init),
            "const" => Some(Keyword::Const),
            "delete" => Some(Keyword::Delete),

            "for" => Some(Keyword::For),
            "while" => Some(Keyword::While),
            "if" => Some(Keyword::If),
            "elif" => Some(Keyword::Elif),
            "else" => Some(Keyword::Else),
            "switch" => Some(Keyword::Switch),
            "case" => Some(Keyword::Case),
            "default" => Some(Keyword::Default),
            "end" => Some(Keyword::End),

            "fx" => Some(Keyword::Fx),
            "vars" => Some(Keyword::Vars),
            "fx_start" => Some(Keyword::FxStart),
            "return" => Some(Keyword::Return),
            "CODE_RETOUR" => Some(Keyword::ReturnCode),

            "print" => Some(Keyword::Print),
            "input" => Some(Keyword::Input),

            "precond" => Some(Keyword::Precond),
            "data" => Some(Keyword::Data),
            "datar" => Some(Keyword::Datar),
            "result" => Some(Keyword::Result),
            "desc" => Some(Keyword::Desc),

            _ => None,
        }
    }

    /// Source spelling of this keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Arr => "arr",
            Keyword::Struct => "struct",
            Keyword::Init => "init",
            Keyword::Const => "const",
            Keyword::Delete => "delete",
            Keyword::For => "for",
            Keyword::While => "while",
            Keyword::If => "if",
            Keyword::Elif => "elif",
            Keyword::Else => "else",
            Keyword::Switch => "switch",
            Keyword::Case => "case",
            Keyword::Default => "default",
            Keyword::End => "end",
            Keyword::Fx => "fx",
            Keyword::Vars => "vars",
            Keyword::FxStart => "fx_start",
            Keyword::Return => "return",
            Keyword::ReturnCode => "CODE_RETOUR",
            Keyword::Print => "print",
            Keyword::Input => "input",
            Keyword::Precond => "precond",
            Keyword::Data => "data",
            Keyword::Datar => "datar",
            Keyword::Result => "result",
            Keyword::Desc => "desc",
        }
    }

    /// Whether the line carrying this keyword is a block delimiter that sits
    /// one level shallower than the block body.
    ///
    /// `end` is not listed: its frame is already popped when the line is
    /// indented, which yields the opener's depth on its own.
    pub fn is_delimiter(&self) -> bool {
        matches!(
            self,
            Keyword::For
                | Keyword::While
                | Keyword::If
                | Keyword::Elif
                | Keyword::Else
                | Keyword::Switch
                | Keyword::Case
                | Keyword::Default
                | Keyword::Fx
                | Keyword::Vars
                | Keyword::FxStart
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
