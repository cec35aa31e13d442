//! Code generation backends
//!
//! Every backend implements [`CodeGenerator`]: it declares the structural
//! keywords it handles and renders each instruction into the current line,
//! then finalizes lines and assembles the output. The dispatcher in
//! [`crate::compiler`] drives the calls.

mod algorithmic;
mod cpp;
mod types;

pub use algorithmic::AlgorithmicGenerator;
pub use cpp::CppGenerator;
pub use types::TypeTable;

use std::fmt;
use std::str::FromStr;

use crate::compiler::{self, Context, Resolution};
use crate::errors::{CompileError, CompileResult};
use crate::lexer::{Instruction, Keyword};

/// Sentinel written in source for an end of line inside a printed value
pub const END_OF_LINE: &str = "(ENDL)";

/// Trait for code generators
pub trait CodeGenerator {
    /// Backend buffers living for one compilation
    type State: Default;

    /// Get the name of the target language
    fn language_name(&self) -> &'static str;

    /// Get the file extension for the target language
    fn file_extension(&self) -> &'static str;

    /// Structural keywords this backend handles
    fn keywords(&self) -> &'static [Keyword];

    /// Primitive type keywords and their spelling in the target
    fn types(&self) -> &TypeTable;

    /// Name of the synthesized program entry point, if the target has one
    fn entry_point(&self) -> Option<&'static str> {
        None
    }

    /// Whether a first token declares variables (`int`, `char*`, ...)
    fn is_type_keyword(&self, name: &str) -> bool {
        let base = name.trim_end_matches('*');
        !base.is_empty() && self.types().contains(base)
    }

    /// Render a structural instruction. Block-stack effects have already
    /// been applied by the dispatcher.
    fn instruction(
        &self,
        keyword: Keyword,
        ins: &Instruction<'_>,
        ctx: &mut Context<Self::State>,
    ) -> CompileResult<()>;

    /// Render `type name [name...]` or `type name = value...`
    fn define_var(
        &self,
        tokens: &[&str],
        line: usize,
        ctx: &mut Context<Self::State>,
    ) -> CompileResult<()>;

    /// Render `name op value...` where `op` is `=` or a compound operator
    fn var_assignation(
        &self,
        tokens: &[&str],
        line: usize,
        ctx: &mut Context<Self::State>,
    ) -> CompileResult<()>;

    /// Indent, substitute and route the current line
    fn finish_line(&self, resolution: Resolution, ctx: &mut Context<Self::State>);

    /// Concatenate every buffer into the final text
    fn assemble(&self, source: &str, ctx: Context<Self::State>) -> String;

    /// Compile source lines into the target language
    fn generate<S: AsRef<str>>(&self, lines: &[S]) -> CompileResult<String>
    where
        Self: Sized,
    {
        compiler::compile(self, lines)
    }
}

/// Output language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Algorithmic,
    Cpp,
}

impl Target {
    pub fn name(&self) -> &'static str {
        match self {
            Target::Algorithmic => "algorithmic",
            Target::Cpp => "cpp",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "algo" | "algorithmic" => Ok(Target::Algorithmic),
            "cpp" | "c++" => Ok(Target::Cpp),
            _ => Err(CompileError::config(format!("unknown target '{}'", s))),
        }
    }
}

/// Built-in pseudo-functions with a native equivalent in each backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFunc {
    Power,
    SquareRoot,
    Random,
    Length,
}

impl BuiltinFunc {
    pub const ALL: [BuiltinFunc; 4] = [
        BuiltinFunc::Power,
        BuiltinFunc::SquareRoot,
        BuiltinFunc::Random,
        BuiltinFunc::Length,
    ];

    /// Call prefixes accepted in source
    pub fn source_names(&self) -> &'static [&'static str] {
        match self {
            BuiltinFunc::Power => &["puissance("],
            BuiltinFunc::SquareRoot => &["racine("],
            BuiltinFunc::Random => &["aleatoire(", "alea("],
            BuiltinFunc::Length => &["longueur("],
        }
    }

    /// Whether any spelling of this function appears in `text`
    pub fn used_in(&self, text: &str) -> bool {
        self.source_names().iter().any(|name| text.contains(name))
    }
}

/// Replace the end-of-line sentinel and built-in call names
pub fn substitute(text: &str, end_of_line: &str, native: impl Fn(BuiltinFunc) -> &'static str) -> String {
    let mut text = text.replace(END_OF_LINE, end_of_line);
    for func in BuiltinFunc::ALL {
        let target = native(func);
        for name in func.source_names() {
            if *name != target && text.contains(name) {
                text = text.replace(name, target);
            }
        }
    }
    text
}

/// Indentation depth of a finished line: the stack depth, one less for a
/// line that opens or continues a block
pub fn indent_depth<S>(resolution: Resolution, ctx: &Context<S>) -> usize {
    let depth = ctx.stack.depth();
    match resolution {
        Resolution::Keyword(keyword) if keyword.is_delimiter() => depth.saturating_sub(1),
        _ => depth,
    }
}

/// `head rest`, or just `head` when there is nothing after it
pub fn phrase(head: &str, rest: &str) -> String {
    if rest.is_empty() {
        head.to_string()
    } else {
        format!("{} {}", head, rest)
    }
}

/// Arguments of `init <Type> <var> [<field> <value>]...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructInit<'a> {
    pub type_name: &'a str,
    pub var: &'a str,
    pub fields: Vec<(&'a str, &'a str)>,
}

impl<'a> StructInit<'a> {
    /// Validate an `init` parameter list. A structure type, a variable and
    /// at least one complete `field value` pair are required.
    pub fn parse(params: &[&'a str], line: usize) -> CompileResult<Self> {
        let [type_name, var, rest @ ..] = params else {
            return Err(CompileError::argument(
                "'init' needs a structure type and a variable name",
                line,
            ));
        };
        if rest.is_empty() {
            return Err(CompileError::argument(
                "'init' needs at least one field and its value",
                line,
            ));
        }
        if rest.len() % 2 == 1 {
            return Err(CompileError::argument(
                "'init' fields and values must come in pairs",
                line,
            ));
        }

        let fields = rest.chunks(2).map(|pair| (pair[0], pair[1])).collect();
        Ok(Self {
            type_name: *type_name,
            var: *var,
            fields,
        })
    }
}

/// Arguments of `const <type> <name> [=] <value...>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstDecl<'a> {
    pub type_keyword: &'a str,
    pub name: &'a str,
    pub value: String,
}

impl<'a> ConstDecl<'a> {
    pub fn parse(params: &[&'a str], line: usize) -> CompileResult<Self> {
        let [type_keyword, name, rest @ ..] = params else {
            return Err(CompileError::argument("'const' needs a type, a name and a value", line));
        };
        let value = match rest {
            ["=", value @ ..] => value,
            value => value,
        };
        if value.is_empty() {
            return Err(CompileError::argument("'const' needs a type, a name and a value", line));
        }
        Ok(Self {
            type_keyword: *type_keyword,
            name: *name,
            value: value.join(" "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_str() {
        assert_eq!("algo".parse::<Target>().unwrap(), Target::Algorithmic);
        assert_eq!("C++".parse::<Target>().unwrap(), Target::Cpp);
        assert!("java".parse::<Target>().is_err());
    }

    #[test]
    fn test_substitute_builtins() {
        let native = |func| match func {
            BuiltinFunc::Power => "pow(",
            BuiltinFunc::SquareRoot => "sqrt(",
            BuiltinFunc::Random => "rand(",
            BuiltinFunc::Length => "strlen(",
        };
        assert_eq!(
            substitute("x = puissance(a, 2) + racine(b) + alea()", "\\n", native),
            "x = pow(a, 2) + sqrt(b) + rand()"
        );
        assert_eq!(substitute("\"a(ENDL)\"", "\\n", native), "\"a\\n\"");
    }

    #[test]
    fn test_builtin_detection() {
        assert!(BuiltinFunc::Random.used_in("x = aleatoire()"));
        assert!(BuiltinFunc::Random.used_in("x = alea()"));
        assert!(!BuiltinFunc::Power.used_in("puissance"));
    }

    #[test]
    fn test_struct_init_parse() {
        let init = StructInit::parse(&["Point", "p", "x", "1", "y", "2"], 1).unwrap();
        assert_eq!(init.type_name, "Point");
        assert_eq!(init.var, "p");
        assert_eq!(init.fields, vec![("x", "1"), ("y", "2")]);

        assert!(StructInit::parse(&["Point"], 1).is_err());
        assert!(StructInit::parse(&["Point", "p"], 1).is_err());
        assert!(StructInit::parse(&["Point", "p", "x"], 1).is_err());
    }

    #[test]
    fn test_const_parse() {
        let decl = ConstDecl::parse(&["int", "N", "=", "10"], 1).unwrap();
        assert_eq!(decl.value, "10");
        let decl = ConstDecl::parse(&["float", "PI", "3.14"], 1).unwrap();
        assert_eq!(decl.name, "PI");
        assert!(ConstDecl::parse(&["int", "N", "="], 1).is_err());
        assert!(ConstDecl::parse(&["int"], 1).is_err());
    }

    #[test]
    fn test_phrase() {
        assert_eq!(phrase("Sinon", ""), "Sinon");
        assert_eq!(phrase("Si", "a > b"), "Si a > b");
    }
}
