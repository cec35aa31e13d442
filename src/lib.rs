//! Algorithmic - block pseudo-instruction transpiler
//!
//! This crate compiles a line-oriented notation of block instructions
//! (`for`, `if`, `fx`, `struct`, `end`, ...) into either French
//! algorithmic pseudocode or compilable C++ source.

pub mod errors;
pub mod lexer;
pub mod compiler;
pub mod codegen;
pub mod config;

// Re-export commonly used types
pub use errors::{CompileError, CompileResult, StructuralError};
pub use lexer::Keyword;
pub use compiler::{compile, Frame};
pub use codegen::{AlgorithmicGenerator, CodeGenerator, CppGenerator, Target, TypeTable};
pub use config::Config;

/// Compile a whole source text with the generator for `target`
pub fn compile_source(source: &str, target: Target, config: &Config) -> CompileResult<String> {
    let lines: Vec<&str> = source.lines().collect();
    match target {
        Target::Algorithmic => AlgorithmicGenerator::from_config(config).generate(&lines),
        Target::Cpp => CppGenerator::from_config(config).generate(&lines),
    }
}

/// File extension of the output for `target`
pub fn file_extension(target: Target) -> &'static str {
    match target {
        Target::Algorithmic => AlgorithmicGenerator::new().file_extension(),
        Target::Cpp => CppGenerator::new().file_extension(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_source_uses_config() {
        let config = Config::from_toml("indent = \"  \"").unwrap();
        let output = compile_source("if a\nprint a\nend\n", Target::Algorithmic, &config).unwrap();
        assert_eq!(output, "Début\n  Si a\n    Afficher(a)\n  Fin Si\nFin");
    }

    #[test]
    fn test_compile_source_handles_crlf() {
        let output = compile_source("int a\r\nprint a\r\n", Target::Cpp, &Config::default()).unwrap();
        assert!(output.contains("\tint a;\n\tstd::cout << a;\n"));
    }

    #[test]
    fn test_file_extensions() {
        assert_eq!(file_extension(Target::Algorithmic), "algo");
        assert_eq!(file_extension(Target::Cpp), "cpp");
    }
}
