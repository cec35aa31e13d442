//! Instruction dispatcher
//!
//! Drives one compilation: tokenizes every line, resolves it to a handler,
//! maintains the block stack and hands rendering to the active backend.
//! The first failing line aborts the run and no output is produced.

mod context;
mod stack;

pub use context::Context;
pub use stack::{BlockStack, Frame, OpenFrame};

use crate::codegen::CodeGenerator;
use crate::errors::{CompileError, CompileResult, StructuralError};
use crate::lexer::{self, param, Instruction, Keyword};

/// How a line was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A structural keyword declared by the backend
    Keyword(Keyword),
    /// Starts with a primitive type keyword
    Declaration,
    /// Second token is `=` or a compound operator such as `+=`
    Assignment,
    /// Anything else is copied as-is
    PassThrough,
}

/// Resolve an instruction against a backend's keyword set and type table
pub fn resolve<G: CodeGenerator>(generator: &G, ins: &Instruction<'_>) -> Resolution {
    if let Some(keyword) = Keyword::from_str(ins.name) {
        if generator.keywords().contains(&keyword) {
            return Resolution::Keyword(keyword);
        }
    }

    if generator.is_type_keyword(ins.name) {
        return Resolution::Declaration;
    }

    if ins.params.first().is_some_and(|op| op.ends_with('=')) {
        return Resolution::Assignment;
    }

    Resolution::PassThrough
}

/// Compile source lines with the given backend
pub fn compile<G, S>(generator: &G, lines: &[S]) -> CompileResult<String>
where
    G: CodeGenerator,
    S: AsRef<str>,
{
    let source = lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");

    let mut ctx: Context<G::State> = Context::new();

    for line in lexer::source_lines(lines) {
        let ins = line.instruction();
        let resolution = resolve(generator, &ins);
        ctx.begin_line(line.text);

        match resolution {
            Resolution::Keyword(keyword) => {
                enter_block(generator, keyword, &ins, &mut ctx)?;
                generator.instruction(keyword, &ins, &mut ctx)?;
            }
            Resolution::Declaration => {
                generator.define_var(&ins.tokens(), ins.line, &mut ctx)?;
            }
            Resolution::Assignment => {
                generator.var_assignation(&ins.tokens(), ins.line, &mut ctx)?;
            }
            Resolution::PassThrough => {}
        }

        generator.finish_line(resolution, &mut ctx);
    }

    if let Some(open) = ctx.stack.innermost() {
        return Err(CompileError::structural(
            StructuralError::UnclosedBlock(open.frame),
            open.line,
        ));
    }

    Ok(generator.assemble(&source, ctx))
}

/// Block-stack effects shared by every backend, applied before rendering
fn enter_block<G: CodeGenerator>(
    generator: &G,
    keyword: Keyword,
    ins: &Instruction<'_>,
    ctx: &mut Context<G::State>,
) -> CompileResult<()> {
    let line = ins.line;
    match keyword {
        Keyword::For => {
            if ins.params.len() < 3 {
                return Err(CompileError::argument(
                    "'for' needs a variable, a start and an end",
                    line,
                ));
            }
            ctx.stack.push(Frame::For, line);
        }
        Keyword::While => ctx.stack.push(Frame::While, line),
        Keyword::If => ctx.stack.push(Frame::If, line),
        Keyword::Switch => ctx.stack.push(Frame::Switch, line),
        Keyword::Case => {
            if !ctx.stack.contains(Frame::Switch) {
                return Err(CompileError::structural(StructuralError::CaseOutsideSwitch, line));
            }
            ctx.stack.push(Frame::Case, line);
        }
        Keyword::Default => {
            if !ctx.stack.contains(Frame::Switch) {
                return Err(CompileError::structural(
                    StructuralError::DefaultOutsideSwitch,
                    line,
                ));
            }
            ctx.stack.push(Frame::Default, line);
        }
        Keyword::Vars => ctx.stack.push(Frame::Vars, line),
        Keyword::FxStart => {
            if ctx.stack.top() == Some(Frame::Vars) {
                ctx.stack.pop();
            }
        }
        Keyword::Fx => {
            let params = param::trim_trailing_empty(&ins.params);
            let (Some(return_type), Some(name)) = (params.first(), params.get(1)) else {
                return Err(CompileError::argument(
                    "'fx' needs a return type and a name",
                    line,
                ));
            };
            if generator.entry_point() == Some(*name) {
                return Err(CompileError::reserved_name(*name, line));
            }
            let frame = if *return_type == "void" { Frame::Proc } else { Frame::Fx };
            ctx.stack.push(frame, line);
        }
        Keyword::End => {
            let frame = ctx
                .stack
                .pop()
                .ok_or_else(|| CompileError::structural(StructuralError::StackUnderflow, line))?;
            ctx.closed = Some(frame);
        }
        Keyword::Return => match ctx.stack.enclosing_function() {
            Some(Frame::Fx) => {}
            Some(_) => {
                return Err(CompileError::structural(StructuralError::ReturnInProcedure, line));
            }
            None => {
                return Err(CompileError::structural(
                    StructuralError::ReturnOutsideFunction,
                    line,
                ));
            }
        },
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{AlgorithmicGenerator, CppGenerator};
    use pretty_assertions::assert_eq;

    fn algo(lines: &[&str]) -> CompileResult<String> {
        AlgorithmicGenerator::new().generate(lines)
    }

    fn cpp(lines: &[&str]) -> CompileResult<String> {
        CppGenerator::new().generate(lines)
    }

    fn structural(result: CompileResult<String>) -> (StructuralError, usize) {
        match result {
            Err(CompileError::Structural { kind, line }) => (kind, line),
            other => panic!("expected structural error, got {:?}", other),
        }
    }

    #[test]
    fn test_resolution_order() {
        let generator = CppGenerator::new();
        let resolve_line = |text: &str| resolve(&generator, &lexer::SourceLine::new(text, 1).instruction());

        assert_eq!(resolve_line("for i 0 9"), Resolution::Keyword(Keyword::For));
        assert_eq!(resolve_line("int a"), Resolution::Declaration);
        assert_eq!(resolve_line("x = 3"), Resolution::Assignment);
        assert_eq!(resolve_line("x -= 3"), Resolution::Assignment);
        assert_eq!(resolve_line("x++"), Resolution::PassThrough);
        assert_eq!(resolve_line(""), Resolution::PassThrough);
        // not declared by the C++ backend
        assert_eq!(resolve_line("delete p"), Resolution::PassThrough);
    }

    #[test]
    fn test_scenario_algorithmic_declaration() {
        let generator = AlgorithmicGenerator::new()
            .with_types(crate::codegen::TypeTable::from_iter([("int", "Entier")]));
        let output = generator.generate(&["int a", "a = 5", "print a"]).unwrap();
        assert_eq!(output, "Début\n\ta : Entier\n\ta <- 5\n\tAfficher(a)\nFin");
    }

    #[test]
    fn test_scenario_cpp_for_loop() {
        let output = cpp(&["for i 0 9", "print i", "end"]).unwrap();
        assert_eq!(
            output,
            "#include <iostream>\n\
             \n\
             int main() {\n\
             \tfor (i = 0; i <= 9; i += 1) {\n\
             \t\tstd::cout << i;\n\
             \t}\n\
             \treturn 0;\n\
             }"
        );
    }

    #[test]
    fn test_scenario_case_outside_switch() {
        assert_eq!(structural(algo(&["case 1"])), (StructuralError::CaseOutsideSwitch, 1));
        assert_eq!(structural(cpp(&["case 1"])), (StructuralError::CaseOutsideSwitch, 1));
    }

    #[test]
    fn test_case_checks_whole_stack() {
        let lines = ["switch x", "case 1", "if y", "case 2", "end", "end", "end", "end"];
        assert!(cpp(&lines).is_ok());

        let lines = ["while x", "if y", "for i 0 1", "default", "end", "end", "end", "end"];
        assert_eq!(structural(cpp(&lines)), (StructuralError::DefaultOutsideSwitch, 4));
    }

    #[test]
    fn test_scenario_reserved_entry_point() {
        let result = cpp(&["fx void main", "print 1", "end"]);
        assert!(matches!(
            result,
            Err(CompileError::ReservedName { ref name, line: 1 }) if name == "main"
        ));
        // the algorithmic backend has no synthesized entry point
        assert!(algo(&["fx void main", "end"]).is_ok());
    }

    #[test]
    fn test_scenario_init_arguments() {
        for backend in [algo, cpp] {
            assert!(matches!(
                backend(&["init Point p"]),
                Err(CompileError::Argument { line: 1, .. })
            ));
            assert!(matches!(
                backend(&["init Point p", "x", "1", "y"]),
                Err(CompileError::Argument { line: 1, .. })
            ));
            assert!(matches!(
                backend(&["int a", "init Point p x 1 y"]),
                Err(CompileError::Argument { line: 2, .. })
            ));
            assert!(matches!(backend(&["init Point"]), Err(CompileError::Argument { .. })));
        }
    }

    #[test]
    fn test_return_rules() {
        assert_eq!(
            structural(cpp(&["return 1"])),
            (StructuralError::ReturnOutsideFunction, 1)
        );
        assert_eq!(
            structural(cpp(&["fx void p", "return 1", "end"])),
            (StructuralError::ReturnInProcedure, 2)
        );
        assert_eq!(
            structural(algo(&["fx void p", "if x", "return 1", "end", "end"])),
            (StructuralError::ReturnInProcedure, 3)
        );
        assert!(cpp(&["fx int f", "if x", "return 1", "end", "return 0", "end"]).is_ok());
    }

    #[test]
    fn test_end_underflow() {
        assert_eq!(structural(algo(&["end"])), (StructuralError::StackUnderflow, 1));
        assert_eq!(
            structural(cpp(&["if x", "end", "end"])),
            (StructuralError::StackUnderflow, 3)
        );
    }

    #[test]
    fn test_unclosed_block_names_opener() {
        assert_eq!(
            structural(cpp(&["while x", "if y", "end"])),
            (StructuralError::UnclosedBlock(Frame::While), 1)
        );
    }

    #[test]
    fn test_fail_fast_on_first_error() {
        let result = cpp(&["print 1", "case 2", "return 3"]);
        assert_eq!(structural(result), (StructuralError::CaseOutsideSwitch, 2));
    }

    #[test]
    fn test_vars_frame_is_silent() {
        let output = algo(&["vars", "int a", "end", "print a"]).unwrap();
        assert_eq!(
            output,
            "Début\n\tVariables locales :\n\t\ta : Entier\n\tAfficher(a)\nFin"
        );
    }

    #[test]
    fn test_closing_delimiter_parity() {
        let lines = [
            "while a",
            "if b",
            "x = 1",
            "elif c",
            "x = 2",
            "else",
            "for i 0 3",
            "x += i",
            "end",
            "end",
            "switch x",
            "case 1",
            "print x",
            "end",
            "end",
            "end",
        ];
        let output = cpp(&lines).unwrap();
        // main's own brace pair plus one per opener; break replaces the case brace
        let opens = output.matches('{').count();
        let closes = output.matches('}').count();
        assert_eq!(opens, closes);
        assert_eq!(output.matches("break;").count(), 1);

        let output = algo(&lines).unwrap();
        assert_eq!(output.matches("Fin ").count(), 5);
    }

    #[test]
    fn test_independent_instances_are_deterministic() {
        let lines = [
            "struct Point int x int y",
            "const int N = 3",
            "fx int sq int x",
            "return x * x",
            "end",
            "int a = sq(N)",
            "print a & (ENDL)",
        ];
        assert_eq!(cpp(&lines).unwrap(), cpp(&lines).unwrap());
        assert_eq!(algo(&lines).unwrap(), algo(&lines).unwrap());

        // state does not leak between calls on one instance
        let generator = CppGenerator::new();
        let first = generator.generate(&lines).unwrap();
        assert!(generator.generate(&["case 1"]).is_err());
        assert_eq!(generator.generate(&lines).unwrap(), first);
    }
}
