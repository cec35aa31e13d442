//! C++ code generator
//!
//! Renders instructions as C++ statements. Structures and constants are
//! hoisted to the top of the file, functions follow them, and every
//! remaining top-level line is wrapped in a synthesized `main`.

use crate::compiler::{Context, Frame, Resolution};
use crate::config::Config;
use crate::errors::{CompileError, CompileResult};
use crate::lexer::{self, Instruction, Keyword, Param, ParamType, ReturnType};
use super::{
    indent_depth, phrase, substitute, BuiltinFunc, CodeGenerator, ConstDecl, StructInit,
    TypeTable,
};

/// Name of the synthesized entry point
const ENTRY_POINT: &str = "main";

/// Keywords handled by this backend. `delete` is native C++ and passes
/// through.
const KEYWORDS: &[Keyword] = &[
    Keyword::Arr,
    Keyword::Struct,
    Keyword::Init,
    Keyword::Const,
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

/// Per-compilation buffers of the C++ backend
#[derive(Debug)]
pub struct CppBuffers {
    /// Structure definitions and constants, in source order
    constants: Vec<String>,
    /// Value returned by `main`
    return_code: String,
}

impl Default for CppBuffers {
    fn default() -> Self {
        Self {
            constants: Vec::new(),
            return_code: "0".to_string(),
        }
    }
}

/// C++ code generator
pub struct CppGenerator {
    types: TypeTable,
    /// One level of indentation
    indent: String,
    /// Write `struct Name` rather than `Name` for structure parameters
    struct_keyword: bool,
    /// Emit `using namespace` and drop the namespace prefix everywhere
    using_namespace: bool,
    namespace: String,
}

impl CppGenerator {
    pub fn new() -> Self {
        Self {
            types: TypeTable::cpp(),
            indent: "\t".to_string(),
            struct_keyword: true,
            using_namespace: false,
            namespace: "std".to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            types: config.types.cpp.clone(),
            indent: config.indent.clone(),
            struct_keyword: config.struct_keyword,
            using_namespace: config.using_namespace_std,
            namespace: config.namespace.clone(),
        }
    }

    pub fn with_types(mut self, types: TypeTable) -> Self {
        self.types = types;
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_struct_keyword(mut self, struct_keyword: bool) -> Self {
        self.struct_keyword = struct_keyword;
        self
    }

    /// Assume `using namespace std;`
    pub fn with_namespace_std(mut self, using: bool) -> Self {
        self.using_namespace = using;
        self
    }

    fn native(func: BuiltinFunc) -> &'static str {
        match func {
            BuiltinFunc::Power => "pow(",
            BuiltinFunc::SquareRoot => "sqrt(",
            BuiltinFunc::Random => "rand(",
            BuiltinFunc::Length => "strlen(",
        }
    }

    /// Drop the namespace prefix when the namespace is imported
    fn localize(&self, text: String) -> String {
        if self.using_namespace {
            text.replace(&format!("{}::", self.namespace), "")
        } else {
            text
        }
    }

    /// Translate pseudocode logic words in a condition
    fn condition(params: &[&str]) -> String {
        params
            .iter()
            .map(|token| match *token {
                "ET" => "&&",
                "OU" => "||",
                "NON" => "!",
                other => other,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn struct_name(&self, name: &str) -> String {
        if self.struct_keyword {
            format!("struct {}", name)
        } else {
            name.to_string()
        }
    }

    /// Declaration of a parameter or field: `int x`, `int& x`, `int t[3][4]`
    fn param(&self, param: &Param, line: usize) -> CompileResult<String> {
        let reference = if param.by_ref { "&" } else { "" };
        Ok(match &param.ty {
            ParamType::Primitive(keyword) => {
                format!("{}{} {}", self.types.resolve(keyword, line)?, reference, param.name)
            }
            ParamType::Array { element, dims } => {
                let dims: String = if dims.is_empty() {
                    "[]".to_string()
                } else {
                    dims.iter().map(|dim| format!("[{}]", dim)).collect()
                };
                format!("{} {}{}", self.types.resolve(element, line)?, param.name, dims)
            }
            ParamType::Struct(name) => {
                format!("{}{} {}", self.struct_name(name), reference, param.name)
            }
        })
    }

    fn return_type(&self, ty: &ReturnType, line: usize) -> CompileResult<String> {
        Ok(match ty {
            ReturnType::Void => "void".to_string(),
            ReturnType::Value(ParamType::Primitive(keyword)) => {
                self.types.resolve(keyword, line)?.to_string()
            }
            // arrays decay to a pointer to their first element
            ReturnType::Value(ParamType::Array { element, .. }) => {
                format!("{}*", self.types.resolve(element, line)?)
            }
            ReturnType::Value(ParamType::Struct(name)) => self.struct_name(name),
        })
    }

    fn function_header(&self, params: &[&str], line: usize) -> CompileResult<String> {
        let params = lexer::param::trim_trailing_empty(params);
        let return_type = self.return_type(&ReturnType::decode(params[0]), line)?;

        // an incomplete trailing parameter is dropped
        let list = lexer::decode_params(&params[2..]);
        let rendered = list
            .params
            .iter()
            .map(|param| self.param(param, line))
            .collect::<CompileResult<Vec<_>>>()?
            .join(", ");

        Ok(format!("{} {}({}) {{", return_type, params[1], rendered))
    }

    fn structure(&self, params: &[&str], line: usize) -> CompileResult<String> {
        let params = lexer::param::trim_trailing_empty(params);
        let Some((name, fields)) = params.split_first() else {
            return Err(CompileError::argument("'struct' needs a name", line));
        };

        let list = lexer::decode_params(fields);
        if let Some(ty) = list.unnamed {
            return Err(CompileError::argument(
                format!("structure field of type '{}' has no name", ty),
                line,
            ));
        }

        let mut text = format!("struct {} {{\n", name);
        for field in &list.params {
            text.push_str(&self.indent);
            text.push_str(&self.param(field, line)?);
            text.push_str(";\n");
        }
        text.push_str("};");
        Ok(text)
    }

    fn array(&self, params: &[&str], line: usize) -> CompileResult<String> {
        let [ty, name, dims @ ..] = params else {
            return Err(CompileError::argument(
                "'arr' statement does not have all its parameters set",
                line,
            ));
        };
        if dims.is_empty() {
            return Err(CompileError::argument(
                "'arr' statement does not have all its parameters set",
                line,
            ));
        }

        let ty = self.types.resolve(ty, line)?;
        let dims: String = dims.iter().map(|dim| format!("[{}]", dim)).collect();
        Ok(format!("{} {}{};", ty, name, dims))
    }

    /// Whether a finished line needs `;`. Declarations and assignments
    /// always end a statement; a pass-through line does unless it is a
    /// comment, a preprocessor line or already ends a statement or block.
    fn needs_terminator(resolution: Resolution, text: &str) -> bool {
        let trimmed = text.trim();
        match resolution {
            Resolution::Keyword(_) => false,
            Resolution::Declaration | Resolution::Assignment => !trimmed.ends_with(';'),
            Resolution::PassThrough => {
                !(trimmed.starts_with("//")
                    || trimmed.starts_with('#')
                    || trimmed.ends_with(['{', '}', ';', ':']))
            }
        }
    }
}

impl Default for CppGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for CppGenerator {
    type State = CppBuffers;

    fn language_name(&self) -> &'static str {
        "C++"
    }

    fn file_extension(&self) -> &'static str {
        "cpp"
    }

    fn keywords(&self) -> &'static [Keyword] {
        KEYWORDS
    }

    fn types(&self) -> &TypeTable {
        &self.types
    }

    fn entry_point(&self) -> Option<&'static str> {
        Some(ENTRY_POINT)
    }

    fn instruction(
        &self,
        keyword: Keyword,
        ins: &Instruction<'_>,
        ctx: &mut Context<CppBuffers>,
    ) -> CompileResult<()> {
        let rest = ins.rest();
        let line = ins.line;
        match keyword {
            Keyword::For => {
                let p = &ins.params;
                let step = p.get(3).copied().filter(|s| !s.is_empty()).unwrap_or("1");
                ctx.set_line(format!(
                    "for ({v} = {}; {v} <= {}; {v} += {}) {{",
                    p[1],
                    p[2],
                    step,
                    v = p[0]
                ));
            }
            Keyword::While => ctx.set_line(format!("while ({}) {{", Self::condition(&ins.params))),
            Keyword::If => ctx.set_line(format!("if ({}) {{", Self::condition(&ins.params))),
            Keyword::Elif => {
                ctx.set_line(format!("}} else if ({}) {{", Self::condition(&ins.params)))
            }
            Keyword::Else => ctx.set_line("} else {"),
            Keyword::Switch => ctx.set_line(format!("switch ({}) {{", rest)),
            Keyword::Case => ctx.set_line(format!("case {}:", rest)),
            Keyword::Default => ctx.set_line("default:"),
            Keyword::End => match ctx.closed {
                Some(Frame::Case | Frame::Default) => {
                    ctx.set_line(format!("{}break;", self.indent))
                }
                Some(Frame::Vars) | None => ctx.clear_line(),
                Some(_) => ctx.set_line("}"),
            },

            Keyword::Fx => {
                let header = self.function_header(&ins.params, line)?;
                ctx.set_line(header);
            }
            Keyword::Vars => ctx.set_line(phrase("// Variables locales :", &rest)),
            Keyword::FxStart => ctx.clear_line(),
            Keyword::Return => ctx.set_line(format!("{};", phrase("return", &rest))),
            Keyword::ReturnCode => {
                if !rest.is_empty() {
                    ctx.state.return_code = rest;
                }
                ctx.clear_line();
            }

            Keyword::Print => {
                ctx.set_line(format!("std::cout << {};", rest.replace(" & ", " << ")))
            }
            Keyword::Input => ctx.set_line(format!("std::cin >> {};", rest)),

            Keyword::Precond => ctx.set_line(phrase("// Préconditions :", &rest)),
            Keyword::Data => ctx.set_line(phrase("// Données :", &rest)),
            Keyword::Datar => ctx.set_line(phrase("// Donnée/Résultat :", &rest)),
            Keyword::Result => ctx.set_line(phrase("// Résultat :", &rest)),
            Keyword::Desc => ctx.set_line(phrase("// Description :", &rest)),

            Keyword::Arr => {
                let text = self.array(&ins.params, line)?;
                ctx.set_line(text);
            }
            Keyword::Struct => {
                let text = self.structure(&ins.params, line)?;
                ctx.state.constants.push(self.localize(text));
                ctx.clear_line();
            }
            Keyword::Init => {
                let init = StructInit::parse(&ins.params, line)?;
                ctx.set_line(format!("{} {};", init.type_name, init.var));
                for (field, value) in &init.fields {
                    ctx.push_line(format!("{}.{} = {};", init.var, field, value));
                }
            }
            Keyword::Const => {
                let decl = ConstDecl::parse(&ins.params, line)?;
                let ty = self.types.resolve(decl.type_keyword, line)?;
                let text = format!("const {} {} = {};", ty, decl.name, decl.value);
                ctx.state.constants.push(self.localize(text));
                ctx.clear_line();
            }
            Keyword::Delete => {}
        }
        Ok(())
    }

    fn define_var(
        &self,
        tokens: &[&str],
        line: usize,
        ctx: &mut Context<CppBuffers>,
    ) -> CompileResult<()> {
        let keyword = tokens[0];
        let base = keyword.trim_end_matches('*');
        let pointer = &keyword[base.len()..];
        let var_type = format!("{}{}", self.types.resolve(base, line)?, pointer);

        if tokens.len() > 2 && tokens[2] == "=" {
            self.var_assignation(&tokens[1..], line, ctx)?;
            let assignment = ctx.current().first().cloned().unwrap_or_default();
            ctx.set_line(format!("{} {}", var_type, assignment));
            return Ok(());
        }

        let names: Vec<&str> = tokens[1..].iter().copied().filter(|n| !n.is_empty()).collect();
        if names.is_empty() {
            return Err(CompileError::argument(
                format!("'{}' declaration without a variable name", keyword),
                line,
            ));
        }
        ctx.set_line(format!("{} {}", var_type, names.join(", ")));
        Ok(())
    }

    fn var_assignation(
        &self,
        tokens: &[&str],
        _line: usize,
        ctx: &mut Context<CppBuffers>,
    ) -> CompileResult<()> {
        // compound operators are native
        ctx.set_line(tokens.join(" "));
        Ok(())
    }

    fn finish_line(&self, resolution: Resolution, ctx: &mut Context<CppBuffers>) {
        let mut depth = indent_depth(resolution, ctx);
        // the locals section is a comment in C++, not a scope
        if ctx.stack.contains(Frame::Vars) && resolution != Resolution::Keyword(Keyword::Vars) {
            depth = depth.saturating_sub(1);
        }
        let pad = self.indent.repeat(depth);
        let lines = ctx
            .take_line()
            .into_iter()
            .filter(|text| !text.trim().is_empty())
            .map(|text| {
                let mut text = substitute(&text, "\\n", Self::native);
                if Self::needs_terminator(resolution, &text) {
                    text.push(';');
                }
                self.localize(format!("{}{}", pad, text))
            })
            .collect();
        ctx.commit(lines);
    }

    fn assemble(&self, source: &str, ctx: Context<CppBuffers>) -> String {
        let random = BuiltinFunc::Random.used_in(source);

        let mut output = String::from("#include <iostream>\n");
        if BuiltinFunc::Power.used_in(source) || BuiltinFunc::SquareRoot.used_in(source) {
            output.push_str("#include <math.h>\n");
        }
        if random {
            output.push_str("#include <stdlib.h>\n#include <time.h>\n");
        }
        if BuiltinFunc::Length.used_in(source) {
            output.push_str("#include <string.h>\n");
        }
        if self.using_namespace {
            output.push_str(&format!("using namespace {};\n", self.namespace));
        }
        output.push('\n');

        if !ctx.state.constants.is_empty() {
            output.push_str(&ctx.state.constants.join("\n"));
            output.push_str("\n\n");
        }

        for text in &ctx.hoisted {
            output.push_str(text);
            output.push('\n');
        }

        output.push_str(&format!("int {}() {{\n", ENTRY_POINT));
        if random {
            output.push_str(&format!("{}srand(time(NULL));\n", self.indent));
        }
        for text in &ctx.body {
            output.push_str(&self.indent);
            output.push_str(text);
            output.push('\n');
        }
        output.push_str(&format!("{}return {};\n}}", self.indent, ctx.state.return_code));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn compile(lines: &[&str]) -> CompileResult<String> {
        CppGenerator::new().generate(lines)
    }

    /// Lines inside `main` with the wrapper indentation removed
    fn main_body(output: &str) -> Vec<String> {
        output
            .lines()
            .skip_while(|line| !line.starts_with("int main()"))
            .skip(1)
            .take_while(|line| *line != "}")
            .map(|line| line.strip_prefix('\t').unwrap_or(line).to_string())
            .collect()
    }

    #[test]
    fn test_declarations_and_assignments() {
        let output = compile(&["int a b", "float x = 1.5", "a += 2", "char* c", "a++"]).unwrap();
        assert_eq!(
            main_body(&output),
            vec!["int a, b;", "float x = 1.5;", "a += 2;", "char* c;", "a++;", "return 0;"]
        );
    }

    #[test]
    fn test_conditions_translate_logic_words() {
        let lines = ["if a ET NON b", "print a", "elif a OU b", "print b", "else", "print c", "end"];
        let output = compile(&lines).unwrap();
        assert_eq!(
            main_body(&output),
            vec![
                "if (a && ! b) {",
                "\tstd::cout << a;",
                "} else if (a || b) {",
                "\tstd::cout << b;",
                "} else {",
                "\tstd::cout << c;",
                "}",
                "return 0;",
            ]
        );
    }

    #[test]
    fn test_switch_cases_break() {
        let lines = ["switch c", "case 1", "x = 2", "end", "default", "x = 3", "end", "end"];
        let output = compile(&lines).unwrap();
        assert_eq!(
            main_body(&output),
            vec![
                "switch (c) {",
                "\tcase 1:",
                "\t\tx = 2;",
                "\t\tbreak;",
                "\tdefault:",
                "\t\tx = 3;",
                "\t\tbreak;",
                "}",
                "return 0;",
            ]
        );
    }

    #[test]
    fn test_print_and_input() {
        let output = compile(&["print \"n = \" & n & \"(ENDL)\"", "input n"]).unwrap();
        assert_eq!(
            main_body(&output),
            vec!["std::cout << \"n = \" << n << \"\\n\";", "std::cin >> n;", "return 0;"]
        );
    }

    #[test]
    fn test_function_hoisted_before_main() {
        let lines = [
            "fx float moyenne arr_int_10 t &int n",
            "vars",
            "float s = 0",
            "fx_start",
            "return s / n",
            "end",
            "print moyenne(t, 10)",
        ];
        let output = compile(&lines).unwrap();
        assert_eq!(
            output,
            "#include <iostream>\n\
             \n\
             float moyenne(int t[10], int& n) {\n\
             \t// Variables locales :\n\
             \tfloat s = 0;\n\
             \treturn s / n;\n\
             }\n\
             \n\
             int main() {\n\
             \tstd::cout << moyenne(t, 10);\n\
             \treturn 0;\n\
             }"
        );
    }

    #[test]
    fn test_procedure_drops_incomplete_parameter() {
        let output = compile(&["fx void draw struct_Point p int", "end"]).unwrap();
        assert!(output.contains("void draw(struct Point p) {\n}\n"));

        let output = CppGenerator::new()
            .with_struct_keyword(false)
            .generate(&["fx struct_Point make int x", "return p", "end"])
            .unwrap();
        assert!(output.contains("Point make(int x) {\n"));
    }

    #[test]
    fn test_reserved_main_checked_before_header() {
        match compile(&["fx int main", "return 0", "end"]) {
            Err(CompileError::ReservedName { name, line }) => {
                assert_eq!(name, "main");
                assert_eq!(line, 1);
            }
            other => panic!("expected reserved name error, got {:?}", other),
        }
    }

    #[test]
    fn test_structs_and_constants_hoisted() {
        let lines = [
            "const int N = 3",
            "struct Point int x int y arr_float_3 v",
            "init Point p x 1 y N",
            "arr int grid N N",
        ];
        let output = compile(&lines).unwrap();
        assert_eq!(
            output,
            "#include <iostream>\n\
             \n\
             const int N = 3;\n\
             struct Point {\n\
             \tint x;\n\
             \tint y;\n\
             \tfloat v[3];\n\
             };\n\
             \n\
             int main() {\n\
             \tPoint p;\n\
             \tp.x = 1;\n\
             \tp.y = N;\n\
             \tint grid[N][N];\n\
             \treturn 0;\n\
             }"
        );
    }

    #[test]
    fn test_headers_follow_source_text() {
        let output = compile(&["x = puissance(2, 3)", "y = alea() % 6", "z = longueur(s)"]).unwrap();
        assert!(output.starts_with(
            "#include <iostream>\n#include <math.h>\n#include <stdlib.h>\n#include <time.h>\n#include <string.h>\n"
        ));
        assert_eq!(
            main_body(&output),
            vec![
                "srand(time(NULL));",
                "x = pow(2, 3);",
                "y = rand() % 6;",
                "z = strlen(s);",
                "return 0;",
            ]
        );

        let plain = compile(&["x = 1"]).unwrap();
        assert!(!plain.contains("math.h"));
        assert!(!plain.contains("srand"));
    }

    #[test]
    fn test_using_namespace_strips_prefix() {
        let output = CppGenerator::new()
            .with_namespace_std(true)
            .generate(&["string s", "const string HELLO = \"hi\"", "print s"])
            .unwrap();
        assert!(output.contains("using namespace std;\n"));
        assert!(output.contains("const string HELLO = \"hi\";"));
        assert!(!output.contains("std::"));
        assert_eq!(main_body(&output), vec!["string s;", "cout << s;", "return 0;"]);
    }

    #[test]
    fn test_return_code_override() {
        let output = compile(&["print 1", "CODE_RETOUR 2"]).unwrap();
        assert!(output.ends_with("\treturn 2;\n}"));
    }

    #[test]
    fn test_brace_initializers_are_terminated() {
        let output = compile(&["int t = {1, 2, 3}", "t = {4, 5, 6}", "x = y;"]).unwrap();
        assert_eq!(
            main_body(&output),
            vec!["int t = {1, 2, 3};", "t = {4, 5, 6};", "x = y;", "return 0;"]
        );
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        let output = compile(&["print 1", "   ", "", "print 2"]).unwrap();
        assert_eq!(
            main_body(&output),
            vec!["std::cout << 1;", "std::cout << 2;", "return 0;"]
        );
    }

    #[test]
    fn test_locals_section_adds_no_indent() {
        let lines = ["fx void f", "vars", "int a", "if a", "a = 1", "end", "end", "end"];
        let output = compile(&lines).unwrap();
        assert!(output.contains(
            "void f() {\n\t// Variables locales :\n\tint a;\n\tif (a) {\n\t\ta = 1;\n\t}\n"
        ));
    }

    #[test]
    fn test_comments_and_pass_through() {
        let lines = ["desc Computes things", "// note", "", "delete p", "result x"];
        let output = compile(&lines).unwrap();
        assert_eq!(
            main_body(&output),
            vec![
                "// Description : Computes things",
                "// note",
                "delete p;",
                "// Résultat : x",
                "return 0;",
            ]
        );
    }

    #[test]
    fn test_unknown_types_fail() {
        assert!(matches!(compile(&["arr long t 3"]), Err(CompileError::Type { .. })));
        assert!(matches!(compile(&["const long N 3"]), Err(CompileError::Type { .. })));
        assert!(matches!(
            compile(&["fx int f long x", "return x", "end"]),
            Err(CompileError::Type { .. })
        ));
        assert!(matches!(compile(&["struct S int"]), Err(CompileError::Argument { .. })));
    }
}
