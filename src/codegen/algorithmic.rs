//! Algorithmic code generator
//!
//! Renders instructions as French structured pseudocode. The main program
//! is wrapped in `Début`/`Fin`; function, procedure and structure
//! definitions follow it, separated by blank lines.

use crate::compiler::{Context, Frame, Resolution};
use crate::config::Config;
use crate::errors::{CompileError, CompileResult};
use crate::lexer::{self, Instruction, Keyword, Param, ParamType, ReturnType};
use super::{
    indent_depth, phrase, substitute, BuiltinFunc, CodeGenerator, ConstDecl, StructInit,
    TypeTable,
};

/// Structure definitions, emitted between the main body and the functions
#[derive(Debug, Default)]
pub struct Structures {
    lines: Vec<String>,
}

/// Algorithmic pseudocode generator
pub struct AlgorithmicGenerator {
    types: TypeTable,
    /// One level of indentation
    indent: String,
    /// Allow pointer types, `&` address-of, `new` and `delete`
    pointers: bool,
}

impl AlgorithmicGenerator {
    pub fn new() -> Self {
        Self {
            types: TypeTable::algorithmic(),
            indent: "\t".to_string(),
            pointers: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            types: config.types.algorithmic.clone(),
            indent: config.indent.clone(),
            pointers: config.pointers,
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

    /// Set whether pointer and allocation syntax is accepted
    pub fn with_pointers(mut self, pointers: bool) -> Self {
        self.pointers = pointers;
        self
    }

    /// Word naming a block in its closing line
    fn block_name(frame: Frame) -> &'static str {
        match frame {
            Frame::For => "Pour",
            Frame::While => "Tant Que",
            Frame::If => "Si",
            Frame::Switch => "Selon",
            Frame::Case => "Cas",
            Frame::Default => "Autrement",
            Frame::Fx => "Fonction",
            Frame::Proc => "Procédure",
            Frame::Struct => "Structure",
            Frame::Vars => "Variables locales",
        }
    }

    fn native(func: BuiltinFunc) -> &'static str {
        match func {
            BuiltinFunc::Power => "puissance(",
            BuiltinFunc::SquareRoot => "racine(",
            BuiltinFunc::Random => "aleatoire(",
            BuiltinFunc::Length => "longueur(",
        }
    }

    fn require_pointers(&self, what: &str, line: usize) -> CompileResult<()> {
        if self.pointers {
            Ok(())
        } else {
            Err(CompileError::feature_disabled(
                format!("{} requires pointers and allocation to be enabled", what),
                line,
            ))
        }
    }

    fn type_name(&self, ty: &ParamType, line: usize) -> CompileResult<String> {
        Ok(match ty {
            ParamType::Primitive(keyword) => self.types.resolve(keyword, line)?.to_string(),
            ParamType::Array { element, dims } => {
                let element = self.types.resolve(element, line)?;
                let dims: String = dims.iter().map(|dim| format!("[{}]", dim)).collect();
                format!("Tableau{} de {}s", dims, element)
            }
            ParamType::Struct(name) => format!("Structure {}", name),
        })
    }

    /// `name : Type`; there is no by-reference notation, so `&` is dropped
    fn param(&self, param: &Param, line: usize) -> CompileResult<String> {
        Ok(format!("{} : {}", param.name, self.type_name(&param.ty, line)?))
    }

    fn function_header(&self, params: &[&str], line: usize) -> CompileResult<String> {
        let params = lexer::param::trim_trailing_empty(params);
        let return_type = ReturnType::decode(params[0]);
        let name = params[1];

        // an incomplete trailing parameter is dropped
        let list = lexer::decode_params(&params[2..]);
        let rendered = list
            .params
            .iter()
            .map(|param| self.param(param, line))
            .collect::<CompileResult<Vec<_>>>()?
            .join(", ");

        Ok(match return_type {
            ReturnType::Void => format!("Procédure {} ({})", name, rendered),
            ReturnType::Value(ty) => {
                format!("Fonction {} ({}) : {}", name, rendered, self.type_name(&ty, line)?)
            }
        })
    }

    fn structure(&self, params: &[&str], line: usize, ctx: &mut Context<Structures>) -> CompileResult<()> {
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

        let mut block = vec![format!("Structure {}", name)];
        for field in &list.params {
            block.push(format!("{}{}", self.indent, self.param(field, line)?));
        }
        block.push(format!("Fin {}", Self::block_name(Frame::Struct)));
        block.push(String::new());

        ctx.state.lines.extend(block);
        ctx.clear_line();
        Ok(())
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

        let ty = self.types.resolve(ty, line)?.to_lowercase();
        let dims: String = dims.iter().map(|dim| format!("[ {} ]", dim)).collect();
        Ok(format!("{} : tableau{} de type {}", name, dims, ty))
    }

    fn delete(&self, params: &[&str], line: usize) -> CompileResult<String> {
        self.require_pointers("'delete'", line)?;
        match params {
            ["arr", name, ..] if !name.is_empty() => Ok(format!("Libérer tableau {}", name)),
            ["arr"] | ["arr", ..] => Err(CompileError::argument("missing parameter 'var_name'", line)),
            [name, ..] if !name.is_empty() => Ok(format!("Libérer {}", name)),
            _ => Err(CompileError::argument("missing parameter 'var_name'", line)),
        }
    }

    /// Rewrite `&x` and `new <type>` at the start of an assigned value
    fn pointer_value(&self, value: &mut Vec<String>, line: usize) -> CompileResult<()> {
        let Some(first) = value.first() else {
            return Ok(());
        };

        if first == "new" {
            self.require_pointers("'new'", line)?;
            let Some(operand) = value.get(1) else {
                return Err(CompileError::argument("cannot allocate nothing", line));
            };
            let (keyword, dims) = match operand.find('[') {
                Some(i) => operand.split_at(i),
                None => (operand.as_str(), ""),
            };
            if let Some(ty) = self.types.get(keyword) {
                value[1] = format!("{}{}", ty, dims);
            }
            value[0] = "Réserver".to_string();
        } else if let Some(target) = first.strip_prefix('&').filter(|t| !t.is_empty() && !t.starts_with('&')) {
            self.require_pointers("address-of '&'", line)?;
            value[0] = format!("Adresse mémoire de {}", target);
        }
        Ok(())
    }
}

impl Default for AlgorithmicGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for AlgorithmicGenerator {
    type State = Structures;

    fn language_name(&self) -> &'static str {
        "Algorithmic"
    }

    fn file_extension(&self) -> &'static str {
        "algo"
    }

    fn keywords(&self) -> &'static [Keyword] {
        Keyword::ALL
    }

    fn types(&self) -> &TypeTable {
        &self.types
    }

    fn instruction(
        &self,
        keyword: Keyword,
        ins: &Instruction<'_>,
        ctx: &mut Context<Structures>,
    ) -> CompileResult<()> {
        let rest = ins.rest();
        let line = ins.line;
        match keyword {
            Keyword::For => {
                let p = &ins.params;
                let step = p.get(3).copied().filter(|s| !s.is_empty()).unwrap_or("1");
                ctx.set_line(format!(
                    "Pour {} allant de {} à {} avec un pas de {}",
                    p[0], p[1], p[2], step
                ));
            }
            Keyword::While => ctx.set_line(phrase("Tant Que", &rest)),
            Keyword::If => ctx.set_line(phrase("Si", &rest)),
            Keyword::Elif => ctx.set_line(phrase("Sinon Si", &rest)),
            Keyword::Else => ctx.set_line("Sinon"),
            Keyword::Switch => ctx.set_line(phrase("Selon", &rest)),
            Keyword::Case => ctx.set_line(phrase("Cas", &rest)),
            Keyword::Default => ctx.set_line(phrase("Autrement :", &rest)),
            Keyword::End => match ctx.closed {
                Some(Frame::Vars) | None => ctx.clear_line(),
                Some(frame) => ctx.set_line(format!("Fin {}", Self::block_name(frame))),
            },

            Keyword::Fx => {
                let header = self.function_header(&ins.params, line)?;
                ctx.set_line(header);
            }
            Keyword::Vars => ctx.set_line(phrase("Variables locales :", &rest)),
            Keyword::FxStart => ctx.set_line(phrase("Début :", &rest)),
            Keyword::Return => ctx.set_line(phrase("Retourner", &rest)),
            Keyword::ReturnCode => ctx.clear_line(),

            Keyword::Print => ctx.set_line(format!("Afficher({})", rest)),
            Keyword::Input => ctx.set_line(format!("Saisir({})", rest)),

            Keyword::Precond => ctx.set_line(phrase("Préconditions :", &rest)),
            Keyword::Data => ctx.set_line(phrase("Données :", &rest)),
            Keyword::Datar => ctx.set_line(phrase("Donnée/Résultat :", &rest)),
            Keyword::Result => ctx.set_line(phrase("Résultat :", &rest)),
            Keyword::Desc => ctx.set_line(phrase("Description :", &rest)),

            Keyword::Arr => {
                let text = self.array(&ins.params, line)?;
                ctx.set_line(text);
            }
            Keyword::Struct => self.structure(&ins.params, line, ctx)?,
            Keyword::Init => {
                let init = StructInit::parse(&ins.params, line)?;
                ctx.set_line(format!("{} : Structure {}", init.var, init.type_name));
                for (field, value) in &init.fields {
                    ctx.push_line(format!("{}.{} <- {}", init.var, field, value));
                }
            }
            Keyword::Const => {
                let decl = ConstDecl::parse(&ins.params, line)?;
                let ty = self.types.resolve(decl.type_keyword, line)?;
                ctx.set_line(format!("Constante {} : {} <- {}", decl.name, ty, decl.value));
            }
            Keyword::Delete => {
                let text = self.delete(&ins.params, line)?;
                ctx.set_line(text);
            }
        }
        Ok(())
    }

    fn define_var(&self, tokens: &[&str], line: usize, ctx: &mut Context<Structures>) -> CompileResult<()> {
        let keyword = tokens[0];
        let var_type = match keyword.strip_suffix('*') {
            Some(base) => {
                self.require_pointers("pointer type", line)?;
                format!("Pointeur sur {}", self.types.resolve(base.trim_end_matches('*'), line)?)
            }
            None => self.types.resolve(keyword, line)?.to_string(),
        };

        if tokens.len() > 2 && tokens[2] == "=" {
            let name = tokens[1];
            self.var_assignation(&tokens[1..], line, ctx)?;
            ctx.prepend_line(format!("{} : {}", name, var_type));
            return Ok(());
        }

        let names: Vec<&str> = tokens[1..].iter().copied().filter(|n| !n.is_empty()).collect();
        if names.is_empty() {
            return Err(CompileError::argument(
                format!("'{}' declaration without a variable name", keyword),
                line,
            ));
        }

        let mut text = format!("{} : {}", names.join(", "), var_type);
        if names.len() > 1 && keyword.trim_end_matches('*') != "string" {
            text.push('s');
        }
        ctx.set_line(text);
        Ok(())
    }

    fn var_assignation(&self, tokens: &[&str], line: usize, ctx: &mut Context<Structures>) -> CompileResult<()> {
        let name = tokens[0];
        let op = tokens.get(1).copied().unwrap_or("=");
        let mut value: Vec<String> = tokens.iter().skip(2).map(|t| t.to_string()).collect();

        if op == "=" {
            self.pointer_value(&mut value, line)?;
        } else {
            // no compound operators: x += 1 becomes x <- x + 1
            let operator = &op[..op.len() - 1];
            value = [name.to_string(), operator.to_string()]
                .into_iter()
                .chain(value)
                .collect();
        }

        ctx.set_line(phrase(&format!("{} <-", name), &value.join(" ")));
        Ok(())
    }

    fn finish_line(&self, resolution: Resolution, ctx: &mut Context<Structures>) {
        let pad = self.indent.repeat(indent_depth(resolution, ctx));
        let lines = ctx
            .take_line()
            .into_iter()
            .map(|text| format!("{}{}", pad, substitute(&text, "(FIN DE LIGNE)", Self::native)))
            .collect();
        ctx.commit(lines);
    }

    fn assemble(&self, _source: &str, ctx: Context<Structures>) -> String {
        let mut output = String::from("Début\n");
        for text in &ctx.body {
            output.push_str(&self.indent);
            output.push_str(text);
            output.push('\n');
        }
        output.push_str("Fin");

        let definitions = ctx
            .state
            .lines
            .iter()
            .chain(&ctx.hoisted)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        if !definitions.is_empty() {
            output.push_str("\n\n");
            output.push_str(definitions.trim_end());
        }
        output
    }
}
