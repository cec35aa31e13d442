//! Parameter type decoding
//!
//! Type tokens in `fx` and `struct` lines carry a small encoding:
//! `arr_<type>_<dim>...` for arrays, `struct_<Name>` for structures and a
//! leading `&` for pass-by-reference. They are decoded here once, so the
//! backends only ever see a [`ParamType`].

/// Decoded type of a parameter, field or return value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// A primitive type keyword, looked up in the backend's type table
    Primitive(String),
    /// An array of a primitive type with one entry per dimension
    Array { element: String, dims: Vec<String> },
    /// A named structure
    Struct(String),
}

impl ParamType {
    /// Decode a type token (without any `&` marker)
    pub fn decode(token: &str) -> ParamType {
        if let Some(name) = token.strip_prefix("struct_") {
            return ParamType::Struct(name.to_string());
        }

        if let Some(rest) = token.strip_prefix("arr_") {
            let mut parts = rest
                .split(|c| c == '_' || c == ',')
                .filter(|part| !part.is_empty());
            let element = parts.next().unwrap_or_default().to_string();
            let dims = parts.map(str::to_string).collect();
            return ParamType::Array { element, dims };
        }

        ParamType::Primitive(token.to_string())
    }
}

/// Return type of an `fx` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    /// `void`: the definition is a procedure
    Void,
    Value(ParamType),
}

impl ReturnType {
    pub fn decode(token: &str) -> ReturnType {
        if token == "void" {
            ReturnType::Void
        } else {
            ReturnType::Value(ParamType::decode(token))
        }
    }
}

/// A `(type, name)` pair from a parameter or field list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: ParamType,
    pub name: String,
    /// Type token carried a leading `&`
    pub by_ref: bool,
}

impl Param {
    /// Decode one `(type, name)` token pair
    pub fn decode(ty: &str, name: &str) -> Param {
        let (ty, by_ref) = match ty.strip_prefix('&') {
            Some(stripped) => (stripped, true),
            None => (ty, false),
        };
        Param {
            ty: ParamType::decode(ty),
            name: name.to_string(),
            by_ref,
        }
    }
}

/// Decoded `(type, name)` pairs plus the type token left without a name,
/// if the list had an odd length.
///
/// What to do with the leftover is a per-construct decision: function
/// definitions drop it, structure definitions reject it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamList<'a> {
    pub params: Vec<Param>,
    pub unnamed: Option<&'a str>,
}

/// Decode alternating `type name` tokens
pub fn decode_params<'a>(tokens: &[&'a str]) -> ParamList<'a> {
    let pairs = tokens.chunks(2);
    let mut params = Vec::with_capacity(tokens.len() / 2);
    let mut unnamed = None;

    for pair in pairs {
        match pair {
            [ty, name] => params.push(Param::decode(ty, name)),
            [ty] => unnamed = Some(*ty),
            _ => {}
        }
    }

    ParamList { params, unnamed }
}

/// Drop trailing empty tokens left by extra spaces at the end of a line
pub fn trim_trailing_empty<'a, 'b>(tokens: &'b [&'a str]) -> &'b [&'a str] {
    let end = tokens
        .iter()
        .rposition(|token| !token.is_empty())
        .map_or(0, |i| i + 1);
    &tokens[..end]
}
