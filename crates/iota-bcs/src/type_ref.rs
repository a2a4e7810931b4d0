//! Type expressions such as `vector<u8>` or `Container<Coin<Balance<T>>>`.

use crate::error::BcsError;
use std::collections::HashMap;
use std::fmt;

/// Deepest generic nesting accepted by [`TypeRef::parse`].
pub const MAX_TYPE_NESTING: usize = 64;

/// A parsed, possibly parametrized reference to a registered type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub name: String,
    pub params: Vec<TypeRef>,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Programmatic form of `name<params...>`.
    pub fn generic(name: impl Into<String>, params: impl IntoIterator<Item = TypeRef>) -> Self {
        Self {
            name: name.into(),
            params: params.into_iter().collect(),
        }
    }

    /// Parse with `<`/`>` separators.
    pub fn parse(input: &str) -> Result<Self, BcsError> {
        Self::parse_with(input, ('<', '>'))
    }

    pub fn parse_with(input: &str, separators: (char, char)) -> Result<Self, BcsError> {
        Self::parse_bounded(input, separators, MAX_TYPE_NESTING)
    }

    /// Parse, failing with `RecursionLimit` once type arguments nest deeper
    /// than `max_nesting`.
    pub fn parse_bounded(
        input: &str,
        separators: (char, char),
        max_nesting: usize,
    ) -> Result<Self, BcsError> {
        let chars: Vec<char> = input.chars().collect();
        let mut parser = Parser {
            chars: &chars,
            pos: 0,
            separators,
            max_nesting,
        };
        let parsed = parser.parse_expr(0)?;
        let mut pos = parser.pos;
        skip_whitespace(&chars, &mut pos);
        if pos != chars.len() {
            return Err(BcsError::TypeParse(format!(
                "unexpected '{}' at offset {} in '{}'",
                chars[pos], pos, input
            )));
        }
        Ok(parsed)
    }

    pub fn is_generic(&self) -> bool {
        !self.params.is_empty()
    }

    /// Number of names in the expression, counting every parameter.
    pub fn size(&self) -> usize {
        1 + self.params.iter().map(TypeRef::size).sum::<usize>()
    }

    /// Replace generic placeholders with the types bound in `env`.
    pub fn substitute(&self, env: &HashMap<String, TypeRef>) -> TypeRef {
        if self.params.is_empty() {
            if let Some(bound) = env.get(&self.name) {
                return bound.clone();
            }
        }
        TypeRef {
            name: self.name.clone(),
            params: self.params.iter().map(|p| p.substitute(env)).collect(),
        }
    }
}

fn skip_whitespace(chars: &[char], pos: &mut usize) {
    while *pos < chars.len() && chars[*pos].is_whitespace() {
        *pos += 1;
    }
}

struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
    separators: (char, char),
    max_nesting: usize,
}

impl Parser<'_> {
    fn parse_expr(&mut self, nesting: usize) -> Result<TypeRef, BcsError> {
        if nesting > self.max_nesting {
            return Err(BcsError::RecursionLimit(self.max_nesting));
        }
        let (open, close) = self.separators;
        skip_whitespace(self.chars, &mut self.pos);
        let start = self.pos;
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            if c == open || c == close || c == ',' || c.is_whitespace() {
                break;
            }
            self.pos += 1;
        }
        if start == self.pos {
            return Err(BcsError::TypeParse(format!(
                "expected a type name at offset {}",
                start
            )));
        }
        let name: String = self.chars[start..self.pos].iter().collect();

        skip_whitespace(self.chars, &mut self.pos);
        let mut params = Vec::new();
        if self.chars.get(self.pos) == Some(&open) {
            self.pos += 1;
            loop {
                params.push(self.parse_expr(nesting + 1)?);
                skip_whitespace(self.chars, &mut self.pos);
                match self.chars.get(self.pos) {
                    Some(',') => self.pos += 1,
                    Some(c) if *c == close => {
                        self.pos += 1;
                        break;
                    }
                    _ => {
                        return Err(BcsError::TypeParse(format!(
                            "unterminated type arguments for '{}'",
                            name
                        )))
                    }
                }
            }
        }
        Ok(TypeRef { name, params })
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.params.is_empty() {
            f.write_str("<")?;
            for (i, param) in self.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", param)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// A type argument as accepted by the registry: either a type expression
/// string (parsed with the registry's separators) or an already built
/// [`TypeRef`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeArg {
    Text(String),
    Ref(TypeRef),
}

impl TypeArg {
    pub fn into_type_ref(self, separators: (char, char), max_nesting: usize) -> Result<TypeRef, BcsError> {
        match self {
            TypeArg::Text(text) => TypeRef::parse_bounded(&text, separators, max_nesting),
            TypeArg::Ref(type_ref) => Ok(type_ref),
        }
    }
}

impl From<&str> for TypeArg {
    fn from(s: &str) -> Self {
        TypeArg::Text(s.to_string())
    }
}

impl From<String> for TypeArg {
    fn from(s: String) -> Self {
        TypeArg::Text(s)
    }
}

impl From<&String> for TypeArg {
    fn from(s: &String) -> Self {
        TypeArg::Text(s.clone())
    }
}

impl From<TypeRef> for TypeArg {
    fn from(t: TypeRef) -> Self {
        TypeArg::Ref(t)
    }
}

impl From<&TypeRef> for TypeArg {
    fn from(t: &TypeRef) -> Self {
        TypeArg::Ref(t.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(TypeRef::parse("u8").unwrap(), TypeRef::named("u8"));
    }

    #[test]
    fn test_parse_nested_generics() {
        let parsed = TypeRef::parse("Container<Coin<Balance<T>>>").unwrap();
        let expected = TypeRef::generic(
            "Container",
            [TypeRef::generic(
                "Coin",
                [TypeRef::generic("Balance", [TypeRef::named("T")])],
            )],
        );
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_multiple_params_with_spaces() {
        let parsed = TypeRef::parse("VecMap< Key , vector<Val> >").unwrap();
        assert_eq!(parsed.name, "VecMap");
        assert_eq!(parsed.params.len(), 2);
        assert_eq!(parsed.params[1].to_string(), "vector<Val>");
    }

    #[test]
    fn test_parse_custom_separators() {
        let parsed = TypeRef::parse_with("Vec[u8]", ('[', ']')).unwrap();
        assert_eq!(parsed, TypeRef::generic("Vec", [TypeRef::named("u8")]));
    }

    #[test]
    fn test_parse_errors() {
        assert!(TypeRef::parse("").is_err());
        assert!(TypeRef::parse("vector<u8").is_err());
        assert!(TypeRef::parse("vector<>").is_err());
        assert!(TypeRef::parse("u8 u16").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}u8{}", "vector<".repeat(10_000), ">".repeat(10_000));
        assert_eq!(TypeRef::parse(&deep), Err(BcsError::RecursionLimit(MAX_TYPE_NESTING)));
        let unterminated = "vector<".repeat(10_000);
        assert_eq!(TypeRef::parse(&unterminated), Err(BcsError::RecursionLimit(MAX_TYPE_NESTING)));

        let ok = format!("{}u8{}", "vector<".repeat(8), ">".repeat(8));
        assert_eq!(TypeRef::parse(&ok).unwrap().size(), 9);
        assert_eq!(
            TypeRef::parse_bounded(&ok, ('<', '>'), 4),
            Err(BcsError::RecursionLimit(4))
        );
    }

    #[test]
    fn test_size() {
        assert_eq!(TypeRef::named("u8").size(), 1);
        assert_eq!(TypeRef::parse("VecMap<string, vector<u64>>").unwrap().size(), 4);
    }

    #[test]
    fn test_display_roundtrip() {
        let text = "VecMap<string, vector<u64>>";
        assert_eq!(TypeRef::parse(text).unwrap().to_string(), text);
    }

    #[test]
    fn test_substitute() {
        let mut env = HashMap::new();
        env.insert("T".to_string(), TypeRef::parse("vector<bool>").unwrap());
        let field = TypeRef::parse("Balance<T>").unwrap();
        assert_eq!(field.substitute(&env).to_string(), "Balance<vector<bool>>");
    }
}
