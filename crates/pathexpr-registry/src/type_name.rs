//! Parsing of declared type names.
//!
//! Member types are declared as strings (`"double"`, `"com.acme.Order"`,
//! `"List<LineItem>"`). Names are checked for shape when a class is built and
//! resolved to [`TypeInfo`](pathexpr_core::TypeInfo)s only when queried, so
//! classes may refer to each other in any registration order.

use pathexpr_core::RegistrationError;

/// A syntactically valid type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName<'a> {
    /// `int`, `Order`, `com.acme.Order`.
    Simple(&'a str),
    /// `List<LineItem>`, `Map<String, int>`.
    Generic { base: &'a str, args: Vec<TypeName<'a>> },
}

impl<'a> TypeName<'a> {
    pub fn parse(name: &'a str) -> Result<Self, RegistrationError> {
        let name = name.trim();
        let invalid = || RegistrationError::InvalidType(name.to_string());

        let Some(open) = name.find('<') else {
            return check_simple(name).map(TypeName::Simple).ok_or_else(invalid);
        };
        if !name.ends_with('>') {
            return Err(invalid());
        }
        let base = check_simple(name[..open].trim()).ok_or_else(invalid)?;
        let inner = &name[open + 1..name.len() - 1];

        let args = split_top_level(inner)
            .ok_or_else(invalid)?
            .into_iter()
            .map(TypeName::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TypeName::Generic { base, args })
    }

    pub fn base(&self) -> &'a str {
        match self {
            TypeName::Simple(name) => name,
            TypeName::Generic { base, .. } => base,
        }
    }
}

/// Dotted identifier segments, none empty.
fn check_simple(name: &str) -> Option<&str> {
    let valid = !name.is_empty()
        && name.split('.').all(|segment| {
            !segment.is_empty() && segment.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        });
    valid.then_some(name)
}

/// Split generic arguments on commas at nesting depth zero.
fn split_top_level(inner: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    parts.push(&inner[start..]);
    Some(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_names() {
        assert_eq!(TypeName::parse("double"), Ok(TypeName::Simple("double")));
        assert_eq!(
            TypeName::parse(" com.acme.Order "),
            Ok(TypeName::Simple("com.acme.Order"))
        );
    }

    #[test]
    fn generic_names() {
        let parsed = TypeName::parse("Map<String, List<LineItem>>").unwrap();
        assert_eq!(
            parsed,
            TypeName::Generic {
                base: "Map",
                args: vec![
                    TypeName::Simple("String"),
                    TypeName::Generic {
                        base: "List",
                        args: vec![TypeName::Simple("LineItem")],
                    },
                ],
            }
        );
        assert_eq!(parsed.base(), "Map");
    }

    #[test]
    fn malformed_names() {
        for bad in ["", "a..b", "List<", "List<a>>", "List<>", "a b", "List<a,>"] {
            assert!(TypeName::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
