//! Inline-code templates
//!
//! A template is literal script text with `{...}` placeholders:
//! `{this}` for the receiver, `{p}` for a parameter, `{*p}` to expand a
//! params array, `{@p}` for a parameter passed as a literal string, `{T}`
//! for a type parameter and `{$Ns.Type}` for a type reference. `{{` and
//! `}}` are escaped braces.

use crate::typesys::{MethodDef, TypeParamOwner, TypeSystem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    None,
    /// `{*p}`
    Expand,
    /// `{@p}`
    Literal,
    /// `{$T}`
    Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Placeholder { name: String, modifier: Modifier },
}

/// Split a template into text and placeholders
pub fn tokenize(code: &str) -> Result<Vec<Fragment>, String> {
    let mut fragments = Vec::new();
    let mut text = String::new();
    let mut chars = code.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                text.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                text.push('}');
            }
            '{' => {
                let mut body = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    body.push(c);
                }
                if !closed {
                    return Err(format!("unterminated placeholder '{{{}'", body));
                }
                if !text.is_empty() {
                    fragments.push(Fragment::Text(std::mem::take(&mut text)));
                }
                let (modifier, name) = match body.chars().next() {
                    Some('*') => (Modifier::Expand, body[1..].to_string()),
                    Some('@') => (Modifier::Literal, body[1..].to_string()),
                    Some('$') => (Modifier::Type, body[1..].to_string()),
                    _ => (Modifier::None, body),
                };
                if name.is_empty() {
                    return Err("empty placeholder".to_string());
                }
                fragments.push(Fragment::Placeholder { name, modifier });
            }
            other => text.push(other),
        }
    }
    if !text.is_empty() {
        fragments.push(Fragment::Text(text));
    }
    Ok(fragments)
}

/// Check a template against the method it is attached to. Returns the list
/// of problems; an empty list means the template is valid.
pub fn validate(ts: &TypeSystem, method: &MethodDef, code: &str) -> Vec<String> {
    let fragments = match tokenize(code) {
        Ok(fragments) => fragments,
        Err(err) => return vec![err],
    };

    let type_parameters = type_parameters_in_scope(ts, method);
    let mut errors = Vec::new();

    for fragment in &fragments {
        let Fragment::Placeholder { name, modifier } = fragment else {
            continue;
        };
        let parameter = method.parameters.iter().find(|p| &p.name == name);
        match modifier {
            Modifier::Type => {
                if ts.find_type(name).is_none() {
                    errors.push(format!("unknown type '{}'", name));
                }
            }
            Modifier::Expand => match parameter {
                Some(p) if p.is_params => {}
                Some(_) => errors.push(format!("'{}' is not a params array and cannot be expanded", name)),
                None => errors.push(format!("unknown parameter '{}'", name)),
            },
            Modifier::Literal => {
                if parameter.is_none() {
                    errors.push(format!("unknown parameter '{}'", name));
                }
            }
            Modifier::None => {
                if name == "this" {
                    if method.info.is_static {
                        errors.push("'{this}' cannot be used in a static member".to_string());
                    }
                } else if parameter.is_none() && !type_parameters.contains(&name.as_str()) {
                    errors.push(format!("unknown placeholder '{{{}}}'", name));
                }
            }
        }
    }
    errors
}

/// Type parameters of the method and of every enclosing type
fn type_parameters_in_scope<'a>(ts: &'a TypeSystem, method: &'a MethodDef) -> Vec<&'a str> {
    let mut names: Vec<&str> = method.type_parameters.iter().map(String::as_str).collect();
    let mut current = Some(method.info.declaring_type);
    while let Some(ty) = current {
        let def = ts.type_def(ty);
        for i in 0..def.type_parameters.len() {
            if let Some(name) = ts.type_parameter_declared_name(TypeParamOwner::Type(ty), i as u32) {
                names.push(name);
            }
        }
        current = def.declaring_type;
    }
    names
}
