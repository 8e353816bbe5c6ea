//! Script semantics
//!
//! One closed sum type per declaration kind describes how that declaration
//! appears in emitted script: its name, its calling shape, or that it must
//! not appear at all. The naming engine produces these; the lowering pass
//! and the method-body compiler only read them.

use crate::typesys::MemberRef;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TypeSemantics {
    NotUsable,
    Normal {
        name: String,
        ignore_generic_arguments: bool,
        generate_code: bool,
    },
}

impl TypeSemantics {
    pub fn normal(name: impl Into<String>) -> Self {
        TypeSemantics::Normal {
            name: name.into(),
            ignore_generic_arguments: false,
            generate_code: true,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            TypeSemantics::Normal { name, .. } => Some(name),
            TypeSemantics::NotUsable => None,
        }
    }

    pub fn is_usable(&self) -> bool {
        !matches!(self, TypeSemantics::NotUsable)
    }

    pub fn generate_code(&self) -> bool {
        matches!(self, TypeSemantics::Normal { generate_code: true, .. })
    }

    pub fn ignore_generic_arguments(&self) -> bool {
        matches!(
            self,
            TypeSemantics::Normal {
                ignore_generic_arguments: true,
                ..
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MethodSemantics {
    NotUsable,
    Normal {
        name: String,
        is_global: bool,
        ignore_generic_arguments: bool,
        expand_params: bool,
        generate_code: bool,
    },
    InlineCode {
        template: String,
    },
    InstanceMethodOnFirstArgument {
        name: String,
        expand_params: bool,
    },
    StaticMethodWithThisAsFirstArgument {
        name: String,
        generate_code: bool,
        ignore_generic_arguments: bool,
        expand_params: bool,
    },
    NativeOperator,
    NativeIndexer,
}

impl MethodSemantics {
    /// Plain, generated, non-global method
    pub fn normal(name: impl Into<String>) -> Self {
        MethodSemantics::Normal {
            name: name.into(),
            is_global: false,
            ignore_generic_arguments: false,
            expand_params: false,
            generate_code: true,
        }
    }

    pub fn inline_code(template: impl Into<String>) -> Self {
        MethodSemantics::InlineCode {
            template: template.into(),
        }
    }

    pub fn static_with_this(name: impl Into<String>) -> Self {
        MethodSemantics::StaticMethodWithThisAsFirstArgument {
            name: name.into(),
            generate_code: true,
            ignore_generic_arguments: false,
            expand_params: false,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            MethodSemantics::Normal { name, .. }
            | MethodSemantics::InstanceMethodOnFirstArgument { name, .. }
            | MethodSemantics::StaticMethodWithThisAsFirstArgument { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn generate_code(&self) -> bool {
        match self {
            MethodSemantics::Normal { generate_code, .. }
            | MethodSemantics::StaticMethodWithThisAsFirstArgument { generate_code, .. } => {
                *generate_code
            }
            _ => false,
        }
    }

    pub fn ignore_generic_arguments(&self) -> bool {
        match self {
            MethodSemantics::Normal {
                ignore_generic_arguments,
                ..
            }
            | MethodSemantics::StaticMethodWithThisAsFirstArgument {
                ignore_generic_arguments,
                ..
            } => *ignore_generic_arguments,
            _ => false,
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, MethodSemantics::Normal { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ConstructorSemantics {
    NotUsable,
    Unnamed {
        generate_code: bool,
        expand_params: bool,
    },
    Named {
        name: String,
        generate_code: bool,
        expand_params: bool,
    },
    StaticMethod {
        name: String,
        expand_params: bool,
    },
    InlineCode {
        template: String,
    },
    /// Object literal whose entries are the listed members, in parameter order
    Json {
        members: Vec<MemberRef>,
    },
}

impl ConstructorSemantics {
    pub fn unnamed() -> Self {
        ConstructorSemantics::Unnamed {
            generate_code: true,
            expand_params: false,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        ConstructorSemantics::Named {
            name: name.into(),
            generate_code: true,
            expand_params: false,
        }
    }

    pub fn static_method(name: impl Into<String>) -> Self {
        ConstructorSemantics::StaticMethod {
            name: name.into(),
            expand_params: false,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ConstructorSemantics::Named { name, .. } | ConstructorSemantics::StaticMethod { name, .. } => {
                Some(name)
            }
            _ => None,
        }
    }

    pub fn generate_code(&self) -> bool {
        match self {
            ConstructorSemantics::Unnamed { generate_code, .. }
            | ConstructorSemantics::Named { generate_code, .. } => *generate_code,
            ConstructorSemantics::StaticMethod { .. } => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PropertySemantics {
    NotUsable,
    Field {
        name: String,
    },
    GetAndSetMethods {
        getter: Option<MethodSemantics>,
        setter: Option<MethodSemantics>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FieldSemantics {
    NotUsable,
    Field { name: String },
    BooleanConstant { value: bool, name: String },
    NumericConstant { value: f64, name: String },
    StringConstant { value: String, name: String },
    NullConstant { name: String },
}

impl FieldSemantics {
    pub fn name(&self) -> Option<&str> {
        match self {
            FieldSemantics::NotUsable => None,
            FieldSemantics::Field { name }
            | FieldSemantics::BooleanConstant { name, .. }
            | FieldSemantics::NumericConstant { name, .. }
            | FieldSemantics::StringConstant { name, .. }
            | FieldSemantics::NullConstant { name } => Some(name),
        }
    }

    /// Only plain fields exist at runtime; constants are inlined
    pub fn generate_code(&self) -> bool {
        matches!(self, FieldSemantics::Field { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EventSemantics {
    NotUsable,
    AddAndRemoveMethods {
        adder: Option<MethodSemantics>,
        remover: Option<MethodSemantics>,
    },
}

/// Side-channel data for a test method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestMethodData {
    pub description: String,
    pub category: Option<String>,
    pub is_async: bool,
    pub expected_assertion_count: Option<u32>,
}

impl fmt::Display for TypeSemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSemantics::NotUsable => write!(f, "not usable"),
            TypeSemantics::Normal {
                name,
                ignore_generic_arguments,
                generate_code,
            } => {
                write!(f, "type {}", name)?;
                if *ignore_generic_arguments {
                    write!(f, " [ignore generic arguments]")?;
                }
                if !generate_code {
                    write!(f, " [no code]")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for MethodSemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodSemantics::NotUsable => write!(f, "not usable"),
            MethodSemantics::Normal {
                name,
                is_global,
                generate_code,
                ..
            } => {
                write!(f, "method {}", name)?;
                if *is_global {
                    write!(f, " [global]")?;
                }
                if !generate_code {
                    write!(f, " [no code]")?;
                }
                Ok(())
            }
            MethodSemantics::InlineCode { template } => write!(f, "inline `{}`", template),
            MethodSemantics::InstanceMethodOnFirstArgument { name, .. } => {
                write!(f, "instance method {} on first argument", name)
            }
            MethodSemantics::StaticMethodWithThisAsFirstArgument { name, .. } => {
                write!(f, "static method {} with receiver first", name)
            }
            MethodSemantics::NativeOperator => write!(f, "native operator"),
            MethodSemantics::NativeIndexer => write!(f, "native indexer"),
        }
    }
}

impl fmt::Display for ConstructorSemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructorSemantics::NotUsable => write!(f, "not usable"),
            ConstructorSemantics::Unnamed { generate_code, .. } => {
                write!(f, "unnamed constructor")?;
                if !generate_code {
                    write!(f, " [no code]")?;
                }
                Ok(())
            }
            ConstructorSemantics::Named {
                name, generate_code, ..
            } => {
                write!(f, "named constructor {}", name)?;
                if !generate_code {
                    write!(f, " [no code]")?;
                }
                Ok(())
            }
            ConstructorSemantics::StaticMethod { name, .. } => write!(f, "static factory {}", name),
            ConstructorSemantics::InlineCode { template } => write!(f, "inline `{}`", template),
            ConstructorSemantics::Json { members } => write!(f, "object literal ({} members)", members.len()),
        }
    }
}

fn write_accessor(f: &mut fmt::Formatter<'_>, label: &str, sem: &Option<MethodSemantics>) -> fmt::Result {
    match sem {
        Some(s) => write!(f, "{}: {}", label, s),
        None => write!(f, "{}: -", label),
    }
}

impl fmt::Display for PropertySemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertySemantics::NotUsable => write!(f, "not usable"),
            PropertySemantics::Field { name } => write!(f, "field {}", name),
            PropertySemantics::GetAndSetMethods { getter, setter } => {
                write_accessor(f, "get", getter)?;
                write!(f, "; ")?;
                write_accessor(f, "set", setter)
            }
        }
    }
}

impl fmt::Display for FieldSemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSemantics::NotUsable => write!(f, "not usable"),
            FieldSemantics::Field { name } => write!(f, "field {}", name),
            FieldSemantics::BooleanConstant { value, name } => write!(f, "constant {} = {}", name, value),
            FieldSemantics::NumericConstant { value, name } => write!(f, "constant {} = {}", name, value),
            FieldSemantics::StringConstant { value, name } => write!(f, "constant {} = {:?}", name, value),
            FieldSemantics::NullConstant { name } => write!(f, "constant {} = null", name),
        }
    }
}

impl fmt::Display for EventSemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventSemantics::NotUsable => write!(f, "not usable"),
            EventSemantics::AddAndRemoveMethods { adder, remover } => {
                write_accessor(f, "add", adder)?;
                write!(f, "; ")?;
                write_accessor(f, "remove", remover)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_by_kind() {
        assert!(MethodSemantics::normal("m").generate_code());
        assert!(!MethodSemantics::inline_code("{this}").generate_code());
        assert!(ConstructorSemantics::static_method("create").generate_code());
        assert!(!ConstructorSemantics::Json { members: vec![] }.generate_code());
        assert!(!FieldSemantics::NumericConstant {
            value: 1.0,
            name: "x".to_string()
        }
        .generate_code());
    }

    #[test]
    fn test_display() {
        assert_eq!(MethodSemantics::normal("foo").to_string(), "method foo");
        let prop = PropertySemantics::GetAndSetMethods {
            getter: Some(MethodSemantics::normal("get_x")),
            setter: None,
        };
        assert_eq!(prop.to_string(), "get: method get_x; set: -");
    }
}
