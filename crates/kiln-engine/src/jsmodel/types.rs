//! Emitted types
//!
//! A class is assembled in a `JsClassBuilder` while its declarations are
//! lowered. `freeze()` consumes the builder; the resulting `JsClass` only
//! offers read access.

use super::expr::JsExpression;
use super::function::{JsFunctionDefinition, JsMethod, JsNamedConstructor};
use super::stmt::JsStatement;
use crate::typesys::{TypeId, TypeKind};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JsClassKind {
    Class,
    Interface,
    Struct,
}

impl JsClassKind {
    /// Class kind for a declared type kind; enums and delegates have none
    pub fn from_type_kind(kind: TypeKind) -> Option<Self> {
        match kind {
            TypeKind::Class => Some(JsClassKind::Class),
            TypeKind::Interface => Some(JsClassKind::Interface),
            TypeKind::Struct => Some(JsClassKind::Struct),
            _ => None,
        }
    }
}

/// Mutable accumulator for one emitted class
#[derive(Debug, Clone)]
pub struct JsClassBuilder {
    pub definition: TypeId,
    pub name: String,
    pub kind: JsClassKind,
    /// `None` when the type ignores its generic arguments
    pub type_argument_names: Option<Vec<String>>,
    pub base_class: Option<JsExpression>,
    pub interfaces: Vec<JsExpression>,
    pub unnamed_constructor: Option<JsFunctionDefinition>,
    pub named_constructors: Vec<JsNamedConstructor>,
    pub instance_methods: Vec<JsMethod>,
    pub static_methods: Vec<JsMethod>,
    pub static_init_statements: Vec<JsStatement>,
}

impl JsClassBuilder {
    pub fn new(
        definition: TypeId,
        name: impl Into<String>,
        kind: JsClassKind,
        type_argument_names: Option<Vec<String>>,
        base_class: Option<JsExpression>,
        interfaces: Vec<JsExpression>,
    ) -> Self {
        Self {
            definition,
            name: name.into(),
            kind,
            type_argument_names,
            base_class,
            interfaces,
            unnamed_constructor: None,
            named_constructors: Vec::new(),
            instance_methods: Vec::new(),
            static_methods: Vec::new(),
            static_init_statements: Vec::new(),
        }
    }

    pub fn freeze(self) -> JsClass {
        JsClass {
            definition: self.definition,
            name: self.name,
            kind: self.kind,
            type_argument_names: self.type_argument_names,
            base_class: self.base_class,
            interfaces: self.interfaces,
            unnamed_constructor: self.unnamed_constructor,
            named_constructors: self.named_constructors,
            instance_methods: self.instance_methods,
            static_methods: self.static_methods,
            static_init_statements: self.static_init_statements,
        }
    }
}

/// A frozen class, interface or struct
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsClass {
    definition: TypeId,
    name: String,
    kind: JsClassKind,
    type_argument_names: Option<Vec<String>>,
    base_class: Option<JsExpression>,
    interfaces: Vec<JsExpression>,
    unnamed_constructor: Option<JsFunctionDefinition>,
    named_constructors: Vec<JsNamedConstructor>,
    instance_methods: Vec<JsMethod>,
    static_methods: Vec<JsMethod>,
    static_init_statements: Vec<JsStatement>,
}

impl JsClass {
    pub fn definition(&self) -> TypeId {
        self.definition
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> JsClassKind {
        self.kind
    }

    pub fn type_argument_names(&self) -> Option<&[String]> {
        self.type_argument_names.as_deref()
    }

    pub fn base_class(&self) -> Option<&JsExpression> {
        self.base_class.as_ref()
    }

    pub fn interfaces(&self) -> &[JsExpression] {
        &self.interfaces
    }

    pub fn unnamed_constructor(&self) -> Option<&JsFunctionDefinition> {
        self.unnamed_constructor.as_ref()
    }

    pub fn named_constructors(&self) -> &[JsNamedConstructor] {
        &self.named_constructors
    }

    pub fn instance_methods(&self) -> &[JsMethod] {
        &self.instance_methods
    }

    pub fn static_methods(&self) -> &[JsMethod] {
        &self.static_methods
    }

    pub fn static_init_statements(&self) -> &[JsStatement] {
        &self.static_init_statements
    }

    pub fn find_instance_method(&self, name: &str) -> Option<&JsMethod> {
        self.instance_methods.iter().find(|m| m.name == name)
    }

    pub fn find_static_method(&self, name: &str) -> Option<&JsMethod> {
        self.static_methods.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsEnumValue {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsEnum {
    pub definition: TypeId,
    pub name: String,
    pub values: Vec<JsEnumValue>,
}

/// One emitted type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum JsType {
    Class(JsClass),
    Enum(JsEnum),
}

impl JsType {
    pub fn name(&self) -> &str {
        match self {
            JsType::Class(c) => c.name(),
            JsType::Enum(e) => &e.name,
        }
    }

    pub fn definition(&self) -> TypeId {
        match self {
            JsType::Class(c) => c.definition(),
            JsType::Enum(e) => e.definition,
        }
    }

    pub fn as_class(&self) -> Option<&JsClass> {
        match self {
            JsType::Class(c) => Some(c),
            JsType::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&JsEnum> {
        match self {
            JsType::Enum(e) => Some(e),
            JsType::Class(_) => None,
        }
    }
}
