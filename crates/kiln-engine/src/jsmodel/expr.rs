//! JS expressions

use super::function::JsFunctionDefinition;
use crate::typesys::TypeId;
use serde::Serialize;
use std::fmt;

/// Binary operators the lowering pass and body compilers emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Equal,
    NotEqual,
    LogicalAnd,
    LogicalOr,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Equal => "===",
            BinaryOperator::NotEqual => "!==",
            BinaryOperator::LogicalAnd => "&&",
            BinaryOperator::LogicalOr => "||",
        };
        write!(f, "{}", op)
    }
}

/// A JS expression tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum JsExpression {
    This,
    Null,
    Identifier {
        name: String,
    },
    Number {
        value: f64,
    },
    String {
        value: String,
    },
    Boolean {
        value: bool,
    },
    MemberAccess {
        target: Box<JsExpression>,
        member: String,
    },
    Index {
        target: Box<JsExpression>,
        index: Box<JsExpression>,
    },
    Invocation {
        target: Box<JsExpression>,
        arguments: Vec<JsExpression>,
    },
    New {
        constructor: Box<JsExpression>,
        arguments: Vec<JsExpression>,
    },
    Assign {
        target: Box<JsExpression>,
        value: Box<JsExpression>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<JsExpression>,
        right: Box<JsExpression>,
    },
    ArrayLiteral {
        elements: Vec<JsExpression>,
    },
    ObjectLiteral {
        properties: Vec<(String, JsExpression)>,
    },
    Function {
        function: Box<JsFunctionDefinition>,
    },
    /// Runtime representative of a declared type; rendered as `{Name}`
    /// until the output formatter resolves it
    TypeReference {
        id: TypeId,
        name: String,
    },
    /// A generic type closed over the given type arguments
    InstantiateGenericType {
        generic: Box<JsExpression>,
        arguments: Vec<JsExpression>,
    },
}

impl JsExpression {
    pub fn identifier(name: impl Into<String>) -> Self {
        JsExpression::Identifier { name: name.into() }
    }

    pub fn number(value: f64) -> Self {
        JsExpression::Number { value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        JsExpression::String { value: value.into() }
    }

    pub fn boolean(value: bool) -> Self {
        JsExpression::Boolean { value }
    }

    pub fn member_access(target: JsExpression, member: impl Into<String>) -> Self {
        JsExpression::MemberAccess {
            target: Box::new(target),
            member: member.into(),
        }
    }

    pub fn index(target: JsExpression, index: JsExpression) -> Self {
        JsExpression::Index {
            target: Box::new(target),
            index: Box::new(index),
        }
    }

    pub fn invoke(target: JsExpression, arguments: Vec<JsExpression>) -> Self {
        JsExpression::Invocation {
            target: Box::new(target),
            arguments,
        }
    }

    pub fn new_object(constructor: JsExpression, arguments: Vec<JsExpression>) -> Self {
        JsExpression::New {
            constructor: Box::new(constructor),
            arguments,
        }
    }

    pub fn assign(target: JsExpression, value: JsExpression) -> Self {
        JsExpression::Assign {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    pub fn binary(operator: BinaryOperator, left: JsExpression, right: JsExpression) -> Self {
        JsExpression::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn function(function: JsFunctionDefinition) -> Self {
        JsExpression::Function {
            function: Box::new(function),
        }
    }

    pub fn type_reference(id: TypeId, name: impl Into<String>) -> Self {
        JsExpression::TypeReference {
            id,
            name: name.into(),
        }
    }

    pub fn instantiate_generic_type(generic: JsExpression, arguments: Vec<JsExpression>) -> Self {
        JsExpression::InstantiateGenericType {
            generic: Box::new(generic),
            arguments,
        }
    }

    /// Whether the expression can be the target of an assignment
    pub fn is_lvalue(&self) -> bool {
        matches!(
            self,
            JsExpression::Identifier { .. } | JsExpression::MemberAccess { .. } | JsExpression::Index { .. }
        )
    }
}
