//! Function definitions, methods and constructors

use super::stmt::{JsBlockStatement, JsStatement};
use crate::typesys::MethodId;
use serde::Serialize;

/// `function name(params) { body }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsFunctionDefinition {
    pub name: Option<String>,
    pub parameter_names: Vec<String>,
    pub body: JsBlockStatement,
}

impl JsFunctionDefinition {
    pub fn new(parameter_names: Vec<String>, body: JsBlockStatement) -> Self {
        Self {
            name: None,
            parameter_names,
            body,
        }
    }

    pub fn from_statements(parameter_names: Vec<String>, statements: Vec<JsStatement>) -> Self {
        Self::new(parameter_names, JsBlockStatement::new(statements))
    }
}

/// A method of an emitted type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsMethod {
    /// The source method (or accessor, or record factory constructor)
    pub method: MethodId,
    pub name: String,
    pub type_parameter_names: Vec<String>,
    /// `None` for abstract methods
    pub function: Option<JsFunctionDefinition>,
}

impl JsMethod {
    pub fn new(
        method: MethodId,
        name: impl Into<String>,
        type_parameter_names: Vec<String>,
        function: Option<JsFunctionDefinition>,
    ) -> Self {
        Self {
            method,
            name: name.into(),
            type_parameter_names,
            function,
        }
    }

    pub fn is_abstract(&self) -> bool {
        self.function.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsNamedConstructor {
    pub name: String,
    pub function: JsFunctionDefinition,
}
