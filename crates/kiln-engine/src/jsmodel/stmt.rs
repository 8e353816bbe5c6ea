//! JS statements

use super::expr::JsExpression;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsVariableDeclaration {
    pub name: String,
    pub initializer: Option<JsExpression>,
}

/// A sequence of statements
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JsBlockStatement {
    pub statements: Vec<JsStatement>,
}

impl JsBlockStatement {
    pub fn new(statements: Vec<JsStatement>) -> Self {
        Self { statements }
    }

    /// Normalize an optional statement into a block: a block is kept as is,
    /// any other statement is wrapped, and no statement stays absent
    pub fn make_block(statement: Option<JsStatement>) -> Option<JsBlockStatement> {
        match statement? {
            JsStatement::Block(block) => Some(block),
            other => Some(JsBlockStatement::new(vec![other])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// A JS statement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum JsStatement {
    Block(JsBlockStatement),
    Expression {
        expression: JsExpression,
    },
    VariableDeclaration {
        declarations: Vec<JsVariableDeclaration>,
    },
    Return {
        value: Option<JsExpression>,
    },
    If {
        test: JsExpression,
        then_branch: JsBlockStatement,
        else_branch: Option<JsBlockStatement>,
    },
    Throw {
        value: JsExpression,
    },
    Empty,
}

impl JsStatement {
    pub fn expression(expression: JsExpression) -> Self {
        JsStatement::Expression { expression }
    }

    /// `target = value;`
    pub fn assign(target: JsExpression, value: JsExpression) -> Self {
        JsStatement::expression(JsExpression::assign(target, value))
    }

    pub fn variable(name: impl Into<String>, initializer: Option<JsExpression>) -> Self {
        JsStatement::VariableDeclaration {
            declarations: vec![JsVariableDeclaration {
                name: name.into(),
                initializer,
            }],
        }
    }

    pub fn ret(value: Option<JsExpression>) -> Self {
        JsStatement::Return { value }
    }

    /// `if` statement; both branches are normalized to blocks
    pub fn if_(test: JsExpression, then_branch: JsStatement, else_branch: Option<JsStatement>) -> Self {
        JsStatement::If {
            test,
            then_branch: JsBlockStatement::make_block(Some(then_branch)).unwrap_or_default(),
            else_branch: JsBlockStatement::make_block(else_branch),
        }
    }
}
