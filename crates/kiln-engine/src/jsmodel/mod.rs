//! JS model produced by the lowering pass
//!
//! # Structure
//!
//! - `JsExpression` / `JsStatement` - expression and statement trees
//! - `JsFunctionDefinition` - a function with parameters and a body block
//! - `JsMethod`, `JsNamedConstructor` - members of an emitted class
//! - `JsClassBuilder` - accumulator used while a type is lowered
//! - `JsClass`, `JsEnum`, `JsType` - frozen emitted types
//!
//! Nodes are plain values; passes match on them exhaustively.

pub mod expr;
pub mod function;
pub mod pretty;
pub mod stmt;
pub mod types;

pub use expr::{BinaryOperator, JsExpression};
pub use function::{JsFunctionDefinition, JsMethod, JsNamedConstructor};
pub use pretty::PrettyPrint;
pub use stmt::{JsBlockStatement, JsStatement, JsVariableDeclaration};
pub use types::{JsClass, JsClassBuilder, JsClassKind, JsEnum, JsEnumValue, JsType};
