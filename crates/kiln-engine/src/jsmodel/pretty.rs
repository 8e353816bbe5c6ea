//! Pretty-printing for the JS model
//!
//! Renders a stable JS-like text for tests and debugging. Type references
//! print as `{Name}`; the production output formatter is a separate stage.

use super::expr::JsExpression;
use super::function::{JsFunctionDefinition, JsMethod};
use super::stmt::{JsBlockStatement, JsStatement};
use super::types::{JsClass, JsClassKind, JsEnum, JsType};
use std::fmt::Write;

/// Trait for pretty-printing JS model constructs
pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for JsExpression {
    fn pretty_print(&self) -> String {
        format_expression(self, 0)
    }
}

impl PrettyPrint for JsStatement {
    fn pretty_print(&self) -> String {
        let mut output = String::new();
        write_statement(&mut output, self, 0);
        output
    }
}

impl PrettyPrint for JsFunctionDefinition {
    fn pretty_print(&self) -> String {
        format_function(self, 0)
    }
}

impl PrettyPrint for JsClass {
    fn pretty_print(&self) -> String {
        let mut output = String::new();

        let keyword = match self.kind() {
            JsClassKind::Class => "class",
            JsClassKind::Interface => "interface",
            JsClassKind::Struct => "struct",
        };
        write!(output, "{} {}", keyword, self.name()).unwrap();
        if let Some(args) = self.type_argument_names() {
            if !args.is_empty() {
                write!(output, "<{}>", args.join(", ")).unwrap();
            }
        }
        let bases: Vec<String> = self
            .base_class()
            .into_iter()
            .chain(self.interfaces())
            .map(|b| format_expression(b, 0))
            .collect();
        if !bases.is_empty() {
            write!(output, " : {}", bases.join(", ")).unwrap();
        }
        writeln!(output).unwrap();

        if let Some(ctor) = self.unnamed_constructor() {
            writeln!(output, "\tctor: {}", format_function(ctor, 1)).unwrap();
        }
        for ctor in self.named_constructors() {
            writeln!(output, "\tctor {}: {}", ctor.name, format_function(&ctor.function, 1)).unwrap();
        }
        for method in self.instance_methods() {
            writeln!(output, "\tmethod {}", format_method(method)).unwrap();
        }
        for method in self.static_methods() {
            writeln!(output, "\tstatic method {}", format_method(method)).unwrap();
        }
        for stmt in self.static_init_statements() {
            output.push_str("\tinit: ");
            let mut text = String::new();
            write_statement(&mut text, stmt, 1);
            output.push_str(text.trim_start());
        }

        output
    }
}

impl PrettyPrint for JsEnum {
    fn pretty_print(&self) -> String {
        let mut output = String::new();
        writeln!(output, "enum {}", self.name).unwrap();
        for value in &self.values {
            writeln!(output, "\t{} = {}", value.name, value.value).unwrap();
        }
        output
    }
}

impl PrettyPrint for JsType {
    fn pretty_print(&self) -> String {
        match self {
            JsType::Class(c) => c.pretty_print(),
            JsType::Enum(e) => e.pretty_print(),
        }
    }
}

fn format_method(method: &JsMethod) -> String {
    let mut text = method.name.clone();
    if !method.type_parameter_names.is_empty() {
        write!(text, "<{}>", method.type_parameter_names.join(", ")).unwrap();
    }
    match &method.function {
        Some(function) => write!(text, ": {}", format_function(function, 1)).unwrap(),
        None => text.push_str(": abstract"),
    }
    text
}

fn format_function(function: &JsFunctionDefinition, indent: usize) -> String {
    let mut output = String::from("function");
    if let Some(name) = &function.name {
        write!(output, " {}", name).unwrap();
    }
    write!(output, "({}) ", function.parameter_names.join(", ")).unwrap();
    write_block(&mut output, &function.body, indent);
    output
}

/// `{`, the statements one level deeper, and `}` at `indent`
fn write_block(output: &mut String, block: &JsBlockStatement, indent: usize) {
    output.push_str("{\n");
    for stmt in &block.statements {
        write_statement(output, stmt, indent + 1);
    }
    output.push_str(&"\t".repeat(indent));
    output.push('}');
}

fn write_statement(output: &mut String, stmt: &JsStatement, indent: usize) {
    let prefix = "\t".repeat(indent);
    match stmt {
        JsStatement::Block(block) => {
            output.push_str(&prefix);
            write_block(output, block, indent);
            output.push('\n');
        }
        JsStatement::Expression { expression } => {
            writeln!(output, "{}{};", prefix, format_expression(expression, indent)).unwrap();
        }
        JsStatement::VariableDeclaration { declarations } => {
            let parts: Vec<String> = declarations
                .iter()
                .map(|d| match &d.initializer {
                    Some(init) => format!("{} = {}", d.name, format_expression(init, indent)),
                    None => d.name.clone(),
                })
                .collect();
            writeln!(output, "{}var {};", prefix, parts.join(", ")).unwrap();
        }
        JsStatement::Return { value } => match value {
            Some(value) => writeln!(output, "{}return {};", prefix, format_expression(value, indent)).unwrap(),
            None => writeln!(output, "{}return;", prefix).unwrap(),
        },
        JsStatement::If {
            test,
            then_branch,
            else_branch,
        } => {
            write!(output, "{}if ({}) ", prefix, format_expression(test, indent)).unwrap();
            write_block(output, then_branch, indent);
            output.push('\n');
            if let Some(else_branch) = else_branch {
                write!(output, "{}else ", prefix).unwrap();
                write_block(output, else_branch, indent);
                output.push('\n');
            }
        }
        JsStatement::Throw { value } => {
            writeln!(output, "{}throw {};", prefix, format_expression(value, indent)).unwrap();
        }
        JsStatement::Empty => writeln!(output, "{};", prefix).unwrap(),
    }
}

fn format_arguments(arguments: &[JsExpression], indent: usize) -> String {
    arguments
        .iter()
        .map(|a| format_expression(a, indent))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Operands that need parentheses when used as a target or operand
fn format_operand(expr: &JsExpression, indent: usize) -> String {
    match expr {
        JsExpression::Assign { .. } | JsExpression::Binary { .. } | JsExpression::Function { .. } => {
            format!("({})", format_expression(expr, indent))
        }
        _ => format_expression(expr, indent),
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn format_expression(expr: &JsExpression, indent: usize) -> String {
    match expr {
        JsExpression::This => "this".to_string(),
        JsExpression::Null => "null".to_string(),
        JsExpression::Identifier { name } => name.clone(),
        JsExpression::Number { value } => format_number(*value),
        JsExpression::String { value } => serde_json::Value::String(value.clone()).to_string(),
        JsExpression::Boolean { value } => value.to_string(),
        JsExpression::MemberAccess { target, member } => {
            format!("{}.{}", format_operand(target, indent), member)
        }
        JsExpression::Index { target, index } => {
            format!("{}[{}]", format_operand(target, indent), format_expression(index, indent))
        }
        JsExpression::Invocation { target, arguments } => {
            format!("{}({})", format_operand(target, indent), format_arguments(arguments, indent))
        }
        JsExpression::New { constructor, arguments } => {
            format!("new {}({})", format_operand(constructor, indent), format_arguments(arguments, indent))
        }
        JsExpression::Assign { target, value } => {
            format!("{} = {}", format_expression(target, indent), format_expression(value, indent))
        }
        JsExpression::Binary { operator, left, right } => format!(
            "{} {} {}",
            format_operand(left, indent),
            operator,
            format_operand(right, indent)
        ),
        JsExpression::ArrayLiteral { elements } => format!("[{}]", format_arguments(elements, indent)),
        JsExpression::ObjectLiteral { properties } => {
            if properties.is_empty() {
                return "{}".to_string();
            }
            let parts: Vec<String> = properties
                .iter()
                .map(|(name, value)| format!("{}: {}", name, format_expression(value, indent)))
                .collect();
            format!("{{ {} }}", parts.join(", "))
        }
        JsExpression::Function { function } => format_function(function, indent),
        JsExpression::TypeReference { name, .. } => format!("{{{}}}", name),
        JsExpression::InstantiateGenericType { generic, arguments } => {
            let mut parts = vec![format_expression(generic, indent)];
            parts.extend(arguments.iter().map(|a| format_expression(a, indent)));
            format!("$InstantiateGenericType({})", parts.join(", "))
        }
    }
}
