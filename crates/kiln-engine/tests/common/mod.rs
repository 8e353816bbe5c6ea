//! Shared helpers for kiln-engine integration tests
//!
//! `RecordingBodyCompiler` understands a tiny statement language so lowering
//! output can be asserted through the pretty-printer:
//!
//! - `var z = 2` declares a variable
//! - `return x` returns
//! - `this.a = 1` assigns
//! - `fail` makes the compiler return an error
//! - anything else becomes an expression statement

#![allow(dead_code)]

use kiln_engine::error::LowerError;
use kiln_engine::jsmodel::{JsExpression, JsFunctionDefinition, JsStatement, PrettyPrint};
use kiln_engine::lower::{
    AccessorSyntax, BodyContext, CompilationUnit, Declaration, MethodBodyCompiler, MethodDeclaration,
    PropertyDeclaration, SourceCode, Symbol, TypeDeclaration, VariableSyntax, VariablesDeclaration,
};
use kiln_engine::semantics::{ConstructorSemantics, MethodSemantics};
use kiln_engine::typesys::{EventId, Location, MemberRef, MethodId, TypeId, TypeRef};
use kiln_engine::{CompileOutput, Compiler, CompilerOptions, TypeSystem};

// =============================================================================
// BODY COMPILER
// =============================================================================

#[derive(Debug, Default)]
pub struct RecordingBodyCompiler {
    /// One entry per call, in call order
    pub log: Vec<String>,
}

impl RecordingBodyCompiler {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn parse_expression(text: &str) -> JsExpression {
    let text = text.trim();
    match text {
        "this" => return JsExpression::This,
        "null" => return JsExpression::Null,
        "true" => return JsExpression::boolean(true),
        "false" => return JsExpression::boolean(false),
        _ => {}
    }
    if let Ok(value) = text.parse::<f64>() {
        return JsExpression::number(value);
    }
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        return JsExpression::string(&text[1..text.len() - 1]);
    }
    match text.rsplit_once('.') {
        Some((target, member)) => JsExpression::member_access(parse_expression(target), member),
        None => JsExpression::identifier(text),
    }
}

pub fn parse_statements(text: &str) -> Result<Vec<JsStatement>, LowerError> {
    let mut statements = Vec::new();
    for part in text.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let stmt = if part == "fail" {
            return Err(LowerError::Body("forced failure".to_string()));
        } else if let Some(rest) = part.strip_prefix("var ") {
            match rest.split_once('=') {
                Some((name, init)) => JsStatement::variable(name.trim(), Some(parse_expression(init))),
                None => JsStatement::variable(rest.trim(), None),
            }
        } else if part == "return" {
            JsStatement::ret(None)
        } else if let Some(rest) = part.strip_prefix("return ") {
            JsStatement::ret(Some(parse_expression(rest)))
        } else if let Some((target, value)) = part.split_once(" = ") {
            JsStatement::assign(parse_expression(target), parse_expression(value))
        } else {
            JsStatement::expression(parse_expression(part))
        };
        statements.push(stmt);
    }
    Ok(statements)
}

fn parameter_names(ctx: &BodyContext<'_, '_>, method: MethodId) -> Vec<String> {
    ctx.type_system()
        .method(method)
        .parameters
        .iter()
        .map(|p| p.name.clone())
        .collect()
}

fn event_receiver(ctx: &BodyContext<'_, '_>, event: EventId) -> Result<JsExpression, LowerError> {
    let info = &ctx.type_system().event(event).info;
    if info.is_static {
        ctx.runtime_type(info.declaring_type)
    } else {
        Ok(JsExpression::This)
    }
}

fn event_accessor(
    ctx: &BodyContext<'_, '_>,
    event: EventId,
    backing_field: &str,
    helper: &str,
) -> Result<JsFunctionDefinition, LowerError> {
    let receiver = event_receiver(ctx, event)?;
    let field = JsExpression::member_access(receiver, backing_field);
    let combined = JsExpression::invoke(
        JsExpression::identifier(helper),
        vec![field.clone(), JsExpression::identifier("value")],
    );
    Ok(JsFunctionDefinition::from_statements(
        vec!["value".to_string()],
        vec![JsStatement::assign(field, combined)],
    ))
}

impl MethodBodyCompiler for RecordingBodyCompiler {
    fn compile_method(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        method: MethodId,
        semantics: &MethodSemantics,
        body: &SourceCode,
    ) -> Result<JsFunctionDefinition, LowerError> {
        self.log.push(format!(
            "method {} as {}",
            ctx.type_system().method(method).info.name,
            semantics.name().unwrap_or("?")
        ));
        let statements = parse_statements(&body.text)?;
        Ok(JsFunctionDefinition::from_statements(parameter_names(ctx, method), statements))
    }

    fn compile_constructor(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        constructor: MethodId,
        _semantics: &ConstructorSemantics,
        body: Option<&SourceCode>,
        instance_init: &[JsStatement],
    ) -> Result<JsFunctionDefinition, LowerError> {
        let owner = ctx.type_system().method(constructor).info.declaring_type;
        self.log
            .push(format!("constructor {}", ctx.type_system().full_name(owner)));
        let mut statements = instance_init.to_vec();
        if let Some(body) = body {
            statements.extend(parse_statements(&body.text)?);
        }
        Ok(JsFunctionDefinition::from_statements(
            parameter_names(ctx, constructor),
            statements,
        ))
    }

    fn compile_field_initializer(
        &mut self,
        _ctx: &BodyContext<'_, '_>,
        target: JsExpression,
        initializer: &SourceCode,
    ) -> Result<Vec<JsStatement>, LowerError> {
        self.log.push(format!("initializer {}", target.pretty_print()));
        if initializer.text.trim() == "fail" {
            return Err(LowerError::Body("forced failure".to_string()));
        }
        Ok(vec![JsStatement::assign(target, parse_expression(&initializer.text))])
    }

    fn default_value(&mut self, ctx: &BodyContext<'_, '_>, ty: &TypeRef) -> Result<JsExpression, LowerError> {
        match ty {
            TypeRef::Def { id, .. } => Ok(match ctx.type_system().full_name(*id).as_str() {
                "System.Int32" | "System.Double" => JsExpression::number(0.0),
                "System.Boolean" => JsExpression::boolean(false),
                _ => JsExpression::Null,
            }),
            TypeRef::TypeParam { .. } => {
                let param = ctx
                    .runtime_type_ref(ty)?
                    .ok_or_else(|| LowerError::Body("type parameter without a name".to_string()))?;
                Ok(JsExpression::invoke(
                    JsExpression::member_access(param, "getDefaultValue"),
                    Vec::new(),
                ))
            }
            _ => Ok(JsExpression::Null),
        }
    }

    fn compile_auto_event_adder(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        event: EventId,
        _semantics: &MethodSemantics,
        backing_field: &str,
    ) -> Result<JsFunctionDefinition, LowerError> {
        event_accessor(ctx, event, backing_field, "$combine")
    }

    fn compile_auto_event_remover(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        event: EventId,
        _semantics: &MethodSemantics,
        backing_field: &str,
    ) -> Result<JsFunctionDefinition, LowerError> {
        event_accessor(ctx, event, backing_field, "$remove")
    }
}

// =============================================================================
// DECLARATION HELPERS
// =============================================================================

pub fn code(text: &str) -> SourceCode {
    SourceCode::new(text, Location::default())
}

pub fn unit(file: &str, declarations: Vec<Declaration>) -> CompilationUnit {
    CompilationUnit {
        file: file.to_string(),
        defined_symbols: Vec::new(),
        declarations,
    }
}

pub fn type_decl(name: &str, id: TypeId, members: Vec<Declaration>) -> Declaration {
    Declaration::Type(TypeDeclaration {
        name: name.to_string(),
        symbol: Symbol::Type(id),
        location: Location::new("test.cs", 1, 1),
        members,
    })
}

pub fn method_decl(name: &str, id: MethodId, body: Option<&str>) -> Declaration {
    Declaration::Method(MethodDeclaration {
        name: name.to_string(),
        symbol: Symbol::Member(MemberRef::Method(id)),
        location: Location::new("test.cs", 2, 5),
        body: body.map(code),
    })
}

pub fn ctor_decl(id: MethodId, body: &str) -> Declaration {
    Declaration::Constructor(MethodDeclaration {
        name: ".ctor".to_string(),
        symbol: Symbol::Member(MemberRef::Method(id)),
        location: Location::new("test.cs", 3, 5),
        body: Some(code(body)),
    })
}

pub fn field_decl(name: &str, id: kiln_engine::typesys::FieldId, initializer: Option<&str>) -> Declaration {
    Declaration::Field(VariablesDeclaration {
        location: Location::new("test.cs", 4, 5),
        variables: vec![VariableSyntax {
            name: name.to_string(),
            symbol: Symbol::Member(MemberRef::Field(id)),
            initializer: initializer.map(code),
            location: Location::new("test.cs", 4, 9),
        }],
    })
}

/// `public T Name { get; set; }`
pub fn auto_property_decl(name: &str, id: kiln_engine::typesys::PropertyId) -> Declaration {
    Declaration::Property(PropertyDeclaration {
        name: name.to_string(),
        symbol: Symbol::Member(MemberRef::Property(id)),
        location: Location::new("test.cs", 5, 5),
        getter: Some(AccessorSyntax::auto()),
        setter: Some(AccessorSyntax::auto()),
        initializer: None,
    })
}

pub fn event_decl(name: &str, id: EventId) -> Declaration {
    Declaration::Event(VariablesDeclaration {
        location: Location::new("test.cs", 6, 5),
        variables: vec![VariableSyntax {
            name: name.to_string(),
            symbol: Symbol::Member(MemberRef::Event(id)),
            initializer: None,
            location: Location::new("test.cs", 6, 9),
        }],
    })
}

// =============================================================================
// COMPILATION
// =============================================================================

pub fn compile(ts: &TypeSystem, units: &[CompilationUnit]) -> CompileOutput {
    compile_with(ts, units, CompilerOptions::default())
}

pub fn compile_with(ts: &TypeSystem, units: &[CompilationUnit], options: CompilerOptions) -> CompileOutput {
    let mut body_compiler = RecordingBodyCompiler::new();
    Compiler::new(options)
        .compile(ts, units, &mut body_compiler)
        .expect("main assembly resolves")
}

/// Pretty-printed statements, one per entry
pub fn printed(statements: &[JsStatement]) -> Vec<String> {
    statements
        .iter()
        .map(|s| s.pretty_print().trim_end().to_string())
        .collect()
}
