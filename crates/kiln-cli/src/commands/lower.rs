//! `kiln lower`: run the declaration lowering pass and print class outlines
//!
//! Method bodies are not compiled here. Every body lowers to an empty
//! function and initializer expressions are kept as verbatim source text,
//! which is enough to inspect names, placement and initialization order.

use crate::output;
use crate::Format;
use anyhow::Context;
use kiln_engine::error::LowerError;
use kiln_engine::jsmodel::{JsExpression, JsFunctionDefinition, JsStatement};
use kiln_engine::lower::{BodyContext, CompilationUnit, MethodBodyCompiler, SourceCode};
use kiln_engine::semantics::{ConstructorSemantics, MethodSemantics};
use kiln_engine::typesys::{EventId, MethodId, TypeRef, TypeSystem};
use kiln_engine::{Compiler, CompilerOptions, PrettyPrint};
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use termcolor::ColorChoice;

/// Input document of `kiln lower`
#[derive(Debug, Deserialize)]
struct LowerInput {
    declarations: TypeSystem,
    #[serde(default)]
    units: Vec<CompilationUnit>,
}

pub fn execute(input: &Path, options: CompilerOptions, format: Format, color: ColorChoice) -> anyhow::Result<bool> {
    let document: LowerInput = super::read_json(input)?;
    let mut body_compiler = OutlineBodyCompiler;
    let result = Compiler::new(options)
        .compile(&document.declarations, &document.units, &mut body_compiler)
        .with_context(|| format!("compiling {}", input.display()))?;

    match format {
        Format::Json => {
            let value = json!({ "types": &result.types, "diagnostics": &result.diagnostics });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Format::Text => {
            for ty in &result.types {
                println!("{}", ty.pretty_print());
            }
        }
    }

    output::print_diagnostics(&result.diagnostics, color)?;
    Ok(result.is_clean())
}

/// Body compiler that keeps only signatures and initialization order
struct OutlineBodyCompiler;

const NUMERIC_TYPES: &[&str] = &[
    "System.Byte",
    "System.SByte",
    "System.Int16",
    "System.UInt16",
    "System.Int32",
    "System.UInt32",
    "System.Int64",
    "System.UInt64",
    "System.Single",
    "System.Double",
    "System.Decimal",
    "System.Char",
];

fn parameter_names(ctx: &BodyContext<'_, '_>, method: MethodId) -> Vec<String> {
    ctx.type_system()
        .method(method)
        .parameters
        .iter()
        .map(|p| p.name.clone())
        .collect()
}

impl MethodBodyCompiler for OutlineBodyCompiler {
    fn compile_method(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        method: MethodId,
        _semantics: &MethodSemantics,
        _body: &SourceCode,
    ) -> Result<JsFunctionDefinition, LowerError> {
        Ok(JsFunctionDefinition::from_statements(parameter_names(ctx, method), Vec::new()))
    }

    fn compile_constructor(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        constructor: MethodId,
        _semantics: &ConstructorSemantics,
        _body: Option<&SourceCode>,
        instance_init: &[JsStatement],
    ) -> Result<JsFunctionDefinition, LowerError> {
        Ok(JsFunctionDefinition::from_statements(
            parameter_names(ctx, constructor),
            instance_init.to_vec(),
        ))
    }

    fn compile_field_initializer(
        &mut self,
        _ctx: &BodyContext<'_, '_>,
        target: JsExpression,
        initializer: &SourceCode,
    ) -> Result<Vec<JsStatement>, LowerError> {
        let source = JsExpression::identifier(initializer.text.trim());
        Ok(vec![JsStatement::assign(target, source)])
    }

    fn default_value(&mut self, ctx: &BodyContext<'_, '_>, ty: &TypeRef) -> Result<JsExpression, LowerError> {
        match ty {
            TypeRef::Def { id, .. } => {
                let name = ctx.type_system().full_name(*id);
                Ok(if name == "System.Boolean" {
                    JsExpression::boolean(false)
                } else if NUMERIC_TYPES.contains(&name.as_str()) {
                    JsExpression::number(0.0)
                } else {
                    JsExpression::Null
                })
            }
            TypeRef::TypeParam { .. } => match ctx.runtime_type_ref(ty)? {
                Some(param) => Ok(JsExpression::invoke(
                    JsExpression::member_access(param, "getDefaultValue"),
                    Vec::new(),
                )),
                None => Ok(JsExpression::Null),
            },
            _ => Ok(JsExpression::Null),
        }
    }

    fn compile_auto_event_adder(
        &mut self,
        _ctx: &BodyContext<'_, '_>,
        _event: EventId,
        _semantics: &MethodSemantics,
        _backing_field: &str,
    ) -> Result<JsFunctionDefinition, LowerError> {
        Ok(JsFunctionDefinition::from_statements(vec!["value".to_string()], Vec::new()))
    }

    fn compile_auto_event_remover(
        &mut self,
        _ctx: &BodyContext<'_, '_>,
        _event: EventId,
        _semantics: &MethodSemantics,
        _backing_field: &str,
    ) -> Result<JsFunctionDefinition, LowerError> {
        Ok(JsFunctionDefinition::from_statements(vec!["value".to_string()], Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_engine::lower::{Declaration, Symbol, TypeDeclaration, VariableSyntax, VariablesDeclaration};
    use kiln_engine::typesys::{Location, MemberRef, TypeKind, TypeSystemBuilder};

    #[test]
    fn test_outline_keeps_initialization_order() {
        let mut b = TypeSystemBuilder::new("Main");
        let int = b.core_type("System", "Int32", TypeKind::Struct);
        let c = b.class("Ns", "C").finish();
        let count = b.field(c, "count", TypeRef::def(int)).finish();
        let ts = b.build();

        let field = Declaration::Field(VariablesDeclaration {
            location: Location::new("c.cs", 2, 5),
            variables: vec![VariableSyntax {
                name: "count".to_string(),
                symbol: Symbol::Member(MemberRef::Field(count)),
                initializer: None,
                location: Location::new("c.cs", 2, 9),
            }],
        });
        let units = vec![CompilationUnit {
            file: "c.cs".to_string(),
            defined_symbols: Vec::new(),
            declarations: vec![Declaration::Type(TypeDeclaration {
                name: "C".to_string(),
                symbol: Symbol::Type(c),
                location: Location::new("c.cs", 1, 1),
                members: vec![field],
            })],
        }];

        let output = Compiler::new(CompilerOptions::default())
            .compile(&ts, &units, &mut OutlineBodyCompiler)
            .unwrap();
        let class = output.find_class("Ns.C").unwrap();
        assert_eq!(
            class.unnamed_constructor().unwrap().pretty_print(),
            "function() {\n\tthis.count = 0;\n}"
        );
    }

    #[test]
    fn test_dangling_symbol_is_an_error() {
        let ts = TypeSystemBuilder::new("Main").build();
        let document = json!({
            "declarations": ts,
            "units": [{
                "file": "c.cs",
                "declarations": [{
                    "kind": "field",
                    "variables": [{ "name": "x", "symbol": { "Member": { "Field": 7 } } }]
                }]
            }]
        });
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, document.to_string().as_bytes()).unwrap();

        let err = execute(file.path(), CompilerOptions::default(), Format::Text, ColorChoice::Never).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("field #7"), "{}", message);
    }

    #[test]
    fn test_input_document_parses() {
        let ts = TypeSystemBuilder::new("Main").build();
        let text = json!({ "declarations": ts }).to_string();
        let document: LowerInput = serde_json::from_str(&text).unwrap();
        assert!(document.units.is_empty());
        assert_eq!(document.declarations.assemblies.len(), 2);
    }
}
