//! `kiln names`: print the script semantics of a declaration set

use crate::output;
use anyhow::Context;
use crate::Format;
use kiln_engine::typesys::{MemberRef, TypeId};
use kiln_engine::{CompilerOptions, Diagnostics, NamingEngine, NamingError, TypeSystem};
use serde::Serialize;
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;
use termcolor::{ColorChoice, StandardStream};

pub fn execute(input: &Path, options: CompilerOptions, format: Format, color: ColorChoice) -> anyhow::Result<bool> {
    let ts: TypeSystem = super::read_json(input)?;
    ts.validate()
        .with_context(|| format!("invalid declarations in {}", input.display()))?;
    let main_assembly = options.resolve_main_assembly(&ts)?;

    let mut diagnostics = Diagnostics::new();
    let mut engine = NamingEngine::new(&ts, options.minimize_names);
    engine.prepare(main_assembly, &mut diagnostics);

    let mut types: Vec<TypeId> = ts
        .type_ids()
        .filter(|id| ts.type_def(*id).assembly == main_assembly)
        .collect();
    types.sort_by_key(|id| ts.full_name(*id));

    match format {
        Format::Json => {
            let report = types
                .iter()
                .map(|id| type_json(&engine, *id))
                .collect::<anyhow::Result<Vec<Value>>>()?;
            let document = json!({ "types": report, "diagnostics": &diagnostics });
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Format::Text => {
            let mut stdout = StandardStream::stdout(color);
            for id in &types {
                write_type(&mut stdout, &engine, *id)?;
            }
        }
    }

    output::print_diagnostics(&diagnostics, color)?;
    Ok(!diagnostics.has_errors())
}

fn semantics_value<T: Serialize>(result: Result<T, NamingError>) -> anyhow::Result<Value> {
    match result {
        Ok(semantics) => Ok(serde_json::to_value(semantics)?),
        Err(err) => Ok(json!({ "error": err.to_string() })),
    }
}

fn member_value(engine: &NamingEngine<'_>, member: MemberRef) -> anyhow::Result<Value> {
    let ts = engine.type_system();
    match member {
        MemberRef::Method(id) if ts.method(id).is_constructor() => semantics_value(engine.constructor_semantics(id)),
        MemberRef::Method(id) => semantics_value(engine.method_semantics(id)),
        MemberRef::Property(id) => semantics_value(engine.property_semantics(id)),
        MemberRef::Field(id) => semantics_value(engine.field_semantics(id)),
        MemberRef::Event(id) => semantics_value(engine.event_semantics(id)),
    }
}

/// Accessors are shown under their property or event
fn listed_members<'ts>(engine: &NamingEngine<'ts>, id: TypeId) -> impl Iterator<Item = MemberRef> + 'ts {
    let ts = engine.type_system();
    ts.type_def(id)
        .members
        .iter()
        .copied()
        .filter(move |m| !matches!(m, MemberRef::Method(method) if ts.method(*method).is_accessor()))
}

fn member_kind(engine: &NamingEngine<'_>, member: MemberRef) -> &'static str {
    match member {
        MemberRef::Method(id) if engine.type_system().method(id).is_constructor() => "constructor",
        MemberRef::Method(_) => "method",
        MemberRef::Property(_) => "property",
        MemberRef::Field(_) => "field",
        MemberRef::Event(_) => "event",
    }
}

fn type_json(engine: &NamingEngine<'_>, id: TypeId) -> anyhow::Result<Value> {
    let ts = engine.type_system();
    let members = listed_members(engine, id)
        .map(|m| -> anyhow::Result<Value> {
            let semantics = member_value(engine, m)?;
            Ok(json!({
                "member": ts.qualified_member_name(m),
                "kind": member_kind(engine, m),
                "semantics": semantics,
            }))
        })
        .collect::<anyhow::Result<Vec<Value>>>()?;
    let semantics = semantics_value(engine.type_semantics(id))?;
    Ok(json!({
        "type": ts.full_name(id),
        "semantics": semantics,
        "members": members,
    }))
}

/// One-line rendering of a serialized semantics value: its kind, then its
/// name-like fields, then nested accessor semantics
fn summarize(value: &Value) -> String {
    let Some(object) = value.as_object() else {
        return value.to_string();
    };
    if let Some(error) = object.get("error").and_then(Value::as_str) {
        return format!("error: {}", error);
    }
    let mut parts = vec![object.get("kind").and_then(Value::as_str).unwrap_or("?").to_string()];
    for key in ["name", "template"] {
        if let Some(text) = object.get(key).and_then(Value::as_str) {
            parts.push(format!("{:?}", text));
        }
    }
    for key in ["getter", "setter", "adder", "remover"] {
        if let Some(nested) = object.get(key).filter(|v| !v.is_null()) {
            parts.push(format!("{}=({})", key, summarize(nested)));
        }
    }
    parts.join(" ")
}

fn write_type(out: &mut StandardStream, engine: &NamingEngine<'_>, id: TypeId) -> anyhow::Result<()> {
    let ts = engine.type_system();
    let header = format!(
        "{}: {}",
        ts.full_name(id),
        summarize(&semantics_value(engine.type_semantics(id))?)
    );
    output::heading(out, &header)?;
    for member in listed_members(engine, id) {
        writeln!(
            out,
            "  {} {}: {}",
            member_kind(engine, member),
            ts.member_info(member).name,
            summarize(&member_value(engine, member)?)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_engine::TypeSystemBuilder;

    #[test]
    fn test_nesting_cycle_is_reported_not_followed() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let ts = b.build();
        let mut document = serde_json::to_value(&ts).unwrap();
        document["types"][c.index()]["declaring_type"] = json!(c.0);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", document).unwrap();
        let err = execute(file.path(), CompilerOptions::default(), Format::Json, ColorChoice::Never).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("invalid declarations"), "{}", message);
        assert!(message.contains("nested in itself"), "{}", message);
    }

    #[test]
    fn test_semantics_value_keeps_naming_errors() {
        let failed: Result<String, NamingError> = Err(NamingError::UnresolvedType("Ns.C".to_string()));
        let value = semantics_value(failed).unwrap();
        assert_eq!(value["error"], "Type 'Ns.C' has no script semantics");
        assert_eq!(semantics_value(Ok::<_, NamingError>("x")).unwrap(), json!("x"));
    }

    #[test]
    fn test_summarize() {
        let value = json!({ "kind": "normal", "name": "run", "generate-code": true });
        assert_eq!(summarize(&value), "normal \"run\"");

        let value = json!({
            "kind": "get-and-set-methods",
            "getter": { "kind": "normal", "name": "get_x" },
            "setter": null,
        });
        assert_eq!(summarize(&value), "get-and-set-methods getter=(normal \"get_x\")");

        assert_eq!(summarize(&json!({ "error": "boom" })), "error: boom");
    }
}
