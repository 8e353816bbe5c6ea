//! Integration tests for the naming engine
//!
//! Tests cover:
//! - Stability of queries across calls and across engines
//! - Uniqueness of names within a type and down a hierarchy
//! - Diamond collisions between unrelated bases
//! - Overrides keeping the name of the member they override
//! - Generated-name encoding
//! - Validation of deserialized declaration sets

use kiln_engine::diagnostic::codes;
use kiln_engine::naming::encode_number;
use kiln_engine::naming::names::{is_keyword, is_valid_identifier};
use kiln_engine::typesys::{AssemblyId, Marker, MemberRef, TypeKind, TypeRef, TypeSystem};
use kiln_engine::{Diagnostics, NamingEngine, NamingError, TypeSystemBuilder, TypeSystemError};
use std::collections::BTreeSet;

fn prepared(ts: &TypeSystem, minimize_names: bool) -> (NamingEngine<'_>, Diagnostics) {
    let mut engine = NamingEngine::new(ts, minimize_names);
    let mut diagnostics = Diagnostics::new();
    engine.prepare(AssemblyId(0), &mut diagnostics);
    (engine, diagnostics)
}

/// Method names of every method declared on `ty`, in declaration order
fn method_names(engine: &NamingEngine<'_>, ts: &TypeSystem, ty: kiln_engine::typesys::TypeId) -> Vec<String> {
    ts.type_def(ty)
        .members
        .iter()
        .filter_map(|m| match m {
            MemberRef::Method(id) if !ts.method(*id).is_constructor() && !ts.method(*id).is_accessor() => {
                engine.method_semantics(*id).unwrap().name().map(str::to_string)
            }
            _ => None,
        })
        .collect()
}

fn overloaded_type_system() -> (TypeSystem, kiln_engine::typesys::TypeId) {
    let mut b = TypeSystemBuilder::new("Main");
    let int = b.core_type("System", "Int32", TypeKind::Struct);
    let string = b.core_type("System", "String", TypeKind::Class);
    let c = b.class("Ns", "Worker").finish();
    b.method(c, "Run").param("job", TypeRef::def(string)).finish();
    b.method(c, "Run").finish();
    b.method(c, "Run").param("count", TypeRef::def(int)).finish();
    b.method(c, "Stop").finish();
    b.method(c, "Helper").private().finish();
    b.method(c, "Other").private().finish();
    b.method(c, "Create").static_().finish();
    b.method(c, "Create").static_().param("n", TypeRef::def(int)).finish();
    b.property(c, "Count", TypeRef::def(int)).finish();
    b.field(c, "count", TypeRef::def(int)).private().finish();
    (b.build(), c)
}

// =============================================================================
// STABILITY
// =============================================================================

#[test]
fn test_queries_are_idempotent() {
    let (ts, c) = overloaded_type_system();
    let (engine, _) = prepared(&ts, false);

    for &member in &ts.type_def(c).members {
        match member {
            MemberRef::Method(id) if ts.method(id).is_constructor() => {
                assert_eq!(engine.constructor_semantics(id), engine.constructor_semantics(id));
            }
            MemberRef::Method(id) => assert_eq!(engine.method_semantics(id), engine.method_semantics(id)),
            MemberRef::Property(id) => assert_eq!(engine.property_semantics(id), engine.property_semantics(id)),
            MemberRef::Field(id) => assert_eq!(engine.field_semantics(id), engine.field_semantics(id)),
            MemberRef::Event(id) => assert_eq!(engine.event_semantics(id), engine.event_semantics(id)),
        }
    }
    assert_eq!(engine.type_semantics(c), engine.type_semantics(c));
}

#[test]
fn test_naming_is_deterministic() {
    let (ts, c) = overloaded_type_system();
    for minimize_names in [false, true] {
        let (first, _) = prepared(&ts, minimize_names);
        let (second, _) = prepared(&ts, minimize_names);
        assert_eq!(method_names(&first, &ts, c), method_names(&second, &ts, c));
        assert_eq!(first.exported_instance_names(c), second.exported_instance_names(c));
    }

    let (engine, _) = prepared(&ts, false);
    // Overloads are ordered by parameter count, then parameter types
    assert_eq!(
        method_names(&engine, &ts, c),
        vec!["run$2", "run", "run$1", "stop", "$helper", "$other", "create", "create$1"]
    );
}

#[test]
fn test_unprepared_engine_reports_unresolved_members() {
    let (ts, c) = overloaded_type_system();
    let engine = NamingEngine::new(&ts, false);

    let MemberRef::Method(run) = ts.type_def(c).members[0] else {
        panic!("expected a method");
    };
    assert!(matches!(engine.method_semantics(run), Err(NamingError::UnresolvedMember(_))));
    assert!(matches!(engine.type_semantics(c), Err(NamingError::UnresolvedType(_))));
}

// =============================================================================
// UNIQUENESS
// =============================================================================

#[test]
fn test_instance_names_are_unique_down_the_hierarchy() {
    let mut b = TypeSystemBuilder::new("Main");
    let int = b.core_type("System", "Int32", TypeKind::Struct);
    let base = b.class("Ns", "Base").finish();
    b.method(base, "Run").finish();
    b.method(base, "Stop").finish();
    b.property(base, "Value", TypeRef::def(int)).finish();
    let middle = b.class("Ns", "Middle").base(TypeRef::def(base)).finish();
    b.method(middle, "Run").finish();
    b.method(middle, "Reset").private().finish();
    let leaf = b.class("Ns", "Leaf").base(TypeRef::def(middle)).finish();
    b.method(leaf, "Run").finish();
    b.method(leaf, "Stop").finish();
    b.property(leaf, "Value", TypeRef::def(int)).finish();
    let ts = b.build();

    for minimize_names in [false, true] {
        let (engine, diagnostics) = prepared(&ts, minimize_names);
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);

        let sets: Vec<&BTreeSet<String>> = [base, middle, leaf]
            .iter()
            .map(|t| engine.exported_instance_names(*t).unwrap())
            .collect();
        let total: usize = sets.iter().map(|s| s.len()).sum();
        let union: BTreeSet<&String> = sets.iter().flat_map(|s| s.iter()).collect();
        assert_eq!(union.len(), total, "names shared between levels: {:?}", sets);
    }

    let (engine, _) = prepared(&ts, false);
    assert_eq!(method_names(&engine, &ts, leaf), vec!["run$2", "stop$1"]);
}

#[test]
fn test_static_names_are_unique_within_a_type() {
    let mut b = TypeSystemBuilder::new("Main");
    let int = b.core_type("System", "Int32", TypeKind::Struct);
    let c = b.class("Ns", "Registry").finish();
    b.method(c, "Length").static_().finish();
    b.method(c, "Prototype").static_().finish();
    b.method(c, "Find").static_().finish();
    b.method(c, "Find").static_().param("key", TypeRef::def(int)).finish();
    b.field(c, "find", TypeRef::def(int)).static_().finish();
    let ts = b.build();

    let (engine, _) = prepared(&ts, false);
    let mut names: Vec<String> = method_names(&engine, &ts, c);
    for &member in &ts.type_def(c).members {
        if let MemberRef::Field(id) = member {
            names.extend(engine.field_semantics(id).unwrap().name().map(str::to_string));
        }
    }

    let distinct: BTreeSet<&String> = names.iter().collect();
    assert_eq!(distinct.len(), names.len(), "{:?}", names);
    // Names that clash with function properties are never handed out
    assert!(!names.iter().any(|n| n == "length" || n == "prototype"));
}

#[test]
fn test_minimized_private_names_are_valid_identifiers() {
    let mut b = TypeSystemBuilder::new("Main");
    let c = b.class("Ns", "Crowded").finish();
    for i in 0..200 {
        b.method(c, &format!("Method{}", i)).private().finish();
    }
    b.method(c, "Visible").finish();
    let ts = b.build();

    let (engine, _) = prepared(&ts, true);
    let names = method_names(&engine, &ts, c);
    assert_eq!(names.len(), 201);
    assert_eq!(names.last().map(String::as_str), Some("visible"));

    let distinct: BTreeSet<&String> = names.iter().collect();
    assert_eq!(distinct.len(), names.len());
    assert!(names.iter().all(|n| is_valid_identifier(n)), "{:?}", names);
}

// =============================================================================
// DIAMONDS
// =============================================================================

#[test]
fn test_diamond_collision_is_reported_once() {
    let mut b = TypeSystemBuilder::new("Main");
    let i1 = b.interface("Ns", "ILeft").finish();
    b.method(i1, "Foo").finish();
    let i2 = b.interface("Ns", "IRight").finish();
    b.method(i2, "Foo").finish();
    let i3 = b
        .interface("Ns", "IBoth")
        .implements(TypeRef::def(i1))
        .implements(TypeRef::def(i2))
        .finish();
    let ts = b.build();

    let (_, diagnostics) = prepared(&ts, false);
    assert_eq!(diagnostics.codes(), vec![codes::DIAMOND_MEMBER_COLLISION]);
    let message = diagnostics.messages().next().unwrap();
    assert_eq!(message.args[0], ts.full_name(i3));
    assert_eq!(message.args[3], "foo");
    assert_eq!(message.text(), "Ns.IBoth inherits the member name 'foo' from both Ns.ILeft and Ns.IRight");
}

#[test]
fn test_related_bases_are_not_a_diamond() {
    let mut b = TypeSystemBuilder::new("Main");
    let i1 = b.interface("Ns", "IBase").finish();
    b.method(i1, "Foo").finish();
    let i2 = b.interface("Ns", "IDerived").implements(TypeRef::def(i1)).finish();
    b.interface("Ns", "IBoth")
        .implements(TypeRef::def(i1))
        .implements(TypeRef::def(i2))
        .finish();
    let ts = b.build();

    let (_, diagnostics) = prepared(&ts, false);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);
}

// =============================================================================
// OVERRIDES
// =============================================================================

#[test]
fn test_overrides_keep_the_base_name_down_the_chain() {
    let mut b = TypeSystemBuilder::new("Main");
    let a = b.class("Ns", "A").finish();
    let go = b
        .method(a, "Run")
        .virtual_()
        .marker(Marker::ScriptName(Some("go".to_string())))
        .finish();
    let bt = b.class("Ns", "B").base(TypeRef::def(a)).finish();
    let b_run = b.method(bt, "Run").overrides(go).finish();
    let c = b.class("Ns", "C").base(TypeRef::def(bt)).finish();
    let c_run = b
        .method(c, "Run")
        .overrides(b_run)
        .marker(Marker::ScriptName(Some("renamed".to_string())))
        .finish();
    let ts = b.build();

    let (engine, diagnostics) = prepared(&ts, false);
    assert_eq!(engine.method_semantics(go).unwrap().name(), Some("go"));
    assert_eq!(engine.method_semantics(b_run).unwrap().name(), Some("go"));
    assert_eq!(engine.method_semantics(c_run).unwrap().name(), Some("go"));
    assert_eq!(diagnostics.codes(), vec![codes::OVERRIDE_RENAMED]);
}

// =============================================================================
// ENCODING
// =============================================================================

#[test]
fn test_encode_number_plain() {
    let digits: Vec<String> = (0..10).map(|i| encode_number(i, false)).collect();
    assert_eq!(digits, vec!["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]);
    assert_eq!(encode_number(10, false), "a");
    assert_eq!(encode_number(61, false), "Z");
    assert_eq!(encode_number(62, false), "10");
}

#[test]
fn test_encode_number_identifiers() {
    assert_eq!(encode_number(0, true), "a");
    assert_eq!(encode_number(51, true), "Z");
    assert_eq!(encode_number(52, true), "ba");

    let mut seen = BTreeSet::new();
    for i in 0..20_000 {
        let name = encode_number(i, true);
        assert!(is_valid_identifier(&name), "{} -> {}", i, name);
        assert!(!is_keyword(&name));
        assert!(seen.insert(name), "duplicate encoding for {}", i);
    }
    assert!(seen.contains("_do"));
    assert!(seen.contains("_if"));
}

// =============================================================================
// DESERIALIZED INPUT
// =============================================================================

#[test]
fn test_validation_catches_what_the_engine_would_index() {
    let (ts, c) = overloaded_type_system();
    assert_eq!(ts.validate(), Ok(()));

    let mut document = serde_json::to_value(&ts).unwrap();
    document["methods"] = serde_json::json!([]);
    let broken: TypeSystem = serde_json::from_value(document).unwrap();
    assert!(matches!(
        broken.validate(),
        Err(TypeSystemError::DanglingId { kind: "method", .. })
    ));

    // An untouched round trip resolves to the same names
    let restored: TypeSystem = serde_json::from_value(serde_json::to_value(&ts).unwrap()).unwrap();
    assert_eq!(restored.validate(), Ok(()));
    let (engine, _) = prepared(&restored, false);
    assert_eq!(method_names(&engine, &restored, c), method_names(&prepared(&ts, false).0, &ts, c));
}
