//! Naming / semantics resolution
//!
//! Decides, for every declaration, the identifier and calling convention it
//! gets in emitted script. `NamingEngine::prepare` runs one whole-program
//! sweep; afterwards every `*_semantics` query is a read of the tables it
//! built.
//!
//! # Structure
//!
//! - `types` - Type-level resolution (names, namespaces, special kinds)
//! - `members` - Per-type member grouping, ordering and name tables
//! - `methods` - Ordered method rules
//! - `constructors` / `properties` / `fields` - Other member kinds
//! - `names` - Identifier encoding, casing and reserved names
//! - `inline_code` - Inline-code template parsing and validation
//!
//! Members of a type are resolved only after all of its base types, so
//! inherited instance names are known and overrides can copy the semantics
//! of the member they override.

mod constructors;
mod fields;
pub mod inline_code;
mod members;
mod methods;
pub mod names;
mod properties;
mod types;

pub use members::NameTable;
pub use names::encode_number;

use crate::diagnostic::Diagnostics;
use crate::error::NamingError;
use crate::semantics::{
    ConstructorSemantics, EventSemantics, FieldSemantics, MethodSemantics, PropertySemantics,
    TestMethodData, TypeSemantics,
};
use crate::typesys::{
    AssemblyId, EventId, FieldId, Location, MemberRef, MethodId, PropertyId, TypeId, TypeKind,
    TypeParamOwner, TypeSystem,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::collections::BTreeSet;

/// Name of the root function type delegates map to
const FUNCTION_TYPE: &str = "Function";

/// Resolved type plus the flags later rules consult
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRecord {
    pub semantics: TypeSemantics,
    pub is_global_methods: bool,
    pub is_record: bool,
    pub is_named_values: bool,
    pub is_imported: bool,
    pub is_real_type: bool,
    pub is_resources: bool,
    /// `Some` for mixins: the object the methods are mixed into
    pub mixin_arg: Option<String>,
    pub is_test_fixture: bool,
}

impl TypeRecord {
    fn not_usable() -> Self {
        Self {
            semantics: TypeSemantics::NotUsable,
            is_global_methods: false,
            is_record: false,
            is_named_values: false,
            is_imported: false,
            is_real_type: true,
            is_resources: false,
            mixin_arg: None,
            is_test_fixture: false,
        }
    }
}

/// Resolution context for one compilation
pub struct NamingEngine<'ts> {
    ts: &'ts TypeSystem,
    minimize_names: bool,
    root_object: Option<TypeId>,
    root_record: Option<TypeId>,

    types: FxHashMap<TypeId, TypeRecord>,
    /// Instance names each type passes on to its subtypes
    instance_member_names: FxHashMap<TypeId, BTreeSet<String>>,
    members_in_progress: FxHashSet<TypeId>,

    methods: FxHashMap<MethodId, MethodSemantics>,
    constructors: FxHashMap<MethodId, ConstructorSemantics>,
    properties: FxHashMap<PropertyId, PropertySemantics>,
    fields: FxHashMap<FieldId, FieldSemantics>,
    events: FxHashMap<EventId, EventSemantics>,
    type_parameter_names: FxHashMap<(TypeParamOwner, u32), String>,
    test_data: FxHashMap<MethodId, TestMethodData>,

    /// Counter for minimized internal type names, per assembly and namespace
    internal_type_counts: FxHashMap<(AssemblyId, String), usize>,

    // Backing-field names are assigned on first query
    property_backing_fields: RefCell<FxHashMap<PropertyId, String>>,
    event_backing_fields: RefCell<FxHashMap<EventId, String>>,
    backing_field_counts: RefCell<FxHashMap<TypeId, usize>>,

    diagnostics: Diagnostics,
}

impl<'ts> NamingEngine<'ts> {
    /// `ts` must pass `TypeSystem::validate`; builder output always does.
    pub fn new(ts: &'ts TypeSystem, minimize_names: bool) -> Self {
        Self {
            ts,
            minimize_names,
            root_object: ts.root_object(),
            root_record: ts.root_record(),
            types: FxHashMap::default(),
            instance_member_names: FxHashMap::default(),
            members_in_progress: FxHashSet::default(),
            methods: FxHashMap::default(),
            constructors: FxHashMap::default(),
            properties: FxHashMap::default(),
            fields: FxHashMap::default(),
            events: FxHashMap::default(),
            type_parameter_names: FxHashMap::default(),
            test_data: FxHashMap::default(),
            internal_type_counts: FxHashMap::default(),
            property_backing_fields: RefCell::new(FxHashMap::default()),
            event_backing_fields: RefCell::new(FxHashMap::default()),
            backing_field_counts: RefCell::new(FxHashMap::default()),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn type_system(&self) -> &'ts TypeSystem {
        self.ts
    }

    pub fn minimize_names(&self) -> bool {
        self.minimize_names
    }

    /// Resolve every type of the declaration set and all of their members.
    ///
    /// Types are visited ordered by assembly name, then reflection name, so
    /// minimized names do not depend on declaration order. A failure inside
    /// one type is reported as an internal error and the sweep continues.
    #[tracing::instrument(skip_all, fields(types = self.ts.types.len()))]
    pub fn prepare(&mut self, main_assembly: AssemblyId, diagnostics: &mut Diagnostics) {
        let ts = self.ts;

        let assembly = ts.assembly(main_assembly);
        if let Some(arg) = assembly.markers.script_namespace() {
            let valid = matches!(arg, Some(ns) if ns.is_empty() || names::is_valid_nested_identifier(ns));
            if !valid {
                self.diagnostics.message(
                    crate::diagnostic::codes::INVALID_SCRIPT_NAMESPACE,
                    &assembly.location,
                    vec!["assembly".to_string()],
                );
            }
        }

        let mut order: Vec<(String, String, TypeId)> = ts
            .type_ids()
            .map(|id| {
                let def = ts.type_def(id);
                (ts.assembly(def.assembly).name.clone(), ts.reflection_name(id), id)
            })
            .collect();
        order.sort();

        for (_, _, id) in order {
            self.process_type(id);
            if let Err(err) = self.process_type_members(id) {
                self.report_type_failure(id, err);
            }
        }

        tracing::debug!(
            types = self.types.len(),
            methods = self.methods.len(),
            diagnostics = self.diagnostics.len(),
            "naming prepared"
        );
        diagnostics.extend(std::mem::take(&mut self.diagnostics));
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn type_record(&self, id: TypeId) -> Result<&TypeRecord, NamingError> {
        self.types
            .get(&id)
            .ok_or_else(|| NamingError::UnresolvedType(self.ts.full_name(id)))
    }

    pub fn type_semantics(&self, id: TypeId) -> Result<TypeSemantics, NamingError> {
        if self.ts.type_def(id).kind == TypeKind::Delegate {
            return Ok(TypeSemantics::normal(FUNCTION_TYPE));
        }
        self.type_record(id).map(|r| r.semantics.clone())
    }

    pub fn method_semantics(&self, id: MethodId) -> Result<MethodSemantics, NamingError> {
        self.methods
            .get(&id)
            .cloned()
            .ok_or_else(|| self.unresolved(MemberRef::Method(id)))
    }

    pub fn constructor_semantics(&self, id: MethodId) -> Result<ConstructorSemantics, NamingError> {
        let declaring = self.ts.method(id).info.declaring_type;
        if self.ts.type_def(declaring).kind == TypeKind::Anonymous {
            return Ok(ConstructorSemantics::Json { members: Vec::new() });
        }
        self.constructors
            .get(&id)
            .cloned()
            .ok_or_else(|| self.unresolved(MemberRef::Method(id)))
    }

    pub fn property_semantics(&self, id: PropertyId) -> Result<PropertySemantics, NamingError> {
        let prop = self.ts.property(id);
        if self.ts.type_def(prop.info.declaring_type).kind == TypeKind::Anonymous {
            return Ok(PropertySemantics::Field {
                name: prop.info.name.replace("<>", "$"),
            });
        }
        self.properties
            .get(&id)
            .cloned()
            .ok_or_else(|| self.unresolved(MemberRef::Property(id)))
    }

    pub fn field_semantics(&self, id: FieldId) -> Result<FieldSemantics, NamingError> {
        self.fields
            .get(&id)
            .cloned()
            .ok_or_else(|| self.unresolved(MemberRef::Field(id)))
    }

    pub fn event_semantics(&self, id: EventId) -> Result<EventSemantics, NamingError> {
        self.events
            .get(&id)
            .cloned()
            .ok_or_else(|| self.unresolved(MemberRef::Event(id)))
    }

    pub fn type_parameter_name(&self, owner: TypeParamOwner, index: u32) -> Result<&str, NamingError> {
        self.type_parameter_names
            .get(&(owner, index))
            .map(String::as_str)
            .ok_or_else(|| {
                let declared = self.ts.type_parameter_declared_name(owner, index).unwrap_or("?");
                NamingError::UnresolvedTypeParameter(declared.to_string())
            })
    }

    /// Storage field of an auto-implemented property
    pub fn auto_property_backing_field_name(&self, id: PropertyId) -> String {
        if let Some(name) = self.property_backing_fields.borrow().get(&id) {
            return name.clone();
        }
        let prop = self.ts.property(id);
        let name = self.backing_field_name(prop.info.declaring_type, &prop.info.name);
        self.property_backing_fields.borrow_mut().insert(id, name.clone());
        name
    }

    /// Storage field of an auto-implemented event
    pub fn auto_event_backing_field_name(&self, id: EventId) -> String {
        if let Some(name) = self.event_backing_fields.borrow().get(&id) {
            return name.clone();
        }
        let evt = self.ts.event(id);
        let name = self.backing_field_name(evt.info.declaring_type, &evt.info.name);
        self.event_backing_fields.borrow_mut().insert(id, name.clone());
        name
    }

    /// `$<depth>$<n>` when minimizing, `$<depth>$<Name>Field` otherwise. The
    /// depth keeps fields of a base and a derived type apart.
    fn backing_field_name(&self, declaring: TypeId, member_name: &str) -> String {
        let depth = self.ts.inheritance_depth(declaring);
        if self.minimize_names {
            let mut counts = self.backing_field_counts.borrow_mut();
            let count = counts.entry(declaring).or_insert(0);
            *count += 1;
            format!("${}${}", depth, count)
        } else {
            format!("${}${}Field", depth, member_name)
        }
    }

    /// Name for a local variable that avoids `used`.
    ///
    /// `declared` is the source name; `None` asks for a temporary.
    pub fn variable_name(&self, declared: Option<&str>, used: &FxHashSet<String>) -> String {
        if self.minimize_names {
            let mut i = used.len();
            loop {
                let name = encode_number(i, true);
                if !used.contains(&name) {
                    return name;
                }
                i += 1;
            }
        }

        let base = declared.map_or_else(|| "$t".to_string(), |n| n.replace("<>", "$"));
        if declared.is_some() && !used.contains(&base) {
            return base;
        }
        let mut i = 1;
        loop {
            let name = format!("{}{}", base, i);
            if !used.contains(&name) {
                return name;
            }
            i += 1;
        }
    }

    /// Alias for the receiver inside nested functions
    pub fn this_alias(&self) -> &'static str {
        if self.minimize_names {
            "$_"
        } else {
            "$this"
        }
    }

    pub fn is_named_values(&self, id: TypeId) -> bool {
        self.types.get(&id).is_some_and(|r| r.is_named_values)
    }

    pub fn is_resources(&self, id: TypeId) -> bool {
        self.types.get(&id).is_some_and(|r| r.is_resources)
    }

    pub fn is_global_methods(&self, id: TypeId) -> bool {
        self.types.get(&id).is_some_and(|r| r.is_global_methods)
    }

    pub fn is_record(&self, id: TypeId) -> bool {
        self.types.get(&id).is_some_and(|r| r.is_record)
    }

    pub fn is_imported(&self, id: TypeId) -> bool {
        self.types.get(&id).is_some_and(|r| r.is_imported)
    }

    pub fn is_real_type(&self, id: TypeId) -> bool {
        self.types.get(&id).map_or(true, |r| r.is_real_type)
    }

    pub fn mixin_arg(&self, id: TypeId) -> Option<&str> {
        self.types.get(&id).and_then(|r| r.mixin_arg.as_deref())
    }

    pub fn is_test_fixture(&self, id: TypeId) -> bool {
        self.types.get(&id).is_some_and(|r| r.is_test_fixture)
    }

    pub fn test_data(&self, id: MethodId) -> Option<&TestMethodData> {
        self.test_data.get(&id)
    }

    /// Instance names `id` exposes to derived types
    pub fn exported_instance_names(&self, id: TypeId) -> Option<&BTreeSet<String>> {
        self.instance_member_names.get(&id)
    }

    fn unresolved(&self, member: MemberRef) -> NamingError {
        NamingError::UnresolvedMember(self.ts.qualified_member_name(member))
    }

    // ========================================================================
    // Diagnostics helpers
    // ========================================================================

    fn type_message(&mut self, code: u32, id: TypeId) {
        let def = self.ts.type_def(id);
        self.diagnostics
            .message(code, &def.location, vec![self.ts.full_name(id)]);
    }

    fn member_message(&mut self, code: u32, member: MemberRef, extra: Vec<String>) {
        let location = self.ts.member_info(member).location.clone();
        let mut args = vec![self.ts.qualified_member_name(member)];
        args.extend(extra);
        self.diagnostics.message(code, &location, args);
    }

    fn report_type_failure(&mut self, id: TypeId, err: NamingError) {
        let def = self.ts.type_def(id);
        self.diagnostics.internal_error(
            &def.location,
            format!("Error importing type {}", self.ts.full_name(id)),
            Some(err.to_string()),
        );
    }

    fn location_message(&mut self, code: u32, location: &Location, args: Vec<String>) {
        self.diagnostics.message(code, location, args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typesys::{TypeRef, TypeSystemBuilder};

    fn prepared(ts: &TypeSystem, minimize: bool) -> (NamingEngine<'_>, Diagnostics) {
        let mut engine = NamingEngine::new(ts, minimize);
        let mut diags = Diagnostics::new();
        engine.prepare(AssemblyId(0), &mut diags);
        (engine, diags)
    }

    #[test]
    fn test_delegates_and_anonymous_types() {
        let mut b = TypeSystemBuilder::new("Main");
        let d = b.delegate("Ns", "Callback").finish();
        let anon = b.anonymous("<>f__AnonymousType0").finish();
        let p = b.property(anon, "<>Name", TypeRef::Dynamic).read_only().finish();
        let ts = b.build();
        let (engine, _) = prepared(&ts, false);

        assert_eq!(engine.type_semantics(d).unwrap(), TypeSemantics::normal("Function"));
        assert_eq!(
            engine.property_semantics(p).unwrap(),
            PropertySemantics::Field {
                name: "$Name".to_string()
            }
        );
    }

    #[test]
    fn test_backing_field_names() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let p1 = b.property(c, "Value", TypeRef::Dynamic).finish();
        let p2 = b.property(c, "Other", TypeRef::Dynamic).finish();
        let ts = b.build();

        let (engine, _) = prepared(&ts, false);
        assert_eq!(engine.auto_property_backing_field_name(p1), "$1$ValueField");

        let (engine, _) = prepared(&ts, true);
        assert_eq!(engine.auto_property_backing_field_name(p2), "$1$1");
        assert_eq!(engine.auto_property_backing_field_name(p1), "$1$2");
        assert_eq!(engine.auto_property_backing_field_name(p2), "$1$1");
    }

    #[test]
    fn test_variable_names() {
        let ts = TypeSystemBuilder::new("Main").build();
        let mut used = FxHashSet::default();

        let (engine, _) = prepared(&ts, false);
        assert_eq!(engine.variable_name(Some("x"), &used), "x");
        used.insert("x".to_string());
        assert_eq!(engine.variable_name(Some("x"), &used), "x1");
        assert_eq!(engine.variable_name(None, &used), "$t1");
        assert_eq!(engine.this_alias(), "$this");

        let (engine, _) = prepared(&ts, true);
        assert_eq!(engine.variable_name(Some("x"), &used), "b");
        assert_eq!(engine.this_alias(), "$_");
    }

    #[test]
    fn test_invalid_assembly_namespace() {
        let mut b = TypeSystemBuilder::new("Main");
        let main = b.main_assembly();
        b.assembly_marker(main, crate::typesys::Marker::ScriptNamespace(Some("1bad".to_string())));
        let ts = b.build();
        let (_, diags) = prepared(&ts, false);
        assert_eq!(diags.codes(), vec![crate::diagnostic::codes::INVALID_SCRIPT_NAMESPACE]);
        assert_eq!(diags.messages().next().unwrap().args, vec!["assembly".to_string()]);
    }
}
