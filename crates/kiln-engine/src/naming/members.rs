//! Member grouping, ordering and name tables

use super::names::{encode_number, make_camel_case, RESERVED_INSTANCE_NAMES, RESERVED_STATIC_NAMES};
use super::NamingEngine;
use crate::diagnostic::codes;
use crate::error::NamingError;
use crate::typesys::{MemberRef, ParameterDef, TypeId, TypeKind, TypeSystem};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Names in use within one member category of a type.
///
/// Seeded names (inherited or reserved) map to `false`; names claimed by the
/// type's own members map to `true`.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    names: FxHashMap<String, bool>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            self.names.entry(name.to_string()).or_insert(false);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn claim(&mut self, name: &str) {
        self.names.insert(name.to_string(), true);
    }

    /// Names claimed by own members, sorted
    pub fn claimed(&self) -> BTreeSet<String> {
        self.names
            .iter()
            .filter(|(_, &own)| own)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// A name not yet in the table.
    ///
    /// With a preference, that name if free, else `pref$1`, `pref$2`...;
    /// without one, the shortest free generated identifier.
    pub fn unique_name(&self, preferred: Option<&str>) -> String {
        match preferred {
            Some(pref) => {
                if !self.contains(pref) {
                    return pref.to_string();
                }
                (1..)
                    .map(|i| format!("{}${}", pref, encode_number(i, false)))
                    .find(|n| !self.contains(n))
                    .unwrap_or_default()
            }
            None => (0..)
                .map(|i| encode_number(i, true))
                .find(|n| !self.contains(n))
                .unwrap_or_default(),
        }
    }
}

/// Preferred name of a member and whether it was given explicitly
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct PreferredName {
    /// `None`: any free generated name will do
    pub name: Option<String>,
    pub specified: bool,
}

impl PreferredName {
    fn inferred(name: Option<String>) -> Self {
        Self {
            name,
            specified: false,
        }
    }

    fn explicit(name: String) -> Self {
        Self {
            name: Some(name),
            specified: true,
        }
    }
}

pub(super) const CONSTRUCTOR_NAME: &str = "$ctor";

impl<'ts> NamingEngine<'ts> {
    pub(super) fn preferred_member_name(&mut self, member: MemberRef) -> PreferredName {
        let ts = self.ts;
        let info = ts.member_info(member);
        let (is_constructor, is_accessor) = match member {
            MemberRef::Method(m) => {
                let def = ts.method(m);
                (def.is_constructor(), def.is_accessor())
            }
            _ => (false, false),
        };
        let declaring = ts.type_def(info.declaring_type);

        let default_name = if is_constructor {
            Some(CONSTRUCTOR_NAME.to_string())
        } else if ts.is_public_member(member) {
            Some(make_camel_case(&info.name))
        } else if self.minimize_names && declaring.kind != TypeKind::Interface {
            None
        } else {
            Some(format!("${}", make_camel_case(&info.name)))
        };

        if info.markers.alternate_signature() {
            let mains: Vec<MemberRef> = ts
                .methods_of(info.declaring_type)
                .filter(|&m| {
                    let other = &ts.method(m).info;
                    other.name == info.name && !other.markers.alternate_signature()
                })
                .map(MemberRef::Method)
                .collect();
            if let [main] = mains.as_slice() {
                return self.preferred_member_name(*main);
            }
            self.member_message(codes::ALTERNATE_SIGNATURE_WITHOUT_MAIN, member, Vec::new());
            return PreferredName::inferred(Some(info.name.clone()));
        }

        let record = self.types.get(&info.declaring_type).cloned();
        let record = match record {
            Some(record) => record,
            None => return PreferredName::inferred(default_name),
        };

        if let Some(script_name) = info.markers.script_name() {
            let mut name = script_name.unwrap_or("").to_string();
            if !name.is_empty() && !super::names::is_valid_identifier(&name) {
                if record.is_named_values {
                    // the invalid name still serves as the constant's value
                    return PreferredName::inferred(default_name);
                }
                self.member_message(codes::INVALID_MEMBER_SCRIPT_NAME, member, Vec::new());
            }
            if name.is_empty() && is_constructor {
                name = CONSTRUCTOR_NAME.to_string();
            }
            return PreferredName::explicit(name);
        }

        if info.markers.preserve_case() {
            return PreferredName::explicit(info.name.clone());
        }

        let is_data = matches!(member, MemberRef::Property(_) | MemberRef::Field(_));
        let preserve_name = (!is_constructor
            && !is_accessor
            && (info.markers.preserve_name()
                || info.markers.receiver_as_first_argument()
                || info.markers.intrinsic_property()
                || record.is_global_methods
                || (!record.semantics.generate_code()
                    && info.implemented_interface_members.is_empty()
                    && !info.is_override)
                || (record.is_record && !info.is_static && is_data)))
            || (record.is_named_values && matches!(member, MemberRef::Field(_)));

        if preserve_name {
            return PreferredName::explicit(make_camel_case(&info.name));
        }
        PreferredName::inferred(default_name)
    }

    /// Resolve the members of `id`, after those of all its base types
    pub(super) fn process_type_members(&mut self, id: TypeId) -> Result<(), NamingError> {
        if self.instance_member_names.contains_key(&id) || !self.members_in_progress.insert(id) {
            return Ok(());
        }
        let result = self.resolve_members(id);
        self.members_in_progress.remove(&id);
        match result {
            Ok(exported) => {
                self.instance_member_names.insert(id, exported);
                Ok(())
            }
            Err(err) => {
                // keep the failure from being retried by every subtype
                self.instance_member_names.insert(id, BTreeSet::new());
                Err(err)
            }
        }
    }

    fn resolve_members(&mut self, id: TypeId) -> Result<BTreeSet<String>, NamingError> {
        let ts = self.ts;

        let mut bases: Vec<(TypeId, BTreeSet<String>)> = Vec::new();
        for base in ts.all_base_type_definitions(id) {
            if base == id {
                continue;
            }
            self.process_type(base);
            if let Err(err) = self.process_type_members(base) {
                self.report_type_failure(base, err);
            }
            let names = self.instance_member_names.get(&base).cloned().unwrap_or_default();
            bases.push((base, names));
        }

        for (i, (first, first_names)) in bases.iter().enumerate() {
            for (second, second_names) in &bases[i + 1..] {
                if ts.derives_from(*first, *second) || ts.derives_from(*second, *first) {
                    continue;
                }
                for dup in first_names.intersection(second_names) {
                    let def = ts.type_def(id);
                    self.diagnostics.message(
                        codes::DIAMOND_MEMBER_COLLISION,
                        &def.location,
                        vec![
                            ts.full_name(id),
                            ts.full_name(*first),
                            ts.full_name(*second),
                            dup.clone(),
                        ],
                    );
                }
            }
        }

        let mut instance_names = NameTable::new();
        for (_, names) in &bases {
            instance_names.seed(names.iter().map(String::as_str));
        }
        instance_names.seed(RESERVED_INSTANCE_NAMES.iter().copied());
        let mut static_names = NameTable::new();
        static_names.seed(RESERVED_STATIC_NAMES.iter().copied());

        // Group own members by preferred name, keeping first-occurrence order
        let mut groups: Vec<(Option<String>, Vec<(MemberRef, bool)>)> = Vec::new();
        for &member in &ts.type_def(id).members {
            let preferred = self.preferred_member_name(member);
            match groups.iter().position(|(name, _)| *name == preferred.name) {
                Some(i) => groups[i].1.push((member, preferred.specified)),
                None => groups.push((preferred.name, vec![(member, preferred.specified)])),
            }
        }

        let is_record = self.types.get(&id).is_some_and(|r| r.is_record);
        for (name, mut entries) in groups {
            entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| compare_members(ts, a.0, b.0)));
            tracing::trace!(ty = %ts.full_name(id), group = ?name, count = entries.len(), "member group");

            for (member, specified) in entries {
                let preferred = name.as_deref();
                let is_static = ts.member_info(member).is_static;
                match member {
                    MemberRef::Method(m) if ts.method(m).is_constructor() => {
                        self.process_constructor(m, preferred, specified, &mut static_names);
                    }
                    MemberRef::Method(m) => {
                        let table = if is_static || is_record {
                            &mut static_names
                        } else {
                            &mut instance_names
                        };
                        self.process_method(m, preferred, specified, table)?;
                    }
                    MemberRef::Property(p) => {
                        let table = if is_static { &mut static_names } else { &mut instance_names };
                        self.process_property(p, preferred, specified, table)?;
                    }
                    MemberRef::Field(f) => {
                        let table = if is_static { &mut static_names } else { &mut instance_names };
                        self.process_field(f, preferred, specified, table);
                    }
                    MemberRef::Event(e) => {
                        let table = if is_static { &mut static_names } else { &mut instance_names };
                        self.process_event(e, preferred, specified, table)?;
                    }
                }
            }
        }

        Ok(instance_names.claimed())
    }
}

fn kind_rank(member: MemberRef) -> u8 {
    match member {
        MemberRef::Method(_) => 0,
        MemberRef::Property(_) => 1,
        MemberRef::Field(_) => 2,
        MemberRef::Event(_) => 3,
    }
}

/// Methods, then properties, fields and events; by name within a kind,
/// overloads by parameter count and then parameter types
pub(super) fn compare_members(ts: &TypeSystem, a: MemberRef, b: MemberRef) -> Ordering {
    let rank = kind_rank(a).cmp(&kind_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    let by_name = ts.member_info(a).name.cmp(&ts.member_info(b).name);
    match (a, b) {
        (MemberRef::Method(x), MemberRef::Method(y)) => {
            let (x, y) = (ts.method(x), ts.method(y));
            by_name
                .then_with(|| x.parameters.len().cmp(&y.parameters.len()))
                .then_with(|| {
                    let sig = |ps: &[ParameterDef]| {
                        ps.iter().map(|p| ts.type_ref_name(&p.ty)).collect::<Vec<_>>().join(",")
                    };
                    sig(&x.parameters).cmp(&sig(&y.parameters))
                })
        }
        _ => by_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Diagnostics;
    use crate::semantics::MethodSemantics;
    use crate::typesys::{AssemblyId, Marker, TypeRef, TypeSystemBuilder};

    #[test]
    fn test_unique_name() {
        let mut table = NameTable::new();
        assert_eq!(table.unique_name(Some("foo")), "foo");
        table.claim("foo");
        assert_eq!(table.unique_name(Some("foo")), "foo$1");
        table.claim("foo$1");
        assert_eq!(table.unique_name(Some("foo")), "foo$2");
        assert_eq!(table.unique_name(None), "a");
        table.seed(["a"]);
        assert_eq!(table.unique_name(None), "b");
        assert_eq!(table.claimed().len(), 2);
    }

    #[test]
    fn test_overloads_are_numbered_deterministically() {
        let mut b = TypeSystemBuilder::new("Main");
        let int = b.core_type("System", "Int32", TypeKind::Struct);
        let string = b.core_type("System", "String", TypeKind::Class);
        let c = b.class("Ns", "C").finish();
        let m_string = b.method(c, "M").param("s", TypeRef::def(string)).finish();
        let m_none = b.method(c, "M").finish();
        let m_int = b.method(c, "M").param("i", TypeRef::def(int)).finish();
        let ts = b.build();

        let mut engine = NamingEngine::new(&ts, false);
        engine.prepare(AssemblyId(0), &mut Diagnostics::new());
        let name = |m| engine.method_semantics(m).unwrap().name().unwrap().to_string();
        assert_eq!(name(m_none), "m");
        assert_eq!(name(m_int), "m$1");
        assert_eq!(name(m_string), "m$2");
    }

    #[test]
    fn test_reserved_names_are_avoided() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let to_string = b.method(c, "ToString").finish();
        let length = b.method(c, "Length").static_().finish();
        let ts = b.build();

        let mut engine = NamingEngine::new(&ts, false);
        engine.prepare(AssemblyId(0), &mut Diagnostics::new());
        assert_eq!(engine.method_semantics(to_string).unwrap(), MethodSemantics::normal("toString$1"));
        assert_eq!(engine.method_semantics(length).unwrap(), MethodSemantics::normal("length$1"));
    }

    #[test]
    fn test_explicit_names_win_their_group() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let inferred = b.method(c, "Foo").finish();
        let named = b
            .method(c, "Bar")
            .marker(Marker::ScriptName(Some("foo".to_string())))
            .finish();
        let ts = b.build();

        let mut engine = NamingEngine::new(&ts, false);
        engine.prepare(AssemblyId(0), &mut Diagnostics::new());
        assert_eq!(engine.method_semantics(named).unwrap().name(), Some("foo"));
        assert_eq!(engine.method_semantics(inferred).unwrap().name(), Some("foo$1"));
    }

    #[test]
    fn test_inherited_instance_names_are_avoided() {
        let mut b = TypeSystemBuilder::new("Main");
        let base = b.class("Ns", "Base").finish();
        b.method(base, "Run").finish();
        let derived = b.class("Ns", "Derived").base(TypeRef::def(base)).finish();
        let run = b.method(derived, "Run").finish();
        let ts = b.build();

        let mut engine = NamingEngine::new(&ts, false);
        engine.prepare(AssemblyId(0), &mut Diagnostics::new());
        assert_eq!(engine.method_semantics(run).unwrap().name(), Some("run$1"));
        assert!(engine.exported_instance_names(derived).unwrap().contains("run$1"));
        assert!(!engine.exported_instance_names(derived).unwrap().contains("run"));
    }

    #[test]
    fn test_alternate_signature_shares_main_name() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let main = b.method(c, "F").param("a", TypeRef::Dynamic).finish();
        let alt = b.method(c, "F").marker(Marker::AlternateSignature).finish();
        let ts = b.build();

        let mut engine = NamingEngine::new(&ts, false);
        let mut diags = Diagnostics::new();
        engine.prepare(AssemblyId(0), &mut diags);
        let alt_sem = engine.method_semantics(alt).unwrap();
        assert_eq!(alt_sem.name(), Some("f"));
        assert!(!alt_sem.generate_code());
        assert_eq!(engine.method_semantics(main).unwrap().name(), Some("f"));
        assert!(diags.is_empty());
    }
}
