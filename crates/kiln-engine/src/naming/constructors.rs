//! Constructor resolution
//!
//! Constructors share the static name table of their type. The first
//! unmarked constructor takes the unnamed slot, the remaining ones become
//! named `$ctorN` constructors. Record constructors are static factory
//! methods instead.

use super::inline_code;
use super::members::{NameTable, CONSTRUCTOR_NAME};
use super::NamingEngine;
use crate::diagnostic::codes;
use crate::semantics::ConstructorSemantics;
use crate::typesys::{MemberRef, MethodDef, MethodId, TypeKind};

impl<'ts> NamingEngine<'ts> {
    pub(super) fn process_constructor(
        &mut self,
        id: MethodId,
        preferred: Option<&str>,
        specified: bool,
        table: &mut NameTable,
    ) {
        let semantics = self.resolve_constructor(id, preferred, specified, table);
        tracing::trace!(ctor = %self.ts.qualified_member_name(MemberRef::Method(id)), ?semantics, "constructor resolved");
        self.constructors.insert(id, semantics);
    }

    fn resolve_constructor(
        &mut self,
        id: MethodId,
        preferred: Option<&str>,
        specified: bool,
        table: &mut NameTable,
    ) -> ConstructorSemantics {
        let ts = self.ts;
        let def = ts.method(id);
        let info = &def.info;
        let member = MemberRef::Method(id);
        let declaring = ts.type_def(info.declaring_type);
        let record = self.types.get(&info.declaring_type).cloned();
        let (is_record, is_imported) = record
            .as_ref()
            .map_or((false, false), |r| (r.is_record, r.is_imported));

        let type_usable = record.as_ref().map_or(true, |r| r.semantics.is_usable());
        if info.markers.not_usable() || !type_usable || declaring.kind == TypeKind::Delegate {
            return ConstructorSemantics::NotUsable;
        }
        if info.is_static {
            return ConstructorSemantics::unnamed();
        }

        let expand_params = info.markers.expand_params();
        if expand_params && !def.has_params_array() {
            self.member_message(codes::CONSTRUCTOR_EXPAND_PARAMS_WITHOUT_PARAMS, member, Vec::new());
        }

        if let Some(code) = info.markers.inline_code() {
            let errors = inline_code::validate(ts, def, code);
            if !errors.is_empty() {
                self.member_message(codes::INVALID_CONSTRUCTOR_INLINE_CODE, member, vec![errors.join(", ")]);
                return ConstructorSemantics::unnamed();
            }
            return ConstructorSemantics::InlineCode {
                template: code.to_string(),
            };
        }

        let preferred = preferred.unwrap_or(CONSTRUCTOR_NAME);
        if info.markers.alternate_signature() {
            return if preferred == CONSTRUCTOR_NAME {
                ConstructorSemantics::Unnamed {
                    generate_code: false,
                    expand_params,
                }
            } else {
                ConstructorSemantics::Named {
                    name: preferred.to_string(),
                    generate_code: false,
                    expand_params,
                }
            };
        }

        if info.markers.object_literal() || (is_record && is_imported) {
            if !is_record {
                self.location_message(
                    codes::OBJECT_LITERAL_ON_NON_RECORD,
                    &info.location,
                    vec![ts.full_name(info.declaring_type)],
                );
                return ConstructorSemantics::unnamed();
            }
            return match self.object_literal_members(def) {
                Some(members) => ConstructorSemantics::Json { members },
                None => ConstructorSemantics::unnamed(),
            };
        }

        let make_named = |name: String| {
            if is_record {
                ConstructorSemantics::StaticMethod { name, expand_params }
            } else {
                ConstructorSemantics::Named {
                    name,
                    generate_code: true,
                    expand_params,
                }
            }
        };

        if specified {
            table.claim(preferred);
            return if is_record {
                make_named(preferred.to_string())
            } else if preferred == CONSTRUCTOR_NAME {
                ConstructorSemantics::Unnamed {
                    generate_code: true,
                    expand_params,
                }
            } else {
                make_named(preferred.to_string())
            };
        }

        let hidden = self.minimize_names && !ts.is_public_member(member);
        if !table.contains(CONSTRUCTOR_NAME) && !(is_record && hidden) {
            table.claim(CONSTRUCTOR_NAME);
            return if is_record {
                make_named(CONSTRUCTOR_NAME.to_string())
            } else {
                ConstructorSemantics::Unnamed {
                    generate_code: true,
                    expand_params,
                }
            };
        }

        let name = if hidden {
            table.unique_name(None)
        } else {
            (1..)
                .map(|i| format!("{}{}", CONSTRUCTOR_NAME, super::encode_number(i, false)))
                .find(|candidate| !table.contains(candidate))
                .unwrap_or_default()
        };
        table.claim(&name);
        make_named(name)
    }

    /// Map each constructor parameter of a record to the own property or
    /// field of the same name (ignoring case). `None` after reporting a
    /// mismatch.
    fn object_literal_members(&mut self, def: &MethodDef) -> Option<Vec<MemberRef>> {
        let ts = self.ts;
        let owner = def.info.declaring_type;
        let mut members = Vec::with_capacity(def.parameters.len());
        let mut failed = false;

        for param in &def.parameters {
            if param.is_out || param.is_ref {
                self.location_message(codes::OBJECT_LITERAL_BY_REFERENCE, &param.location, vec![param.name.clone()]);
                failed = true;
                continue;
            }
            let wanted = param.name.to_lowercase();
            let found = ts.type_def(owner).members.iter().copied().find(|&m| {
                matches!(m, MemberRef::Property(_) | MemberRef::Field(_))
                    && ts.member_info(m).name.to_lowercase() == wanted
            });
            match found {
                Some(m) if *ts.member_type(m) == param.ty => members.push(m),
                Some(m) => {
                    self.location_message(
                        codes::OBJECT_LITERAL_TYPE_MISMATCH,
                        &param.location,
                        vec![
                            param.name.clone(),
                            ts.type_ref_name(&param.ty),
                            ts.type_ref_name(ts.member_type(m)),
                        ],
                    );
                    failed = true;
                }
                None => {
                    self.location_message(
                        codes::OBJECT_LITERAL_UNKNOWN_MEMBER,
                        &param.location,
                        vec![ts.full_name(owner), param.name.clone()],
                    );
                    failed = true;
                }
            }
        }
        (!failed).then_some(members)
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostic::{codes, Diagnostics};
    use crate::naming::NamingEngine;
    use crate::semantics::ConstructorSemantics;
    use crate::typesys::{AssemblyId, Marker, MemberRef, TypeKind, TypeRef, TypeSystem, TypeSystemBuilder};

    fn prepare(ts: &TypeSystem, minimize: bool) -> (NamingEngine<'_>, Diagnostics) {
        let mut engine = NamingEngine::new(ts, minimize);
        let mut diags = Diagnostics::new();
        engine.prepare(AssemblyId(0), &mut diags);
        (engine, diags)
    }

    #[test]
    fn test_overloaded_constructors() {
        let mut b = TypeSystemBuilder::new("Main");
        let int = b.core_type("System", "Int32", TypeKind::Struct);
        let c = b.class("Ns", "C").finish();
        let first = b.constructor(c).finish();
        let second = b.constructor(c).param("x", TypeRef::def(int)).finish();
        let third = b
            .constructor(c)
            .param("x", TypeRef::def(int))
            .param("y", TypeRef::def(int))
            .finish();
        let ts = b.build();
        let (engine, diags) = prepare(&ts, false);

        assert_eq!(engine.constructor_semantics(first).unwrap(), ConstructorSemantics::unnamed());
        assert_eq!(engine.constructor_semantics(second).unwrap(), ConstructorSemantics::named("$ctor1"));
        assert_eq!(engine.constructor_semantics(third).unwrap(), ConstructorSemantics::named("$ctor2"));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_explicitly_named_constructor() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let named = b
            .constructor(c)
            .param("s", TypeRef::Dynamic)
            .marker(Marker::ScriptName(Some("fromString".to_string())))
            .finish();
        let plain = b.constructor(c).finish();
        let ts = b.build();
        let (engine, _) = prepare(&ts, false);

        assert_eq!(engine.constructor_semantics(named).unwrap(), ConstructorSemantics::named("fromString"));
        assert_eq!(engine.constructor_semantics(plain).unwrap(), ConstructorSemantics::unnamed());
    }

    #[test]
    fn test_static_constructor_and_record_factory() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let cctor = b.type_initializer(c).finish();
        let r = b.class("Ns", "R").sealed().marker(Marker::Record).finish();
        let make = b.constructor(r).finish();
        let ts = b.build();
        let (engine, _) = prepare(&ts, false);

        assert_eq!(engine.constructor_semantics(cctor).unwrap(), ConstructorSemantics::unnamed());
        assert_eq!(engine.constructor_semantics(make).unwrap(), ConstructorSemantics::static_method("$ctor"));
    }

    #[test]
    fn test_imported_record_becomes_object_literal() {
        let mut b = TypeSystemBuilder::new("Main");
        let int = b.core_type("System", "Int32", TypeKind::Struct);
        let string = b.core_type("System", "String", TypeKind::Class);
        let point = b
            .class("Ns", "Point")
            .sealed()
            .marker(Marker::Record)
            .marker(Marker::Imported { is_real_type: false })
            .finish();
        let x = b.field(point, "X", TypeRef::def(int)).finish();
        let y = b.property(point, "Y", TypeRef::def(int)).finish();
        let ok = b
            .constructor(point)
            .param("x", TypeRef::def(int))
            .param("y", TypeRef::def(int))
            .finish();
        let bad = b
            .constructor(point)
            .param("x", TypeRef::def(string))
            .param("z", TypeRef::def(int))
            .finish();
        let ts = b.build();
        let (engine, diags) = prepare(&ts, false);

        assert_eq!(
            engine.constructor_semantics(ok).unwrap(),
            ConstructorSemantics::Json {
                members: vec![MemberRef::Field(x), MemberRef::Property(y)],
            }
        );
        assert_eq!(engine.constructor_semantics(bad).unwrap(), ConstructorSemantics::unnamed());
        assert_eq!(
            diags.codes(),
            vec![codes::OBJECT_LITERAL_TYPE_MISMATCH, codes::OBJECT_LITERAL_UNKNOWN_MEMBER]
        );
    }

    #[test]
    fn test_object_literal_on_class() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let ctor = b.constructor(c).marker(Marker::ObjectLiteral).finish();
        let ts = b.build();
        let (engine, diags) = prepare(&ts, false);

        assert_eq!(engine.constructor_semantics(ctor).unwrap(), ConstructorSemantics::unnamed());
        assert_eq!(diags.codes(), vec![codes::OBJECT_LITERAL_ON_NON_RECORD]);
    }

    #[test]
    fn test_alternate_signature_constructor_generates_no_code() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let main = b.constructor(c).param("a", TypeRef::Dynamic).finish();
        let alt = b.constructor(c).marker(Marker::AlternateSignature).finish();
        let ts = b.build();
        let (engine, _) = prepare(&ts, false);

        assert_eq!(engine.constructor_semantics(main).unwrap(), ConstructorSemantics::unnamed());
        assert_eq!(
            engine.constructor_semantics(alt).unwrap(),
            ConstructorSemantics::Unnamed {
                generate_code: false,
                expand_params: false,
            }
        );
    }

    #[test]
    fn test_minimized_private_constructors() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let public = b.constructor(c).finish();
        let private = b.constructor(c).param("x", TypeRef::Dynamic).private().finish();
        let ts = b.build();
        let (engine, _) = prepare(&ts, true);

        assert_eq!(engine.constructor_semantics(public).unwrap(), ConstructorSemantics::unnamed());
        assert_eq!(engine.constructor_semantics(private).unwrap(), ConstructorSemantics::named("a"));
    }
}
