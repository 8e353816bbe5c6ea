//! Property and event resolution

use super::members::NameTable;
use super::NamingEngine;
use crate::diagnostic::codes;
use crate::error::NamingError;
use crate::semantics::{EventSemantics, MethodSemantics, PropertySemantics};
use crate::typesys::{EventId, MemberRef, MethodId, PropertyId, TypeKind};

impl<'ts> NamingEngine<'ts> {
    pub(super) fn process_property(
        &mut self,
        id: PropertyId,
        preferred: Option<&str>,
        specified: bool,
        table: &mut NameTable,
    ) -> Result<(), NamingError> {
        let semantics = self.resolve_property(id, preferred, specified, table)?;
        tracing::trace!(property = %self.ts.qualified_member_name(MemberRef::Property(id)), %semantics, "property resolved");
        self.properties.insert(id, semantics);
        Ok(())
    }

    fn resolve_property(
        &mut self,
        id: PropertyId,
        preferred: Option<&str>,
        specified: bool,
        table: &mut NameTable,
    ) -> Result<PropertySemantics, NamingError> {
        let ts = self.ts;
        let def = ts.property(id);
        let info = &def.info;
        let member = MemberRef::Property(id);
        let is_indexer = def.is_indexer();
        let record = self.type_record(info.declaring_type)?.clone();

        if info.markers.not_usable() || !record.semantics.is_usable() {
            return Ok(PropertySemantics::NotUsable);
        }

        if preferred == Some("") {
            let code = if is_indexer {
                codes::EMPTY_INDEXER_NAME
            } else {
                codes::EMPTY_PROPERTY_NAME
            };
            self.member_message(code, member, Vec::new());
            return Ok(self.accessor_pair(
                def.getter,
                def.setter,
                MethodSemantics::normal("get"),
                MethodSemantics::normal("set"),
            ));
        }

        if record.is_record && !info.is_static {
            let name = preferred.unwrap_or(&info.name).to_string();
            table.claim(&name);
            return Ok(PropertySemantics::Field { name });
        }

        if let Some(alias) = info.markers.static_alias() {
            if is_indexer {
                self.member_message(codes::STATIC_ALIAS_ON_INDEXER, member, Vec::new());
            } else if !info.is_static {
                self.member_message(codes::STATIC_ALIAS_ON_INSTANCE_PROPERTY, member, Vec::new());
            } else {
                return Ok(self.accessor_pair(
                    def.getter,
                    def.setter,
                    MethodSemantics::inline_code(alias),
                    MethodSemantics::inline_code(format!("{} = {{value}}", alias)),
                ));
            }
        }

        if info.markers.intrinsic_property() {
            let pick = |indexer_code: u32, property_code: u32| {
                if is_indexer {
                    indexer_code
                } else {
                    property_code
                }
            };
            let misuse = if ts.type_def(info.declaring_type).kind == TypeKind::Interface {
                Some(pick(codes::INTRINSIC_INDEXER_ON_INTERFACE, codes::INTRINSIC_PROPERTY_ON_INTERFACE))
            } else if info.is_override {
                Some(pick(codes::INTRINSIC_INDEXER_OVERRIDE, codes::INTRINSIC_PROPERTY_OVERRIDE))
            } else if info.is_overridable() {
                Some(pick(codes::INTRINSIC_INDEXER_OVERRIDABLE, codes::INTRINSIC_PROPERTY_OVERRIDABLE))
            } else if !info.implemented_interface_members.is_empty() {
                Some(pick(
                    codes::INTRINSIC_INDEXER_IMPLEMENTS_INTERFACE,
                    codes::INTRINSIC_PROPERTY_IMPLEMENTS_INTERFACE,
                ))
            } else {
                None
            };

            match misuse {
                Some(code) => self.member_message(code, member, Vec::new()),
                None if is_indexer => {
                    if def.parameters.len() == 1 {
                        return Ok(self.accessor_pair(
                            def.getter,
                            def.setter,
                            MethodSemantics::NativeIndexer,
                            MethodSemantics::NativeIndexer,
                        ));
                    }
                    self.member_message(codes::INTRINSIC_INDEXER_PARAMETER_COUNT, member, Vec::new());
                }
                None => {
                    let name = preferred.unwrap_or(&info.name).to_string();
                    table.claim(&name);
                    return Ok(PropertySemantics::Field { name });
                }
            }
        }

        let getter = self.process_accessor(member, def.getter, "get_", preferred, specified, table)?;
        let setter = self.process_accessor(member, def.setter, "set_", preferred, specified, table)?;
        Ok(PropertySemantics::GetAndSetMethods { getter, setter })
    }

    pub(super) fn process_event(
        &mut self,
        id: EventId,
        preferred: Option<&str>,
        specified: bool,
        table: &mut NameTable,
    ) -> Result<(), NamingError> {
        let ts = self.ts;
        let def = ts.event(id);
        let member = MemberRef::Event(id);
        let usable = self.type_record(def.info.declaring_type)?.semantics.is_usable();

        let semantics = if def.info.markers.not_usable() || !usable {
            EventSemantics::NotUsable
        } else if preferred == Some("") {
            self.member_message(codes::EMPTY_EVENT_NAME, member, Vec::new());
            for (accessor, name) in [(def.adder, "add"), (def.remover, "remove")] {
                if let Some(accessor) = accessor {
                    self.methods.insert(accessor, MethodSemantics::normal(name));
                }
            }
            EventSemantics::AddAndRemoveMethods {
                adder: Some(MethodSemantics::normal("add")),
                remover: Some(MethodSemantics::normal("remove")),
            }
        } else {
            let adder = self.process_accessor(member, def.adder, "add_", preferred, specified, table)?;
            let remover = self.process_accessor(member, def.remover, "remove_", preferred, specified, table)?;
            EventSemantics::AddAndRemoveMethods { adder, remover }
        };

        tracing::trace!(event = %ts.qualified_member_name(member), ?semantics, "event resolved");
        self.events.insert(id, semantics);
        Ok(())
    }

    /// Name and resolve one accessor. Unless the accessor carries its own
    /// name, it is derived from the owner's: `get_name`, `add_name`, ...
    fn process_accessor(
        &mut self,
        owner: MemberRef,
        accessor: Option<MethodId>,
        prefix: &str,
        preferred: Option<&str>,
        specified: bool,
        table: &mut NameTable,
    ) -> Result<Option<MethodSemantics>, NamingError> {
        let Some(accessor) = accessor else {
            return Ok(None);
        };
        let ts = self.ts;

        let mut accessor_name = self.preferred_member_name(MemberRef::Method(accessor));
        if !accessor_name.specified {
            let info = ts.member_info(owner);
            let in_interface = ts.type_def(info.declaring_type).kind == TypeKind::Interface;
            let hidden = !specified && self.minimize_names && !in_interface && !ts.is_public_member(owner);
            let base = format!("{}{}", prefix, preferred.unwrap_or(&info.name));
            accessor_name.name = if hidden {
                None
            } else if specified {
                Some(base)
            } else {
                Some(table.unique_name(Some(&base)))
            };
        }

        self.process_method(accessor, accessor_name.name.as_deref(), accessor_name.specified, table)?;
        self.method_semantics(accessor).map(Some)
    }

    /// Accessor semantics that do not go through method resolution
    fn accessor_pair(
        &mut self,
        getter: Option<MethodId>,
        setter: Option<MethodId>,
        get: MethodSemantics,
        set: MethodSemantics,
    ) -> PropertySemantics {
        let mut resolve = |accessor: Option<MethodId>, semantics: MethodSemantics| {
            accessor.map(|id| {
                self.methods.insert(id, semantics.clone());
                semantics
            })
        };
        PropertySemantics::GetAndSetMethods {
            getter: resolve(getter, get),
            setter: resolve(setter, set),
        }
    }
}
