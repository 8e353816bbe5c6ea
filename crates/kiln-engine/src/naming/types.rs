//! Type-level resolution

use super::names::{encode_number, is_valid_identifier, is_valid_nested_identifier, split_namespaced_name};
use super::{NamingEngine, TypeRecord};
use crate::diagnostic::codes;
use crate::semantics::TypeSemantics;
use crate::typesys::{MemberRef, TypeId, TypeKind, TypeParamOwner};

impl<'ts> NamingEngine<'ts> {
    /// Resolve a type once; later calls are no-ops
    pub(super) fn process_type(&mut self, id: TypeId) {
        if self.types.contains_key(&id) {
            return;
        }
        let ts = self.ts;
        let def = ts.type_def(id);

        let outer_not_usable = match def.declaring_type {
            Some(outer) => {
                self.process_type(outer);
                matches!(self.types.get(&outer), Some(r) if !r.semantics.is_usable())
            }
            None => false,
        };
        if def.markers.not_usable() || outer_not_usable {
            tracing::trace!(ty = %ts.full_name(id), "type not usable");
            self.types.insert(id, TypeRecord::not_usable());
            return;
        }

        let imported = def.markers.imported();
        let is_imported = imported.is_some();
        let is_real_type = imported.map_or(true, |real| real);
        let preserve_name = is_imported || def.markers.preserve_name();
        let ignore_generic_arguments = def.markers.ignore_generic_arguments();

        let mut is_resources = false;
        if def.markers.resources() {
            if !def.is_static {
                self.type_message(codes::RESOURCES_NOT_STATIC, id);
            } else if !def.type_parameters.is_empty() {
                self.type_message(codes::RESOURCES_GENERIC, id);
            } else if def.members.iter().any(|m| match m {
                MemberRef::Field(f) => !ts.field(*f).is_const(),
                _ => true,
            }) {
                self.type_message(codes::RESOURCES_NON_CONST_MEMBER, id);
            }
            is_resources = true;
        }

        let (mut namespace, type_name) = match def.markers.script_name() {
            Some(Some(name)) if is_valid_identifier(name) => (self.determine_namespace(id), name.to_string()),
            script_name => {
                if script_name.is_some() {
                    self.type_message(codes::INVALID_TYPE_SCRIPT_NAME, id);
                }
                self.derive_type_name(id, preserve_name, ignore_generic_arguments)
            }
        };

        let inherits_record = match self.root_record {
            Some(record) => record != id && ts.derives_from(id, record),
            None => false,
        };
        let mut is_record = def.markers.record() || inherits_record;
        let mut is_global_methods = false;
        let mut mixin_arg = None;

        if is_record {
            if !def.is_sealed {
                self.type_message(codes::RECORD_NOT_SEALED, id);
                is_record = false;
            }
            let direct_roots = def
                .direct_base_types
                .iter()
                .filter_map(|b| b.definition())
                .any(|b| Some(b) == self.root_object || Some(b) == self.root_record);
            if !direct_roots {
                self.type_message(codes::RECORD_INVALID_BASE, id);
                is_record = false;
            }
            if def
                .direct_base_types
                .iter()
                .any(|b| ts.kind_of(b) == Some(TypeKind::Interface))
            {
                self.type_message(codes::RECORD_IMPLEMENTS_INTERFACES, id);
                is_record = false;
            }
            if ts.has_instance_events(id) {
                self.type_message(codes::RECORD_INSTANCE_EVENTS, id);
                is_record = false;
            }
        } else if let Some(arg) = def.markers.mixin() {
            if !def.is_static {
                self.type_message(codes::MIXIN_NOT_STATIC, id);
            } else if def.members.iter().any(|m| match m {
                MemberRef::Method(m) => ts.method(*m).is_constructor(),
                _ => true,
            }) {
                self.type_message(codes::MIXIN_NON_METHOD_MEMBER, id);
            } else if !def.type_parameters.is_empty() {
                self.type_message(codes::MIXIN_GENERIC, id);
            } else {
                namespace = String::new();
                is_global_methods = true;
                mixin_arg = Some(arg.unwrap_or("").to_string());
            }
        } else if def.markers.global_methods() {
            if !def.is_static {
                self.type_message(codes::GLOBAL_METHODS_NOT_STATIC, id);
            } else if def.members.iter().any(|m| !matches!(m, MemberRef::Method(_))) {
                self.type_message(codes::GLOBAL_METHODS_NON_METHOD_MEMBER, id);
            } else if !def.type_parameters.is_empty() {
                self.type_message(codes::GLOBAL_METHODS_GENERIC, id);
            } else {
                namespace = String::new();
                is_global_methods = true;
            }
        }

        let outer_count = ts.outer_type_parameter_count(id);
        for (i, declared) in def.type_parameters.iter().enumerate() {
            let name = if self.minimize_names {
                encode_number(outer_count + i, true)
            } else {
                declared.clone()
            };
            self.type_parameter_names
                .insert((TypeParamOwner::Type(id), i as u32), name);
        }

        let name = if namespace.is_empty() {
            type_name
        } else {
            format!("{}.{}", namespace, type_name)
        };
        tracing::trace!(ty = %ts.full_name(id), script_name = %name, "type resolved");

        self.types.insert(
            id,
            TypeRecord {
                semantics: TypeSemantics::Normal {
                    name,
                    ignore_generic_arguments,
                    generate_code: !is_imported,
                },
                is_global_methods,
                is_record,
                is_named_values: def.markers.named_values(),
                is_imported,
                is_real_type,
                is_resources,
                mixin_arg,
                is_test_fixture: def.markers.test_fixture(),
            },
        );
    }

    /// Name and namespace of a type without a usable explicit name
    fn derive_type_name(
        &mut self,
        id: TypeId,
        preserve_name: bool,
        ignore_generic_arguments: bool,
    ) -> (String, String) {
        let ts = self.ts;
        let def = ts.type_def(id);
        let is_public = ts.is_public_type(id);

        if self.minimize_names && !is_public && !preserve_name {
            let namespace = self.determine_namespace(id);
            let counter = self
                .internal_type_counts
                .entry((def.assembly, namespace.clone()))
                .or_insert(0);
            let index = *counter;
            *counter += 1;
            return (namespace, format!("${}", index));
        }

        let mut type_name = if ignore_generic_arguments || def.type_parameters.is_empty() {
            def.name.clone()
        } else {
            format!("{}${}", def.name, def.type_parameters.len())
        };

        let namespace = match def.declaring_type {
            Some(outer) => {
                if def.markers.ignore_namespace() || def.markers.script_namespace().is_some() {
                    self.type_message(codes::NESTED_TYPE_WITH_NAMESPACE, id);
                }
                let outer_name = match self.types.get(&outer) {
                    Some(record) => record.semantics.name().unwrap_or_default().to_string(),
                    None => ts.type_def(outer).name.clone(),
                };
                let (namespace, outer_short) = split_namespaced_name(&outer_name);
                type_name = format!("{}${}", outer_short, type_name);
                namespace.to_string()
            }
            None => self.determine_namespace(id),
        };

        if !is_public && !preserve_name && !type_name.starts_with('$') {
            type_name = format!("${}", type_name);
        }
        (namespace, type_name)
    }

    /// Script namespace of the outermost type enclosing `id`
    fn determine_namespace(&mut self, id: TypeId) -> String {
        let ts = self.ts;
        let mut top = id;
        while let Some(outer) = ts.type_def(top).declaring_type {
            top = outer;
        }
        let def = ts.type_def(top);

        let explicit = def.markers.script_namespace();
        if def.markers.ignore_namespace() {
            if explicit.is_some() {
                self.type_message(codes::CONFLICTING_NAMESPACE_MARKERS, top);
                return ts.full_name(top);
            }
            return String::new();
        }

        if let Some(arg) = explicit {
            let valid = matches!(arg, Some(ns) if ns.is_empty() || is_valid_nested_identifier(ns));
            if !valid {
                self.type_message(codes::INVALID_SCRIPT_NAMESPACE, top);
            }
            return arg.unwrap_or_default().to_string();
        }

        if let Some(Some(ns)) = ts.assembly(def.assembly).markers.script_namespace() {
            if ns.is_empty() || is_valid_nested_identifier(ns) {
                return ns.to_string();
            }
        }
        def.namespace.clone()
    }
}
