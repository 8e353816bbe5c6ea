//! Field resolution

use super::members::NameTable;
use super::NamingEngine;
use crate::diagnostic::codes;
use crate::semantics::FieldSemantics;
use crate::typesys::{ConstantValue, FieldId, MemberRef, TypeKind};

impl<'ts> NamingEngine<'ts> {
    pub(super) fn process_field(
        &mut self,
        id: FieldId,
        preferred: Option<&str>,
        specified: bool,
        table: &mut NameTable,
    ) {
        let ts = self.ts;
        let def = ts.field(id);
        let info = &def.info;
        let member = MemberRef::Field(id);
        let record = self.types.get(&info.declaring_type);
        let usable = record.map_or(true, |r| r.semantics.is_usable());
        let named_values = record.is_some_and(|r| r.is_named_values);

        let semantics = if info.markers.not_usable() || !usable {
            FieldSemantics::NotUsable
        } else if preferred == Some("") {
            self.member_message(codes::EMPTY_FIELD_NAME, member, Vec::new());
            FieldSemantics::Field {
                name: "X".to_string(),
            }
        } else {
            let name = match preferred {
                Some(preferred) if specified => preferred.to_string(),
                _ => table.unique_name(preferred),
            };
            table.claim(&name);

            if named_values {
                // an invalid script name is not a name but still the value
                let mut value = preferred.unwrap_or(&name).to_string();
                if !specified {
                    if let Some(Some(arg)) = info.markers.script_name() {
                        value = arg.to_string();
                    }
                }
                FieldSemantics::StringConstant { value, name }
            } else {
                let declared_in_enum = ts.type_def(info.declaring_type).kind == TypeKind::Enum;
                match &def.constant {
                    Some(constant) if declared_in_enum || self.minimize_names => constant_semantics(constant, name),
                    _ => FieldSemantics::Field { name },
                }
            }
        };

        tracing::trace!(field = %ts.qualified_member_name(member), %semantics, "field resolved");
        self.fields.insert(id, semantics);
    }
}

/// Constants are inlined at every use
fn constant_semantics(constant: &ConstantValue, name: String) -> FieldSemantics {
    match constant {
        ConstantValue::Bool(value) => FieldSemantics::BooleanConstant { value: *value, name },
        ConstantValue::Int(value) => FieldSemantics::NumericConstant {
            value: *value as f64,
            name,
        },
        ConstantValue::Float(value) => FieldSemantics::NumericConstant { value: *value, name },
        ConstantValue::Char(c) => FieldSemantics::NumericConstant {
            value: u32::from(*c) as f64,
            name,
        },
        ConstantValue::String(value) => FieldSemantics::StringConstant {
            value: value.clone(),
            name,
        },
        ConstantValue::Null => FieldSemantics::NullConstant { name },
    }
}
