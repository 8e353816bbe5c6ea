//! Structural validation of deserialized declaration sets
//!
//! Every query on `TypeSystem` indexes its arenas directly and follows
//! `declaring_type` links recursively. A set built by `TypeSystemBuilder` is
//! consistent by construction; one read from JSON must pass `validate` before
//! it reaches the naming engine.

use super::{MemberInfo, MemberRef, ParameterDef, TypeParamOwner, TypeRef, TypeSystem};
use crate::error::TypeSystemError;

impl TypeSystem {
    /// Check that every id is in range and that neither nesting nor
    /// overriding forms a cycle
    pub fn validate(&self) -> Result<(), TypeSystemError> {
        for (index, def) in self.types.iter().enumerate() {
            let owner = || format!("Type '{}' (#{})", def.name, index);
            self.check_assembly(def.assembly.0, &owner)?;
            if let Some(outer) = def.declaring_type {
                self.check_type(outer.0, &owner)?;
            }
            for nested in &def.nested_types {
                self.check_type(nested.0, &owner)?;
            }
            for base in &def.direct_base_types {
                self.check_type_ref(base, &owner)?;
            }
            for member in &def.members {
                self.check_member(*member, &owner)?;
            }
        }

        for (index, def) in self.methods.iter().enumerate() {
            let owner = || format!("Method '{}' (#{})", def.info.name, index);
            self.check_member_info(&def.info, &owner)?;
            self.check_parameters(&def.parameters, &owner)?;
            self.check_type_ref(&def.return_type, &owner)?;
            if let Some(base) = def.overrides {
                self.check_method(base.0, &owner)?;
            }
        }

        for (index, def) in self.properties.iter().enumerate() {
            let owner = || format!("Property '{}' (#{})", def.info.name, index);
            self.check_member_info(&def.info, &owner)?;
            self.check_parameters(&def.parameters, &owner)?;
            self.check_type_ref(&def.ty, &owner)?;
            for accessor in def.getter.iter().chain(&def.setter) {
                self.check_method(accessor.0, &owner)?;
            }
        }

        for (index, def) in self.fields.iter().enumerate() {
            let owner = || format!("Field '{}' (#{})", def.info.name, index);
            self.check_member_info(&def.info, &owner)?;
            self.check_type_ref(&def.ty, &owner)?;
        }

        for (index, def) in self.events.iter().enumerate() {
            let owner = || format!("Event '{}' (#{})", def.info.name, index);
            self.check_member_info(&def.info, &owner)?;
            self.check_type_ref(&def.ty, &owner)?;
            for accessor in def.adder.iter().chain(&def.remover) {
                self.check_method(accessor.0, &owner)?;
            }
        }

        if let Some(index) = find_cycle(self.types.len(), |i| {
            self.types[i].declaring_type.map(|t| t.index())
        }) {
            return Err(TypeSystemError::DeclaringTypeCycle {
                name: self.types[index].name.clone(),
                index: index as u32,
            });
        }
        if let Some(index) = find_cycle(self.methods.len(), |i| self.methods[i].overrides.map(|m| m.index())) {
            return Err(TypeSystemError::OverrideCycle {
                name: self.methods[index].info.name.clone(),
                index: index as u32,
            });
        }
        Ok(())
    }

    /// Check that a member id is in range, for callers holding ids from
    /// outside the type system
    pub(crate) fn check_member(&self, member: MemberRef, owner: &dyn Fn() -> String) -> Result<(), TypeSystemError> {
        let (kind, index, len) = match member {
            MemberRef::Method(id) => ("method", id.0, self.methods.len()),
            MemberRef::Property(id) => ("property", id.0, self.properties.len()),
            MemberRef::Field(id) => ("field", id.0, self.fields.len()),
            MemberRef::Event(id) => ("event", id.0, self.events.len()),
        };
        check_index(kind, index, len, owner)
    }

    pub(crate) fn check_type(&self, index: u32, owner: &dyn Fn() -> String) -> Result<(), TypeSystemError> {
        check_index("type", index, self.types.len(), owner)
    }

    fn check_assembly(&self, index: u32, owner: &dyn Fn() -> String) -> Result<(), TypeSystemError> {
        check_index("assembly", index, self.assemblies.len(), owner)
    }

    fn check_method(&self, index: u32, owner: &dyn Fn() -> String) -> Result<(), TypeSystemError> {
        check_index("method", index, self.methods.len(), owner)
    }

    fn check_member_info(&self, info: &MemberInfo, owner: &dyn Fn() -> String) -> Result<(), TypeSystemError> {
        self.check_type(info.declaring_type.0, owner)?;
        for implemented in &info.implemented_interface_members {
            self.check_member(*implemented, owner)?;
        }
        Ok(())
    }

    fn check_parameters(&self, parameters: &[ParameterDef], owner: &dyn Fn() -> String) -> Result<(), TypeSystemError> {
        parameters.iter().try_for_each(|p| self.check_type_ref(&p.ty, owner))
    }

    fn check_type_ref(&self, ty: &TypeRef, owner: &dyn Fn() -> String) -> Result<(), TypeSystemError> {
        match ty {
            TypeRef::Def { id, args } => {
                self.check_type(id.0, owner)?;
                args.iter().try_for_each(|a| self.check_type_ref(a, owner))
            }
            TypeRef::TypeParam {
                owner: TypeParamOwner::Type(t),
                ..
            } => self.check_type(t.0, owner),
            TypeRef::TypeParam {
                owner: TypeParamOwner::Method(m),
                ..
            } => self.check_method(m.0, owner),
            TypeRef::Array(elem) => self.check_type_ref(elem, owner),
            TypeRef::Dynamic | TypeRef::Void => Ok(()),
        }
    }
}

fn check_index(kind: &'static str, index: u32, len: usize, owner: &dyn Fn() -> String) -> Result<(), TypeSystemError> {
    if (index as usize) < len {
        Ok(())
    } else {
        Err(TypeSystemError::DanglingId {
            owner: owner(),
            kind,
            index,
        })
    }
}

/// An element lying on a cycle of the partial function `next`, if any.
/// All indices returned by `next` must be below `len`.
fn find_cycle(len: usize, next: impl Fn(usize) -> Option<usize>) -> Option<usize> {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        New,
        OnPath,
        Done,
    }

    let mut state = vec![State::New; len];
    let mut path = Vec::new();
    for start in 0..len {
        let mut current = Some(start);
        while let Some(i) = current {
            match state[i] {
                State::Done => break,
                State::OnPath => return Some(i),
                State::New => {
                    state[i] = State::OnPath;
                    path.push(i);
                    current = next(i);
                }
            }
        }
        for i in path.drain(..) {
            state[i] = State::Done;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typesys::{TypeId, TypeSystemBuilder};

    fn sample() -> TypeSystem {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        b.class("Ns", "Inner").nested_in(c).finish();
        b.build()
    }

    #[test]
    fn test_builder_output_is_valid() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn test_dangling_base_type() {
        let mut ts = sample();
        let last = ts.types.len() - 1;
        ts.types[last].direct_base_types.push(TypeRef::def(TypeId(999)));
        assert!(matches!(
            ts.validate(),
            Err(TypeSystemError::DanglingId { kind: "type", index: 999, .. })
        ));
    }

    #[test]
    fn test_declaring_type_cycle() {
        let mut ts = sample();
        let outer = ts.find_type("Ns.C").unwrap();
        let inner = ts.find_type("Ns.C.Inner").unwrap();
        ts.types[outer.index()].declaring_type = Some(inner);
        assert!(matches!(ts.validate(), Err(TypeSystemError::DeclaringTypeCycle { .. })));
    }

    #[test]
    fn test_find_cycle() {
        assert_eq!(find_cycle(3, |i| if i < 2 { Some(i + 1) } else { None }), None);
        assert_eq!(find_cycle(1, Some), Some(0));
        assert!(find_cycle(4, |i| Some([1, 2, 1, 0][i])).is_some());
        assert_eq!(find_cycle(0, |_| None), None);
    }
}
