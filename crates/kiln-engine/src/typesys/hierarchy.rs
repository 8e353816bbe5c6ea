//! Inheritance queries over the declaration arena

use super::{TypeId, TypeKind, TypeParamOwner, TypeRef, TypeSystem};
use rustc_hash::FxHashSet;

impl TypeSystem {
    /// A type instantiated with its own type parameters (`C<T>` inside `C`)
    pub fn self_type_ref(&self, id: TypeId) -> TypeRef {
        let count = self.type_def(id).type_parameters.len() as u32;
        TypeRef::Def {
            id,
            args: (0..count)
                .map(|i| TypeRef::type_param(TypeParamOwner::Type(id), i))
                .collect(),
        }
    }

    /// Direct base types of an instantiated type, with its arguments substituted
    pub fn direct_base_types_of(&self, ty: &TypeRef) -> Vec<TypeRef> {
        match ty {
            TypeRef::Def { id, args } => self
                .type_def(*id)
                .direct_base_types
                .iter()
                .map(|b| b.substitute(*id, args))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Every base type of `id` (transitively, interfaces included) followed by
    /// the type itself. Bases always precede the types deriving from them.
    pub fn all_base_types(&self, id: TypeId) -> Vec<TypeRef> {
        let mut result = Vec::new();
        let mut seen = FxHashSet::default();
        let mut active = FxHashSet::default();
        self.collect_base_types(self.self_type_ref(id), &mut seen, &mut active, &mut result);
        result
    }

    fn collect_base_types(
        &self,
        ty: TypeRef,
        seen: &mut FxHashSet<TypeRef>,
        active: &mut FxHashSet<TypeId>,
        result: &mut Vec<TypeRef>,
    ) {
        let Some(def) = ty.definition() else {
            return;
        };
        if seen.contains(&ty) || !active.insert(def) {
            return;
        }
        for base in self.direct_base_types_of(&ty) {
            self.collect_base_types(base, seen, active, result);
        }
        active.remove(&def);
        seen.insert(ty.clone());
        result.push(ty);
    }

    /// Distinct definitions of `all_base_types`, same order
    pub fn all_base_type_definitions(&self, id: TypeId) -> Vec<TypeId> {
        let mut seen = FxHashSet::default();
        self.all_base_types(id)
            .iter()
            .filter_map(TypeRef::definition)
            .filter(|d| seen.insert(*d))
            .collect()
    }

    /// Whether `ancestor` is `id` or one of its bases
    pub fn derives_from(&self, id: TypeId, ancestor: TypeId) -> bool {
        self.all_base_type_definitions(id).contains(&ancestor)
    }

    pub fn kind_of(&self, ty: &TypeRef) -> Option<TypeKind> {
        ty.definition().map(|d| self.type_def(d).kind)
    }

    /// Number of non-interface entries in the base chain, the type itself excluded
    pub fn inheritance_depth(&self, id: TypeId) -> usize {
        self.all_base_types(id)
            .iter()
            .filter(|t| self.kind_of(t) != Some(TypeKind::Interface))
            .count()
            .saturating_sub(1)
    }
}
