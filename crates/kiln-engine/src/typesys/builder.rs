//! Programmatic construction of a `TypeSystem`
//!
//! Front ends that do not serialize their output, and all of the tests,
//! build declaration sets through this API. `build()` applies the implicit
//! rules of the source language: classes without an explicit base class
//! derive from the root object type, and types without an instance
//! constructor receive a synthetic parameterless one.

use super::{
    Accessibility, AssemblyDef, AssemblyId, ConstantValue, EventDef, EventId, FieldDef, FieldId,
    Location, Marker, MemberInfo, MemberRef, MethodDef, MethodId, MethodKind, ParameterDef,
    PropertyDef, PropertyId, TypeDef, TypeId, TypeKind, TypeRef, TypeSystem, ROOT_OBJECT_TYPE,
};

const CORE_ASSEMBLY: &str = "mscorlib";

/// Builder for a whole declaration set
pub struct TypeSystemBuilder {
    ts: TypeSystem,
    current_assembly: AssemblyId,
    core_assembly: AssemblyId,
    object: TypeId,
}

impl TypeSystemBuilder {
    /// Create a builder whose first assembly is `main_assembly`. A core
    /// assembly holding the imported root object type is added as well.
    pub fn new(main_assembly: &str) -> Self {
        let mut ts = TypeSystem::default();
        ts.assemblies.push(AssemblyDef {
            name: main_assembly.to_string(),
            markers: Default::default(),
            location: Location::default(),
        });
        ts.assemblies.push(AssemblyDef {
            name: CORE_ASSEMBLY.to_string(),
            markers: Default::default(),
            location: Location::default(),
        });
        let mut builder = Self {
            ts,
            current_assembly: AssemblyId(0),
            core_assembly: AssemblyId(1),
            object: TypeId(0),
        };
        builder.object = builder.core_type("System", "Object", TypeKind::Class);
        builder
    }

    /// Root object type every class derives from
    pub fn object(&self) -> TypeId {
        self.object
    }

    /// Root record type, created on first use
    pub fn record_base(&mut self) -> TypeId {
        match self.find("System", "Record") {
            Some(id) => id,
            None => self.core_type("System", "Record", TypeKind::Class),
        }
    }

    /// Add an imported, real type to the core assembly
    pub fn core_type(&mut self, namespace: &str, name: &str, kind: TypeKind) -> TypeId {
        let previous = self.current_assembly;
        self.current_assembly = self.core_assembly;
        let id = self
            .type_builder(namespace, name, kind)
            .marker(Marker::Imported { is_real_type: true })
            .finish();
        self.current_assembly = previous;
        id
    }

    fn find(&self, namespace: &str, name: &str) -> Option<TypeId> {
        self.ts.type_ids().find(|&id| {
            let def = self.ts.type_def(id);
            def.namespace == namespace && def.name == name && def.declaring_type.is_none()
        })
    }

    /// Add another assembly; subsequent types go to the current assembly
    pub fn assembly(&mut self, name: &str) -> AssemblyId {
        self.ts.assemblies.push(AssemblyDef {
            name: name.to_string(),
            markers: Default::default(),
            location: Location::default(),
        });
        AssemblyId(self.ts.assemblies.len() as u32 - 1)
    }

    pub fn set_current_assembly(&mut self, id: AssemblyId) {
        self.current_assembly = id;
    }

    pub fn main_assembly(&self) -> AssemblyId {
        AssemblyId(0)
    }

    pub fn assembly_marker(&mut self, id: AssemblyId, marker: Marker) {
        self.ts.assemblies[id.index()].markers.push(marker);
    }

    fn type_builder(&mut self, namespace: &str, name: &str, kind: TypeKind) -> TypeBuilder<'_> {
        let assembly = self.current_assembly;
        TypeBuilder {
            def: TypeDef {
                name: name.to_string(),
                namespace: namespace.to_string(),
                kind,
                accessibility: Accessibility::Public,
                is_static: false,
                is_sealed: matches!(kind, TypeKind::Struct | TypeKind::Enum | TypeKind::Delegate),
                is_abstract: kind == TypeKind::Interface,
                declaring_type: None,
                type_parameters: Vec::new(),
                direct_base_types: Vec::new(),
                markers: Default::default(),
                assembly,
                location: Location::default(),
                members: Vec::new(),
                nested_types: Vec::new(),
            },
            builder: self,
        }
    }

    pub fn class(&mut self, namespace: &str, name: &str) -> TypeBuilder<'_> {
        self.type_builder(namespace, name, TypeKind::Class)
    }

    pub fn interface(&mut self, namespace: &str, name: &str) -> TypeBuilder<'_> {
        self.type_builder(namespace, name, TypeKind::Interface)
    }

    pub fn struct_(&mut self, namespace: &str, name: &str) -> TypeBuilder<'_> {
        self.type_builder(namespace, name, TypeKind::Struct)
    }

    pub fn enum_(&mut self, namespace: &str, name: &str) -> TypeBuilder<'_> {
        self.type_builder(namespace, name, TypeKind::Enum)
    }

    pub fn delegate(&mut self, namespace: &str, name: &str) -> TypeBuilder<'_> {
        self.type_builder(namespace, name, TypeKind::Delegate)
    }

    pub fn anonymous(&mut self, name: &str) -> TypeBuilder<'_> {
        self.type_builder("", name, TypeKind::Anonymous)
    }

    fn member_info(&self, declaring_type: TypeId, name: &str) -> MemberInfo {
        let in_interface = self.ts.type_def(declaring_type).kind == TypeKind::Interface;
        MemberInfo {
            name: name.to_string(),
            declaring_type,
            accessibility: Accessibility::Public,
            is_static: false,
            is_abstract: in_interface,
            is_virtual: false,
            is_override: false,
            is_sealed: false,
            markers: Default::default(),
            location: Location::default(),
            implemented_interface_members: Vec::new(),
        }
    }

    fn method_builder(&mut self, ty: TypeId, name: &str, kind: MethodKind) -> MethodBuilder<'_> {
        let info = self.member_info(ty, name);
        MethodBuilder {
            def: MethodDef {
                info,
                kind,
                parameters: Vec::new(),
                type_parameters: Vec::new(),
                return_type: TypeRef::Void,
                overrides: None,
                is_synthetic: false,
            },
            builder: self,
        }
    }

    pub fn method(&mut self, ty: TypeId, name: &str) -> MethodBuilder<'_> {
        self.method_builder(ty, name, MethodKind::Ordinary)
    }

    pub fn constructor(&mut self, ty: TypeId) -> MethodBuilder<'_> {
        self.method_builder(ty, ".ctor", MethodKind::Constructor)
    }

    /// Static constructor
    pub fn type_initializer(&mut self, ty: TypeId) -> MethodBuilder<'_> {
        let mut m = self.method_builder(ty, ".cctor", MethodKind::Constructor);
        m.def.info.is_static = true;
        m.def.info.accessibility = Accessibility::Private;
        m
    }

    pub fn operator(&mut self, ty: TypeId, name: &str) -> MethodBuilder<'_> {
        let mut m = self.method_builder(ty, name, MethodKind::Operator);
        m.def.info.is_static = true;
        m
    }

    pub fn property(&mut self, ty: TypeId, name: &str, prop_ty: TypeRef) -> PropertyBuilder<'_> {
        let info = self.member_info(ty, name);
        PropertyBuilder {
            def: PropertyDef {
                info,
                ty: prop_ty,
                parameters: Vec::new(),
                getter: None,
                setter: None,
            },
            has_getter: true,
            has_setter: true,
            accessor_markers: (Vec::new(), Vec::new()),
            overridden: None,
            builder: self,
        }
    }

    pub fn field(&mut self, ty: TypeId, name: &str, field_ty: TypeRef) -> FieldBuilder<'_> {
        let info = self.member_info(ty, name);
        FieldBuilder {
            def: FieldDef {
                info,
                ty: field_ty,
                constant: None,
            },
            builder: self,
        }
    }

    pub fn event(&mut self, ty: TypeId, name: &str, event_ty: TypeRef) -> EventBuilder<'_> {
        let info = self.member_info(ty, name);
        EventBuilder {
            def: EventDef {
                info,
                ty: event_ty,
                adder: None,
                remover: None,
            },
            overridden: None,
            builder: self,
        }
    }

    fn push_method(&mut self, def: MethodDef) -> MethodId {
        let id = MethodId(self.ts.methods.len() as u32);
        let owner = def.info.declaring_type;
        let listed = def.kind != MethodKind::Accessor;
        self.ts.methods.push(def);
        if listed {
            self.ts.types[owner.index()].members.push(MemberRef::Method(id));
        }
        id
    }

    fn accessor(&mut self, header: &MemberInfo, name: String, markers: Vec<Marker>) -> MethodDef {
        let mut info = header.clone();
        info.name = name;
        info.markers = markers.into();
        info.implemented_interface_members = Vec::new();
        MethodDef {
            info,
            kind: MethodKind::Accessor,
            parameters: Vec::new(),
            type_parameters: Vec::new(),
            return_type: TypeRef::Void,
            overrides: None,
            is_synthetic: false,
        }
    }

    /// Finish the declaration set
    pub fn build(mut self) -> TypeSystem {
        let candidates: Vec<TypeId> = self
            .ts
            .type_ids()
            .filter(|&id| {
                let def = self.ts.type_def(id);
                matches!(def.kind, TypeKind::Class | TypeKind::Struct)
                    && !def.is_static
                    && !self
                        .ts
                        .constructors_of(id)
                        .any(|c| !self.ts.method(c).info.is_static)
            })
            .collect();
        for id in candidates {
            let accessibility = if self.ts.type_def(id).is_abstract {
                Accessibility::Protected
            } else {
                Accessibility::Public
            };
            let mut ctor = self.method_builder(id, ".ctor", MethodKind::Constructor);
            ctor.def.info.accessibility = accessibility;
            ctor.def.info.location = ctor.builder.ts.type_def(id).location.clone();
            ctor.def.is_synthetic = true;
            ctor.finish();
        }
        self.ts
    }
}

/// Builder for a single type definition
pub struct TypeBuilder<'b> {
    builder: &'b mut TypeSystemBuilder,
    def: TypeDef,
}

impl<'b> TypeBuilder<'b> {
    pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
        self.def.accessibility = accessibility;
        self
    }

    pub fn internal(self) -> Self {
        self.accessibility(Accessibility::Internal)
    }

    pub fn private(self) -> Self {
        self.accessibility(Accessibility::Private)
    }

    pub fn static_(mut self) -> Self {
        self.def.is_static = true;
        self.def.is_sealed = true;
        self.def.is_abstract = true;
        self
    }

    pub fn sealed(mut self) -> Self {
        self.def.is_sealed = true;
        self
    }

    pub fn abstract_(mut self) -> Self {
        self.def.is_abstract = true;
        self
    }

    pub fn nested_in(mut self, outer: TypeId) -> Self {
        self.def.declaring_type = Some(outer);
        self.def.namespace = self.builder.ts.type_def(outer).namespace.clone();
        self
    }

    pub fn type_params(mut self, names: &[&str]) -> Self {
        self.def.type_parameters = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn base(mut self, base: TypeRef) -> Self {
        self.def.direct_base_types.insert(0, base);
        self
    }

    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.def.direct_base_types.push(interface);
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.def.markers.push(marker);
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.def.location = location;
        self
    }

    pub fn finish(self) -> TypeId {
        let TypeBuilder { builder, mut def } = self;
        let id = TypeId(builder.ts.types.len() as u32);
        let has_class_base = def
            .direct_base_types
            .iter()
            .any(|b| builder.ts.kind_of(b) == Some(TypeKind::Class));
        let is_root = def.namespace == "System" && def.name == "Object";
        if def.kind == TypeKind::Class && !has_class_base && !is_root {
            if let Some(object) = builder.ts.find_type(ROOT_OBJECT_TYPE) {
                def.direct_base_types.insert(0, TypeRef::def(object));
            }
        }
        if let Some(outer) = def.declaring_type {
            builder.ts.types[outer.index()].nested_types.push(id);
        }
        builder.ts.types.push(def);
        id
    }
}

macro_rules! member_header_setters {
    () => {
        pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
            self.def.info.accessibility = accessibility;
            self
        }

        pub fn private(self) -> Self {
            self.accessibility(Accessibility::Private)
        }

        pub fn internal(self) -> Self {
            self.accessibility(Accessibility::Internal)
        }

        pub fn protected(self) -> Self {
            self.accessibility(Accessibility::Protected)
        }

        pub fn static_(mut self) -> Self {
            self.def.info.is_static = true;
            self
        }

        pub fn virtual_(mut self) -> Self {
            self.def.info.is_virtual = true;
            self
        }

        pub fn abstract_(mut self) -> Self {
            self.def.info.is_abstract = true;
            self
        }

        pub fn sealed(mut self) -> Self {
            self.def.info.is_sealed = true;
            self
        }

        pub fn marker(mut self, marker: Marker) -> Self {
            self.def.info.markers.push(marker);
            self
        }

        pub fn implements(mut self, member: MemberRef) -> Self {
            self.def.info.implemented_interface_members.push(member);
            self
        }

        pub fn at(mut self, location: Location) -> Self {
            self.def.info.location = location;
            self
        }
    };
}

/// Builder for methods, constructors and operators
pub struct MethodBuilder<'b> {
    builder: &'b mut TypeSystemBuilder,
    def: MethodDef,
}

impl<'b> MethodBuilder<'b> {
    member_header_setters!();

    pub fn overrides(mut self, base: MethodId) -> Self {
        self.def.info.is_override = true;
        self.def.overrides = Some(base);
        self
    }

    pub fn param(mut self, name: &str, ty: TypeRef) -> Self {
        self.def.parameters.push(ParameterDef {
            name: name.to_string(),
            ty,
            is_params: false,
            is_out: false,
            is_ref: false,
            location: Location::default(),
        });
        self
    }

    pub fn params_array(mut self, name: &str, elem: TypeRef) -> Self {
        self = self.param(name, TypeRef::Array(Box::new(elem)));
        if let Some(p) = self.def.parameters.last_mut() {
            p.is_params = true;
        }
        self
    }

    pub fn out_param(mut self, name: &str, ty: TypeRef) -> Self {
        self = self.param(name, ty);
        if let Some(p) = self.def.parameters.last_mut() {
            p.is_out = true;
        }
        self
    }

    pub fn ref_param(mut self, name: &str, ty: TypeRef) -> Self {
        self = self.param(name, ty);
        if let Some(p) = self.def.parameters.last_mut() {
            p.is_ref = true;
        }
        self
    }

    pub fn type_params(mut self, names: &[&str]) -> Self {
        self.def.type_parameters = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.def.return_type = ty;
        self
    }

    pub fn finish(self) -> MethodId {
        let MethodBuilder { builder, def } = self;
        builder.push_method(def)
    }
}

/// Builder for properties and indexers
pub struct PropertyBuilder<'b> {
    builder: &'b mut TypeSystemBuilder,
    def: PropertyDef,
    has_getter: bool,
    has_setter: bool,
    accessor_markers: (Vec<Marker>, Vec<Marker>),
    overridden: Option<PropertyId>,
}

impl<'b> PropertyBuilder<'b> {
    member_header_setters!();

    pub fn read_only(mut self) -> Self {
        self.has_setter = false;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.has_getter = false;
        self
    }

    pub fn indexer_param(mut self, name: &str, ty: TypeRef) -> Self {
        self.def.parameters.push(ParameterDef {
            name: name.to_string(),
            ty,
            is_params: false,
            is_out: false,
            is_ref: false,
            location: Location::default(),
        });
        self
    }

    pub fn overrides(mut self, base: PropertyId) -> Self {
        self.def.info.is_override = true;
        self.overridden = Some(base);
        self
    }

    pub fn getter_marker(mut self, marker: Marker) -> Self {
        self.accessor_markers.0.push(marker);
        self
    }

    pub fn setter_marker(mut self, marker: Marker) -> Self {
        self.accessor_markers.1.push(marker);
        self
    }

    pub fn finish(self) -> PropertyId {
        let PropertyBuilder {
            builder,
            mut def,
            has_getter,
            has_setter,
            accessor_markers: (getter_markers, setter_markers),
            overridden,
        } = self;
        let id = PropertyId(builder.ts.properties.len() as u32);
        let base = overridden.map(|p| builder.ts.property(p).clone());
        let interfaces: Vec<PropertyDef> = def
            .info
            .implemented_interface_members
            .iter()
            .filter_map(|m| match m {
                MemberRef::Property(p) => Some(builder.ts.property(*p).clone()),
                _ => None,
            })
            .collect();

        if has_getter {
            let mut getter = builder.accessor(&def.info, format!("get_{}", def.info.name), getter_markers);
            getter.parameters = def.parameters.clone();
            getter.return_type = def.ty.clone();
            getter.overrides = base.as_ref().and_then(|b| b.getter);
            getter.info.implemented_interface_members = interfaces
                .iter()
                .filter_map(|p| p.getter.map(MemberRef::Method))
                .collect();
            def.getter = Some(builder.push_method(getter));
        }
        if has_setter {
            let mut setter = builder.accessor(&def.info, format!("set_{}", def.info.name), setter_markers);
            setter.parameters = def.parameters.clone();
            setter.parameters.push(ParameterDef {
                name: "value".to_string(),
                ty: def.ty.clone(),
                is_params: false,
                is_out: false,
                is_ref: false,
                location: Location::default(),
            });
            setter.overrides = base.as_ref().and_then(|b| b.setter);
            setter.info.implemented_interface_members = interfaces
                .iter()
                .filter_map(|p| p.setter.map(MemberRef::Method))
                .collect();
            def.setter = Some(builder.push_method(setter));
        }

        let owner = def.info.declaring_type;
        builder.ts.properties.push(def);
        builder.ts.types[owner.index()].members.push(MemberRef::Property(id));
        id
    }
}

/// Builder for fields and enum members
pub struct FieldBuilder<'b> {
    builder: &'b mut TypeSystemBuilder,
    def: FieldDef,
}

impl<'b> FieldBuilder<'b> {
    member_header_setters!();

    /// Make the field a compile-time constant (implies static)
    pub fn constant(mut self, value: ConstantValue) -> Self {
        self.def.constant = Some(value);
        self.def.info.is_static = true;
        self
    }

    pub fn finish(self) -> FieldId {
        let FieldBuilder { builder, def } = self;
        let id = FieldId(builder.ts.fields.len() as u32);
        let owner = def.info.declaring_type;
        builder.ts.fields.push(def);
        builder.ts.types[owner.index()].members.push(MemberRef::Field(id));
        id
    }
}

/// Builder for events; both accessors are always created
pub struct EventBuilder<'b> {
    builder: &'b mut TypeSystemBuilder,
    def: EventDef,
    overridden: Option<EventId>,
}

impl<'b> EventBuilder<'b> {
    member_header_setters!();

    pub fn overrides(mut self, base: EventId) -> Self {
        self.def.info.is_override = true;
        self.overridden = Some(base);
        self
    }

    pub fn finish(self) -> EventId {
        let EventBuilder {
            builder,
            mut def,
            overridden,
        } = self;
        let id = EventId(builder.ts.events.len() as u32);
        let base = overridden.map(|e| builder.ts.event(e).clone());
        let value = ParameterDef {
            name: "value".to_string(),
            ty: def.ty.clone(),
            is_params: false,
            is_out: false,
            is_ref: false,
            location: Location::default(),
        };
        let interfaces: Vec<EventDef> = def
            .info
            .implemented_interface_members
            .iter()
            .filter_map(|m| match m {
                MemberRef::Event(e) => Some(builder.ts.event(*e).clone()),
                _ => None,
            })
            .collect();

        let mut adder = builder.accessor(&def.info, format!("add_{}", def.info.name), Vec::new());
        adder.parameters.push(value.clone());
        adder.overrides = base.as_ref().and_then(|b| b.adder);
        adder.info.implemented_interface_members = interfaces
            .iter()
            .filter_map(|e| e.adder.map(MemberRef::Method))
            .collect();
        def.adder = Some(builder.push_method(adder));

        let mut remover = builder.accessor(&def.info, format!("remove_{}", def.info.name), Vec::new());
        remover.parameters.push(value);
        remover.overrides = base.as_ref().and_then(|b| b.remover);
        remover.info.implemented_interface_members = interfaces
            .iter()
            .filter_map(|e| e.remover.map(MemberRef::Method))
            .collect();
        def.remover = Some(builder.push_method(remover));

        let owner = def.info.declaring_type;
        builder.ts.events.push(def);
        builder.ts.types[owner.index()].members.push(MemberRef::Event(id));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_derive_from_object_by_default() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let object = b.object();
        let ts = b.build();
        assert_eq!(ts.type_def(c).direct_base_types, vec![TypeRef::def(object)]);
        assert!(ts.type_def(object).direct_base_types.is_empty());
    }

    #[test]
    fn test_synthetic_constructor_is_added_once() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let d = b.class("Ns", "D").finish();
        b.constructor(d).param("x", TypeRef::Dynamic).finish();
        let ts = b.build();

        let c_ctors: Vec<_> = ts.constructors_of(c).collect();
        assert_eq!(c_ctors.len(), 1);
        assert!(ts.method(c_ctors[0]).is_synthetic);
        assert!(ts.method(c_ctors[0]).parameters.is_empty());
        assert!(ts.constructors_of(d).all(|m| !ts.method(m).is_synthetic));
    }

    #[test]
    fn test_property_accessors_follow_the_property() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let p = b.property(c, "Value", TypeRef::Dynamic).static_().finish();
        let ts = b.build();

        let prop = ts.property(p);
        let getter = ts.method(prop.getter.unwrap());
        let setter = ts.method(prop.setter.unwrap());
        assert_eq!(getter.info.name, "get_Value");
        assert!(getter.info.is_static);
        assert_eq!(setter.parameters.len(), 1);
        assert!(!ts.type_def(c).members.contains(&MemberRef::Method(prop.getter.unwrap())));
    }

    #[test]
    fn test_names() {
        let mut b = TypeSystemBuilder::new("Main");
        let outer = b.class("Ns", "Outer").type_params(&["T"]).finish();
        let inner = b.class("", "Inner").nested_in(outer).finish();
        let ts = b.build();
        assert_eq!(ts.full_name(inner), "Ns.Outer.Inner");
        assert_eq!(ts.reflection_name(inner), "Ns.Outer`1+Inner");
        assert_eq!(ts.find_type("Ns.Outer.Inner"), Some(inner));
    }
}
