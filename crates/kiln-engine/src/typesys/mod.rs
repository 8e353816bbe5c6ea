//! Resolved declaration model
//!
//! The front end hands the engine a fully type-checked set of declarations.
//! This module stores them in an arena (`TypeSystem`) addressed by typed ids,
//! so every later stage identifies a declaration by its definition rather
//! than by a particular generic instantiation.
//!
//! # Structure
//!
//! - `TypeDef` - A class, interface, struct, enum, delegate or anonymous type
//! - `MethodDef` / `PropertyDef` / `FieldDef` / `EventDef` - Members
//! - `TypeRef` - A (possibly instantiated) reference to a type
//! - `Markers` - Attribute-like configuration carried by each declaration
//! - `TypeSystemBuilder` - Programmatic construction, used by tests and front ends

mod builder;
mod hierarchy;
pub mod markers;
mod validate;

pub use builder::{
    EventBuilder, FieldBuilder, MethodBuilder, PropertyBuilder, TypeBuilder, TypeSystemBuilder,
};
pub use markers::{Marker, Markers, TestArgs};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Full name of the root object type
pub const ROOT_OBJECT_TYPE: &str = "System.Object";

/// Full name of the root record type
pub const ROOT_RECORD_TYPE: &str = "System.Record";

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id!(
    /// Index of an assembly in the type system
    AssemblyId
);
define_id!(
    /// Index of a type definition
    TypeId
);
define_id!(
    /// Index of a method definition (constructors and accessors included)
    MethodId
);
define_id!(
    /// Index of a property definition
    PropertyId
);
define_id!(
    /// Index of a field definition
    FieldId
);
define_id!(
    /// Index of an event definition
    EventId
);

/// Source position of a declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.is_empty() {
            write!(f, "<unknown>")
        } else {
            write!(f, "{}({},{})", self.file, self.line, self.column)
        }
    }
}

/// An assembly (compilation or referenced library)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyDef {
    pub name: String,
    #[serde(default)]
    pub markers: Markers,
    #[serde(default)]
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
    Anonymous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accessibility {
    Public,
    Protected,
    ProtectedOrInternal,
    ProtectedAndInternal,
    Internal,
    Private,
}

impl Accessibility {
    /// Whether code outside the assembly can see a declaration with this accessibility
    pub fn is_externally_visible(self) -> bool {
        matches!(
            self,
            Accessibility::Public | Accessibility::Protected | Accessibility::ProtectedOrInternal
        )
    }
}

/// Reference to a member of any kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberRef {
    Method(MethodId),
    Property(PropertyId),
    Field(FieldId),
    Event(EventId),
}

/// The declaration a type parameter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeParamOwner {
    Type(TypeId),
    Method(MethodId),
}

/// A reference to a type, possibly instantiated with type arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    Def { id: TypeId, args: Vec<TypeRef> },
    TypeParam { owner: TypeParamOwner, index: u32 },
    Array(Box<TypeRef>),
    Dynamic,
    Void,
}

impl TypeRef {
    /// Non-generic reference to a definition
    pub fn def(id: TypeId) -> Self {
        TypeRef::Def {
            id,
            args: Vec::new(),
        }
    }

    pub fn generic(id: TypeId, args: Vec<TypeRef>) -> Self {
        TypeRef::Def { id, args }
    }

    pub fn type_param(owner: TypeParamOwner, index: u32) -> Self {
        TypeRef::TypeParam { owner, index }
    }

    /// The definition this reference points to, if any
    pub fn definition(&self) -> Option<TypeId> {
        match self {
            TypeRef::Def { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Replace the type parameters of `owner` by `args`
    pub fn substitute(&self, owner: TypeId, args: &[TypeRef]) -> TypeRef {
        match self {
            TypeRef::Def { id, args: inner } => TypeRef::Def {
                id: *id,
                args: inner.iter().map(|a| a.substitute(owner, args)).collect(),
            },
            TypeRef::TypeParam {
                owner: TypeParamOwner::Type(o),
                index,
            } if *o == owner => args
                .get(*index as usize)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            TypeRef::Array(elem) => TypeRef::Array(Box::new(elem.substitute(owner, args))),
            other => other.clone(),
        }
    }
}

/// Compile-time constant carried by a const field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstantValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    String(String),
    Null,
}

impl ConstantValue {
    /// Integral value used for enum members
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConstantValue::Int(v) => Some(*v),
            ConstantValue::Char(c) => Some(*c as i64),
            ConstantValue::Bool(b) => Some(*b as i64),
            ConstantValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }
}

/// A type definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub kind: TypeKind,
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_sealed: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub declaring_type: Option<TypeId>,
    /// Type parameters declared by this type itself (not by enclosing types)
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub direct_base_types: Vec<TypeRef>,
    #[serde(default)]
    pub markers: Markers,
    pub assembly: AssemblyId,
    #[serde(default)]
    pub location: Location,
    /// Own members in declaration order (accessors excluded)
    #[serde(default)]
    pub members: Vec<MemberRef>,
    #[serde(default)]
    pub nested_types: Vec<TypeId>,
}

/// Header shared by all member kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberInfo {
    pub name: String,
    pub declaring_type: TypeId,
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub is_override: bool,
    #[serde(default)]
    pub is_sealed: bool,
    #[serde(default)]
    pub markers: Markers,
    #[serde(default)]
    pub location: Location,
    /// Interface members this member implements
    #[serde(default)]
    pub implemented_interface_members: Vec<MemberRef>,
}

impl MemberInfo {
    /// Whether a derived type may override this member
    pub fn is_overridable(&self) -> bool {
        (self.is_virtual || self.is_abstract || self.is_override) && !self.is_sealed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    Ordinary,
    Constructor,
    Operator,
    Accessor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDef {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub is_params: bool,
    #[serde(default)]
    pub is_out: bool,
    #[serde(default)]
    pub is_ref: bool,
    #[serde(default)]
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDef {
    pub info: MemberInfo,
    pub kind: MethodKind,
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    pub return_type: TypeRef,
    /// The base method this method overrides
    #[serde(default)]
    pub overrides: Option<MethodId>,
    /// Compiler-generated (the implicit default constructor)
    #[serde(default)]
    pub is_synthetic: bool,
}

impl MethodDef {
    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Constructor
    }

    pub fn is_operator(&self) -> bool {
        self.kind == MethodKind::Operator
    }

    pub fn is_accessor(&self) -> bool {
        self.kind == MethodKind::Accessor
    }

    pub fn has_params_array(&self) -> bool {
        self.parameters.iter().any(|p| p.is_params)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDef {
    pub info: MemberInfo,
    pub ty: TypeRef,
    /// Non-empty for indexers
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,
    #[serde(default)]
    pub getter: Option<MethodId>,
    #[serde(default)]
    pub setter: Option<MethodId>,
}

impl PropertyDef {
    pub fn is_indexer(&self) -> bool {
        !self.parameters.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub info: MemberInfo,
    pub ty: TypeRef,
    /// Present for const fields (and enum members)
    #[serde(default)]
    pub constant: Option<ConstantValue>,
}

impl FieldDef {
    pub fn is_const(&self) -> bool {
        self.constant.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDef {
    pub info: MemberInfo,
    pub ty: TypeRef,
    #[serde(default)]
    pub adder: Option<MethodId>,
    #[serde(default)]
    pub remover: Option<MethodId>,
}

/// Arena holding every declaration visible to a compilation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeSystem {
    pub assemblies: Vec<AssemblyDef>,
    pub types: Vec<TypeDef>,
    pub methods: Vec<MethodDef>,
    pub properties: Vec<PropertyDef>,
    pub fields: Vec<FieldDef>,
    pub events: Vec<EventDef>,
}

impl TypeSystem {
    pub fn assembly(&self, id: AssemblyId) -> &AssemblyDef {
        &self.assemblies[id.index()]
    }

    pub fn type_def(&self, id: TypeId) -> &TypeDef {
        &self.types[id.index()]
    }

    pub fn method(&self, id: MethodId) -> &MethodDef {
        &self.methods[id.index()]
    }

    pub fn property(&self, id: PropertyId) -> &PropertyDef {
        &self.properties[id.index()]
    }

    pub fn field(&self, id: FieldId) -> &FieldDef {
        &self.fields[id.index()]
    }

    pub fn event(&self, id: EventId) -> &EventDef {
        &self.events[id.index()]
    }

    /// All type ids in definition order
    pub fn type_ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..self.types.len()).map(|i| TypeId(i as u32))
    }

    pub fn find_assembly(&self, name: &str) -> Option<AssemblyId> {
        self.assemblies
            .iter()
            .position(|a| a.name == name)
            .map(|i| AssemblyId(i as u32))
    }

    /// Look a type up by its dotted full name (`Ns.Outer.Inner`)
    pub fn find_type(&self, full_name: &str) -> Option<TypeId> {
        self.type_ids().find(|&id| self.full_name(id) == full_name)
    }

    pub fn root_object(&self) -> Option<TypeId> {
        self.find_type(ROOT_OBJECT_TYPE)
    }

    pub fn root_record(&self) -> Option<TypeId> {
        self.find_type(ROOT_RECORD_TYPE)
    }

    /// Header of any member
    pub fn member_info(&self, member: MemberRef) -> &MemberInfo {
        match member {
            MemberRef::Method(id) => &self.method(id).info,
            MemberRef::Property(id) => &self.property(id).info,
            MemberRef::Field(id) => &self.field(id).info,
            MemberRef::Event(id) => &self.event(id).info,
        }
    }

    /// Declared (return) type of a member
    pub fn member_type(&self, member: MemberRef) -> &TypeRef {
        match member {
            MemberRef::Method(id) => &self.method(id).return_type,
            MemberRef::Property(id) => &self.property(id).ty,
            MemberRef::Field(id) => &self.field(id).ty,
            MemberRef::Event(id) => &self.event(id).ty,
        }
    }

    /// `Ns.Outer.Inner`
    pub fn full_name(&self, id: TypeId) -> String {
        let def = self.type_def(id);
        match def.declaring_type {
            Some(outer) => format!("{}.{}", self.full_name(outer), def.name),
            None if def.namespace.is_empty() => def.name.clone(),
            None => format!("{}.{}", def.namespace, def.name),
        }
    }

    /// `Ns.Outer+Inner`1`, used to order types deterministically
    pub fn reflection_name(&self, id: TypeId) -> String {
        let def = self.type_def(id);
        let own = if def.type_parameters.is_empty() {
            def.name.clone()
        } else {
            format!("{}`{}", def.name, def.type_parameters.len())
        };
        match def.declaring_type {
            Some(outer) => format!("{}+{}", self.reflection_name(outer), own),
            None if def.namespace.is_empty() => own,
            None => format!("{}.{}", def.namespace, own),
        }
    }

    /// `Ns.Type.Member`, the form used in diagnostics
    pub fn qualified_member_name(&self, member: MemberRef) -> String {
        let info = self.member_info(member);
        let name = match member {
            MemberRef::Method(id) if self.method(id).is_constructor() => {
                self.type_def(info.declaring_type).name.clone()
            }
            _ => info.name.clone(),
        };
        format!("{}.{}", self.full_name(info.declaring_type), name)
    }

    /// Name of a type reference without generic arguments
    pub fn type_ref_name(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Def { id, .. } => self.full_name(*id),
            TypeRef::TypeParam { owner, index } => self
                .type_parameter_declared_name(*owner, *index)
                .unwrap_or("?")
                .to_string(),
            TypeRef::Array(elem) => format!("{}[]", self.type_ref_name(elem)),
            TypeRef::Dynamic => "dynamic".to_string(),
            TypeRef::Void => "System.Void".to_string(),
        }
    }

    pub fn type_parameter_declared_name(&self, owner: TypeParamOwner, index: u32) -> Option<&str> {
        let params = match owner {
            TypeParamOwner::Type(t) => &self.type_def(t).type_parameters,
            TypeParamOwner::Method(m) => &self.method(m).type_parameters,
        };
        params.get(index as usize).map(String::as_str)
    }

    /// Number of type parameters declared by all enclosing types of `id`
    pub fn outer_type_parameter_count(&self, id: TypeId) -> usize {
        let mut count = 0;
        let mut current = self.type_def(id).declaring_type;
        while let Some(outer) = current {
            let def = self.type_def(outer);
            count += def.type_parameters.len();
            current = def.declaring_type;
        }
        count
    }

    /// Type parameters in scope for `id`, enclosing types first
    pub fn total_type_parameter_count(&self, id: TypeId) -> usize {
        self.outer_type_parameter_count(id) + self.type_def(id).type_parameters.len()
    }

    /// Whether the type is visible outside its assembly
    pub fn is_public_type(&self, id: TypeId) -> bool {
        let def = self.type_def(id);
        def.accessibility.is_externally_visible()
            && def.declaring_type.map_or(true, |outer| self.is_public_type(outer))
    }

    /// Whether the member is visible outside its assembly
    pub fn is_public_member(&self, member: MemberRef) -> bool {
        let info = self.member_info(member);
        info.accessibility.is_externally_visible() && self.is_public_type(info.declaring_type)
    }

    /// Methods declared on a type, accessors included
    pub fn methods_of(&self, id: TypeId) -> impl Iterator<Item = MethodId> + '_ {
        (0..self.methods.len())
            .map(|i| MethodId(i as u32))
            .filter(move |&m| self.method(m).info.declaring_type == id)
    }

    pub fn constructors_of(&self, id: TypeId) -> impl Iterator<Item = MethodId> + '_ {
        self.methods_of(id).filter(move |&m| self.method(m).is_constructor())
    }

    pub fn fields_of(&self, id: TypeId) -> impl Iterator<Item = FieldId> + '_ {
        self.type_def(id).members.iter().filter_map(|m| match m {
            MemberRef::Field(f) => Some(*f),
            _ => None,
        })
    }

    pub fn has_instance_events(&self, id: TypeId) -> bool {
        self.type_def(id).members.iter().any(|m| match m {
            MemberRef::Event(e) => !self.event(*e).info.is_static,
            _ => false,
        })
    }
}
