//! Declaration lowering pass
//!
//! Turns resolved compilation units into emitted JS types, consulting the
//! naming engine for every name and calling out to a `MethodBodyCompiler`
//! for every body.
//!
//! # Phases
//!
//! 1. Walk every unit. Types get a class skeleton, methods and accessors are
//!    compiled, field initializers accumulate per type (static ones into the
//!    class, instance ones into a pending list). Constructors are only queued.
//! 2. Drain the constructor queue. Every instance constructor sees the
//!    complete instance-initializer list of its type; static constructor
//!    bodies are appended after all static field initializers.
//! 3. Synthesize default constructors, freeze every class, lower enums.
//!
//! A failure inside one declaration is reported as an internal error and
//! only that declaration is skipped.

pub mod body;
pub mod scan;
pub mod syntax;

pub use body::{BodyContext, MethodBodyCompiler};
pub use scan::{scan_units, AcceptAllScanner, ConstructScanner, MarkedConstructScanner, UnsupportedConstruct};
pub use syntax::{
    AccessorSyntax, CompilationUnit, CustomEventDeclaration, Declaration, MethodDeclaration, PropertyDeclaration,
    SourceCode, Symbol, TypeDeclaration, VariableSyntax, VariablesDeclaration,
};

use crate::diagnostic::{codes, Diagnostics};
use crate::error::LowerError;
use crate::jsmodel::{
    JsClassBuilder, JsClassKind, JsEnum, JsEnumValue, JsExpression, JsMethod, JsNamedConstructor, JsStatement,
    JsType,
};
use crate::naming::NamingEngine;
use crate::semantics::{ConstructorSemantics, EventSemantics, FieldSemantics, MethodSemantics, PropertySemantics};
use crate::typesys::{
    AssemblyId, ConstantValue, Location, MemberRef, MethodId, TypeId, TypeKind, TypeParamOwner, TypeRef,
};
use rustc_hash::{FxHashMap, FxHashSet};

/// Name of the placeholder class emitted for a type with unusable bases, and
/// of the throwaway semantics static constructors are compiled with
const PLACEHOLDER_NAME: &str = "X";

/// A constructor declaration waiting for phase 2
struct DeferredConstructor<'u> {
    unit: usize,
    declaration: &'u MethodDeclaration,
}

/// One accessor slot of a property or event: the accessor method, its
/// semantics and its syntax, any of which may be missing
type AccessorSlot<'s> = (Option<MethodId>, Option<&'s MethodSemantics>, Option<&'s AccessorSyntax>);

/// Lowers the declarations of one compilation
pub struct DeclarationLowerer<'a, 'ts> {
    naming: &'a NamingEngine<'ts>,
    compiler: &'a mut dyn MethodBodyCompiler,
    main_assembly: AssemblyId,
    /// `None` for types that emit no class
    classes: FxHashMap<TypeId, Option<JsClassBuilder>>,
    class_order: Vec<TypeId>,
    instance_init: FxHashMap<TypeId, Vec<JsStatement>>,
    diagnostics: Diagnostics,
}

impl<'a, 'ts> DeclarationLowerer<'a, 'ts> {
    pub fn new(
        naming: &'a NamingEngine<'ts>,
        compiler: &'a mut dyn MethodBodyCompiler,
        main_assembly: AssemblyId,
    ) -> Self {
        Self {
            naming,
            compiler,
            main_assembly,
            classes: FxHashMap::default(),
            class_order: Vec::new(),
            instance_init: FxHashMap::default(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Lower all units. Classes come first, in the order their types were
    /// first met, followed by the enums of the main assembly.
    #[tracing::instrument(skip_all, fields(units = units.len()))]
    pub fn lower(mut self, units: &[CompilationUnit], diagnostics: &mut Diagnostics) -> Vec<JsType> {
        let symbols: Vec<FxHashSet<String>> = units
            .iter()
            .map(|u| u.defined_symbols.iter().cloned().collect())
            .collect();

        let mut deferred = Vec::new();
        for (index, unit) in units.iter().enumerate() {
            tracing::trace!(file = %unit.file, "lowering unit");
            let ctx = BodyContext::new(self.naming, &unit.file, &symbols[index]);
            for decl in &unit.declarations {
                self.visit_isolated(&ctx, index, decl, &mut deferred);
            }
        }

        tracing::debug!(constructors = deferred.len(), "draining deferred constructors");
        for pending in deferred {
            let unit = &units[pending.unit];
            let ctx = BodyContext::new(self.naming, &unit.file, &symbols[pending.unit]);
            if let Err(err) = self.lower_constructor(&ctx, pending.declaration) {
                self.report(&pending.declaration.location, &pending.declaration.name, err);
            }
        }

        self.add_default_constructors();
        let mut result = self.freeze_classes();
        result.extend(self.lower_enums());

        tracing::debug!(
            types = result.len(),
            diagnostics = self.diagnostics.len(),
            "lowering finished"
        );
        diagnostics.extend(std::mem::take(&mut self.diagnostics));
        result
    }

    fn report(&mut self, location: &Location, name: &str, err: LowerError) {
        self.diagnostics
            .internal_error(location, format!("Error lowering '{}'", name), Some(err.to_string()));
    }

    // ========================================================================
    // Phase 1: declarations
    // ========================================================================

    fn visit_isolated<'u>(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        unit: usize,
        decl: &'u Declaration,
        deferred: &mut Vec<DeferredConstructor<'u>>,
    ) {
        if let Err(err) = self.visit(ctx, unit, decl, deferred) {
            self.report(decl.location(), &decl.display_name(), err);
        }
    }

    fn visit<'u>(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        unit: usize,
        decl: &'u Declaration,
        deferred: &mut Vec<DeferredConstructor<'u>>,
    ) -> Result<(), LowerError> {
        match decl {
            Declaration::Type(d) => self.visit_type(ctx, unit, d, deferred),
            Declaration::Method(d) | Declaration::Operator(d) => self.visit_method(ctx, d),
            Declaration::Constructor(d) => {
                deferred.push(DeferredConstructor {
                    unit,
                    declaration: d,
                });
                Ok(())
            }
            Declaration::Property(d) => self.visit_property(ctx, d),
            Declaration::Indexer(d) => self.visit_indexer(ctx, d),
            Declaration::Field(d) => self.visit_fields(ctx, d),
            Declaration::Event(d) => self.visit_events(ctx, d),
            Declaration::CustomEvent(d) => self.visit_custom_event(ctx, d),
            Declaration::Unsupported { description, .. } => {
                tracing::trace!(construct = %description, "skipping unsupported declaration");
                Ok(())
            }
        }
    }

    fn visit_type<'u>(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        unit: usize,
        decl: &'u TypeDeclaration,
        deferred: &mut Vec<DeferredConstructor<'u>>,
    ) -> Result<(), LowerError> {
        let Symbol::Type(id) = decl.symbol else {
            return Err(unexpected(&decl.name, "type"));
        };
        // Enums are lowered from the type system, delegates emit nothing
        if JsClassKind::from_type_kind(self.naming.type_system().type_def(id).kind).is_none() {
            return Ok(());
        }
        self.ensure_class(ctx, id)?;
        for member in &decl.members {
            self.visit_isolated(ctx, unit, member, deferred);
        }
        Ok(())
    }

    fn visit_method(&mut self, ctx: &BodyContext<'_, '_>, decl: &MethodDeclaration) -> Result<(), LowerError> {
        let Symbol::Member(MemberRef::Method(id)) = decl.symbol else {
            return Err(unexpected(&decl.name, "method"));
        };
        let def = self.naming.type_system().method(id);
        let owner = def.info.declaring_type;
        if !self.ensure_class(ctx, owner)? {
            return Ok(());
        }
        // Extern and partial declarations have neither a body nor a slot
        if !def.info.is_abstract && decl.body.is_none() {
            return Ok(());
        }
        let semantics = self.naming.method_semantics(id)?;
        self.compile_and_add_method(ctx, owner, id, def.info.is_static, decl.body.as_ref(), &semantics)
    }

    fn visit_property(&mut self, ctx: &BodyContext<'_, '_>, decl: &PropertyDeclaration) -> Result<(), LowerError> {
        let Symbol::Member(MemberRef::Property(id)) = decl.symbol else {
            return Err(unexpected(&decl.name, "property"));
        };
        let prop = self.naming.type_system().property(id);
        let owner = prop.info.declaring_type;
        let is_static = prop.info.is_static;
        if !self.ensure_class(ctx, owner)? {
            return Ok(());
        }

        match self.naming.property_semantics(id)? {
            PropertySemantics::GetAndSetMethods { getter, setter } => {
                if prop.info.is_abstract || !decl.is_auto() {
                    return self.compile_accessors(
                        ctx,
                        owner,
                        is_static,
                        prop.info.is_abstract,
                        [
                            (prop.getter, getter.as_ref(), decl.getter.as_ref()),
                            (prop.setter, setter.as_ref(), decl.setter.as_ref()),
                        ],
                    );
                }

                let generates = |s: &Option<MethodSemantics>| s.as_ref().is_some_and(MethodSemantics::generate_code);
                if !generates(&getter) && !generates(&setter) {
                    return Ok(());
                }
                let field = self.naming.auto_property_backing_field_name(id);
                self.add_initializer(ctx, owner, &field, &prop.ty, is_static, decl.initializer.as_ref())?;

                if let (Some(accessor), Some(semantics)) = (prop.getter, getter.as_ref()) {
                    if semantics.generate_code() {
                        let function = self.compiler.compile_auto_property_getter(ctx, id, semantics, &field)?;
                        self.add_method(owner, is_static, semantics, JsMethod::new(accessor, method_name(semantics), Vec::new(), Some(function)));
                    }
                }
                if let (Some(accessor), Some(semantics)) = (prop.setter, setter.as_ref()) {
                    if semantics.generate_code() {
                        let function = self.compiler.compile_auto_property_setter(ctx, id, semantics, &field)?;
                        self.add_method(owner, is_static, semantics, JsMethod::new(accessor, method_name(semantics), Vec::new(), Some(function)));
                    }
                }
                Ok(())
            }
            PropertySemantics::Field { name } => {
                self.add_initializer(ctx, owner, &name, &prop.ty, is_static, decl.initializer.as_ref())
            }
            PropertySemantics::NotUsable => Ok(()),
        }
    }

    fn visit_indexer(&mut self, ctx: &BodyContext<'_, '_>, decl: &PropertyDeclaration) -> Result<(), LowerError> {
        let Symbol::Member(MemberRef::Property(id)) = decl.symbol else {
            return Err(unexpected(&decl.name, "indexer"));
        };
        let prop = self.naming.type_system().property(id);
        let owner = prop.info.declaring_type;
        if !self.ensure_class(ctx, owner)? {
            return Ok(());
        }

        match self.naming.property_semantics(id)? {
            PropertySemantics::GetAndSetMethods { getter, setter } => self.compile_accessors(
                ctx,
                owner,
                prop.info.is_static,
                prop.info.is_abstract,
                [
                    (prop.getter, getter.as_ref(), decl.getter.as_ref()),
                    (prop.setter, setter.as_ref(), decl.setter.as_ref()),
                ],
            ),
            PropertySemantics::NotUsable => Ok(()),
            PropertySemantics::Field { .. } => Err(unexpected(&decl.name, "indexer with accessor methods")),
        }
    }

    fn visit_fields(&mut self, ctx: &BodyContext<'_, '_>, decl: &VariablesDeclaration) -> Result<(), LowerError> {
        for variable in &decl.variables {
            let Symbol::Member(MemberRef::Field(id)) = variable.symbol else {
                return Err(unexpected(&variable.name, "field"));
            };
            let field = self.naming.type_system().field(id);
            let owner = field.info.declaring_type;
            if !self.ensure_class(ctx, owner)? {
                continue;
            }
            // Constants are inlined at use sites and have no storage
            if let FieldSemantics::Field { name } = self.naming.field_semantics(id)? {
                self.add_initializer(
                    ctx,
                    owner,
                    &name,
                    &field.ty,
                    field.info.is_static,
                    variable.initializer.as_ref(),
                )?;
            }
        }
        Ok(())
    }

    fn visit_events(&mut self, ctx: &BodyContext<'_, '_>, decl: &VariablesDeclaration) -> Result<(), LowerError> {
        for variable in &decl.variables {
            let Symbol::Member(MemberRef::Event(id)) = variable.symbol else {
                return Err(unexpected(&variable.name, "event"));
            };
            let evt = self.naming.type_system().event(id);
            let owner = evt.info.declaring_type;
            let is_static = evt.info.is_static;
            if !self.ensure_class(ctx, owner)? {
                continue;
            }

            let EventSemantics::AddAndRemoveMethods { adder, remover } = self.naming.event_semantics(id)? else {
                continue;
            };
            let slots = [(evt.adder, adder.as_ref()), (evt.remover, remover.as_ref())];
            let generating: Vec<(MethodId, &MethodSemantics)> = slots
                .into_iter()
                .filter_map(|(accessor, semantics)| Some((accessor?, semantics?)))
                .filter(|(_, semantics)| semantics.generate_code())
                .collect();
            if generating.is_empty() {
                continue;
            }

            if evt.info.is_abstract {
                for (accessor, semantics) in generating {
                    self.add_method(owner, is_static, semantics, JsMethod::new(accessor, method_name(semantics), Vec::new(), None));
                }
                continue;
            }

            let field = self.naming.auto_event_backing_field_name(id);
            self.add_initializer(ctx, owner, &field, &evt.ty, is_static, variable.initializer.as_ref())?;
            for (accessor, semantics) in generating {
                let function = if Some(accessor) == evt.adder {
                    self.compiler.compile_auto_event_adder(ctx, id, semantics, &field)?
                } else {
                    self.compiler.compile_auto_event_remover(ctx, id, semantics, &field)?
                };
                self.add_method(owner, is_static, semantics, JsMethod::new(accessor, method_name(semantics), Vec::new(), Some(function)));
            }
        }
        Ok(())
    }

    fn visit_custom_event(&mut self, ctx: &BodyContext<'_, '_>, decl: &CustomEventDeclaration) -> Result<(), LowerError> {
        let Symbol::Member(MemberRef::Event(id)) = decl.symbol else {
            return Err(unexpected(&decl.name, "event"));
        };
        let evt = self.naming.type_system().event(id);
        let owner = evt.info.declaring_type;
        if !self.ensure_class(ctx, owner)? {
            return Ok(());
        }

        match self.naming.event_semantics(id)? {
            EventSemantics::AddAndRemoveMethods { adder, remover } => self.compile_accessors(
                ctx,
                owner,
                evt.info.is_static,
                evt.info.is_abstract,
                [
                    (evt.adder, adder.as_ref(), decl.adder.as_ref()),
                    (evt.remover, remover.as_ref(), decl.remover.as_ref()),
                ],
            ),
            EventSemantics::NotUsable => Ok(()),
        }
    }

    /// Compile explicitly written accessors
    fn compile_accessors(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        owner: TypeId,
        is_static: bool,
        is_abstract: bool,
        slots: [AccessorSlot<'_>; 2],
    ) -> Result<(), LowerError> {
        for slot in slots {
            let (Some(accessor), Some(semantics), Some(syntax)) = slot else {
                continue;
            };
            if !is_abstract && syntax.body.is_none() {
                continue;
            }
            self.compile_and_add_method(ctx, owner, accessor, is_static, syntax.body.as_ref(), semantics)?;
        }
        Ok(())
    }

    // ========================================================================
    // Class skeletons
    // ========================================================================

    /// Create the class for `id` on first use. Returns whether the type
    /// emits a class at all.
    fn ensure_class(&mut self, ctx: &BodyContext<'_, '_>, id: TypeId) -> Result<bool, LowerError> {
        if let Some(entry) = self.classes.get(&id) {
            return Ok(entry.is_some());
        }
        self.class_order.push(id);
        match self.create_class(ctx, id) {
            Ok(builder) => {
                let exists = builder.is_some();
                self.classes.insert(id, builder);
                Ok(exists)
            }
            Err(err) => {
                self.classes.insert(id, None);
                Err(err)
            }
        }
    }

    fn create_class(&mut self, ctx: &BodyContext<'_, '_>, id: TypeId) -> Result<Option<JsClassBuilder>, LowerError> {
        let ts = self.naming.type_system();
        let semantics = self.naming.type_semantics(id)?;
        let (Some(name), true) = (semantics.name(), semantics.generate_code()) else {
            return Ok(None);
        };
        let def = ts.type_def(id);
        let kind =
            JsClassKind::from_type_kind(def.kind).ok_or_else(|| unexpected(&ts.full_name(id), "class, interface or struct"))?;

        let mut unusable = Vec::new();
        for base in ts.all_base_type_definitions(id) {
            if base != id && !self.naming.type_semantics(base)?.is_usable() {
                unusable.push(base);
            }
        }
        if !unusable.is_empty() {
            for base in unusable {
                self.diagnostics.message(
                    codes::UNUSABLE_BASE_TYPE,
                    &def.location,
                    vec![ts.full_name(base), ts.full_name(id)],
                );
            }
            return Ok(Some(JsClassBuilder::new(id, PLACEHOLDER_NAME, kind, Some(Vec::new()), None, Vec::new())));
        }

        let mut base_class = None;
        let mut interfaces = Vec::new();
        for base in ts.all_base_types(id) {
            if base.definition() == Some(id) {
                continue;
            }
            let Some(expr) = ctx.runtime_type_ref(&base)? else {
                continue;
            };
            match ts.kind_of(&base) {
                Some(TypeKind::Interface) => interfaces.push(expr),
                // Bases precede derived types, so the last class is the direct base
                Some(TypeKind::Class) if kind != JsClassKind::Interface => base_class = Some(expr),
                _ => {}
            }
        }

        let type_argument_names = if semantics.ignore_generic_arguments() {
            None
        } else {
            Some(self.type_parameter_names(TypeParamOwner::Type(id), def.type_parameters.len())?)
        };

        tracing::trace!(ty = %ts.full_name(id), name, "class skeleton");
        Ok(Some(JsClassBuilder::new(id, name, kind, type_argument_names, base_class, interfaces)))
    }

    fn type_parameter_names(&self, owner: TypeParamOwner, count: usize) -> Result<Vec<String>, LowerError> {
        (0..count as u32)
            .map(|i| Ok(self.naming.type_parameter_name(owner, i)?.to_string()))
            .collect()
    }

    fn builder_mut(&mut self, id: TypeId) -> Option<&mut JsClassBuilder> {
        self.classes.get_mut(&id).and_then(Option::as_mut)
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn compile_and_add_method(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        owner: TypeId,
        id: MethodId,
        is_static: bool,
        body: Option<&SourceCode>,
        semantics: &MethodSemantics,
    ) -> Result<(), LowerError> {
        if !semantics.generate_code() {
            return Ok(());
        }
        let type_parameter_names = if semantics.ignore_generic_arguments() {
            Vec::new()
        } else {
            let count = self.naming.type_system().method(id).type_parameters.len();
            self.type_parameter_names(TypeParamOwner::Method(id), count)?
        };
        let function = match body {
            Some(body) => Some(self.compiler.compile_method(ctx, id, semantics, body)?),
            None => None,
        };
        self.add_method(
            owner,
            is_static,
            semantics,
            JsMethod::new(id, method_name(semantics), type_parameter_names, function),
        );
        Ok(())
    }

    /// Source-static normal methods and receiver-first methods are static
    fn add_method(&mut self, owner: TypeId, is_static: bool, semantics: &MethodSemantics, method: JsMethod) {
        let as_static = match semantics {
            MethodSemantics::Normal { .. } => is_static,
            MethodSemantics::StaticMethodWithThisAsFirstArgument { .. } => true,
            _ => false,
        };
        if let Some(builder) = self.builder_mut(owner) {
            if as_static {
                builder.static_methods.push(method);
            } else {
                builder.instance_methods.push(method);
            }
        }
    }

    /// Store an initializer (or the type's default value) into a member.
    /// Static stores go straight to the class, instance stores wait for the
    /// constructors.
    fn add_initializer(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        owner: TypeId,
        member_name: &str,
        ty: &TypeRef,
        is_static: bool,
        initializer: Option<&SourceCode>,
    ) -> Result<(), LowerError> {
        let receiver = if is_static {
            ctx.runtime_type(owner)?
        } else {
            JsExpression::This
        };
        let target = JsExpression::member_access(receiver, member_name);
        let statements = match initializer {
            Some(init) => self.compiler.compile_field_initializer(ctx, target, init)?,
            None => self.compiler.compile_default_field_initializer(ctx, target, ty)?,
        };

        if is_static {
            if let Some(builder) = self.builder_mut(owner) {
                builder.static_init_statements.extend(statements);
            }
        } else {
            self.instance_init.entry(owner).or_default().extend(statements);
        }
        Ok(())
    }

    // ========================================================================
    // Phase 2: constructors
    // ========================================================================

    fn lower_constructor(&mut self, ctx: &BodyContext<'_, '_>, decl: &MethodDeclaration) -> Result<(), LowerError> {
        let ts = self.naming.type_system();
        let id = match decl.symbol {
            Symbol::Member(MemberRef::Method(id)) if ts.method(id).is_constructor() => id,
            _ => return Err(unexpected(&decl.name, "constructor")),
        };
        let def = ts.method(id);
        let owner = def.info.declaring_type;
        if !self.ensure_class(ctx, owner)? {
            return Ok(());
        }

        if def.info.is_static {
            let Some(body) = &decl.body else {
                return Ok(());
            };
            let function = self
                .compiler
                .compile_method(ctx, id, &MethodSemantics::normal(PLACEHOLDER_NAME), body)?;
            if let Some(builder) = self.builder_mut(owner) {
                builder.static_init_statements.extend(function.body.statements);
            }
            return Ok(());
        }

        let semantics = self.naming.constructor_semantics(id)?;
        self.compile_and_add_constructor(ctx, owner, id, &semantics, decl.body.as_ref())
    }

    fn compile_and_add_constructor(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        owner: TypeId,
        id: MethodId,
        semantics: &ConstructorSemantics,
        body: Option<&SourceCode>,
    ) -> Result<(), LowerError> {
        if !semantics.generate_code() {
            return Ok(());
        }
        let instance_init = self.instance_init.get(&owner).map(Vec::as_slice).unwrap_or(&[]);
        let function = self.compiler.compile_constructor(ctx, id, semantics, body, instance_init)?;

        let ts = self.naming.type_system();
        let Some(builder) = self.classes.get_mut(&owner).and_then(Option::as_mut) else {
            return Ok(());
        };
        match semantics {
            ConstructorSemantics::Unnamed { .. } => {
                if builder.unnamed_constructor.is_some() {
                    self.diagnostics.message(
                        codes::DUPLICATE_UNNAMED_CONSTRUCTOR,
                        &ts.method(id).info.location,
                        vec![ts.full_name(owner)],
                    );
                } else {
                    builder.unnamed_constructor = Some(function);
                }
            }
            ConstructorSemantics::Named { name, .. } => builder.named_constructors.push(JsNamedConstructor {
                name: name.clone(),
                function,
            }),
            ConstructorSemantics::StaticMethod { name, .. } => {
                builder
                    .static_methods
                    .push(JsMethod::new(id, name.clone(), Vec::new(), Some(function)));
            }
            _ => {}
        }
        Ok(())
    }

    // ========================================================================
    // Phase 3: default constructors, freezing, enums
    // ========================================================================

    fn add_default_constructors(&mut self) {
        let ts = self.naming.type_system();
        let no_symbols = FxHashSet::default();
        let emitted: Vec<TypeId> = self
            .class_order
            .iter()
            .copied()
            .filter(|id| matches!(self.classes.get(id), Some(Some(_))))
            .collect();

        for id in emitted {
            let location = &ts.type_def(id).location;
            let ctx = BodyContext::new(self.naming, &location.file, &no_symbols);
            for ctor in ts.constructors_of(id).filter(|c| ts.method(*c).is_synthetic) {
                if let Err(err) = self.add_default_constructor(&ctx, id, ctor) {
                    self.report(location, &format!("{}.{}", ts.full_name(id), ts.method(ctor).info.name), err);
                }
            }
        }
    }

    fn add_default_constructor(&mut self, ctx: &BodyContext<'_, '_>, owner: TypeId, ctor: MethodId) -> Result<(), LowerError> {
        let semantics = self.naming.constructor_semantics(ctor)?;
        self.compile_and_add_constructor(ctx, owner, ctor, &semantics, None)
    }

    fn freeze_classes(&mut self) -> Vec<JsType> {
        let order = std::mem::take(&mut self.class_order);
        order
            .into_iter()
            .filter_map(|id| self.classes.remove(&id).flatten())
            .map(|builder| {
                tracing::trace!(class = %builder.name, "freezing");
                JsType::Class(builder.freeze())
            })
            .collect()
    }

    fn lower_enums(&mut self) -> Vec<JsType> {
        let ts = self.naming.type_system();
        let mut enums = Vec::new();
        for id in ts.type_ids() {
            let def = ts.type_def(id);
            if def.assembly != self.main_assembly || def.kind != TypeKind::Enum {
                continue;
            }
            match self.lower_enum(id) {
                Ok(Some(e)) => enums.push(JsType::Enum(e)),
                Ok(None) => {}
                Err(err) => self.report(&def.location, &ts.full_name(id), err),
            }
        }
        enums
    }

    fn lower_enum(&mut self, id: TypeId) -> Result<Option<JsEnum>, LowerError> {
        let ts = self.naming.type_system();
        let semantics = self.naming.type_semantics(id)?;
        let (Some(name), true) = (semantics.name(), semantics.generate_code()) else {
            return Ok(None);
        };

        let mut values = Vec::new();
        for field in ts.fields_of(id) {
            let def = ts.field(field);
            let Some(value) = def.constant.as_ref().and_then(ConstantValue::as_i64) else {
                let member = ts.qualified_member_name(MemberRef::Field(field));
                let err = LowerError::NonConstantEnumField(member.clone());
                self.report(&def.info.location, &member, err);
                continue;
            };
            if let Some(field_name) = self.naming.field_semantics(field)?.name() {
                values.push(JsEnumValue {
                    name: field_name.to_string(),
                    value,
                });
            }
        }
        Ok(Some(JsEnum {
            definition: id,
            name: name.to_string(),
            values,
        }))
    }
}

fn unexpected(name: &str, expected: &'static str) -> LowerError {
    LowerError::UnexpectedResolution {
        name: name.to_string(),
        expected,
    }
}

fn method_name(semantics: &MethodSemantics) -> String {
    semantics.name().unwrap_or_default().to_string()
}
