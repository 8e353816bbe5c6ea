//! Method-body compiler seam
//!
//! Statement and expression lowering lives outside the engine. The lowering
//! pass calls a `MethodBodyCompiler` for every body and initializer it
//! meets, handing it a `BodyContext` with the naming engine and the source
//! file's preprocessor symbols.

use super::syntax::SourceCode;
use crate::error::LowerError;
use crate::jsmodel::{JsExpression, JsFunctionDefinition, JsStatement};
use crate::naming::NamingEngine;
use crate::semantics::{ConstructorSemantics, MethodSemantics};
use crate::typesys::{EventId, MethodId, PropertyId, TypeId, TypeRef, TypeSystem};
use rustc_hash::FxHashSet;

/// Everything a body compiler may consult while compiling one body
pub struct BodyContext<'a, 'ts> {
    pub naming: &'a NamingEngine<'ts>,
    /// Source file the body comes from; empty for synthesized bodies
    pub file: &'a str,
    pub defined_symbols: &'a FxHashSet<String>,
}

impl<'a, 'ts> BodyContext<'a, 'ts> {
    pub fn new(naming: &'a NamingEngine<'ts>, file: &'a str, defined_symbols: &'a FxHashSet<String>) -> Self {
        Self {
            naming,
            file,
            defined_symbols,
        }
    }

    pub fn type_system(&self) -> &'ts TypeSystem {
        self.naming.type_system()
    }

    pub fn is_defined(&self, symbol: &str) -> bool {
        self.defined_symbols.contains(symbol)
    }

    /// The type as seen from inside its own declarations: `{C}`, or
    /// `$InstantiateGenericType({C}, T)` for a generic type
    pub fn runtime_type(&self, id: TypeId) -> Result<JsExpression, LowerError> {
        let ty = self.type_system().self_type_ref(id);
        self.runtime_type_ref(&ty)?.ok_or_else(|| LowerError::UnexpectedResolution {
            name: self.type_system().full_name(id),
            expected: "type usable from script",
        })
    }

    /// Runtime representative of a type reference.
    ///
    /// `None` for types with no script representation: not-usable types,
    /// imported types that are not real types, and `void`.
    pub fn runtime_type_ref(&self, ty: &TypeRef) -> Result<Option<JsExpression>, LowerError> {
        match ty {
            TypeRef::Def { id, args } => {
                let semantics = self.naming.type_semantics(*id)?;
                let Some(name) = semantics.name() else {
                    return Ok(None);
                };
                if self.naming.is_imported(*id) && !self.naming.is_real_type(*id) {
                    return Ok(None);
                }
                let reference = JsExpression::type_reference(*id, name);
                if args.is_empty() || semantics.ignore_generic_arguments() {
                    return Ok(Some(reference));
                }
                let arguments = args
                    .iter()
                    .map(|a| self.type_argument(a))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Some(JsExpression::instantiate_generic_type(reference, arguments)))
            }
            TypeRef::TypeParam { owner, index } => Ok(Some(JsExpression::identifier(
                self.naming.type_parameter_name(*owner, *index)?,
            ))),
            TypeRef::Array(_) => Ok(Some(JsExpression::identifier("Array"))),
            TypeRef::Dynamic => self.object_type().map(Some),
            TypeRef::Void => Ok(None),
        }
    }

    /// Generic arguments without a representation fall back to the root object
    fn type_argument(&self, ty: &TypeRef) -> Result<JsExpression, LowerError> {
        match self.runtime_type_ref(ty)? {
            Some(expr) => Ok(expr),
            None => self.object_type(),
        }
    }

    fn object_type(&self) -> Result<JsExpression, LowerError> {
        match self.type_system().root_object() {
            Some(id) => {
                let semantics = self.naming.type_semantics(id)?;
                Ok(JsExpression::type_reference(id, semantics.name().unwrap_or("Object")))
            }
            None => Ok(JsExpression::identifier("Object")),
        }
    }

    /// Receiver of an auto accessor: the runtime type for statics, the
    /// explicit first parameter for receiver-first methods, else `this`
    fn accessor_receiver(
        &self,
        owner: TypeId,
        is_static: bool,
        semantics: &MethodSemantics,
        parameters: &mut Vec<String>,
    ) -> Result<JsExpression, LowerError> {
        if is_static {
            return self.runtime_type(owner);
        }
        if let MethodSemantics::StaticMethodWithThisAsFirstArgument { .. } = semantics {
            let alias = self.naming.this_alias();
            parameters.push(alias.to_string());
            return Ok(JsExpression::identifier(alias));
        }
        Ok(JsExpression::This)
    }
}

/// Compiles bodies and initializers into JS
pub trait MethodBodyCompiler {
    fn compile_method(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        method: MethodId,
        semantics: &MethodSemantics,
        body: &SourceCode,
    ) -> Result<JsFunctionDefinition, LowerError>;

    /// `instance_init` holds the field initializers of the declaring type;
    /// they run before the constructor's own statements. `body` is `None`
    /// for synthesized default constructors.
    fn compile_constructor(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        constructor: MethodId,
        semantics: &ConstructorSemantics,
        body: Option<&SourceCode>,
        instance_init: &[JsStatement],
    ) -> Result<JsFunctionDefinition, LowerError>;

    /// Statements storing `initializer` into `target`
    fn compile_field_initializer(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        target: JsExpression,
        initializer: &SourceCode,
    ) -> Result<Vec<JsStatement>, LowerError>;

    /// Default value of a type (`null`, `0`, `false`, `T.getDefaultValue()`...)
    fn default_value(&mut self, ctx: &BodyContext<'_, '_>, ty: &TypeRef) -> Result<JsExpression, LowerError>;

    fn compile_auto_event_adder(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        event: EventId,
        semantics: &MethodSemantics,
        backing_field: &str,
    ) -> Result<JsFunctionDefinition, LowerError>;

    fn compile_auto_event_remover(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        event: EventId,
        semantics: &MethodSemantics,
        backing_field: &str,
    ) -> Result<JsFunctionDefinition, LowerError>;

    /// `target = <default value of ty>;`
    fn compile_default_field_initializer(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        target: JsExpression,
        ty: &TypeRef,
    ) -> Result<Vec<JsStatement>, LowerError> {
        let value = self.default_value(ctx, ty)?;
        Ok(vec![JsStatement::assign(target, value)])
    }

    /// `function() { return receiver.field; }`
    fn compile_auto_property_getter(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        property: PropertyId,
        semantics: &MethodSemantics,
        backing_field: &str,
    ) -> Result<JsFunctionDefinition, LowerError> {
        let info = &ctx.type_system().property(property).info;
        let mut parameters = Vec::new();
        let receiver = ctx.accessor_receiver(info.declaring_type, info.is_static, semantics, &mut parameters)?;
        Ok(JsFunctionDefinition::from_statements(
            parameters,
            vec![JsStatement::ret(Some(JsExpression::member_access(receiver, backing_field)))],
        ))
    }

    /// `function(value) { receiver.field = value; }`
    fn compile_auto_property_setter(
        &mut self,
        ctx: &BodyContext<'_, '_>,
        property: PropertyId,
        semantics: &MethodSemantics,
        backing_field: &str,
    ) -> Result<JsFunctionDefinition, LowerError> {
        let info = &ctx.type_system().property(property).info;
        let mut parameters = Vec::new();
        let receiver = ctx.accessor_receiver(info.declaring_type, info.is_static, semantics, &mut parameters)?;
        let used: FxHashSet<String> = parameters.iter().cloned().collect();
        let value = ctx.naming.variable_name(Some("value"), &used);
        parameters.push(value.clone());
        Ok(JsFunctionDefinition::from_statements(
            parameters,
            vec![JsStatement::assign(
                JsExpression::member_access(receiver, backing_field),
                JsExpression::identifier(value),
            )],
        ))
    }
}
