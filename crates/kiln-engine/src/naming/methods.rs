//! Method resolution
//!
//! A method's semantics come from the first rule in `METHOD_RULES` that
//! applies. Each rule either produces a semantics (possibly a fallback after
//! reporting a misuse) or declines and lets the next rule decide. The last
//! rule always applies.

use super::inline_code;
use super::members::NameTable;
use super::NamingEngine;
use crate::diagnostic::codes;
use crate::error::NamingError;
use crate::semantics::{MethodSemantics, TestMethodData};
use crate::typesys::{MemberRef, MethodDef, MethodId, TypeKind, TypeParamOwner, TypeRef};

/// Input shared by all method rules
pub(super) struct MethodRequest<'a> {
    pub id: MethodId,
    pub def: &'a MethodDef,
    pub preferred: Option<&'a str>,
    pub specified: bool,
}

impl MethodRequest<'_> {
    fn member(&self) -> MemberRef {
        MemberRef::Method(self.id)
    }

    /// Plain method under the declared name, used after a reported misuse
    fn fallback(&self) -> MethodSemantics {
        MethodSemantics::normal(self.def.info.name.clone())
    }

    /// `{a}, {b}` for every parameter
    fn parameter_placeholders(&self) -> String {
        self.def
            .parameters
            .iter()
            .map(|p| format!("{{{}}}", p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

type RuleResult = Result<Option<MethodSemantics>, NamingError>;
type MethodRule = fn(&mut NamingEngine<'_>, &MethodRequest<'_>, &mut NameTable) -> RuleResult;

const METHOD_RULES: &[(&str, MethodRule)] = &[
    ("not-usable", not_usable),
    ("native-operator", native_operator),
    ("skip-invocation", skip_invocation),
    ("static-alias", static_alias),
    ("inline-code", inline_code),
    ("receiver-as-first-argument", receiver_as_first_argument),
    ("override", override_base),
    ("interface-implementation", interface_implementation),
    ("delegate-member", delegate_member),
    ("default", default_name),
];

impl<'ts> NamingEngine<'ts> {
    pub(super) fn process_method(
        &mut self,
        id: MethodId,
        preferred: Option<&str>,
        specified: bool,
        table: &mut NameTable,
    ) -> Result<(), NamingError> {
        let ts = self.ts;
        let def = ts.method(id);

        let offset = ts.total_type_parameter_count(def.info.declaring_type);
        for (i, declared) in def.type_parameters.iter().enumerate() {
            let name = if self.minimize_names {
                super::encode_number(offset + i, true)
            } else {
                declared.clone()
            };
            self.type_parameter_names
                .insert((TypeParamOwner::Method(id), i as u32), name);
        }

        let request = MethodRequest {
            id,
            def,
            preferred,
            specified,
        };
        for &(rule, apply) in METHOD_RULES {
            if let Some(semantics) = apply(self, &request, table)? {
                tracing::trace!(method = %ts.qualified_member_name(request.member()), rule, %semantics, "method resolved");
                self.methods.insert(id, semantics);
                return Ok(());
            }
        }
        Ok(())
    }

    /// Semantics of a method that may belong to a type not yet processed
    pub(super) fn ensure_method_semantics(&mut self, id: MethodId) -> Result<MethodSemantics, NamingError> {
        if let Some(semantics) = self.methods.get(&id) {
            return Ok(semantics.clone());
        }
        let declaring = self.ts.method(id).info.declaring_type;
        self.process_type(declaring);
        if let Err(err) = self.process_type_members(declaring) {
            self.report_type_failure(declaring, err);
        }
        self.method_semantics(id)
    }

    fn type_is_usable(&self, id: crate::typesys::TypeId) -> bool {
        self.types.get(&id).map_or(true, |r| r.semantics.is_usable())
    }
}

fn not_usable(engine: &mut NamingEngine<'_>, req: &MethodRequest<'_>, _: &mut NameTable) -> RuleResult {
    let info = &req.def.info;
    if info.markers.not_usable() || !engine.type_is_usable(info.declaring_type) {
        return Ok(Some(MethodSemantics::NotUsable));
    }
    Ok(None)
}

fn native_operator(engine: &mut NamingEngine<'_>, req: &MethodRequest<'_>, _: &mut NameTable) -> RuleResult {
    if !req.def.info.markers.native_operator() {
        return Ok(None);
    }
    if !req.def.is_operator() {
        engine.member_message(codes::NATIVE_OPERATOR_ON_NON_OPERATOR, req.member(), Vec::new());
        return Ok(Some(req.fallback()));
    }
    if matches!(req.def.info.name.as_str(), "op_Implicit" | "op_Explicit") {
        engine.member_message(codes::NATIVE_OPERATOR_ON_CONVERSION, req.member(), Vec::new());
        return Ok(Some(req.fallback()));
    }
    Ok(Some(MethodSemantics::NativeOperator))
}

/// Shared checks for markers that replace the call site: such methods
/// cannot take part in virtual dispatch
fn check_call_site_replacement(
    engine: &mut NamingEngine<'_>,
    req: &MethodRequest<'_>,
    codes: [u32; 4],
) -> bool {
    let info = &req.def.info;
    let code = if engine.ts.type_def(info.declaring_type).kind == TypeKind::Interface {
        codes[0]
    } else if info.is_override {
        codes[1]
    } else if info.is_overridable() {
        codes[2]
    } else if !info.implemented_interface_members.is_empty() {
        codes[3]
    } else {
        return true;
    };
    engine.member_message(code, req.member(), Vec::new());
    false
}

fn skip_invocation(engine: &mut NamingEngine<'_>, req: &MethodRequest<'_>, _: &mut NameTable) -> RuleResult {
    if !req.def.info.markers.skip_invocation() {
        return Ok(None);
    }
    let allowed = check_call_site_replacement(
        engine,
        req,
        [
            codes::SKIP_INVOCATION_ON_INTERFACE,
            codes::SKIP_INVOCATION_ON_OVERRIDE,
            codes::SKIP_INVOCATION_ON_OVERRIDABLE,
            codes::SKIP_INVOCATION_IMPLEMENTS_INTERFACE,
        ],
    );
    if !allowed {
        return Ok(Some(req.fallback()));
    }

    if req.def.info.is_static {
        match req.def.parameters.as_slice() {
            [only] => Ok(Some(MethodSemantics::inline_code(format!("{{{}}}", only.name)))),
            _ => {
                engine.member_message(codes::SKIP_INVOCATION_STATIC_ARITY, req.member(), Vec::new());
                Ok(Some(req.fallback()))
            }
        }
    } else {
        if !req.def.parameters.is_empty() {
            engine.member_message(codes::SKIP_INVOCATION_INSTANCE_ARITY, req.member(), Vec::new());
        }
        Ok(Some(MethodSemantics::inline_code("{this}")))
    }
}

fn static_alias(engine: &mut NamingEngine<'_>, req: &MethodRequest<'_>, _: &mut NameTable) -> RuleResult {
    let Some(alias) = req.def.info.markers.static_alias() else {
        return Ok(None);
    };
    if !req.def.info.is_static {
        engine.member_message(codes::STATIC_ALIAS_ON_INSTANCE_METHOD, req.member(), Vec::new());
        return Ok(Some(req.fallback()));
    }
    Ok(Some(MethodSemantics::inline_code(format!(
        "{}({})",
        alias,
        req.parameter_placeholders()
    ))))
}

fn inline_code(engine: &mut NamingEngine<'_>, req: &MethodRequest<'_>, _: &mut NameTable) -> RuleResult {
    let Some(code) = req.def.info.markers.inline_code() else {
        return Ok(None);
    };
    let allowed = check_call_site_replacement(
        engine,
        req,
        [
            codes::INLINE_CODE_ON_INTERFACE,
            codes::INLINE_CODE_ON_OVERRIDE,
            codes::INLINE_CODE_ON_OVERRIDABLE,
            codes::INLINE_CODE_IMPLEMENTS_INTERFACE,
        ],
    );
    if !allowed {
        return Ok(Some(req.fallback()));
    }

    let errors = inline_code::validate(engine.ts, req.def, code);
    if !errors.is_empty() {
        engine.member_message(codes::INVALID_METHOD_INLINE_CODE, req.member(), vec![errors.join(", ")]);
        return Ok(Some(MethodSemantics::inline_code("X")));
    }
    Ok(Some(MethodSemantics::inline_code(code)))
}

fn receiver_as_first_argument(
    engine: &mut NamingEngine<'_>,
    req: &MethodRequest<'_>,
    _: &mut NameTable,
) -> RuleResult {
    let info = &req.def.info;
    if !info.markers.receiver_as_first_argument() {
        return Ok(None);
    }
    if !info.is_static {
        engine.member_message(codes::RECEIVER_AS_FIRST_ARGUMENT_ON_INSTANCE, req.member(), Vec::new());
        return Ok(Some(req.fallback()));
    }
    Ok(Some(MethodSemantics::InstanceMethodOnFirstArgument {
        name: req.preferred.unwrap_or(&info.name).to_string(),
        expand_params: info.markers.expand_params(),
    }))
}

/// An override keeps the semantics of the member it overrides
fn override_base(engine: &mut NamingEngine<'_>, req: &MethodRequest<'_>, _: &mut NameTable) -> RuleResult {
    let info = &req.def.info;
    if !info.is_override {
        return Ok(None);
    }
    if req.specified {
        engine.member_message(codes::OVERRIDE_RENAMED, req.member(), Vec::new());
    }
    if info.markers.ignore_generic_arguments() {
        engine.member_message(codes::OVERRIDE_IGNORES_GENERIC_ARGUMENTS, req.member(), Vec::new());
    }

    let ts = engine.ts;
    let missing_base = |base: String| NamingError::MissingBaseSemantics {
        member: ts.qualified_member_name(req.member()),
        base,
    };
    let base = req.def.overrides.ok_or_else(|| missing_base("<unknown>".to_string()))?;
    let semantics = engine
        .ensure_method_semantics(base)
        .map_err(|_| missing_base(ts.qualified_member_name(MemberRef::Method(base))))?;

    if let MethodSemantics::Normal { name, .. } = &semantics {
        for implemented in &info.implemented_interface_members {
            let MemberRef::Method(interface_method) = *implemented else {
                continue;
            };
            let interface_name = engine
                .ensure_method_semantics(interface_method)?
                .name()
                .map(str::to_string);
            if interface_name.as_deref() != Some(name.as_str()) {
                engine.member_message(
                    codes::OVERRIDE_INTERFACE_NAME_MISMATCH,
                    req.member(),
                    vec![ts.qualified_member_name(*implemented)],
                );
                break;
            }
        }
    }
    Ok(Some(semantics))
}

/// An interface implementation takes the semantics of the interface member
fn interface_implementation(
    engine: &mut NamingEngine<'_>,
    req: &MethodRequest<'_>,
    _: &mut NameTable,
) -> RuleResult {
    let interface_methods: Vec<MethodId> = req
        .def
        .info
        .implemented_interface_members
        .iter()
        .filter_map(|m| match m {
            MemberRef::Method(id) => Some(*id),
            _ => None,
        })
        .collect();
    let Some(&first) = interface_methods.first() else {
        return Ok(None);
    };
    if req.specified {
        engine.member_message(codes::INTERFACE_IMPLEMENTATION_RENAMED, req.member(), Vec::new());
    }

    let mut names: Vec<String> = Vec::new();
    for &id in &interface_methods {
        if let MethodSemantics::Normal { name, .. } = engine.ensure_method_semantics(id)? {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    if names.len() > 1 {
        engine.member_message(codes::INTERFACE_NAME_DISAGREEMENT, req.member(), Vec::new());
    }
    Ok(Some(engine.ensure_method_semantics(first)?))
}

/// Delegates are plain functions; only `Invoke` is callable
fn delegate_member(engine: &mut NamingEngine<'_>, req: &MethodRequest<'_>, _: &mut NameTable) -> RuleResult {
    let info = &req.def.info;
    if engine.ts.type_def(info.declaring_type).kind == TypeKind::Delegate && info.name != "Invoke" {
        return Ok(Some(MethodSemantics::NotUsable));
    }
    Ok(None)
}

fn default_name(engine: &mut NamingEngine<'_>, req: &MethodRequest<'_>, table: &mut NameTable) -> RuleResult {
    let info = &req.def.info;
    let declaring = engine.ts.type_def(info.declaring_type);
    let expand_params = info.markers.expand_params();
    let ignore_generic_arguments = info.markers.ignore_generic_arguments();
    let alternate_signature = info.markers.alternate_signature();

    if expand_params && !req.def.has_params_array() {
        engine.member_message(codes::METHOD_EXPAND_PARAMS_WITHOUT_PARAMS, req.member(), Vec::new());
    }

    if req.preferred == Some("") {
        // an empty name turns `x.m(a)` into `x(a)`
        let code = if declaring.kind == TypeKind::Interface {
            Some(codes::EMPTY_NAME_ON_INTERFACE_METHOD)
        } else if info.is_overridable() {
            Some(codes::EMPTY_NAME_ON_OVERRIDABLE_METHOD)
        } else if info.is_static {
            Some(codes::EMPTY_NAME_ON_STATIC_METHOD)
        } else {
            None
        };
        return Ok(Some(match code {
            Some(code) => {
                engine.member_message(code, req.member(), Vec::new());
                req.fallback()
            }
            None => MethodSemantics::inline_code(format!("{{this}}({})", req.parameter_placeholders())),
        }));
    }

    let record = engine.type_record(info.declaring_type)?.clone();
    if record.is_global_methods {
        return Ok(Some(MethodSemantics::Normal {
            name: req.preferred.unwrap_or(&info.name).to_string(),
            is_global: true,
            ignore_generic_arguments,
            expand_params,
            generate_code: true,
        }));
    }

    let name = if req.specified {
        req.preferred.unwrap_or_default().to_string()
    } else {
        table.unique_name(req.preferred)
    };
    if !alternate_signature {
        table.claim(&name);
    }

    if record.is_record && !info.is_static {
        return Ok(Some(MethodSemantics::StaticMethodWithThisAsFirstArgument {
            name,
            generate_code: !alternate_signature,
            ignore_generic_arguments,
            expand_params,
        }));
    }

    if record.is_test_fixture && name == "runTests" {
        engine.member_message(codes::TEST_FIXTURE_RUN_TESTS, req.member(), Vec::new());
    }
    record_test_data(engine, req, record.is_test_fixture);

    Ok(Some(MethodSemantics::Normal {
        name,
        is_global: false,
        ignore_generic_arguments,
        expand_params,
        generate_code: !alternate_signature,
    }))
}

fn record_test_data(engine: &mut NamingEngine<'_>, req: &MethodRequest<'_>, in_fixture: bool) {
    let info = &req.def.info;
    let (test, async_test) = (info.markers.test(), info.markers.async_test());
    if test.is_some() && async_test.is_some() {
        engine.member_message(codes::TEST_AND_ASYNC_TEST, req.member(), Vec::new());
        return;
    }
    let Some(args) = test.or(async_test) else {
        return;
    };

    if !in_fixture {
        engine.member_message(codes::TEST_OUTSIDE_FIXTURE, req.member(), Vec::new());
    }
    let valid = req.def.return_type == TypeRef::Void
        && req.def.type_parameters.is_empty()
        && req.def.parameters.is_empty()
        && !info.is_static
        && info.accessibility == crate::typesys::Accessibility::Public;
    if !valid {
        engine.member_message(codes::INVALID_TEST_METHOD, req.member(), Vec::new());
        return;
    }

    engine.test_data.insert(
        req.id,
        TestMethodData {
            description: args.description.clone().unwrap_or_else(|| info.name.clone()),
            category: args.category.clone(),
            is_async: async_test.is_some(),
            expected_assertion_count: args
                .expected_assertion_count
                .and_then(|n| u32::try_from(n).ok()),
        },
    );
}

#[cfg(test)]
mod tests {
    use crate::diagnostic::{codes, Diagnostics};
    use crate::naming::NamingEngine;
    use crate::semantics::MethodSemantics;
    use crate::typesys::{AssemblyId, Marker, MemberRef, TestArgs, TypeRef, TypeSystem, TypeSystemBuilder};

    fn prepare(ts: &TypeSystem, minimize: bool) -> (NamingEngine<'_>, Diagnostics) {
        let mut engine = NamingEngine::new(ts, minimize);
        let mut diags = Diagnostics::new();
        engine.prepare(AssemblyId(0), &mut diags);
        (engine, diags)
    }

    #[test]
    fn test_skip_invocation() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let unwrap = b
            .method(c, "Unwrap")
            .static_()
            .param("value", TypeRef::Dynamic)
            .marker(Marker::SkipInvocation)
            .finish();
        let this = b.method(c, "Self").marker(Marker::SkipInvocation).finish();
        let bad = b
            .method(c, "Bad")
            .static_()
            .marker(Marker::SkipInvocation)
            .finish();
        let ts = b.build();
        let (engine, diags) = prepare(&ts, false);

        assert_eq!(engine.method_semantics(unwrap).unwrap(), MethodSemantics::inline_code("{value}"));
        assert_eq!(engine.method_semantics(this).unwrap(), MethodSemantics::inline_code("{this}"));
        assert_eq!(engine.method_semantics(bad).unwrap(), MethodSemantics::normal("Bad"));
        assert_eq!(diags.codes(), vec![codes::SKIP_INVOCATION_STATIC_ARITY]);
    }

    #[test]
    fn test_static_alias_and_inline_code() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let alias = b
            .method(c, "Parse")
            .static_()
            .param("s", TypeRef::Dynamic)
            .param("radix", TypeRef::Dynamic)
            .marker(Marker::StaticAlias("parseInt".to_string()))
            .finish();
        let inline = b
            .method(c, "Twice")
            .param("x", TypeRef::Dynamic)
            .marker(Marker::InlineCode("{this}.f({x}, {x})".to_string()))
            .finish();
        let broken = b
            .method(c, "Broken")
            .marker(Marker::InlineCode("{nope}".to_string()))
            .finish();
        let ts = b.build();
        let (engine, diags) = prepare(&ts, false);

        assert_eq!(
            engine.method_semantics(alias).unwrap(),
            MethodSemantics::inline_code("parseInt({s}, {radix})")
        );
        assert_eq!(
            engine.method_semantics(inline).unwrap(),
            MethodSemantics::inline_code("{this}.f({x}, {x})")
        );
        assert_eq!(engine.method_semantics(broken).unwrap(), MethodSemantics::inline_code("X"));
        assert_eq!(diags.codes(), vec![codes::INVALID_METHOD_INLINE_CODE]);
    }

    #[test]
    fn test_inline_code_on_virtual_method_falls_back() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let m = b
            .method(c, "Virt")
            .virtual_()
            .marker(Marker::InlineCode("1".to_string()))
            .finish();
        let ts = b.build();
        let (engine, diags) = prepare(&ts, false);
        assert_eq!(engine.method_semantics(m).unwrap(), MethodSemantics::normal("Virt"));
        assert_eq!(diags.codes(), vec![codes::INLINE_CODE_ON_OVERRIDABLE]);
    }

    #[test]
    fn test_native_operator_on_ordinary_method() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let op = b.operator(c, "op_Addition").marker(Marker::NativeOperator).finish();
        let conv = b.operator(c, "op_Implicit").marker(Marker::NativeOperator).finish();
        let m = b.method(c, "Add").marker(Marker::NativeOperator).finish();
        let ts = b.build();
        let (engine, diags) = prepare(&ts, false);

        assert_eq!(engine.method_semantics(op).unwrap(), MethodSemantics::NativeOperator);
        assert_eq!(engine.method_semantics(conv).unwrap(), MethodSemantics::normal("op_Implicit"));
        assert_eq!(engine.method_semantics(m).unwrap(), MethodSemantics::normal("Add"));
        assert_eq!(
            diags.codes(),
            vec![codes::NATIVE_OPERATOR_ON_NON_OPERATOR, codes::NATIVE_OPERATOR_ON_CONVERSION]
        );
    }

    #[test]
    fn test_override_inherits_base_name() {
        let mut b = TypeSystemBuilder::new("Main");
        let base = b.class("Ns", "Base").finish();
        let base_m = b
            .method(base, "Run")
            .virtual_()
            .marker(Marker::ScriptName(Some("go".to_string())))
            .finish();
        let derived = b.class("Ns", "Derived").base(TypeRef::def(base)).finish();
        let renamed = b
            .method(derived, "Run")
            .overrides(base_m)
            .marker(Marker::ScriptName(Some("other".to_string())))
            .finish();
        let ts = b.build();
        let (engine, diags) = prepare(&ts, false);

        assert_eq!(engine.method_semantics(renamed).unwrap().name(), Some("go"));
        assert_eq!(diags.codes(), vec![codes::OVERRIDE_RENAMED]);
    }

    #[test]
    fn test_interface_implementations_take_interface_names() {
        let mut b = TypeSystemBuilder::new("Main");
        let i1 = b.interface("Ns", "I1").finish();
        let m1 = b.method(i1, "M").marker(Marker::ScriptName(Some("first".to_string()))).finish();
        let i2 = b.interface("Ns", "I2").finish();
        let m2 = b.method(i2, "M").finish();
        let c = b
            .class("Ns", "C")
            .implements(TypeRef::def(i1))
            .implements(TypeRef::def(i2))
            .finish();
        let imp = b
            .method(c, "M")
            .implements(MemberRef::Method(m1))
            .implements(MemberRef::Method(m2))
            .finish();
        let ts = b.build();
        let (engine, diags) = prepare(&ts, false);

        assert_eq!(engine.method_semantics(imp).unwrap().name(), Some("first"));
        assert_eq!(diags.codes(), vec![codes::INTERFACE_NAME_DISAGREEMENT]);
    }

    #[test]
    fn test_empty_name_becomes_call_on_receiver() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let m = b
            .method(c, "Invoke")
            .param("a", TypeRef::Dynamic)
            .param("b", TypeRef::Dynamic)
            .marker(Marker::ScriptName(Some(String::new())))
            .finish();
        let s = b
            .method(c, "Static")
            .static_()
            .marker(Marker::ScriptName(Some(String::new())))
            .finish();
        let ts = b.build();
        let (engine, diags) = prepare(&ts, false);

        assert_eq!(engine.method_semantics(m).unwrap(), MethodSemantics::inline_code("{this}({a}, {b})"));
        assert_eq!(engine.method_semantics(s).unwrap(), MethodSemantics::normal("Static"));
        assert_eq!(diags.codes(), vec![codes::EMPTY_NAME_ON_STATIC_METHOD]);
    }

    #[test]
    fn test_record_instance_methods_take_receiver_first() {
        let mut b = TypeSystemBuilder::new("Main");
        let r = b.class("Ns", "R").sealed().marker(Marker::Record).finish();
        let m = b.method(r, "Describe").finish();
        let ts = b.build();
        let (engine, _) = prepare(&ts, false);
        assert_eq!(
            engine.method_semantics(m).unwrap(),
            MethodSemantics::static_with_this("describe")
        );
    }

    #[test]
    fn test_minimized_private_methods() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").finish();
        let p1 = b.method(c, "Alpha").private().finish();
        let p2 = b.method(c, "Beta").private().finish();
        let public = b.method(c, "Gamma").finish();
        let ts = b.build();
        let (engine, _) = prepare(&ts, true);

        assert_eq!(engine.method_semantics(p1).unwrap().name(), Some("a"));
        assert_eq!(engine.method_semantics(p2).unwrap().name(), Some("b"));
        assert_eq!(engine.method_semantics(public).unwrap().name(), Some("gamma"));
    }

    #[test]
    fn test_test_methods() {
        let mut b = TypeSystemBuilder::new("Main");
        let fixture = b.class("Ns", "Tests").marker(Marker::TestFixture).finish();
        let ok = b
            .method(fixture, "Works")
            .marker(Marker::Test(TestArgs {
                description: None,
                category: Some("fast".to_string()),
                expected_assertion_count: Some(-1),
            }))
            .finish();
        let with_param = b
            .method(fixture, "TakesArg")
            .param("x", TypeRef::Dynamic)
            .marker(Marker::AsyncTest(TestArgs::default()))
            .finish();
        let ts = b.build();
        let (engine, diags) = prepare(&ts, false);

        let data = engine.test_data(ok).unwrap();
        assert_eq!(data.description, "Works");
        assert_eq!(data.category.as_deref(), Some("fast"));
        assert!(!data.is_async);
        assert_eq!(data.expected_assertion_count, None);
        assert!(engine.test_data(with_param).is_none());
        assert_eq!(diags.codes(), vec![codes::INVALID_TEST_METHOD]);
    }

    #[test]
    fn test_method_type_parameter_names_follow_type_parameters() {
        let mut b = TypeSystemBuilder::new("Main");
        let c = b.class("Ns", "C").type_params(&["T"]).finish();
        let m = b.method(c, "Map").type_params(&["U", "V"]).finish();
        let ts = b.build();
        let (engine, _) = prepare(&ts, true);
        use crate::typesys::TypeParamOwner;
        assert_eq!(engine.type_parameter_name(TypeParamOwner::Method(m), 0).unwrap(), "b");
        assert_eq!(engine.type_parameter_name(TypeParamOwner::Method(m), 1).unwrap(), "c");
    }
}
