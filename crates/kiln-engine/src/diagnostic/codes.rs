//! Message code catalogue
//!
//! Unless stated otherwise the first argument of a message is the qualified
//! name of the offending type or member.

pub const CONFLICTING_NAMESPACE_MARKERS: u32 = 7001;
pub const INVALID_SCRIPT_NAMESPACE: u32 = 7002;
pub const RESOURCES_NOT_STATIC: u32 = 7003;
pub const RESOURCES_GENERIC: u32 = 7004;
pub const RESOURCES_NON_CONST_MEMBER: u32 = 7005;
pub const INVALID_TYPE_SCRIPT_NAME: u32 = 7006;
pub const NESTED_TYPE_WITH_NAMESPACE: u32 = 7007;
pub const RECORD_NOT_SEALED: u32 = 7008;
pub const RECORD_INVALID_BASE: u32 = 7009;
pub const RECORD_IMPLEMENTS_INTERFACES: u32 = 7010;
pub const RECORD_INSTANCE_EVENTS: u32 = 7011;
pub const MIXIN_NOT_STATIC: u32 = 7012;
pub const MIXIN_NON_METHOD_MEMBER: u32 = 7013;
pub const MIXIN_GENERIC: u32 = 7014;
pub const GLOBAL_METHODS_NOT_STATIC: u32 = 7015;
pub const GLOBAL_METHODS_NON_METHOD_MEMBER: u32 = 7016;
pub const GLOBAL_METHODS_GENERIC: u32 = 7017;
/// Args: type, first base, second base, member name
pub const DIAMOND_MEMBER_COLLISION: u32 = 7018;
pub const TEST_FIXTURE_RUN_TESTS: u32 = 7019;
pub const INVALID_TEST_METHOD: u32 = 7020;
pub const TEST_AND_ASYNC_TEST: u32 = 7021;
pub const TEST_OUTSIDE_FIXTURE: u32 = 7022;

pub const ALTERNATE_SIGNATURE_WITHOUT_MAIN: u32 = 7100;
pub const INVALID_MEMBER_SCRIPT_NAME: u32 = 7101;
pub const CONSTRUCTOR_EXPAND_PARAMS_WITHOUT_PARAMS: u32 = 7102;
/// Args: constructor, validation errors
pub const INVALID_CONSTRUCTOR_INLINE_CODE: u32 = 7103;
pub const EMPTY_INDEXER_NAME: u32 = 7104;
pub const EMPTY_PROPERTY_NAME: u32 = 7105;
pub const STATIC_ALIAS_ON_INDEXER: u32 = 7106;
pub const STATIC_ALIAS_ON_INSTANCE_PROPERTY: u32 = 7107;
pub const INTRINSIC_INDEXER_ON_INTERFACE: u32 = 7108;
pub const INTRINSIC_PROPERTY_ON_INTERFACE: u32 = 7109;
pub const INTRINSIC_INDEXER_OVERRIDE: u32 = 7110;
pub const INTRINSIC_PROPERTY_OVERRIDE: u32 = 7111;
pub const INTRINSIC_INDEXER_OVERRIDABLE: u32 = 7112;
pub const INTRINSIC_PROPERTY_OVERRIDABLE: u32 = 7113;
pub const INTRINSIC_INDEXER_IMPLEMENTS_INTERFACE: u32 = 7114;
pub const INTRINSIC_PROPERTY_IMPLEMENTS_INTERFACE: u32 = 7115;
pub const INTRINSIC_INDEXER_PARAMETER_COUNT: u32 = 7116;
pub const NATIVE_OPERATOR_ON_NON_OPERATOR: u32 = 7117;
pub const NATIVE_OPERATOR_ON_CONVERSION: u32 = 7118;
pub const SKIP_INVOCATION_ON_INTERFACE: u32 = 7119;
pub const SKIP_INVOCATION_ON_OVERRIDE: u32 = 7120;
pub const SKIP_INVOCATION_ON_OVERRIDABLE: u32 = 7121;
pub const SKIP_INVOCATION_IMPLEMENTS_INTERFACE: u32 = 7122;
pub const SKIP_INVOCATION_STATIC_ARITY: u32 = 7123;
pub const SKIP_INVOCATION_INSTANCE_ARITY: u32 = 7124;
pub const STATIC_ALIAS_ON_INSTANCE_METHOD: u32 = 7125;
pub const INLINE_CODE_ON_INTERFACE: u32 = 7126;
pub const INLINE_CODE_ON_OVERRIDE: u32 = 7127;
pub const INLINE_CODE_ON_OVERRIDABLE: u32 = 7128;
pub const INLINE_CODE_IMPLEMENTS_INTERFACE: u32 = 7129;
/// Args: method, validation errors
pub const INVALID_METHOD_INLINE_CODE: u32 = 7130;
pub const RECEIVER_AS_FIRST_ARGUMENT_ON_INSTANCE: u32 = 7131;
pub const OVERRIDE_RENAMED: u32 = 7132;
pub const OVERRIDE_IGNORES_GENERIC_ARGUMENTS: u32 = 7133;
/// Args: method, conflicting interface member
pub const OVERRIDE_INTERFACE_NAME_MISMATCH: u32 = 7134;
pub const INTERFACE_IMPLEMENTATION_RENAMED: u32 = 7135;
pub const INTERFACE_NAME_DISAGREEMENT: u32 = 7136;
pub const METHOD_EXPAND_PARAMS_WITHOUT_PARAMS: u32 = 7137;
pub const EMPTY_NAME_ON_INTERFACE_METHOD: u32 = 7138;
pub const EMPTY_NAME_ON_OVERRIDABLE_METHOD: u32 = 7139;
pub const EMPTY_NAME_ON_STATIC_METHOD: u32 = 7140;
pub const EMPTY_EVENT_NAME: u32 = 7141;
pub const EMPTY_FIELD_NAME: u32 = 7142;
/// Args: type, parameter
pub const OBJECT_LITERAL_UNKNOWN_MEMBER: u32 = 7143;
/// Args: parameter, parameter type, member type
pub const OBJECT_LITERAL_TYPE_MISMATCH: u32 = 7144;
/// Args: parameter
pub const OBJECT_LITERAL_BY_REFERENCE: u32 = 7145;
/// Args: type
pub const OBJECT_LITERAL_ON_NON_RECORD: u32 = 7146;

/// Args: unusable base type, derived type
pub const UNUSABLE_BASE_TYPE: u32 = 7500;
/// Args: type
pub const DUPLICATE_UNNAMED_CONSTRUCTOR: u32 = 7501;
/// Args: construct description
pub const UNSUPPORTED_CONSTRUCT: u32 = 7502;

/// Message template for a code; `{n}` refers to the n-th argument
pub fn template(code: u32) -> Option<&'static str> {
    let text = match code {
        CONFLICTING_NAMESPACE_MARKERS => "{0} cannot have both an ignore-namespace and an explicit namespace marker",
        INVALID_SCRIPT_NAMESPACE => "the explicit namespace of {0} must be empty or a valid dotted identifier",
        RESOURCES_NOT_STATIC => "the resources type {0} must be static",
        RESOURCES_GENERIC => "the resources type {0} cannot be generic",
        RESOURCES_NON_CONST_MEMBER => "the resources type {0} can only contain const fields",
        INVALID_TYPE_SCRIPT_NAME => "the script name of {0} must be a valid identifier",
        NESTED_TYPE_WITH_NAMESPACE => "the nested type {0} cannot specify a namespace",
        RECORD_NOT_SEALED => "the record type {0} must be sealed",
        RECORD_INVALID_BASE => "the record type {0} must derive directly from the root object type or the root record type",
        RECORD_IMPLEMENTS_INTERFACES => "the record type {0} cannot implement interfaces",
        RECORD_INSTANCE_EVENTS => "the record type {0} cannot declare instance events",
        MIXIN_NOT_STATIC => "the mixin type {0} must be static",
        MIXIN_NON_METHOD_MEMBER => "the mixin type {0} can only contain methods",
        MIXIN_GENERIC => "the mixin type {0} cannot be generic",
        GLOBAL_METHODS_NOT_STATIC => "the global-methods type {0} must be static",
        GLOBAL_METHODS_NON_METHOD_MEMBER => "the global-methods type {0} cannot contain fields, events or properties",
        GLOBAL_METHODS_GENERIC => "the global-methods type {0} cannot be generic",
        DIAMOND_MEMBER_COLLISION => "{0} inherits the member name '{3}' from both {1} and {2}",
        TEST_FIXTURE_RUN_TESTS => "{0}: a test fixture cannot declare a method named 'runTests'",
        INVALID_TEST_METHOD => "the test method {0} must be a public, non-generic, parameterless instance method returning void",
        TEST_AND_ASYNC_TEST => "{0} cannot be both a test and an async test",
        TEST_OUTSIDE_FIXTURE => "the test method {0} must be declared in a test fixture",
        ALTERNATE_SIGNATURE_WITHOUT_MAIN => "{0} is an alternate signature but there is not exactly one main overload",
        INVALID_MEMBER_SCRIPT_NAME => "the script name of {0} must be a valid identifier",
        CONSTRUCTOR_EXPAND_PARAMS_WITHOUT_PARAMS => "the constructor {0} expands its params but has no params array",
        INVALID_CONSTRUCTOR_INLINE_CODE => "invalid inline code for the constructor {0}: {1}",
        EMPTY_INDEXER_NAME => "the indexer {0} cannot have an empty script name",
        EMPTY_PROPERTY_NAME => "the property {0} cannot have an empty script name",
        STATIC_ALIAS_ON_INDEXER => "the indexer {0} cannot have a static alias",
        STATIC_ALIAS_ON_INSTANCE_PROPERTY => "the instance property {0} cannot have a static alias",
        INTRINSIC_INDEXER_ON_INTERFACE => "the interface indexer {0} cannot be intrinsic",
        INTRINSIC_PROPERTY_ON_INTERFACE => "the interface property {0} cannot be intrinsic",
        INTRINSIC_INDEXER_OVERRIDE => "the overriding indexer {0} cannot be intrinsic",
        INTRINSIC_PROPERTY_OVERRIDE => "the overriding property {0} cannot be intrinsic",
        INTRINSIC_INDEXER_OVERRIDABLE => "the overridable indexer {0} cannot be intrinsic",
        INTRINSIC_PROPERTY_OVERRIDABLE => "the overridable property {0} cannot be intrinsic",
        INTRINSIC_INDEXER_IMPLEMENTS_INTERFACE => "the indexer {0} implements an interface member and cannot be intrinsic",
        INTRINSIC_PROPERTY_IMPLEMENTS_INTERFACE => "the property {0} implements an interface member and cannot be intrinsic",
        INTRINSIC_INDEXER_PARAMETER_COUNT => "the intrinsic indexer {0} must have exactly one parameter",
        NATIVE_OPERATOR_ON_NON_OPERATOR => "{0} is not an operator and cannot be native",
        NATIVE_OPERATOR_ON_CONVERSION => "the conversion operator {0} cannot be native",
        SKIP_INVOCATION_ON_INTERFACE => "the interface method {0} cannot skip its invocation",
        SKIP_INVOCATION_ON_OVERRIDE => "the overriding method {0} cannot skip its invocation",
        SKIP_INVOCATION_ON_OVERRIDABLE => "the overridable method {0} cannot skip its invocation",
        SKIP_INVOCATION_IMPLEMENTS_INTERFACE => "{0} implements an interface member and cannot skip its invocation",
        SKIP_INVOCATION_STATIC_ARITY => "the static method {0} must have exactly one parameter to skip its invocation",
        SKIP_INVOCATION_INSTANCE_ARITY => "the instance method {0} must have no parameters to skip its invocation",
        STATIC_ALIAS_ON_INSTANCE_METHOD => "the instance method {0} cannot have a static alias",
        INLINE_CODE_ON_INTERFACE => "the interface method {0} cannot use inline code",
        INLINE_CODE_ON_OVERRIDE => "the overriding method {0} cannot use inline code",
        INLINE_CODE_ON_OVERRIDABLE => "the overridable method {0} cannot use inline code",
        INLINE_CODE_IMPLEMENTS_INTERFACE => "{0} implements an interface member and cannot use inline code",
        INVALID_METHOD_INLINE_CODE => "invalid inline code for the method {0}: {1}",
        RECEIVER_AS_FIRST_ARGUMENT_ON_INSTANCE => "the instance method {0} cannot take its receiver as first argument",
        OVERRIDE_RENAMED => "the overriding member {0} cannot specify a script name",
        OVERRIDE_IGNORES_GENERIC_ARGUMENTS => "the overriding method {0} cannot ignore generic arguments",
        OVERRIDE_INTERFACE_NAME_MISMATCH => "{0} overrides a member whose name differs from the implemented interface member {1}",
        INTERFACE_IMPLEMENTATION_RENAMED => "{0} implements an interface member and cannot specify a script name",
        INTERFACE_NAME_DISAGREEMENT => "{0} implements interface members with different script names",
        METHOD_EXPAND_PARAMS_WITHOUT_PARAMS => "the method {0} expands its params but has no params array",
        EMPTY_NAME_ON_INTERFACE_METHOD => "the interface method {0} cannot have an empty script name",
        EMPTY_NAME_ON_OVERRIDABLE_METHOD => "the overridable method {0} cannot have an empty script name",
        EMPTY_NAME_ON_STATIC_METHOD => "the static method {0} cannot have an empty script name",
        EMPTY_EVENT_NAME => "the event {0} cannot have an empty script name",
        EMPTY_FIELD_NAME => "the field {0} cannot have an empty script name",
        OBJECT_LITERAL_UNKNOWN_MEMBER => "{0} has no property or field matching the constructor parameter '{1}'",
        OBJECT_LITERAL_TYPE_MISMATCH => "the constructor parameter '{0}' has type {1} but the matching member has type {2}",
        OBJECT_LITERAL_BY_REFERENCE => "the object-literal constructor parameter '{0}' cannot be out or ref",
        OBJECT_LITERAL_ON_NON_RECORD => "object-literal constructors are only allowed on record types, not on {0}",
        UNUSABLE_BASE_TYPE => "the type {0} is not usable from script and cannot be a base of {1}",
        DUPLICATE_UNNAMED_CONSTRUCTOR => "{0} has more than one unnamed constructor",
        UNSUPPORTED_CONSTRUCT => "unsupported construct: {0}",
        _ => return None,
    };
    Some(text)
}

/// Render a message text, substituting `{n}` placeholders by arguments
pub fn format_message(code: u32, args: &[String]) -> String {
    let Some(template) = template(code) else {
        return if args.is_empty() {
            format!("message {}", code)
        } else {
            format!("message {}: {}", code, args.join(", "))
        };
    };

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                match after[..end].parse::<usize>() {
                    Ok(index) => out.push_str(args.get(index).map(String::as_str).unwrap_or("")),
                    Err(_) => {
                        out.push('{');
                        out.push_str(&after[..=end]);
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_substitutes_arguments() {
        let args = vec![
            "Ns.C".to_string(),
            "Ns.I1".to_string(),
            "Ns.I2".to_string(),
            "m".to_string(),
        ];
        assert_eq!(
            format_message(DIAMOND_MEMBER_COLLISION, &args),
            "Ns.C inherits the member name 'm' from both Ns.I1 and Ns.I2"
        );
    }

    #[test]
    fn test_unknown_code_falls_back_to_arguments() {
        assert_eq!(format_message(1, &["x".to_string()]), "message 1: x");
    }

    #[test]
    fn test_every_code_in_range_has_template() {
        for code in (7001..=7022).chain(7100..=7146).chain(7500..=7502) {
            assert!(template(code).is_some(), "missing template for {}", code);
        }
    }
}
