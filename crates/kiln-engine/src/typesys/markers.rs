//! Configuration markers
//!
//! Markers are the attribute-like annotations that steer script naming.
//! They form a closed set so the resolution rules can query them by kind
//! instead of inspecting attribute names.

use serde::{Deserialize, Serialize};

/// Arguments of a test marker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestArgs {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub expected_assertion_count: Option<i32>,
}

/// A single configuration marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Marker {
    /// Invocations compile to their sole argument (or receiver)
    SkipInvocation,
    /// Static member invoked through a global alias
    StaticAlias(String),
    /// Invocation replaced by a literal code template
    InlineCode(String),
    /// Static method invoked as an instance method on its first argument
    ReceiverAsFirstArgument,
    /// Not usable from script
    NotUsable,
    IgnoreGenericArguments,
    IgnoreNamespace,
    /// Explicit script namespace (types and assemblies)
    ScriptNamespace(Option<String>),
    /// Overload that shares the name of the main overload and emits no code
    AlternateSignature,
    /// Explicit script name
    ScriptName(Option<String>),
    PreserveName,
    PreserveCase,
    IntrinsicProperty,
    GlobalMethods,
    Imported {
        #[serde(default)]
        is_real_type: bool,
    },
    Record,
    NativeOperator,
    ExpandParams,
    NamedValues,
    Resources,
    Mixin(Option<String>),
    ObjectLiteral,
    TestFixture,
    Test(TestArgs),
    AsyncTest(TestArgs),
}

/// The markers attached to one declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Markers(Vec<Marker>);

impl Markers {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, marker: Marker) {
        self.0.push(marker);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn has(&self, pred: impl Fn(&Marker) -> bool) -> bool {
        self.0.iter().any(pred)
    }

    pub fn skip_invocation(&self) -> bool {
        self.has(|m| matches!(m, Marker::SkipInvocation))
    }

    pub fn static_alias(&self) -> Option<&str> {
        self.0.iter().find_map(|m| match m {
            Marker::StaticAlias(alias) => Some(alias.as_str()),
            _ => None,
        })
    }

    pub fn inline_code(&self) -> Option<&str> {
        self.0.iter().find_map(|m| match m {
            Marker::InlineCode(code) => Some(code.as_str()),
            _ => None,
        })
    }

    pub fn receiver_as_first_argument(&self) -> bool {
        self.has(|m| matches!(m, Marker::ReceiverAsFirstArgument))
    }

    pub fn not_usable(&self) -> bool {
        self.has(|m| matches!(m, Marker::NotUsable))
    }

    pub fn ignore_generic_arguments(&self) -> bool {
        self.has(|m| matches!(m, Marker::IgnoreGenericArguments))
    }

    pub fn ignore_namespace(&self) -> bool {
        self.has(|m| matches!(m, Marker::IgnoreNamespace))
    }

    /// `Some(arg)` when an explicit namespace marker is present
    pub fn script_namespace(&self) -> Option<Option<&str>> {
        self.0.iter().find_map(|m| match m {
            Marker::ScriptNamespace(ns) => Some(ns.as_deref()),
            _ => None,
        })
    }

    pub fn alternate_signature(&self) -> bool {
        self.has(|m| matches!(m, Marker::AlternateSignature))
    }

    /// `Some(arg)` when an explicit name marker is present
    pub fn script_name(&self) -> Option<Option<&str>> {
        self.0.iter().find_map(|m| match m {
            Marker::ScriptName(name) => Some(name.as_deref()),
            _ => None,
        })
    }

    pub fn preserve_name(&self) -> bool {
        self.has(|m| matches!(m, Marker::PreserveName))
    }

    pub fn preserve_case(&self) -> bool {
        self.has(|m| matches!(m, Marker::PreserveCase))
    }

    pub fn intrinsic_property(&self) -> bool {
        self.has(|m| matches!(m, Marker::IntrinsicProperty))
    }

    pub fn global_methods(&self) -> bool {
        self.has(|m| matches!(m, Marker::GlobalMethods))
    }

    /// `Some(is_real_type)` for imported declarations
    pub fn imported(&self) -> Option<bool> {
        self.0.iter().find_map(|m| match m {
            Marker::Imported { is_real_type } => Some(*is_real_type),
            _ => None,
        })
    }

    pub fn record(&self) -> bool {
        self.has(|m| matches!(m, Marker::Record))
    }

    pub fn native_operator(&self) -> bool {
        self.has(|m| matches!(m, Marker::NativeOperator))
    }

    pub fn expand_params(&self) -> bool {
        self.has(|m| matches!(m, Marker::ExpandParams))
    }

    pub fn named_values(&self) -> bool {
        self.has(|m| matches!(m, Marker::NamedValues))
    }

    pub fn resources(&self) -> bool {
        self.has(|m| matches!(m, Marker::Resources))
    }

    pub fn mixin(&self) -> Option<Option<&str>> {
        self.0.iter().find_map(|m| match m {
            Marker::Mixin(arg) => Some(arg.as_deref()),
            _ => None,
        })
    }

    pub fn object_literal(&self) -> bool {
        self.has(|m| matches!(m, Marker::ObjectLiteral))
    }

    pub fn test_fixture(&self) -> bool {
        self.has(|m| matches!(m, Marker::TestFixture))
    }

    pub fn test(&self) -> Option<&TestArgs> {
        self.0.iter().find_map(|m| match m {
            Marker::Test(args) => Some(args),
            _ => None,
        })
    }

    pub fn async_test(&self) -> Option<&TestArgs> {
        self.0.iter().find_map(|m| match m {
            Marker::AsyncTest(args) => Some(args),
            _ => None,
        })
    }
}

impl From<Vec<Marker>> for Markers {
    fn from(markers: Vec<Marker>) -> Self {
        Self(markers)
    }
}

impl FromIterator<Marker> for Markers {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_queries() {
        let markers: Markers = vec![
            Marker::ScriptName(Some("foo".to_string())),
            Marker::Imported { is_real_type: true },
            Marker::Mixin(None),
        ]
        .into();

        assert_eq!(markers.script_name(), Some(Some("foo")));
        assert_eq!(markers.imported(), Some(true));
        assert_eq!(markers.mixin(), Some(None));
        assert_eq!(markers.script_namespace(), None);
        assert!(!markers.not_usable());
    }

    #[test]
    fn test_markers_deserialize_from_json() {
        let markers: Markers =
            serde_json::from_str(r#"["not-usable", {"inline-code": "{this}.x"}]"#).unwrap();
        assert!(markers.not_usable());
        assert_eq!(markers.inline_code(), Some("{this}.x"));
    }
}
