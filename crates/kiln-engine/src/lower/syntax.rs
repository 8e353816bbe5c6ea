//! Resolved declaration syntax
//!
//! The front end hands the lowering pass one `CompilationUnit` per source
//! file. Every declaration carries the symbol it resolved to; bodies and
//! initializers stay opaque `SourceCode` for the method-body compiler.

use crate::error::TypeSystemError;
use crate::typesys::{Location, MemberRef, TypeId, TypeSystem};
use serde::{Deserialize, Serialize};

/// What a declaration resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    Type(TypeId),
    Member(MemberRef),
    Unresolved,
}

/// Opaque body or initializer text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCode {
    pub text: String,
    #[serde(default)]
    pub location: Location,
}

impl SourceCode {
    pub fn new(text: impl Into<String>, location: Location) -> Self {
        Self {
            text: text.into(),
            location,
        }
    }
}

/// One accessor as written; no body means `get;` / `set;`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessorSyntax {
    #[serde(default)]
    pub body: Option<SourceCode>,
}

impl AccessorSyntax {
    pub fn auto() -> Self {
        Self { body: None }
    }

    pub fn with_body(body: SourceCode) -> Self {
        Self { body: Some(body) }
    }
}

/// One declarator of a field or field-like event declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSyntax {
    pub name: String,
    pub symbol: Symbol,
    #[serde(default)]
    pub initializer: Option<SourceCode>,
    #[serde(default)]
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub name: String,
    pub symbol: Symbol,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub members: Vec<Declaration>,
}

/// Method, operator or constructor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    pub name: String,
    pub symbol: Symbol,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub body: Option<SourceCode>,
}

/// Property or indexer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDeclaration {
    pub name: String,
    pub symbol: Symbol,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub getter: Option<AccessorSyntax>,
    #[serde(default)]
    pub setter: Option<AccessorSyntax>,
    #[serde(default)]
    pub initializer: Option<SourceCode>,
}

impl PropertyDeclaration {
    /// No accessor has a body
    pub fn is_auto(&self) -> bool {
        self.getter.iter().chain(&self.setter).all(|a| a.body.is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariablesDeclaration {
    #[serde(default)]
    pub location: Location,
    pub variables: Vec<VariableSyntax>,
}

/// Event with explicit add/remove accessors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomEventDeclaration {
    pub name: String,
    pub symbol: Symbol,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub adder: Option<AccessorSyntax>,
    #[serde(default)]
    pub remover: Option<AccessorSyntax>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Declaration {
    Type(TypeDeclaration),
    Method(MethodDeclaration),
    Operator(MethodDeclaration),
    Constructor(MethodDeclaration),
    Property(PropertyDeclaration),
    Indexer(PropertyDeclaration),
    Field(VariablesDeclaration),
    Event(VariablesDeclaration),
    CustomEvent(CustomEventDeclaration),
    /// A construct the front end could represent but not lower
    Unsupported {
        description: String,
        #[serde(default)]
        location: Location,
    },
}

impl Declaration {
    pub fn location(&self) -> &Location {
        match self {
            Declaration::Type(d) => &d.location,
            Declaration::Method(d) | Declaration::Operator(d) | Declaration::Constructor(d) => &d.location,
            Declaration::Property(d) | Declaration::Indexer(d) => &d.location,
            Declaration::Field(d) | Declaration::Event(d) => &d.location,
            Declaration::CustomEvent(d) => &d.location,
            Declaration::Unsupported { location, .. } => location,
        }
    }

    /// Name used in internal-error reports
    pub fn display_name(&self) -> String {
        match self {
            Declaration::Type(d) => d.name.clone(),
            Declaration::Method(d) | Declaration::Operator(d) | Declaration::Constructor(d) => d.name.clone(),
            Declaration::Property(d) | Declaration::Indexer(d) => d.name.clone(),
            Declaration::Field(d) | Declaration::Event(d) => d
                .variables
                .iter()
                .map(|v| v.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            Declaration::CustomEvent(d) => d.name.clone(),
            Declaration::Unsupported { description, .. } => description.clone(),
        }
    }
}

/// Declarations of one source file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub file: String,
    /// Preprocessor symbols defined for this file
    #[serde(default)]
    pub defined_symbols: Vec<String>,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl CompilationUnit {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    /// Every declaration, nested type members included, depth-first
    pub fn walk(&self) -> Vec<&Declaration> {
        fn visit<'a>(decl: &'a Declaration, out: &mut Vec<&'a Declaration>) {
            out.push(decl);
            if let Declaration::Type(t) = decl {
                for member in &t.members {
                    visit(member, out);
                }
            }
        }
        let mut out = Vec::new();
        for decl in &self.declarations {
            visit(decl, &mut out);
        }
        out
    }

    /// Check that every resolved symbol exists in `ts`
    pub fn validate(&self, ts: &TypeSystem) -> Result<(), TypeSystemError> {
        for decl in self.walk() {
            let symbols: Vec<Symbol> = match decl {
                Declaration::Type(d) => vec![d.symbol],
                Declaration::Method(d) | Declaration::Operator(d) | Declaration::Constructor(d) => vec![d.symbol],
                Declaration::Property(d) | Declaration::Indexer(d) => vec![d.symbol],
                Declaration::Field(d) | Declaration::Event(d) => d.variables.iter().map(|v| v.symbol).collect(),
                Declaration::CustomEvent(d) => vec![d.symbol],
                Declaration::Unsupported { .. } => Vec::new(),
            };
            let owner = || format!("Declaration '{}' in {}", decl.display_name(), self.file);
            for symbol in symbols {
                match symbol {
                    Symbol::Type(id) => ts.check_type(id.0, &owner)?,
                    Symbol::Member(member) => ts.check_member(member, &owner)?,
                    Symbol::Unresolved => {}
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typesys::TypeId;

    #[test]
    fn test_walk_is_depth_first() {
        let method = Declaration::Method(MethodDeclaration {
            name: "m".to_string(),
            symbol: Symbol::Unresolved,
            location: Location::default(),
            body: None,
        });
        let inner = Declaration::Type(TypeDeclaration {
            name: "Inner".to_string(),
            symbol: Symbol::Type(TypeId(1)),
            location: Location::default(),
            members: vec![method],
        });
        let outer = Declaration::Type(TypeDeclaration {
            name: "Outer".to_string(),
            symbol: Symbol::Type(TypeId(0)),
            location: Location::default(),
            members: vec![inner],
        });
        let mut unit = CompilationUnit::new("a.cs");
        unit.declarations.push(outer);
        unit.declarations.push(Declaration::Unsupported {
            description: "goto".to_string(),
            location: Location::default(),
        });

        let names: Vec<String> = unit.walk().iter().map(|d| d.display_name()).collect();
        assert_eq!(names, vec!["Outer", "Inner", "m", "goto"]);
    }

    #[test]
    fn test_auto_property_detection() {
        let mut prop = PropertyDeclaration {
            name: "P".to_string(),
            symbol: Symbol::Unresolved,
            location: Location::default(),
            getter: Some(AccessorSyntax::auto()),
            setter: Some(AccessorSyntax::auto()),
            initializer: None,
        };
        assert!(prop.is_auto());

        prop.getter = Some(AccessorSyntax::with_body(SourceCode::new("return 1;", Location::default())));
        assert!(!prop.is_auto());
    }

    #[test]
    fn test_deserializes_tagged_declarations() {
        let json = r#"{
            "file": "a.cs",
            "declarations": [
                { "kind": "field", "variables": [
                    { "name": "x", "symbol": { "Member": { "Field": 0 } }, "initializer": { "text": "0" } }
                ] }
            ]
        }"#;
        let unit: CompilationUnit = serde_json::from_str(json).unwrap();
        match &unit.declarations[0] {
            Declaration::Field(d) => {
                assert_eq!(d.variables[0].name, "x");
                assert_eq!(d.variables[0].initializer.as_ref().map(|i| i.text.as_str()), Some("0"));
            }
            other => panic!("expected field, got {:?}", other),
        }
    }
}
