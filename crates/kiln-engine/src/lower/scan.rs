//! Unsupported-construct pre-scan
//!
//! Runs over every unit before lowering starts. Any finding aborts the
//! compilation: no types are emitted.

use super::syntax::{CompilationUnit, Declaration};
use crate::diagnostic::{codes, Diagnostics};
use crate::typesys::Location;

/// A construct the lowering pass cannot handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedConstruct {
    pub description: String,
    pub location: Location,
}

/// Looks for constructs that must stop the compilation
pub trait ConstructScanner {
    fn scan(&mut self, unit: &CompilationUnit) -> Vec<UnsupportedConstruct>;
}

/// Accepts everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllScanner;

impl ConstructScanner for AcceptAllScanner {
    fn scan(&mut self, _unit: &CompilationUnit) -> Vec<UnsupportedConstruct> {
        Vec::new()
    }
}

/// Rejects the declarations the front end marked as unsupported
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkedConstructScanner;

impl ConstructScanner for MarkedConstructScanner {
    fn scan(&mut self, unit: &CompilationUnit) -> Vec<UnsupportedConstruct> {
        unit.walk()
            .into_iter()
            .filter_map(|decl| match decl {
                Declaration::Unsupported { description, location } => Some(UnsupportedConstruct {
                    description: description.clone(),
                    location: location.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

/// Scan all units, reporting each finding as 7502.
///
/// Returns `true` when lowering may proceed.
pub fn scan_units(scanner: &mut dyn ConstructScanner, units: &[CompilationUnit], diagnostics: &mut Diagnostics) -> bool {
    let mut clean = true;
    for unit in units {
        for finding in scanner.scan(unit) {
            tracing::debug!(file = %unit.file, construct = %finding.description, "unsupported construct");
            diagnostics.message(codes::UNSUPPORTED_CONSTRUCT, &finding.location, vec![finding.description]);
            clean = false;
        }
    }
    clean
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::syntax::{Symbol, TypeDeclaration};

    fn unit_with_unsupported() -> CompilationUnit {
        let mut unit = CompilationUnit::new("a.cs");
        unit.declarations.push(Declaration::Type(TypeDeclaration {
            name: "C".to_string(),
            symbol: Symbol::Unresolved,
            location: Location::default(),
            members: vec![Declaration::Unsupported {
                description: "goto case".to_string(),
                location: Location::new("a.cs", 4, 9),
            }],
        }));
        unit
    }

    #[test]
    fn test_accept_all_scanner() {
        let mut diags = Diagnostics::new();
        assert!(scan_units(&mut AcceptAllScanner, &[unit_with_unsupported()], &mut diags));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_marked_scanner_reports_nested_findings() {
        let mut diags = Diagnostics::new();
        let units = [unit_with_unsupported(), CompilationUnit::new("b.cs")];
        assert!(!scan_units(&mut MarkedConstructScanner, &units, &mut diags));
        assert_eq!(diags.codes(), vec![codes::UNSUPPORTED_CONSTRUCT]);
        let message = diags.messages().next().unwrap();
        assert_eq!(message.location, Location::new("a.cs", 4, 9));
        assert_eq!(message.args, vec!["goto case".to_string()]);
    }
}
