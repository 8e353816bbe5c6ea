//! Kiln Engine
//!
//! Semantic lowering for a C#-to-JavaScript compiler:
//! - **Declarations**: the resolved declaration model handed over by the
//!   front end (`typesys` module)
//! - **Naming**: script names and calling shapes for every declaration
//!   (`naming` module, producing `semantics`)
//! - **Lowering**: class skeletons, initializers and constructors in the JS
//!   model (`lower` and `jsmodel` modules)
//! - **Diagnostics**: numbered messages and internal errors (`diagnostic`)
//!
//! # Example
//!
//! ```rust,ignore
//! use kiln_engine::{Compiler, CompilerOptions};
//!
//! let mut compiler = Compiler::new(CompilerOptions::default());
//! let output = compiler.compile(&type_system, &units, &mut body_compiler)?;
//! for ty in &output.types {
//!     println!("{}", ty.pretty_print());
//! }
//! ```

#![warn(rust_2018_idioms)]

// ============================================================================
// Core Modules
// ============================================================================

/// Declaration model: types, members, markers
pub mod typesys;

/// Script semantics produced by naming
pub mod semantics;

/// Naming engine
pub mod naming;

/// JS model emitted by lowering
pub mod jsmodel;

/// Declaration lowering pass
pub mod lower;

/// Diagnostic stream and rendering
pub mod diagnostic;

/// kiln.toml configuration
pub mod config;

/// Engine error types
pub mod error;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{CompilerOptions, ConfigError, KilnConfig};
pub use diagnostic::{Diagnostics, Report, Severity};
pub use error::{CompileError, LowerError, NamingError, TypeSystemError};
pub use jsmodel::{JsClass, JsEnum, JsType, PrettyPrint};
pub use lower::{
    AcceptAllScanner, BodyContext, CompilationUnit, ConstructScanner, DeclarationLowerer, MarkedConstructScanner,
    MethodBodyCompiler,
};
pub use naming::NamingEngine;
pub use typesys::{TypeSystem, TypeSystemBuilder};

// ============================================================================
// Compiler
// ============================================================================

/// Result of one compilation
#[derive(Debug)]
pub struct CompileOutput {
    /// Classes in first-use order, then enums
    pub types: Vec<JsType>,
    pub diagnostics: Diagnostics,
}

impl CompileOutput {
    pub fn find_class(&self, name: &str) -> Option<&JsClass> {
        self.types.iter().filter_map(JsType::as_class).find(|c| c.name() == name)
    }

    pub fn find_enum(&self, name: &str) -> Option<&JsEnum> {
        self.types.iter().filter_map(JsType::as_enum).find(|e| e.name == name)
    }

    /// Whether the emitted types can be trusted downstream
    pub fn is_clean(&self) -> bool {
        !self.diagnostics.has_errors()
    }
}

/// Runs naming, the unsupported-construct pre-scan and lowering
pub struct Compiler {
    options: CompilerOptions,
    scanner: Box<dyn ConstructScanner>,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            options,
            scanner: Box::new(AcceptAllScanner),
        }
    }

    pub fn with_scanner(mut self, scanner: impl ConstructScanner + 'static) -> Self {
        self.scanner = Box::new(scanner);
        self
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile `units` against `ts`.
    ///
    /// Fails when the declarations are structurally broken (dangling ids,
    /// nesting cycles) or the configured main assembly cannot be found. A
    /// failed pre-scan yields an output with no types.
    pub fn compile(
        &mut self,
        ts: &TypeSystem,
        units: &[CompilationUnit],
        body_compiler: &mut dyn MethodBodyCompiler,
    ) -> Result<CompileOutput, CompileError> {
        ts.validate()?;
        for unit in units {
            unit.validate(ts)?;
        }
        let main_assembly = self.options.resolve_main_assembly(ts)?;
        let mut diagnostics = Diagnostics::new();

        let mut naming = NamingEngine::new(ts, self.options.minimize_names);
        naming.prepare(main_assembly, &mut diagnostics);

        if !self.options.allow_unsupported_constructs
            && !lower::scan_units(self.scanner.as_mut(), units, &mut diagnostics)
        {
            tracing::debug!("unsupported constructs found, no output");
            return Ok(CompileOutput {
                types: Vec::new(),
                diagnostics,
            });
        }

        let types = DeclarationLowerer::new(&naming, body_compiler, main_assembly).lower(units, &mut diagnostics);
        Ok(CompileOutput { types, diagnostics })
    }
}
