//! Conditional resolution engine for multi-mode "connect to your project"
//! wizards.
//!
//! A declarative [`Schema`] lists modes, the fields each mode shows, and a
//! tree of instructional steps whose presence and content depend on the
//! current selections. Given a flat [`State`], this crate answers which fields
//! are visible, which options they offer, and which steps to render:
//!
//! ```text
//! parse(yaml) → Schema → validate(schema) → ValidationResult
//!                      → serialize(schema) → yaml
//!
//! Session::new(&schema) → update_field / set_mode → State
//!                       → active_fields()  → Vec<ResolvedField>
//!                       → resolved_steps() → Vec<ResolvedStep>
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use connect_wizard::Session;
//!
//! let yaml = r#"
//! modes:
//!   - id: direct
//!     label: Direct
//!     fields: [connectionMethod, useSharedPooler]
//! fields:
//!   connectionMethod:
//!     id: connectionMethod
//!     label: Method
//!     type: radio-list
//!     options:
//!       - { value: direct, label: Direct }
//!       - { value: transaction, label: Transaction pooler }
//!     defaultValue: direct
//!   useSharedPooler:
//!     id: useSharedPooler
//!     label: Shared pooler
//!     type: switch
//!     dependsOn:
//!       connectionMethod: [transaction]
//! steps:
//!   - id: connection
//!     title: Connect
//!     content: steps/direct-connection
//! "#;
//!
//! let schema = connect_wizard::load(yaml).expect("valid schema").schema;
//! let mut session = Session::new(&schema);
//! assert_eq!(session.active_fields().len(), 1);
//!
//! session.update_field("connectionMethod", "transaction");
//! assert_eq!(session.active_fields().len(), 2);
//! assert_eq!(session.resolved_steps()[0].content, "steps/direct-connection");
//! ```
//!
//! # Feature Flags
//!
//! | Feature   | Default | Description |
//! |-----------|---------|-------------|
//! | `builtin` | yes     | The bundled connect sheet: [`builtin::connect_schema`], its option sources, and the install command table. |

pub mod catalog;
pub mod conditional;
pub mod enums;
pub mod error;
pub mod fields;
pub mod lifecycle;
pub mod parse;
pub mod primitives;
pub mod serialize;
pub mod steps;
pub mod types;
pub mod validate;

#[cfg(feature = "builtin")]
pub mod builtin;

pub use enums::FieldType;
pub use error::*;
pub use types::*;

// Re-export entry-point functions at the crate root for convenience.
pub use conditional::{CANONICAL_KEY_ORDER, resolve_conditional};
pub use fields::{NoOptionSource, OptionSource, get_active_fields, get_field_options};
pub use lifecycle::{Session, get_default_state, reset_dependent_fields};
pub use parse::parse;
pub use serialize::serialize;
pub use steps::{flatten_steps, resolve_steps};
pub use validate::validate;

/// Result of the [`load`] convenience entry point.
#[derive(Debug)]
pub struct LoadResult {
    /// The validated schema.
    pub schema: Schema,
    /// Non-fatal warnings produced during validation.
    pub warnings: Vec<Diagnostic>,
}

/// Convenience entry point composing parse → validate.
///
/// Returns the schema and any warnings on success, or every error (parse or
/// validation) on failure.
///
/// # Errors
///
/// Returns `Err(Vec<WizardError>)` if parsing fails or validation finds errors.
pub fn load(input: &str) -> Result<LoadResult, Vec<WizardError>> {
    let schema = parse::parse(input).map_err(|e| vec![WizardError::Parse(e)])?;

    let result = validate::validate(&schema);
    if !result.errors.is_empty() {
        tracing::debug!(errors = result.errors.len(), "schema failed validation");
        return Err(result
            .errors
            .into_iter()
            .map(WizardError::Validation)
            .collect());
    }

    tracing::debug!(
        modes = schema.modes.len(),
        fields = schema.fields.len(),
        warnings = result.warnings.len(),
        "schema loaded"
    );
    Ok(LoadResult {
        schema,
        warnings: result.warnings,
    })
}
