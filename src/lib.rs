pub mod error;
pub mod exporter;
pub mod field;
pub mod tag;

// Re-export main types
pub use error::ExportError;
pub use exporter::{CfgItem, Exporter};
pub use field::FieldSpec;
pub use tag::TagStr;

// Re-export macro
pub use envdoc_macros::EnvSchema;

/// Trait for configuration types that expose a static field descriptor table
///
/// Usually implemented with `#[derive(EnvSchema)]`; hand-written
/// implementations are equally valid and useful for tests.
pub trait EnvSchema {
    /// The type's declared fields, in declaration order
    fn fields() -> &'static [FieldSpec];
}
