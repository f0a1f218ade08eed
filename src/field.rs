use crate::tag::TagStr;

/// A static descriptor for one declared field of a configuration schema.
///
/// Descriptors stand in for runtime introspection: each schema type registers
/// its fields, in declaration order, as a `&'static [FieldSpec]` table —
/// usually generated by `#[derive(EnvSchema)]`, but hand-written tables work
/// the same way.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Declared field name, as spelled in the schema
    pub name: &'static str,
    /// Declared type label, e.g. `String`, `i8`, `Vec<String>`, `Duration`
    pub type_name: &'static str,
    /// Raw metadata tag in `key:"value"` grammar; empty for untagged fields
    pub tag: &'static str,
    /// Accessor for the sub-schema when this field is a nested record
    pub schema: Option<fn() -> &'static [FieldSpec]>,
}

impl FieldSpec {
    /// A scalar-like leaf field carrying a raw metadata tag.
    pub const fn leaf(name: &'static str, type_name: &'static str, tag: &'static str) -> Self {
        Self {
            name,
            type_name,
            tag,
            schema: None,
        }
    }

    /// A nested sub-record field delegating to another schema table.
    pub const fn nested(
        name: &'static str,
        type_name: &'static str,
        schema: fn() -> &'static [FieldSpec],
    ) -> Self {
        Self {
            name,
            type_name,
            tag: "",
            schema: Some(schema),
        }
    }

    pub fn is_nested(&self) -> bool {
        self.schema.is_some()
    }

    /// The field's metadata tag, ready for lookups.
    pub fn tag(&self) -> TagStr<'static> {
        TagStr::new(self.tag)
    }
}
