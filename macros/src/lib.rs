use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitStr, Meta, Token, Visibility, parse_macro_input};

/// Derives `envdoc::EnvSchema`, generating the static field descriptor table
/// for a configuration struct.
///
/// Metadata is attached per field with `#[field(...)]`:
///
/// - `#[field(env = "PORT", default = "8080", desc = "Server port")]` —
///   every `key = "value"` pair is carried into the field's raw metadata tag,
///   in source order, as `key:"value"`. Keys are arbitrary, so extra tags
///   registered on the exporter (for example `validate`) work the same way.
/// - `#[field(nested)]` — the field is a nested sub-schema; its type must
///   implement `EnvSchema` itself.
/// - fields without a `#[field]` attribute, and fields without `pub`
///   visibility, never appear in the export.
#[proc_macro_derive(EnvSchema, attributes(field))]
pub fn derive_env_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_schema(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_schema(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "EnvSchema only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "EnvSchema only supports structs",
            ));
        }
    };

    let mut specs = Vec::new();

    for field in fields {
        // Fields without external visibility are never introspected
        if !matches!(field.vis, Visibility::Public(_)) {
            continue;
        }

        let field_name = field.ident.as_ref().unwrap().to_string();
        let field_type = &field.ty;
        let type_name = quote!(#field_type).to_string().replace(' ', "");

        let config = parse_field_attr(field)?;

        if config.nested {
            specs.push(quote! {
                ::envdoc::FieldSpec::nested(
                    #field_name,
                    #type_name,
                    <#field_type as ::envdoc::EnvSchema>::fields,
                )
            });
        } else {
            let tag = assemble_tag(&config.pairs);
            specs.push(quote! {
                ::envdoc::FieldSpec::leaf(#field_name, #type_name, #tag)
            });
        }
    }

    Ok(quote! {
        impl ::envdoc::EnvSchema for #struct_name {
            fn fields() -> &'static [::envdoc::FieldSpec] {
                const FIELDS: &[::envdoc::FieldSpec] = &[
                    #(#specs),*
                ];
                FIELDS
            }
        }
    })
}

struct FieldConfig {
    nested: bool,
    pairs: Vec<(String, String)>,
}

/// Parse #[field(nested)] or #[field(key = "value", ...)] syntax
fn parse_field_attr(field: &Field) -> syn::Result<FieldConfig> {
    let mut config = FieldConfig {
        nested: false,
        pairs: Vec::new(),
    };

    let Some(attr) = field.attrs.iter().find(|attr| attr.path().is_ident("field")) else {
        return Ok(config);
    };

    let Meta::List(list) = &attr.meta else {
        return Err(syn::Error::new_spanned(
            attr,
            "field attribute must be a list: #[field(...)]",
        ));
    };

    list.parse_nested_meta(|meta| {
        let key = meta
            .path
            .get_ident()
            .ok_or_else(|| meta.error("expected identifier"))?
            .to_string();

        if meta.input.peek(Token![=]) {
            meta.input.parse::<Token![=]>()?;
            let value: LitStr = meta.input.parse()?;
            config.pairs.push((key, value.value()));
        } else if key == "nested" {
            config.nested = true;
        } else {
            return Err(meta.error("expected `nested` or `key = \"value\"`"));
        }

        Ok(())
    })?;

    if config.nested && !config.pairs.is_empty() {
        return Err(syn::Error::new_spanned(
            attr,
            "`nested` cannot be combined with metadata pairs",
        ));
    }

    Ok(config)
}

/// Assembles attribute pairs into a raw `key:"value"` tag string. Quotes and
/// backslashes are escaped; embedded newlines stay raw, which is exactly what
/// the multi-line tag grammar expects.
fn assemble_tag(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            format!("{key}:\"{escaped}\"")
        })
        .collect::<Vec<_>>()
        .join(" ")
}
