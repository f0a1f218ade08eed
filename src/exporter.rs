use crate::error::ExportError;
use crate::field::FieldSpec;
use crate::EnvSchema;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

// default values
const DEF_HEADER_TEXT: &str = "# Default configuration";
const DEF_ENVIRONMENT_TAG_NAME: &str = "envconfig";
const DEF_DEFAULT_VALUE_TAG_NAME: &str = "default";
const DEF_DESCRIPTION_TAG_NAME: &str = "desc";
const DEF_FILE_NAME: &str = ".env";
const DEF_EXCLUDED_FIELDS: &[&str] = &["RWMutex"];

/// One item of the rendered configuration: a nested-group heading, a free
/// text comment, or a `NAME=value` variable definition.
///
/// For each qualifying field the walker emits its comment immediately
/// followed by its variable definition; for each nested sub-record it emits
/// a group marker immediately followed by the sub-record's own items.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CfgItem {
    /// Entry into a nested sub-record, labelled with its dotted path
    Group { label: String },
    /// Free text describing the variable that follows
    Comment { text: String },
    /// An environment variable and its default value
    Variable { name: String, value: String },
}

/// Renders a configuration schema into a documented env file.
///
/// An `Exporter` is configured once through its `with_*` methods and may then
/// be reused for any number of sequential exports.
#[derive(Debug, Clone)]
pub struct Exporter {
    header_text: String,
    environment_tag_name: String,
    default_value_tag_name: String,
    description_tag_name: String,
    file_name: PathBuf,
    excluded_fields: Vec<String>,
    extra_entries: HashMap<String, String>,
    extra_tags: Vec<String>,
}

impl Exporter {
    pub fn new() -> Self {
        Self {
            header_text: DEF_HEADER_TEXT.to_string(),
            environment_tag_name: DEF_ENVIRONMENT_TAG_NAME.to_string(),
            default_value_tag_name: DEF_DEFAULT_VALUE_TAG_NAME.to_string(),
            description_tag_name: DEF_DESCRIPTION_TAG_NAME.to_string(),
            file_name: PathBuf::from(DEF_FILE_NAME),
            excluded_fields: DEF_EXCLUDED_FIELDS.iter().map(|s| s.to_string()).collect(),
            extra_entries: HashMap::new(),
            extra_tags: Vec::new(),
        }
    }

    /// Sets the tag key that names the exported environment variable.
    /// An empty string keeps the default (`envconfig`).
    pub fn with_environment_tag_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.environment_tag_name = name;
        }
        self
    }

    /// Sets the tag key that carries the default value.
    /// An empty string keeps the default (`default`).
    pub fn with_default_value_tag_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.default_value_tag_name = name;
        }
        self
    }

    /// Sets the tag key that carries the human description.
    /// An empty string keeps the default (`desc`).
    pub fn with_description_tag_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.description_tag_name = name;
        }
        self
    }

    /// Sets the target path for file export, relative or absolute.
    /// The file is created or truncated. An empty path keeps the default
    /// (`.env`).
    pub fn with_file_name(mut self, name: impl Into<PathBuf>) -> Self {
        let name = name.into();
        if !name.as_os_str().is_empty() {
            self.file_name = name;
        }
        self
    }

    /// Adds field names to the exclusion set. Matching is case-insensitive
    /// and excluding a nested field skips its whole subtree.
    pub fn with_excluded_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Replaces the header text written at the top of the output.
    /// An empty string disables the header entirely.
    pub fn with_header_text(mut self, text: impl Into<String>) -> Self {
        self.header_text = text.into();
        self
    }

    /// Adds a static `key=value` entry emitted before the main body.
    pub fn with_extra_entry(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.extra_entries.insert(key.into(), value.to_string());
        self
    }

    /// Registers an additional tag key whose value, when present, is appended
    /// to the field's comment as `Tag: <key> -> <value>`.
    pub fn with_extra_tag(mut self, key: impl Into<String>) -> Self {
        self.extra_tags.push(key.into());
        self
    }

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    /// Serializes the schema of `T` into env-file bytes.
    pub fn export<T: EnvSchema>(&self) -> Vec<u8> {
        self.export_fields(T::fields())
    }

    /// Serializes a hand-registered descriptor table into env-file bytes.
    pub fn export_fields(&self, fields: &[FieldSpec]) -> Vec<u8> {
        let mut out = String::new();

        if !self.header_text.is_empty() {
            out.push_str(&self.header_text);
            out.push_str("\n\n");
        }

        if !self.extra_entries.is_empty() {
            out.push_str("# Extra pre-declared entries\n");
            for (key, value) in &self.extra_entries {
                out.push_str(key);
                out.push('=');
                out.push_str(value);
                out.push('\n');
            }
            out.push('\n');
        }

        for item in self.walk(fields, "") {
            match item {
                CfgItem::Group { label } => {
                    out.push_str("\n#");
                    out.push_str(&format_comment(&label));
                    out.push_str("\n\n");
                }
                CfgItem::Comment { text } => {
                    out.push_str(&format_comment(&text));
                    out.push('\n');
                }
                CfgItem::Variable { name, value } => {
                    // values are written unquoted, even when they contain
                    // spaces, to match the reference output format
                    out.push_str(&name);
                    out.push('=');
                    out.push_str(&value);
                    out.push('\n');
                }
            }
        }

        out.into_bytes()
    }

    /// Exports the schema of `T` to the configured file path.
    pub fn to_file<T: EnvSchema>(&self) -> Result<(), ExportError> {
        self.to_file_fields(T::fields())
    }

    /// Exports a hand-registered descriptor table to the configured file
    /// path. The file is created or truncated, written in one pass, and
    /// flushed to durable storage.
    pub fn to_file_fields(&self, fields: &[FieldSpec]) -> Result<(), ExportError> {
        let data = self.export_fields(fields);

        let mut file = File::create(&self.file_name).map_err(|source| ExportError::Create {
            path: self.file_name.clone(),
            source,
        })?;

        file.write_all(&data).map_err(|source| ExportError::Write {
            path: self.file_name.clone(),
            source,
        })?;

        file.sync_all().map_err(|source| ExportError::Sync {
            path: self.file_name.clone(),
            source,
        })?;

        Ok(())
    }

    /// Walks a descriptor table in declaration order and produces the ordered
    /// item sequence, prefixing nested group labels with `prefix`.
    pub fn walk(&self, fields: &[FieldSpec], prefix: &str) -> Vec<CfgItem> {
        let mut items = Vec::new();

        for field in fields {
            if self.is_excluded(field.name) {
                continue;
            }

            if let Some(schema) = field.schema {
                let label = format!("{prefix}{}", field.name);
                let child_prefix = format!("{label}.");
                items.push(CfgItem::Group { label });
                items.extend(self.walk(schema(), &child_prefix));
                continue;
            }

            let tag = field.tag();
            let name = tag.get(&self.environment_tag_name);
            if name.is_empty() {
                // untagged fields are silently left out of the export
                continue;
            }

            // variable description [field_name (type) description]
            let mut text = format!("{} ({})", field.name, field.type_name);
            let desc = tag.get(&self.description_tag_name);
            if !desc.is_empty() {
                text.push(' ');
                text.push_str(&desc);
            }
            for key in &self.extra_tags {
                let value = tag.get(key);
                if !value.is_empty() {
                    text.push_str("\nTag: ");
                    text.push_str(key);
                    text.push_str(" -> ");
                    text.push_str(&value);
                }
            }
            items.push(CfgItem::Comment { text });

            // variable definition [variable=default_value]
            items.push(CfgItem::Variable {
                name,
                value: tag.get(&self.default_value_tag_name),
            });
        }

        items
    }

    fn is_excluded(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.excluded_fields
            .iter()
            .any(|excluded| excluded.to_lowercase() == name)
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

static TAB_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\t+").unwrap());
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Collapses tab and space runs, then turns every logical line into a
/// `#`-prefixed comment line.
fn format_comment(s: &str) -> String {
    let s = TAB_RUNS.replace_all(s, " ");
    let s = SPACE_RUNS.replace_all(&s, " ");
    format!("# {}", s.replace('\n', "\n#"))
}
