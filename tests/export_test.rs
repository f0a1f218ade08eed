use envdoc::{EnvSchema, Exporter, FieldSpec};
use std::time::Duration;

#[allow(dead_code)]
#[derive(EnvSchema)]
pub struct Excluded {
    #[field(env = "ERROR", default = "ERROR")]
    pub foo: i64,

    #[field(env = "ERROR", default = "ERROR")]
    pub bar: i64,
}

#[allow(dead_code)]
#[derive(EnvSchema)]
pub struct NestedTwo {
    #[field(env = "NESTED_NESTED2_FOO", default = "1,2,3,4,5,6,7,8,9,0", desc = "Simple dummy value for testing")]
    pub foo: Vec<i64>,

    #[field(env = "NESTED_NESTED2_BAR", default = "10s", desc = "Simple dummy value for testing")]
    pub bar: Duration,
}

#[allow(dead_code)]
#[derive(EnvSchema)]
pub struct Nested {
    #[field(env = "NESTED_FOO", default = "98", desc = "Simple dummy value for testing")]
    pub foo: i8,

    #[field(env = "NESTED_BAR", default = "one,two,three", desc = "Simple dummy value for testing")]
    pub bar: Vec<String>,

    #[field(nested)]
    pub nested_two: NestedTwo,
}

#[allow(dead_code)]
#[derive(EnvSchema)]
pub struct DeepNested3 {
    #[field(env = "DEEP_NESTED_FOO", default = "foo")]
    pub foo: String,

    #[field(env = "DEEP_NESTED_BAR", default = "bar")]
    pub bar: String,
}

#[allow(dead_code)]
#[derive(EnvSchema)]
pub struct DeepNested2 {
    #[field(nested)]
    pub deep_nested3: DeepNested3,
}

#[allow(dead_code)]
#[derive(EnvSchema)]
pub struct DeepNested {
    #[field(nested)]
    pub deep_nested2: DeepNested2,
}

#[allow(dead_code)]
#[derive(EnvSchema)]
pub struct TestConfig {
    #[field(
        env = "A",
        default = "def_value_of_a",
        desc = "Just a dummy value for purpose of this test\n and should not be used as real example, this text is \n just here for placeholder ... testing testing"
    )]
    pub a: String,

    #[field(env = "B", default = "def_value_of_b")]
    pub b: String,

    #[field(env = "C", default = "def_value_of_c", validate = "oneof=one two three")]
    pub c: String,

    #[field(nested)]
    pub test_excluded: Excluded,

    #[field(nested)]
    pub nested: Nested,

    #[field(nested)]
    pub deep_nested: DeepNested,
}

fn test_exporter() -> Exporter {
    Exporter::new()
        .with_environment_tag_name("env")
        .with_header_text("# Test Header")
        .with_excluded_fields(["TEST_EXCLUDED"])
        .with_extra_entry("COMPOSE_PROJECT_NAME", "envdoc")
        .with_extra_tag("validate")
}

#[test]
fn test_export_full_config() {
    let out = String::from_utf8(test_exporter().export::<TestConfig>()).unwrap();

    let expected = concat!(
        "# Test Header\n",
        "\n",
        "# Extra pre-declared entries\n",
        "COMPOSE_PROJECT_NAME=envdoc\n",
        "\n",
        "# a (String) Just a dummy value for purpose of this test\n",
        "# and should not be used as real example, this text is \n",
        "# just here for placeholder ... testing testing\n",
        "A=def_value_of_a\n",
        "# b (String)\n",
        "B=def_value_of_b\n",
        "# c (String)\n",
        "#Tag: validate -> oneof=one two three\n",
        "C=def_value_of_c\n",
        "\n",
        "## nested\n",
        "\n",
        "# foo (i8) Simple dummy value for testing\n",
        "NESTED_FOO=98\n",
        "# bar (Vec<String>) Simple dummy value for testing\n",
        "NESTED_BAR=one,two,three\n",
        "\n",
        "## nested.nested_two\n",
        "\n",
        "# foo (Vec<i64>) Simple dummy value for testing\n",
        "NESTED_NESTED2_FOO=1,2,3,4,5,6,7,8,9,0\n",
        "# bar (Duration) Simple dummy value for testing\n",
        "NESTED_NESTED2_BAR=10s\n",
        "\n",
        "## deep_nested\n",
        "\n",
        "\n",
        "## deep_nested.deep_nested2\n",
        "\n",
        "\n",
        "## deep_nested.deep_nested2.deep_nested3\n",
        "\n",
        "# foo (String)\n",
        "DEEP_NESTED_FOO=foo\n",
        "# bar (String)\n",
        "DEEP_NESTED_BAR=bar\n",
    );
    assert_eq!(out, expected);
}

#[allow(dead_code)]
#[derive(EnvSchema)]
pub struct EmptyConfig {}

#[test]
fn test_export_empty_config() {
    let exporter = Exporter::new()
        .with_environment_tag_name("env")
        .with_header_text("# Loriem ipsum dolor sit amet.")
        .with_excluded_fields(["TestExcluded"])
        .with_extra_entry("COMPOSE_PROJECT_NAME", "envdoc")
        .with_extra_tag("validate");
    let out = String::from_utf8(exporter.export::<EmptyConfig>()).unwrap();

    assert_eq!(
        out,
        "# Loriem ipsum dolor sit amet.\n\n# Extra pre-declared entries\nCOMPOSE_PROJECT_NAME=envdoc\n\n"
    );
}

#[allow(dead_code)]
#[derive(EnvSchema)]
pub struct NoQualifying {
    pub plain: String,
}

#[test]
fn test_export_without_qualifying_fields_or_header_is_empty() {
    let exporter = Exporter::new()
        .with_environment_tag_name("env")
        .with_header_text("");

    assert!(exporter.export::<NoQualifying>().is_empty());
}

#[allow(dead_code)]
#[derive(EnvSchema)]
pub struct SimpleConfig {
    #[field(env = "A", default = "a")]
    pub a: String,
}

#[test]
fn test_export_single_field() {
    let exporter = Exporter::new()
        .with_environment_tag_name("env")
        .with_header_text("# H");
    let out = String::from_utf8(exporter.export::<SimpleConfig>()).unwrap();

    assert_eq!(out, "# H\n\n# a (String)\nA=a\n");
}

#[allow(dead_code)]
#[derive(EnvSchema)]
pub struct NestedFirstInner {
    #[field(env = "NestedFirst_A", default = "def_value_of_a")]
    pub a: String,

    #[field(env = "NestedFirst_B", default = "def_value_of_b")]
    pub b: String,
}

#[allow(dead_code)]
#[derive(EnvSchema)]
pub struct NestedFirstConfig {
    #[field(nested)]
    pub nested_first: NestedFirstInner,

    #[field(env = "A", default = "def_value_of_a")]
    pub a: String,
}

#[test]
fn test_export_nested_group_before_scalars() {
    let exporter = Exporter::new()
        .with_environment_tag_name("env")
        .with_header_text("");
    let out = String::from_utf8(exporter.export::<NestedFirstConfig>()).unwrap();

    let expected = concat!(
        "\n",
        "## nested_first\n",
        "\n",
        "# a (String)\n",
        "NestedFirst_A=def_value_of_a\n",
        "# b (String)\n",
        "NestedFirst_B=def_value_of_b\n",
        "# a (String)\n",
        "A=def_value_of_a\n",
    );
    assert_eq!(out, expected);
}

/// A hand-registered schema whose tag is formatted across physical lines,
/// the way annotated source tends to be indented.
struct HandRegistered;

impl EnvSchema for HandRegistered {
    fn fields() -> &'static [FieldSpec] {
        const FIELDS: &[FieldSpec] = &[FieldSpec::leaf(
            "A",
            "String",
            "env:\"A\" default:\"def_value_of_a\"\n\t\t\tdesc:\"Just a dummy value for purpose of this test\n\t\t\tand should not be used as real example\"",
        )];
        FIELDS
    }
}

#[test]
fn test_export_hand_registered_multiline_tag() {
    let exporter = Exporter::new()
        .with_environment_tag_name("env")
        .with_header_text("");
    let out = String::from_utf8(exporter.export::<HandRegistered>()).unwrap();

    let expected = concat!(
        "# A (String) Just a dummy value for purpose of this test\n",
        "# and should not be used as real example\n",
        "A=def_value_of_a\n",
    );
    assert_eq!(out, expected);
}

#[test]
fn test_to_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env.test");
    let exporter = Exporter::new()
        .with_environment_tag_name("env")
        .with_header_text("# H")
        .with_file_name(&path);

    exporter.to_file::<SimpleConfig>().unwrap();

    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, exporter.export::<SimpleConfig>());
}

#[test]
fn test_to_file_truncates_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env.test");
    std::fs::write(&path, "stale contents that are much longer than the export").unwrap();

    let exporter = Exporter::new()
        .with_environment_tag_name("env")
        .with_header_text("# H")
        .with_file_name(&path);
    exporter.to_file::<SimpleConfig>().unwrap();

    let written = String::from_utf8(std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(written, "# H\n\n# a (String)\nA=a\n");
}

#[test]
fn test_to_file_reports_create_failure() {
    let exporter = Exporter::new()
        .with_environment_tag_name("env")
        .with_file_name("/nonexistent-dir/.env");

    let err = exporter.to_file::<SimpleConfig>().unwrap_err();

    assert!(matches!(err, envdoc::ExportError::Create { .. }));
    assert!(!err.is_durability_failure());
}
