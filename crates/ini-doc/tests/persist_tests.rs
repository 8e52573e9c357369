//! Tests for rendering and writing documents

use ini_doc::{Error, IniDocument, IniOptions, MergeStrategy, PersistStrategy};
use ini_test_utils::fixture::IniFixture;
use pretty_assertions::assert_eq;

const SAMPLE: &str = r#"
[Network]
; where to connect
Host = localhost
Port="8080"
Verbose

; global
name="demo"
"#;

#[test]
fn test_render_layout() {
    let doc = IniDocument::parse_str(
        ";top note\nname=\"demo\"\n;about net\n[Network]\n; host\nHost=localhost\nVerbose\n[Empty]\n",
    );

    insta::assert_snapshot!(doc.render(PersistStrategy::ExcludeMerged).trim_end(), @r#"
    ;top note
    name="demo"
    -----
    ;about net
    [Network]
    ; host
    Host="localhost"
    Verbose
    -----
    [Empty]
    -----
    "#);
}

#[test]
fn test_anonymous_section_is_written_first() {
    let mut doc = IniDocument::new();
    doc.set_value("Later", "k", Some("v"));
    doc.set_value("", "top", Some("1"));

    assert_eq!(
        doc.render(PersistStrategy::ExcludeMerged),
        "top=\"1\"\n-----\n[Later]\nk=\"v\"\n-----\n"
    );
}

#[test]
fn test_empty_anonymous_section_is_not_written() {
    let mut doc = IniDocument::new();
    doc.add_section("", &[]);
    doc.set_value("s", "k", Some("v"));

    assert_eq!(
        doc.render(PersistStrategy::ExcludeMerged),
        "[s]\nk=\"v\"\n-----\n"
    );
}

#[test]
fn test_terminator_can_be_disabled() {
    let options = IniOptions::default().with_section_terminator(None);
    let mut doc = IniDocument::with_options(options);
    doc.parse("[a]\nx=1\n[b]\ny=2\n");

    assert_eq!(
        doc.render(PersistStrategy::ExcludeMerged),
        "[a]\nx=\"1\"\n[b]\ny=\"2\"\n"
    );
}

#[test]
fn test_custom_terminator_is_written_and_skipped() {
    let options = IniOptions::default().with_section_terminator(Some("#end"));
    let mut doc = IniDocument::with_options(options.clone());
    doc.parse("[a]\nx=1\n#end\n");
    let rendered = doc.render(PersistStrategy::ExcludeMerged);
    assert_eq!(rendered, "[a]\nx=\"1\"\n#end\n");

    let mut reparsed = IniDocument::with_options(options);
    reparsed.parse(&rendered);
    assert_eq!(reparsed.keys("a"), ["x"]);
}

#[test]
fn test_custom_comment_delimiter_round_trips() {
    let options = IniOptions::default().with_comment_delimiter('#');
    let mut doc = IniDocument::with_options(options.clone());
    doc.parse("# about\n[s]\nk=v # inline\n");
    let rendered = doc.render(PersistStrategy::ExcludeMerged);
    assert_eq!(rendered, "# about\n[s]\n#inline\nk=\"v\"\n-----\n");

    let mut reparsed = IniDocument::with_options(options);
    reparsed.parse(&rendered);
    assert_eq!(reparsed.key_comment("s", "k").as_deref(), Some("inline"));
    assert_eq!(reparsed.section_comment("s").as_deref(), Some(" about"));
}

#[test]
fn test_escaped_quote_is_written_escaped() {
    let doc = IniDocument::parse_str("[s]\nkey=\"a\\\"b\"\n");
    assert_eq!(doc.get_value("s", "key").as_deref(), Some("a\"b"));

    let rendered = doc.render(PersistStrategy::ExcludeMerged);
    assert!(rendered.contains(r#"key="a\"b""#), "{rendered}");
}

#[test]
fn test_unknown_escape_is_written_verbatim() {
    let doc = IniDocument::parse_str(r#"[s]
key="a\qb"
path="C:\temp"
"#);
    let rendered = doc.render(PersistStrategy::ExcludeMerged);
    assert!(rendered.contains(r#"key="a\qb""#), "{rendered}");
    assert!(rendered.contains(r#"path="C:\temp""#), "{rendered}");
}

#[test]
fn test_set_value_with_quotes_survives_round_trip() {
    let mut doc = IniDocument::new();
    doc.set_value("s", "quote", Some(r#"say "hi""#));
    doc.set_value("s", "slash", Some(r"ends\"));
    doc.set_value("s", "semi", Some("a;b"));

    let rendered = doc.render(PersistStrategy::ExcludeMerged);
    assert_eq!(
        rendered,
        "[s]\nquote=\"say \\\"hi\\\"\"\nslash=\"ends\\\\\"\nsemi=\"a;b\"\n-----\n"
    );

    let reparsed = IniDocument::parse_str(&rendered);
    assert!(reparsed.semantic_eq(&doc));
}

#[test]
fn test_trailing_comments_are_dropped() {
    let doc = IniDocument::parse_str("[s]\nk=\"v\"\n; nothing follows\n");
    assert_eq!(doc.render(PersistStrategy::ExcludeMerged), "[s]\nk=\"v\"\n-----\n");
}

#[test]
fn test_render_round_trip_is_stable() {
    let doc = IniDocument::parse_str(SAMPLE);
    let first = doc.render(PersistStrategy::ExcludeMerged);
    let second = IniDocument::parse_str(&first).render(PersistStrategy::ExcludeMerged);

    assert_eq!(first, second);
}

#[test]
fn test_merged_entries_only_in_include_merged() {
    let mut doc = IniDocument::parse_str("[s]\nlocal=\"1\"\n");
    let defaults = IniDocument::parse_str("[s]\nshared=\"2\"\n[extra]\nx=\"3\"\n");
    doc.merge(defaults.into_shared(), MergeStrategy::AddIfMissing);

    assert_eq!(
        doc.render(PersistStrategy::ExcludeMerged),
        "[s]\nlocal=\"1\"\n-----\n"
    );
    assert_eq!(
        doc.render(PersistStrategy::IncludeMerged),
        "[s]\nlocal=\"1\"\nshared=\"2\"\n-----\n[extra]\nx=\"3\"\n-----\n"
    );
    assert_eq!(doc.to_string(), doc.render(PersistStrategy::IncludeMerged));
}

#[test]
fn test_include_merged_writes_resolved_values() {
    let mut doc = IniDocument::new();
    doc.merge(
        IniDocument::parse_str("[s]\nk=\"low\"\n").into_shared(),
        MergeStrategy::AddIfMissing,
    );
    doc.merge(
        IniDocument::parse_str("[s]\nk=\"high\"\n").into_shared(),
        MergeStrategy::Override,
    );

    assert_eq!(
        doc.render(PersistStrategy::IncludeMerged),
        "[s]\nk=\"high\"\n-----\n"
    );
}

#[test]
fn test_normalize_folds_names() {
    let doc = IniDocument::parse_str("[Main]\nKey=\"v\"\nFlag\n");
    assert_eq!(
        doc.normalize(PersistStrategy::ExcludeMerged),
        serde_json::json!({ "main": { "key": "v", "flag": null } })
    );
}

#[test]
fn test_persist_without_path_fails() {
    let doc = IniDocument::parse_str(SAMPLE);
    let err = doc.persist().unwrap_err();
    assert!(matches!(err, Error::NoDestination));
}

#[test]
fn test_persist_writes_back_to_loaded_path() {
    let _ = ini_test_utils::logging::init();
    let fixture = IniFixture::new();
    let path = fixture.write("app.ini", SAMPLE);

    let mut doc = IniDocument::from_path(&path).unwrap();
    doc.set_value("Network", "Port", Some("9090"));
    doc.persist().unwrap();

    fixture.assert_file_contains("app.ini", "Port=\"9090\"");
    let reloaded = IniDocument::from_path(&path).unwrap();
    assert!(reloaded.semantic_eq(&doc));
}

#[test]
fn test_persist_to_creates_folders() {
    let fixture = IniFixture::new();
    let mut doc = IniDocument::new();
    doc.set_value("s", "k", Some("v"));

    doc.persist_to(fixture.path("nested/deeper/out.ini")).unwrap();
    assert_eq!(fixture.read("nested/deeper/out.ini"), "[s]\nk=\"v\"\n-----\n");
    assert_eq!(doc.path(), None);
}

#[test]
fn test_persist_with_include_merged_flattens_layers() {
    let fixture = IniFixture::new();
    let main = fixture.write("main.ini", "[s]\nlocal=\"1\"\n");
    let defaults = fixture.write("defaults.ini", "[s]\nshared=\"2\"\n");

    let mut doc = IniDocument::from_path(&main).unwrap();
    doc.merge_path(&defaults, MergeStrategy::AddIfMissing).unwrap();
    doc.persist_with(PersistStrategy::IncludeMerged).unwrap();

    let flattened = IniDocument::from_path(&main).unwrap();
    assert_eq!(flattened.keys("s"), ["local", "shared"]);
    assert_eq!(fixture.read("defaults.ini"), "[s]\nshared=\"2\"\n");
}

#[test]
fn test_write_to_stream() {
    let doc = IniDocument::parse_str("[s]\nk=v\n");
    let mut out = Vec::new();
    doc.write_to(&mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "[s]\nk=\"v\"\n-----\n");
}
