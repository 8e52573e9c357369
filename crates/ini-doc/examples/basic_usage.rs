//! Basic usage example for ini-doc

use ini_doc::{IniDocument, MergeStrategy, PersistStrategy};

fn main() -> ini_doc::Result<()> {
    let source = r#"; application settings
[App]
Name="demo"
; seconds
Timeout=30
Debug

[Paths]
data="C:\data"
"#;

    let mut doc = IniDocument::parse_str(source);
    println!("Sections: {:?}", doc.sections());
    println!("Timeout: {:?}", doc.get_value("app", "timeout"));
    println!("Debug set: {}", doc.has_setting("APP", "debug"));

    // Defaults fill gaps without being copied into the document
    let defaults = IniDocument::parse_str("[App]\nTimeout=\"10\"\nRetries=\"3\"\n");
    doc.merge(defaults.into_shared(), MergeStrategy::AddIfMissing);
    println!("Retries (from defaults): {:?}", doc.get_value("app", "retries"));

    doc.section_mut("App")
        .insert("Motto", Some(r#"say "hi""#))
        .set_comment("Motto", Some(" quoted and escaped"));

    println!("\nLocal only:\n{}", doc.render(PersistStrategy::ExcludeMerged));
    println!("With defaults:\n{doc}");

    let out = std::env::temp_dir().join("ini-doc-basic-usage.ini");
    doc.persist_to(&out)?;
    println!("Written to {}", out.display());

    Ok(())
}
