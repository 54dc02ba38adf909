//! Integration tests for in-place rewriting: tabulate, replace, backups.

mod common;

use common::{datasheet_body, entry_names, p, read_entry, write_docx};
use kitdoc::extract::{compile_rules, default_rules, replace_text, tabulate_section};
use kitdoc::{
    create_backup, parse_file, save, ExtractOptions, Kitdoc, SectionSpec, TabulateOutcome,
    WriteOptions,
};

#[test]
fn test_tabulate_and_save_with_backup() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_docx(dir.path(), "EK0410.docx", &datasheet_body());
    let original = std::fs::read(&path).unwrap();

    let mut doc = parse_file(&path).unwrap();
    let outcome = tabulate_section(
        &mut doc,
        &SectionSpec::reagents_provided(),
        &ExtractOptions::default(),
    );
    assert_eq!(
        outcome,
        TabulateOutcome::Converted {
            position: 6,
            rows: 2,
            columns: 3
        }
    );

    let backup = save(&doc, &path, &WriteOptions::new().with_backup("tabulate"))
        .unwrap()
        .unwrap();
    assert_eq!(backup, dir.path().join("EK0410_before_tabulate.docx"));
    assert_eq!(std::fs::read(&backup).unwrap(), original);

    let reread = parse_file(&path).unwrap();
    assert_eq!(reread.block_count(), 13);
    let table = reread.blocks[6].as_table().unwrap();
    assert_eq!(
        table.rows_text(),
        vec![vec!["Item A", "1", "Box"], vec!["Item B", "2", "Vial"]]
    );
    assert_eq!(reread.blocks[7].plain_text(), "STORAGE");

    // Converted cells carry Calibri 11pt run formatting
    let written = std::fs::read(&path).unwrap();
    let main = String::from_utf8(read_entry(&written, "word/document.xml")).unwrap();
    assert!(main.contains(r#"<w:rFonts w:ascii="Calibri" w:hAnsi="Calibri"/><w:sz w:val="22"/>"#));
    assert_eq!(entry_names(&written), entry_names(&original));
}

#[test]
fn test_tabulate_twice_is_no_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_docx(dir.path(), "kit.docx", &datasheet_body());

    let mut doc = parse_file(&path).unwrap();
    let spec = SectionSpec::reagents_provided();
    let options = ExtractOptions::default();
    assert!(matches!(
        tabulate_section(&mut doc, &spec, &options),
        TabulateOutcome::Converted { .. }
    ));
    assert_eq!(tabulate_section(&mut doc, &spec, &options), TabulateOutcome::NoRows);
}

#[test]
fn test_default_rules_rebrand_runs_and_links() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_docx(dir.path(), "kit.docx", &datasheet_body());

    let mut doc = parse_file(&path).unwrap();
    let rules = compile_rules(&default_rules()).unwrap();
    let stats = replace_text(&mut doc, &rules);

    assert_eq!(stats.changed[0].1, 1);
    assert_eq!(stats.changed[1].1, 1);
    save(&doc, &path, &WriteOptions::default()).unwrap();

    let reread = parse_file(&path).unwrap();
    assert_eq!(reread.blocks[0].plain_text(), "Human IL-6  ELISA Kit");
    assert_eq!(
        reread.blocks[2].plain_text(),
        "Visit Innovative Research, Inc. for protocols."
    );
    // Package metadata is copied, not rewritten
    assert_eq!(
        reread.metadata.title.as_deref(),
        Some("Human IL-6 PicoKine® ELISA Kit")
    );
    assert!(!dir.path().join("kit_before_replace.docx").exists());
}

#[test]
fn test_rebrand_keeps_content_controls_and_bookmarks() {
    let dir = tempfile::tempdir().unwrap();
    let body = [
        r#"<w:sdt><w:sdtPr><w:docPartObj><w:docPartGallery w:val="Table of Contents"/></w:docPartObj></w:sdtPr><w:sdtContent><w:p><w:r><w:t>Contents of the Boster kit</w:t></w:r></w:p></w:sdtContent></w:sdt>"#.to_string(),
        r#"<w:bookmarkStart w:id="0" w:name="_Toc1"/>"#.to_string(),
        r#"<w:p><w:r><w:t>Human IL</w:t><w:noBreakHyphen/><w:t>6 ELISA Kit by Boster</w:t></w:r></w:p>"#.to_string(),
        r#"<w:bookmarkEnd w:id="0"/>"#.to_string(),
        p("REAGENTS PROVIDED"),
        p("Plate | 1 | Box"),
    ]
    .concat();
    let path = write_docx(dir.path(), "kit.docx", &body);

    let mut doc = parse_file(&path).unwrap();
    assert_eq!(doc.block_count(), 6);
    let rules = compile_rules(&default_rules()).unwrap();
    let stats = replace_text(&mut doc, &rules);
    assert_eq!(stats.changed[0].1, 1);
    tabulate_section(
        &mut doc,
        &SectionSpec::reagents_provided(),
        &ExtractOptions::default(),
    );
    save(&doc, &path, &WriteOptions::default()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let main = String::from_utf8(read_entry(&bytes, "word/document.xml")).unwrap();
    // Content controls are carried verbatim, replacement does not reach inside
    assert!(main.contains("Contents of the Boster kit"));
    assert!(main.contains("Table of Contents"));
    assert!(main.contains(r#"<w:bookmarkStart w:id="0" w:name="_Toc1"/>"#));
    assert!(main.contains(r#"<w:bookmarkEnd w:id="0"/>"#));
    assert!(main.contains("<w:noBreakHyphen/>"));

    let reread = parse_file(&path).unwrap();
    assert_eq!(reread.block_count(), 6);
    assert!(reread.blocks[0].is_opaque());
    assert_eq!(
        reread.blocks[2].plain_text(),
        "Human IL\u{2011}6 ELISA Kit by Innovative Research, Inc."
    );
    assert!(reread.blocks[5].is_table());
}

#[test]
fn test_builder_save_in_place_backs_up() {
    let dir = tempfile::tempdir().unwrap();
    let body = [p("Boster ELISA"), p("REAGENTS PROVIDED"), p("Plate | 1")].concat();
    let path = write_docx(dir.path(), "kit.docx", &body);

    let mut kit = Kitdoc::new().with_backups(true).parse(&path).unwrap();
    kit.replace(&compile_rules(&default_rules()).unwrap());
    let backup = kit.save_in_place().unwrap().unwrap();

    assert_eq!(backup, dir.path().join("kit_before_replace.docx"));
    assert_eq!(parse_file(&backup).unwrap().blocks[0].plain_text(), "Boster ELISA");
    assert_eq!(
        parse_file(&path).unwrap().blocks[0].plain_text(),
        "Innovative Research, Inc. ELISA"
    );
}

#[test]
fn test_create_backup_copies_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_docx(dir.path(), "kit.docx", &p("text"));

    let backup = create_backup(&path, "manual").unwrap();
    assert_eq!(backup, dir.path().join("kit_before_manual.docx"));
    assert_eq!(std::fs::read(&backup).unwrap(), std::fs::read(&path).unwrap());
}
