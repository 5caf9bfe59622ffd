use super::{extract_article, find_documents, parse_article, parse_blocks, slugify, split_icon};
use crate::error::InputError;
use crate::formats::markdown::MarkdownFormat;
use crate::section::BodyBlock;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{tempdir, NamedTempFile};

const TOPIC: &str = "# The Expanding Universe

A short lede about the topic.

## 🌌 Introduction

Opening words.

## The Science

Observations since 1929.

### Redshift

Galaxies recede.

## The Verse

> And the heaven We constructed with strength.

## Reflection

Closing thoughts.
";

fn palette() -> Vec<String> {
    vec!["cyan".to_string(), "green".to_string()]
}

#[test]
fn test_sections_follow_level_two_headings() {
    let article = parse_article(
        TOPIC,
        Path::new("universe.md"),
        &MarkdownFormat,
        2,
        &palette(),
    )
    .unwrap();

    assert_eq!(article.title, "The Expanding Universe");
    assert_eq!(article.preamble, "A short lede about the topic.");

    let ids: Vec<&str> = article
        .sections
        .iter()
        .map(|s| s.section.id.as_str())
        .collect();
    assert_eq!(ids, ["introduction", "the-science", "the-verse", "reflection"]);

    let science = &article.sections[1];
    assert!(science.body.starts_with("Observations since 1929."));
    assert!(
        science.body.contains("### Redshift"),
        "deeper headings stay in the body: {}",
        science.body
    );
    assert!(!science.body.contains("The Verse"));
    assert_eq!(article.sections[3].body, "Closing thoughts.");
}

#[test]
fn test_icon_and_palette_become_display_meta() {
    let article = parse_article(
        TOPIC,
        Path::new("universe.md"),
        &MarkdownFormat,
        2,
        &palette(),
    )
    .unwrap();

    let intro = &article.sections[0].section;
    assert_eq!(intro.display_label, "Introduction");
    let meta = intro.display_meta.as_ref().unwrap();
    assert_eq!(meta.icon.as_deref(), Some("🌌"));
    assert_eq!(meta.color.as_deref(), Some("cyan"));

    // Palette cycles by position.
    let verse = article.sections[2].section.display_meta.as_ref().unwrap();
    assert_eq!(verse.icon, None);
    assert_eq!(verse.color.as_deref(), Some("cyan"));
}

#[test]
fn test_no_palette_no_icon_means_no_meta() {
    let article = parse_article(
        "## Plain\n\ntext\n",
        Path::new("plain.md"),
        &MarkdownFormat,
        2,
        &[],
    )
    .unwrap();

    assert_eq!(article.sections[0].section.display_meta, None);
    assert_eq!(article.title, "plain", "falls back to the file stem");
}

#[test]
fn test_repeated_headings_get_unique_ids() {
    let source = "## Notes\n\na\n\n## Notes\n\nb\n\n## Notes\n\nc\n";
    let article =
        parse_article(source, Path::new("notes.md"), &MarkdownFormat, 2, &[]).unwrap();

    let ids: Vec<&str> = article
        .sections
        .iter()
        .map(|s| s.section.id.as_str())
        .collect();
    assert_eq!(ids, ["notes", "notes-1", "notes-2"]);
}

#[test]
fn test_code_fences_are_not_headings() {
    let source = "## Real\n\n```sh\n## not a heading\n```\n\n## Also Real\n\nx\n";
    let article = parse_article(source, Path::new("code.md"), &MarkdownFormat, 2, &[]).unwrap();

    assert_eq!(article.sections.len(), 2);
    assert!(article.sections[0].body.contains("## not a heading"));
}

#[test]
fn test_sections_carry_parsed_blocks() {
    let article = parse_article(TOPIC, Path::new("universe.md"), &MarkdownFormat, 2, &[]).unwrap();

    assert_eq!(
        article.sections[1].blocks,
        [
            BodyBlock::Paragraph("Observations since 1929.".to_string()),
            BodyBlock::Heading("Redshift".to_string()),
            BodyBlock::Paragraph("Galaxies recede.".to_string()),
        ]
    );
    assert_eq!(
        article.sections[2].blocks,
        [BodyBlock::Quote(
            "And the heaven We constructed with strength.".to_string()
        )]
    );
}

#[test]
fn test_blocks_leave_prose_alone() {
    let blocks = parse_blocks(
        "We arrived in\n1999. That year was big.\n\n#science is trending",
        Path::new("prose.md"),
        &MarkdownFormat,
    )
    .unwrap();

    assert_eq!(
        blocks,
        [
            BodyBlock::Paragraph("We arrived in 1999. That year was big.".to_string()),
            BodyBlock::Paragraph("#science is trending".to_string()),
        ]
    );
}

#[test]
fn test_block_structure() {
    let source = "> quoted\n> across lines\n\n1. one\n2. two\n\n- bullet\n\n***\n\nTitle\n=====\n\n```\nlet x = 1;\n```";
    let blocks = parse_blocks(source, Path::new("mixed.md"), &MarkdownFormat).unwrap();

    assert_eq!(
        blocks,
        [
            BodyBlock::Quote("quoted across lines".to_string()),
            BodyBlock::ListItem {
                marker: "1.".to_string(),
                text: "one".to_string()
            },
            BodyBlock::ListItem {
                marker: "2.".to_string(),
                text: "two".to_string()
            },
            BodyBlock::ListItem {
                marker: "•".to_string(),
                text: "bullet".to_string()
            },
            BodyBlock::Rule,
            BodyBlock::Heading("Title".to_string()),
            BodyBlock::Code("let x = 1;".to_string()),
        ]
    );
}

#[test]
fn test_missing_section_level_is_an_error() {
    let result = parse_article(
        "# Title only\n\nNo sections here.\n",
        Path::new("bare.md"),
        &MarkdownFormat,
        2,
        &[],
    );

    assert!(matches!(
        result,
        Err(InputError::NoSections { level: 2, .. })
    ));
}

#[test]
fn test_extract_article_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{TOPIC}").unwrap();

    let article = extract_article(file.path(), &MarkdownFormat, 2, &palette()).unwrap();

    assert_eq!(article.sections.len(), 4);
    assert_eq!(article.path, file.path());
    assert_eq!(article.sections[0].source_line, 4);
}

#[test]
fn test_find_documents_filters_and_sorts() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.md"), "## B\n").unwrap();
    fs::write(dir.path().join("a.md"), "## A\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("c.md"), "## C\n").unwrap();
    fs::create_dir(dir.path().join(".hidden")).unwrap();
    fs::write(dir.path().join(".hidden").join("d.md"), "## D\n").unwrap();

    let docs = find_documents(vec![dir.path().to_path_buf()], &["md".to_string()]).unwrap();

    let names: Vec<String> = docs
        .iter()
        .map(|p| {
            p.strip_prefix(dir.path())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(names, ["a.md", "b.md", "nested/c.md"]);
}

#[test]
fn test_find_documents_missing_path() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.md");

    assert!(find_documents(vec![missing], &["md".to_string()]).is_err());
}

#[test]
fn test_slugify() {
    assert_eq!(slugify("The Science"), "the-science");
    assert_eq!(slugify("  Qur'an: 51:47 "), "qur-an-51-47");
    assert_eq!(slugify("!!!"), "section");
}

#[test]
fn test_split_icon() {
    assert_eq!(
        split_icon("📖 The Verse"),
        (Some("📖".to_string()), "The Verse".to_string())
    );
    assert_eq!(split_icon("1 Introduction"), (None, "1 Introduction".to_string()));
    assert_eq!(split_icon("✨"), (None, "✨".to_string()));
}
