use pdfxml::config::OutputFormat;
use pdfxml::conversion::{ConversionStatus, ConversionStore, InMemoryStore};
use pdfxml::pipeline::{self, PipelineOptions};
use pdfxml::{
    assemble, assemble_extracted, to_xml, to_xml_with_layout, Document, DocumentMetadata,
    ExtractedPdf, MetadataInput, Page, PayloadExtractor, Section, TextExtractor, XmlLayout,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Document structure as recovered by an independent XML reader
#[derive(Debug, Default, PartialEq)]
struct ParsedDocument {
    metadata: Vec<(String, String)>,
    pages: Vec<(usize, Vec<Section>)>,
}

fn attribute(e: &BytesStart, name: &str) -> String {
    e.try_get_attribute(name)
        .unwrap()
        .unwrap_or_else(|| panic!("missing attribute {}", name))
        .unescape_value()
        .unwrap()
        .into_owned()
}

fn parse_xml(xml: &str) -> ParsedDocument {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut doc = ParsedDocument::default();
    let mut text = String::new();
    let mut items: Vec<String> = Vec::new();
    let mut level = 0;

    loop {
        match reader.read_event().expect("well-formed XML") {
            Event::Start(e) => {
                text.clear();
                match e.name().as_ref() {
                    b"page" => doc.pages.push((attribute(&e, "number").parse().unwrap(), vec![])),
                    b"header" => level = attribute(&e, "level").parse().unwrap(),
                    b"list" => items.clear(),
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if e.name().as_ref() == b"page" {
                    doc.pages.push((attribute(&e, "number").parse().unwrap(), vec![]));
                }
            }
            Event::Text(t) => text.push_str(&t.unescape().unwrap()),
            Event::End(e) => {
                let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                let sections = doc.pages.last_mut().map(|(_, s)| s);
                match (name.as_str(), sections) {
                    ("title" | "author" | "creationDate" | "pageCount", _) => {
                        doc.metadata.push((name.clone(), text.clone()))
                    }
                    ("header", Some(sections)) => sections.push(Section::Header {
                        text: text.clone(),
                        level,
                    }),
                    ("paragraph", Some(sections)) => sections.push(Section::paragraph(text.clone())),
                    ("item", _) => items.push(text.clone()),
                    ("list", Some(sections)) => sections.push(Section::List {
                        items: std::mem::take(&mut items),
                    }),
                    _ => {}
                }
                text.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    doc
}

fn parsed_pages(doc: &Document) -> Vec<(usize, Vec<Section>)> {
    doc.pages
        .iter()
        .map(|p| (p.number, p.sections.clone()))
        .collect()
}

#[test]
fn test_end_to_end_single_page() {
    let text = "INTRODUCTION\nThis is a paragraph.\n- point one\n- point two\nAnother paragraph.";
    let doc = assemble(text, 1, &MetadataInput::default()).unwrap();
    let parsed = parse_xml(&to_xml(&doc).unwrap());

    assert_eq!(
        parsed.pages,
        vec![(
            1,
            vec![
                Section::header("INTRODUCTION"),
                Section::paragraph("This is a paragraph."),
                Section::list(["point one", "point two"]),
                Section::paragraph("Another paragraph."),
            ]
        )]
    );
}

#[test]
fn test_round_trip_preserves_special_characters() {
    let doc = Document {
        metadata: DocumentMetadata::resolve(
            &MetadataInput {
                title: Some("Profit & Loss <draft>".to_string()),
                author: Some("O'Brien \"Jr\"".to_string()),
                creation_date: None,
            },
            2,
        ),
        pages: vec![
            Page {
                number: 1,
                sections: vec![
                    Section::header("R&D <OVERVIEW>"),
                    Section::paragraph("if a < b && b > c then \"maybe\""),
                    Section::list(["x > y", "A&B", "<tag/>", "line\rbreak"]),
                ],
            },
            Page {
                number: 2,
                sections: vec![Section::paragraph("&amp; is already escaped text")],
            },
        ],
    };

    for layout in [XmlLayout::Compact, XmlLayout::Indented] {
        let parsed = parse_xml(&to_xml_with_layout(&doc, layout).unwrap());
        assert_eq!(parsed.pages, parsed_pages(&doc));
        assert_eq!(parsed.metadata[0].1, "Profit & Loss <draft>");
        assert_eq!(parsed.metadata[1].1, "O'Brien \"Jr\"");
    }
}

#[test]
fn test_metadata_fallback_in_xml() {
    let extracted = PayloadExtractor::default()
        .extract(&fixture("no-metadata.json"))
        .unwrap();
    let doc = assemble_extracted(&extracted).unwrap();
    let parsed = parse_xml(&to_xml(&doc).unwrap());

    assert_eq!(
        parsed.metadata,
        vec![
            ("title".to_string(), "Untitled Document".to_string()),
            ("author".to_string(), "Unknown Author".to_string()),
            ("creationDate".to_string(), String::new()),
            ("pageCount".to_string(), "3".to_string()),
        ]
    );
}

#[test]
fn test_empty_document_has_all_pages() {
    let doc = assemble("", 3, &MetadataInput::default()).unwrap();
    let xml = to_xml(&doc).unwrap();

    for number in 1..=3 {
        assert!(xml.contains(&format!("<page number=\"{}\"></page>", number)));
    }
    let parsed = parse_xml(&xml);
    assert_eq!(parsed.pages, vec![(1, vec![]), (2, vec![]), (3, vec![])]);
}

#[test]
fn test_fixture_sections_per_page() {
    let extracted = PayloadExtractor::default()
        .extract(&fixture("quarterly-report.json"))
        .unwrap();
    let doc = assemble_extracted(&extracted).unwrap();

    assert_eq!(doc.metadata.title, "Q3 Report");
    assert_eq!(doc.metadata.author, "Finance Team");
    assert_eq!(doc.metadata.creation_date, "D:20240930120000Z");
    assert_eq!(
        parsed_pages(&doc),
        vec![
            (
                1,
                vec![
                    Section::header("QUARTERLY REPORT"),
                    Section::paragraph(
                        "Revenue grew in every region. Margins held steady despite higher input costs."
                    ),
                    Section::header("HIGHLIGHTS"),
                    Section::list(["New plant opened in Leeds", "R&D spend up 12%"]),
                ]
            ),
            (
                2,
                vec![
                    Section::list(["Headcount < 500"]),
                    Section::header("OUTLOOK"),
                    Section::paragraph("We expect growth to continue."),
                    Section::list(["Expand the sales team", "Ship the new product line"]),
                    Section::paragraph("Questions go to investor relations."),
                ]
            ),
        ]
    );

    let parsed = parse_xml(&to_xml(&doc).unwrap());
    assert_eq!(parsed.pages, parsed_pages(&doc));
}

#[test]
fn test_pipeline_writes_xml_and_tracks_records() {
    let out = tempfile::tempdir().unwrap();
    let store = InMemoryStore::new();
    let options = PipelineOptions {
        format: OutputFormat::Xml,
        layout: XmlLayout::Compact,
        output_dir: Some(out.path().to_path_buf()),
    };

    let inputs = pipeline::discover_inputs(&[fixture("")]).unwrap();
    assert_eq!(inputs.len(), 2);

    let outcomes = pipeline::run(&inputs, &store, &PayloadExtractor::default(), &options).unwrap();
    assert!(outcomes
        .iter()
        .all(|o| o.status == ConversionStatus::Completed && o.error.is_none()));

    let xml = std::fs::read_to_string(out.path().join("quarterly-report.xml")).unwrap();
    let parsed = parse_xml(&xml);
    assert_eq!(parsed.pages.len(), 2);
    assert_eq!(parsed.metadata[0].1, "Q3 Report");

    for record in store.list().unwrap() {
        assert_eq!(record.status, ConversionStatus::Completed);
        assert!(record.xml_content.is_some());
    }
}

#[test]
fn test_pipeline_writes_json() {
    let out = tempfile::tempdir().unwrap();
    let options = PipelineOptions {
        format: OutputFormat::Json,
        layout: XmlLayout::Compact,
        output_dir: Some(out.path().to_path_buf()),
    };

    let outcomes = pipeline::run(
        &[fixture("quarterly-report.json")],
        &InMemoryStore::new(),
        &PayloadExtractor::default(),
        &options,
    )
    .unwrap();
    assert_eq!(outcomes[0].output, Some(out.path().join("quarterly-report.json")));

    let json = std::fs::read_to_string(out.path().join("quarterly-report.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["metadata"]["author"], "Finance Team");
    assert_eq!(value["pages"][1]["sections"][1]["type"], "header");
}

#[test]
fn test_negative_page_count_is_rejected() {
    let extracted = ExtractedPdf::new("TEXT", -2, MetadataInput::default());
    let err = assemble_extracted(&extracted).unwrap_err();
    assert!(matches!(err, pdfxml::ConversionError::InvalidInput(_)));
}
