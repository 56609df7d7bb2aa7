// Licensed under the Apache-2.0 license

use chrono::NaiveDate;
use registers_model::RootNode;
use registers_pdf::{
    BlankLineParagraphs, BlankPages, DefaultPages, ExportOptions, Image, PdfExporter,
    TemplateConfig,
};
use std::fs;

const UART: &str = r#"{
    top: [
        {
            inst_name: uart
            name: UART Controller
            base_address_p: "0x4000_0000"
            children: [
                {
                    type: reg
                    inst_name: ctrl
                    name: Control
                    desc: "Enables the transmitter.\n\nWrites while busy are ignored."
                    fields: [
                        { inst_name: en, name: Enable, lsb: 0, msb: 0, reset: 1 }
                        { inst_name: parity, lsb: 4, msb: 5 }
                    ]
                }
                {
                    type: reg
                    inst_name: status
                    address_offset: "0x8"
                    fields: [
                        { inst_name: busy, lsb: 0, msb: 0, sw: "r" }
                    ]
                }
            ]
        }
    ]
}"#;

fn options() -> ExportOptions {
    ExportOptions::default()
        .compress(false)
        .date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[test]
fn test_export_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("uart.hjson");
    let output = dir.path().join("uart.pdf");
    fs::write(&input, UART).unwrap();

    let root = RootNode::from_path(&input).unwrap();
    PdfExporter::new(options()).export(&root, &output).unwrap();

    let pdf = lopdf::Document::load(&output).unwrap();
    // Cover, table of contents, then the address map
    assert_eq!(pdf.get_pages().len(), 3);
    let catalog = pdf.catalog().unwrap();
    assert!(catalog.get(b"Outlines").is_ok());
}

#[test]
fn test_sections_and_links() {
    let root = RootNode::from_hjson_str(UART).unwrap();
    let bytes = PdfExporter::new(options()).render(&root).unwrap();
    let text = text(&bytes);

    assert!(text.contains("(UART Controller Registers Specification)"));
    assert!(text.contains("(CTRL)"));
    assert!(text.contains("(STATUS)"));
    assert!(text.contains("(Registers List)"));
    assert!(text.contains("(Fields List)"));
    assert!(text.contains("(32'h4000_0008)"));
    // The gap between CTRL and STATUS
    assert!(text.contains("(32'h0000_0004 - 32'h0000_0007)"));
    // Three table of contents entries and two register list rows
    assert!(text.matches("/Subtype /Link").count() >= 5);
}

#[test]
fn test_lowercase_names_and_title() {
    let root = RootNode::from_hjson_str(UART).unwrap();
    let bytes = PdfExporter::new(
        options()
            .use_uppercase_inst_name(false)
            .title("UART Programmer's Guide"),
    )
    .render(&root)
    .unwrap();
    let text = text(&bytes);

    assert!(text.contains("(ctrl)"));
    assert!(!text.contains("(CTRL)"));
    assert!(text.contains("UART Programmer"));
}

#[test]
fn test_cover_shows_document_title() {
    let root = RootNode::from_hjson_str(UART).unwrap();
    let cover = text(
        &PdfExporter::new(options().title("My Chip Guide"))
            .render(&root)
            .unwrap(),
    );
    assert!(cover.contains("(My Chip Guide) Tj"));
    assert!(!cover.contains("Example Registers Specification"));

    // Without a title option the cover uses the one derived from the model
    let cover = text(&PdfExporter::new(options()).render(&root).unwrap());
    assert!(cover.contains("(UART Controller Registers Specification) Tj"));

    // A title in the template wins over the document title
    let template = DefaultPages::new(TemplateConfig {
        title: Some("Cover Only".into()),
        ..Default::default()
    })
    .unwrap();
    let cover = text(
        &PdfExporter::new(options().title("My Chip Guide").page_template(template))
            .render(&root)
            .unwrap(),
    );
    assert!(cover.contains("(Cover Only) Tj"));
    assert!(!cover.contains("(My Chip Guide) Tj"));
}

#[test]
fn test_logo_is_embedded_once() {
    let logo = Image::from_rgb8(3, 1, vec![0, 0, 255, 0, 255, 0, 255, 0, 0]).unwrap();
    let template = DefaultPages::default().with_logo(logo);
    let root = RootNode::from_hjson_str(UART).unwrap();
    let bytes = PdfExporter::new(options().page_template(template))
        .render(&root)
        .unwrap();

    let text = text(&bytes);
    assert_eq!(text.matches("/Subtype /Image").count(), 1);
    // Cover, table of contents and the address map page all draw it
    assert_eq!(text.matches("/Im0 Do").count(), 3);
    let pdf = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(pdf.get_pages().len(), 3);
}

#[test]
fn test_reserved_fields_and_descriptions() {
    let root = RootNode::from_hjson_str(UART).unwrap();
    let bytes = PdfExporter::new(options().description_renderer(BlankLineParagraphs))
        .render(&root)
        .unwrap();
    let text = text(&bytes);

    assert!(text.contains("([31:6])"));
    assert!(text.contains("([3:1])"));
    assert!(text.contains("(Reserved)"));
    assert!(text.contains("(1'h1)"));
    assert!(text.contains("(Writes while busy are ignored.)"));
}

#[test]
fn test_long_register_list_spans_pages() {
    let regs: Vec<String> = (0..120)
        .map(|i| format!(r#"{{"type": "reg", "inst_name": "r{i}", "address_offset": {}}}"#, i * 4))
        .collect();
    let json = format!(
        r#"{{"top": [{{"inst_name": "big", "children": [{}]}}]}}"#,
        regs.join(",")
    );
    let root = RootNode::from_json_str(&json).unwrap();
    let bytes = PdfExporter::new(options().page_template(BlankPages))
        .render(&root)
        .unwrap();

    let pdf = lopdf::Document::load_mem(&bytes).unwrap();
    // One page per register section would be far more than this; the
    // register sections flow one after another.
    let pages = pdf.get_pages().len();
    assert!(pages > 4, "only {pages} pages");
    // The register list header is repeated on every page it continues on
    let text = text(&bytes);
    assert!(text.matches("(Offset)").count() >= 2);
}

#[test]
fn test_export_single_addrmap() {
    let root = RootNode::from_json_str(
        r#"{"top": [
            {"inst_name": "a", "children": [{"type": "reg", "inst_name": "x"}]},
            {"inst_name": "b", "children": [{"type": "reg", "inst_name": "y"}]}
        ]}"#,
    )
    .unwrap();
    let exporter = PdfExporter::new(options());

    let text_all = text(&exporter.render(&root).unwrap());
    assert!(text_all.contains("(X)") && text_all.contains("(Y)"));

    let map = root.find_top("b").unwrap();
    let text_b = text(&exporter.render(map).unwrap());
    assert!(text_b.contains("(Y)"));
    assert!(!text_b.contains("(X)"));
}
