mod common;

use common::*;
use lopdf::{Document, ObjectId};
use std::ops::ControlFlow;
use voter_slips::*;

fn reload(doc: Document) -> Document {
    let bytes = serialize_pdf(doc).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    Document::load_mem(&bytes).unwrap()
}

fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

fn media_box(doc: &Document, page: ObjectId) -> Vec<f32> {
    doc.get_dictionary(page)
        .unwrap()
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o.as_float().unwrap())
        .collect()
}

fn content(doc: &Document, page: ObjectId) -> String {
    String::from_utf8(doc.get_page_content(page).unwrap()).unwrap()
}

#[test]
fn test_single_layout_one_page_per_record() {
    let template = png_template(595, 842);
    let doc = compose_document(
        &records(3),
        &template,
        &DEFAULT_MAPPING,
        LayoutMode::Single,
        &ComposeOptions::default(),
        ignore_progress,
    )
    .unwrap();
    let doc = reload(doc);

    let pages = page_ids(&doc);
    assert_eq!(pages.len(), 3);
    for page in pages {
        assert_eq!(media_box(&doc, page), vec![0.0, 0.0, 595.0, 842.0]);
    }
}

#[test]
fn test_single_layout_flips_mapping() {
    let template = png_template(595, 842);
    let doc = compose_document(
        &records(1),
        &template,
        &Rect::new(14.0, 363.0, 328.0, 150.0),
        LayoutMode::Single,
        &ComposeOptions::default(),
        ignore_progress,
    )
    .unwrap();
    let doc = reload(doc);

    let page = page_ids(&doc)[0];
    let ops = content(&doc, page);
    let lines: Vec<&str> = ops.lines().collect();
    assert_eq!(lines.len(), 2);
    // Template first and full page, then the slip at y = 842 - (363 + 150)
    assert_eq!(lines[0], "q 595 0 0 842 0 0 cm /Im0 Do Q");
    assert_eq!(lines[1], "q 328 0 0 150 14 329 cm /Im1 Do Q");
}

#[test]
fn test_single_page_matches_template_size() {
    let template = jpeg_template(400, 300);
    let doc = compose_document(
        &records(2),
        &template,
        &Rect::new(10.0, 20.0, 100.0, 50.0),
        LayoutMode::Single,
        &ComposeOptions::default(),
        ignore_progress,
    )
    .unwrap();
    let doc = reload(doc);

    let pages = page_ids(&doc);
    assert_eq!(pages.len(), 2);
    assert_eq!(media_box(&doc, pages[1]), vec![0.0, 0.0, 400.0, 300.0]);
    assert!(content(&doc, pages[1]).contains("q 100 0 0 50 10 230 cm"));
}

#[test]
fn test_grid4_layout_packs_four_per_page() {
    let template = png_template(595, 842);
    let doc = compose_document(
        &records(10),
        &template,
        &DEFAULT_MAPPING,
        LayoutMode::Grid4,
        &ComposeOptions::default(),
        ignore_progress,
    )
    .unwrap();
    let doc = reload(doc);

    let pages = page_ids(&doc);
    assert_eq!(pages.len(), 3);

    let draws: Vec<usize> = pages
        .iter()
        .map(|&p| content(&doc, p).matches(" Do Q").count())
        .collect();
    // One template and one slip draw per filled slot
    assert_eq!(draws, vec![8, 8, 4]);

    for page in pages {
        assert_eq!(media_box(&doc, page), vec![0.0, 0.0, 595.0, 842.0]);
    }
}

#[test]
fn test_grid4_respects_page_size_option() {
    let template = png_template(200, 100);
    let options = ComposeOptions {
        page_size: Size::new(842.0, 595.0),
        ..Default::default()
    };
    let doc = compose_document(
        &records(5),
        &template,
        &Rect::new(0.0, 0.0, 50.0, 20.0),
        LayoutMode::Grid4,
        &options,
        ignore_progress,
    )
    .unwrap();

    let pages = page_ids(&doc);
    assert_eq!(pages.len(), 2);
    assert_eq!(media_box(&doc, pages[0]), vec![0.0, 0.0, 842.0, 595.0]);
}

#[test]
fn test_template_embedded_once() {
    let template = png_template(595, 842);
    let doc = compose_document(
        &records(8),
        &template,
        &DEFAULT_MAPPING,
        LayoutMode::Grid4,
        &ComposeOptions::default(),
        ignore_progress,
    )
    .unwrap();

    let images = doc
        .objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .filter(|s| {
            s.dict
                .get(b"Subtype")
                .and_then(|o| o.as_name())
                .is_ok_and(|n| n == b"Image")
        })
        .count();
    // 8 slips plus one template
    assert_eq!(images, 9);
}

#[test]
fn test_no_records_is_an_error() {
    let template = png_template(100, 100);
    let result = compose_document(
        &[],
        &template,
        &DEFAULT_MAPPING,
        LayoutMode::Single,
        &ComposeOptions::default(),
        ignore_progress,
    );
    assert!(matches!(result, Err(SlipError::NoRecords)));
}

#[test]
fn test_degenerate_mapping_rejected() {
    let template = png_template(100, 100);
    let result = compose_document(
        &records(1),
        &template,
        &Rect::new(10.0, 10.0, 0.0, 20.0),
        LayoutMode::Single,
        &ComposeOptions::default(),
        ignore_progress,
    );
    assert!(matches!(result, Err(SlipError::Config(_))));
}

#[test]
fn test_corrupt_record_names_the_slip() {
    let template = png_template(100, 100);
    let mut slips = records(2);
    slips[1].image_data = "data:image/jpeg;base64,@@@".to_string();

    let result = compose_document(
        &slips,
        &template,
        &Rect::new(0.0, 0.0, 10.0, 10.0),
        LayoutMode::Single,
        &ComposeOptions::default(),
        ignore_progress,
    );
    match result {
        Err(SlipError::InvalidCropData { id, .. }) => assert_eq!(id, slips[1].id),
        other => panic!("expected InvalidCropData, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_unsupported_template_rejected() {
    let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;".to_vec();
    assert!(matches!(
        TemplateImage::from_bytes(gif),
        Err(SlipError::UnsupportedTemplate)
    ));
    assert!(matches!(
        TemplateImage::from_bytes(b"plain text".to_vec()),
        Err(SlipError::UnsupportedTemplate)
    ));
}

#[test]
fn test_progress_every_k_slips() {
    let template = png_template(100, 100);
    let mut seen = Vec::new();
    compose_document(
        &records(20),
        &template,
        &Rect::new(0.0, 0.0, 10.0, 10.0),
        LayoutMode::Single,
        &ComposeOptions::default(),
        |p: Progress| {
            assert_eq!(p.stage, Stage::Compose);
            seen.push(p.current);
            ControlFlow::Continue(())
        },
    )
    .unwrap();
    assert_eq!(seen, vec![0, 10, 20]);

    seen.clear();
    compose_document(
        &records(20),
        &template,
        &Rect::new(0.0, 0.0, 10.0, 10.0),
        LayoutMode::Grid4,
        &ComposeOptions::default(),
        |p: Progress| {
            seen.push(p.current);
            ControlFlow::Continue(())
        },
    )
    .unwrap();
    assert_eq!(seen, vec![0, 8, 16, 20]);
}

#[test]
fn test_cancelled_compose() {
    let template = png_template(100, 100);
    let result = compose_document(
        &records(30),
        &template,
        &Rect::new(0.0, 0.0, 10.0, 10.0),
        LayoutMode::Single,
        &ComposeOptions::default(),
        |p: Progress| {
            if p.current >= 10 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        },
    );
    assert!(matches!(result, Err(SlipError::Cancelled)));
}

#[tokio::test]
async fn test_save_pdf_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pdf");

    let doc = compose(
        records(4),
        png_template(595, 842),
        DEFAULT_MAPPING,
        LayoutMode::Grid4,
        ComposeOptions::default(),
        ignore_progress,
    )
    .await
    .unwrap();
    save_pdf(doc, &path).await.unwrap();

    let loaded = Document::load(&path).unwrap();
    assert_eq!(loaded.get_pages().len(), 1);
}

#[tokio::test]
async fn test_async_compose_can_be_cancelled() {
    let result = compose(
        records(12),
        png_template(100, 100),
        Rect::new(0.0, 0.0, 10.0, 10.0),
        LayoutMode::Grid4,
        ComposeOptions::default(),
        |p: Progress| {
            if p.current >= 8 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        },
    )
    .await;
    assert!(matches!(result, Err(SlipError::Cancelled)));
}

#[test]
fn test_cmyk_template_embedded_as_cmyk() {
    let template = cmyk_jpeg_template(300, 200);
    assert_eq!(template.format(), TemplateFormat::Jpeg);
    assert_eq!((template.width(), template.height()), (300, 200));

    let doc = compose_document(
        &records(1),
        &template,
        &Rect::new(10.0, 10.0, 100.0, 40.0),
        LayoutMode::Single,
        &ComposeOptions::default(),
        ignore_progress,
    )
    .unwrap();
    let doc = reload(doc);

    let mut spaces: Vec<Vec<u8>> = doc
        .objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .filter(|s| {
            s.dict
                .get(b"Subtype")
                .and_then(|o| o.as_name())
                .is_ok_and(|n| n == b"Image")
        })
        .map(|s| s.dict.get(b"ColorSpace").unwrap().as_name().unwrap().to_vec())
        .collect();
    spaces.sort();
    assert_eq!(spaces, vec![b"DeviceCMYK".to_vec(), b"DeviceRGB".to_vec()]);
}
