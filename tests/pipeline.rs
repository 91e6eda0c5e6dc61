//! Integration tests for the conversion pipeline.
//!
//! No network and no real model: a scripted [`TextTransformer`] stands in
//! for the external service, with per-page delays to force completion-order
//! scrambles and injected failures to exercise the abort-all policy.

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use slidemark::{
    convert, ConversionConfig, SlidemarkError, TextTransformer, TransformError, PAGE_SEPARATOR,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Build a minimal in-memory PDF with one text page per entry; an empty
/// entry produces a page with no text content at all.
fn build_pdf(page_texts: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in page_texts {
        let operations = if text.is_empty() {
            vec![]
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content stream"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let kids_len = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => kids_len,
            "Resources" => resources_id,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialise test PDF");
    bytes
}

/// Scripted transformer: answers `## <raw text>`, with optional per-marker
/// delays and failures, while tracking how many calls overlap.
struct MockTransformer {
    /// Raw-text substring → artificial latency in milliseconds.
    delays: HashMap<&'static str, u64>,
    /// Fail any call whose raw text contains this substring.
    fail_on: Option<&'static str>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    high_water: AtomicUsize,
}

impl MockTransformer {
    fn new() -> Self {
        Self {
            delays: HashMap::new(),
            fail_on: None,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            high_water: AtomicUsize::new(0),
        }
    }

    fn with_delay(mut self, marker: &'static str, ms: u64) -> Self {
        self.delays.insert(marker, ms);
        self
    }

    fn with_failure_on(mut self, marker: &'static str) -> Self {
        self.fail_on = Some(marker);
        self
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn max_concurrent(&self) -> usize {
        self.high_water.load(Ordering::SeqCst)
    }

    /// The raw page text embedded at the end of the instruction prompt.
    fn raw_text(prompt: &str) -> String {
        prompt
            .split("Page text:")
            .nth(1)
            .unwrap_or("")
            .trim()
            .to_string()
    }
}

#[async_trait]
impl TextTransformer for MockTransformer {
    async fn transform(&self, prompt: &str) -> Result<String, TransformError> {
        self.calls.lock().unwrap().push(prompt.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(now, Ordering::SeqCst);

        let raw = Self::raw_text(prompt);
        let delay = self
            .delays
            .iter()
            .find(|(marker, _)| raw.contains(*marker))
            .map(|(_, ms)| *ms);
        if let Some(ms) = delay {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(marker) = self.fail_on {
            if raw.contains(marker) {
                return Err(TransformError::Http {
                    status: 500,
                    detail: format!("scripted failure for '{marker}'"),
                });
            }
        }

        Ok(format!("## {raw}"))
    }
}

// ── Pipeline tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn three_page_deck_with_blank_middle_page() {
    let bytes = build_pdf(&["Alpha", "", "Beta"]);
    let mock = Arc::new(MockTransformer::new());
    let transformer: Arc<dyn TextTransformer> = mock.clone();

    let output = convert(&bytes, transformer, &ConversionConfig::default())
        .await
        .expect("conversion should succeed");

    // The transformer ran only for the two non-blank pages.
    assert_eq!(mock.call_count(), 2);

    assert_eq!(output.pages.len(), 3);
    assert!(output.pages[1].blank);
    assert_eq!(output.pages[1].markdown, "");

    assert_eq!(
        output.markdown,
        format!("## Alpha{PAGE_SEPARATOR}## Beta")
    );
    assert_eq!(output.stats.total_pages, 3);
    assert_eq!(output.stats.refined_pages, 2);
    assert_eq!(output.stats.blank_pages, 1);
}

#[tokio::test]
async fn assembly_follows_page_order_not_completion_order() {
    let bytes = build_pdf(&["Alpha", "Beta", "Gamma"]);
    // Page 1 is the slowest, page 3 the fastest — completion order is the
    // reverse of page order.
    let mock = Arc::new(
        MockTransformer::new()
            .with_delay("Alpha", 80)
            .with_delay("Beta", 40),
    );
    let transformer: Arc<dyn TextTransformer> = mock.clone();

    let output = convert(&bytes, transformer, &ConversionConfig::default())
        .await
        .expect("conversion should succeed");

    let a = output.markdown.find("## Alpha").expect("Alpha present");
    let b = output.markdown.find("## Beta").expect("Beta present");
    let g = output.markdown.find("## Gamma").expect("Gamma present");
    assert!(a < b && b < g, "pages out of order: {}", output.markdown);
}

#[tokio::test]
async fn one_failed_page_aborts_the_conversion() {
    let bytes = build_pdf(&["Alpha", "Beta", "Gamma"]);
    let mock = Arc::new(MockTransformer::new().with_failure_on("Beta"));
    let transformer: Arc<dyn TextTransformer> = mock.clone();

    let err = convert(&bytes, transformer, &ConversionConfig::default())
        .await
        .expect_err("conversion must fail");

    match err {
        SlidemarkError::TransformFailed { page, .. } => assert_eq!(page, 2),
        other => panic!("expected TransformFailed, got: {other}"),
    }
}

#[tokio::test]
async fn concurrency_cap_is_enforced() {
    let texts: Vec<String> = (0..10).map(|i| format!("Slide number {i}")).collect();
    let refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
    let bytes = build_pdf(&refs);

    let mock = Arc::new(MockTransformer::new().with_delay("Slide", 20));
    let transformer: Arc<dyn TextTransformer> = mock.clone();

    let config = ConversionConfig::builder().concurrency(2).build().unwrap();
    let output = convert(&bytes, transformer, &config)
        .await
        .expect("conversion should succeed");

    assert_eq!(output.stats.refined_pages, 10);
    assert!(
        mock.max_concurrent() <= 2,
        "observed {} overlapping transformer calls with concurrency 2",
        mock.max_concurrent()
    );
}

#[tokio::test]
async fn garbage_input_fails_before_any_transformer_call() {
    let mock = Arc::new(MockTransformer::new());
    let transformer: Arc<dyn TextTransformer> = mock.clone();

    let err = convert(b"%not a pdf at all", transformer, &ConversionConfig::default())
        .await
        .expect_err("garbage must not convert");

    assert!(matches!(err, SlidemarkError::ParseError { .. }));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn title_comes_from_first_refined_heading() {
    let bytes = build_pdf(&["Enzyme Kinetics", "Reaction Rates"]);
    let transformer: Arc<dyn TextTransformer> = Arc::new(MockTransformer::new());

    let output = convert(&bytes, transformer, &ConversionConfig::default())
        .await
        .expect("conversion should succeed");

    let document = output.into_document("week3-slides");
    assert_eq!(document.title, "Enzyme Kinetics");
}

#[tokio::test]
async fn all_blank_deck_falls_back_to_supplied_title() {
    let bytes = build_pdf(&["", ""]);
    let mock = Arc::new(MockTransformer::new());
    let transformer: Arc<dyn TextTransformer> = mock.clone();

    let output = convert(&bytes, transformer, &ConversionConfig::default())
        .await
        .expect("conversion should succeed");

    assert_eq!(mock.call_count(), 0);
    assert_eq!(output.markdown, "");

    let document = output.into_document("week3-slides");
    assert_eq!(document.title, "week3-slides");
}

// ── Store round-trip ─────────────────────────────────────────────────────────

#[tokio::test]
async fn converted_document_persists_and_reads_back() {
    use slidemark::DocumentStore;

    let bytes = build_pdf(&["Photosynthesis"]);
    let transformer: Arc<dyn TextTransformer> = Arc::new(MockTransformer::new());

    let output = convert(&bytes, transformer, &ConversionConfig::default())
        .await
        .expect("conversion should succeed");
    let document = output.into_document("bio-deck");

    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::open(dir.path()).unwrap();
    let record = store.save(&document, "bio-deck.pdf").unwrap();

    assert_eq!(record.title, "Photosynthesis");
    assert_eq!(store.read_markdown(&record.id).unwrap(), document.markdown);

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, record.id);
}
