//! End-to-end pipeline tests for web2md.
//!
//! Everything here runs offline: annotation goes through mock describers,
//! never the network. The suite exercises the full
//! normalise → sanitise → extract → annotate → render path with the kind of
//! HTML real pages throw at it.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use web2md::{
    convert, extract_blocks, render_markdown, Block, ConversionConfig, DescribeError,
    EmphasisStyle, ImageDescriber, Web2MdError,
};

// ── Test describers ──────────────────────────────────────────────────────

/// Answers every URL with a canned description derived from the URL, and
/// records which URLs were asked about.
struct EchoDescriber {
    seen: Mutex<Vec<String>>,
}

impl EchoDescriber {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ImageDescriber for EchoDescriber {
    async fn describe(&self, image_url: &str, _prompt: &str) -> Result<String, DescribeError> {
        self.seen.lock().unwrap().push(image_url.to_string());
        Ok(format!("description of {image_url}"))
    }
}

/// Fails for URLs containing "broken", succeeds otherwise.
struct FlakyDescriber;

#[async_trait]
impl ImageDescriber for FlakyDescriber {
    async fn describe(&self, image_url: &str, _prompt: &str) -> Result<String, DescribeError> {
        if image_url.contains("broken") {
            Err(DescribeError::MalformedResponse("no choices".into()))
        } else {
            Ok("fine".into())
        }
    }
}

/// Never completes within any sane timeout.
struct HangingDescriber;

#[async_trait]
impl ImageDescriber for HangingDescriber {
    async fn describe(&self, _image_url: &str, _prompt: &str) -> Result<String, DescribeError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        unreachable!()
    }
}

/// Tracks the high-water mark of in-flight calls.
struct GaugeDescriber {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl ImageDescriber for GaugeDescriber {
    async fn describe(&self, _image_url: &str, _prompt: &str) -> Result<String, DescribeError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok("x".into())
    }
}

fn config_with(describer: Arc<dyn ImageDescriber>) -> ConversionConfig {
    ConversionConfig::builder()
        .describer(describer)
        .build()
        .unwrap()
}

const BASE: &str = "https://example.com/articles/page.html";

// ── Extraction ───────────────────────────────────────────────────────────

#[test]
fn spec_example_extracts_and_renders() {
    let blocks = extract_blocks("<h1>Title</h1><p>Hello <b>World</b></p>", BASE).unwrap();
    assert_eq!(
        blocks,
        vec![
            Block::Heading {
                level: 1,
                text: "Title".into()
            },
            Block::Text {
                tag: "p".into(),
                text: "Hello".into()
            },
            Block::Emphasis {
                style: EmphasisStyle::Bold,
                text: "World".into()
            },
        ]
    );
    assert_eq!(render_markdown(&blocks), "# Title\n\nHello\n\n**World**");
}

#[test]
fn extraction_order_is_document_order() {
    let html = r#"
        <div>
          <h2>First</h2>
          <ul><li>a</li><li>b</li></ul>
        </div>
        <blockquote>quoted</blockquote>
        <div><div><p>deep</p></div></div>
    "#;
    let blocks = extract_blocks(html, BASE).unwrap();
    let kinds: Vec<&str> = blocks
        .iter()
        .map(|b| match b {
            Block::Heading { .. } => "heading",
            Block::ListItem { .. } => "li",
            Block::Blockquote { .. } => "quote",
            Block::Text { .. } => "text",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["heading", "li", "li", "quote", "text"]);
}

#[test]
fn comments_and_scripts_never_leak() {
    let html = "<p>visible</p><!-- hidden --><script>document.write('x')</script>\
                <style>p{}</style><noscript>enable</noscript><iframe src=\"x\"></iframe>";
    let blocks = extract_blocks(html, BASE).unwrap();
    assert_eq!(
        blocks,
        vec![Block::Text {
            tag: "p".into(),
            text: "visible".into()
        }]
    );
}

#[test]
fn anchor_images_precede_link_block() {
    let html = r#"<a href="/story">
        <img src="/one.png" alt="first">
        <span>caption</span>
        <img src="/two.png" alt="second">
    </a>"#;
    let blocks = extract_blocks(html, BASE).unwrap();

    let link_pos = blocks
        .iter()
        .position(|b| matches!(b, Block::Link { .. }))
        .expect("anchor text should emit a Link");
    let image_positions: Vec<usize> = blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| matches!(b, Block::Image { .. }))
        .map(|(i, _)| i)
        .collect();

    assert_eq!(image_positions.len(), 2);
    assert!(image_positions.iter().all(|&i| i < link_pos));
}

#[test]
fn responsive_pair_keeps_only_desktop_variant() {
    let html = r#"<div>
        <img class="sp" src="/mobile.png">
        <img class="pc" src="/desktop.png">
    </div>"#;
    let blocks = extract_blocks(html, BASE).unwrap();
    let srcs: Vec<&str> = blocks.iter().filter_map(Block::image_src).collect();
    assert_eq!(srcs, vec!["https://example.com/desktop.png"]);
}

#[test]
fn table_extracts_and_renders_with_header_separator() {
    let html = "<table><thead><tr><th>A</th><th>B</th></tr></thead>\
                <tbody><tr><td>1</td><td>2</td></tr></tbody></table>";
    let blocks = extract_blocks(html, BASE).unwrap();
    assert_eq!(
        blocks,
        vec![Block::Table {
            rows: vec![
                vec!["A".to_string(), "B".to_string()],
                vec!["1".to_string(), "2".to_string()],
            ]
        }]
    );

    let md = render_markdown(&blocks);
    let lines: Vec<&str> = md.lines().collect();
    assert_eq!(lines, vec!["| A | B |", "| --- | --- |", "| 1 | 2 |"]);
}

#[test]
fn rowless_table_renders_nothing() {
    let html = "<p>a</p><table></table><p>b</p>";
    let blocks = extract_blocks(html, BASE).unwrap();
    assert!(blocks.contains(&Block::Table { rows: vec![] }));
    assert_eq!(render_markdown(&blocks), "a\n\nb");
}

#[test]
fn urls_are_absolute_after_extraction() {
    let html = r#"<a href="sub/page2.html">next</a>
                  <img src="../img/pic.png">
                  <video src="//cdn.example.com/v.mp4"></video>"#;
    let blocks = extract_blocks(html, BASE).unwrap();
    for block in &blocks {
        let url = match block {
            Block::Link { href, .. } => href,
            Block::Image { src, .. } => src,
            Block::Media { src, .. } => src,
            _ => continue,
        };
        assert!(url.starts_with("https://"), "not absolute: {url}");
    }
}

#[test]
fn invalid_base_url_is_a_well_defined_error() {
    let err = extract_blocks("<p>x</p>", "::::").unwrap_err();
    assert!(matches!(err, Web2MdError::InvalidBaseUrl { .. }));
    // The error message is printable and names the bad input.
    assert!(err.to_string().contains("::::"));
}

// ── Annotation ───────────────────────────────────────────────────────────

#[tokio::test]
async fn shared_src_gets_identical_description_everywhere() {
    let html = r#"<img src="/logo.png" alt="logo">
                  <p>text between</p>
                  <img src="/logo.png">
                  <img src="/other.png" alt="kept">"#;
    let describer = EchoDescriber::new();
    let config = config_with(describer.clone());

    let out = convert(html, BASE, &config).await.unwrap();

    let alts: Vec<&str> = out
        .blocks
        .iter()
        .filter_map(|b| match b {
            Block::Image { src, alt } if src.ends_with("logo.png") => Some(alt.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(alts.len(), 2);
    assert_eq!(
        alts[0],
        "logo description of https://example.com/logo.png"
    );
    assert_eq!(alts[1], "description of https://example.com/logo.png");

    // Two distinct URLs → exactly two describe calls, regardless of how
    // many Image blocks reference them.
    let seen = describer.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    let distinct: HashSet<&String> = seen.iter().collect();
    assert_eq!(distinct.len(), 2);
}

#[tokio::test]
async fn failing_url_gets_marker_and_siblings_survive() {
    let html = r#"<img src="/broken.png" alt="bad">
                  <img src="/good.png" alt="good">"#;
    let config = config_with(Arc::new(FlakyDescriber));

    let out = convert(html, BASE, &config).await.unwrap();

    let alt_of = |needle: &str| {
        out.blocks
            .iter()
            .find_map(|b| match b {
                Block::Image { src, alt } if src.contains(needle) => Some(alt.clone()),
                _ => None,
            })
            .unwrap()
    };
    assert!(alt_of("broken").starts_with("bad Error:"), "batch must not abort");
    assert_eq!(alt_of("good"), "good fine");
    assert_eq!(out.stats.described_images, 2);
}

#[tokio::test(start_paused = true)]
async fn hung_describe_call_times_out_with_marker() {
    let html = r#"<img src="/slow.png">"#;
    let config = ConversionConfig::builder()
        .describer(Arc::new(HangingDescriber))
        .describe_timeout_secs(5)
        .build()
        .unwrap();

    let out = convert(html, BASE, &config).await.unwrap();

    let Block::Image { alt, .. } = &out.blocks[0] else {
        panic!("expected image");
    };
    assert_eq!(alt, "Error: timed out after 5s");
}

#[tokio::test]
async fn concurrency_limit_is_respected() {
    let html: String = (0..40)
        .map(|i| format!("<img src=\"/img{i}.png\">"))
        .collect();
    let gauge = Arc::new(GaugeDescriber {
        in_flight: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let config = ConversionConfig::builder()
        .describer(gauge.clone())
        .concurrency(4)
        .build()
        .unwrap();

    let out = convert(&html, BASE, &config).await.unwrap();

    assert_eq!(out.stats.described_images, 40);
    assert!(
        gauge.peak.load(Ordering::SeqCst) <= 4,
        "pool exceeded bound: {}",
        gauge.peak.load(Ordering::SeqCst)
    );
}

#[tokio::test]
async fn missing_describer_with_images_is_fatal() {
    std::env::remove_var("OPENAI_API_KEY");
    let err = convert(
        r#"<img src="/a.png">"#,
        BASE,
        &ConversionConfig::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Web2MdError::DescriberNotConfigured { .. }));
}

// ── Rendering ────────────────────────────────────────────────────────────

#[tokio::test]
async fn markdown_matches_rerender_of_returned_blocks() {
    let html = r#"<h1>T</h1><ul><li>a</li></ul><img src="/p.png" alt="x">"#;
    let config = config_with(EchoDescriber::new());

    let out = convert(html, BASE, &config).await.unwrap();

    // The returned markdown is exactly the rendering of the returned
    // (annotated) blocks, and rendering is idempotent.
    assert_eq!(render_markdown(&out.blocks), out.markdown);
    assert_eq!(render_markdown(&out.blocks), render_markdown(&out.blocks));
}

#[tokio::test]
async fn full_pipeline_document() {
    let html = r#"
        <h1>Release notes</h1>
        <p>Version <b>2.0</b> is out.<br>Highlights below.</p>
        <ul><li>Faster parsing</li><li>New <code>extract</code> API</li></ul>
        <hr>
        <table><thead><tr><th>Crate</th><th>Version</th></tr></thead>
        <tbody><tr><td>web2md</td><td>0.3</td></tr></tbody></table>
        <pre>cargo add web2md</pre>
        <a href="/changelog"><img src="/diff.png" alt="diff">Full changelog</a>
    "#;
    let config = config_with(EchoDescriber::new());
    let out = convert(html, BASE, &config).await.unwrap();

    let md = &out.markdown;
    assert!(md.starts_with("# Release notes"));
    assert!(md.contains("Version"));
    assert!(md.contains("**2.0**"));
    // <br> became a space, so the second sentence did not glue to the first.
    assert!(md.contains("is out. Highlights below."));
    assert!(md.contains("- Faster parsing"));
    assert!(md.contains("| Crate | Version |"));
    assert!(md.contains("| --- | --- |"));
    assert!(md.contains("```\ncargo add web2md\n```"));
    assert!(md.contains("[Full changelog](https://example.com/changelog)"));
    assert!(md.contains("![diff description of https://example.com/diff.png](https://example.com/diff.png)"));
    assert!(!md.ends_with('\n'), "trailing blank lines are stripped");
}
