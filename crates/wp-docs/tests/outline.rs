use std::collections::HashMap;

use wp_docs::{
    DocError, DocSource, DocViewer, OutlineEntry, build, outline_from_markdown, parse,
    render_outline,
};

const SUMMARY: &str = "\
# Summary

Introductory prose that is not part of the outline.

- [Guide](guide/README.md)
  - [Rules](guide/rules.md)
  - [OML](guide/oml.md)
      - [Functions](guide/oml/functions.md)
not a list item
- [FAQ](faq.md)
";

#[test]
fn levels_from_the_worked_example() {
    let entries: Vec<OutlineEntry> = [("A", 0), ("B", 1), ("C", 1), ("D", 0)]
        .into_iter()
        .map(|(title, level)| OutlineEntry::new(title, format!("{title}.md"), level))
        .collect();
    let forest = build(&entries);
    assert_eq!(forest.len(), 2);
    assert_eq!(forest[0].title, "A");
    assert_eq!(forest[0].children.len(), 2);
    assert_eq!(forest[0].children[0].title, "B");
    assert_eq!(forest[0].children[1].title, "C");
    assert_eq!(forest[1].title, "D");
    assert!(forest[1].children.is_empty());
}

#[test]
fn unmatched_lines_do_not_stop_parsing() {
    let entries = parse(SUMMARY);
    let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Guide", "Rules", "OML", "Functions", "FAQ"]);
    assert_eq!(entries[3].level, 3);
}

#[test]
fn summary_renders_as_a_tree() {
    let forest = outline_from_markdown(SUMMARY);
    insta::assert_snapshot!(render_outline(&forest).trim_end(), @r"
- Guide (guide/README.md)
  - Rules (guide/rules.md)
  - OML (guide/oml.md)
    - Functions (guide/oml/functions.md)
- FAQ (faq.md)
");
}

#[test]
fn forest_serializes_with_children() {
    let forest = outline_from_markdown("- [A](a.md)\n  - [B](b.md)\n");
    let json = serde_json::to_value(&forest).expect("json");
    assert_eq!(json[0]["key"], "A-a.md");
    assert_eq!(json[0]["children"][0]["title"], "B");
    assert_eq!(json[0]["children"][0]["level"], 1);
}

struct MemorySource(HashMap<&'static str, &'static str>);

impl DocSource for MemorySource {
    async fn fetch(&self, path: &str) -> Result<String, DocError> {
        self.0
            .get(path)
            .map(|text| text.to_string())
            .ok_or_else(|| DocError::Status {
                path: path.to_string(),
                status: 404,
            })
    }
}

#[tokio::test]
async fn viewer_loads_index_then_first_document() {
    let source = MemorySource(HashMap::from([
        ("SUMMARY.md", SUMMARY),
        ("guide/README.md", "# Guide"),
        ("faq.md", "# FAQ"),
    ]));
    let mut viewer = DocViewer::new();
    viewer.refresh(&source).await;
    assert_eq!(viewer.forest().len(), 2);
    assert_eq!(viewer.content(), "# Guide");

    assert!(viewer.open(&source, "FAQ-faq.md").await);
    assert_eq!(viewer.content(), "# FAQ");

    assert!(viewer.open(&source, "Rules-guide/rules.md").await);
    assert_eq!(
        viewer.content(),
        "unable to load document: guide/rules.md (HTTP 404)"
    );
}

#[tokio::test]
async fn missing_index_is_reported_in_content() {
    let source = MemorySource(HashMap::new());
    let mut viewer = DocViewer::new();
    viewer.refresh(&source).await;
    assert!(viewer.forest().is_empty());
    assert_eq!(
        viewer.content(),
        "failed to load document index: unable to load document: SUMMARY.md (HTTP 404)"
    );
}
