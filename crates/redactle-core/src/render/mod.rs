//! Structured rendering of a processed document with selective redaction.
//!
//! [`Renderer`] walks the markdown syntax tree once and drives a
//! [`MarkupSink`]. Text-bearing nodes (prose, inline code, code blocks, link
//! text, image alt text) go through the [`Redactor`]; structure is forwarded to
//! the sink as [`Element`] open/close pairs and never redacted. Heading text is
//! emitted verbatim unless [`RenderOptions::mask_headings`] is set, and level-1
//! headings always are.
//!
//! Link and image destinations never reach the sink: every link is opened with
//! the configured placeholder instead.
//!
//! Rendering keeps no state between calls. The output is a function of the
//! document, the revealed set, the solved flag, and the options.

mod html;
mod text;

pub use html::{HtmlSink, escape_html};
pub use text::{SpanStyle, TextLine, TextSink, TextSpan};

use markdown::mdast::Node;
use redactle_config::RenderConfig;

use crate::document::ProcessedDocument;
use crate::redact::{Redactor, Segment};

/// Options that shape markup but not redaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Destination written into every link.
    pub link_placeholder: String,
    /// Redact heading text like prose. Level-1 headings are never masked.
    pub mask_headings: bool,
    /// CSS class for masked placeholders in HTML.
    pub redacted_class: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            link_placeholder: config.link_placeholder.clone(),
            mask_headings: config.mask_headings,
            redacted_class: config.redacted_class.clone(),
        }
    }
}

/// Structural elements forwarded to a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element<'a> {
    Paragraph,
    Heading(u8),
    Blockquote,
    List { ordered: bool, start: Option<u32> },
    ListItem { checked: Option<bool> },
    /// Fenced or indented code; `lang` is the first word of the info string.
    CodeBlock { lang: Option<&'a str> },
    InlineCode,
    Emphasis,
    Strong,
    Delete,
    /// A link whose destination has already been replaced.
    Link { href: &'a str },
    /// Image alt text; the source is dropped.
    Image,
    Table,
    TableRow { header: bool },
    TableCell { header: bool },
    FootnoteDefinition,
    FootnoteReference,
}

/// Receiver of rendering events.
pub trait MarkupSink {
    fn open(&mut self, element: Element<'_>);
    fn close(&mut self, element: Element<'_>);
    /// Visible text, unescaped.
    fn literal(&mut self, text: &str);
    /// A masked word of `len` characters.
    fn masked(&mut self, len: usize, glyph: char);
    fn rule(&mut self);
    fn line_break(&mut self);
}

#[derive(Debug, Clone, Copy, Default)]
struct Context {
    verbatim: bool,
    tight: bool,
}

/// Tree walker pairing a redactor with render options.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    redactor: Redactor<'a>,
    options: &'a RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(redactor: Redactor<'a>, options: &'a RenderOptions) -> Self {
        Self { redactor, options }
    }

    /// Walk the whole document into `sink`.
    pub fn render<S: MarkupSink>(&self, document: &ProcessedDocument, sink: &mut S) {
        self.node(document.tree(), sink, Context::default());
    }

    /// Render the document as an HTML fragment.
    pub fn html(&self, document: &ProcessedDocument) -> String {
        let mut sink = HtmlSink::new(&self.options.redacted_class);
        self.render(document, &mut sink);
        sink.finish()
    }

    /// Render the document as styled plain-text lines.
    pub fn text(&self, document: &ProcessedDocument) -> Vec<TextLine> {
        let mut sink = TextSink::new();
        self.render(document, &mut sink);
        sink.finish()
    }

    fn children<S: MarkupSink>(&self, children: &[Node], sink: &mut S, ctx: Context) {
        for child in children {
            self.node(child, sink, ctx);
        }
    }

    fn wrapped<S: MarkupSink>(
        &self,
        element: Element<'_>,
        children: &[Node],
        sink: &mut S,
        ctx: Context,
    ) {
        sink.open(element);
        self.children(children, sink, ctx);
        sink.close(element);
    }

    fn chunk<S: MarkupSink>(&self, text: &str, sink: &mut S, ctx: Context) {
        if ctx.verbatim {
            sink.literal(text);
            return;
        }
        let glyph = self.redactor.limits().mask_glyph;
        for segment in self.redactor.segments(text) {
            match segment {
                Segment::Literal(s) => sink.literal(s),
                Segment::Masked { len } => sink.masked(len, glyph),
            }
        }
    }

    fn node<S: MarkupSink>(&self, node: &Node, sink: &mut S, ctx: Context) {
        match node {
            Node::Root(root) => self.children(&root.children, sink, ctx),
            Node::Paragraph(p) => {
                if ctx.tight {
                    self.children(&p.children, sink, ctx);
                } else {
                    self.wrapped(Element::Paragraph, &p.children, sink, ctx);
                }
            }
            Node::Heading(h) => {
                let inner = Context {
                    verbatim: ctx.verbatim || h.depth == 1 || !self.options.mask_headings,
                    ..ctx
                };
                self.wrapped(Element::Heading(h.depth), &h.children, sink, inner);
            }
            Node::Text(t) => self.chunk(&t.value, sink, ctx),
            Node::Code(code) => {
                let lang = code
                    .lang
                    .as_deref()
                    .and_then(|info| info.split_whitespace().next());
                let element = Element::CodeBlock { lang };
                sink.open(element);
                self.chunk(&code.value, sink, ctx);
                sink.close(element);
            }
            Node::Math(math) => {
                let element = Element::CodeBlock { lang: Some("math") };
                sink.open(element);
                self.chunk(&math.value, sink, ctx);
                sink.close(element);
            }
            Node::InlineCode(code) => {
                sink.open(Element::InlineCode);
                self.chunk(&code.value, sink, ctx);
                sink.close(Element::InlineCode);
            }
            Node::InlineMath(math) => {
                sink.open(Element::InlineCode);
                self.chunk(&math.value, sink, ctx);
                sink.close(Element::InlineCode);
            }
            Node::Link(link) => {
                let element = Element::Link {
                    href: &self.options.link_placeholder,
                };
                self.wrapped(element, &link.children, sink, ctx);
            }
            Node::LinkReference(link) => {
                let element = Element::Link {
                    href: &self.options.link_placeholder,
                };
                self.wrapped(element, &link.children, sink, ctx);
            }
            Node::Image(image) => {
                sink.open(Element::Image);
                self.chunk(&image.alt, sink, ctx);
                sink.close(Element::Image);
            }
            Node::ImageReference(image) => {
                sink.open(Element::Image);
                self.chunk(&image.alt, sink, ctx);
                sink.close(Element::Image);
            }
            Node::Emphasis(e) => self.wrapped(Element::Emphasis, &e.children, sink, ctx),
            Node::Strong(s) => self.wrapped(Element::Strong, &s.children, sink, ctx),
            Node::Delete(d) => self.wrapped(Element::Delete, &d.children, sink, ctx),
            Node::Blockquote(q) => {
                let inner = Context { tight: false, ..ctx };
                self.wrapped(Element::Blockquote, &q.children, sink, inner);
            }
            Node::List(list) => {
                let loose = list.spread
                    || list
                        .children
                        .iter()
                        .any(|item| matches!(item, Node::ListItem(li) if li.spread));
                let inner = Context {
                    tight: !loose,
                    ..ctx
                };
                let element = Element::List {
                    ordered: list.ordered,
                    start: list.start,
                };
                self.wrapped(element, &list.children, sink, inner);
            }
            Node::ListItem(item) => {
                let element = Element::ListItem {
                    checked: item.checked,
                };
                self.wrapped(element, &item.children, sink, ctx);
            }
            Node::Table(table) => {
                sink.open(Element::Table);
                for (i, row) in table.children.iter().enumerate() {
                    let header = i == 0;
                    let cells = row.children().map(Vec::as_slice).unwrap_or_default();
                    sink.open(Element::TableRow { header });
                    for cell in cells {
                        let cell_children = cell.children().map(Vec::as_slice).unwrap_or_default();
                        self.wrapped(Element::TableCell { header }, cell_children, sink, ctx);
                    }
                    sink.close(Element::TableRow { header });
                }
                sink.close(Element::Table);
            }
            Node::FootnoteDefinition(def) => {
                let inner = Context { tight: false, ..ctx };
                self.wrapped(Element::FootnoteDefinition, &def.children, sink, inner);
            }
            Node::FootnoteReference(reference) => {
                let label = reference.label.as_deref().unwrap_or(&reference.identifier);
                sink.open(Element::FootnoteReference);
                self.chunk(label, sink, ctx);
                sink.close(Element::FootnoteReference);
            }
            Node::Html(html) => self.chunk(&html.value, sink, ctx),
            Node::Break(_) => sink.line_break(),
            Node::ThematicBreak(_) => sink.rule(),
            // Definitions carry only destinations; metadata blocks are
            // stripped before parsing.
            Node::Definition(_) | Node::Yaml(_) | Node::Toml(_) => {}
            other => {
                if let Some(children) = other.children() {
                    self.children(children, sink, ctx);
                }
            }
        }
    }
}

/// Render `document` to HTML for the given reveal state.
pub fn render_html(
    document: &ProcessedDocument,
    redactor: Redactor<'_>,
    options: &RenderOptions,
) -> String {
    Renderer::new(redactor, options).html(document)
}

/// Render `document` to styled plain-text lines for the given reveal state.
pub fn render_text(
    document: &ProcessedDocument,
    redactor: Redactor<'_>,
    options: &RenderOptions,
) -> Vec<TextLine> {
    Renderer::new(redactor, options).text(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redact::{RedactLimits, RevealedSet};
    use pretty_assertions::assert_eq;

    /// Sink that records events for structural assertions.
    #[derive(Default)]
    struct EventLog(Vec<String>);

    impl MarkupSink for EventLog {
        fn open(&mut self, element: Element<'_>) {
            self.0.push(format!("open {element:?}"));
        }
        fn close(&mut self, element: Element<'_>) {
            self.0.push(format!("close {element:?}"));
        }
        fn literal(&mut self, text: &str) {
            self.0.push(format!("text {text:?}"));
        }
        fn masked(&mut self, len: usize, _glyph: char) {
            self.0.push(format!("mask {len}"));
        }
        fn rule(&mut self) {
            self.0.push("rule".to_string());
        }
        fn line_break(&mut self) {
            self.0.push("br".to_string());
        }
    }

    fn events(markdown: &str, revealed: &RevealedSet, solved: bool) -> Vec<String> {
        let doc = ProcessedDocument::new(markdown).unwrap();
        let limits = RedactLimits::default();
        let options = RenderOptions::default();
        let renderer = Renderer::new(Redactor::new(revealed, solved, &limits), &options);
        let mut sink = EventLog::default();
        renderer.render(&doc, &mut sink);
        sink.0
    }

    #[test]
    fn test_paragraph_text_is_redacted() {
        let revealed = RevealedSet::from_words(["is"]);
        assert_eq!(
            events("Paris is nice.", &revealed, false),
            vec![
                "open Paragraph",
                "mask 5",
                "text \" is \"",
                "mask 4",
                "text \".\"",
                "close Paragraph",
            ]
        );
    }

    #[test]
    fn test_heading_is_verbatim() {
        assert_eq!(
            events("# Paris Facts", &RevealedSet::new(), false),
            vec!["open Heading(1)", "text \"Paris Facts\"", "close Heading(1)"]
        );
    }

    #[test]
    fn test_heading_masked_when_configured() {
        let doc = ProcessedDocument::new("# Paris Facts\n\n## Secret").unwrap();
        let limits = RedactLimits::default();
        let options = RenderOptions {
            mask_headings: true,
            ..RenderOptions::default()
        };
        let revealed = RevealedSet::new();
        let renderer = Renderer::new(Redactor::new(&revealed, false, &limits), &options);
        let mut sink = EventLog::default();
        renderer.render(&doc, &mut sink);
        assert_eq!(
            sink.0,
            vec![
                "open Heading(1)",
                "text \"Paris Facts\"",
                "close Heading(1)",
                "open Heading(2)",
                "mask 6",
                "close Heading(2)",
            ]
        );
    }

    #[test]
    fn test_code_block_keeps_first_info_word() {
        let events = events("```rust ignore\nlet x = 1;\n```", &RevealedSet::new(), false);
        assert_eq!(events[0], "open CodeBlock { lang: Some(\"rust\") }");
        assert!(events.contains(&"mask 3".to_string()));
        assert_eq!(
            events.last().unwrap(),
            "close CodeBlock { lang: Some(\"rust\") }"
        );
    }

    #[test]
    fn test_link_destination_never_reaches_sink() {
        let events = events(
            "[click here](http://example.com/answer-is-paris \"paris\")",
            &RevealedSet::new(),
            true,
        );
        let joined = events.join("\n");
        assert!(joined.contains("open Link { href: \"#\" }"));
        assert!(joined.contains("text \"click here\""));
        assert!(!joined.contains("answer"));
        assert!(!joined.contains("example"));
    }

    #[test]
    fn test_tight_list_has_no_paragraphs() {
        let events = events("- one\n- two", &RevealedSet::from_words(["one", "two"]), false);
        assert!(!events.iter().any(|e| e.contains("Paragraph")));
        assert_eq!(
            events.iter().filter(|e| e.starts_with("open ListItem")).count(),
            2
        );
    }

    #[test]
    fn test_definitions_are_dropped() {
        let events = events(
            "[Go][site]\n\n[site]: https://example.com/secret",
            &RevealedSet::new(),
            true,
        );
        let joined = events.join("\n");
        assert!(joined.contains("open Link { href: \"#\" }"));
        assert!(!joined.contains("secret"));
    }

    #[test]
    fn test_table_marks_header_row() {
        let events = events("| a | b |\n|---|---|\n| c | d |", &RevealedSet::new(), true);
        assert!(events.contains(&"open TableRow { header: true }".to_string()));
        assert!(events.contains(&"open TableRow { header: false }".to_string()));
        assert_eq!(
            events
                .iter()
                .filter(|e| e.starts_with("open TableCell"))
                .count(),
            4
        );
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let doc = ProcessedDocument::new("# T\n\nSome *words* and `code`.").unwrap();
        let limits = RedactLimits::default();
        let options = RenderOptions::default();
        let revealed = RevealedSet::from_words(["words"]);
        let renderer = Renderer::new(Redactor::new(&revealed, false, &limits), &options);
        assert_eq!(renderer.html(&doc), renderer.html(&doc));
        assert_eq!(renderer.text(&doc), renderer.text(&doc));
    }
}
