//! HTML markup sink.

use std::fmt::Write;

use super::{Element, MarkupSink};

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Builds an HTML fragment. Masked words become
/// `<span class="{class}" data-length="{n}">` elements holding `n` glyphs.
#[derive(Debug)]
pub struct HtmlSink {
    out: String,
    redacted_class: String,
}

impl HtmlSink {
    pub fn new(redacted_class: &str) -> Self {
        Self {
            out: String::new(),
            redacted_class: escape_html(redacted_class),
        }
    }

    /// Consume the sink and return the markup.
    pub fn finish(self) -> String {
        self.out
    }
}

impl MarkupSink for HtmlSink {
    fn open(&mut self, element: Element<'_>) {
        let out = &mut self.out;
        match element {
            Element::Paragraph => out.push_str("<p>"),
            Element::Heading(depth) => {
                let _ = write!(out, "<h{depth}>");
            }
            Element::Blockquote => out.push_str("<blockquote>\n"),
            Element::List { ordered: false, .. } => out.push_str("<ul>\n"),
            Element::List {
                ordered: true,
                start: Some(start),
            } if start != 1 => {
                let _ = writeln!(out, "<ol start=\"{start}\">");
            }
            Element::List { ordered: true, .. } => out.push_str("<ol>\n"),
            Element::ListItem { checked } => {
                out.push_str("<li>");
                match checked {
                    Some(true) => out.push_str("<input type=\"checkbox\" disabled checked /> "),
                    Some(false) => out.push_str("<input type=\"checkbox\" disabled /> "),
                    None => {}
                }
            }
            Element::CodeBlock { lang: Some(lang) } => {
                let _ = write!(
                    out,
                    "<pre><code class=\"language-{}\">",
                    escape_html(lang)
                );
            }
            Element::CodeBlock { lang: None } => out.push_str("<pre><code>"),
            Element::InlineCode => out.push_str("<code>"),
            Element::Emphasis => out.push_str("<em>"),
            Element::Strong => out.push_str("<strong>"),
            Element::Delete => out.push_str("<del>"),
            Element::Link { href } => {
                let _ = write!(out, "<a href=\"{}\">", escape_html(href));
            }
            Element::Image => out.push_str("<span class=\"image\">"),
            Element::Table => out.push_str("<table>\n"),
            Element::TableRow { .. } => out.push_str("<tr>\n"),
            Element::TableCell { header: true } => out.push_str("<th>"),
            Element::TableCell { header: false } => out.push_str("<td>"),
            Element::FootnoteDefinition => out.push_str("<div class=\"footnote\">\n"),
            Element::FootnoteReference => out.push_str("<sup>"),
        }
    }

    fn close(&mut self, element: Element<'_>) {
        let out = &mut self.out;
        match element {
            Element::Paragraph => out.push_str("</p>\n"),
            Element::Heading(depth) => {
                let _ = writeln!(out, "</h{depth}>");
            }
            Element::Blockquote => out.push_str("</blockquote>\n"),
            Element::List { ordered: false, .. } => out.push_str("</ul>\n"),
            Element::List { ordered: true, .. } => out.push_str("</ol>\n"),
            Element::ListItem { .. } => out.push_str("</li>\n"),
            Element::CodeBlock { .. } => out.push_str("</code></pre>\n"),
            Element::InlineCode => out.push_str("</code>"),
            Element::Emphasis => out.push_str("</em>"),
            Element::Strong => out.push_str("</strong>"),
            Element::Delete => out.push_str("</del>"),
            Element::Link { .. } => out.push_str("</a>"),
            Element::Image => out.push_str("</span>"),
            Element::Table => out.push_str("</table>\n"),
            Element::TableRow { .. } => out.push_str("</tr>\n"),
            Element::TableCell { header: true } => out.push_str("</th>\n"),
            Element::TableCell { header: false } => out.push_str("</td>\n"),
            Element::FootnoteDefinition => out.push_str("</div>\n"),
            Element::FootnoteReference => out.push_str("</sup>"),
        }
    }

    fn literal(&mut self, text: &str) {
        self.out.push_str(&escape_html(text));
    }

    fn masked(&mut self, len: usize, glyph: char) {
        let _ = write!(
            self.out,
            "<span class=\"{}\" data-length=\"{len}\">",
            self.redacted_class
        );
        self.out.extend(std::iter::repeat_n(glyph, len));
        self.out.push_str("</span>");
    }

    fn rule(&mut self) {
        self.out.push_str("<hr />\n");
    }

    fn line_break(&mut self) {
        self.out.push_str("<br />\n");
    }
}
