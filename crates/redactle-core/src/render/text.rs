//! Styled plain-text sink for terminal hosts.
//!
//! Produces one [`TextLine`] per output line. Block elements are separated by
//! a blank line, list items get bullets or numbers, quotes get a `> ` prefix,
//! and soft line breaks inside prose collapse to spaces.

use super::{Element, MarkupSink};

/// Visual role of a span. Hosts map these to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanStyle {
    Plain,
    Masked,
    Heading,
    Code,
    Link,
    Emphasis,
    Strong,
    /// Bullets, quote bars, rules, and other decoration.
    Marker,
}

/// A run of text with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub style: SpanStyle,
}

/// One rendered line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    /// Concatenated text of every span.
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_blank(&self) -> bool {
        self.spans.iter().all(|s| s.text.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy)]
enum ListState {
    Bullet,
    Numbered(u32),
}

/// Builds [`TextLine`]s from rendering events.
#[derive(Debug, Default)]
pub struct TextSink {
    lines: Vec<TextLine>,
    current: Vec<TextSpan>,
    /// Whether `current` holds anything beyond its prefix.
    has_content: bool,
    inline: Vec<SpanStyle>,
    lists: Vec<ListState>,
    quote_depth: usize,
    in_code_block: bool,
    in_cell: bool,
}

impl TextSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the sink and return its lines, without trailing blanks.
    pub fn finish(mut self) -> Vec<TextLine> {
        self.flush();
        while self.lines.last().is_some_and(TextLine::is_blank) {
            self.lines.pop();
        }
        self.lines
    }

    fn style(&self) -> SpanStyle {
        if self.in_code_block {
            return SpanStyle::Code;
        }
        self.inline.last().copied().unwrap_or(SpanStyle::Plain)
    }

    fn push(&mut self, text: &str, style: SpanStyle) {
        if text.is_empty() {
            return;
        }
        if !self.has_content && self.current.is_empty() {
            self.prefix();
        }
        match self.current.last_mut() {
            Some(last) if last.style == style && style != SpanStyle::Masked => {
                last.text.push_str(text);
            }
            _ => self.current.push(TextSpan {
                text: text.to_string(),
                style,
            }),
        }
        if style != SpanStyle::Marker {
            self.has_content = true;
        }
    }

    fn prefix(&mut self) {
        let indent = self.lists.len().saturating_sub(1) * 2;
        let mut prefix = "> ".repeat(self.quote_depth);
        prefix.push_str(&" ".repeat(indent));
        if !prefix.is_empty() {
            self.current.push(TextSpan {
                text: prefix,
                style: SpanStyle::Marker,
            });
        }
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            let spans = std::mem::take(&mut self.current);
            self.lines.push(TextLine { spans });
        }
        self.has_content = false;
    }

    fn blank(&mut self) {
        self.flush();
        if self.lists.is_empty() && self.lines.last().is_some_and(|l| !l.is_blank()) {
            self.lines.push(TextLine::default());
        }
    }
}

impl MarkupSink for TextSink {
    fn open(&mut self, element: Element<'_>) {
        match element {
            Element::Paragraph => {
                if self.has_content && !self.in_cell {
                    self.flush();
                }
            }
            Element::Heading(depth) => {
                self.flush();
                self.inline.push(SpanStyle::Heading);
                let marker = format!("{} ", "#".repeat(usize::from(depth)));
                self.push(&marker, SpanStyle::Heading);
            }
            Element::Blockquote => {
                self.flush();
                self.quote_depth += 1;
            }
            Element::List { ordered, start } => {
                self.flush();
                self.lists.push(if ordered {
                    ListState::Numbered(start.unwrap_or(1))
                } else {
                    ListState::Bullet
                });
            }
            Element::ListItem { checked } => {
                self.flush();
                let bullet = match self.lists.last_mut() {
                    Some(ListState::Numbered(n)) => {
                        let bullet = format!("{n}. ");
                        *n += 1;
                        bullet
                    }
                    _ => "• ".to_string(),
                };
                self.push(&bullet, SpanStyle::Marker);
                match checked {
                    Some(true) => self.push("[x] ", SpanStyle::Marker),
                    Some(false) => self.push("[ ] ", SpanStyle::Marker),
                    None => {}
                }
            }
            Element::CodeBlock { lang } => {
                self.flush();
                if let Some(lang) = lang {
                    self.push(&format!("[{lang}]"), SpanStyle::Marker);
                    self.flush();
                }
                self.in_code_block = true;
            }
            Element::InlineCode => self.inline.push(SpanStyle::Code),
            Element::Emphasis => self.inline.push(SpanStyle::Emphasis),
            Element::Strong => self.inline.push(SpanStyle::Strong),
            Element::Delete => self.inline.push(SpanStyle::Plain),
            Element::Link { .. } => self.inline.push(SpanStyle::Link),
            Element::Image => {
                self.push("[image: ", SpanStyle::Marker);
                self.inline.push(SpanStyle::Plain);
            }
            Element::Table => self.flush(),
            Element::TableRow { .. } => self.flush(),
            Element::TableCell { header } => {
                if self.has_content {
                    self.push(" │ ", SpanStyle::Marker);
                }
                self.in_cell = true;
                self.inline.push(if header {
                    SpanStyle::Strong
                } else {
                    SpanStyle::Plain
                });
            }
            Element::FootnoteDefinition => {
                self.flush();
                self.push("[^] ", SpanStyle::Marker);
            }
            Element::FootnoteReference => {
                self.push("[^", SpanStyle::Marker);
                self.inline.push(SpanStyle::Plain);
            }
        }
    }

    fn close(&mut self, element: Element<'_>) {
        match element {
            Element::Paragraph | Element::FootnoteDefinition => self.blank(),
            Element::Heading(_) => {
                self.inline.pop();
                self.blank();
            }
            Element::Blockquote => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.blank();
            }
            Element::List { .. } => {
                self.flush();
                self.lists.pop();
                self.blank();
            }
            Element::ListItem { .. } => self.flush(),
            Element::CodeBlock { .. } => {
                self.in_code_block = false;
                self.blank();
            }
            Element::InlineCode
            | Element::Emphasis
            | Element::Strong
            | Element::Delete
            | Element::Link { .. } => {
                self.inline.pop();
            }
            Element::Image => {
                self.inline.pop();
                self.push("]", SpanStyle::Marker);
            }
            Element::FootnoteReference => {
                self.inline.pop();
                self.push("]", SpanStyle::Marker);
            }
            Element::Table => self.blank(),
            Element::TableRow { .. } => self.flush(),
            Element::TableCell { .. } => {
                self.inline.pop();
                self.in_cell = false;
            }
        }
    }

    fn literal(&mut self, text: &str) {
        let style = self.style();
        if self.in_code_block {
            let mut parts = text.split('\n');
            if let Some(first) = parts.next() {
                self.push(first, style);
            }
            for part in parts {
                self.flush();
                // Keep empty code lines as real lines.
                self.current.push(TextSpan {
                    text: String::new(),
                    style,
                });
                self.push(part, style);
            }
        } else {
            self.push(&text.replace('\n', " "), style);
        }
    }

    fn masked(&mut self, len: usize, glyph: char) {
        let text: String = std::iter::repeat_n(glyph, len).collect();
        self.push(&text, SpanStyle::Masked);
    }

    fn rule(&mut self) {
        self.flush();
        self.push(&"─".repeat(24), SpanStyle::Marker);
        self.blank();
    }

    fn line_break(&mut self) {
        self.flush();
    }
}
