//! Puzzle panel: the redacted document, or the error that stopped play.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use redactle_core::render::{SpanStyle, TextLine};

use super::{PanelState, TopScroll};

/// Scrollable view of the rendered puzzle.
#[derive(Debug, Default)]
pub struct PuzzlePanel {
    scroll: TopScroll,
}

/// What the puzzle panel shows this frame.
pub enum PuzzleContent<'a> {
    Loading,
    Lines { lines: &'a [TextLine], stale: bool },
    Error(&'a str),
}

impl PuzzlePanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called whenever a new render is accepted.
    pub fn set_line_count(&mut self, len: usize) {
        self.scroll.set_len(len);
    }

    pub fn offset(&self) -> usize {
        self.scroll.offset
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, content: PuzzleContent<'_>, focused: bool) {
        let border = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let (title, body) = match content {
            PuzzleContent::Loading => (
                " Puzzle ".to_string(),
                Text::styled("  loading…", Style::default().fg(Color::DarkGray)),
            ),
            PuzzleContent::Error(message) => (
                " Puzzle (error) ".to_string(),
                Text::styled(
                    message.to_string(),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
            ),
            PuzzleContent::Lines { lines, stale } => {
                let marker = if stale { " [rendering]" } else { "" };
                (
                    format!(" Puzzle{marker} "),
                    Text::from(lines.iter().map(to_line).collect::<Vec<_>>()),
                )
            }
        };

        let offset = u16::try_from(self.scroll.offset).unwrap_or(u16::MAX);
        let paragraph = Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .scroll((offset, 0))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(border),
            );
        frame.render_widget(paragraph, area);
    }
}

impl PanelState for PuzzlePanel {
    fn scroll_down(&mut self, n: usize) {
        self.scroll.scroll_down(n);
    }

    fn scroll_up(&mut self, n: usize) {
        self.scroll.scroll_up(n);
    }

    fn scroll_to_top(&mut self) {
        self.scroll.scroll_to_top();
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll.scroll_to_bottom();
    }
}

fn style_for(style: SpanStyle) -> Style {
    match style {
        SpanStyle::Plain => Style::default(),
        SpanStyle::Masked => Style::default().fg(Color::Gray),
        SpanStyle::Heading => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        SpanStyle::Code => Style::default().fg(Color::Yellow),
        SpanStyle::Link => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::UNDERLINED),
        SpanStyle::Emphasis => Style::default().add_modifier(Modifier::ITALIC),
        SpanStyle::Strong => Style::default().add_modifier(Modifier::BOLD),
        SpanStyle::Marker => Style::default().fg(Color::DarkGray),
    }
}

fn to_line(line: &TextLine) -> Line<'static> {
    Line::from(
        line.spans
            .iter()
            .map(|s| Span::styled(s.text.clone(), style_for(s.style)))
            .collect::<Vec<_>>(),
    )
}
