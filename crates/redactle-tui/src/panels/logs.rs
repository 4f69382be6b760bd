//! Logs panel: puzzle activity from the in-memory ring buffer.
//!
//! Session events get their own marker and colour so reveals and the solve
//! stand out from plumbing noise. The view is anchored to the newest entry
//! until the player scrolls back.

use std::ops::Range;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use redactle_core::ActivityReader;
use redactle_core::logging::ActivityEntry;
use tracing::Level;

use super::PanelState;

/// What a log entry says about the puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Loaded,
    Revealed,
    Solved,
    Rejected,
    Problem,
    Other,
}

impl Kind {
    fn of(entry: &ActivityEntry) -> Self {
        if entry.level <= Level::WARN {
            return Kind::Problem;
        }
        match entry.message.as_str() {
            "puzzle loaded" | "starting puzzle" => Kind::Loaded,
            "word revealed" => Kind::Revealed,
            "puzzle solved" => Kind::Solved,
            "guess rejected" | "guess ignored" => Kind::Rejected,
            _ => Kind::Other,
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Kind::Loaded => "▶",
            Kind::Revealed => "+",
            Kind::Solved => "★",
            Kind::Rejected => "·",
            Kind::Problem => "!",
            Kind::Other => " ",
        }
    }

    fn style(self) -> Style {
        match self {
            Kind::Loaded => Style::default().fg(Color::Cyan),
            Kind::Revealed => Style::default().fg(Color::Green),
            Kind::Solved => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            Kind::Rejected => Style::default().fg(Color::DarkGray),
            Kind::Problem => Style::default().fg(Color::Red),
            Kind::Other => Style::default(),
        }
    }
}

struct LogLine {
    kind: Kind,
    stamp: String,
    text: String,
}

impl LogLine {
    fn to_line(&self) -> Line<'_> {
        Line::from(vec![
            Span::styled(self.stamp.as_str(), Style::default().fg(Color::DarkGray)),
            Span::styled(format!(" {} ", self.kind.marker()), self.kind.style()),
            Span::styled(self.text.as_str(), self.kind.style()),
        ])
    }
}

/// Activity viewer. `back` counts entries hidden below the view; zero means
/// the newest entry is visible and new ones keep it that way.
pub struct LogsPanel {
    reader: ActivityReader,
    lines: Vec<LogLine>,
    back: usize,
}

impl LogsPanel {
    pub fn new(reader: ActivityReader) -> Self {
        Self {
            reader,
            lines: Vec::new(),
            back: 0,
        }
    }

    /// Re-read the buffer. A scrolled-back view stays on the same entries as
    /// long as they are still buffered.
    pub fn refresh(&mut self) {
        let before = self.lines.len();
        self.lines = self
            .reader
            .entries()
            .iter()
            .map(|e| LogLine {
                kind: Kind::of(e),
                stamp: format!("{:>6.1}s", e.elapsed.as_secs_f64()),
                text: e.to_string(),
            })
            .collect();
        if self.back > 0 {
            self.back = (self.back + self.lines.len().saturating_sub(before)).min(self.max_back());
        }
    }

    fn max_back(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    fn following(&self) -> bool {
        self.back == 0
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let border = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let reveals = self
            .lines
            .iter()
            .filter(|l| l.kind == Kind::Revealed)
            .count();
        let title = if self.following() {
            format!(" Activity ({reveals} reveals) ")
        } else {
            format!(" Activity ({reveals} reveals) ↑{} ", self.back)
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border);

        if self.lines.is_empty() {
            let empty = Paragraph::new(" waiting for the first guess")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let height = usize::from(area.height.saturating_sub(2));
        let items: Vec<ListItem> = self.lines[window(self.lines.len(), height, self.back)]
            .iter()
            .map(|l| ListItem::new(l.to_line()))
            .collect();
        frame.render_widget(List::new(items).block(block), area);
    }
}

/// Indices of the `height` entries ending `back` entries before the newest.
fn window(total: usize, height: usize, back: usize) -> Range<usize> {
    let end = total.saturating_sub(back);
    end.saturating_sub(height)..end
}

impl PanelState for LogsPanel {
    fn scroll_down(&mut self, n: usize) {
        self.back = self.back.saturating_sub(n);
    }

    fn scroll_up(&mut self, n: usize) {
        self.back = (self.back + n).min(self.max_back());
    }

    fn scroll_to_top(&mut self) {
        self.back = self.max_back();
    }

    fn scroll_to_bottom(&mut self) {
        self.back = 0;
    }
}
