//! Guesses panel: revealed words with their counts, newest first.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use redactle_core::session::RevealedWord;

use super::{PanelState, TopScroll};

#[derive(Debug, Default)]
pub struct GuessesPanel {
    entries: Vec<RevealedWord>,
    scroll: TopScroll,
}

impl GuessesPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list. New guesses land on top, so scroll resets.
    pub fn update(&mut self, entries: Vec<RevealedWord>) {
        self.scroll.set_len(entries.len());
        self.scroll.scroll_to_top();
        self.entries = entries;
    }

    pub fn entries(&self) -> &[RevealedWord] {
        &self.entries
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let border = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let block = Block::default()
            .title(format!(" Guesses ({}) ", self.entries.len()))
            .borders(Borders::ALL)
            .border_style(border);

        if self.entries.is_empty() {
            let empty = Paragraph::new("  (no guesses yet)")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .skip(self.scroll.offset)
            .map(|entry| {
                let count_style = if entry.count == 0 {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().fg(Color::Green)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:>4} ", entry.count), count_style),
                    Span::raw(entry.word.clone()),
                ]))
            })
            .collect();
        frame.render_widget(List::new(items).block(block), area);
    }
}

impl PanelState for GuessesPanel {
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
