//! TUI panel implementations.

mod guesses;
mod logs;
mod puzzle;

pub use guesses::GuessesPanel;
pub use logs::LogsPanel;
pub use puzzle::{PuzzleContent, PuzzlePanel};

/// Trait for panels that support scrolling.
pub trait PanelState {
    fn scroll_down(&mut self, n: usize);

    fn scroll_up(&mut self, n: usize);

    fn scroll_to_top(&mut self);

    fn scroll_to_bottom(&mut self);
}

/// Scroll position measured from the first line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TopScroll {
    pub offset: usize,
    pub len: usize,
}

impl TopScroll {
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.offset = self.offset.min(self.max());
    }

    fn max(&self) -> usize {
        self.len.saturating_sub(1)
    }
}

impl PanelState for TopScroll {
    fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max());
    }

    fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    fn scroll_to_bottom(&mut self) {
        self.offset = self.max();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_scroll_clamps() {
        let mut s = TopScroll::default();
        s.scroll_down(3);
        assert_eq!(s.offset, 0);

        s.set_len(10);
        s.scroll_down(4);
        assert_eq!(s.offset, 4);
        s.scroll_down(100);
        assert_eq!(s.offset, 9);
        s.scroll_up(2);
        assert_eq!(s.offset, 7);
        s.scroll_up(100);
        assert_eq!(s.offset, 0);
        s.scroll_to_bottom();
        assert_eq!(s.offset, 9);

        s.set_len(3);
        assert_eq!(s.offset, 2);
        s.scroll_to_top();
        assert_eq!(s.offset, 0);
    }
}
