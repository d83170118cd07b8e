use ratatui::text::Line;

/// Scrollable window over pre-rendered lines
#[derive(Debug, Default)]
pub struct Viewport {
    lines: Vec<Line<'static>>,
    /// Index of the first visible line
    offset: usize,
    width: usize,
    height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Replace the content, keeping the offset when it is still in range
    pub fn set_content(&mut self, lines: Vec<Line<'static>>) {
        self.lines = lines;
        if self.offset > self.max_offset() {
            self.goto_bottom();
        }
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height)
    }

    /// Scroll up by `n` lines
    pub fn line_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    /// Scroll down by `n` lines
    pub fn line_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub fn half_page_up(&mut self) {
        self.line_up((self.height / 2).max(1));
    }

    pub fn half_page_down(&mut self) {
        self.line_down((self.height / 2).max(1));
    }

    pub fn goto_top(&mut self) {
        self.offset = 0;
    }

    pub fn goto_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    /// Fraction scrolled in `0.0..=1.0`; content that fits counts as fully scrolled
    pub fn scroll_percent(&self) -> f64 {
        let max = self.max_offset();
        if max == 0 {
            return 1.0;
        }
        (self.offset as f64 / max as f64).clamp(0.0, 1.0)
    }

    /// Lines currently inside the window
    pub fn visible_lines(&self) -> &[Line<'static>] {
        let end = (self.offset + self.height).min(self.lines.len());
        &self.lines[self.offset.min(end)..end]
    }
}
