use crate::document::{DrawOp, FontSpec, Page, RgbColor};
use crate::metrics;

/// Page geometry and spacing, all in millimetres except where noted.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    /// Estimated line height per point of font size.
    pub line_height_factor: f64,
    /// Space left after each text block.
    pub block_gap: f64,
    pub title_banner_height: f64,
    pub strategy_banner_height: f64,
    /// Distance from a banner's bottom edge to the first content baseline.
    pub banner_gap: f64,
    pub strategy_line_advance: f64,
    /// Footer baseline, measured up from the bottom edge.
    pub footer_offset: f64,
    pub chart_gap: f64,
    pub marker_size: f64,
    pub marker_indent: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 20.0,
            line_height_factor: 0.35,
            block_gap: 5.0,
            title_banner_height: 40.0,
            strategy_banner_height: 30.0,
            banner_gap: 10.0,
            strategy_line_advance: 5.0,
            footer_offset: 10.0,
            chart_gap: 15.0,
            marker_size: 5.0,
            marker_indent: 8.0,
        }
    }
}

impl LayoutConfig {
    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    /// Lowest y any content may reach.
    pub fn content_bottom(&self) -> f64 {
        self.page_height - self.margin
    }

    pub fn content_height(&self) -> f64 {
        self.page_height - 2.0 * self.margin
    }

    pub fn line_height(&self, font: FontSpec) -> f64 {
        font.size * self.line_height_factor
    }
}

/// Accumulates pages while tracking the vertical cursor.
pub(crate) struct PageWriter<'a> {
    config: &'a LayoutConfig,
    pages: Vec<Page>,
    y: f64,
}

impl<'a> PageWriter<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            pages: vec![Page::default()],
            y: config.margin,
        }
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    pub fn advance(&mut self, dy: f64) {
        self.y += dy;
    }

    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = self.config.margin;
    }

    pub fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Start a new page if `extent` does not fit below the cursor.
    pub fn ensure_space(&mut self, extent: f64) {
        if self.y + extent > self.config.content_bottom() {
            self.new_page();
        }
    }

    /// Wrap `text` to the content width and place it as one block at the
    /// margin, breaking the page first if the block would overflow.
    pub fn add_text(&mut self, text: &str, font: FontSpec, color: RgbColor) {
        self.add_text_at(self.config.margin, text, font, color, None);
    }

    /// Like `add_text`, with a coloured square to the left of the first line.
    pub fn add_marked_text(&mut self, text: &str, font: FontSpec, marker: RgbColor) {
        let x = self.config.margin + self.config.marker_indent;
        self.add_text_at(x, text, font, RgbColor::BLACK, Some(marker));
    }

    fn add_text_at(
        &mut self,
        x: f64,
        text: &str,
        font: FontSpec,
        color: RgbColor,
        marker: Option<RgbColor>,
    ) {
        let width = self.config.page_width - self.config.margin - x;
        let lines = metrics::wrap(text, width, font.size, font.bold);
        let line_height = self.config.line_height(font);
        let extent = lines.len() as f64 * line_height;

        if extent > self.config.content_height() {
            // Taller than a whole page: fall back to per-line placement.
            self.add_lines(x, lines, font, color, line_height);
            self.advance(self.config.block_gap);
            return;
        }

        self.ensure_space(extent);
        if let Some(marker) = marker {
            let size = self.config.marker_size;
            self.push(DrawOp::FilledRect {
                x: self.config.margin,
                y: self.y - 3.0,
                width: size,
                height: size,
                color: marker,
            });
        }
        self.push(DrawOp::Text {
            x,
            y: self.y,
            lines,
            font,
            color,
            line_height,
        });
        self.advance(extent + self.config.block_gap);
    }

    /// Place lines one at a time with a fixed advance, breaking the page
    /// whenever the next line would cross the bottom margin. Consecutive
    /// lines on the same page share one text op.
    pub fn add_lines(
        &mut self,
        x: f64,
        lines: Vec<String>,
        font: FontSpec,
        color: RgbColor,
        advance: f64,
    ) {
        let mut run: Vec<String> = Vec::new();
        let mut run_y = self.y;

        for line in lines {
            if self.y + advance > self.config.content_bottom() {
                self.flush_run(x, run_y, &mut run, font, color, advance);
                self.new_page();
            }
            if run.is_empty() {
                run_y = self.y;
            }
            run.push(line);
            self.y += advance;
        }
        self.flush_run(x, run_y, &mut run, font, color, advance);
    }

    fn flush_run(
        &mut self,
        x: f64,
        y: f64,
        run: &mut Vec<String>,
        font: FontSpec,
        color: RgbColor,
        line_height: f64,
    ) {
        if run.is_empty() {
            return;
        }
        self.push(DrawOp::Text {
            x,
            y,
            lines: std::mem::take(run),
            font,
            color,
            line_height,
        });
    }

    pub fn finish(self) -> Vec<Page> {
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_block_advances_by_estimate_plus_gap() {
        let config = LayoutConfig::default();
        let mut writer = PageWriter::new(&config);
        writer.add_text("Company: Acme", FontSpec::regular(10.0), RgbColor::BLACK);
        assert!((writer.y() - (20.0 + 3.5 + 5.0)).abs() < 1e-9);
        assert_eq!(writer.finish().len(), 1);
    }

    #[test]
    fn overflowing_block_moves_to_next_page() {
        let config = LayoutConfig::default();
        let mut writer = PageWriter::new(&config);
        writer.set_y(config.content_bottom() - 1.0);
        writer.add_text("Reporting Year: 2024", FontSpec::regular(11.0), RgbColor::BLACK);

        let pages = writer.finish();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].ops.is_empty());
        match &pages[1].ops[0] {
            DrawOp::Text { y, .. } => assert_eq!(*y, config.margin),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn marker_square_sits_beside_first_line() {
        let config = LayoutConfig::default();
        let mut writer = PageWriter::new(&config);
        writer.set_y(100.0);
        writer.add_marked_text("Scope 1", FontSpec::regular(11.0), RgbColor::SCOPE1_RED);
        let pages = writer.finish();
        assert_eq!(
            pages[0].ops[0],
            DrawOp::FilledRect {
                x: 20.0,
                y: 97.0,
                width: 5.0,
                height: 5.0,
                color: RgbColor::SCOPE1_RED,
            }
        );
        assert!(matches!(pages[0].ops[1], DrawOp::Text { x, .. } if x == 28.0));
    }

    #[test]
    fn line_runs_split_across_pages() {
        let config = LayoutConfig::default();
        let mut writer = PageWriter::new(&config);
        let lines: Vec<String> = (0..100).map(|i| format!("line {i}")).collect();
        writer.add_lines(20.0, lines, FontSpec::regular(10.0), RgbColor::BLACK, 5.0);
        let pages = writer.finish();
        assert!(pages.len() >= 2);

        let total: usize = pages.iter().map(|p| p.text_lines().count()).sum();
        assert_eq!(total, 100);
        for page in &pages {
            for op in &page.ops {
                assert!(op.bottom() <= config.content_bottom());
            }
        }
    }

    #[test]
    fn giant_block_is_placed_line_by_line() {
        let config = LayoutConfig::default();
        let mut writer = PageWriter::new(&config);
        let text = vec!["x"; 200].join("\n");
        writer.add_text(&text, FontSpec::regular(10.0), RgbColor::BLACK);
        let pages = writer.finish();
        assert!(pages.len() >= 2);
        let total: usize = pages.iter().map(|p| p.text_lines().count()).sum();
        assert_eq!(total, 200);
    }
}
