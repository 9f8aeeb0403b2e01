use std::sync::Arc;

use esg_core::ChartImage;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor(0, 0, 0);
    pub const WHITE: RgbColor = RgbColor(255, 255, 255);
    pub const BRAND_BLUE: RgbColor = RgbColor(59, 130, 246);
    pub const STRATEGY_GREEN: RgbColor = RgbColor(34, 197, 94);
    pub const SCOPE1_RED: RgbColor = RgbColor(239, 68, 68);
    pub const SCOPE2_ORANGE: RgbColor = RgbColor(249, 115, 22);
    pub const SCOPE3_YELLOW: RgbColor = RgbColor(234, 179, 8);
    pub const MUTED_GREY: RgbColor = RgbColor(128, 128, 128);
}

/// Font selection for a text run. Sizes are in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f64,
    pub bold: bool,
}

impl FontSpec {
    pub const fn regular(size: f64) -> Self {
        Self { size, bold: false }
    }

    pub const fn bold(size: f64) -> Self {
        Self { size, bold: true }
    }
}

/// A single drawing instruction. Coordinates are millimetres from the
/// top-left corner of the page; text `y` is the first line's baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f64,
        y: f64,
        lines: Vec<String>,
        font: FontSpec,
        color: RgbColor,
        line_height: f64,
    },
    FilledRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: RgbColor,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        image: Arc<ChartImage>,
    },
    /// Text centred horizontally on `center_x`.
    Footer {
        center_x: f64,
        y: f64,
        text: String,
        font: FontSpec,
        color: RgbColor,
    },
}

impl DrawOp {
    /// Lowest point the op reaches on the page.
    pub fn bottom(&self) -> f64 {
        match self {
            DrawOp::Text {
                y,
                lines,
                line_height,
                ..
            } => y + line_height * lines.len().saturating_sub(1) as f64,
            DrawOp::FilledRect { y, height, .. } | DrawOp::Image { y, height, .. } => y + height,
            DrawOp::Footer { y, .. } => *y,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn footer(&self) -> Option<&str> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Footer { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// All text lines on the page, footers excluded, in drawing order.
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().flat_map(|op| match op {
            DrawOp::Text { lines, .. } => lines.iter().map(String::as_str).collect::<Vec<_>>(),
            _ => Vec::new(),
        })
    }

    pub fn has_image(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, DrawOp::Image { .. }))
    }
}

/// A laid-out report, ready for a rendering backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    title: String,
    pages: Vec<Page>,
}

impl ReportDocument {
    pub(crate) fn new(title: String, pages: Vec<Page>) -> Self {
        Self { title, pages }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.pages
            .iter()
            .any(|p| p.text_lines().any(|line| line.contains(needle)))
    }
}
