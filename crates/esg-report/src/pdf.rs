use std::io::Cursor;

use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::image_crate::ImageDecoder;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfLayerReference, Rect, Rgb,
};

use esg_core::{ChartImage, EsgError};

use crate::assemble::CHART_PLACEHOLDER;
use crate::document::{DrawOp, FontSpec, ReportDocument, RgbColor};
use crate::layout::LayoutConfig;
use crate::metrics;

const CHART_DPI: f32 = 300.0;
const LAYER_NAME: &str = "Layer 1";

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn pick(&self, font: FontSpec) -> &IndirectFontRef {
        if font.bold {
            &self.bold
        } else {
            &self.regular
        }
    }
}

fn render_err(e: impl std::fmt::Display) -> EsgError {
    EsgError::Render(e.to_string())
}

/// Serialise a laid-out report to PDF bytes using the builtin Helvetica
/// faces.
pub fn render_pdf(doc: &ReportDocument, config: &LayoutConfig) -> Result<Vec<u8>, EsgError> {
    let (width, height) = (Mm(config.page_width as f32), Mm(config.page_height as f32));
    let (pdf, first_page, first_layer) = PdfDocument::new(doc.title(), width, height, LAYER_NAME);

    let fonts = Fonts {
        regular: pdf.add_builtin_font(BuiltinFont::Helvetica).map_err(render_err)?,
        bold: pdf.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render_err)?,
    };

    for (i, page) in doc.pages().iter().enumerate() {
        let layer = if i == 0 {
            pdf.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = pdf.add_page(width, height, LAYER_NAME);
            pdf.get_page(page_idx).get_layer(layer_idx)
        };
        let canvas = Canvas {
            layer,
            fonts: &fonts,
            page_height: config.page_height,
        };
        for op in &page.ops {
            canvas.draw(op);
        }
    }

    let bytes = pdf.save_to_bytes().map_err(render_err)?;
    tracing::info!(
        target: "esg_report",
        pages = doc.page_count(),
        bytes = bytes.len(),
        "rendered pdf"
    );
    Ok(bytes)
}

/// One page's layer plus the conversion from top-left to PDF coordinates.
struct Canvas<'a> {
    layer: PdfLayerReference,
    fonts: &'a Fonts,
    page_height: f64,
}

impl Canvas<'_> {
    fn flip(&self, y: f64) -> Mm {
        Mm((self.page_height - y) as f32)
    }

    fn fill(&self, color: RgbColor) {
        let RgbColor(r, g, b) = color;
        self.layer.set_fill_color(Color::Rgb(Rgb::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            None,
        )));
    }

    fn text(&self, text: &str, x: f64, y: f64, font: FontSpec) {
        self.layer.use_text(
            pdf_text(text),
            font.size as f32,
            Mm(x as f32),
            self.flip(y),
            self.fonts.pick(font),
        );
    }

    fn draw(&self, op: &DrawOp) {
        match op {
            DrawOp::Text {
                x,
                y,
                lines,
                font,
                color,
                line_height,
            } => {
                self.fill(*color);
                for (i, line) in lines.iter().enumerate() {
                    if !line.is_empty() {
                        self.text(line, *x, y + line_height * i as f64, *font);
                    }
                }
            }
            DrawOp::FilledRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                self.fill(*color);
                let rect = Rect::new(
                    Mm(*x as f32),
                    self.flip(y + height),
                    Mm((x + width) as f32),
                    self.flip(*y),
                )
                .with_mode(PaintMode::Fill);
                self.layer.add_rect(rect);
            }
            DrawOp::Image {
                x,
                y,
                width,
                height,
                image,
            } => {
                if let Err(e) = self.image(image, *x, *y, *width, *height) {
                    tracing::warn!(target: "esg_report", error = %e, "chart not embedded");
                    self.fill(RgbColor::BLACK);
                    self.text(CHART_PLACEHOLDER, *x, y + 5.0, FontSpec::regular(10.0));
                }
            }
            DrawOp::Footer {
                center_x,
                y,
                text,
                font,
                color,
            } => {
                self.fill(*color);
                self.text(text, centered_x(text, *center_x, *font), *y, *font);
            }
        }
    }

    fn image(
        &self,
        chart: &ChartImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), EsgError> {
        let decoder = PngDecoder::new(Cursor::new(chart.bytes.as_slice())).map_err(render_err)?;
        let (px_w, px_h) = decoder.dimensions();
        if px_w == 0 || px_h == 0 {
            return Err(EsgError::Render("chart has no pixels".to_string()));
        }
        let image = Image::try_from(decoder).map_err(render_err)?;

        // Natural size at CHART_DPI, in millimetres.
        let natural_w = px_w as f32 / CHART_DPI * 25.4;
        let natural_h = px_h as f32 / CHART_DPI * 25.4;
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x as f32)),
                translate_y: Some(self.flip(y + height)),
                scale_x: Some(width as f32 / natural_w),
                scale_y: Some(height as f32 / natural_h),
                dpi: Some(CHART_DPI),
                ..Default::default()
            },
        );
        Ok(())
    }
}

/// Left edge that centres `text` on `center_x`, measured as it will be drawn.
fn centered_x(text: &str, center_x: f64, font: FontSpec) -> f64 {
    center_x - metrics::text_width(&pdf_text(text), font.size, font.bold) / 2.0
}

/// Map text onto what the builtin (WinAnsi) fonts can show.
fn pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '₂' => out.push('2'),
            '°' => out.push_str(" deg"),
            '‘' | '’' => out.push('\''),
            '“' | '”' => out.push('"'),
            '–' | '—' => out.push('-'),
            '•' => out.push('-'),
            c if c.is_ascii() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}
