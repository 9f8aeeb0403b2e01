use std::sync::Arc;

use chrono::{Local, NaiveDate};
use esg_core::{ChartImage, EsgData, StrategySelection, UNIT};

use crate::document::{DrawOp, FontSpec, ReportDocument, RgbColor};
use crate::layout::{LayoutConfig, PageWriter};

/// Drawn in place of the chart whenever no usable image is available.
pub const CHART_PLACEHOLDER: &str = "(Chart could not be captured)";

const HEADING: FontSpec = FontSpec::bold(18.0);
const BODY: FontSpec = FontSpec::regular(11.0);
const BODY_BOLD: FontSpec = FontSpec::bold(11.0);
const PLACEHOLDER: FontSpec = FontSpec::regular(10.0);
const STRATEGY_LABEL: FontSpec = FontSpec::bold(14.0);
const STRATEGY_BODY: FontSpec = FontSpec::regular(10.0);
const FOOTER: FontSpec = FontSpec::regular(8.0);

/// Lays out ESG reports. Holds the page geometry and the date printed in
/// the title banner.
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    config: LayoutConfig,
    generated_on: NaiveDate,
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl ReportAssembler {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            generated_on: Local::now().date_naive(),
        }
    }

    pub fn with_generated_on(mut self, date: NaiveDate) -> Self {
        self.generated_on = date;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out the full report. Never fails: a missing or unusable chart is
    /// replaced by a placeholder line.
    pub fn assemble(
        &self,
        data: &EsgData,
        chart: Option<&ChartImage>,
        strategy: Option<&StrategySelection>,
    ) -> ReportDocument {
        let mut w = PageWriter::new(&self.config);

        self.title_banner(&mut w);
        company_section(&mut w, data);
        emissions_section(&mut w, data);
        self.chart_section(&mut w, chart);
        if let Some(strategy) = strategy {
            self.strategy_section(&mut w, strategy);
        }

        let mut pages = w.finish();
        let count = pages.len();
        for (i, page) in pages.iter_mut().enumerate() {
            page.ops.push(DrawOp::Footer {
                center_x: self.config.page_width / 2.0,
                y: self.config.page_height - self.config.footer_offset,
                text: footer_text(i + 1, count, data),
                font: FOOTER,
                color: RgbColor::MUTED_GREY,
            });
        }

        ReportDocument::new(
            format!("{} ESG Report {}", data.company_name, data.reporting_year),
            pages,
        )
    }

    fn title_banner(&self, w: &mut PageWriter<'_>) {
        let c = &self.config;
        w.push(DrawOp::FilledRect {
            x: 0.0,
            y: 0.0,
            width: c.page_width,
            height: c.title_banner_height,
            color: RgbColor::BRAND_BLUE,
        });
        w.push(banner_text(c.margin, 25.0, "ESG Report", FontSpec::bold(24.0)));
        w.push(banner_text(
            c.margin,
            33.0,
            &format!("Generated: {}", self.generated_on.format("%Y-%m-%d")),
            FontSpec::bold(12.0),
        ));
        w.set_y(c.title_banner_height + c.banner_gap);
    }

    fn chart_section(&self, w: &mut PageWriter<'_>, chart: Option<&ChartImage>) {
        w.add_text("Emissions Chart", HEADING, RgbColor::BLACK);

        let Some(chart) = chart.filter(|c| c.is_usable()) else {
            if chart.is_some() {
                tracing::warn!(target: "esg_report", "chart image unusable, drawing placeholder");
            }
            w.add_text(CHART_PLACEHOLDER, PLACEHOLDER, RgbColor::BLACK);
            return;
        };

        let c = &self.config;
        let mut width = c.content_width();
        let mut height = f64::from(chart.height_px) * width / f64::from(chart.width_px);
        if height > c.content_height() {
            width *= c.content_height() / height;
            height = c.content_height();
        }

        w.ensure_space(height);
        w.push(DrawOp::Image {
            x: c.margin,
            y: w.y(),
            width,
            height,
            image: Arc::new(chart.clone()),
        });
        w.advance(height + c.chart_gap);
    }

    fn strategy_section(&self, w: &mut PageWriter<'_>, strategy: &StrategySelection) {
        let c = &self.config;
        w.new_page();
        w.push(DrawOp::FilledRect {
            x: 0.0,
            y: 0.0,
            width: c.page_width,
            height: c.strategy_banner_height,
            color: RgbColor::STRATEGY_GREEN,
        });
        w.push(banner_text(c.margin, 20.0, "ESG Strategy", FontSpec::bold(20.0)));
        w.set_y(c.strategy_banner_height + c.banner_gap);

        w.add_text(strategy.variant.label(), STRATEGY_LABEL, RgbColor::BLACK);

        let lines = crate::metrics::wrap(
            &strategy.content,
            c.content_width(),
            STRATEGY_BODY.size,
            STRATEGY_BODY.bold,
        );
        w.add_lines(
            c.margin,
            lines,
            STRATEGY_BODY,
            RgbColor::BLACK,
            c.strategy_line_advance,
        );
    }
}

fn company_section(w: &mut PageWriter<'_>, data: &EsgData) {
    w.add_text("Company Information", HEADING, RgbColor::BLACK);
    w.add_text(&format!("Company: {}", data.company_name), BODY, RgbColor::BLACK);
    w.add_text(
        &format!("Reporting Year: {}", data.reporting_year),
        BODY,
        RgbColor::BLACK,
    );
}

fn emissions_section(w: &mut PageWriter<'_>, data: &EsgData) {
    w.add_text("Emissions Data", HEADING, RgbColor::BLACK);

    w.add_marked_text(
        &format!("Scope 1 (Direct Emissions): {:.2} {UNIT}", data.scope1_tco2e),
        BODY,
        RgbColor::SCOPE1_RED,
    );
    w.add_marked_text(
        &format!("Scope 2 (Energy Indirect): {:.2} {UNIT}", data.scope2_tco2e),
        BODY,
        RgbColor::SCOPE2_ORANGE,
    );
    if let Some(s3) = data.scope3() {
        w.add_marked_text(
            &format!("Scope 3 (Value Chain): {s3:.2} {UNIT}"),
            BODY,
            RgbColor::SCOPE3_YELLOW,
        );
    }

    w.add_text(
        &format!("Total Emissions: {:.2} {UNIT}", data.total()),
        BODY_BOLD,
        RgbColor::BLACK,
    );
}

fn banner_text(x: f64, y: f64, text: &str, font: FontSpec) -> DrawOp {
    DrawOp::Text {
        x,
        y,
        lines: vec![text.to_string()],
        font,
        color: RgbColor::WHITE,
        line_height: 0.0,
    }
}

pub fn footer_text(page: usize, count: usize, data: &EsgData) -> String {
    format!(
        "Page {page} of {count} | {} ESG Report {}",
        data.company_name, data.reporting_year
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use esg_core::StrategyVariant;

    fn acme() -> EsgData {
        EsgData {
            company_name: "Acme".to_string(),
            reporting_year: 2024,
            scope1_tco2e: 120.5,
            scope2_tco2e: 80.25,
            scope3_tco2e: Some(0.0),
            energy_consumption_kwh: None,
            notes: None,
        }
    }

    fn chart(width_px: u32, height_px: u32) -> ChartImage {
        ChartImage {
            width_px,
            height_px,
            bytes: vec![1, 2, 3],
        }
    }

    fn selection(variant: StrategyVariant, content: String) -> StrategySelection {
        StrategySelection { variant, content }
    }

    fn assembler() -> ReportAssembler {
        ReportAssembler::default()
            .with_generated_on(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
    }

    fn assert_footers(doc: &ReportDocument) {
        let n = doc.page_count();
        assert!(n >= 1);
        for (i, page) in doc.pages().iter().enumerate() {
            let expected = format!("Page {} of {n} | Acme ESG Report 2024", i + 1);
            assert_eq!(page.footer(), Some(expected.as_str()));
        }
    }

    #[test]
    fn minimal_report_is_one_page() {
        let doc = assembler().assemble(&acme(), Some(&chart(800, 400)), None);
        assert_eq!(doc.page_count(), 1);
        assert_footers(&doc);
        assert!(doc.contains_text("Generated: 2024-06-10"));
        assert!(doc.contains_text("Company: Acme"));
        assert!(doc.contains_text("Reporting Year: 2024"));
        assert!(doc.contains_text("Scope 1 (Direct Emissions): 120.50 tCO₂e"));
        assert!(doc.contains_text("Scope 2 (Energy Indirect): 80.25 tCO₂e"));
        assert!(doc.contains_text("Total Emissions: 200.75 tCO₂e"));
        assert!(!doc.contains_text("Scope 3"));
        assert!(!doc.contains_text("%"));
        assert!(doc.pages()[0].has_image());
    }

    #[test]
    fn title_banner_spans_page_width() {
        let doc = assembler().assemble(&acme(), None, None);
        assert_eq!(
            doc.pages()[0].ops[0],
            DrawOp::FilledRect {
                x: 0.0,
                y: 0.0,
                width: 210.0,
                height: 40.0,
                color: RgbColor::BRAND_BLUE,
            }
        );
    }

    #[test]
    fn scope_markers_use_scope_colors() {
        let mut data = acme();
        data.scope3_tco2e = Some(12.25);
        let doc = assembler().assemble(&data, None, None);
        assert!(doc.contains_text("Scope 3 (Value Chain): 12.25 tCO₂e"));
        assert!(doc.contains_text("Total Emissions: 213.00 tCO₂e"));

        let markers: Vec<RgbColor> = doc.pages()[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FilledRect { width, color, .. } if *width == 5.0 => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(
            markers,
            vec![
                RgbColor::SCOPE1_RED,
                RgbColor::SCOPE2_ORANGE,
                RgbColor::SCOPE3_YELLOW
            ]
        );
    }

    #[test]
    fn missing_chart_draws_placeholder() {
        let doc = assembler().assemble(&acme(), None, None);
        assert!(doc.contains_text(CHART_PLACEHOLDER));
        assert!(doc.pages().iter().all(|p| !p.has_image()));
    }

    #[test]
    fn unusable_chart_draws_placeholder() {
        let doc = assembler().assemble(&acme(), Some(&chart(0, 400)), None);
        assert!(doc.contains_text(CHART_PLACEHOLDER));
        assert!(doc.pages().iter().all(|p| !p.has_image()));
    }

    #[test]
    fn chart_keeps_aspect_ratio_at_content_width() {
        let doc = assembler().assemble(&acme(), Some(&chart(1000, 500)), None);
        let image = doc.pages()[0]
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Image { x, width, height, .. } => Some((*x, *width, *height)),
                _ => None,
            })
            .unwrap();
        assert_eq!(image, (20.0, 170.0, 85.0));
    }

    #[test]
    fn tall_chart_moves_to_new_page_top() {
        let doc = assembler().assemble(&acme(), Some(&chart(1000, 1400)), None);
        assert_eq!(doc.page_count(), 2);
        assert!(!doc.pages()[0].has_image());
        match doc.pages()[1].ops.first() {
            Some(DrawOp::Image { x, y, width, height, .. }) => {
                assert_eq!((*x, *y), (20.0, 20.0));
                assert!((width - 170.0).abs() < 1e-9);
                assert!((height - 238.0).abs() < 1e-9);
            }
            other => panic!("expected image, got {other:?}"),
        }
        assert_footers(&doc);
    }

    #[test]
    fn chart_taller_than_page_is_shrunk() {
        let doc = assembler().assemble(&acme(), Some(&chart(100, 1000)), None);
        let config = LayoutConfig::default();
        for page in doc.pages() {
            for op in &page.ops {
                if let DrawOp::Image { width, height, .. } = op {
                    assert!((height - config.content_height()).abs() < 1e-9);
                    assert!((width - 25.7).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn strategy_section_starts_new_page() {
        let without = assembler().assemble(&acme(), Some(&chart(800, 400)), None);
        let strategy = selection(StrategyVariant::Short, "Cut Scope 1 emissions.".to_string());
        let with = assembler().assemble(&acme(), Some(&chart(800, 400)), Some(&strategy));

        assert!(with.page_count() > without.page_count());
        assert_footers(&with);

        let last = with.pages().last().unwrap();
        assert_eq!(
            last.ops[0],
            DrawOp::FilledRect {
                x: 0.0,
                y: 0.0,
                width: 210.0,
                height: 30.0,
                color: RgbColor::STRATEGY_GREEN,
            }
        );
        let lines: Vec<&str> = last.text_lines().collect();
        assert_eq!(
            lines,
            vec![
                "ESG Strategy",
                "Short Strategy (2-4 sentences)",
                "Cut Scope 1 emissions."
            ]
        );
    }

    #[test]
    fn long_strategy_paginates_within_margins() {
        let content = (0..60)
            .map(|i| format!("Paragraph {i}: reduce emissions across facilities and suppliers with measurable annual targets."))
            .collect::<Vec<_>>()
            .join("\n\n");
        let strategy = selection(StrategyVariant::Detailed, content);
        let doc = assembler().assemble(&acme(), None, Some(&strategy));

        assert!(doc.page_count() >= 4);
        assert_footers(&doc);
        let bottom = LayoutConfig::default().content_bottom();
        for page in doc.pages() {
            for op in &page.ops {
                if !matches!(op, DrawOp::Footer { .. }) {
                    assert!(op.bottom() <= bottom, "op below margin: {op:?}");
                }
            }
        }
        assert!(doc.contains_text("Paragraph 59:"));
        assert!(doc.contains_text("Detailed Strategy"));
    }

    #[test]
    fn footers_are_centred_near_bottom() {
        let doc = assembler().assemble(&acme(), None, None);
        let footer = doc.pages()[0].ops.last().unwrap();
        assert_eq!(
            footer,
            &DrawOp::Footer {
                center_x: 105.0,
                y: 287.0,
                text: "Page 1 of 1 | Acme ESG Report 2024".to_string(),
                font: FontSpec::regular(8.0),
                color: RgbColor::MUTED_GREY,
            }
        );
    }
}
