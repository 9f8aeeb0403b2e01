//! Report assembly for the ESG service.
//!
//! [`ReportAssembler`] lays a record, an optional chart and an optional
//! strategy out into a backend-neutral [`ReportDocument`]; [`render_pdf`]
//! turns that into PDF bytes.

mod assemble;
mod document;
mod layout;
pub mod metrics;
mod pdf;

pub use assemble::{footer_text, ReportAssembler, CHART_PLACEHOLDER};
pub use document::{DrawOp, FontSpec, Page, ReportDocument, RgbColor};
pub use layout::LayoutConfig;
pub use pdf::render_pdf;

use esg_core::EsgData;

/// `ESG_Report_<company>_<year>.pdf`, with each whitespace run in the
/// company name collapsed to one underscore. Path separators and quotes are
/// replaced as well so the name is safe as a file name and in headers.
pub fn report_filename(data: &EsgData) -> String {
    let mut name = String::with_capacity(data.company_name.len());
    let mut in_space = false;
    for c in data.company_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        match c {
            '/' | '\\' | '"' => name.push('_'),
            c => name.push(c),
        }
    }
    format!("ESG_Report_{name}_{}.pdf", data.reporting_year)
}
