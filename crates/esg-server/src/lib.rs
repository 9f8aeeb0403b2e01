//! HTTP surface and CLI plumbing for the ESG report service.

pub mod cli;
mod error;
mod routes;

pub use error::ApiError;
pub use routes::{router, AppState};

use esg_core::{ChartImage, EsgError, EsgStore};
use esg_report::{render_pdf, report_filename, LayoutConfig, ReportAssembler};

/// Assemble and render the report for whatever is currently stored.
///
/// Returns the download filename alongside the PDF bytes. Fails with a
/// validation error when no ESG data has been saved yet.
pub fn render_stored_report(
    store: &EsgStore,
    layout: LayoutConfig,
    chart: Option<&ChartImage>,
) -> Result<(String, Vec<u8>), EsgError> {
    let stored = store
        .get_esg_data()?
        .ok_or_else(|| EsgError::validation("esg_data", "no ESG data has been saved"))?;
    let selection = store.get_selected_strategy()?.map(|s| s.selection);

    let assembler = ReportAssembler::new(layout);
    let doc = assembler.assemble(&stored.data, chart, selection.as_ref());
    let pdf = render_pdf(&doc, assembler.config())?;
    let filename = report_filename(&stored.data);

    tracing::info!(
        target: "esg_server",
        %filename,
        pages = doc.page_count(),
        with_strategy = selection.is_some(),
        "report rendered"
    );
    Ok((filename, pdf))
}
