use esg_core::{EsgData, UNIT};

pub fn system_prompt() -> String {
    "You are an ESG (Environmental, Social, and Governance) consultant. \
You write emissions-reduction strategies for companies based on their reported \
greenhouse-gas figures.\n\n\
Every strategy you write must be specific, actionable, and reference the actual \
emission numbers you are given.\n\n\
Output ONLY a JSON object with exactly these string fields: \
{\"short\": \"...\", \"neutral\": \"...\", \"detailed\": \"...\"}. \
No commentary before or after the JSON."
        .to_string()
}

/// Compact description of the record plus the three variant requirements.
pub fn user_message(data: &EsgData) -> String {
    let mut out = String::with_capacity(1024);

    out.push_str("Generate THREE different ESG strategy variants for the following company data:\n\n");
    out.push_str(&format!("Company: {}\n", data.company_name));
    out.push_str(&format!("Reporting Year: {}\n", data.reporting_year));
    out.push_str(&format!("Scope 1 Emissions: {} {UNIT}\n", data.scope1_tco2e));
    out.push_str(&format!("Scope 2 Emissions: {} {UNIT}\n", data.scope2_tco2e));
    if let Some(s3) = data.scope3() {
        out.push_str(&format!("Scope 3 Emissions: {s3} {UNIT}\n"));
    }
    out.push_str(&format!("Total Emissions: {:.2} {UNIT}\n", data.total()));
    if let Some(kwh) = data.energy_consumption_kwh.filter(|v| *v > 0.0) {
        out.push_str(&format!("Energy Consumption: {kwh} kWh\n"));
    }
    if let Some(notes) = data.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        out.push_str(&format!("Notes: {notes}\n"));
    }

    out.push_str(
        "\nEach variant MUST reference the specific emission numbers provided above:\n\n\
1. SHORT (2-4 sentences): Brief summary with key action points\n\
2. NEUTRAL (5-8 sentences): Balanced strategy with medium detail\n\
3. DETAILED: Comprehensive strategy with structured sections including current state \
analysis, short-term actions (0-12 months), medium-term initiatives (1-3 years), and \
long-term goals (3-5 years)\n\n\
Format your response EXACTLY as JSON:\n\
{\n  \"short\": \"your short strategy here\",\n  \"neutral\": \"your neutral strategy here\",\n  \"detailed\": \"your detailed strategy here\"\n}",
    );

    out
}
