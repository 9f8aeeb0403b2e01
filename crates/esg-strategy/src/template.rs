use esg_core::{EsgData, StrategyTexts, UNIT};

/// Deterministic strategy texts built from the record alone.
pub fn render(data: &EsgData) -> StrategyTexts {
    StrategyTexts {
        short: short(data),
        neutral: neutral(data),
        detailed: detailed(data),
    }
}

fn short(data: &EsgData) -> String {
    let focus = if data.scope1_tco2e > data.scope2_tco2e { 1 } else { 2 };
    let mut breakdown = format!(
        "Scope 1: {:.2} {UNIT}, Scope 2: {:.2} {UNIT}",
        data.scope1_tco2e, data.scope2_tco2e
    );
    if let Some(s3) = data.scope3() {
        breakdown.push_str(&format!(", Scope 3: {s3:.2} {UNIT}"));
    }
    format!(
        "{name} reported {total:.2} {UNIT} total emissions in {year} ({breakdown}). \
Focus on reducing Scope {focus} emissions through energy efficiency improvements and \
renewable energy adoption.",
        name = data.company_name,
        total = data.total(),
        year = data.reporting_year,
    )
}

fn neutral(data: &EsgData) -> String {
    let scope3 = data
        .scope3()
        .map(|s3| format!(", plus {s3:.2} {UNIT} in Scope 3"))
        .unwrap_or_default();
    format!(
        "For {year}, {name} recorded total emissions of {total:.2} {UNIT}, comprising \
{s1:.2} {UNIT} in Scope 1 and {s2:.2} {UNIT} in Scope 2{scope3}. To achieve meaningful \
reduction, we recommend implementing a phased approach: transitioning to renewable energy \
sources, optimizing operational efficiency, and engaging suppliers in sustainability \
initiatives. Setting science-based targets aligned with a 1.5°C pathway will demonstrate \
commitment to climate action.",
        year = data.reporting_year,
        name = data.company_name,
        total = data.total(),
        s1 = data.scope1_tco2e,
        s2 = data.scope2_tco2e,
    )
}

fn detailed(data: &EsgData) -> String {
    let total = data.total();
    let mut profile = format!(
        "- Scope 1 (Direct): {:.2} {UNIT} ({:.1}%)\n- Scope 2 (Energy): {:.2} {UNIT} ({:.1}%)\n",
        data.scope1_tco2e,
        percent(data.scope1_tco2e, total),
        data.scope2_tco2e,
        percent(data.scope2_tco2e, total),
    );
    if let Some(s3) = data.scope3() {
        profile.push_str(&format!(
            "- Scope 3 (Value Chain): {s3:.2} {UNIT} ({:.1}%)\n",
            percent(s3, total)
        ));
    }
    profile.push_str(&format!("- **Total: {total:.2} {UNIT}**"));

    format!(
        "## Comprehensive ESG Strategy for {name} ({year})

**Current Emissions Profile:**
{profile}

**Strategic Recommendations:**

1. **Immediate Actions (0-12 months):**
   - Conduct comprehensive energy audit of all facilities
   - Switch to 100% renewable energy procurement for purchased electricity
   - Implement LED lighting and HVAC optimization
   - Establish baseline metrics and monitoring systems

2. **Medium-term Initiatives (1-3 years):**
   - Invest in on-site renewable energy (solar panels, wind)
   - Electrify vehicle fleet and logistics operations
   - Engage top suppliers in emissions reduction programs
   - Achieve ISO 14001 environmental management certification

3. **Long-term Transformation (3-5 years):**
   - Set Science-Based Targets aligned with 1.5°C pathway
   - Achieve carbon neutrality through verified offsets
   - Integrate circular economy principles into product design
   - Publish annual sustainability reports with third-party verification

**Expected Impact:** These measures could reduce total emissions by 40-60% by {horizon}, \
positioning {name} as an industry leader in climate action.",
        name = data.company_name,
        year = data.reporting_year,
        horizon = data.reporting_year + 5,
    )
}

fn percent(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}
