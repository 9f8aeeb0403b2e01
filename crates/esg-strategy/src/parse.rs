use esg_core::{EsgError, StrategyTexts};

#[derive(serde::Deserialize)]
struct LlmStrategies {
    short: Option<String>,
    neutral: Option<String>,
    detailed: Option<String>,
}

/// Parse a model reply into the three strategy texts.
///
/// Accepts bare JSON, JSON wrapped in a markdown code fence, or JSON with
/// stray prose around it. Anything that does not yield three non-empty
/// strings is an upstream error.
pub fn parse_strategy_output(raw: &str) -> Result<StrategyTexts, EsgError> {
    let unfenced = strip_code_fence(raw);
    let json_str = extract_json_object(unfenced)
        .ok_or_else(|| EsgError::Upstream("no JSON object in model output".to_string()))?;

    let parsed: LlmStrategies = serde_json::from_str(json_str)
        .map_err(|e| EsgError::Upstream(format!("malformed strategy JSON: {e}")))?;

    Ok(StrategyTexts {
        short: required(parsed.short, "short")?,
        neutral: required(parsed.neutral, "neutral")?,
        detailed: required(parsed.detailed, "detailed")?,
    })
}

fn required(value: Option<String>, field: &str) -> Result<String, EsgError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(EsgError::Upstream(format!("model output has no `{field}` strategy"))),
    }
}

/// Remove a surrounding ```json / ``` fence if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string ("json", "JSON", ...) up to the first newline.
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Extract the outermost `{ ... }` span.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}
