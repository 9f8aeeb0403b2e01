use serde_json::{Map, Value};

use crate::{EsgData, EsgError, StrategySelection, StrategyVariant};

const MIN_YEAR: i64 = 1900;
const MAX_YEAR: i64 = 2100;

impl EsgData {
    /// Validate an untyped request body field by field.
    ///
    /// Type mismatches (a string where a number belongs) are reported against
    /// the offending field instead of being coerced.
    pub fn from_json(value: &Value) -> Result<Self, EsgError> {
        let obj = value
            .as_object()
            .ok_or_else(|| EsgError::validation("body", "expected a JSON object"))?;

        let company_name = match obj.get("company_name") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::String(_)) | None | Some(Value::Null) => {
                return Err(EsgError::validation("company_name", "Company name is required"))
            }
            Some(_) => {
                return Err(EsgError::validation("company_name", "Company name must be a string"))
            }
        };

        let reporting_year = reporting_year(obj)?;
        let scope1_tco2e = required_emissions(obj, "scope1_tco2e", "Scope 1")?;
        let scope2_tco2e = required_emissions(obj, "scope2_tco2e", "Scope 2")?;
        let scope3_tco2e = optional_non_negative(obj, "scope3_tco2e", "Scope 3 emissions")?;
        let energy_consumption_kwh =
            optional_non_negative(obj, "energy_consumption_kwh", "Energy consumption")?;

        let notes = match obj.get("notes") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(EsgError::validation("notes", "Notes must be a string")),
        };

        Ok(Self {
            company_name,
            reporting_year,
            scope1_tco2e,
            scope2_tco2e,
            scope3_tco2e,
            energy_consumption_kwh,
            notes,
        })
    }
}

impl StrategySelection {
    pub fn from_json(value: &Value) -> Result<Self, EsgError> {
        let obj = value
            .as_object()
            .ok_or_else(|| EsgError::validation("body", "expected a JSON object"))?;

        let variant = match obj.get("variant") {
            Some(Value::String(s)) => StrategyVariant::parse(s).ok_or_else(|| {
                EsgError::validation("variant", "Variant must be short, neutral or detailed")
            })?,
            _ => return Err(EsgError::validation("variant", "Missing variant or content")),
        };

        let content = match obj.get("content") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            _ => return Err(EsgError::validation("content", "Missing variant or content")),
        };

        Ok(Self { variant, content })
    }
}

fn reporting_year(obj: &Map<String, Value>) -> Result<i32, EsgError> {
    let field = "reporting_year";
    let year = match obj.get(field) {
        None | Some(Value::Null) => {
            return Err(EsgError::validation(field, "Reporting year is required"))
        }
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Some(_) => None,
    };
    match year {
        Some(y) if (MIN_YEAR..=MAX_YEAR).contains(&y) => Ok(y as i32),
        Some(_) => Err(EsgError::validation(field, "Please enter a valid year")),
        None => Err(EsgError::validation(field, "Reporting year must be an integer")),
    }
}

fn required_emissions(obj: &Map<String, Value>, field: &str, label: &str) -> Result<f64, EsgError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(EsgError::validation(
            field,
            format!("{label} emissions are required"),
        )),
        Some(v) => non_negative(v, field, &format!("{label} emissions")),
    }
}

fn optional_non_negative(
    obj: &Map<String, Value>,
    field: &str,
    label: &str,
) -> Result<Option<f64>, EsgError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => non_negative(v, field, label).map(Some),
    }
}

fn non_negative(value: &Value, field: &str, label: &str) -> Result<f64, EsgError> {
    match value.as_f64() {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Some(_) => Err(EsgError::validation(
            field,
            format!("{label} must be a non-negative number"),
        )),
        None => Err(EsgError::validation(field, format!("{label} must be a number"))),
    }
}
