pub mod error;
pub mod settings;
pub mod store;
mod validate;

pub use error::EsgError;
pub use settings::{
    ai_configured, bind_addr_from_env, data_dir_from_env, read_settings, AiSettings,
};
pub use store::{EsgStore, JsonSlot};

use serde::{Deserialize, Serialize};

/// Unit suffix used everywhere emissions are printed.
pub const UNIT: &str = "tCO₂e";

// --- Types (matching the dashboard's JSON documents) ---

/// One company's emissions figures for a reporting year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EsgData {
    pub company_name: String,
    pub reporting_year: i32,
    pub scope1_tco2e: f64,
    pub scope2_tco2e: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope3_tco2e: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_consumption_kwh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl EsgData {
    /// Scope 3 only counts as reported when it is strictly positive.
    pub fn scope3(&self) -> Option<f64> {
        self.scope3_tco2e.filter(|v| *v > 0.0)
    }

    pub fn total(&self) -> f64 {
        self.scope1_tco2e + self.scope2_tco2e + self.scope3().unwrap_or(0.0)
    }
}

/// An `EsgData` as persisted, with the store-assigned id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredEsgData {
    #[serde(flatten)]
    pub data: EsgData,
    pub id: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StrategyVariant {
    Short,
    Neutral,
    Detailed,
}

impl StrategyVariant {
    pub const ALL: [StrategyVariant; 3] = [Self::Short, Self::Neutral, Self::Detailed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Neutral => "neutral",
            Self::Detailed => "detailed",
        }
    }

    /// Heading printed above the strategy text in the report.
    pub fn label(self) -> &'static str {
        match self {
            Self::Short => "Short Strategy (2-4 sentences)",
            Self::Neutral => "Neutral Strategy (5-8 sentences)",
            Self::Detailed => "Detailed Strategy",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

/// The strategy text a user picked from a generated bundle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategySelection {
    pub variant: StrategyVariant,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredStrategySelection {
    #[serde(flatten)]
    pub selection: StrategySelection,
    pub saved_at: String,
}

/// Which source produced a strategy bundle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StrategyMode {
    Ai,
    Mock,
}

/// The three narrative variants without provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyTexts {
    pub short: String,
    pub neutral: String,
    pub detailed: String,
}

/// Freshly generated strategies plus the mode that produced them. Never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyBundle {
    #[serde(flatten)]
    pub texts: StrategyTexts,
    pub mode: StrategyMode,
}

/// A rasterised emissions chart, opaque apart from its pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartImage {
    pub width_px: u32,
    pub height_px: u32,
    pub bytes: Vec<u8>,
}

impl ChartImage {
    pub fn is_usable(&self) -> bool {
        self.width_px > 0 && self.height_px > 0 && !self.bytes.is_empty()
    }

    /// Build from PNG bytes, reading the pixel size from the IHDR chunk.
    pub fn from_png(bytes: Vec<u8>) -> Result<Self, EsgError> {
        const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        if bytes.len() < 24 || bytes[..8] != SIGNATURE || &bytes[12..16] != b"IHDR" {
            return Err(EsgError::Render("chart is not a PNG image".to_string()));
        }
        let width_px = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        let height_px = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
        Ok(Self {
            width_px,
            height_px,
            bytes,
        })
    }
}
