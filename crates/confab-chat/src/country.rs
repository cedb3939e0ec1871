// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Country-lookup variant: mapping free-form model JSON onto a country
//! record, plus the yes/no validation reply that gates a lookup.
//!
//! Unlike the consultant decoder this path has no tiers: any failure to map
//! the content simply yields `None` and the caller reports the lookup as
//! failed.

use confab_zai::wire::ChatResponse;
use serde::Deserialize;
use serde_json::Value;

/// A country-info record extracted from model-generated JSON.
///
/// Every field is defaulted: the model frequently omits fields, and a
/// partial record is still worth rendering. Scalar fields deserialize
/// loosely because the model types them freely: "1.4 billion" one turn,
/// a bare number the next.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryInfo {
    #[serde(default, alias = "name", deserialize_with = "loose_string")]
    pub country_name: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub capital: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub population: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub area: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub region: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub official_language: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub currency: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub calling_code: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub time_zone: String,
    #[serde(default)]
    pub interesting_facts: Vec<String>,
    /// The original content string, retained for display.
    #[serde(skip)]
    pub raw_json: String,
}

/// Accepts any JSON scalar where a string is expected, rendering numbers,
/// booleans, and null as display text. Composite values still fail.
fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar value, found {other}"
        ))),
    }
}

impl CountryInfo {
    /// Renders the record as multi-line display text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", self.country_name));
        out.push_str(&format!("Capital: {}\n", self.capital));
        out.push_str(&format!("Population: {}\n", self.population));
        out.push_str(&format!("Area: {} km²\n", self.area));
        out.push_str(&format!("Region: {}\n", self.region));
        out.push_str(&format!("Language: {}\n", self.official_language));
        out.push_str(&format!("Currency: {}\n", self.currency));
        out.push_str(&format!("Calling code: {}\n", self.calling_code));
        out.push_str(&format!("Time zone: {}\n", self.time_zone));
        if !self.interesting_facts.is_empty() {
            out.push_str("\nInteresting facts:\n");
            for fact in &self.interesting_facts {
                out.push_str(&format!("- {fact}\n"));
            }
        }
        out
    }
}

/// Extracts a [`CountryInfo`] from the first choice of a response.
///
/// Returns `None` when there is no choice or the content does not map.
pub fn parse_country_info(response: &ChatResponse) -> Option<CountryInfo> {
    let content = response.first_content()?;
    let mut info: CountryInfo = serde_json::from_str(content).ok()?;
    info.raw_json = content.to_string();
    Some(info)
}

/// Reads a validation reply: is the user-entered text actually a country?
///
/// Accepts `{"is_country": bool}` content, a bare JSON boolean, or a plain
/// "yes"/"no" string. Anything else counts as "no".
pub fn parse_validation(response: &ChatResponse) -> bool {
    let Some(content) = response.first_content() else {
        return false;
    };

    if let Ok(value) = serde_json::from_str::<Value>(content) {
        match value {
            Value::Bool(b) => return b,
            Value::Object(map) => {
                if let Some(Value::Bool(b)) = map.get("is_country") {
                    return *b;
                }
            }
            _ => {}
        }
    }

    matches!(content.trim().to_lowercase().as_str(), "yes" | "true")
}
