// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompts and the synthesized greeting for each conversation
//! variant.
//!
//! The greeting is kept in the same JSON shape as a structured reply so the
//! controller can decode it through the ordinary strict tier.

/// Consultant variant: structured recommendations with pros/cons cards.
pub const SALES_CONSULTANT: &str = "\
You are a sales consultant helping the user choose a smartphone. \
Always answer with a single JSON object of the shape \
{\"message\": string, \"options\": [{\"title\": string, \"pros\": [string], \"cons\": [string]}]}. \
The `message` field carries your conversational reply. Include `options` only \
when you are recommending concrete models; each option lists its advantages \
in `pros` and drawbacks in `cons` as flat arrays of short strings. \
Do not wrap the JSON in markdown fences and do not add text outside it.";

/// Country-lookup variant: a flat JSON record about one country.
pub const COUNTRY_INFO: &str = "\
You are a reference service. Given the name of a country, answer with a \
single JSON object with these string fields: country_name, capital, \
population, area (in square kilometers), region, official_language, \
currency, calling_code, time_zone, and an `interesting_facts` array of \
short strings. No text outside the JSON object.";

/// Gate for the country-lookup variant: is the input actually a country?
pub const COUNTRY_VALIDATION: &str = "\
You validate user input. Answer with a single JSON object \
{\"is_country\": true} if the given text is the name of a country, and \
{\"is_country\": false} otherwise. No other output.";

/// Initial assistant greeting, synthesized locally and never sent to the
/// provider.
pub const INITIAL_GREETING: &str =
    r#"{"message": "Hello! I will help you find the perfect smartphone. What matters most to you?"}"#;

/// Plain-text greeting used if [`INITIAL_GREETING`] ever fails to decode.
pub const FALLBACK_GREETING: &str =
    "Hello! I will help you find the perfect smartphone.";
