use regex::Regex;
use std::sync::OnceLock;

use crate::models::{MacroProfile, ResolvedRecord};

/// Labels may be followed by colons, whitespace, or a dash that is itself followed by whitespace.
/// A dash glued to a number reads as a sign and makes the line fail to match.
const FULL_ENTRY_PATTERN: &str = r"(?i)(?P<name>.+?)\s+(?P<kcal>[0-9]+)\s*ккал.*?жири(?:[:\s]|-\s)*(?P<fat>[0-9.]+)[г\s,]+вуглеводи(?:[:\s]|-\s)*(?P<carbs>[0-9.]+)[г\s,]+цукри(?:[:\s]|-\s)*(?P<sugar>[0-9.]+)[г\s,]+білки(?:[:\s]|-\s)*(?P<protein>[0-9.]+)[г\s,]+(?P<weight>[0-9.]+)\s*г?";

const WEIGHT_SUFFIXES: &[&str] = &["гр", "г", "g"];

fn full_entry_regex() -> Option<&'static Regex> {
    static FULL_ENTRY: OnceLock<Option<Regex>> = OnceLock::new();
    FULL_ENTRY
        .get_or_init(|| Regex::new(FULL_ENTRY_PATTERN).ok())
        .as_ref()
}

/// Reads a line that carries its own numbers, e.g.
/// `яблуко 52 ккал жири:0.2г вуглеводи:14г цукри:10г білки:0.3г 150г`.
///
/// Returns `None` unless every field is present and well-formed.
pub fn parse_full_entry(line: &str) -> Option<ResolvedRecord> {
    let caps = full_entry_regex()?.captures(line)?;
    let number = |group: &str| caps.name(group)?.as_str().parse::<f64>().ok();

    let name = caps.name("name")?.as_str().trim();
    let weight_g = number("weight")?;
    if name.is_empty() || weight_g <= 0.0 {
        return None;
    }

    Some(ResolvedRecord {
        name: name.to_string(),
        profile: MacroProfile {
            calories: number("kcal")?,
            fat: number("fat")?,
            carbohydrate: number("carbs")?,
            sugar: number("sugar")?,
            protein: number("protein")?,
        },
        weight_g,
    })
}

/// Parses a trailing weight token such as `150`, `150г`, `87,5гр` or `40g`.
///
/// Only `digits[.digits]` is accepted after the unit suffix is removed and a decimal comma is
/// turned into a point. Zero parses; the resolver decides what a zero weight means.
pub fn parse_weight_token(token: &str) -> Option<f64> {
    let token = token.trim().to_lowercase();
    let digits = WEIGHT_SUFFIXES
        .iter()
        .find_map(|suffix| token.strip_suffix(suffix))
        .unwrap_or(&token)
        .replace(',', ".");

    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    let well_formed = match digits.split_once('.') {
        Some((whole, frac)) => all_digits(whole) && all_digits(frac),
        None => all_digits(&digits),
    };
    if !well_formed {
        return None;
    }

    digits.parse::<f64>().ok()
}

/// Splits a free-form line into a lowercase product name and an optional trailing weight.
///
/// A numeric last token is always taken as the weight, even when it belongs to the product name
/// (`"молоко 2.5"` becomes `молоко` at 2.5 g). Returns `None` for an empty line or a line that
/// holds nothing but a weight.
pub fn split_simple_entry(line: &str) -> Option<(String, Option<f64>)> {
    let normalized = line.trim().to_lowercase();
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    let (last, rest) = tokens.split_last()?;

    let (name, weight_g) = match parse_weight_token(last) {
        Some(weight) => (rest.join(" "), Some(weight)),
        None => (tokens.join(" "), None),
    };

    if name.is_empty() {
        return None;
    }
    Some((name, weight_g))
}
