use serde::Deserialize;

const ABSENT_MARKERS: &[&str] = &["", "—", "-"];

/// Parse a market value such as "€25m", "800k", "12,000,000" into a plain number.
/// Anything unparseable is `None`; this never fails.
pub fn parse_market_value(raw: &str) -> Option<f64> {
    let s: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '€' | '$' | ',') && !c.is_whitespace())
        .collect();
    if ABSENT_MARKERS.contains(&s.as_str()) {
        return None;
    }
    let (digits, mult) = if let Some(rest) = s.strip_suffix('m') {
        (rest, 1_000_000.0)
    } else if let Some(rest) = s.strip_suffix('k') {
        (rest, 1_000.0)
    } else {
        (s.as_str(), 1.0)
    };
    let v = digits.parse::<f64>().ok()?;
    let out = v * mult;
    out.is_finite().then_some(out)
}

/// Market value as it appears in the metadata table: a number, a string, or null.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawMarketValue {
    Number(f64),
    Text(String),
}

impl RawMarketValue {
    pub fn parsed(&self) -> Option<f64> {
        match self {
            RawMarketValue::Number(v) => v.is_finite().then_some(*v),
            RawMarketValue::Text(s) => parse_market_value(s),
        }
    }

    pub fn display(&self) -> String {
        match self {
            RawMarketValue::Number(v) if v.fract() == 0.0 => format!("{v:.0}"),
            RawMarketValue::Number(v) => v.to_string(),
            RawMarketValue::Text(s) => s.clone(),
        }
    }
}
