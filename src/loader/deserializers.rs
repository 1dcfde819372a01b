use chrono::NaiveDate;

const BR_DATE_FMT: &str = "%d/%m/%Y";

/// Parse a Brazilian date string (DD/MM/YYYY) into NaiveDate.
/// Returns None for empty or unparseable strings.
pub fn parse_br_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, BR_DATE_FMT).ok()
}

/// Parse an optional float from a string ("" → None, "3.5" → Some(3.5)).
/// Accepts a comma decimal separator ("3,5") as some exports use it.
pub fn parse_opt_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.replace(',', ".").parse::<f64>().ok()
}

/// Trim + capitalize: first alphabetic character uppercased, the rest
/// lowercased ("PLACA MÃE  " → "Placa mãe"). Empty input yields None.
pub fn normalize_text(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    let mut out: String = first.to_uppercase().collect();
    out.extend(chars.flat_map(|c| c.to_lowercase()));
    Some(out)
}
