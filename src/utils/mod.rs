use std::collections::HashSet;

/// Parse a comma-separated extension list ("txt,md,.json") into a cleaned,
/// deduplicated list. Leading dots are stripped; comparison is
/// case-insensitive.
pub fn parse_extensions_csv(value: &str) -> Result<Vec<String>, String> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err("extensions list is empty".to_string());
    }
    let mut out: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for part in raw.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        let cleaned = item.trim_start_matches('.');
        if cleaned.is_empty() {
            continue;
        }
        let key = cleaned.to_ascii_lowercase();
        if seen.insert(key.clone()) {
            out.push(key);
        }
    }
    if out.is_empty() {
        return Err("extensions list is empty".to_string());
    }
    Ok(out)
}

/// Parse a minimum-score control value. Blank means the default (0.0);
/// anything that is not a finite number is rejected.
pub fn parse_min_score(value: &str) -> Result<f64, String> {
    let raw = value.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    let parsed: f64 = raw
        .parse()
        .map_err(|_| format!("invalid minimum score '{raw}'"))?;
    if !parsed.is_finite() {
        return Err(format!("invalid minimum score '{raw}'"));
    }
    Ok(parsed)
}
