pub mod log;

/// Upper-cases the first character and leaves the rest alone.
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = String::with_capacity(input.len());
    out.extend(first.to_uppercase());
    out.push_str(chars.as_str());
    out
}

pub fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed: usize = value
        .trim()
        .parse()
        .map_err(|_| "expected a positive integer".to_string())?;
    if parsed == 0 {
        return Err("expected a positive integer".to_string());
    }
    Ok(parsed)
}
