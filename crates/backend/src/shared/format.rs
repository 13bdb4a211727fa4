/// Formats a byte count or counter with thousands separators
///
/// # Examples
/// ```
/// use backend::shared::format::format_number;
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Rounds a money or percent value to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parses an Amazon money field leniently.
///
/// Accepts both "1,234.50" and the EU "1.234,50". A lone comma is a decimal
/// separator unless exactly three digits follow it ("1,234" stays 1234).
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let cleaned: String = match (trimmed.rfind(','), trimmed.rfind('.')) {
        (Some(comma), dot) if dot.map_or(true, |d| comma > d) => {
            let decimals = trimmed.len() - comma - 1;
            if dot.is_some() || decimals != 3 {
                trimmed
                    .chars()
                    .filter(|c| *c != '.')
                    .map(|c| if c == ',' { '.' } else { c })
                    .collect()
            } else {
                trimmed.replace(',', "")
            }
        }
        _ => trimmed.replace(',', ""),
    };
    cleaned.parse::<f64>().unwrap_or(0.0)
}
