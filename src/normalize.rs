use unicode_normalization::UnicodeNormalization;

/// Letters that carry no canonical decomposition but still have an obvious
/// ASCII stand-in. Everything else outside ASCII is dropped after NFKD.
fn fold_special(c: char) -> Option<&'static str> {
    match c {
        'ł' | 'Ł' => Some("l"),
        'đ' | 'Đ' => Some("d"),
        'ø' | 'Ø' => Some("o"),
        'ß' => Some("ss"),
        'æ' | 'Æ' => Some("ae"),
        'œ' | 'Œ' => Some("oe"),
        _ => None,
    }
}

/// Canonical form used by every pattern match: lower-case, accents folded to
/// ASCII, trimmed, whitespace runs collapsed to one space. Missing input is "".
pub fn normalize_text(value: Option<&str>) -> String {
    let raw = match value {
        Some(raw) => raw,
        None => return String::new(),
    };

    let mut folded = String::with_capacity(raw.len());
    for c in raw.chars() {
        match fold_special(c) {
            Some(replacement) => folded.push_str(replacement),
            None => folded.push(c),
        }
    }

    let ascii: String = folded
        .nfkd()
        .filter(|c| c.is_ascii())
        .flat_map(|c| c.to_lowercase())
        .map(|c| if c.is_ascii_control() { ' ' } else { c })
        .collect();

    ascii.split_whitespace().collect::<Vec<_>>().join(" ")
}
