const DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Rendered dates may carry separators from patterns such as `%D`, `%T` or
/// `%H:%M`; they become `-` so `01/02/22` stays readable as `01-02-22`.
pub fn sanitize_date_part(rendered: &str) -> String {
    rendered
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\' | ':') { '-' } else { ch })
        .collect()
}

/// Final guard on the joined stem: whatever a kept file name contributed must
/// still be one path component.
pub fn sanitize_stem(stem: &str) -> String {
    let replaced: String = stem
        .chars()
        .map(|ch| if is_forbidden(ch) { '_' } else { ch })
        .collect();

    let trimmed = replaced.trim_end_matches([' ', '.']).trim();
    if trimmed.is_empty() {
        return "untitled".to_string();
    }

    let device = trimmed.split('.').next().unwrap_or(trimmed);
    if DEVICE_NAMES.iter().any(|name| name.eq_ignore_ascii_case(device)) {
        return format!("{trimmed}_file");
    }
    trimmed.to_string()
}

fn is_forbidden(ch: char) -> bool {
    ch.is_control() || matches!(ch, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_separators_become_dashes() {
        assert_eq!(sanitize_date_part("01/02/22"), "01-02-22");
        assert_eq!(sanitize_date_part("2022-01-02 10:00:00"), "2022-01-02 10-00-00");
        assert_eq!(sanitize_date_part("2022-01-02"), "2022-01-02");
    }

    #[test]
    fn separators_cannot_escape_the_directory() {
        assert_eq!(sanitize_stem("2022-01-02_a/b"), "2022-01-02_a_b");
        assert_eq!(sanitize_stem("..\\up"), ".._up");
    }

    #[test]
    fn reserved_device_names_get_suffix() {
        assert_eq!(sanitize_stem("AUX"), "AUX_file");
        assert_eq!(sanitize_stem("com1.backup"), "com1.backup_file");
    }

    #[test]
    fn trailing_dots_and_blank_input() {
        assert_eq!(sanitize_stem("holiday. "), "holiday");
        assert_eq!(sanitize_stem("   "), "untitled");
        assert_eq!(sanitize_stem(".."), "untitled");
    }

    #[test]
    fn ordinary_names_pass_through() {
        assert_eq!(sanitize_stem("2022-01-02_photo"), "2022-01-02_photo");
    }
}
