//! Canonicalization helpers shared by catalog loading and answer matching.
//!
//! Survey answers come back from the forms host with inconsistent casing,
//! stray accents, curly quotes, and doubled whitespace, so every label
//! comparison in the engine goes through [`normalize_text`] first.

const ACCENTED: &str = "ÀÁÂÃÄÅàáâãäåÒÓÔÕÖØòóôõöøÈÉÊËèéêëÇçÌÍÎÏìíîïÙÚÛÜùúûüÿÑñ";
const FOLDED: &str = "AAAAAAaaaaaaOOOOOOooooooEEEEeeeeCcIIIIiiiiUUUUuuuuyNn";

fn fold_char(ch: char) -> char {
    match ACCENTED.chars().position(|accent| accent == ch) {
        Some(index) => FOLDED.chars().nth(index).unwrap_or(ch),
        None => ch,
    }
}

/// Canonical form used for all label comparisons: accents folded, quote and
/// dash variants unified, whitespace collapsed, lowercased. Idempotent.
pub fn normalize_text(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|ch| !matches!(ch, '\u{feff}' | '\u{200b}'))
        .map(fold_char)
        .map(|ch| match ch {
            '\u{2018}' | '\u{2019}' | '\u{02bc}' => '\'',
            '\u{201c}' | '\u{201d}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{00a0}' => ' ',
            other => other,
        })
        .collect();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Maps free-form language names and codes to a canonical 2-letter uppercase
/// code. Unrecognized input is trimmed and uppercased rather than rejected.
pub fn normalize_language_code(value: &str) -> String {
    match normalize_text(value).as_str() {
        "fr" | "francais" | "french" => "FR".to_string(),
        "en" | "english" | "anglais" => "EN".to_string(),
        "es" | "espanol" | "spanish" | "espagnol" => "ES".to_string(),
        "de" | "deutsch" | "german" | "allemand" => "DE".to_string(),
        _ => value.trim().to_uppercase(),
    }
}

/// Full display name for a canonical language code, used by demo output and
/// composition defaults. Unknown codes echo back unchanged.
pub fn language_display_name(code: &str) -> &str {
    match code {
        "FR" => "Français",
        "EN" => "English",
        "ES" => "Español",
        "DE" => "Deutsch",
        _ => code,
    }
}

/// Mode labels are matched case- and whitespace-insensitively.
pub(crate) fn normalize_mode_label(value: &str) -> String {
    value.split_whitespace().collect::<String>().to_uppercase()
}
