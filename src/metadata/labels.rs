//! Label normalization for free-text matching.
//!
//! Mastered-word lists arrive as arbitrary text ("The colour's", "apples",
//! "ice cream"); normalization strips markup, punctuation, case, and
//! possessives, and the matcher additionally probes a singularized and a
//! hyphen-joined form.

use crate::graph::canonical::canonicalize_label;

/// Canonical lookup key for a label: markup and punctuation stripped,
/// lowercased, possessives removed, spelling variants canonicalized.
pub fn normalize_label(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut in_tag = false;
    for ch in raw.chars() {
        match ch {
            '<' | '{' | '[' => in_tag = true,
            '>' | '}' | ']' => in_tag = false,
            _ if in_tag => {}
            _ => text.push(ch),
        }
    }

    let words: Vec<String> = text
        .split_whitespace()
        .map(|word| {
            let cleaned: String = word
                .to_lowercase()
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '\'')
                .collect();
            strip_possessive(&cleaned).trim_matches('-').to_string()
        })
        .filter(|word| !word.is_empty())
        .collect();

    canonicalize_label(&words.join(" "))
}

fn strip_possessive(word: &str) -> &str {
    word.strip_suffix("'s")
        .or_else(|| word.strip_suffix('\''))
        .unwrap_or(word)
}

/// Best-effort singular form of the last word of a normalized label.
pub fn singularize(label: &str) -> String {
    let singular_word = |word: &str| -> String {
        if let Some(stem) = word.strip_suffix("ies") {
            if stem.len() >= 2 {
                return format!("{stem}y");
            }
        }
        for suffix in ["sses", "shes", "ches", "xes", "zes"] {
            if let Some(stem) = word.strip_suffix(suffix) {
                return format!("{stem}{}", &suffix[..suffix.len() - 2]);
            }
        }
        if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") {
            return word[..word.len() - 1].to_string();
        }
        word.to_string()
    };

    match label.rsplit_once(' ') {
        Some((head, last)) => format!("{head} {}", singular_word(last)),
        None => singular_word(label),
    }
}

/// Hyphen-joined probe form ("ice cream" -> "ice-cream").
pub fn hyphen_join(label: &str) -> String {
    label.replace(' ', "-")
}
