//! Spelling-variant canonicalization.
//!
//! Maps British surface forms onto their American spelling so every variant
//! of a word lands on one graph node. The mapping is a fixed table plus
//! three productive suffix rules, applied per hyphen-separated token of the
//! id's form segment. American forms are fixed points, which makes the
//! whole mapping idempotent.

/// Irregular variants the suffix rules cannot derive. Keys sorted for
/// binary search.
const VARIANT_TABLE: &[(&str, &str)] = &[
    ("aeroplane", "airplane"),
    ("aluminium", "aluminum"),
    ("cheque", "check"),
    ("draught", "draft"),
    ("grey", "gray"),
    ("kerb", "curb"),
    ("mould", "mold"),
    ("moustache", "mustache"),
    ("plough", "plow"),
    ("programme", "program"),
    ("pyjamas", "pajamas"),
    ("sceptic", "skeptic"),
    ("tyre", "tire"),
];

/// Words ending in "our" where the ending is not the Latinate suffix.
const OUR_EXCEPTIONS: &[&str] = &["flour", "four", "hour", "pour", "sour", "tour", "velour"];

/// Words ending in "ise" that are not -ise/-ize alternations.
const ISE_EXCEPTIONS: &[&str] = &[
    "advise",
    "arise",
    "comprise",
    "concise",
    "devise",
    "disguise",
    "exercise",
    "otherwise",
    "precise",
    "premise",
    "promise",
    "revise",
    "rise",
    "surprise",
    "wise",
];

fn canonicalize_token(token: &str) -> String {
    let token = token.to_lowercase();

    if let Ok(idx) = VARIANT_TABLE.binary_search_by_key(&token.as_str(), |(from, _)| from) {
        return VARIANT_TABLE[idx].1.to_string();
    }

    if token.len() >= 5 && token.ends_with("our") && !OUR_EXCEPTIONS.contains(&token.as_str()) {
        return format!("{}or", &token[..token.len() - 3]);
    }
    if let Some(stem) = token.strip_suffix("isation") {
        return format!("{stem}ization");
    }
    if token.len() >= 5 && token.ends_with("ise") && !ISE_EXCEPTIONS.contains(&token.as_str()) {
        return format!("{}ize", &token[..token.len() - 3]);
    }
    if token.len() >= 5 && token.ends_with("yse") {
        return format!("{}yze", &token[..token.len() - 3]);
    }
    if token.len() >= 5 && (token.ends_with("tre") || token.ends_with("bre")) {
        let (stem, _) = token.split_at(token.len() - 2);
        return format!("{stem}er");
    }

    token
}

/// Canonicalizes the form segment of a raw node id, leaving the
/// `{kind}-{lang}-` prefix intact. Ids without the prefix are treated as a
/// bare form.
pub fn canonicalize_id(raw: &str) -> String {
    let mut parts = raw.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(kind), Some(lang), Some(form)) => {
            let canonical: Vec<String> = form.split('-').map(canonicalize_token).collect();
            format!("{kind}-{lang}-{}", canonical.join("-"))
        }
        _ => {
            let canonical: Vec<String> = raw.split('-').map(canonicalize_token).collect();
            canonical.join("-")
        }
    }
}

/// Canonicalizes a free-text label (space- or hyphen-separated tokens).
pub fn canonicalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .map(|word| {
            word.split('-')
                .map(canonicalize_token)
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_variant_pairs() {
        assert_eq!(canonicalize_id("word-en-colour"), "word-en-color");
        assert_eq!(canonicalize_id("word-en-color"), "word-en-color");
        assert_eq!(canonicalize_id("word-en-organise"), "word-en-organize");
        assert_eq!(canonicalize_id("word-en-analyse"), "word-en-analyze");
        assert_eq!(canonicalize_id("word-en-centre"), "word-en-center");
        assert_eq!(canonicalize_id("word-en-grey"), "word-en-gray");
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            "word-en-colour",
            "word-en-organisation",
            "word-en-theatre",
            "grammar-en-past-tense",
            "word-en-neighbour",
        ] {
            let once = canonicalize_id(raw);
            assert_eq!(canonicalize_id(&once), once, "not idempotent for {raw}");
        }
    }

    #[test]
    fn test_suffix_exceptions_untouched() {
        assert_eq!(canonicalize_id("word-en-hour"), "word-en-hour");
        assert_eq!(canonicalize_id("word-en-flour"), "word-en-flour");
        assert_eq!(canonicalize_id("word-en-promise"), "word-en-promise");
        assert_eq!(canonicalize_id("word-en-wise"), "word-en-wise");
    }

    #[test]
    fn test_multitoken_form() {
        assert_eq!(
            canonicalize_id("grammar-en-colour-agreement"),
            "grammar-en-color-agreement"
        );
        assert_eq!(canonicalize_label("colour wheel"), "color wheel");
    }

    #[test]
    fn test_variant_table_is_sorted() {
        for pair in VARIANT_TABLE.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
    }
}
