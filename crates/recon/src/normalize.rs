// Identity normalization
// Canonical comparison keys for names, companies and websites.

use url::Url;

/// Separator between the three parts of an identity key.
pub const KEY_SEPARATOR: char = '|';

/// Canonicalize a name or company for matching.
///
/// Drops anything after the first comma or opening parenthesis (titles,
/// legal suffixes, annotations), removes periods and apostrophes, turns
/// hyphens into spaces, collapses whitespace and lowercases. Missing input
/// yields an empty string. Applying it twice gives the same result.
pub fn clean_match_string(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let s = text.trim();
    let s = s.split_once(',').map_or(s, |(head, _)| head).trim();
    let s = s.split_once('(').map_or(s, |(head, _)| head).trim();

    let stripped: String = s
        .chars()
        .filter(|c| *c != '.' && *c != '\'')
        .map(|c| if c == '-' { ' ' } else { c })
        .collect();

    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Bare host of a website value, without a leading `www.`.
///
/// Scheme-less values are read as `http://`. Anything that does not parse
/// as a URL with a host yields an empty string. Only the host is kept:
/// userinfo (`info@acme.com` gives `acme.com`) and the scheme's default port
/// are dropped, so contact-style website values still match a listed domain.
/// A non-default port stays as `host:port`.
pub fn extract_domain(url: Option<&str>) -> String {
    let Some(raw) = url else {
        return String::new();
    };

    let lowered = raw.to_lowercase();
    let trimmed = lowered.trim();
    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let Ok(parsed) = Url::parse(&candidate) else {
        return String::new();
    };
    let Some(host) = parsed.host_str() else {
        return String::new();
    };

    let host = host.strip_prefix("www.").unwrap_or(host);
    match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Trailing legal-form words dropped from company names inside identity keys.
const LEGAL_SUFFIXES: &[&str] = &[
    "inc", "incorporated", "llc", "ltd", "limited", "corp", "corporation", "gmbh", "plc", "llp",
];

/// `clean_match_string` plus removal of trailing legal-form words, so that
/// `Acme Inc` and `Acme, Inc.` produce the same company key. A name made only
/// of such a word is left alone.
pub fn clean_company_key(text: Option<&str>) -> String {
    let cleaned = clean_match_string(text);
    let mut words: Vec<&str> = cleaned.split(' ').collect();
    while words.len() > 1 && words.last().is_some_and(|w| LEGAL_SUFFIXES.contains(w)) {
        words.pop();
    }
    words.join(" ")
}

/// Composite key used to decide whether two records are the same person.
///
/// The company part goes through `clean_company_key`, so names differing only
/// by a trailing legal form share a key (`Acme Holdings Ltd` and `Acme
/// Holdings` included). That merge is what lets `Acme Inc` link to
/// `Acme, Inc.`; keep it.
pub fn identity_key(first: Option<&str>, last: Option<&str>, company: Option<&str>) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        clean_match_string(first),
        clean_match_string(last),
        clean_company_key(company),
        sep = KEY_SEPARATOR,
    )
}
