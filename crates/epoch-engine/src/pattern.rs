//! Date-pattern token translation.
//!
//! Patterns arrive in the `SimpleDateFormat` convention (`yyyy-MM-dd
//! HH:mm:ss`), the lingua franca of the procedure layer this crate serves.
//! chrono speaks strftime, so [`to_strftime`] rewrites a pattern
//! longest-token-first; characters that match no token pass through as
//! literals, and single-quoted sections are emitted verbatim.

/// Translation table, ordered longest token first so `yyyy` wins over `yy`.
const TOKENS: &[(&str, &str)] = &[
    // 4-char tokens
    ("yyyy", "%Y"), // 4-digit year: 2024
    ("MMMM", "%B"), // full month name: January
    ("EEEE", "%A"), // full weekday: Monday
    // 3-char tokens
    ("MMM", "%b"), // abbreviated month: Jan
    ("EEE", "%a"), // abbreviated weekday: Mon
    ("SSS", "%3f"), // milliseconds: 123
    ("XXX", "%:z"), // ISO offset with colon: +05:30
    ("xxx", "%:z"),
    ("ZZZ", "%z"), // RFC 822 offset: +0530
    ("zzz", "%Z"), // zone abbreviation: EST
    // 2-char tokens
    ("yy", "%y"), // 2-digit year: 24
    ("MM", "%m"), // 2-digit month: 01
    ("dd", "%d"), // 2-digit day: 01
    ("HH", "%H"), // 24-hour, padded: 09
    ("hh", "%I"), // 12-hour, padded: 09
    ("mm", "%M"), // minutes, padded: 05
    ("ss", "%S"), // seconds, padded: 05
    ("XX", "%z"),
    ("xx", "%z"),
    ("ZZ", "%z"),
    ("zz", "%Z"),
    ("EE", "%a"),
    ("VV", "%Z"), // zone id; nearest strftime equivalent
    // 1-char tokens
    ("y", "%Y"),
    ("M", "%-m"), // month, unpadded: 1
    ("d", "%-d"), // day, unpadded: 1
    ("H", "%-H"),
    ("h", "%-I"),
    ("m", "%-M"),
    ("s", "%-S"),
    ("a", "%p"), // AM/PM
    ("E", "%a"),
    ("X", "%:z"),
    ("x", "%z"),
    ("Z", "%z"),
    ("z", "%Z"),
    ("V", "%Z"),
    ("O", "%:z"), // localized offset; nearest strftime equivalent
];

/// True iff the pattern consists *entirely* of 1–3 timezone-designator
/// characters (`X x Z z V O`).
///
/// This is deliberately narrow: a pattern that merely *contains* a zone
/// token among other characters (`"yyyy-MM-dd XXX"`) does not match, and
/// quoted literals are not accounted for. It exists to answer one question
/// for the format resolver — "is this pattern nothing but a zone
/// designator?" — not to be a general zone-detection feature.
pub fn is_zone_pattern(pattern: &str) -> bool {
    (1..=3).contains(&pattern.len())
        && pattern
            .chars()
            .all(|c| matches!(c, 'X' | 'x' | 'Z' | 'z' | 'V' | 'O'))
}

/// Rewrite a `SimpleDateFormat`-style pattern as a chrono strftime string.
pub fn to_strftime(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;
    while !rest.is_empty() {
        if let Some(quoted) = rest.strip_prefix('\'') {
            match quoted.find('\'') {
                Some(0) => {
                    // '' is an escaped literal quote
                    out.push('\'');
                    rest = &quoted[1..];
                }
                Some(end) => {
                    push_literal(&mut out, &quoted[..end]);
                    rest = &quoted[end + 1..];
                }
                None => {
                    // unterminated quote: treat the remainder as literal
                    push_literal(&mut out, quoted);
                    rest = "";
                }
            }
            continue;
        }
        if let Some((len, replacement)) = match_token(rest) {
            out.push_str(replacement);
            rest = &rest[len..];
        } else if let Some(ch) = rest.chars().next() {
            push_literal_char(&mut out, ch);
            rest = &rest[ch.len_utf8()..];
        }
    }
    out
}

fn match_token(s: &str) -> Option<(usize, &'static str)> {
    TOKENS
        .iter()
        .find(|(token, _)| s.starts_with(token))
        .map(|(token, replacement)| (token.len(), *replacement))
}

fn push_literal(out: &mut String, literal: &str) {
    for ch in literal.chars() {
        push_literal_char(out, ch);
    }
}

fn push_literal_char(out: &mut String, ch: char) {
    if ch == '%' {
        // '%' would start a strftime specifier
        out.push_str("%%");
    } else {
        out.push(ch);
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
