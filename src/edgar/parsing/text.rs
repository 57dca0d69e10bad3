//! Gibberish and noise filtering for the flattened filing text.
//!
//! The stages run in a fixed order and later stages rely on the cleanup done
//! by earlier ones: line-based rules need the newlines that only disappear
//! at the whitespace collapse, and the token rules assume a single line.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Tokens longer than this are candidates for the noisy-token rules.
pub const MAX_TOKEN_LEN: usize = 15;

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n?").expect("valid regex"));

static TAG_REMNANT: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>\n]*>").expect("valid regex"));

static ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&[a-zA-Z0-9#]+;").expect("valid regex"));

static SPECIAL_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[!@#$%^&*()_+={}\[\]:;"'<>,.?/\\|`~\-]{5,}"#).expect("valid regex")
});

static NON_ALPHA_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[^a-zA-Z\s]*$").expect("valid regex"));

static UUENCODED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*begin [0-9]{3} [^\n]+\n(?:[^\n]*\n)*?[ \t]*end[ \t]*$")
        .expect("valid regex")
});

static SYMBOL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[^\w\s]{10,}$").expect("valid regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

static UPPER_LOWER_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z].*[a-z].*[0-9]").expect("valid regex"));

static ACCESSION_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{10}-[0-9]{2}-[0-9]{6}(?:\.txt|\.hdr\.sgml)?$").expect("valid regex")
});

/// Cleans flattened text down to a single line of retained tokens.
///
/// The stage sequence is repeated until the output stops changing, so
/// running the filter on its own output is a no-op. A pass that changes
/// anything strictly shortens the text; most documents settle after the
/// first pass.
pub fn clean_text(text: &str) -> String {
    let mut current = clean_once(text);
    let mut passes = 1;
    loop {
        let next = clean_once(&current);
        if next == current {
            break;
        }
        current = next;
        passes += 1;
    }
    debug!("Noise filter settled after {} passes", passes);
    current
}

fn clean_once(content: &str) -> String {
    // Stage 1: Compatibility decomposition, with line endings unified so the
    // line-anchored stages see every line
    let mut text: String = content.nfkd().collect();
    text = LINE_BREAK.replace_all(&text, "\n").into_owned();

    // Stage 2: Markup remnants and character entities
    text = TAG_REMNANT.replace_all(&text, " ").into_owned();
    text = ENTITY.replace_all(&text, " ").into_owned();

    // Stage 3: Runs of special characters
    text = SPECIAL_RUN.replace_all(&text, " ").into_owned();

    // Stage 4: Lines without any letters
    text = NON_ALPHA_LINE.replace_all(&text, " ").into_owned();

    // Stage 5: UUencoded attachments
    text = UUENCODED_BLOCK.replace_all(&text, " ").into_owned();

    // Stage 6: Lines of symbols
    text = SYMBOL_LINE.replace_all(&text, " ").into_owned();

    // Stage 7: Single line
    text = WHITESPACE.replace_all(&text, " ").trim().to_string();

    // Stage 8 and 9: Noisy tokens
    text.split(' ')
        .filter(|token| !token.is_empty() && !is_noisy_token(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Filing accession numbers such as `0000907471-18-000139.txt`.
pub fn is_accession_number(token: &str) -> bool {
    ACCESSION_NUMBER.is_match(token)
}

/// Long tokens that look like encoding artifacts: an uppercase letter, then
/// a lowercase letter, then a digit; or anything outside ASCII letters and
/// digits. Accession numbers are always kept.
pub fn is_noisy_token(token: &str) -> bool {
    if token.chars().count() <= MAX_TOKEN_LEN || is_accession_number(token) {
        return false;
    }
    UPPER_LOWER_DIGIT.is_match(token) || token.chars().any(|c| !c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accession_number_preserved() {
        let text = "Filed under 0000907471-18-000139.txt with header 0000907471-18-000139.hdr.sgml";
        assert_eq!(clean_text(text), text);
        assert!(is_accession_number("0000907471-18-000139"));
        assert!(!is_accession_number("0000907471-18-000139.htm"));
    }

    #[test]
    fn test_noisy_tokens() {
        assert!(is_noisy_token("ABCdefGHI1234567890xyz"));
        assert!(is_noisy_token("internationally-recognized"));
        assert!(is_noisy_token("0000907471-18-000139.html"));
        assert!(!is_noisy_token("Aaaaaaaaaaaaaaaaaaaaaaa"));
        assert!(!is_noisy_token("abcdefghij1234567890ABC"));
        assert!(!is_noisy_token("short-token!"));
    }

    #[test]
    fn test_token_filter_in_context() {
        assert_eq!(
            clean_text("Revenue grew AAAAbbbbCCCCdddd1234 strongly"),
            "Revenue grew strongly"
        );
    }

    #[test]
    fn test_markup_remnants_and_entities() {
        assert_eq!(clean_text("Revenue &amp; <b>growth</b> &#8212; up"), "Revenue growth up");
    }

    #[test]
    fn test_special_character_runs() {
        assert_eq!(clean_text("Total .......... 100 and more"), "Total 100 and more");
        assert_eq!(clean_text("a--b"), "a--b");
    }

    #[test]
    fn test_lines_without_letters_dropped() {
        assert_eq!(clean_text("Results\n2020\n(1.5)\nnext"), "Results next");
    }

    #[test]
    fn test_uuencoded_block_removed() {
        let text = "Exhibit follows\nbegin 644 data.bin\n\
                    M2&5R92!I<R!A('1E<W0@;V8@=75E;F-O9&EN9PH`\n\
                    M5&AI<R!I<R!A;F]T:&5R(&QI;F4@;V8@=&5X=\n\
                    `\nend\nEnd of exhibit";
        assert_eq!(clean_text(text), "Exhibit follows End of exhibit");
    }

    #[test]
    fn test_uuencoded_block_with_crlf() {
        let text = "Intro\r\nbegin 600 logo.gif\r\nM1TE&.#EA\r\nend\r\nOutro";
        assert_eq!(clean_text(text), "Intro Outro");
    }

    #[test]
    fn test_symbol_lines_dropped() {
        assert_eq!(clean_text("Item 7\n§§§§§§§§§§§§\nOverview"), "Item 7 Overview");
    }

    #[test]
    fn test_compatibility_decomposition() {
        assert_eq!(clean_text("\u{fb01}nancial statements"), "financial statements");
    }

    #[test]
    fn test_single_line_output() {
        let out = clean_text("Item 1.\n\n   Business\t\tOverview \n");
        assert_eq!(out, "Item 1. Business Overview");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Annual report\n<p>Item 1A.</p> Risk &nbsp; factors",
            "2020 ABCdefghijklmnop1",
            "a < b\nc > d",
            "Exhibit\nbegin 644 a.bin\nM1TE&\nend\n0000907471-18-000139.txt trailing",
            "§§§§§§§§§§§§ xYz123456789012345678",
        ];
        for input in inputs {
            let once = clean_text(input);
            assert_eq!(clean_text(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_retained_tokens_respect_length_rule() {
        let input = "The Company's well-established super-long-hyphenated-phrase \
                     ABCdefghij0123456789 0000907471-18-000139.txt Loremipsumdolorsitamet";
        for token in clean_text(input).split(' ') {
            assert!(
                token.chars().count() <= MAX_TOKEN_LEN
                    || is_accession_number(token)
                    || token.chars().all(|c| c.is_ascii_alphanumeric()),
                "unexpected token {}",
                token
            );
        }
    }
}
