//! Bidi strategy: text is mirrored and wrapped in a right-to-left override.
//!
//! Letters are swapped for flipped look-alikes and the whole run is
//! bracketed with `U+202E RIGHT-TO-LEFT OVERRIDE` / `U+202C POP
//! DIRECTIONAL FORMATTING`, so layouts get exercised the way Arabic or
//! Hebrew would exercise them without needing a real translation.

use std::borrow::Cow;

use super::Strategy;

const RLO: char = '\u{202E}';
const PDF: char = '\u{202C}';

/// Right-to-left pseudo-localization.
///
/// Output is recognizable by its directional wrapper; input that already
/// carries the wrapper is returned unchanged, which keeps the strategy
/// idempotent even though several flipped letters land back in ASCII
/// (`b` and `q` swap, `d` and `p` swap).
#[derive(Debug, Clone, Copy, Default)]
pub struct Bidi;

/// Flipped counterpart of a single ASCII letter.
///
/// Letters that read the same upside down (`o`, `x`, `H`, …) stay put.
#[inline]
fn flip(c: char) -> char {
    match c {
        'a' => 'ɐ',
        'b' => 'q',
        'c' => 'ɔ',
        'd' => 'p',
        'e' => 'ǝ',
        'f' => 'ɟ',
        'g' => 'ƃ',
        'h' => 'ɥ',
        'i' => 'ı',
        'j' => 'ɾ',
        'k' => 'ʞ',
        'l' => 'ʃ',
        'm' => 'ɯ',
        'n' => 'u',
        'p' => 'd',
        'q' => 'b',
        'r' => 'ɹ',
        't' => 'ʇ',
        'u' => 'n',
        'v' => 'ʌ',
        'w' => 'ʍ',
        'y' => 'ʎ',
        'A' => '∀',
        'B' => 'ᗺ',
        'C' => 'Ɔ',
        'D' => 'ᗡ',
        'E' => 'Ǝ',
        'F' => 'Ⅎ',
        'G' => '⅁',
        'J' => 'ſ',
        'K' => 'ʞ',
        'L' => '˥',
        'M' => 'W',
        'P' => 'Ԁ',
        'R' => 'ᴚ',
        'T' => '⊥',
        'U' => '∩',
        'V' => 'Λ',
        'W' => 'M',
        'Y' => '⅄',
        other => other,
    }
}

impl Strategy for Bidi {
    fn transform<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if text.is_empty() || (text.starts_with(RLO) && text.ends_with(PDF)) {
            return Cow::Borrowed(text);
        }

        let mut out = String::with_capacity(text.len() + RLO.len_utf8() + PDF.len_utf8());
        out.push(RLO);
        out.extend(text.chars().map(flip));
        out.push(PDF);
        Cow::Owned(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bidi_wraps_with_direction_marks() {
        let out = Bidi.transform("Hello");
        assert!(out.starts_with(RLO));
        assert!(out.ends_with(PDF));
        assert_eq!(out.as_ref(), "\u{202E}Hǝʃʃo\u{202C}");
    }

    #[test]
    fn test_bidi_flips_letter_pairs() {
        assert_eq!(Bidi.transform("bq dp"), "\u{202E}qb pd\u{202C}");
    }

    #[test]
    fn test_bidi_idempotent_on_own_output() {
        let once = Bidi.transform("Save changes").into_owned();
        let twice = Bidi.transform(&once);
        assert_eq!(once, twice.as_ref());
        assert!(matches!(twice, Cow::Borrowed(_)));
    }

    #[test]
    fn test_bidi_empty_input_untouched() {
        assert!(matches!(Bidi.transform(""), Cow::Borrowed("")));
    }
}
