//! Accented strategy: ASCII letters become extended-Latin look-alikes.
//!
//! `"Account Settings"` renders as `"Ȧƈƈǿŭƞŧ Şḗŧŧīƞɠş"`: same length and
//! word shape, but any codepath that mangles non-ASCII text shows up
//! immediately. Unmapped characters pass through untouched.

use std::borrow::Cow;

use super::Strategy;

/// The default pseudo-localization strategy.
///
/// Idempotent on its own output: every mapped character is outside the
/// ASCII range, so a second pass finds nothing left to map.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accented;

/// Accented replacement for a single ASCII letter.
#[inline]
fn accent(c: char) -> Option<char> {
    let mapped = match c {
        'a' => 'ȧ',
        'b' => 'ƀ',
        'c' => 'ƈ',
        'd' => 'ḓ',
        'e' => 'ḗ',
        'f' => 'ƒ',
        'g' => 'ɠ',
        'h' => 'ħ',
        'i' => 'ī',
        'j' => 'ĵ',
        'k' => 'ķ',
        'l' => 'ŀ',
        'm' => 'ḿ',
        'n' => 'ƞ',
        'o' => 'ǿ',
        'p' => 'ƥ',
        'q' => 'ɋ',
        'r' => 'ř',
        's' => 'ş',
        't' => 'ŧ',
        'u' => 'ŭ',
        'v' => 'ṽ',
        'w' => 'ẇ',
        'x' => 'ẋ',
        'y' => 'ẏ',
        'z' => 'ẑ',
        'A' => 'Ȧ',
        'B' => 'Ɓ',
        'C' => 'Ƈ',
        'D' => 'Ḓ',
        'E' => 'Ḗ',
        'F' => 'Ƒ',
        'G' => 'Ɠ',
        'H' => 'Ħ',
        'I' => 'Ī',
        'J' => 'Ĵ',
        'K' => 'Ķ',
        'L' => 'Ŀ',
        'M' => 'Ḿ',
        'N' => 'Ƞ',
        'O' => 'Ǿ',
        'P' => 'Ƥ',
        'Q' => 'Ɋ',
        'R' => 'Ř',
        'S' => 'Ş',
        'T' => 'Ŧ',
        'U' => 'Ŭ',
        'V' => 'Ṽ',
        'W' => 'Ẇ',
        'X' => 'Ẋ',
        'Y' => 'Ẏ',
        'Z' => 'Ẑ',
        _ => return None,
    };
    Some(mapped)
}

impl Strategy for Accented {
    fn transform<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.chars().any(|c| accent(c).is_some()) {
            return Cow::Borrowed(text);
        }

        Cow::Owned(text.chars().map(|c| accent(c).unwrap_or(c)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accented_maps_letters() {
        assert_eq!(Accented.transform("Hello"), "Ħḗŀŀǿ");
        assert_eq!(Accented.transform("Account Settings"), "Ȧƈƈǿŭƞŧ Şḗŧŧīƞɠş");
    }

    #[test]
    fn test_accented_preserves_non_letters() {
        assert_eq!(Accented.transform("3.14 + 2"), "3.14 + 2");
        assert_eq!(Accented.transform("名前"), "名前");
    }

    #[test]
    fn test_accented_borrows_when_nothing_maps() {
        let input = "…!?";
        assert!(matches!(Accented.transform(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_accented_idempotent_on_own_output() {
        let once = Accented.transform("The quick brown fox").into_owned();
        let twice = Accented.transform(&once).into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_accented_preserves_char_count() {
        let input = "Sphinx of black quartz, judge my vow";
        let out = Accented.transform(input);
        assert_eq!(input.chars().count(), out.chars().count());
    }
}
