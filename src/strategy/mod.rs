//! Text transformation strategies.
//!
//! A [`Strategy`] rewrites a single run of text. The pipeline never
//! inspects the output; the only contract is determinism and idempotence
//! on the strategy's own output, which is what keeps re-localization of
//! already-localized text harmless.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

mod accented;
mod bidi;

pub use accented::Accented;
pub use bidi::Bidi;

// =============================================================================
// Strategy Trait
// =============================================================================

/// A deterministic text transformation.
///
/// Implementations must be idempotent on their own output: feeding a
/// transformed string back in returns it unchanged (or an equal string).
/// The built-ins satisfy this structurally: [`Accented`] only maps ASCII
/// and emits non-ASCII, while [`Bidi`] recognizes its directional wrapper.
pub trait Strategy {
    /// Transforms one run of text.
    ///
    /// Returns `Cow::Borrowed` when nothing changed, which callers use to
    /// skip pointless writes.
    fn transform<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

// =============================================================================
// Built-in Selection
// =============================================================================

/// Names a built-in strategy in config files and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Accented,
    Bidi,
}

impl StrategyKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accented => "accented",
            Self::Bidi => "bidi",
        }
    }

    /// Instantiates the built-in this kind names.
    pub fn strategy(self) -> Rc<dyn Strategy> {
        match self {
            Self::Accented => Rc::new(Accented),
            Self::Bidi => Rc::new(Bidi),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accented" => Ok(Self::Accented),
            "bidi" => Ok(Self::Bidi),
            other => Err(format!(
                "unknown strategy '{other}', expected 'accented' or 'bidi'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parses_case_insensitively() {
        assert_eq!("Accented".parse::<StrategyKind>(), Ok(StrategyKind::Accented));
        assert_eq!("BIDI".parse::<StrategyKind>(), Ok(StrategyKind::Bidi));
        assert!("reverse".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_kind_round_trips_through_display() {
        for kind in [StrategyKind::Accented, StrategyKind::Bidi] {
            assert_eq!(kind.as_str().parse::<StrategyKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_built_ins_are_deterministic() {
        for kind in [StrategyKind::Accented, StrategyKind::Bidi] {
            let strategy = kind.strategy();
            let a = strategy.transform("Submit order").into_owned();
            let b = strategy.transform("Submit order").into_owned();
            assert_eq!(a, b);
        }
    }
}
