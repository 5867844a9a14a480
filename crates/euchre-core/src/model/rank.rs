use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    /// Plain (non-trump) order, lowest first.
    pub const ORDERED: [Rank; 6] = [
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Position in [`Rank::ORDERED`].
    pub const fn index(self) -> usize {
        (self as u8 - Rank::Nine as u8) as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rank '{0}'")]
pub struct ParseRankError(pub String);

impl FromStr for Rank {
    type Err = ParseRankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "9" | "NINE" => Ok(Rank::Nine),
            "10" | "TEN" => Ok(Rank::Ten),
            "J" | "JACK" => Ok(Rank::Jack),
            "Q" | "QUEEN" => Ok(Rank::Queen),
            "K" | "KING" => Ok(Rank::King),
            "A" | "ACE" => Ok(Rank::Ace),
            _ => Err(ParseRankError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Rank;

    #[test]
    fn index_follows_ordered_table() {
        for (i, rank) in Rank::ORDERED.iter().enumerate() {
            assert_eq!(rank.index(), i);
        }
    }

    #[test]
    fn display_and_parse_agree() {
        for rank in Rank::ORDERED {
            assert_eq!(rank.to_string().parse::<Rank>(), Ok(rank));
        }
        assert_eq!("q".parse::<Rank>(), Ok(Rank::Queen));
        assert!("2".parse::<Rank>().is_err());
    }
}
