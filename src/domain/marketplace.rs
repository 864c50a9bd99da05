//! Marketplace identifiers and platform fee rules.
//!
//! Each marketplace charges a fee as a fraction of the selling price.
//! The fractional fee is converted to whole yen with a per-marketplace
//! rounding policy (floor / round / ceil).

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Whole-yen currency amount. Negative values are valid for profit.
pub type Yen = i64;

/// Supported sales channels, in canonical declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marketplace {
    /// Mercari flea market
    Mercari,
    /// Rakuten Rakuma
    Rakuma,
    /// Yahoo! Flea Market
    Yahoo,
    /// Yahoo! Auctions
    YahooAuction,
}

impl Marketplace {
    /// Every marketplace in canonical order.
    pub const ALL: [Self; 4] = [Self::Mercari, Self::Rakuma, Self::Yahoo, Self::YahooAuction];

    /// Stable identifier used in config files and the API.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mercari => "mercari",
            Self::Rakuma => "rakuma",
            Self::Yahoo => "yahoo",
            Self::YahooAuction => "yahoo_auction",
        }
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Marketplace {
    type Err = UnknownMarketplace;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMarketplace(s.to_string()))
    }
}

/// Returned when parsing an identifier outside the closed marketplace set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown marketplace: {0}")]
pub struct UnknownMarketplace(pub String);

/// How a fractional fee is turned into whole yen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Truncate toward negative infinity.
    #[default]
    Floor,
    /// Nearest yen, halves rounded up.
    Round,
    /// Toward positive infinity.
    Ceil,
}

impl Rounding {
    /// Apply the policy to a decimal amount, returning whole units.
    pub fn apply(self, value: Decimal) -> Decimal {
        let strategy = match self {
            Self::Floor => RoundingStrategy::ToNegativeInfinity,
            Self::Round => RoundingStrategy::MidpointAwayFromZero,
            Self::Ceil => RoundingStrategy::ToPositiveInfinity,
        };
        value.round_dp_with_strategy(0, strategy)
    }
}

/// Fee schedule for a single marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformFeeRule {
    /// Marketplace this rule belongs to.
    pub marketplace: Marketplace,
    /// Human-readable marketplace name.
    pub label: String,
    /// Fraction of the selling price charged as a fee, in [0, 1).
    pub fee_rate: Decimal,
    /// Rounding applied to `selling_price * fee_rate`.
    #[serde(default)]
    pub rounding: Rounding,
    /// Caveat shown next to the fee (e.g. "estimate").
    #[serde(default)]
    pub note: Option<String>,
}

impl PlatformFeeRule {
    /// Platform fee in whole yen for the given selling price.
    ///
    /// Saturates instead of overflowing for absurd prices.
    pub fn fee_for(&self, selling_price: Yen) -> Yen {
        let Some(raw) = Decimal::from(selling_price).checked_mul(self.fee_rate) else {
            return if selling_price.is_negative() { Yen::MIN } else { Yen::MAX };
        };
        self.rounding.apply(raw).to_i64().unwrap_or(selling_price)
    }
}
