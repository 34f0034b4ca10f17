//! Currency variants the network library can be compiled for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown currency: {0} (expected one of BCH, BTC, LTC)")]
pub struct UnknownCurrency(pub String);

/// A compile-time protocol variant. Exactly one is selected per build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
  Bch,
  Btc,
  Ltc,
}

impl Currency {
  pub const ALL: [Currency; 3] = [Currency::Bch, Currency::Btc, Currency::Ltc];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Bch => "BCH",
      Self::Btc => "BTC",
      Self::Ltc => "LTC",
    }
  }
}

impl fmt::Display for Currency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Currency {
  type Err = UnknownCurrency;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_uppercase().as_str() {
      "BCH" => Ok(Self::Bch),
      "BTC" => Ok(Self::Btc),
      "LTC" => Ok(Self::Ltc),
      _ => Err(UnknownCurrency(s.to_string())),
    }
  }
}
