use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::core::error::LedgerError;

/// Number of decimal places between one whole coin and its smallest unit.
pub const DECIMALS: u32 = 18;
const WEI_PER_ETHER: u128 = 10u128.pow(DECIMALS);

/// Value in the smallest unit (wei). Unsigned, so a negative amount
/// cannot be constructed. Serialized as a decimal string so that
/// JavaScript clients don't lose precision above 2^53.
#[serde_as]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(#[serde_as(as = "DisplayFromStr")] u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_wei(wei: u128) -> Amount {
        Amount(wei)
    }

    pub const fn wei(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Parses a whole-coin decimal such as `"1"`, `"1.0"` or `"0.25"`.
    pub fn parse_ether(s: &str) -> Result<Amount, LedgerError> {
        let invalid = || LedgerError::InvalidAmount(s.to_owned());

        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };
        if whole.is_empty() || (s.contains('.') && frac.is_empty()) {
            return Err(invalid());
        }
        if frac.len() > DECIMALS as usize {
            return Err(invalid());
        }
        if !all_digits(whole) || !all_digits(frac) {
            return Err(invalid());
        }

        let whole: u128 = whole.parse().map_err(|_| invalid())?;
        let frac_wei: u128 = if frac.is_empty() {
            0
        } else {
            let scale = 10u128.pow(DECIMALS - frac.len() as u32);
            frac.parse::<u128>().map_err(|_| invalid())? * scale
        };

        whole.checked_mul(WEI_PER_ETHER)
            .and_then(|w| w.checked_add(frac_wei))
            .map(Amount)
            .ok_or_else(invalid)
    }

    /// Renders the amount as a whole-coin decimal, always keeping at
    /// least one fractional digit (`1.0`, `0.25`).
    pub fn format_ether(&self) -> String {
        let whole = self.0 / WEI_PER_ETHER;
        let frac = self.0 % WEI_PER_ETHER;
        let frac = format!("{:0width$}", frac, width = DECIMALS as usize);
        let frac = frac.trim_end_matches('0');
        let frac = if frac.is_empty() { "0" } else { frac };
        format!("{}.{}", whole, frac)
    }
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for Amount {
    type Err = LedgerError;

    /// Parses a base-10 count of wei.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !all_digits(s) {
            return Err(LedgerError::InvalidAmount(s.to_owned()));
        }
        s.parse::<u128>()
            .map(Amount)
            .map_err(|_| LedgerError::InvalidAmount(s.to_owned()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}
