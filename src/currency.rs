//! The fixed set of currencies that balances can be charted for.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A supported currency, identified on the wire by its numeric asset code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum CurrencyCode {
    /// The stable dollar token, asset code 13.
    Hbd,
    /// The native token, asset code 21.
    Hive,
    /// Vesting shares, asset code 37.
    Vests,
}

impl CurrencyCode {
    /// Every supported currency, in the order their charts are shown.
    pub const ALL: [CurrencyCode; 3] = [CurrencyCode::Hbd, CurrencyCode::Hive, CurrencyCode::Vests];

    /// The numeric code sent to the backend as `_coin_type`.
    pub fn code(self) -> u16 {
        match self {
            CurrencyCode::Hbd => 13,
            CurrencyCode::Hive => 21,
            CurrencyCode::Vests => 37,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CurrencyCode::Hbd => "HBD",
            CurrencyCode::Hive => "HIVE",
            CurrencyCode::Vests => "VESTS",
        }
    }
}

impl TryFrom<u16> for CurrencyCode {
    type Error = Error;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            13 => Ok(CurrencyCode::Hbd),
            21 => Ok(CurrencyCode::Hive),
            37 => Ok(CurrencyCode::Vests),
            other => Err(Error::UnknownCurrency(other)),
        }
    }
}

impl From<CurrencyCode> for u16 {
    fn from(currency: CurrencyCode) -> Self {
        currency.code()
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, currency::CurrencyCode};

    #[test]
    fn codes_round_trip() {
        for currency in CurrencyCode::ALL {
            assert_eq!(CurrencyCode::try_from(currency.code()), Ok(currency));
        }
    }

    #[test]
    fn rejects_unknown_code() {
        assert_eq!(CurrencyCode::try_from(14), Err(Error::UnknownCurrency(14)));
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&CurrencyCode::Hive).unwrap();

        assert_eq!(json, "21");
    }
}
