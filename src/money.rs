/// 고정 소수점 통화 금액 (소수점 둘째 자리)
// region:    --- Imports
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Money
/// NUMERIC(10,2) 컬럼에 대응하는 금액
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, sqlx::Type)]
#[sqlx(transparent)]
pub struct Money(Decimal);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount is not a decimal number: {0}")]
    Malformed(String),
    #[error("amount must not be negative")]
    Negative,
    #[error("amount must have at most 2 decimal places")]
    TooPrecise,
    #[error("amount must not exceed 99999999.99")]
    TooLarge,
}

// 10자리 중 소수 2자리
const MAX_CENTS: i64 = 9_999_999_999;

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// 사용자 입력 금액 파싱
    pub fn parse(text: &str) -> Result<Self, MoneyError> {
        let text = text.trim();
        // 지수 표기, 자리 구분자 불허
        if !text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        {
            return Err(MoneyError::Malformed(text.to_string()));
        }
        let value = match Decimal::from_str_exact(text) {
            Ok(value) => value,
            Err(rust_decimal::Error::Underflow) => return Err(MoneyError::TooPrecise),
            Err(_) => return Err(MoneyError::Malformed(text.to_string())),
        };
        Self::try_from(value)
    }

    /// 표시용 포맷 (예: USD $1,234.50)
    pub fn to_usd(&self) -> String {
        let plain = self.to_string();
        let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        format!("USD ${}.{}", grouped, fraction)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(MoneyError::Negative);
        }
        if value.normalize().scale() > 2 {
            return Err(MoneyError::TooPrecise);
        }
        if value > Decimal::new(MAX_CENTS, 2) {
            return Err(MoneyError::TooLarge);
        }
        Ok(Money(value))
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.0;
        value.rescale(2);
        write!(f, "{}", value)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Money::parse(&text).map_err(serde::de::Error::custom)
    }
}
// endregion: --- Money

// endregion: --- Tests
