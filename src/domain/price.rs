use rust_decimal::Decimal;

/// The amount charged per renewal cycle. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price(Decimal);

impl Price {
    pub fn parse(amount: Decimal) -> Result<Price, String> {
        if amount < Decimal::ZERO {
            Err(format!("{} is not a valid subscription price.", amount))
        } else {
            Ok(Self(amount))
        }
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}
