use super::{Ordered, ValueError};
use crate::mir::Prefix;
use std::fmt::{Display, Formatter};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Decimal(f64),
}

impl Number {
    /// Parse an integer, or a finite decimal (`100.00`, `1e2`).
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        if let Ok(value) = value.parse::<i64>() {
            return Ok(Self::Integer(value));
        }

        match value.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Self::Decimal(value)),
            _ => Err(ValueError::InvalidValue(value.to_string())),
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            // keeps the decimal point, so the value stays a decimal when parsed again
            Self::Decimal(value) => write!(f, "{value:?}"),
        }
    }
}

/// A quantity: `[prefix]number[|system|code]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Quantity {
    pub number: Number,
    pub system: Option<String>,
    pub code: Option<String>,
}

impl Quantity {
    pub fn parse(value: &str) -> Result<Ordered<Self>, ValueError> {
        let (number, system, code) = match value.split('|').collect::<Vec<_>>().as_slice() {
            [number] => (*number, None, None),
            [number, system, code] => (*number, Some(system.to_string()), Some(code.to_string())),
            _ => return Err(ValueError::InvalidValue(value.to_string())),
        };

        let (prefix, number) = Prefix::split(number);

        Ok(Ordered {
            prefix,
            value: Self {
                number: Number::parse(number)?,
                system,
                code,
            },
        })
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number)?;
        if let (Some(system), Some(code)) = (&self.system, &self.code) {
            write!(f, "|{system}|{code}")?;
        }
        Ok(())
    }
}
