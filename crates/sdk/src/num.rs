use fastnum::D256;

use crate::{
    error::NormalizationError,
    types::{Address, BigNumber, Instant},
};

/// Converter between raw on-chain integers and decimals with the given number
/// of decimal places.
#[derive(Clone, Copy, Debug)]
pub struct Converter {
    decimals: u8,
}

impl Converter {
    pub fn new(decimals: u8) -> Self { Self { decimals } }

    pub fn decimals(&self) -> u8 { self.decimals }

    /// Converts raw amount to decimal, e.g. `1500000000000000000` wei with 18
    /// decimals to `1.5`. `None` when the value does not fit [`D256`] precision.
    pub fn to_decimal(&self, value: BigNumber) -> Option<D256> {
        let (sign, abs) = value.into_sign_and_abs();
        let digits = abs.to_string();
        let decimals = self.decimals as usize;
        let mut s = String::with_capacity(digits.len() + decimals + 3);
        if sign.is_negative() {
            s.push('-');
        }
        if digits.len() > decimals {
            let (int, frac) = digits.split_at(digits.len() - decimals);
            s.push_str(int);
            if !frac.is_empty() {
                s.push('.');
                s.push_str(frac);
            }
        } else {
            s.push_str("0.");
            s.extend(std::iter::repeat_n('0', decimals - digits.len()));
            s.push_str(&digits);
        }
        s.parse::<D256>().ok()
    }
}

/// Field parser of raw indexing service values for a particular entity kind.
/// Fails fast with [`NormalizationError`] instead of defaulting.
#[derive(Clone, Copy)]
pub(crate) struct Parser {
    entity: &'static str,
}

impl Parser {
    pub(crate) fn new(entity: &'static str) -> Self { Self { entity } }

    pub(crate) fn big(&self, field: &'static str, value: &str) -> Result<BigNumber, NormalizationError> {
        // `from_dec_str` reads an empty or sign-only string as zero
        let digits = value.strip_prefix('-').unwrap_or(value);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.number_err(field, value));
        }
        BigNumber::from_dec_str(value).map_err(|_| self.number_err(field, value))
    }

    pub(crate) fn opt_big(
        &self,
        field: &'static str,
        value: Option<&str>,
    ) -> Result<Option<BigNumber>, NormalizationError> {
        not_null(value).map(|v| self.big(field, v)).transpose()
    }

    pub(crate) fn u64(&self, field: &'static str, value: &str) -> Result<u64, NormalizationError> {
        value.parse().map_err(|_| self.number_err(field, value))
    }

    pub(crate) fn opt_u64(
        &self,
        field: &'static str,
        value: Option<&str>,
    ) -> Result<Option<u64>, NormalizationError> {
        not_null(value).map(|v| self.u64(field, v)).transpose()
    }

    pub(crate) fn address(&self, field: &'static str, value: &str) -> Result<Address, NormalizationError> {
        value.parse::<Address>().map_err(|_| NormalizationError::Address {
            entity: self.entity,
            field,
            value: value.to_string(),
        })
    }

    /// Block number and timestamp pair, e.g. `createdAtBlockNumber` and
    /// `createdAtTimestamp`.
    pub(crate) fn instant(
        &self,
        block_field: &'static str,
        block_number: &str,
        timestamp_field: &'static str,
        timestamp: &str,
    ) -> Result<Instant, NormalizationError> {
        Ok(Instant::new(self.u64(block_field, block_number)?, self.u64(timestamp_field, timestamp)?))
    }

    /// Instant of lifecycle event that may not have happened yet.
    pub(crate) fn opt_instant(
        &self,
        block_field: &'static str,
        block_number: Option<&str>,
        timestamp_field: &'static str,
        timestamp: Option<&str>,
    ) -> Result<Option<Instant>, NormalizationError> {
        match (self.opt_u64(block_field, block_number)?, self.opt_u64(timestamp_field, timestamp)?) {
            (Some(b), Some(t)) => Ok(Some(Instant::new(b, t))),
            (None, None) => Ok(None),
            // Half-populated instant is a partial response
            (Some(_), None) => Err(self.number_err(timestamp_field, "null")),
            (None, Some(_)) => Err(self.number_err(block_field, "null")),
        }
    }

    fn number_err(&self, field: &'static str, value: &str) -> NormalizationError {
        NormalizationError::Number { entity: self.entity, field, value: value.to_string() }
    }
}

/// Pending lifecycle fields come as JSON `null` or, from some deployments, as
/// the text `"null"`.
fn not_null(value: Option<&str>) -> Option<&str> { value.filter(|v| *v != "null") }

#[cfg(test)]
mod tests {
    use fastnum::dec256;

    use super::*;

    #[test]
    fn test_big_number_is_exact() {
        let p = Parser::new("Stream");
        assert_eq!(
            p.big("flowRate", "123456789012345678").unwrap().to_string(),
            "123456789012345678"
        );
        assert_eq!(
            p.big("netFlowRate", "-38580246913580246913580").unwrap().to_string(),
            "-38580246913580246913580"
        );
        assert!(matches!(
            p.big("flowRate", "1.5"),
            Err(NormalizationError::Number { field: "flowRate", .. })
        ));
    }

    #[test]
    fn test_big_number_rejects_empty_and_sign_only() {
        let p = Parser::new("Stream");
        for value in ["", "-", "+", "+5", "--1", " 1", "0x10"] {
            assert!(
                matches!(p.big("flowRate", value), Err(NormalizationError::Number { field: "flowRate", .. })),
                "{value:?} accepted"
            );
        }
        assert_eq!(p.big("flowRate", "-0").unwrap(), BigNumber::ZERO);
        assert!(p.opt_big("flowRate", Some("")).is_err());
    }

    #[test]
    fn test_optional_fields() {
        let p = Parser::new("StreamPeriod");
        assert_eq!(p.opt_u64("stoppedAtTimestamp", None).unwrap(), None);
        assert_eq!(p.opt_u64("stoppedAtTimestamp", Some("null")).unwrap(), None);
        assert_eq!(p.opt_u64("stoppedAtTimestamp", Some("42")).unwrap(), Some(42));
        assert!(p.opt_u64("stoppedAtTimestamp", Some("soon")).is_err());
        assert!(p.opt_instant("b", Some("1"), "t", None).is_err());
        assert_eq!(p.opt_instant("b", Some("1"), "t", Some("2")).unwrap(), Some(Instant::new(1, 2)));
    }

    #[test]
    fn test_converter() {
        let c = Converter::new(18);
        let wei = BigNumber::from_dec_str("1500000000000000000").unwrap();
        assert_eq!(c.to_decimal(wei), Some(dec256!(1.5)));
        let small = BigNumber::from_dec_str("-25").unwrap();
        assert_eq!(c.to_decimal(small), Some(-dec256!(0.000000000000000025)));
        assert_eq!(Converter::new(0).to_decimal(BigNumber::from_dec_str("7").unwrap()), Some(dec256!(7)));
    }
}
