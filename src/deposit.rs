use crate::error::PipelineError;
use crate::format::{group_thousands, plain, scientific};
use crate::number::parse_weight;
use crate::open_table;

use bigdecimal::BigDecimal;
use csv::StringRecord;
use log::debug;
use num_bigint::BigInt;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;

pub const DEFAULT_WEIGHT_COLUMN: usize = 2;

/// Decimal places of the fixed-point representation token amounts use.
pub const FIXED_POINT_DECIMALS: u32 = 18;
const BASIS_POINTS: u32 = 10_000;

/// 10^18
pub fn fixed_point_scale() -> BigInt {
    BigInt::from(10u32).pow(FIXED_POINT_DECIMALS)
}

/// Whole token units scaled to fixed point.
pub fn fixed_point(units: u64) -> BigInt {
    BigInt::from(units) * fixed_point_scale()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepositParams {
    pub offer_limit: BigInt,
    pub token_price: BigInt,
    pub weight_column: usize,
    pub skip_header: bool,
}

impl Default for DepositParams {
    fn default() -> Self {
        Self {
            offer_limit: fixed_point(24),
            token_price: fixed_point(22_000),
            weight_column: DEFAULT_WEIGHT_COLUMN,
            skip_header: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepositReport {
    #[serde(serialize_with = "as_string")]
    pub total_weight: BigInt,
    #[serde(serialize_with = "as_string")]
    pub offer_limit: BigInt,
    #[serde(serialize_with = "as_string")]
    pub token_price: BigInt,
    pub required_deposit: f64,
}

// Plain digits instead of num-bigint's sign-and-limbs form
fn as_string<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Sums the weight column over every row long enough to have one. Shorter
/// rows are skipped; a weight that is not an integer aborts the sum.
pub fn sum_weights<I>(records: I, weight_column: usize) -> Result<BigInt, PipelineError>
where
    I: IntoIterator<Item = Result<StringRecord, csv::Error>>,
{
    let mut total = BigInt::default();

    for result in records {
        let record = result?;
        let Some(raw) = record.get(weight_column) else {
            continue;
        };

        let weight = parse_weight(raw).ok_or_else(|| PipelineError::ColumnParse {
            value: raw.to_string(),
            line: record.position().map_or(0, |p| p.line()),
        })?;

        total += weight;
    }

    Ok(total)
}

/// `offer_limit * total_weight * 10^18 / (10000 * token_price)`.
///
/// Numerator and denominator are exact integers. The quotient is taken in
/// `BigDecimal` and rounded once into the nearest `f64`.
pub fn required_deposit(
    offer_limit: &BigInt,
    total_weight: &BigInt,
    token_price: &BigInt,
) -> Result<f64, PipelineError> {
    let denominator = token_price * BigInt::from(BASIS_POINTS);
    if denominator == BigInt::default() {
        return Err(PipelineError::ZeroTokenPrice);
    }

    let numerator = offer_limit * total_weight * fixed_point_scale();
    let quotient = BigDecimal::new(numerator, 0) / BigDecimal::new(denominator, 0);

    let (digits, scale) = quotient.as_bigint_and_exponent();
    let value = format!("{}e{}", digits, -scale)
        .parse::<f64>()
        .map_err(|_| PipelineError::ArithmeticOverflow)?;

    if !value.is_finite() {
        return Err(PipelineError::ArithmeticOverflow);
    }

    Ok(value)
}

pub fn compute_required_deposit(
    input: &Path,
    params: &DepositParams,
) -> Result<DepositReport, PipelineError> {
    let mut rdr = open_table(input)?;
    let skip = usize::from(params.skip_header);

    let total_weight = sum_weights(rdr.records().skip(skip), params.weight_column)?;
    debug!("Summed column {} of {}: {}", params.weight_column, input.display(), total_weight);

    let required_deposit = required_deposit(&params.offer_limit, &total_weight, &params.token_price)?;

    Ok(DepositReport {
        total_weight,
        offer_limit: params.offer_limit.clone(),
        token_price: params.token_price.clone(),
        required_deposit,
    })
}

impl fmt::Display for DepositReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total weight: {}", self.total_weight)?;
        writeln!(f, "Total weight formatted: {}", group_thousands(&self.total_weight))?;
        writeln!(f)?;
        writeln!(f, "Calculation parameters:")?;
        writeln!(f, "Offer limit: {}", self.offer_limit)?;
        writeln!(f, "Token price: {}", self.token_price)?;
        writeln!(f)?;
        writeln!(f, "Required deposit: {}", plain(self.required_deposit))?;
        write!(
            f,
            "Required deposit (scientific): {}",
            scientific(self.required_deposit, 2)
        )
    }
}
