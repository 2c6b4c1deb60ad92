//! Output aggregation
//!
//! Sums unspent outputs into a balance. A corrupt output must not make the
//! whole balance unresolvable, so values that fail to parse (or are negative)
//! contribute zero and are only logged. Well-formed values too large or too
//! precise for an exact `Decimal` are an error, never rounded or dropped.

use crate::domain::{parse_exact_decimal, Balance, DecimalParseError};
use crate::error::{LedgerError, LedgerResult};
use crate::store::LedgerStore;

use super::UnspentOutput;

/// Fetch the unspent outputs of `account_ids` in `ecosystem`.
pub async fn fetch_outputs<S>(
    store: &mut S,
    ecosystem: i64,
    account_ids: &[i64],
) -> LedgerResult<Vec<UnspentOutput>>
where
    S: LedgerStore + ?Sized,
{
    let outputs = store.fetch_unspent_outputs(ecosystem, account_ids).await?;

    tracing::debug!(
        ecosystem,
        accounts = account_ids.len(),
        outputs = outputs.len(),
        "Fetched unspent outputs"
    );

    Ok(outputs)
}

/// Sum the outputs credited to `account_id` in `ecosystem`.
///
/// Outputs belonging to other accounts or ecosystems are ignored, so the
/// result of a multi-account fetch can be passed as is.
pub fn sum_outputs(
    outputs: &[UnspentOutput],
    ecosystem: i64,
    account_id: i64,
) -> LedgerResult<Balance> {
    let mut total = Balance::zero();

    for output in outputs
        .iter()
        .filter(|o| o.ecosystem == ecosystem && o.account_id == account_id)
    {
        let value = match parse_exact_decimal(&output.output_value) {
            Ok(value) => value,
            Err(DecimalParseError::OutOfRange) => {
                tracing::error!(
                    ecosystem,
                    account_id,
                    output_index = output.output_index,
                    value = %output.output_value,
                    "Output value exceeds exact decimal range"
                );
                return Err(LedgerError::Overflow {
                    ecosystem,
                    account_id,
                });
            }
            Err(DecimalParseError::Malformed) => {
                tracing::warn!(
                    ecosystem,
                    account_id,
                    output_index = output.output_index,
                    value = %output.output_value,
                    "Malformed output value counted as zero"
                );
                continue;
            }
        };

        // Negative values are treated as malformed and contribute zero, so
        // the sum deliberately differs from a plain sum of every parseable
        // value; the resolved balance can never go below zero.
        let Ok(credit) = Balance::new(value) else {
            tracing::warn!(
                ecosystem,
                account_id,
                output_index = output.output_index,
                %value,
                "Negative output value counted as zero"
            );
            continue;
        };

        total = total.checked_add(credit).ok_or(LedgerError::Overflow {
            ecosystem,
            account_id,
        })?;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn outputs(values: &[&str]) -> Vec<UnspentOutput> {
        values
            .iter()
            .map(|v| UnspentOutput::new(5, 1, *v))
            .collect()
    }

    #[test]
    fn test_sum_skips_malformed_values() {
        let balance = sum_outputs(&outputs(&["10.5", "bad", "4.5"]), 5, 1).unwrap();
        assert_eq!(balance.value(), dec!(15.0));
    }

    #[test]
    fn test_sum_empty_is_zero() {
        let balance = sum_outputs(&[], 5, 1).unwrap();
        assert!(balance.is_zero());
    }

    #[test]
    fn test_sum_negative_value_counts_as_zero() {
        let balance = sum_outputs(&outputs(&["3", "-2", ""]), 5, 1).unwrap();
        assert_eq!(balance.value(), dec!(3));
    }

    #[test]
    fn test_sum_is_exact() {
        let values = vec!["0.1"; 10];
        let balance = sum_outputs(&outputs(&values), 5, 1).unwrap();
        assert_eq!(balance.value(), dec!(1.0));
    }

    #[test]
    fn test_sum_filters_other_accounts() {
        let mut list = outputs(&["1", "2"]);
        list.push(UnspentOutput::new(5, 2, "100"));
        list.push(UnspentOutput::new(6, 1, "100"));

        let balance = sum_outputs(&list, 5, 1).unwrap();
        assert_eq!(balance.value(), dec!(3));
    }

    #[test]
    fn test_sum_value_beyond_decimal_range_is_reported() {
        let result = sum_outputs(&outputs(&["100000000000000000000000000000", "1"]), 5, 1);
        assert!(matches!(
            result,
            Err(LedgerError::Overflow { ecosystem: 5, account_id: 1 })
        ));
    }

    #[test]
    fn test_sum_value_beyond_decimal_scale_is_reported() {
        let tiny = "0.00000000000000000000000000004";
        let result = sum_outputs(&outputs(&[tiny, tiny]), 5, 1);
        assert!(matches!(
            result,
            Err(LedgerError::Overflow { ecosystem: 5, account_id: 1 })
        ));
    }

    #[test]
    fn test_sum_trailing_zeros_beyond_scale_are_exact() {
        let values = ["1.000000000000000000000000000000", "2"];
        let balance = sum_outputs(&outputs(&values), 5, 1).unwrap();
        assert_eq!(balance.value(), dec!(3));
    }

    #[test]
    fn test_sum_that_would_round_is_reported() {
        let result = sum_outputs(&outputs(&["10000000000000000000000000000", "0.1"]), 5, 1);
        assert!(matches!(
            result,
            Err(LedgerError::Overflow { ecosystem: 5, account_id: 1 })
        ));
    }

    #[test]
    fn test_sum_overflow_is_reported() {
        let max = Decimal::MAX.to_string();
        let result = sum_outputs(&outputs(&[max.as_str(), "1"]), 5, 1);
        assert!(matches!(
            result,
            Err(LedgerError::Overflow { ecosystem: 5, account_id: 1 })
        ));
    }
}
