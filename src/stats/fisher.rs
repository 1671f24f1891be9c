//! Fisher's exact test for 2x2 contingency tables
use statrs::distribution::{Discrete, Hypergeometric};

use crate::stats::{f64_from_u64, ContingencyTable};
use crate::{OboError, OboResult};

/// Relative tolerance when comparing table probabilities
const RELATIVE_TOLERANCE: f64 = 1e-7;

/// Calculates the odds ratio and two-sided p-value of Fisher's exact test
///
/// The p-value is the sum of the probabilities of all tables with the
/// same margins that are not more likely than the observed table.
///
/// A table with an empty row or column returns `(NaN, 1.0)`.
///
/// # Errors
///
/// [`OboError::InvalidContingencyTable`] if the margins can't form
/// a hypergeometric distribution
///
/// # Examples
///
/// ```
/// use obogo::stats::ContingencyTable;
/// use obogo::stats::fisher::fisher_exact;
///
/// let table = ContingencyTable::new(8, 2, 1, 5);
/// let (odds_ratio, pvalue) = fisher_exact(&table).unwrap();
/// assert!((odds_ratio - 20.0).abs() < 1e-12);
/// assert!((pvalue - 0.034965034965035).abs() < 1e-9);
/// ```
pub fn fisher_exact(table: &ContingencyTable) -> OboResult<(f64, f64)> {
    let [[s11, s12], [s21, s22]] = table.as_array();
    if s11 + s12 == 0 || s21 + s22 == 0 || s11 + s21 == 0 || s12 + s22 == 0 {
        return Ok((f64::NAN, 1.0));
    }

    let odds_ratio = if s12 == 0 || s21 == 0 {
        f64::INFINITY
    } else {
        (f64_from_u64(s11) * f64_from_u64(s22)) / (f64_from_u64(s12) * f64_from_u64(s21))
    };

    let population = table.total();
    let successes = s11 + s12;
    let draws = s11 + s21;
    let hyper = Hypergeometric::new(population, successes, draws)
        .map_err(|_| OboError::InvalidContingencyTable)?;

    let lowest = draws.saturating_sub(population - successes);
    let highest = successes.min(draws);
    let threshold = hyper.pmf(s11) * (1.0 + RELATIVE_TOLERANCE);

    let pvalue: f64 = (lowest..=highest)
        .map(|x| hyper.pmf(x))
        .filter(|p| *p <= threshold)
        .sum();

    Ok((odds_ratio, pvalue.min(1.0)))
}
