//! Summing priced contributions into a single cost.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Label used by the free-text cost hint when none is configured.
pub const DEFAULT_COST_LABEL: &str = "Cost";

static DEFAULT_HINT_RE: LazyLock<Regex> =
    LazyLock::new(|| CostHint::build_regex(DEFAULT_COST_LABEL).unwrap());

/// Anything that can contribute a price to an aggregate.
///
/// `None` means the record has no usable price and contributes nothing.
pub trait Priced {
    fn price(&self) -> Option<f64>;
}

impl Priced for f64 {
    fn price(&self) -> Option<f64> {
        Some(*self)
    }
}

impl<T: Priced> Priced for &T {
    fn price(&self) -> Option<f64> {
        (*self).price()
    }
}

/// The "label ... : ... number" rule applied to free text.
///
/// Only the first match in a string is honored and its number is read as an
/// integer, so `Cost: 12.5` contributes 12.
#[derive(Debug, Clone)]
pub struct CostHint {
    re: Regex,
}

impl CostHint {
    pub fn with_label(label: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            re: Self::build_regex(label)?,
        })
    }

    fn build_regex(label: &str) -> Result<Regex, regex::Error> {
        // `.` stops at line breaks, so label, colon and number share a line
        Regex::new(&format!(r"(?i){}.*?:.*?([0-9.]+)", regex::escape(label)))
    }

    /// Returns the value of the first hint in `text`, if any.
    pub fn extract(&self, text: &str) -> Option<f64> {
        let captured = self.re.captures(text)?.get(1)?.as_str();
        let digits: String = captured.chars().take_while(|c| c.is_ascii_digit()).collect();
        match digits.parse::<i64>() {
            Ok(value) => Some(value as f64),
            Err(_) => {
                debug!("Ignoring unparseable cost hint: {captured:?}");
                None
            }
        }
    }
}

impl Default for CostHint {
    fn default() -> Self {
        Self {
            re: DEFAULT_HINT_RE.clone(),
        }
    }
}

/// Sums positive prices plus an optional free-text cost hint.
#[derive(Debug, Clone, Default)]
pub struct CostAggregator {
    hint: CostHint,
}

impl CostAggregator {
    pub fn new(hint: CostHint) -> Self {
        Self { hint }
    }

    pub fn with_label(label: &str) -> Result<Self, regex::Error> {
        Ok(Self::new(CostHint::with_label(label)?))
    }

    pub fn aggregate<I>(&self, records: I, free_text: Option<&str>) -> f64
    where
        I: IntoIterator,
        I::Item: Priced,
    {
        let mut total: f64 = records
            .into_iter()
            .filter_map(|r| r.price())
            .filter(|p| *p > 0.0)
            .sum();

        if let Some(text) = free_text.filter(|t| !t.is_empty())
            && let Some(extra) = self.hint.extract(text)
        {
            debug!("Adding {extra} from free-text cost hint");
            total += extra;
        }
        total
    }
}

/// Aggregates with the default `Cost` label.
pub fn aggregate<I>(records: I, free_text: Option<&str>) -> f64
where
    I: IntoIterator,
    I::Item: Priced,
{
    CostAggregator::default().aggregate(records, free_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Record(Option<f64>);

    impl Priced for Record {
        fn price(&self) -> Option<f64> {
            self.0
        }
    }

    #[test]
    fn test_excludes_non_positive_prices() {
        assert_eq!(aggregate([-5.0, 0.0, 3.0], None), 3.0);
    }

    #[test]
    fn test_order_independent() {
        let forward = aggregate([1.5, 2.0, 7.0, -1.0], None);
        let backward = aggregate([-1.0, 7.0, 2.0, 1.5], None);
        assert_eq!(forward, backward);
        assert_eq!(forward, 10.5);
    }

    #[test]
    fn test_missing_and_nan_prices_are_skipped() {
        let records = vec![Record(None), Record(Some(f64::NAN)), Record(Some(4.0))];
        assert_eq!(aggregate(&records, None), 4.0);
    }

    #[test]
    fn test_free_text_hint() {
        let empty: [f64; 0] = [];
        assert_eq!(aggregate(empty, Some("Cost, roughly: 12 credits")), 12.0);
        assert_eq!(aggregate(empty, Some("no cost mentioned")), 0.0);
        assert_eq!(aggregate(empty, Some("")), 0.0);
        assert_eq!(aggregate(empty, None), 0.0);
    }

    #[test]
    fn test_free_text_first_match_only() {
        let text = "Cost: 4\nUpkeep cost: 9";
        assert_eq!(aggregate([1.0], Some(text)), 5.0);
    }

    #[test]
    fn test_free_text_case_insensitive_and_truncated() {
        let empty: [f64; 0] = [];
        assert_eq!(aggregate(empty, Some("<p>LP COST: 7.9</p>")), 7.0);
    }

    #[test]
    fn test_free_text_malformed_number_is_ignored() {
        let empty: [f64; 0] = [];
        assert_eq!(aggregate(empty, Some("Cost: .5")), 0.0);
        assert_eq!(aggregate(empty, Some("Cost\n: 5")), 0.0);
    }

    #[test]
    fn test_custom_label() {
        let aggregator = CostAggregator::with_label("Price (LP)").unwrap();
        assert_eq!(aggregator.aggregate([2.0], Some("price (lp): 3")), 5.0);
        assert_eq!(aggregator.aggregate([2.0], Some("Cost: 3")), 2.0);
    }
}
