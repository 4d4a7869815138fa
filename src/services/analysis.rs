use rust_decimal::Decimal;

/// Derived aggregates over one indicator's stored series.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub sum: Decimal,
    pub average: Decimal,
    /// Average per-period growth relative to the first observation;
    /// None when the series is too short or starts at zero.
    pub growth_rate_per_period: Option<Decimal>,
}

pub fn summarize(values: &[Decimal]) -> SeriesSummary {
    let count = values.len();
    let sum: Decimal = values.iter().copied().sum();
    let average = if count > 0 {
        sum / Decimal::from(count as i64)
    } else {
        Decimal::ZERO
    };

    SeriesSummary {
        count,
        sum,
        average,
        growth_rate_per_period: linear_growth_rate(values),
    }
}

/// Simple linear growth projection: total relative change from first to
/// last observation, spread evenly across the elapsed periods.
pub fn linear_growth_rate(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }

    let first = *values.first()?;
    let last = *values.last()?;
    if first.is_zero() {
        return None;
    }

    let periods = Decimal::from(values.len() as i64 - 1);
    Some((last - first) / first / periods)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn test_summarize_basic() {
        let summary = summarize(&[dec(10), dec(20), dec(30)]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.sum, dec(60));
        assert_eq!(summary.average, dec(20));
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.sum, Decimal::ZERO);
        assert_eq!(summary.average, Decimal::ZERO);
        assert!(summary.growth_rate_per_period.is_none());
    }

    #[test]
    fn test_growth_rate_doubling_over_two_periods() {
        // 100 → 200 over 2 steps: +100% total, 50% per period
        let rate = linear_growth_rate(&[dec(100), dec(150), dec(200)]).unwrap();
        assert_eq!(rate, Decimal::new(5, 1));
    }

    #[test]
    fn test_growth_rate_negative() {
        let rate = linear_growth_rate(&[dec(100), dec(50)]).unwrap();
        assert_eq!(rate, Decimal::new(-5, 1));
    }

    #[test]
    fn test_growth_rate_zero_start_is_none() {
        assert!(linear_growth_rate(&[dec(0), dec(10)]).is_none());
    }

    #[test]
    fn test_growth_rate_single_point_is_none() {
        assert!(linear_growth_rate(&[dec(42)]).is_none());
    }
}
