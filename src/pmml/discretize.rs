//! Interval discretization for continuous fields.
//!
//! Continuous inputs are presented as a finite set of representative values.
//! The step size adapts to the magnitude of the declared range, and interval
//! closure decides whether the boundaries themselves are candidates.

use super::schema::Interval;

/// Decimal digits kept when emitting candidate values.
const ROUND_DIGITS: i32 = 4;

/// Step size for a range magnitude: 0.1 up to 1, 0.5 up to 10, 1 up to 100,
/// 10 beyond that.
pub fn step_for_range(left: f64, right: f64) -> f64 {
    let range = right - left;
    if range <= 1.0 {
        0.1
    } else if range <= 10.0 {
        0.5
    } else if range <= 100.0 {
        1.0
    } else {
        10.0
    }
}

/// Ordered candidate values spanning the interval.
///
/// Open boundaries are stepped past: an open left margin starts at
/// `left + step`, an open right margin stops at `right - step`. Each emitted
/// value is rounded to four decimals; the accumulator itself is not rounded,
/// matching plain repeated addition.
pub fn candidate_values(interval: &Interval) -> Vec<f64> {
    let step = step_for_range(interval.left, interval.right);
    let mut current = interval.left;
    let mut right = interval.right;
    if interval.closure.excludes_left() {
        current += step;
    }
    if interval.closure.excludes_right() {
        right -= step;
    }

    let mut values = Vec::new();
    while current <= right {
        values.push(round_to_digits(current, ROUND_DIGITS));
        current += step;
    }
    values
}

fn round_to_digits(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pmml::schema::Closure;

    fn interval(left: f64, right: f64, closure: Closure) -> Interval {
        Interval {
            left,
            right,
            closure,
        }
    }

    #[test]
    fn step_table_buckets_by_range_magnitude() {
        assert_eq!(step_for_range(0.0, 1.0), 0.1);
        assert_eq!(step_for_range(0.0, 10.0), 0.5);
        assert_eq!(step_for_range(0.0, 100.0), 1.0);
        assert_eq!(step_for_range(0.0, 250.0), 10.0);
        assert_eq!(step_for_range(50.0, 51.0), 0.1);
    }

    #[test]
    fn closed_unit_interval_has_eleven_values() {
        let values = candidate_values(&interval(0.0, 1.0, Closure::ClosedClosed));
        assert_eq!(values.len(), 11);
        assert_eq!(values.first(), Some(&0.0));
        assert_eq!(values.last(), Some(&1.0));
        assert_eq!(values[3], 0.3);
    }

    #[test]
    fn open_left_boundary_starts_one_step_in() {
        let values = candidate_values(&interval(0.0, 10.0, Closure::OpenClosed));
        assert_eq!(values.first(), Some(&0.5));
        assert_eq!(values.last(), Some(&10.0));
    }

    #[test]
    fn open_right_boundary_stops_one_step_early() {
        let values = candidate_values(&interval(0.0, 1.0, Closure::ClosedOpen));
        assert_eq!(values.first(), Some(&0.0));
        assert_eq!(values.last(), Some(&0.9));
    }

    #[test]
    fn fully_open_interval_trims_both_ends() {
        let values = candidate_values(&interval(0.0, 1.0, Closure::OpenOpen));
        assert_eq!(values.first(), Some(&0.1));
        assert_eq!(values.last(), Some(&0.9));
        assert_eq!(values.len(), 9);
    }

    #[test]
    fn sequences_are_deterministic() {
        let span = interval(0.0, 100.0, Closure::ClosedClosed);
        assert_eq!(candidate_values(&span), candidate_values(&span));
        assert_eq!(candidate_values(&span).len(), 101);
    }

    #[test]
    fn emitted_values_are_rounded_to_four_decimals() {
        let values = candidate_values(&interval(0.0, 1.0, Closure::ClosedClosed));
        for value in values {
            let scaled = value * 10_000.0;
            assert_eq!(scaled, scaled.round());
        }
    }

    #[test]
    fn degenerate_interval_yields_nothing() {
        let values = candidate_values(&interval(1.0, 0.0, Closure::ClosedClosed));
        assert!(values.is_empty());
    }
}
