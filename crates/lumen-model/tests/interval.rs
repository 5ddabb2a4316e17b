//! Algebraic properties of interval multiplication.

use lumen_model::Interval;
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-12;

fn interval() -> impl Strategy<Value = Interval> {
    (0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(a, b)| Interval {
        min: a.min(b),
        max: a.max(b),
    })
}

proptest! {
    #[test]
    fn multiply_is_commutative(a in interval(), b in interval()) {
        prop_assert_eq!(a * b, b * a);
    }

    #[test]
    fn multiply_is_associative(a in interval(), b in interval(), c in interval()) {
        let left = (a * b) * c;
        let right = a * (b * c);
        prop_assert!(left.approx_eq(&right, TOLERANCE), "{left} vs {right}");
    }

    #[test]
    fn one_is_neutral(a in interval()) {
        prop_assert_eq!(a * Interval::ONE, a);
    }

    #[test]
    fn product_stays_well_formed(a in interval(), b in interval()) {
        prop_assert!((a * b).is_well_formed());
    }

    #[test]
    fn product_order_does_not_matter(values in prop::collection::vec(interval(), 0..8)) {
        let forward: Interval = values.iter().product();
        let backward: Interval = values.iter().rev().product();
        prop_assert!(forward.approx_eq(&backward, TOLERANCE));
    }
}
