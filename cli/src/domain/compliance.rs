//! Declarative expected-vs-actual comparator.
//!
//! Mismatches are data, not errors: the comparator always produces a verdict.

use confleet_common::CheckOutcome;
use serde_json::Value;

/// Compare an expected structure against an actual one.
///
/// - expected mapping: recurse per key into the actual value; a key missing
///   from the actual side is a non-compliant leaf; complies iff every child
///   complies;
/// - expected array against a non-array actual: wildcard — complies iff any
///   element of the array matches the actual value;
/// - everything else: leaf equality.
#[must_use]
pub fn compare(expected: &Value, actual: &Value) -> bool {
    match expected {
        Value::Object(map) => {
            let Some(actual_map) = actual.as_object() else {
                return false;
            };
            map.iter().all(|(key, exp)| {
                actual_map
                    .get(key)
                    .is_some_and(|act| compare(exp, act))
            })
        }
        Value::Array(options) if !actual.is_array() => {
            options.iter().any(|option| compare(option, actual))
        }
        _ => expected == actual,
    }
}

/// Build a full check outcome carrying both sides of the comparison.
#[must_use]
pub fn verdict(expected: &Value, actual: &Value) -> CheckOutcome {
    CheckOutcome::Verdict {
        complies: compare(expected, actual),
        expected: expected.clone(),
        actual: actual.clone(),
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i32>().prop_map(Value::from),
            "[a-z]{0,8}".prop_map(Value::from),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
                proptest::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                    .prop_map(|m| json!(m)),
            ]
        })
    }

    proptest! {
        /// Every value complies with itself.
        #[test]
        fn prop_reflexive(v in arb_json()) {
            prop_assert!(compare(&v, &v));
        }
    }
}
