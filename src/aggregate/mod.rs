//! Chart-ready tables derived from filtered records.
//!
//! Each function is a single keyed reduction pass. Group keys come out in
//! ascending order; means over zero rows are `None`; ratios with a zero
//! denominator are [`crate::error::DivisionUndefined`].

pub mod components;
pub mod incidents;
pub mod metrics;
pub mod risks;

use serde::Serialize;
use std::collections::BTreeMap;

/// Running mean; `None` until the first value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let mut m = Mean::default();
    values.into_iter().for_each(|v| m.push(v));
    m.value()
}

/// Row count for one group key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountRow {
    pub key: String,
    pub count: usize,
}

/// Count records per key; rows ordered by key.
pub fn count_by<'a, T: 'a, I, F>(records: I, key: F) -> Vec<CountRow>
where
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> &str,
{
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    for r in records {
        *groups.entry(key(r)).or_default() += 1;
    }
    groups
        .into_iter()
        .map(|(key, count)| CountRow {
            key: key.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_nothing_is_missing() {
        assert_eq!(mean(std::iter::empty()), None);
        assert_eq!(mean([2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn count_by_orders_keys() {
        let words = ["b", "a", "b"];
        let rows = count_by(&words, |w: &&str| *w);
        assert_eq!(
            rows,
            vec![
                CountRow { key: "a".into(), count: 1 },
                CountRow { key: "b".into(), count: 2 },
            ]
        );
    }
}
