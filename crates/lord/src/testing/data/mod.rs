use rand::prelude::*;

use crate::data::{Dataset, Selector, SelectorId, SelectorTable};

/// Attribute of each selector of [`reference_dataset`], by selector id.
///
/// Attributes 0..=3 are predictors; attribute 4 is the class.
pub const REFERENCE_ATTRIBUTES: [u32; 14] = [0, 2, 0, 3, 3, 2, 1, 2, 3, 1, 0, 4, 4, 4];

const REFERENCE_ROWS: [[SelectorId; 5]; 20] = [
    [2, 5, 6, 8, 11],
    [2, 5, 8, 9, 11],
    [2, 3, 6, 7, 12],
    [2, 4, 6, 7, 12],
    [2, 6, 7, 8, 12],
    [0, 5, 6, 8, 11],
    [0, 5, 8, 9, 11],
    [6, 7, 8, 10, 12],
    [1, 3, 9, 10, 13],
    [1, 4, 9, 10, 13],
    [1, 8, 9, 10, 13],
    [7, 8, 9, 10, 13],
    [5, 6, 8, 10, 11],
    [5, 8, 9, 10, 13],
    [3, 6, 7, 10, 12],
    [3, 5, 9, 10, 13],
    [3, 7, 9, 10, 13],
    [4, 6, 7, 10, 12],
    [4, 5, 9, 10, 13],
    [4, 7, 9, 10, 13],
];

/// Small hand-checked dataset: 20 rows over predictors `0..=10` and classes
/// 11, 12 and 13.
pub fn reference_dataset() -> Dataset {
    let selectors = REFERENCE_ATTRIBUTES
        .iter()
        .enumerate()
        .map(|(id, &attribute)| {
            if attribute == 4 {
                Selector::target(id as SelectorId, attribute)
            } else {
                Selector::predictor(id as SelectorId, attribute)
            }
        })
        .collect();
    let table = SelectorTable::new(selectors).expect("reference selectors are valid");
    Dataset::new(table, REFERENCE_ROWS.iter().map(|r| r.to_vec()).collect())
        .expect("reference rows are valid")
}

/// Generate a categorical classification dataset.
///
/// Attribute `a` taking value `v` is selector `a * values_per_attribute + v`;
/// class selectors follow the predictors. The class is a function of the
/// first two attributes, replaced by a uniformly drawn class with
/// probability `noise`. About one value in ten is missing.
pub fn synthetic_classification(
    n_rows: usize,
    n_attributes: usize,
    values_per_attribute: usize,
    n_classes: usize,
    seed: u64,
    noise: f64,
) -> Dataset {
    assert!(n_attributes > 0 && values_per_attribute > 0 && n_classes > 0);
    let mut rng = StdRng::seed_from_u64(seed);
    let n_predictors = n_attributes * values_per_attribute;
    let table = SelectorTable::with_counts(n_predictors, n_classes)
        .expect("synthetic selectors are valid");

    let rows = (0..n_rows)
        .map(|_| {
            let values: Vec<usize> = (0..n_attributes)
                .map(|_| rng.gen_range(0..values_per_attribute))
                .collect();
            let mut class = values.iter().take(2).sum::<usize>() % n_classes;
            if rng.r#gen::<f64>() < noise {
                class = rng.gen_range(0..n_classes);
            }

            let mut row: Vec<SelectorId> = values
                .iter()
                .enumerate()
                .filter(|_| rng.r#gen::<f64>() >= 0.1)
                .map(|(a, &v)| (a * values_per_attribute + v) as SelectorId)
                .collect();
            row.push((n_predictors + class) as SelectorId);
            row
        })
        .collect();

    Dataset::new(table, rows).expect("synthetic rows are valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_supports() {
        let ds = reference_dataset();
        assert_eq!(ds.n_rows(), 20);
        let support = |id: SelectorId| ds.selectors().get(id).unwrap().support;
        assert_eq!(support(11), 5);
        assert_eq!(support(12), 6);
        assert_eq!(support(13), 9);
        assert_eq!(support(10), 13);
        assert_eq!(ds.majority_class(), 13);
    }

    #[test]
    fn test_synthetic_is_deterministic() {
        let a = synthetic_classification(50, 4, 3, 2, 7, 0.1);
        let b = synthetic_classification(50, 4, 3, 2, 7, 0.1);
        assert_eq!(a.n_rows(), 50);
        assert_eq!(a.selectors().n_predictors(), 12);
        assert_eq!(a.selectors().n_targets(), 2);
        assert!(a.rows().zip(b.rows()).all(|(x, y)| x == y));
    }
}
