//! Classification quality of a rule set.

use ndarray::Array2;

use crate::data::SelectorId;

/// Errors raised while scoring predictions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("{truth} true labels but {predicted} predictions")]
    LengthMismatch { truth: usize, predicted: usize },

    #[error("class {id} is not among the evaluated classes")]
    UnknownClass { id: SelectorId },
}

/// Per-class scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassScores {
    pub class: SelectorId,
    pub recall: f64,
    pub precision: f64,
    pub f1: f64,
    /// Rows whose true class is this one.
    pub support: u32,
}

/// Confusion matrix and derived scores.
///
/// Matrix rows are predicted classes, columns true classes, both in the
/// order of `classes`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEvaluation {
    classes: Vec<SelectorId>,
    confusion: Array2<u32>,
    per_class: Vec<ClassScores>,
}

impl ModelEvaluation {
    /// # Errors
    ///
    /// [`EvalError`] if the slices differ in length or a label is not listed
    /// in `classes`.
    pub fn from_predictions(
        truth: &[SelectorId],
        predicted: &[SelectorId],
        classes: &[SelectorId],
    ) -> Result<Self, EvalError> {
        if truth.len() != predicted.len() {
            return Err(EvalError::LengthMismatch {
                truth: truth.len(),
                predicted: predicted.len(),
            });
        }
        let index = |id: SelectorId| {
            classes
                .iter()
                .position(|&c| c == id)
                .ok_or(EvalError::UnknownClass { id })
        };

        let k = classes.len();
        let mut confusion = Array2::<u32>::zeros((k, k));
        for (&t, &p) in truth.iter().zip(predicted) {
            confusion[[index(p)?, index(t)?]] += 1;
        }

        let per_class = classes
            .iter()
            .enumerate()
            .map(|(i, &class)| {
                let hits = confusion[[i, i]];
                let actual: u32 = confusion.column(i).sum();
                let predicted: u32 = confusion.row(i).sum();
                let recall = ratio(hits, actual);
                let precision = ratio(hits, predicted);
                let f1 = if recall + precision > 0.0 {
                    2.0 * recall * precision / (recall + precision)
                } else {
                    0.0
                };
                ClassScores {
                    class,
                    recall,
                    precision,
                    f1,
                    support: actual,
                }
            })
            .collect();

        Ok(Self {
            classes: classes.to_vec(),
            confusion,
            per_class,
        })
    }

    pub fn classes(&self) -> &[SelectorId] {
        &self.classes
    }

    pub fn confusion(&self) -> &Array2<u32> {
        &self.confusion
    }

    pub fn per_class(&self) -> &[ClassScores] {
        &self.per_class
    }

    pub fn total(&self) -> u32 {
        self.confusion.sum()
    }

    pub fn hits(&self) -> u32 {
        self.confusion.diag().sum()
    }

    pub fn misses(&self) -> u32 {
        self.total() - self.hits()
    }

    /// Fraction of correct predictions; 0 when nothing was predicted.
    pub fn accuracy(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.hits() as f64 / total as f64,
        }
    }

    /// Unweighted mean of per-class `(recall, precision, f1)`.
    pub fn macro_average(&self) -> (f64, f64, f64) {
        let k = self.per_class.len();
        if k == 0 {
            return (0.0, 0.0, 0.0);
        }
        let (r, p, f) = self.per_class.iter().fold((0.0, 0.0, 0.0), |(r, p, f), s| {
            (r + s.recall, p + s.precision, f + s.f1)
        });
        (r / k as f64, p / k as f64, f / k as f64)
    }

    /// Mean of per-class `(recall, precision, f1)` weighted by class support.
    pub fn weighted_average(&self) -> (f64, f64, f64) {
        let total = self.total();
        if total == 0 {
            return (0.0, 0.0, 0.0);
        }
        let (r, p, f) = self.per_class.iter().fold((0.0, 0.0, 0.0), |(r, p, f), s| {
            let w = s.support as f64;
            (r + w * s.recall, p + w * s.precision, f + w * s.f1)
        });
        let total = total as f64;
        (r / total, p / total, f / total)
    }
}

/// `hits / count`, with 0/0 = 1.
#[inline]
fn ratio(hits: u32, count: u32) -> f64 {
    match (hits, count) {
        (0, 0) => 1.0,
        (_, 0) => 0.0,
        _ => hits as f64 / count as f64,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_confusion_layout() {
        let truth = [11, 11, 12, 13, 13, 13];
        let predicted = [11, 12, 12, 13, 11, 13];
        let eval = ModelEvaluation::from_predictions(&truth, &predicted, &[11, 12, 13]).unwrap();

        // rows = predicted, columns = true
        assert_eq!(eval.confusion()[[0, 0]], 1);
        assert_eq!(eval.confusion()[[1, 0]], 1);
        assert_eq!(eval.confusion()[[0, 2]], 1);
        assert_eq!(eval.total(), 6);
        assert_eq!(eval.hits(), 4);
        assert_eq!(eval.misses(), 2);
        assert_relative_eq!(eval.accuracy(), 4.0 / 6.0);
    }

    #[test]
    fn test_per_class_scores() {
        let truth = [11, 11, 12, 13, 13, 13];
        let predicted = [11, 12, 12, 13, 11, 13];
        let eval = ModelEvaluation::from_predictions(&truth, &predicted, &[11, 12, 13]).unwrap();
        let s = eval.per_class();

        assert_relative_eq!(s[0].recall, 0.5);
        assert_relative_eq!(s[0].precision, 0.5);
        assert_relative_eq!(s[1].recall, 1.0);
        assert_relative_eq!(s[1].precision, 0.5);
        assert_relative_eq!(s[1].f1, 2.0 / 3.0);
        assert_relative_eq!(s[2].recall, 2.0 / 3.0);
        assert_relative_eq!(s[2].precision, 1.0);
        assert_eq!(s[2].support, 3);

        let (r, _, _) = eval.weighted_average();
        // weighted recall equals accuracy
        assert_relative_eq!(r, eval.accuracy());
        let (mr, _, _) = eval.macro_average();
        assert_relative_eq!(mr, (0.5 + 1.0 + 2.0 / 3.0) / 3.0);
    }

    #[test]
    fn test_absent_class_scores_one() {
        let eval = ModelEvaluation::from_predictions(&[11, 11], &[11, 11], &[11, 12]).unwrap();
        let absent = eval.per_class()[1];
        assert_eq!(absent.recall, 1.0);
        assert_eq!(absent.precision, 1.0);
    }

    #[test]
    fn test_never_predicted_class() {
        let eval = ModelEvaluation::from_predictions(&[11, 12], &[11, 11], &[11, 12]).unwrap();
        let missed = eval.per_class()[1];
        assert_eq!(missed.recall, 0.0);
        assert_eq!(missed.precision, 0.0);
        assert_eq!(missed.f1, 0.0);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            ModelEvaluation::from_predictions(&[11], &[], &[11]),
            Err(EvalError::LengthMismatch { truth: 1, predicted: 0 })
        );
        assert_eq!(
            ModelEvaluation::from_predictions(&[11], &[14], &[11]),
            Err(EvalError::UnknownClass { id: 14 })
        );
    }
}
