//! Evaluation metrics for classification models.

use std::fmt::Write as _;

#[derive(Debug, Clone)]
/// Confusion matrix for a `K`-class classifier.
pub struct ConfusionMatrix {
    /// Number of classes.
    pub n_classes: usize,
    /// Row-major `KxK` counts (`truth * K + predicted`).
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    /// Create an empty `KxK` confusion matrix.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    /// Build a matrix from aligned truth/prediction slices.
    pub fn from_predictions(n_classes: usize, truth: &[usize], predicted: &[usize]) -> Self {
        let mut cm = Self::new(n_classes);
        for (&t, &p) in truth.iter().zip(predicted) {
            cm.add(t, p);
        }
        cm
    }

    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes || predicted >= self.n_classes {
            return;
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Precision/recall statistics for a single class.
pub struct PerClassStats {
    /// `TP / (TP + FP)`.
    pub precision: f32,
    /// `TP / (TP + FN)`.
    pub recall: f32,
    /// Harmonic mean of precision and recall.
    pub f1: f32,
    /// Total number of true examples for the class.
    pub support: u32,
}

/// Compute per-class precision, recall and F1 from a confusion matrix.
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<PerClassStats> {
    let k = cm.n_classes;
    (0..k)
        .map(|class_idx| {
            let tp = cm.get(class_idx, class_idx) as f32;
            let support: u32 = (0..k).map(|j| cm.get(class_idx, j)).sum();
            let predicted: u32 = (0..k).map(|i| cm.get(i, class_idx)).sum();
            let precision = ratio(tp, predicted as f32);
            let recall = ratio(tp, support as f32);
            let f1 = ratio(2.0 * precision * recall, precision + recall);
            PerClassStats {
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect()
}

fn ratio(numerator: f32, denominator: f32) -> f32 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Compute overall accuracy from a confusion matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f32 {
    let total = cm.total();
    if total == 0 {
        return 0.0;
    }
    let correct: u64 = (0..cm.n_classes).map(|i| u64::from(cm.get(i, i))).sum();
    correct as f32 / total as f32
}

/// Macro (unweighted) and support-weighted averages of per-class stats.
pub fn averages(stats: &[PerClassStats]) -> (PerClassStats, PerClassStats) {
    let support: u32 = stats.iter().map(|s| s.support).sum();
    let n = stats.len().max(1) as f32;
    let macro_avg = PerClassStats {
        precision: stats.iter().map(|s| s.precision).sum::<f32>() / n,
        recall: stats.iter().map(|s| s.recall).sum::<f32>() / n,
        f1: stats.iter().map(|s| s.f1).sum::<f32>() / n,
        support,
    };
    let weight = |s: &PerClassStats| s.support as f32 / support.max(1) as f32;
    let weighted_avg = PerClassStats {
        precision: stats.iter().map(|s| s.precision * weight(s)).sum(),
        recall: stats.iter().map(|s| s.recall * weight(s)).sum(),
        f1: stats.iter().map(|s| s.f1 * weight(s)).sum(),
        support,
    };
    (macro_avg, weighted_avg)
}

/// Text table with one row per class plus accuracy and averages.
pub fn classification_report(cm: &ConfusionMatrix, classes: &[String]) -> String {
    let stats = precision_recall_by_class(cm);
    let width = classes
        .iter()
        .map(String::len)
        .chain(["weighted avg".len()])
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>width$}  {:>9}  {:>9}  {:>9}  {:>9}",
        "", "precision", "recall", "f1-score", "support"
    );
    out.push('\n');
    for (name, s) in classes.iter().zip(&stats) {
        let _ = writeln!(
            out,
            "{name:>width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9}",
            s.precision, s.recall, s.f1, s.support
        );
    }
    out.push('\n');
    let (macro_avg, weighted_avg) = averages(&stats);
    let _ = writeln!(
        out,
        "{:>width$}  {:>9}  {:>9}  {:>9.2}  {:>9}",
        "accuracy",
        "",
        "",
        accuracy(cm),
        cm.total()
    );
    for (label, s) in [("macro avg", macro_avg), ("weighted avg", weighted_avg)] {
        let _ = writeln!(
            out,
            "{label:>width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9}",
            s.precision, s.recall, s.f1, s.support
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> ConfusionMatrix {
        // truth:     0 0 0 1 1 2
        // predicted: 0 0 1 1 1 0
        ConfusionMatrix::from_predictions(3, &[0, 0, 0, 1, 1, 2], &[0, 0, 1, 1, 1, 0])
    }

    #[test]
    fn accuracy_counts_diagonal() {
        let cm = sample_matrix();
        assert_eq!(cm.total(), 6);
        assert!((accuracy(&cm) - 4.0 / 6.0).abs() < 1e-6);
        assert_eq!(accuracy(&ConfusionMatrix::new(2)), 0.0);
    }

    #[test]
    fn per_class_stats() {
        let stats = precision_recall_by_class(&sample_matrix());
        assert!((stats[0].precision - 2.0 / 3.0).abs() < 1e-6);
        assert!((stats[0].recall - 2.0 / 3.0).abs() < 1e-6);
        assert!((stats[1].precision - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(stats[1].recall, 1.0);
        assert!((stats[1].f1 - 0.8).abs() < 1e-6);
        assert_eq!(stats[2].precision, 0.0);
        assert_eq!(stats[2].f1, 0.0);
        assert_eq!(stats[2].support, 1);
    }

    #[test]
    fn weighted_average_uses_support() {
        let stats = precision_recall_by_class(&sample_matrix());
        let (macro_avg, weighted) = averages(&stats);
        assert_eq!(macro_avg.support, 6);
        assert!((macro_avg.recall - (2.0 / 3.0 + 1.0) / 3.0).abs() < 1e-6);
        assert!((weighted.recall - 4.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn report_lists_every_class() {
        let classes = vec!["Paddy".to_string(), "Ragi".to_string(), "Wheat".to_string()];
        let report = classification_report(&sample_matrix(), &classes);
        for name in ["Paddy", "Ragi", "Wheat", "accuracy", "macro avg", "weighted avg"] {
            assert!(report.contains(name), "missing {name} in\n{report}");
        }
        assert!(report.contains("0.67"));
    }
}
