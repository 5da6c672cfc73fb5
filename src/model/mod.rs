pub mod source;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::data::frame::{CellValue, Frame};

/// Column name for the predicted class, matching the scoring convention the
/// exported workbooks are consumed under.
pub const LABEL_COLUMN: &str = "prediction_label";
/// Column name for the probability of the predicted class.
pub const SCORE_COLUMN: &str = "prediction_score";

// ---------------------------------------------------------------------------
// Model – the single capability the pipeline needs
// ---------------------------------------------------------------------------

/// An opaque trained model. The pipeline treats it as a black box with one
/// capability: score a table, returning the same rows in the same order with
/// prediction columns appended.
pub trait Model {
    fn predict(&self, frame: &Frame) -> Result<Frame>;
}

// ---------------------------------------------------------------------------
// ClassifierModel – the serialized artifact both sources deserialize
// ---------------------------------------------------------------------------

/// A binary logistic classifier trained offline and serialized as JSON.
///
/// `predict` appends [`LABEL_COLUMN`] and [`SCORE_COLUMN`] to its input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierModel {
    /// Feature column names, in weight order.
    pub features: Vec<String>,
    /// One weight per feature.
    pub weights: Vec<f64>,
    pub intercept: f64,
    /// Class names: `classes[0]` below the threshold, `classes[1]` at or
    /// above it.
    pub classes: [String; 2],
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

impl ClassifierModel {
    /// Deserialize and validate a model artifact.
    pub fn from_bytes(bytes: &[u8]) -> Result<ClassifierModel> {
        let model: ClassifierModel =
            serde_json::from_slice(bytes).context("deserializing model")?;
        if model.features.is_empty() {
            bail!("model has no features");
        }
        if model.weights.len() != model.features.len() {
            bail!(
                "model has {} weights for {} features",
                model.weights.len(),
                model.features.len()
            );
        }
        Ok(model)
    }

    fn feature_matrix<'a>(&self, frame: &'a Frame) -> Result<Vec<&'a [CellValue]>> {
        self.features
            .iter()
            .map(|name| {
                frame
                    .column(name)
                    .with_context(|| format!("input is missing feature column '{name}'"))
            })
            .collect()
    }
}

impl Model for ClassifierModel {
    fn predict(&self, frame: &Frame) -> Result<Frame> {
        let feature_cols = self.feature_matrix(frame)?;

        let mut labels = Vec::with_capacity(frame.n_rows());
        let mut scores = Vec::with_capacity(frame.n_rows());

        for row in 0..frame.n_rows() {
            let mut z = self.intercept;
            for ((name, weight), col) in self.features.iter().zip(&self.weights).zip(&feature_cols)
            {
                let x = col[row].as_f64().with_context(|| {
                    format!("feature '{name}' is not numeric at row {row}")
                })?;
                z += weight * x;
            }
            let p = 1.0 / (1.0 + (-z).exp());
            let positive = p >= self.threshold;
            labels.push(CellValue::String(self.classes[positive as usize].clone()));
            // Probability of the predicted class, not of the positive class.
            scores.push(CellValue::Float(if positive { p } else { 1.0 - p }));
        }

        frame
            .clone()
            .with_column(LABEL_COLUMN, labels)?
            .with_column(SCORE_COLUMN, scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ClassifierModel {
        ClassifierModel {
            features: vec!["age".into(), "income".into()],
            weights: vec![0.1, -0.2],
            intercept: 0.5,
            classes: ["keep".into(), "churn".into()],
            threshold: 0.5,
        }
    }

    fn frame(rows: &[(f64, f64)]) -> Frame {
        Frame::from_columns(
            vec!["age".into(), "income".into()],
            vec![
                rows.iter().map(|&(a, _)| CellValue::Float(a)).collect(),
                rows.iter().map(|&(_, i)| CellValue::Float(i)).collect(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn predict_appends_label_and_score() {
        let scored = model().predict(&frame(&[(30.0, 10.0), (1.0, 40.0)])).unwrap();

        assert_eq!(scored.n_rows(), 2);
        assert_eq!(
            scored.names(),
            &["age", "income", LABEL_COLUMN, SCORE_COLUMN]
        );

        // Row 0: z = 0.5 + 3.0 - 2.0 = 1.5 > 0  → positive class.
        assert_eq!(
            scored.column(LABEL_COLUMN).unwrap()[0],
            CellValue::String("churn".into())
        );
        // Row 1: z = 0.5 + 0.1 - 8.0 < 0 → negative class.
        assert_eq!(
            scored.column(LABEL_COLUMN).unwrap()[1],
            CellValue::String("keep".into())
        );

        // Scores are probabilities of the predicted class.
        for cell in scored.column(SCORE_COLUMN).unwrap() {
            match cell {
                CellValue::Float(p) => assert!((0.5..=1.0).contains(p)),
                other => panic!("unexpected score cell {other:?}"),
            }
        }
    }

    #[test]
    fn missing_feature_column_fails() {
        let frame = Frame::from_columns(
            vec!["age".into()],
            vec![vec![CellValue::Float(30.0)]],
        )
        .unwrap();
        let err = model().predict(&frame).unwrap_err();
        assert!(err.to_string().contains("income"));
    }

    #[test]
    fn non_numeric_feature_fails() {
        let frame = Frame::from_columns(
            vec!["age".into(), "income".into()],
            vec![
                vec![CellValue::Float(30.0)],
                vec![CellValue::String("n/a".into())],
            ],
        )
        .unwrap();
        let err = model().predict(&frame).unwrap_err();
        assert!(err.to_string().contains("income"));
    }

    #[test]
    fn from_bytes_rejects_mismatched_weights() {
        let json = serde_json::json!({
            "features": ["a", "b"],
            "weights": [0.1],
            "intercept": 0.0,
            "classes": ["no", "yes"],
        });
        let err = ClassifierModel::from_bytes(json.to_string().as_bytes()).unwrap_err();
        assert!(err.to_string().contains("2 features"));
    }

    #[test]
    fn from_bytes_rejects_junk() {
        assert!(ClassifierModel::from_bytes(b"not a model").is_err());
    }
}
