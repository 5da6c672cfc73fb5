use log::info;
use rand::Rng;

use crate::data::frame::Frame;
use crate::data::sample;
use crate::error::ScoreError;
use crate::model::Model;

/// Re-exported sampling bounds so the shell can mirror them in its input
/// widget without reaching into the data layer.
pub use crate::data::sample::{MAX_SAMPLE, MIN_SAMPLE, sample_bounds};

/// Sample `sample_size` rows from `frame` and score them with `model`.
///
/// The sample is drawn uniformly without replacement and re-indexed; the
/// model's output is returned untouched, with no post-processing. Scoring is
/// atomic: either every sampled row is scored or the call fails with
/// [`ScoreError::Scoring`]. Each call reseeds; use [`score_with`] for
/// reproducible sampling.
pub fn score(frame: &Frame, model: &dyn Model, sample_size: usize) -> Result<Frame, ScoreError> {
    score_with(frame, model, sample_size, &mut rand::thread_rng())
}

/// [`score`] with an injected random source.
pub fn score_with<R: Rng + ?Sized>(
    frame: &Frame,
    model: &dyn Model,
    sample_size: usize,
    rng: &mut R,
) -> Result<Frame, ScoreError> {
    let sampled = sample::take_sample(frame, sample_size, rng)?;
    info!("scoring {} sampled rows", sampled.n_rows());

    let scored = model.predict(&sampled).map_err(ScoreError::scoring)?;
    info!(
        "scored {} rows, {} output columns",
        scored.n_rows(),
        scored.n_cols()
    );
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::frame::CellValue;
    use anyhow::bail;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct FailingModel;

    impl Model for FailingModel {
        fn predict(&self, _frame: &Frame) -> anyhow::Result<Frame> {
            bail!("schema mismatch")
        }
    }

    struct PassthroughModel;

    impl Model for PassthroughModel {
        fn predict(&self, frame: &Frame) -> anyhow::Result<Frame> {
            let labels = vec![CellValue::String("ok".into()); frame.n_rows()];
            frame.clone().with_column("prediction_label", labels)
        }
    }

    fn frame(rows: usize) -> Frame {
        let ids = (0..rows as i64).map(CellValue::Integer).collect();
        Frame::from_columns(vec!["id".into()], vec![ids]).unwrap()
    }

    #[test]
    fn prediction_failure_maps_to_scoring_error() {
        let err = score_with(
            &frame(2_000),
            &FailingModel,
            1_000,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap_err();
        assert!(matches!(err, ScoreError::Scoring { .. }));
        assert!(err.to_string().contains("prediction failed"));
    }

    #[test]
    fn small_table_fails_before_predict_is_reached() {
        let err = score_with(
            &frame(500),
            &FailingModel,
            1_000,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap_err();
        assert!(matches!(err, ScoreError::InsufficientRows { .. }));
    }

    #[test]
    fn scored_output_keeps_sample_size_and_order() {
        let scored = score_with(
            &frame(3_000),
            &PassthroughModel,
            1_500,
            &mut StdRng::seed_from_u64(9),
        )
        .unwrap();
        assert_eq!(scored.n_rows(), 1_500);
        assert_eq!(scored.names().last().unwrap(), "prediction_label");
    }
}
