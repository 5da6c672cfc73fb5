use log::warn;
use rand::Rng;
use rand::seq::index;

use super::frame::Frame;
use crate::error::ScoreError;

/// Fewest rows a scoring sample may contain.
pub const MIN_SAMPLE: usize = 1_000;
/// Most rows a scoring sample may contain, to bound inference cost.
pub const MAX_SAMPLE: usize = 50_000;

/// The valid sample-size range for a table of `n_rows` rows, i.e.
/// `[MIN_SAMPLE, min(MAX_SAMPLE, n_rows)]`. `None` when the table is too
/// small to sample at all.
pub fn sample_bounds(n_rows: usize) -> Option<std::ops::RangeInclusive<usize>> {
    (n_rows >= MIN_SAMPLE).then(|| MIN_SAMPLE..=MAX_SAMPLE.min(n_rows))
}

/// Draw `size` distinct rows uniformly at random, without replacement, and
/// re-index them as a fresh contiguous frame.
///
/// Fails with [`ScoreError::InsufficientRows`] when the frame has fewer than
/// [`MIN_SAMPLE`] rows; that is surfaced, never clamped. A `size` outside
/// the valid range is clamped into it, mirroring the bounds the upload UI
/// puts on its slider.
pub fn take_sample<R: Rng + ?Sized>(
    frame: &Frame,
    size: usize,
    rng: &mut R,
) -> Result<Frame, ScoreError> {
    let bounds = sample_bounds(frame.n_rows()).ok_or(ScoreError::InsufficientRows {
        rows: frame.n_rows(),
        min: MIN_SAMPLE,
    })?;

    let size = if bounds.contains(&size) {
        size
    } else {
        let clamped = size.clamp(*bounds.start(), *bounds.end());
        warn!("sample size {size} outside {bounds:?}, clamped to {clamped}");
        clamped
    };

    let indices = index::sample(rng, frame.n_rows(), size).into_vec();
    Ok(frame.take_rows(&indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::frame::CellValue;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn id_frame(rows: usize) -> Frame {
        let ids = (0..rows as i64).map(CellValue::Integer).collect();
        Frame::from_columns(vec!["id".into()], vec![ids]).unwrap()
    }

    #[test]
    fn too_few_rows_is_surfaced() {
        let frame = id_frame(999);
        let err = take_sample(&frame, 1_000, &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(
            err,
            ScoreError::InsufficientRows { rows: 999, min: 1_000 }
        ));

        // Still an error for larger requests.
        let err = take_sample(&frame, 5_000, &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(err, ScoreError::InsufficientRows { .. }));
    }

    #[test]
    fn sample_is_distinct_and_from_the_source() {
        let frame = id_frame(5_000);
        let sample = take_sample(&frame, 2_000, &mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(sample.n_rows(), 2_000);
        let ids: HashSet<i64> = sample
            .column("id")
            .unwrap()
            .iter()
            .map(|v| match v {
                CellValue::Integer(i) => *i,
                other => panic!("unexpected cell {other:?}"),
            })
            .collect();
        assert_eq!(ids.len(), 2_000, "sampled rows must be distinct");
        assert!(ids.iter().all(|&i| (0..5_000).contains(&i)));
    }

    #[test]
    fn oversized_request_is_clamped_to_row_count() {
        let frame = id_frame(1_200);
        let sample = take_sample(&frame, 50_000, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(sample.n_rows(), 1_200);
    }

    #[test]
    fn bounds_follow_the_row_count() {
        assert_eq!(sample_bounds(999), None);
        assert_eq!(sample_bounds(1_000), Some(1_000..=1_000));
        assert_eq!(sample_bounds(5_000), Some(1_000..=5_000));
        assert_eq!(sample_bounds(80_000), Some(1_000..=50_000));
    }
}
