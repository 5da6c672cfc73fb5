use thiserror::Error;

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Terminal failures of the scoring pipeline. Each one ends the current run:
/// nothing retries, nothing degrades, no partial output is produced.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The uploaded bytes could not be decoded under the format implied by
    /// the filename extension.
    #[error("could not read '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: Cause,
    },

    /// The table is too small to draw the minimum sample from.
    #[error("dataset has {rows} rows but scoring needs at least {min}")]
    InsufficientRows { rows: usize, min: usize },

    /// The serialized model could not be read from disk or fetched over HTTP,
    /// or did not deserialize into a model.
    #[error("could not load the model from {origin}: {source}")]
    ModelLoad {
        origin: String,
        #[source]
        source: Cause,
    },

    /// The prediction call failed on a structurally valid sample.
    #[error("prediction failed: {source}")]
    Scoring {
        #[source]
        source: Cause,
    },
}

impl ScoreError {
    pub(crate) fn parse(name: impl Into<String>, source: anyhow::Error) -> Self {
        ScoreError::Parse {
            name: name.into(),
            source: source.into(),
        }
    }

    pub(crate) fn model_load(origin: impl Into<String>, source: anyhow::Error) -> Self {
        ScoreError::ModelLoad {
            origin: origin.into(),
            source: source.into(),
        }
    }

    pub(crate) fn scoring(source: anyhow::Error) -> Self {
        ScoreError::Scoring {
            source: source.into(),
        }
    }
}
