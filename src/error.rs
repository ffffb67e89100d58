use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("output `{target}` already has a registered binding")]
    DuplicateOutput { target: String },

    #[error("binding references unknown component `{component_id}`")]
    UnknownComponent { component_id: String },

    #[error("record set `{location}` unavailable: {reason}")]
    RecordSetUnavailable { location: String, reason: String },

    #[error("no image matches keys {keys}")]
    MissingImage { keys: String },

    #[error("failed to write `{path}`: {source}")]
    ArtifactWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
