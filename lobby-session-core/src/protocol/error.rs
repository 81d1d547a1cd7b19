/// Errors raised while decoding or encoding frames
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Frame has no `type` tag")]
    MissingType,

    #[error("Unknown frame type: {0}")]
    UnknownType(String),

    #[error("Invalid `{tag}` frame: {source}")]
    InvalidPayload {
        tag: String,
        source: serde_json::Error,
    },
}
