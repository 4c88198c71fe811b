use thiserror::Error;

/// Failures local to one wikitext fragment. These never abort a batch; the
/// pipeline logs them and moves on.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("wikitext parse failed at byte {position}: {snippet:?}")]
    Parse { position: usize, snippet: String },

    #[error("infobox field line has no '=': {line:?}")]
    MalformedField { line: String },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
