use thiserror::Error;

/// Everything that can end a solve attempt. All of these are terminal for
/// the current attempt; the pipeline never retries internally.
#[derive(Error, Debug)]
pub enum SolveError {
    #[error("challenge form not found in response body")]
    MissingForm,

    #[error("challenge form has no usable method attribute")]
    MissingFormMethod,

    #[error("challenge form has no action attribute")]
    MissingFormAction,

    #[error("challenge form contains no inputs")]
    MissingFormInput,

    #[error("{0} is missing from challenge form")]
    MissingMandatoryParam(String),

    #[error("no inline script block in challenge page")]
    ScriptNotFound,

    #[error("challenge script did not match the expected pattern")]
    ChallengePatternMismatch,

    #[error("script execution error: {0}")]
    Evaluation(String),

    #[error("script result parse error: {0}")]
    ResultParse(String),

    #[error("response after challenge answer is still blocked with 503")]
    StillBlocked,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("body read error: {0}")]
    BodyRead(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
