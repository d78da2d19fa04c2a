/// Errors produced by the `rodin-core` crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// Neither an image nor a non-empty prompt was supplied.
    #[error("You must provide either images or a prompt")]
    MissingInput,

    /// A form field carried a value outside its enumeration.
    #[error("invalid value '{value}' for field '{field}'")]
    InvalidField { field: String, value: String },
}
