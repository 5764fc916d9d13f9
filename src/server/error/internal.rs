use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// A stored string column holds a value outside its enum.
    ///
    /// Results in a 500 Internal Server Error with a generic message returned
    /// to client.
    #[error("Unknown {kind} value '{value}'")]
    UnknownVariant {
        /// The enum being parsed, e.g. "role"
        kind: &'static str,
        /// The value that failed to parse
        value: String,
    },

    /// A row that was just written could not be read back.
    #[error("{0} not found after write")]
    MissingAfterWrite(&'static str),
}
