use std::fmt::Display;

pub trait ResultExt<T, InitialError> {
    /// Map an error into an error variant carrying its rendered message
    ///
    /// # Example
    /// ```rust
    /// use tagcodec_util::result_ext::ResultExt;
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// enum TagError {
    ///     #[error("bad hex: {0}")]
    ///     Hex(String),
    /// }
    ///
    /// fn uid(input: &str) -> Result<Vec<u8>, TagError> {
    ///     hex::decode(input).map_err_str(TagError::Hex)
    /// }
    ///
    /// assert!(uid("zz").is_err());
    /// ```
    fn map_err_str<FinalError, F>(self, f: F) -> Result<T, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError;

    /// Attach a field name to an error, `map_err(|e| f(field, e))`
    fn map_err_field<FinalError, F>(self, field: &'static str, f: F) -> Result<T, FinalError>
    where
        F: FnOnce(&'static str, InitialError) -> FinalError;
}

impl<Type, InitialError> ResultExt<Type, InitialError> for Result<Type, InitialError> {
    fn map_err_str<FinalError, F>(self, f: F) -> Result<Type, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError,
    {
        self.map_err(|e| f(e.to_string()))
    }

    fn map_err_field<FinalError, F>(self, field: &'static str, f: F) -> Result<Type, FinalError>
    where
        F: FnOnce(&'static str, InitialError) -> FinalError,
    {
        self.map_err(|e| f(field, e))
    }
}
