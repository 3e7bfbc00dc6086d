/// Failure while building a document.
///
/// Build failures are cached by [`DocCache`](crate::DocCache) and returned
/// identically to every caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// A security requirement names a scheme that was never declared.
    UnknownSecurityScheme { name: String },
}

impl std::fmt::Display for SpecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecError::UnknownSecurityScheme { name } => {
                write!(f, "specula: no security scheme declared with name '{name}'")
            }
        }
    }
}

impl std::error::Error for SpecError {}
