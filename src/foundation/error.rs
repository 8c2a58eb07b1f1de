/// Convenience result type used across Passage.
pub type PassageResult<T> = Result<T, PassageError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PassageError {
    /// Invalid descriptor configuration or request data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A drawing backend was unavailable, or a backend call failed.
    #[error("backend error: {0}")]
    Backend(String),

    /// A render pass failed while producing its artifact.
    #[error("render error: {0}")]
    Render(String),

    /// The terminal packaging step failed.
    #[error("packaging error: {0}")]
    Package(String),

    /// Launching or supervising an external host process failed.
    #[error("host error: {0}")]
    Host(String),

    /// Controller hardware setup or configuration failed.
    #[error("controller error: {0}")]
    Controller(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PassageError {
    /// Build a [`PassageError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PassageError::Backend`] value.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Build a [`PassageError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PassageError::Package`] value.
    pub fn package(msg: impl Into<String>) -> Self {
        Self::Package(msg.into())
    }

    /// Build a [`PassageError::Host`] value.
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Build a [`PassageError::Controller`] value.
    pub fn controller(msg: impl Into<String>) -> Self {
        Self::Controller(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_build_matching_variants() {
        assert!(matches!(
            PassageError::validation("x"),
            PassageError::Validation(_)
        ));
        assert!(matches!(PassageError::backend("x"), PassageError::Backend(_)));
        assert!(matches!(PassageError::package("x"), PassageError::Package(_)));
    }

    #[test]
    fn display_includes_category_prefix() {
        let e = PassageError::render("pass 0004 failed");
        assert_eq!(e.to_string(), "render error: pass 0004 failed");
    }
}
