use thiserror::Error;

/// The five error kinds a rule application can raise.
///
/// All of them are fatal to the current [`apply`](crate) call; none are
/// retried. There is no recovery inside the engine -- callers surface the
/// error and, in the CLI, exit non-zero with a phase-prefixed message.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A malformed rule document: unknown special, missing required field,
    /// empty `*alt`, a substitution regex with no `id`, an unknown root
    /// version, and so on.
    #[error("build error: {0}")]
    Build(String),

    /// A special was used where it is not allowed for its role (e.g.
    /// `*error` inside a `from`, `*regex` inside a `to`).
    #[error("pattern-placement error: {0}")]
    Placement(String),

    /// Duplicate capture id during a match, or a `to` template referencing
    /// an id its rule's `from` never bound.
    #[error("binding error: {0}")]
    Binding(String),

    /// A `to` template that was built contained an `*error` special; this
    /// carries the user-supplied message (or the default below).
    #[error("{0}")]
    UserError(String),

    /// Propagated from the tree codec.
    #[error("codec error: {0}")]
    Codec(String),
}

impl EngineError {
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build(message.into())
    }

    pub fn placement(message: impl Into<String>) -> Self {
        Self::Placement(message.into())
    }

    pub fn binding(message: impl Into<String>) -> Self {
        Self::Binding(message.into())
    }

    pub fn user_error(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            "Matched forbidden pattern.".to_string()
        } else {
            message
        };
        Self::UserError(message)
    }

    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec(message.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
