use thiserror::Error;

/// Result type alias using ArchModelError
pub type Result<T> = std::result::Result<T, ArchModelError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on without
/// parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    InvalidUrl,
    InvalidParent,
    AlreadyExists,

    // Lookup
    NotFound,
    NotInModel,

    // Views
    NotPermitted,
    InvalidState,

    // Integration
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidUrl => "ERR_INVALID_URL",
            ExErrorKind::InvalidParent => "ERR_INVALID_PARENT",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::NotInModel => "ERR_NOT_IN_MODEL",
            ExErrorKind::NotPermitted => "ERR_NOT_PERMITTED",
            ExErrorKind::InvalidState => "ERR_INVALID_STATE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification plus optional context for debugging and for
/// reporting errors across a tool boundary.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    view_key: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            view_key: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add element or relationship id context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add view key context
    pub fn with_view_key(mut self, key: impl Into<String>) -> Self {
        self.view_key = Some(key.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn view_key(&self) -> Option<&str> {
        self.view_key.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(view_key) = &self.view_key {
            write!(f, " (view_key: {})", view_key)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for model and view operations
///
/// Messages that callers are likely to surface to end users keep the exact
/// wording of the checks that produce them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArchModelError {
    // ===== Lookup Errors =====
    /// Element id is not present in the model
    #[error("Element not found: {element_id}")]
    ElementNotFound { element_id: String },

    /// Relationship id is not present in the model
    #[error("Relationship not found: {relationship_id}")]
    RelationshipNotFound { relationship_id: String },

    /// No view with this key exists in the view set
    #[error("View not found: {key}")]
    ViewNotFound { key: String },

    /// The element is not part of the model the view is bound to
    #[error("The element named {name} does not exist in the model associated with this view.")]
    ElementNotInModel { name: String },

    // ===== Validation Errors =====
    /// Empty or whitespace-only name
    #[error("Invalid name: {reason}")]
    InvalidName { reason: String },

    /// Malformed URL
    #[error("{url} is not a valid URL.")]
    InvalidUrl { url: String },

    /// Health check rejected by validation
    #[error("{reason}")]
    InvalidHealthCheck { reason: String },

    /// Negative width or height
    #[error("{reason}")]
    InvalidDimensions { reason: String },

    /// Deployment node instance count below one
    #[error("The number of instances must be a positive integer.")]
    InvalidInstanceCount { count: u32 },

    /// Element cannot be created under the given parent
    #[error("Invalid parent for {name}: {reason}")]
    InvalidParent { name: String, reason: String },

    /// Operation requires a different element kind
    #[error("Element {element_id} is a {actual}, expected {expected}")]
    WrongElementKind {
        element_id: String,
        expected: String,
        actual: String,
    },

    /// A top-level element with this name already exists
    #[error("A top-level element named {name} already exists.")]
    DuplicateElement { name: String },

    // ===== View Errors =====
    /// View key is blank
    #[error("A key must be specified.")]
    InvalidViewKey,

    /// View key already used in this workspace
    #[error("A view with the key {key} already exists.")]
    DuplicateViewKey { key: String },

    /// Admission policy rejected the element
    #[error("{reason}")]
    ElementNotPermitted { reason: String },

    /// Animation step would reveal nothing
    #[error("{reason}")]
    EmptyAnimationStep { reason: String },

    /// Dynamic view interaction between unrelated elements
    #[error("A relationship between {source_name} and {destination_name} does not exist in model.")]
    RelationshipNotInModel {
        source_name: String,
        destination_name: String,
    },

    /// `end_parallel_sequence` without a matching start
    #[error("There is no parallel sequence to end in view {key}")]
    ParallelSequenceNotStarted { key: String },

    /// Operation not supported by this kind of view
    #[error("View {key} does not support {operation}")]
    UnsupportedViewOperation { key: String, operation: String },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ArchModelError {
    /// Shorthand for an admission rejection
    pub fn not_permitted(reason: impl Into<String>) -> Self {
        ArchModelError::ElementNotPermitted {
            reason: reason.into(),
        }
    }

    /// True for admission rejections, which bulk view operations swallow
    pub fn is_not_permitted(&self) -> bool {
        matches!(self, ArchModelError::ElementNotPermitted { .. })
    }
}

/// Conversion from ArchModelError to ExError
impl From<ArchModelError> for ExError {
    fn from(err: ArchModelError) -> Self {
        let message = err.to_string();
        let ex = match err {
            ArchModelError::ElementNotFound { element_id } => {
                ExError::new(ExErrorKind::NotFound).with_entity_id(element_id)
            }
            ArchModelError::RelationshipNotFound { relationship_id } => {
                ExError::new(ExErrorKind::NotFound).with_entity_id(relationship_id)
            }
            ArchModelError::ViewNotFound { key } => {
                ExError::new(ExErrorKind::NotFound).with_view_key(key)
            }
            ArchModelError::ElementNotInModel { .. } => ExError::new(ExErrorKind::NotInModel),
            ArchModelError::InvalidName { .. }
            | ArchModelError::InvalidHealthCheck { .. }
            | ArchModelError::InvalidDimensions { .. }
            | ArchModelError::InvalidInstanceCount { .. }
            | ArchModelError::InvalidViewKey => ExError::new(ExErrorKind::InvalidInput),
            ArchModelError::InvalidUrl { .. } => ExError::new(ExErrorKind::InvalidUrl),
            ArchModelError::InvalidParent { .. } => ExError::new(ExErrorKind::InvalidParent),
            ArchModelError::WrongElementKind { element_id, .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_entity_id(element_id)
            }
            ArchModelError::DuplicateElement { .. } => ExError::new(ExErrorKind::AlreadyExists),
            ArchModelError::DuplicateViewKey { key } => {
                ExError::new(ExErrorKind::AlreadyExists).with_view_key(key)
            }
            ArchModelError::ElementNotPermitted { .. } => ExError::new(ExErrorKind::NotPermitted),
            ArchModelError::EmptyAnimationStep { .. }
            | ArchModelError::RelationshipNotInModel { .. } => {
                ExError::new(ExErrorKind::InvalidInput)
            }
            ArchModelError::ParallelSequenceNotStarted { key }
            | ArchModelError::UnsupportedViewOperation { key, .. } => {
                ExError::new(ExErrorKind::InvalidState).with_view_key(key)
            }
            ArchModelError::Serialization { .. } => ExError::new(ExErrorKind::Serialization),
            ArchModelError::Internal { .. } => ExError::new(ExErrorKind::Internal),
        };
        ex.with_message(message)
    }
}

/// Conversion from serde_json::Error to ArchModelError
impl From<serde_json::Error> for ArchModelError {
    fn from(err: serde_json::Error) -> Self {
        ArchModelError::Serialization {
            message: err.to_string(),
        }
    }
}
