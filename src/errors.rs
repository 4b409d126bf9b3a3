//! Unified error types for the approval and funding core.
//!
//! All workflow operations return `Result<T>` with a typed error so the UI
//! layer can render inline form errors (dollar amounts, missing comments)
//! and distinguish persistence failures from validation failures.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The over-allocation case. The message format is relied on by the UI
    /// to show both amounts next to the funding schedule form.
    #[error("Total funding (${total}) cannot exceed project budget (${budget})")]
    BudgetExceeded { total: Decimal, budget: Decimal },

    #[error("User {user_id} is not authorized to act on this approval")]
    Unauthorized { user_id: i64 },

    #[error("Project {id} not found")]
    ProjectNotFound { id: i64 },

    #[error("Funding entry {id} not found")]
    FundingEntryNotFound { id: i64 },

    #[error("User {id} not found")]
    UserNotFound { id: i64 },

    #[error("Approval group {id} not found")]
    GroupNotFound { id: i64 },

    #[error("Property {id} not found")]
    PropertyNotFound { id: i64 },

    /// Action attempted against an entity that is not in the required
    /// lifecycle state (approving a non-pending project, double-marking a
    /// paid entry, losing a concurrent-approval race).
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// Persistence failure from the store. Kept distinct from validation
    /// and authorization errors so the caller can offer a retry without
    /// re-running validation.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
