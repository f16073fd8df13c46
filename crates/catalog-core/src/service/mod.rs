//! # Services
//!
//! The business-rule operations, one service per aggregate.
//!
//! ```text
//! catalog-api handler
//!        │  request DTO
//!        ▼
//! ┌──────────────────┐   validate fields ─► business rules ─► store ─► response DTO
//! │ CategoryService  │
//! │ ProductService   │   Every failure is a CoreError; store failures are logged
//! └──────────────────┘   with their cause and wrapped as CoreError::Persistence.
//! ```

mod category;
mod product;

pub use category::CategoryService;
pub use product::ProductService;

use tracing::error;

use crate::error::{CoreError, Operation, StoreError};

/// Logs a store failure with its cause and hides it behind the operation's message.
pub(crate) fn persistence_failure(operation: Operation, source: StoreError) -> CoreError {
    error!(?operation, error = %source, "Store operation failed");
    CoreError::persistence(operation, source)
}
