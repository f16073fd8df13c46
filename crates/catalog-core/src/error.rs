//! # Error Types
//!
//! Domain-specific error types for catalog-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  catalog-core errors (this file)                                       │
//! │  ├── CoreError        - What every service operation returns           │
//! │  ├── ValidationError  - Business rules + per-field input failures      │
//! │  └── StoreError       - What a CategoryStore/ProductStore reports      │
//! │                                                                         │
//! │  catalog-db errors (separate crate)                                    │
//! │  └── DbError          - sqlx failures, converted into StoreError       │
//! │                                                                         │
//! │  catalog-api errors (in app)                                           │
//! │  └── ApiError         - Status code + JSON body                        │
//! │                                                                         │
//! │  Flow: DbError → StoreError → CoreError → ApiError → HTTP client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. The `Display` text of a variant IS the message the client sees
//! 3. Storage causes are kept as `#[source]` for logging, never displayed
//! 4. Every variant maps to exactly one [`ErrorKind`]

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use ts_rs::TS;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by the category and product services.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A business rule or input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No category is registered under the given name.
    ///
    /// ## When This Occurs
    /// - get/update/delete of a category by name
    /// - product registration or update naming an unknown category
    #[error("nenhuma categoria cadastrada com esse nome!")]
    CategoryNotFound(String),

    /// The category listing came back empty.
    #[error("nenhuma categoria cadastrada!")]
    NoCategories,

    /// No product exists with the given id.
    #[error("nenhum produto cadastrado com esse id!")]
    ProductNotFound(ProductId),

    /// A product search produced an empty page.
    ///
    /// Raised for an empty store, for filters that match nothing, and for a
    /// page index past the last page alike.
    #[error("nenhum produto cadastrado!")]
    NoProducts,

    /// The store failed after validation passed.
    ///
    /// The client only sees the operation's fixed message; `source` is logged.
    #[error("{operation}")]
    Persistence {
        operation: Operation,
        #[source]
        source: StoreError,
    },
}

impl CoreError {
    /// Wraps a store failure for the given operation.
    pub fn persistence(operation: Operation, source: StoreError) -> Self {
        CoreError::Persistence { operation, source }
    }

    /// Returns the failure category used by the presentation layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::CategoryNotFound(_)
            | CoreError::NoCategories
            | CoreError::ProductNotFound(_)
            | CoreError::NoProducts => ErrorKind::NotFound,
            CoreError::Persistence { .. } => ErrorKind::Persistence,
        }
    }
}

/// Coarse failure categories.
///
/// ```text
/// Validation  → 400 (client sent something the rules reject)
/// NotFound    → 404 (entity missing or listing empty)
/// Persistence → 500 (store failed; cause is logged only)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Persistence,
}

/// Write or read operations that can fail inside the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    RegisterCategory,
    UpdateCategory,
    DeleteCategory,
    ReadCategory,
    RegisterProduct,
    UpdateProduct,
    DeleteProduct,
    ReadProduct,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Operation::RegisterCategory => {
                "Erro ao inserir categoria, entre em contato com o administrador!"
            }
            Operation::UpdateCategory => {
                "Erro ao atualizar categoria, entre em contato com o administrador!"
            }
            Operation::DeleteCategory => {
                "Erro ao excluir categoria, entre em contato com o administrador!"
            }
            Operation::ReadCategory => {
                "Erro ao consultar categorias, entre em contato com o administrador!"
            }
            Operation::RegisterProduct => {
                "Erro ao cadastrar produto, entre em contato com o administrador!"
            }
            Operation::UpdateProduct => {
                "Erro ao atualizar o produto, entre em contato com o administrador!"
            }
            Operation::DeleteProduct => {
                "Erro ao excluir o produto, entre em contato com o administrador!"
            }
            Operation::ReadProduct => {
                "Erro ao consultar produtos, entre em contato com o administrador!"
            }
        };
        f.write_str(message)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input and business-rule validation errors.
///
/// All of these are client errors: the message is returned verbatim.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A category with this exact name already exists (case-sensitive).
    #[error("Uma categoria com nome: {name}, já foi cadastrada!")]
    DuplicateCategory { name: String },

    /// Both discount and tax are non-zero in the same request.
    #[error("não é possível cadastrar desconto e taxa para a mesma categoria!")]
    DiscountAndTax,

    /// Base price times adjustment factor does not fit a decimal.
    #[error("o preço final excede o valor máximo suportado!")]
    PriceOutOfRange,

    /// Page size below one.
    #[error("o tamanho da página deve ser maior que 0!")]
    InvalidPageSize,

    /// Sort field is not a product attribute.
    #[error("não é possível ordenar por: {0}")]
    UnknownSortField(String),

    /// One or more request fields are missing or out of range.
    #[error("{0}")]
    Fields(FieldErrors),
}

// =============================================================================
// Field Errors
// =============================================================================

/// A single invalid request field.
///
/// ## Serialization
/// ```json
/// { "campo": "precoBase", "mensagem": "o preço base deve ser maior que 0!" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct FieldError {
    #[serde(rename = "campo")]
    pub field: String,
    #[serde(rename = "mensagem")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every invalid field of one request, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the error of a single field check, if any.
    pub fn check(&mut self, result: Result<(), FieldError>) {
        if let Err(error) = result {
            self.0.push(error);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }

    /// `Ok(())` when nothing was recorded, otherwise [`ValidationError::Fields`].
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Fields(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

// =============================================================================
// Store Error
// =============================================================================

/// Failures reported by a store implementation.
///
/// Stores translate their backend errors into these variants so the core
/// never depends on a particular database crate.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// Referential integrity rejected the write: deleting a referenced record,
    /// or pointing at a record that does not exist.
    #[error("foreign key constraint violated: {0}")]
    ForeignKey(String),

    /// The record to update or delete disappeared between load and write.
    #[error("record not found: {0}")]
    Missing(String),

    /// Any other backend failure.
    #[error("storage failure: {0}")]
    Backend(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
