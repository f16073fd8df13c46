//! Confirmation messages returned by successful write operations.

pub const CATEGORY_REGISTERED: &str = "Categoria cadastrada com sucesso!";
pub const CATEGORY_UPDATED: &str = "Categoria atualizada com sucesso!";
pub const CATEGORY_DELETED: &str = "Categoria excluída com sucesso!";

pub const PRODUCT_UPDATED: &str = "Produto atualizado com sucesso!";
pub const PRODUCT_DELETED: &str = "Produto excluído com sucesso!";
