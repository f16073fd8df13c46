//! # Product Search Paging
//!
//! Filter, sort and page parameters for the product listing.
//!
//! ```text
//! ProductFilter ──┐
//!                 ├──► ProductStore::search ──► Page<Product>
//! PageRequest  ───┘                               │
//!   index (0-based)                               ├── items        (≤ size)
//!   size  (≥ 1)                                   ├── total_elements
//!   sort  + direction, ties by id ascending       └── total_pages = ceil(total / size)
//! ```

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::Product;
use crate::validation::{validate_page_size, ValidationResult};
use crate::DEFAULT_PAGE_SIZE;

// =============================================================================
// Sorting
// =============================================================================

/// Sort direction. Anything other than `desc` (any case) is ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    /// SQL keyword.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Product attribute a search can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Id,
    Name,
    Description,
    #[default]
    BasePrice,
    RegisteredOn,
}

impl SortField {
    /// The attribute name as accepted in `sortBy`.
    pub fn wire_name(&self) -> &'static str {
        match self {
            SortField::Id => "idProduto",
            SortField::Name => "nomeProduto",
            SortField::Description => "descricaoProduto",
            SortField::BasePrice => "precoBase",
            SortField::RegisteredOn => "dataCadastro",
        }
    }

    /// Orders two products by this field only.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Description => a.description.cmp(&b.description),
            SortField::BasePrice => a.base_price.cmp(&b.base_price),
            SortField::RegisteredOn => a.registered_on.cmp(&b.registered_on),
        }
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "idProduto" | "id_produto" => Ok(SortField::Id),
            "nomeProduto" | "nome_produto" => Ok(SortField::Name),
            "descricaoProduto" | "descricao_produto" => Ok(SortField::Description),
            "precoBase" | "preco_base" => Ok(SortField::BasePrice),
            "dataCadastro" | "data_cadastro" => Ok(SortField::RegisteredOn),
            other => Err(ValidationError::UnknownSortField(other.to_string())),
        }
    }
}

// =============================================================================
// Page Request
// =============================================================================

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    index: u32,
    size: u32,
    sort: SortField,
    direction: SortDirection,
}

impl PageRequest {
    /// ## Errors
    /// [`ValidationError::InvalidPageSize`] when `size` is zero.
    pub fn new(
        index: u32,
        size: u32,
        sort: SortField,
        direction: SortDirection,
    ) -> ValidationResult<Self> {
        validate_page_size(size)?;
        Ok(PageRequest {
            index,
            size,
            sort,
            direction,
        })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> SortField {
        self.sort
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Number of records before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.index) * u64::from(self.size)
    }

    /// Full ordering: the sort field in the requested direction, then id ascending.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let primary = match self.direction {
            SortDirection::Asc => self.sort.compare(a, b),
            SortDirection::Desc => self.sort.compare(a, b).reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            index: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: SortField::default(),
            direction: SortDirection::default(),
        }
    }
}

// =============================================================================
// Page
// =============================================================================

/// One page of results plus the totals of the whole match set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_elements: u64, page_size: u32) -> Self {
        let size = u64::from(page_size.max(1));
        Page {
            items,
            total_elements,
            total_pages: total_elements.div_ceil(size),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Case-insensitive substring filters. `None` matches everything.
///
/// Empty filters are normalised to `None`; stored filters are folded with
/// [`fold_case`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    name: Option<String>,
    description: Option<String>,
    category_name: Option<String>,
}

impl ProductFilter {
    pub fn new(
        name: Option<&str>,
        description: Option<&str>,
        category_name: Option<&str>,
    ) -> Self {
        ProductFilter {
            name: normalize(name),
            description: normalize(description),
            category_name: normalize(category_name),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category_name.as_deref()
    }

    pub fn matches(&self, product: &Product) -> bool {
        contains(&product.name, self.name())
            && contains(&product.description, self.description())
            && contains(&product.category.name, self.category_name())
    }
}

/// Case folding shared by every store, so `AÇÚCAR` and `açúcar` compare equal
/// whether the match runs in memory or in SQL against a stored folded column.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

fn normalize(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(fold_case)
}

fn contains(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => fold_case(haystack).contains(needle),
        None => true,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{Category, Percentage};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn product(id: i64, name: &str, price: rust_decimal::Decimal) -> Product {
        let category = Category::new("Bebidas", "x", Percentage::zero(), Percentage::zero());
        let mut p = Product::new(
            name,
            format!("{name} gelado"),
            Money::new(price),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            category,
        );
        p.id = Some(id);
        p
    }

    #[test]
    fn test_sort_direction_is_lenient() {
        assert_eq!(SortDirection::parse_lenient("desc"), SortDirection::Desc);
        assert_eq!(SortDirection::parse_lenient("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::parse_lenient("asc"), SortDirection::Asc);
        assert_eq!(SortDirection::parse_lenient("sideways"), SortDirection::Asc);
        assert_eq!(SortDirection::parse_lenient(""), SortDirection::Asc);
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!("precoBase".parse::<SortField>().unwrap(), SortField::BasePrice);
        assert_eq!("data_cadastro".parse::<SortField>().unwrap(), SortField::RegisteredOn);
        assert!(matches!(
            "senha".parse::<SortField>(),
            Err(ValidationError::UnknownSortField(f)) if f == "senha"
        ));
    }

    #[test]
    fn test_page_request_rejects_zero_size() {
        assert!(PageRequest::new(0, 0, SortField::Id, SortDirection::Asc).is_err());
        let request = PageRequest::new(3, 20, SortField::Id, SortDirection::Asc).unwrap();
        assert_eq!(request.offset(), 60);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(Page::<()>::new(vec![], 0, 10).total_pages, 0);
        assert_eq!(Page::<()>::new(vec![], 10, 10).total_pages, 1);
        assert_eq!(Page::<()>::new(vec![], 11, 10).total_pages, 2);
        assert_eq!(Page::<()>::new(vec![], 5, 1).total_pages, 5);
    }

    #[test]
    fn test_compare_breaks_ties_by_id() {
        let a = product(2, "Suco", dec!(5));
        let b = product(1, "Água", dec!(5));
        let c = product(3, "Café", dec!(9));

        let asc = PageRequest::new(0, 10, SortField::BasePrice, SortDirection::Asc).unwrap();
        let mut items = vec![c.clone(), a.clone(), b.clone()];
        items.sort_by(|x, y| asc.compare(x, y));
        assert_eq!(items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![Some(1), Some(2), Some(3)]);

        let desc = PageRequest::new(0, 10, SortField::BasePrice, SortDirection::Desc).unwrap();
        items.sort_by(|x, y| desc.compare(x, y));
        assert_eq!(items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![Some(3), Some(1), Some(2)]);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let p = product(1, "Café Torrado", dec!(10));

        assert!(ProductFilter::default().matches(&p));
        assert!(ProductFilter::new(Some("café"), None, None).matches(&p));
        assert!(ProductFilter::new(Some("TORR"), None, None).matches(&p));
        assert!(ProductFilter::new(None, Some("GELADO"), Some("beb")).matches(&p));
        assert!(!ProductFilter::new(None, None, Some("limpeza")).matches(&p));
        assert!(ProductFilter::new(Some(""), None, None).matches(&p));
    }

    #[test]
    fn test_fold_case_handles_accents() {
        assert_eq!(fold_case("AÇÚCAR CRISTAL"), "açúcar cristal");
        assert_eq!(fold_case("ÁGUA Mineral"), "água mineral");

        let p = product(1, "AÇÚCAR CRISTAL", dec!(4.99));
        assert!(ProductFilter::new(Some("açúcar"), None, None).matches(&p));
        assert!(ProductFilter::new(Some("Açú"), None, None).matches(&p));
    }
}
