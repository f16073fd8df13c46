//! # Repository Module
//!
//! SQLite repositories. Each one wraps the shared pool and implements the
//! matching catalog-core store trait, so the services can hold it as
//! `Arc<dyn CategoryStore>` / `Arc<dyn ProductStore>`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CategoryService                         ProductService                 │
//! │       │ Arc<dyn CategoryStore>                │ Arc<dyn ProductStore>   │
//! │       ▼                                       ▼                         │
//! │  CategoryRepository                      ProductRepository              │
//! │  ├── get_by_name(name)                   ├── get_by_id(id)              │
//! │  ├── list()                              ├── insert / update / remove   │
//! │  ├── insert / update                     └── search_page(filter, page)  │
//! │  └── remove(id)                               │                         │
//! │       │                                       │                         │
//! │       └──────────────► SQLite ◄───────────────┘                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`] - Category CRUD keyed by unique name
//! - [`ProductRepository`] - Product CRUD and paged search
//!
//! [`CategoryRepository`]: category::CategoryRepository
//! [`ProductRepository`]: product::ProductRepository

pub mod category;
pub mod product;
