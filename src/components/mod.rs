//! Server-rendered pages. Nothing here hydrates; interactivity lives in
//! `static/catalog.js`.

pub mod all_products;
pub mod catalog;
pub mod featured;
pub mod layout;
pub mod product_card;
pub mod product_detail;
pub mod product_form;
pub mod products_table;
pub mod review_form;
pub mod reviews_list;

pub use all_products::AllProductsPage;
pub use catalog::CatalogPage;
pub use featured::FeaturedPage;
pub use layout::render_document;
pub use product_detail::ProductPage;
pub use product_form::ProductForm;
pub use products_table::ProductsTable;
