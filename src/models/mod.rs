pub mod product;
pub mod review;

pub use product::{NewProduct, Product};
pub use review::{NewReview, Review};
