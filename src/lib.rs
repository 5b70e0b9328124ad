//! Product catalog with an admin surface for data entry and a public
//! storefront with filtering, reviews, click tracking and database hot-swap.
pub mod api;
pub mod components;
pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod models;
pub mod multipart;
pub mod relay;
pub mod uploads;
