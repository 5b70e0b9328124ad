#![allow(dead_code)]

pub mod image_host_mock;
pub mod multipart_mock;

use std::fs;
use std::path::Path;

use shopfront::api::receive::hash_password;
use shopfront::api::AppState;
use shopfront::config::Config;
use shopfront::db::ProductsDb;
use shopfront::models::NewProduct;

pub const TEST_PASSWORD: &str = "clave-de-prueba";

/// State with every file under `dir` and `/receive` accepting [`TEST_PASSWORD`].
pub async fn test_state(dir: &Path) -> AppState {
    let mut config = Config::rooted_at(dir);
    config.receive_password_hash = hash_password(TEST_PASSWORD);
    let state = AppState::new(config).unwrap();
    state.init_storage().await.unwrap();
    state
}

pub fn product(name: &str, category: &str) -> NewProduct {
    NewProduct {
        category: category.to_string(),
        name: name.to_string(),
        url: format!("https://shop.example/{}", name.replace(' ', "-")),
        ..Default::default()
    }
}

/// Bytes of a standalone products database holding `products`.
pub async fn database_file(dir: &Path, products: &[NewProduct]) -> Vec<u8> {
    let path = dir.join("uploader.db");
    let db = ProductsDb::new(&path, dir.join("uploader_staged.db"));
    db.init_schema().await.unwrap();
    for product in products {
        db.insert(product).await.unwrap();
    }
    let bytes = fs::read(&path).unwrap();
    fs::remove_file(&path).unwrap();
    bytes
}
