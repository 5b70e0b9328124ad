//! HTTP handlers. `admin` and `storefront` each expose a `configure`
//! function that mounts their routes on an actix `App`.

pub mod admin;
pub mod receive;
pub mod storefront;

use std::fs;
use std::sync::Arc;

use actix_web::cookie::Key;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use tracing::info;

use crate::config::Config;
use crate::db::{ProductsDb, ReviewsDb, StoreError};
use crate::flash;
use crate::relay::{GithubHost, ImageRelay, RelayError};

/// Shared state handed to every worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductsDb>,
    pub reviews: Arc<ReviewsDb>,
    pub config: Arc<Config>,
    pub flash_key: Key,
    pub relay: Option<Arc<ImageRelay>>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, RelayError> {
        let relay = match &config.github {
            Some(github) => {
                info!("[API] Image relay enabled for {}", github.repo);
                let host = GithubHost::new(github.clone())?;
                Some(Arc::new(ImageRelay::new(
                    Arc::new(host),
                    config.templates_dir.clone(),
                )))
            }
            None => None,
        };

        Ok(Self {
            products: Arc::new(ProductsDb::new(config.products_db(), config.staged_db())),
            reviews: Arc::new(ReviewsDb::new(config.reviews_db())),
            flash_key: flash::signing_key(&config.admin_secret),
            config: Arc::new(config),
            relay,
        })
    }

    /// Replaces the configured relay, e.g. with a different image host.
    pub fn with_relay(mut self, relay: ImageRelay) -> Self {
        self.relay = Some(Arc::new(relay));
        self
    }

    /// Creates the uploads directory and both database schemas.
    pub async fn init_storage(&self) -> Result<(), StoreError> {
        fs::create_dir_all(self.config.uploads_dir())?;
        self.products.init_schema().await?;
        self.reviews.init_schema().await?;
        Ok(())
    }
}

/// HTML response; expires the flash cookie when a message was shown.
fn html(status: StatusCode, body: String, flash_shown: bool) -> HttpResponse {
    let mut response = HttpResponse::build(status);
    response.content_type(ContentType::html());
    if flash_shown {
        flash::clear(&mut response);
    }
    response.body(body)
}
