use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// SHA-256 hex of the shared password accepted by `/receive`.
pub const DEFAULT_PASSWORD_HASH: &str =
    "c40e957c730718233694f439449d0166bceea4d46007c789319686233545bc54";

pub const PRODUCTS_DB_FILE: &str = "products.db";
pub const STAGED_DB_FILE: &str = "db_temp.db";
pub const REVIEWS_DB_FILE: &str = "reseñasDB.db";

/// Target repository for relayed images.
#[derive(Clone)]
pub struct GithubConfig {
    pub token: String,
    /// `owner/name`
    pub repo: String,
    pub branch: String,
    pub images_dir: String,
    pub api_url: String,
}

impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubConfig")
            .field("token", &"<redacted>")
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("images_dir", &self.images_dir)
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub public_addr: String,
    pub admin_addr: String,
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub admin_secret: String,
    pub receive_password_hash: String,
    /// `None` disables the image relay.
    pub github: Option<GithubConfig>,
}

impl Config {
    /// Reads settings from the environment, after loading `.env` if present.
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded .env from {}", path.display()),
            Err(_) => debug!("No .env file found, using environment variables only"),
        }

        let github = match (var("GITHUB_TOKEN"), var("GITHUB_REPO")) {
            (Some(token), Some(repo)) => Some(GithubConfig {
                token,
                repo,
                branch: var_or("GITHUB_BRANCH", "main"),
                images_dir: var_or("GITHUB_IMAGES_DIR", "images"),
                api_url: var_or("GITHUB_API_URL", "https://api.github.com"),
            }),
            _ => {
                info!("GITHUB_TOKEN or GITHUB_REPO not set, image relay disabled");
                None
            }
        };

        Self {
            public_addr: var_or("PUBLIC_ADDR", "127.0.0.1:5000"),
            admin_addr: var_or("ADMIN_ADDR", "127.0.0.1:5001"),
            data_dir: PathBuf::from(var_or("SHOPFRONT_DATA_DIR", ".")),
            static_dir: PathBuf::from(var_or("SHOPFRONT_STATIC_DIR", "static")),
            templates_dir: PathBuf::from(var_or("SHOPFRONT_TEMPLATES_DIR", "templates")),
            admin_secret: var_or("ADMIN_SECRET", "dev-secret"),
            receive_password_hash: var_or("RECEIVE_PASSWORD_HASH", DEFAULT_PASSWORD_HASH),
            github,
        }
    }

    /// Default settings with every file location under `dir`.
    pub fn rooted_at(dir: &Path) -> Self {
        Self {
            public_addr: "127.0.0.1:5000".to_string(),
            admin_addr: "127.0.0.1:5001".to_string(),
            data_dir: dir.to_path_buf(),
            static_dir: dir.join("static"),
            templates_dir: dir.join("templates"),
            admin_secret: "dev-secret".to_string(),
            receive_password_hash: DEFAULT_PASSWORD_HASH.to_string(),
            github: None,
        }
    }

    pub fn products_db(&self) -> PathBuf {
        self.data_dir.join(PRODUCTS_DB_FILE)
    }

    pub fn staged_db(&self) -> PathBuf {
        self.data_dir.join(STAGED_DB_FILE)
    }

    pub fn reviews_db(&self) -> PathBuf {
        self.data_dir.join(REVIEWS_DB_FILE)
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.static_dir.join("uploads")
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|| default.to_string())
}
