use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OpenFlags, OptionalExtension, Row};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use super::query::{split_sizes, CatalogQuery, FilterOptions};
use super::{value_f64, value_text, StoreError};
use crate::models::{NewProduct, Product};

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category TEXT NOT NULL,
    name TEXT NOT NULL,
    url TEXT NOT NULL,
    description TEXT,
    image_path TEXT,
    afiliado TEXT,
    entradas INTEGER DEFAULT 0,
    tallas TEXT,
    sexo TEXT,
    precio REAL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);";

/// The products database file plus the staged replacement received through
/// `/receive`. Connections are opened per call.
#[derive(Debug)]
pub struct ProductsDb {
    live_path: PathBuf,
    staged_path: PathBuf,
    // read by every query, written while the staged file replaces the live one
    swap: RwLock<()>,
    staging: Mutex<()>,
}

impl ProductsDb {
    pub fn new(live_path: impl Into<PathBuf>, staged_path: impl Into<PathBuf>) -> Self {
        Self {
            live_path: live_path.into(),
            staged_path: staged_path.into(),
            swap: RwLock::new(()),
            staging: Mutex::new(()),
        }
    }

    pub fn live_path(&self) -> &Path {
        &self.live_path
    }

    pub fn staged_path(&self) -> &Path {
        &self.staged_path
    }

    pub fn has_staged(&self) -> bool {
        self.staged_path.exists()
    }

    // Used by the admin side, which owns the file.
    fn open(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.live_path)?)
    }

    // Used by the storefront, which must not create an empty file.
    fn open_existing(&self) -> Result<Connection, StoreError> {
        if !self.live_path.exists() {
            return Err(StoreError::Unavailable(self.live_path.clone()));
        }
        self.open()
    }

    pub async fn init_schema(&self) -> Result<(), StoreError> {
        let _guard = self.swap.read().await;
        let conn = self.open()?;
        conn.execute_batch(SCHEMA_SQL).map_err(|e| {
            error!("[DB] Failed creating products table: {}", e);
            e
        })?;
        info!("[DB] Products schema ready at {}", self.live_path.display());
        Ok(())
    }

    pub async fn insert(&self, product: &NewProduct) -> Result<i64, StoreError> {
        let _guard = self.swap.read().await;
        let conn = self.open()?;
        let precio = Some(product.precio.trim()).filter(|p| !p.is_empty());
        conn.execute(
            "INSERT INTO products
                 (category, name, url, description, image_path,
                  afiliado, entradas, tallas, sexo, precio)
             VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?, ?)",
            params![
                &product.category,
                &product.name,
                &product.url,
                &product.description,
                &product.image_path,
                &product.afiliado,
                &product.tallas,
                &product.sexo,
                precio,
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!("[DB] Inserted product {} ({})", id, product.name);
        Ok(id)
    }

    /// Every product, newest first.
    pub async fn list_recent(&self) -> Result<Vec<Product>, StoreError> {
        let _guard = self.swap.read().await;
        let conn = self.open()?;
        query_products(
            &conn,
            "SELECT * FROM products ORDER BY created_at DESC, id DESC",
            &[],
        )
    }

    /// Returns whether a row was removed. Reviews and uploaded files are left alone.
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let _guard = self.swap.read().await;
        let conn = self.open()?;
        let removed = conn.execute("DELETE FROM products WHERE id = ?", [id])?;
        info!("[DB] Deleted product {} ({} rows)", id, removed);
        Ok(removed > 0)
    }

    /// Most clicked products first.
    pub async fn featured(&self, limit: usize) -> Result<Vec<Product>, StoreError> {
        let _guard = self.swap.read().await;
        let conn = self.open_existing()?;
        query_products(
            &conn,
            "SELECT * FROM products ORDER BY COALESCE(entradas, 0) DESC, id ASC LIMIT ?",
            &[Value::Integer(limit as i64)],
        )
    }

    pub async fn all_by_clicks(&self) -> Result<Vec<Product>, StoreError> {
        let _guard = self.swap.read().await;
        let conn = self.open_existing()?;
        query_products(
            &conn,
            "SELECT * FROM products ORDER BY COALESCE(entradas, 0) DESC, id ASC",
            &[],
        )
    }

    pub async fn search(&self, query: &CatalogQuery) -> Result<Vec<Product>, StoreError> {
        let _guard = self.swap.read().await;
        let conn = self.open_existing()?;
        let clause = query.where_clause();
        let sql = format!(
            "SELECT * FROM products {} ORDER BY created_at DESC, id DESC",
            clause.sql
        );
        let products = query_products(&conn, &sql, &clause.params)?;
        debug!("[DB] Catalog query matched {} products", products.len());
        Ok(products)
    }

    pub async fn filter_options(&self, query: &CatalogQuery) -> Result<FilterOptions, StoreError> {
        let _guard = self.swap.read().await;
        let conn = self.open_existing()?;
        let clause = query.where_clause();

        let categories = distinct_text(&conn, "category", &clause.sql, &clause.params)?;
        let sexos = distinct_text(&conn, "sexo", &clause.sql, &clause.params)?;
        let tallas: BTreeSet<String> = distinct_text(&conn, "tallas", &clause.sql, &clause.params)?
            .iter()
            .flat_map(|raw| split_sizes(raw).map(str::to_string))
            .collect();

        let (min, max): (Value, Value) = conn.query_row(
            &format!("SELECT MIN(precio), MAX(precio) FROM products {}", clause.sql),
            params_from_iter(clause.params.iter()),
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(FilterOptions {
            categories,
            sexos,
            tallas: tallas.into_iter().collect(),
            precio_min_auto: value_f64(&min).unwrap_or(0.0),
            precio_max_auto: value_f64(&max).unwrap_or(0.0),
        })
    }

    pub async fn get(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let _guard = self.swap.read().await;
        let conn = self.open_existing()?;
        let product = conn
            .query_row("SELECT * FROM products WHERE id = ?", [id], product_from_row)
            .optional()?;
        Ok(product)
    }

    /// Returns the number of rows touched (0 for an unknown id).
    pub async fn increment_clicks(&self, id: i64) -> Result<usize, StoreError> {
        let _guard = self.swap.read().await;
        let conn = self.open_existing()?;
        let touched = conn.execute(
            "UPDATE products SET entradas = COALESCE(entradas, 0) + 1 WHERE id = ?",
            [id],
        )?;
        Ok(touched)
    }

    /// Writes an uploaded database next to the live one, to be activated by
    /// [`activate_staged`](Self::activate_staged). Returns its product count.
    /// A file that is not a readable products database is discarded.
    pub async fn stage(&self, bytes: &[u8]) -> Result<i64, StoreError> {
        self.stage_with(bytes, |_| ()).await.map(|(count, ())| count)
    }

    /// Like [`stage`](Self::stage), then runs `inspect` over the staged file
    /// before the staging lock is released, so no activation can move it away.
    pub async fn stage_with<T>(
        &self,
        bytes: &[u8],
        inspect: impl FnOnce(&Path) -> T,
    ) -> Result<(i64, T), StoreError> {
        let _staging = self.staging.lock().await;
        let scratch = self.scratch_path();
        fs::write(&scratch, bytes)?;

        let count = match count_products(&scratch) {
            Ok(count) => count,
            Err(e) => {
                warn!("[DB] Discarding uploaded database: {}", e);
                if let Err(remove_err) = fs::remove_file(&scratch) {
                    warn!("[DB] Could not remove {}: {}", scratch.display(), remove_err);
                }
                return Err(e);
            }
        };

        fs::rename(&scratch, &self.staged_path)?;
        info!(
            "[DB] Staged database with {} products at {}",
            count,
            self.staged_path.display()
        );
        Ok((count, inspect(&self.staged_path)))
    }

    /// Moves a staged database over the live one. Returns whether a swap happened.
    pub async fn activate_staged(&self) -> Result<bool, StoreError> {
        if !self.has_staged() {
            return Ok(false);
        }
        let _staging = self.staging.lock().await;
        let _swap = self.swap.write().await;
        if !self.has_staged() {
            return Ok(false);
        }
        fs::rename(&self.staged_path, &self.live_path)?;
        info!(
            "[DB] Activated staged database {} -> {}",
            self.staged_path.display(),
            self.live_path.display()
        );
        Ok(true)
    }

    fn scratch_path(&self) -> PathBuf {
        let mut name = self.staged_path.as_os_str().to_owned();
        name.push(".part");
        PathBuf::from(name)
    }
}

fn count_products(path: &Path) -> Result<i64, StoreError> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let count = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
    Ok(count)
}

fn query_products(
    conn: &Connection,
    sql: &str,
    params: &[Value],
) -> Result<Vec<Product>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params_from_iter(params.iter()), product_from_row)?;
    let mut result = Vec::new();
    for row in rows {
        result.push(row?);
    }
    Ok(result)
}

fn distinct_text(
    conn: &Connection,
    column: &str,
    where_sql: &str,
    params: &[Value],
) -> Result<Vec<String>, StoreError> {
    let sql = format!("SELECT DISTINCT {column} FROM products {where_sql} ORDER BY {column}");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(params.iter()), |row| row.get::<_, Value>(0))?;
    let mut values = Vec::new();
    for row in rows {
        if let Some(text) = value_text(row?).filter(|t| !t.trim().is_empty()) {
            values.push(text);
        }
    }
    Ok(values)
}

fn text(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<String>> {
    Ok(value_text(row.get::<_, Value>(column)?))
}

// Column types are not trusted: uploaded databases come from elsewhere.
fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get("id")?,
        category: text(row, "category")?.unwrap_or_default(),
        name: text(row, "name")?.unwrap_or_default(),
        url: text(row, "url")?.unwrap_or_default(),
        description: text(row, "description")?,
        image_path: text(row, "image_path")?,
        afiliado: text(row, "afiliado")?,
        entradas: value_f64(&row.get::<_, Value>("entradas")?).unwrap_or(0.0) as i64,
        tallas: text(row, "tallas")?,
        sexo: text(row, "sexo")?,
        precio: text(row, "precio")?,
        created_at: text(row, "created_at")?,
    })
}
