//! Best-effort discovery of image references in an uploaded products table.
//!
//! Columns are picked by the first rule that matches: well-known column
//! names, then BLOB-declared columns, then columns whose first-row value
//! looks like an image file name. No match means no images.

use std::path::{Path, PathBuf};

use rusqlite::types::Value;
use rusqlite::Connection;
use tracing::{debug, info};

use super::decrypt::ENCRYPTED_MARKER;
use super::RelayError;

pub const KNOWN_IMAGE_COLUMNS: &[&str] = &[
    "image_path",
    "image",
    "images",
    "imagen",
    "imagenes",
    "img",
    "foto",
    "fotos",
    "image_data",
    "image_blob",
];

pub const IMAGE_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".webp", ".gif", ".enc"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Bytes stored in the database itself.
    Blob(Vec<u8>),
    /// File looked up by name in the templates directory.
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub name: String,
    pub source: ImageSource,
}

struct ColumnInfo {
    name: String,
    decl_type: String,
}

fn table_columns(conn: &Connection) -> Result<Vec<ColumnInfo>, RelayError> {
    let mut stmt = conn.prepare("PRAGMA table_info(products)")?;
    let rows = stmt.query_map([], |row| {
        Ok(ColumnInfo {
            name: row.get(1)?,
            decl_type: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        })
    })?;
    let mut columns = Vec::new();
    for column in rows {
        columns.push(column?);
    }
    Ok(columns)
}

pub fn looks_like_image_list(text: &str) -> bool {
    text.split(',').map(str::trim).any(|entry| {
        let entry = entry.to_lowercase();
        IMAGE_SUFFIXES.iter().any(|suffix| entry.ends_with(suffix))
    })
}

pub fn image_columns(conn: &Connection) -> Result<Vec<String>, RelayError> {
    let columns = table_columns(conn)?;

    let known: Vec<String> = columns
        .iter()
        .filter(|c| KNOWN_IMAGE_COLUMNS.contains(&c.name.to_lowercase().as_str()))
        .map(|c| c.name.clone())
        .collect();
    if !known.is_empty() {
        debug!("[RELAY] Using known image columns {:?}", known);
        return Ok(known);
    }

    let blobs: Vec<String> = columns
        .iter()
        .filter(|c| c.decl_type.to_uppercase().contains("BLOB"))
        .map(|c| c.name.clone())
        .collect();
    if !blobs.is_empty() {
        debug!("[RELAY] Using BLOB columns {:?}", blobs);
        return Ok(blobs);
    }

    let mut stmt = conn.prepare("SELECT * FROM products LIMIT 1")?;
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let mut rows = stmt.query([])?;
    let Some(row) = rows.next()? else {
        return Ok(Vec::new());
    };
    let mut sniffed = Vec::new();
    for (idx, name) in names.iter().enumerate() {
        if let Value::Text(text) = row.get::<_, Value>(idx)? {
            if looks_like_image_list(&text) {
                sniffed.push(name.clone());
            }
        }
    }
    debug!("[RELAY] Sniffed image columns {:?}", sniffed);
    Ok(sniffed)
}

/// File extension implied by the leading bytes of common image formats.
pub fn image_extension(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("gif")
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some("webp")
    } else {
        None
    }
}

fn is_remote(entry: &str) -> bool {
    let lower = entry.to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Every image referenced by the products table, in row order.
pub fn collect_images(
    conn: &Connection,
    templates_dir: &Path,
) -> Result<Vec<ImageRef>, RelayError> {
    let columns = image_columns(conn)?;
    if columns.is_empty() {
        info!("[RELAY] No image columns found, nothing to relay");
        return Ok(Vec::new());
    }

    let select = columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("SELECT rowid, {select} FROM products ORDER BY rowid");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;

    let mut images = Vec::new();
    while let Some(row) = rows.next()? {
        let id: i64 = row.get(0)?;
        for (offset, column) in columns.iter().enumerate() {
            match row.get::<_, Value>(offset + 1)? {
                Value::Blob(bytes) if !bytes.is_empty() => {
                    let ext = image_extension(&bytes).unwrap_or("bin");
                    images.push(ImageRef {
                        name: format!("product-{id}-{column}.{ext}"),
                        source: ImageSource::Blob(bytes),
                    });
                }
                Value::Text(text) => {
                    let entries = text.split(',').map(str::trim).filter(|e| !e.is_empty());
                    for (n, entry) in entries.enumerate() {
                        // One cell may hold several payloads; the index keeps names apart.
                        if entry.as_bytes().starts_with(ENCRYPTED_MARKER) {
                            images.push(ImageRef {
                                name: format!("product-{id}-{column}-{n}.bin"),
                                source: ImageSource::Blob(entry.as_bytes().to_vec()),
                            });
                        } else if is_remote(entry) {
                            continue;
                        } else if let Some(file_name) = Path::new(entry).file_name() {
                            let file_name = file_name.to_string_lossy().into_owned();
                            images.push(ImageRef {
                                source: ImageSource::File(templates_dir.join(&file_name)),
                                name: file_name,
                            });
                        }
                    }
                }
                _ => {}
            }
        }
    }
    Ok(images)
}
