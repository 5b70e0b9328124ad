use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::multipart::UploadedFile;

pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// URL prefix under which the uploads directory is served.
pub const UPLOADS_URL: &str = "/static/uploads";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Formato no permitido: {0}")]
    Disallowed(String),

    #[error("failed to save {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Lower-cased extension after the last dot.
pub fn extension(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

pub fn allowed_file(file_name: &str) -> bool {
    extension(file_name).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Saves the uploaded images under random names and returns their public paths.
///
/// Every file is checked before anything is written, so a single disallowed
/// file rejects the whole batch. Parts without a file name (an untouched file
/// input) are skipped.
pub fn save_images<'a>(
    dir: &Path,
    files: impl IntoIterator<Item = &'a UploadedFile>,
) -> Result<Vec<String>, UploadError> {
    let files: Vec<&UploadedFile> = files
        .into_iter()
        .filter(|f| !f.file_name.is_empty())
        .collect();

    let mut planned = Vec::with_capacity(files.len());
    for file in &files {
        match extension(&file.file_name) {
            Some(ext) if allowed_file(&file.file_name) => {
                planned.push((format!("{}.{}", Uuid::new_v4().simple(), ext), *file))
            }
            _ => return Err(UploadError::Disallowed(file.file_name.clone())),
        }
    }
    if planned.is_empty() {
        return Ok(Vec::new());
    }

    fs::create_dir_all(dir).map_err(|source| UploadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written: Vec<PathBuf> = Vec::new();
    let mut public_paths = Vec::new();
    for (name, file) in planned {
        let dest = dir.join(&name);
        if let Err(source) = fs::write(&dest, &file.bytes) {
            for path in &written {
                if let Err(e) = fs::remove_file(path) {
                    warn!("[UPLOAD] Could not remove {}: {}", path.display(), e);
                }
            }
            return Err(UploadError::Io { path: dest, source });
        }
        info!("[UPLOAD] Saved {} as {}", file.file_name, dest.display());
        written.push(dest);
        public_paths.push(format!("{UPLOADS_URL}/{name}"));
    }
    Ok(public_paths)
}

/// Image URLs typed by hand, comma separated.
pub fn parse_image_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> UploadedFile {
        UploadedFile {
            field: "image_files".into(),
            file_name: name.into(),
            bytes: b"\x89PNG\r\n\x1a\n".to_vec(),
        }
    }

    #[test]
    fn extensions_are_case_insensitive() {
        assert!(allowed_file("foto.PNG"));
        assert!(allowed_file("a.b.jpeg"));
        assert!(!allowed_file("script.exe"));
        assert!(!allowed_file("sin_extension"));
        assert!(!allowed_file("punto."));
    }

    #[test]
    fn saved_files_get_random_names() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![upload("uno.PNG"), upload("dos.webp")];
        let paths = save_images(dir.path(), &files).unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths[0].starts_with("/static/uploads/") && paths[0].ends_with(".png"));
        assert!(paths[1].ends_with(".webp"));
        assert_ne!(paths[0], paths[1]);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn one_bad_file_rejects_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![upload("bien.jpg"), upload("mal.svg")];
        match save_images(dir.path(), &files) {
            Err(UploadError::Disallowed(name)) => assert_eq!(name, "mal.svg"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn unnamed_parts_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![upload("")];
        assert!(save_images(&dir.path().join("uploads"), &files).unwrap().is_empty());
        assert!(!dir.path().join("uploads").exists());
    }

    #[test]
    fn urls_are_split_and_trimmed() {
        assert_eq!(
            parse_image_urls(" https://a.example/1.jpg ,, https://b.example/2.png"),
            vec!["https://a.example/1.jpg", "https://b.example/2.png"]
        );
        assert!(parse_image_urls("  ").is_empty());
    }
}
