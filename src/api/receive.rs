//! `/receive`: accepts a replacement products database from the external
//! uploader and relays the images it references.

use actix_multipart::Multipart;
use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use super::AppState;
use crate::error::AppError;
use crate::multipart::{read_form, FormData};
use crate::relay::KeyMaterial;

/// Lower-case hex SHA-256 of `password`.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

pub fn password_matches(password: &str, expected_hash: &str) -> bool {
    hash_password(password).eq_ignore_ascii_case(expected_hash.trim())
}

/// Keys travel with the request and are never written to disk. Unusable
/// key material disables decryption for this upload only.
fn key_material(form: &FormData) -> Option<KeyMaterial> {
    let private_pem = form.text_or_file("rsa_private_key")?;
    let public_pem = form.text_or_file("rsa_public_key");
    match KeyMaterial::from_pem(&private_pem, public_pem.as_deref()) {
        Ok(keys) => {
            info!("[RECEIVE] Key material loaded, encrypted images will be decrypted");
            Some(keys)
        }
        Err(e) => {
            warn!("[RECEIVE] Ignoring key material: {}", e);
            None
        }
    }
}

pub async fn receive(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let form = read_form(payload).await?;

    let password = form.text("password");
    let dbfile = form.file("dbfile").filter(|f| !f.bytes.is_empty());
    let Some(dbfile) = dbfile.filter(|_| !password.is_empty()) else {
        warn!("[RECEIVE] Rejected: password or dbfile missing");
        return Err(AppError::MissingFields);
    };

    if !password_matches(password, &state.config.receive_password_hash) {
        warn!("[RECEIVE] Rejected: wrong password");
        return Err(AppError::Forbidden);
    }

    // Images are read while the staged file is still locked in place; the
    // uploads themselves run after the lock is released.
    let relay = state.relay.as_ref();
    let (count, collected) = state
        .products
        .stage_with(&dbfile.bytes, |staged| relay.map(|r| r.collect(staged)))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    info!(
        "[RECEIVE] Staged {} ({} bytes, {} products); live on next /index",
        dbfile.file_name,
        dbfile.bytes.len(),
        count
    );

    match (relay, collected) {
        (Some(relay), Some(Ok(images))) => {
            let keys = key_material(&form);
            let report = relay.upload(images, keys.as_ref()).await;
            info!(
                "[RECEIVE] Relayed {} images ({} failed)",
                report.uploaded.len(),
                report.failed.len()
            );
        }
        (_, Some(Err(e))) => warn!("[RECEIVE] Image relay aborted: {}", e),
        _ => info!("[RECEIVE] Image relay not configured, skipping images"),
    }

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body("OK"))
}
