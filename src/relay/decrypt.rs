use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use super::sniff::image_extension;
use super::RelayError;

/// Prefix of an inline encrypted payload; the rest is base64 ciphertext.
pub const ENCRYPTED_MARKER: &[u8] = b"ENC:";

/// File suffix of a raw encrypted payload.
pub const ENCRYPTED_SUFFIX: &str = ".enc";

/// RSA key sent along with an upload. Lives only for the request.
pub struct KeyMaterial {
    private: RsaPrivateKey,
}

impl KeyMaterial {
    /// Parses a PKCS#8 or PKCS#1 PEM private key. A public key, when given,
    /// must belong to the private one.
    pub fn from_pem(private_pem: &str, public_pem: Option<&str>) -> Result<Self, RelayError> {
        let private = RsaPrivateKey::from_pkcs8_pem(private_pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(private_pem))
            .map_err(|e| RelayError::Key(format!("private key: {e}")))?;

        if let Some(public_pem) = public_pem.map(str::trim).filter(|p| !p.is_empty()) {
            let public = RsaPublicKey::from_public_key_pem(public_pem)
                .or_else(|_| RsaPublicKey::from_pkcs1_pem(public_pem))
                .map_err(|e| RelayError::Key(format!("public key: {e}")))?;
            if public != RsaPublicKey::from(&private) {
                return Err(RelayError::Key(
                    "public key does not match the private key".to_string(),
                ));
            }
        }

        Ok(Self { private })
    }

    /// RSA-OAEP/SHA-256 over consecutive modulus-sized blocks.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, RelayError> {
        let block = self.private.size();
        if ciphertext.is_empty() || ciphertext.len() % block != 0 {
            return Err(RelayError::Decrypt(format!(
                "ciphertext of {} bytes is not a multiple of the {}-byte key size",
                ciphertext.len(),
                block
            )));
        }

        let mut plain = Vec::with_capacity(ciphertext.len());
        for chunk in ciphertext.chunks(block) {
            let part = self
                .private
                .decrypt(Oaep::new::<Sha256>(), chunk)
                .map_err(|e| RelayError::Decrypt(e.to_string()))?;
            plain.extend_from_slice(&part);
        }
        Ok(plain)
    }
}

/// Final name and bytes of an image, decrypting tagged payloads.
pub fn prepare(
    name: &str,
    bytes: Vec<u8>,
    keys: Option<&KeyMaterial>,
) -> Result<(String, Vec<u8>), RelayError> {
    let marked = bytes.starts_with(ENCRYPTED_MARKER);
    let suffixed = name.to_lowercase().ends_with(ENCRYPTED_SUFFIX);
    if !marked && !suffixed {
        return Ok((name.to_string(), bytes));
    }

    let keys = keys.ok_or_else(|| {
        RelayError::Decrypt(format!("{name} is encrypted but no private key was sent"))
    })?;

    let ciphertext = if marked {
        let encoded: Vec<u8> = bytes[ENCRYPTED_MARKER.len()..]
            .iter()
            .copied()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        STANDARD
            .decode(encoded)
            .map_err(|e| RelayError::Decrypt(format!("{name}: bad base64 payload: {e}")))?
    } else {
        bytes
    };
    let plain = keys.decrypt(&ciphertext)?;

    let mut name = if suffixed {
        name[..name.len() - ENCRYPTED_SUFFIX.len()].to_string()
    } else {
        name.to_string()
    };
    if let (Some(stem), Some(ext)) = (name.strip_suffix(".bin"), image_extension(&plain)) {
        name = format!("{stem}.{ext}");
    }
    Ok((name, plain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};

    fn keypair() -> (RsaPrivateKey, RsaPublicKey) {
        let mut rng = rand::thread_rng();
        let private = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        let public = RsaPublicKey::from(&private);
        (private, public)
    }

    fn encrypt(public: &RsaPublicKey, plain: &[u8]) -> Vec<u8> {
        let mut rng = rand::thread_rng();
        // OAEP/SHA-256 overhead is 2 * 32 + 2 bytes per block
        let chunk_len = public.size() - 66;
        let mut out = Vec::new();
        for chunk in plain.chunks(chunk_len) {
            out.extend(public.encrypt(&mut rng, Oaep::new::<Sha256>(), chunk).unwrap());
        }
        out
    }

    #[test]
    fn decrypts_suffixed_and_marked_payloads() {
        let (private, public) = keypair();
        let private_pem = private.to_pkcs8_pem(LineEnding::LF).unwrap();
        let public_pem = public.to_public_key_pem(LineEnding::LF).unwrap();
        let keys = KeyMaterial::from_pem(&private_pem, Some(public_pem.as_str())).unwrap();

        let mut image = b"\x89PNG\r\n\x1a\n".to_vec();
        image.extend(std::iter::repeat(7u8).take(300));
        let ciphertext = encrypt(&public, &image);

        let (name, plain) = prepare("foto.png.enc", ciphertext.clone(), Some(&keys)).unwrap();
        assert_eq!(name, "foto.png");
        assert_eq!(plain, image);

        let mut marked = ENCRYPTED_MARKER.to_vec();
        marked.extend(STANDARD.encode(&ciphertext).into_bytes());
        let (name, plain) = prepare("product-3-foto.bin", marked, Some(&keys)).unwrap();
        assert_eq!(name, "product-3-foto.png");
        assert_eq!(plain, image);
    }

    #[test]
    fn plain_images_pass_through() {
        let (name, bytes) = prepare("a.png", b"img".to_vec(), None).unwrap();
        assert_eq!(name, "a.png");
        assert_eq!(bytes, b"img");
    }

    #[test]
    fn encrypted_without_key_is_an_error() {
        assert!(matches!(
            prepare("a.png.enc", vec![0; 128], None),
            Err(RelayError::Decrypt(_))
        ));
    }

    #[test]
    fn mismatched_public_key_is_rejected() {
        let (private, _) = keypair();
        let (_, other_public) = keypair();
        let private_pem = private.to_pkcs8_pem(LineEnding::LF).unwrap();
        let public_pem = other_public.to_public_key_pem(LineEnding::LF).unwrap();
        assert!(matches!(
            KeyMaterial::from_pem(&private_pem, Some(public_pem.as_str())),
            Err(RelayError::Key(_))
        ));
    }

    #[test]
    fn truncated_ciphertext_is_an_error() {
        let (private, _) = keypair();
        let keys = KeyMaterial { private };
        assert!(matches!(keys.decrypt(&[1, 2, 3]), Err(RelayError::Decrypt(_))));
    }

    #[test]
    fn garbage_pem_is_rejected() {
        assert!(matches!(
            KeyMaterial::from_pem("not a key", None),
            Err(RelayError::Key(_))
        ));
    }
}
