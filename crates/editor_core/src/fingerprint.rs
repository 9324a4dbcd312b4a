//! SHA-256 fingerprint of the source document, used as the correlation
//! token on submissions.

use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;
use tracing::debug;

const READ_CHUNK: usize = 8 * 1024;

pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

pub async fn fingerprint_file(path: impl AsRef<Path>) -> std::io::Result<String> {
    let path = path.as_ref();
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        let read = file.read(&mut buf).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    let digest = format!("{:x}", hasher.finalize());
    debug!(path = %path.display(), hash_prefix = &digest[..16], "fingerprinted document");
    Ok(digest)
}

#[cfg(test)]
#[path = "tests/fingerprint_tests.rs"]
mod tests;
