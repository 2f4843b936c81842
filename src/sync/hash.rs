//! Content hashing for file comparison.
//!
//! Digests whole files with BLAKE3. Digests are only ever compared for
//! equality; they are never persisted.

use std::io;
use std::path::Path;

/// A file digest plus the number of bytes that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileDigest {
    /// BLAKE3 digest of the full file content.
    pub hash: blake3::Hash,
    /// File size in bytes.
    pub size: u64,
}

/// Hash bytes using BLAKE3.
pub fn digest_bytes(data: &[u8]) -> blake3::Hash {
    // Use parallel hashing for data > 128KB
    if data.len() > 128 * 1024 {
        let mut hasher = blake3::Hasher::new();
        hasher.update_rayon(data);
        hasher.finalize()
    } else {
        blake3::hash(data)
    }
}

/// Hash a file's full contents.
pub fn digest_file(path: &Path) -> io::Result<FileDigest> {
    let data = std::fs::read(path)?;
    Ok(FileDigest {
        hash: digest_bytes(&data),
        size: data.len() as u64,
    })
}

/// Hash a file on the blocking pool, leaving the runtime free.
pub async fn digest_file_async(path: &Path) -> io::Result<FileDigest> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || digest_file(&path))
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
}
