//! Header validation for external binary glTF bead meshes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

/// `"glTF"` read as a little-endian u32
pub const GLB_MAGIC: u32 = 0x4654_6C67;

/// The only container version accepted
pub const GLB_VERSION: u32 = 2;

/// Size of the fixed GLB header in bytes
pub const GLB_HEADER_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("file too small to be a GLB ({0} bytes)")]
    TooShort(usize),

    #[error("not a GLB file (magic {0:#010x})")]
    BadMagic(u32),

    #[error("unsupported GLB version {0} (expected 2)")]
    UnsupportedVersion(u32),

    #[error("failed to read asset: {0}")]
    Io(#[from] std::io::Error),
}

/// The fixed 12-byte header at the start of every GLB file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlbHeader {
    pub version: u32,
    /// Total file length the header claims
    pub declared_length: u32,
}

fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Check that `bytes` start with a GLB version 2 header.
pub fn validate_glb(bytes: &[u8]) -> Result<GlbHeader, AssetError> {
    if bytes.len() < GLB_HEADER_LEN {
        return Err(AssetError::TooShort(bytes.len()));
    }

    let magic = read_u32_le(bytes, 0);
    if magic != GLB_MAGIC {
        return Err(AssetError::BadMagic(magic));
    }

    let version = read_u32_le(bytes, 4);
    if version != GLB_VERSION {
        return Err(AssetError::UnsupportedVersion(version));
    }

    Ok(GlbHeader {
        version,
        declared_length: read_u32_le(bytes, 8),
    })
}

/// Validate the GLB header of a file. Only the header bytes are read.
pub fn validate_glb_file(path: impl AsRef<Path>) -> Result<GlbHeader, AssetError> {
    let mut header = Vec::with_capacity(GLB_HEADER_LEN);
    File::open(path)?
        .take(GLB_HEADER_LEN as u64)
        .read_to_end(&mut header)?;
    validate_glb(&header)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(magic: &[u8; 4], version: u32) -> Vec<u8> {
        let mut bytes = magic.to_vec();
        bytes.extend_from_slice(&version.to_le_bytes());
        bytes.extend_from_slice(&64u32.to_le_bytes());
        bytes
    }

    #[test]
    fn test_valid_header() {
        let header = validate_glb(&header(b"glTF", 2)).unwrap();
        assert_eq!(header.version, 2);
        assert_eq!(header.declared_length, 64);
    }

    #[test]
    fn test_rejects_short_input() {
        assert!(matches!(validate_glb(b"glTF"), Err(AssetError::TooShort(4))));
        assert!(matches!(validate_glb(&[]), Err(AssetError::TooShort(0))));
    }

    #[test]
    fn test_rejects_wrong_magic_and_version() {
        assert!(matches!(validate_glb(&header(b"GLTF", 2)), Err(AssetError::BadMagic(_))));
        assert!(matches!(
            validate_glb(&header(b"glTF", 1)),
            Err(AssetError::UnsupportedVersion(1))
        ));
    }

    #[test]
    fn test_file_header_only() {
        let dir = std::env::temp_dir().join(format!("beadchain-glb-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        // Body bytes past the header are never inspected
        let valid = dir.join("valid.glb");
        let mut bytes = header(b"glTF", 2);
        bytes.extend(std::iter::repeat_n(0xFFu8, 4096));
        std::fs::write(&valid, &bytes).unwrap();
        assert_eq!(validate_glb_file(&valid).unwrap().declared_length, 64);

        let short = dir.join("short.glb");
        std::fs::write(&short, b"glTF\x02\x00").unwrap();
        let result = validate_glb_file(&short);

        std::fs::remove_dir_all(&dir).ok();
        assert!(matches!(result, Err(AssetError::TooShort(6))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            validate_glb_file("/nonexistent/bead.glb"),
            Err(AssetError::Io(_))
        ));
    }
}
