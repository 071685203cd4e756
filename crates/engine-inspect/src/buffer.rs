//! 4-byte aligned owned storage for message bytes read from disk.
//!
//! `Vec<u8>` gives no alignment guarantee beyond 1, and the strict decoder
//! rejects buffers that do not start on a 4-byte boundary. Backing the bytes
//! with `Vec<u32>` fixes the base address; `bytemuck` hands out the `&[u8]`
//! view without copying.

use std::io;
use std::path::Path;

/// Owned message bytes whose base address is a multiple of 4.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignedBuffer {
    words: Vec<u32>,
    len: usize,
}

impl AlignedBuffer {
    /// Copies `bytes` into fresh aligned storage.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut words = vec![0u32; bytes.len().div_ceil(4)];
        bytemuck::cast_slice_mut::<u32, u8>(&mut words)[..bytes.len()].copy_from_slice(bytes);
        Self {
            words,
            len: bytes.len(),
        }
    }

    /// Reads a whole file into aligned storage.
    ///
    /// # Errors
    ///
    /// Propagates any I/O error from reading `path`.
    pub fn read_file(path: &Path) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice(&self.words)[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
