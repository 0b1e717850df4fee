// File Operations for key material
// Reads and writes the PEM files produced and consumed by the CLI

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::pem::{
    components_to_private_pem, components_to_public_pem, public_key_to_components, PemError,
};
use crate::rsa::keygen::{RsaPrivateKey, RsaPublicKey};

/// Errors that can occur during file operations
#[derive(Error, Debug)]
pub enum FileError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("PEM error in {path}: {source}")]
    Pem {
        path: PathBuf,
        #[source]
        source: PemError,
    },
}

/// Result type for file operations
pub type FileResult<T> = Result<T, FileError>;

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> FileError + '_ {
    move |source| FileError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn pem_err(path: &Path) -> impl FnOnce(PemError) -> FileError + '_ {
    move |source| FileError::Pem {
        path: path.to_path_buf(),
        source,
    }
}

/// Read entire file into memory
pub fn read_file(path: &Path) -> FileResult<Vec<u8>> {
    let mut file = File::open(path).map_err(io_err(path))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data).map_err(io_err(path))?;
    Ok(data)
}

/// Write data to file, replacing any previous contents
pub fn write_file(path: &Path, data: &[u8]) -> FileResult<()> {
    let mut file = File::create(path).map_err(io_err(path))?;
    file.write_all(data).map_err(io_err(path))?;
    Ok(())
}

/// Load `(N, e)` from a public key PEM file
pub fn read_public_key(path: &Path) -> FileResult<RsaPublicKey> {
    let data = read_file(path)?;
    info!(path = %path.display(), bytes = data.len(), "read public key PEM");
    public_key_to_components(&data).map_err(pem_err(path))
}

pub fn write_public_key(path: &Path, public_key: &RsaPublicKey) -> FileResult<()> {
    let pem = components_to_public_pem(public_key).map_err(pem_err(path))?;
    write_file(path, pem.as_bytes())?;
    info!(path = %path.display(), "wrote public key PEM");
    Ok(())
}

pub fn write_private_key(path: &Path, private_key: &RsaPrivateKey) -> FileResult<()> {
    let pem = components_to_private_pem(private_key).map_err(pem_err(path))?;
    write_file(path, &pem)?;
    info!(path = %path.display(), "wrote private key PEM");
    Ok(())
}
