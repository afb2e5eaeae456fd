use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use super::manifest::{Manifest, MANIFEST_FILE};
use super::{LoadError, PackageError};

/// Archive entry holding the backend-native model bytes.
pub const MODEL_ENTRY: &str = "model.dat";

/// Archive entry holding the serialized feature and outcome encoders.
pub const ENCODERS_ENTRY: &str = "encoders.json";

/// File name of the packaged classifier archive in a training directory.
pub const ARCHIVE_FILE: &str = "model.zip";

/// Packages a classifier archive: the manifest plus the named files copied
/// from the training directory. Overwrites any previous archive at the same
/// path. Every source file is checked up front, so a half-trained directory
/// fails before an archive is created.
pub fn write_archive(
    dir: &Path,
    manifest: &Manifest,
    entries: &[(&str, PathBuf)],
) -> Result<PathBuf, PackageError> {
    for (_, path) in entries {
        if !path.is_file() {
            return Err(PackageError::MissingFile(path.clone()));
        }
    }

    let archive_path = dir.join(ARCHIVE_FILE);
    let mut zip = ZipWriter::new(File::create(&archive_path)?);
    let options = SimpleFileOptions::default();

    zip.start_file(MANIFEST_FILE, options)?;
    zip.write_all(manifest.to_string().as_bytes())?;
    for (name, path) in entries {
        zip.start_file(*name, options)?;
        let mut file = File::open(path)?;
        io::copy(&mut file, &mut zip)?;
    }
    zip.finish()?;

    log::info!("packaged classifier archive at {}", archive_path.display());
    Ok(archive_path)
}

/// An opened classifier archive.
///
/// The manifest is parsed eagerly so callers can dispatch on the recorded
/// builder before touching any other entry.
pub struct ModelArchive {
    manifest: Manifest,
    zip: ZipArchive<File>,
}

impl ModelArchive {
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        let mut zip = ZipArchive::new(File::open(path)?)?;
        let text = read_entry(&mut zip, MANIFEST_FILE)?;
        let manifest = Manifest::parse(&String::from_utf8_lossy(&text))?;
        Ok(Self { manifest, zip })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Reads a whole entry into memory.
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>, LoadError> {
        read_entry(&mut self.zip, name)
    }

    /// Extracts an entry to a temporary file, for backends whose loaders
    /// need a filesystem path rather than a byte stream. The file is
    /// deleted when the returned handle drops, on success and on every
    /// error path alike.
    pub fn extract_entry(&mut self, name: &str) -> Result<NamedTempFile, LoadError> {
        let mut entry = match self.zip.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Err(LoadError::MissingEntry(name.to_string())),
            Err(err) => return Err(err.into()),
        };
        let mut temp = NamedTempFile::new()?;
        io::copy(&mut entry, &mut temp)?;
        temp.flush()?;
        Ok(temp)
    }
}

fn read_entry(zip: &mut ZipArchive<File>, name: &str) -> Result<Vec<u8>, LoadError> {
    let mut entry = match zip.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Err(LoadError::MissingEntry(name.to_string())),
        Err(err) => return Err(err.into()),
    };
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}
