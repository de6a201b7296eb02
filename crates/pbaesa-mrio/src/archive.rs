//! Access to the members of a raw EXIOBASE dataset.
//!
//! A cached dataset is either the `.zip` archive as published or a directory
//! it was extracted into. Members may sit at the top level or inside a single
//! wrapping folder, which is how the published archives are laid out.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use crate::error::MrioError;
use crate::matrix::LabeledMatrix;
use crate::parse::parse_matrix;

/// Transaction matrix member.
pub const Z_MEMBER: &str = "Z.txt";
/// Final-demand matrix member.
pub const Y_MEMBER: &str = "Y.txt";

/// A located dataset artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetArchive {
    /// A zip archive on disk.
    Zip(PathBuf),
    /// An extracted directory.
    Directory(PathBuf),
}

impl DatasetArchive {
    /// Classify `path` as an archive or directory.
    pub fn open(path: &Path) -> Self {
        if path.is_dir() {
            Self::Directory(path.to_path_buf())
        } else {
            Self::Zip(path.to_path_buf())
        }
    }

    /// Path of the artifact.
    pub fn path(&self) -> &Path {
        match self {
            Self::Zip(path) | Self::Directory(path) => path,
        }
    }

    /// Parse the matrix stored in `member`.
    ///
    /// # Errors
    ///
    /// - [`MrioError::MissingMember`] if no entry is named `member`.
    /// - [`MrioError::Archive`] if the zip file is unreadable.
    /// - [`MrioError::Io`] or [`MrioError::Parse`] from reading the member.
    pub fn read_matrix(&self, member: &'static str) -> Result<LabeledMatrix, MrioError> {
        debug!(dataset = %self.path().display(), member, "Reading dataset member");
        match self {
            Self::Zip(path) => read_zip_member(path, member),
            Self::Directory(path) => {
                let file = find_directory_member(path, member)?;
                let name = file.display().to_string();
                parse_matrix(BufReader::new(File::open(&file)?), &name)
            }
        }
    }
}

fn missing(path: &Path, member: &'static str) -> MrioError {
    MrioError::MissingMember {
        dataset: path.display().to_string(),
        member,
    }
}

fn read_zip_member(path: &Path, member: &'static str) -> Result<LabeledMatrix, MrioError> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    let suffix = format!("/{member}");
    let name = archive
        .file_names()
        .find(|name| *name == member || name.ends_with(&suffix))
        .map(str::to_owned)
        .ok_or_else(|| missing(path, member))?;

    let entry = archive.by_name(&name)?;
    parse_matrix(BufReader::new(entry), &name)
}

fn find_directory_member(path: &Path, member: &'static str) -> Result<PathBuf, MrioError> {
    let direct = path.join(member);
    if direct.is_file() {
        return Ok(direct);
    }

    let mut nested: Vec<PathBuf> = fs::read_dir(path)?
        .filter_map(Result::ok)
        .map(|entry| entry.path().join(member))
        .filter(|candidate| candidate.is_file())
        .collect();
    nested.sort();
    nested.into_iter().next().ok_or_else(|| missing(path, member))
}
