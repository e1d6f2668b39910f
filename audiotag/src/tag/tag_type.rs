use super::{Tag, utils};
use crate::config::WriteOptions;
use crate::error::TagError;
use crate::io::{FileLike, Length, Truncate};
use crate::macros::err;
use crate::probe::Probe;

use std::fs::OpenOptions;
use std::path::Path;

/// The tag's format
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum TagType {
	/// This covers both APEv1 and APEv2 as it doesn't matter much
	Ape,
	/// Represents an ID3v1 tag
	Id3v1,
	/// Represents vorbis comments
	VorbisComments,
}

impl TagType {
	/// Remove a tag from a [`Path`]
	///
	/// # Errors
	///
	/// See [`TagType::remove_from`]
	pub fn remove_from_path(&self, path: impl AsRef<Path>) -> crate::error::Result<()> {
		let mut file = OpenOptions::new().read(true).write(true).open(path)?;
		self.remove_from(&mut file)
	}

	/// Remove a tag from a [`FileLike`]
	///
	/// # Errors
	///
	/// * It is unable to guess the file format
	/// * The format doesn't support the tag
	/// * It is unable to write to the file
	pub fn remove_from<F>(&self, file: &mut F) -> crate::error::Result<()>
	where
		F: FileLike,
		TagError: From<<F as Truncate>::Error>,
		TagError: From<<F as Length>::Error>,
	{
		let probe = Probe::new(file).guess_file_type()?;
		let Some(file_type) = probe.file_type() else {
			err!(UnknownFormat);
		};

		if !file_type.tag_support(*self).is_writable() {
			err!(UnsupportedTag);
		}

		let file = probe.into_inner();
		utils::write_tag(&Tag::new(*self), file, file_type, WriteOptions::default())
	}
}

/// How a [`FileType`](crate::file::FileType) supports a [`TagType`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TagSupport {
	/// The tag can be read from and written to the format
	ReadWrite,
	/// The tag can be read, but writing it is not supported
	ReadOnly,
	/// The format does not support the tag at all
	Unsupported,
}

impl TagSupport {
	/// Whether the tag can be read from the format
	pub fn is_readable(&self) -> bool {
		matches!(self, Self::ReadWrite | Self::ReadOnly)
	}

	/// Whether the tag can be written to the format
	pub fn is_writable(&self) -> bool {
		matches!(self, Self::ReadWrite)
	}
}
