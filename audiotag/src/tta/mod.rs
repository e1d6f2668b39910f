//! True Audio specific items
//!
//! ## File notes
//!
//! A True Audio file may carry an `APEv1/2` tag, an `ID3v1` tag, or both. It is
//! also possible for a file to be preceded by an `ID3v2` tag. For the sake of data
//! preservation, such a tag will be skipped over, but **cannot** be read or written.

pub(crate) mod read;
pub(crate) mod write;

use crate::ape::ApeTag;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::{Result, TagError};
use crate::file::{AudioFile, FileType, TaggedFile};
use crate::id3::v1::Id3v1Tag;
use crate::tag::{TagExt, TagType};
use crate::util::io::{FileLike, Length, Truncate};

use std::io::{Read, Seek};

/// A True Audio file
#[derive(Default)]
pub struct TrueAudioFile {
	/// An ID3v1 tag
	pub(crate) id3v1_tag: Option<Id3v1Tag>,
	/// An APEv1/v2 tag
	pub(crate) ape_tag: Option<ApeTag>,
}

impl TrueAudioFile {
	/// Returns a reference to the ID3v1 tag if it exists
	pub fn id3v1(&self) -> Option<&Id3v1Tag> {
		self.id3v1_tag.as_ref()
	}

	/// Returns a mutable reference to the ID3v1 tag if it exists
	pub fn id3v1_mut(&mut self) -> Option<&mut Id3v1Tag> {
		self.id3v1_tag.as_mut()
	}

	/// Sets the ID3v1 tag, returning the one it replaced
	pub fn set_id3v1(&mut self, tag: Id3v1Tag) -> Option<Id3v1Tag> {
		self.id3v1_tag.replace(tag)
	}

	/// Removes the ID3v1 tag
	pub fn remove_id3v1(&mut self) -> Option<Id3v1Tag> {
		self.id3v1_tag.take()
	}

	/// Returns a reference to the APE tag if it exists
	pub fn ape(&self) -> Option<&ApeTag> {
		self.ape_tag.as_ref()
	}

	/// Returns a mutable reference to the APE tag if it exists
	pub fn ape_mut(&mut self) -> Option<&mut ApeTag> {
		self.ape_tag.as_mut()
	}

	/// Sets the APE tag, returning the one it replaced
	pub fn set_ape(&mut self, tag: ApeTag) -> Option<ApeTag> {
		self.ape_tag.replace(tag)
	}

	/// Removes the APE tag
	pub fn remove_ape(&mut self) -> Option<ApeTag> {
		self.ape_tag.take()
	}
}

impl AudioFile for TrueAudioFile {
	fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
		Self: Sized,
	{
		read::read_from(reader, parse_options)
	}

	fn save_to<F>(&self, file: &mut F, write_options: WriteOptions) -> Result<()>
	where
		F: FileLike,
		TagError: From<<F as Truncate>::Error>,
		TagError: From<<F as Length>::Error>,
	{
		if let Some(ape_tag) = &self.ape_tag {
			file.rewind()?;
			ape_tag.save_to(file, write_options)?;
		}

		if let Some(id3v1_tag) = &self.id3v1_tag {
			file.rewind()?;
			id3v1_tag.save_to(file, write_options)?;
		}

		Ok(())
	}

	fn contains_tag(&self) -> bool {
		self.id3v1_tag.is_some() || self.ape_tag.is_some()
	}

	fn contains_tag_type(&self, tag_type: TagType) -> bool {
		match tag_type {
			TagType::Ape => self.ape_tag.is_some(),
			TagType::Id3v1 => self.id3v1_tag.is_some(),
			_ => false,
		}
	}
}

impl From<TrueAudioFile> for TaggedFile {
	fn from(input: TrueAudioFile) -> Self {
		let mut tags = Vec::with_capacity(2);

		if let Some(id3v1_tag) = input.id3v1_tag {
			tags.push(id3v1_tag.into());
		}

		if let Some(ape_tag) = input.ape_tag {
			tags.push(ape_tag.into());
		}

		TaggedFile::new(FileType::TrueAudio, tags)
	}
}
