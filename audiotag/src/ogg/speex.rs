use super::tag::VorbisComments;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::{Result, TagError};
use crate::file::{AudioFile, FileType, TaggedFile};
use crate::ogg::constants::SPEEXHEADER;
use crate::tag::{TagExt, TagType};
use crate::util::io::{FileLike, Length, Truncate};

use std::io::{Read, Seek};

/// An OGG Speex file
pub struct SpeexFile {
	/// The Vorbis Comments contained in the file
	///
	/// NOTE: While a metadata packet is required, it isn't required to actually have any data.
	pub(crate) vorbis_comments_tag: VorbisComments,
}

impl SpeexFile {
	/// Returns a reference to the Vorbis Comments tag
	pub fn vorbis_comments(&self) -> &VorbisComments {
		&self.vorbis_comments_tag
	}

	/// Returns a mutable reference to the Vorbis Comments tag
	pub fn vorbis_comments_mut(&mut self) -> &mut VorbisComments {
		&mut self.vorbis_comments_tag
	}

	/// Replaces the Vorbis Comments tag, returning the one it replaced
	pub fn set_vorbis_comments(&mut self, tag: VorbisComments) -> VorbisComments {
		std::mem::replace(&mut self.vorbis_comments_tag, tag)
	}
}

impl AudioFile for SpeexFile {
	fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
	{
		// Unlike Vorbis, the Speex comment packet has no leading signature
		let file_information = super::read::read_from(reader, SPEEXHEADER, &[], 2, parse_options)?;

		Ok(Self {
			// A metadata packet is mandatory in Speex
			vorbis_comments_tag: file_information.0.unwrap_or_default(),
		})
	}

	fn save_to<F>(&self, file: &mut F, write_options: WriteOptions) -> Result<()>
	where
		F: FileLike,
		TagError: From<<F as Truncate>::Error>,
		TagError: From<<F as Length>::Error>,
	{
		self.vorbis_comments_tag.save_to(file, write_options)
	}

	fn contains_tag(&self) -> bool {
		true
	}

	fn contains_tag_type(&self, tag_type: TagType) -> bool {
		tag_type == TagType::VorbisComments
	}
}

impl From<SpeexFile> for TaggedFile {
	fn from(input: SpeexFile) -> Self {
		TaggedFile::new(FileType::Speex, vec![input.vorbis_comments_tag.into()])
	}
}
