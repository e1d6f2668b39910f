//! ID3 specific items
//!
//! ID3 does things differently than other tags, making working with them a little more effort than other formats.
//! Check the other modules for important notes and/or warnings.

pub mod v1;

pub(crate) mod synchsafe;

use crate::config::ParsingMode;
use crate::error::Result;
use crate::macros::decode_err;
use synchsafe::SynchsafeInteger;
use v1::constants::ID3V1_TAG_MARKER;

use std::io::{Read, Seek, SeekFrom};

pub(crate) struct ID3FindResults<Header, Content>(pub Option<Header>, pub Content);

pub(crate) fn find_id3v1<R>(
	data: &mut R,
	read: bool,
	parse_mode: ParsingMode,
) -> Result<ID3FindResults<(), Option<v1::tag::Id3v1Tag>>>
where
	R: Read + Seek,
{
	log::debug!("Searching for an ID3v1 tag");

	// Reader is too small to contain an ID3v1 tag
	if data.seek(SeekFrom::End(-128)).is_err() {
		data.seek(SeekFrom::End(0))?;
		return Ok(ID3FindResults(None, None));
	}

	let mut marker = [0; 3];
	data.read_exact(&mut marker)?;
	data.seek(SeekFrom::Current(-3))?;

	if marker != ID3V1_TAG_MARKER {
		data.seek(SeekFrom::End(0))?;
		return Ok(ID3FindResults(None, None));
	}

	log::debug!("Found an ID3v1 tag, parsing");

	if !read {
		// The caller only cares about the position, which is now the start of the tag
		return Ok(ID3FindResults(Some(()), None));
	}

	let mut tag_bytes = [0; 128];
	data.read_exact(&mut tag_bytes)?;
	data.seek(SeekFrom::End(-128))?;

	let tag = v1::tag::Id3v1Tag::parse(tag_bytes, parse_mode)?;

	Ok(ID3FindResults(Some(()), Some(tag)))
}

/// The size of an ID3v2 tag, taken from its header
#[derive(Copy, Clone, Debug)]
pub(crate) struct Id3v2Header {
	pub(crate) size: u32,
	pub(crate) footer: bool,
}

impl Id3v2Header {
	pub(crate) fn parse<R>(reader: &mut R) -> Result<Self>
	where
		R: Read,
	{
		let mut header = [0; 10];
		reader.read_exact(&mut header)?;

		if &header[..3] != b"ID3" {
			decode_err!(@BAIL "Found an invalid ID3v2 identifier");
		}

		// The version and flag bytes are irrelevant here, the content
		// of an ID3v2 tag is never read. Bit 4 of the flags marks the
		// presence of a trailing footer.
		let footer = header[5] & 0x10 == 0x10;

		let size = u32::from_be_bytes([header[6], header[7], header[8], header[9]]).unsynch();

		Ok(Self { size, footer })
	}
}

/// Skips over an ID3v2 tag, if one is present at the reader's position
pub(crate) fn find_id3v2<R>(data: &mut R) -> Result<ID3FindResults<Id3v2Header, ()>>
where
	R: Read + Seek,
{
	log::debug!(
		"Searching for an ID3v2 tag at offset: {}",
		data.stream_position()?
	);

	let start = data.stream_position()?;
	let Ok(id3v2_header) = Id3v2Header::parse(data) else {
		data.seek(SeekFrom::Start(start))?;
		return Ok(ID3FindResults(None, ()));
	};

	log::debug!("Found an ID3v2 tag, skipping");

	let mut to_skip = i64::from(id3v2_header.size);
	if id3v2_header.footer {
		to_skip += 10;
	}

	data.seek(SeekFrom::Current(to_skip))?;

	Ok(ID3FindResults(Some(id3v2_header), ()))
}
