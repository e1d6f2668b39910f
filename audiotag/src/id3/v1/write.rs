use super::constants::ID3V1_TAG_MARKER;
use super::tag::Id3v1TagRef;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::{Result, TagError};
use crate::id3::{ID3FindResults, find_id3v1};
use crate::macros::err;
use crate::probe::Probe;
use crate::util::io::{FileLike, Length, Truncate};
use crate::util::text::latin1_encode;

use std::io::Write;

use byteorder::WriteBytesExt;

pub(crate) fn write_id3v1<F>(
	file: &mut F,
	tag: &Id3v1TagRef<'_>,
	write_options: WriteOptions,
) -> Result<()>
where
	F: FileLike,
	TagError: From<<F as Truncate>::Error>,
	TagError: From<<F as Length>::Error>,
{
	let probe = Probe::new(file).guess_file_type()?;

	match probe.file_type() {
		Some(ft) if super::Id3v1Tag::SUPPORTED_FORMATS.contains(&ft) => {},
		_ => err!(UnsupportedTag),
	}

	let file = probe.into_inner();

	let parse_options = ParseOptions::default();
	let ID3FindResults(header, _) = find_id3v1(file, false, parse_options.parsing_mode)?;

	// Stage the full new file image so a failure partway through the write
	// never leaves a torn tag behind
	file.rewind()?;
	let mut new_file_content = Vec::new();
	file.read_to_end(&mut new_file_content)?;

	if header.is_some() {
		// An ID3v1 tag occupies the last 128 bytes of the file
		new_file_content.truncate(new_file_content.len().saturating_sub(128));
	}

	// An empty tag with an existing one on file is a removal, the truncation
	// above was the whole write
	if !(tag.is_empty() && header.is_some()) {
		new_file_content.extend_from_slice(&encode(tag, write_options)?);
	}

	file.rewind()?;
	file.truncate(0)?;
	file.write_all(&new_file_content)?;

	Ok(())
}

pub(super) fn encode(tag: &Id3v1TagRef<'_>, write_options: WriteOptions) -> Result<Vec<u8>> {
	// Text fields are fixed-width, truncated and zero-padded as needed
	fn text_field(
		value: Option<&str>,
		width: usize,
		write_options: WriteOptions,
	) -> Result<Vec<u8>> {
		let mut field = vec![0; width];

		let Some(value) = value else {
			return Ok(field);
		};

		let encoded = latin1_encode(value, write_options.lossy_text_encoding);
		for (slot, byte) in field.iter_mut().zip(encoded) {
			*slot = byte?;
		}

		Ok(field)
	}

	let mut writer = Vec::with_capacity(128);

	writer.write_all(&ID3V1_TAG_MARKER)?;
	writer.write_all(&text_field(tag.title, 30, write_options)?)?;
	writer.write_all(&text_field(tag.artist, 30, write_options)?)?;
	writer.write_all(&text_field(tag.album, 30, write_options)?)?;

	let mut year = [0_u8; 4];
	if let Some(year_num) = tag.year {
		let formatted = format!("{:04}", std::cmp::min(year_num, 9999));
		year.copy_from_slice(formatted.as_bytes());
	}
	writer.write_all(&year)?;

	writer.write_all(&text_field(tag.comment, 28, write_options)?)?;

	// The zero byte before the track number marks this as an ID3v1.1 tag
	writer.write_u8(0)?;
	writer.write_u8(tag.track_number.unwrap_or(0))?;
	writer.write_u8(tag.genre.unwrap_or(255))?;

	Ok(writer)
}

#[cfg(test)]
mod tests {
	use super::encode;
	use crate::config::{ParsingMode, WriteOptions};
	use crate::id3::v1::tag::{Id3v1Tag, Id3v1TagRef};

	#[test_log::test]
	fn encode_parse_round_trip() {
		let tag = Id3v1Tag {
			title: Some(String::from("Foo title")),
			artist: Some(String::from("Bar artist")),
			album: Some(String::from("Baz album")),
			year: Some(1984),
			comment: Some(String::from("Qux comment")),
			track_number: Some(7),
			genre: Some(32),
		};

		let encoded = encode(&Into::<Id3v1TagRef<'_>>::into(&tag), WriteOptions::default()).unwrap();
		assert_eq!(encoded.len(), 128);

		let mut bytes = [0_u8; 128];
		bytes.copy_from_slice(&encoded);

		let parsed = Id3v1Tag::parse(bytes, ParsingMode::Strict).unwrap();
		assert_eq!(parsed, tag);
	}

	#[test_log::test]
	fn wide_text() {
		let tag = Id3v1Tag {
			title: Some(String::from("フー")),
			artist: None,
			album: None,
			year: None,
			comment: None,
			track_number: None,
			genre: None,
		};

		let tag_ref = Into::<Id3v1TagRef<'_>>::into(&tag);

		let lossy = encode(&tag_ref, WriteOptions::new().lossy_text_encoding(true)).unwrap();
		assert_eq!(&lossy[3..5], b"??");

		assert!(encode(&tag_ref, WriteOptions::new().lossy_text_encoding(false)).is_err());
	}
}
