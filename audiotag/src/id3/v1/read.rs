use super::constants::{GENRES, ID3V1_TAG_MARKER};
use super::tag::Id3v1Tag;
use crate::config::ParsingMode;
use crate::error::TagError;
use crate::macros::{decode_err, err};
use crate::util::text::latin1_decode;

impl Id3v1Tag {
	/// This is **NOT** a public API
	#[doc(hidden)]
	pub fn parse(reader: [u8; 128], parse_mode: ParsingMode) -> Result<Self, TagError> {
		if reader[..3] != ID3V1_TAG_MARKER {
			decode_err!(@BAIL "Found an invalid ID3v1 tag");
		}

		let fields = &reader[3..];

		let title = decode_text(&fields[..30]);
		let artist = decode_text(&fields[30..60]);
		let album = decode_text(&fields[60..90]);
		let year = try_parse_year(&fields[90..94], parse_mode)?;

		// The comment field is 30 bytes for ID3v1, or 28 plus a track number for ID3v1.1.
		// A null terminator 28 bytes in followed by a non-zero track number marks the
		// extension, a track number of 0 is invalid.
		let mut track_number = None;
		let comment_range = if fields[122] == 0 && fields[123] != 0 {
			track_number = Some(fields[123]);
			94..123
		} else {
			94..124
		};

		let comment = decode_text(&fields[comment_range]);

		let genre = (fields[124] < GENRES.len() as u8).then_some(fields[124]);

		Ok(Self {
			title,
			artist,
			album,
			year,
			comment,
			track_number,
			genre,
		})
	}
}

fn decode_text(data: &[u8]) -> Option<String> {
	let end = match data.iter().position(|&b| b == 0) {
		Some(0) => return None,
		Some(null_pos) => {
			if data[null_pos..].iter().any(|&b| b != b'\0') {
				log::warn!("ID3v1 text field contains trailing junk, skipping");
			}

			null_pos
		},
		None => data.len(),
	};

	Some(latin1_decode(&data[..end]))
}

fn try_parse_year(input: &[u8], parse_mode: ParsingMode) -> Result<Option<u16>, TagError> {
	let mut year = 0_u16;
	let mut num_digits = 0_usize;

	for byte in input.iter().take_while(|b| b.is_ascii_digit()) {
		year = year * 10 + u16::from(byte - b'0');
		num_digits += 1;
	}

	if num_digits != 4 {
		// Any year that isn't 4 characters should technically be a decoding failure.
		// However, most popular libraries will write "\0\0\0\0" for empty
		// years, rather than "0000".
		if parse_mode == ParsingMode::Strict {
			err!(TextDecode(
				"ID3v1 year field contains non-ASCII digit characters"
			));
		}

		return Ok(None);
	}

	Ok(Some(year))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn empty_bytes() -> [u8; 128] {
		let mut bytes = [0_u8; 128];
		bytes[..3].copy_from_slice(&ID3V1_TAG_MARKER);
		bytes[127] = 255;
		bytes
	}

	#[test_log::test]
	fn parse_v1_1_track_number() {
		let mut bytes = empty_bytes();
		bytes[3..12].copy_from_slice(b"Foo title");
		bytes[93..97].copy_from_slice(b"1984");
		// Comment terminator + track number, the ID3v1.1 extension
		bytes[125] = 0;
		bytes[126] = 7;

		let tag = Id3v1Tag::parse(bytes, ParsingMode::BestAttempt).unwrap();

		assert_eq!(tag.title.as_deref(), Some("Foo title"));
		assert_eq!(tag.year, Some(1984));
		assert_eq!(tag.track_number, Some(7));
		assert_eq!(tag.genre, None);
	}

	#[test_log::test]
	fn empty_year_best_attempt() {
		let bytes = empty_bytes();

		let tag = Id3v1Tag::parse(bytes, ParsingMode::BestAttempt).unwrap();
		assert_eq!(tag.year, None);

		assert!(Id3v1Tag::parse(bytes, ParsingMode::Strict).is_err());
	}
}
