use super::ApeTag;
use super::item::ApeItem;
use crate::ape::APE_PICTURE_TYPES;
use crate::ape::constants::{APE_PREAMBLE, INVALID_KEYS};
use crate::ape::header::{self, ApeHeader};
use crate::config::ParseOptions;
use crate::error::Result;
use crate::macros::{decode_err, err, try_vec};
use crate::tag::ItemValue;
use crate::util::text::utf8_decode;

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

// Item keys are 2-255 characters
const KEY_LEN_RANGE: std::ops::RangeInclusive<usize> = 2..=255;

/// Reads the items following an already-parsed [`ApeHeader`], leaving the
/// reader past the footer.
pub(crate) fn read_ape_tag_with_header<R>(
	reader: &mut R,
	header: ApeHeader,
	parse_options: ParseOptions,
) -> Result<ApeTag>
where
	R: Read + Seek,
{
	let mut tag = ApeTag::default();

	// Each item is at least 11 bytes: a value size, flags, and a
	// null-terminated key of 2 or more characters.
	let mut bytes_left = header.size;

	for _ in 0..header.item_count {
		if bytes_left < 11 {
			break;
		}

		let value_len = reader.read_u32::<LittleEndian>()?;
		if value_len > bytes_left {
			err!(SizeMismatch);
		}

		bytes_left -= 4;
		let flags = reader.read_u32::<LittleEndian>()?;

		let mut key_bytes = Vec::new();
		loop {
			match reader.read_u8()? {
				0 => break,
				b => key_bytes.push(b),
			}
		}

		let key = utf8_decode(key_bytes)
			.map_err(|_| decode_err!("APE: Item key is not UTF-8"))?;

		if INVALID_KEYS.contains(&&*key.to_uppercase()) {
			decode_err!(@BAIL "APE: Encountered a reserved item key");
		}

		if APE_PICTURE_TYPES.contains(&&*key) && !parse_options.read_cover_art {
			reader.seek(SeekFrom::Current(i64::from(value_len)))?;
			continue;
		}

		if value_len == 0 || !KEY_LEN_RANGE.contains(&key.len()) {
			log::warn!("APE: Skipping invalid item key '{}'", key);
			reader.seek(SeekFrom::Current(i64::from(value_len)))?;
			continue;
		}

		let mut value_bytes = try_vec![0; value_len as usize];
		reader.read_exact(&mut value_bytes)?;

		let read_only = (flags & 1) == 1;
		let value = match (flags >> 1) & 3 {
			0 => ItemValue::Text(
				utf8_decode(value_bytes)
					.map_err(|_| decode_err!("APE: Text item value is not UTF-8"))?,
			),
			1 => ItemValue::Binary(value_bytes),
			2 => ItemValue::Locator(
				utf8_decode(value_bytes)
					.map_err(|_| decode_err!("APE: Locator item value is not UTF-8"))?,
			),
			_ => decode_err!(@BAIL "APE: Item flags contain an invalid item type"),
		};

		let mut item = ApeItem::new(key, value)?;
		item.read_only = read_only;

		tag.insert(item);
	}

	// The footer is a duplicate of the header, nothing left to learn from it
	reader.seek(SeekFrom::Current(32))?;

	Ok(tag)
}

/// Probes for an APE tag at the reader's current position.
///
/// On a preamble mismatch this returns `(None, None)` with the reader left
/// past the 8 preamble bytes, so callers wanting to continue from the probe
/// position must seek back themselves.
pub(crate) fn read_ape_tag<R: Read + Seek>(
	reader: &mut R,
	footer: bool,
	parse_options: ParseOptions,
) -> Result<(Option<ApeTag>, Option<ApeHeader>)> {
	let mut preamble = [0; 8];
	reader.read_exact(&mut preamble)?;

	if &preamble != APE_PREAMBLE {
		return Ok((None, None));
	}

	let ape_header = header::read_ape_header(reader, footer)?;

	let mut tag = None;
	if parse_options.read_tags {
		tag = Some(read_ape_tag_with_header(reader, ape_header, parse_options)?);
	}

	Ok((tag, Some(ape_header)))
}
