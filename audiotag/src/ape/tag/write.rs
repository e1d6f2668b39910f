use super::ApeTagRef;
use super::item::ApeItemRef;
use crate::ape::constants::APE_PREAMBLE;
use crate::ape::tag::read;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::{Result, TagError};
use crate::id3::find_id3v1;
use crate::macros::{decode_err, err};
use crate::probe::Probe;
use crate::tag::item::ItemValueRef;
use crate::util::io::{FileLike, Length, Truncate};

use std::io::{Cursor, SeekFrom, Write};
use std::ops::Range;

use byteorder::{LittleEndian, WriteBytesExt};

pub(crate) fn write_to<'a, F, I>(
	file: &mut F,
	tag_ref: &mut ApeTagRef<'a, I>,
	write_options: WriteOptions,
) -> Result<()>
where
	I: Iterator<Item = ApeItemRef<'a>>,
	F: FileLike,
	TagError: From<<F as Truncate>::Error>,
	TagError: From<<F as Length>::Error>,
{
	let probe = Probe::new(file).guess_file_type()?;

	match probe.file_type() {
		Some(ft) if super::ApeTag::SUPPORTED_FORMATS.contains(&ft) => {},
		_ => err!(UnsupportedTag),
	}

	let file = probe.into_inner();

	// The ID3v2 tag is not read, but this will seek to the end of it if one exists
	crate::id3::find_id3v2(file)?;

	// Items of any existing tag that are marked read only survive the rewrite
	let mut retained_items = Vec::new();

	// The write path is not exposed to the caller's parse options
	let parse_options = ParseOptions::new();

	// An APE tag in the beginning of a file is against the spec.
	// If one is found, it'll be removed and rewritten at the bottom, where it should be.
	let mut leading_tag_span: Option<Range<u64>> = None;

	let start = file.stream_position()?;
	match read::read_ape_tag(file, false, parse_options)? {
		(Some(existing_tag), Some(header)) => {
			if write_options.respect_read_only {
				retained_items.extend(existing_tag.items.into_iter().filter(|i| i.read_only));
			}

			leading_tag_span = Some(start..start + u64::from(header.size));
		},
		_ => {
			file.seek(SeekFrom::Current(-8))?;
		},
	}

	// Skip over an ID3v1 tag
	find_id3v1(file, false, parse_options.parsing_mode)?;

	// In case there's no APE tag already, this is the spot it belongs
	let ape_position = file.stream_position()?;

	// Now search for an APE tag at the end
	file.seek(SeekFrom::Current(-32))?;

	let mut trailing_tag_span: Option<Range<usize>> = None;

	// The stream sits at the start of the would-be footer, so the tag (if any) ends 32 bytes ahead
	let end_of_tag = file.stream_position()? as usize + 32;
	if let (Some(existing_tag), Some(header)) = read::read_ape_tag(file, true, parse_options)? {
		if write_options.respect_read_only {
			retained_items.extend(existing_tag.items.into_iter().filter(|i| i.read_only));
		}

		// The size field is untrusted input, it must not reach past the start of the file
		let Some(tag_start) = end_of_tag.checked_sub(header.size as usize) else {
			decode_err!(@BAIL "APE: Existing tag size extends past the start of the file");
		};

		trailing_tag_span = Some(tag_start..end_of_tag);
	}

	let tag = create_ape_tag(
		tag_ref,
		retained_items.iter().map(Into::into),
		write_options,
	)?;

	file.rewind()?;

	let mut file_bytes = Vec::new();
	file.read_to_end(&mut file_bytes)?;

	// Replace an existing trailing tag, otherwise insert before any ID3v1 tag
	match trailing_tag_span {
		Some(range) => {
			file_bytes.splice(range, tag);
		},
		None => {
			file_bytes.splice(ape_position as usize..ape_position as usize, tag);
		},
	}

	// Now, if there was a tag at the beginning, remove it
	if let Some(span) = leading_tag_span {
		file_bytes.drain(span.start as usize..span.end as usize);
	}

	file.rewind()?;
	file.truncate(0)?;
	file.write_all(&file_bytes)?;

	Ok(())
}

pub(super) fn create_ape_tag<'a, 'b, I, R>(
	tag: &mut ApeTagRef<'a, I>,
	retained: R,
	_write_options: WriteOptions,
) -> Result<Vec<u8>>
where
	I: Iterator<Item = ApeItemRef<'a>>,
	R: Iterator<Item = ApeItemRef<'b>>,
{
	let mut peek = tag.items.by_ref().peekable();

	// Unnecessary to write anything if there's no metadata
	if peek.peek().is_none() {
		return Ok(Vec::<u8>::new());
	}

	let mut items = Cursor::new(Vec::<u8>::new());
	let mut item_count = 0_u32;
	let mut written_keys = Vec::new();

	for item in peek {
		written_keys.push(item.key);
		write_item(&mut items, &item)?;
		item_count += 1;
	}

	// Items retained from an existing tag, the new tag's items always win
	for item in retained {
		if written_keys
			.iter()
			.any(|key| key.eq_ignore_ascii_case(item.key))
		{
			continue;
		}

		write_item(&mut items, &item)?;
		item_count += 1;
	}

	let items = items.into_inner();

	// The size field includes the 32 bytes of the footer
	let size = items.len() as u64 + 32;
	if size > u64::from(u32::MAX) {
		err!(TooMuchData);
	}

	let mut tag_write = Vec::with_capacity(items.len() + 64);
	tag_write.extend_from_slice(&tag_boundary(size as u32, item_count, tag.read_only, true)?);
	tag_write.extend_from_slice(&items);
	tag_write.extend_from_slice(&tag_boundary(size as u32, item_count, tag.read_only, false)?);

	Ok(tag_write)
}

fn write_item(writer: &mut Cursor<Vec<u8>>, item: &ApeItemRef<'_>) -> Result<()> {
	let mut flags = match item.value {
		ItemValueRef::Text(_) => 0_u32,
		ItemValueRef::Binary(_) => 1_u32 << 1,
		ItemValueRef::Locator(_) => 2_u32 << 1,
	};

	if item.read_only {
		flags |= 1_u32;
	}

	let value = item.as_bytes();

	writer.write_u32::<LittleEndian>(value.len() as u32)?;
	writer.write_u32::<LittleEndian>(flags)?;
	writer.write_all(item.key.as_bytes())?;
	writer.write_u8(0)?;
	writer.write_all(value)?;

	Ok(())
}

// The header and footer are identical, save for bit 29 of the flags
fn tag_boundary(
	size: u32,
	item_count: u32,
	tag_read_only: bool,
	is_header: bool,
) -> Result<[u8; 32]> {
	let mut bytes = [0_u8; 32];
	let mut cursor = Cursor::new(&mut bytes[..]);

	cursor.write_all(APE_PREAMBLE)?;
	// Even if we read a v1 tag, we end up writing v2
	cursor.write_u32::<LittleEndian>(2000)?;
	cursor.write_u32::<LittleEndian>(size)?;
	cursor.write_u32::<LittleEndian>(item_count)?;

	// Bit 30 set: tag contains a footer
	// Bit 31 set: tag contains a header
	let mut flags = (1_u32 << 30) | (1_u32 << 31);

	if is_header {
		// Bit 29 set: this is the header
		flags |= 1_u32 << 29;
	}

	if tag_read_only {
		// Bit 0 set: tag is read only
		flags |= 1;
	}

	cursor.write_u32::<LittleEndian>(flags)?;
	// The header/footer must end in 8 bytes of zeros, which the array started as

	Ok(bytes)
}
