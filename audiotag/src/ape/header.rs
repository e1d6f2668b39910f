use crate::error::Result;
use crate::macros::decode_err;

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

#[derive(Copy, Clone)]
pub(crate) struct ApeHeader {
	/// The size of the tag on disk, including the header if one is present
	pub(crate) size: u32,
	pub(crate) item_count: u32,
}

/// Read an APE header or footer, minus the preamble
///
/// When reading a footer, the reader is left at the start of the tag's items.
pub(crate) fn read_ape_header<R>(data: &mut R, footer: bool) -> Result<ApeHeader>
where
	R: Read + Seek,
{
	let version = data.read_u32::<LittleEndian>()?;

	// The size field excludes the header, but includes the footer and all items
	let mut size = data.read_u32::<LittleEndian>()?;

	if size < 32 {
		decode_err!(@BAIL "APE: Tag size field is smaller than the footer itself");
	}

	let item_count = data.read_u32::<LittleEndian>()?;
	let flags = data.read_u32::<LittleEndian>()?;

	if footer {
		// We've read 24 of the footer's 32 bytes (with the preamble), the items
		// start `size` bytes before the footer's end
		data.seek(SeekFrom::Current(8_i64 - i64::from(size)))?;
	} else {
		// Skip the 8 reserved bytes
		data.seek(SeekFrom::Current(8))?;
	}

	// Account for the header when determining the tag's full size on disk.
	// Version 1 tags don't have a header.
	if version >= 2000 && flags & (1 << 31) > 0 {
		size += 32;
	}

	Ok(ApeHeader { size, item_count })
}
