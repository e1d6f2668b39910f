//! An OGG page reader and writer
//!
//! This crate deals exclusively with the physical framing layer of OGG
//! streams: [`Page`]s and their headers, reassembly of logical [`Packets`]
//! that may span any number of pages, and re-pagination of modified packets
//! with freshly computed checksums.

mod crc;
mod error;
mod header;
mod packets;
mod paginate;

use std::io::{Read, Seek};

pub use crc::crc32;
pub use error::{PageError, Result};
pub use header::{PAGE_HEADER_SIZE, PageHeader};
pub use packets::{Packets, PacketsIter};
pub use paginate::paginate;

pub(crate) const CONTINUED_PACKET: u8 = 0x01;

/// The maximum page content size
pub const MAX_CONTENT_SIZE: usize = 65025;
/// The page contains the first page of the logical bitstream
pub const CONTAINS_FIRST_PAGE_OF_BITSTREAM: u8 = 0x02;
/// The page contains the last page of the logical bitstream
pub const CONTAINS_LAST_PAGE_OF_BITSTREAM: u8 = 0x04;

/// An OGG page
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Page {
	pub(crate) header: PageHeader,
	pub(crate) content: Vec<u8>,
	/// The position in the stream the page ended
	pub(crate) end: u64,
}

impl Page {
	/// Create a new `Page` from a header and content
	///
	/// The header's segment table is replaced with one matching `content`.
	///
	/// # Errors
	///
	/// * `content` is larger than [`MAX_CONTENT_SIZE`]
	pub fn new(mut header: PageHeader, content: Vec<u8>) -> Result<Self> {
		header.segments = segment_table(content.len())?;

		let end = header.start + (PAGE_HEADER_SIZE + header.segments.len() + content.len()) as u64;

		Ok(Self {
			header,
			content,
			end,
		})
	}

	/// Read a `Page` from a reader
	///
	/// # Errors
	///
	/// * [`PageError`]
	/// * [`std::io::Error`]
	pub fn read<R>(data: &mut R) -> Result<Self>
	where
		R: Read + Seek,
	{
		let header = PageHeader::read(data)?;

		let mut content = vec![0; header.content_size()];
		data.read_exact(&mut content)?;

		let end = data.stream_position()?;

		Ok(Self {
			header,
			content,
			end,
		})
	}

	/// Returns the page's header
	pub fn header(&self) -> &PageHeader {
		&self.header
	}

	/// Returns a mutable reference to the page's header
	pub fn header_mut(&mut self) -> &mut PageHeader {
		&mut self.header
	}

	/// Returns the page's content
	pub fn content(&self) -> &[u8] {
		&self.content
	}

	/// Consumes the page and returns its content
	pub fn take_content(self) -> Vec<u8> {
		self.content
	}

	/// The position in the stream the page started at
	pub fn start(&self) -> u64 {
		self.header.start
	}

	/// The position in the stream the page ended
	pub fn end(&self) -> u64 {
		self.end
	}

	/// Convert the page to bytes for writing
	///
	/// NOTE: The checksum is written as-is. [`Page::gen_crc`] will likely
	/// need to be called first.
	pub fn as_bytes(&self) -> Vec<u8> {
		let segments = &self.header.segments;

		let mut bytes =
			Vec::with_capacity(PAGE_HEADER_SIZE + segments.len() + self.content.len());

		bytes.extend(b"OggS");
		bytes.push(0);
		bytes.push(self.header.header_type_flag);
		bytes.extend(self.header.abgp.to_le_bytes());
		bytes.extend(self.header.stream_serial.to_le_bytes());
		bytes.extend(self.header.sequence_number.to_le_bytes());
		bytes.extend(self.header.checksum.to_le_bytes());
		bytes.push(segments.len() as u8);
		bytes.extend(segments.iter());
		bytes.extend(self.content.iter());

		bytes
	}

	/// Generate and store the CRC checksum of the page
	pub fn gen_crc(&mut self) {
		self.header.checksum = 0;
		self.header.checksum = crc::crc32(&self.as_bytes());
	}

	/// Verify the page's stored checksum against its content
	pub fn verify_crc(&self) -> bool {
		let mut bytes = self.as_bytes();

		// The checksum is computed with its own field zeroed
		bytes[22..26].fill(0);

		crc::crc32(&bytes) == self.header.checksum
	}
}

/// Creates a segment table based on the length
///
/// The table always carries a terminating lacing value (< 255), so the
/// maximum representable length is one byte short of [`MAX_CONTENT_SIZE`].
/// Packets that large must span pages; see [`paginate`].
///
/// # Errors
///
/// `length` >= [`MAX_CONTENT_SIZE`]
pub fn segment_table(length: usize) -> Result<Vec<u8>> {
	if length >= MAX_CONTENT_SIZE {
		return Err(PageError::TooMuchData);
	}

	let mut segments = vec![255; length / 255];
	segments.push((length % 255) as u8);

	Ok(segments)
}

#[cfg(test)]
mod tests {
	use crate::{Page, PageHeader, segment_table};
	use std::io::Cursor;

	// The identification header of a real Opus stream, whose page checksum
	// is known good.
	const OPUS_IDENT_PACKET: &[u8] = &[
		0x4F, 0x70, 0x75, 0x73, 0x48, 0x65, 0x61, 0x64, 0x01, 0x02, 0x38, 0x01, 0x80, 0xBB, 0, 0,
		0, 0, 0,
	];

	#[test]
	fn known_crc() {
		let header = PageHeader::new(2, 0, 1_759_377_061, 0);
		let mut page = Page::new(header, OPUS_IDENT_PACKET.to_vec()).unwrap();

		page.gen_crc();

		assert_eq!(page.header().checksum(), 3_579_522_525);
		assert!(page.verify_crc());
	}

	#[test]
	fn read_roundtrip() {
		let header = PageHeader::new(2, 0, 1_759_377_061, 0);
		let mut page = Page::new(header, OPUS_IDENT_PACKET.to_vec()).unwrap();
		page.gen_crc();

		let bytes = page.as_bytes();
		assert_eq!(bytes.len(), 47);

		let read_back = Page::read(&mut Cursor::new(bytes)).unwrap();

		assert_eq!(read_back, page);
		assert_eq!(read_back.header().segments(), &[0x13]);
	}

	#[test]
	fn corrupt_crc_detected() {
		let header = PageHeader::new(2, 0, 1_759_377_061, 0);
		let mut page = Page::new(header, OPUS_IDENT_PACKET.to_vec()).unwrap();
		page.gen_crc();

		page.content[0] ^= 0xFF;
		assert!(!page.verify_crc());
	}

	#[test]
	fn segment_table_sizes() {
		assert_eq!(segment_table(0).unwrap(), vec![0]);
		assert_eq!(segment_table(100).unwrap(), vec![100]);
		assert_eq!(segment_table(255).unwrap(), vec![255, 0]);
		assert_eq!(segment_table(510).unwrap(), vec![255, 255, 0]);
		assert_eq!(segment_table(65024).unwrap().len(), 255);
		assert!(segment_table(65025).is_err());
	}
}
