use crate::error::{PageError, Result};
use crate::paginate::paginate;
use crate::Page;

use std::fmt::{Debug, Formatter};
use std::io::{Read, Seek, Write};

/// A container for the logical packets of an OGG stream
///
/// Packets have no relation to page boundaries: a single packet may span
/// any number of pages, and a single page may hold any number of packets.
/// `Packets` hides that impedance mismatch, exposing the reassembled
/// packet contents.
pub struct Packets {
	content: Vec<u8>,
	packet_sizes: Vec<u64>,
}

impl Packets {
	/// Read as many packets as possible from a reader
	///
	/// # Errors
	///
	/// A page has a malformed header
	pub fn read<R>(data: &mut R) -> Result<Self>
	where
		R: Read + Seek,
	{
		Self::read_count(data, -1, false)
	}

	/// Read a specific number of packets from a reader
	///
	/// A special `count` of `-1` will read as many packets as possible, in
	/// which case [`Packets::read`] should be used. Any other value 0 or
	/// below returns an empty `Packets`.
	///
	/// When `verify_crc` is set, every page visited has its checksum
	/// recomputed and compared against the stored one, failing with
	/// [`PageError::ChecksumMismatch`] on the first disagreement.
	///
	/// # Errors
	///
	/// * Unable to read the specified number of packets ([`PageError::NotEnoughData`])
	/// * A page has a malformed header
	/// * `verify_crc` is set and a page fails verification
	pub fn read_count<R>(data: &mut R, count: isize, verify_crc: bool) -> Result<Self>
	where
		R: Read + Seek,
	{
		let mut content = Vec::new();
		let mut packet_sizes = Vec::new();

		if count == 0 || count < -1 {
			return Ok(Self {
				content,
				packet_sizes,
			});
		}

		let mut packets_read = 0_isize;
		let mut current_packet_size = 0_u64;

		'outer: loop {
			let Ok(page) = Page::read(data) else {
				break;
			};

			if verify_crc && !page.verify_crc() {
				return Err(PageError::ChecksumMismatch);
			}

			let mut offset = 0_usize;
			for &lacing in page.header.segments() {
				let lacing = usize::from(lacing);

				content.extend_from_slice(&page.content[offset..offset + lacing]);
				offset += lacing;
				current_packet_size += lacing as u64;

				// A lacing value < 255 terminates the packet
				if lacing < 255 {
					packet_sizes.push(current_packet_size);
					current_packet_size = 0;
					packets_read += 1;

					if packets_read == count {
						break 'outer;
					}
				}
			}
		}

		if count != -1 && packets_read != count {
			return Err(PageError::NotEnoughData);
		}

		// Discard a trailing unterminated packet
		if current_packet_size != 0 {
			content.truncate((content.len() as u64 - current_packet_size) as usize);
		}

		Ok(Self {
			content,
			packet_sizes,
		})
	}

	/// Returns the number of packets
	pub fn len(&self) -> usize {
		self.packet_sizes.len()
	}

	/// Returns true if there are no packets
	pub fn is_empty(&self) -> bool {
		self.packet_sizes.is_empty()
	}

	// The byte range the packet at `idx` occupies within `content`
	fn packet_span(&self, idx: usize) -> Option<std::ops::Range<usize>> {
		if idx >= self.packet_sizes.len() {
			return None;
		}

		let start: u64 = self.packet_sizes[..idx].iter().sum();
		let end = start + self.packet_sizes[idx];

		Some(start as usize..end as usize)
	}

	/// Gets the packet at `idx`, returning its contents
	///
	/// This is zero-indexed, and returns [`None`] when out of bounds.
	pub fn get(&self, idx: usize) -> Option<&[u8]> {
		let span = self.packet_span(idx)?;
		Some(&self.content[span])
	}

	/// Replaces the content of the packet at `idx`
	///
	/// This is zero-indexed, and returns `false` when out of bounds.
	pub fn set(&mut self, idx: usize, content: impl Into<Vec<u8>>) -> bool {
		let Some(span) = self.packet_span(idx) else {
			return false;
		};

		let content = content.into();
		let content_size = content.len();

		self.content.splice(span, content);
		self.packet_sizes[idx] = content_size as u64;

		true
	}

	/// Returns an iterator over the packets
	pub fn iter(&self) -> PacketsIter<'_> {
		<&Self as IntoIterator>::into_iter(self)
	}

	/// Convert the packets into a stream of pages
	///
	/// See [`paginate()`] for details.
	///
	/// # Errors
	///
	/// See [`paginate()`]
	pub fn paginate(&self, stream_serial: u32, abgp: u64, flags: u8) -> Result<Vec<Page>> {
		paginate(self.iter(), stream_serial, abgp, flags)
	}

	/// Paginate and write all packets to a writer
	///
	/// Returns the number of pages written.
	///
	/// # Errors
	///
	/// * See [`paginate()`]
	/// * Unable to write, see [`std::io::Error`]
	pub fn write_to<W>(
		&self,
		writer: &mut W,
		stream_serial: u32,
		abgp: u64,
		flags: u8,
	) -> Result<usize>
	where
		W: Write,
	{
		let paginated = self.paginate(stream_serial, abgp, flags)?;
		let num_pages = paginated.len();

		for mut page in paginated {
			page.gen_crc();
			writer.write_all(&page.as_bytes())?;
		}

		Ok(num_pages)
	}
}

/// An iterator over packets
///
/// This is created by calling `into_iter` on [`Packets`]
#[derive(Clone, Debug)]
pub struct PacketsIter<'a> {
	content: &'a [u8],
	packet_sizes: &'a [u64],
}

impl<'a> Iterator for PacketsIter<'a> {
	type Item = &'a [u8];

	fn next(&mut self) -> Option<Self::Item> {
		let (&size, remaining_sizes) = self.packet_sizes.split_first()?;
		self.packet_sizes = remaining_sizes;

		let (packet, remaining_content) = self.content.split_at(size as usize);
		self.content = remaining_content;

		Some(packet)
	}
}

impl<'a> IntoIterator for &'a Packets {
	type IntoIter = PacketsIter<'a>;
	type Item = &'a [u8];

	fn into_iter(self) -> Self::IntoIter {
		PacketsIter {
			content: &self.content,
			packet_sizes: &self.packet_sizes,
		}
	}
}

impl Debug for Packets {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Packets")
			.field("total_bytes", &self.content.len())
			.field("count", &self.packet_sizes.len())
			.finish()
	}
}

// A packet spanning pages must keep the CONTINUED_PACKET relationship
// between reading and writing, so these tests drive both directions.
#[cfg(test)]
mod tests {
	use super::Packets;
	use crate::{CONTAINS_FIRST_PAGE_OF_BITSTREAM, MAX_CONTENT_SIZE, Page, PageError};

	use std::io::Cursor;

	fn write_stream(packets: &[&[u8]]) -> Vec<u8> {
		let mut sizes = Vec::new();
		let mut content = Vec::new();
		for p in packets {
			sizes.push(p.len() as u64);
			content.extend_from_slice(p);
		}

		let packets = Packets {
			content,
			packet_sizes: sizes,
		};

		let mut out = Cursor::new(Vec::new());
		packets
			.write_to(&mut out, 1234, 0, CONTAINS_FIRST_PAGE_OF_BITSTREAM)
			.unwrap();
		out.into_inner()
	}

	#[test]
	fn roundtrip_small_packets() {
		let stream = write_stream(&[b"first packet", b"second", b""]);

		let packets = Packets::read(&mut Cursor::new(&stream)).unwrap();
		assert_eq!(packets.len(), 3);
		assert_eq!(packets.get(0), Some(b"first packet".as_slice()));
		assert_eq!(packets.get(1), Some(b"second".as_slice()));
		assert_eq!(packets.get(2), Some(b"".as_slice()));
		assert_eq!(packets.get(3), None);
	}

	#[test]
	fn roundtrip_spanning_packet() {
		let big = vec![0xAB_u8; MAX_CONTENT_SIZE + 100];
		let stream = write_stream(&[b"ident", &big]);

		let packets = Packets::read_count(&mut Cursor::new(&stream), 2, true).unwrap();
		assert_eq!(packets.get(0), Some(b"ident".as_slice()));
		assert_eq!(packets.get(1), Some(big.as_slice()));
	}

	#[test]
	fn not_enough_packets() {
		let stream = write_stream(&[b"only one"]);

		let res = Packets::read_count(&mut Cursor::new(&stream), 2, false);
		assert!(matches!(res, Err(PageError::NotEnoughData)));
	}

	#[test]
	fn crc_verification() {
		let mut stream = write_stream(&[b"first packet", b"second"]);

		// Flip a content byte of the first page
		let first_page_end = Page::read(&mut Cursor::new(&stream)).unwrap().end() as usize;
		stream[first_page_end - 1] ^= 0xFF;

		let res = Packets::read_count(&mut Cursor::new(&stream), 2, true);
		assert!(matches!(res, Err(PageError::ChecksumMismatch)));

		// Without verification the corruption goes unnoticed
		assert!(Packets::read_count(&mut Cursor::new(&stream), 2, false).is_ok());
	}

	#[test]
	fn replace_packet() {
		let stream = write_stream(&[b"first packet", b"second"]);

		let mut packets = Packets::read(&mut Cursor::new(&stream)).unwrap();
		assert!(packets.set(1, b"a longer second packet".as_slice()));
		assert_eq!(packets.get(0), Some(b"first packet".as_slice()));
		assert_eq!(packets.get(1), Some(b"a longer second packet".as_slice()));

		assert!(!packets.set(2, b"out of bounds".as_slice()));
	}
}
