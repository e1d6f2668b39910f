use crate::error::Result;
use crate::header::PAGE_HEADER_SIZE;
use crate::{
	CONTAINS_FIRST_PAGE_OF_BITSTREAM, CONTAINS_LAST_PAGE_OF_BITSTREAM, CONTINUED_PACKET, Page,
	PageHeader,
};

const MAX_SEGMENT_COUNT: usize = 255;

struct PaginateContext {
	pages: Vec<Page>,
	segments: Vec<u8>,
	content: Vec<u8>,
	abgp: u64,
	stream_serial: u32,
	header_flags: u8,
	sequence_number: u32,
	pos: u64,
	first_page: bool,
	starts_mid_packet: bool,
	packet_finished_on_page: bool,
}

impl PaginateContext {
	fn new(stream_serial: u32, abgp: u64, header_flags: u8) -> Self {
		Self {
			pages: Vec::new(),
			segments: Vec::new(),
			content: Vec::new(),
			abgp,
			stream_serial,
			header_flags,
			sequence_number: 0,
			pos: 0,
			first_page: true,
			starts_mid_packet: false,
			packet_finished_on_page: false,
		}
	}

	fn flush_page(&mut self, next_page_continues: bool) {
		let mut header_type_flag = 0;
		if self.starts_mid_packet {
			header_type_flag |= CONTINUED_PACKET;
		}
		if self.first_page && self.header_flags & CONTAINS_FIRST_PAGE_OF_BITSTREAM != 0 {
			header_type_flag |= CONTAINS_FIRST_PAGE_OF_BITSTREAM;
		}

		let header = PageHeader {
			start: self.pos,
			header_type_flag,
			abgp: if self.packet_finished_on_page {
				self.abgp
			} else {
				// A special value of '-1' (in two's complement) indicates
				// that no packets finish on this page
				1_u64.wrapping_neg()
			},
			stream_serial: self.stream_serial,
			sequence_number: self.sequence_number,
			checksum: 0,
			segments: core::mem::take(&mut self.segments),
		};

		let content = core::mem::take(&mut self.content);
		self.pos += (PAGE_HEADER_SIZE + header.segments.len() + content.len()) as u64;

		self.pages.push(Page {
			header,
			content,
			end: self.pos,
		});

		self.sequence_number += 1;
		self.first_page = false;
		self.starts_mid_packet = next_page_continues;
		self.packet_finished_on_page = false;
	}

	fn push_packet(&mut self, packet: &[u8]) {
		// Lacing values: a run of 255s followed by a terminator < 255.
		// A packet whose length is an exact multiple of 255 is terminated
		// by a lacing value of 0.
		let full_lacings = packet.len() / 255;
		let final_lacing = (packet.len() % 255) as u8;

		let mut remaining = packet;
		for i in 0..=full_lacings {
			let is_final = i == full_lacings;
			let lacing = if is_final { final_lacing } else { 255 };

			let (chunk, rest) = remaining.split_at(usize::from(lacing));
			remaining = rest;

			self.segments.push(lacing);
			self.content.extend_from_slice(chunk);

			if is_final {
				self.packet_finished_on_page = true;
			}

			if self.segments.len() == MAX_SEGMENT_COUNT {
				self.flush_page(!is_final);
			}
		}

		// A packet always ends its page
		if !self.segments.is_empty() {
			self.flush_page(false);
		}
	}
}

/// Create pages from a list of packets
///
/// Each packet is laid out into as many pages as its size demands, with
/// `CONTINUED_PACKET` marking every page that begins mid-packet. Checksums
/// are left zeroed; callers generate them when serializing
/// (see [`Page::gen_crc`]).
///
/// # Errors
///
/// This is currently infallible, but returns `Result` for parity with the
/// rest of the crate's page construction APIs.
pub fn paginate<'a, I>(packets: I, stream_serial: u32, abgp: u64, flags: u8) -> Result<Vec<Page>>
where
	I: IntoIterator<Item = &'a [u8]>,
{
	let mut ctx = PaginateContext::new(stream_serial, abgp, flags);

	for packet in packets {
		ctx.push_packet(packet);
	}

	if flags & CONTAINS_LAST_PAGE_OF_BITSTREAM != 0 {
		if let Some(last) = ctx.pages.last_mut() {
			last.header.header_type_flag |= CONTAINS_LAST_PAGE_OF_BITSTREAM;
		}
	}

	Ok(ctx.pages)
}

#[cfg(test)]
mod tests {
	use super::paginate;
	use crate::{
		CONTAINS_FIRST_PAGE_OF_BITSTREAM, CONTINUED_PACKET, MAX_CONTENT_SIZE,
	};

	#[test]
	fn single_page_per_packet() {
		let packets: [&[u8]; 2] = [b"ident packet", b"comment packet"];
		let pages = paginate(packets, 1234, 0, CONTAINS_FIRST_PAGE_OF_BITSTREAM).unwrap();

		assert_eq!(pages.len(), 2);

		assert_eq!(pages[0].header().header_type_flag(), 0x02);
		assert_eq!(pages[0].header().sequence_number, 0);
		assert_eq!(pages[0].header().abgp, 0);
		assert_eq!(pages[0].content(), b"ident packet");

		assert_eq!(pages[1].header().header_type_flag(), 0);
		assert_eq!(pages[1].header().sequence_number, 1);
		assert_eq!(pages[1].content(), b"comment packet");

		assert_eq!(pages[1].start(), pages[0].end());
	}

	#[test]
	fn spanning_packet() {
		let big = vec![0xCD_u8; MAX_CONTENT_SIZE + 100];
		let pages = paginate([big.as_slice()], 77, 42, 0).unwrap();

		assert_eq!(pages.len(), 2);

		// No packet finishes on the first page
		assert_eq!(pages[0].header().abgp, u64::MAX);
		assert_eq!(pages[0].header().segments().len(), 255);
		assert_eq!(pages[0].content().len(), MAX_CONTENT_SIZE);

		assert_eq!(pages[1].header().header_type_flag(), CONTINUED_PACKET);
		assert_eq!(pages[1].header().abgp, 42);
		assert_eq!(pages[1].content().len(), 100);
	}

	#[test]
	fn multiple_of_255_terminated() {
		let packet = vec![0_u8; 510];
		let pages = paginate([packet.as_slice()], 1, 0, 0).unwrap();

		assert_eq!(pages.len(), 1);
		assert_eq!(pages[0].header().segments(), &[255, 255, 0]);
	}
}
