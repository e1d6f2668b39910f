use audiotag::file::TaggedFileExt;
use audiotag::tag::{ItemKey, ItemValue, TagItem, TagType};

use std::fs::File;
use std::io::{Seek as _, Write as _};

use oggframe::CONTAINS_FIRST_PAGE_OF_BITSTREAM;

pub const OGG_STREAM_SERIAL: u32 = 2_784_419_176;

/// Create a new temporary file containing `content`
pub fn temp_file(content: &[u8]) -> File {
	let mut file = tempfile::tempfile().unwrap();
	file.write_all(content).unwrap();
	file.rewind().unwrap();

	file
}

/// Paginate `packets` into a stream image with valid checksums
pub fn write_ogg(packets: &[&[u8]]) -> Vec<u8> {
	let mut pages = oggframe::paginate(
		packets.iter().copied(),
		OGG_STREAM_SERIAL,
		0,
		CONTAINS_FIRST_PAGE_OF_BITSTREAM,
	)
	.unwrap();

	let mut out = Vec::new();
	for page in &mut pages {
		page.gen_crc();
		out.extend_from_slice(&page.as_bytes());
	}

	out
}

/// Create the body of a metadata packet (vendor + comments), without any signature
pub fn comment_packet_body(vendor: &str, comments: &[(&str, &str)]) -> Vec<u8> {
	let mut body = Vec::new();

	body.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
	body.extend_from_slice(vendor.as_bytes());

	body.extend_from_slice(&(comments.len() as u32).to_le_bytes());
	for (k, v) in comments {
		let comment = format!("{k}={v}");
		body.extend_from_slice(&(comment.len() as u32).to_le_bytes());
		body.extend_from_slice(comment.as_bytes());
	}

	body
}

/// Create a minimal OGG Vorbis file containing the given comments
pub fn synth_vorbis(vendor: &str, comments: &[(&str, &str)]) -> Vec<u8> {
	let mut ident = vec![0x01];
	ident.extend_from_slice(b"vorbis");
	// Version, channels, sample rate, bitrates, blocksizes, framing flag
	ident.resize(30, 0);

	let mut comment = vec![0x03];
	comment.extend_from_slice(b"vorbis");
	comment.extend_from_slice(&comment_packet_body(vendor, comments));
	// Framing bit
	comment.push(1);

	let mut setup = vec![0x05];
	setup.extend_from_slice(b"vorbis");
	setup.resize(64, 0);

	write_ogg(&[&ident, &comment, &setup])
}

/// Create a minimal OGG Speex file containing the given comments
pub fn synth_speex(vendor: &str, comments: &[(&str, &str)]) -> Vec<u8> {
	let mut header = Vec::new();
	header.extend_from_slice(b"Speex   ");
	// The remainder of the 80 byte header (version string, rates, modes, ...)
	header.resize(80, 0);

	// Unlike Vorbis, the Speex metadata packet has no signature or framing bit
	let comment = comment_packet_body(vendor, comments);

	write_ogg(&[&header, &comment])
}

/// Create a minimal True Audio stream with no trailing tags
pub fn synth_tta() -> Vec<u8> {
	let mut out = Vec::new();

	out.extend_from_slice(b"TTA1");
	out.extend_from_slice(&1_u16.to_le_bytes()); // Format
	out.extend_from_slice(&2_u16.to_le_bytes()); // Channels
	out.extend_from_slice(&16_u16.to_le_bytes()); // Bits per sample
	out.extend_from_slice(&44_100_u32.to_le_bytes()); // Sample rate
	out.extend_from_slice(&0_u32.to_le_bytes()); // Total samples
	out.extend_from_slice(&0_u32.to_le_bytes()); // Header CRC

	// Frame data
	out.extend_from_slice(&[0; 160]);

	out
}

/// Verify that the tag of type `tag_type` has an [`ItemKey::TrackArtist`] of `expected_value`
///
/// Also verifies that the tag has exactly `expected_item_count` items
pub fn verify_artist(
	file: &impl TaggedFileExt,
	tag_type: TagType,
	expected_value: &str,
	expected_item_count: u32,
) {
	println!(
		"VERIFY: Expecting `{tag_type:?}` to have {expected_item_count} items, with an artist of \
		 \"{expected_value}\""
	);

	assert!(file.tag(tag_type).is_some());

	let tag = file.tag(tag_type).unwrap();

	assert_eq!(tag.item_count(), expected_item_count);

	assert_eq!(
		tag.get(&ItemKey::TrackArtist),
		Some(&TagItem::new(
			ItemKey::TrackArtist,
			ItemValue::Text(String::from(expected_value))
		))
	);
}
