use crate::util;
use audiotag::config::{ParseOptions, ParsingMode, WriteOptions};
use audiotag::file::{AudioFile, FileType, TaggedFileExt};
use audiotag::ogg::VorbisFile;
use audiotag::prelude::*;
use audiotag::probe::Probe;
use audiotag::tag::{ItemKey, ItemValue, TagItem, TagType};

use std::io::{Cursor, Seek as _};

const VENDOR: &str = "Lavf58.76.100";

// The tests for OGG Vorbis/Speex are nearly identical
// We have the vendor string, a title, and an artist stored in the tag

fn synth(file_type: FileType) -> Vec<u8> {
	let comments = [("TITLE", "Foo title"), ("ARTIST", "Foo artist")];

	match file_type {
		FileType::Vorbis => util::synth_vorbis(VENDOR, &comments),
		FileType::Speex => util::synth_speex(VENDOR, &comments),
		_ => unreachable!(),
	}
}

#[test_log::test]
fn vorbis_read() {
	read(FileType::Vorbis)
}

#[test_log::test]
fn vorbis_write() {
	write(FileType::Vorbis)
}

#[test_log::test]
fn vorbis_remove() {
	remove(FileType::Vorbis)
}

#[test_log::test]
fn speex_read() {
	read(FileType::Speex)
}

#[test_log::test]
fn speex_write() {
	write(FileType::Speex)
}

#[test_log::test]
fn speex_remove() {
	remove(FileType::Speex)
}

fn read(file_type: FileType) {
	let mut file = util::temp_file(&synth(file_type));

	let tagged_file = Probe::new(&mut file)
		.guess_file_type()
		.unwrap()
		.read()
		.unwrap();

	assert_eq!(tagged_file.file_type(), file_type);

	// Expecting 2 items: title and artist
	util::verify_artist(&tagged_file, TagType::VorbisComments, "Foo artist", 2);
}

fn write(file_type: FileType) {
	let mut file = util::temp_file(&synth(file_type));

	let mut tagged_file = Probe::new(&mut file)
		.guess_file_type()
		.unwrap()
		.read()
		.unwrap();

	assert_eq!(tagged_file.file_type(), file_type);
	util::verify_artist(&tagged_file, TagType::VorbisComments, "Foo artist", 2);

	let tag = tagged_file.tag_mut(TagType::VorbisComments).unwrap();
	tag.insert_unchecked(TagItem::new(
		ItemKey::TrackArtist,
		ItemValue::Text(String::from("Bar artist")),
	));

	file.rewind().unwrap();
	tagged_file
		.save_to(&mut file, WriteOptions::default())
		.unwrap();

	// Now reread the file
	file.rewind().unwrap();
	let tagged_file = Probe::new(&mut file)
		.guess_file_type()
		.unwrap()
		.read()
		.unwrap();

	util::verify_artist(&tagged_file, TagType::VorbisComments, "Bar artist", 2);
}

fn remove(file_type: FileType) {
	let mut file = util::temp_file(&synth(file_type));

	let tagged_file = Probe::new(&mut file)
		.guess_file_type()
		.unwrap()
		.read()
		.unwrap();
	assert_eq!(
		tagged_file
			.tag(TagType::VorbisComments)
			.unwrap()
			.item_count(),
		2
	);

	file.rewind().unwrap();
	TagType::VorbisComments.remove_from(&mut file).unwrap();

	// We can't completely remove the tag since metadata packets are mandatory,
	// but it should be empty now
	file.rewind().unwrap();
	let tagged_file = Probe::new(&mut file)
		.guess_file_type()
		.unwrap()
		.read()
		.unwrap();
	assert_eq!(
		tagged_file
			.tag(TagType::VorbisComments)
			.unwrap()
			.item_count(),
		0
	);
}

#[test_log::test]
fn vorbis_write_retains_vendor() {
	let mut file = util::temp_file(&synth(FileType::Vorbis));

	let mut tag = audiotag::tag::Tag::new(TagType::VorbisComments);
	tag.insert_text(ItemKey::TrackTitle, String::from("New title"));

	tag.save_to(&mut file, WriteOptions::default()).unwrap();

	file.rewind().unwrap();
	let vorbis_file = VorbisFile::read_from(&mut file, ParseOptions::new()).unwrap();

	assert_eq!(vorbis_file.vorbis_comments().vendor(), VENDOR);
	assert_eq!(
		vorbis_file.vorbis_comments().get("TITLE"),
		Some("New title")
	);
	// The old items are gone
	assert_eq!(vorbis_file.vorbis_comments().get("ARTIST"), None);
}

#[test_log::test]
fn vorbis_rewrite_same_tag_is_byte_identical() {
	let mut file = Cursor::new(synth(FileType::Vorbis));

	let mut tag = audiotag::tag::Tag::new(TagType::VorbisComments);
	tag.insert_text(ItemKey::TrackTitle, String::from("Foo title"));
	tag.insert_text(ItemKey::TrackArtist, String::from("Bar artist"));

	tag.save_to(&mut file, WriteOptions::default()).unwrap();
	let first_image = file.get_ref().clone();

	file.rewind().unwrap();
	tag.save_to(&mut file, WriteOptions::default()).unwrap();

	assert_eq!(file.get_ref(), &first_image);
}

#[test_log::test]
fn vorbis_large_comment_spans_pages() {
	let mut file = util::temp_file(&synth(FileType::Vorbis));

	// A value this size forces the comment packet across multiple pages
	let big_value = "x".repeat(70_000);

	let mut tag = audiotag::tag::Tag::new(TagType::VorbisComments);
	tag.insert_text(ItemKey::Comment, big_value.clone());

	tag.save_to(&mut file, WriteOptions::default()).unwrap();

	// Every page must have a valid checksum, which strict parsing verifies
	file.rewind().unwrap();
	let vorbis_file = VorbisFile::read_from(
		&mut file,
		ParseOptions::new().parsing_mode(ParsingMode::Strict),
	)
	.unwrap();

	assert_eq!(
		vorbis_file.vorbis_comments().get("COMMENT"),
		Some(&*big_value)
	);
}

#[test_log::test]
fn vorbis_oversized_length_prefix() {
	let mut ident = vec![0x01];
	ident.extend_from_slice(b"vorbis");
	ident.resize(30, 0);

	// A vendor length far past the end of the packet
	let mut comment = vec![0x03];
	comment.extend_from_slice(b"vorbis");
	comment.extend_from_slice(&u32::MAX.to_le_bytes());

	let mut setup = vec![0x05];
	setup.extend_from_slice(b"vorbis");
	setup.resize(64, 0);

	let data = util::write_ogg(&[&ident, &comment, &setup]);

	assert!(VorbisFile::read_from(&mut Cursor::new(data), ParseOptions::new()).is_err());
}

#[test_log::test]
fn vorbis_truncated_stream() {
	// Only the identification header is present, when three packets are mandatory
	let mut ident = vec![0x01];
	ident.extend_from_slice(b"vorbis");
	ident.resize(30, 0);

	let data = util::write_ogg(&[&ident]);

	// Strict mode refuses the stream outright
	assert!(
		VorbisFile::read_from(
			&mut Cursor::new(&data),
			ParseOptions::new().parsing_mode(ParsingMode::Strict),
		)
		.is_err()
	);

	// The default mode settles for an empty tag
	let vorbis_file = VorbisFile::read_from(&mut Cursor::new(&data), ParseOptions::new()).unwrap();
	assert_eq!(vorbis_file.vorbis_comments().items().len(), 0);
}

#[test_log::test]
fn vorbis_truncated_mid_page() {
	let mut ident = vec![0x01];
	ident.extend_from_slice(b"vorbis");
	ident.resize(30, 0);

	let mut comment = vec![0x03];
	comment.extend_from_slice(b"vorbis");
	comment.extend_from_slice(&util::comment_packet_body(VENDOR, &[("TITLE", "Foo title")]));
	comment.push(1);

	let mut setup = vec![0x05];
	setup.extend_from_slice(b"vorbis");
	setup.resize(64, 0);

	// The identification header gets a complete page, then the stream is cut
	// in the middle of the page holding the comment packet
	let mut data = util::write_ogg(&[&ident]);
	let mut rest = util::write_ogg(&[&comment, &setup]);
	rest.truncate(rest.len() / 2);
	data.extend_from_slice(&rest);

	assert!(
		VorbisFile::read_from(
			&mut Cursor::new(&data),
			ParseOptions::new().parsing_mode(ParsingMode::Strict),
		)
		.is_err()
	);

	// The default mode salvages what it can, here an empty tag
	let vorbis_file = VorbisFile::read_from(&mut Cursor::new(&data), ParseOptions::new()).unwrap();
	assert_eq!(vorbis_file.vorbis_comments().items().len(), 0);
}

#[test_log::test]
fn vorbis_corrupt_page_checksum_strict() {
	let mut data = synth(FileType::Vorbis);

	// Flip a byte in the first page's checksum field
	data[22] ^= 0xFF;

	assert!(
		VorbisFile::read_from(
			&mut Cursor::new(&data),
			ParseOptions::new().parsing_mode(ParsingMode::Strict),
		)
		.is_err()
	);

	// The default mode doesn't verify checksums
	assert!(VorbisFile::read_from(&mut Cursor::new(&data), ParseOptions::new()).is_ok());
}

#[test_log::test]
fn ogg_read_tags_disabled() {
	let mut file = util::temp_file(&synth(FileType::Vorbis));

	let vorbis_file =
		VorbisFile::read_from(&mut file, ParseOptions::new().read_tags(false)).unwrap();

	assert_eq!(vorbis_file.vorbis_comments().items().len(), 0);
}
