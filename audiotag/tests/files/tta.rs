use crate::util;
use audiotag::ape::ApeTag;
use audiotag::config::{ParseOptions, WriteOptions};
use audiotag::file::{AudioFile, FileType, TaggedFileExt};
use audiotag::id3::v1::Id3v1Tag;
use audiotag::prelude::*;
use audiotag::probe::Probe;
use audiotag::tag::{ItemKey, ItemValue, TagItem, TagType};
use audiotag::tta::TrueAudioFile;

use std::io::{Cursor, Seek as _};

fn synth_with_tags(ape: bool, id3v1: bool) -> Vec<u8> {
	let mut data = util::synth_tta();

	if ape {
		let mut tag = ApeTag::default();
		tag.set_title(String::from("Foo title"));
		tag.set_artist(String::from("Foo artist"));

		tag.dump_to(&mut data, WriteOptions::default()).unwrap();
	}

	if id3v1 {
		let mut tag = Id3v1Tag::default();
		tag.set_title(String::from("Foo title"));
		tag.set_artist(String::from("Foo artist"));

		tag.dump_to(&mut data, WriteOptions::default()).unwrap();
	}

	data
}

#[test_log::test]
fn tta_read() {
	let data = synth_with_tags(true, true);

	let tta_file = TrueAudioFile::read_from(&mut Cursor::new(data), ParseOptions::new()).unwrap();

	let ape = tta_file.ape().unwrap();
	assert_eq!(ape.title().as_deref(), Some("Foo title"));
	assert_eq!(ape.artist().as_deref(), Some("Foo artist"));

	let id3v1 = tta_file.id3v1().unwrap();
	assert_eq!(id3v1.title().as_deref(), Some("Foo title"));
	assert_eq!(id3v1.artist().as_deref(), Some("Foo artist"));
}

#[test_log::test]
fn tta_write() {
	let mut file = util::temp_file(&synth_with_tags(true, false));

	let mut tagged_file = Probe::new(&mut file)
		.guess_file_type()
		.unwrap()
		.read()
		.unwrap();

	assert_eq!(tagged_file.file_type(), FileType::TrueAudio);
	util::verify_artist(&tagged_file, TagType::Ape, "Foo artist", 2);

	let tag = tagged_file.tag_mut(TagType::Ape).unwrap();
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

	util::verify_artist(&tagged_file, TagType::Ape, "Bar artist", 2);
}

#[test_log::test]
fn tta_remove_ape() {
	remove(TagType::Ape)
}

#[test_log::test]
fn tta_remove_id3v1() {
	remove(TagType::Id3v1)
}

fn remove(tag_type: TagType) {
	let mut file = util::temp_file(&synth_with_tags(true, true));

	let tagged_file = Probe::new(&mut file)
		.guess_file_type()
		.unwrap()
		.read()
		.unwrap();
	assert!(tagged_file.tag(tag_type).is_some());

	file.rewind().unwrap();
	tag_type.remove_from(&mut file).unwrap();

	file.rewind().unwrap();
	let tagged_file = Probe::new(&mut file)
		.guess_file_type()
		.unwrap()
		.read()
		.unwrap();
	assert!(tagged_file.tag(tag_type).is_none());
}

#[test_log::test]
fn tta_no_tags() {
	let mut file = util::temp_file(&util::synth_tta());

	let tta_file = TrueAudioFile::read_from(&mut file, ParseOptions::new()).unwrap();
	assert!(!tta_file.contains_tag());

	// The file is still writable
	let mut tag = ApeTag::default();
	tag.set_artist(String::from("Foo artist"));

	file.rewind().unwrap();
	tag.save_to(&mut file, WriteOptions::default()).unwrap();

	file.rewind().unwrap();
	let tta_file = TrueAudioFile::read_from(&mut file, ParseOptions::new()).unwrap();
	assert_eq!(
		tta_file.ape().unwrap().artist().as_deref(),
		Some("Foo artist")
	);
}

#[test_log::test]
fn tta_id3v1_only() {
	let data = synth_with_tags(false, true);

	let mut cursor = Cursor::new(data);
	let tagged_file = Probe::new(&mut cursor)
		.guess_file_type()
		.unwrap()
		.read()
		.unwrap();

	// The primary tag (APE) is absent
	assert!(tagged_file.primary_tag().is_none());

	let first_tag = tagged_file.first_tag().unwrap();
	assert_eq!(first_tag.tag_type(), TagType::Id3v1);
}

#[test_log::test]
fn tta_with_id3v2_prefix() {
	// An ID3v2.4 header with a 10 byte tag size, then the stream
	let mut data = vec![0x49, 0x44, 0x33, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0A];
	data.extend_from_slice(&[0; 10]);
	data.extend_from_slice(&synth_with_tags(true, false));

	let mut cursor = Cursor::new(data);
	let tagged_file = Probe::new(&mut cursor)
		.guess_file_type()
		.unwrap()
		.read()
		.unwrap();

	assert_eq!(tagged_file.file_type(), FileType::TrueAudio);
	util::verify_artist(&tagged_file, TagType::Ape, "Foo artist", 2);
}

#[test_log::test]
fn tta_id3v1_rewrite_preserves_leading_content() {
	let data = synth_with_tags(true, true);
	let mut file = Cursor::new(data.clone());

	let mut tag = Id3v1Tag::default();
	tag.set_title(String::from("New title"));

	tag.save_to(&mut file, WriteOptions::default()).unwrap();

	// Everything before the trailing 128 byte tag is untouched
	let image = file.get_ref();
	assert_eq!(image.len(), data.len());
	assert_eq!(&image[..image.len() - 128], &data[..data.len() - 128]);
	assert_eq!(&image[image.len() - 128..][..3], b"TAG");

	file.rewind().unwrap();
	let tta_file = TrueAudioFile::read_from(&mut file, ParseOptions::new()).unwrap();
	assert_eq!(
		tta_file.id3v1().unwrap().title().as_deref(),
		Some("New title")
	);
}

#[test_log::test]
fn tta_rewrite_same_tag_is_byte_identical() {
	let mut file = Cursor::new(synth_with_tags(true, true));

	let mut tag = ApeTag::default();
	tag.set_title(String::from("Foo title"));
	tag.set_artist(String::from("Bar artist"));

	tag.save_to(&mut file, WriteOptions::default()).unwrap();
	let first_image = file.get_ref().clone();

	file.rewind().unwrap();
	tag.save_to(&mut file, WriteOptions::default()).unwrap();

	assert_eq!(file.get_ref(), &first_image);
}

#[test_log::test]
fn tta_garbage_header_fails() {
	let data = vec![0xFF; 256];

	assert!(TrueAudioFile::read_from(&mut Cursor::new(data), ParseOptions::new()).is_err());
}
