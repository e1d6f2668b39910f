//! Items for OGG container formats
//!
//! Both Vorbis and Speex streams carry their metadata as [`VorbisComments`]
pub(crate) mod constants;
pub(crate) mod read;
pub(crate) mod speex;
pub(crate) mod tag;
pub(crate) mod vorbis;
pub(crate) mod write;

use crate::error::Result;
use crate::macros::decode_err;

// Exports

pub use speex::SpeexFile;
pub use tag::VorbisComments;
pub use vorbis::VorbisFile;

// Header packets start with a fixed signature byte sequence
fn verify_signature(content: &[u8], sig: &[u8]) -> Result<()> {
	if !content.starts_with(sig) {
		decode_err!(@BAIL Vorbis, "File missing magic signature");
	}

	Ok(())
}
