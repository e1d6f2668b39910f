//! Utilities for working with synchsafe integers
//!
//! ID3v2 stores its tag size with the most significant bit of each byte
//! zeroed, so that the size field can never contain a false sync.

/// An integer stored with 7 usable bits per byte
pub(crate) trait SynchsafeInteger: Sized {
	/// Decode a synchsafe integer
	fn unsynch(self) -> Self;
}

impl SynchsafeInteger for u32 {
	fn unsynch(self) -> Self {
		((self & 0x7F00_0000) >> 3)
			| ((self & 0x7F_0000) >> 2)
			| ((self & 0x7F00) >> 1)
			| (self & 0x7F)
	}
}

#[cfg(test)]
mod tests {
	use super::SynchsafeInteger;

	#[test_log::test]
	fn unsynch_u32() {
		assert_eq!(0x7F7F_7F7Fu32.unsynch(), 0xFFF_FFFF);
		assert_eq!(0u32.unsynch(), 0);
		assert_eq!(0x0100u32.unsynch(), 0x80);
	}
}
