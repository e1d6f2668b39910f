// The OGG CRC uses the direct (non-reflected) algorithm with the
// generator polynomial 0x04C11DB7, an initial value of 0, and no
// final XOR. <https://xiph.org/ogg/doc/framing.html>

const CRC_TABLE: [u32; 256] = make_table();

const fn make_table() -> [u32; 256] {
	let mut table = [0_u32; 256];

	let mut i = 0;
	while i < 256 {
		let mut r = (i as u32) << 24;

		let mut j = 0;
		while j < 8 {
			if r & 0x8000_0000 != 0 {
				r = (r << 1) ^ 0x04C1_1DB7;
			} else {
				r <<= 1;
			}

			j += 1;
		}

		table[i] = r;
		i += 1;
	}

	table
}

/// Compute the OGG CRC32 of the given bytes
///
/// When checksumming an entire page, the four checksum bytes of the
/// header must be zeroed first.
pub fn crc32(data: &[u8]) -> u32 {
	let mut crc = 0_u32;

	for byte in data {
		crc = (crc << 8) ^ CRC_TABLE[(((crc >> 24) as u8) ^ *byte) as usize];
	}

	crc
}
