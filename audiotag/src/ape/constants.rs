pub(crate) const APE_PREAMBLE: &[u8; 8] = b"APETAGEX";

// https://wiki.hydrogenaud.io/index.php?title=APE_key
pub(crate) const INVALID_KEYS: [&str; 4] = ["ID3", "TAG", "OGGS", "MP+"];
