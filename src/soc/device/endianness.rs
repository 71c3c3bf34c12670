/// Widest scalar the bus decodes in a single access.
pub const MAX_WORD_BYTES: usize = 8;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Assembles up to eight bytes into a zero-extended word.
    pub fn decode_bytes(self, bytes: &[u8]) -> u64 {
        debug_assert!(bytes.len() <= MAX_WORD_BYTES, "value exceeds 64 bits");
        let push = |word: u64, byte: &u8| (word << 8) | u64::from(*byte);
        match self {
            Endianness::Little => bytes.iter().rev().fold(0, push),
            Endianness::Big => bytes.iter().fold(0, push),
        }
    }

    /// Splits the low `byte_len` bytes of `value` in this byte order; the
    /// rest of the returned buffer is zero.
    pub fn encode_bytes(self, value: u64, byte_len: usize) -> [u8; MAX_WORD_BYTES] {
        debug_assert!(byte_len <= MAX_WORD_BYTES, "value exceeds 64 bits");
        let mut out = [0u8; MAX_WORD_BYTES];
        for (idx, slot) in out[..byte_len].iter_mut().enumerate() {
            let shift = match self {
                Endianness::Little => idx,
                Endianness::Big => byte_len - 1 - idx,
            };
            *slot = (value >> (shift * 8)) as u8;
        }
        out
    }
}

/// All-ones mask covering the low `width_bits` bits.
pub(crate) fn mask_bits(width_bits: u32) -> u64 {
    match width_bits {
        0 => 0,
        1..=63 => u64::MAX >> (64 - width_bits),
        _ => u64::MAX,
    }
}
