//! zlib stream decoder for WOFF table data
//!
//! Stored, fixed-Huffman and dynamic-Huffman blocks are supported. Output is
//! capped at the table's declared original length and the trailing Adler-32
//! must match.

/// Decompression failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InflateError {
    #[error("compressed stream truncated")]
    Truncated,

    #[error("invalid zlib header")]
    Header,

    #[error("invalid block type")]
    BlockType,

    #[error("stored block length mismatch")]
    StoredLength,

    #[error("invalid Huffman code")]
    Code,

    #[error("distance too far back")]
    Distance,

    #[error("output exceeds {0} bytes")]
    Overflow(usize),

    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("checksum mismatch")]
    Checksum,
}

type Result<T> = std::result::Result<T, InflateError>;

const MAX_BITS: usize = 15;

const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];
const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];
const DIST_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];
const DIST_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];
/// Order in which code-length code lengths are sent
const CODE_LENGTH_ORDER: [usize; 19] = [16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15];

/// LSB-first bit reader over a deflate stream
struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    buf: u32,
    count: u32,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            buf: 0,
            count: 0,
        }
    }

    fn bits(&mut self, need: u32) -> Result<u32> {
        let mut value = self.buf;
        while self.count < need {
            let byte = *self.data.get(self.pos).ok_or(InflateError::Truncated)?;
            self.pos += 1;
            value |= u32::from(byte) << self.count;
            self.count += 8;
        }
        self.buf = value >> need;
        self.count -= need;
        Ok(value & ((1u32 << need) - 1))
    }

    /// Drop the partial byte before a stored block or the trailer
    fn align_byte(&mut self) {
        self.buf = 0;
        self.count = 0;
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(InflateError::Truncated)?;
        let bytes = self.data.get(self.pos..end).ok_or(InflateError::Truncated)?;
        self.pos = end;
        Ok(bytes)
    }
}

/// Canonical Huffman decoding table
struct Huffman {
    counts: [u16; MAX_BITS + 1],
    symbols: Vec<u16>,
}

impl Huffman {
    fn new(lengths: &[u8]) -> Result<Self> {
        let mut counts = [0u16; MAX_BITS + 1];
        for &len in lengths {
            counts[usize::from(len)] += 1;
        }

        let mut left: i32 = 1;
        for &count in &counts[1..] {
            left <<= 1;
            left -= i32::from(count);
            if left < 0 {
                return Err(InflateError::Code);
            }
        }

        let mut offsets = [0u16; MAX_BITS + 1];
        for len in 1..MAX_BITS {
            offsets[len + 1] = offsets[len] + counts[len];
        }
        let mut symbols = vec![0u16; lengths.len()];
        for (symbol, &len) in lengths.iter().enumerate() {
            if len != 0 {
                let slot = &mut offsets[usize::from(len)];
                symbols[usize::from(*slot)] = symbol as u16;
                *slot += 1;
            }
        }
        Ok(Self { counts, symbols })
    }

    fn decode(&self, bits: &mut BitReader<'_>) -> Result<u16> {
        let mut code: i32 = 0;
        let mut first: i32 = 0;
        let mut index: i32 = 0;
        for &count in &self.counts[1..] {
            code |= bits.bits(1)? as i32;
            let count = i32::from(count);
            if code - count < first {
                return self
                    .symbols
                    .get((index + code - first) as usize)
                    .copied()
                    .ok_or(InflateError::Code);
            }
            index += count;
            first = (first + count) << 1;
            code <<= 1;
        }
        Err(InflateError::Code)
    }
}

fn fixed_tables() -> Result<(Huffman, Huffman)> {
    let mut lengths = [0u8; 288];
    lengths[..144].fill(8);
    lengths[144..256].fill(9);
    lengths[256..280].fill(7);
    lengths[280..].fill(8);
    Ok((Huffman::new(&lengths)?, Huffman::new(&[5u8; 30])?))
}

fn dynamic_tables(bits: &mut BitReader<'_>) -> Result<(Huffman, Huffman)> {
    let nlen = bits.bits(5)? as usize + 257;
    let ndist = bits.bits(5)? as usize + 1;
    let ncode = bits.bits(4)? as usize + 4;
    if nlen > 286 || ndist > 30 {
        return Err(InflateError::Code);
    }

    let mut code_lengths = [0u8; 19];
    for &slot in &CODE_LENGTH_ORDER[..ncode] {
        code_lengths[slot] = bits.bits(3)? as u8;
    }
    let code_table = Huffman::new(&code_lengths)?;

    let total = nlen + ndist;
    let mut lengths = vec![0u8; total];
    let mut index = 0;
    while index < total {
        let symbol = code_table.decode(bits)?;
        if symbol < 16 {
            lengths[index] = symbol as u8;
            index += 1;
            continue;
        }
        let (value, repeat) = match symbol {
            16 => {
                let previous = *lengths[..index].last().ok_or(InflateError::Code)?;
                (previous, 3 + bits.bits(2)? as usize)
            }
            17 => (0, 3 + bits.bits(3)? as usize),
            _ => (0, 11 + bits.bits(7)? as usize),
        };
        if index + repeat > total {
            return Err(InflateError::Code);
        }
        lengths[index..index + repeat].fill(value);
        index += repeat;
    }

    // A block without an end-of-block code cannot terminate.
    if lengths[256] == 0 {
        return Err(InflateError::Code);
    }
    Ok((Huffman::new(&lengths[..nlen])?, Huffman::new(&lengths[nlen..])?))
}

fn codes(
    bits: &mut BitReader<'_>,
    out: &mut Vec<u8>,
    limit: usize,
    literals: &Huffman,
    distances: &Huffman,
) -> Result<()> {
    loop {
        let symbol = usize::from(literals.decode(bits)?);
        if symbol < 256 {
            if out.len() >= limit {
                return Err(InflateError::Overflow(limit));
            }
            out.push(symbol as u8);
            continue;
        }
        if symbol == 256 {
            return Ok(());
        }

        let symbol = symbol - 257;
        if symbol >= LENGTH_BASE.len() {
            return Err(InflateError::Code);
        }
        let len = usize::from(LENGTH_BASE[symbol]) + bits.bits(u32::from(LENGTH_EXTRA[symbol]))? as usize;

        let symbol = usize::from(distances.decode(bits)?);
        if symbol >= DIST_BASE.len() {
            return Err(InflateError::Code);
        }
        let dist = usize::from(DIST_BASE[symbol]) + bits.bits(u32::from(DIST_EXTRA[symbol]))? as usize;
        if dist > out.len() {
            return Err(InflateError::Distance);
        }
        if out.len() + len > limit {
            return Err(InflateError::Overflow(limit));
        }
        for _ in 0..len {
            out.push(out[out.len() - dist]);
        }
    }
}

fn adler32(data: &[u8]) -> u32 {
    const MOD: u32 = 65521;
    let (mut a, mut b) = (1u32, 0u32);
    for chunk in data.chunks(5552) {
        for &byte in chunk {
            a += u32::from(byte);
            b += a;
        }
        a %= MOD;
        b %= MOD;
    }
    (b << 16) | a
}

/// Decompress a zlib stream that must expand to exactly `expected_len` bytes
pub fn zlib_decompress(data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let &[cmf, flg, ..] = data else {
        return Err(InflateError::Truncated);
    };
    let header_ok = cmf & 0x0F == 8
        && cmf >> 4 <= 7
        && ((u16::from(cmf) << 8) | u16::from(flg)) % 31 == 0
        && flg & 0x20 == 0;
    if !header_ok {
        return Err(InflateError::Header);
    }

    let mut bits = BitReader::new(&data[2..]);
    let mut out = Vec::new();
    loop {
        let last = bits.bits(1)? == 1;
        match bits.bits(2)? {
            0 => {
                bits.align_byte();
                let header = bits.read_bytes(4)?;
                let len = u16::from_le_bytes([header[0], header[1]]);
                let nlen = u16::from_le_bytes([header[2], header[3]]);
                if len != !nlen {
                    return Err(InflateError::StoredLength);
                }
                if out.len() + usize::from(len) > expected_len {
                    return Err(InflateError::Overflow(expected_len));
                }
                out.extend_from_slice(bits.read_bytes(usize::from(len))?);
            }
            1 => {
                let (literals, distances) = fixed_tables()?;
                codes(&mut bits, &mut out, expected_len, &literals, &distances)?;
            }
            2 => {
                let (literals, distances) = dynamic_tables(&mut bits)?;
                codes(&mut bits, &mut out, expected_len, &literals, &distances)?;
            }
            _ => return Err(InflateError::BlockType),
        }
        if last {
            break;
        }
    }

    if out.len() != expected_len {
        return Err(InflateError::Length {
            expected: expected_len,
            actual: out.len(),
        });
    }
    bits.align_byte();
    let trailer = bits.read_bytes(4)?;
    if u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]) != adler32(&out) {
        return Err(InflateError::Checksum);
    }
    Ok(out)
}
