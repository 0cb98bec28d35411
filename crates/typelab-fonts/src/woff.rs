//! WOFF / WOFF2 containers
//!
//! WOFF1 is unpacked back into an sfnt so it can be parsed and indexed like
//! any TrueType/OpenType upload. WOFF2 tables are Brotli-compressed and
//! transformed; only the header and table directory are checked.

use crate::inflate::zlib_decompress;
use crate::{FontError, Result};

/// WOFF signature ('wOFF')
pub const WOFF_SIGNATURE: u32 = 0x774F_4646;
/// WOFF2 signature ('wOF2')
pub const WOFF2_SIGNATURE: u32 = 0x774F_4632;

const WOFF_HEADER_LEN: usize = 44;
const WOFF_ENTRY_LEN: usize = 20;
const WOFF2_HEADER_LEN: usize = 48;

const SFNT_TRUETYPE: u32 = 0x0001_0000;
const SFNT_OPENTYPE: u32 = 0x4F54_544F; // 'OTTO'
const SFNT_APPLE: u32 = 0x7472_7565; // 'true'
const SFNT_COLLECTION: u32 = 0x7474_6366; // 'ttcf'

fn parsing(message: impl Into<String>) -> FontError {
    FontError::FontParsing(message.into())
}

/// Big-endian cursor over a font file
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    fn bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.pos + N;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or_else(|| parsing("unexpected end of font data"))?;
        self.pos = end;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.bytes::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.bytes()?))
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.bytes()?))
    }

    /// WOFF2 variable-length integer
    fn base128(&mut self) -> Result<u32> {
        let mut value: u32 = 0;
        for i in 0..5 {
            let byte = self.u8()?;
            if i == 0 && byte == 0x80 {
                return Err(parsing("UIntBase128 with leading zero"));
            }
            if value & 0xFE00_0000 != 0 {
                return Err(parsing("UIntBase128 overflow"));
            }
            value = (value << 7) | u32::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(parsing("UIntBase128 longer than 5 bytes"))
    }
}

/// Shared header checks: signature-specific length, declared file length,
/// table count and reserved field.
fn check_header(data: &[u8], header_len: usize, kind: &str) -> Result<(u32, u16)> {
    if data.len() < header_len {
        return Err(parsing(format!("{kind} header truncated")));
    }
    let mut reader = Reader::at(data, 4);
    let flavor = reader.u32()?;
    let declared = reader.u32()? as usize;
    let num_tables = reader.u16()?;
    let reserved = reader.u16()?;

    if declared != data.len() {
        return Err(parsing(format!(
            "{kind} length mismatch: header says {declared}, file has {}",
            data.len()
        )));
    }
    if num_tables == 0 {
        return Err(parsing(format!("{kind} has no tables")));
    }
    if reserved != 0 {
        return Err(parsing(format!("{kind} reserved field is not zero")));
    }
    Ok((flavor, num_tables))
}

#[derive(Debug)]
struct WoffTable {
    tag: [u8; 4],
    offset: usize,
    comp_length: usize,
    orig_length: usize,
    orig_checksum: u32,
}

fn pad4(len: usize) -> usize {
    (len + 3) & !3
}

/// Unpack a WOFF1 file into the sfnt it wraps.
///
/// Every table entry must lie inside the file after the directory, and a
/// table is either stored as-is or zlib-compressed to exactly its original
/// length.
pub fn decode_woff(data: &[u8]) -> Result<Vec<u8>> {
    let (flavor, num_tables) = check_header(data, WOFF_HEADER_LEN, "WOFF")?;
    if !matches!(flavor, SFNT_TRUETYPE | SFNT_OPENTYPE | SFNT_APPLE) {
        return Err(parsing(format!("WOFF flavor {flavor:#010x} is not an sfnt")));
    }

    let count = usize::from(num_tables);
    let directory_end = WOFF_HEADER_LEN + count * WOFF_ENTRY_LEN;
    if directory_end > data.len() {
        return Err(parsing("WOFF table directory truncated"));
    }

    let mut reader = Reader::at(data, WOFF_HEADER_LEN);
    let mut tables = Vec::with_capacity(count);
    for _ in 0..count {
        let table = WoffTable {
            tag: reader.bytes()?,
            offset: reader.u32()? as usize,
            comp_length: reader.u32()? as usize,
            orig_length: reader.u32()? as usize,
            orig_checksum: reader.u32()?,
        };
        let end = table.offset.checked_add(table.comp_length);
        if table.offset < directory_end || end.is_none_or(|end| end > data.len()) {
            return Err(parsing(format!(
                "WOFF table {} lies outside the file",
                String::from_utf8_lossy(&table.tag)
            )));
        }
        if table.comp_length > table.orig_length {
            return Err(parsing(format!(
                "WOFF table {} is larger compressed than original",
                String::from_utf8_lossy(&table.tag)
            )));
        }
        tables.push(table);
    }
    // sfnt readers binary-search the directory by tag.
    tables.sort_by_key(|t| t.tag);

    let mut sfnt = Vec::new();
    let entry_selector = u16::BITS - 1 - num_tables.leading_zeros();
    let search_range = (1u32 << entry_selector) * 16;
    let range_shift = u32::from(num_tables) * 16 - search_range;
    sfnt.extend_from_slice(&flavor.to_be_bytes());
    sfnt.extend_from_slice(&num_tables.to_be_bytes());
    sfnt.extend_from_slice(&(search_range as u16).to_be_bytes());
    sfnt.extend_from_slice(&(entry_selector as u16).to_be_bytes());
    sfnt.extend_from_slice(&(range_shift as u16).to_be_bytes());

    let mut offset = 12 + count * 16;
    for table in &tables {
        let table_offset = u32::try_from(offset).map_err(|_| parsing("WOFF too large"))?;
        sfnt.extend_from_slice(&table.tag);
        sfnt.extend_from_slice(&table.orig_checksum.to_be_bytes());
        sfnt.extend_from_slice(&table_offset.to_be_bytes());
        sfnt.extend_from_slice(&(table.orig_length as u32).to_be_bytes());
        offset += pad4(table.orig_length);
    }

    for table in &tables {
        let stored = &data[table.offset..table.offset + table.comp_length];
        if table.comp_length == table.orig_length {
            sfnt.extend_from_slice(stored);
        } else {
            let inflated = zlib_decompress(stored, table.orig_length).map_err(|e| {
                parsing(format!(
                    "WOFF table {}: {e}",
                    String::from_utf8_lossy(&table.tag)
                ))
            })?;
            sfnt.extend_from_slice(&inflated);
        }
        sfnt.resize(pad4(sfnt.len()), 0);
    }

    Ok(sfnt)
}

/// Check a WOFF2 header and table directory.
///
/// The directory must parse, and the compressed stream it describes must fit
/// inside the file.
pub fn check_woff2(data: &[u8]) -> Result<()> {
    let (flavor, num_tables) = check_header(data, WOFF2_HEADER_LEN, "WOFF2")?;
    if !matches!(flavor, SFNT_TRUETYPE | SFNT_OPENTYPE | SFNT_APPLE | SFNT_COLLECTION) {
        return Err(parsing(format!("WOFF2 flavor {flavor:#010x} is not an sfnt")));
    }

    let mut reader = Reader::at(data, 20);
    let total_compressed = reader.u32()? as usize;
    if total_compressed == 0 {
        return Err(parsing("WOFF2 has no compressed data"));
    }

    let mut reader = Reader::at(data, WOFF2_HEADER_LEN);
    for _ in 0..num_tables {
        let flags = reader.u8()?;
        let glyph_table = match flags & 0x3F {
            0x3F => matches!(&reader.bytes::<4>()?, b"glyf" | b"loca"),
            10 | 11 => true,
            _ => false,
        };
        reader.base128()?;
        let version = flags >> 6;
        let transformed = if glyph_table { version == 0 } else { version != 0 };
        if transformed {
            reader.base128()?;
        }
    }

    let stream_end = reader.pos.checked_add(total_compressed);
    if stream_end.is_none_or(|end| end > data.len()) {
        return Err(parsing("WOFF2 compressed stream lies outside the file"));
    }
    Ok(())
}
