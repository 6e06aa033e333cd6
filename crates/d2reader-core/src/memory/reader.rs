use encoding_rs::WINDOWS_1252;

use crate::error::{Error, Result};
use crate::memory::ProcessHandle;

/// Primitive read access to the foreign process
///
/// Only `read_bytes` and `base_address` must be provided; the typed reads
/// decode little-endian values out of `read_bytes`. The target is a 32-bit
/// process, so pointers are 4 bytes wide and widened to `u64`.
pub trait ReadMemory {
    /// Read exactly `size` bytes starting at `address`
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    /// Base address of the main executable image
    fn base_address(&self) -> u64;

    fn read_u8(&self, address: u64) -> Result<u8> {
        Ok(read_array::<_, 1>(self, address)?[0])
    }

    fn read_u16(&self, address: u64) -> Result<u16> {
        Ok(u16::from_le_bytes(read_array(self, address)?))
    }

    fn read_i16(&self, address: u64) -> Result<i16> {
        Ok(i16::from_le_bytes(read_array(self, address)?))
    }

    fn read_u32(&self, address: u64) -> Result<u32> {
        Ok(u32::from_le_bytes(read_array(self, address)?))
    }

    fn read_i32(&self, address: u64) -> Result<i32> {
        Ok(i32::from_le_bytes(read_array(self, address)?))
    }

    /// Read a 32-bit pointer
    fn read_ptr(&self, address: u64) -> Result<u64> {
        Ok(u64::from(self.read_u32(address)?))
    }

    /// Read a null-terminated single-byte string of at most `max_len` bytes
    ///
    /// Bytes are decoded as Windows-1252, the code page the game stores
    /// character names and item text in.
    fn read_string(&self, address: u64, max_len: usize) -> Result<String> {
        let bytes = self.read_bytes(address, max_len)?;
        let len = memchr::memchr(0, &bytes).unwrap_or(bytes.len());
        Ok(decode_windows_1252(&bytes[..len]))
    }
}

fn read_array<R: ReadMemory + ?Sized, const N: usize>(
    reader: &R,
    address: u64,
) -> Result<[u8; N]> {
    let bytes = reader.read_bytes(address, N)?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        Error::read_failed(address, format!("short read: {} of {} bytes", b.len(), N))
    })
}

/// Decode game text, dropping any embedded null bytes
pub fn decode_windows_1252(bytes: &[u8]) -> String {
    let (decoded, _, _) = WINDOWS_1252.decode(bytes);
    decoded.replace('\0', "")
}

/// `ReadMemory` over an attached process
pub struct MemoryReader<'a> {
    process: &'a ProcessHandle,
}

impl<'a> MemoryReader<'a> {
    pub fn new(process: &'a ProcessHandle) -> Self {
        Self { process }
    }

    pub fn process(&self) -> &ProcessHandle {
        self.process
    }
}

impl ReadMemory for MemoryReader<'_> {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; size];
        self.process.read_into(address, &mut buffer)?;
        Ok(buffer)
    }

    fn base_address(&self) -> u64 {
        self.process.base_address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemoryBuilder;

    #[test]
    fn test_typed_reads_are_little_endian() {
        let reader = MockMemoryBuilder::new()
            .write_bytes(0x1000, &[0x78, 0x56, 0x34, 0x12])
            .write_bytes(0x2000, &[0xFE, 0xFF])
            .build();

        assert_eq!(reader.read_u32(0x1000).unwrap(), 0x12345678);
        assert_eq!(reader.read_ptr(0x1000).unwrap(), 0x12345678);
        assert_eq!(reader.read_u16(0x1000).unwrap(), 0x5678);
        assert_eq!(reader.read_u8(0x1003).unwrap(), 0x12);
        assert_eq!(reader.read_i16(0x2000).unwrap(), -2);
        assert_eq!(reader.read_u16(0x2000).unwrap(), 0xFFFE);
    }

    #[test]
    fn test_signed_and_unsigned_words_differ() {
        let reader = MockMemoryBuilder::new().write_u32(0x10, 0xFFFF_FFFF).build();
        assert_eq!(reader.read_i32(0x10).unwrap(), -1);
        assert_eq!(reader.read_u32(0x10).unwrap(), u32::MAX);
    }

    #[test]
    fn test_read_string_stops_at_null() {
        let reader = MockMemoryBuilder::new()
            .write_bytes(0x3000, b"Sorceress\0garbage")
            .build();
        assert_eq!(reader.read_string(0x3000, 17).unwrap(), "Sorceress");
    }

    #[test]
    fn test_read_string_decodes_windows_1252() {
        let reader = MockMemoryBuilder::new()
            .write_bytes(0x3000, &[b'J', 0xE4, b'g', b'e', b'r', 0])
            .build();
        assert_eq!(reader.read_string(0x3000, 6).unwrap(), "Jäger");
    }

    #[test]
    fn test_read_unmapped_fails() {
        let reader = MockMemoryBuilder::new().write_u16(0x10, 1).build();
        let err = reader.read_u32(0x10).unwrap_err();
        assert!(err.is_memory_access());
    }
}
