//! Synthetic process memory for tests
//!
//! Memory is sparse: only bytes written through the builder (or the
//! reader's own `write_*` methods) are mapped, and reading any unmapped
//! byte fails the whole read like `ReadProcessMemory` does on a partial
//! copy. Every read is logged so tests can assert on access patterns.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::memory::ReadMemory;

#[derive(Debug, Default)]
pub struct MockMemoryReader {
    bytes: BTreeMap<u64, u8>,
    base_address: u64,
    reads: RefCell<Vec<(u64, usize)>>,
}

impl MockMemoryReader {
    pub fn write_bytes(&mut self, address: u64, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            self.bytes.insert(address + i as u64, *byte);
        }
    }

    pub fn write_u16(&mut self, address: u64, value: u16) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    pub fn write_u32(&mut self, address: u64, value: u32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    /// Unmap `len` bytes starting at `address`
    pub fn unmap(&mut self, address: u64, len: usize) {
        for i in 0..len as u64 {
            self.bytes.remove(&(address + i));
        }
    }

    /// Every `(address, size)` passed to `read_bytes` so far
    pub fn reads(&self) -> Vec<(u64, usize)> {
        self.reads.borrow().clone()
    }
}

impl ReadMemory for MockMemoryReader {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        self.reads.borrow_mut().push((address, size));

        (0..size as u64)
            .map(|i| {
                let at = address + i;
                self.bytes
                    .get(&at)
                    .copied()
                    .ok_or_else(|| Error::read_failed(at, "unmapped"))
            })
            .collect()
    }

    fn base_address(&self) -> u64 {
        self.base_address
    }
}

#[derive(Debug, Default)]
pub struct MockMemoryBuilder {
    reader: MockMemoryReader,
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_address(mut self, base: u64) -> Self {
        self.reader.base_address = base;
        self
    }

    pub fn write_bytes(mut self, address: u64, data: &[u8]) -> Self {
        self.reader.write_bytes(address, data);
        self
    }

    pub fn write_u16(mut self, address: u64, value: u16) -> Self {
        self.reader.write_u16(address, value);
        self
    }

    pub fn write_i16(self, address: u64, value: i16) -> Self {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_u32(mut self, address: u64, value: u32) -> Self {
        self.reader.write_u32(address, value);
        self
    }

    /// Map `len` zero bytes at `address`
    pub fn zeroed(self, address: u64, len: usize) -> Self {
        self.write_bytes(address, &vec![0u8; len])
    }

    pub fn build(self) -> MockMemoryReader {
        self.reader
    }
}
