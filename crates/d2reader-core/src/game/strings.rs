//! Localized string lookup.
//!
//! String ids are split into three tiers, each with its own pair of tables
//! in the language module:
//!
//! ```text
//! id range          tier        subtracted
//! ───────────────────────────────────────────
//! [0, 10000)        base        0
//! [10000, 20000)    patch       10000
//! [20000, ..)       expansion   20000
//! ```
//!
//! Every indirection is bounds-checked against the indexer table so that a
//! half-initialized or stale table produces `None` rather than garbage.

use tracing::debug;

use crate::error::Result;
use crate::memory::layout::strings;
use crate::memory::{ReadMemory, decode_windows_1252};
use crate::offset::{StringTables, TierTables};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringTier {
    Base,
    Patch,
    Expansion,
}

impl StringTier {
    /// Tier owning `id`, highest threshold first
    pub fn for_id(id: u32) -> Self {
        if id >= strings::EXPANSION_ID_OFFSET {
            Self::Expansion
        } else if id >= strings::PATCH_ID_OFFSET {
            Self::Patch
        } else {
            Self::Base
        }
    }

    pub fn id_offset(&self) -> u32 {
        match self {
            Self::Base => 0,
            Self::Patch => strings::PATCH_ID_OFFSET,
            Self::Expansion => strings::EXPANSION_ID_OFFSET,
        }
    }

    pub fn tables<'a>(&self, tables: &'a StringTables) -> &'a TierTables {
        match self {
            Self::Base => &tables.base,
            Self::Patch => &tables.patch,
            Self::Expansion => &tables.expansion,
        }
    }

    /// Split a global id into its tier and the id local to that tier
    pub fn split(id: u32) -> (Self, u32) {
        let tier = Self::for_id(id);
        (tier, id - tier.id_offset())
    }
}

/// Resolve a string id to its text
///
/// Returns `Ok(None)` when the tables say the string does not exist; read
/// failures on the way are propagated.
pub fn resolve_string<R: ReadMemory>(
    reader: &R,
    tables: &StringTables,
    id: u32,
) -> Result<Option<String>> {
    let (tier, local_id) = StringTier::split(id);
    let entry = tier.tables(tables);

    let indexer = reader.read_ptr(entry.indexer)?;
    let address_table = reader.read_ptr(entry.address)?;

    let identifier_count = reader.read_u16(indexer + strings::IDENTIFIER_COUNT)?;
    let lookup_id = if local_id >= u32::from(identifier_count) {
        strings::MISSING_STRING_ID
    } else {
        local_id as u16
    };

    let id_index = |i: u16| {
        indexer + strings::ID_INDEX_REGION + u64::from(i) * strings::ID_INDEX_STRIDE
    };

    let address_index = reader.read_u16(id_index(lookup_id))?;
    let address_count = reader.read_u32(indexer + strings::ADDRESS_COUNT)?;
    if u32::from(address_index) >= address_count {
        debug!("String {}: address index {} >= {}", id, address_index, address_count);
        return Ok(None);
    }

    // String info records follow the id index region
    let info = id_index(identifier_count) + u64::from(address_index) * strings::STRING_INFO_STRIDE;
    let end = indexer + u64::from(reader.read_u16(indexer + strings::DATA_LENGTH)?);
    if info >= end {
        debug!("String {}: info record {:#x} past end {:#x}", id, info, end);
        return Ok(None);
    }

    if reader.read_u16(info)? == 0 {
        return Ok(None);
    }

    let text = reader.read_ptr(address_table + u64::from(address_index) * strings::ADDRESS_STRIDE)?;
    if text == 0 {
        return Ok(None);
    }

    extract_string(reader, text, strings::INITIAL_BUFFER_SIZE, strings::MAX_BUFFER_SIZE).map(Some)
}

/// Read a null-terminated string of unknown length
///
/// Starts with `initial_size` bytes and doubles until a terminator shows up
/// or `max_size` is reached. If a larger read fails after a smaller one
/// succeeded (the string sits near the end of a mapping), the smaller read
/// is returned. Embedded nulls are stripped from the result.
pub fn extract_string<R: ReadMemory>(
    reader: &R,
    address: u64,
    initial_size: usize,
    max_size: usize,
) -> Result<String> {
    let mut size = initial_size.clamp(1, max_size.max(1));
    let mut best = reader.read_bytes(address, size)?;

    loop {
        if let Some(end) = memchr::memchr(0, &best) {
            return Ok(decode_windows_1252(&best[..end]));
        }
        if size >= max_size {
            break;
        }
        size = (size * 2).min(max_size);
        match reader.read_bytes(address, size) {
            Ok(bytes) => best = bytes,
            Err(e) => {
                debug!("String at {:#x}: stopped growing at {} bytes: {}", address, best.len(), e);
                break;
            }
        }
    }

    Ok(decode_windows_1252(&best))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MockMemoryBuilder, MockMemoryReader};

    const INDEXER: u64 = 0x10_000;
    const ADDRESSES: u64 = 0x20_000;

    fn tier(indexer_slot: u64, address_slot: u64) -> TierTables {
        TierTables {
            indexer: indexer_slot,
            address: address_slot,
        }
    }

    /// Every tier points at the same pair of tables
    fn tables() -> StringTables {
        StringTables {
            base: tier(0x100, 0x104),
            patch: tier(0x100, 0x104),
            expansion: tier(0x100, 0x104),
        }
    }

    /// Indexer with `id_count` ids, each mapped to its own address index,
    /// and `texts` stored at 0x30_000 + 0x100 * index
    fn string_memory(id_count: u16, texts: &[&str]) -> MockMemoryReader {
        let info_block = INDEXER + strings::ID_INDEX_REGION + u64::from(id_count) * 2;
        let data_len = (info_block - INDEXER) + texts.len() as u64 * strings::STRING_INFO_STRIDE;

        let mut builder = MockMemoryBuilder::new()
            .write_u32(0x100, INDEXER as u32)
            .write_u32(0x104, ADDRESSES as u32)
            .write_u16(INDEXER + strings::IDENTIFIER_COUNT, id_count)
            .write_u32(INDEXER + strings::ADDRESS_COUNT, texts.len() as u32)
            .write_u16(INDEXER + strings::DATA_LENGTH, data_len as u16);

        for id in 0..id_count {
            let index = id % texts.len() as u16;
            let slot = INDEXER + strings::ID_INDEX_REGION + u64::from(id) * 2;
            builder = builder.write_u16(slot, index);
        }
        for (i, text) in texts.iter().enumerate() {
            let i = i as u64;
            let text_address = 0x30_000 + 0x100 * i;
            let mut raw = text.as_bytes().to_vec();
            raw.resize(0x4000, 0);
            builder = builder
                .write_u16(info_block + i * strings::STRING_INFO_STRIDE, 1)
                .write_u32(ADDRESSES + i * 4, text_address as u32)
                .write_bytes(text_address, &raw);
        }
        builder.build()
    }

    #[test]
    fn test_tier_selection() {
        assert_eq!(StringTier::split(25000), (StringTier::Expansion, 5000));
        assert_eq!(StringTier::split(20000), (StringTier::Expansion, 0));
        assert_eq!(StringTier::split(19999), (StringTier::Patch, 9999));
        assert_eq!(StringTier::split(10000), (StringTier::Patch, 0));
        assert_eq!(StringTier::split(9999), (StringTier::Base, 9999));
        assert_eq!(StringTier::split(0), (StringTier::Base, 0));
    }

    #[test]
    fn test_tier_tables_are_selected_per_tier() {
        let tables = StringTables {
            base: tier(1, 2),
            patch: tier(3, 4),
            expansion: tier(5, 6),
        };
        assert_eq!(StringTier::Patch.tables(&tables).indexer, 3);
        assert_eq!(StringTier::Expansion.tables(&tables).address, 6);
    }

    #[test]
    fn test_resolve_string() {
        let reader = string_memory(4, &["Shako", "Harlequin Crest"]);

        assert_eq!(resolve_string(&reader, &tables(), 0).unwrap().as_deref(), Some("Shako"));
        assert_eq!(
            resolve_string(&reader, &tables(), 1).unwrap().as_deref(),
            Some("Harlequin Crest")
        );
        // Tier offset is subtracted before the lookup
        assert_eq!(
            resolve_string(&reader, &tables(), 20_001).unwrap().as_deref(),
            Some("Harlequin Crest")
        );
    }

    #[test]
    fn test_id_past_table_uses_fallback_slot() {
        // 0x1F4 is inside the id index region only when the table is that large
        let mut reader = string_memory(0x200, &["a", "Missing"]);
        reader.write_u16(
            INDEXER + strings::ID_INDEX_REGION + u64::from(strings::MISSING_STRING_ID) * 2,
            1,
        );

        let text = resolve_string(&reader, &tables(), 0x300).unwrap();
        assert_eq!(text.as_deref(), Some("Missing"));
    }

    #[test]
    fn test_address_index_out_of_range() {
        let mut reader = string_memory(4, &["a", "b"]);
        reader.write_u16(INDEXER + strings::ID_INDEX_REGION, 2);
        assert_eq!(resolve_string(&reader, &tables(), 0).unwrap(), None);
    }

    #[test]
    fn test_info_record_past_end() {
        let mut reader = string_memory(4, &["a", "b"]);
        let info_block = INDEXER + strings::ID_INDEX_REGION + 8;
        // Only the first record fits
        reader.write_u16(
            INDEXER + strings::DATA_LENGTH,
            (info_block - INDEXER + strings::STRING_INFO_STRIDE) as u16,
        );

        assert!(resolve_string(&reader, &tables(), 0).unwrap().is_some());
        assert_eq!(resolve_string(&reader, &tables(), 1).unwrap(), None);
    }

    #[test]
    fn test_absent_flag_and_null_pointer() {
        let mut reader = string_memory(4, &["a", "b"]);
        let info_block = INDEXER + strings::ID_INDEX_REGION + 8;
        reader.write_u16(info_block, 0);
        reader.write_u32(ADDRESSES + 4, 0);

        assert_eq!(resolve_string(&reader, &tables(), 0).unwrap(), None);
        assert_eq!(resolve_string(&reader, &tables(), 1).unwrap(), None);
    }

    #[test]
    fn test_unreadable_table_is_an_error() {
        let reader = MockMemoryBuilder::new()
            .write_u32(0x100, 0xDEAD_0000)
            .zeroed(0x104, 4)
            .build();
        let err = resolve_string(&reader, &tables(), 7).unwrap_err();
        assert!(err.is_memory_access());
    }

    #[test]
    fn test_extract_short_string_single_read() {
        let reader = string_memory(1, &["Stone of Jordan"]);
        let text = extract_string(&reader, 0x30_000, 0x100, 0x4000).unwrap();

        assert_eq!(text, "Stone of Jordan");
        assert_eq!(reader.reads().last(), Some(&(0x30_000, 0x100)));
    }

    #[test]
    fn test_extract_grows_buffer() {
        let mut raw = vec![b'x'; 0x300];
        raw.resize(0x4000, 0);
        let reader = MockMemoryBuilder::new().write_bytes(0x5000, &raw).build();

        let text = extract_string(&reader, 0x5000, 0x100, 0x4000).unwrap();
        assert_eq!(text.len(), 0x300);
        let sizes: Vec<usize> = reader.reads().iter().map(|(_, size)| *size).collect();
        assert_eq!(sizes, [0x100, 0x200, 0x400]);
    }

    #[test]
    fn test_extract_is_bounded_by_max_size() {
        let reader = MockMemoryBuilder::new().write_bytes(0x5000, &[b'A'; 0x8000]).build();

        let text = extract_string(&reader, 0x5000, 0x100, 0x4000).unwrap();
        assert_eq!(text.len(), 0x4000);

        let reads = reader.reads();
        // One initial read plus six doublings
        assert_eq!(reads.len(), 7);
        assert!(reads.iter().all(|(_, size)| *size <= 0x4000));
    }

    #[test]
    fn test_extract_keeps_partial_read_at_mapping_end() {
        let reader = MockMemoryBuilder::new().write_bytes(0x5000, &[b'B'; 0x180]).build();
        let text = extract_string(&reader, 0x5000, 0x100, 0x4000).unwrap();
        assert_eq!(text.len(), 0x100);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let reader = string_memory(1, &["Tal Rasha's Guardianship"]);
        let first = extract_string(&reader, 0x30_000, 0x100, 0x4000).unwrap();
        let second = extract_string(&reader, 0x30_000, 0x100, 0x4000).unwrap();
        assert_eq!(first, second);
    }
}
