use serde::Serialize;

use crate::error::Result;
use crate::game::{TranslatedStat, decode_attributes, resolve_string, translate_stats};
use crate::memory::ReadMemory;
use crate::memory::layout::{item, unit};
use crate::offset::OffsetTable;

/// Item under the mouse cursor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoveredItem {
    pub unit_address: u64,
    pub class_id: u32,
    pub name_id: u16,
    /// `None` when the name cannot be resolved on this build
    pub name: Option<String>,
    pub stats: Vec<TranslatedStat>,
}

impl HoveredItem {
    /// Display lines: name first, then `label: value` per stat
    pub fn lines(&self) -> Vec<String> {
        let name = self.name.clone().unwrap_or_else(|| format!("Item #{}", self.class_id));
        std::iter::once(name)
            .chain(self.stats.iter().map(|s| {
                if s.value.is_empty() {
                    s.display.clone()
                } else {
                    format!("{}: {}", s.display, s.value)
                }
            }))
            .collect()
    }
}

/// Read the hovered item, if the build exposes one and the cursor is on one
pub fn read_hovered_item<R: ReadMemory>(
    reader: &R,
    offsets: &OffsetTable,
) -> Result<Option<HoveredItem>> {
    let Some(hovered) = offsets.hovered_item else {
        return Ok(None);
    };
    let unit_address = reader.read_ptr(hovered)?;
    if unit_address == 0 {
        return Ok(None);
    }

    let class_id = reader.read_u32(unit_address + unit::CLASS_ID)?;
    let name_id = item_name_id(reader, offsets.item_descriptions, class_id)?;
    let name = match &offsets.strings {
        Some(tables) => resolve_string(reader, tables, u32::from(name_id))?,
        None => None,
    };
    let stats = translate_stats(&decode_attributes(reader, unit_address)?);

    Ok(Some(HoveredItem {
        unit_address,
        class_id,
        name_id,
        name,
        stats,
    }))
}

/// Name string id of an item class
///
/// The description table starts with its record stride followed by a
/// pointer to the records; the record slot holds a pointer to the row.
fn item_name_id<R: ReadMemory>(reader: &R, table: u64, class_id: u32) -> Result<u16> {
    let stride = u64::from(reader.read_u32(table + item::TABLE_STRIDE)?);
    let records = reader.read_ptr(table + item::TABLE_RECORDS)?;
    let record = reader.read_ptr(records + stride * u64::from(class_id))?;
    reader.read_u16(record + item::NAME_STRING_ID)
}
