use std::sync::Arc;

use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::{read_le, read_le_at},
    metadata::tables::{CodedIndexType, Column, TableId},
    Error::OutOfBounds,
    Result,
};

/// Heap-size flag: `#Strings` indexes are 4 bytes wide
pub const HEAP_LARGE_STRINGS: u8 = 0x01;
/// Heap-size flag: `#GUID` indexes are 4 bytes wide
pub const HEAP_LARGE_GUID: u8 = 0x02;
/// Heap-size flag: `#Blob` indexes are 4 bytes wide
pub const HEAP_LARGE_BLOB: u8 = 0x04;
/// Heap-size flag: four extra bytes follow the row counts
pub const HEAP_EXTRA_DATA: u8 = 0x40;

/// Row count of one table and the index width it implies.
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct TableRowInfo {
    /// Number of rows
    pub rows: u32,
    /// Bits needed to address every row
    pub bits: u8,
    /// Simple indexes into this table are 4 bytes wide
    pub is_large: bool,
}

impl TableRowInfo {
    /// Creates the info for a table with `rows` rows.
    #[must_use]
    pub fn new(rows: u32) -> Self {
        let bits = if rows == 0 {
            1
        } else {
            (32 - rows.leading_zeros()) as u8
        };

        Self {
            rows,
            bits,
            is_large: rows > u32::from(u16::MAX),
        }
    }
}

/// Row counts of all tables and the index widths derived from them.
///
/// Every table column that references a heap or another table is 2 or 4 bytes wide depending
/// on these values, so row sizes are only known once the whole header has been read.
#[derive(Clone, Default, Debug)]
pub struct TableInfo {
    rows: Vec<TableRowInfo>,
    coded_indexes: Vec<u8>,
    is_large_index_str: bool,
    is_large_index_guid: bool,
    is_large_index_blob: bool,
}

/// Shared handle to a [`TableInfo`]
pub type TableInfoRef = Arc<TableInfo>;

impl TableInfo {
    /// Reads the row counts that follow the `#~` header for every bit set in `valid_bitvec`.
    ///
    /// Counts of tables beyond the ECMA-335 set are consumed but not recorded.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the counts exceed `data`.
    pub fn new(data: &[u8], valid_bitvec: u64) -> Result<Self> {
        let mut rows = vec![TableRowInfo::default(); TableId::COUNT];
        let mut next_row_offset = 24;

        for table_number in 0..64_u8 {
            if (valid_bitvec & (1_u64 << table_number)) == 0 {
                continue;
            }

            let row_count = read_le_at::<u32>(data, &mut next_row_offset)?;
            if let Some(slot) = rows.get_mut(table_number as usize) {
                *slot = TableRowInfo::new(row_count);
            }
        }

        let Some(heap_flags) = data.get(6..) else {
            return Err(OutOfBounds);
        };
        let heap_size_flags = read_le::<u8>(heap_flags)?;

        let mut table_info = TableInfo {
            rows,
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: heap_size_flags & HEAP_LARGE_STRINGS != 0,
            is_large_index_guid: heap_size_flags & HEAP_LARGE_GUID != 0,
            is_large_index_blob: heap_size_flags & HEAP_LARGE_BLOB != 0,
        };

        table_info.calculate_coded_index_bits();

        Ok(table_info)
    }

    /// Builds a [`TableInfo`] from explicit row counts.
    #[cfg(test)]
    pub fn new_test(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> Self {
        let mut table_info = TableInfo {
            rows: vec![TableRowInfo::default(); TableId::COUNT],
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: large_str,
            is_large_index_guid: large_guid,
            is_large_index_blob: large_blob,
        };

        for (table, rows) in valid_tables {
            table_info.rows[*table as usize] = TableRowInfo::new(*rows);
        }

        table_info.calculate_coded_index_bits();
        table_info
    }

    /// Splits a raw coded index into its table and row.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a tag that selects no table.
    pub fn decode_coded_index(
        &self,
        value: u32,
        coded_index_type: CodedIndexType,
    ) -> Result<(TableId, u32)> {
        let tag_bits = coded_index_type.tag_bits();
        let tag = value & ((1 << tag_bits) - 1);

        match coded_index_type.table_for_tag(tag) {
            Some(table) => Ok((table, value >> tag_bits)),
            None => Err(malformed_error!(
                "Invalid tag {} for coded index {:?}",
                tag,
                coded_index_type
            )),
        }
    }

    /// Row information of `table`.
    #[must_use]
    pub fn get(&self, table: TableId) -> &TableRowInfo {
        &self.rows[table as usize]
    }

    /// Simple indexes into `id` are 4 bytes wide.
    #[must_use]
    pub fn is_large(&self, id: TableId) -> bool {
        self.rows[id as usize].is_large
    }

    /// `#Strings` indexes are 4 bytes wide.
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.is_large_index_str
    }

    /// `#GUID` indexes are 4 bytes wide.
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.is_large_index_guid
    }

    /// `#Blob` indexes are 4 bytes wide.
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.is_large_index_blob
    }

    /// Width of a `#Strings` index.
    #[must_use]
    pub fn str_bytes(&self) -> u8 {
        if self.is_large_index_str {
            4
        } else {
            2
        }
    }

    /// Width of a `#GUID` index.
    #[must_use]
    pub fn guid_bytes(&self) -> u8 {
        if self.is_large_index_guid {
            4
        } else {
            2
        }
    }

    /// Width of a `#Blob` index.
    #[must_use]
    pub fn blob_bytes(&self) -> u8 {
        if self.is_large_index_blob {
            4
        } else {
            2
        }
    }

    /// Width of a simple index into `table_id`.
    #[must_use]
    pub fn table_index_bytes(&self, table_id: TableId) -> u8 {
        if self.rows[table_id as usize].bits > 16 {
            4
        } else {
            2
        }
    }

    /// Width of a coded index of kind `coded_index_type`.
    #[must_use]
    pub fn coded_index_bytes(&self, coded_index_type: CodedIndexType) -> u8 {
        if self.coded_indexes[coded_index_type as usize] > 16 {
            4
        } else {
            2
        }
    }

    /// Size in bytes of one row of `table`, derived from its column layout.
    #[must_use]
    pub fn row_size(&self, table: TableId) -> u32 {
        table
            .columns()
            .iter()
            .map(|column| {
                u32::from(match column {
                    Column::Fixed(width) => *width,
                    Column::Str => self.str_bytes(),
                    Column::Guid => self.guid_bytes(),
                    Column::Blob => self.blob_bytes(),
                    Column::Index(target) => self.table_index_bytes(*target),
                    Column::Coded(kind) => self.coded_index_bytes(*kind),
                })
            })
            .sum()
    }

    fn calculate_coded_index_bits(&mut self) {
        for coded_index in CodedIndexType::iter() {
            let max_bits = coded_index
                .tables()
                .iter()
                .map(|table| self.rows[*table as usize].bits)
                .max()
                .unwrap_or(1);

            self.coded_indexes[coded_index as usize] = max_bits + coded_index.tag_bits();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_widths() {
        let info = TableInfo::new_test(
            &[(TableId::TypeDef, 10), (TableId::Field, 3)],
            false,
            false,
            false,
        );

        assert_eq!(info.get(TableId::TypeDef).rows, 10);
        assert_eq!(info.row_size(TableId::TypeDef), 14);
        assert_eq!(info.row_size(TableId::TypeRef), 6);
        assert_eq!(info.row_size(TableId::MethodDef), 14);
        assert_eq!(info.row_size(TableId::Assembly), 22);
        assert_eq!(info.row_size(TableId::AssemblyRef), 20);
        assert_eq!(info.row_size(TableId::CustomAttribute), 6);
    }

    #[test]
    fn coded_index_threshold() {
        // 2 tag bits leave 14 bits for rows: 0x3FFF rows still fit into 2 bytes
        let fits = TableInfo::new_test(&[(TableId::TypeRef, 0x3FFF)], false, false, false);
        assert_eq!(fits.coded_index_bytes(CodedIndexType::TypeDefOrRef), 2);

        let exceeds = TableInfo::new_test(&[(TableId::TypeRef, 0x4000)], false, false, false);
        assert_eq!(exceeds.coded_index_bytes(CodedIndexType::TypeDefOrRef), 4);
        assert_eq!(exceeds.table_index_bytes(TableId::TypeRef), 2);
        assert_eq!(exceeds.row_size(TableId::TypeDef), 16);
    }

    #[test]
    fn large_heaps() {
        let info = TableInfo::new_test(&[], true, true, true);
        assert_eq!(info.row_size(TableId::Module), 2 + 4 + 4 * 3);
        assert_eq!(info.row_size(TableId::Field), 2 + 4 + 4);
    }

    #[test]
    fn decode() {
        let info = TableInfo::new_test(&[], false, false, false);

        assert_eq!(
            info.decode_coded_index(0x0009, CodedIndexType::TypeDefOrRef).unwrap(),
            (TableId::TypeRef, 2)
        );
        assert_eq!(
            info.decode_coded_index(0x000E, CodedIndexType::ResolutionScope).unwrap(),
            (TableId::AssemblyRef, 3)
        );
        assert!(info
            .decode_coded_index(0x0003, CodedIndexType::TypeDefOrRef)
            .is_err());
    }

    #[test]
    fn row_counts_from_header() {
        #[rustfmt::skip]
        let data = [
            0x00, 0x00, 0x00, 0x00, // reserved
            0x02, 0x00,             // version
            0x01,                   // heap sizes: large strings
            0x01,                   // reserved
            0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // valid: Module, TypeRef, TypeDef
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // sorted
            0x01, 0x00, 0x00, 0x00,
            0x05, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
        ];

        let info = TableInfo::new(&data, 0x07).unwrap();
        assert_eq!(info.get(TableId::Module).rows, 1);
        assert_eq!(info.get(TableId::TypeRef).rows, 5);
        assert_eq!(info.get(TableId::TypeDef).rows, 3);
        assert!(info.is_large_str());
        assert!(!info.is_large_blob());

        assert!(TableInfo::new(&data, 0x0F).is_err());
    }
}
