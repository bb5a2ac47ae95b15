use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::{
    file::io::read_le,
    metadata::tables::{
        MetadataTable, RowReadable, TableId, TableInfo, TableInfoRef, HEAP_EXTRA_DATA,
    },
    Error::OutOfBounds,
    Result,
};

/// The `#~` stream: the header of the compressed metadata tables and the tables that follow.
///
/// Tables are stored back to back in [`TableId`] order, so locating one requires the row
/// sizes of all tables before it. Those are computed once on construction; rows are decoded
/// lazily through [`TablesHeader::table`].
///
/// ## Reference
/// * '<https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf>' - II.24.2.6 && II.22
pub struct TablesHeader<'a> {
    /// Major version of table schemata, shall be 2
    pub major_version: u8,
    /// Minor version of table schemata, shall be 0
    pub minor_version: u8,
    /// Bit vector of present tables
    pub valid: u64,
    /// Bit vector of sorted tables
    pub sorted: u64,
    /// Row counts and index widths
    pub info: TableInfoRef,
    data: &'a [u8],
    /// Start offset of each present table, relative to the stream
    tables: Vec<Option<usize>>,
}

impl<'a> TablesHeader<'a> {
    /// Parses the header of a `#~` stream and locates its tables.
    ///
    /// # Errors
    /// Returns an error if the data is too short for the declared tables or if no table is
    /// present at all.
    pub fn from(data: &'a [u8]) -> Result<TablesHeader<'a>> {
        if data.len() < 24 {
            return Err(OutOfBounds);
        }

        let valid = read_le::<u64>(&data[8..])?;
        if valid == 0 {
            return Err(malformed_error!("No valid rows in any of the tables"));
        }

        let heap_flags = read_le::<u8>(&data[6..])?;
        let info = Arc::new(TableInfo::new(data, valid)?);

        let mut current_offset = 24 + valid.count_ones() as usize * 4;
        if heap_flags & HEAP_EXTRA_DATA != 0 {
            current_offset += 4;
        }

        let mut tables = vec![None; TableId::iter().count()];
        for table_id in TableId::iter() {
            let rows = info.get(table_id).rows;
            if rows == 0 {
                continue;
            }

            let size = rows as usize * info.row_size(table_id) as usize;
            match current_offset.checked_add(size) {
                Some(end) if end <= data.len() => {
                    tables[table_id as usize] = Some(current_offset);
                    current_offset = end;
                }
                _ => {
                    return Err(malformed_error!(
                        "Table {:?} with {} rows exceeds the #~ stream",
                        table_id,
                        rows
                    ))
                }
            }
        }

        Ok(TablesHeader {
            major_version: read_le::<u8>(&data[4..])?,
            minor_version: read_le::<u8>(&data[5..])?,
            valid,
            sorted: read_le::<u64>(&data[16..])?,
            info,
            data,
            tables,
        })
    }

    /// Number of tables flagged as present.
    #[must_use]
    pub fn table_count(&self) -> u32 {
        self.valid.count_ones()
    }

    /// Typed view of the table `T` belongs to, `None` if the module has no such rows.
    #[must_use]
    pub fn table<T: RowReadable>(&self) -> Option<MetadataTable<'a, T>> {
        let offset = (*self.tables.get(T::TABLE_ID as usize)?)?;
        let rows = self.table_row_count(T::TABLE_ID);

        MetadataTable::new(&self.data[offset..], rows, self.info.clone()).ok()
    }

    /// Check if a specific table is present
    #[must_use]
    pub fn has_table(&self, table_id: TableId) -> bool {
        (self.valid & (1u64 << (table_id as u8))) != 0
    }

    /// Row count of `table_id`, 0 if absent.
    #[must_use]
    pub fn table_row_count(&self, table_id: TableId) -> u32 {
        self.info.get(table_id).rows
    }
}
