use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// One row of the `ExportedType` table.
#[derive(Clone, Debug)]
pub struct ExportedTypeRaw {
    /// Row id
    pub rid: u32,
    /// Token of the row
    pub token: Token,
    /// Byte offset of the row inside the table
    pub offset: usize,
    /// `TypeAttributes` of the exported type
    pub flags: u32,
    /// Hint for the `TypeDef` row in the target file
    pub type_def_id: u32,
    /// `#Strings` index of the name
    pub name: u32,
    /// `#Strings` index of the namespace
    pub namespace: u32,
    /// Where the type lives (`Implementation`)
    pub implementation: CodedIndex,
}

impl RowReadable for ExportedTypeRaw {
    const TABLE_ID: TableId = TableId::ExportedType;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* flags */             4 +
            /* type_def_id */       4 +
            /* name */              sizes.str_bytes() +
            /* namespace */         sizes.str_bytes() +
            /* implementation */    sizes.coded_index_bytes(CodedIndexType::Implementation)
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(ExportedTypeRaw {
            rid,
            token: Token::from_parts(TableId::ExportedType, rid),
            offset: *offset,
            flags: read_le_at::<u32>(data, offset)?,
            type_def_id: read_le_at::<u32>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            namespace: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            implementation: CodedIndex::read(data, offset, sizes, CodedIndexType::Implementation)?,
        })
    }
}
