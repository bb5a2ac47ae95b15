use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{
            CodedIndex, CodedIndexType, MethodSemanticsAttributes, RowReadable, TableId,
            TableInfoRef,
        },
        token::Token,
    },
    Result,
};

/// One row of the `MethodSemantics` table.
#[derive(Clone, Debug)]
pub struct MethodSemanticsRaw {
    /// Row id
    pub rid: u32,
    /// Token of the row
    pub token: Token,
    /// Byte offset of the row inside the table
    pub offset: usize,
    /// Role of the method
    pub semantics: MethodSemanticsAttributes,
    /// `MethodDef` row of the accessor
    pub method: u32,
    /// The owning property or event (`HasSemantics`)
    pub association: CodedIndex,
}

impl RowReadable for MethodSemanticsRaw {
    const TABLE_ID: TableId = TableId::MethodSemantics;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* semantics */     2 +
            /* method */        sizes.table_index_bytes(TableId::MethodDef) +
            /* association */   sizes.coded_index_bytes(CodedIndexType::HasSemantics)
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(MethodSemanticsRaw {
            rid,
            token: Token::from_parts(TableId::MethodSemantics, rid),
            offset: *offset,
            semantics: MethodSemanticsAttributes::from_bits_truncate(u32::from(read_le_at::<
                u16,
            >(
                data, offset
            )?)),
            method: read_le_at_dyn(data, offset, sizes.is_large(TableId::MethodDef))?,
            association: CodedIndex::read(data, offset, sizes, CodedIndexType::HasSemantics)?,
        })
    }
}
