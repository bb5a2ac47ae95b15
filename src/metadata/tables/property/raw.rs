use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// One row of the `Property` table.
#[derive(Clone, Debug)]
pub struct PropertyRaw {
    /// Row id
    pub rid: u32,
    /// Token of the row
    pub token: Token,
    /// Byte offset of the row inside the table
    pub offset: usize,
    /// Property attributes (special name, has default)
    pub flags: u32,
    /// `#Strings` index of the name
    pub name: u32,
    /// `#Blob` index of the property signature
    pub signature: u32,
}

impl RowReadable for PropertyRaw {
    const TABLE_ID: TableId = TableId::Property;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* flags */     2 +
            /* name */      sizes.str_bytes() +
            /* signature */ sizes.blob_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(PropertyRaw {
            rid,
            token: Token::from_parts(TableId::Property, rid),
            offset: *offset,
            flags: u32::from(read_le_at::<u16>(data, offset)?),
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::metadata::tables::{MetadataTable, TableInfo};

    use super::*;

    #[test]
    fn crafted_short() {
        let data = vec![
            0x00, 0x02, // flags: special name
            0x10, 0x00, // name
            0x20, 0x00, // signature
        ];

        let sizes = Arc::new(TableInfo::new_test(&[(TableId::Property, 1)], false, false, false));
        let table = MetadataTable::<PropertyRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.token.value(), 0x1700_0001);
        assert_eq!(row.flags, 0x0200);
        assert_eq!(row.name, 0x10);
        assert_eq!(row.signature, 0x20);
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x00, 0x00, // flags
            0x10, 0x00, 0x00, 0x01, // name
            0x20, 0x00, 0x00, 0x02, // signature
        ];

        let sizes = Arc::new(TableInfo::new_test(&[(TableId::Property, 1)], true, true, false));
        let table = MetadataTable::<PropertyRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.name, 0x0100_0010);
        assert_eq!(row.signature, 0x0200_0020);
    }
}
