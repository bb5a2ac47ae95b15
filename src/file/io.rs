//! Little-endian readers for the primitive values stored in PE and metadata structures.
//!
//! Every read is bounds-checked and advances the caller's offset only on success.
//!
//! ```rust
//! use dllexporter::file::io::{read_le, read_le_at, read_le_at_dyn};
//!
//! let data = [0x34, 0x12, 0x78, 0x56, 0x00, 0x00];
//! assert_eq!(read_le::<u16>(&data)?, 0x1234);
//!
//! let mut offset = 2;
//! assert_eq!(read_le_at_dyn(&data, &mut offset, true)?, 0x5678);
//! assert_eq!(offset, 6);
//! assert!(read_le_at::<u8>(&data, &mut offset).is_err());
//! # Ok::<(), dllexporter::Error>(())
//! ```

use crate::{Error::OutOfBounds, Result};

/// Numeric types that can be decoded from their little-endian byte representation.
pub trait CilIO: Sized {
    /// The fixed-size byte array holding one encoded value.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Decode `Self` from little-endian bytes
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_cil_io {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CilIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_cil_io!(u8, i8, u16, i16, u32, i32, u64, i64);

/// Reads a `T` from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn read_le<T: CilIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Reads a `T` at `offset` and advances `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the value would extend past `data`.
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };

    let Some(slice) = data.get(*offset..end) else {
        return Err(OutOfBounds);
    };

    let Ok(read) = slice.try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}

/// Reads a heap or table index that is 4 bytes wide when `is_large`, 2 bytes otherwise.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the index would extend past `data`.
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    let res = if is_large {
        read_le_at::<u32>(data, offset)?
    } else {
        u32::from(read_le_at::<u16>(data, offset)?)
    };

    Ok(res)
}
