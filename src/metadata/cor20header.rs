//! The CLI header (`IMAGE_COR20_HEADER`, ECMA-335 II.25.3.3).
//!
//! Located through the CLR runtime header data directory, it tells where the metadata root
//! lives and carries the runtime flags. Only the fields needed to reach the metadata are
//! kept; the remaining directories are validated and skipped.

use bitflags::bitflags;

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

bitflags! {
    /// Runtime flags of the CLI header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ComImageFlags: u32 {
        /// Image contains only IL code
        const IL_ONLY = 0x0000_0001;
        /// Image can only be loaded into a 32-bit process
        const REQUIRED_32BIT = 0x0000_0002;
        /// Image is an IL library
        const IL_LIBRARY = 0x0000_0004;
        /// Image carries a strong name signature
        const STRONG_NAME_SIGNED = 0x0000_0008;
        /// Entry point is a native RVA instead of a token
        const NATIVE_ENTRYPOINT = 0x0000_0010;
        /// Debug data is tracked
        const TRACK_DEBUG_DATA = 0x0001_0000;
        /// Image prefers a 32-bit process
        const PREFER_32BIT = 0x0002_0000;
    }
}

/// Size of the CLI header in bytes.
pub const COR20_HEADER_SIZE: usize = 72;

/// The parsed CLI header.
pub struct Cor20Header {
    /// Major version of the runtime the image targets
    pub major_runtime_version: u16,
    /// Minor version of the runtime the image targets
    pub minor_runtime_version: u16,
    /// RVA of the metadata root
    pub meta_data_rva: u32,
    /// Size of the metadata in bytes
    pub meta_data_size: u32,
    /// Runtime flags
    pub flags: ComImageFlags,
    /// Entry point token, or RVA for native entry points
    pub entry_point_token: u32,
}

impl Cor20Header {
    /// Parses the CLI header from `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] for short input and [`crate::Error::Malformed`]
    /// when a field fails validation.
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        if data.len() < COR20_HEADER_SIZE {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(data);

        let cb = parser.read_le::<u32>()?;
        if cb as usize != COR20_HEADER_SIZE {
            return Err(malformed_error!(
                "Invalid CLR header size: expected 72, got {}",
                cb
            ));
        }

        let major_runtime_version = parser.read_le::<u16>()?;
        let minor_runtime_version = parser.read_le::<u16>()?;
        if major_runtime_version == 0 || major_runtime_version > 10 {
            return Err(malformed_error!(
                "Invalid major runtime version: {}",
                major_runtime_version
            ));
        }

        let meta_data_rva = parser.read_le::<u32>()?;
        if meta_data_rva == 0 {
            return Err(malformed_error!("Metadata RVA cannot be zero"));
        }

        let meta_data_size = parser.read_le::<u32>()?;
        if meta_data_size == 0 {
            return Err(malformed_error!("Metadata size cannot be zero"));
        } else if meta_data_size > 0x1000_0000 {
            return Err(malformed_error!(
                "Metadata size {} exceeds reasonable limit (256MB)",
                meta_data_size
            ));
        }

        let raw_flags = parser.read_le::<u32>()?;
        let Some(flags) = ComImageFlags::from_bits(raw_flags) else {
            return Err(malformed_error!(
                "Invalid CLR flags: 0x{:08X} contains undefined bits",
                raw_flags
            ));
        };

        let entry_point_token = parser.read_le::<u32>()?;

        // Resources, strong name signature: rva and size are zero together or set together
        for name in ["Resources", "Strong name signature"] {
            let rva = parser.read_le::<u32>()?;
            let size = parser.read_le::<u32>()?;
            if (rva == 0) != (size == 0) {
                return Err(malformed_error!("{} directory is invalid", name));
            }
        }

        let code_manager_table = parser.read_le::<u64>()?;
        if code_manager_table != 0 {
            return Err(malformed_error!(
                "Code Manager Table fields must be zero (reserved)"
            ));
        }

        // VTable fixups, export address table jumps, managed native header
        parser.read_bytes(24)?;

        Ok(Cor20Header {
            major_runtime_version,
            minor_runtime_version,
            meta_data_rva,
            meta_data_size,
            flags,
            entry_point_token,
        })
    }
}
