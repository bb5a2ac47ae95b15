//! A loaded .NET module with its parsed metadata.
//!
//! [`CilModule`] owns the [`File`] and the views into it: the CLI header, the metadata root,
//! the `#~` tables and the `#Strings` and `#Blob` heaps. It answers the questions the loader
//! and the collector ask of a module: who it is, what it references, which types it provides.

use std::path::{Path, PathBuf};

use ouroboros::self_referencing;

use crate::{
    file::File,
    metadata::{
        cor20header::Cor20Header,
        identity::{AssemblyIdentity, AssemblyVersion},
        root::Root,
        streams::{Blob, Strings, TablesHeader},
        tables::{
            AssemblyFlags, AssemblyRaw, AssemblyRefRaw, ExportedTypeRaw, MetadataTable,
            RowReadable, TableId, TypeAttributes, TypeDefRaw,
        },
    },
    Error::NotSupported,
    Result,
};

/// Parsed metadata of a module, borrowing from its file.
pub struct ModuleData<'a> {
    /// CLI header
    pub cor20header: Cor20Header,
    /// Metadata root with the stream directory
    pub root: Root,
    /// The `#~` stream
    pub tables: TablesHeader<'a>,
    /// The `#Strings` heap
    pub strings: Strings<'a>,
    /// The `#Blob` heap, absent in modules without signatures
    pub blobs: Option<Blob<'a>>,
}

impl<'a> ModuleData<'a> {
    fn parse(file: &'a File) -> Result<ModuleData<'a>> {
        let (clr_rva, clr_size) = file.clr()?;
        let clr_offset = file.rva_to_offset(clr_rva)?;
        let cor20header = Cor20Header::read(file.data_slice(clr_offset, clr_size)?)?;

        let metadata_offset = file.rva_to_offset(cor20header.meta_data_rva as usize)?;
        let metadata = file.data_slice(metadata_offset, cor20header.meta_data_size as usize)?;
        let root = Root::read(metadata)?;

        if root.stream("#-").is_some() {
            return Err(NotSupported);
        }

        let stream_data = |name: &str| -> Option<&'a [u8]> {
            let header = root.stream(name)?;
            let start = header.offset as usize;
            metadata.get(start..start + header.size as usize)
        };

        let Some(tables_data) = stream_data("#~") else {
            return Err(malformed_error!("Module has no #~ stream"));
        };
        let Some(strings_data) = stream_data("#Strings") else {
            return Err(malformed_error!("Module has no #Strings stream"));
        };

        let tables = TablesHeader::from(tables_data)?;
        let strings = Strings::from(strings_data)?;
        let blobs = match stream_data("#Blob") {
            Some(data) => Some(Blob::from(data)?),
            None => None,
        };

        Ok(ModuleData {
            cor20header,
            root,
            tables,
            strings,
            blobs,
        })
    }
}

#[self_referencing]
/// A .NET module loaded from disk or memory.
///
/// # Example
/// ```rust,no_run
/// use dllexporter::metadata::cilmodule::CilModule;
/// use std::path::Path;
///
/// let module = CilModule::from_path(Path::new("Library.dll"))?;
/// if let Some(identity) = module.identity() {
///     println!("{identity}");
/// }
/// for reference in module.assembly_refs() {
///     println!("  -> {}", reference.name);
/// }
/// # Ok::<(), dllexporter::Error>(())
/// ```
pub struct CilModule {
    path: Option<PathBuf>,
    file: File,
    #[borrows(file)]
    #[covariant]
    data: ModuleData<'this>,
}

impl CilModule {
    /// Loads and parses the module at `path`. The file is memory-mapped.
    ///
    /// # Errors
    /// Returns an error if the file can not be read or does not hold valid .NET metadata.
    /// The uncompressed `#-` table stream yields [`crate::Error::NotSupported`].
    pub fn from_path(path: &Path) -> Result<CilModule> {
        let file = File::from_file(path)?;
        Self::load(file, Some(path.to_path_buf()))
    }

    /// Parses a module from an in-memory image.
    ///
    /// # Errors
    /// Returns an error if the image does not hold valid .NET metadata.
    pub fn from_mem(data: Vec<u8>) -> Result<CilModule> {
        let file = File::from_mem(data)?;
        Self::load(file, None)
    }

    fn load(file: File, path: Option<PathBuf>) -> Result<CilModule> {
        CilModule::try_new(path, file, |file| ModuleData::parse(file))
    }

    /// Path the module was loaded from, `None` for in-memory images.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.borrow_path().as_deref()
    }

    /// The underlying PE file.
    #[must_use]
    pub fn file(&self) -> &File {
        self.borrow_file()
    }

    /// CLI header.
    #[must_use]
    pub fn cor20header(&self) -> &Cor20Header {
        &self.borrow_data().cor20header
    }

    /// Metadata root.
    #[must_use]
    pub fn root(&self) -> &Root {
        &self.borrow_data().root
    }

    /// The `#~` stream.
    #[must_use]
    pub fn tables(&self) -> &TablesHeader<'_> {
        &self.borrow_data().tables
    }

    /// Typed view of the table holding rows of type `T`.
    #[must_use]
    pub fn table<T: RowReadable>(&self) -> Option<MetadataTable<'_, T>> {
        self.borrow_data().tables.table::<T>()
    }

    /// Row `rid` of the table holding rows of type `T`.
    #[must_use]
    pub fn row<T: RowReadable>(&self, rid: u32) -> Option<T> {
        self.table::<T>()?.get(rid)
    }

    /// String at `index` of the `#Strings` heap.
    ///
    /// # Errors
    /// Returns an error for an index outside the heap or an invalid string.
    pub fn string(&self, index: u32) -> Result<&str> {
        self.borrow_data().strings.get(index as usize)
    }

    /// Blob at `index` of the `#Blob` heap.
    ///
    /// # Errors
    /// Returns an error for an index outside the heap, or when the module has no `#Blob`
    /// stream.
    pub fn blob(&self, index: u32) -> Result<&[u8]> {
        match &self.borrow_data().blobs {
            Some(blobs) => blobs.get(index as usize),
            None => Err(malformed_error!("Module has no #Blob stream")),
        }
    }

    /// Identity of the assembly, `None` for modules without a manifest.
    #[must_use]
    pub fn identity(&self) -> Option<AssemblyIdentity> {
        let assembly = self.row::<AssemblyRaw>(1)?;
        let name = self.string(assembly.name).ok()?;
        let culture = self.string(assembly.culture).unwrap_or_default();
        let public_key = self.blob(assembly.public_key).unwrap_or_default();

        Some(
            AssemblyIdentity::new(
                name,
                version(
                    assembly.major_version,
                    assembly.minor_version,
                    assembly.build_number,
                    assembly.revision_number,
                ),
            )
            .with_culture(culture)
            .with_key(public_key, true),
        )
    }

    /// Simple name of the assembly.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.identity().map(|identity| identity.name)
    }

    /// Identity of the assembly referenced by `AssemblyRef` row `rid`.
    #[must_use]
    pub fn assembly_ref(&self, rid: u32) -> Option<AssemblyIdentity> {
        let row = self.row::<AssemblyRefRaw>(rid)?;
        self.reference_identity(&row)
    }

    /// Every referenced assembly, in table order. Rows with unreadable names are skipped.
    #[must_use]
    pub fn assembly_refs(&self) -> Vec<AssemblyIdentity> {
        let Some(table) = self.table::<AssemblyRefRaw>() else {
            return Vec::new();
        };

        table
            .iter()
            .filter_map(|row| self.reference_identity(&row))
            .collect()
    }

    fn reference_identity(&self, row: &AssemblyRefRaw) -> Option<AssemblyIdentity> {
        let name = self.string(row.name).ok()?;
        let culture = self.string(row.culture).unwrap_or_default();
        let key = self.blob(row.public_key_or_token).unwrap_or_default();
        let is_public_key =
            AssemblyFlags::from_bits_truncate(row.flags).contains(AssemblyFlags::PUBLIC_KEY);

        Some(
            AssemblyIdentity::new(
                name,
                version(
                    row.major_version,
                    row.minor_version,
                    row.build_number,
                    row.revision_number,
                ),
            )
            .with_culture(culture)
            .with_key(key, is_public_key),
        )
    }

    /// Whether this module defines or forwards the top-level type `namespace.name`.
    #[must_use]
    pub fn provides_type(&self, namespace: &str, name: &str) -> bool {
        let matches = |ns_index: u32, name_index: u32| {
            self.string(name_index).is_ok_and(|value| value == name)
                && self.string(ns_index).is_ok_and(|value| value == namespace)
        };

        let defined = self.table::<TypeDefRaw>().is_some_and(|table| {
            table.iter().any(|row| {
                row.flags & TypeAttributes::VISIBILITY_MASK <= TypeAttributes::PUBLIC
                    && matches(row.type_namespace, row.type_name)
            })
        });

        defined
            || self.table::<ExportedTypeRaw>().is_some_and(|table| {
                table.iter().any(|row| {
                    row.implementation.tag != TableId::ExportedType
                        && matches(row.namespace, row.name)
                })
            })
    }
}

fn version(major: u32, minor: u32, build: u32, revision: u32) -> AssemblyVersion {
    // version columns are 2 bytes wide
    AssemblyVersion::new(major as u16, minor as u16, build as u16, revision as u16)
}
