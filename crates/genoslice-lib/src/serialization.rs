//! Record layer for genome entities
//!
//! Every entity publishes an ordered field specification, a list of
//! `(field_name, required, declared_type, container_kind)` entries, through
//! [`EntityKind::field_specs`]. Records are `serde_json` values; before a
//! record is turned into a typed entity it is validated against the
//! specification of its entity kind (required fields present, declared
//! types and containers respected, no unknown fields, nested entities
//! checked recursively).
//!
//! # File Format
//!
//! ```text
//! GenomeFileHeader
//!   ├─ magic: "GNSLC001"
//!   ├─ version_major: u32 (little endian)
//!   └─ version_minor: u32 (little endian)
//! Genome record (JSON)
//! ```

use crate::meta_info::MetaInfo;
use crate::structure::{Genome, Sequence, Slice};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Magic bytes for the genome file format
const MAGIC: &[u8; 8] = b"GNSLC001";

/// File format version: (major, minor)
/// Increment major on breaking changes, minor on compatible changes
const FORMAT_VERSION: (u32, u32) = (1, 0);

/// Errors of the record layer
#[derive(Error, Debug)]
pub enum RecordError {
    /// I/O error while reading or writing
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Malformed JSON or a record serde could not map onto the entity
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A required field is absent or null
    #[error("{entity}: missing required field {field:?}")]
    MissingField {
        /// Entity being validated
        entity: EntityKind,
        /// Field name
        field: String,
    },
    /// A field not in the entity's specification
    #[error("{entity}: unknown field {field:?}")]
    UnknownField {
        /// Entity being validated
        entity: EntityKind,
        /// Field name
        field: String,
    },
    /// A value whose shape does not match the specification
    #[error("{entity}.{field}: expected {expected}")]
    TypeMismatch {
        /// Entity being validated
        entity: EntityKind,
        /// Field name
        field: String,
        /// Description of the expected shape
        expected: String,
    },
    /// File does not start with the genome magic bytes
    #[error("Invalid magic number for genome file")]
    BadMagic,
    /// File written by an incompatible format version
    #[error(
        "Incompatible format version: {major}.{minor}, expected {}.{}",
        FORMAT_VERSION.0,
        FORMAT_VERSION.1
    )]
    UnsupportedVersion {
        /// Major version found
        major: u32,
        /// Minor version found
        minor: u32,
    },
}

/// Entity types known to the record layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// [`Genome`]
    Genome,
    /// [`Sequence`]
    Sequence,
    /// [`Slice`]
    Slice,
    /// [`MetaInfo`]
    MetaInfo,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Genome => "Genome",
            Self::Sequence => "Sequence",
            Self::Slice => "Slice",
            Self::MetaInfo => "MetaInfo",
        };
        f.write_str(name)
    }
}

/// Declared type of a field's leaf values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Non-negative integer
    Integer,
    /// String
    String,
    /// Nested entity record
    Entity(EntityKind),
}

/// How leaf values are arranged in a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// A single value
    Single,
    /// An ordered list of values
    List,
    /// A map from integer keys to maps from string keys to values
    NestedMap,
}

/// One entry of an entity's field specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name in the record
    pub name: &'static str,
    /// Whether the field must be present and non-null
    pub required: bool,
    /// Type of the leaf values
    pub declared_type: FieldType,
    /// Arrangement of the leaf values
    pub container: ContainerKind,
}

const fn field(
    name: &'static str,
    required: bool,
    declared_type: FieldType,
    container: ContainerKind,
) -> FieldSpec {
    FieldSpec {
        name,
        required,
        declared_type,
        container,
    }
}

const GENOME_FIELDS: &[FieldSpec] = &[
    field("sequences", true, FieldType::Entity(EntityKind::Sequence), ContainerKind::List),
    field("meta_info", true, FieldType::Entity(EntityKind::MetaInfo), ContainerKind::Single),
    field("species", true, FieldType::String, ContainerKind::Single),
    field("accession", true, FieldType::String, ContainerKind::Single),
    field("version", true, FieldType::String, ContainerKind::Single),
    field("acquired_from", true, FieldType::String, ContainerKind::Single),
];

const SEQUENCE_FIELDS: &[FieldSpec] = &[
    field("slices", true, FieldType::Entity(EntityKind::Slice), ContainerKind::List),
    field("meta_info", true, FieldType::Entity(EntityKind::MetaInfo), ContainerKind::Single),
    field("deprecated_header", true, FieldType::String, ContainerKind::Single),
    field("seqid", true, FieldType::String, ContainerKind::Single),
];

const SLICE_FIELDS: &[FieldSpec] = &[
    field("sequence", true, FieldType::String, ContainerKind::List),
    field("start", true, FieldType::Integer, ContainerKind::Single),
    field("end", true, FieldType::Integer, ContainerKind::Single),
    field("processing_set", false, FieldType::String, ContainerKind::Single),
    field("slice_id", true, FieldType::String, ContainerKind::Single),
];

const META_INFO_FIELDS: &[FieldSpec] = &[
    field("total_bp", true, FieldType::Integer, ContainerKind::Single),
    field("gc_content", true, FieldType::Integer, ContainerKind::Single),
    field("ambiguous_content", true, FieldType::Integer, ContainerKind::Single),
    field("canonical_kmer_content", true, FieldType::Integer, ContainerKind::NestedMap),
];

impl EntityKind {
    /// Ordered field specification of this entity
    pub fn field_specs(self) -> &'static [FieldSpec] {
        match self {
            Self::Genome => GENOME_FIELDS,
            Self::Sequence => SEQUENCE_FIELDS,
            Self::Slice => SLICE_FIELDS,
            Self::MetaInfo => META_INFO_FIELDS,
        }
    }
}

/// An entity that can be written to and read from a record
pub trait EntityRecord: Serialize + DeserializeOwned {
    /// Which field specification applies
    const KIND: EntityKind;

    /// Ordered field specification
    fn field_specs() -> &'static [FieldSpec] {
        Self::KIND.field_specs()
    }
}

impl EntityRecord for Genome {
    const KIND: EntityKind = EntityKind::Genome;
}

impl EntityRecord for Sequence {
    const KIND: EntityKind = EntityKind::Sequence;
}

impl EntityRecord for Slice {
    const KIND: EntityKind = EntityKind::Slice;
}

impl EntityRecord for MetaInfo {
    const KIND: EntityKind = EntityKind::MetaInfo;
}

fn mismatch(entity: EntityKind, field: &str, expected: &str) -> RecordError {
    RecordError::TypeMismatch {
        entity,
        field: field.to_string(),
        expected: expected.to_string(),
    }
}

fn check_leaf(
    entity: EntityKind,
    field: &str,
    declared: FieldType,
    value: &Value,
) -> Result<(), RecordError> {
    match declared {
        FieldType::Integer if value.is_u64() => Ok(()),
        FieldType::Integer => Err(mismatch(entity, field, "a non-negative integer")),
        FieldType::String if value.is_string() => Ok(()),
        FieldType::String => Err(mismatch(entity, field, "a string")),
        FieldType::Entity(kind) => validate_record(kind, value),
    }
}

fn check_field(entity: EntityKind, spec: &FieldSpec, value: &Value) -> Result<(), RecordError> {
    match spec.container {
        ContainerKind::Single => check_leaf(entity, spec.name, spec.declared_type, value),
        ContainerKind::List => {
            let items = value
                .as_array()
                .ok_or_else(|| mismatch(entity, spec.name, "a list"))?;
            items
                .iter()
                .try_for_each(|item| check_leaf(entity, spec.name, spec.declared_type, item))
        }
        ContainerKind::NestedMap => {
            let outer = value
                .as_object()
                .ok_or_else(|| mismatch(entity, spec.name, "a map"))?;
            for (key, inner) in outer {
                if key.parse::<usize>().is_err() {
                    return Err(mismatch(entity, spec.name, "integer keys in the outer map"));
                }
                let inner = inner
                    .as_object()
                    .ok_or_else(|| mismatch(entity, spec.name, "a map of maps"))?;
                for leaf in inner.values() {
                    check_leaf(entity, spec.name, spec.declared_type, leaf)?;
                }
            }
            Ok(())
        }
    }
}

/// Validate a record against the field specification of `kind`
///
/// # Errors
/// The first [`RecordError::MissingField`], [`RecordError::UnknownField`]
/// or [`RecordError::TypeMismatch`] found, depth first.
pub fn validate_record(kind: EntityKind, value: &Value) -> Result<(), RecordError> {
    let object: &Map<String, Value> = value
        .as_object()
        .ok_or_else(|| mismatch(kind, "<record>", "an object"))?;
    let specs = kind.field_specs();

    if let Some(unknown) = object.keys().find(|k| !specs.iter().any(|s| s.name == k.as_str())) {
        return Err(RecordError::UnknownField {
            entity: kind,
            field: unknown.clone(),
        });
    }

    for spec in specs {
        match object.get(spec.name) {
            None | Some(Value::Null) if spec.required => {
                return Err(RecordError::MissingField {
                    entity: kind,
                    field: spec.name.to_string(),
                });
            }
            None | Some(Value::Null) => {}
            Some(value) => check_field(kind, spec, value)?,
        }
    }
    Ok(())
}

/// Convert an entity into a validated record
///
/// # Errors
/// [`RecordError::Json`] if serialization fails, or a validation error if
/// the entity does not match its own specification.
pub fn to_record<T: EntityRecord>(entity: &T) -> Result<Value, RecordError> {
    let value = serde_json::to_value(entity)?;
    validate_record(T::KIND, &value)?;
    Ok(value)
}

/// Validate a record and convert it into an entity
///
/// # Errors
/// A validation error, or [`RecordError::Json`] if the values cannot be
/// mapped onto the entity (e.g. an unknown processing set label).
pub fn from_record<T: EntityRecord>(value: Value) -> Result<T, RecordError> {
    validate_record(T::KIND, &value)?;
    Ok(serde_json::from_value(value)?)
}

/// Header of a genome file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenomeFileHeader {
    /// Magic number for format identification ("GNSLC001")
    pub magic: [u8; 8],
    /// Format version major number
    pub version_major: u32,
    /// Format version minor number
    pub version_minor: u32,
}

impl Default for GenomeFileHeader {
    fn default() -> Self {
        Self {
            magic: *MAGIC,
            version_major: FORMAT_VERSION.0,
            version_minor: FORMAT_VERSION.1,
        }
    }
}

impl GenomeFileHeader {
    /// Write header to a writer
    pub fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writer.write_all(&self.magic)?;
        writer.write_all(&self.version_major.to_le_bytes())?;
        writer.write_all(&self.version_minor.to_le_bytes())?;
        Ok(())
    }

    /// Read and check a header from a reader
    ///
    /// # Errors
    /// [`RecordError::BadMagic`] or [`RecordError::UnsupportedVersion`] for
    /// a foreign or incompatible file.
    pub fn read(reader: &mut dyn Read) -> Result<Self, RecordError> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => RecordError::BadMagic,
            _ => RecordError::Io(e),
        })?;
        if &magic != MAGIC {
            return Err(RecordError::BadMagic);
        }

        let mut version_major_bytes = [0u8; 4];
        let mut version_minor_bytes = [0u8; 4];
        reader.read_exact(&mut version_major_bytes)?;
        reader.read_exact(&mut version_minor_bytes)?;

        let version_major = u32::from_le_bytes(version_major_bytes);
        let version_minor = u32::from_le_bytes(version_minor_bytes);
        if version_major != FORMAT_VERSION.0 {
            return Err(RecordError::UnsupportedVersion {
                major: version_major,
                minor: version_minor,
            });
        }

        Ok(Self {
            magic,
            version_major,
            version_minor,
        })
    }
}

/// Write a genome (header + JSON record) to a writer
///
/// # Errors
/// I/O, JSON or validation errors.
pub fn write_genome<W: Write>(genome: &Genome, writer: &mut W) -> Result<(), RecordError> {
    let record = to_record(genome)?;
    GenomeFileHeader::default().write(&mut *writer)?;
    serde_json::to_writer(&mut *writer, &record)?;
    writer.flush()?;
    Ok(())
}

/// Read a genome written by [`write_genome`]
///
/// # Errors
/// Header, I/O, JSON or validation errors.
pub fn read_genome<R: Read>(reader: &mut R) -> Result<Genome, RecordError> {
    GenomeFileHeader::read(&mut *reader)?;
    let record: Value = serde_json::from_reader(reader)?;
    from_record(record)
}

impl Genome {
    /// Save to a file
    ///
    /// # Errors
    /// See [`write_genome`].
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RecordError> {
        let path = path.as_ref();
        info!("Saving genome to {}", path.display());
        let mut writer = BufWriter::new(File::create(path)?);
        write_genome(self, &mut writer)
    }

    /// Load from a file
    ///
    /// # Errors
    /// See [`read_genome`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Genome, RecordError> {
        let path = path.as_ref();
        info!("Loading genome from {}", path.display());
        let mut reader = BufReader::new(File::open(path)?);
        read_genome(&mut reader)
    }
}
