//! Error types for the trainticket-core library.

use std::io;

use thiserror::Error;

use crate::models::invoice::DateField;

/// Main error type for the trainticket library.
#[derive(Error, Debug)]
pub enum Error {
    /// Fatal configuration error; aborts the whole run.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// PDF structure or payload error.
    #[error("{0}")]
    Pdf(#[from] PdfError),

    /// XBRL metadata error.
    #[error("{0}")]
    Metadata(#[from] MetadataError),

    /// Output naming error.
    #[error("{0}")]
    Naming(#[from] NamingError),

    /// ZIP archive error.
    #[error("{context}: {source}")]
    Archive {
        context: &'static str,
        #[source]
        source: zip::result::ZipError,
    },

    /// I/O error.
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(context: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Io { context, source }
    }

    pub(crate) fn archive(context: &'static str) -> impl FnOnce(zip::result::ZipError) -> Self {
        move |source| Self::Archive { context, source }
    }
}

/// Configuration problems detected before any file is processed.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No input directory was given.
    #[error("input directory is not set")]
    EmptyInputDir,

    /// No output directory was given.
    #[error("output directory is not set")]
    EmptyOutputDir,

    /// A directory could not be resolved to an absolute path.
    #[error("invalid {label} directory: {source}")]
    InvalidPath {
        label: &'static str,
        #[source]
        source: io::Error,
    },

    /// Input and output point at the same directory.
    #[error("output directory must differ from input directory")]
    SameDirectory,

    /// The output directory could not be created.
    #[error("failed to create output directory: {0}")]
    CreateOutputDir(#[source] io::Error),

    /// The settings file could not be read.
    #[error("failed to read settings: {0}")]
    SettingsRead(#[source] io::Error),

    /// The settings file is not valid JSON or is incomplete.
    #[error("invalid settings: {0}")]
    SettingsInvalid(String),

    /// The settings file could not be written.
    #[error("failed to write settings: {0}")]
    SettingsWrite(#[source] io::Error),
}

/// Errors related to locating and decoding XBRL inside a PDF.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Neither the plain-text nor the embedded-file strategy found XBRL.
    #[error("no parsable XBRL found in PDF")]
    NoXbrl,

    /// No `N G obj` header precedes an embedded-file declaration.
    #[error("PDF object header not found")]
    MissingObjectHeader,

    /// No `stream` keyword follows an embedded-file declaration.
    #[error("PDF stream keyword not found")]
    MissingStream,

    /// The `stream` keyword is not followed by CRLF or LF.
    #[error("PDF stream keyword is not followed by an end-of-line")]
    MalformedStreamEol,

    /// The `stream` keyword lies before the object content.
    #[error("PDF stream keyword precedes its object header")]
    StreamBeforeHeader,

    /// The embedded-file dictionary has no `/Length` key.
    #[error("EmbeddedFile /Length not found")]
    MissingLength,

    /// The `/Length` value is missing or not an integer.
    #[error("EmbeddedFile /Length is not an integer")]
    InvalidLength,

    /// An indirect `/Length` points at an object that does not exist.
    #[error("indirect /Length object {num} {generation} R not found")]
    UnresolvedLength { num: u32, generation: u32 },

    /// An indirect `/Length` object does not hold an integer.
    #[error("indirect /Length object {num} {generation} R is not an integer")]
    IndirectLengthNotInteger { num: u32, generation: u32 },

    /// The stream payload runs past the end of the file.
    #[error("embedded stream out of bounds: start={start} len={len} pdf={size}")]
    OutOfBounds { start: usize, len: usize, size: usize },

    /// Both zlib and raw deflate decoding failed.
    #[error("deflate decompression failed: {0}")]
    Decompress(String),

    /// An embedded file decoded fine but holds no XBRL fragment.
    #[error("no XBRL found in PDF EmbeddedFile")]
    NoEmbeddedXbrl,
}

/// Errors related to reading invoice fields from XBRL.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The fragment is not well-formed XML.
    #[error("failed to parse XBRL: {0}")]
    Parse(String),

    /// A recognised field could not be read.
    #[error("failed to read field {field}: {reason}")]
    Field { field: &'static str, reason: String },

    /// Stations or both dates are missing.
    #[error("XBRL is missing required fields")]
    MissingRequiredField,
}

/// Errors related to building the output file name.
#[derive(Error, Debug)]
pub enum NamingError {
    /// The selected date field is blank.
    #[error("missing {} ({})", .0.label(), .0.tag())]
    MissingDate(DateField),

    /// The date string is empty after trimming.
    #[error("date is empty")]
    EmptyDate,

    /// The date string matches none of the accepted layouts.
    #[error("unparseable date: {0:?}")]
    UnparseableDate(String),

    /// A station name sanitizes to nothing.
    #[error("station name empty after sanitization")]
    EmptyStation,

    /// The assembled name is blank.
    #[error("output file name is empty")]
    EmptyFileName,

    /// The assembled name contains a path separator.
    #[error("output file name must not contain a path separator: {0:?}")]
    PathSeparator(String),
}

/// Result type for the trainticket library.
pub type Result<T> = std::result::Result<T, Error>;
