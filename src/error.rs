use crate::file::FileType;

use std::borrow::Cow;

/// Alias for `Result<T, LoftyError>`
pub type Result<T> = std::result::Result<T, LoftyError>;

/// Controls how strictly a decoder enforces the format it parses.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ParsingMode {
	/// Spec violations that `BestAttempt` would tolerate are promoted to hard errors.
	Strict,
	/// Spec violations are tolerated where a reasonable fallback exists. Default.
	BestAttempt,
	/// Tolerates even more than [`ParsingMode::BestAttempt`], skipping checks that have any
	/// reasonable fallback at all.
	Relaxed,
}

impl Default for ParsingMode {
	fn default() -> Self {
		Self::BestAttempt
	}
}

/// Options controlling how much of a file is read, and how strictly.
#[derive(Copy, Clone, Debug)]
pub struct ParseOptions {
	pub(crate) read_properties: bool,
	pub(crate) parsing_mode: ParsingMode,
}

impl Default for ParseOptions {
	fn default() -> Self {
		Self {
			read_properties: true,
			parsing_mode: ParsingMode::BestAttempt,
		}
	}
}

impl ParseOptions {
	/// Create a new, default set of parsing options
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether to read the audio properties in addition to tags. Defaults to `true`.
	pub fn read_properties(mut self, read_properties: bool) -> Self {
		self.read_properties = read_properties;
		self
	}

	/// How strictly to enforce the format's rules. Defaults to [`ParsingMode::BestAttempt`].
	pub fn parsing_mode(mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		self
	}
}

/// An error tied to a specific file's decoding, rather than to the crate in general.
#[derive(Debug)]
pub struct FileDecodingError {
	file_type: FileType,
	reason: Cow<'static, str>,
}

impl FileDecodingError {
	/// Create a new `FileDecodingError`
	pub fn new(file_type: FileType, reason: &'static str) -> Self {
		Self {
			file_type,
			reason: Cow::Borrowed(reason),
		}
	}

	/// Create a new `FileDecodingError` from an owned string, with no specific [`FileType`]
	pub(crate) fn from_description(reason: impl Into<Cow<'static, str>>) -> Self {
		Self {
			file_type: FileType::MP3,
			reason: reason.into(),
		}
	}

	/// The [`FileType`] the error occurred in
	pub fn file_type(&self) -> &FileType {
		&self.file_type
	}
}

impl std::fmt::Display for FileDecodingError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?} file: {}", self.file_type, self.reason)
	}
}

impl std::error::Error for FileDecodingError {}

/// Errors that could occur within this crate.
#[derive(thiserror::Error, Debug)]
pub enum LoftyError {
	/// Unable to guess the format from either extension or content
	#[error("No format could be determined from the provided file")]
	UnknownFormat,
	/// Recognized, but explicitly out of scope
	#[error("Unsupported format: {0}")]
	UnsupportedFormat(String),
	/// Provided an empty file
	#[error("File contains no data")]
	EmptyFile,
	/// A synchronization pattern or signature was not found within the search window
	#[error("Unable to find a header/signature within range")]
	HeaderNotFound,
	/// Failed to interpret bytes as a picture
	#[error("Data does not represent a supported picture format")]
	NotAPicture,
	/// A picture declared a MIME type this crate doesn't understand
	#[error("Unsupported mime type: {0}")]
	UnsupportedMimeType(String),
	/// A `save`/write operation was requested; writing is modeled at the interface level only
	#[error("This operation is not implemented")]
	NotImplemented,

	/// A failure specific to one file's contents, see [`FileDecodingError`]
	#[error(transparent)]
	Decode(#[from] FileDecodingError),

	/// A string wasn't valid UTF-8
	#[error(transparent)]
	Utf8(#[from] std::str::Utf8Error),
	/// A byte buffer wasn't valid UTF-8
	#[error(transparent)]
	FromUtf8(#[from] std::string::FromUtf8Error),
	/// Any `std::io::Error`
	#[error(transparent)]
	#[allow(clippy::upper_case_acronyms)]
	IO(#[from] std::io::Error),
}
