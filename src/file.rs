use crate::error::{ParseOptions, Result};
use crate::flac::FlacFile;
use crate::mp3::Mp3File;
use crate::mp4::Mp4File;
use crate::ogg::VorbisFile;
use crate::properties::FileProperties;
use crate::tag::Tag;

use std::io::{Read, Seek};

/// The concrete format a [`Probe`](crate::probe::Probe) determined for a file.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FileType {
	/// MPEG layer I/II/III audio, with optional ID3v1/ID3v2/APEv2 tags
	MP3,
	/// Native FLAC, with optional leading ID3v2 and METADATA_BLOCK tags
	FLAC,
	/// Ogg-encapsulated Vorbis I audio
	Vorbis,
	/// ISO Base Media File Format carrying AAC or ALAC audio
	MP4,
}

/// Shared behavior of every concrete file type.
pub trait AudioFile: Sized {
	/// The error type returned by this file's decoder
	type Error: From<std::io::Error>;

	/// Decode `reader` according to `parse_options`
	fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> std::result::Result<Self, Self::Error>
	where
		R: Read + Seek;

	/// The decoded audio properties
	fn properties(&self) -> &FileProperties;

	/// Whether any tag container was found
	fn has_tag(&self) -> bool;
}

/// A decoded file whose concrete format is known only at runtime, as produced by
/// [`crate::probe::Probe`].
pub enum TaggedFile {
	/// An MP3 file
	Mp3(Mp3File),
	/// A FLAC file
	Flac(FlacFile),
	/// An Ogg Vorbis file
	Vorbis(VorbisFile),
	/// An MP4/M4A file
	Mp4(Mp4File),
}

impl TaggedFile {
	/// The concrete [`FileType`] this was decoded as
	pub fn file_type(&self) -> FileType {
		match self {
			Self::Mp3(_) => FileType::MP3,
			Self::Flac(_) => FileType::FLAC,
			Self::Vorbis(_) => FileType::Vorbis,
			Self::Mp4(_) => FileType::MP4,
		}
	}

	/// The decoded audio properties, regardless of concrete format
	pub fn properties(&self) -> &FileProperties {
		match self {
			Self::Mp3(f) => f.properties(),
			Self::Flac(f) => f.properties(),
			Self::Vorbis(f) => f.properties(),
			Self::Mp4(f) => f.properties(),
		}
	}

	/// The primary tag, if one was found. For MP3 this prefers ID3v2 over APEv2 over ID3v1.
	pub fn primary_tag(&self) -> Option<&Tag> {
		match self {
			Self::Mp3(f) => f.primary_tag(),
			Self::Flac(f) => f.vorbis_tag(),
			Self::Vorbis(f) => f.vorbis_tag(),
			Self::Mp4(f) => f.ilst_tag(),
		}
	}
}

/// Write-side options, modeled at the interface level only; `save_to` always returns
/// [`crate::error::LoftyError::NotImplemented`].
#[derive(Copy, Clone, Debug, Default)]
pub struct WriteOptions {
	/// Padding to leave after the tag, in bytes
	pub padding: u32,
}

/// Persist `tag` into `file`'s container, preserving audio payload bytes.
///
/// This is not implemented; the signature exists so the write-side contract described by the
/// surrounding specification has a concrete, testable shape.
pub fn save_to<W: std::io::Write + std::io::Seek>(
	_file: &mut W,
	_tag: &Tag,
	_options: WriteOptions,
) -> Result<()> {
	Err(crate::error::LoftyError::NotImplemented)
}
