use crate::error::{LoftyError, ParseOptions, Result};
use crate::file::{AudioFile, FileType, TaggedFile};
use crate::flac::FlacFile;
use crate::mp3::Mp3File;
use crate::mp4::Mp4File;
use crate::ogg::VorbisFile;

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// How large a prefix [`Probe`] reads before giving up on content-based detection.
const SCAN_WINDOW: usize = 64 * 1024;

/// Determines a file's [`FileType`] and decodes it.
///
/// Mirrors the two-pronged detection strategy real tag libraries use: an extension-based fast
/// path, falling back to signature scanning when the extension is missing, unrecognized, or the
/// caller asks for it explicitly.
pub struct Probe<R> {
	reader: R,
	file_type: Option<FileType>,
}

impl Probe<File> {
	/// Open `path`, guessing the file type from its extension and falling back to content
	/// sniffing
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
		let file = File::open(path.as_ref())?;
		let file_type = file_type_from_extension(path.as_ref());
		Ok(Self { reader: file, file_type })
	}
}

impl<R> Probe<R>
where
	R: Read + Seek,
{
	/// Wrap an existing reader with no file type guessed yet
	pub fn new(reader: R) -> Self {
		Self {
			reader,
			file_type: None,
		}
	}

	/// Explicitly set (or override) the file type, skipping detection entirely
	pub fn set_file_type(mut self, file_type: FileType) -> Self {
		self.file_type = Some(file_type);
		self
	}

	/// Read the file type from the byte content, ignoring any extension-based guess
	pub fn guess_file_type(mut self) -> Result<Self> {
		self.file_type = file_type_from_content(&mut self.reader)?;
		Ok(self)
	}

	/// Decode the file according to the guessed or overridden [`FileType`]
	pub fn read(mut self, read_properties: bool) -> Result<TaggedFile> {
		let file_type = match self.file_type {
			Some(ft) => ft,
			None => file_type_from_content(&mut self.reader)?.ok_or(LoftyError::UnknownFormat)?,
		};

		let options = ParseOptions::new().read_properties(read_properties);
		self.reader.seek(SeekFrom::Start(0))?;

		Ok(match file_type {
			FileType::MP3 => TaggedFile::Mp3(Mp3File::read_from(&mut self.reader, options)?),
			FileType::FLAC => TaggedFile::Flac(FlacFile::read_from(&mut self.reader, options)?),
			FileType::Vorbis => TaggedFile::Vorbis(VorbisFile::read_from(&mut self.reader, options)?),
			FileType::MP4 => TaggedFile::Mp4(Mp4File::read_from(&mut self.reader, options)?),
		})
	}
}

/// Guess a [`FileType`] from a path's extension
pub fn file_type_from_extension(path: &Path) -> Option<FileType> {
	let ext = path.extension()?.to_str()?.to_ascii_lowercase();
	match ext.as_str() {
		"mp3" => Some(FileType::MP3),
		"flac" => Some(FileType::FLAC),
		"ogg" | "oga" => Some(FileType::Vorbis),
		"mp4" | "m4a" | "m4b" | "m4p" | "m4r" => Some(FileType::MP4),
		_ => None,
	}
}

/// Sniff a [`FileType`] from the start (and, for MP3's ID3v1/APEv2 trailers, the end) of `reader`
pub fn file_type_from_content<R>(reader: &mut R) -> Result<Option<FileType>>
where
	R: Read + Seek,
{
	let start = reader.stream_position()?;

	let mut prefix = [0u8; 12];
	let read = read_prefix(reader, &mut prefix)?;
	reader.seek(SeekFrom::Start(start))?;

	if read == 0 {
		return Err(LoftyError::EmptyFile);
	}

	if &prefix[..3.min(read)] == b"ID3" {
		// Skip the ID3v2 header and re-probe the remainder.
		let tag_len = crate::id3::v2::peek_tag_size(reader)?;
		reader.seek(SeekFrom::Start(start + tag_len))?;
		let inner = file_type_from_content(reader)?;
		reader.seek(SeekFrom::Start(start))?;
		return Ok(Some(inner.unwrap_or(FileType::MP3)));
	}

	if read >= 4 && &prefix[..4] == b"fLaC" {
		return Ok(Some(FileType::FLAC));
	}

	if read >= 4 && &prefix[..4] == b"OggS" {
		return Ok(Some(FileType::Vorbis));
	}

	if read >= 8 && &prefix[4..8] == b"ftyp" {
		return Ok(Some(FileType::MP4));
	}

	// Bounded MPEG sync scan
	if crate::mp3::header::search_for_frame_sync_bounded(reader, SCAN_WINDOW)?.is_some() {
		reader.seek(SeekFrom::Start(start))?;
		return Ok(Some(FileType::MP3));
	}

	reader.seek(SeekFrom::Start(start))?;
	Ok(None)
}

fn read_prefix<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
	let mut total = 0;
	while total < buf.len() {
		match reader.read(&mut buf[total..]) {
			Ok(0) => break,
			Ok(n) => total += n,
			Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(e.into()),
		}
	}
	Ok(total)
}
