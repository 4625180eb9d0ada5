mod properties;

use crate::error::{LoftyError, ParseOptions, ParsingMode, Result};
use crate::file::{AudioFile, FileType};
use crate::id3::v2;
use crate::picture::Picture;
use crate::properties::FileProperties;
use crate::tag::Tag;
use crate::vorbis_comments;

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

pub(crate) use properties::StreamInfo;

const STREAMINFO: u8 = 0;
const PADDING: u8 = 1;
const APPLICATION: u8 = 2;
const SEEKTABLE: u8 = 3;
const VORBIS_COMMENT: u8 = 4;
const CUESHEET: u8 = 5;
const PICTURE: u8 = 6;

/// A decoded FLAC file
pub struct FlacFile {
	id3v2_tag: Option<Tag>,
	vorbis_tag: Option<Tag>,
	stream_info: StreamInfo,
	properties: FileProperties,
}

impl FlacFile {
	/// The Vorbis-Comment tag, if one was present
	pub fn vorbis_tag(&self) -> Option<&Tag> {
		self.vorbis_tag.as_ref()
	}

	/// A leading ID3v2 tag, if a (non-conformant, but common) one was present
	pub fn id3v2_tag(&self) -> Option<&Tag> {
		self.id3v2_tag.as_ref()
	}

	/// The STREAMINFO block
	pub fn stream_info(&self) -> &StreamInfo {
		&self.stream_info
	}
}

impl AudioFile for FlacFile {
	type Error = LoftyError;

	fn read_from<R>(reader: &mut R, options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
	{
		// Some encoders write an ID3v2 tag before the "fLaC" signature despite it not being part
		// of the spec; tolerate it the way widely-used decoders do.
		let id3v2_tag = v2::read_from(reader, options)?;

		let mut signature = [0u8; 4];
		reader.read_exact(&mut signature)?;
		if &signature != b"fLaC" {
			return Err(crate::error::FileDecodingError::new(FileType::FLAC, "FLAC signature not found").into());
		}

		let mut stream_info = None;
		let mut vorbis_tag = None;
		let mut pictures = Vec::new();
		let mut seektable_size = None;

		loop {
			let block_header = reader.read_u8()?;
			let last_block = block_header & 0x80 != 0;
			let block_type = block_header & 0x7F;
			let block_len = reader.read_uint::<BigEndian>(3)? as u32;

			match block_type {
				t if t == STREAMINFO => {
					if stream_info.is_some() {
						log_or_err(options.parsing_mode, "duplicate STREAMINFO block")?;
					}
					stream_info = Some(properties::read_streaminfo(reader)?);
				},
				t if t == VORBIS_COMMENT => {
					if vorbis_tag.is_some() {
						log_or_err(options.parsing_mode, "duplicate VORBIS_COMMENT block")?;
						skip(reader, block_len)?;
					} else {
						let (_vendor, tag) = vorbis_comments::read(reader, options.parsing_mode)?;
						vorbis_tag = Some(tag);
					}
				},
				t if t == PICTURE => {
					let mut buf = vec![0u8; block_len as usize];
					reader.read_exact(&mut buf)?;
					match Picture::from_flac_bytes(&buf) {
						Ok(picture) => pictures.push(picture),
						Err(err) => log::warn!("skipping malformed PICTURE block: {err}"),
					}
				},
				t if t == SEEKTABLE => {
					if block_len % 18 != 0 {
						log_or_err(options.parsing_mode, "SEEKTABLE length not a multiple of 18")?;
					}
					seektable_size = Some(block_len);
					skip(reader, block_len)?;
				},
				t if t == PADDING || t == APPLICATION || t == CUESHEET => {
					skip(reader, block_len)?;
				},
				_ => {
					log::debug!("skipping reserved FLAC metadata block type {block_type}");
					skip(reader, block_len)?;
				},
			}

			if last_block {
				break;
			}
		}

		let mut stream_info = stream_info
			.ok_or_else(|| crate::error::FileDecodingError::new(FileType::FLAC, "missing STREAMINFO block"))?;
		stream_info.seektable_size = seektable_size;

		let mut tag = vorbis_tag.unwrap_or_else(|| Tag::new(crate::tag::TagType::VorbisComments));
		for picture in pictures {
			tag.push_picture(picture);
		}
		let vorbis_tag = if tag.is_empty() { None } else { Some(tag) };

		let properties = if options.read_properties {
			properties::to_file_properties(&stream_info)
		} else {
			FileProperties::default()
		};

		Ok(Self {
			id3v2_tag,
			vorbis_tag,
			stream_info,
			properties,
		})
	}

	fn properties(&self) -> &FileProperties {
		&self.properties
	}

	fn has_tag(&self) -> bool {
		self.vorbis_tag.is_some() || self.id3v2_tag.is_some()
	}
}

fn skip<R: Read + Seek>(reader: &mut R, len: u32) -> Result<()> {
	reader.seek(SeekFrom::Current(i64::from(len)))?;
	Ok(())
}

fn log_or_err(parsing_mode: ParsingMode, message: &'static str) -> Result<()> {
	if parsing_mode == ParsingMode::Strict {
		return Err(crate::error::FileDecodingError::new(FileType::FLAC, message).into());
	}
	log::warn!("{message}");
	Ok(())
}
