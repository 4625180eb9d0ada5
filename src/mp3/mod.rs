pub(crate) mod header;
mod properties;

use crate::ape;
use crate::error::{LoftyError, ParseOptions, Result};
use crate::file::AudioFile;
use crate::id3::v1;
use crate::id3::v2;
use crate::properties::FileProperties;
use crate::tag::Tag;

use std::io::{Read, Seek, SeekFrom};

/// A decoded MP3 (MPEG layer I/II/III) file
pub struct Mp3File {
	id3v2_tag: Option<Tag>,
	ape_tag: Option<Tag>,
	id3v1_tag: Option<Tag>,
	properties: FileProperties,
}

impl Mp3File {
	/// The ID3v2 tag, if one was present
	pub fn id3v2_tag(&self) -> Option<&Tag> {
		self.id3v2_tag.as_ref()
	}

	/// The APEv2 tag, if one was present
	pub fn ape_tag(&self) -> Option<&Tag> {
		self.ape_tag.as_ref()
	}

	/// The ID3v1 tag, if one was present
	pub fn id3v1_tag(&self) -> Option<&Tag> {
		self.id3v1_tag.as_ref()
	}

	/// The tag preferred for format-independent access: ID3v2, falling back to APEv2, falling
	/// back to ID3v1.
	pub fn primary_tag(&self) -> Option<&Tag> {
		self.id3v2_tag
			.as_ref()
			.or(self.ape_tag.as_ref())
			.or(self.id3v1_tag.as_ref())
	}
}

impl AudioFile for Mp3File {
	type Error = LoftyError;

	fn read_from<R>(reader: &mut R, options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
	{
		let start = reader.stream_position()?;
		let file_len = reader.seek(SeekFrom::End(0))?;
		if file_len == 0 {
			return Err(LoftyError::EmptyFile);
		}
		reader.seek(SeekFrom::Start(start))?;

		let id3v2_tag = v2::read_from(reader, options)?;

		let (first_frame_pos, first_header) = header::search_for_frame_sync(reader)?
			.ok_or_else(|| crate::error::FileDecodingError::new(crate::file::FileType::MP3, "No MPEG frame sync found"))?;

		let ape_tag = ape::read(reader)?;
		let id3v1_tag = v1::read(reader)?;

		let properties = if options.read_properties {
			// Trailing tags (APEv2/ID3v1) sit after the audio; treat whichever starts earliest
			// as the end of the audio region for the frame-count-less duration estimate.
			let mut audio_end = file_len;
			if id3v1_tag.is_some() {
				audio_end = audio_end.saturating_sub(128);
			}

			properties::read_properties(reader, first_frame_pos, &first_header, audio_end)?
		} else {
			FileProperties::default()
		};

		Ok(Self {
			id3v2_tag,
			ape_tag,
			id3v1_tag,
			properties,
		})
	}

	fn properties(&self) -> &FileProperties {
		&self.properties
	}

	fn has_tag(&self) -> bool {
		self.id3v2_tag.is_some() || self.ape_tag.is_some() || self.id3v1_tag.is_some()
	}
}
