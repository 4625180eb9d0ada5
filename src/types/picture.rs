use crate::error::{LoftyError, Result};

use std::borrow::Cow;

/// The MIME type of a [`Picture`], used by FLAC, Vorbis-Comment, and ID3v2 pictures alike.
#[derive(Clone, Debug, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum MimeType {
	Png,
	Jpeg,
	Tiff,
	Bmp,
	Gif,
	/// Used when a format allows a free-form MIME string that doesn't match a known type
	Unknown(String),
	/// ID3v2 and APEv2 allow an empty/"--&gt;" MIME field meaning "see linked file"
	None,
}

impl MimeType {
	/// The string a decoder found on disk, as it would be re-encoded
	pub fn as_str(&self) -> &str {
		match self {
			Self::Png => "image/png",
			Self::Jpeg => "image/jpeg",
			Self::Tiff => "image/tiff",
			Self::Bmp => "image/bmp",
			Self::Gif => "image/gif",
			Self::Unknown(unknown) => unknown.as_str(),
			Self::None => "",
		}
	}
}

impl From<&str> for MimeType {
	fn from(mime: &str) -> Self {
		match mime {
			"image/png" => Self::Png,
			"image/jpeg" => Self::Jpeg,
			"image/tiff" => Self::Tiff,
			"image/bmp" => Self::Bmp,
			"image/gif" => Self::Gif,
			"" => Self::None,
			other => Self::Unknown(other.to_string()),
		}
	}
}

/// The semantic role a [`Picture`] plays, per the ID3v2 APIC picture-type table. FLAC and MP4
/// reuse the same numbering.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum PictureType {
	Other,
	Icon,
	OtherIcon,
	CoverFront,
	CoverBack,
	Leaflet,
	Media,
	LeadArtist,
	Artist,
	Conductor,
	Band,
	Composer,
	Lyricist,
	RecordingLocation,
	DuringRecording,
	DuringPerformance,
	ScreenCapture,
	BrightFish,
	Illustration,
	BandLogo,
	PublisherLogo,
	Undefined(u8),
}

impl PictureType {
	/// Decode the type byte used by ID3v2 APIC/PIC and FLAC PICTURE
	pub fn from_u8(byte: u8) -> Self {
		match byte {
			0 => Self::Other,
			1 => Self::Icon,
			2 => Self::OtherIcon,
			3 => Self::CoverFront,
			4 => Self::CoverBack,
			5 => Self::Leaflet,
			6 => Self::Media,
			7 => Self::LeadArtist,
			8 => Self::Artist,
			9 => Self::Conductor,
			10 => Self::Band,
			11 => Self::Composer,
			12 => Self::Lyricist,
			13 => Self::RecordingLocation,
			14 => Self::DuringRecording,
			15 => Self::DuringPerformance,
			16 => Self::ScreenCapture,
			17 => Self::BrightFish,
			18 => Self::Illustration,
			19 => Self::BandLogo,
			20 => Self::PublisherLogo,
			other => Self::Undefined(other),
		}
	}

	/// Encode back to the byte used on disk
	pub fn as_u8(&self) -> u8 {
		match self {
			Self::Other => 0,
			Self::Icon => 1,
			Self::OtherIcon => 2,
			Self::CoverFront => 3,
			Self::CoverBack => 4,
			Self::Leaflet => 5,
			Self::Media => 6,
			Self::LeadArtist => 7,
			Self::Artist => 8,
			Self::Conductor => 9,
			Self::Band => 10,
			Self::Composer => 11,
			Self::Lyricist => 12,
			Self::RecordingLocation => 13,
			Self::DuringRecording => 14,
			Self::DuringPerformance => 15,
			Self::ScreenCapture => 16,
			Self::BrightFish => 17,
			Self::Illustration => 18,
			Self::BandLogo => 19,
			Self::PublisherLogo => 20,
			Self::Undefined(byte) => *byte,
		}
	}
}

/// An embedded picture, as parsed from an ID3v2 `APIC`/`PIC` frame, a FLAC `PICTURE` block, or
/// an MP4 `covr` atom.
#[derive(Clone, Debug, PartialEq)]
pub struct Picture {
	pub(crate) pic_type: PictureType,
	pub(crate) mime_type: MimeType,
	pub(crate) description: Option<String>,
	pub(crate) data: Cow<'static, [u8]>,
}

impl Picture {
	/// Create a new `Picture`
	pub fn new(
		pic_type: PictureType,
		mime_type: MimeType,
		description: Option<String>,
		data: Vec<u8>,
	) -> Self {
		Self {
			pic_type,
			mime_type,
			description,
			data: Cow::from(data),
		}
	}

	/// Parse a FLAC `METADATA_BLOCK_PICTURE` body (identical layout to ID3v2's APIC payload
	/// minus the leading text-encoding byte)
	pub fn from_flac_bytes(bytes: &[u8]) -> Result<Self> {
		use byteorder::{BigEndian, ReadBytesExt};
		use std::io::Read;

		let mut cursor = std::io::Cursor::new(bytes);

		let pic_type = PictureType::from_u8(cursor.read_u32::<BigEndian>()? as u8);

		let mime_len = cursor.read_u32::<BigEndian>()? as usize;
		let mut mime_buf = vec![0; mime_len];
		cursor.read_exact(&mut mime_buf)?;
		let mime_type = MimeType::from(std::str::from_utf8(&mime_buf)?);

		let desc_len = cursor.read_u32::<BigEndian>()? as usize;
		let mut desc_buf = vec![0; desc_len];
		cursor.read_exact(&mut desc_buf)?;
		let description = if desc_buf.is_empty() {
			None
		} else {
			Some(String::from_utf8(desc_buf)?)
		};

		// width, height, depth, indexed color count: not retained
		let _width = cursor.read_u32::<BigEndian>()?;
		let _height = cursor.read_u32::<BigEndian>()?;
		let _depth = cursor.read_u32::<BigEndian>()?;
		let _colors = cursor.read_u32::<BigEndian>()?;

		let data_len = cursor.read_u32::<BigEndian>()? as usize;
		let mut data = vec![0; data_len];
		cursor.read_exact(&mut data)?;

		Ok(Self {
			pic_type,
			mime_type,
			description,
			data: Cow::from(data),
		})
	}

	/// The picture's semantic role
	pub fn pic_type(&self) -> &PictureType {
		&self.pic_type
	}

	/// The picture's declared MIME type
	pub fn mime_type(&self) -> &MimeType {
		&self.mime_type
	}

	/// An optional free-text description
	pub fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}

	/// The raw image bytes
	pub fn data(&self) -> &[u8] {
		&self.data
	}
}

impl TryFrom<&[u8]> for Picture {
	type Error = LoftyError;

	fn try_from(bytes: &[u8]) -> Result<Self> {
		if bytes.len() < 32 {
			return Err(LoftyError::NotAPicture);
		}

		Self::from_flac_bytes(bytes)
	}
}
