use std::time::Duration;

/// A format-independent view of an audio stream's properties.
///
/// Every concrete `*Properties` type (one per format, carrying format-specific fields alongside
/// these) converts into this for use through [`crate::file::TaggedFile`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FileProperties {
	pub(crate) duration: Duration,
	pub(crate) overall_bitrate: Option<u32>,
	pub(crate) audio_bitrate: Option<u32>,
	pub(crate) sample_rate: Option<u32>,
	pub(crate) bit_depth: Option<u8>,
	pub(crate) channels: Option<u8>,
}

impl FileProperties {
	/// Create a new `FileProperties`
	pub const fn new(
		duration: Duration,
		overall_bitrate: Option<u32>,
		audio_bitrate: Option<u32>,
		sample_rate: Option<u32>,
		channels: Option<u8>,
	) -> Self {
		Self {
			duration,
			overall_bitrate,
			audio_bitrate,
			sample_rate,
			bit_depth: None,
			channels,
		}
	}

	/// Duration of the audio stream
	pub fn duration(&self) -> Duration {
		self.duration
	}

	/// Overall bitrate in kbps, audio plus any muxed-in overhead
	pub fn overall_bitrate(&self) -> Option<u32> {
		self.overall_bitrate
	}

	/// Audio-only bitrate in kbps
	pub fn audio_bitrate(&self) -> Option<u32> {
		self.audio_bitrate
	}

	/// Sample rate in Hz
	pub fn sample_rate(&self) -> Option<u32> {
		self.sample_rate
	}

	/// Channel count
	pub fn channels(&self) -> Option<u8> {
		self.channels
	}

	/// Bits per sample, when the format records one (FLAC, ALAC)
	pub fn bit_depth(&self) -> Option<u8> {
		self.bit_depth
	}
}
