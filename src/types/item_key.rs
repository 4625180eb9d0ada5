/// A format-independent identifier for a piece of metadata.
///
/// Every concrete tag type (ID3v2, Vorbis-Comment, MP4 ilst, APEv2) maps a subset of its native
/// keys to and from this enum. It exists purely as a convenience layer on top of each format's
/// native key space; native keys remain reachable through each tag's own accessors.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[allow(missing_docs)]
pub enum ItemKey {
	Title,
	TrackArtist,
	AlbumTitle,
	AlbumArtist,
	TrackNumber,
	TrackTotal,
	DiscNumber,
	DiscTotal,
	Genre,
	Year,
	RecordingDate,
	Comment,
	Composer,
	Conductor,
	Lyricist,
	Lyrics,
	EncodedBy,
	Encoder,
	Bpm,
	Copyright,
	Language,
	AlbumArtistSortOrder,
	TrackTitleSortOrder,
	OriginalAlbumTitle,
	OriginalArtist,
	OriginalReleaseDate,
	Isrc,
	CoverArtFront,
	CoverArtBack,
	/// A key with no `ItemKey` mapping; `mapping_key` is the originating native key
	Unknown(String),
}

impl ItemKey {
	/// Map this key to the 3/4-character frame id used by ID3v2
	pub fn map_id3v2(&self) -> Option<&'static str> {
		match self {
			Self::Title => Some("TIT2"),
			Self::TrackArtist => Some("TPE1"),
			Self::AlbumTitle => Some("TALB"),
			Self::AlbumArtist => Some("TPE2"),
			Self::TrackNumber => Some("TRCK"),
			Self::DiscNumber => Some("TPOS"),
			Self::Genre => Some("TCON"),
			Self::Year => Some("TYER"),
			Self::RecordingDate => Some("TDRC"),
			Self::Comment => Some("COMM"),
			Self::Composer => Some("TCOM"),
			Self::Conductor => Some("TPE3"),
			Self::Lyricist => Some("TEXT"),
			Self::Lyrics => Some("USLT"),
			Self::EncodedBy => Some("TENC"),
			Self::Encoder => Some("TSSE"),
			Self::Bpm => Some("TBPM"),
			Self::Copyright => Some("TCOP"),
			Self::Language => Some("TLAN"),
			Self::Isrc => Some("TSRC"),
			Self::CoverArtFront | Self::CoverArtBack => Some("APIC"),
			_ => None,
		}
	}

	/// Map this key to the upper-case Vorbis-Comment key
	pub fn map_vorbis(&self) -> Option<&'static str> {
		match self {
			Self::Title => Some("TITLE"),
			Self::TrackArtist => Some("ARTIST"),
			Self::AlbumTitle => Some("ALBUM"),
			Self::AlbumArtist => Some("ALBUMARTIST"),
			Self::TrackNumber => Some("TRACKNUMBER"),
			Self::TrackTotal => Some("TRACKTOTAL"),
			Self::DiscNumber => Some("DISCNUMBER"),
			Self::DiscTotal => Some("DISCTOTAL"),
			Self::Genre => Some("GENRE"),
			Self::RecordingDate | Self::Year => Some("DATE"),
			Self::Comment => Some("COMMENT"),
			Self::Composer => Some("COMPOSER"),
			Self::Conductor => Some("CONDUCTOR"),
			Self::Copyright => Some("COPYRIGHT"),
			Self::Isrc => Some("ISRC"),
			Self::EncodedBy | Self::Encoder => Some("ENCODEDBY"),
			_ => None,
		}
	}

	/// Map this key to the four-byte iTunes atom code used by MP4's `ilst`
	pub fn map_mp4(&self) -> Option<&'static str> {
		match self {
			Self::Title => Some("\u{a9}nam"),
			Self::TrackArtist => Some("\u{a9}ART"),
			Self::AlbumTitle => Some("\u{a9}alb"),
			Self::AlbumArtist => Some("aART"),
			Self::Genre => Some("\u{a9}gen"),
			Self::Year | Self::RecordingDate => Some("\u{a9}day"),
			Self::Comment => Some("\u{a9}cmt"),
			Self::Composer => Some("\u{a9}wrt"),
			Self::Encoder => Some("\u{a9}too"),
			Self::TrackNumber | Self::TrackTotal => Some("trkn"),
			Self::DiscNumber | Self::DiscTotal => Some("disk"),
			Self::CoverArtFront | Self::CoverArtBack => Some("covr"),
			Self::Bpm => Some("tmpo"),
			Self::Copyright => Some("cprt"),
			_ => None,
		}
	}
}
