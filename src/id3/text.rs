use crate::error::Result;

/// The text-encoding byte that leads every ID3v2 text/comment frame body
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Encoding {
	Latin1,
	Utf16Bom,
	Utf16Be,
	Utf8,
}

impl Encoding {
	pub(crate) fn from_byte(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::Latin1),
			1 => Some(Self::Utf16Bom),
			2 => Some(Self::Utf16Be),
			3 => Some(Self::Utf8),
			_ => None,
		}
	}
}

/// Decode a single encoded string, stopping at the first null terminator appropriate to the
/// encoding's code unit width (one zero byte for Latin-1/UTF-8, a zero code unit for UTF-16).
pub(crate) fn decode_text(bytes: &[u8], encoding: Encoding) -> Result<String> {
	Ok(match encoding {
		Encoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
		Encoding::Utf8 => {
			let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
			std::str::from_utf8(&bytes[..end])?.to_string()
		},
		Encoding::Utf16Bom | Encoding::Utf16Be => decode_utf16(bytes, encoding == Encoding::Utf16Bom),
	})
}

/// Split a frame body on null separators appropriate to `encoding`, decoding each component.
/// Trailing empty components are dropped, matching real-world encoder quirks where a final
/// separator is written with nothing following it.
pub(crate) fn decode_text_multi(bytes: &[u8], encoding: Encoding) -> Result<Vec<String>> {
	let chunks: Vec<&[u8]> = match encoding {
		Encoding::Latin1 | Encoding::Utf8 => bytes.split(|&b| b == 0).collect(),
		Encoding::Utf16Bom | Encoding::Utf16Be => split_utf16_nul(bytes),
	};

	let mut out = Vec::with_capacity(chunks.len());
	for chunk in chunks {
		if chunk.is_empty() {
			continue;
		}
		out.push(decode_text(chunk, encoding)?);
	}

	Ok(out)
}

fn split_utf16_nul(bytes: &[u8]) -> Vec<&[u8]> {
	let mut parts = Vec::new();
	let mut start = 0;
	let mut i = 0;

	while i + 1 < bytes.len() {
		if bytes[i] == 0 && bytes[i + 1] == 0 {
			parts.push(&bytes[start..i]);
			start = i + 2;
			i += 2;
			continue;
		}
		i += 2;
	}
	if start < bytes.len() {
		parts.push(&bytes[start..]);
	}

	parts
}

fn decode_utf16(bytes: &[u8], has_bom: bool) -> String {
	let mut body = bytes;
	let mut big_endian = false;

	if has_bom && body.len() >= 2 {
		match &body[..2] {
			[0xFE, 0xFF] => {
				big_endian = true;
				body = &body[2..];
			},
			[0xFF, 0xFE] => {
				body = &body[2..];
			},
			_ => {},
		}
	} else {
		// UTF16BE frames (encoding byte 2) carry no BOM
		big_endian = true;
	}

	let units: Vec<u16> = body
		.chunks_exact(2)
		.map(|pair| {
			if big_endian {
				u16::from_be_bytes([pair[0], pair[1]])
			} else {
				u16::from_le_bytes([pair[0], pair[1]])
			}
		})
		.take_while(|&unit| unit != 0)
		.collect();

	String::from_utf16_lossy(&units)
}

/// Decode the genre stored as `"(nn)"`, `"(nn)Refinement"`, or plain free text, returning the
/// resolved genre name. Indices above the defined table pass through unresolved.
pub(crate) fn decode_genre(raw: &str) -> String {
	if let Some(stripped) = raw.strip_prefix('(') {
		if let Some(close) = stripped.find(')') {
			let (num, rest) = stripped.split_at(close);
			let rest = &rest[1..];
			if let Ok(index) = num.parse::<usize>() {
				if let Some(name) = ID3V1_GENRES.get(index) {
					return if rest.is_empty() {
						(*name).to_string()
					} else {
						rest.to_string()
					};
				}
			}
		}
	}

	raw.to_string()
}

/// The 148-entry ID3v1 genre table (indices 0-79 are the original Winamp set, 80+ are later
/// extensions that most encoders still honor).
pub(crate) const ID3V1_GENRES: &[&str] = &[
	"Blues", "Classic Rock", "Country", "Dance", "Disco", "Funk", "Grunge", "Hip-Hop", "Jazz",
	"Metal", "New Age", "Oldies", "Other", "Pop", "R&B", "Rap", "Reggae", "Rock", "Techno",
	"Industrial", "Alternative", "Ska", "Death Metal", "Pranks", "Soundtrack", "Euro-Techno",
	"Ambient", "Trip-Hop", "Vocal", "Jazz+Funk", "Fusion", "Trance", "Classical", "Instrumental",
	"Acid", "House", "Game", "Sound Clip", "Gospel", "Noise", "AlternRock", "Bass", "Soul",
	"Punk", "Space", "Meditative", "Instrumental Pop", "Instrumental Rock", "Ethnic", "Gothic",
	"Darkwave", "Techno-Industrial", "Electronic", "Pop-Folk", "Eurodance", "Dream",
	"Southern Rock", "Comedy", "Cult", "Gangsta", "Top 40", "Christian Rap", "Pop/Funk", "Jungle",
	"Native American", "Cabaret", "New Wave", "Psychedelic", "Rave", "Showtunes", "Trailer",
	"Lo-Fi", "Tribal", "Acid Punk", "Acid Jazz", "Polka", "Retro", "Musical", "Rock & Roll",
	"Hard Rock", "Folk", "Folk-Rock", "National Folk", "Swing", "Fast Fusion", "Bebop", "Latin",
	"Revival", "Celtic", "Bluegrass", "Avantgarde", "Gothic Rock", "Progressive Rock",
	"Psychedelic Rock", "Symphonic Rock", "Slow Rock", "Big Band", "Chorus", "Easy Listening",
	"Acoustic", "Humour", "Speech", "Chanson", "Opera", "Chamber Music", "Sonata", "Symphony",
	"Booty Bass", "Primus", "Porn Groove", "Satire", "Slow Jam", "Club", "Tango", "Samba",
	"Folklore", "Ballad", "Power Ballad", "Rhythmic Soul", "Freestyle", "Duet", "Punk Rock",
	"Drum Solo", "A Cappella", "Euro-House", "Dance Hall",
];
