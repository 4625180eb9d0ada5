//! ID3v1 and ID3v2.2/2.3/2.4 tag decoding, shared by the MP3 decoder and by any container that
//! carries a leading ID3v2 tag ahead of its native signature (FLAC, in practice).

pub(crate) mod text;
pub(crate) mod util;
pub(crate) mod v1;
pub(crate) mod v2;
