//! Fixed-boundary slicing of encoded attachment payloads

/// Default chunk size: 2 MiB of base64 text per request
pub const DEFAULT_CHUNK_SIZE: usize = 2 * 1024 * 1024;

/// One slice of the encoded payload.
///
/// Indexes are zero-based and monotonic; `is_last` is true exactly for
/// the chunk whose end offset equals the payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileChunk<'a> {
    index: usize,
    data: &'a str,
    is_last: bool,
}

impl<'a> FileChunk<'a> {
    /// Zero-based chunk index
    pub fn index(&self) -> usize {
        self.index
    }

    /// The base64 text slice carried by this chunk
    pub fn data(&self) -> &'a str {
        self.data
    }

    /// Whether this is the final chunk of the payload
    pub fn is_last(&self) -> bool {
        self.is_last
    }

    /// Slice length in characters
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the slice is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Slice an encoded payload at fixed boundaries.
///
/// Slicing happens on the encoded text, not the raw bytes — the wire
/// contract transports base64 text and reassembles it server-side.
/// Produces `ceil(len / chunk_size)` chunks whose concatenation in index
/// order is exactly `encoded`; an empty payload yields no chunks.
///
/// `encoded` must be ASCII (base64 text always is) and `chunk_size` must
/// be non-zero.
pub fn chunks(encoded: &str, chunk_size: usize) -> Vec<FileChunk<'_>> {
    assert!(chunk_size > 0, "chunk_size must be non-zero");

    let len = encoded.len();
    let total = len.div_ceil(chunk_size);

    (0..total)
        .map(|index| {
            let start = index * chunk_size;
            let end = usize::min(start + chunk_size, len);
            FileChunk {
                index,
                data: &encoded[start..end],
                is_last: index == total - 1,
            }
        })
        .collect()
}
