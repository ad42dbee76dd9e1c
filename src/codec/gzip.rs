use crate::base::neterror::NetError;
use std::io::Write;

/// Incremental gzip decoder.
///
/// Accepts raw wire chunks as they arrive and yields the decoded buffer
/// once the stream ends. A truncated or corrupt stream surfaces as
/// [`NetError::ContentDecodingFailed`].
pub struct GzipDecoder {
    inner: flate2::write::GzDecoder<Vec<u8>>,
}

impl Default for GzipDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl GzipDecoder {
    pub fn new() -> Self {
        Self { inner: flate2::write::GzDecoder::new(Vec::new()) }
    }

    /// Feed one raw chunk into the decoder.
    pub fn write(&mut self, chunk: &[u8]) -> Result<(), NetError> {
        self.inner
            .write_all(chunk)
            .map_err(|_| NetError::ContentDecodingFailed)
    }

    /// Flush the trailing gzip state and take the decoded bytes.
    pub fn finish(self) -> Result<Vec<u8>, NetError> {
        self.inner
            .finish()
            .map_err(|_| NetError::ContentDecodingFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn decodes_across_arbitrary_chunk_boundaries() {
        let wire = gzip(b"the quick brown fox jumps over the lazy dog");

        let mut dec = GzipDecoder::new();
        for chunk in wire.chunks(3) {
            dec.write(chunk).unwrap();
        }
        let out = dec.finish().unwrap();
        assert_eq!(out, b"the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn truncated_stream_fails_to_finish() {
        let wire = gzip(b"some payload worth compressing");

        let mut dec = GzipDecoder::new();
        dec.write(&wire[..wire.len() / 2]).unwrap();
        assert_eq!(dec.finish(), Err(NetError::ContentDecodingFailed));
    }
}
