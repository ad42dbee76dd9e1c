//! Content decoding.
//!
//! The transport layer hands the request object raw wire bytes; when
//! the response declares `content-encoding: gzip` on the socket
//! transport the request object routes those bytes through
//! [`GzipDecoder`](gzip::GzipDecoder) before accumulation. Bridge
//! responses arrive pre-decoded by the host platform and never pass
//! through here.

pub mod gzip;

pub use gzip::GzipDecoder;

use crate::base::neterror::NetError;

/// The pipeline stage between transport chunks and the accumulation
/// buffer: either a pass-through or a gzip decode.
pub enum BodyDecoder {
    Identity(Vec<u8>),
    Gzip(GzipDecoder),
}

impl BodyDecoder {
    pub fn identity() -> Self {
        BodyDecoder::Identity(Vec::new())
    }

    pub fn gzip() -> Self {
        BodyDecoder::Gzip(GzipDecoder::new())
    }

    /// Feed one raw chunk.
    pub fn write(&mut self, chunk: &[u8]) -> Result<(), NetError> {
        match self {
            BodyDecoder::Identity(buf) => {
                buf.extend_from_slice(chunk);
                Ok(())
            }
            BodyDecoder::Gzip(dec) => dec.write(chunk),
        }
    }

    /// Finalize and take the decoded body.
    pub fn finish(self) -> Result<Vec<u8>, NetError> {
        match self {
            BodyDecoder::Identity(buf) => Ok(buf),
            BodyDecoder::Gzip(dec) => dec.finish(),
        }
    }
}
