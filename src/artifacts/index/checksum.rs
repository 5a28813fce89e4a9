use crate::artifacts::index::CHECKSUM_SIZE;
use anyhow::Context;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{Read, Write};

/// Stream over the index file that hashes every byte passing through it
///
/// The last [`CHECKSUM_SIZE`] bytes of the file are the SHA-1 of everything
/// before them.
#[derive(Debug)]
pub struct HashedStream<S> {
    stream: S,
    digest: Sha1,
}

impl<S> HashedStream<S> {
    pub(crate) fn new(stream: S) -> Self {
        HashedStream {
            stream,
            digest: Sha1::new(),
        }
    }

    fn digest(&self) -> [u8; CHECKSUM_SIZE] {
        self.digest.clone().finalize().into()
    }
}

impl<S: Read> HashedStream<S> {
    pub(crate) fn read_bytes(&mut self, size: usize) -> anyhow::Result<Bytes> {
        let mut buffer = vec![0; size];
        self.stream
            .read_exact(&mut buffer)
            .with_context(|| format!("index ended before {size} more bytes"))?;
        self.digest.update(&buffer);

        Ok(Bytes::from(buffer))
    }

    /// Read the trailer and compare it with the digest of everything read
    pub(crate) fn verify_trailer(mut self) -> anyhow::Result<()> {
        let digest = self.digest();
        let mut trailer = [0u8; CHECKSUM_SIZE];
        self.stream
            .read_exact(&mut trailer)
            .context("index has no checksum trailer")?;

        anyhow::ensure!(trailer == digest, "index checksum does not match its content");
        Ok(())
    }
}

impl<S: Write> HashedStream<S> {
    pub(crate) fn write_bytes(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.stream.write_all(data)?;
        self.digest.update(data);

        Ok(())
    }

    /// Append the trailer and hand the stream back
    pub(crate) fn finish(mut self) -> anyhow::Result<S> {
        let digest = self.digest();
        self.stream
            .write_all(&digest)
            .context("unable to write the index checksum")?;
        self.stream.flush()?;

        Ok(self.stream)
    }
}
