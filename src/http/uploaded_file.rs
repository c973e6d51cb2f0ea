//! A single file received through a `multipart/form-data` upload.

use std::fs::File;
use std::io::{self, Seek};
use std::path::Path;

use tracing::debug;

use crate::error::{MessageError, MessageResult};
use crate::http::stream::{MemoryStream, Stream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Ok,
    /// The part was larger than the configured per-file limit; no bytes
    /// were kept.
    ExceedsSizeLimit,
    /// The part ended before its closing boundary.
    Partial,
}

#[derive(Debug)]
pub struct UploadedFile {
    client_filename: String,
    client_media_type: String,
    size: u64,
    status: UploadStatus,
    stream: Option<Box<dyn Stream>>,
}

impl UploadedFile {
    pub fn new(
        client_filename: &str,
        client_media_type: &str,
        stream: Box<dyn Stream>,
        status: UploadStatus,
    ) -> Self {
        Self {
            client_filename: client_filename.to_string(),
            client_media_type: client_media_type.to_string(),
            size: stream.size().unwrap_or(0),
            status,
            stream: Some(stream),
        }
    }

    pub fn from_bytes(client_filename: &str, client_media_type: &str, bytes: Vec<u8>) -> Self {
        Self::new(
            client_filename,
            client_media_type,
            Box::new(MemoryStream::from(bytes)),
            UploadStatus::Ok,
        )
    }

    /// Filename sent by the client. Not trustworthy as a path.
    pub fn client_filename(&self) -> &str {
        &self.client_filename
    }

    pub fn client_media_type(&self) -> &str {
        &self.client_media_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    pub fn is_moved(&self) -> bool {
        self.stream.is_none()
    }

    pub fn stream(&mut self) -> MessageResult<&mut dyn Stream> {
        match self.stream.as_mut() {
            Some(stream) => Ok(stream.as_mut()),
            None => Err(MessageError::UploadMoved),
        }
    }

    /// Writes the file to `path` and releases the stream. Can only be done
    /// once.
    pub fn move_to(&mut self, path: impl AsRef<Path>) -> MessageResult<()> {
        let path = path.as_ref();
        let stream = self.stream.as_mut().ok_or(MessageError::UploadMoved)?;

        stream.seek(io::SeekFrom::Start(0))?;
        let mut file = File::create(path)?;
        io::copy(stream.as_mut(), &mut file)?;

        if let Some(mut stream) = self.stream.take() {
            stream.close()?;
        }
        debug!(path = %path.display(), size = self.size, "uploaded file moved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_and_contents() {
        let mut file = UploadedFile::from_bytes("notes.txt", "text/plain", b"hi".to_vec());
        assert_eq!(file.client_filename(), "notes.txt");
        assert_eq!(file.client_media_type(), "text/plain");
        assert_eq!(file.size(), 2);
        assert_eq!(file.status(), UploadStatus::Ok);
        assert_eq!(file.stream().unwrap().contents().unwrap(), b"hi");
    }

    #[test]
    fn move_to_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");

        let mut file = UploadedFile::from_bytes("a.bin", "application/octet-stream", vec![1, 2, 3]);
        file.move_to(&target).unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), [1, 2, 3]);

        assert!(file.is_moved());
        assert!(matches!(file.move_to(&target), Err(MessageError::UploadMoved)));
        assert!(matches!(file.stream(), Err(MessageError::UploadMoved)));
    }
}
