//! Message body streams.
//!
//! A body is any seekable byte sequence implementing [`Stream`]. Messages
//! start with an empty [`MemoryStream`]; larger payloads can be backed by a
//! [`FileStream`], including anonymous temporary files.

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

pub trait Stream: Read + Write + Seek + Send + fmt::Debug {
    /// Size in bytes, if known.
    fn size(&self) -> Option<u64>;

    /// Releases the underlying resource. Further I/O fails.
    fn close(&mut self) -> io::Result<()>;

    fn is_closed(&self) -> bool;

    /// Reads up to `n` bytes from the current position.
    fn read_bytes(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        Read::take(&mut *self, n as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Rewinds and reads the whole stream, leaving the position at the end.
    fn contents(&mut self) -> io::Result<Vec<u8>> {
        self.seek(SeekFrom::Start(0))?;
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

fn closed() -> io::Error {
    io::Error::other("stream is closed")
}

/// In-memory, growable stream. The default message body.
#[derive(Debug, Default)]
pub struct MemoryStream {
    inner: Cursor<Vec<u8>>,
    closed: bool,
}

impl MemoryStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

impl From<Vec<u8>> for MemoryStream {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            inner: Cursor::new(bytes),
            closed: false,
        }
    }
}

impl From<&str> for MemoryStream {
    fn from(s: &str) -> Self {
        Self::from(s.as_bytes().to_vec())
    }
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.closed {
            return Err(closed());
        }
        self.inner.read(buf)
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.closed {
            return Err(closed());
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for MemoryStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        if self.closed {
            return Err(closed());
        }
        self.inner.seek(pos)
    }
}

impl Stream for MemoryStream {
    fn size(&self) -> Option<u64> {
        if self.closed {
            return None;
        }
        Some(self.inner.get_ref().len() as u64)
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        self.inner = Cursor::new(Vec::new());
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// File-backed stream. The file handle is released on [`close`](Stream::close)
/// or when the stream is dropped, whichever comes first.
#[derive(Debug)]
pub struct FileStream {
    file: Option<File>,
}

impl FileStream {
    pub fn new(file: File) -> Self {
        Self { file: Some(file) }
    }

    /// An anonymous temporary file, removed by the OS once closed.
    pub fn temp() -> io::Result<Self> {
        Ok(Self::new(tempfile::tempfile()?))
    }

    fn file(&mut self) -> io::Result<&mut File> {
        self.file.as_mut().ok_or_else(closed)
    }
}

impl Read for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file()?.read(buf)
    }
}

impl Write for FileStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file()?.flush()
    }
}

impl Seek for FileStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file()?.seek(pos)
    }
}

impl Stream for FileStream {
    fn size(&self) -> Option<u64> {
        let file = self.file.as_ref()?;
        file.metadata().ok().map(|m| m.len())
    }

    fn close(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.file.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_stream_reads_back_writes() {
        let mut s = MemoryStream::new();
        assert_eq!(s.size(), Some(0));
        s.write_all(b"hello world").unwrap();
        assert_eq!(s.size(), Some(11));

        s.seek(SeekFrom::Start(6)).unwrap();
        assert_eq!(s.read_bytes(5).unwrap(), b"world");
        assert_eq!(s.contents().unwrap(), b"hello world");
    }

    #[test]
    fn read_bytes_stops_at_end() {
        let mut s = MemoryStream::from("abc");
        assert_eq!(s.read_bytes(10).unwrap(), b"abc");
        assert!(s.read_bytes(10).unwrap().is_empty());
    }

    #[test]
    fn read_bytes_with_huge_limit() {
        let mut s = MemoryStream::from("abc");
        assert_eq!(s.read_bytes(usize::MAX / 2).unwrap(), b"abc");
    }

    #[test]
    fn closed_memory_stream_refuses_io() {
        let mut s = MemoryStream::from("abc");
        s.close().unwrap();
        assert!(s.is_closed());
        assert_eq!(s.size(), None);
        assert!(s.read_bytes(1).is_err());
        assert!(s.write(b"x").is_err());
    }

    #[test]
    fn temp_file_stream_round_trip() {
        let mut s = FileStream::temp().unwrap();
        s.write_all(b"on disk").unwrap();
        assert_eq!(s.size(), Some(7));
        assert_eq!(s.contents().unwrap(), b"on disk");

        s.close().unwrap();
        assert!(s.is_closed());
        assert_eq!(s.size(), None);
        assert!(s.seek(SeekFrom::Start(0)).is_err());
    }
}
