#![forbid(unsafe_code)]
//! Access to the inspected process's address space.
//!
//! The debugger host owns the actual memory access; everything in this
//! crate goes through [`MemoryRead`] so snapshots can be captured from a
//! live process, a saved dump, or an in-memory fixture alike.

use std::fs::File;
use std::io::{self, ErrorKind};
use std::path::Path;

use crate::error::{ProbeError, Result};

/// Positioned reads against a remote address space.
///
/// A successful call fills `dst` completely. Short reads, unmapped
/// addresses, and a target that is running instead of stopped all
/// surface as [`ProbeError::Read`]; implementations never return
/// partially filled buffers as success.
pub trait MemoryRead {
    /// Reads `dst.len()` bytes starting at absolute address `addr`.
    fn read_at(&self, addr: u64, dst: &mut [u8]) -> Result<()>;
}

/// A captured memory image held in a byte vector.
///
/// Addresses are absolute: byte `i` of the image lives at `base + i`.
/// Used for dump files and test fixtures.
pub struct SliceReader {
    base: u64,
    bytes: Vec<u8>,
}

impl SliceReader {
    /// Wraps an image whose first byte sits at `base`.
    pub fn new(base: u64, bytes: Vec<u8>) -> Self {
        Self { base, bytes }
    }

    /// Loads an image from a dump file on disk.
    pub fn open(path: impl AsRef<Path>, base: u64) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self { base, bytes })
    }
}

impl MemoryRead for SliceReader {
    fn read_at(&self, addr: u64, dst: &mut [u8]) -> Result<()> {
        let fail = |kind: ErrorKind, msg: &str| ProbeError::Read {
            addr,
            len: dst.len(),
            source: io::Error::new(kind, msg.to_string()),
        };
        let start = addr
            .checked_sub(self.base)
            .ok_or_else(|| fail(ErrorKind::InvalidInput, "address below image base"))?;
        let end = start
            .checked_add(dst.len() as u64)
            .ok_or_else(|| fail(ErrorKind::InvalidInput, "address range overflow"))?;
        if end > self.bytes.len() as u64 {
            return Err(fail(ErrorKind::UnexpectedEof, "address beyond image end"));
        }
        dst.copy_from_slice(&self.bytes[start as usize..end as usize]);
        Ok(())
    }
}

/// Reads a live process's memory through `/proc/<pid>/mem`.
///
/// The target must be stopped (e.g. under a debugger or SIGSTOP);
/// reading a running process races with it and the kernel may refuse
/// the access outright.
#[cfg(unix)]
pub struct ProcessReader {
    pid: u32,
    mem: File,
}

#[cfg(unix)]
impl ProcessReader {
    /// Attaches to the address space of `pid`.
    ///
    /// Fails with [`ProbeError::Io`] when the process does not exist or
    /// the caller lacks ptrace-level access to it.
    pub fn attach(pid: u32) -> Result<Self> {
        let mem = File::open(format!("/proc/{pid}/mem"))?;
        Ok(Self { pid, mem })
    }

    /// The process id this reader is attached to.
    pub fn pid(&self) -> u32 {
        self.pid
    }
}

#[cfg(unix)]
impl MemoryRead for ProcessReader {
    fn read_at(&self, addr: u64, dst: &mut [u8]) -> Result<()> {
        use std::os::unix::fs::FileExt;

        let total = dst.len();
        let mut off = addr;
        let mut remaining = &mut dst[..];
        while !remaining.is_empty() {
            let read = self.mem.read_at(remaining, off).map_err(|source| {
                ProbeError::Read {
                    addr,
                    len: total,
                    source,
                }
            })?;
            if read == 0 {
                return Err(ProbeError::Read {
                    addr,
                    len: total,
                    source: io::Error::new(ErrorKind::UnexpectedEof, "read_at reached EOF"),
                });
            }
            let (_, tail) = remaining.split_at_mut(read);
            remaining = tail;
            off += read as u64;
        }
        Ok(())
    }
}
