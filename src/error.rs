use std::path::PathBuf;

use nix::errno::Errno;

use crate::flags::QueryFlags;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The `PROCMAP_QUERY` ioctl itself failed. `ENOENT` means no VMA
    /// matched, which is how a walk learns it reached the end.
    #[error("ioctl PROCMAP_QUERY at {addr:#x} ({flags:?}): {source}")]
    Query {
        addr: u64,
        flags: QueryFlags,
        #[source]
        source: Errno,
    },

    /// The kernel reported more bytes than the buffer it was handed could hold.
    #[error("{field} of {len} bytes exceeds the {capacity} byte buffer")]
    Truncated {
        field: &'static str,
        len: u32,
        capacity: u32,
    },

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// The native error code of a failed query, if this is one.
    pub fn errno(&self) -> Option<Errno> {
        match self {
            Error::Query { source, .. } => Some(*source),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.errno() == Some(Errno::ENOENT)
    }
}
