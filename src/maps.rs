use std::fs::File;
use std::os::fd::{AsFd, BorrowedFd};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::flags::QueryFlags;
use crate::query::{query, QueryVma};
use crate::region::Region;
use crate::walk::Walk;
use crate::Pid;

/// An open `/proc/<pid>/maps` file, which is the handle `PROCMAP_QUERY`
/// operates on. Querying never reads the textual contents.
///
/// # Example Usage
///
/// ```no_run
/// use procmap::{ProcMaps, QueryFlags};
///
/// let maps = ProcMaps::open_self().unwrap();
/// for region in maps.regions(QueryFlags::FILE_BACKED_VMA) {
///     println!("{region}");
/// }
/// ```
#[derive(Debug)]
pub struct ProcMaps {
    pid: Option<Pid>,
    file: File,
}

impl ProcMaps {
    /// Opens the maps file of `pid`. Fails if the process does not exist or
    /// the caller may not inspect it.
    pub fn open(pid: Pid) -> Result<Self> {
        Self::open_path(PathBuf::from(format!("/proc/{pid}/maps")), Some(pid))
    }

    /// Opens `/proc/self/maps`.
    pub fn open_self() -> Result<Self> {
        Self::open_path(PathBuf::from("/proc/self/maps"), None)
    }

    fn open_path(path: PathBuf, pid: Option<Pid>) -> Result<Self> {
        match File::open(&path) {
            Ok(file) => Ok(ProcMaps { pid, file }),
            Err(source) => Err(Error::Open { path, source }),
        }
    }

    /// The process this handle was opened for, `None` for `/proc/self/maps`.
    pub fn pid(&self) -> Option<Pid> {
        self.pid
    }

    pub fn query(&self, addr: u64, flags: QueryFlags) -> Result<Region> {
        query(&self.file, addr, flags)
    }

    /// Walks the whole address space from address 0. `COVERING_OR_NEXT_VMA`
    /// is always added to `flags`.
    pub fn regions(&self, flags: QueryFlags) -> Walk<'_, Self> {
        Walk::new(self, flags)
    }
}

impl QueryVma for ProcMaps {
    fn query_vma(&self, addr: u64, flags: QueryFlags) -> Result<Region> {
        self.query(addr, flags)
    }
}

impl AsFd for ProcMaps {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_process() {
        // pid_max never exceeds 2^22
        let err = ProcMaps::open(i32::MAX).unwrap_err();
        match &err {
            Error::Open { path, source } => {
                assert_eq!(path, &PathBuf::from(format!("/proc/{}/maps", i32::MAX)));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().starts_with("failed to open /proc/2147483647/maps"));
    }

    #[test]
    fn open_self() {
        let maps = ProcMaps::open_self().unwrap();
        assert_eq!(maps.pid(), None);
    }
}
