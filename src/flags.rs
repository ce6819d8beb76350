//! Flag sets passed to and returned from `PROCMAP_QUERY`.

use core::fmt;

bitflags::bitflags! {
    /// Selects how the kernel matches `query_addr` against the address space.
    ///
    /// The empty set asks for the VMA covering the address exactly. The
    /// `VMA_*` bits additionally require the matched VMA to carry the
    /// corresponding permission; a VMA lacking one is treated as no match.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    #[repr(transparent)]
    pub struct QueryFlags: u64 {
        const VMA_READABLE = 0x01;
        const VMA_WRITABLE = 0x02;
        const VMA_EXECUTABLE = 0x04;
        const VMA_SHARED = 0x08;
        /// Fall back to the first VMA starting after the address if none covers it.
        const COVERING_OR_NEXT_VMA = 0x10;
        /// Only consider VMAs backed by a file.
        const FILE_BACKED_VMA = 0x20;
    }
}

impl QueryFlags {
    pub const EXACT: QueryFlags = QueryFlags::empty();
}

bitflags::bitflags! {
    /// Attributes of a matched VMA as reported in `vma_flags`.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    #[repr(transparent)]
    pub struct VmaFlags: u64 {
        const READABLE = 0x01;
        const WRITABLE = 0x02;
        const EXECUTABLE = 0x04;
        const SHARED = 0x08;
    }
}

impl VmaFlags {
    /// The four character permission column of `/proc/<pid>/maps`.
    pub fn perms(&self) -> [u8; 4] {
        [
            if self.contains(VmaFlags::READABLE) { b'r' } else { b'-' },
            if self.contains(VmaFlags::WRITABLE) { b'w' } else { b'-' },
            if self.contains(VmaFlags::EXECUTABLE) { b'x' } else { b'-' },
            if self.contains(VmaFlags::SHARED) { b's' } else { b'p' },
        ]
    }
}

impl fmt::Display for VmaFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let perms = self.perms();
        // only ASCII is ever written into `perms`
        f.write_str(core::str::from_utf8(&perms).map_err(|_| fmt::Error)?)
    }
}
