use core::fmt;
use core::ops::Range;

use crate::flags::VmaFlags;

/// A VMA matched by a query. Holds copies of everything the kernel wrote, so
/// it stays valid after the query buffers are gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub start: u64,
    pub end: u64,
    pub flags: VmaFlags,
    pub page_size: u64,
    /// Offset into the backing file; zero for anonymous mappings.
    pub offset: u64,
    pub inode: u64,
    pub dev_major: u32,
    pub dev_minor: u32,
    pub name: String,
    pub build_id: Vec<u8>,
}

impl Region {
    pub fn range(&self) -> Range<u64> {
        self.start..self.end
    }

    pub fn size(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.start && addr < self.end
    }

    pub fn perms(&self) -> String {
        self.flags.to_string()
    }

    /// The backing file path or pseudo name such as `[stack]`.
    ///
    /// The kernel's `vma_name_size` counts a terminating NUL; it is not part
    /// of the returned name, so the name is one byte shorter than reported.
    pub fn name(&self) -> Option<&str> {
        (!self.name.is_empty()).then_some(self.name.as_str())
    }

    pub fn build_id(&self) -> &[u8] {
        &self.build_id
    }

    pub fn build_id_hex(&self) -> String {
        use fmt::Write;
        self.build_id.iter().fold(String::with_capacity(self.build_id.len() * 2), |mut s, b| {
            let _ = write!(s, "{b:02x}");
            s
        })
    }
}

/// Renders the region the way a `/proc/<pid>/maps` line looks, with name and
/// build id as tab separated trailing columns when present.
impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08x}-{:08x} {} {:08x} {:02x}:{:02x} {}",
            self.start, self.end, self.flags, self.offset, self.dev_major, self.dev_minor, self.inode
        )?;

        if let Some(name) = self.name() {
            write!(f, "\t{name}")?;
        }

        if !self.build_id.is_empty() {
            write!(f, "\t{}", self.build_id_hex())?;
        }

        Ok(())
    }
}
