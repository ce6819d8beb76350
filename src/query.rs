//! The single `PROCMAP_QUERY` round trip.

use std::os::fd::{AsFd, AsRawFd};

use crate::error::{Error, Result};
use crate::ffi::ProcmapQuery;
use crate::flags::{QueryFlags, VmaFlags};
use crate::ioctl;
use crate::region::Region;

/// Default capacity of the VMA name buffer.
pub const MAX_VMA_NAME_LEN: usize = 512;
/// Default capacity of the build id buffer.
pub const MAX_BUILD_ID_LEN: usize = 64;

/// Queries the VMA at `addr` through `fd`, which must refer to an open
/// `/proc/<pid>/maps` file. The descriptor is only borrowed.
///
/// Uses [`MAX_VMA_NAME_LEN`] and [`MAX_BUILD_ID_LEN`] sized buffers; see
/// [`VmaQuery`] for other capacities.
pub fn query(fd: impl AsFd, addr: u64, flags: QueryFlags) -> Result<Region> {
    VmaQuery::new(addr).flags(flags).execute(fd)
}

/// Anything that can answer a VMA query for one address space.
pub trait QueryVma {
    fn query_vma(&self, addr: u64, flags: QueryFlags) -> Result<Region>;
}

/// Builder for a single query. The const parameters are the capacities of
/// the name and build id buffers, which live on the stack for the duration
/// of [`VmaQuery::execute`].
#[derive(Debug, Clone, Copy)]
pub struct VmaQuery<const NAME: usize = MAX_VMA_NAME_LEN, const BUILD_ID: usize = MAX_BUILD_ID_LEN> {
    addr: u64,
    flags: QueryFlags,
}

impl VmaQuery {
    pub fn new(addr: u64) -> Self {
        VmaQuery { addr, flags: QueryFlags::EXACT }
    }
}

impl<const NAME: usize, const BUILD_ID: usize> VmaQuery<NAME, BUILD_ID> {
    pub fn flags(mut self, flags: QueryFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Switches to buffers of `N` and `B` bytes. The kernel refuses with
    /// `ENAMETOOLONG` when a name or build id does not fit.
    pub fn capacity<const N: usize, const B: usize>(self) -> VmaQuery<N, B> {
        VmaQuery { addr: self.addr, flags: self.flags }
    }

    pub fn name_capacity<const N: usize>(self) -> VmaQuery<N, BUILD_ID> {
        self.capacity::<N, BUILD_ID>()
    }

    pub fn build_id_capacity<const B: usize>(self) -> VmaQuery<NAME, B> {
        self.capacity::<NAME, B>()
    }

    pub fn execute(&self, fd: impl AsFd) -> Result<Region> {
        let mut name_buf = [0u8; NAME];
        let mut build_id_buf = [0u8; BUILD_ID];

        let mut request = ProcmapQuery::new(self.addr, self.flags.bits());
        request.set_name_buffer(&mut name_buf);
        request.set_build_id_buffer(&mut build_id_buf);

        // SAFETY: `request` is a correctly sized `procmap_query` and both
        // buffer addresses stay valid and exclusively borrowed until the
        // ioctl returns. The kernel writes at most the declared capacities.
        let res = unsafe { ioctl::procmap_query(fd.as_fd().as_raw_fd(), &mut request) };
        if let Err(errno) = res {
            log::trace!("PROCMAP_QUERY {:#x} {:?}: {errno}", self.addr, self.flags);
            return Err(Error::Query { addr: self.addr, flags: self.flags, source: errno });
        }

        log::trace!(
            "PROCMAP_QUERY {:#x} {:?}: {:#x}-{:#x}",
            self.addr,
            self.flags,
            request.vma_start,
            request.vma_end
        );

        let name = decode_name(&name_buf, request.vma_name_size)?;
        let build_id = checked_prefix(&build_id_buf, request.build_id_size, "build id")?.to_vec();

        Ok(Region {
            start: request.vma_start,
            end: request.vma_end,
            flags: VmaFlags::from_bits_retain(request.vma_flags),
            page_size: request.vma_page_size,
            offset: request.vma_offset,
            inode: request.inode,
            dev_major: request.dev_major,
            dev_minor: request.dev_minor,
            name,
            build_id,
        })
    }
}

/// Returns the first `len` bytes of `buf`, refusing lengths past its end.
fn checked_prefix<'b>(buf: &'b [u8], len: u32, field: &'static str) -> Result<&'b [u8]> {
    buf.get(..len as usize).ok_or(Error::Truncated {
        field,
        len,
        capacity: buf.len() as u32,
    })
}

/// The reported size counts the terminating NUL, which is not part of the name.
fn decode_name(buf: &[u8], len: u32) -> Result<String> {
    let bytes = checked_prefix(buf, len, "vma name")?;
    let bytes = bytes.strip_suffix(b"\0").unwrap_or(bytes);
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_drops_terminating_nul() {
        let mut buf = [0u8; 16];
        buf[..7].copy_from_slice(b"[heap]\0");
        assert_eq!(decode_name(&buf, 7).unwrap(), "[heap]");
    }

    #[test]
    fn empty_name() {
        let buf = [0xffu8; 16];
        assert_eq!(decode_name(&buf, 0).unwrap(), "");
    }

    #[test]
    fn name_without_nul_is_kept_whole() {
        let buf = *b"/lib/libc.so";
        assert_eq!(decode_name(&buf, 12).unwrap(), "/lib/libc.so");
    }

    #[test]
    fn oversized_length_is_truncation() {
        let buf = [0u8; 8];
        match decode_name(&buf, 9) {
            Err(Error::Truncated { field, len, capacity }) => {
                assert_eq!((field, len, capacity), ("vma name", 9, 8));
            }
            other => panic!("expected truncation, got {other:?}"),
        }
    }

    #[test]
    fn build_id_prefix_is_exact() {
        let buf: Vec<u8> = (0..64).collect();
        assert_eq!(checked_prefix(&buf, 20, "build id").unwrap(), &buf[..20]);
        assert!(checked_prefix(&buf, 0, "build id").unwrap().is_empty());
        assert!(checked_prefix(&buf, 65, "build id").is_err());
    }

    #[test]
    fn capacity_keeps_address_and_flags() {
        let q = VmaQuery::new(0x4000)
            .flags(QueryFlags::COVERING_OR_NEXT_VMA)
            .capacity::<4096, 20>();
        assert_eq!(q.addr, 0x4000);
        assert_eq!(q.flags, QueryFlags::COVERING_OR_NEXT_VMA);
    }

    #[test]
    fn single_capacity_setters_keep_the_other_buffer() {
        let q: VmaQuery<4096, MAX_BUILD_ID_LEN> = VmaQuery::new(0x4000)
            .flags(QueryFlags::FILE_BACKED_VMA)
            .name_capacity::<4096>();
        assert_eq!((q.addr, q.flags), (0x4000, QueryFlags::FILE_BACKED_VMA));

        let q: VmaQuery<4096, 20> = q.build_id_capacity::<20>();
        assert_eq!((q.addr, q.flags), (0x4000, QueryFlags::FILE_BACKED_VMA));

        let q: VmaQuery<MAX_VMA_NAME_LEN, 0> = VmaQuery::new(0).build_id_capacity::<0>();
        assert_eq!(q.flags, QueryFlags::EXACT);
    }
}
