//! C type definitions from `linux/fs.h` translated to Rust

/// Mirror of `struct procmap_query`. The kernel validates `size` against the
/// layouts it knows, so neither field order nor widths may change.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcmapQuery {
    pub size: u64,
    pub query_flags: u64,
    pub query_addr: u64,

    pub vma_start: u64,
    pub vma_end: u64,
    pub vma_flags: u64,
    pub vma_page_size: u64,
    pub vma_offset: u64,
    pub inode: u64,
    pub dev_major: u32,
    pub dev_minor: u32,

    pub vma_name_size: u32,
    pub build_id_size: u32,
    pub vma_name_addr: u64,
    pub build_id_addr: u64,
}

pub const PROCMAP_QUERY_SIZE: usize = core::mem::size_of::<ProcmapQuery>();

const _: () = {
    use core::mem::offset_of;
    assert!(PROCMAP_QUERY_SIZE == 104);
    assert!(offset_of!(ProcmapQuery, inode) == 64);
    assert!(offset_of!(ProcmapQuery, dev_major) == 72);
    assert!(offset_of!(ProcmapQuery, vma_name_size) == 80);
    assert!(offset_of!(ProcmapQuery, vma_name_addr) == 88);
    assert!(offset_of!(ProcmapQuery, build_id_addr) == 96);
};

impl ProcmapQuery {
    /// Builds a request with `size` already filled in; every out field is zero.
    pub fn new(query_addr: u64, query_flags: u64) -> Self {
        ProcmapQuery {
            size: PROCMAP_QUERY_SIZE as u64,
            query_flags,
            query_addr,
            ..Default::default()
        }
    }

    /// Points the name buffer fields at `buf`. The kernel writes at most
    /// `buf.len()` bytes there and skips the name entirely for an empty buffer.
    pub fn set_name_buffer(&mut self, buf: &mut [u8]) {
        (self.vma_name_size, self.vma_name_addr) = buffer_fields(buf);
    }

    pub fn set_build_id_buffer(&mut self, buf: &mut [u8]) {
        (self.build_id_size, self.build_id_addr) = buffer_fields(buf);
    }
}

// The kernel rejects a zero size paired with a non-null address.
fn buffer_fields(buf: &mut [u8]) -> (u32, u64) {
    if buf.is_empty() {
        (0, 0)
    } else {
        (buf.len() as u32, buf.as_mut_ptr() as u64)
    }
}
