//! Defines the ioctl command used to query `/proc/<pid>/maps`

use crate::ffi::ProcmapQuery;
use crate::ffi::PROCMAP_QUERY_SIZE;

use nix::ioctl_readwrite;
use nix::sys::ioctl::ioctl_num_type;

const PROCFS_IOCTL_MAGIC: u8 = b'f';
const PROCMAP_QUERY_NR: u8 = 17;

/// `_IOWR('f', 17, struct procmap_query)`
pub const PROCMAP_QUERY: ioctl_num_type =
    nix::request_code_readwrite!(PROCFS_IOCTL_MAGIC, PROCMAP_QUERY_NR, PROCMAP_QUERY_SIZE);

ioctl_readwrite!(procmap_query, PROCFS_IOCTL_MAGIC, PROCMAP_QUERY_NR, ProcmapQuery);
