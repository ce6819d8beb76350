//! A library used to enumerate the virtual memory areas (VMAs) of an arbitrary
//! process on Linux systems without parsing the text of `/proc/<pid>/maps`.
//! Every lookup is a single `PROCMAP_QUERY` ioctl issued on an open maps file,
//! which returns the matched VMA's range, permissions, backing file metadata,
//! name and, for ELF images, the build id.
//!
//! # Note
//!
//! `PROCMAP_QUERY` was added in Linux 6.11. Older kernels fail every query
//! with `ENOTTY`, which looks like an empty address space to a [Walk]. Use
//! [Error::errno] on [Walk::error] to tell the two apart.
//!
//! # Example Usage
//!
//! ```no_run
//! use procmap::{ProcMaps, QueryFlags};
//!
//! let maps = ProcMaps::open(1).unwrap();
//! let mut walk = maps.regions(QueryFlags::FILE_BACKED_VMA);
//! for region in walk.by_ref() {
//!     println!("{region}");
//! }
//!
//! if let Some(err) = walk.error().filter(|err| !err.is_not_found()) {
//!     eprintln!("walk ended early: {err}");
//! }
//! ```

mod ffi;
mod ioctl;

mod error;
pub use error::Error;
pub use error::Result;

mod flags;
pub use flags::QueryFlags;
pub use flags::VmaFlags;

mod region;
pub use region::Region;

mod query;
pub use query::query;
pub use query::QueryVma;
pub use query::VmaQuery;
pub use query::MAX_BUILD_ID_LEN;
pub use query::MAX_VMA_NAME_LEN;

mod maps;
pub use maps::ProcMaps;

mod walk;
pub use walk::Walk;

pub use ioctl::PROCMAP_QUERY;

pub type Pid = libc::pid_t;
