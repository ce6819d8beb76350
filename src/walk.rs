//! Enumerating an address space by repeated queries.

use core::iter::FusedIterator;

use crate::error::Error;
use crate::flags::QueryFlags;
use crate::query::QueryVma;
use crate::region::Region;

/// Iterator over the VMAs of an address space in ascending order.
///
/// Each step queries with `COVERING_OR_NEXT_VMA` at the end of the previous
/// region. The first failed query ends the walk; the error is kept and can be
/// inspected through [`Walk::error`], where `ENOENT` is the normal end of the
/// address space.
pub struct Walk<'a, S: QueryVma + ?Sized> {
    source: &'a S,
    flags: QueryFlags,
    next: Option<u64>,
    error: Option<Error>,
}

impl<'a, S: QueryVma + ?Sized> Walk<'a, S> {
    pub fn new(source: &'a S, flags: QueryFlags) -> Self {
        Self::starting_at(source, 0, flags)
    }

    pub fn starting_at(source: &'a S, addr: u64, flags: QueryFlags) -> Self {
        Walk {
            source,
            flags: flags | QueryFlags::COVERING_OR_NEXT_VMA,
            next: Some(addr),
            error: None,
        }
    }

    /// The query failure that ended the walk, if it has ended that way.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn into_error(self) -> Option<Error> {
        self.error
    }
}

impl<S: QueryVma + ?Sized> Iterator for Walk<'_, S> {
    type Item = Region;

    fn next(&mut self) -> Option<Region> {
        let addr = self.next.take()?;

        let region = match self.source.query_vma(addr, self.flags) {
            Ok(region) => region,
            Err(err) => {
                log::debug!("walk ended at {addr:#x}: {err}");
                self.error = Some(err);
                return None;
            }
        };

        // an empty or backwards region would make the next query repeat itself
        if region.end <= region.start || region.end <= addr {
            log::warn!(
                "walk stopped at {addr:#x}: kernel returned {:#x}-{:#x}",
                region.start,
                region.end
            );
            return None;
        }

        self.next = Some(region.end);
        Some(region)
    }
}

impl<S: QueryVma + ?Sized> FusedIterator for Walk<'_, S> {}
