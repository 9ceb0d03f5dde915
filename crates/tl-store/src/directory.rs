//! Paged owner directories.
//!
//! A directory is a chain of [`DirectoryNode`] pages. Page 0 is the root and
//! lives at the directory's own index; later pages live at
//! [`LedgerIndex::dir_page`]. Pages link forward through `index_next`, and
//! the root's `index_previous` names the last page, which is where new
//! entries are appended.

use tl_types::{AccountId, LedgerIndex};
use tracing::debug;

use crate::entry::{DirectoryNode, LedgerEntry};
use crate::error::StoreError;
use crate::sandbox::Sandbox;
use crate::traits::ReadView;

/// Errors from directory maintenance.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// No further page can be allocated.
    #[error("directory {root} is full ({pages} pages)")]
    Full { root: LedgerIndex, pages: u64 },

    /// The page chain is inconsistent.
    #[error("directory {root} is corrupt at page {page}: {reason}")]
    Corrupt {
        root: LedgerIndex,
        page: u64,
        reason: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DirectoryError {
    fn corrupt(root: &LedgerIndex, page: u64, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            root: *root,
            page,
            reason: reason.into(),
        }
    }
}

/// Describer that stamps `owner` on newly created pages.
pub fn describe_owner(owner: AccountId) -> impl Fn(&mut DirectoryNode) {
    move |node| node.owner = owner
}

fn read_page(
    view: &dyn ReadView,
    root: &LedgerIndex,
    page: u64,
) -> Result<Option<DirectoryNode>, DirectoryError> {
    match view.read(&LedgerIndex::dir_page(root, page))? {
        None => Ok(None),
        Some(LedgerEntry::DirectoryNode(node)) => Ok(Some(node)),
        Some(other) => Err(DirectoryError::corrupt(
            root,
            page,
            format!("page holds a {}", other.kind()),
        )),
    }
}

fn require_page(
    view: &dyn ReadView,
    root: &LedgerIndex,
    page: u64,
) -> Result<DirectoryNode, DirectoryError> {
    read_page(view, root, page)?
        .ok_or_else(|| DirectoryError::corrupt(root, page, "linked page is missing"))
}

/// Walk the chain from the root, calling `visit` on each page until it
/// returns `Some`.
fn walk<T>(
    view: &dyn ReadView,
    root_index: &LedgerIndex,
    root: DirectoryNode,
    mut visit: impl FnMut(&DirectoryNode) -> Option<T>,
) -> Result<Option<T>, DirectoryError> {
    let max_pages = view.config().directory.max_pages;
    let mut node = root;
    let mut steps = 0u64;
    loop {
        if let Some(found) = visit(&node) {
            return Ok(Some(found));
        }
        if node.index_next == 0 {
            return Ok(None);
        }
        if node.index_next <= node.page {
            return Err(DirectoryError::corrupt(
                root_index,
                node.page,
                "page links backwards",
            ));
        }
        steps += 1;
        if steps > max_pages {
            return Err(DirectoryError::corrupt(
                root_index,
                node.page,
                "page chain exceeds page limit",
            ));
        }
        node = require_page(view, root_index, node.index_next)?;
    }
}

/// Add `object` to the directory rooted at `root_index`.
///
/// Returns the page the object is listed on. Adding an object that is
/// already listed changes nothing. `describer` runs on every page this call
/// creates.
pub fn dir_add(
    view: &mut Sandbox<'_>,
    root_index: &LedgerIndex,
    object: LedgerIndex,
    describer: impl Fn(&mut DirectoryNode),
) -> Result<u64, DirectoryError> {
    let limits = view.config().directory;

    let Some(mut root) = read_page(&*view, root_index, 0)? else {
        let mut node = DirectoryNode::empty(*root_index, 0);
        describer(&mut node);
        node.indexes.push(object);
        view.create(node.into())?;
        debug!(root = %root_index.short_hex(), object = %object.short_hex(), "directory created");
        return Ok(0);
    };

    if let Some(page) = walk(&*view, root_index, root.clone(), |node| {
        node.indexes.contains(&object).then_some(node.page)
    })? {
        return Ok(page);
    }

    let last = root.index_previous;
    let mut node = if last == 0 {
        root.clone()
    } else {
        require_page(&*view, root_index, last)?
    };

    if node.indexes.len() < limits.max_entries_per_page {
        node.indexes.push(object);
        view.modify(node.into())?;
        return Ok(last);
    }

    let new_page = last + 1;
    if new_page >= limits.max_pages {
        return Err(DirectoryError::Full {
            root: *root_index,
            pages: new_page,
        });
    }

    let mut fresh = DirectoryNode::empty(*root_index, new_page);
    describer(&mut fresh);
    fresh.index_previous = last;
    fresh.indexes.push(object);

    node.index_next = new_page;
    if last == 0 {
        node.index_previous = new_page;
        view.modify(node.into())?;
    } else {
        view.modify(node.into())?;
        root.index_previous = new_page;
        view.modify(root.into())?;
    }
    view.create(fresh.into())?;

    debug!(root = %root_index.short_hex(), page = new_page, "directory page added");
    Ok(new_page)
}

/// Remove `object` from the directory rooted at `root_index`.
///
/// Returns `false` if the object was not listed (or the directory does not
/// exist); that is not an error. An emptied page other than the root is
/// unlinked and deleted. The root is deleted once the whole directory is
/// empty, unless `keep_root` is set.
pub fn dir_remove(
    view: &mut Sandbox<'_>,
    root_index: &LedgerIndex,
    object: &LedgerIndex,
    keep_root: bool,
) -> Result<bool, DirectoryError> {
    let Some(root) = read_page(&*view, root_index, 0)? else {
        return Ok(false);
    };
    let Some(mut node) = walk(&*view, root_index, root, |node| {
        node.indexes.contains(object).then(|| node.clone())
    })?
    else {
        return Ok(false);
    };

    node.indexes.retain(|i| i != object);
    if !node.indexes.is_empty() {
        view.modify(node.into())?;
        return Ok(true);
    }

    if node.is_root() {
        if node.index_next == 0 && !keep_root {
            view.delete(root_index)?;
            debug!(root = %root_index.short_hex(), "directory deleted");
        } else {
            view.modify(node.into())?;
        }
        return Ok(true);
    }

    let (prev_page, next_page) = (node.index_previous, node.index_next);

    let mut prev = require_page(&*view, root_index, prev_page)?;
    prev.index_next = next_page;
    view.modify(prev.into())?;

    // Read after the previous write: prev and next may both be the root.
    let mut next = require_page(&*view, root_index, next_page)?;
    next.index_previous = prev_page;
    view.modify(next.into())?;

    view.delete(&node.index())?;
    debug!(root = %root_index.short_hex(), page = node.page, "directory page removed");

    if !keep_root {
        let root = require_page(&*view, root_index, 0)?;
        if root.indexes.is_empty() && root.index_next == 0 {
            view.delete(root_index)?;
            debug!(root = %root_index.short_hex(), "directory deleted");
        }
    }
    Ok(true)
}

/// Every object in the directory, in page order.
pub fn dir_entries(
    view: &dyn ReadView,
    root_index: &LedgerIndex,
) -> Result<Vec<LedgerIndex>, DirectoryError> {
    let Some(root) = read_page(view, root_index, 0)? else {
        return Ok(Vec::new());
    };
    let mut entries = Vec::new();
    walk(view, root_index, root, |node| {
        entries.extend_from_slice(&node.indexes);
        None::<()>
    })?;
    Ok(entries)
}
