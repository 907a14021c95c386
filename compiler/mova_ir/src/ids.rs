//! File and node identity.
//!
//! Nodes get their IDs when a tree is built: the owning file plus the index
//! of the node in that file's arena. A `NodeId` is therefore a stable cache
//! key for as long as the file's tree is not replaced, and dropping every
//! entry of a file is a matter of comparing the `file` half of the key.

use std::fmt;

/// Identity of a source file in the analysis session.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FileId(u32);

impl FileId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        FileId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

/// Identity of a syntax node: owning file + arena index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId {
    file: FileId,
    local: u32,
}

impl NodeId {
    #[inline]
    pub const fn new(file: FileId, local: u32) -> Self {
        NodeId { file, local }
    }

    /// The file this node belongs to.
    #[inline]
    pub const fn file(self) -> FileId {
        self.file
    }

    /// Index into the owning tree's arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.local as usize
    }

    #[inline]
    pub const fn local(self) -> u32 {
        self.local
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}:{})", self.file.0, self.local)
    }
}

/// Range of child nodes in a tree's flattened child list.
///
/// `start` indexes `SyntaxTree::child_lists`; `len` is the number of children.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(C)]
pub struct NodeRange {
    pub start: u32,
    pub len: u16,
}

impl NodeRange {
    /// Empty range.
    pub const EMPTY: NodeRange = NodeRange { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: u32, len: u16) -> Self {
        NodeRange { start, len }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Indices into the flattened child list.
    #[inline]
    pub fn indices(&self) -> std::ops::Range<usize> {
        let start = self.start as usize;
        start..start + self.len()
    }
}

impl fmt::Debug for NodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRange({}..{})", self.start, self.start + u32::from(self.len))
    }
}
