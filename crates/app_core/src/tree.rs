//! Directory tree with lazily loaded folders and image entries
//!
//! The tree is an arena: it owns every [`DirectoryNode`], children are listed
//! by [`NodeId`], and the parent link is a plain id used only for walking up.
//! Ids are never reused, so an id from a dropped subtree resolves to nothing.
//! Every tree also stamps its ids with its own generation, so an id kept
//! from a replaced tree resolves to nothing as well.

use crate::sort::{compare_directories, matches_filter, DirectorySort, SortKey};
use crate::AppError;
use app_fs::{compare_names, created_time, scan_directory, ScanOptions, UniversalPath};
use std::collections::HashMap;
use std::path::{Component, Path};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(0);

/// Handle to a node in a [`DirectoryTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    generation: u64,
    index: usize,
}

/// One folder of the browsed tree
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    path: UniversalPath,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    files: Vec<FileEntry>,
    created: Option<SystemTime>,
    loaded: bool,
    opened: bool,
    listing_error: Option<String>,
}

impl DirectoryNode {
    fn new(path: UniversalPath, parent: Option<NodeId>, created: Option<SystemTime>) -> Self {
        Self {
            path,
            parent,
            children: Vec::new(),
            files: Vec::new(),
            created,
            loaded: false,
            opened: false,
            listing_error: None,
        }
    }

    pub fn path(&self) -> &UniversalPath {
        &self.path
    }

    /// Base name of the folder
    pub fn name(&self) -> &str {
        self.path.name()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Sub-folders in discovery order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Images sorted by name; empty until loaded
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn created(&self) -> Option<SystemTime> {
        self.created
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Expanded in the sidebar
    pub fn is_opened(&self) -> bool {
        self.opened
    }

    /// Why the last scan failed, for the empty-state UI
    pub fn listing_error(&self) -> Option<&str> {
        self.listing_error.as_deref()
    }
}

impl PartialEq for DirectoryNode {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for DirectoryNode {}

/// One image inside a loaded directory
#[derive(Debug, Clone)]
pub struct FileEntry {
    path: UniversalPath,
    parent: NodeId,
}

impl FileEntry {
    pub fn path(&self) -> &UniversalPath {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.path.name()
    }

    /// Directory whose file list this entry belongs to
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// Index in the parent's current file list, `None` when stale
    pub fn position(&self, tree: &DirectoryTree) -> Option<usize> {
        let files = tree.files(self.parent);
        files
            .binary_search_by(|f| compare_names(f.path.name_bytes(), self.path.name_bytes()))
            .ok()
            .filter(|&i| files[i].path == self.path)
    }

    /// The entry `n` places after this one
    pub fn next(&self, tree: &DirectoryTree, n: usize) -> Option<FileEntry> {
        let index = self.position(tree)?;
        tree.files(self.parent).get(index.checked_add(n)?).cloned()
    }

    /// The entry `n` places before this one
    pub fn prev(&self, tree: &DirectoryTree, n: usize) -> Option<FileEntry> {
        let index = self.position(tree)?;
        tree.files(self.parent).get(index.checked_sub(n)?).cloned()
    }

    pub fn next_one(&self, tree: &DirectoryTree) -> Option<FileEntry> {
        self.next(tree, 1)
    }

    pub fn prev_one(&self, tree: &DirectoryTree) -> Option<FileEntry> {
        self.prev(tree, 1)
    }
}

impl PartialEq for FileEntry {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for FileEntry {}

/// Folder tree rooted at the user's chosen directory
#[derive(Debug)]
pub struct DirectoryTree {
    generation: u64,
    nodes: Vec<Option<DirectoryNode>>,
    index: HashMap<UniversalPath, NodeId>,
    root: NodeId,
    root_path: UniversalPath,
    options: ScanOptions,
}

impl DirectoryTree {
    /// Create a tree for `root` with default scan options. Nothing is read
    /// until the first [`load`](Self::load).
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self::with_options(root, ScanOptions::default())
    }

    pub fn with_options<P: AsRef<Path>>(root: P, options: ScanOptions) -> Self {
        let path = UniversalPath::resolve(root);
        let created = created_time(path.as_path());
        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        let root = NodeId {
            generation,
            index: 0,
        };

        let mut index = HashMap::new();
        index.insert(path.clone(), root);

        Self {
            generation,
            nodes: vec![Some(DirectoryNode::new(path.clone(), None, created))],
            index,
            root,
            root_path: path,
            options,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_path(&self) -> &UniversalPath {
        &self.root_path
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// The node behind `id`; `None` for dropped ids and ids of other trees
    pub fn node(&self, id: NodeId) -> Option<&DirectoryNode> {
        if id.generation != self.generation {
            return None;
        }
        self.nodes.get(id.index).and_then(|n| n.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut DirectoryNode, AppError> {
        let slot = if id.generation == self.generation {
            self.nodes.get_mut(id.index)
        } else {
            None
        };
        slot.and_then(|n| n.as_mut())
            .ok_or_else(|| AppError::NotFound(format!("directory node {:?}", id)))
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Look up a node that has already been discovered
    pub fn find<P: AsRef<Path>>(&self, path: P) -> Option<NodeId> {
        self.index.get(&UniversalPath::new(path)).copied()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Images of `id` without triggering a load
    pub fn files(&self, id: NodeId) -> &[FileEntry] {
        self.node(id).map(|n| n.files()).unwrap_or(&[])
    }

    /// Scan the folder once. Later calls return immediately.
    ///
    /// On a listing failure the node stays empty, is marked loaded, and the
    /// failure is logged and returned as [`AppError::ListingFailed`].
    pub fn load(&mut self, id: NodeId) -> Result<(), AppError> {
        let node = self.node_mut(id)?;
        if node.loaded {
            return Ok(());
        }
        let path = node.path.clone();

        match scan_directory(path.as_path(), &self.options) {
            Ok(listing) => {
                let files: Vec<FileEntry> = listing
                    .images
                    .into_iter()
                    .map(|entry| FileEntry {
                        path: entry.path,
                        parent: id,
                    })
                    .collect();

                let children: Vec<NodeId> = listing
                    .directories
                    .into_iter()
                    .map(|entry| self.insert(DirectoryNode::new(entry.path, Some(id), entry.created)))
                    .collect();

                tracing::debug!(
                    "Loaded {}: {} folders, {} images",
                    path,
                    children.len(),
                    files.len()
                );

                let node = self.node_mut(id)?;
                node.children = children;
                node.files = files;
                node.loaded = true;
                node.listing_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Listing failed for {}: {}", path, e);

                let reason = e.to_string();
                let node = self.node_mut(id)?;
                node.loaded = true;
                node.listing_error = Some(reason.clone());

                Err(AppError::ListingFailed {
                    path: path.to_string(),
                    reason,
                })
            }
        }
    }

    /// Drop the folder's subtree and scan it again.
    ///
    /// Child ids handed out before the reload stop resolving; file entries
    /// stay usable only while their path is still listed.
    pub fn reload(&mut self, id: NodeId) -> Result<(), AppError> {
        let node = self.node_mut(id)?;
        let children = std::mem::take(&mut node.children);
        node.files.clear();
        node.loaded = false;
        node.listing_error = None;

        for child in children {
            self.remove_subtree(child);
        }

        self.load(id)
    }

    /// Images of `id`, loading it first if needed
    pub fn sorted_files(&mut self, id: NodeId) -> &[FileEntry] {
        // Failures are logged by load and leave the list empty
        let _ = self.load(id);
        self.files(id)
    }

    /// Sub-folders of `id` sorted by `sort`, then filtered by a case-sensitive
    /// substring of the base name. The stored child order is left untouched.
    pub fn sorted_directories(
        &mut self,
        id: NodeId,
        sort: DirectorySort,
        name_filter: &str,
    ) -> Vec<NodeId> {
        let _ = self.load(id);

        let Some(node) = self.node(id) else {
            return Vec::new();
        };

        let mut keyed: Vec<(NodeId, SortKey)> = node
            .children
            .iter()
            .filter_map(|&child| {
                self.node(child).map(|n| {
                    (
                        child,
                        SortKey {
                            name: n.name(),
                            created: n.created,
                        },
                    )
                })
            })
            .collect();

        keyed.sort_by(|a, b| compare_directories(sort, &a.1, &b.1));

        keyed
            .into_iter()
            .filter(|(_, key)| matches_filter(key.name, name_filter))
            .map(|(child, _)| child)
            .collect()
    }

    /// Does the folder contain sub-folders?
    pub fn has_directory(&mut self, id: NodeId) -> bool {
        let _ = self.load(id);
        self.node(id).map(|n| !n.children.is_empty()).unwrap_or(false)
    }

    /// Does the folder contain images?
    pub fn has_file(&mut self, id: NodeId) -> bool {
        !self.sorted_files(id).is_empty()
    }

    /// Expand or collapse a folder in the sidebar; expanding loads it
    pub fn set_opened(&mut self, id: NodeId, opened: bool) -> Result<(), AppError> {
        self.node_mut(id)?.opened = opened;
        if opened {
            self.load(id)?;
        }
        Ok(())
    }

    /// Find the node for `path`, loading every folder between the root and it
    pub fn reveal<P: AsRef<Path>>(&mut self, path: P) -> Result<NodeId, AppError> {
        let root_path = self.root_path().to_path_buf();
        let requested = path.as_ref();

        let target = if requested.starts_with(&root_path) {
            requested.to_path_buf()
        } else {
            UniversalPath::resolve(requested).to_path_buf()
        };

        let relative = target
            .strip_prefix(&root_path)
            .map_err(|_| AppError::NotFound(requested.display().to_string()))?;

        let mut current = self.root;
        for component in relative.components() {
            let name = match component {
                Component::Normal(name) => name,
                Component::CurDir => continue,
                _ => return Err(AppError::NotFound(requested.display().to_string())),
            };

            self.load(current)?;

            let node = self
                .node(current)
                .ok_or_else(|| AppError::NotFound(requested.display().to_string()))?;
            let wanted = node.path.join(name);

            current = node
                .children
                .iter()
                .copied()
                .find(|&child| self.node(child).map(|n| n.path == wanted).unwrap_or(false))
                .ok_or_else(|| AppError::NotFound(requested.display().to_string()))?;
        }

        Ok(current)
    }

    fn insert(&mut self, node: DirectoryNode) -> NodeId {
        let id = NodeId {
            generation: self.generation,
            index: self.nodes.len(),
        };
        self.index.insert(node.path.clone(), id);
        self.nodes.push(Some(node));
        id
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.index).and_then(|slot| slot.take()) {
                self.index.remove(&node.path);
                stack.extend(node.children);
            }
        }
    }
}
