//! Gallery session: root, sidebar and selection state
//!
//! One `GallerySession` is owned by the UI. It replaces process-wide view
//! state with an explicit value whose transitions are:
//!
//! ```text
//! NoRoot --open_root--> RootSelected --select_directory--> FolderSelected
//! FolderSelected --select_file--> FileSelected --next/prev--> FileSelected
//! any --open_root--> RootSelected (downstream selection cleared)
//! ```

use crate::autoplay::Autoplay;
use crate::config::{AppConfig, PageDirection, ViewMode, ViewSettings};
use crate::sort::DirectorySort;
use crate::tree::{DirectoryTree, FileEntry, NodeId};
use crate::AppError;
use app_fs::ScanOptions;
use std::path::Path;
use std::time::Instant;

/// Where the user is in the browse flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    NoRoot,
    RootSelected,
    FolderSelected,
    FileSelected,
}

/// Half of the horizontal pager that was tapped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSide {
    Left,
    Right,
}

/// Explicit session context passed to the UI layer
#[derive(Debug)]
pub struct GallerySession {
    tree: Option<DirectoryTree>,
    /// Folder whose sub-folders the sidebar lists
    current_directory: Option<NodeId>,
    /// Folder whose images are shown
    selected_directory: Option<NodeId>,
    selected_file: Option<FileEntry>,
    search_text: String,
    scan_options: ScanOptions,
    pub view: ViewSettings,
    pub autoplay: Autoplay,
}

impl Default for GallerySession {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl GallerySession {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            tree: None,
            current_directory: None,
            selected_directory: None,
            selected_file: None,
            search_text: String::new(),
            scan_options: config.browse,
            view: config.view.clone(),
            autoplay: Autoplay::new(&config.autoplay),
        }
    }

    /// Build a session and re-open the last root and folder when they still exist
    pub fn restore(config: &AppConfig) -> Self {
        let mut session = Self::new(config);

        let Some(root) = config.session.last_root.as_deref() else {
            return session;
        };
        if !root.is_dir() {
            tracing::info!("Last root {} is gone, starting empty", root.display());
            return session;
        }

        session.open_root(root);

        if let Some(dir) = config.session.last_directory.as_deref() {
            if let Err(e) = session.reveal_directory(dir) {
                tracing::info!("Could not restore folder {}: {}", dir.display(), e);
            }
        }

        session
    }

    /// Write the parts worth keeping back into `config`
    pub fn remember(&self, config: &mut AppConfig) {
        config.view = self.view.clone();
        config.browse = self.scan_options;
        config.autoplay = self.autoplay.config();
        config.session.last_root = self.tree.as_ref().map(|t| t.root_path().to_path_buf());
        config.session.last_directory = self
            .selected_directory
            .and_then(|id| self.node_path(id));
    }

    pub fn state(&self) -> SelectionState {
        if self.tree.is_none() {
            SelectionState::NoRoot
        } else if self.selected_file.is_some() {
            SelectionState::FileSelected
        } else if self.selected_directory.is_some() {
            SelectionState::FolderSelected
        } else {
            SelectionState::RootSelected
        }
    }

    pub fn tree(&self) -> Option<&DirectoryTree> {
        self.tree.as_ref()
    }

    pub fn tree_mut(&mut self) -> Option<&mut DirectoryTree> {
        self.tree.as_mut()
    }

    pub fn current_directory(&self) -> Option<NodeId> {
        self.current_directory
    }

    pub fn selected_directory(&self) -> Option<NodeId> {
        self.selected_directory
    }

    pub fn selected_file(&self) -> Option<&FileEntry> {
        self.selected_file.as_ref()
    }

    /// Replace the whole tree with one rooted at `path`.
    ///
    /// A listing failure leaves the root selected with an empty sidebar; the
    /// reason is available from the root node.
    pub fn open_root<P: AsRef<Path>>(&mut self, path: P) -> NodeId {
        let tree = DirectoryTree::with_options(path, self.scan_options);
        tracing::info!("Opening root {}", tree.root_path());

        let tree = self.tree.insert(tree);
        let root = tree.root();
        let _ = tree.set_opened(root, true);

        self.current_directory = Some(root);
        self.selected_directory = None;
        self.selected_file = None;
        self.autoplay.stop();
        root
    }

    /// Show the images of `id`; the file selection is cleared
    pub fn select_directory(&mut self, id: NodeId) -> Result<(), AppError> {
        let tree = self.tree_or_invalid("select a folder")?;
        if tree.node(id).is_none() {
            return Err(AppError::NotFound(format!("directory node {:?}", id)));
        }
        // Listing failures show up as an empty folder
        let _ = tree.load(id);

        self.selected_directory = Some(id);
        self.selected_file = None;
        self.autoplay.stop();
        Ok(())
    }

    /// Select an image of the selected folder
    pub fn select_file(&mut self, entry: &FileEntry) -> Result<(), AppError> {
        let tree = self.tree.as_ref().ok_or_else(|| {
            AppError::InvalidTransition("cannot select a file before a root".into())
        })?;

        if self.selected_directory != Some(entry.parent()) {
            return Err(AppError::InvalidTransition(format!(
                "{} is not in the selected folder",
                entry.path()
            )));
        }
        if entry.position(tree).is_none() {
            return Err(AppError::NotFound(entry.path().to_string()));
        }

        self.selected_file = Some(entry.clone());
        Ok(())
    }

    /// Move the file selection `n` images forward. Returns false at the end
    /// of the list or when no file is selected.
    pub fn next_file(&mut self, n: usize) -> bool {
        self.step_file(n, true)
    }

    /// Move the file selection `n` images back
    pub fn prev_file(&mut self, n: usize) -> bool {
        self.step_file(n, false)
    }

    fn step_file(&mut self, n: usize, forward: bool) -> bool {
        let (Some(tree), Some(current)) = (self.tree.as_ref(), self.selected_file.as_ref()) else {
            return false;
        };
        let target = if forward {
            current.next(tree, n)
        } else {
            current.prev(tree, n)
        };
        match target {
            Some(entry) => {
                self.selected_file = Some(entry);
                true
            }
            None => false,
        }
    }

    /// The selected image, or the first image of the selected folder
    pub fn selected_file_or_first(&self) -> Option<FileEntry> {
        if let Some(file) = &self.selected_file {
            return Some(file.clone());
        }
        let tree = self.tree.as_ref()?;
        tree.files(self.selected_directory?).first().cloned()
    }

    /// Make `id` the folder listed in the sidebar (double tap)
    pub fn enter_directory(&mut self, id: NodeId) -> Result<(), AppError> {
        let tree = self.tree_or_invalid("enter a folder")?;
        if tree.node(id).is_none() {
            return Err(AppError::NotFound(format!("directory node {:?}", id)));
        }
        let _ = tree.set_opened(id, true);
        self.current_directory = Some(id);
        Ok(())
    }

    pub fn can_go_to_parent(&self) -> bool {
        match (&self.tree, self.current_directory) {
            (Some(tree), Some(current)) => tree.parent(current).is_some(),
            _ => false,
        }
    }

    /// Move the sidebar up one level; refused at the root
    pub fn go_to_parent(&mut self) -> bool {
        let parent = match (&self.tree, self.current_directory) {
            (Some(tree), Some(current)) => tree.parent(current),
            _ => None,
        };
        match parent {
            Some(parent) => {
                self.current_directory = Some(parent);
                true
            }
            None => false,
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn set_directory_sort(&mut self, sort: DirectorySort) {
        self.view.directory_sort = sort;
    }

    /// Sub-folders of the current folder as the sidebar shows them
    pub fn sidebar_directories(&mut self) -> Vec<NodeId> {
        let (Some(tree), Some(current)) = (self.tree.as_mut(), self.current_directory) else {
            return Vec::new();
        };
        tree.sorted_directories(current, self.view.directory_sort, &self.search_text)
    }

    /// Re-open a folder below the root, e.g. a restored selection
    pub fn reveal_directory<P: AsRef<Path>>(&mut self, path: P) -> Result<NodeId, AppError> {
        let tree = self.tree_or_invalid("reveal a folder")?;
        let id = tree.reveal(path)?;
        if let Some(parent) = tree.parent(id) {
            self.current_directory = Some(parent);
        }
        self.select_directory(id)?;
        Ok(id)
    }

    /// Handle a tap on one half of the horizontal pager.
    ///
    /// The forward half follows the reading direction and moves by the page
    /// size. With nothing selected yet the first image is selected.
    pub fn turn_page(&mut self, side: PageSide) -> bool {
        if self.selected_file.is_none() {
            return match self.selected_file_or_first() {
                Some(first) => {
                    self.selected_file = Some(first);
                    true
                }
                None => false,
            };
        }

        let forward = matches!(
            (side, self.view.horizontal_direction),
            (PageSide::Right, PageDirection::Right) | (PageSide::Left, PageDirection::Left)
        );
        let step = self.page_size();

        if forward {
            self.next_file(step)
        } else {
            self.prev_file(step)
        }
    }

    /// Images on screen in the horizontal pager, left to right
    pub fn visible_page(&self) -> Vec<FileEntry> {
        let Some(first) = self.selected_file_or_first() else {
            return Vec::new();
        };
        let second = match self.tree.as_ref() {
            Some(tree) if self.page_size() == 2 => first.next_one(tree),
            _ => None,
        };

        let mut page = vec![first];
        page.extend(second);
        if self.view.horizontal_direction == PageDirection::Left {
            page.reverse();
        }
        page
    }

    fn page_size(&self) -> usize {
        if self.view.view_mode == ViewMode::Horizontal {
            self.view.horizontal_per_page as usize
        } else {
            1
        }
    }

    pub fn start_autoplay(&mut self, now: Instant) -> bool {
        if self.selected_file.is_none() {
            match self.selected_file_or_first() {
                Some(first) => self.selected_file = Some(first),
                None => return false,
            }
        }
        self.autoplay.start(now);
        true
    }

    /// Advance the selection when the autoplay interval elapsed. At the end of
    /// the folder it wraps in loop mode and stops otherwise.
    pub fn autoplay_tick(&mut self, now: Instant) -> bool {
        if !self.autoplay.should_advance(now) {
            return false;
        }
        if self.selected_file.is_none() {
            self.autoplay.stop();
            return false;
        }

        let step = self.page_size();
        if self.next_file(step) {
            self.autoplay.mark_advanced(now);
            return true;
        }

        let first = self
            .tree
            .as_ref()
            .zip(self.selected_directory)
            .and_then(|(tree, dir)| tree.files(dir).first().cloned());

        match first {
            Some(first) if self.autoplay.loop_mode() => {
                self.selected_file = Some(first);
                self.autoplay.mark_advanced(now);
                true
            }
            _ => {
                self.autoplay.stop();
                false
            }
        }
    }

    fn node_path(&self, id: NodeId) -> Option<std::path::PathBuf> {
        let node = self.tree.as_ref()?.node(id)?;
        Some(node.path().to_path_buf())
    }

    fn tree_or_invalid(&mut self, action: &str) -> Result<&mut DirectoryTree, AppError> {
        self.tree
            .as_mut()
            .ok_or_else(|| AppError::InvalidTransition(format!("cannot {} before a root", action)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    /// root/{A/{1..5.jpg}, B/{b1.gif}, C/}
    fn sample_root() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("A")).unwrap();
        fs::create_dir(root.join("B")).unwrap();
        fs::create_dir(root.join("C")).unwrap();
        for i in 1..=5 {
            touch(&root.join(format!("A/{}.jpg", i)));
        }
        touch(&root.join("B/b1.gif"));
        dir
    }

    fn child(session: &mut GallerySession, name: &str) -> NodeId {
        let dirs = session.sidebar_directories();
        let tree = session.tree().unwrap();
        *dirs
            .iter()
            .find(|&&id| tree.node(id).unwrap().name() == name)
            .unwrap()
    }

    fn selected_name(session: &GallerySession) -> Option<String> {
        session.selected_file().map(|f| f.name().to_string())
    }

    fn folder_a(session: &mut GallerySession) -> (NodeId, Vec<FileEntry>) {
        let a = child(session, "A");
        session.select_directory(a).unwrap();
        let files = session.tree_mut().unwrap().sorted_files(a).to_vec();
        (a, files)
    }

    #[test]
    fn test_state_machine() {
        let dir = sample_root();
        let mut session = GallerySession::default();
        assert_eq!(session.state(), SelectionState::NoRoot);
        assert!(session.sidebar_directories().is_empty());

        session.open_root(dir.path());
        assert_eq!(session.state(), SelectionState::RootSelected);

        let (_, files) = folder_a(&mut session);
        assert_eq!(session.state(), SelectionState::FolderSelected);
        assert!(session.selected_file().is_none());

        session.select_file(&files[0]).unwrap();
        assert_eq!(session.state(), SelectionState::FileSelected);

        assert!(session.next_file(1));
        assert_eq!(selected_name(&session).as_deref(), Some("2.jpg"));
        assert!(session.next_file(3));
        assert_eq!(selected_name(&session).as_deref(), Some("5.jpg"));
        assert!(!session.next_file(1));
        assert_eq!(selected_name(&session).as_deref(), Some("5.jpg"));
        assert!(session.prev_file(4));
        assert!(!session.prev_file(1));
        assert_eq!(session.state(), SelectionState::FileSelected);

        // New root clears everything downstream
        session.open_root(dir.path().join("B"));
        assert_eq!(session.state(), SelectionState::RootSelected);
        assert!(session.selected_directory().is_none());
    }

    #[test]
    fn test_invalid_transitions() {
        let dir = sample_root();
        let mut session = GallerySession::default();
        let stray = DirectoryTree::new(dir.path()).root();

        assert!(matches!(
            session.select_directory(stray),
            Err(AppError::InvalidTransition(_))
        ));

        session.open_root(dir.path());
        let b = child(&mut session, "B");
        let b_files = session.tree_mut().unwrap().sorted_files(b).to_vec();

        // No folder selected yet
        assert!(matches!(
            session.select_file(&b_files[0]),
            Err(AppError::InvalidTransition(_))
        ));

        // File from another folder
        folder_a(&mut session);
        assert!(matches!(
            session.select_file(&b_files[0]),
            Err(AppError::InvalidTransition(_))
        ));
        assert_eq!(session.state(), SelectionState::FolderSelected);
    }

    #[test]
    fn test_stale_selection_is_rejected() {
        let dir = sample_root();
        let mut session = GallerySession::default();
        session.open_root(dir.path());
        let (a, files) = folder_a(&mut session);

        fs::remove_file(files[0].path().as_path()).unwrap();
        session.tree_mut().unwrap().reload(a).unwrap();

        assert!(matches!(
            session.select_file(&files[0]),
            Err(AppError::NotFound(_))
        ));
        session.select_file(&files[1]).unwrap();
        assert!(!session.prev_file(1));
    }

    #[test]
    fn test_ids_from_previous_root_are_rejected() {
        let first = TempDir::new().unwrap();
        fs::create_dir(first.path().join("old")).unwrap();
        let second = TempDir::new().unwrap();
        fs::create_dir(second.path().join("new")).unwrap();

        let mut session = GallerySession::default();
        let old_root = session.open_root(first.path());
        let old = child(&mut session, "old");

        session.open_root(second.path());
        assert!(matches!(
            session.select_directory(old),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            session.enter_directory(old_root),
            Err(AppError::NotFound(_))
        ));
        assert_eq!(session.state(), SelectionState::RootSelected);
        assert_eq!(session.selected_directory(), None);

        let new = child(&mut session, "new");
        session.select_directory(new).unwrap();
        assert_eq!(session.state(), SelectionState::FolderSelected);
    }

    #[test]
    fn test_sidebar_navigation() {
        let dir = sample_root();
        fs::create_dir(dir.path().join("A/inner")).unwrap();
        let mut session = GallerySession::default();
        let root = session.open_root(dir.path());

        assert!(!session.can_go_to_parent());
        assert!(!session.go_to_parent());

        let a = child(&mut session, "A");
        session.enter_directory(a).unwrap();
        assert_eq!(session.current_directory(), Some(a));
        assert!(session.tree().unwrap().node(a).unwrap().is_opened());

        let inner = session.sidebar_directories();
        assert_eq!(inner.len(), 1);

        assert!(session.can_go_to_parent());
        assert!(session.go_to_parent());
        assert_eq!(session.current_directory(), Some(root));
    }

    #[test]
    fn test_search_and_sort() {
        let dir = sample_root();
        let mut session = GallerySession::default();
        session.open_root(dir.path());

        session.set_search_text("B");
        let dirs = session.sidebar_directories();
        assert_eq!(dirs.len(), 1);
        assert_eq!(session.tree().unwrap().node(dirs[0]).unwrap().name(), "B");

        session.set_search_text("b");
        assert!(session.sidebar_directories().is_empty());

        session.set_search_text("");
        session.set_directory_sort(DirectorySort::CreatedDesc);
        assert_eq!(session.sidebar_directories().len(), 3);
        assert_eq!(session.view.directory_sort, DirectorySort::CreatedDesc);
    }

    #[test]
    fn test_paging_left_to_right() {
        let dir = sample_root();
        let mut session = GallerySession::default();
        session.view.view_mode = ViewMode::Horizontal;
        session.view.set_horizontal_per_page(2);
        session.open_root(dir.path());
        folder_a(&mut session);

        let names = |s: &GallerySession| {
            s.visible_page()
                .iter()
                .map(|f| f.name().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&session), vec!["1.jpg", "2.jpg"]);

        // First tap selects the first image
        assert!(session.turn_page(PageSide::Right));
        assert_eq!(selected_name(&session).as_deref(), Some("1.jpg"));

        assert!(session.turn_page(PageSide::Right));
        assert_eq!(names(&session), vec!["3.jpg", "4.jpg"]);
        assert!(session.turn_page(PageSide::Right));
        assert_eq!(names(&session), vec!["5.jpg"]);
        assert!(!session.turn_page(PageSide::Right));

        assert!(session.turn_page(PageSide::Left));
        assert_eq!(selected_name(&session).as_deref(), Some("3.jpg"));
    }

    #[test]
    fn test_paging_right_to_left() {
        let dir = sample_root();
        let mut session = GallerySession::default();
        session.view.view_mode = ViewMode::Horizontal;
        session.view.set_horizontal_per_page(2);
        session.view.horizontal_direction = PageDirection::Left;
        session.open_root(dir.path());
        let (_, files) = folder_a(&mut session);
        session.select_file(&files[0]).unwrap();

        let page: Vec<String> = session
            .visible_page()
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        assert_eq!(page, vec!["2.jpg", "1.jpg"]);

        assert!(session.turn_page(PageSide::Left));
        assert_eq!(selected_name(&session).as_deref(), Some("3.jpg"));
        assert!(session.turn_page(PageSide::Right));
        assert_eq!(selected_name(&session).as_deref(), Some("1.jpg"));
        assert!(!session.turn_page(PageSide::Right));
    }

    #[test]
    fn test_autoplay_wraps_or_stops() {
        let dir = sample_root();
        let mut session = GallerySession::default();
        session.autoplay.set_interval_secs(1);
        session.open_root(dir.path());
        let (_, files) = folder_a(&mut session);
        session.select_file(&files[3]).unwrap();

        let start = Instant::now();
        let tick = |n: u64| start + Duration::from_secs(n);

        assert!(session.start_autoplay(start));
        assert!(!session.autoplay_tick(start));
        assert!(session.autoplay_tick(tick(1)));
        assert_eq!(selected_name(&session).as_deref(), Some("5.jpg"));

        // Loop mode is on by default
        assert!(session.autoplay_tick(tick(2)));
        assert_eq!(selected_name(&session).as_deref(), Some("1.jpg"));

        session.select_file(&files[4]).unwrap();
        session.autoplay.set_loop_mode(false);
        assert!(!session.autoplay_tick(tick(3)));
        assert!(!session.autoplay.is_playing());
        assert_eq!(selected_name(&session).as_deref(), Some("5.jpg"));
    }

    #[test]
    fn test_autoplay_needs_images() {
        let dir = sample_root();
        let mut session = GallerySession::default();
        session.open_root(dir.path());
        let c = child(&mut session, "C");
        session.select_directory(c).unwrap();

        assert!(!session.start_autoplay(Instant::now()));
        assert!(!session.autoplay.is_playing());
    }

    #[test]
    fn test_remember_and_restore() {
        let dir = sample_root();
        let mut session = GallerySession::default();
        session.view.set_grid_columns(6);
        session.open_root(dir.path());
        folder_a(&mut session);

        let mut config = AppConfig::default();
        session.remember(&mut config);
        assert_eq!(config.view.grid_columns, 6);
        assert!(config.session.last_root.is_some());
        assert!(config
            .session
            .last_directory
            .as_deref()
            .unwrap()
            .ends_with("A"));

        let mut restored = GallerySession::restore(&config);
        assert_eq!(restored.state(), SelectionState::FolderSelected);
        let a = restored.selected_directory().unwrap();
        assert_eq!(restored.tree().unwrap().node(a).unwrap().name(), "A");
        assert_eq!(restored.current_directory(), restored.tree().map(|t| t.root()));
        assert_eq!(restored.sidebar_directories().len(), 3);
    }

    #[test]
    fn test_restore_missing_root() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.session.last_root = Some(dir.path().join("deleted"));

        let session = GallerySession::restore(&config);
        assert_eq!(session.state(), SelectionState::NoRoot);
    }

    #[test]
    fn test_unreadable_root_is_empty_state() {
        let dir = TempDir::new().unwrap();
        let mut session = GallerySession::default();
        let root = session.open_root(dir.path().join("missing"));

        assert_eq!(session.state(), SelectionState::RootSelected);
        assert!(session.sidebar_directories().is_empty());
        assert!(session
            .tree()
            .unwrap()
            .node(root)
            .unwrap()
            .listing_error()
            .is_some());
    }
}
