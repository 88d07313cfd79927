use colored::Colorize;

/// Unstaged change of a file the next commit would otherwise carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkspaceChangeType {
    Modified,
    Deleted,
}

impl From<&WorkspaceChangeType> for &str {
    fn from(change: &WorkspaceChangeType) -> Self {
        match change {
            WorkspaceChangeType::Modified => "modified",
            WorkspaceChangeType::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for WorkspaceChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label: &str = self.into();
        write!(f, "({label})")
    }
}

/// Status sections, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusSection {
    Branches,
    Staged,
    Removed,
    Unstaged,
    Untracked,
}

impl StatusSection {
    pub const ALL: [StatusSection; 5] = [
        StatusSection::Branches,
        StatusSection::Staged,
        StatusSection::Removed,
        StatusSection::Unstaged,
        StatusSection::Untracked,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            StatusSection::Branches => "Branches",
            StatusSection::Staged => "Staged Files",
            StatusSection::Removed => "Removed Files",
            StatusSection::Unstaged => "Modifications Not Staged For Commit",
            StatusSection::Untracked => "Untracked Files",
        }
    }

    /// Color an entry of this section for terminal output
    pub fn paint(&self, entry: &str) -> String {
        match self {
            StatusSection::Branches => entry.normal().to_string(),
            StatusSection::Staged => entry.green().to_string(),
            StatusSection::Removed | StatusSection::Unstaged | StatusSection::Untracked => {
                entry.red().to_string()
            }
        }
    }
}

impl std::fmt::Display for StatusSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "=== {} ===", self.title())
    }
}
