#[derive(Debug)]
pub struct ConflictMessage {
    pub header: &'static str,
    pub footer: &'static str,
}

impl From<&ConflictType> for ConflictMessage {
    fn from(value: &ConflictType) -> Self {
        match value {
            ConflictType::UntrackedOverwritten => Self {
                header: "The following untracked working tree files would be overwritten:",
                footer: "Please move or remove them before you switch branches.",
            },
            ConflictType::UntrackedRemoved => Self {
                header: "The following untracked working tree files would be removed:",
                footer: "Please move or remove them before you switch branches.",
            },
            ConflictType::UntrackedDirectory => Self {
                header: "Updating the following directories would lose untracked files in them:",
                footer: "Please move or remove them before you switch branches.",
            },
        }
    }
}

/// Ways a planned migration can endanger a file the current commit does not track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConflictType {
    /// An untracked file would be replaced by different content
    UntrackedOverwritten,
    /// An untracked file would be deleted
    UntrackedRemoved,
    /// A directory holding untracked files sits where a file would be written
    UntrackedDirectory,
}

impl ConflictType {
    pub fn describe(&self, paths: &[String]) -> String {
        let ConflictMessage { header, footer } = self.into();
        let paths = paths
            .iter()
            .map(|path| format!("\t{path}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!("{header}\n{paths}\n{footer}")
    }
}
