use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::TreeSnapshot;
use crate::artifacts::status::file_change::{StatusSection, WorkspaceChangeType};
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

pub type ChangeSet = BTreeMap<String, WorkspaceChangeType>;
pub type FileSet = BTreeSet<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) current_branch: BranchName,
    pub(crate) branches: Vec<BranchName>,
    pub(crate) staged_files: FileSet,
    pub(crate) removed_files: FileSet,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) untracked_files: FileSet,
}

impl StatusInfo {
    /// Display lines of a section, sorted, without colors
    pub fn entries(&self, section: StatusSection) -> Vec<String> {
        match section {
            StatusSection::Branches => self
                .branches
                .iter()
                .map(|branch| {
                    if branch == &self.current_branch {
                        format!("*{branch}")
                    } else {
                        branch.to_string()
                    }
                })
                .collect(),
            StatusSection::Staged => self.staged_files.iter().cloned().collect(),
            StatusSection::Removed => self.removed_files.iter().cloned().collect(),
            StatusSection::Unstaged => self
                .workspace_changeset
                .iter()
                .map(|(path, change)| format!("{path} {change}"))
                .collect(),
            StatusSection::Untracked => self.untracked_files.iter().cloned().collect(),
        }
    }
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub async fn initialize(&self, index: &Index) -> anyhow::Result<StatusInfo> {
        let refs = self.repository.refs();
        let head_tree = self.load_head_tree()?;
        let working_files = self.repository.workspace().list_files()?;

        let workspace_changeset = self.check_workspace(&head_tree, &working_files, index)?;
        let untracked_files = working_files
            .iter()
            .filter(|path| index.staged_oid(path).is_none())
            .filter(|path| !head_tree.contains_key(*path) || index.is_removed(path))
            .cloned()
            .collect::<FileSet>();

        Ok(StatusInfo {
            current_branch: refs.current_branch()?,
            branches: refs.list_branches()?,
            staged_files: index.additions().keys().cloned().collect(),
            removed_files: index.removals().clone(),
            workspace_changeset,
            untracked_files,
        })
    }

    fn load_head_tree(&self) -> anyhow::Result<TreeSnapshot> {
        match self.repository.refs().read_head()? {
            Some(head_oid) => Ok(self
                .repository
                .database()
                .load_commit(&head_oid)?
                .tree()
                .clone()),
            None => Ok(TreeSnapshot::new()),
        }
    }

    /// Files whose working copy differs from what the next commit would record
    ///
    /// A staged file is compared against its staged content, any other file tracked by
    /// the current commit (and not staged for removal) against the committed content.
    fn check_workspace(
        &self,
        head_tree: &TreeSnapshot,
        working_files: &[String],
        index: &Index,
    ) -> anyhow::Result<ChangeSet> {
        let workspace = self.repository.workspace();
        let working_files = working_files.iter().collect::<BTreeSet<_>>();
        let mut changeset = ChangeSet::new();

        let expected = head_tree
            .iter()
            .filter(|(path, _)| !index.is_removed(path) && index.staged_oid(path).is_none())
            .chain(index.additions().iter());

        for (path, expected_oid) in expected {
            if !working_files.contains(&path) {
                changeset.insert(path.clone(), WorkspaceChangeType::Deleted);
            } else if workspace.file_oid(path)?.as_ref() != Some(expected_oid) {
                changeset.insert(path.clone(), WorkspaceChangeType::Modified);
            }
        }

        Ok(changeset)
    }
}
