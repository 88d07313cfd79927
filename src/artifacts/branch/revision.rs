use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR_REGEX, PARENT_REGEX, REF_ALIASES};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::{MIN_OBJECT_ID_PREFIX, OBJECT_ID_LENGTH};
use crate::errors::BitletError;
use anyhow::Context;

const HEAD: &str = "HEAD";

/// A revision naming a commit
///
/// Supported forms:
/// - `HEAD` or its alias `@`: the current branch tip
/// - Branch names: `master`, `origin/master`
/// - Full or abbreviated commit IDs (at least 4 hex characters), tried when no branch
///   with that name exists
/// - Parent notation: `<revision>^`
/// - Ancestor notation: `<revision>~<n>` (first parents only)
#[derive(Debug, Clone)]
pub enum Revision {
    Head,
    /// A branch name or possibly a commit ID
    Ref(BranchName),
    Ancestor(Box<Revision>, usize),
    Parent(Box<Revision>),
}

impl Revision {
    /// Resolve a revision string to a commit ID
    ///
    /// Any failure to name exactly one commit is `NoSuchCommit`, except an abbreviated ID
    /// matching several commits, which is `AmbiguousCommitId`.
    pub fn resolve_str(revision: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        match Self::try_parse(revision) {
            Ok(parsed) => parsed.resolve(revision, repository),
            Err(_) => Err(BitletError::NoSuchCommit(revision.to_string()).into()),
        }
    }

    fn resolve(&self, revision: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        let no_such_commit = || BitletError::NoSuchCommit(revision.to_string());

        match self {
            Revision::Head => Ok(repository.refs().read_head()?.ok_or_else(no_such_commit)?),
            Revision::Ref(branch_name) => {
                if let Some(oid) = repository.refs().read_branch(branch_name)? {
                    return Ok(oid);
                }

                let name_str = branch_name.as_ref();
                if Self::looks_like_oid(name_str) {
                    Self::resolve_oid(name_str, repository)
                } else {
                    Err(no_such_commit().into())
                }
            }
            Revision::Parent(base_revision) => {
                let oid = base_revision.resolve(revision, repository)?;
                Self::commit_parent(&oid, repository)?.ok_or_else(|| no_such_commit().into())
            }
            Revision::Ancestor(base_revision, generations) => {
                let mut oid = base_revision.resolve(revision, repository)?;
                for _ in 0..*generations {
                    oid = Self::commit_parent(&oid, repository)?.ok_or_else(no_such_commit)?;
                }

                Ok(oid)
            }
        }
    }

    fn commit_parent(oid: &ObjectId, repository: &Repository) -> anyhow::Result<Option<ObjectId>> {
        let commit = repository.database().load_commit(oid)?;
        Ok(commit.parent().cloned())
    }

    fn resolve_oid(oid_str: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        let commit_matches = repository
            .database()
            .find_objects_by_prefix(oid_str)?
            .into_iter()
            .filter(|oid| {
                repository
                    .database()
                    .get_object_type(oid)
                    .map(|object_type| object_type == ObjectType::Commit)
                    .unwrap_or(false)
            })
            .collect::<Vec<_>>();

        match commit_matches.as_slice() {
            [] => Err(BitletError::NoSuchCommit(oid_str.to_string()).into()),
            [oid] => Ok(oid.clone()),
            _ => {
                tracing::debug!(prefix = oid_str, candidates = commit_matches.len(), "ambiguous commit id");
                Err(BitletError::AmbiguousCommitId(oid_str.to_string()).into())
            }
        }
    }

    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        let parent_re = regex::Regex::new(PARENT_REGEX)
            .with_context(|| format!("invalid parent regex: {PARENT_REGEX}"))?;
        let ancestor_re = regex::Regex::new(ANCESTOR_REGEX)
            .with_context(|| format!("invalid ancestor regex: {ANCESTOR_REGEX}"))?;

        if let Some(caps) = parent_re.captures(revision) {
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Parent(Box::new(base_revision)))
        } else if let Some(caps) = ancestor_re.captures(revision) {
            let generations: usize = caps[2]
                .parse()
                .with_context(|| format!("failed to parse generations in revision: {revision}"))?;
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Ancestor(Box::new(base_revision), generations))
        } else {
            let resolved_name = *REF_ALIASES.get(revision).unwrap_or(&revision);
            if resolved_name == HEAD {
                return Ok(Revision::Head);
            }

            let branch_name = BranchName::try_parse(resolved_name.to_string())?;
            Ok(Revision::Ref(branch_name))
        }
    }

    fn looks_like_oid(s: &str) -> bool {
        s.len() >= MIN_OBJECT_ID_PREFIX
            && s.len() <= OBJECT_ID_LENGTH
            && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}
