use crate::artifacts::branch::{DEFAULT_BRANCH, INVALID_BRANCH_NAME_REGEX};
use crate::errors::BitletError;
use anyhow::Context;
use derive_new::new;

pub const REF_PREFIX: &str = "refs/heads/";

/// Content of a symbolic ref, e.g. `refs/heads/master`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, new)]
pub struct SymRefName(String);

impl SymRefName {
    pub fn for_branch(branch_name: &BranchName) -> Self {
        SymRefName(format!("{REF_PREFIX}{branch_name}"))
    }

    pub fn as_ref_path(&self) -> &str {
        &self.0
    }
}

/// Validated branch name
///
/// Slashes are allowed, so remote-tracking names like `origin/master` are branch names too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if name.is_empty() || re.is_match(&name) {
            Err(BitletError::InvalidBranchName(name).into())
        } else {
            Ok(Self(name))
        }
    }

    pub fn try_parse_sym_ref_name(sym_ref_name: &SymRefName) -> anyhow::Result<Self> {
        let name = sym_ref_name
            .0
            .strip_prefix(REF_PREFIX)
            .with_context(|| {
                format!(
                    "symbolic ref name must start with '{}', got '{}'",
                    REF_PREFIX, sym_ref_name.0
                )
            })?;

        Self::try_parse(name.to_string())
    }

    /// Local name of a branch fetched from a remote (`<remote>/<branch>`)
    pub fn remote_tracking(remote_name: &str, branch_name: &BranchName) -> anyhow::Result<Self> {
        Self::try_parse(format!("{remote_name}/{branch_name}"))
    }

    pub fn default_branch() -> Self {
        Self(DEFAULT_BRANCH.to_string())
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use proptest::proptest;

    proptest! {
        #[test]
        fn alphanumeric_names_are_valid(branch_name in "[a-zA-Z0-9_-]+") {
            assert!(BranchName::try_parse(branch_name).is_ok());
        }

        #[test]
        fn nested_names_are_valid(prefix in "[a-zA-Z0-9_-]+", suffix in "[a-zA-Z0-9_-]+") {
            let branch_name = format!("{}/{}", prefix, suffix);
            assert!(BranchName::try_parse(branch_name).is_ok());
        }

        #[test]
        fn names_starting_with_a_dot_are_invalid(suffix in "[a-zA-Z0-9_-]+") {
            assert!(BranchName::try_parse(format!(".{}", suffix)).is_err());
        }

        #[test]
        fn names_ending_with_lock_are_invalid(prefix in "[a-zA-Z0-9_-]+") {
            assert!(BranchName::try_parse(format!("{}.lock", prefix)).is_err());
        }

        #[test]
        fn names_with_consecutive_dots_are_invalid(prefix in "[a-zA-Z0-9_-]+", suffix in "[a-zA-Z0-9_-]+") {
            assert!(BranchName::try_parse(format!("{}..{}", prefix, suffix)).is_err());
        }

        #[test]
        fn names_with_special_characters_are_invalid(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+",
            special_char in r"[\*:\?\[\\^~ ]"
        ) {
            let branch_name = format!("{}{}{}", prefix, special_char, suffix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }
    }

    #[test]
    fn invalid_names_are_usage_errors() {
        for name in ["", "/lead", "trail/", "a@{b", "x/.y"] {
            let error = BranchName::try_parse(name.to_string()).unwrap_err();
            assert_eq!(
                BitletError::find(&error).map(BitletError::kind),
                Some(ErrorKind::Usage),
                "{name:?}"
            );
        }
    }

    #[test]
    fn symbolic_refs_map_back_to_branch_names() {
        let branch_name = BranchName::try_parse("origin/master".to_string()).unwrap();
        let sym_ref = SymRefName::for_branch(&branch_name);

        assert_eq!(sym_ref.as_ref_path(), "refs/heads/origin/master");
        assert_eq!(BranchName::try_parse_sym_ref_name(&sym_ref).unwrap(), branch_name);
    }
}
