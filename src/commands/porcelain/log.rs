use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::BitletError;
use std::io::Write;

impl Repository {
    /// First-parent history of the current branch, newest first
    pub async fn log(&mut self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let (head_oid, _) = self.head_commit()?;

        for entry in RevList::new(self.database(), head_oid) {
            let (commit_oid, commit) = entry?;
            self.display_commit(&commit_oid, &commit)?;
        }

        Ok(())
    }

    /// Every commit ever made, in no particular order
    pub async fn global_log(&mut self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        for (commit_oid, commit) in self.database().list_commits()? {
            self.display_commit(&commit_oid, &commit)?;
        }

        Ok(())
    }

    /// IDs of the commits whose message is exactly `message`
    pub async fn find(&mut self, message: &str) -> anyhow::Result<Vec<ObjectId>> {
        self.ensure_initialized()?;

        let matches = self
            .database()
            .list_commits()?
            .into_iter()
            .filter(|(_, commit)| commit.message() == message)
            .map(|(commit_oid, _)| commit_oid)
            .collect::<Vec<_>>();

        if matches.is_empty() {
            return Err(BitletError::NoCommitWithMessage(message.to_string()).into());
        }

        for commit_oid in &matches {
            writeln!(self.writer(), "{}", commit_oid)?;
        }

        Ok(matches)
    }

    fn display_commit(&self, commit_oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "===")?;
        writeln!(writer, "commit {}", commit_oid)?;
        if let [first, second, ..] = commit.parents() {
            writeln!(
                writer,
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }
        writeln!(writer, "Date: {}", commit.readable_timestamp())?;
        writeln!(writer, "{}", commit.message())?;
        writeln!(writer)?;

        Ok(())
    }
}
