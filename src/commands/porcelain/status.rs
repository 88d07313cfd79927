use crate::areas::repository::Repository;
use crate::artifacts::status::file_change::StatusSection;
use crate::artifacts::status::status_info::{Status, StatusInfo};
use std::io::Write;

impl Repository {
    pub async fn status(&mut self) -> anyhow::Result<StatusInfo> {
        self.ensure_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let status_info = Status::new(self).initialize(&index).await?;

        for section in StatusSection::ALL {
            writeln!(self.writer(), "{}", section)?;
            for entry in status_info.entries(section) {
                writeln!(self.writer(), "{}", section.paint(&entry))?;
            }
            writeln!(self.writer())?;
        }

        Ok(status_info)
    }
}
