// QuickApp file endpoints
//
// File CRUD under `/api/quickApp/{id}/files`. The hub enforces naming
// rules server-side; they are mirrored here so bad names fail before a
// request goes out. Create/delete report success with 200..=203.

use reqwest::StatusCode;
use tracing::debug;
use url::form_urlencoded;

use crate::client::HubClient;
use crate::error::Error;
use crate::models::{FileEntry, QuickAppFile};

/// Validate a QuickApp file name against the hub's naming rules:
/// at least three characters, only letters, digits, `_`, `.`, `-`.
pub fn validate_file_name(name: &str) -> Result<(), Error> {
    if name.len() < 3 {
        return Err(Error::InvalidRequest(
            "file name must be at least 3 characters long".into(),
        ));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(Error::InvalidRequest(
            "file name may only contain letters, digits, underscores, dots, and hyphens".into(),
        ));
    }
    Ok(())
}

fn file_path(quick_app_id: u64, name: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(name.as_bytes()).collect();
    format!("quickApp/{quick_app_id}/files/{encoded}")
}

/// Create/delete succeed with 200..=203 on current firmware.
fn expect_created_range(status: StatusCode, context: &str) -> Result<(), Error> {
    if (200..=203).contains(&status.as_u16()) {
        Ok(())
    } else {
        Err(Error::Api {
            status: status.as_u16(),
            message: context.to_owned(),
        })
    }
}

impl HubClient {
    /// List a QuickApp's files.
    ///
    /// `GET /api/quickApp/{id}/files`
    pub async fn list_files(&self, quick_app_id: u64) -> Result<Vec<FileEntry>, Error> {
        debug!(quick_app_id, "listing QuickApp files");
        self.get(&format!("quickApp/{quick_app_id}/files")).await
    }

    /// Fetch one file with its content.
    ///
    /// `GET /api/quickApp/{id}/files/{name}`
    ///
    /// Some firmware versions return the file object, others return the
    /// raw content as a bare body; both are normalized to [`QuickAppFile`].
    pub async fn get_file(&self, quick_app_id: u64, name: &str) -> Result<QuickAppFile, Error> {
        debug!(quick_app_id, name, "fetching QuickApp file");
        let body = self.get_text(&file_path(quick_app_id, name)).await?;
        match serde_json::from_str::<QuickAppFile>(&body) {
            Ok(file) => Ok(file),
            Err(_) => Ok(QuickAppFile {
                name: name.to_owned(),
                content: body,
                is_main: false,
                kind: None,
            }),
        }
    }

    /// Save (overwrite) one file.
    ///
    /// `PUT /api/quickApp/{id}/files/{name}`
    pub async fn save_file(&self, quick_app_id: u64, file: &QuickAppFile) -> Result<(), Error> {
        validate_file_name(&file.name)?;
        debug!(quick_app_id, name = %file.name, "saving QuickApp file");
        let status = self
            .put_status(&file_path(quick_app_id, &file.name), file)
            .await?;
        expect_created_range(status, "file save rejected")
    }

    /// Create a new file.
    ///
    /// `POST /api/quickApp/{id}/files/{name}`
    pub async fn create_file(&self, quick_app_id: u64, file: &QuickAppFile) -> Result<(), Error> {
        validate_file_name(&file.name)?;
        debug!(quick_app_id, name = %file.name, "creating QuickApp file");
        let status = self
            .post_status(&file_path(quick_app_id, &file.name), file)
            .await?;
        expect_created_range(status, "file create rejected")
    }

    /// Rename a file: fetch under the old name, PUT back with the new
    /// name in the body. The hub treats the body's `name` as the rename.
    pub async fn rename_file(
        &self,
        quick_app_id: u64,
        old_name: &str,
        new_name: &str,
    ) -> Result<(), Error> {
        validate_file_name(new_name)?;
        debug!(quick_app_id, old_name, new_name, "renaming QuickApp file");
        let mut file = self.get_file(quick_app_id, old_name).await?;
        file.name = new_name.to_owned();
        let status = self
            .put_status(&file_path(quick_app_id, old_name), &file)
            .await?;
        expect_created_range(status, "file rename rejected")
    }

    /// Delete a file.
    ///
    /// `DELETE /api/quickApp/{id}/files/{name}`
    pub async fn delete_file(&self, quick_app_id: u64, name: &str) -> Result<(), Error> {
        debug!(quick_app_id, name, "deleting QuickApp file");
        let status = self.delete_status(&file_path(quick_app_id, name)).await?;
        expect_created_range(status, "file delete rejected")
    }
}

#[cfg(test)]
mod tests {
    use super::validate_file_name;

    #[test]
    fn accepts_reasonable_names() {
        assert!(validate_file_name("main").is_ok());
        assert!(validate_file_name("my-lib_v2.lua").is_ok());
    }

    #[test]
    fn rejects_short_names() {
        assert!(validate_file_name("ab").is_err());
    }

    #[test]
    fn rejects_special_characters() {
        assert!(validate_file_name("bad name").is_err());
        assert!(validate_file_name("path/evil").is_err());
    }
}
