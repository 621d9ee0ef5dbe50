use bytes::Bytes;
use sqlx::PgPool;
use tokio::fs;
use url::Url;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::material::StudyMaterial;

#[derive(Clone)]
pub struct MaterialService {
    pool: PgPool,
    uploads_dir: String,
}

const PDF_EXTS: [&str; 1] = ["pdf"];
const VIDEO_EXTS: [&str; 4] = ["mp4", "webm", "mov", "mkv"];

fn kind_for_extension(ext: &str) -> Result<&'static str> {
    if PDF_EXTS.contains(&ext) {
        Ok("pdf")
    } else if VIDEO_EXTS.contains(&ext) {
        Ok("video")
    } else {
        Err(Error::InvalidFormat(format!(
            "File type .{} is not allowed; expected one of: pdf, {}",
            ext,
            VIDEO_EXTS.join(", ")
        )))
    }
}

impl MaterialService {
    pub fn new(pool: PgPool, uploads_dir: String) -> Self {
        Self { pool, uploads_dir }
    }

    pub async fn save_upload(
        &self,
        title: &str,
        filename: &str,
        data: &Bytes,
        exam_title: Option<String>,
    ) -> Result<StudyMaterial> {
        let ext = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        let kind = kind_for_extension(&ext)?;

        if kind == "pdf" && !data.starts_with(b"%PDF") {
            return Err(Error::InvalidFormat("Invalid PDF file content".into()));
        }
        if data.is_empty() {
            return Err(Error::InvalidFormat("Uploaded file is empty".into()));
        }

        let dir = format!("{}/materials", self.uploads_dir);
        fs::create_dir_all(&dir).await?;
        let file_id = Uuid::new_v4();
        let file_path = format!("{}/{}.{}", dir, file_id, ext);
        fs::write(&file_path, data).await?;

        self.insert(title, kind, Some(file_path), None, exam_title)
            .await
    }

    pub async fn save_link(
        &self,
        title: &str,
        link: &str,
        exam_title: Option<String>,
    ) -> Result<StudyMaterial> {
        let url = Url::parse(link.trim())
            .map_err(|_| Error::InvalidFormat(format!("'{}' is not a valid URL", link)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::InvalidFormat(
                "Only HTTP and HTTPS material links are allowed".into(),
            ));
        }
        self.insert(title, "link", None, Some(url.to_string()), exam_title)
            .await
    }

    async fn insert(
        &self,
        title: &str,
        kind: &str,
        file_path: Option<String>,
        link_url: Option<String>,
        exam_title: Option<String>,
    ) -> Result<StudyMaterial> {
        let row = sqlx::query_as::<_, StudyMaterial>(
            r#"INSERT INTO study_materials (id, title, kind, file_path, link_url, exam_title)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id, title, kind, file_path, link_url, exam_title, created_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(kind)
        .bind(&file_path)
        .bind(&link_url)
        .bind(&exam_title)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(&self) -> Result<Vec<StudyMaterial>> {
        let rows = sqlx::query_as::<_, StudyMaterial>(
            r#"SELECT id, title, kind, file_path, link_url, exam_title, created_at
               FROM study_materials ORDER BY created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Row delete plus best-effort removal of the backing file; a failed
    /// file removal only leaves an orphan on disk, so it is logged and
    /// swallowed rather than failing the request.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let removed: Option<(Option<String>,)> = sqlx::query_as(
            r#"DELETE FROM study_materials WHERE id = $1 RETURNING file_path"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((file_path,)) = removed else {
            return Err(Error::NotFound(format!("Material {} does not exist", id)));
        };
        if let Some(path) = file_path {
            if let Err(e) = fs::remove_file(&path).await {
                tracing::warn!(path = %path, error = %e, "Failed to remove material file");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_maps_to_kind() {
        assert_eq!(kind_for_extension("pdf").unwrap(), "pdf");
        assert_eq!(kind_for_extension("mp4").unwrap(), "video");
        assert!(kind_for_extension("exe").is_err());
        assert!(kind_for_extension("").is_err());
    }
}
