//! SQLite-backed document store: one Markdown file per converted document
//! plus a metadata row for lookup, listing, and deletion.
//!
//! The Markdown body lives on disk (`{data_dir}/{id}.md`) rather than in
//! the database so a stored document can be served as a download without a
//! query, and so the metadata table stays cheap to list. The store owns
//! identifier and timestamp assignment — callers hand it a finished
//! [`Document`] and get back the persisted record.

use crate::error::StoreError;
use crate::output::Document;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Metadata record for one stored document.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DocRecord {
    /// Generated identifier (UUIDv4, hex).
    pub id: String,
    /// Original uploaded PDF file name.
    pub pdf_name: String,
    /// Derived document title.
    pub title: String,
    /// Path of the stored Markdown file.
    pub md_path: PathBuf,
    /// Creation timestamp, RFC 3339 UTC.
    pub created_at: String,
}

/// Document store rooted at a data directory.
pub struct DocumentStore {
    conn: Connection,
    data_dir: PathBuf,
}

impl DocumentStore {
    /// Open or create a store rooted at `data_dir`.
    ///
    /// Creates the directory and the metadata database on first use.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|e| StoreError::Io {
            path: data_dir.clone(),
            source: e,
        })?;

        let db_path = data_dir.join("documents.db");
        let conn = Connection::open(&db_path)?;

        let store = Self { conn, data_dir };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS documents (
                id          TEXT PRIMARY KEY,
                pdf_name    TEXT NOT NULL,
                title       TEXT NOT NULL,
                md_path     TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_documents_created
                ON documents(created_at);
            ",
        )?;
        Ok(())
    }

    /// Persist a converted document.
    ///
    /// Assigns an identifier and timestamp, writes the Markdown file, and
    /// inserts the metadata row.
    pub fn save(&self, document: &Document, pdf_name: &str) -> Result<DocRecord, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        let created_at = Utc::now().to_rfc3339();
        let md_path = self.data_dir.join(format!("{id}.md"));

        fs::write(&md_path, &document.markdown).map_err(|e| StoreError::Io {
            path: md_path.clone(),
            source: e,
        })?;

        self.conn.execute(
            "INSERT INTO documents (id, pdf_name, title, md_path, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id,
                pdf_name,
                document.title,
                md_path.to_string_lossy().into_owned(),
                created_at
            ],
        )?;

        debug!("stored document {} ({})", id, document.title);

        Ok(DocRecord {
            id,
            pdf_name: pdf_name.to_string(),
            title: document.title.clone(),
            md_path,
            created_at,
        })
    }

    /// Look up one record by identifier.
    pub fn get(&self, id: &str) -> Result<DocRecord, StoreError> {
        self.conn
            .query_row(
                "SELECT id, pdf_name, title, md_path, created_at
                 FROM documents WHERE id = ?1",
                params![id],
                row_to_record,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    /// Read the stored Markdown body for a record.
    pub fn read_markdown(&self, id: &str) -> Result<String, StoreError> {
        let record = self.get(id)?;
        fs::read_to_string(&record.md_path).map_err(|e| StoreError::Io {
            path: record.md_path,
            source: e,
        })
    }

    /// List all records, newest first.
    pub fn list(&self) -> Result<Vec<DocRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, pdf_name, title, md_path, created_at
             FROM documents ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([], row_to_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Delete a record and its Markdown file.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let record = self.get(id)?;

        self.conn
            .execute("DELETE FROM documents WHERE id = ?1", params![id])?;

        // The row is authoritative; a missing file is not an error.
        match fs::remove_file(&record.md_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(StoreError::Io {
                    path: record.md_path,
                    source: e,
                })
            }
        }

        debug!("deleted document {}", id);
        Ok(())
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocRecord> {
    Ok(DocRecord {
        id: row.get(0)?,
        pdf_name: row.get(1)?,
        title: row.get(2)?,
        md_path: PathBuf::from(row.get::<_, String>(3)?),
        created_at: row.get(4)?,
    })
}

/// File name to serve a stored document under: the original PDF's base
/// name with a `.md` extension.
pub fn download_filename(pdf_name: &str) -> String {
    let stem = Path::new(pdf_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| pdf_name.to_string());
    format!("{stem}.md")
}
