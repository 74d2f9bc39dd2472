use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{confirm, success, warning};
use log::warn;
use rusqlite::Connection;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database to `dest_file`, optionally zipped. Returns the
    /// path actually written, or `None` when the user declined to overwrite.
    pub fn backup(
        pool: &mut DbPool,
        cfg: &Config,
        dest_file: &str,
        compress: bool,
        force: bool,
    ) -> AppResult<Option<PathBuf>> {
        let src = Path::new(&cfg.database);
        let dest = Path::new(dest_file);

        // 1️⃣ Check DB exists
        if !src.exists() {
            return Err(AppError::StoreUnavailable(format!(
                "database {} not found",
                src.display()
            )));
        }

        // 2️⃣ Ensure destination folder exists
        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // 3️⃣ Existing destination → ask confirmation unless forced
        if dest.exists()
            && !force
            && !confirm(format!("{} already exists. Overwrite?", dest.display()))?
        {
            warning("Backup cancelled by user.");
            return Ok(None);
        }

        // VACUUM INTO refuses an existing target
        if dest.exists() {
            fs::remove_file(dest)?;
        }

        // 4️⃣ Consistent copy through SQLite itself
        snapshot(&pool.conn, src, dest)?;
        success(format!("Backup created: {}", dest.display()));

        // 5️⃣ Optional compression
        let final_path = if compress {
            let compressed = compress_backup(dest)?;
            if let Err(e) = fs::remove_file(dest) {
                warning(format!("Failed to remove uncompressed backup: {}", e));
            }
            compressed
        } else {
            dest.to_path_buf()
        };

        // 6️⃣ Audit line
        crate::db::log::ttlog(
            &pool.conn,
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        )?;

        Ok(Some(final_path))
    }
}

/// `VACUUM INTO`, or a plain file copy when SQLite refuses it.
fn snapshot(conn: &Connection, src: &Path, dest: &Path) -> AppResult<()> {
    if let Err(e) = conn.execute("VACUUM INTO ?1", [dest.to_string_lossy().as_ref()]) {
        warn!(
            "VACUUM INTO {} failed ({e}), copying {} instead",
            dest.display(),
            src.display()
        );
        fs::copy(src, dest)?;
    }
    Ok(())
}

/// Compress a backup using .zip
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let entry_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "rattendance.sqlite".to_string());

    let mut f = fs::File::open(path)?;
    zip.start_file(entry_name, options)
        .map_err(io::Error::other)?;

    io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(io::Error::other)?;

    success(format!("📦 Compressed: {}", zip_path.display()));

    Ok(zip_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp(name: &str) -> PathBuf {
        let p = std::env::temp_dir().join(name);
        let _ = fs::remove_file(&p);
        p
    }

    #[test]
    fn snapshot_uses_vacuum_into() {
        let src = temp("rattendance_snap_src.sqlite");
        let dest = temp("rattendance_snap_dest.sqlite");
        let conn = Connection::open(&src).unwrap();
        conn.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1);")
            .unwrap();

        snapshot(&conn, &src, &dest).unwrap();

        let copy = Connection::open(&dest).unwrap();
        let n: i64 = copy.query_row("SELECT COUNT(*) FROM t", [], |r| r.get(0)).unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn snapshot_falls_back_to_file_copy() {
        let src = temp("rattendance_snap_fallback_src.sqlite");
        let dest = temp("rattendance_snap_fallback_dest.sqlite");
        let conn = Connection::open(&src).unwrap();
        conn.execute_batch("CREATE TABLE t (x INTEGER);").unwrap();

        // VACUUM is rejected inside an open transaction
        conn.execute_batch("BEGIN").unwrap();
        snapshot(&conn, &src, &dest).unwrap();
        conn.execute_batch("ROLLBACK").unwrap();

        assert!(dest.exists());
        assert_eq!(
            fs::metadata(&dest).unwrap().len(),
            fs::metadata(&src).unwrap().len()
        );
    }
}
