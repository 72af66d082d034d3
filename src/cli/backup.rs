use std::path::{Path, PathBuf};

use crate::error::{Result, TallyError};
use crate::fmt::format_bytes;

pub fn run(path: &Path, output: Option<String>) -> Result<()> {
    if !path.is_file() {
        return Err(TallyError::Other(format!(
            "Nothing to back up: {} does not exist",
            path.display()
        )));
    }

    let dest_path = match output {
        Some(p) => PathBuf::from(p),
        None => default_backup_path(path),
    };
    if let Some(dir) = dest_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::copy(path, &dest_path)?;

    let size = std::fs::metadata(&dest_path)?.len();
    println!("Backup saved to {}", dest_path.display());
    println!("Size: {}", format_bytes(size));
    Ok(())
}

/// `<ledger dir>/backups/<stem>-YYYYMMDD-HHMMSS.json`
fn default_backup_path(path: &Path) -> PathBuf {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "transactions".to_string());
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    dir.join("backups").join(format!("{stem}-{stamp}.json"))
}
