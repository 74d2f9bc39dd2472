use crate::errors::{AppError, AppResult};
use crate::ui::messages::confirm;
use std::path::Path;

/// An existing target is only replaced with `force` or an explicit yes.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if force || !path.exists() {
        return Ok(());
    }

    if confirm(format!("{} already exists. Overwrite?", path.display()))? {
        Ok(())
    } else {
        Err(AppError::Export(format!(
            "cancelled, {} left untouched",
            path.display()
        )))
    }
}
