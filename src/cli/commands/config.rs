use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use std::path::Path;
use std::process::Command;

fn platform_editor() -> String {
    std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        })
}

fn run_editor(editor: &str, path: &Path) -> bool {
    Command::new(editor)
        .arg(path)
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// `config --print` / `config --edit [--editor E]`
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    else {
        return Ok(());
    };

    let path = Config::config_file();

    if *print_config {
        println!("📄 {}\n", path.display());
        println!("{}", cfg.to_yaml()?);
    }

    if *edit_config {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "{} does not exist (run `rattendance init` first)",
                path.display()
            )));
        }

        let fallback = platform_editor();
        let requested = editor.clone().unwrap_or_else(|| fallback.clone());

        let used = if run_editor(&requested, &path) {
            requested
        } else if requested != fallback && run_editor(&fallback, &path) {
            warning(format!("'{requested}' failed, used '{fallback}' instead"));
            fallback
        } else {
            return Err(AppError::Config(format!(
                "could not open {} with '{requested}'",
                path.display()
            )));
        };

        // reject a broken file right away instead of on the next command
        let reloaded = Config::load_from(&path)?;
        success(format!(
            "Configuration saved with '{used}' (grace period {} min)",
            reloaded.grace_period_minutes
        ));
    }

    Ok(())
}
