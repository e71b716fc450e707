use anyhow::{Context, Result, bail};
use draftpad_config::Config;
use draftpad_engine::{
    ClipboardError, ClipboardItem, ClipboardWriter, ConfirmPrompt, DirectorySink, Editor,
    EditorOptions, ExportOptions, FileStore, NotificationCenter, SystemClock, run_export,
};
use std::{
    env,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process,
    rc::Rc,
};

const USAGE: &str = "Usage: draftpad-cli <show | type <text> | paste <file>... | export [dir] | copy | clear [--yes]>";

/// Clipboard stand-in that prints what would have been copied
struct StdoutClipboard;

impl ClipboardWriter for StdoutClipboard {
    fn write_rich(&mut self, html: &str, text: &str) -> Result<(), ClipboardError> {
        println!("--- text/html ---\n{html}\n--- text/plain ---\n{text}");
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        println!("{text}");
        Ok(())
    }

    fn copy_selection(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

/// Asks on stdin, defaulting to no
struct StdinPrompt;

impl ConfirmPrompt for StdinPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        print!("{message} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
            Err(_) => false,
        }
    }
}

/// Clipboard MIME type for a pasted file, from its extension
fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "txt" | "md" => "text/plain",
        _ => "application/octet-stream",
    }
}

fn run(config: &Config, args: &[String]) -> Result<()> {
    let clock = Rc::new(SystemClock);
    let store = FileStore::new(&config.storage_dir);
    let mut editor = Editor::open(
        Box::new(store),
        clock.clone(),
        EditorOptions {
            debounce_ms: config.editor.debounce_ms,
            storage_key: config.editor.storage_key.clone(),
        },
    );
    let mut notifier = NotificationCenter::new(clock, config.editor.notification_ms);

    let Some(command) = args.first() else {
        bail!("{USAGE}");
    };
    match command.as_str() {
        "show" => println!("{}", editor.plain_text()),
        "type" => {
            let text = args[1..].join(" ");
            if text.is_empty() {
                bail!("Usage: draftpad-cli type <text>");
            }
            editor.type_text(&text);
        }
        "paste" => {
            if args.len() < 2 {
                bail!("Usage: draftpad-cli paste <file>...");
            }
            let mut items = Vec::new();
            for file in &args[1..] {
                let path = PathBuf::from(file);
                let data = std::fs::read(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                items.push(ClipboardItem::new(mime_for(&path), data));
            }
            let outcome = editor.paste(&items);
            println!(
                "Inserted {} image(s), skipped {}",
                outcome.widgets.len(),
                outcome.skipped
            );
        }
        "export" => {
            let dir = args
                .get(1)
                .map(PathBuf::from)
                .unwrap_or_else(|| config.export.output_dir.clone());
            let options = ExportOptions {
                max_width: config.export.max_width,
                max_height: config.export.max_height,
                default_width: config.export.default_width,
                default_height: config.export.default_height,
                file_prefix: config.export.file_prefix.clone(),
            };
            let mut sink = DirectorySink::new(&dir);
            let date = chrono::Local::now().date_naive();
            let result = run_export(editor.snapshot(), &options, date, &mut sink, &mut notifier);
            if let Some(notification) = notifier.visible() {
                println!("{}", notification.message);
            }
            result?;
        }
        "copy" => {
            if editor.copy(&mut StdoutClipboard, &mut notifier).is_none() {
                bail!("Copy failed");
            }
        }
        "clear" => {
            let cleared = if args.get(1).is_some_and(|arg| arg == "--yes") {
                editor.clear(&mut |_: &str| true)
            } else {
                editor.clear(&mut StdinPrompt)
            };
            if cleared.is_none() {
                println!("Nothing cleared");
            }
        }
        other => bail!("Unknown command '{other}'\n{USAGE}"),
    }

    // One tick applies any deferred work before shutdown
    editor.tick();
    editor.flush();
    if editor.has_unsaved_changes() {
        bail!("Failed to save draft to {}", config.storage_dir.display());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Config path: {}", Config::config_path().display());
            process::exit(1);
        }
    };
    log::debug!("Draft storage: {}", config.storage_dir.display());

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&config, &args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn config_in(dir: &Path) -> Config {
        Config {
            storage_dir: dir.to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn type_saves_draft_before_exit() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = config_in(temp.path());
        run(&config, &args(&["type", "hello"])).unwrap();
        let key = format!("{}.json", config.editor.storage_key);
        assert!(temp.path().join(key).exists());
    }

    #[test]
    fn failed_save_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let blocked = temp.path().join("not-a-dir");
        std::fs::write(&blocked, "").unwrap();
        let result = run(&config_in(&blocked), &args(&["type", "hello"]));
        assert!(result.is_err());
    }
}
