use std::{io::Write, path::Path};
use tracing_subscriber::EnvFilter;
use yansi::Paint;

/// Initializes a tracing subscriber for logging, writing to stderr.
///
/// Filtered by `RUST_LOG`, off by default.
pub fn subscriber() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

/// Loads a `.env` file from the current directory, if any.
///
/// Variables already set in the environment take precedence.
pub fn load_dotenv() {
    let Ok(cwd) = std::env::current_dir() else { return };
    load_dotenv_from(&cwd);
}

fn load_dotenv_from(dir: &Path) {
    match dotenvy::from_path(dir.join(".env")) {
        Ok(()) => debug!(dir = %dir.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(%err, "failed to load .env"),
    }
}

/// Disables terminal colors if stdout is not a terminal or `NO_COLOR` is set.
pub fn enable_paint() {
    let enable = yansi::Condition::os_support() && yansi::Condition::tty_and_color_live();
    yansi::whenever(yansi::Condition::cached(enable));
}

/// Shows a user-facing alert on stdout.
pub fn alert(message: &str) {
    println!("{} {message}", "!".yellow().bold());
}

/// Prints `label` and reads one line from stdin, without the trailing newline.
pub async fn prompt<R>(lines: &mut tokio::io::Lines<R>, label: &str) -> eyre::Result<String>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    print!("{}: ", label.bold());
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncBufReadExt;

    #[test]
    fn dotenv_does_not_override() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(".env", "TIPJAR_DOTENV_NEW=from-file\nTIPJAR_DOTENV_SET=from-file\n")?;
            jail.set_env("TIPJAR_DOTENV_SET", "from-env");
            load_dotenv_from(jail.directory());
            assert_eq!(std::env::var("TIPJAR_DOTENV_NEW").unwrap(), "from-file");
            assert_eq!(std::env::var("TIPJAR_DOTENV_SET").unwrap(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn missing_dotenv_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        load_dotenv_from(dir.path());
    }

    #[tokio::test]
    async fn prompt_reads_lines() {
        let input: &[u8] = b"alice\n\n";
        let mut lines = input.lines();
        assert_eq!(prompt(&mut lines, "Name").await.unwrap(), "alice");
        assert_eq!(prompt(&mut lines, "Message").await.unwrap(), "");
        assert_eq!(prompt(&mut lines, "Message").await.unwrap(), "");
    }
}
