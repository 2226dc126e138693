//! Command-line arguments.

use crate::session::AppError;
use clap::Parser;
use opencanvas_core::config::EditorConfig;
use opencanvas_core::shortcuts::ShortcutRegistry;
use std::path::PathBuf;

/// Replay a scripted editing session and print the final scene as JSON.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "opencanvas", version, after_help = ShortcutRegistry::help_text())]
pub struct Cli {
    /// JSON array of editing steps.
    pub session: PathBuf,

    /// Editor config (canvas size and background).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Load the editor config, or the defaults when none was given.
    pub fn load_config(&self) -> Result<EditorConfig, AppError> {
        let Some(path) = &self.config else {
            return Ok(EditorConfig::default());
        };
        let json = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.clone(),
            source,
        })?;
        let config = EditorConfig::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("opencanvas").chain(args.iter().copied()))
    }

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_session_only() {
        assert_eq!(
            parse(&["steps.json"]).unwrap(),
            Cli {
                session: PathBuf::from("steps.json"),
                config: None,
            }
        );
    }

    #[test]
    fn test_with_config() {
        let expected = Cli {
            session: PathBuf::from("steps.json"),
            config: Some(PathBuf::from("editor.json")),
        };
        assert_eq!(parse(&["--config", "editor.json", "steps.json"]).unwrap(), expected);
        assert_eq!(parse(&["steps.json", "-c", "editor.json"]).unwrap(), expected);
    }

    #[test]
    fn test_help_lists_shortcuts() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let help = Cli::command().render_help().to_string();
        assert!(help.contains("Keyboard shortcuts"));
        assert!(help.contains("Circle tool"));
    }

    #[test]
    fn test_usage_errors() {
        let kind = |args: &[&str]| parse(args).unwrap_err().kind();
        assert_eq!(kind(&[]), ErrorKind::MissingRequiredArgument);
        assert!(parse(&["a.json", "b.json"]).is_err());
        assert!(parse(&["a.json", "--config"]).is_err());
        assert_eq!(kind(&["a.json", "--verbose"]), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli {
            session: PathBuf::from("steps.json"),
            config: Some(PathBuf::from("/nonexistent/opencanvas.json")),
        };
        assert!(matches!(cli.load_config(), Err(AppError::Io { .. })));
    }
}
