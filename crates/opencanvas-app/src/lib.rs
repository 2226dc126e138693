//! OpenCanvas Application
//!
//! Headless shell around the editor: command-line handling and replay of
//! scripted editing sessions against a raster surface.

mod cli;
mod session;

pub use cli::Cli;
pub use session::{AppError, Session, SessionReport, SessionStep, StepValue};

/// Run a parsed command line and return the scene JSON to print.
pub fn run(cli: &Cli) -> Result<String, AppError> {
    let config = cli.load_config()?;
    let steps = Session::load_steps(&cli.session)?;
    let mut session = Session::new(config);
    let report = session.run(&steps);
    log::info!("Session finished: {} steps applied, {} failed", report.applied, report.failed);
    session.scene_json()
}
