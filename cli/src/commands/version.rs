//! Version command

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::status::wsl_version;
use crate::output::json;

/// Run the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub async fn run(app: &AppContext) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let wsl = wsl_version(app.wsl.as_ref()).await;

    if app.is_json() {
        json::print(&serde_json::json!({ "version": version, "wsl": wsl }))?;
    } else {
        println!("wslhub {version}");
        println!("WSL {wsl}");
    }
    Ok(())
}
