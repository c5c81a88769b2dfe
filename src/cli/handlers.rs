use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use super::AppKind;
use crate::config::Settings;
use crate::error::Result;
use crate::http::Site;
use crate::news::NewsApp;
use crate::notes::NotesApp;
use crate::server;

pub fn handle_serve(app: AppKind, addr: SocketAddr, config: Option<PathBuf>) -> Result<()> {
    let settings = Settings::load(config.as_deref())?;
    tracing::info!(
        ?app,
        database = settings.database.as_deref().unwrap_or(":memory:"),
        news_count = settings.news_count_on_home_page,
        "starting"
    );

    let site: Arc<dyn Site> = match app {
        AppKind::News => Arc::new(NewsApp::open(settings)?),
        AppKind::Notes => Arc::new(NotesApp::open(settings)?),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::run(site, addr))
}

pub fn handle_config(config: Option<PathBuf>, json: bool) -> Result<()> {
    let settings = Settings::load(config.as_deref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        print!("{}", serde_yaml::to_string(&settings)?);
    }

    Ok(())
}
