//! `boatsync detail`

use anyhow::{bail, Result};

use boatsync::app::App;
use boatsync::config::Config;
use boatsync::utils::error::QueryError;

/// Print one boat as pretty JSON
pub async fn detail(config: Config, id: &str) -> Result<()> {
    let app = App::from_config(config)?;

    match app.query().fetch_detail(id).await {
        Ok(boat) => {
            println!("{}", serde_json::to_string_pretty(&boat)?);
            Ok(())
        }
        Err(QueryError::DetailNotFound(_)) => bail!("Boat {id} not found"),
        Err(e) => Err(e.into()),
    }
}
