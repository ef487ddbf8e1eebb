use std::sync::Arc;

use log::{error, info};

use govdraft::config::Settings;
use govdraft::service::DocumentService;

#[tokio::main]
async fn main()
{   let settings = match Settings::from_env()
    {   Ok(s) => s
      , Err(e) => {
          eprintln!("{}", e);
          std::process::exit(1);
        }
    };

    let default_level = if settings.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or(default_level)
    ).init();

    info!(
      "Primary AI: {} - {}",
      settings.primary_llm,
      settings.model_for(settings.primary_llm)
    );
    info!("Document store: {}", settings.database_url);

    let settings = Arc::new(settings);
    let service = match DocumentService::from_settings(settings).await
    {   Ok(s) => Arc::new(s)
      , Err(e) => {
          error!("Startup failed: {}", e);
          std::process::exit(1);
        }
    };

    if let Err(e) = govdraft::server::serve(service).await
    {   error!("Server error: {}", e);
        std::process::exit(1);
    }
}
