use clap::Parser;
use tabradio::app::{App, AppSnapshot};
use tabradio::audio_worker::AudioBackend;
use tabradio::domain::SearchQuery;
use tabradio::error::AppError;
use tabradio::logging;
use tabradio::messages::source::CatalogOrigin;
use tabradio::settings::load_settings;
use tabradio::snapshot;
use tabradio::source::{
    CatalogCache, RadioClient, SourceConfig, default_data_dir, fetch_catalog_with_cache,
};
use tabradio::ui::{Cli, Command, print_stations, run_repl};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    let interactive = matches!(cli.command, None | Some(Command::Run));

    let _log_guard = logging::init(
        &data_dir,
        logging::LogConfig {
            dir: cli.log_dir.clone(),
            filter: cli.log_filter.clone(),
            stderr: !interactive,
        },
    );
    tracing::info!(data_dir = %data_dir.display(), "tabradio 启动");

    let mut settings = load_settings(&data_dir);
    if let Some(url) = cli.catalog_url.clone() {
        settings.catalog_url = Some(url);
    }

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let audio_backend = if cli.no_audio {
                AudioBackend::Null
            } else {
                AudioBackend::Probe
            };
            let initial = AppSnapshot::from_app(&App::with_policy(settings.retry_policy()));
            let (tx, rx) = tabradio::core::spawn_app_actor(data_dir, settings, audio_backend);
            run_repl(initial, tx, rx).await?;
            Ok(())
        }
        Command::Stations { tab } => {
            tracing::info!("启动模式: Stations");
            let client = RadioClient::new(SourceConfig::from_settings(data_dir.clone(), &settings))?;
            let cache = CatalogCache::new(&data_dir);
            let fetch = fetch_catalog_with_cache(&client, &cache).await?;
            if fetch.origin == CatalogOrigin::Cache {
                println!("（网络不可用，显示缓存目录）");
            }
            print_stations(&fetch.stations, tab.as_deref());
            Ok(())
        }
        Command::Search { name, country, tag } => {
            tracing::info!("启动模式: Search");
            let client = RadioClient::new(SourceConfig::from_settings(data_dir, &settings))?;
            let stations = client
                .search(&SearchQuery { name, country, tag })
                .await?;
            println!("搜索结果: {} 个电台", stations.len());
            for (i, s) in stations.iter().enumerate() {
                println!("  {:>4}. {}  [{} · {}]  {}", i + 1, s.title(), s.genre, s.country, s.stream_url);
            }
            Ok(())
        }
        Command::Export { path } => {
            snapshot::export_from_store(&data_dir, &path)?;
            println!("已导出到 {}", path.display());
            Ok(())
        }
        Command::Import { path } => {
            let report = snapshot::import_into_store(&data_dir, &path)?;
            println!("已导入: {}", report.applied.join(", "));
            if !report.skipped.is_empty() {
                println!("已跳过: {}", report.skipped.join(", "));
            }
            Ok(())
        }
    }
}
