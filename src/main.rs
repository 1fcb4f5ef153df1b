// region:    --- Imports
use auction_listings::config::Config;
use auction_listings::database::DatabaseManager;
use auction_listings::handlers::AppState;
use auction_listings::routes::build_router;
use auction_listings::store::{EntityStore, MemoryEntityStore, PostgresEntityStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    info!("{:<12} --> 정책: {:?}", "Main", config.policy);

    // 저장소 선택 (DATABASE_URL 이 없으면 메모리 저장소)
    let store: Arc<dyn EntityStore> = match config.database_url.as_deref() {
        Some(database_url) => {
            let db_manager = Arc::new(DatabaseManager::new(database_url, &config).await?);

            // 데이터베이스 초기화
            if let Err(e) = db_manager.initialize_database(config.reset_database).await {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
            Arc::new(PostgresEntityStore::new(db_manager))
        }
        None => {
            warn!(
                "{:<12} --> DATABASE_URL 미설정: 메모리 저장소 사용 (재시작 시 데이터 소실)",
                "Main"
            );
            Arc::new(MemoryEntityStore::new())
        }
    };

    let routes_all = build_router(AppState::new(store, config.policy));

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
