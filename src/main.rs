use std::sync::Arc;
use termo_server::*;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化全局配置
    Config::init()?;
    let config = Config::get();

    // 初始化日志
    tracing_subscriber::registry()
        .with(EnvFilter::new(config.log_filter()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("配置加载成功: {:?}", config);

    let word_bank = Arc::new(WordBank::new(config.word_bank.clone()));
    let store = Arc::new(SessionStore::new());
    let visits = Arc::new(VisitCounter::new());
    let game = Arc::new(GameService::new(
        store.clone(),
        word_bank.clone(),
        config.game.clone(),
    ));

    scheduler::spawn_daily_rotation(word_bank, visits.clone());
    if let Some(ttl) = config.game.session_ttl() {
        tracing::info!("闲置会话将在 {:?} 后清理", ttl);
        scheduler::spawn_session_sweeper(store, ttl, config.game.sweep_interval());
    }

    let server = HttpServer::new(
        game,
        visits,
        config.server.static_dir.clone(),
        config.cors.clone(),
    );

    server.start(&config.http_addr()).await
}
