use crate::analytics::VisitCounter;
use crate::config::CorsConfig;
use crate::game::GameService;
use crate::message::{
    ErrorResponse, GuessOutcome, GuessRequest, SessionTicket, StartRequest, StatsResponse,
};
use crate::session::Mode;
use crate::{Error, Result};
use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// HTTP服务器：游戏接口 + 前端静态文件
pub struct HttpServer {
    game: Arc<GameService>,
    visits: Arc<VisitCounter>,
    static_dir: String,
    cors: CorsConfig,
}

impl HttpServer {
    pub fn new(
        game: Arc<GameService>,
        visits: Arc<VisitCounter>,
        static_dir: impl Into<String>,
        cors: CorsConfig,
    ) -> Self {
        HttpServer {
            game,
            visits,
            static_dir: static_dir.into(),
            cors,
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(
                "/api/start",
                post({
                    let game = self.game.clone();
                    move |Json(request): Json<StartRequest>| async move {
                        handle_start(request, game).await
                    }
                }),
            )
            .route(
                "/api/guess",
                post({
                    let game = self.game.clone();
                    move |request: std::result::Result<Json<GuessRequest>, JsonRejection>| async move {
                        match request {
                            Ok(Json(request)) => handle_guess(request, game).await,
                            Err(rejection) => Err(Error::InvalidGuess(format!(
                                "请求格式错误: {}",
                                rejection.body_text()
                            ))),
                        }
                    }
                }),
            )
            .route(
                "/api/visit",
                get({
                    let visits = self.visits.clone();
                    move || async move { handle_visit(visits).await }
                }),
            )
            .route(
                "/api/stats",
                get({
                    let game = self.game.clone();
                    let visits = self.visits.clone();
                    move || async move { handle_stats(game, visits).await }
                }),
            )
            .route("/health", get(|| async { "ok" }))
            .fallback_service(ServeDir::new(&self.static_dir))
            .layer(cors_layer(&self.cors))
            .layer(TraceLayer::new_for_http())
    }

    /// 绑定地址并运行，直到收到 Ctrl-C
    pub async fn start(&self, addr: &str) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!("绑定HTTP地址失败: {} - {}", addr, e);
            Error::Network(anyhow::anyhow!(e))
        })?;
        info!("HTTP服务器启动在 {}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("HTTP服务器运行错误: {}", e);
                Error::Network(anyhow::anyhow!(e))
            })?;

        info!("HTTP服务器已停止");
        Ok(())
    }

    /// 在已绑定的监听器上后台运行
    pub fn spawn(&self, listener: tokio::net::TcpListener) -> tokio::task::JoinHandle<()> {
        let app = self.router();
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("HTTP服务器运行错误: {}", e);
            }
        })
    }
}

/// 根据配置构建CORS
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allowed = config
        .allowed_origins
        .as_ref()
        .filter(|origins| !origins.is_empty());

    match allowed {
        Some(origins) if !config.allow_all_origins.unwrap_or(true) => {
            let origins = origins
                .iter()
                .filter_map(|origin| origin.parse::<axum::http::HeaderValue>().ok())
                .collect::<Vec<_>>();

            debug!("CORS允许的来源: {:?}", origins);
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([axum::http::header::CONTENT_TYPE])
        }
        _ => {
            debug!("CORS配置: 允许所有来源");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("监听退出信号失败: {}", e);
    }
}

/// 处理开局
async fn handle_start(request: StartRequest, game: Arc<GameService>) -> Result<Json<SessionTicket>> {
    let mode = Mode::from_str(request.mode.as_deref().unwrap_or_default());
    let ticket = game.create_session(mode)?;
    Ok(Json(ticket))
}

/// 处理猜测
async fn handle_guess(request: GuessRequest, game: Arc<GameService>) -> Result<Json<GuessOutcome>> {
    let Some(raw_guess) = request.guess.as_str() else {
        // 先确认会话存在，与字符串猜测的校验顺序一致
        game.find_session(&request.session_id)?;
        return Err(Error::InvalidGuess(format!(
            "猜测必须是字符串: {}",
            request.guess
        )));
    };

    let outcome = game.submit_guess(&request.session_id, raw_guess).await?;
    Ok(Json(outcome))
}

async fn handle_visit(visits: Arc<VisitCounter>) -> Json<serde_json::Value> {
    let today = visits.record();
    debug!("新的访问, 今日共 {} 次", today);
    Json(serde_json::json!({ "success": true }))
}

async fn handle_stats(game: Arc<GameService>, visits: Arc<VisitCounter>) -> Json<StatsResponse> {
    Json(StatsResponse {
        visits_today: visits.today(),
        active_sessions: game.store().len(),
        pool_size: game.pool_size(),
    })
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::SupplyUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Error::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidGuess(_) => StatusCode::BAD_REQUEST,
            Error::AttemptsExhausted(_) => StatusCode::CONFLICT,
            Error::WordSelectionFailed { .. }
            | Error::Network(_)
            | Error::Storage(_)
            | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("请求失败: {}", self);
        } else {
            debug!("请求被拒绝: {}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
            retryable: self.is_retryable(),
        };
        (status, Json(body)).into_response()
    }
}
