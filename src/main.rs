use std::collections::BTreeSet;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use metrics_backend::{
    AppState,
    config::Config,
    deck::DeckWorker,
    middleware::log_errors,
    routes,
    session::SessionStore,
    store::{NewUser, Role, Stores},
    utils::hash_password,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    // 设置 Redis 客户端（会话后端）
    let redis_client =
        redis::Client::open(config.redis_url.clone()).expect("Failed to create Redis client");
    let sessions = SessionStore::new(Arc::new(redis_client), config.session_ttl_secs);

    // 构造各存储，进程内唯一，经应用状态传入handler
    let stores = Arc::new(Stores::new());
    seed_admin(&stores, &config);

    // 设置应用状态
    let state = AppState {
        config: config.clone(),
        stores,
        sessions,
        deck_worker: Arc::new(DeckWorker::new()),
    };

    let router = routes::router(state);

    // 添加日志中间件
    let router = router.layer(axum::middleware::from_fn(log_errors));

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        // 设置开发环境的CORS，允许所有来源
        let cors = tower_http::cors::CorsLayer::permissive();
        router.layer(cors)
    };

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router,
    )
    .await
    .expect("Failed to start server");
}

/// 注册只产生操作员，首个管理员由环境变量种子创建
fn seed_admin(stores: &Stores, config: &Config) {
    let (email, password) = match (&config.admin_email, &config.admin_password) {
        (Some(email), Some(password)) => (email.clone(), password.clone()),
        _ => {
            tracing::warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping admin seed");
            return;
        }
    };

    if stores.users.get_by_email(&email).is_some() {
        return;
    }

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Failed to hash admin password: {}", e);
            return;
        }
    };

    match stores.users.create(NewUser {
        email,
        password_hash,
        name: config.admin_name.clone(),
        role: Role::Admin,
        products: BTreeSet::new(),
    }) {
        Ok(admin) => tracing::info!("Seeded admin account: {}", admin.email),
        Err(e) => tracing::error!("Failed to seed admin account: {}", e),
    }
}
