use std::env;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub redis_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub session_ttl_secs: u64,
    pub deck_render_delay_secs: u64,
    pub deck_base_url: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let session_ttl = env::var("SESSION_TTL")?
            .trim_end_matches('h')
            .parse::<u64>()
            .unwrap_or(24);
        Ok(Config {
            redis_url: env::var("REDIS_URL")?,
            server_host: env::var("SERVER_HOST")?,
            server_port: env::var("SERVER_PORT")?.parse().unwrap_or(3000),
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/api".to_string()),
            session_ttl_secs: session_ttl * 3600,
            deck_render_delay_secs: env::var("DECK_RENDER_DELAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            deck_base_url: env::var("DECK_BASE_URL")
                .unwrap_or_else(|_| "https://decks.internal".to_string()),
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            admin_name: env::var("ADMIN_NAME").unwrap_or_else(|_| "管理员".to_string()),
        })
    }

    pub fn deck_render_delay(&self) -> Duration {
        Duration::from_secs(self.deck_render_delay_secs)
    }
}
