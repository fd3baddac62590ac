use serde::Deserialize;

/// Seven days, the lifetime of a login token.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 7;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayPalConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_base: String,
    pub currency: String,
    pub brand_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GamesConfig {
    pub games_api_base: String,
    pub thumbnails_api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub client_url: String,
    pub cookie_secure: bool,
    pub jwt: JwtConfig,
    pub paypal: PayPalConfig,
    pub storage: StorageConfig,
    pub games: GamesConfig,
}

/// Live API for `production`, sandbox for everything else.
pub fn paypal_api_base(env: &str) -> &'static str {
    if env.eq_ignore_ascii_case("production") {
        "https://api-m.paypal.com"
    } else {
        "https://api-m.sandbox.paypal.com"
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: env_or("JWT_ISSUER", "storefront"),
            audience: env_or("JWT_AUDIENCE", "storefront-users"),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES),
        };

        let paypal_env = env_or("PAYPAL_ENV", "sandbox");
        let paypal = PayPalConfig {
            client_id: std::env::var("PAYPAL_CLIENT_ID")?,
            client_secret: std::env::var("PAYPAL_CLIENT_SECRET")?,
            api_base: std::env::var("PAYPAL_API_BASE")
                .unwrap_or_else(|_| paypal_api_base(&paypal_env).into()),
            currency: env_or("PAYPAL_CURRENCY", "USD"),
            brand_name: env_or("PAYPAL_BRAND_NAME", "Game Dev Studio"),
        };

        let storage = StorageConfig {
            endpoint: env_or("S3_ENDPOINT", "http://localhost:9000"),
            bucket: env_or("S3_BUCKET", "downloads"),
            access_key: env_or("S3_ACCESS_KEY", "minioadmin"),
            secret_key: env_or("S3_SECRET_KEY", "minioadmin"),
            region: env_or("S3_REGION", "us-east-1"),
        };

        let games = GamesConfig {
            games_api_base: env_or("GAMES_API_BASE", "https://games.roblox.com"),
            thumbnails_api_base: env_or("THUMBNAILS_API_BASE", "https://thumbnails.roblox.com"),
        };

        Ok(Self {
            database_url,
            client_url: env_or("CLIENT_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            jwt,
            paypal,
            storage,
            games,
        })
    }
}
