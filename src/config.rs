use std::env;

/// Which storage backing the record store runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    FlatFile,
    Sqlite,
}

impl StoreBackend {
    fn from_env_value(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "sqlite" => StoreBackend::Sqlite,
            _ => StoreBackend::FlatFile,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::FlatFile => "flatfile",
            StoreBackend::Sqlite => "sqlite",
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub data_file: String,
    pub database_url: String,
    /// Base URL baked into every QR symbol so printed sheets point back
    /// at this deployment's /view endpoint.
    pub public_base_url: String,
    pub logo_path: String,
    pub font_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            store_backend: StoreBackend::from_env_value(
                &env::var("STORE_BACKEND").unwrap_or_else(|_| "flatfile".to_string()),
            ),
            data_file: env::var("DATA_FILE")
                .unwrap_or_else(|_| "./qr_mapping_pipe_separated.txt".to_string()),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "./.db/qrref.db".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            logo_path: env::var("LOGO_PATH").unwrap_or_else(|_| "./doll.png".to_string()),
            font_path: env::var("FONT_PATH")
                .ok()
                .or_else(|| Some("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf".to_string())),
        }
    }
}
