pub mod advisory;
pub mod domain;
pub mod pricing;
pub mod tables;

pub mod config {
    #[derive(Debug, Clone)]
    pub struct Settings {
        pub crop_table_path: Option<String>,
        pub demand_table_path: Option<String>,
        pub profile_table_path: Option<String>,
        pub price_table_path: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                crop_table_path: std::env::var("CROP_TABLE_PATH").ok(),
                demand_table_path: std::env::var("DEMAND_TABLE_PATH").ok(),
                profile_table_path: std::env::var("PROFILE_TABLE_PATH").ok(),
                price_table_path: std::env::var("PRICE_TABLE_PATH").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }
    }
}
