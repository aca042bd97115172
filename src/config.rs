use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub port: u16,
    pub rust_log: String,
    pub amqp_host: String,
    pub amqp_port: u16,
    pub amqp_user: String,
    pub amqp_password: String,
    pub rabbitmq_exchange: String,
    pub rabbitmq_queue: String,
    pub rabbitmq_report_routing_key: String,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_public_url_base: Option<String>,
    pub duplicate_radius_km: f64,
    pub duplicate_title_threshold: f64,
    pub duplicate_description_threshold: f64,
    pub duplicate_window_days: i64,
}

impl Config {
    pub fn load() -> Self {
        let config = Self {
            db_host: env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            db_port: env::var("DB_PORT")
                .unwrap_or_else(|_| "3306".to_string())
                .parse()
                .unwrap_or(3306),
            db_user: env::var("DB_USER").unwrap_or_else(|_| "server".to_string()),
            db_password: env::var("DB_PASSWORD").unwrap_or_else(|_| "secret_app".to_string()),
            db_name: env::var("DB_NAME").unwrap_or_else(|_| "ecowatch".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            amqp_host: env::var("AMQP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            amqp_port: env::var("AMQP_PORT")
                .unwrap_or_else(|_| "5672".to_string())
                .parse()
                .unwrap_or(5672),
            amqp_user: env::var("AMQP_USER").unwrap_or_else(|_| "guest".to_string()),
            amqp_password: env::var("AMQP_PASSWORD").unwrap_or_else(|_| "guest".to_string()),
            rabbitmq_exchange: env::var("RABBITMQ_EXCHANGE")
                .unwrap_or_else(|_| "ecowatch".to_string()),
            rabbitmq_queue: env::var("RABBITMQ_QUEUE")
                .unwrap_or_else(|_| "incident-reports".to_string()),
            rabbitmq_report_routing_key: env::var("RABBITMQ_REPORT_ROUTING_KEY")
                .unwrap_or_else(|_| "report.submitted".to_string()),
            s3_bucket: env::var("S3_BUCKET").unwrap_or_else(|_| "ecowatch-evidence".to_string()),
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            s3_public_url_base: env::var("S3_PUBLIC_URL_BASE").ok(),
            duplicate_radius_km: env::var("DUPLICATE_RADIUS_KM")
                .unwrap_or_else(|_| "0.5".to_string())
                .parse()
                .unwrap_or(0.5),
            duplicate_title_threshold: env::var("DUPLICATE_TITLE_THRESHOLD")
                .unwrap_or_else(|_| "0.7".to_string())
                .parse()
                .unwrap_or(0.7),
            duplicate_description_threshold: env::var("DUPLICATE_DESCRIPTION_THRESHOLD")
                .unwrap_or_else(|_| "0.6".to_string())
                .parse()
                .unwrap_or(0.6),
            duplicate_window_days: env::var("DUPLICATE_WINDOW_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .unwrap_or(7),
        };

        // Validate configuration
        if config.db_host.is_empty() {
            panic!("DB_HOST environment variable is required");
        }
        if config.db_user.is_empty() {
            panic!("DB_USER environment variable is required");
        }
        if config.db_password.is_empty() {
            panic!("DB_PASSWORD environment variable is required");
        }
        if config.db_name.is_empty() {
            panic!("DB_NAME environment variable is required");
        }
        if config.port == 0 {
            panic!("PORT environment variable must be a valid port number");
        }
        if config.duplicate_radius_km <= 0.0 {
            panic!("DUPLICATE_RADIUS_KM must be positive");
        }

        config
    }

    pub fn amqp_url(&self) -> String {
        format!(
            "amqp://{}:{}@{}:{}",
            self.amqp_user, self.amqp_password, self.amqp_host, self.amqp_port
        )
    }
}
