use actix_web::{App, HttpServer, middleware::Logger};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agora::{
  adapters::http::{AccountRouteDependencies, configure_account_routes},
  application::auth::{
    BecomeSellerUseCase, GetCurrentAccountUseCase, LoginAccountUseCase, RegisterAccountUseCase,
    RequestVerificationCodeUseCase, VerifyAccountUseCase,
  },
  domain::auth::{
    ports::{SmsSender, TokenService},
    services::{AuthService, AuthServiceConfig},
    verification::VerificationService,
  },
  infrastructure::{
    config::Config,
    notifications::{MockSmsSender, TwilioSmsSender},
    persistence::postgres::PostgresAccountRepository,
    security::{Argon2PasswordHasher, JwtTokenService},
  },
};

fn startup_error(context: &str, error: impl std::fmt::Display) -> std::io::Error {
  tracing::error!("{}: {}", context, error);
  std::io::Error::other(format!("{}: {}", context, error))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "agora=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting Agora account service");

  let config = Config::load().map_err(|e| startup_error("Failed to load configuration", e))?;
  config
    .validate()
    .map_err(|e| startup_error("Invalid configuration", e))?;
  tracing::info!("Configuration loaded successfully");

  // Set up database connection pool with timeout
  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .map_err(|e| startup_error("Failed to run database migrations", e))?;
  tracing::info!("Database migrations completed");

  // Adapters
  let account_repo = Arc::new(PostgresAccountRepository::new(db_pool));
  let password_hasher = Arc::new(
    Argon2PasswordHasher::new().map_err(|e| startup_error("Failed to create password hasher", e))?,
  );
  let token_service: Arc<dyn TokenService> = Arc::new(
    JwtTokenService::new(config.security.jwt_secret.as_bytes())
      .map_err(|e| startup_error("Failed to create token service", e))?,
  );
  let sms_sender: Arc<dyn SmsSender> = if config.sms.mock {
    tracing::warn!("SMS delivery is mocked; verification codes are only logged");
    Arc::new(MockSmsSender::new())
  } else {
    let credentials = config
      .sms
      .twilio_credentials()
      .map_err(|e| startup_error("Missing Twilio credentials", e))?;
    Arc::new(
      TwilioSmsSender::new(
        &config.sms.twilio_base_url,
        credentials.account_sid,
        credentials.auth_token,
        credentials.from_number,
      )
      .map_err(|e| startup_error("Failed to create SMS sender", e))?,
    )
  };

  // Domain services
  let auth_service = Arc::new(AuthService::new(
    account_repo.clone(),
    password_hasher,
    token_service.clone(),
    AuthServiceConfig {
      uniform_login_errors: config.security.uniform_login_errors,
    },
  ));
  let verification_service = Arc::new(VerificationService::new(
    account_repo,
    token_service,
    sms_sender,
  ));

  // Use cases
  let deps = AccountRouteDependencies {
    register_use_case: Arc::new(RegisterAccountUseCase::new(auth_service.clone())),
    login_use_case: Arc::new(LoginAccountUseCase::new(auth_service.clone())),
    request_code_use_case: Arc::new(RequestVerificationCodeUseCase::new(
      verification_service.clone(),
    )),
    verify_use_case: Arc::new(VerifyAccountUseCase::new(verification_service)),
    become_seller_use_case: Arc::new(BecomeSellerUseCase::new(auth_service.clone())),
    get_account_use_case: Arc::new(GetCurrentAccountUseCase::new(auth_service)),
  };

  let bind_address = (config.server.host.clone(), config.server.port);
  tracing::info!(
    "Starting HTTP server on {}:{}",
    bind_address.0,
    bind_address.1
  );

  HttpServer::new(move || {
    App::new()
      .wrap(Logger::default())
      .configure(|cfg| configure_account_routes(cfg, deps.clone()))
  })
  .bind(bind_address)?
  .run()
  .await
}
