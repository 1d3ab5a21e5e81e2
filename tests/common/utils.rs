use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use uuid::Uuid;
use once_cell::sync::Lazy;

use lineup_backend::auth::jwt::{issue_token, TokenSubject};
use lineup_backend::config::jwt::JwtSettings;
use lineup_backend::config::lineup_client::LineupClientSettings;
use lineup_backend::config::settings::{get_config, get_jwt_settings};
use lineup_backend::models::user::{UserRole, UserStatus};
use lineup_backend::run;
use lineup_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub jwt_settings: JwtSettings,
}

impl TestApp {
    pub fn token_for(&self, role: UserRole) -> SecretString {
        self.token_in_organization(role, Uuid::new_v4())
    }

    pub fn token_in_organization(&self, role: UserRole, organization_id: Uuid) -> SecretString {
        let subject = TokenSubject {
            user_id: Uuid::new_v4(),
            username: format!("{}{}", role, Uuid::new_v4()),
            role,
            status: UserStatus::Active,
            organization_id,
        };
        let token = issue_token(&self.jwt_settings, &subject).expect("Failed to sign token");
        SecretString::new(token.into_boxed_str())
    }

    pub fn client_settings(&self) -> LineupClientSettings {
        LineupClientSettings {
            api_base_url: self.address.clone(),
            request_timeout_secs: 5,
        }
    }
}

/// Start the server on a random port.
///
/// The pool connects lazily, so requests rejected before any query runs
/// (authentication, authorization, body validation) need no database.
pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let configuration = get_config().expect("Failed to read configuration.");
    let connection_pool = PgPoolOptions::new()
        .connect_lazy(configuration.database.connection_string().expose_secret())
        .expect("Failed to create Postgres connection pool");

    let server = run(
        listener,
        connection_pool,
        get_jwt_settings(&configuration),
        vec![],
    )
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);

    TestApp {
        address,
        jwt_settings: get_jwt_settings(&configuration),
    }
}
