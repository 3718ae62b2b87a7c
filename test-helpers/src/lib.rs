use api::time::TimeSource;

pub mod mock;
use api::store::Store;
use api::telemetry::{self, LogFormat};
use api::Config;
use jiff::civil::Date;
use payloads::{APIClient, Role, SessionContext, UserId, requests};
use reqwest::StatusCode;
use std::time::Duration;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub struct TestApp {
    #[allow(unused)]
    pub port: u16,
    pub client: APIClient,
    pub time_source: TimeSource,
    /// Direct handle to the backend's repository, for seeding data that has
    /// no public endpoint.
    pub store: Store,
}

impl TestApp {
    pub fn address(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// A second client against the same backend with its own session.
    pub fn new_client(&self) -> APIClient {
        APIClient::new(self.address(), SessionContext::in_memory())
    }
}

/// Functions to populate test data
///
/// Using anyhow::Result lets us get a backtrace from when the error was fist
/// converted to anyhow::Result. Run with RUST_BACKTRACE=1 to view.
impl TestApp {
    /// Register alice; the client is left signed in as her.
    pub async fn create_alice_user(&self) -> anyhow::Result<UserId> {
        let session = self.client.register(&alice_credentials()).await?;
        Ok(session.user.id)
    }

    pub async fn create_bob_user(&self) -> anyhow::Result<UserId> {
        let session = self.client.register(&bob_credentials()).await?;
        Ok(session.user.id)
    }

    /// Admins can't self-register, so the account is written straight into
    /// the store. The client is not signed in.
    pub async fn create_admin_user(&self) -> anyhow::Result<UserId> {
        let credentials = admin_credentials();
        let user = api::password::create_user(
            api::password::NewUserDetails::new(
                &credentials.nombre,
                &credentials.email,
                &credentials.password,
            ),
            Role::Admin,
            &self.store,
            &self.time_source,
        )
        .await?;
        Ok(user.id)
    }

    pub async fn login_alice(&self) -> anyhow::Result<()> {
        self.client.logout().await?;
        self.client.login(&alice_login_credentials()).await?;
        Ok(())
    }

    pub async fn login_bob(&self) -> anyhow::Result<()> {
        self.client.logout().await?;
        self.client.login(&bob_login_credentials()).await?;
        Ok(())
    }

    pub async fn login_admin(&self) -> anyhow::Result<()> {
        self.client.logout().await?;
        self.client.login(&admin_login_credentials()).await?;
        Ok(())
    }

    /// Add a book as admin, then return to the previous signed-out state.
    pub async fn create_test_book(
        &self,
        titulo: &str,
        categoria: &str,
    ) -> anyhow::Result<payloads::responses::Book> {
        let admin = self.new_client();
        admin.login(&admin_login_credentials()).await?;
        Ok(admin.create_book(&book_details(titulo, categoria)).await?)
    }
}

pub fn alice_credentials() -> requests::RegisterAccount {
    requests::RegisterAccount {
        nombre: "Alicia".into(),
        password: "supersecret".into(),
        email: "alicia@example.com".into(),
    }
}

pub fn alice_login_credentials() -> requests::LoginCredentials {
    to_login_credentials(&alice_credentials())
}

pub fn bob_credentials() -> requests::RegisterAccount {
    requests::RegisterAccount {
        nombre: "Beatriz".into(),
        password: "beapassword".into(),
        email: "beatriz@example.com".into(),
    }
}

pub fn bob_login_credentials() -> requests::LoginCredentials {
    to_login_credentials(&bob_credentials())
}

pub fn admin_credentials() -> requests::RegisterAccount {
    requests::RegisterAccount {
        nombre: "Coordinación".into(),
        password: "adminpassword".into(),
        email: "admin@example.com".into(),
    }
}

pub fn admin_login_credentials() -> requests::LoginCredentials {
    to_login_credentials(&admin_credentials())
}

// Helper function to convert RegisterAccount to LoginCredentials
pub fn to_login_credentials(
    account: &requests::RegisterAccount,
) -> requests::LoginCredentials {
    requests::LoginCredentials {
        email: account.email.clone(),
        password: account.password.clone(),
    }
}

pub fn book_details(titulo: &str, categoria: &str) -> payloads::Book {
    payloads::Book {
        titulo: titulo.into(),
        autor: "María Montessori".into(),
        descripcion: Some(format!("Guía práctica: {titulo}")),
        categoria: categoria.into(),
        edad_recomendada: Some("0-3 años".into()),
        url_descarga: None,
        imagen_portada: None,
    }
}

pub fn directory_details(nombre: &str, categoria: &str) -> payloads::Directory {
    payloads::Directory {
        nombre: nombre.into(),
        descripcion: Some("Atención a madres y familias".into()),
        categoria: categoria.into(),
        telefono: Some("555-0100".into()),
        email: None,
        direccion: Some("Av. Central 123".into()),
        sitio_web: None,
        horario: Some("Lunes a viernes 9:00-17:00".into()),
    }
}

pub fn diary_entry(fecha: Date, contenido: &str, emocion: &str) -> payloads::DiaryEntry {
    payloads::DiaryEntry {
        emocion: Some(emocion.into()),
        ..payloads::DiaryEntry::new(fecha, contenido)
    }
}

pub async fn spawn_app_on_port(port: u16) -> TestApp {
    let subscriber = telemetry::get_subscriber("error".into(), LogFormat::Compact);
    let _ = LogTracer::init();
    let _ = subscriber.try_init();

    #[cfg(any(feature = "mock-time", test))]
    let time_source = TimeSource::new("2025-01-01T00:00:00Z".parse().unwrap());

    #[cfg(not(any(feature = "mock-time", test)))]
    let time_source = TimeSource::new();

    let mut config = Config {
        ip: "127.0.0.1".into(),
        port,
        allowed_origins: vec!["*".to_string()],
        timezone: jiff::tz::TimeZone::UTC,
    };

    let store = Store::default();
    let server = api::build(&mut config, time_source.clone(), store.clone())
        .await
        .unwrap();
    tokio::spawn(server);

    TestApp {
        port: config.port,
        client: APIClient::new(
            format!("http://127.0.0.1:{}", config.port),
            SessionContext::in_memory(),
        ),
        time_source,
        store,
    }
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_on_port(0).await
}

/// A canned response served for every path.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl StubResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Serve `response` on an OS-assigned port and return its address. Used to
/// check how the client classifies statuses the real backend doesn't emit.
pub async fn spawn_stub_server(response: StubResponse) -> anyhow::Result<String> {
    use actix_web::{App, HttpResponse, HttpServer, http, web};

    let status = http::StatusCode::from_u16(response.status)?;
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    let server = HttpServer::new(move || {
        let response = response.clone();
        App::new().default_service(web::to(move || {
            let response = response.clone();
            async move {
                tokio::time::sleep(response.delay).await;
                HttpResponse::build(status)
                    .content_type("application/json")
                    .body(response.body)
            }
        }))
    })
    .workers(1)
    .listen(listener)?
    .run();
    tokio::spawn(server);
    Ok(format!("http://127.0.0.1:{port}"))
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T: std::fmt::Debug>(
    result: Result<T, payloads::ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(e) => assert_eq!(e.status(), Some(expected), "unexpected error: {e}"),
        Ok(value) => panic!("Expected {expected}, got Ok({value:?})"),
    };
}
