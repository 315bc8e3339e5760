use crate::errors::{ErrorKind, RepoError, RepoResult};
use crate::options::{translate, DatabaseConfig};
use bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// Environment variable holding the connection string.
pub const MONGODB_URI_VAR: &str = "MONGODB_URI";
/// Environment variable holding the database name.
pub const DATABASE_NAME_VAR: &str = "DATABASE_NAME";

const INVALID_DATABASE_CHARS: &[char] = &['/', '\\', '.', ' ', '"', '$'];

/// Resolves a connection string and database name into a live [`Database`] handle.
///
/// A `Connector` only holds configuration; nothing touches the network until
/// [`connect`](Connector::connect) is called. Connection pooling is left entirely to
/// the driver.
///
/// # Examples
///
/// ```rust,ignore
/// // From MONGODB_URI and DATABASE_NAME
/// let db = Connector::from_env()?.connect().await?;
///
/// // Programmatically
/// let db = Connector::builder()
///     .uri("mongodb://localhost:27017")
///     .database("shop")
///     .app_name("inventory")
///     .database_config(DatabaseConfig::new().read_concern(ReadConcern::majority()))
///     .build()?
///     .connect()
///     .await?;
/// ```
#[derive(Clone)]
pub struct Connector {
    uri: String,
    database: String,
    app_name: Option<String>,
    connect_timeout: Option<Duration>,
    database_config: Option<DatabaseConfig>,
}

impl Connector {
    /// Creates a connector for `database` at `uri` with no further settings.
    pub fn new(database: &str, uri: &str) -> RepoResult<Connector> {
        Connector::builder().uri(uri).database(database).build()
    }

    /// Creates a connector from the `MONGODB_URI` and `DATABASE_NAME` environment
    /// variables.
    pub fn from_env() -> RepoResult<Connector> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> RepoResult<Connector>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = lookup(MONGODB_URI_VAR).ok_or_else(|| missing_variable(MONGODB_URI_VAR))?;
        let database =
            lookup(DATABASE_NAME_VAR).ok_or_else(|| missing_variable(DATABASE_NAME_VAR))?;
        Connector::new(&database, &uri)
    }

    pub fn builder() -> ConnectorBuilder {
        ConnectorBuilder::new()
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn database_name(&self) -> &str {
        &self.database
    }

    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    pub fn database_config(&self) -> Option<&DatabaseConfig> {
        self.database_config.as_ref()
    }

    /// Opens a client, selects the database, and pings the server.
    ///
    /// Every failure along the way, from a malformed URI to an unreachable server,
    /// is reported as [`ErrorKind::Connection`].
    pub async fn connect(&self) -> RepoResult<Database> {
        let mut client_options = ClientOptions::parse(&self.uri)
            .await
            .map_err(|e| self.connection_error("invalid connection string", e))?;
        if let Some(app_name) = &self.app_name {
            client_options.app_name = Some(app_name.clone());
        }
        if let Some(timeout) = self.connect_timeout {
            client_options.connect_timeout = Some(timeout);
            client_options.server_selection_timeout = Some(timeout);
        }

        let client = Client::with_options(client_options)
            .map_err(|e| self.connection_error("failed to create client", e))?;
        let database = client.database_with_options(
            &self.database,
            translate::database_options(self.database_config.clone()),
        );

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| self.connection_error("ping failed", e))?;
        log::debug!("Connected to database {}", self.database);
        Ok(database)
    }

    fn connection_error(&self, message: &str, cause: mongodb::error::Error) -> RepoError {
        let err = RepoError::new_with_cause(
            &format!("{} for database {}: {}", message, self.database, cause),
            ErrorKind::Connection,
            cause,
        );
        log::error!("{}", err);
        err
    }
}

// The connection string may carry credentials, so it stays out of debug output.
impl Debug for Connector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("database", &self.database)
            .field("app_name", &self.app_name)
            .field("connect_timeout", &self.connect_timeout)
            .field("database_config", &self.database_config)
            .finish()
    }
}

/// Builder for [`Connector`].
///
/// The first invalid setting is remembered and returned from [`build`](Self::build);
/// later settings are ignored once an error has been captured.
#[derive(Default)]
pub struct ConnectorBuilder {
    error: Option<RepoError>,
    uri: Option<String>,
    database: Option<String>,
    app_name: Option<String>,
    connect_timeout: Option<Duration>,
    database_config: Option<DatabaseConfig>,
}

impl ConnectorBuilder {
    pub fn new() -> Self {
        ConnectorBuilder::default()
    }

    /// Sets the connection string. It must use the `mongodb://` or
    /// `mongodb+srv://` scheme.
    pub fn uri(mut self, uri: &str) -> Self {
        if self.error.is_none() {
            let uri = uri.trim();
            if uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://") {
                self.uri = Some(uri.to_string());
            } else {
                self.error = Some(RepoError::new(
                    "connection string must start with mongodb:// or mongodb+srv://",
                    ErrorKind::Configuration,
                ));
            }
        }
        self
    }

    /// Sets the database name.
    pub fn database(mut self, database: &str) -> Self {
        if self.error.is_none() {
            if database.is_empty() {
                self.error = Some(RepoError::new(
                    "database name cannot be empty",
                    ErrorKind::Configuration,
                ));
            } else if database.contains(INVALID_DATABASE_CHARS) {
                self.error = Some(RepoError::new(
                    &format!("database name {} contains an invalid character", database),
                    ErrorKind::Configuration,
                ));
            } else {
                self.database = Some(database.to_string());
            }
        }
        self
    }

    /// Sets the application name reported to the server.
    pub fn app_name(mut self, app_name: &str) -> Self {
        if self.error.is_none() {
            self.app_name = Some(app_name.to_string());
        }
        self
    }

    /// Bounds both socket connection and server selection.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        if self.error.is_none() {
            if timeout.is_zero() {
                self.error = Some(RepoError::new(
                    "connect timeout must be greater than zero",
                    ErrorKind::Configuration,
                ));
            } else {
                self.connect_timeout = Some(timeout);
            }
        }
        self
    }

    /// Sets the concerns and read preference of the database handle.
    pub fn database_config(mut self, database_config: DatabaseConfig) -> Self {
        if self.error.is_none() {
            self.database_config = Some(database_config);
        }
        self
    }

    pub fn build(self) -> RepoResult<Connector> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let uri = self.uri.ok_or_else(|| {
            RepoError::new("connection string is not set", ErrorKind::Configuration)
        })?;
        let database = self.database.ok_or_else(|| {
            RepoError::new("database name is not set", ErrorKind::Configuration)
        })?;

        Ok(Connector {
            uri,
            database,
            app_name: self.app_name,
            connect_timeout: self.connect_timeout,
            database_config: self.database_config,
        })
    }
}

fn missing_variable(name: &str) -> RepoError {
    RepoError::new(
        &format!("environment variable {} is not set", name),
        ErrorKind::Configuration,
    )
}
