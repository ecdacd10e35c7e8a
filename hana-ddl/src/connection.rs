use std::fmt::{Debug, Formatter};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::catalog_reader::CatalogReader;
use crate::error::DriverError;
use crate::{HanaDdlError, Result};

/// One row of a catalog query, keyed by column name.
pub type CatalogRow = Map<String, Value>;

/// What the host tool sends to connect to a database.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_password: String,
    pub database: Option<String>,
    pub schema: Option<String>,
    #[serde(default = "default_true")]
    pub ssl: bool,
    #[serde(default = "default_true")]
    pub ssl_validate_certificate: bool,
    pub ssl_crypto_provider: Option<String>,
    pub ssl_trust_store: Option<String>,
    #[serde(default)]
    pub include_system_collection: bool,
}

fn default_port() -> u16 {
    443
}

fn default_true() -> bool {
    true
}

impl ConnectionInfo {
    pub fn new(host: &str, user_name: &str, user_password: &str) -> Self {
        ConnectionInfo {
            host: host.to_string(),
            port: default_port(),
            user_name: user_name.to_string(),
            user_password: user_password.to_string(),
            database: None,
            schema: None,
            ssl: true,
            ssl_validate_certificate: true,
            ssl_crypto_provider: None,
            ssl_trust_store: None,
            include_system_collection: false,
        }
    }
}

impl Debug for ConnectionInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionInfo")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user_name", &self.user_name)
            .field("user_password", &"***")
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("ssl", &self.ssl)
            .field("ssl_validate_certificate", &self.ssl_validate_certificate)
            .field("ssl_crypto_provider", &self.ssl_crypto_provider)
            .field("ssl_trust_store", &self.ssl_trust_store)
            .field("include_system_collection", &self.include_system_collection)
            .finish()
    }
}

/// The parameters handed to the database driver.
#[derive(Clone, Eq, PartialEq)]
pub struct ConnectionParams {
    /// `host:port`
    pub server_node: String,
    pub uid: String,
    pub pwd: String,
    pub encrypt: bool,
    pub ssl_validate_certificate: bool,
    pub database_name: Option<String>,
    pub current_schema: Option<String>,
    pub ssl_crypto_provider: Option<String>,
    pub ssl_trust_store: Option<String>,
}

impl ConnectionParams {
    /// The parameters as the driver's key/value pairs. Flags are `"true"`/`"false"`,
    /// unset optional parameters are left out.
    pub fn to_driver_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("serverNode", self.server_node.clone()),
            ("uid", self.uid.clone()),
            ("pwd", self.pwd.clone()),
            ("encrypt", self.encrypt.to_string()),
            ("sslValidateCertificate", self.ssl_validate_certificate.to_string()),
        ];

        let optional = [
            ("databaseName", &self.database_name),
            ("currentSchema", &self.current_schema),
            ("sslCryptoProvider", &self.ssl_crypto_provider),
            ("sslTrustStore", &self.ssl_trust_store),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                pairs.push((key, value.clone()));
            }
        }

        pairs
    }
}

impl From<&ConnectionInfo> for ConnectionParams {
    fn from(info: &ConnectionInfo) -> Self {
        let present = |value: &Option<String>| value.as_ref().filter(|v| !v.is_empty()).cloned();

        ConnectionParams {
            server_node: format!("{}:{}", info.host, info.port),
            uid: info.user_name.clone(),
            pwd: info.user_password.clone(),
            encrypt: info.ssl,
            ssl_validate_certificate: info.ssl_validate_certificate,
            database_name: present(&info.database),
            current_schema: present(&info.schema),
            ssl_crypto_provider: present(&info.ssl_crypto_provider),
            ssl_trust_store: present(&info.ssl_trust_store),
        }
    }
}

impl Debug for ConnectionParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("server_node", &self.server_node)
            .field("uid", &self.uid)
            .field("pwd", &"***")
            .field("encrypt", &self.encrypt)
            .field("ssl_validate_certificate", &self.ssl_validate_certificate)
            .field("database_name", &self.database_name)
            .field("current_schema", &self.current_schema)
            .field("ssl_crypto_provider", &self.ssl_crypto_provider)
            .field("ssl_trust_store", &self.ssl_trust_store)
            .finish()
    }
}

/// An open connection provided by a database driver.
#[async_trait]
pub trait HanaConnection: Send + Sync {
    async fn execute(&self, sql: &str) -> std::result::Result<(), DriverError>;

    async fn query(&self, sql: &str) -> std::result::Result<Vec<CatalogRow>, DriverError>;

    async fn close(&self) -> std::result::Result<(), DriverError>;
}

/// Opens connections. This is where a database driver is plugged in.
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: HanaConnection;

    async fn connect(&self, params: &ConnectionParams) -> std::result::Result<Self::Connection, DriverError>;
}

/// A caller-owned connection. Closing consumes the session, so it can't be used afterwards.
pub struct HanaSession<C: HanaConnection> {
    pub(crate) connection: C,
}

impl<C: HanaConnection> HanaSession<C> {
    #[instrument(skip_all)]
    pub async fn open<K: Connector<Connection = C>>(connector: &K, info: &ConnectionInfo) -> Result<Self> {
        let params = ConnectionParams::from(info);
        info!(host = %params.server_node, "Connecting to SAP HANA Cloud");

        let connection = connector
            .connect(&params)
            .await
            .map_err(|source| HanaDdlError::ConnectionFailed { source })?;

        info!("Successfully connected to SAP HANA Cloud");

        Ok(HanaSession { connection })
    }

    pub async fn execute_non_query(&self, sql: &str) -> Result {
        self.connection
            .execute(sql)
            .await
            .map_err(|source| HanaDdlError::QueryFailed {
                query: sql.to_string(),
                source,
            })
    }

    pub async fn get_results<T: DeserializeOwned>(&self, sql: &str) -> Result<Vec<T>> {
        let rows = self.connection.query(sql).await.map_err(|source| HanaDdlError::QueryFailed {
            query: sql.to_string(),
            source,
        })?;

        let mut output = Vec::with_capacity(rows.len());

        for row in rows {
            let value = serde_json::from_value(Value::Object(row)).map_err(|source| HanaDdlError::InvalidCatalogRow {
                query: sql.to_string(),
                source,
            })?;
            output.push(value);
        }

        Ok(output)
    }

    pub async fn get_result<T: DeserializeOwned>(&self, sql: &str) -> Result<T> {
        let results = self.get_results(sql).await?;
        if results.len() != 1 {
            return Err(HanaDdlError::InvalidNumberOfResults {
                actual: results.len(),
                expected: 1,
            });
        }

        results.into_iter().next().ok_or(HanaDdlError::InvalidNumberOfResults {
            actual: 0,
            expected: 1,
        })
    }

    /// Disconnect errors are logged, the session is gone either way.
    pub async fn close(self) {
        if let Err(e) = self.connection.close().await {
            warn!(error = %e, "Error disconnecting");
        }
    }
}

/// Opens a session, reads the database version and closes the session again.
#[instrument(skip_all)]
pub async fn test_connection<K: Connector>(connector: &K, info: &ConnectionInfo) -> Result<String> {
    let session = HanaSession::open(connector, info).await?;
    let version = CatalogReader::new(&session).get_db_version().await;
    session.close().await;

    let version = version?;
    info!(version = %version, "Db version");
    Ok(version)
}
