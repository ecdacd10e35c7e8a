use thiserror::Error;

/// Boxed error returned by a driver plugged in through [`crate::Connector`] and [`crate::HanaConnection`].
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum HanaDdlError {
    #[error("Invalid model: {0}")]
    InvalidModel(#[from] serde_json::Error),

    #[error("Key constraint on table `{table}` references unknown column id `{key_id}`")]
    UnresolvedKeyReference { table: String, key_id: String },

    #[error("Failed to connect to SAP HANA Cloud. Please verify your connection settings.")]
    ConnectionFailed {
        #[source]
        source: DriverError,
    },

    #[error("Failed to execute query against SAP HANA Cloud. Query: `{query}`")]
    QueryFailed {
        query: String,
        #[source]
        source: DriverError,
    },

    #[error("No script provided to apply")]
    EmptyScript,

    #[error("Statement {position} failed: `{statement}`")]
    StatementFailed {
        position: usize,
        statement: String,
        #[source]
        source: DriverError,
    },

    #[error("Invalid number of results returned from query. Expected `{expected}`, got `{actual}`")]
    InvalidNumberOfResults { actual: usize, expected: usize },

    #[error("Catalog row could not be read from query `{query}`: `{source}`")]
    InvalidCatalogRow {
        query: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("io error: `{0}`")]
    IoError(#[from] std::io::Error),
}

pub type Result<T = ()> = std::result::Result<T, HanaDdlError>;
