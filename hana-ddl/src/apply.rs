use tracing::{info, instrument};

use crate::connection::{ConnectionInfo, Connector, HanaConnection, HanaSession};
use crate::script::split_statements;
use crate::{HanaDdlError, Result};

/// Runs every statement of the script on the session, in order. Stops at the first failing statement.
///
/// Returns how many statements were executed.
#[instrument(skip_all)]
pub async fn apply_script<C: HanaConnection>(session: &HanaSession<C>, script: &str) -> Result<usize> {
    let statements = split_statements(script);
    if statements.is_empty() {
        return Err(HanaDdlError::EmptyScript);
    }

    for (index, statement) in statements.iter().enumerate() {
        info!(statement = %preview(statement), "Executing statement");

        session
            .connection
            .execute(statement)
            .await
            .map_err(|source| HanaDdlError::StatementFailed {
                position: index + 1,
                statement: statement.clone(),
                source,
            })?;
    }

    info!(count = statements.len(), "Script applied");

    Ok(statements.len())
}

/// Opens a session, applies the script and closes the session again, also when a statement fails.
///
/// A script without statements is rejected before connecting.
#[instrument(skip_all)]
pub async fn apply_to_instance<K: Connector>(connector: &K, info: &ConnectionInfo, script: &str) -> Result<usize> {
    if split_statements(script).is_empty() {
        return Err(HanaDdlError::EmptyScript);
    }

    let session = HanaSession::open(connector, info).await?;
    let applied = apply_script(&session, script).await;
    session.close().await;

    applied
}

fn preview(statement: &str) -> String {
    statement.chars().take(100).collect()
}
