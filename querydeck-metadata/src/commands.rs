use querydeck_core::config::{ConnectionPoolSettings, DatabaseUrl, SourceConnectionInfo};
use serde::{Deserialize, Serialize};

/// A command accepted by the metadata service.
///
/// Serializes to the `{ "type": ..., "args": ... }` object of the
/// metadata API wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "args", rename_all = "snake_case")]
pub enum MetadataCommand {
    PgAddSource(PgAddSourceArgs),
    MssqlAddSource(MssqlAddSourceArgs),
    BigqueryAddSource(BigqueryAddSourceArgs),
    PgDropSource(DropSourceArgs),
    MssqlDropSource(DropSourceArgs),
    MysqlDropSource(DropSourceArgs),
    BigqueryDropSource(DropSourceArgs),
    ReloadMetadata(ReloadMetadataArgs),
}

impl MetadataCommand {
    /// Gets the wire name of the command
    pub fn command_type(&self) -> &'static str {
        match self {
            Self::PgAddSource(_) => "pg_add_source",
            Self::MssqlAddSource(_) => "mssql_add_source",
            Self::BigqueryAddSource(_) => "bigquery_add_source",
            Self::PgDropSource(_) => "pg_drop_source",
            Self::MssqlDropSource(_) => "mssql_drop_source",
            Self::MysqlDropSource(_) => "mysql_drop_source",
            Self::BigqueryDropSource(_) => "bigquery_drop_source",
            Self::ReloadMetadata(_) => "reload_metadata",
        }
    }
}

/// Args for registering a postgres-family source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PgAddSourceArgs {
    pub name: String,
    pub configuration: PgSourceConfiguration,
    pub replace_configuration: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PgSourceConfiguration {
    pub connection_info: SourceConnectionInfo,
    /// Serialized as an explicit null when the source has no replicas
    pub read_replicas: Option<Vec<SourceConnectionInfo>>,
}

/// Args for registering an mssql source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MssqlAddSourceArgs {
    pub name: String,
    pub configuration: MssqlSourceConfiguration,
    pub replace_configuration: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MssqlSourceConfiguration {
    pub connection_info: MssqlConnectionInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MssqlConnectionInfo {
    /// The connection url, literal or resolved from the environment
    pub connection_string: DatabaseUrl,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_settings: Option<ConnectionPoolSettings>,
}

/// Args for registering a bigquery source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigqueryAddSourceArgs {
    pub name: String,
    pub configuration: BigquerySourceConfiguration,
    pub replace_configuration: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigquerySourceConfiguration {
    pub service_account: ServiceAccount,
    pub project_id: String,
    pub datasets: Vec<String>,
}

/// BigQuery service account credentials.
///
/// Either the credential document itself or the name of an environment
/// variable which the metadata service resolves on its side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceAccount {
    FromEnv { from_env: String },
    Credentials(serde_json::Value),
}

/// Args for dropping a source of any driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropSourceArgs {
    pub name: String,
}

/// Args for reloading server metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReloadMetadataArgs {
    /// The sources whose metadata should be reloaded
    pub reload_sources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_command_serializes_with_type_and_args() {
        let cmd = MetadataCommand::PgDropSource(DropSourceArgs {
            name: "orders".to_string(),
        });

        let serialized = serde_json::to_value(&cmd).unwrap();

        assert_eq!(
            serialized,
            serde_json::json!({
                "type": "pg_drop_source",
                "args": { "name": "orders" }
            })
        );
    }

    #[test]
    fn test_command_type_matches_serialized_tag() {
        let cmd = MetadataCommand::ReloadMetadata(ReloadMetadataArgs {
            reload_sources: vec!["orders".to_string()],
        });

        let serialized = serde_json::to_value(&cmd).unwrap();

        assert_eq!(serialized["type"], cmd.command_type());
    }

    #[test]
    fn test_command_round_trips() {
        let cmd = MetadataCommand::MssqlAddSource(MssqlAddSourceArgs {
            name: "sales".to_string(),
            configuration: MssqlSourceConfiguration {
                connection_info: MssqlConnectionInfo {
                    connection_string: DatabaseUrl::FromEnv {
                        from_env: "MSSQL_URL".to_string(),
                    },
                    pool_settings: None,
                },
            },
            replace_configuration: true,
        });

        let serialized = serde_json::to_string(&cmd).unwrap();
        let parsed: MetadataCommand = serde_json::from_str(&serialized).unwrap();

        assert_eq!(parsed, cmd);
    }

    #[test]
    fn test_service_account_wire_forms() {
        let creds = ServiceAccount::Credentials(serde_json::json!({ "client_email": "a" }));
        let env = ServiceAccount::FromEnv {
            from_env: "BQ_KEY".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&creds).unwrap(),
            serde_json::json!({ "client_email": "a" })
        );
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            serde_json::json!({ "from_env": "BQ_KEY" })
        );
    }
}
