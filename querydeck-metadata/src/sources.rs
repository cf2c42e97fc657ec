use querydeck_core::{
    config::{
        self, BigQueryConnConfig, ConnectionPoolSettings, DatabaseUrl, Driver, ReadReplica,
        SourceConnectionInfo,
    },
    err::{Context, Result},
};
use querydeck_logging::debug;
use serde::{Deserialize, Serialize};

use crate::{
    BigqueryAddSourceArgs, BigquerySourceConfiguration, DropSourceArgs, MetadataCommand,
    MssqlAddSourceArgs, MssqlConnectionInfo, MssqlSourceConfiguration, PgAddSourceArgs,
    PgSourceConfiguration, ReloadMetadataArgs, ServiceAccount,
};

/// A request to register a data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddSourcePayload {
    /// Unique name of the source
    pub name: String,
    /// The connection url
    pub db_url: DatabaseUrl,
    /// Optional pool tuning, forwarded verbatim
    pub connection_pool_settings: Option<ConnectionPoolSettings>,
    /// Overwrite an existing source with the same name instead of
    /// rejecting the request. Defaults to false.
    pub replace_configuration: Option<bool>,
    /// BigQuery connection options, required for bigquery sources
    pub big_query: Option<BigQueryConnConfig>,
}

impl AddSourcePayload {
    pub fn new(name: String, db_url: DatabaseUrl) -> Self {
        Self {
            name,
            db_url,
            connection_pool_settings: None,
            replace_configuration: None,
            big_query: None,
        }
    }

    pub fn parse(options: config::Value) -> Result<Self> {
        config::from_value::<Self>(options).context("Failed to parse add source request options")
    }
}

/// Builds the command which registers a source with the metadata
/// service.
///
/// Read replicas are supported for postgres sources only and are
/// forwarded unmodified. Drivers without a dedicated command family
/// are routed to the postgres one.
pub fn add_source(
    driver: Driver,
    payload: AddSourcePayload,
    replicas: Option<Vec<ReadReplica>>,
) -> Result<MetadataCommand> {
    let replace_configuration = payload.replace_configuration.unwrap_or(false);

    let cmd = match driver {
        Driver::Mssql => MetadataCommand::MssqlAddSource(MssqlAddSourceArgs {
            name: payload.name,
            configuration: MssqlSourceConfiguration {
                connection_info: MssqlConnectionInfo {
                    connection_string: payload.db_url,
                    pool_settings: payload.connection_pool_settings,
                },
            },
            replace_configuration,
        }),
        Driver::Bigquery => {
            let conf = payload
                .big_query
                .context("BigQuery connection options are required for bigquery sources")?;
            let service_account = match payload.db_url {
                DatabaseUrl::Literal(raw) => ServiceAccount::Credentials(
                    serde_json::from_str(&raw)
                        .context("Failed to parse service account credentials")?,
                ),
                DatabaseUrl::FromEnv { from_env } => ServiceAccount::FromEnv { from_env },
            };

            MetadataCommand::BigqueryAddSource(BigqueryAddSourceArgs {
                name: payload.name,
                configuration: BigquerySourceConfiguration {
                    service_account,
                    project_id: conf.project_id,
                    datasets: conf
                        .datasets
                        .split(',')
                        .map(|d| d.trim().to_string())
                        .collect(),
                },
                replace_configuration,
            })
        }
        Driver::Postgres | Driver::Mysql => MetadataCommand::PgAddSource(PgAddSourceArgs {
            name: payload.name,
            configuration: PgSourceConfiguration {
                connection_info: SourceConnectionInfo {
                    database_url: payload.db_url,
                    pool_settings: payload.connection_pool_settings,
                },
                read_replicas: replicas.filter(|r| !r.is_empty()),
            },
            replace_configuration,
        }),
    };

    debug!("Built {} command", cmd.command_type());
    Ok(cmd)
}

/// Builds the command which drops a source from the metadata service
pub fn remove_source(driver: Driver, name: String) -> MetadataCommand {
    let args = DropSourceArgs { name };

    match driver {
        Driver::Mssql => MetadataCommand::MssqlDropSource(args),
        Driver::Mysql => MetadataCommand::MysqlDropSource(args),
        Driver::Bigquery => MetadataCommand::BigqueryDropSource(args),
        Driver::Postgres => MetadataCommand::PgDropSource(args),
    }
}

/// Builds the command which reloads the metadata of a single source
pub fn reload_source(name: String) -> MetadataCommand {
    MetadataCommand::ReloadMetadata(ReloadMetadataArgs {
        reload_sources: vec![name],
    })
}
