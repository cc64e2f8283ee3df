use std::time::Duration;

use mongodb::options::ClientOptions;

use super::error::{MongoDaoError, MongoResult};

const APP_NAME: &str = "balatro-back";

#[derive(Clone)]
pub struct MongoConfig {
    pub options: ClientOptions,
    pub database_name: String,
    /// Upper bound for establishing the first connection, retries included.
    pub connect_timeout: Duration,
    /// Upper bound for liveness probes and for the shutdown handshake.
    pub probe_timeout: Duration,
}

impl MongoConfig {
    pub async fn from_uri(
        uri: &str,
        database_name: &str,
        connect_timeout: Duration,
        probe_timeout: Duration,
    ) -> MongoResult<Self> {
        let mut options =
            ClientOptions::parse(uri)
                .await
                .map_err(|source| MongoDaoError::InvalidUri {
                    uri: uri.to_owned(),
                    source,
                })?;
        options.app_name.get_or_insert_with(|| APP_NAME.to_owned());
        options.connect_timeout = Some(connect_timeout);
        options.server_selection_timeout = Some(connect_timeout);

        Ok(Self {
            options,
            database_name: database_name.to_owned(),
            connect_timeout,
            probe_timeout,
        })
    }
}
