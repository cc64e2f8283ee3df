use std::time::Duration;

use mongodb::{Client, Database, bson::doc};
use tokio::time::{sleep, timeout};
use tracing::{info, warn};

use super::{
    config::MongoConfig,
    error::{MongoDaoError, MongoResult},
};

struct RetryPolicy;

impl RetryPolicy {
    const MAX_ATTEMPTS: u32 = 10;
    const INITIAL_DELAY_MS: u64 = 250;

    fn initial_delay() -> Duration {
        Duration::from_millis(Self::INITIAL_DELAY_MS)
    }

    fn next_delay(current: Duration) -> Duration {
        (current * 2).min(Duration::from_secs(5))
    }
}

/// Build a client and wait for the first successful ping, giving up after `config.connect_timeout`.
pub async fn establish_connection(config: &MongoConfig) -> MongoResult<(Client, Database)> {
    let client = Client::with_options(config.options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(&config.database_name);

    timeout(config.connect_timeout, ping_until_ready(&database))
        .await
        .map_err(|_| MongoDaoError::ConnectTimeout {
            after: config.connect_timeout,
        })??;

    Ok((client, database))
}

async fn ping_until_ready(database: &Database) -> MongoResult<()> {
    let mut attempts = 0;
    let mut delay = RetryPolicy::initial_delay();

    loop {
        match database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => {
                if attempts > 0 {
                    info!(attempts, "connected to MongoDB after retry");
                }
                return Ok(());
            }
            Err(err) => {
                attempts += 1;
                if attempts >= RetryPolicy::MAX_ATTEMPTS {
                    return Err(MongoDaoError::InitialPing {
                        attempts,
                        source: err,
                    });
                }
                warn!(
                    attempts,
                    wait_ms = delay.as_millis(),
                    error = %err,
                    "MongoDB ping failed during initial connection; retrying"
                );
                sleep(delay).await;
                delay = RetryPolicy::next_delay(delay);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_delay_doubles_up_to_cap() {
        let mut delay = RetryPolicy::initial_delay();
        let mut seen = Vec::new();
        for _ in 0..7 {
            seen.push(delay.as_millis());
            delay = RetryPolicy::next_delay(delay);
        }
        assert_eq!(seen, [250, 500, 1_000, 2_000, 4_000, 5_000, 5_000]);
    }
}
