pub mod frame;
pub mod load;
pub mod seed;
pub mod verify;

#[cfg(test)]
mod test_store;

use tables_client::TablesClient;

use crate::config::{Common, Config, GlobalArgs, load_config_or_default};
use crate::error::TablecheckError;

/// Load the config file and build a client for the merged host settings.
pub fn prepare(global: &GlobalArgs) -> Result<(Config, TablesClient), TablecheckError> {
    let cfg = load_config_or_default(&global.config)?;
    let common = Common::new(global, &cfg);
    tracing::info!(host = %common.host, timeout = ?common.timeout, "store");
    let client = TablesClient::new(&common.host, common.timeout)?;
    Ok((cfg, client))
}
