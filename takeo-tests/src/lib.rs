mod atomicity;
mod batch;
mod conditions;
mod invoices;
mod transaction;
mod users;

use atomicity::atomicity;
use batch::batch;
use conditions::conditions;
use invoices::invoices;
use log::LevelFilter;
use std::env;
use takeo::{Connection, Manager};
use transaction::transaction;
use users::users;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run every scenario on `connection`, then close it.
pub async fn execute_tests<C: Connection>(connection: C) {
    let manager = Manager::new(connection);
    manager.ping().await.expect("The store is not reachable");
    users(&manager).await;
    batch(&manager).await;
    atomicity(&manager).await;
    transaction(&manager).await;
    conditions(&manager).await;
    invoices(&manager).await;
    manager.close().await.expect("Could not close the manager");
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
