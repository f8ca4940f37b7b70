use aws_config::BehaviorVersion;
use lambda_runtime::{run, service_fn, tracing, Error};

mod config;
mod error;
mod event_handler;
mod gender;
mod lookup;
mod normalize;
mod render;
mod store;

use config::Config;
use event_handler::{function_handler, Service};
use lookup::NameLookup;
use render::Pages;
use store::DynamoNameStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env()?;
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let store = DynamoNameStore::new(&sdk_config, config.table_name, config.endpoint.as_deref());
    let service = Service::new(NameLookup::new(store, config.max_attempts), Pages::new()?);

    run(service_fn(|event| function_handler(&service, event))).await
}
