mod chained_client;

pub use chained_client::ChainedClient;
