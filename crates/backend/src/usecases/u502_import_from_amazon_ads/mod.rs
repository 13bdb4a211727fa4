pub mod ads_api_client;
pub mod executor;
pub mod processors;
