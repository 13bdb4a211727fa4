pub mod executor;
pub mod processors;
pub mod sp_api_client;
