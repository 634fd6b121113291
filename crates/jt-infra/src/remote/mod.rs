mod http_profile_client;

pub use http_profile_client::HttpRemoteProfileClient;
