pub mod stat_client;
pub mod token;
pub mod transport;

pub use stat_client::StatsClient;
pub use token::{AccessTokenProvider, CredentialTokenProvider, StaticTokenProvider};
pub use transport::{HttpTransport, ReqwestTransport};
