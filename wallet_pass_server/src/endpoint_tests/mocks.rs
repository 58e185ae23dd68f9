use mockall::mock;
use reqwest::Method;
use serde_json::Value;
use wallet_tools::{PassTransport, WalletApiError};

mock! {
    pub Transport {}
    impl PassTransport for Transport {
        async fn request(&self, method: Method, url: &str, body: Option<Value>) -> Result<Value, WalletApiError>;
    }
}
