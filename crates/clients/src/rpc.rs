use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Peer services speak a one-route-per-message convention:
/// `POST {base}/api/{MessageName}` with the message fields as the JSON
/// body. Base URLs come from configuration, never from per-message
/// constants.
#[derive(Clone, Debug)]
pub struct RpcEndpoint {
    http: Client,
    base_url: String,
}

impl RpcEndpoint {
    pub fn new(base_url: String) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client construction");
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn call<Req, Resp>(&self, message: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/api/{}", self.base_url, message);
        let response = self.http.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("{message} failed with {status}: {text}"));
        }
        Ok(response.json::<Resp>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalized() {
        let endpoint = RpcEndpoint::new("http://asset:10012/".to_string());
        assert_eq!(endpoint.base_url, "http://asset:10012");
    }
}
