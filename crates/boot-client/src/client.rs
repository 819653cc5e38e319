//! Boot server API client
//!
//! Calls the `/v1` JSON API. Endpoints are tried in configuration order: a
//! connection failure moves on to the next endpoint, while any HTTP response,
//! including an error status, is final.

use crate::config::Config;
use crate::error::ClientError;
use boot_model::{Group, LabelSet, Profile};
use boot_store::BlobKind;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Serialize)]
struct SelectRequest<'a> {
    labels: &'a LabelSet,
}

#[derive(Deserialize)]
struct SelectGroupResponse {
    group: Group,
}

#[derive(Deserialize)]
struct SelectProfileResponse {
    profile: Profile,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Boot server API client
#[derive(Debug, Clone)]
pub struct BootClient {
    client: Client,
    base_urls: Vec<Url>,
}

impl BootClient {
    /// Create a client for the configured endpoints
    ///
    /// Fails with [`ClientError::NoEndpoints`] or [`ClientError::InvalidEndpoint`]
    /// before any connection is attempted.
    pub fn new(config: Config) -> Result<Self, ClientError> {
        config.validate()?;
        let base_urls = config
            .endpoints
            .iter()
            .map(|endpoint| {
                Url::parse(&format!("http://{endpoint}/v1")).map_err(|_| ClientError::InvalidEndpoint {
                    endpoint: endpoint.clone(),
                    reason: "not a valid host",
                })
            })
            .collect::<Result<_, _>>()?;
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, base_urls })
    }

    /// Returns the group selected for `labels`.
    pub async fn select_group(&self, labels: &LabelSet) -> Result<Group, ClientError> {
        let body = SelectRequest { labels };
        let response: SelectGroupResponse = self
            .json(&["select", "group"], |client, url| client.post(url).json(&body))
            .await?;
        Ok(response.group)
    }

    /// Returns the profile selected for `labels`.
    pub async fn select_profile(&self, labels: &LabelSet) -> Result<Profile, ClientError> {
        let body = SelectRequest { labels };
        let response: SelectProfileResponse = self
            .json(&["select", "profile"], |client, url| client.post(url).json(&body))
            .await?;
        Ok(response.profile)
    }

    pub async fn list_profiles(&self) -> Result<Vec<Profile>, ClientError> {
        self.json(&["profiles"], |client, url| client.get(url)).await
    }

    pub async fn get_profile(&self, id: &str) -> Result<Profile, ClientError> {
        self.json(&["profiles", id], |client, url| client.get(url)).await
    }

    pub async fn put_profile(&self, profile: &Profile) -> Result<(), ClientError> {
        self.empty(&["profiles", &profile.id], |client, url| client.put(url).json(profile))
            .await
    }

    pub async fn delete_profile(&self, id: &str) -> Result<(), ClientError> {
        self.empty(&["profiles", id], |client, url| client.delete(url)).await
    }

    /// Lists groups in precedence order.
    pub async fn list_groups(&self) -> Result<Vec<Group>, ClientError> {
        self.json(&["groups"], |client, url| client.get(url)).await
    }

    pub async fn get_group(&self, id: &str) -> Result<Group, ClientError> {
        self.json(&["groups", id], |client, url| client.get(url)).await
    }

    pub async fn put_group(&self, group: &Group) -> Result<(), ClientError> {
        self.empty(&["groups", &group.id], |client, url| client.put(url).json(group))
            .await
    }

    pub async fn delete_group(&self, id: &str) -> Result<(), ClientError> {
        self.empty(&["groups", id], |client, url| client.delete(url)).await
    }

    /// Fetches a raw config blob.
    pub async fn get_blob(&self, kind: BlobKind, id: &str) -> Result<Vec<u8>, ClientError> {
        let response = self.send(&[kind.as_str(), id], |client, url| client.get(url)).await?;
        Ok(check(response).await?.bytes().await?.to_vec())
    }

    pub async fn put_blob(&self, kind: BlobKind, id: &str, data: &[u8]) -> Result<(), ClientError> {
        self.empty(&[kind.as_str(), id], |client, url| client.put(url).body(data.to_vec()))
            .await
    }

    pub async fn delete_blob(&self, kind: BlobKind, id: &str) -> Result<(), ClientError> {
        self.empty(&[kind.as_str(), id], |client, url| client.delete(url)).await
    }

    async fn json<T, F>(&self, segments: &[&str], build: F) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        F: Fn(&Client, Url) -> RequestBuilder,
    {
        let response = check(self.send(segments, build).await?).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn empty<F>(&self, segments: &[&str], build: F) -> Result<(), ClientError>
    where
        F: Fn(&Client, Url) -> RequestBuilder,
    {
        check(self.send(segments, build).await?).await?;
        Ok(())
    }

    /// Sends the request to each endpoint in turn until one accepts the connection.
    async fn send<F>(&self, segments: &[&str], build: F) -> Result<Response, ClientError>
    where
        F: Fn(&Client, Url) -> RequestBuilder,
    {
        let mut last_error = None;
        for base in &self.base_urls {
            let url = endpoint_url(base, segments);
            debug!("Sending request to {}", url);
            match build(&self.client, url).send().await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_connect() => {
                    warn!("Boot server {} unreachable: {}", base, e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(last_error.map_or(ClientError::NoEndpoints, ClientError::Http))
    }
}

/// Appends `segments` to `base`, percent-encoding each as a single path segment.
fn endpoint_url(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Maps error statuses to [`ClientError`].
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|error| error.message)
        .unwrap_or(body);
    if status == StatusCode::NOT_FOUND {
        Err(ClientError::NotFound(message))
    } else {
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_config() {
        assert!(matches!(
            BootClient::new(Config::new(Vec::<String>::new())),
            Err(ClientError::NoEndpoints)
        ));
        assert!(matches!(
            BootClient::new(Config::new(["http://bootd:8080"])),
            Err(ClientError::InvalidEndpoint { .. })
        ));

        let client = BootClient::new(Config::new(["bootd-1:8080", "bootd-2:8080"])).unwrap();
        let bases: Vec<_> = client.base_urls.iter().map(Url::as_str).collect();
        assert_eq!(bases, vec!["http://bootd-1:8080/v1", "http://bootd-2:8080/v1"]);
    }

    #[test]
    fn test_ids_are_single_path_segments() {
        let base = Url::parse("http://bootd:8080/v1").unwrap();

        let url = endpoint_url(&base, &["profiles", "a/b?c#d%e f"]);
        assert_eq!(url.as_str(), "http://bootd:8080/v1/profiles/a%2Fb%3Fc%23d%25e%20f");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);

        let url = endpoint_url(&base, &["cloud", "rack#2.yaml"]);
        assert_eq!(url.path(), "/v1/cloud/rack%232.yaml");
    }
}
