use crate::artifacts::core::config::FetchConfig;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::protocol::advertisement::parse_ref_advertisement;
use crate::artifacts::protocol::pkt_line::{build_upload_pack_request, extract_pack};
use crate::artifacts::protocol::{UPLOAD_PACK_REQUEST_TYPE, UPLOAD_PACK_SERVICE};
use crate::errors::{BitError, BitResult};
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;

/// Client for one remote repository over smart HTTP
#[derive(Debug, Clone)]
pub struct RemoteClient {
    url: String,
    http: reqwest::Client,
}

impl RemoteClient {
    pub fn new(url: &str, config: &FetchConfig) -> BitResult<Self> {
        let url = url.trim_end_matches('/').to_string();

        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|source| BitError::Transport {
            url: url.clone(),
            source,
        })?;

        Ok(RemoteClient { url, http })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the ref advertisement and return the advertised ids, head first
    pub async fn discover_refs(&self) -> BitResult<Vec<ObjectId>> {
        let url = format!("{}/info/refs?service={UPLOAD_PACK_SERVICE}", self.url);
        tracing::debug!(%url, "discovering refs");

        let request = self.http.get(&url);
        let body = Self::send(request, &url).await?;

        let oids = parse_ref_advertisement(&body)?;
        tracing::debug!(count = oids.len(), head = %oids[0], "refs advertised");
        Ok(oids)
    }

    /// Ask upload-pack for `wants` and return the pack without its signature
    pub async fn request_packfile(&self, wants: &[ObjectId]) -> BitResult<Bytes> {
        let url = format!("{}/{UPLOAD_PACK_SERVICE}", self.url);
        let payload = build_upload_pack_request(wants);
        tracing::debug!(%url, wants = wants.len(), "requesting packfile");

        let request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, UPLOAD_PACK_REQUEST_TYPE)
            .body(payload);
        let body = Self::send(request, &url).await?;

        let pack = extract_pack(&body)?;
        tracing::debug!(bytes = pack.len(), "packfile received");
        Ok(pack)
    }

    async fn send(request: reqwest::RequestBuilder, url: &str) -> BitResult<Bytes> {
        let transport = |source: reqwest::Error| BitError::Transport {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(BitError::TransportStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.bytes().await.map_err(transport)
    }
}
