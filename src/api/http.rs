//! `reqwest` implementation of [`TicketApi`].

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::{ListTicketsParams, TicketApi, paths};
use crate::config::{Config, parse_base_url};
use crate::error::{DeskError, Result};
use crate::formatting::truncate_string;
use crate::types::{
    Comment, CommentId, CommentRequest, CreateTicketRequest, PriorityCount, StatusCount, Ticket,
    TicketId, TicketPage, UpdateTicketRequest,
};

/// Longest server error body carried into an error message
const MAX_ERROR_BODY: usize = 200;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the ticket service
#[derive(Debug, Clone)]
pub struct HttpTicketApi {
    client: Client,
    base_url: Url,
}

impl HttpTicketApi {
    /// Create a client from configuration
    ///
    /// `base_url_override` takes precedence over the environment and the
    /// config file. Configures a 30s connect timeout and the configured total
    /// timeout.
    pub fn from_config(config: &Config, base_url_override: Option<&str>) -> Result<Self> {
        let base_url = parse_base_url(&config.effective_api_base_url(base_url_override))?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(CONNECT_TIMEOUT)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Create a client for a base address with default settings
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute address of an endpoint path
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| DeskError::InvalidBaseUrl(self.base_url.to_string(), e.to_string()))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!("{} {}", method, url);
        Ok(self.client.request(method, url))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.inspect_err(|e| {
            tracing::warn!("Request failed: {}", e);
        })?;
        check_status(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        Ok(response.json().await?)
    }
}

/// Turn a non-2xx response into [`DeskError::Api`], keeping a short excerpt of the body
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let body = body.trim();
    let message = if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        truncate_string(body, MAX_ERROR_BODY)
    };

    tracing::warn!("API returned {}: {}", status, message);
    Err(DeskError::Api { status, message })
}

#[async_trait::async_trait]
impl TicketApi for HttpTicketApi {
    async fn list_tickets(&self, params: &ListTicketsParams) -> Result<TicketPage> {
        let builder = self.request(Method::GET, paths::TICKETS)?.query(params);
        let response = self.send(builder).await?;
        Ok(response.json().await?)
    }

    async fn get_ticket(&self, id: TicketId) -> Result<Ticket> {
        self.get_json(&paths::ticket(id)).await
    }

    async fn create_ticket(&self, request: &CreateTicketRequest) -> Result<Ticket> {
        let builder = self.request(Method::POST, paths::TICKETS)?.json(request);
        let response = self.send(builder).await?;
        Ok(response.json().await?)
    }

    async fn update_ticket(&self, id: TicketId, request: &UpdateTicketRequest) -> Result<()> {
        let builder = self.request(Method::PUT, &paths::ticket(id))?.json(request);
        self.send(builder).await?;
        Ok(())
    }

    async fn delete_ticket(&self, id: TicketId) -> Result<()> {
        self.send(self.request(Method::DELETE, &paths::ticket(id))?)
            .await?;
        Ok(())
    }

    async fn status_report(&self) -> Result<Vec<StatusCount>> {
        self.get_json(paths::STATUS_REPORT).await
    }

    async fn priority_report(&self) -> Result<Vec<PriorityCount>> {
        self.get_json(paths::PRIORITY_REPORT).await
    }

    async fn list_comments(&self, ticket_id: TicketId) -> Result<Vec<Comment>> {
        self.get_json(&paths::ticket_comments(ticket_id)).await
    }

    async fn create_comment(
        &self,
        ticket_id: TicketId,
        request: &CommentRequest,
    ) -> Result<Comment> {
        let builder = self
            .request(Method::POST, &paths::ticket_comments(ticket_id))?
            .json(request);
        let response = self.send(builder).await?;
        Ok(response.json().await?)
    }

    async fn update_comment(&self, comment_id: CommentId, request: &CommentRequest) -> Result<()> {
        let builder = self
            .request(Method::PUT, &paths::comment(comment_id))?
            .json(request);
        self.send(builder).await?;
        Ok(())
    }

    async fn delete_comment(&self, comment_id: CommentId) -> Result<()> {
        self.send(self.request(Method::DELETE, &paths::comment(comment_id))?)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_under_base_path() {
        let api = HttpTicketApi::new("http://localhost:5000/api").unwrap();
        assert_eq!(
            api.endpoint(&paths::ticket_comments(3)).unwrap().as_str(),
            "http://localhost:5000/api/tickets/3/comments"
        );
        assert_eq!(
            api.endpoint(paths::STATUS_REPORT).unwrap().as_str(),
            "http://localhost:5000/api/tickets/reports/status"
        );
    }

    #[test]
    fn test_from_config_uses_override() {
        let config = Config::default();
        let api = HttpTicketApi::from_config(&config, Some("http://10.0.0.2/v1")).unwrap();
        assert_eq!(api.base_url().as_str(), "http://10.0.0.2/v1/");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(HttpTicketApi::new("localhost").is_err());
    }
}
