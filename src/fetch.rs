//! HTTP request helper shared by the resource clients

use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::error::{ApiError, Error};

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Self {
            client,
            url: url.to_string(),
            method,
            headers,
            query_params: Vec::new(),
            body: None,
        }
    }

    /// Add bearer token authentication when a token is present
    pub fn bearer_auth(mut self, token: Option<&str>) -> Self {
        if let Some(token) = token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                self.headers.insert(AUTHORIZATION, value);
            }
        }
        self
    }

    /// Add a query parameter to the request
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, Error> {
        let json = serde_json::to_vec(body)?;
        self.body = Some(json);
        Ok(self)
    }

    fn build(&self) -> Result<RequestBuilder, Error> {
        let mut url = Url::parse(&self.url)?;

        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        debug!("{} {}", self.method, url);
        let mut req = self.client.request(self.method.clone(), url.as_str());
        req = req.headers(self.headers.clone());

        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }

        Ok(req)
    }

    async fn send(&self) -> Result<Response, Error> {
        let response = self.build()?.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            let err = ApiError::from_response(status, &text);
            debug!("{} {} failed: {}", self.method, self.url, err);
            return Err(Error::Api(err));
        }

        Ok(response)
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let response = self.send().await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Execute the request, ignoring any response body
    pub async fn execute_empty(&self) -> Result<(), Error> {
        self.send().await.map(|_| ())
    }
}

/// Helper for creating HTTP requests
pub struct Fetch;

impl Fetch {
    /// Create a GET request
    pub fn get<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::GET)
    }

    /// Create a POST request
    pub fn post<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::POST)
    }

    /// Create a PUT request
    pub fn put<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::PUT)
    }

    /// Create a DELETE request
    pub fn delete<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::DELETE)
    }
}

/// Base URL, HTTP client and credentials shared by one resource client
#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    base_url: String,
    http_client: Client,
    access_token: Option<String>,
}

impl Endpoint {
    pub(crate) fn new(base_url: String, http_client: Client, access_token: Option<String>) -> Self {
        Self {
            base_url,
            http_client,
            access_token,
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    pub(crate) fn get(&self, path: &str) -> FetchBuilder<'_> {
        Fetch::get(&self.http_client, &self.url(path)).bearer_auth(self.access_token.as_deref())
    }

    pub(crate) fn post(&self, path: &str) -> FetchBuilder<'_> {
        Fetch::post(&self.http_client, &self.url(path)).bearer_auth(self.access_token.as_deref())
    }

    pub(crate) fn put(&self, path: &str) -> FetchBuilder<'_> {
        Fetch::put(&self.http_client, &self.url(path)).bearer_auth(self.access_token.as_deref())
    }

    pub(crate) fn delete(&self, path: &str) -> FetchBuilder<'_> {
        Fetch::delete(&self.http_client, &self.url(path)).bearer_auth(self.access_token.as_deref())
    }
}
