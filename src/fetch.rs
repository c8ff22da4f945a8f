//! HTTP request helper shared by every backend call

use std::time::Duration;

use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, RequestBuilder, StatusCode,
};
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::error::Error;
use crate::normalize::is_truthy;

/// A response body: JSON when it parses, the raw text otherwise
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Parse a body without ever failing. An empty body is an empty object.
    pub fn parse(text: &str) -> Self {
        if text.trim().is_empty() {
            return ResponseBody::Json(Value::Object(Map::new()));
        }
        match serde_json::from_str(text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text.to_string()),
        }
    }

    /// The JSON value, if the body was JSON
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    /// Convert into a JSON value; plain text becomes a JSON string
    pub fn into_json(self) -> Value {
        match self {
            ResponseBody::Json(value) => value,
            ResponseBody::Text(text) => Value::String(text),
        }
    }

    /// The backend's own success flag (`success`, then `status`), if it sent
    /// one. A number is a flag when non-zero, so `"status": 200` succeeds.
    /// Other strings, such as `"status": "ok"`, do not count as a flag.
    pub fn success_flag(&self) -> Option<bool> {
        let value = self.as_json()?;
        ["success", "status"]
            .iter()
            .filter_map(|key| value.get(*key))
            .find_map(|v| match v {
                Value::Bool(b) => Some(*b),
                Value::String(s) if s == "true" || s == "false" => Some(is_truthy(v)),
                Value::Number(n) => Some(n.as_f64().map_or(false, |n| n != 0.0)),
                _ => None,
            })
    }

    /// A human readable message from the body (`message`, then `error`), or
    /// the raw text for non-JSON bodies
    pub fn message(&self) -> Option<String> {
        match self {
            ResponseBody::Json(value) => ["message", "error"]
                .iter()
                .filter_map(|key| value.get(*key))
                .find_map(|v| v.as_str())
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
            ResponseBody::Text(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
        }
    }
}

/// Status and parsed body of a completed request
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl FetchResponse {
    /// Whether the HTTP status is 2xx
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    timeout: Option<Duration>,
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
            timeout: None,
        }
    }

    /// Add bearer token authentication when a token is present
    pub fn bearer_auth(mut self, token: Option<&str>) -> Self {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                self.headers.insert(AUTHORIZATION, value);
            }
        }
        self
    }

    /// Append a query parameter
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, Error> {
        let json = serde_json::to_vec(body)?;
        self.body = Some(json);
        Ok(self)
    }

    /// Bound the request duration
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
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

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        Ok(req)
    }

    /// Execute the request. Non-2xx statuses are returned, not raised; only
    /// transport failures are errors.
    pub async fn execute(&self) -> Result<FetchResponse, Error> {
        let req = self.build()?;
        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        Ok(FetchResponse {
            status,
            body: ResponseBody::parse(&text),
        })
    }
}
