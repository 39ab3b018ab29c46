//! HTTP invocation for API tools.

use crate::executor::Arguments;
use crate::tools::HttpMethod;
use crate::types::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Sends prepared requests through one shared `reqwest::Client`.
///
/// The timeout is fixed when the client is built and applies to every call.
#[derive(Debug, Clone)]
pub struct HttpInvoker {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpInvoker {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send the request and parse the JSON response body.
    ///
    /// GET and DELETE carry `params` as a query string, POST and PUT as a JSON
    /// body. Non-2xx statuses are errors.
    pub async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &BTreeMap<String, String>,
        params: &Arguments,
    ) -> Result<Value> {
        let header_map = build_headers(headers)?;

        let request = self.client.request(method.into(), url);
        let request = if method.sends_body() {
            request.json(params)
        } else {
            request.query(&query_pairs(params))
        };

        tracing::debug!(%method, url, "dispatching API request");
        let response = request.headers(header_map).send().await?;
        let response = response.error_for_status()?;
        let body = response.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

fn build_headers(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::invalid_request(format!("Invalid header name '{}': {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| Error::invalid_request(format!("Invalid value for header '{}': {}", name, e)))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Flatten parameters into query pairs.
///
/// Arrays repeat the key, objects are sent as JSON text, nulls are dropped.
pub fn query_pairs(params: &Arguments) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (name, value) in params {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = query_text(item) {
                        pairs.push((name.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = query_text(other) {
                    pairs.push((name.clone(), text));
                }
            }
        }
    }
    pairs
}

fn query_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_pairs_flattening() {
        let params = match json!({
            "place": "Beijing,CN",
            "days": 3,
            "lat": 39.9,
            "hourly": ["temperature_2m", "rain"],
            "filter": {"min": 1},
            "skip": null,
            "current": true
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };

        let pairs = query_pairs(&params);
        let get = |k: &str| -> Vec<String> {
            pairs
                .iter()
                .filter(|(name, _)| name == k)
                .map(|(_, v)| v.clone())
                .collect()
        };

        assert_eq!(get("place"), vec!["Beijing,CN"]);
        assert_eq!(get("days"), vec!["3"]);
        assert_eq!(get("lat"), vec!["39.9"]);
        assert_eq!(get("hourly"), vec!["temperature_2m", "rain"]);
        assert_eq!(get("filter"), vec![r#"{"min":1}"#]);
        assert_eq!(get("current"), vec!["true"]);
        assert!(get("skip").is_empty());
    }

    #[test]
    fn test_invalid_header_is_request_error() {
        let mut headers = BTreeMap::new();
        headers.insert("bad header".to_string(), "v".to_string());
        assert!(matches!(build_headers(&headers), Err(Error::InvalidRequest(_))));

        let mut headers = BTreeMap::new();
        headers.insert("x-ok".to_string(), "line\nbreak".to_string());
        assert!(matches!(build_headers(&headers), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_invoker_keeps_timeout() {
        let invoker = HttpInvoker::new(Duration::from_secs(30)).unwrap();
        assert_eq!(invoker.timeout(), Duration::from_secs(30));
    }
}
