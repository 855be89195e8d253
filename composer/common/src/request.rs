use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const HEADER_ACCEPT: &str = "Accept";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// Everything a dispatcher needs to perform an outbound HTTP call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl RequestDescriptor {
    /// Builds a POST request with a JSON body, authenticated with a bearer token.
    pub fn json_post<U: Into<String>>(url: U, bearer_token: &str, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(HEADER_ACCEPT.to_owned(), APPLICATION_JSON.to_owned());
        headers.insert(HEADER_CONTENT_TYPE.to_owned(), APPLICATION_JSON.to_owned());
        headers.insert(HEADER_AUTHORIZATION.to_owned(), format!("Bearer {}", bearer_token));
        RequestDescriptor { url: url.into(), method: HttpMethod::Post, headers, body }
    }
}
