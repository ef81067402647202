//! Diagnostic harness for the Exa search API.
//!
//! Sends one query and prints what comes back (or the raw error body), so
//! an API key and the endpoint can be checked by hand.  Nothing in the job
//! pipeline depends on this module.

use std::time::Duration;

use clap::Args;
use serde::{Deserialize, Serialize};

/// Default Exa endpoint.
pub const DEFAULT_API_URL: &str = "https://api.exa.ai";

/// Characters of result text shown per hit.
const SNIPPET_CHARS: usize = 200;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Query text.
    pub query: String,

    /// Number of results to request.
    #[arg(long, default_value_t = 5)]
    pub num_results: u32,

    #[arg(long, env = "EXA_API_URL", default_value = DEFAULT_API_URL)]
    pub exa_api_url: String,

    #[arg(long, env = "EXA_API_KEY", hide_env_values = true)]
    pub exa_api_key: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status; `body` is kept verbatim.
    #[error("search API error ({status}): {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    num_results: u32,
    contents: Contents,
}

#[derive(Debug, Serialize)]
struct Contents {
    text: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

pub struct ExaClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ExaClient {
    pub fn new(api_url: &str, api_key: &str) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        })
    }

    pub async fn search(&self, query: &str, num_results: u32) -> Result<SearchResponse, SearchError> {
        let response = self
            .client
            .post(format!("{}/search", self.api_url))
            .header("x-api-key", &self.api_key)
            .json(&SearchRequest { query, num_results, contents: Contents { text: true } })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SearchError::Api { status: status.as_u16(), body });
        }
        Ok(response.json().await?)
    }
}

/// First `max_chars` characters of `text` on one line, with an ellipsis if cut.
pub fn snippet(text: &str, max_chars: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars).collect();
    cut.push('…');
    cut
}

/// Run the query and print a short report of the hits.
pub async fn run(args: &SearchArgs) -> Result<(), SearchError> {
    let client = ExaClient::new(&args.exa_api_url, &args.exa_api_key)?;
    tracing::info!(query = %args.query, num_results = args.num_results, "querying search API");

    let response = client.search(&args.query, args.num_results).await?;
    println!("{} result(s) for {:?}", response.results.len(), args.query);

    for (i, hit) in response.results.iter().enumerate() {
        println!();
        println!("{}. {}", i + 1, hit.title.as_deref().unwrap_or("(untitled)"));
        println!("   {}", hit.url);
        if let Some(date) = &hit.published_date {
            println!("   published {date}");
        }
        match hit.text.as_deref() {
            Some(text) if !text.trim().is_empty() => println!("   {}", snippet(text, SNIPPET_CHARS)),
            _ => println!("   (no text returned)"),
        }
    }
    Ok(())
}
