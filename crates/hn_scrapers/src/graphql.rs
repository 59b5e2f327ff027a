use async_trait::async_trait;
use hn_core::{Error, Result, TransactionPage};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const TRANSACTIONS_QUERY: &str = r#"query GetHackernoonArticles($owner: String!, $cursor: String, $limit: Int!) {
  transactions(owners: [$owner], first: $limit, after: $cursor, sort: HEIGHT_DESC) {
    edges {
      node {
        id
        owner { address }
        data { size type }
        tags { name value }
        block { timestamp height }
      }
      cursor
    }
    pageInfo { hasNextPage }
  }
}"#;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One page of transactions owned by a wallet, newest first.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn fetch_page(&self, owner: &str, cursor: Option<&str>, limit: usize) -> Result<TransactionPage>;
}

#[derive(Debug, Serialize)]
struct Variables<'a> {
    owner: &'a str,
    cursor: Option<&'a str>,
    limit: usize,
}

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'static str,
    variables: Variables<'a>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct TransactionsData {
    transactions: TransactionPage,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<TransactionsData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

impl GraphqlResponse {
    fn into_page(self) -> Result<TransactionPage> {
        match self.data {
            Some(data) => {
                if !self.errors.is_empty() {
                    tracing::warn!("GraphQL returned partial data with {} errors", self.errors.len());
                }
                Ok(data.transactions)
            }
            None => {
                let messages: Vec<String> = self.errors.into_iter().map(|e| e.message).collect();
                Err(Error::GraphQl(if messages.is_empty() {
                    "response carried no data".to_string()
                } else {
                    messages.join("; ")
                }))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphqlClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GraphqlClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl TransactionSource for GraphqlClient {
    async fn fetch_page(&self, owner: &str, cursor: Option<&str>, limit: usize) -> Result<TransactionPage> {
        debug!("Querying {} for {} transactions after {:?}", self.endpoint, limit, cursor);
        let request = GraphqlRequest {
            query: TRANSACTIONS_QUERY,
            variables: Variables { owner, cursor, limit },
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(Error::Status {
                status: response.status().as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body: GraphqlResponse = response.json().await?;
        body.into_page()
    }
}
