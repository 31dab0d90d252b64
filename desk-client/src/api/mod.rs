//! Typed API operations
//!
//! `DeskClient` groups the user, ticket and message endpoints. Each method
//! is a single request/response with no retry.

mod messages;
mod tickets;
mod users;

use crate::http::{HttpClient, NetworkHttpClient};
use crate::session::SessionContext;
use crate::{ClientConfig, ClientResult};

/// Support desk API client
#[derive(Debug, Clone)]
pub struct DeskClient<H: HttpClient = NetworkHttpClient> {
    http: H,
}

impl DeskClient<NetworkHttpClient> {
    /// Build a network client sharing `session`.
    pub fn connect(config: &ClientConfig, session: SessionContext) -> ClientResult<Self> {
        Ok(Self {
            http: NetworkHttpClient::new(config, session)?,
        })
    }
}

impl<H: HttpClient> DeskClient<H> {
    pub fn with_http(http: H) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    pub fn session(&self) -> &SessionContext {
        self.http.session()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording fake for asserting request shapes without a server.

    use async_trait::async_trait;
    use serde::Serialize;
    use serde::de::DeserializeOwned;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::http::HttpClient;
    use crate::session::SessionContext;
    use crate::{ClientError, ClientResult};

    #[derive(Debug, Clone, PartialEq)]
    pub struct Recorded {
        pub method: &'static str,
        pub path: String,
        pub body: Option<serde_json::Value>,
    }

    pub struct RecordingHttp {
        pub session: SessionContext,
        pub calls: Mutex<Vec<Recorded>>,
        pub responses: Mutex<VecDeque<serde_json::Value>>,
    }

    impl RecordingHttp {
        pub fn new(responses: Vec<serde_json::Value>) -> Self {
            Self {
                session: SessionContext::in_memory(),
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.into()),
            }
        }

        pub fn calls(&self) -> Vec<Recorded> {
            self.calls.lock().unwrap().clone()
        }

        fn record<T: DeserializeOwned>(
            &self,
            method: &'static str,
            path: &str,
            body: Option<serde_json::Value>,
        ) -> ClientResult<T> {
            self.calls.lock().unwrap().push(Recorded {
                method,
                path: path.to_string(),
                body,
            });
            let next = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(serde_json::Value::Null);
            serde_json::from_value(next).map_err(|e| ClientError::InvalidResponse(e.to_string()))
        }
    }

    #[async_trait]
    impl HttpClient for RecordingHttp {
        async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
            self.record("GET", path, None)
        }

        async fn post<T: DeserializeOwned, B: Serialize + Sync>(
            &self,
            path: &str,
            body: &B,
        ) -> ClientResult<T> {
            self.record("POST", path, Some(serde_json::to_value(body)?))
        }

        async fn put<T: DeserializeOwned, B: Serialize + Sync>(
            &self,
            path: &str,
            body: &B,
        ) -> ClientResult<T> {
            self.record("PUT", path, Some(serde_json::to_value(body)?))
        }

        async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
            &self,
            path: &str,
            body: &B,
        ) -> ClientResult<T> {
            self.record("PATCH", path, Some(serde_json::to_value(body)?))
        }

        async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
            self.record("PATCH", path, None)
        }

        async fn delete(&self, path: &str) -> ClientResult<()> {
            self.record("DELETE", path, None)
        }

        fn session(&self) -> &SessionContext {
            &self.session
        }
    }
}
