//! In-memory doubles for exercising client logic without a browser or server.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use lx_api_types::HttpMethod;

use crate::error::ApiError;
use crate::notify::{Notice, Notifier};
use crate::transport::{ApiRequest, ApiResponse, Transport};

type Scripted = Result<ApiResponse, ApiError>;

/// Replays scripted responses per `(method, path)`.
///
/// Responses are consumed in order; the last one for a route keeps being
/// returned once the queue is down to it.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: RefCell<HashMap<(HttpMethod, String), VecDeque<Scripted>>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: serde_json::Value) {
        self.push(method, path, Ok(ApiResponse::new(status, body)));
    }

    pub fn fail(&self, method: HttpMethod, path: &str, error: ApiError) {
        self.push(method, path, Err(error));
    }

    fn push(&self, method: HttpMethod, path: &str, scripted: Scripted) {
        self.routes
            .borrow_mut()
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(scripted);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn requests_to(&self, method: HttpMethod, path: &str) -> Vec<ApiRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let key = (request.method, request.path.clone());
        self.requests.borrow_mut().push(request);

        let mut routes = self.routes.borrow_mut();
        let Some(queue) = routes.get_mut(&key) else {
            return Err(ApiError::Transport(format!(
                "no scripted response for {} {}",
                key.0.as_str(),
                key.1
            )));
        };
        if queue.len() > 1 {
            queue
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("empty script".into())))
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(ApiError::Transport("empty script".into())))
        }
    }
}

/// Records every notice it receives.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: RefCell<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.borrow().last().cloned()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}
