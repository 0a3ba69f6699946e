//! Dobles de prueba: transporte HTTP en memoria y clientes con sesión.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::ApiError;
use crate::models::Session;
use crate::services::session_store::{MemoryBackend, SessionStore};
use crate::services::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::services::ApiClient;

pub const TEST_BASE_URL: &str = "https://api.test";

type Reply = Result<HttpResponse, ApiError>;

enum Scripted {
    Ready(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

/// Responde en orden FIFO y registra cada petición recibida
#[derive(Default)]
pub struct MockTransport {
    requests: RefCell<Vec<HttpRequest>>,
    replies: RefCell<VecDeque<Scripted>>,
}

impl MockTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn reply_json(&self, status: u16, body: Value) {
        self.replies.borrow_mut().push_back(Scripted::Ready(Ok(HttpResponse {
            status,
            body: body.to_string(),
        })));
    }

    pub fn reply_error(&self, error: ApiError) {
        self.replies.borrow_mut().push_back(Scripted::Ready(Err(error)));
    }

    /// La siguiente petición queda colgada hasta que el test envíe la respuesta
    pub fn defer(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(Scripted::Deferred(rx));
        tx
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request);
        let scripted = self.replies.borrow_mut().pop_front();
        match scripted {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Deferred(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("reply dropped".into()))),
            None => Err(ApiError::Network("no scripted reply".into())),
        }
    }
}

pub fn json_reply(status: u16, body: Value) -> Reply {
    Ok(HttpResponse {
        status,
        body: body.to_string(),
    })
}

pub fn session_for(token: &str) -> Session {
    Session {
        id: Some("u1".into()),
        name: "Test Admin".into(),
        email: "admin@mall.test".into(),
        role: "admin".into(),
        token: token.into(),
        ..Session::default()
    }
}

pub type TestClient = ApiClient<Rc<MockTransport>>;

pub fn authed_client() -> (TestClient, Rc<MockTransport>) {
    let store = SessionStore::new(MemoryBackend::default());
    store.set(session_for("test-token"));
    client_with(store)
}

pub fn unauthenticated_client() -> (TestClient, Rc<MockTransport>) {
    let store = SessionStore::new(MemoryBackend::default());
    store.init();
    client_with(store)
}

pub fn client_with(store: SessionStore) -> (TestClient, Rc<MockTransport>) {
    let transport = MockTransport::new();
    let client = ApiClient::with_transport(TEST_BASE_URL, transport.clone(), store);
    (client, transport)
}
