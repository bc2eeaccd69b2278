use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: HeaderMap,
    pub(crate) body: String,
}

#[derive(Clone, Default)]
pub(crate) struct Recorder(Arc<Mutex<Vec<Recorded>>>);

impl Recorder {
    fn record(&self, uri: &Uri, headers: &HeaderMap, body: String) {
        self.0.lock().expect("recorder lock").push(Recorded {
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers: headers.clone(),
            body,
        });
    }

    pub(crate) fn take(&self) -> Vec<Recorded> {
        std::mem::take(&mut *self.0.lock().expect("recorder lock"))
    }
}

/// A route that records every hit and answers with a fixed status and body.
pub(crate) fn canned(
    method: Method,
    recorder: &Recorder,
    status: StatusCode,
    reply: impl Into<String>,
) -> MethodRouter {
    let recorder = recorder.clone();
    let reply = reply.into();
    let handler = move |uri: Uri, headers: HeaderMap, body: String| {
        let recorder = recorder.clone();
        let reply = reply.clone();
        async move {
            recorder.record(&uri, &headers, body);
            (status, [(header::CONTENT_TYPE, "application/json")], reply)
        }
    };
    if method == Method::GET {
        get(handler)
    } else {
        post(handler)
    }
}

/// Serves `app` on an ephemeral local port and returns its origin.
pub(crate) async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("stub backend addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

/// An origin nothing listens on.
pub(crate) async fn closed_origin() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe port");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{addr}")
}
