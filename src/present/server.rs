use crate::frame::{Frame, Presenter, ResizeHandle};
use crate::present::encode_png;
use crate::scene::{Resolution, SceneState};
use anyhow::Context;
use futures::Future;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::service::service_fn_ok;
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use log::{error, info};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use std::thread;

#[derive(Default)]
struct Latest {
    png: Option<Vec<u8>>,
    state: Option<SceneState>,
    frames: u64,
}

#[derive(Clone)]
struct Shared {
    latest: Arc<RwLock<Latest>>,
    resize: ResizeHandle,
}

#[derive(Serialize)]
struct Status {
    frames: u64,
    state: Option<SceneState>,
}

/// Stands in for the host page: serves the most recent frame and forwards
/// viewport size changes to the driver.
///
/// * `GET /frame.png` - latest frame, 503 until one was presented
/// * `GET /status` - frame count and scene snapshot as JSON
/// * `GET|POST /resize?width=W&height=H` - queue a resize for the next frame
pub struct PreviewServer {
    shared: Shared,
    addr: SocketAddr,
}

impl PreviewServer {
    pub fn start(addr: SocketAddr, resize: ResizeHandle) -> anyhow::Result<Self> {
        let shared = Shared {
            latest: Default::default(),
            resize,
        };
        let service_shared = shared.clone();
        let server = Server::try_bind(&addr)
            .with_context(|| format!("binding preview server to {}", addr))?
            .serve(move || {
                let shared = service_shared.clone();
                service_fn_ok(move |req: Request<Body>| route(&shared, &req))
            });
        let addr = server.local_addr();
        let server = server.map_err(|e| error!("preview server failed: {}", e));
        thread::Builder::new()
            .name("preview-server".into())
            .spawn(move || hyper::rt::run(server))
            .context("spawning preview server thread")?;
        info!("preview server listening on http://{}", addr);
        Ok(PreviewServer { shared, addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Presenter for PreviewServer {
    fn present(&mut self, frame: &Frame, state: &SceneState) -> anyhow::Result<()> {
        let png = encode_png(frame)?;
        let mut latest = self.shared.latest.write().unwrap_or_else(|e| e.into_inner());
        latest.png = Some(png);
        latest.state = Some(*state);
        latest.frames += 1;
        Ok(())
    }
}

fn respond(status: StatusCode, content_type: &'static str, body: Body) -> Response<Body> {
    let mut res = Response::new(body);
    *res.status_mut() = status;
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    res
}

fn text(status: StatusCode, msg: &'static str) -> Response<Body> {
    respond(status, "text/plain", Body::from(msg))
}

fn parse_resize(query: Option<&str>) -> Option<(i64, i64)> {
    let mut width = None;
    let mut height = None;
    for (key, value) in query?.split('&').filter_map(|pair| pair.split_once('=')) {
        match key {
            "width" => width = value.parse().ok(),
            "height" => height = value.parse().ok(),
            _ => {}
        }
    }
    Some((width?, height?))
}

fn route(shared: &Shared, req: &Request<Body>) -> Response<Body> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, "/frame.png") => {
            let latest = shared.latest.read().unwrap_or_else(|e| e.into_inner());
            match &latest.png {
                Some(png) => respond(StatusCode::OK, "image/png", Body::from(png.clone())),
                None => text(StatusCode::SERVICE_UNAVAILABLE, "no frame yet"),
            }
        }
        (&Method::GET, "/status") => {
            let latest = shared.latest.read().unwrap_or_else(|e| e.into_inner());
            let status = Status {
                frames: latest.frames,
                state: latest.state,
            };
            match serde_json::to_vec(&status) {
                Ok(json) => respond(StatusCode::OK, "application/json", Body::from(json)),
                Err(e) => {
                    error!("serializing status: {}", e);
                    text(StatusCode::INTERNAL_SERVER_ERROR, "status unavailable")
                }
            }
        }
        (&Method::GET, "/resize") | (&Method::POST, "/resize") => {
            match parse_resize(req.uri().query()) {
                Some((width, height)) => {
                    let Resolution { width, height } = shared.resize.request(width, height);
                    let body = serde_json::json!({ "width": width, "height": height });
                    respond(
                        StatusCode::ACCEPTED,
                        "application/json",
                        Body::from(body.to_string()),
                    )
                }
                None => text(StatusCode::BAD_REQUEST, "expected ?width=W&height=H"),
            }
        }
        _ => text(StatusCode::NOT_FOUND, "not found"),
    }
}
