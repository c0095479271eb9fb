use std::io::Read;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tiny_http::{Header, Request, Response, Server};

/// Request as seen by the stub.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub delay: Duration,
}

impl Reply {
    pub fn json(body: &str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
            delay: Duration::ZERO,
        }
    }

    pub fn jpeg(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "image/jpeg",
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Local HTTP endpoint answering every request with the same reply.
pub struct StubEndpoint {
    pub url: String,
    pub requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubEndpoint {
    pub fn start(reply: Reply) -> Self {
        Self::start_at("/analyze_frame", reply)
    }

    pub fn start_at(path: &str, reply: Reply) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let url = format!("http://{}{}", addr, path);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        std::thread::spawn(move || {
            for request in server.incoming_requests() {
                let reply = reply.clone();
                let recorded = recorded.clone();
                // Delayed replies must not hold up the next request.
                std::thread::spawn(move || respond(request, reply, recorded));
            }
        });

        Self { url, requests }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

fn respond(mut request: Request, reply: Reply, recorded: Arc<Mutex<Vec<Recorded>>>) {
    let content_type = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_string());

    let mut body = Vec::new();
    if request.as_reader().read_to_end(&mut body).is_err() {
        return;
    }

    recorded.lock().unwrap().push(Recorded {
        method: request.method().to_string(),
        path: request.url().to_string(),
        content_type,
        body,
    });

    std::thread::sleep(reply.delay);

    let response = Response::from_data(reply.body)
        .with_status_code(reply.status)
        .with_header(
            Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()).unwrap(),
        );
    let _ = request.respond(response);
}
