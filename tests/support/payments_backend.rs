use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};

/// Stand-in for the dashboard backend: serves a fixed answer on
/// `GET /api/payments` and records what it was asked.
pub struct PaymentsBackendStub {
	pub base_url:  String,
	hits:          Arc<AtomicUsize>,
	authorization: Arc<Mutex<Option<String>>>,
	handle:        ServerHandle,
}

impl PaymentsBackendStub {
	pub fn hits(&self) -> usize {
		self.hits.load(Ordering::SeqCst)
	}

	pub fn last_authorization(&self) -> Option<String> {
		self.authorization.lock().unwrap().clone()
	}

	pub async fn stop(self) {
		self.handle.stop(true).await;
	}
}

pub fn start_payments_backend(status: u16, body: &'static str) -> PaymentsBackendStub {
	let hits = Arc::new(AtomicUsize::new(0));
	let authorization = Arc::new(Mutex::new(None));

	let (server_hits, server_authorization) = (hits.clone(), authorization.clone());
	let server = HttpServer::new(move || {
		let hits = server_hits.clone();
		let authorization = server_authorization.clone();
		App::new().route(
			"/api/payments",
			web::get().to(move |req: HttpRequest| {
				let hits = hits.clone();
				let authorization = authorization.clone();
				async move {
					hits.fetch_add(1, Ordering::SeqCst);
					*authorization.lock().unwrap() = req
						.headers()
						.get(header::AUTHORIZATION)
						.and_then(|value| value.to_str().ok())
						.map(str::to_string);
					HttpResponse::build(StatusCode::from_u16(status).unwrap())
						.content_type("application/json")
						.body(body)
				}
			}),
		)
	})
	.workers(1)
	.bind(("127.0.0.1", 0))
	.unwrap();

	let port = server.addrs()[0].port();
	let server = server.run();
	let handle = server.handle();
	actix_web::rt::spawn(server);

	PaymentsBackendStub {
		base_url: format!("http://127.0.0.1:{port}/api"),
		hits,
		authorization,
		handle,
	}
}

/// Base URL of a port nothing listens on.
pub fn unreachable_backend_url() -> String {
	let listener = TcpListener::bind("127.0.0.1:0").unwrap();
	let port = listener.local_addr().unwrap().port();
	drop(listener);
	format!("http://127.0.0.1:{port}/api")
}
