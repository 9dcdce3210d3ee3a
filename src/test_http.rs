//! One-shot HTTP responder for tests that need a real socket.

use std::io::{Read, Write};
use std::net::TcpListener;

/// Answer a single request on an ephemeral port with `status_line` and `body`.
/// Returns the base URL, e.g. `http://127.0.0.1:54321`.
pub(crate) fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let reply = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(reply.as_bytes());
        }
    });
    format!("http://{addr}")
}
