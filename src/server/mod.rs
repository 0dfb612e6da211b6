use std::io::{Error, ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream};

pub mod api;
pub mod routes;

// Batch posts carry one JSON object per matchup, so bodies grow with the
// request; anything past this is a client error, not a workload.
const MAX_REQUEST_BYTES: usize = 4 * 1024 * 1024;

pub fn run_server(bind_addr: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr)?;
    println!("civodds server listening on http://{bind_addr}");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream) {
                    eprintln!("request error: {err}");
                }
            }
            Err(err) => eprintln!("connection failed: {err}"),
        }
    }

    Ok(())
}

fn handle_connection(stream: &mut TcpStream) -> std::io::Result<()> {
    let request = match read_request(stream)? {
        Some(request) => request,
        None => return Ok(()),
    };
    let response =
        routes::route_request(&request.method, &request.path, &request.body).to_http_string();
    stream.write_all(response.as_bytes())?;
    stream.flush()
}

#[derive(Debug)]
struct Request {
    method: String,
    path: String,
    body: String,
}

/// Read one HTTP request: headers up to the blank line, then exactly
/// `Content-Length` body bytes. Bodies routinely span more than one TCP
/// segment, so a single `read` call would truncate large batch posts.
fn read_request<R: Read>(reader: &mut R) -> std::io::Result<Option<Request>> {
    let mut raw = Vec::new();
    let mut chunk = [0_u8; 4096];

    let header_end = loop {
        if let Some(pos) = find_header_end(&raw) {
            break pos;
        }
        if raw.len() > MAX_REQUEST_BYTES {
            return Err(Error::new(ErrorKind::InvalidData, "request header too large"));
        }
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            if raw.is_empty() {
                return Ok(None);
            }
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                "connection closed mid-header",
            ));
        }
        raw.extend_from_slice(&chunk[..n]);
    };

    let header_text = String::from_utf8_lossy(&raw[..header_end]).into_owned();
    let mut lines = header_text.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET").to_string();
    let path = request_parts.next().unwrap_or("/").to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    if content_length > MAX_REQUEST_BYTES {
        return Err(Error::new(ErrorKind::InvalidData, "request body too large"));
    }

    let body_start = header_end + 4;
    while raw.len() < body_start + content_length {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                "connection closed mid-body",
            ));
        }
        raw.extend_from_slice(&chunk[..n]);
    }

    let body =
        String::from_utf8_lossy(&raw[body_start..body_start + content_length]).into_owned();
    Ok(Some(Request { method, path, body }))
}

fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|window| window == b"\r\n\r\n")
}
