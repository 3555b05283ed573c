use std::{
    net::SocketAddr,
    sync::{atomic::{AtomicUsize, Ordering}, Arc},
    time::Duration
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream}
};


/// A local HTTP server answering every request through one function of the request path.
pub(crate) struct TestServer {
    pub(crate) addr: SocketAddr,
    peak: Arc<AtomicUsize>
}


impl TestServer {
    pub(crate) fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// The most requests that were being answered at the same time.
    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}


/// Serves until the test's runtime shuts down. Every response is held back by `delay`.
pub(crate) async fn serve<F>(delay: Duration, respond: F) -> TestServer
where
    F: Fn(&str) -> (u16, Vec<u8>) + Send + Sync + 'static
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let respond = Arc::new(respond);
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let server_peak = peak.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let respond = respond.clone();
            let in_flight = in_flight.clone();
            let peak = server_peak.clone();
            tokio::spawn(async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                handle(stream, delay, respond.as_ref()).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            });
        }
    });

    TestServer { addr, peak }
}


async fn handle<F: Fn(&str) -> (u16, Vec<u8>)>(mut stream: TcpStream, delay: Duration, respond: &F) {
    let mut request = Vec::new();
    let mut buf = [0; 1024];
    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n])
        }
    }
    let request = String::from_utf8_lossy(&request);
    let path = request.split_whitespace().nth(1).unwrap_or("/");

    tokio::time::sleep(delay).await;
    let (status, body) = respond(path);
    let head = format!(
        "HTTP/1.1 {status} Test\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes()).await;
    let _ = stream.write_all(&body).await;
    let _ = stream.shutdown().await;
}
