#![allow(dead_code)]
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// Name the mock never answers, so queries for it time out.
pub const SILENT_DOMAIN: &str = "nosuchdomain.invalid";

pub const MOCK_A: [u8; 4] = [93, 184, 216, 34];
pub const MOCK_TTL: u32 = 3600;
pub const MOCK_NS_TARGET: &str = "ns1.mock-dns.test";

const TYPE_A: u16 = 1;
const TYPE_NS: u16 = 2;

/// Minimal recursive-resolver stand-in listening on UDP and TCP.
///
/// - `A` for a known name: one answer, `MOCK_A`, TTL `MOCK_TTL`
/// - `NS` for any name: one answer, `MOCK_NS_TARGET`
/// - anything else: NOERROR with an empty answer section
/// - `SILENT_DOMAIN`: no reply at all
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

struct Question {
    name: String,
    qtype: u16,
    end: usize,
}

impl MockDnsServer {
    pub async fn start(known: &[&str]) -> Result<Self, std::io::Error> {
        Self::spawn(known, false).await
    }

    /// UDP replies carry TC=1 and no answers; TCP replies are complete.
    pub async fn start_truncating(known: &[&str]) -> Result<Self, std::io::Error> {
        Self::spawn(known, true).await
    }

    async fn spawn(known: &[&str], truncate_udp: bool) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let listener = TcpListener::bind(addr).await?;

        let known: Arc<HashSet<String>> = Arc::new(known.iter().map(|s| s.to_string()).collect());
        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_known = Arc::clone(&known);
        let udp_count = Arc::clone(&udp_queries);
        let tcp_count = Arc::clone(&tcp_queries);

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_count.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = Self::build_response(&buf[..len], &udp_known, truncate_udp) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                    accepted = listener.accept() => {
                        if let Ok((stream, _)) = accepted {
                            let known = Arc::clone(&known);
                            let count = Arc::clone(&tcp_count);
                            tokio::spawn(async move {
                                let _ = Self::serve_tcp(stream, &known, &count).await;
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }

    async fn serve_tcp(
        mut stream: tokio::net::TcpStream,
        known: &HashSet<String>,
        count: &AtomicUsize,
    ) -> std::io::Result<()> {
        let mut len_buf = [0u8; 2];
        stream.read_exact(&mut len_buf).await?;
        let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
        stream.read_exact(&mut query).await?;
        count.fetch_add(1, Ordering::SeqCst);

        if let Some(response) = Self::build_response(&query, known, false) {
            let mut frame = (response.len() as u16).to_be_bytes().to_vec();
            frame.extend_from_slice(&response);
            stream.write_all(&frame).await?;
        }
        Ok(())
    }

    fn parse_question(query: &[u8]) -> Option<Question> {
        let mut pos = 12;
        let mut labels: Vec<String> = Vec::new();

        loop {
            let len = *query.get(pos)? as usize;
            pos += 1;
            if len == 0 {
                break;
            }
            let label = query.get(pos..pos + len)?;
            labels.push(String::from_utf8_lossy(label).to_ascii_lowercase());
            pos += len;
        }

        let qtype = u16::from_be_bytes([*query.get(pos)?, *query.get(pos + 1)?]);
        Some(Question {
            name: labels.join("."),
            qtype,
            end: pos + 4,
        })
    }

    fn encode_name(name: &str) -> Vec<u8> {
        let mut out = Vec::new();
        for label in name.split('.').filter(|l| !l.is_empty()) {
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
        out.push(0);
        out
    }

    fn build_response(query: &[u8], known: &HashSet<String>, truncate: bool) -> Option<Vec<u8>> {
        let question = Self::parse_question(query)?;
        if question.name == SILENT_DOMAIN {
            return None;
        }

        let mut answers: Vec<Vec<u8>> = Vec::new();
        if !truncate {
            match question.qtype {
                TYPE_A if known.contains(&question.name) => {
                    let mut rr = vec![0xc0, 0x0c, 0x00, 0x01, 0x00, 0x01];
                    rr.extend_from_slice(&MOCK_TTL.to_be_bytes());
                    rr.extend_from_slice(&[0x00, 0x04]);
                    rr.extend_from_slice(&MOCK_A);
                    answers.push(rr);
                }
                TYPE_NS => {
                    let target = Self::encode_name(MOCK_NS_TARGET);
                    let mut rr = vec![0xc0, 0x0c, 0x00, 0x02, 0x00, 0x01];
                    rr.extend_from_slice(&MOCK_TTL.to_be_bytes());
                    rr.extend_from_slice(&(target.len() as u16).to_be_bytes());
                    rr.extend_from_slice(&target);
                    answers.push(rr);
                }
                _ => {}
            }
        }

        let mut response = Vec::with_capacity(512);
        response.extend_from_slice(&query[0..2]); // Transaction ID
        // QR=1, RD=1, TC as requested
        response.push(if truncate { 0x83 } else { 0x81 });
        response.push(0x80); // RA=1, RCODE=0
        response.extend_from_slice(&[0x00, 0x01]); // QDCOUNT
        response.extend_from_slice(&(answers.len() as u16).to_be_bytes());
        response.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
        response.extend_from_slice(&query[12..question.end]);
        for rr in answers {
            response.extend_from_slice(&rr);
        }

        Some(response)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// A bound UDP socket that never replies; queries to it time out.
pub async fn blackhole() -> (UdpSocket, SocketAddr) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    (socket, addr)
}
