//! Scripted IRC server.
//!
//! Accepts the bot's connections and lets a test read what it sent and
//! write what a real server would.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::time::timeout;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Listener on an ephemeral loopback port.
pub struct TestServer {
    listener: TcpListener,
    port: u16,
}

impl TestServer {
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        Ok(Self { listener, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Wait for the bot to connect.
    pub async fn accept(&self) -> anyhow::Result<ServerConn> {
        let (stream, _) = timeout(RECV_TIMEOUT, self.listener.accept()).await??;
        Ok(ServerConn::new(stream))
    }
}

/// The server end of one bot connection.
pub struct ServerConn {
    reader: BufReader<Box<dyn AsyncRead + Send + Unpin>>,
    writer: Box<dyn AsyncWrite + Send + Unpin>,
}

#[allow(dead_code)]
impl ServerConn {
    pub fn new<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        Self {
            reader: BufReader::new(Box::new(read_half)),
            writer: Box::new(write_half),
        }
    }

    /// Send raw bytes exactly as given.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Send one line, adding CRLF.
    pub async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.send_bytes(format!("{line}\r\n").as_bytes()).await
    }

    /// Next line from the bot, without its terminator.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(RECV_TIMEOUT, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("bot closed the connection");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Read lines until one satisfies `predicate`, returning that line.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<String>
    where
        F: FnMut(&str) -> bool,
    {
        loop {
            let line = self.recv().await?;
            if predicate(&line) {
                return Ok(line);
            }
        }
    }

    /// Whether the bot closes the connection within the timeout.
    pub async fn closed(&mut self) -> bool {
        let mut line = String::new();
        loop {
            line.clear();
            match timeout(RECV_TIMEOUT, self.reader.read_line(&mut line)).await {
                Ok(Ok(0)) | Ok(Err(_)) => return true,
                Ok(Ok(_)) => continue,
                Err(_) => return false,
            }
        }
    }

    /// Consume NICK/USER, send the welcome and consume the JOIN.
    ///
    /// Returns the nickname the bot registered with.
    pub async fn complete_registration(&mut self) -> anyhow::Result<String> {
        let nick_line = self.recv().await?;
        let nick = nick_line
            .strip_prefix("NICK ")
            .ok_or_else(|| anyhow::anyhow!("expected NICK, got {nick_line}"))?
            .to_string();
        let user_line = self.recv().await?;
        anyhow::ensure!(user_line.starts_with("USER "), "expected USER, got {user_line}");

        self.send_line(&format!(":irc.test 001 {nick} :Welcome to the test network"))
            .await?;
        let join = self.recv().await?;
        anyhow::ensure!(join.starts_with("JOIN "), "expected JOIN, got {join}");
        Ok(nick)
    }
}
