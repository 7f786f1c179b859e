//! Fake batch server speaking the JSONL protocol over TCP.
//!
//! Each accepted connection receives exactly one request line, answered by
//! the next scripted reply. The server thread stops once the script is
//! exhausted or when [`FakeServer::take_requests`] is called.

use std::io::{self, BufRead, BufReader};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use qalter_protocol::{Reply, write_message};

const ACCEPT_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(5);

pub(crate) struct FakeServer {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    stop: Arc<AtomicBool>,
    result: Arc<Mutex<Option<Result<()>>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeServer {
    /// Spawns a server on an ephemeral port that answers with `replies`, one
    /// per connection.
    pub(crate) fn spawn(replies: Vec<Reply>) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake server")?;
        listener
            .set_nonblocking(true)
            .context("fake server nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));
        let result: Arc<Mutex<Option<Result<()>>>> = Arc::new(Mutex::new(None));

        let requests_clone = Arc::clone(&requests);
        let stop_clone = Arc::clone(&stop);
        let result_clone = Arc::clone(&result);
        let handle = thread::spawn(move || {
            let outcome = Self::serve(&listener, replies, &requests_clone, &stop_clone);
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(outcome);
            }
        });

        Ok(Self {
            port,
            requests,
            stop,
            result,
            handle: Some(handle),
        })
    }

    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    /// Stops the server thread and returns every request line received.
    pub(crate) fn take_requests(&mut self) -> Result<Vec<String>> {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake server thread panicked"))?;
        }
        if let Some(outcome) = self
            .result
            .lock()
            .map_err(|error| anyhow!("lock fake server result: {error}"))?
            .take()
        {
            outcome.context("fake server failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve(
        listener: &TcpListener,
        replies: Vec<Reply>,
        requests: &Mutex<Vec<String>>,
        stop: &AtomicBool,
    ) -> Result<()> {
        for reply in replies {
            let Some(stream) = Self::accept(listener, stop)? else {
                return Ok(());
            };
            let line = Self::respond(stream, &reply)?;
            requests
                .lock()
                .map_err(|error| anyhow!("lock requests: {error}"))?
                .push(line);
        }
        Ok(())
    }

    fn accept(listener: &TcpListener, stop: &AtomicBool) -> Result<Option<TcpStream>> {
        let deadline = Instant::now() + ACCEPT_TIMEOUT;
        loop {
            match listener.accept() {
                Ok((stream, _)) => {
                    stream
                        .set_nonblocking(false)
                        .context("fake server blocking stream")?;
                    return Ok(Some(stream));
                }
                Err(error) if error.kind() == io::ErrorKind::WouldBlock => {
                    if stop.load(Ordering::SeqCst) || Instant::now() >= deadline {
                        return Ok(None);
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(error) => return Err(error).context("accept connection"),
            }
        }
    }

    fn respond(stream: TcpStream, reply: &Reply) -> Result<String> {
        let mut reader = BufReader::new(stream.try_clone().context("clone stream")?);
        let mut line = String::new();
        reader.read_line(&mut line).context("read request")?;
        let mut writer = stream;
        write_message(&mut writer, reply).context("write reply")?;
        Ok(line.trim_end().to_owned())
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
