//! Background ingestion of a text source into the line store.
//!
//! An [`Ingestor`] reads its source on a dedicated thread, appending one line
//! at a time. While it runs, a [`Ticker`] calls the refresh callback every
//! refresh interval; once the source is exhausted the ticker is cancelled and
//! one final refresh is issued with status [`Status::Ready`].
//!
//! ```text
//!   source --read_until('\n')--> ingest thread --append--> LineStore
//!                                     |
//!                                     +--> Progress (status, lines, width)
//!                                                 ^
//!   ticker thread --every refresh_secs------------+--> on_refresh(&Progress)
//! ```

use crate::error::{PagerError, PagerResult};
use crate::text::{expanded_width, remove_backspaces};
use crossbeam_channel::{RecvTimeoutError, Sender};
use line_store::LineStore;
use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Ingestion status, as shown in a status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Reading a named file.
    Reading,
    /// Receiving data from stdin.
    Receiving,
    /// All data ingested.
    Ready,
}

impl Status {
    fn as_u8(self) -> u8 {
        match self {
            Status::Reading => 0,
            Status::Receiving => 1,
            Status::Ready => 2,
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => Status::Reading,
            1 => Status::Receiving,
            _ => Status::Ready,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Reading => write!(f, "reading"),
            Status::Receiving => write!(f, "receiving data"),
            Status::Ready => write!(f, "ready"),
        }
    }
}

/// Live ingestion progress, shared between the ingest thread and readers.
#[derive(Debug)]
pub struct Progress {
    status: AtomicU8,
    lines: AtomicUsize,
    max_width: AtomicUsize,
}

impl Progress {
    fn new(status: Status) -> Self {
        Self {
            status: AtomicU8::new(status.as_u8()),
            lines: AtomicUsize::new(0),
            max_width: AtomicUsize::new(0),
        }
    }

    pub fn status(&self) -> Status {
        Status::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Lines ingested so far.
    pub fn lines(&self) -> usize {
        self.lines.load(Ordering::Relaxed)
    }

    /// Widest line so far, in columns with tabs expanded.
    pub fn max_width(&self) -> usize {
        self.max_width.load(Ordering::Relaxed)
    }
}

/// Result of a completed ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub lines: usize,
    pub max_width: usize,
    /// The shutdown flag stopped ingestion before the end of the source.
    pub interrupted: bool,
}

/// Periodic callback on its own thread, stopped through a channel.
pub struct Ticker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Start calling `tick` every `interval` until cancelled.
    pub fn start<F>(name: &str, interval: Duration, tick: F) -> PagerResult<Self>
    where
        F: Fn() + Send + 'static,
    {
        let (stop, stop_rx) = crossbeam_channel::bounded::<()>(1);

        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => tick(),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;

        Ok(Self { stop, handle })
    }

    /// Stop the ticker and wait for its thread. No tick runs after this
    /// returns.
    pub fn cancel(self) {
        let _ = self.stop.send(());
        if self.handle.join().is_err() {
            tracing::warn!("ticker thread panicked");
        }
    }
}

/// Reads a source into a [`LineStore`] on a background thread.
pub struct Ingestor {
    store: Arc<LineStore>,
    spaces_per_tab: usize,
    remove_backspaces: bool,
    refresh_interval: Duration,
    eager_refresh_lines: usize,
    shutdown: Arc<AtomicBool>,
}

impl Ingestor {
    pub fn new(store: Arc<LineStore>) -> Self {
        Self {
            store,
            spaces_per_tab: 4,
            remove_backspaces: false,
            refresh_interval: Duration::from_secs(5),
            eager_refresh_lines: 0,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Columns a tab counts for when measuring line width.
    pub fn spaces_per_tab(mut self, n: usize) -> Self {
        self.spaces_per_tab = n;
        self
    }

    /// Strip overstrike backspaces from every line.
    pub fn remove_backspaces(mut self, enabled: bool) -> Self {
        self.remove_backspaces = enabled;
        self
    }

    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Refresh after each of the first `n` lines, so a screenful shows up
    /// before the first tick.
    pub fn eager_refresh_lines(mut self, n: usize) -> Self {
        self.eager_refresh_lines = n;
        self
    }

    /// Flag that stops ingestion at the next line when set.
    pub fn shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = flag;
        self
    }

    /// Start ingesting `source` on a thread named `ingest`.
    ///
    /// `status` is the status reported while data is arriving.
    pub fn spawn<R, F>(self, source: R, status: Status, on_refresh: F) -> PagerResult<IngestHandle>
    where
        R: Read + Send + 'static,
        F: Fn(&Progress) + Send + Sync + 'static,
    {
        let progress = Arc::new(Progress::new(status));
        let on_refresh = Arc::new(on_refresh);

        let handle = thread::Builder::new()
            .name("ingest".to_string())
            .spawn(move || self.run(source, progress, on_refresh))?;

        Ok(IngestHandle { handle })
    }

    fn run<R, F>(
        self,
        source: R,
        progress: Arc<Progress>,
        on_refresh: Arc<F>,
    ) -> PagerResult<IngestSummary>
    where
        R: Read,
        F: Fn(&Progress) + Send + Sync + 'static,
    {
        let ticker = {
            let progress = progress.clone();
            let on_refresh = on_refresh.clone();
            Ticker::start("ingest-ticker", self.refresh_interval, move || {
                (*on_refresh)(&progress)
            })?
        };

        let result = self.read_all(source, &progress, on_refresh.as_ref());
        ticker.cancel();

        progress
            .status
            .store(Status::Ready.as_u8(), Ordering::Release);
        (*on_refresh)(&progress);

        match &result {
            Ok(summary) => tracing::debug!(
                lines = summary.lines,
                max_width = summary.max_width,
                interrupted = summary.interrupted,
                "ingestion finished"
            ),
            Err(e) => tracing::error!(error = %e, "ingestion failed"),
        }
        result
    }

    fn read_all<R, F>(&self, source: R, progress: &Progress, on_refresh: &F) -> PagerResult<IngestSummary>
    where
        R: Read,
        F: Fn(&Progress),
    {
        let mut reader = BufReader::new(source);
        let mut buf = Vec::new();
        let mut interrupted = false;

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                interrupted = true;
                break;
            }

            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            let raw = String::from_utf8_lossy(&buf);
            let line = if self.remove_backspaces {
                remove_backspaces(&raw)
            } else {
                raw
            };

            let width = expanded_width(line.trim_end_matches(['\r', '\n']), self.spaces_per_tab);
            self.store.append(&line)?;

            progress.max_width.fetch_max(width, Ordering::Relaxed);
            let lines = progress.lines.fetch_add(1, Ordering::Relaxed) + 1;
            if lines <= self.eager_refresh_lines {
                on_refresh(progress);
            }
        }

        Ok(IngestSummary {
            lines: progress.lines(),
            max_width: progress.max_width(),
            interrupted,
        })
    }
}

/// Handle to a running ingestion.
pub struct IngestHandle {
    handle: JoinHandle<PagerResult<IngestSummary>>,
}

impl IngestHandle {
    /// Wait for ingestion to finish.
    pub fn wait(self) -> PagerResult<IngestSummary> {
        self.handle
            .join()
            .map_err(|_| PagerError::IngestPanicked)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor as IoCursor;
    use std::sync::Mutex;

    fn read_back(store: &LineStore) -> Vec<String> {
        let mut lines = Vec::new();
        let mut cursor = store.cursor();
        if store.is_empty() {
            return lines;
        }
        loop {
            lines.push(cursor.get_line().unwrap());
            if !cursor.increment() {
                break;
            }
        }
        lines
    }

    #[test]
    fn test_ingest_lines() {
        let store = Arc::new(LineStore::with_limits(64, 128));
        let source = IoCursor::new("first\nsecond line\r\n\tthird\n\nlast without newline");

        let handle = Ingestor::new(store.clone())
            .spawn(source, Status::Reading, |_| {})
            .unwrap();
        let summary = handle.wait().unwrap();

        assert_eq!(summary.lines, 5);
        assert_eq!(summary.max_width, "last without newline".len());
        assert!(!summary.interrupted);
        assert_eq!(
            read_back(&store),
            vec!["first", "second line", "\tthird", "", "last without newline"]
        );
    }

    #[test]
    fn test_width_counts_tabs() {
        let store = Arc::new(LineStore::default());
        let handle = Ingestor::new(store)
            .spaces_per_tab(8)
            .spawn(IoCursor::new("\t\tx\nabc\n"), Status::Reading, |_| {})
            .unwrap();
        assert_eq!(handle.wait().unwrap().max_width, 17);
    }

    #[test]
    fn test_remove_backspaces() {
        let store = Arc::new(LineStore::default());
        let handle = Ingestor::new(store.clone())
            .remove_backspaces(true)
            .spawn(IoCursor::new("N\u{8}NA\u{8}AME\n"), Status::Receiving, |_| {})
            .unwrap();
        handle.wait().unwrap();
        assert_eq!(read_back(&store), vec!["NAME"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let store = Arc::new(LineStore::default());
        let bytes: Vec<u8> = vec![b'a', 0xff, b'b', b'\n'];
        let handle = Ingestor::new(store.clone())
            .spawn(IoCursor::new(bytes), Status::Reading, |_| {})
            .unwrap();
        handle.wait().unwrap();
        assert_eq!(read_back(&store), vec!["a\u{fffd}b"]);
    }

    #[test]
    fn test_final_refresh_reports_ready() {
        let store = Arc::new(LineStore::default());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let recorder = seen.clone();
        let handle = Ingestor::new(store)
            .eager_refresh_lines(2)
            .spawn(IoCursor::new("a\nb\nc\nd\n"), Status::Receiving, move |p| {
                recorder.lock().unwrap().push((p.status(), p.lines()));
            })
            .unwrap();
        handle.wait().unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (Status::Receiving, 1),
                (Status::Receiving, 2),
                (Status::Ready, 4)
            ]
        );
    }

    #[test]
    fn test_shutdown_flag_interrupts() {
        let store = Arc::new(LineStore::default());
        let flag = Arc::new(AtomicBool::new(true));
        let handle = Ingestor::new(store.clone())
            .shutdown_flag(flag)
            .spawn(IoCursor::new("a\nb\n"), Status::Reading, |_| {})
            .unwrap();

        let summary = handle.wait().unwrap();
        assert!(summary.interrupted);
        assert_eq!(summary.lines, 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_closed_store_fails_ingestion() {
        let store = Arc::new(LineStore::default());
        store.shutdown().unwrap();
        let handle = Ingestor::new(store)
            .spawn(IoCursor::new("a\n"), Status::Reading, |_| {})
            .unwrap();
        assert!(matches!(
            handle.wait(),
            Err(PagerError::Store(line_store::StoreError::Closed))
        ));
    }

    #[test]
    fn test_ticker_ticks_until_cancelled() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let ticker = Ticker::start("test-ticker", Duration::from_millis(5), move || {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();

        while ticks.load(Ordering::Relaxed) < 3 {
            thread::sleep(Duration::from_millis(1));
        }
        ticker.cancel();

        let after = ticks.load(Ordering::Relaxed);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(ticks.load(Ordering::Relaxed), after);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::Reading.to_string(), "reading");
        assert_eq!(Status::Receiving.to_string(), "receiving data");
        assert_eq!(Status::Ready.to_string(), "ready");
    }
}
