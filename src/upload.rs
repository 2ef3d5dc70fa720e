use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use anyhow::{Context, Result, ensure};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

pub const MAX_IMAGE_INPUT_BYTES: usize = 20 * 1024 * 1024;

struct LoadRequest {
    seq: u64,
    path: PathBuf,
}

struct LoadResponse {
    seq: u64,
    result: Result<String, String>,
}

/// Converts picked image files into data URLs on a background thread.
pub struct ImageLoader {
    request_tx: Sender<LoadRequest>,
    response_rx: Receiver<LoadResponse>,
}

impl ImageLoader {
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = mpsc::channel::<LoadRequest>();
        let (response_tx, response_rx) = mpsc::channel::<LoadResponse>();
        std::thread::spawn(move || {
            while let Ok(request) = request_rx.recv() {
                let result = read_as_data_url(&request.path).map_err(|err| format!("{err:#}"));
                if let Err(err) = &result {
                    tracing::warn!(path = %request.path.display(), "image read failed: {err}");
                }
                if response_tx
                    .send(LoadResponse {
                        seq: request.seq,
                        result,
                    })
                    .is_err()
                {
                    break;
                }
            }
        });

        Self {
            request_tx,
            response_rx,
        }
    }
}

/// A finished read, delivered only if it is still the one being waited on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Loaded(String),
    Failed(String),
}

/// Tracks the single in-flight image read for one form. Completions for
/// superseded or cancelled reads are dropped.
pub struct UploadSession {
    loader: ImageLoader,
    next_seq: u64,
    in_flight_seq: Option<u64>,
}

impl UploadSession {
    pub fn new(loader: ImageLoader) -> Self {
        Self {
            loader,
            next_seq: 0,
            in_flight_seq: None,
        }
    }

    pub fn start(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.in_flight_seq = Some(seq);
        if let Err(err) = self.loader.request_tx.send(LoadRequest {
            seq,
            path: path.into(),
        }) {
            self.in_flight_seq = None;
            anyhow::bail!("failed to queue image read: {err}");
        }
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight_seq.is_some()
    }

    /// Forget the in-flight read, e.g. when the form is closed.
    pub fn cancel(&mut self) {
        self.in_flight_seq = None;
    }

    /// Drains finished reads without blocking.
    pub fn poll(&mut self) -> Option<Completion> {
        loop {
            match self.loader.response_rx.try_recv() {
                Ok(msg) => {
                    if let Some(completion) = self.accept(msg) {
                        return Some(completion);
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }

    /// Blocks until the in-flight read completes. Returns `None` when nothing
    /// is pending or the worker is gone.
    pub fn wait(&mut self) -> Option<Completion> {
        while self.in_flight_seq.is_some() {
            let msg = self.loader.response_rx.recv().ok()?;
            if let Some(completion) = self.accept(msg) {
                return Some(completion);
            }
        }
        None
    }

    fn accept(&mut self, msg: LoadResponse) -> Option<Completion> {
        if Some(msg.seq) != self.in_flight_seq {
            tracing::debug!(seq = msg.seq, "ignoring stale image read");
            return None;
        }
        self.in_flight_seq = None;
        Some(match msg.result {
            Ok(url) => Completion::Loaded(url),
            Err(err) => Completion::Failed(err),
        })
    }
}

pub fn read_as_data_url(path: &Path) -> Result<String> {
    let mime = mime_for_path(path)
        .with_context(|| format!("{} is not a supported image type", path.display()))?;
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    ensure!(!bytes.is_empty(), "{} is empty", path.display());
    ensure!(
        bytes.len() <= MAX_IMAGE_INPUT_BYTES,
        "image exceeds {} MB input limit",
        MAX_IMAGE_INPUT_BYTES / (1024 * 1024)
    );
    Ok(encode_data_url(mime, &bytes))
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_bytes_as_data_url() {
        assert_eq!(encode_data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[test]
    fn rejects_unknown_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"text").unwrap();
        assert!(read_as_data_url(&path).is_err());
    }

    #[test]
    fn completed_read_is_delivered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shirt.JPG");
        std::fs::write(&path, [0xff, 0xd8, 0xff]).unwrap();

        let mut session = UploadSession::new(ImageLoader::spawn());
        session.start(&path).unwrap();
        assert!(session.is_pending());
        assert_eq!(
            session.wait(),
            Some(Completion::Loaded("data:image/jpeg;base64,/9j/".into()))
        );
        assert!(!session.is_pending());
    }

    #[test]
    fn superseded_read_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.png");
        let second = dir.path().join("second.png");
        std::fs::write(&first, b"one").unwrap();
        std::fs::write(&second, b"two").unwrap();

        let mut session = UploadSession::new(ImageLoader::spawn());
        session.start(&first).unwrap();
        session.start(&second).unwrap();
        assert_eq!(
            session.wait(),
            Some(Completion::Loaded(encode_data_url("image/png", b"two")))
        );
    }

    #[test]
    fn cancelled_read_never_completes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.png");
        std::fs::write(&path, b"late").unwrap();

        let mut session = UploadSession::new(ImageLoader::spawn());
        session.start(&path).unwrap();
        session.cancel();
        assert_eq!(session.wait(), None);
        std::thread::sleep(std::time::Duration::from_millis(50));
        assert_eq!(session.poll(), None);
    }

    #[test]
    fn missing_file_reports_failure() {
        let mut session = UploadSession::new(ImageLoader::spawn());
        session.start("/definitely/not/here.png").unwrap();
        assert!(matches!(session.wait(), Some(Completion::Failed(_))));
    }
}
