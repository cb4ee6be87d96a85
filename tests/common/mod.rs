use async_trait::async_trait;
use compress_img::{CompressionError, CompressionService, Preserve};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory stand-in for the remote service. Records every call.
pub struct FakeService {
    pub count: u64,
    pub reject_key: bool,
    pub compress_error: Option<CompressionError>,
    pub output: Vec<u8>,
    pub validate_calls: AtomicUsize,
    pub compress_calls: AtomicUsize,
    pub last_preserve: Mutex<Vec<Preserve>>,
}

impl FakeService {
    pub fn new(count: u64) -> Self {
        Self {
            count,
            reject_key: false,
            compress_error: None,
            output: b"compressed".to_vec(),
            validate_calls: AtomicUsize::new(0),
            compress_calls: AtomicUsize::new(0),
            last_preserve: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting_key() -> Self {
        Self {
            reject_key: true,
            ..Self::new(0)
        }
    }

    pub fn failing_with(error: CompressionError) -> Self {
        Self {
            compress_error: Some(error),
            ..Self::new(0)
        }
    }

    pub fn compress_calls(&self) -> usize {
        self.compress_calls.load(Ordering::SeqCst)
    }

    pub fn validate_calls(&self) -> usize {
        self.validate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompressionService for FakeService {
    async fn validate_key(&self) -> Result<u64, CompressionError> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_key {
            return Err(CompressionError::Account(
                "Credentials are invalid. (HTTP 401/Unauthorized)".to_string(),
            ));
        }
        Ok(self.count)
    }

    async fn compress(
        &self,
        _source: Vec<u8>,
        preserve: &[Preserve],
    ) -> Result<Vec<u8>, CompressionError> {
        self.compress_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_preserve.lock().unwrap() = preserve.to_vec();
        match &self.compress_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.output.clone()),
        }
    }
}

pub fn create_test_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    File::create(&path).unwrap().write_all(contents).unwrap();
    path
}
