//! Logging setup
//!
//! Console output always; a log file under the data directory when
//! `fileLogging` is on. The file is opened on the first write after the
//! switch is flipped, so a disabled file layer never touches the disk.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use once_cell::sync::Lazy;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const APP_DIR_NAME: &str = "Calcbar";
const LOG_FILENAME: &str = "calcbar.log";

static FILE_LOGGING_ENABLED: AtomicBool = AtomicBool::new(false);

static LOG_FILE: Lazy<Option<Mutex<File>>> =
    Lazy::new(|| open_log_file().or_else(|_| open_fallback_log_file()).ok().map(Mutex::new));

pub fn init_logging() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "calcbar_lib=debug".parse() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(FileWriter),
        )
        .with(filter)
        .init();
}

pub fn set_file_logging(enabled: bool) {
    FILE_LOGGING_ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn file_logging_enabled() -> bool {
    FILE_LOGGING_ENABLED.load(Ordering::Relaxed)
}

fn open_log_file() -> io::Result<File> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Missing data directory"))?;
    let log_dir = data_dir.join(APP_DIR_NAME);
    std::fs::create_dir_all(&log_dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(LOG_FILENAME))
}

fn open_fallback_log_file() -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(std::env::temp_dir().join(LOG_FILENAME))
}

#[derive(Clone, Copy)]
struct FileWriter;

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = FileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        FileWriter
    }
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !file_logging_enabled() {
            return Ok(buf.len());
        }

        match LOG_FILE.as_ref().map(|file| file.lock()) {
            Some(Ok(mut file)) => file.write(buf),
            _ => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if !file_logging_enabled() {
            return Ok(());
        }
        match LOG_FILE.as_ref().map(|file| file.lock()) {
            Some(Ok(mut file)) => file.flush(),
            _ => Ok(()),
        }
    }
}
