//! In-memory stand-in for a socket with scriptable failures.

use std::{
    io::{self, Write},
    sync::Arc,
};

use parking_lot::Mutex;

#[derive(Debug, Default)]
struct Script {
    frames: Vec<Vec<u8>>,
    fail_after: Option<usize>,
    fail_flush: bool,
    flushes: usize,
}

/// Writer recording each `write` call as one frame.
///
/// Clones share state, so a test keeps one clone for inspection and hands
/// the other to the client.
#[derive(Clone, Debug, Default)]
pub struct ScriptedWriter {
    script: Arc<Mutex<Script>>,
}

impl ScriptedWriter {
    /// Writer that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer whose writes fail once `frames` frames have been accepted.
    pub fn failing_after(frames: usize) -> Self {
        let writer = Self::default();
        writer.script.lock().fail_after = Some(frames);
        writer
    }

    /// Writer that accepts writes but fails every flush.
    pub fn failing_flush() -> Self {
        let writer = Self::default();
        writer.script.lock().fail_flush = true;
        writer
    }

    /// Frames accepted so far.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.script.lock().frames.clone()
    }

    /// Accepted frames decoded as UTF-8.
    pub fn lines(&self) -> Vec<String> {
        self.frames()
            .into_iter()
            .map(|frame| String::from_utf8_lossy(&frame).into_owned())
            .collect()
    }

    /// Number of successful flushes.
    pub fn flushes(&self) -> usize {
        self.script.lock().flushes
    }
}

impl Write for ScriptedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut script = self.script.lock();
        if script
            .fail_after
            .is_some_and(|limit| script.frames.len() >= limit)
        {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "write error"));
        }
        script.frames.push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut script = self.script.lock();
        if script.fail_flush {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "flush error"));
        }
        script.flushes += 1;
        Ok(())
    }
}
