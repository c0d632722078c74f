//! A spawned unit process with captured output.

use crate::{OUTPUT_TAIL_BYTES, ProcessSpec, SupervisorError, SupervisorErrorResult};

use std::panic::Location;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use error_location::ErrorLocation;
use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// How long to wait for the output readers to drain after the process exits.
const OUTPUT_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Rolling tail of a process's combined stdout and stderr.
#[derive(Debug, Default)]
pub(crate) struct OutputTail {
    buf: String,
}

impl OutputTail {
    pub(crate) fn push(&mut self, bytes: &[u8]) {
        self.buf.push_str(&String::from_utf8_lossy(bytes));

        if self.buf.len() > OUTPUT_TAIL_BYTES {
            let mut cut = self.buf.len() - OUTPUT_TAIL_BYTES;
            while !self.buf.is_char_boundary(cut) {
                cut += 1;
            }
            self.buf.drain(..cut);
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.buf
    }
}

/// Exclusively owned handle to one spawned unit process.
#[derive(Debug)]
pub struct ProcessHandle {
    name: String,
    child: Child,
    pid: Option<u32>,
    output: Arc<Mutex<OutputTail>>,
    readers: Vec<JoinHandle<()>>,
}

impl ProcessHandle {
    /// Spawn `spec.command` in its working directory with stdout and stderr piped.
    pub fn spawn(name: &str, spec: &ProcessSpec) -> SupervisorErrorResult<Self> {
        let Some((program, args)) = spec.command.split_first() else {
            return Err(SupervisorError::invalid_unit(name, "empty command"));
        };

        let mut cmd = Command::new(program);
        cmd.args(args)
            .envs(&spec.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(ref dir) = spec.working_dir {
            cmd.current_dir(dir);
        }

        // Own process group so wrapper shells take their children down with them.
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd.spawn().map_err(|e| SupervisorError::ProcessSpawn {
            name: name.to_string(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let pid = child.id();
        info!("Spawned {name} with PID {pid:?}: {}", spec.command.join(" "));

        let output = Arc::new(Mutex::new(OutputTail::default()));
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(Self::capture(stdout, output.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(Self::capture(stderr, output.clone()));
        }

        Ok(Self {
            name: name.to_string(),
            child,
            pid,
            output,
            readers,
        })
    }

    fn capture<R>(mut stream: R, output: Arc<Mutex<OutputTail>>) -> JoinHandle<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        tokio::spawn(async move {
            let mut chunk = [0u8; 4096];
            loop {
                match stream.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => output.lock().await.push(&chunk[..n]),
                }
            }
        })
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Non-blocking exit check. `None` while the process is still running.
    pub fn try_exit_status(&mut self) -> Option<ExitStatus> {
        match self.child.try_wait() {
            Ok(status) => status,
            Err(e) => {
                warn!("Failed to poll {} (pid {:?}): {e}", self.name, self.pid);
                None
            }
        }
    }

    pub fn is_alive(&mut self) -> bool {
        self.try_exit_status().is_none()
    }

    /// Everything captured so far, after giving the readers a moment to drain.
    pub async fn collect_output(&mut self) -> String {
        for reader in self.readers.drain(..) {
            if tokio::time::timeout(OUTPUT_DRAIN_TIMEOUT, reader)
                .await
                .is_err()
            {
                debug!("Output reader for {} still busy, using partial output", self.name);
            }
        }
        self.output.lock().await.as_str().to_string()
    }

    /// Terminate gracefully, force-killing after `grace`.
    ///
    /// Signals reach the whole process group, so anything the command forked
    /// goes down with it. Fails only when the forced kill fails too.
    pub async fn terminate(&mut self, grace: Duration) -> SupervisorErrorResult<()> {
        if !self.is_alive() {
            self.signal_group(GroupSignal::Kill);
            return Ok(());
        }

        self.signal_group(GroupSignal::Term);

        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(Ok(status)) => {
                info!("{} (pid {:?}) exited with {status}", self.name, self.pid);
                self.signal_group(GroupSignal::Kill);
                return Ok(());
            }
            Ok(Err(e)) => warn!("Failed waiting for {} to exit: {e}", self.name),
            Err(_) => warn!(
                "{} (pid {:?}) ignored SIGTERM for {grace:?}, killing",
                self.name, self.pid
            ),
        }

        self.signal_group(GroupSignal::Kill);
        self.child
            .kill()
            .await
            .map_err(|e| SupervisorError::Terminate {
                name: self.name.clone(),
                pid: self.pid,
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("Force killed {} (pid {:?})", self.name, self.pid);
        Ok(())
    }

    /// Signal every process in the unit's group. A group that is already gone is fine.
    #[cfg(unix)]
    fn signal_group(&mut self, signal: GroupSignal) {
        use nix::errno::Errno;
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        let Some(pgid) = self.pid.and_then(|p| i32::try_from(p).ok()) else {
            return;
        };

        let signal = match signal {
            GroupSignal::Term => Signal::SIGTERM,
            GroupSignal::Kill => Signal::SIGKILL,
        };

        debug!("Sending {signal} to process group of {} ({pgid})", self.name);
        match killpg(Pid::from_raw(pgid), signal) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(e) => warn!("{signal} to process group of {} failed: {e}", self.name),
        }
    }

    #[cfg(not(unix))]
    fn signal_group(&mut self, signal: GroupSignal) {
        // No graceful signal for a child without a console; go straight to kill.
        if matches!(signal, GroupSignal::Term)
            && let Err(e) = self.child.start_kill()
        {
            warn!("Failed to kill {}: {e}", self.name);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum GroupSignal {
    Term,
    Kill,
}
