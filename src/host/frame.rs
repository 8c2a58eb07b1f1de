use std::io::Read as _;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use crate::foundation::error::{PassageError, PassageResult};

/// Any occurrence of this literal in accumulated host output cancels the render.
pub const HOST_ERROR_MARKER: &str = "Error: Python:";

/// Terminal state of one supervised frame render.
///
/// Per invocation the supervisor moves `Launched → Streaming → {Completed | Killed}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuperviseStatus {
    /// The stream ended and the process exited without the error marker appearing.
    Completed,
    /// The error marker appeared; the process was killed immediately.
    Killed,
}

/// The surfaced result of one supervised frame render.
#[derive(Debug)]
pub struct FrameRenderLog {
    /// Terminal supervision state.
    pub status: SuperviseStatus,
    /// The accumulated process output.
    pub log: String,
    /// The child's exit status, when it could be collected.
    ///
    /// A non-zero exit without the error marker still classifies as `Completed`;
    /// the status is surfaced here so callers can distinguish silent failures.
    pub exit: Option<ExitStatus>,
}

impl FrameRenderLog {
    /// `true` when supervision completed and the child reported success.
    pub fn exit_ok(&self) -> bool {
        self.status == SuperviseStatus::Completed
            && self.exit.is_some_and(|status| status.success())
    }
}

/// One background frame render in an external 3D host.
///
/// The command line encodes the scene file, a python expression invoking the
/// script's frame-render entry point with the target frame and sample count, the
/// output directory, and the frame number.
#[derive(Clone, Debug)]
pub struct HostFrameJob {
    /// The host executable.
    pub host: PathBuf,
    /// The scene file the host opens.
    pub scene: PathBuf,
    /// The script holding the frame-render entry point.
    pub script: PathBuf,
    /// Directory receiving the rendered frame.
    pub output_dir: PathBuf,
    /// Target frame index.
    pub frame: u32,
    /// Render sample count.
    pub samples: u32,
}

impl HostFrameJob {
    /// The python expression the host evaluates to render the frame.
    pub fn expr(&self) -> String {
        format!(
            "import runpy; runpy.run_path('{}')['render_frame']({}, {})",
            self.script.display(),
            self.frame,
            self.samples
        )
    }

    /// Build the host command line for this job.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.host);
        cmd.arg("-b")
            .arg(&self.scene)
            .arg("--python-expr")
            .arg(self.expr())
            .arg("-o")
            .arg(&self.output_dir)
            .arg("-f")
            .arg(self.frame.to_string());
        cmd
    }
}

/// Render one frame in a background host process under supervision.
#[tracing::instrument(skip(job), fields(frame = job.frame))]
pub fn render_frame_supervised(job: &HostFrameJob) -> PassageResult<FrameRenderLog> {
    tracing::info!(scene = %job.scene.display(), frame = job.frame, "rendering frame in host");
    supervise(job.command())
}

/// Supervise one external process, cancelling early on the error marker.
///
/// The child's stdout is read one byte at a time into an accumulating log. After
/// each byte the log is checked for [`HOST_ERROR_MARKER`]; on a hit the process is
/// killed immediately and the log surfaced. There is no wall-clock timeout —
/// cancellation is content-triggered only. Each invocation owns its log and kill
/// trigger, so concurrent supervised frames never affect one another.
pub fn supervise(mut cmd: Command) -> PassageResult<FrameRenderLog> {
    let mut child = cmd
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|e| PassageError::host(format!("failed to launch host process: {e}")))?;
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| PassageError::host("failed to open host stdout"))?;

    let marker = HOST_ERROR_MARKER.as_bytes();
    let mut log: Vec<u8> = Vec::new();
    let mut byte = [0u8; 1];
    let (status, exit) = loop {
        let n = stdout
            .read(&mut byte)
            .map_err(|e| PassageError::host(format!("failed to read host output: {e}")))?;
        if n == 0 {
            let exit = child
                .wait()
                .map_err(|e| PassageError::host(format!("failed to reap host process: {e}")))?;
            break (SuperviseStatus::Completed, Some(exit));
        }
        log.push(byte[0]);
        // One byte was appended, so a new marker occurrence can only end at the tail.
        if log.len() >= marker.len() && &log[log.len() - marker.len()..] == marker {
            child.kill().ok();
            let exit = child.wait().ok();
            break (SuperviseStatus::Killed, exit);
        }
    };

    let log = String::from_utf8_lossy(&log).into_owned();
    match status {
        SuperviseStatus::Killed => tracing::error!(%log, "host render cancelled on error marker"),
        SuperviseStatus::Completed => {
            if let Some(exit) = exit
                && !exit.success()
            {
                tracing::warn!(%exit, "host exited non-zero without error marker");
            }
        }
    }
    Ok(FrameRenderLog { status, log, exit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[cfg(unix)]
    #[test]
    fn clean_stream_completes() {
        let report = supervise(sh("echo frame 12 done")).unwrap();
        assert_eq!(report.status, SuperviseStatus::Completed);
        assert!(report.log.contains("frame 12 done"));
        assert!(report.exit_ok());
    }

    #[cfg(unix)]
    #[test]
    fn marker_kills_before_natural_exit() {
        let start = std::time::Instant::now();
        let report = supervise(sh("echo 'Error: Python: boom'; sleep 30")).unwrap();
        assert_eq!(report.status, SuperviseStatus::Killed);
        assert!(report.log.contains(HOST_ERROR_MARKER));
        // Cancellation is content-triggered; the 30s sleep never runs out.
        assert!(start.elapsed() < std::time::Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_without_marker_still_completes() {
        let report = supervise(sh("echo fine; exit 3")).unwrap();
        assert_eq!(report.status, SuperviseStatus::Completed);
        assert!(!report.exit_ok());
        assert_eq!(report.exit.and_then(|s| s.code()), Some(3));
    }

    #[test]
    fn missing_host_is_a_host_error() {
        let err = supervise(Command::new("/nonexistent/host-binary")).unwrap_err();
        assert!(matches!(err, PassageError::Host(_)));
    }

    #[test]
    fn job_command_encodes_script_frame_and_samples() {
        let job = HostFrameJob {
            host: PathBuf::from("/opt/host/bin/host"),
            scene: PathBuf::from("shot.scene"),
            script: PathBuf::from("shot.py"),
            output_dir: PathBuf::from("out"),
            frame: 42,
            samples: 2,
        };
        let expr = job.expr();
        assert!(expr.contains("shot.py"));
        assert!(expr.contains("(42, 2)"));
        let cmd = job.command();
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert!(args.contains(&"-b".to_string()));
        assert!(args.contains(&"42".to_string()));
    }
}
