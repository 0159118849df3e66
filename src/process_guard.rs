//! Process lifecycle management for the spawned terminal emulator
//!
//! The terminal runs in the background for the whole capture session. It must
//! never outlive termshot, whether the session succeeds, fails half way, or
//! termshot itself is interrupted.
//!
//! # Solution
//! - Spawn the terminal in its own process group with a parent-death signal
//! - Own it through `TerminalGuard`, which terminates it exactly once, either
//!   explicitly or on drop
//! - Track live PIDs in a global registry so signal handlers can clean up
//! - SIGTERM first, SIGKILL after the grace period

use nix::libc;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::collections::HashSet;
use std::process::{Child, ExitStatus};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Global registry of child process IDs
static CHILD_REGISTRY: OnceLock<Arc<Mutex<ChildRegistry>>> = OnceLock::new();

/// Registry tracking spawned child processes for the signal path
#[derive(Debug, Default)]
pub struct ChildRegistry {
    pids: HashSet<u32>,
    /// Whether cleanup has already been initiated (prevent double-cleanup)
    cleanup_initiated: bool,
}

impl ChildRegistry {
    /// Get or create the global child registry
    pub fn global() -> Arc<Mutex<ChildRegistry>> {
        CHILD_REGISTRY
            .get_or_init(|| Arc::new(Mutex::new(ChildRegistry::default())))
            .clone()
    }

    pub fn register(&mut self, pid: u32) {
        self.pids.insert(pid);
        debug!("Registered child process PID {}", pid);
    }

    pub fn unregister(&mut self, pid: u32) {
        self.pids.remove(&pid);
        debug!("Unregistered child process PID {}", pid);
    }

    #[cfg(test)]
    fn count(&self) -> usize {
        self.pids.len()
    }

    #[cfg(test)]
    fn contains(&self, pid: u32) -> bool {
        self.pids.contains(&pid)
    }

    /// Terminate all tracked child processes
    /// Sends SIGTERM first, waits up to `grace_period`, then SIGKILL
    pub fn terminate_all(&mut self, grace_period: Duration) {
        if self.cleanup_initiated {
            debug!("Cleanup already initiated, skipping");
            return;
        }
        self.cleanup_initiated = true;

        if self.pids.is_empty() {
            debug!("No child processes to terminate");
            return;
        }

        info!("Terminating {} child process(es)...", self.pids.len());

        let pids_to_kill: Vec<u32> = self.pids.iter().copied().collect();
        for &pid in &pids_to_kill {
            signal_tree(pid, Signal::SIGTERM);
        }

        let start = Instant::now();
        while start.elapsed() < grace_period {
            if pids_to_kill.iter().all(|&pid| !is_process_alive(pid)) {
                info!("All child processes terminated gracefully");
                self.pids.clear();
                return;
            }
            std::thread::sleep(Duration::from_millis(100));
        }

        for &pid in &pids_to_kill {
            if is_process_alive(pid) {
                warn!("Process group {} did not terminate, sending SIGKILL", pid);
                signal_tree(pid, Signal::SIGKILL);
            }
        }

        self.pids.clear();
        info!("Child process cleanup complete");
    }
}

/// Send a signal to a process
fn send_signal(pid: u32, signal: Signal) -> Result<(), nix::Error> {
    signal::kill(Pid::from_raw(pid as i32), signal)
}

/// Send a signal to an entire process group
/// Negative PID reaches the interpreter the terminal started as well
fn send_signal_to_group(pgid: u32, signal: Signal) -> Result<(), nix::Error> {
    signal::kill(Pid::from_raw(-(pgid as i32)), signal)
}

/// Signal the process group, falling back to the bare PID
fn signal_tree(pid: u32, sig: Signal) {
    if let Err(e) = send_signal_to_group(pid, sig) {
        debug!("Group signal {} to {} failed: {}", sig, pid, e);
        if let Err(e2) = send_signal(pid, sig) {
            warn!("Failed to send {} to PID {}: {}", sig, pid, e2);
        }
    } else {
        debug!("Sent {} to process group {}", sig, pid);
    }
}

/// Check if a process is still alive (not dead or zombie)
fn is_process_alive(pid: u32) -> bool {
    if signal::kill(Pid::from_raw(pid as i32), None).is_err() {
        return false;
    }

    // Field 3 of /proc/pid/stat is the state; zombies count as dead
    if let Ok(stat) = std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        let fields: Vec<&str> = stat.split_whitespace().collect();
        if fields.len() > 2 {
            return !matches!(fields[2], "Z" | "X");
        }
    }

    true
}

/// Owned handle to the spawned terminal emulator.
///
/// Dropping the guard terminates the terminal if `terminate` was not called
/// already, so an early `?` anywhere in the session still cleans up.
#[derive(Debug)]
pub struct TerminalGuard {
    child: Child,
    grace_period: Duration,
    terminated: bool,
}

impl TerminalGuard {
    /// Take ownership of a spawned child and register it for signal cleanup
    pub fn new(child: Child, grace_period: Duration) -> Self {
        let pid = child.id();
        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.register(pid);
        }
        Self {
            child,
            grace_period,
            terminated: false,
        }
    }

    fn pid(&self) -> u32 {
        self.child.id()
    }

    #[cfg(test)]
    fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Exit status if the terminal process has already exited on its own
    pub fn exit_status(&mut self) -> Option<ExitStatus> {
        self.child.try_wait().ok().flatten()
    }

    /// Terminate the terminal: SIGTERM to its group, SIGKILL after the grace
    /// period, then reap it.
    ///
    /// Returns `true` if this call performed the termination, `false` if it
    /// had already been done.
    pub fn terminate(&mut self) -> bool {
        if self.terminated {
            return false;
        }
        self.terminated = true;

        let pid = self.pid();
        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.unregister(pid);
        }

        if let Ok(Some(status)) = self.child.try_wait() {
            debug!("Terminal {} already exited with {}", pid, status);
            return true;
        }

        info!("Terminating terminal process {}", pid);
        signal_tree(pid, Signal::SIGTERM);

        let start = Instant::now();
        while start.elapsed() < self.grace_period {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    debug!("Terminal {} exited with {}", pid, status);
                    return true;
                }
                Ok(None) => std::thread::sleep(Duration::from_millis(20)),
                Err(e) => {
                    warn!("Failed to poll terminal {}: {}", pid, e);
                    break;
                }
            }
        }

        warn!("Terminal {} did not exit, sending SIGKILL", pid);
        signal_tree(pid, Signal::SIGKILL);
        if let Err(e) = self.child.wait() {
            warn!("Failed to reap terminal {}: {}", pid, e);
        }
        true
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if !self.terminated {
            debug!("TerminalGuard dropped before explicit termination, cleaning up");
            self.terminate();
        }
    }
}

/// Terminate everything in `registry` after `sig` and return the exit code
/// to leave with
fn cleanup_after_signal(registry: &mut ChildRegistry, sig: i32, grace_period: Duration) -> i32 {
    registry.terminate_all(grace_period);
    128 + sig
}

/// Initialize global signal handlers for graceful shutdown
/// Handles SIGINT (Ctrl+C), SIGTERM, and SIGHUP
/// Call this once the configuration is known; `grace_period` is how long
/// children get between SIGTERM and SIGKILL
pub fn init_signal_handlers(grace_period: Duration) -> Result<(), std::io::Error> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;
    use std::thread;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;

    thread::spawn(move || {
        for sig in signals.forever() {
            let signal_name = match sig {
                SIGINT => "SIGINT",
                SIGTERM => "SIGTERM",
                SIGHUP => "SIGHUP",
                _ => "UNKNOWN",
            };

            info!("Received {} signal, cleaning up...", signal_name);

            let code = match ChildRegistry::global().lock() {
                Ok(mut registry) => cleanup_after_signal(&mut registry, sig, grace_period),
                Err(_) => 128 + sig,
            };

            std::process::exit(code);
        }
    });

    Ok(())
}

/// Extension trait for std::process::Command to set up process groups
pub trait CommandProcessGroup {
    /// Run the command in its own process group and make it die with us
    fn in_new_process_group(&mut self) -> &mut Self;
}

impl CommandProcessGroup for std::process::Command {
    fn in_new_process_group(&mut self) -> &mut Self {
        use std::os::unix::process::CommandExt;
        // SAFETY: the closure only calls async-signal-safe setpgid and prctl
        unsafe {
            self.pre_exec(|| {
                nix::unistd::setpgid(Pid::from_raw(0), Pid::from_raw(0))
                    .map_err(std::io::Error::other)?;

                if libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM) == -1 {
                    return Err(std::io::Error::last_os_error());
                }

                Ok(())
            });
        }
        self
    }
}
