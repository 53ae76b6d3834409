use chrono::{DateTime, Local, TimeZone};
use nix::errno::Errno;
use nix::sched::{sched_getaffinity, CpuSet};
use nix::unistd::{Pid, Uid, User};
use once_cell::sync::Lazy;
use procfs::process::Process;
use procfs::ProcError;
use std::fs;
use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::backend::ProcessSnapshotSource;
use crate::error::{MonitorError, ProcessError, Result};
use crate::model::{ProcessRecord, ProcessStatus};

type ReadResult<T> = std::result::Result<T, ProcessError>;

const TASK_COMM_MAX: usize = 15;

static CLOCK_TICKS: Lazy<u64> = Lazy::new(|| procfs::ticks_per_second().max(1));

/// Reads processes straight out of `/proc`.
pub struct LinuxProcessSource {
    cpu_interval: Duration,
    boot_time_secs: u64,
}

impl LinuxProcessSource {
    pub fn new(cpu_interval: Duration) -> Result<Self> {
        let boot_time_secs = procfs::boot_time_secs()
            .map_err(|e| MonitorError::Enumeration(format!("failed to read boot time: {}", e)))?;
        Ok(Self {
            cpu_interval,
            boot_time_secs,
        })
    }

    pub fn read_pid(&self, pid: u32) -> ReadResult<ProcessRecord> {
        let process = Process::new(pid as i32).map_err(|e| map_proc_error(pid, e))?;
        self.read_process(&process)
    }

    fn read_process(&self, process: &Process) -> ReadResult<ProcessRecord> {
        let pid = process.pid() as u32;

        let before = process.stat().map_err(|e| map_proc_error(pid, e))?;
        if before.state == 'Z' {
            return Err(ProcessError::UnreadableState(pid));
        }

        // Everything that can be denied is read before paying for the CPU wait
        let status = process.status().map_err(|e| map_proc_error(pid, e))?;
        let io = process.io().map_err(|e| map_proc_error(pid, e))?;
        let memory_usage_bytes = read_uss(pid)?;
        let affinity_core_count = affinity_cores(pid)?;
        let create_time = self.create_time(pid, before.starttime)?;

        // CPU usage is the tick delta across a fixed wait
        thread::sleep(self.cpu_interval);

        let stat = process.stat().map_err(|e| map_proc_error(pid, e))?;
        if stat.state == 'Z' {
            return Err(ProcessError::UnreadableState(pid));
        }
        let cpu_usage_percent = cpu_percent(
            before.utime + before.stime,
            stat.utime + stat.stime,
            self.cpu_interval,
        );

        let cmdline = process.cmdline().unwrap_or_default();
        let exe = process.exe().ok();

        Ok(ProcessRecord {
            pid,
            name: full_name(&stat.comm, &cmdline, exe.as_deref()),
            username: username(status.ruid),
            create_time,
            cpu_usage_percent,
            affinity_core_count,
            status: ProcessStatus::from_state_char(stat.state),
            niceness: stat.nice as i32,
            memory_usage_bytes,
            io_read_bytes: io.read_bytes,
            io_write_bytes: io.write_bytes,
            thread_count: stat.num_threads.max(0) as u64,
        })
    }

    fn create_time(&self, pid: u32, start_ticks: u64) -> ReadResult<DateTime<Local>> {
        let millis = self.boot_time_secs * 1000 + start_ticks * 1000 / *CLOCK_TICKS;
        Local
            .timestamp_millis_opt(millis as i64)
            .single()
            .ok_or_else(|| ProcessError::Unexpected {
                pid,
                reason: format!("start time {} ms out of range", millis),
            })
    }
}

impl ProcessSnapshotSource for LinuxProcessSource {
    type Handle = Process;

    fn list_processes(&self) -> Result<Vec<Process>> {
        let entries = procfs::process::all_processes()
            .map_err(|e| MonitorError::Enumeration(e.to_string()))?;

        let mut handles = Vec::new();
        for entry in entries {
            match entry {
                Ok(process) => handles.push(process),
                // Exited between readdir and open
                Err(e) => log::debug!("Skipping /proc entry: {}", e),
            }
        }
        Ok(handles)
    }

    fn read_metrics(&self, handle: &Process) -> ReadResult<ProcessRecord> {
        self.read_process(handle)
    }
}

/// The kernel truncates `comm` to 15 bytes; recover the full name from
/// argv[0] or the executable when it starts with the truncated one.
fn full_name(comm: &str, cmdline: &[String], exe: Option<&Path>) -> String {
    if comm.len() < TASK_COMM_MAX {
        return comm.to_string();
    }
    let argv0 = cmdline
        .first()
        .and_then(|arg| arg.split_whitespace().next())
        .map(Path::new);

    argv0
        .into_iter()
        .chain(exe)
        .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
        .find(|name| name.starts_with(comm))
        .map(str::to_string)
        .unwrap_or_else(|| comm.to_string())
}

fn cpu_percent(ticks_before: u64, ticks_after: u64, interval: Duration) -> f32 {
    let secs = interval.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    let busy = ticks_after.saturating_sub(ticks_before) as f64 / *CLOCK_TICKS as f64;
    (busy / secs * 100.0) as f32
}

fn read_uss(pid: u32) -> ReadResult<u64> {
    let content = match fs::read_to_string(format!("/proc/{}/smaps_rollup", pid)) {
        Ok(content) => content,
        // Kernels before 4.14 have no rollup, sum the full map instead
        Err(e) if e.kind() == io::ErrorKind::NotFound
            && Path::new(&format!("/proc/{}", pid)).exists() =>
        {
            fs::read_to_string(format!("/proc/{}/smaps", pid)).map_err(|e| map_io_error(pid, e))?
        }
        Err(e) => return Err(map_io_error(pid, e)),
    };
    Ok(parse_private_bytes(&content))
}

/// Sum of every `Private_*` line in an smaps listing, in bytes.
fn parse_private_bytes(smaps: &str) -> u64 {
    smaps
        .lines()
        .filter(|line| line.starts_with("Private_"))
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter_map(|kb| kb.parse::<u64>().ok())
        .sum::<u64>()
        * 1024
}

fn affinity_cores(pid: u32) -> ReadResult<usize> {
    let set = sched_getaffinity(Pid::from_raw(pid as i32)).map_err(|e| map_errno(pid, e))?;
    Ok((0..CpuSet::count())
        .filter(|&cpu| set.is_set(cpu).unwrap_or(false))
        .count())
}

fn username(uid: u32) -> String {
    match User::from_uid(Uid::from_raw(uid)) {
        Ok(Some(user)) => user.name,
        _ => uid.to_string(),
    }
}

fn map_proc_error(pid: u32, err: ProcError) -> ProcessError {
    match err {
        ProcError::NotFound(_) => ProcessError::NoSuchProcess(pid),
        ProcError::PermissionDenied(_) => ProcessError::AccessDenied(pid),
        ProcError::Incomplete(_) => ProcessError::UnreadableState(pid),
        ProcError::Io(e, _) => map_io_error(pid, e),
        other => ProcessError::Unexpected {
            pid,
            reason: other.to_string(),
        },
    }
}

fn map_io_error(pid: u32, err: io::Error) -> ProcessError {
    match err.kind() {
        io::ErrorKind::NotFound => ProcessError::NoSuchProcess(pid),
        io::ErrorKind::PermissionDenied => ProcessError::AccessDenied(pid),
        _ if err.raw_os_error() == Some(Errno::ESRCH as i32) => ProcessError::NoSuchProcess(pid),
        _ => ProcessError::Unexpected {
            pid,
            reason: err.to_string(),
        },
    }
}

fn map_errno(pid: u32, errno: Errno) -> ProcessError {
    match errno {
        Errno::ESRCH => ProcessError::NoSuchProcess(pid),
        Errno::EPERM | Errno::EACCES => ProcessError::AccessDenied(pid),
        other => ProcessError::Unexpected {
            pid,
            reason: other.desc().to_string(),
        },
    }
}
