//! Daemon implementation for the gleanerd service.
//!
//! This module runs the pipeline on a fixed daily cadence as a system daemon,
//! supporting both systemd (Linux) and launchd (macOS) environments. It
//! handles:
//! - Daemon process management (start/stop/restart/status)
//! - The daily trigger with its fixed retry policy
//! - System service installation
//! - Logging configuration

use std::{
  fs::{self, File},
  path::PathBuf,
  time::Duration,
};

use daemonize::Daemonize;
use gleaner::{pipeline, Config};
use nix::{
  sys::signal::{self, Signal},
  unistd::Pid,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use tracing_appender::rolling;

use super::*;
use crate::errors::GleanerdErrors;

// Constants for service naming
pub const SERVICE_NAME: &str = "gleanerd.daemon";
pub const SERVICE_FILE: &str = "gleanerd.daemon.plist";

/// One pipeline run per interval.
pub const RUN_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
/// Delay before retrying a failed run.
pub const RETRY_DELAY: Duration = Duration::from_secs(5 * 60);
/// Retries applied to a failed run before giving up until the next interval.
pub const MAX_RETRIES: u32 = 1;

/// Subcommands for daemon management
#[derive(Subcommand)]
pub enum DaemonCommands {
  /// Start the daemon
  Start,
  /// Stop the daemon
  Stop,
  /// Restart the daemon
  Restart,
  /// Install daemon as system service
  Install,
  /// Remove daemon from system services
  Uninstall,
  /// Show daemon status
  Status,
}

/// Configuration for the daemon service
#[derive(Debug, Serialize, Deserialize)]
pub struct DaemonConfig {
  /// Path to store the PID file
  pub pid_file:    PathBuf,
  /// Working directory for the daemon
  pub working_dir: PathBuf,
  /// Directory for log files
  pub log_dir:     PathBuf,
}

impl Default for DaemonConfig {
  fn default() -> Self {
    // Use platform-specific paths
    #[cfg(target_os = "macos")]
    {
      Self {
        pid_file:    PathBuf::from("/Library/Application Support/gleanerd/gleanerd.pid"),
        working_dir: PathBuf::from("/Library/Application Support/gleanerd"),
        log_dir:     PathBuf::from("/Library/Logs/gleanerd"),
      }
    }
    #[cfg(target_os = "linux")]
    {
      Self {
        pid_file:    PathBuf::from("/var/run/gleanerd.pid"),
        working_dir: PathBuf::from("/var/lib/gleanerd"),
        log_dir:     PathBuf::from("/var/log/gleanerd"),
      }
    }
  }
}

/// Manages the daemon process and its lifecycle
pub struct Daemon {
  pub config: DaemonConfig,
}

impl Daemon {
  /// Creates a new daemon instance with default configuration
  pub fn new() -> Self { Self { config: DaemonConfig::default() } }

  /// Starts the daemon process
  pub fn start(&self) -> Result<(), GleanerdErrors> {
    // Ensure directories exist
    fs::create_dir_all(&self.config.working_dir)?;
    fs::create_dir_all(&self.config.log_dir)?;

    // Configure file logging
    let file_appender = rolling::RollingFileAppender::builder()
      .rotation(rolling::Rotation::DAILY)
      .filename_prefix("gleanerd")
      .filename_suffix("log")
      .build(&self.config.log_dir)
      .map_err(|e| GleanerdErrors::Daemon(e.to_string()))?;

    // Initialize daemon logger
    tracing_subscriber::fmt()
      .with_writer(file_appender)
      .with_ansi(false)
      .with_target(true)
      .with_file(true)
      .with_line_number(true)
      .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
      .init();

    info!("Starting gleanerd daemon");
    debug!("Using config: {:?}", self.config);

    let stdout = File::create(self.config.log_dir.join("stdout.log"))?;
    let stderr = File::create(self.config.log_dir.join("stderr.log"))?;

    let daemonize = Daemonize::new()
      .pid_file(&self.config.pid_file)
      .chown_pid_file(true)
      .working_directory(&self.config.working_dir)
      .stdout(stdout)
      .stderr(stderr);

    match daemonize.start() {
      Ok(_) => {
        info!("Daemon started successfully");
        self.run()
      },
      Err(e) => {
        error!("Failed to start daemon: {}", e);
        Err(GleanerdErrors::Daemon(e.to_string()))
      },
    }
  }

  /// Stops the daemon process
  pub fn stop(&self) -> Result<(), GleanerdErrors> {
    if let Ok(pid) = fs::read_to_string(&self.config.pid_file) {
      let pid: i32 = pid.trim().parse().map_err(|e: std::num::ParseIntError| {
        GleanerdErrors::Daemon(format!("pid.trim().parse() gave error: {}", e))
      })?;

      #[cfg(unix)]
      {
        // Send SIGTERM to the process
        if let Err(e) = signal::kill(Pid::from_raw(pid), Signal::SIGTERM) {
          error!("Failed to send SIGTERM to process: {}", e);
          return Err(GleanerdErrors::Daemon(format!("Failed to stop daemon: {}", e)));
        }
      }

      if let Err(e) = fs::remove_file(&self.config.pid_file) {
        error!("Failed to remove PID file: {}", e);
      }

      Ok(())
    } else {
      error!("PID file not found");
      Err(GleanerdErrors::Daemon("Daemon not running".to_string()))
    }
  }

  /// Restarts the daemon process
  pub fn restart(&self) -> Result<(), GleanerdErrors> {
    self.stop()?;
    std::thread::sleep(Duration::from_secs(1));
    self.start()
  }

  /// Shows whether the daemon is currently running
  pub fn status(&self) -> Result<(), GleanerdErrors> {
    match fs::read_to_string(&self.config.pid_file) {
      Ok(pid) => println!("gleanerd is running with PID {}", pid.trim()),
      Err(_) => println!("gleanerd is not running"),
    }
    Ok(())
  }

  /// Installs the daemon as a system service
  pub fn install(&self) -> Result<(), GleanerdErrors> {
    #[cfg(target_os = "linux")]
    {
      self.install_systemd_service()?;
    }
    #[cfg(target_os = "macos")]
    {
      self.install_launchd_service()?;
    }
    Ok(())
  }

  /// Removes the daemon from system services
  pub fn uninstall(&self) -> Result<(), GleanerdErrors> {
    #[cfg(target_os = "linux")]
    {
      fs::remove_file("/etc/systemd/system/gleanerd.service")?;
    }
    #[cfg(target_os = "macos")]
    {
      fs::remove_file(format!("/Library/LaunchDaemons/{}", SERVICE_FILE))?;
    }
    Ok(())
  }

  /// Main daemon loop: one pipeline run per interval, with the fixed retry
  /// policy applied to each run.
  fn run(&self) -> Result<(), GleanerdErrors> {
    info!("Daemon running");

    let config = Config::from_env()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .map_err(|e| GleanerdErrors::Daemon(e.to_string()))?;

    loop {
      runtime.block_on(run_with_retry(&config));
      info!("Next run in {} hours", RUN_INTERVAL.as_secs() / 3600);
      std::thread::sleep(RUN_INTERVAL);
    }
  }

  #[cfg(target_os = "linux")]
  fn install_systemd_service(&self) -> Result<(), GleanerdErrors> {
    let service = format!(
      r#"[Unit]
Description=arXiv Harvesting Pipeline Daemon
After=network.target

[Service]
Type=forking
User=root
Group=root
PIDFile={}
ExecStart={} daemon start
ExecStop={} daemon stop
Restart=on-failure
RestartSec=60

# Security settings
NoNewPrivileges=yes
ProtectSystem=full
ProtectHome=read-only
PrivateTmp=yes
PrivateDevices=yes

# Logging
StandardOutput=append:{}
StandardError=append:{}

[Install]
WantedBy=multi-user.target
"#,
      self.config.pid_file.display(),
      std::env::current_exe()?.display(),
      std::env::current_exe()?.display(),
      self.config.log_dir.join("stdout.log").display(),
      self.config.log_dir.join("stderr.log").display(),
    );

    fs::write("/etc/systemd/system/gleanerd.service", service)?;
    Ok(())
  }

  #[cfg(target_os = "macos")]
  fn install_launchd_service(&self) -> Result<(), GleanerdErrors> {
    let plist = format!(
      r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>Label</key>
  <string>{}</string>
  <key>ProgramArguments</key>
  <array>
      <string>{}</string>
      <string>daemon</string>
      <string>start</string>
  </array>
  <key>RunAtLoad</key>
  <true/>
  <key>KeepAlive</key>
  <dict>
      <key>SuccessfulExit</key>
      <false/>
      <key>Crashed</key>
      <true/>
  </dict>
  <key>ThrottleInterval</key>
  <integer>60</integer>
  <key>WorkingDirectory</key>
  <string>{}</string>
  <key>StandardOutPath</key>
  <string>{}/stdout.log</string>
  <key>StandardErrorPath</key>
  <string>{}/stderr.log</string>
  <key>ProcessType</key>
  <string>Background</string>
</dict>
</plist>"#,
      SERVICE_NAME,
      std::env::current_exe()?.display(),
      self.config.working_dir.display(),
      self.config.log_dir.display(),
      self.config.log_dir.display(),
    );

    fs::write(format!("/Library/LaunchDaemons/{}", SERVICE_FILE), plist)?;
    Ok(())
  }
}

/// Runs the pipeline once, retrying per the fixed policy. A run that still
/// fails after the last retry is logged and dropped; the next interval gets a
/// fresh attempt.
async fn run_with_retry(config: &Config) {
  let mut attempt = 0;
  loop {
    match pipeline::run(config).await {
      Ok(papers) => {
        info!("Pipeline run completed with {} papers", papers.len());
        return;
      },
      Err(e) if attempt < MAX_RETRIES => {
        attempt += 1;
        error!(
          "Pipeline run failed: {e}; retrying in {} minutes (attempt {attempt}/{MAX_RETRIES})",
          RETRY_DELAY.as_secs() / 60
        );
        tokio::time::sleep(RETRY_DELAY).await;
      },
      Err(e) => {
        error!("Pipeline run failed after {MAX_RETRIES} retry: {e}; waiting for next interval");
        return;
      },
    }
  }
}
