pub const DEFAULT_PRIMARY_URL: &str = "https://localhost/";
pub const DEFAULT_SECONDARY_URL: &str = "https://localhost/health";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_SECONDARY_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_FAST_CHECK_TIMEOUT_SECS: u64 = 3;

pub const DEFAULT_BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_MONITOR_USER_AGENT: &str = "VigilMonitor/Health";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.8";

pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_FAST_CHECK_INTERVAL_SECS: u64 = 2;
pub const DEFAULT_FAST_CHECK_ATTEMPTS: u32 = 3;
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 2;
pub const DEFAULT_REPORT_EVERY_CYCLES: u64 = 30;
pub const DEFAULT_HIGH_MEMORY_PCT: f32 = 90.0;
pub const DEFAULT_HIGH_CPU_PCT: f32 = 95.0;

pub const DEFAULT_MAX_RESTART_ATTEMPTS: u32 = 3;
pub const DEFAULT_RESTART_COOLDOWN_SECS: u64 = 300;
pub const DEFAULT_RESTART_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_STARTUP_POLL_ATTEMPTS: u32 = 90;
pub const DEFAULT_STARTUP_POLL_INTERVAL_SECS: u64 = 1;
pub const DEFAULT_STARTUP_PROGRESS_EVERY: u32 = 15;
pub const DEFAULT_KILL_GRACE_SECS: u64 = 3;
pub const DEFAULT_PORT_RELEASE_SECS: u64 = 5;

pub const DEFAULT_TARGET_PORT: u16 = 443;
pub const DEFAULT_TARGET_SIGNATURE: &str = "app.py";
pub const DEFAULT_SERVER_PROGRAM: &str = "python";
pub const DEFAULT_STRIPPED_ENV: &[&str] = &["BACKUP_MODE", "FORCE_HTTP_PORT"];

pub const DEFAULT_LOG_FILE: &str = "vigil.log";
