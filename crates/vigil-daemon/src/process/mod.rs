mod directory;
mod launcher;
mod reaper;

pub use directory::{ProcessDirectory, ProcessEntry, SystemProcessDirectory};
pub use launcher::{CommandLauncher, LaunchSpec, LaunchedProcess, ServerLauncher};
pub use reaper::{ProcessReaper, ReapReport};

#[cfg(test)]
mod tests;
