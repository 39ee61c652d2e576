/// Build version from `git describe`, or `dev`.
pub const GIT_VERSION: &str = env!("GIT_VERSION");
