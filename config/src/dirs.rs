//! Platform-specific application paths.

use std::env;
use std::path::PathBuf;

/// Name of the configuration file looked up by `find_config`.
pub const CONFIG_FILE: &str = "jsoncmd.toml";

/// Find a configuration from standard paths.
///
/// In GNU/Linux:
///     current directory | $XDG_CONFIG_HOME/jsoncmd | /etc/jsoncmd
///
/// In MacOS:
///     current directory | $HOME/Library/Preferences/jsoncmd | /etc/jsoncmd
///
/// In Windows:
///     current directory | C:\Users\Alice\AppData\Roaming\jsoncmd
pub fn find_config() -> Option<PathBuf> {
    config_dirs()
        .into_iter()
        .map(|path| path.join(CONFIG_FILE))
        .find(|path| path.exists())
}

fn config_dirs() -> Vec<PathBuf> {
    let mut config_dirs = Vec::with_capacity(3);

    if let Ok(dir) = env::current_dir() {
        config_dirs.push(dir);
    }

    if let Some(dir) = directories_next::ProjectDirs::from("", "jsoncmd", "jsoncmd") {
        config_dirs.push(dir.config_dir().into());
    }

    if cfg!(unix) {
        config_dirs.push("/etc/jsoncmd".into());
    }

    config_dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_dir_is_searched_first() {
        let dirs = config_dirs();

        assert_eq!(dirs.first(), env::current_dir().ok().as_ref());
        if cfg!(unix) {
            assert_eq!(dirs.last(), Some(&PathBuf::from("/etc/jsoncmd")));
        }
    }
}
