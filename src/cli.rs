use clap::Parser;
use std::path::PathBuf;

/// Split INPUT_FILE up into tracks as specified by CONFIG_FILE.
///
/// Tracks are written to `<artist>/<album>/NN Title.mp3` under the current
/// directory. Set LOGLEVEL=DEBUG to see ffmpeg's output for each track.
#[derive(Parser, Debug)]
#[command(author, version, about, arg_required_else_help = true)]
pub struct Args {
    /// Audio file to split
    #[arg(value_name = "INPUT_FILE", value_parser = existing_file)]
    pub input_file: PathBuf,

    /// YAML track listing with `artist`, `album` and `tracks` (`name`, `offset`)
    #[arg(value_name = "CONFIG_FILE", value_parser = existing_file)]
    pub config_file: PathBuf,
}

fn existing_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.is_file() {
        Ok(path)
    } else if path.exists() {
        Err(format!("'{}' is not a file", s))
    } else {
        Err(format!("'{}' does not exist", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use std::ffi::OsStr;

    #[test]
    fn no_arguments_asks_for_help() {
        let err = Args::try_parse_from(["mp3-split"]).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn requires_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("live.mp3");
        let config = dir.path().join("tracks.yaml");
        std::fs::write(&input, b"").unwrap();
        std::fs::write(&config, b"").unwrap();

        let args = Args::try_parse_from([
            OsStr::new("mp3-split"),
            input.as_os_str(),
            config.as_os_str(),
        ])
        .unwrap();
        assert_eq!(args.input_file, input);
        assert_eq!(args.config_file, config);

        let missing = dir.path().join("missing.yaml");
        let err = Args::try_parse_from([
            OsStr::new("mp3-split"),
            input.as_os_str(),
            missing.as_os_str(),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = Args::try_parse_from([
            OsStr::new("mp3-split"),
            dir.path().as_os_str(),
            config.as_os_str(),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}
