use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dsstore", about = "Inspect macOS .DS_Store files", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every record and its fields
    Records(RecordsArgs),
    /// Show header, allocator, and tree metadata
    Meta(MetaArgs),
    /// Show icon positions and their bounding box
    Positions(PositionsArgs),
    /// Load the filename to position map from an asset root
    Map(MapArgs),
    /// Find and parse every .DS_Store under a directory
    Scan(ScanArgs),
}

#[derive(Args)]
pub struct RecordsArgs {
    pub path: PathBuf,
    /// Only show this field code, e.g. Iloc
    #[arg(long)]
    pub field: Option<String>,
}

#[derive(Args)]
pub struct MetaArgs {
    pub path: PathBuf,
}

#[derive(Args)]
pub struct PositionsArgs {
    pub path: PathBuf,
    /// Include every positioned file, not only the configured extension
    #[arg(long)]
    pub all: bool,
    #[arg(long, default_value = ".glb")]
    pub extension: String,
}

#[derive(Args)]
pub struct MapArgs {
    #[arg(long, default_value = ".", conflicts_with = "url")]
    pub root: PathBuf,
    /// Fetch over HTTP from this base URL instead of reading `--root`
    #[arg(long)]
    pub url: Option<String>,
    /// TOML layout config (asset_path, extension, [parser])
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ScanArgs {
    pub dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_records() {
        let cli = Cli::try_parse_from(["dsstore", "records", "x/.DS_Store"]).unwrap();
        if let Command::Records(args) = cli.command {
            assert_eq!(args.path, PathBuf::from("x/.DS_Store"));
            assert!(args.field.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_records_field() {
        let cli = Cli::try_parse_from(["dsstore", "records", "f", "--field", "Iloc"]).unwrap();
        if let Command::Records(args) = cli.command {
            assert_eq!(args.field, Some("Iloc".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_meta() {
        let cli = Cli::try_parse_from(["dsstore", "meta", "f"]).unwrap();
        assert!(matches!(cli.command, Command::Meta(_)));
    }

    #[test]
    fn parse_positions_defaults() {
        let cli = Cli::try_parse_from(["dsstore", "positions", "f"]).unwrap();
        if let Command::Positions(args) = cli.command {
            assert!(!args.all);
            assert_eq!(args.extension, ".glb");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_positions_all() {
        let cli = Cli::try_parse_from(["dsstore", "positions", "f", "--all"]).unwrap();
        if let Command::Positions(args) = cli.command {
            assert!(args.all);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_map() {
        let cli = Cli::try_parse_from(["dsstore", "map", "--root", "public", "--config", "l.toml"]).unwrap();
        if let Command::Map(args) = cli.command {
            assert_eq!(args.root, PathBuf::from("public"));
            assert_eq!(args.config, Some(PathBuf::from("l.toml")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_map_default_root() {
        let cli = Cli::try_parse_from(["dsstore", "map"]).unwrap();
        if let Command::Map(args) = cli.command {
            assert_eq!(args.root, PathBuf::from("."));
            assert!(args.config.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_map_url() {
        let cli = Cli::try_parse_from(["dsstore", "map", "--url", "http://localhost:3000"]).unwrap();
        if let Command::Map(args) = cli.command {
            assert_eq!(args.url, Some("http://localhost:3000".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn map_root_and_url_conflict() {
        assert!(Cli::try_parse_from(["dsstore", "map", "--root", "p", "--url", "http://x"]).is_err());
    }

    #[test]
    fn parse_scan() {
        let cli = Cli::try_parse_from(["dsstore", "scan", "/tmp"]).unwrap();
        assert!(matches!(cli.command, Command::Scan(_)));
    }

    #[test]
    fn missing_path_is_error() {
        assert!(Cli::try_parse_from(["dsstore", "records"]).is_err());
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["dsstore", "--verbose", "meta", "f"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["dsstore", "scan", ".", "--format", "json"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
