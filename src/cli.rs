use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "wilds-navi",
    version,
    about = "Great sword recommendations from free-text questions and monster weaknesses"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Ingest(IngestArgs),
    Query(QueryArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    #[arg(long, default_value = ".cache/wilds-navi")]
    pub cache_root: PathBuf,

    /// JSON export of the weapon sheet (array of row objects keyed by column header).
    #[arg(long)]
    pub weapons: PathBuf,

    /// JSON export of the monster sheet. Monster detection is disabled without it.
    #[arg(long)]
    pub monsters: Option<PathBuf>,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    #[arg(long, default_value = ".cache/wilds-navi")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub text: String,

    /// Rank currently being played: `low` or `high` (下位 / 上位).
    #[arg(long)]
    pub rank: String,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/wilds-navi")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

impl QueryArgs {
    pub fn resolved_db_path(&self) -> PathBuf {
        resolve_db_path(&self.cache_root, self.db_path.as_ref())
    }
}

impl StatusArgs {
    pub fn resolved_db_path(&self) -> PathBuf {
        resolve_db_path(&self.cache_root, self.db_path.as_ref())
    }

    pub fn resolved_manifest_path(&self) -> PathBuf {
        resolve_manifest_path(&self.cache_root, self.manifest_path.as_ref())
    }
}

impl IngestArgs {
    pub fn resolved_db_path(&self) -> PathBuf {
        resolve_db_path(&self.cache_root, self.db_path.as_ref())
    }

    pub fn resolved_manifest_path(&self) -> PathBuf {
        resolve_manifest_path(&self.cache_root, self.manifest_path.as_ref())
    }
}

fn resolve_db_path(cache_root: &Path, db_path: Option<&PathBuf>) -> PathBuf {
    db_path
        .cloned()
        .unwrap_or_else(|| cache_root.join("wilds_navi.sqlite"))
}

fn resolve_manifest_path(cache_root: &Path, manifest_path: Option<&PathBuf>) -> PathBuf {
    manifest_path
        .cloned()
        .unwrap_or_else(|| cache_root.join("manifests").join("dataset_manifest.json"))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::{Cli, Commands, IngestArgs, StatusArgs};

    fn status_args(extra: &[&str]) -> StatusArgs {
        let args = ["wilds-navi", "status"].iter().chain(extra);
        match Cli::try_parse_from(args).map(|cli| cli.command) {
            Ok(Commands::Status(args)) => args,
            other => panic!("expected status command, got {other:?}"),
        }
    }

    fn ingest_args(extra: &[&str]) -> IngestArgs {
        let args = ["wilds-navi", "ingest", "--weapons", "weapons.json"]
            .iter()
            .chain(extra);
        match Cli::try_parse_from(args).map(|cli| cli.command) {
            Ok(Commands::Ingest(args)) => args,
            other => panic!("expected ingest command, got {other:?}"),
        }
    }

    #[test]
    fn status_defaults_to_cache_root_locations() {
        let args = status_args(&["--cache-root", "/tmp/wn"]);

        assert_eq!(
            args.resolved_manifest_path(),
            PathBuf::from("/tmp/wn/manifests/dataset_manifest.json")
        );
        assert_eq!(
            args.resolved_db_path(),
            PathBuf::from("/tmp/wn/wilds_navi.sqlite")
        );
    }

    #[test]
    fn status_and_ingest_share_manifest_override() {
        let override_args = ["--manifest-path", "/srv/manifest.json"];
        let status = status_args(&override_args);
        let ingest = ingest_args(&override_args);

        assert_eq!(
            status.resolved_manifest_path(),
            PathBuf::from("/srv/manifest.json")
        );
        assert_eq!(
            status.resolved_manifest_path(),
            ingest.resolved_manifest_path()
        );
    }
}
