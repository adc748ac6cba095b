use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use dsstore_format::{DsStore, ParseResult};
use dsstore_layout::{
    calculate_bounds, extract_file_positions, filter_by_extension, load_position_map,
    AssetSource, FileAssetSource, HttpAssetSource, LayoutConfig,
};
use dsstore_types::{field_name, format_value, FourCc};
use serde_json::json;
use tracing::debug;
use walkdir::WalkDir;

use crate::cli::*;

const DS_STORE_NAME: &str = ".DS_Store";

/// Dispatch a parsed command line.
pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Records(args) => cmd_records(args, format),
        Command::Meta(args) => cmd_meta(args, format),
        Command::Positions(args) => cmd_positions(args, format),
        Command::Map(args) => cmd_map(args, format),
        Command::Scan(args) => cmd_scan(args, format),
    }
}

fn open(path: &Path) -> anyhow::Result<DsStore> {
    DsStore::open(path).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_records(args: RecordsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let doc = open(&args.path)?;
    let only: Option<FourCc> = args.field.as_deref().map(str::parse).transpose()?;
    let records: Vec<_> = doc
        .records
        .iter()
        .filter(|r| only.map_or(true, |code| r.contains(&code)))
        .collect();

    if let OutputFormat::Json = format {
        return print_json(&records);
    }
    for record in records {
        println!("{}", record.name.bold());
        for (code, value) in record.iter() {
            if only.is_some_and(|c| c != *code) {
                continue;
            }
            let code = code.to_string();
            println!(
                "  {} {:<28} {}",
                code.yellow(),
                field_name(&code).dimmed(),
                format_value(&code, value)
            );
        }
    }
    Ok(())
}

fn cmd_meta(args: MetaArgs, format: OutputFormat) -> anyhow::Result<()> {
    let doc = open(&args.path)?;
    let meta = doc.metadata();
    let root_key = doc
        .allocator
        .directory
        .entries
        .iter()
        .find(|e| e.block_id == doc.allocator.master_id)
        .map(|e| e.key.as_str())
        .unwrap_or_default();
    let extra: Vec<&str> = doc.allocator.directory.extra_keys(root_key).collect();

    if let OutputFormat::Json = format {
        return print_json(&json!({
            "metadata": meta,
            "walk": doc.stats,
            "blocks": doc.allocator.block_count(),
            "directory": doc.allocator.directory.entries,
            "free_blocks": doc.allocator.free_list.total(),
            "records": doc.records.len(),
        }));
    }
    let consistent = if doc.header.is_consistent() { "consistent".green() } else { "inconsistent".red() };
    println!("{} {}", "Bud1".cyan().bold(), args.path.display());
    println!("  Alignment: {:#010x}", meta.alignment);
    println!("  Allocator: offset {:#x}, length {:#x} ({})", meta.allocator_offset, meta.allocator_length, consistent);
    println!("  Blocks: {}, free: {}", doc.allocator.block_count(), doc.allocator.free_list.total());
    println!("  Root key: {} -> block {}", root_key.yellow(), doc.allocator.master_id);
    if !extra.is_empty() {
        println!("  Ignored keys: {}", extra.join(", ").dimmed());
    }
    println!("  Tree: root {}, height {}, {} records, {} nodes", meta.root_id, meta.tree_height, meta.record_count, meta.node_count);
    println!("  Walked: {} nodes, {} entries, max depth {}", doc.stats.nodes, doc.stats.entries, doc.stats.max_depth);
    println!("  Files: {}", doc.records.len().to_string().bold());
    Ok(())
}

fn cmd_positions(args: PositionsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let doc = open(&args.path)?;
    let mut positions = extract_file_positions(&doc.records);
    if !args.all {
        positions = filter_by_extension(positions, &args.extension);
    }
    let bounds = calculate_bounds(&positions);

    if let OutputFormat::Json = format {
        return print_json(&json!({ "positions": positions, "bounds": bounds }));
    }
    for p in &positions {
        println!("  {:>6} {:>6}  {}", p.x, p.y, p.filename);
    }
    println!(
        "{} positions, bounds x {}..{} y {}..{} ({}x{})",
        positions.len().to_string().bold(),
        bounds.min_x,
        bounds.max_x,
        bounds.min_y,
        bounds.max_y,
        bounds.width,
        bounds.height
    );
    Ok(())
}

fn cmd_map(args: MapArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => LayoutConfig::load(path).with_context(|| format!("failed to load {}", path.display()))?,
        None => LayoutConfig::default(),
    };
    let runtime = tokio::runtime::Runtime::new()?;
    let source: Box<dyn AssetSource> = match &args.url {
        Some(url) => Box::new(HttpAssetSource::new(url.as_str())),
        None => Box::new(FileAssetSource::new(&args.root)),
    };
    let map = runtime.block_on(load_position_map(source.as_ref(), &config));

    if let OutputFormat::Json = format {
        return print_json(&map);
    }
    if map.is_empty() {
        println!("{} No positions loaded from {}", "!".yellow().bold(), config.asset_path);
        return Ok(());
    }
    for (name, point) in map.iter() {
        println!("  {} -> ({}, {})", name.bold(), point.x, point.y);
    }
    println!("{} {} positions", "✓".green().bold(), map.len());
    Ok(())
}

/// Parse every `.DS_Store` under `dir`, in path order.
fn scan_dir(dir: &Path) -> Vec<(PathBuf, ParseResult<DsStore>)> {
    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && e.file_name() == DS_STORE_NAME)
        .map(|e| e.into_path())
        .collect();
    found.sort();
    debug!(dir = %dir.display(), files = found.len(), "scan");
    found
        .into_iter()
        .map(|path| {
            let result = DsStore::open(&path);
            (path, result)
        })
        .collect()
}

fn cmd_scan(args: ScanArgs, format: OutputFormat) -> anyhow::Result<()> {
    let results = scan_dir(&args.dir);

    if let OutputFormat::Json = format {
        let rows: Vec<_> = results
            .iter()
            .map(|(path, result)| match result {
                Ok(doc) => json!({
                    "path": path.display().to_string(),
                    "records": doc.records.len(),
                    "positions": extract_file_positions(&doc.records).len(),
                }),
                Err(e) => json!({ "path": path.display().to_string(), "error": e.to_string() }),
            })
            .collect();
        return print_json(&rows);
    }
    let mut failed = 0;
    for (path, result) in &results {
        match result {
            Ok(doc) => println!(
                "  {} {} ({} records, {} positions)",
                "✓".green(),
                path.display(),
                doc.records.len(),
                extract_file_positions(&doc.records).len()
            ),
            Err(e) => {
                failed += 1;
                println!("  {} {}: {}", "✗".red(), path.display(), e.to_string().red());
            }
        }
    }
    println!("Scanned {} files, {} failed", results.len().to_string().bold(), failed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsstore_format::fixture::{FixtureBuilder, FixtureEntry};
    use dsstore_format::ParsingError;

    #[test]
    fn scan_finds_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = FixtureBuilder::leaf(vec![FixtureEntry::icon_location("a.glb", 1, 2)]).build();
        let bad = FixtureBuilder::leaf(vec![FixtureEntry::icon_location("a.glb", 1, 2)])
            .magic(0xdead_beef)
            .build();

        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
        std::fs::write(dir.path().join(".DS_Store"), &good).unwrap();
        std::fs::write(dir.path().join("a/b/.DS_Store"), &bad).unwrap();
        std::fs::write(dir.path().join("a/DS_Store"), &good).unwrap();

        let results = scan_dir(dir.path());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, dir.path().join(".DS_Store"));
        assert_eq!(results[0].1.as_ref().unwrap().records.len(), 1);
        assert!(matches!(results[1].1, Err(ParsingError::BadMagic { .. })));
    }

    #[test]
    fn scan_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_dir(dir.path()).is_empty());
    }
}
