use dsstore_format::DsStore;
use tracing::{debug, error};

use crate::config::LayoutConfig;
use crate::error::LayoutResult;
use crate::map::PositionMap;
use crate::positions::{extract_file_positions, filter_by_extension};
use crate::source::AssetSource;

/// Fetch, parse, and map the configured layout file.
///
/// Layout hints are cosmetic: any fetch or parse failure is logged and
/// yields an empty map.
pub async fn load_position_map<S>(source: &S, config: &LayoutConfig) -> PositionMap
where
    S: AssetSource + ?Sized,
{
    match try_load_position_map(source, config).await {
        Ok(map) => map,
        Err(e) => {
            error!(path = %config.asset_path, error = %e, "error loading .DS_Store position map");
            PositionMap::default()
        }
    }
}

/// Like [`load_position_map`], but surfaces the failure.
pub async fn try_load_position_map<S>(source: &S, config: &LayoutConfig) -> LayoutResult<PositionMap>
where
    S: AssetSource + ?Sized,
{
    let bytes = source.fetch(&config.asset_path).await?;
    let doc = DsStore::from_bytes_with_config(&bytes, config.parser.clone())?;
    let positions = filter_by_extension(extract_file_positions(&doc.records), &config.extension);
    let map = PositionMap::from_positions(positions);
    debug!(
        path = %config.asset_path,
        records = doc.records.len(),
        mapped = map.len(),
        "position map loaded"
    );
    Ok(map)
}
