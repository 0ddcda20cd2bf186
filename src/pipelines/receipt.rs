use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::info;
use serde_json::{json, Value};

use crate::client::PipelineClient;
use crate::config::PipelineConfig;
use crate::error::ImportError;
use crate::extract::store_items;
use crate::model::CombinedDocument;
use crate::saver;

/// Run the receipt pipeline against an image and derive the store/items
/// document.
///
/// The run:
/// 1. clears both output directories from any previous run,
/// 2. starts the saved pipeline with the receipt image and polls it,
/// 3. persists the raw outputs (or the full response when there are none),
/// 4. mines created-JSON log entries into `item_<i>.json` and `combined.json`.
pub async fn process(
    config: &PipelineConfig,
    image: &str,
) -> Result<CombinedDocument, ImportError> {
    let out_dir = PathBuf::from(&config.output_dir);
    let items_dir = PathBuf::from(&config.items_dir);
    saver::reset_dir(&out_dir)?;
    saver::reset_dir(&items_dir)?;

    let payload = receipt_payload(image).await?;
    let client = PipelineClient::new(config.clone())?;
    let response = client.run(&payload).await?;

    super::persist_raw_outputs(&out_dir, &response)?;

    let objects = store_items::collect_objects(&response.log);
    saver::save_objects(&items_dir, &objects)?;

    let combined = store_items::combine(objects, config.store_selection);
    saver::write_json(&items_dir.join("combined.json"), &combined)?;
    info!("Saved combined.json (store + {} items)", combined.items.len());

    Ok(combined)
}

/// Payload for the receipt pipeline. A readable local file is submitted as
/// base64-encoded bytes; anything else is passed through as a URL.
async fn receipt_payload(image: &str) -> Result<Value, ImportError> {
    if Path::new(image).is_file() {
        let bytes = tokio::fs::read(image).await?;
        Ok(json!({ "receipt_image": STANDARD.encode(bytes) }))
    } else {
        Ok(json!({ "receipt_image": image }))
    }
}
