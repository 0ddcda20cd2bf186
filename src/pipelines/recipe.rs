use std::path::PathBuf;

use log::info;
use serde_json::json;

use crate::client::PipelineClient;
use crate::config::PipelineConfig;
use crate::error::ImportError;
use crate::extract::recipe;
use crate::model::Recipe;
use crate::saver;

/// Run the recipe pipeline against an article or video URL and derive the
/// recipe record.
///
/// The run:
/// 1. clears the output directory from any previous run,
/// 2. starts the saved pipeline with the article URL and polls it,
/// 3. persists the raw outputs (or the full response when there are none),
/// 4. assembles the key-item log entries into `recipe.json`.
pub async fn process(config: &PipelineConfig, article_url: &str) -> Result<Recipe, ImportError> {
    let out_dir = PathBuf::from(&config.output_dir);
    saver::reset_dir(&out_dir)?;

    let payload = json!({ "article_url": article_url });
    let client = PipelineClient::new(config.clone())?;
    let response = client.run(&payload).await?;

    super::persist_raw_outputs(&out_dir, &response)?;

    let values = recipe::extract_key_values(&response.log);
    let record = recipe::build_recipe(&values);

    let recipe_path = out_dir.join("recipe.json");
    saver::write_json(&recipe_path, &record)?;
    info!("Saved clean recipe JSON to {}", recipe_path.display());

    Ok(record)
}
