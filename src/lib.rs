pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod pipelines;
pub mod saver;

pub use client::{PipelineClient, RunResponse, RunState};
pub use config::{PipelineConfig, StoreSelection};
pub use error::ImportError;
pub use model::{
    CombinedDocument, Ingredient, Instruction, NutritionalInfo, Quantity, Recipe,
};

/// Import a recipe by driving the recipe pipeline against an article or
/// video URL. Configuration is loaded from `config.toml` and `PANTRY__`
/// environment variables.
pub async fn import_recipe(article_url: &str) -> Result<Recipe, ImportError> {
    let config = PipelineConfig::load()?;
    pipelines::recipe::process(&config, article_url).await
}

/// Import a receipt by driving the receipt pipeline against an image URL or
/// local image file, deriving the store/items document.
pub async fn import_receipt(image: &str) -> Result<CombinedDocument, ImportError> {
    let config = PipelineConfig::load()?;
    pipelines::receipt::process(&config, image).await
}
