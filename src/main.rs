use std::env;

fn usage() -> &'static str {
    "Usage: pantry-import <recipe|receipt> <url-or-file>"
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("recipe") => {
            let url = args.get(2).ok_or(usage())?;
            let recipe = pantry_import::import_recipe(url).await?;
            println!("{}", serde_json::to_string_pretty(&recipe)?);
        }
        Some("receipt") => {
            let image = args.get(2).ok_or(usage())?;
            let combined = pantry_import::import_receipt(image).await?;
            println!("{}", serde_json::to_string_pretty(&combined)?);
        }
        _ => return Err(usage().into()),
    }

    Ok(())
}
