use apigen::generator::{generate_file, GenerateOptions};
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    println!("cargo:rerun-if-changed=src/api.rs");
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    generate_file(
        Path::new("src/api.rs"),
        &out_dir.join("api_handlers.rs"),
        &GenerateOptions::default(),
    )?;
    Ok(())
}
