//! ktxbundle CLI - inspect and edit KTX 1.1 files

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use ktxbundle::{BlobIndex, KtxBundle};

#[derive(Parser)]
#[command(name = "ktxbundle")]
#[command(about = "Inspect and edit KTX 1.1 texture bundles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print descriptor, dimensions, blob sizes and metadata
    Info {
        /// KTX file to read
        file: PathBuf,
    },

    /// Rewrite a file with one metadata key set
    SetMeta {
        /// KTX file to read
        input: PathBuf,
        /// Destination file
        output: PathBuf,
        key: String,
        value: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Info { file } => info(&file),
        Commands::SetMeta {
            input,
            output,
            key,
            value,
        } => set_meta(&input, &output, &key, &value),
    }
}

fn load(path: &Path) -> anyhow::Result<KtxBundle> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    KtxBundle::from_bytes_with_metadata(&bytes)
        .with_context(|| format!("parsing {}", path.display()))
}

fn info(path: &Path) -> anyhow::Result<()> {
    let bundle = load(path)?;
    let info = bundle.info();
    println!("{}", path.display());
    println!("  byte order:             {:?}", bundle.endianness());
    println!("  glType:                 0x{:04X}", info.gl_type);
    println!("  glTypeSize:             {}", info.gl_type_size);
    println!("  glFormat:               0x{:04X}", info.gl_format);
    println!("  glInternalFormat:       0x{:04X}", info.gl_internal_format);
    println!("  glBaseInternalFormat:   0x{:04X}", info.gl_base_internal_format);
    println!(
        "  size:                   {} x {} x {}",
        info.pixel_width, info.pixel_height, info.pixel_depth
    );
    println!(
        "  levels / elements / faces: {} / {} / {}",
        bundle.num_mip_levels(),
        bundle.array_length(),
        bundle.num_cube_faces()
    );

    for mip in 0..bundle.num_mip_levels() {
        let size = bundle
            .blob(BlobIndex::new(mip, 0, 0))
            .map_or(0, <[u8]>::len);
        println!("  level {mip}: {size} bytes per image");
    }

    if !bundle.metadata().is_empty() {
        println!("  metadata:");
        for (key, value) in bundle.metadata().iter() {
            println!("    {key} = {}", String::from_utf8_lossy(value).trim_end_matches('\0'));
        }
    }
    Ok(())
}

fn set_meta(input: &Path, output: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let mut bundle = load(input)?;
    bundle.set_metadata(key, value)?;
    let bytes = bundle.to_bytes()?;
    std::fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    tracing::info!("Wrote {} bytes to {}", bytes.len(), output.display());
    Ok(())
}
