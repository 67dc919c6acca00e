use clap::Parser;
use shulker::{DecodeOptions, LayerAddressing, StructureModel, StructureReader};
use shulker_logger::{log, set_min_severity, LogSeverity};
use std::path::PathBuf;
use std::process::ExitCode;

/// Print the voxel contents of a structure file.
#[derive(Debug, Parser)]
#[command(name = "shulker", version)]
struct Args {
    /// Structure file (.mcstructure, or gzip-compressed .nbt)
    file: PathBuf,

    /// Treat each layer as a whole-volume index array
    #[arg(long)]
    whole_volume: bool,

    /// Keep voxels that reference the empty block
    #[arg(long)]
    keep_empty: bool,

    /// Block identifier treated as empty space
    #[arg(long, default_value = shulker::structure::AIR_BLOCK)]
    empty_block: String,

    /// Print the whole model as JSON
    #[arg(long)]
    json: bool,

    /// Minimum log severity (debug, info, warning, error, fatal)
    #[arg(long)]
    log_level: Option<LogSeverity>,
}

fn print_summary(model: &StructureModel) {
    println!(
        "size {}x{}x{}, origin {:?}",
        model.size.x, model.size.y, model.size.z, model.origin
    );
    println!(
        "{} palette entries, {} voxels",
        model.palette.len(),
        model.voxel_count()
    );

    let mut materials: Vec<_> = model.materials.iter().collect();
    materials.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (name, count) in materials.into_iter().take(10) {
        println!("{:>8} {}", count, name);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if let Some(level) = args.log_level {
        set_min_severity(level);
    }

    let options = DecodeOptions {
        addressing: if args.whole_volume {
            LayerAddressing::WholeVolume
        } else {
            LayerAddressing::PerLayerY
        },
        empty_block: args.empty_block,
        keep_empty_voxels: args.keep_empty,
    };
    let reader = StructureReader::new().with_options(options);

    let model = match reader.read_file_async(&args.file).await {
        Ok(model) => model,
        Err(e) => {
            log(
                format!("Failed to read {}: {}", args.file.display(), e),
                LogSeverity::Error,
            );
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&model) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log(format!("Failed to encode model: {}", e), LogSeverity::Error);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_summary(&model);
    }
    ExitCode::SUCCESS
}
