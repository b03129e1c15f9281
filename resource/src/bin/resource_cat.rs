//! Print a bundled resource to stdout, reading it through the same buffered
//! stream the engine uses on device.
//!
//! ```text
//! resource-cat --root ./assets shaders/basic.wgsl
//! resource-cat --root ./assets --offset 128 --length 64 meshes/cube.bin
//! ```

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use redlilium_resource::{
    FileSystemAssetManager, ReaderConfig, ResourceError, ResourceLoader, DEFAULT_BUFFER_CAPACITY,
};
use thiserror::Error;

/// Stream a resource from an asset directory to stdout.
#[derive(Parser, Debug)]
#[command(name = "resource-cat", version)]
struct Args {
    /// Directory that plays the role of the platform asset store.
    #[arg(long, default_value = "assets")]
    root: PathBuf,

    /// Resource name, relative to the asset root.
    name: String,

    /// Start reading at this byte offset. Negative values count from the end.
    #[arg(long, allow_hyphen_values = true)]
    offset: Option<i64>,

    /// Stop after this many bytes.
    #[arg(long)]
    length: Option<u64>,

    /// Internal buffer size in bytes.
    #[arg(long, default_value_t = DEFAULT_BUFFER_CAPACITY)]
    buffer_size: usize,
}

#[derive(Error, Debug)]
enum CatError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("failed to write to stdout: {0}")]
    Output(#[source] io::Error),
}

/// Split a copy failure into the side that caused it.
///
/// Every error the resource stream raises wraps a [`ResourceError`];
/// anything else came from stdout.
fn classify_copy_error(err: io::Error, name: &str) -> CatError {
    let from_resource = err
        .get_ref()
        .is_some_and(|inner| inner.is::<ResourceError>());
    if from_resource {
        CatError::Resource(ResourceError::from_io(err, name))
    } else {
        CatError::Output(err)
    }
}

fn run(args: &Args) -> Result<u64, CatError> {
    let loader = ResourceLoader::new(FileSystemAssetManager::new(&args.root)).with_config(
        ReaderConfig {
            buffer_capacity: args.buffer_size,
            ..ReaderConfig::default()
        },
    );
    let mut stream = loader.open_resource(&args.name)?;
    let name = stream.name().to_owned();

    if let Some(offset) = args.offset {
        let target = if offset < 0 {
            SeekFrom::End(offset)
        } else {
            SeekFrom::Start(offset as u64)
        };
        stream
            .seek(target)
            .map_err(|err| ResourceError::from_io(err, &name))?;
    }

    let mut stdout = io::stdout().lock();
    let copied = match args.length {
        Some(length) => io::copy(&mut (&mut stream).take(length), &mut stdout),
        None => io::copy(&mut stream, &mut stdout),
    }
    .map_err(|err| classify_copy_error(err, &name))?;
    stdout.flush().map_err(CatError::Output)?;
    Ok(copied)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(copied) => {
            log::info!("Copied {copied} bytes from '{}'", args.name);
            ExitCode::SUCCESS
        }
        // The reader went away; nothing left to tell it.
        Err(CatError::Output(err)) if err.kind() == io::ErrorKind::BrokenPipe => {
            log::debug!("Stdout closed early: {err}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            eprintln!("resource-cat: {err}");
            ExitCode::FAILURE
        }
    }
}
