// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use annostore::{
    Array, ConversionConfig, Converter, Error, HierarchicalStore, ZipStore, datasets, pad, store,
    text,
};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file overriding the task preset (TOML, YAML or JSON).
    #[clap(long, env = "ANNOSTORE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Directory holding the converted stores, defaults to the user cache
    /// directory.
    #[clap(long, env = "ANNOSTORE_OUTPUT", global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
enum Command {
    /// List the supported datasets and their tasks.
    List,
    /// Convert a raw dataset into a metadata store.  The store is written to
    /// `<output>/<dataset>/<task>.zip`; splits already present in the store
    /// are replaced.
    Convert {
        /// Dataset name, see `list`.
        dataset: String,

        /// Root directory of the raw dataset.
        data_path: PathBuf,

        /// Task to convert, defaults to the dataset's default task.  Append
        /// `_d` to skip the `source` mirror.
        #[clap(long)]
        task: Option<String>,

        /// Keep every n-th frame.
        #[clap(long)]
        skip_step: Option<usize>,

        /// Do not write the `source` mirror.
        #[clap(long)]
        no_source: bool,

        /// Build the splits in parallel.
        #[clap(long)]
        parallel: bool,

        /// Seed for randomly drawn splits.
        #[clap(long)]
        seed: Option<u64>,

        /// Number of randomly drawn train/test pairs.
        #[clap(long)]
        splits: Option<usize>,

        /// Also export each split's tables as Arrow IPC files into this
        /// directory.
        #[cfg(feature = "polars")]
        #[clap(long)]
        arrow_dir: Option<PathBuf>,
    },
    /// Print the groups and arrays of a store.
    Inspect {
        /// Store archive.
        store: PathBuf,

        /// Group or array inside the store.
        #[clap(default_value = "")]
        path: String,

        /// Print the decoded array values.
        #[clap(long, short)]
        values: bool,
    },
}

fn default_output() -> PathBuf {
    directories::ProjectDirs::from("ai", "EdgeFirst", "annostore")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn handle_list() -> Result<(), Error> {
    for dataset in datasets::catalog() {
        println!(
            "[{}] {}: {}",
            dataset.category(),
            dataset.name(),
            dataset.all_tasks().join(", ")
        );
        println!("    {}", dataset.description());
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_convert(
    config_path: Option<PathBuf>,
    output: PathBuf,
    dataset: String,
    data_path: PathBuf,
    task: Option<String>,
    skip_step: Option<usize>,
    no_source: bool,
    parallel: bool,
    seed: Option<u64>,
    splits: Option<usize>,
    arrow_dir: Option<PathBuf>,
) -> Result<(), Error> {
    let dataset = datasets::lookup(&dataset)?;
    let task = task.unwrap_or_else(|| dataset.default_task().to_string());
    let preset = dataset.task_config(&task)?;
    let mut config = ConversionConfig::load(&preset, config_path.as_deref())?;

    if let Some(skip_step) = skip_step {
        config.skip_step = skip_step;
    }
    if no_source {
        config.include_source_group = false;
    }
    if parallel {
        config.parallel = true;
    }
    if let Some(seed) = seed {
        config.splits.seed = seed;
    }
    if let Some(count) = splits {
        config.splits.count = count;
    }

    let path = output
        .join(dataset.name())
        .join(format!("{}.zip", config.output_name));
    let mut zip = ZipStore::open_or_create(&path)?;
    let converter = Converter::new(dataset, config)?;

    let bar = ProgressBar::no_length();
    bar.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {spinner:.yellow} {msg} ({pos} splits)")
            .map_err(|e| Error::InvalidInput(e.to_string()))?,
    );
    bar.set_message(format!("{} {}", dataset.name(), task));

    let summary = converter.run_with(&data_path, &mut zip, |report, tables| {
        bar.inc(1);
        bar.set_message(format!("{} {}", report.name, report.entities));
        #[cfg(feature = "polars")]
        if let Some(dir) = &arrow_dir {
            annostore::arrow::write_split_ipc(dir, tables)?;
        }
        #[cfg(not(feature = "polars"))]
        let _ = (tables, &arrow_dir);
        Ok(())
    });
    bar.finish_and_clear();
    let summary = summary?;

    zip.save()?;

    for split in &summary.splits {
        println!(
            "{}: {} entities, {} arrays, {} source leaves",
            split.name, split.entities, split.arrays, split.source_leaves
        );
    }
    println!("{}", path.display());
    Ok(())
}

fn handle_inspect(path: &Path, entry: &str, values: bool) -> Result<(), Error> {
    let zip = ZipStore::open(path)?;
    if zip.is_group(entry) {
        print_group(&zip, entry, values)
    } else {
        print_array(entry, &zip.read_array(entry)?, values)
    }
}

fn print_group<S: HierarchicalStore>(zip: &S, group: &str, values: bool) -> Result<(), Error> {
    for child in zip.children(group)? {
        let path = store::join(group, &child);
        if zip.is_group(&path) {
            println!("{}/", path);
            print_group(zip, &path, values)?;
        } else {
            print_array(&path, &zip.read_array(&path)?, values)?;
        }
    }
    Ok(())
}

fn print_array(path: &str, array: &Array, values: bool) -> Result<(), Error> {
    let (rows, cols) = array.shape();
    println!("{} {} [{}, {}]", path, array.dtype(), rows, cols);
    if !values {
        return Ok(());
    }

    match array {
        Array::U8(matrix) => {
            for (i, s) in text::decode(matrix)?.iter().enumerate() {
                println!("  {}: {}", i, s);
            }
        }
        Array::I32(matrix) => {
            for (i, list) in pad::unpad(matrix, pad::SENTINEL).iter().enumerate() {
                println!("  {}: {:?}", i, list);
            }
        }
        Array::F64(matrix) => {
            for (i, row) in matrix.iter_rows().enumerate() {
                println!("  {}: {:?}", i, row);
            }
        }
    }
    Ok(())
}

#[cfg(feature = "profiling")]
fn init_tracing() -> Result<(), Error> {
    use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::InvalidInput(e.to_string()))
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    #[cfg(feature = "profiling")]
    init_tracing()?;

    let args = Args::parse();
    let output = args.output.unwrap_or_else(default_output);

    match args.cmd {
        Command::List => handle_list(),
        Command::Convert {
            dataset,
            data_path,
            task,
            skip_step,
            no_source,
            parallel,
            seed,
            splits,
            #[cfg(feature = "polars")]
            arrow_dir,
        } => {
            #[cfg(not(feature = "polars"))]
            let arrow_dir = None;
            handle_convert(
                args.config,
                output,
                dataset,
                data_path,
                task,
                skip_step,
                no_source,
                parallel,
                seed,
                splits,
                arrow_dir,
            )
        }
        Command::Inspect {
            store,
            path,
            values,
        } => handle_inspect(&store, &path, values),
    }
}
