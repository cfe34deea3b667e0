use clap::{Parser, Subcommand};
use post_pipeline::config::{self, PipelineConfig};
use post_pipeline::pipeline::{BuildReport, CancelToken, DocumentResult, Pipeline};
use post_pipeline::store::{ContentStore, StoreError};
use post_pipeline::types::SlugIndex;
use post_pipeline::{output, paths, render};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "post-pipeline")]
#[command(about = "Content pipeline for a statically generated blog")]
#[command(long_about = "\
Content pipeline for a statically generated blog

Markdown posts become rendering models: front-matter metadata, the raw body,
and the pixel dimensions of every local image the body references.

Project structure:

  .
  ├── config.toml                  # Pipeline config (optional)
  ├── _posts/                      # One markdown file per post
  │   ├── hello-world.md           # slug \"hello-world\"
  │   └── dynamic-routing.md
  ├── public/                      # Asset root; /assets/x.png → public/assets/x.png
  │   └── assets/
  └── out/                         # Build output
      ├── paths.json
      └── posts/<slug>.json, posts/<slug>/index.html

Images that cannot be sized (remote URLs, missing or corrupt files) are
reported and rendered without dimensions; they never fail a build.

Run 'post-pipeline gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Project root containing config.toml and the content directories
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log debug output (image probes, front-matter mismatches)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every page slug the build would generate
    Paths {
        /// Print the slug index as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build one post and print its rendering model as JSON
    Show {
        /// Post slug (filename without .md)
        slug: String,
    },
    /// Build every post and write models and HTML pages to the output directory
    Build,
    /// Build every post without writing; fails if any post fails
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::WARN.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Paths { json } => {
            let config = config::load_config(&cli.root)?;
            let index = paths::enumerate(&ContentStore::from_config(&cli.root, &config))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&index)?);
            } else {
                output::print_slug_index(&index);
            }
        }
        Command::Show { slug } => {
            let config = config::load_config(&cli.root)?;
            let pipeline = Pipeline::new(&cli.root, &config);
            match pipeline.build(&slug) {
                Ok(model) => println!("{}", serde_json::to_string_pretty(&model)?),
                Err(StoreError::NotFound(slug)) => {
                    eprintln!("page not found: {slug}");
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Build => {
            let config = config::load_config(&cli.root)?;
            let out_dir = config.output_path(&cli.root);
            println!("==> Building {}", config.content_path(&cli.root).display());
            let (index, report) = run_pass(&cli.root, &config)?;
            write_outputs(&out_dir, &index, &report)?;
            output::print_build_report(&report);
            println!("==> Build complete: {}", out_dir.display());
        }
        Command::Check => {
            let config = config::load_config(&cli.root)?;
            println!("==> Checking {}", config.content_path(&cli.root).display());
            let (_, report) = run_pass(&cli.root, &config)?;
            output::print_build_report(&report);
            if report.failed_count() > 0 {
                std::process::exit(1);
            }
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Full build pass with progress printed as documents finish.
fn run_pass(
    root: &Path,
    config: &PipelineConfig,
) -> Result<(SlugIndex, BuildReport), Box<dyn std::error::Error>> {
    init_thread_pool(&config.processing);

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_pipeline_event(&event) {
                println!("{}", line);
            }
        }
    });

    let pipeline = Pipeline::new(root, config).with_events(tx);
    let result = pipeline.run(&CancelToken::new());
    // Dropping the pipeline closes the channel so the printer can finish.
    drop(pipeline);
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;

    Ok(result?)
}

/// Write `paths.json` plus a JSON model and an HTML page per built document.
fn write_outputs(
    out_dir: &Path,
    index: &SlugIndex,
    report: &BuildReport,
) -> Result<(), Box<dyn std::error::Error>> {
    let posts_dir = out_dir.join("posts");
    std::fs::create_dir_all(&posts_dir)?;
    std::fs::write(
        out_dir.join("paths.json"),
        serde_json::to_string_pretty(index)?,
    )?;

    for outcome in &report.outcomes {
        let DocumentResult::Built(built) = &outcome.result else {
            continue;
        };
        let model = &built.model;
        std::fs::write(
            posts_dir.join(format!("{}.json", outcome.slug)),
            serde_json::to_string_pretty(model)?,
        )?;
        let page_dir = posts_dir.join(&outcome.slug);
        std::fs::create_dir_all(&page_dir)?;
        std::fs::write(
            page_dir.join("index.html"),
            render::render_page(model).into_string(),
        )?;
    }
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
