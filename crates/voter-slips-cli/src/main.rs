mod logger;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use voter_slips::extract::extract_from_pdf;
use voter_slips::source::load_raster_document;
use voter_slips::{
    ComposeOptions, Extraction, ExtractionOptions, ExtractionSetup, ExtractionStats, LayoutMode,
    Rect, RowCount, SetupBundle, TemplateImage, UnitRectSet, compose, extract_slips,
    generate_grid, ignore_progress, save_pdf,
};

#[derive(Parser)]
#[command(name = "vslip", about = "Voter slip extraction and composition", version)]
struct Cli {
    /// Log skipped slots and other details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the unit rectangles with a generated slot grid
    Grid {
        /// Setup bundle to update (created if missing)
        #[arg(short, long, default_value = SetupBundle::FILE_NAME)]
        setup: PathBuf,

        /// Slot rows per page (5 or 6)
        #[arg(long, default_value = "5")]
        rows: usize,
    },

    /// Set where slips land on the letter template
    Map {
        /// Setup bundle to update (created if missing)
        #[arg(short, long, default_value = SetupBundle::FILE_NAME)]
        setup: PathBuf,

        /// Letter template image (PNG or JPEG)
        #[arg(short, long)]
        template: PathBuf,

        #[arg(long)]
        x: f64,

        #[arg(long)]
        y: f64,

        #[arg(long)]
        width: f64,

        #[arg(long)]
        height: f64,

        /// Coordinates are in the downscaled preview rather than template pixels
        #[arg(long)]
        preview: bool,
    },

    /// Print the current setup
    Show {
        #[arg(short, long, default_value = SetupBundle::FILE_NAME)]
        setup: PathBuf,
    },

    /// Extract occupied slots as JPEG files
    Extract {
        /// Source PDF, or page images in order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        #[arg(short, long, default_value = SetupBundle::FILE_NAME)]
        setup: PathBuf,

        /// Directory for the cropped slips
        #[arg(short, long)]
        out_dir: PathBuf,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Extract slips and compose them onto the letter template
    Generate {
        /// Source PDF, or page images in order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Letter template image (PNG or JPEG)
        #[arg(short, long)]
        template: PathBuf,

        #[arg(short, long, default_value = SetupBundle::FILE_NAME)]
        setup: PathBuf,

        /// Output layout
        #[arg(long, default_value = "single", value_enum)]
        layout: LayoutArg,

        /// Output PDF file (default: Voter_Slips_<millis>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only extract and print statistics
        #[arg(long)]
        stats_only: bool,

        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Render scale used for cropping
    #[arg(long, default_value = "4.0")]
    scale: f64,

    /// Pixels per page unit of image inputs
    #[arg(long, default_value = "1.0")]
    image_scale: f64,

    /// First page holding slips (1-based)
    #[arg(long, default_value = "3")]
    first_page: usize,
}

impl SourceArgs {
    fn options(&self) -> ExtractionOptions {
        ExtractionOptions {
            scale: self.scale,
            first_page: self.first_page,
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Single,
    Grid4,
}

impl From<LayoutArg> for LayoutMode {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Single => Self::Single,
            LayoutArg::Grid4 => Self::Grid4,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::StderrLogger::new(cli.verbose)
        .init()
        .context("Failed to install logger")?;

    match cli.command {
        Commands::Grid { setup, rows } => {
            let rows = RowCount::try_from(rows)?;
            let mut bundle = load_bundle(&setup).await?;
            let replaced = apply_grid(&mut bundle, rows);
            if replaced > 0 {
                log::warn!("Replacing {} existing rectangles", replaced);
            }

            println!(
                "Generated {} rectangles ({} rows)",
                bundle.voter_or_default().unit_rects.len(),
                rows.rows()
            );
            save_bundle(&bundle, &setup).await?;
        }

        Commands::Map {
            setup,
            template,
            x,
            y,
            width,
            height,
            preview,
        } => {
            let template = TemplateImage::load(&template)
                .await
                .with_context(|| format!("Failed to load template {}", template.display()))?;

            let selection = Rect::new(x, y, width, height);
            let mapping = if preview {
                template.mapping_from_preview(&selection)
            } else {
                selection
            };
            if mapping.width <= 0.0 || mapping.height <= 0.0 {
                bail!("Mapping rectangle must have a positive size");
            }
            if !mapping.fits_within(template.size()) {
                log::warn!(
                    "Mapping extends past the {}x{} template",
                    template.width(),
                    template.height()
                );
            }

            let mut bundle = load_bundle(&setup).await?;
            bundle.letter = Some(mapping);
            save_bundle(&bundle, &setup).await?;
            print_mapping(&mapping);
        }

        Commands::Show { setup } => {
            let bundle = load_bundle(&setup).await?;
            let voter = bundle.voter_or_default();

            println!("Extraction setup:");
            println!("  Zoom: {}%", voter.zoom().percent());
            println!("  Rectangles: {}", voter.unit_rects.len());
            for (index, rect) in voter.unit_rects.iter().enumerate() {
                println!(
                    "    #{:<2} x={:.1} y={:.1} w={:.1} h={:.1}",
                    UnitRectSet::label(index),
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height
                );
            }
            print_mapping(&bundle.letter_or_default());
        }

        Commands::Extract {
            input,
            setup,
            out_dir,
            source,
        } => {
            let bundle = load_bundle(&setup).await?;
            let extraction = run_extraction(
                &input,
                source.image_scale,
                bundle.voter_or_default().unit_rects,
                source.options(),
            )
            .await?;
            print_stats(&extraction.stats);

            tokio::fs::create_dir_all(&out_dir)
                .await
                .with_context(|| format!("Failed to create {}", out_dir.display()))?;
            for record in &extraction.records {
                let path = out_dir.join(format!("{}.jpg", record.id));
                tokio::fs::write(&path, record.jpeg_bytes()?)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            println!(
                "Extracted {} slips → {}",
                extraction.records.len(),
                out_dir.display()
            );
        }

        Commands::Generate {
            input,
            template,
            setup,
            layout,
            output,
            stats_only,
            source,
        } => {
            let bundle = load_bundle(&setup).await?;
            let template = TemplateImage::load(&template)
                .await
                .with_context(|| format!("Failed to load template {}", template.display()))?;

            let extraction = run_extraction(
                &input,
                source.image_scale,
                bundle.voter_or_default().unit_rects,
                source.options(),
            )
            .await?;
            print_stats(&extraction.stats);

            if stats_only {
                return Ok(());
            }
            if extraction.records.is_empty() {
                bail!("No slips found; nothing to generate");
            }

            let layout = LayoutMode::from(layout);
            let count = extraction.records.len();
            let doc = compose(
                extraction.records,
                template,
                bundle.letter_or_default(),
                layout,
                ComposeOptions::default(),
                ignore_progress,
            )
            .await
            .context("Failed to compose output")?;
            let pages = doc.get_pages().len();

            let output = output.unwrap_or_else(default_output_path);
            save_pdf(doc, &output)
                .await
                .with_context(|| format!("Failed to save {}", output.display()))?;
            println!(
                "Generated {} slips on {} pages → {}",
                count,
                pages,
                output.display()
            );
        }
    }

    Ok(())
}

/// Replace the saved rectangles with a generated grid, returning how many
/// saved rectangles were overwritten. Built-in defaults do not count.
fn apply_grid(bundle: &mut SetupBundle, rows: RowCount) -> usize {
    let grid = generate_grid(rows).as_slice().to_vec();
    match bundle.voter.as_mut() {
        Some(voter) => voter.unit_rects.replace(grid).len(),
        None => {
            bundle.voter = Some(ExtractionSetup {
                unit_rects: grid.into(),
                ..Default::default()
            });
            0
        }
    }
}

/// Extract from a single PDF through pdfium, or from page images
async fn run_extraction(
    input: &[PathBuf],
    image_scale: f64,
    unit_rects: UnitRectSet,
    options: ExtractionOptions,
) -> Result<Extraction> {
    if input.len() == 1 && is_pdf(&input[0]) {
        let path = &input[0];
        return extract_from_pdf(path, unit_rects, options, ignore_progress)
            .await
            .with_context(|| format!("Failed to extract slips from {}", path.display()));
    }

    let document = load_raster_document(input, image_scale)
        .await
        .context("Failed to load page images")?;
    let extraction = tokio::task::spawn_blocking(move || {
        extract_slips(&document, &unit_rects, &options, ignore_progress)
    })
    .await?
    .context("Failed to extract slips")?;
    Ok(extraction)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Missing bundle files fall back to the built-in setup
async fn load_bundle(path: &Path) -> Result<SetupBundle> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        log::warn!("{} not found, using the built-in setup", path.display());
        return Ok(SetupBundle::default());
    }
    SetupBundle::load(path)
        .await
        .with_context(|| format!("Failed to load setup {}", path.display()))
}

async fn save_bundle(bundle: &SetupBundle, path: &Path) -> Result<()> {
    bundle
        .save(path)
        .await
        .with_context(|| format!("Failed to save setup {}", path.display()))?;
    println!("Saved setup → {}", path.display());
    Ok(())
}

fn default_output_path() -> PathBuf {
    PathBuf::from(format!(
        "Voter_Slips_{}.pdf",
        chrono::Utc::now().timestamp_millis()
    ))
}

fn print_mapping(mapping: &Rect) {
    println!(
        "Letter mapping: x={:.1} y={:.1} w={:.1} h={:.1}",
        mapping.x, mapping.y, mapping.width, mapping.height
    );
}

fn print_stats(stats: &ExtractionStats) {
    println!("Extraction Statistics:");
    println!("  Pages processed: {}", stats.pages_processed);
    println!("  Candidates: {}", stats.candidates);
    println!("  Outside page: {}", stats.out_of_bounds);
    println!("  Empty: {}", stats.empty);
    println!("  Slips found: {}", stats.occupied);
}
