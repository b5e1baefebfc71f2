// Command-line front end: pairwise donor EMD, permutation p-values and
// per-component distance matrices.
use clap::{Args, Parser, Subcommand};
use donor_emd::{emd_pval, io, pairwise_emd, DonorMatrix, EmdConfig, EmdTable};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to config TOML (flags override its values)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pairwise EMD with permutation-test p-values
    Pvalues(RunArgs),
    /// Pairwise EMD under the true labels only
    Emd(RunArgs),
    /// Pivot a result table into a symmetric donor matrix
    Matrix(MatrixArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Observation CSV: label column plus <basis>_<k> coordinate columns
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Donor label column
    #[arg(long)]
    label_column: Option<String>,

    /// Embedding name
    #[arg(long)]
    basis: Option<String>,

    /// Number of components to analyse
    #[arg(long)]
    n_comp: Option<usize>,

    /// Number of permutation draws
    #[arg(long)]
    n_permutations: Option<usize>,

    /// Worker pool width (0 = one per core)
    #[arg(long)]
    workers: Option<usize>,

    /// Output file (stdout when omitted)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Write JSON instead of CSV
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct MatrixArgs {
    /// Result table CSV
    #[arg(value_name = "TABLE")]
    table: PathBuf,

    /// Component to pivot
    #[arg(long)]
    component: usize,

    /// Zero distances whose p-value exceeds this cutoff
    #[arg(long)]
    pval_cut: Option<f64>,

    /// Output file (stdout when omitted)
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl RunArgs {
    fn apply(&self, mut config: EmdConfig) -> EmdConfig {
        if let Some(column) = &self.label_column {
            config.obs_donor_id = column.clone();
        }
        if let Some(basis) = &self.basis {
            config.basis = basis.clone();
        }
        if let Some(n_comp) = self.n_comp {
            config.n_comp = n_comp;
        }
        if let Some(n) = self.n_permutations {
            config.n_permutations = n;
        }
        if let Some(workers) = self.workers {
            config.n_workers = workers;
        }
        config
    }
}

fn open_output(path: &Option<PathBuf>) -> std::io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    })
}

fn load_config(path: &Option<PathBuf>) -> donor_emd::Result<EmdConfig> {
    match path {
        Some(path) => EmdConfig::load(path),
        None => Ok(EmdConfig::default()),
    }
}

fn run_table(args: &RunArgs, config: EmdConfig, with_pvalues: bool) -> donor_emd::Result<EmdTable> {
    let config = args.apply(config);
    let data = io::read_observations_path(&args.input, &config.obs_donor_id, &config.basis)?;
    if with_pvalues {
        emd_pval(&data, &config)
    } else {
        pairwise_emd(&data, &config)
    }
}

fn write_table<W: Write>(table: &EmdTable, mut out: W, json: bool) -> donor_emd::Result<()> {
    if json {
        writeln!(out, "{}", table.to_json()?)?;
        out.flush()?;
        Ok(())
    } else {
        table.write_csv(out)
    }
}

fn run_matrix<W: Write>(args: &MatrixArgs, out: W) -> donor_emd::Result<()> {
    let table = EmdTable::read_csv_path(&args.table)?;
    let matrix = DonorMatrix::from_table(&table, args.component, args.pval_cut);
    matrix.write_csv(out)
}

fn run(cli: &Cli) -> donor_emd::Result<()> {
    let config = load_config(&cli.config)?;
    match &cli.command {
        Command::Pvalues(args) => {
            let table = run_table(args, config, true)?;
            write_table(&table, open_output(&args.output)?, args.json)
        }
        Command::Emd(args) => {
            let table = run_table(args, config, false)?;
            write_table(&table, open_output(&args.output)?, args.json)
        }
        Command::Matrix(args) => run_matrix(args, open_output(&args.output)?),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(&cli)?;
    Ok(())
}
