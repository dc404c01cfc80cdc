use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use miptables::{
    cv, ensure_directory,
    rebrand::{rebrand_tables, table_date_today},
    tables::{self, XlsxDataRequest},
    Config,
};
use std::{path::PathBuf, process};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "miptables")]
#[command(about = "Compile MIP table descriptors and the CMIP6 controlled vocabulary")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile one CMIP6_<table>.json per worksheet of the data request
    Tables {
        /// Data request workbook (.xlsx)
        #[arg(long = "data-request")]
        data_request: PathBuf,

        /// Output directory
        #[arg(long = "output-dir", default_value = ".")]
        output_dir: PathBuf,

        /// YAML file overriding the table manifest
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create CMIP6_CV.json from a WCRP CMIP6 CV checkout
    Cv {
        /// WCRP CMIP6 CV directory
        #[arg(short = 'c', long = "cmip6_cv_dir", default_value = "./CMIP6_CVs")]
        cmip6_cv_dir: PathBuf,

        /// Output directory
        #[arg(short = 'o', long = "output_dir", default_value = ".")]
        output_dir: PathBuf,

        /// YAML file overriding the fragment manifest
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Re-stamp compiled tables for another mip_era and print the renames
    Rebrand {
        /// Directory holding the compiled tables
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        #[arg(long, default_value = "CMIP6")]
        from: String,

        #[arg(long, default_value = "ARISE")]
        to: String,
    },
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Tables {
            data_request,
            output_dir,
            config,
        } => {
            ensure_directory(&output_dir)?;
            let config = Config::load(config.as_deref())?;
            let mut workbook = XlsxDataRequest::open(&data_request)
                .with_context(|| format!("opening data request {}", data_request.display()))?;
            let written = tables::compile_tables(&mut workbook, &config.tables.tables, &output_dir)?;
            info!(tables = written.len(), "all tables written");
        }
        Command::Cv {
            cmip6_cv_dir,
            output_dir,
            config,
        } => {
            ensure_directory(&cmip6_cv_dir)?;
            ensure_directory(&output_dir)?;
            let config = Config::load(config.as_deref())?;
            cv::compile_cv(&cmip6_cv_dir, &output_dir, &config.cv.fragments)
                .context("building CMIP6_CV.json")?;
        }
        Command::Rebrand { dir, from, to } => {
            ensure_directory(&dir)?;
            let renames = rebrand_tables(&dir, &from, &to, &table_date_today())?;
            for rename in renames {
                println!("git mv {} {}", rename.from.display(), rename.to.display());
            }
        }
    }
    Ok(())
}

fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args.command) {
        error!("{:#}", e);
        process::exit(1);
    }
}
