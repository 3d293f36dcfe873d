use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "mailverify-cli",
    version,
    about = "Bulk e-mail verification: syntax, MX, heuristics, SMTP probing"
)]
pub struct Cli {
    /// fichier d'entrée : une adresse par ligne, ou CSV (extension .csv)
    pub input: Option<PathBuf>,

    /// lit des adresses depuis stdin (une par ligne)
    #[arg(long, conflicts_with = "input")]
    pub stdin: bool,

    /// colonne CSV contenant les adresses (défaut : email, emails, mail, e-mail)
    #[arg(long)]
    pub column: Option<String>,

    /// skip the catch-all and recipient SMTP probes
    #[arg(long)]
    pub no_smtp: bool,

    /// nombre de workers (prend le pas sur la configuration)
    #[arg(long)]
    pub workers: Option<usize>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Human)]
    pub format: Format,

    /// write report to file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// désactive la barre de progression
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Human,
    Json,
    Csv,
}
