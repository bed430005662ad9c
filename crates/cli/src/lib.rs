//! Command-line front end for the invoice generator.

pub mod commands;
pub mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use gstinvoice_invoicing::{LocaleTag, SplitTotalPolicy};

use crate::config::GeneratorConfig;

#[derive(Debug, Parser)]
#[command(
    name = "gstinvoice",
    about = env!("CARGO_PKG_DESCRIPTION"),
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a PDF invoice from a JSON input document.
    Generate(GenerateArgs),
    /// Write the built-in sample input document.
    Sample {
        #[arg(long, default_value = "sample.json")]
        output: PathBuf,
    },
}

/// Flags for `generate`. Anything left unset comes from the environment or
/// the built-in defaults.
#[derive(Debug, Clone, clap::Args)]
pub struct GenerateArgs {
    /// JSON input document.
    #[arg(long)]
    pub input: PathBuf,

    /// Signature image (JPEG or PNG), overriding the one named by the document.
    #[arg(long)]
    pub signature: Option<PathBuf>,

    /// Destination PDF [default: invoice.pdf].
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Amount-in-words locale (en-IN, en-US).
    #[arg(long)]
    pub locale: Option<LocaleTag>,

    /// Intra-state total: `first` adds CGST only, `both` adds CGST and SGST.
    #[arg(long = "split-total")]
    pub split_total: Option<SplitTotalPolicy>,

    /// Title printed at the top of the invoice.
    #[arg(long)]
    pub brand: Option<String>,
}

impl GenerateArgs {
    /// Overlay explicit flags on `base`.
    pub fn apply(self, base: GeneratorConfig) -> GeneratorConfig {
        GeneratorConfig {
            brand: self.brand.unwrap_or(base.brand),
            locale: self.locale.unwrap_or(base.locale),
            split_total: self.split_total.unwrap_or(base.split_total),
            output: self.output.unwrap_or(base.output),
            signature: self.signature.or(base.signature),
            input: Some(self.input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_take_precedence_over_environment() {
        let cli = Cli::try_parse_from([
            "gstinvoice",
            "generate",
            "--input",
            "order.json",
            "--locale",
            "en-US",
            "--split-total",
            "both",
        ])
        .unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };

        let from_env = GeneratorConfig {
            brand: "From Env".to_string(),
            locale: LocaleTag::EnIn,
            ..GeneratorConfig::default()
        };
        let config = args.apply(from_env);

        assert_eq!(config.locale, LocaleTag::EnUs);
        assert_eq!(config.split_total, SplitTotalPolicy::BothComponents);
        assert_eq!(config.brand, "From Env");
        assert_eq!(config.input, Some(PathBuf::from("order.json")));
        assert_eq!(config.output, PathBuf::from("invoice.pdf"));
    }

    #[test]
    fn unsupported_locale_flag_is_rejected() {
        let err = Cli::try_parse_from([
            "gstinvoice",
            "generate",
            "--input",
            "order.json",
            "--locale",
            "de-DE",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("de-DE"));
    }

    #[test]
    fn sample_defaults_to_sample_json() {
        let cli = Cli::try_parse_from(["gstinvoice", "sample"]).unwrap();
        match cli.command {
            Command::Sample { output } => assert_eq!(output, PathBuf::from("sample.json")),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
