//! Command-line interface for mongoq
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and argument overrides
//! - Translating input lines and printing one JSON result per line

use clap::Parser as ClapParser;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{Config, LogLevel};
use crate::error::Result;
use crate::executor::{CheckResult, Session};
use crate::parser::Parser;

/// Translate MongoDB shell commands into structured queries
#[derive(ClapParser, Debug)]
#[command(
    name = "mongoq",
    version,
    about = "Translate MongoDB shell commands into structured queries",
    long_about = "Translates lines of MongoDB shell syntax (db.coll.find({...}), show dbs, use <db>)
into classified JSON. Lines are taken from the arguments, or from stdin when none are given."
)]
pub struct CliArgs {
    /// Shell command lines to translate
    #[arg(value_name = "LINE")]
    pub lines: Vec<String>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Output format (json, json-pretty)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Database selected before any `use` command
    #[arg(long, value_name = "NAME")]
    pub database: Option<String>,

    /// Refuse commands that are not read-only safe
    #[arg(long)]
    pub read_only: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration and apply argument overrides
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load(args.config_file.as_deref())?;
        Self::apply_args_to_config(&mut config, args)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) -> Result<()> {
        if let Some(format) = &args.format {
            config.display.format = format.parse()?;
        }

        if let Some(database) = &args.database {
            config.session.database = database.clone();
        }

        if args.read_only {
            config.session.read_only = true;
        }

        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };

        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate the argument lines, or stdin when there are none
    pub fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        if self.args.lines.is_empty() {
            let stdin = std::io::stdin();
            self.run_lines(stdin.lock(), &mut out)
        } else {
            let mut session = Session::from_config(&self.config.session);
            for line in &self.args.lines {
                self.write_line(&mut session, line, &mut out)?;
            }
            Ok(())
        }
    }

    /// Translate every non-blank line of a reader
    ///
    /// The session persists across lines, so `use` affects later commands.
    pub fn run_lines<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> Result<()> {
        let mut session = Session::from_config(&self.config.session);
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            self.write_line(&mut session, &line, out)?;
        }
        Ok(())
    }

    fn write_line<W: Write>(
        &self,
        session: &mut Session,
        line: &str,
        out: &mut W,
    ) -> Result<()> {
        let result = check_line(session, line);
        let text = self.config.display.format.render(&result.to_json())?;
        writeln!(out, "{}", text)?;
        Ok(())
    }
}

/// Translate one line and check it against the session
pub fn check_line(session: &mut Session, line: &str) -> CheckResult {
    let query = Parser::new().parse(line);
    session.check(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    fn interface(argv: &[&str]) -> CliInterface {
        let args = CliArgs::try_parse_from(argv).unwrap();
        let mut config = Config::default();
        CliInterface::apply_args_to_config(&mut config, &args).unwrap();
        CliInterface { args, config }
    }

    fn run(cli: &CliInterface, input: &str) -> Vec<serde_json::Value> {
        let mut out = Vec::new();
        cli.run_lines(input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_cli_args_parsing() {
        let args = CliArgs::try_parse_from(["mongoq"]).unwrap();
        assert!(args.lines.is_empty());
        assert!(args.database.is_none());
        assert!(!args.read_only);
    }

    #[test]
    fn test_cli_args_with_lines() {
        let args = CliArgs::try_parse_from(["mongoq", "show dbs", "db.users.find()"]).unwrap();
        assert_eq!(args.lines, vec!["show dbs", "db.users.find()"]);
    }

    #[test]
    fn test_args_override_config() {
        let cli = interface(&[
            "mongoq",
            "--format",
            "json-pretty",
            "--database",
            "shop",
            "--read-only",
            "-v",
        ]);
        assert_eq!(cli.config().display.format, OutputFormat::JsonPretty);
        assert_eq!(cli.config().session.database, "shop");
        assert!(cli.config().session.read_only);
        assert_eq!(cli.config().logging.level, LogLevel::Debug);

        let cli = interface(&["mongoq", "--vv", "-v"]);
        assert_eq!(cli.config().logging.level, LogLevel::Trace);
    }

    #[test]
    fn test_unknown_format_rejected() {
        let args = CliArgs::try_parse_from(["mongoq", "--format", "table"]).unwrap();
        let mut config = Config::default();
        assert!(CliInterface::apply_args_to_config(&mut config, &args).is_err());
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let args = CliArgs::try_parse_from(["mongoq", "-c", path.to_str().unwrap()]).unwrap();
        assert!(CliInterface::from_args(args).is_err());
    }

    #[test]
    fn test_run_lines_tracks_database() {
        let cli = interface(&["mongoq"]);
        let results = run(
            &cli,
            "db.users.find({a: 1})\n\n   \nuse shop\ndb.orders.insertOne({x: 1})\n",
        );

        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["type"], "read");
        assert_eq!(results[0]["database"], "test");
        assert_eq!(results[0]["namespace"], "test.users");
        assert_eq!(results[0]["args"][0]["a"], 1);

        assert_eq!(results[1]["type"], "admin");
        assert_eq!(results[1]["method"], "use");
        assert_eq!(results[1]["database"], "shop");

        assert_eq!(results[2]["type"], "write");
        assert_eq!(results[2]["namespace"], "shop.orders");
        assert_eq!(results[2]["allowed"], true);
        assert_eq!(results[2]["readonly_safe"], false);
    }

    #[test]
    fn test_run_lines_read_only() {
        let cli = interface(&["mongoq", "--read-only"]);
        let results = run(
            &cli,
            "db.users.deleteMany({})\ndb.x.aggregate([{$match: {}}, {$out: 'r'}])\nnonsense\n",
        );

        assert_eq!(results[0]["allowed"], false);
        assert!(results[0]["reason"].as_str().unwrap().contains("deleteMany"));

        assert_eq!(results[1]["has_write_stage"], true);
        assert_eq!(results[1]["allowed"], false);

        assert_eq!(results[2]["type"], "unknown");
        assert_eq!(results[2]["allowed"], false);
    }

    #[test]
    fn test_extended_json_output() {
        let cli = interface(&["mongoq"]);
        let results = run(
            &cli,
            "db.x.find({_id: ObjectId('507f1f77bcf86cd799439011'), n: NumberLong(5)})\n",
        );

        assert_eq!(
            results[0]["args"][0]["_id"]["$oid"],
            "507f1f77bcf86cd799439011"
        );
        assert_eq!(results[0]["args"][0]["n"], 5);
    }

    #[test]
    fn test_check_line() {
        let mut session = Session::new("test", false);
        let result = check_line(&mut session, "show collections");
        assert!(result.allowed());
        assert_eq!(result.query.method.as_deref(), Some("showCollections"));
    }
}
