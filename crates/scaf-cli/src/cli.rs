//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// scaf - Format-preserving edits to project source files
#[derive(Parser, Debug)]
#[command(name = "scaf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print a unified diff of the pending change instead of writing it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Edit a dotenv file
    Env {
        /// Path to the .env file
        file: PathBuf,

        #[command(subcommand)]
        action: EnvAction,
    },

    /// Edit a JSON manifest (package.json, composer.json) by dot-path
    Manifest {
        /// Path to the JSON file
        file: PathBuf,

        #[command(subcommand)]
        action: ManifestAction,
    },

    /// Edit the array returned by a PHP configuration module
    Config {
        /// Path to the PHP config file
        file: PathBuf,

        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Edit a PHP service-provider class
    Provider {
        /// Path to the provider file
        file: PathBuf,

        #[command(subcommand)]
        action: ProviderAction,
    },

    /// Find/replace in any text file
    Text {
        /// Path to the file
        file: PathBuf,

        #[command(subcommand)]
        action: TextAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum EnvAction {
    /// Set KEY to VALUE, appending the key if it is absent
    ///
    /// Examples:
    ///   scaf env .env set APP_NAME "My App"
    ///   scaf env .env set APP_KEY secret --quote
    Set {
        key: String,
        value: String,

        /// Always double-quote the value
        #[arg(long)]
        quote: bool,
    },

    /// Print the value for KEY
    Get { key: String },

    /// Remove KEY and its line
    Unset { key: String },

    /// Comment out each KEY
    Comment { keys: Vec<String> },

    /// Uncomment each KEY
    Uncomment { keys: Vec<String> },
}

#[derive(Subcommand, Debug)]
pub enum ManifestAction {
    /// Set the value at a dot-path, creating intermediate objects
    ///
    /// VALUE is parsed as JSON; anything that is not valid JSON is
    /// treated as a plain string.
    Set { path: String, value: String },

    /// Append a value to the array at a dot-path
    Append { path: String, value: String },

    /// Remove a matching value from the array at a dot-path
    Remove { path: String, value: String },

    /// Delete the key at a dot-path
    Delete { path: String },

    /// Add a script entry (no-op if the script exists)
    AddScript { name: String, command: String },

    /// Append a command to a script, turning a single command into a list
    AppendScript { name: String, command: String },

    /// Remove a script entry
    RemoveScript { name: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Set the value at a dot-path inside the returned array
    ///
    /// VALUE is parsed as JSON unless --raw is given, in which case it is
    /// spliced verbatim as a PHP expression.
    Set {
        path: String,
        value: String,

        /// Treat VALUE as a verbatim PHP expression
        #[arg(long)]
        raw: bool,
    },

    /// Append one element to the array at a dot-path
    Append {
        path: String,
        value: String,

        /// Treat VALUE as a verbatim PHP expression
        #[arg(long)]
        raw: bool,
    },

    /// Merge a JSON object or array into the array at a dot-path
    Merge { path: String, values: String },

    /// Remove a top-level key
    Remove { key: String },
}

#[derive(Subcommand, Debug)]
pub enum ProviderAction {
    /// Add `use` imports to the module header (existing names are skipped)
    AddUse { names: Vec<String> },

    /// Append a statement to the `register` method body
    Register { statement: String },

    /// Append a statement to the `boot` method body
    Boot { statement: String },

    /// Append a complete method declaration to the class body
    AddMethod { method: String },
}

#[derive(Subcommand, Debug)]
pub enum TextAction {
    /// Replace every occurrence of SEARCH with REPLACE
    Replace {
        search: String,
        replace: String,

        /// Treat SEARCH as a regular expression ($1… in REPLACE)
        #[arg(long)]
        regex: bool,
    },
}
