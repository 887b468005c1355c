use clap::{Parser, Subcommand};

/// ArchAIve CLI - run generation flows from the command line
#[derive(Parser, Debug)]
#[command(name = "archaivectl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Model to use (overrides ARCHAIVE_MODEL env var)
    #[arg(long, short = 'm', global = true, env = "ARCHAIVE_MODEL", default_value = "gemini-2.0-flash")]
    pub model: String,

    /// Custom provider endpoint
    #[arg(long, global = true, env = "ARCHAIVE_ENDPOINT")]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a flow (investor_pitch, strategic_roadmap, user_journey, query_response)
    Run {
        /// Flow name
        flow: String,

        /// Input as inline JSON
        #[arg(short, long, conflicts_with = "input_file")]
        input: Option<String>,

        /// Path to a JSON input file; "-" or omitted reads stdin
        #[arg(short = 'f', long)]
        input_file: Option<String>,

        /// Output format (json, text)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// List available flows and tools
    List,
}
