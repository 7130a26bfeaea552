use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "qaza", version, author, about = "A terminal ledger for missed obligatory prayers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Choose where prayer counts are stored
    Setup {
        /// Keep everything in a local database file
        #[arg(long, conflicts_with_all = ["url", "anon_key"])]
        local: bool,
        /// Hosted backend url
        #[arg(long)]
        url: Option<String>,
        /// Public (anon) API key for the hosted backend
        #[arg(long)]
        anon_key: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        birth_year: i32,
        /// male or female
        #[arg(long, default_value = "male")]
        gender: String,
    },
    /// Sign in to an existing account
    Login {
        #[arg(long)]
        email: String,
    },
    /// Sign out
    Logout,
    /// Show missed prayer totals (default)
    Stats,
    /// Record missed prayers (adds to the count)
    Miss {
        /// Prayer name (fajr, dhuhr, asr, maghrib, isha, witr)
        prayer: String,
        /// How many to add
        #[arg(long, short, default_value_t = 1)]
        count: i64,
    },
    /// Record made-up prayers (subtracts from the count)
    Makeup {
        /// Prayer name (fajr, dhuhr, asr, maghrib, isha, witr)
        prayer: String,
        /// How many to subtract
        #[arg(long, short, default_value_t = 1)]
        count: i64,
    },
}
