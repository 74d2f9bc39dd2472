use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rAttendance
#[derive(Parser)]
#[command(
    name = "rattendance",
    version = env!("CARGO_PKG_VERSION"),
    about = "Campus event attendance: QR check-in/check-out, status classification and post-event reconciliation",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Override the late-arrival grace period (minutes)
    #[arg(global = true, long = "grace")]
    pub grace: Option<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum EventCommands {
    /// Schedule a new event
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        location: String,

        /// Scheduled date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Start time (HH:MM)
        #[arg(long)]
        start: String,

        /// End time (HH:MM), must be after start
        #[arg(long)]
        end: String,
    },

    /// List events
    List {
        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum StudentCommands {
    /// Add a student
    Add {
        /// Student number (as printed on the QR badge)
        #[arg(long)]
        number: String,

        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Manage events
    Event {
        #[command(subcommand)]
        action: EventCommands,
    },

    /// Manage students
    Student {
        #[command(subcommand)]
        action: StudentCommands,
    },

    /// Register a student for an event
    Register {
        #[arg(long)]
        student: String,

        #[arg(long)]
        event: i64,
    },

    /// Process a QR scan: first scan checks in, second scan checks out
    Scan {
        /// Student number read from the QR code
        #[arg(long)]
        student: String,

        #[arg(long)]
        event: i64,

        /// Scan time (YYYY-MM-DD HH:MM[:SS]); defaults to now
        #[arg(long)]
        at: Option<String>,
    },

    /// Manual check-in
    Checkin {
        #[arg(long)]
        student: String,

        #[arg(long)]
        event: i64,

        #[arg(long)]
        at: Option<String>,
    },

    /// Manual checkout
    Checkout {
        #[arg(long)]
        student: String,

        #[arg(long)]
        event: i64,

        #[arg(long)]
        at: Option<String>,
    },

    /// Show the live status of a student at an event (nothing is written)
    Status {
        #[arg(long)]
        student: String,

        #[arg(long)]
        event: i64,

        #[arg(long)]
        at: Option<String>,
    },

    /// Reconcile ended events: mark absentees and correct statuses
    Reconcile {
        /// Only this event
        #[arg(long)]
        event: Option<i64>,

        /// Reconciliation instant (YYYY-MM-DD HH:MM[:SS]); defaults to now
        #[arg(long = "as-of")]
        as_of: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the attendance roster of an event
    List {
        #[arg(long)]
        event: i64,

        /// Only rows with this status (present, late, left-early, partial, absent)
        #[arg(long)]
        status: Option<String>,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Export attendance rows
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter by event date: year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, help = "Export a single event")]
        event: Option<i64>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
