use crate::export::{ExportEntity, ExportFormat};
use crate::models::reference::RefKind;
use clap::{Parser, Subcommand};

/// Command-line interface definition for taxibook
/// Bookkeeping CLI for taxi drivers backed by SQLite
#[derive(Parser)]
#[command(
    name = "taxibook",
    version = env!("CARGO_PKG_VERSION"),
    about = "Taxi driver bookkeeping: shifts, rides, expenses and receipts in SQLite, mirrored to Google Sheets",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
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

        #[arg(long = "theme", value_name = "dark|light", help = "Switch the colour theme")]
        theme: Option<String>,

        #[arg(
            long = "set-sync",
            value_name = "on|off",
            help = "Enable or disable the Google Sheets mirror"
        )]
        set_sync: Option<String>,
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

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "op", help = "Only show one operation (e.g. sync_failed)")]
        operation: Option<String>,
    },

    /// Work shifts: start, breaks, end, status
    Shift {
        #[command(subcommand)]
        action: ShiftCmd,
    },

    /// Rides within a shift
    Ride {
        #[command(subcommand)]
        action: RideCmd,
    },

    /// Expenses with tax breakdown
    Expense {
        #[command(subcommand)]
        action: ExpenseCmd,
    },

    /// Vendor / concept / workshop lists used for autocomplete
    Ref {
        #[command(subcommand)]
        action: RefCmd,
    },

    /// Read a receipt (OCR image or plain text) and extract its fields
    Scan {
        #[arg(long, value_name = "IMAGE", conflicts_with = "text", required_unless_present = "text")]
        image: Option<String>,

        #[arg(long, value_name = "FILE", help = "Use already recognised text instead of running OCR")]
        text: Option<String>,

        #[arg(long, help = "Record the result as an expense")]
        save: bool,
    },

    /// Totals for a period (default: current month)
    Summary {
        #[arg(long, short, help = "YYYY, YYYY-MM, YYYY-MM-DD, a range with ':' or 'all'")]
        period: Option<String>,
    },

    /// Google Sheets mirror
    Sync {
        #[command(subcommand)]
        action: SyncCmd,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite without asking")]
        force: bool,
    },

    /// Export shifts, rides or expenses
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_enum, default_value = "rides")]
        entity: ExportEntity,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ShiftCmd {
    /// Open a shift
    Start {
        #[arg(long, help = "Start time: HH:MM (today) or 'YYYY-MM-DD HH:MM'; default now")]
        at: Option<String>,

        #[arg(long, help = "Initial odometer (default: last final reading)")]
        km: Option<i64>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Close the active shift
    End {
        #[arg(long)]
        at: Option<String>,

        #[arg(long, help = "Final odometer reading")]
        km: i64,
    },

    /// Begin a break in the active shift
    BreakStart {
        #[arg(long)]
        at: Option<String>,
    },

    /// Finish the running break
    BreakEnd {
        #[arg(long)]
        at: Option<String>,
    },

    /// Show the active shift with running totals
    Status,

    /// List shifts
    List {
        #[arg(long, short)]
        period: Option<String>,
    },

    /// Change a recorded shift
    Edit {
        id: i64,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long = "km-start")]
        km_start: Option<i64>,

        #[arg(long = "km-end")]
        km_end: Option<i64>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a shift and its rides
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum RideCmd {
    /// Record a ride (on the active shift unless --shift is given)
    Add {
        /// Fare amount (12.50 or 12,50)
        fare: String,

        #[arg(long)]
        tip: Option<String>,

        #[arg(long = "pay", default_value = "cash", help = "cash (C), card (T), app (A), account (F)")]
        payment: String,

        #[arg(long)]
        shift: Option<i64>,

        #[arg(long)]
        at: Option<String>,

        #[arg(long = "from")]
        origin: Option<String>,

        #[arg(long = "to")]
        destination: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List rides
    List {
        #[arg(long, short)]
        period: Option<String>,

        #[arg(long)]
        shift: Option<i64>,
    },

    /// Change a recorded ride
    Edit {
        id: i64,

        #[arg(long)]
        fare: Option<String>,

        #[arg(long)]
        tip: Option<String>,

        #[arg(long = "pay")]
        payment: Option<String>,

        #[arg(long)]
        at: Option<String>,

        #[arg(long = "from")]
        origin: Option<String>,

        #[arg(long = "to")]
        destination: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a ride
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum ExpenseCmd {
    /// Record an expense; missing amounts are derived from the others
    Add {
        #[arg(long)]
        concept: String,

        #[arg(long, help = "YYYY-MM-DD (default today)")]
        date: Option<String>,

        #[arg(long, help = "Total paid, tax included")]
        total: Option<String>,

        #[arg(long, help = "Taxable base")]
        base: Option<String>,

        #[arg(long = "tax-rate", help = "Tax rate in percent (default from config)")]
        tax_rate: Option<String>,

        #[arg(long)]
        discount: Option<String>,

        #[arg(long)]
        vendor: Option<String>,

        #[arg(long)]
        workshop: Option<String>,

        #[arg(long = "service", value_name = "DESC=AMOUNT", help = "Itemised service, repeatable")]
        services: Vec<String>,

        #[arg(long)]
        liters: Option<String>,

        #[arg(long = "tax-id")]
        tax_id: Option<String>,

        #[arg(long)]
        invoice: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List expenses
    List {
        #[arg(long, short)]
        period: Option<String>,
    },

    /// Delete an expense
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum RefCmd {
    /// Add an entry to a list
    Add {
        #[arg(value_enum)]
        kind: RefKind,

        name: String,

        #[arg(long = "tax-id")]
        tax_id: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    /// Show one list, or all of them
    List {
        #[arg(value_enum)]
        kind: Option<RefKind>,
    },

    /// Autocomplete suggestions for partial text
    Suggest {
        #[arg(value_enum)]
        kind: RefKind,

        #[arg(default_value = "")]
        query: String,

        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// Remove an entry
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum SyncCmd {
    /// Replace every sheet with the local data
    Push,

    /// Show the resolved spreadsheet and row counts
    Status,

    /// Locate the sheet row holding an id
    Find { sheet: String, id: String },

    /// Print the Google consent URL
    AuthUrl,

    /// Exchange the consent code for a refresh token
    AuthCode { code: String },
}
